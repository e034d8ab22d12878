use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CatalogError, Result};
use crate::styles::builtin;
use crate::styles::overrides::{apply_override, Character};
use crate::styles::recipe::StyleRecipe;

/// On-disk catalog layout: `[categories.<key>]` and `[characters.<key>]` tables
#[derive(Debug, Default, Serialize, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    categories: BTreeMap<String, StyleRecipe>,

    #[serde(default)]
    characters: BTreeMap<String, Character>,
}

/// Read-only table of makeup recipes
///
/// Categories are looked up directly; characters are computed on demand by layering their
/// customizations over their base category. Nothing in the catalog changes once it is built, so a
/// shared reference can be read from any number of threads.
#[derive(Debug, Clone)]
pub struct StyleCatalog {
    categories: BTreeMap<String, StyleRecipe>,
    characters: BTreeMap<String, Character>,
}

impl StyleCatalog {
    /// Create a catalog with all built-in categories and characters
    pub fn new() -> Self {
        let mut catalog = Self::empty();
        catalog.register_builtin_styles();
        catalog
    }

    /// Create a catalog with no recipes
    pub fn empty() -> Self {
        Self {
            categories: BTreeMap::new(),
            characters: BTreeMap::new(),
        }
    }

    fn register_builtin_styles(&mut self) {
        for recipe in builtin::categories() {
            self.register_category(recipe);
        }
        for (key, character) in builtin::characters() {
            self.register_character(key, character);
        }
    }

    /// Register a category under its own `category` key, replacing any previous recipe
    pub fn register_category(&mut self, recipe: StyleRecipe) {
        self.categories.insert(recipe.category.clone(), recipe);
    }

    /// Register a character variant
    pub fn register_character<K: Into<String>>(&mut self, key: K, character: Character) {
        self.characters.insert(key.into(), character);
    }

    /// Recipe for a category, or `None` when nothing should be painted
    pub fn lookup(&self, category: &str) -> Option<&StyleRecipe> {
        self.categories.get(category)
    }

    /// Base category recipe with the character's customizations layered on top
    pub fn resolve_character(&self, key: &str) -> Result<StyleRecipe> {
        let character = self
            .characters
            .get(key)
            .ok_or_else(|| CatalogError::CharacterNotFound { key: key.to_string() })?;

        let base = self.lookup(&character.base_type).ok_or_else(|| {
            CatalogError::BaseCategoryMissing {
                character: key.to_string(),
                base: character.base_type.clone(),
            }
        })?;

        Ok(apply_override(base, &character.customizations))
    }

    /// Resolve a category key first, then a character key
    pub fn resolve(&self, key: &str) -> Option<Cow<'_, StyleRecipe>> {
        if let Some(recipe) = self.lookup(key) {
            return Some(Cow::Borrowed(recipe));
        }
        match self.resolve_character(key) {
            Ok(recipe) => Some(Cow::Owned(recipe)),
            Err(e) => {
                debug!("No recipe for style '{}': {}", key, e);
                None
            }
        }
    }

    pub fn character(&self, key: &str) -> Option<&Character> {
        self.characters.get(key)
    }

    /// Category keys in sorted order
    pub fn available_categories(&self) -> Vec<String> {
        self.categories.keys().cloned().collect()
    }

    /// Character keys in sorted order
    pub fn available_characters(&self) -> Vec<String> {
        self.characters.keys().cloned().collect()
    }

    pub fn has_category(&self, key: &str) -> bool {
        self.categories.contains_key(key)
    }

    pub fn has_character(&self, key: &str) -> bool {
        self.characters.contains_key(key)
    }

    /// Number of categories plus characters
    pub fn len(&self) -> usize {
        self.categories.len() + self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.characters.is_empty()
    }

    /// Parse a catalog from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let document: CatalogDocument =
            toml::from_str(content).map_err(|e| CatalogError::LoadFailed {
                path: "<inline>".to_string(),
                reason: e.to_string(),
            })?;
        Self::from_document(document)
    }

    /// Load a catalog from a TOML file, replacing the built-in recipes
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let document: CatalogDocument =
            toml::from_str(&content).map_err(|e| CatalogError::LoadFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        let catalog = Self::from_document(document)?;
        debug!(
            "Loaded {} categories and {} characters from {}",
            catalog.categories.len(),
            catalog.characters.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Save the catalog as TOML
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let document = CatalogDocument {
            categories: self.categories.clone(),
            characters: self.characters.clone(),
        };
        let content = toml::to_string_pretty(&document).map_err(|e| CatalogError::LoadFailed {
            path: path.as_ref().display().to_string(),
            reason: e.to_string(),
        })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    fn from_document(document: CatalogDocument) -> Result<Self> {
        for (key, recipe) in &document.categories {
            if *key != recipe.category {
                return Err(CatalogError::LoadFailed {
                    path: format!("categories.{}", key),
                    reason: format!("recipe declares category '{}'", recipe.category),
                }
                .into());
            }
        }

        let catalog = Self {
            categories: document.categories,
            characters: document.characters,
        };

        for (key, character) in &catalog.characters {
            if !catalog.has_category(&character.base_type) {
                return Err(CatalogError::BaseCategoryMissing {
                    character: key.clone(),
                    base: character.base_type.clone(),
                }
                .into());
            }
        }

        Ok(catalog)
    }
}

impl Default for StyleCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::styles::overrides::PartialStyleRecipe;
    use crate::styles::recipe::{Color, EyeDecoration, EyebrowStyle, ForeheadDecoration};
    use tempfile::tempdir;

    #[test]
    fn test_builtin_styles_available() {
        let catalog = StyleCatalog::new();

        for key in ["sheng", "dan", "jing", "chou"] {
            assert!(catalog.has_category(key), "missing category {}", key);
        }
        for key in ["guanyu", "baozheng", "caocao"] {
            assert!(catalog.has_character(key), "missing character {}", key);
        }
        assert_eq!(catalog.len(), 7);
    }

    #[test]
    fn test_lookup_missing_category() {
        let catalog = StyleCatalog::new();
        assert!(catalog.lookup("xiaosheng").is_none());
        assert!(catalog.resolve("xiaosheng").is_none());
    }

    #[test]
    fn test_resolve_character_layers_over_base() {
        let catalog = StyleCatalog::new();
        let guanyu = catalog.resolve_character("guanyu").unwrap();
        let jing = catalog.lookup("jing").unwrap();

        assert_eq!(guanyu.category, "jing");
        assert_eq!(guanyu.colors.primary, Color::from_u32(0xDC143C));
        assert_eq!(
            guanyu.pattern.eyebrows.as_ref().map(|e| e.style),
            Some(EyebrowStyle::Phoenix)
        );
        assert!(matches!(
            guanyu.pattern.eye_decoration,
            Some(EyeDecoration::PhoenixEye { .. })
        ));
        assert!(matches!(
            guanyu.pattern.forehead,
            Some(ForeheadDecoration::Phoenix { size, .. }) if size == 40.0
        ));
        // Groups come from the base category.
        assert_eq!(guanyu.landmark_mapping, jing.landmark_mapping);
    }

    #[test]
    fn test_character_with_empty_customizations_equals_base() {
        let mut catalog = StyleCatalog::new();
        catalog.register_character(
            "plain",
            Character {
                name: "Plain".to_string(),
                base_type: "chou".to_string(),
                description: String::new(),
                customizations: PartialStyleRecipe::new(),
            },
        );

        let resolved = catalog.resolve_character("plain").unwrap();
        assert_eq!(&resolved, catalog.lookup("chou").unwrap());
    }

    #[test]
    fn test_resolve_character_errors() {
        let mut catalog = StyleCatalog::new();
        assert!(catalog.resolve_character("zhangfei").is_err());

        catalog.register_character(
            "orphan",
            Character {
                name: "Orphan".to_string(),
                base_type: "wusheng".to_string(),
                description: String::new(),
                customizations: PartialStyleRecipe::new(),
            },
        );
        assert!(catalog.resolve_character("orphan").is_err());
        assert!(catalog.resolve("orphan").is_none());
    }

    #[test]
    fn test_catalog_roundtrip() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("catalog.toml");

        let original = StyleCatalog::new();
        original.save_to_file(&file_path).unwrap();
        let loaded = StyleCatalog::from_file(&file_path).unwrap();

        assert_eq!(loaded.available_categories(), original.available_categories());
        assert_eq!(loaded.available_characters(), original.available_characters());
        assert_eq!(loaded.lookup("chou"), original.lookup("chou"));
        assert_eq!(
            loaded.resolve_character("baozheng").unwrap(),
            original.resolve_character("baozheng").unwrap()
        );
    }

    #[test]
    fn test_from_toml_str_minimal_category() {
        let catalog = StyleCatalog::from_toml_str(
            r##"
            [categories.laosheng]
            category = "laosheng"
            name = "Laosheng"

            [categories.laosheng.colors]
            primary = "#F5DEB3"
            secondary = "#8B4513"
            accent = "#DC143C"

            [categories.laosheng.pattern.nose]
            type = "white_patch"
            color = "#FFFFFF"
            size = 20
            "##,
        )
        .unwrap();

        let recipe = catalog.lookup("laosheng").unwrap();
        assert!(recipe.pattern.nose.is_some());
        assert!(recipe.pattern.eyebrows.is_none());
        assert!(recipe.landmark_mapping.nose.is_none());
    }

    #[test]
    fn test_from_toml_str_rejects_mismatched_key() {
        let result = StyleCatalog::from_toml_str(
            r##"
            [categories.dan]
            category = "chou"
            name = "Mismatch"

            [categories.dan.colors]
            primary = "#FFFFFF"
            secondary = "#FFFFFF"
            accent = "#FFFFFF"
            "##,
        );
        assert!(result.is_err());
    }
}
