//! Character overrides layered on top of a base category recipe.
//!
//! Merging is one level deep, field by field:
//!
//! - `name`, `description`: replaced when present.
//! - `colors`: each of `primary` / `secondary` / `accent` replaced individually.
//! - `pattern`: each feature section (`eyebrows`, `forehead`, ...) replaced wholesale. Setting only
//!   `pattern.eyebrows.color` is not expressible; the override carries the whole eyebrow section.
//! - `landmarkMapping`: each landmark group replaced wholesale.

use serde::{Deserialize, Serialize};

use super::recipe::{Color, LandmarkMapping, Palette, Pattern, StyleRecipe};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PartialPalette {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<Color>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<Color>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent: Option<Color>,
}

impl PartialPalette {
    fn apply(&self, base: &Palette) -> Palette {
        Palette {
            primary: self.primary.unwrap_or(base.primary),
            secondary: self.secondary.unwrap_or(base.secondary),
            accent: self.accent.unwrap_or(base.accent),
        }
    }
}

/// Sparse recipe whose present fields replace the base recipe's
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialStyleRecipe {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<PartialPalette>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<Pattern>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landmark_mapping: Option<LandmarkMapping>,
}

impl PartialStyleRecipe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override a single palette color
    pub fn primary(mut self, color: Color) -> Self {
        self.colors.get_or_insert_with(Default::default).primary = Some(color);
        self
    }

    pub fn secondary(mut self, color: Color) -> Self {
        self.colors.get_or_insert_with(Default::default).secondary = Some(color);
        self
    }

    pub fn accent(mut self, color: Color) -> Self {
        self.colors.get_or_insert_with(Default::default).accent = Some(color);
        self
    }

    /// Replace whole feature sections; `None` sections in `pattern` leave the base untouched
    pub fn pattern(mut self, pattern: Pattern) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn landmark_mapping(mut self, mapping: LandmarkMapping) -> Self {
        self.landmark_mapping = Some(mapping);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A named historical character painted as a variant of a base category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub name: String,
    pub base_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub customizations: PartialStyleRecipe,
}

fn merge_pattern(base: &Pattern, patch: &Pattern) -> Pattern {
    Pattern {
        face_outline: patch.face_outline.clone().or_else(|| base.face_outline.clone()),
        eyebrows: patch.eyebrows.clone().or_else(|| base.eyebrows.clone()),
        eye_decoration: patch.eye_decoration.clone().or_else(|| base.eye_decoration.clone()),
        nose: patch.nose.clone().or_else(|| base.nose.clone()),
        blush: patch.blush.clone().or_else(|| base.blush.clone()),
        mouth: patch.mouth.clone().or_else(|| base.mouth.clone()),
        forehead: patch.forehead.clone().or_else(|| base.forehead.clone()),
    }
}

fn merge_mapping(base: &LandmarkMapping, patch: &LandmarkMapping) -> LandmarkMapping {
    let pick = |patch: &Option<Vec<usize>>, base: &Option<Vec<usize>>| {
        patch.clone().or_else(|| base.clone())
    };
    LandmarkMapping {
        left_eyebrow: pick(&patch.left_eyebrow, &base.left_eyebrow),
        right_eyebrow: pick(&patch.right_eyebrow, &base.right_eyebrow),
        left_eye: pick(&patch.left_eye, &base.left_eye),
        right_eye: pick(&patch.right_eye, &base.right_eye),
        nose: pick(&patch.nose, &base.nose),
        mouth: pick(&patch.mouth, &base.mouth),
        forehead: pick(&patch.forehead, &base.forehead),
        chin: pick(&patch.chin, &base.chin),
    }
}

/// Layer `patch` over `base`, one level deep
pub fn apply_override(base: &StyleRecipe, patch: &PartialStyleRecipe) -> StyleRecipe {
    StyleRecipe {
        category: base.category.clone(),
        name: patch.name.clone().unwrap_or_else(|| base.name.clone()),
        description: patch
            .description
            .clone()
            .unwrap_or_else(|| base.description.clone()),
        colors: patch
            .colors
            .as_ref()
            .map_or_else(|| base.colors.clone(), |colors| colors.apply(&base.colors)),
        pattern: patch
            .pattern
            .as_ref()
            .map_or_else(|| base.pattern.clone(), |pattern| merge_pattern(&base.pattern, pattern)),
        landmark_mapping: patch.landmark_mapping.as_ref().map_or_else(
            || base.landmark_mapping.clone(),
            |mapping| merge_mapping(&base.landmark_mapping, mapping),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::styles::builtin;
    use crate::styles::recipe::{EyebrowStyle, Eyebrows, ForeheadDecoration};

    fn jing() -> StyleRecipe {
        builtin::categories()
            .into_iter()
            .find(|recipe| recipe.category == "jing")
            .unwrap()
    }

    #[test]
    fn test_empty_override_is_identity() {
        let base = jing();
        assert_eq!(apply_override(&base, &PartialStyleRecipe::new()), base);
    }

    #[test]
    fn test_primary_only_keeps_everything_else() {
        let base = jing();
        let patch = PartialStyleRecipe::new().primary(Color::rgb(220, 20, 60));
        let merged = apply_override(&base, &patch);

        assert_eq!(merged.colors.primary, Color::rgb(220, 20, 60));
        assert_eq!(merged.colors.secondary, base.colors.secondary);
        assert_eq!(merged.colors.accent, base.colors.accent);
        assert_eq!(
            merged.pattern.eyebrows.as_ref().map(|e| e.thickness),
            base.pattern.eyebrows.as_ref().map(|e| e.thickness)
        );
        assert_eq!(merged.pattern, base.pattern);
        assert_eq!(merged.landmark_mapping, base.landmark_mapping);
    }

    #[test]
    fn test_feature_sections_replace_wholesale() {
        let base = jing();
        let patch = PartialStyleRecipe::new().pattern(Pattern {
            eyebrows: Some(Eyebrows {
                style: EyebrowStyle::Phoenix,
                color: Color::BLACK,
                thickness: 12.0,
                length: 0.0,
                angle: 0.0,
            }),
            forehead: Some(ForeheadDecoration::Moon { color: Color::WHITE, size: 25.0 }),
            ..Default::default()
        });
        let merged = apply_override(&base, &patch);

        let brows = merged.pattern.eyebrows.unwrap();
        assert_eq!(brows.style, EyebrowStyle::Phoenix);
        // The base's authored length does not survive a section replacement.
        assert_eq!(brows.length, 0.0);
        assert_eq!(
            merged.pattern.forehead,
            Some(ForeheadDecoration::Moon { color: Color::WHITE, size: 25.0 })
        );
        assert_eq!(merged.pattern.eye_decoration, base.pattern.eye_decoration);
    }

    #[test]
    fn test_mapping_groups_merge_individually() {
        let base = jing();
        let patch = PartialStyleRecipe::new().landmark_mapping(LandmarkMapping {
            nose: Some(vec![1]),
            ..Default::default()
        });
        let merged = apply_override(&base, &patch);

        assert_eq!(merged.landmark_mapping.nose, Some(vec![1]));
        assert_eq!(merged.landmark_mapping.mouth, base.landmark_mapping.mouth);
    }
}
