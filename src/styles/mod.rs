//! # Style Catalog
//!
//! Declarative descriptions of each Peking Opera makeup category: palette, per-feature
//! sub-recipes and the landmark groups each feature reads from.
//!
//! ## Built-in Styles
//!
//! - **Sheng**: straight brows, lid liner, light blush
//! - **Dan**: arched brows, eye shadow, rosy cheeks
//! - **Jing**: upturned brows, dramatic eye flicks, tiger stripes on the forehead
//! - **Chou**: white nose patch and an exaggerated mouth
//!
//! Characters (Guan Yu, Bao Zheng, Cao Cao) are jing variants resolved through
//! [`StyleCatalog::resolve_character`].
//!
//! ## Usage
//!
//! ```rust
//! use opera_face::styles::StyleCatalog;
//!
//! let catalog = StyleCatalog::new();
//! let chou = catalog.lookup("chou").unwrap();
//! assert!(chou.pattern.nose.is_some());
//!
//! let guanyu = catalog.resolve_character("guanyu").unwrap();
//! assert_eq!(guanyu.category, "jing");
//! ```

pub mod builtin;
pub mod catalog;
pub mod overrides;
pub mod recipe;

// Re-exports for convenience
pub use catalog::StyleCatalog;
pub use overrides::{apply_override, Character, PartialPalette, PartialStyleRecipe};
pub use recipe::{
    Blush, Color, EyeDecoration, EyebrowStyle, Eyebrows, FaceOutline, FeatureGroup,
    ForeheadDecoration, LandmarkMapping, MouthDecoration, NoseDecoration, Palette, PatchShape,
    Pattern, Side, StyleRecipe,
};
