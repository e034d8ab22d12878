//! # Opera-Face
//!
//! Lay out Peking Opera face-paint decorations over detected facial landmarks.
//!
//! A [`StyleCatalog`] holds declarative makeup recipes: the four role categories and the
//! historical characters derived from them. The [`LayoutEngine`] reads one landmark frame per
//! tick, resolves a recipe, and emits an ordered list of self-describing draw primitives into any
//! [`RenderSink`](render::RenderSink).
//!
//! ## Quick Start
//!
//! ```rust
//! use opera_face::{
//!     landmarks::LandmarkFrame,
//!     render::{LayoutEngine, RecordingSink, RenderOptions},
//! };
//!
//! let mut engine = LayoutEngine::with_builtin_catalog();
//! let mut sink = RecordingSink::new(640, 480);
//!
//! let frame = LandmarkFrame::neutral_face();
//! let outcome = engine.render(&frame, "guanyu", &RenderOptions::default(), &mut sink);
//!
//! assert!(outcome.is_completed());
//! assert!(!sink.primitives().is_empty());
//! ```
//!
//! ## Architecture
//!
//! - [`landmarks`] - Landmark frames, screen projection and well-known mesh indices
//! - [`styles`] - Recipes, character overrides and the catalog
//! - [`render`] - Layout engine, draw primitives, sinks and the raster canvas
//! - [`config`] - Configuration management
//!
//! ## Custom Sinks
//!
//! Any drawing surface can receive primitives by implementing [`RenderSink`](render::RenderSink):
//!
//! ```rust
//! use opera_face::landmarks::Surface;
//! use opera_face::render::{DrawPrimitive, RenderSink};
//! use opera_face::Result;
//!
//! struct CountingSink(usize);
//!
//! impl RenderSink for CountingSink {
//!     fn surface(&self) -> Surface {
//!         Surface::new(1280, 720)
//!     }
//!
//!     fn save(&mut self) {}
//!
//!     fn restore(&mut self) -> Result<()> {
//!         Ok(())
//!     }
//!
//!     fn draw(&mut self, _primitive: &DrawPrimitive) -> Result<()> {
//!         self.0 += 1;
//!         Ok(())
//!     }
//! }
//! ```

pub mod config;
pub mod error;
pub mod landmarks;
pub mod render;
pub mod styles;

// Re-export commonly used types for convenience
pub use crate::{
    config::Config,
    error::{OperaError, Result},
    render::{LayoutEngine, RenderOptions},
    styles::StyleCatalog,
};
