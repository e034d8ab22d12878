//! Decoration layout and rendering.
//!
//! [`LayoutEngine`] turns a landmark frame and a style into [`DrawPrimitive`]s and plays them into
//! any [`RenderSink`]. [`RasterCanvas`] is the bundled software sink; [`RecordingSink`] keeps the
//! calls for inspection.

pub mod cache;
pub mod canvas;
pub mod engine;
mod features;
pub mod layout;
pub mod options;
pub mod primitive;
pub mod region;
pub mod sink;

pub use cache::{CacheStats, PaintCache};
pub use canvas::RasterCanvas;
pub use engine::{LayoutEngine, RenderOutcome, SkipReason};
pub use layout::{Layout, LayoutOp, Stage};
pub use options::{RenderOptions, ShadowQuality};
pub use primitive::{ColorStop, CompositeMode, DrawPrimitive, Paint, Path, PathSegment, RadialGradient};
pub use region::FaceRegion;
pub use sink::{RecordingSink, RenderSink, SinkEvent};
