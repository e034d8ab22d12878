//! # Facial Landmarks
//!
//! Input side of the layout engine: a frame of normalized face-mesh points as produced by an
//! external detector, plus the fixed indices of that detector's topology that the engine reads
//! directly (face outline anchors, nose tip, lip centers).
//!
//! The detector itself is not part of this crate. A frame arrives, is laid out once and is dropped;
//! nothing about a frame survives into the next one.

mod template;
pub mod types;

pub use types::{Landmark, LandmarkFrame, Point, Surface};

/// Number of points in a face-mesh frame without iris refinement
pub const MESH_POINT_COUNT: usize = 468;

// Face region anchors
pub const LEFT_CHEEK: usize = 234;
pub const RIGHT_CHEEK: usize = 454;
pub const FOREHEAD_CENTER: usize = 10;
pub const CHIN: usize = 152;

pub const NOSE_TIP: usize = 1;
pub const UPPER_LIP: usize = 13;
pub const LOWER_LIP: usize = 14;

/// Closed silhouette of the face, clockwise from the top of the forehead
pub const FACE_OVAL: [usize; 36] = [
    10, 338, 297, 332, 284, 251, 389, 356, 454, 323, 361, 288, 397, 365, 379, 378, 400, 377, 152,
    148, 176, 149, 150, 136, 172, 58, 132, 93, 234, 127, 162, 21, 54, 103, 67, 109,
];

/// Stride between landmarks sampled by the debug overlay
pub const OVERLAY_SAMPLE_STRIDE: usize = 10;
