use std::f32::consts::TAU;

use super::{types::LandmarkFrame, FACE_OVAL, MESH_POINT_COUNT};

const FACE_CENTER: (f32, f32) = (0.5, 0.5);
const FACE_RADII: (f32, f32) = (0.18, 0.26);

const MOUTH_RING: [usize; 20] = [
    13, 312, 311, 310, 415, 308, 324, 318, 402, 317, 14, 87, 178, 88, 95, 78, 191, 80, 81, 82,
];
const MOUTH_CENTER: (f32, f32) = (0.5, 0.66);
const MOUTH_RADII: (f32, f32) = (0.06, 0.02);

// Image-left brow and eye; the image-right side mirrors them about x = 0.5.
const LEFT_BROW: [(usize, usize, f32, f32); 5] = [
    (70, 300, 0.37, 0.41),
    (63, 293, 0.39, 0.40),
    (105, 334, 0.41, 0.395),
    (66, 296, 0.43, 0.395),
    (107, 336, 0.45, 0.40),
];

const LEFT_EYE: [(usize, f32, f32); 8] = [
    (33, 0.37, 0.45),
    (133, 0.45, 0.45),
    (155, 0.44, 0.455),
    (154, 0.43, 0.46),
    (153, 0.42, 0.462),
    (145, 0.41, 0.463),
    (144, 0.40, 0.462),
    (163, 0.385, 0.458),
];

const RIGHT_EYE: [(usize, f32, f32); 8] = [
    (263, 0.63, 0.45),
    (362, 0.55, 0.45),
    (384, 0.56, 0.44),
    (385, 0.58, 0.437),
    (386, 0.59, 0.436),
    (387, 0.60, 0.437),
    (388, 0.615, 0.44),
    (390, 0.62, 0.458),
];

const NOSE: [(usize, f32, f32); 9] = [
    (168, 0.5, 0.44),
    (6, 0.5, 0.47),
    (197, 0.5, 0.49),
    (195, 0.5, 0.51),
    (5, 0.5, 0.53),
    (4, 0.5, 0.55),
    (1, 0.5, 0.56),
    (2, 0.5, 0.58),
    (3, 0.49, 0.56),
];

fn ring_point(center: (f32, f32), radii: (f32, f32), step: usize, steps: usize) -> (f32, f32) {
    let theta = TAU * step as f32 / steps as f32;
    (
        center.0 + radii.0 * theta.sin(),
        center.1 - radii.1 * theta.cos(),
    )
}

impl LandmarkFrame {
    /// A deterministic, frontal, centered face
    ///
    /// Every index the built-in recipes and the face region read is placed anatomically; the rest of
    /// the mesh sits at the face center. Used by the CLI when no detector output is supplied.
    pub fn neutral_face() -> Self {
        let mut points = vec![FACE_CENTER; MESH_POINT_COUNT];

        for (step, &index) in FACE_OVAL.iter().enumerate() {
            points[index] = ring_point(FACE_CENTER, FACE_RADII, step, FACE_OVAL.len());
        }
        for (step, &index) in MOUTH_RING.iter().enumerate() {
            points[index] = ring_point(MOUTH_CENTER, MOUTH_RADII, step, MOUTH_RING.len());
        }
        for &(left, right, x, y) in &LEFT_BROW {
            points[left] = (x, y);
            points[right] = (1.0 - x, y);
        }
        for &(index, x, y) in LEFT_EYE.iter().chain(&RIGHT_EYE).chain(&NOSE) {
            points[index] = (x, y);
        }

        Self::from_normalized(&points)
    }
}

#[cfg(test)]
mod tests {
    use crate::landmarks::{CHIN, FOREHEAD_CENTER, LEFT_CHEEK, MESH_POINT_COUNT, RIGHT_CHEEK};

    use super::*;

    #[test]
    fn test_neutral_face_anchors() {
        let frame = LandmarkFrame::neutral_face();
        assert_eq!(frame.len(), MESH_POINT_COUNT);

        let forehead = frame.get(FOREHEAD_CENTER).unwrap();
        let chin = frame.get(CHIN).unwrap();
        assert!(forehead.y < chin.y);

        let left = frame.get(LEFT_CHEEK).unwrap();
        let right = frame.get(RIGHT_CHEEK).unwrap();
        assert!(left.x < 0.5 && right.x > 0.5);
    }
}
