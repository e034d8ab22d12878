use serde::Serialize;

use crate::landmarks::{LandmarkFrame, Point, Surface, CHIN, FOREHEAD_CENTER, LEFT_CHEEK, RIGHT_CHEEK};

/// Screen-space extent of the detected face for one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FaceRegion {
    pub min: Point,
    pub max: Point,
    pub center: Point,
    pub width: f32,
    pub height: f32,
    /// Half the larger of width and height
    pub radius: f32,
}

impl FaceRegion {
    /// Bounding box of the cheek, forehead and chin anchors
    ///
    /// Returns `None` when the frame does not reach all four anchors.
    pub fn compute(frame: &LandmarkFrame, surface: Surface) -> Option<Self> {
        let anchors = frame.project_group(&[LEFT_CHEEK, RIGHT_CHEEK, FOREHEAD_CENTER, CHIN], surface)?;

        let (mut min, mut max) = (anchors[0], anchors[0]);
        for point in &anchors[1..] {
            min.x = min.x.min(point.x);
            min.y = min.y.min(point.y);
            max.x = max.x.max(point.x);
            max.y = max.y.max(point.y);
        }

        let width = max.x - min.x;
        let height = max.y - min.y;
        Some(Self {
            min,
            max,
            center: min.midpoint(max),
            width,
            height,
            radius: width.max(height) / 2.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchors(offset: (f32, f32)) -> LandmarkFrame {
        LandmarkFrame::default()
            .with_point(LEFT_CHEEK, 0.3 + offset.0, 0.5 + offset.1)
            .with_point(RIGHT_CHEEK, 0.7 + offset.0, 0.5 + offset.1)
            .with_point(FOREHEAD_CENTER, 0.5 + offset.0, 0.2 + offset.1)
            .with_point(CHIN, 0.5 + offset.0, 0.8 + offset.1)
    }

    #[test]
    fn test_region_from_anchors() {
        let region = FaceRegion::compute(&anchors((0.0, 0.0)), Surface::new(1000, 1000)).unwrap();
        assert!((region.center.x - 500.0).abs() < 1e-3);
        assert!((region.center.y - 500.0).abs() < 1e-3);
        assert!((region.width - 400.0).abs() < 1e-3);
        assert!((region.height - 600.0).abs() < 1e-3);
        assert!((region.radius - 300.0).abs() < 1e-3);
    }

    #[test]
    fn test_region_translation_invariance() {
        let surface = Surface::new(640, 480);
        let base = FaceRegion::compute(&anchors((0.0, 0.0)), surface).unwrap();
        let moved = FaceRegion::compute(&anchors((0.0, 0.0)).translated(0.05, -0.1), surface).unwrap();

        assert!((moved.center.x - (base.center.x + 0.05 * 640.0)).abs() < 1e-2);
        assert!((moved.center.y - (base.center.y - 0.1 * 480.0)).abs() < 1e-2);
        assert!((moved.radius - base.radius).abs() < 1e-2);
    }

    #[test]
    fn test_region_requires_anchors() {
        let frame = LandmarkFrame::from_normalized(&[(0.5, 0.5); 20]);
        assert!(FaceRegion::compute(&frame, Surface::new(640, 480)).is_none());
    }
}
