use serde::{Deserialize, Serialize};

use crate::error::{LandmarkError, Result};

/// A single normalized face-mesh point
///
/// `x` and `y` are fractions of the frame width and height. The detector also reports a relative
/// depth, which is accepted on input and otherwise ignored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub z: f32,
}

fn is_zero(value: &f32) -> bool {
    *value == 0.0
}

impl Landmark {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }
}

/// A screen-space point in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Point shifted by a pixel offset
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn midpoint(self, other: Point) -> Self {
        Self::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    pub fn distance(&self, other: &Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Unweighted mean of a set of points, `None` when the set is empty
    pub fn centroid(points: &[Point]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let n = points.len() as f32;
        let (sx, sy) = points
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        Some(Self::new(sx / n, sy / n))
    }
}

impl std::ops::Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Mul<f32> for Point {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self::Output {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

/// Pixel dimensions of the drawing surface that normalized landmarks are scaled onto
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Surface {
    pub width: u32,
    pub height: u32,
}

impl Surface {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Scale a normalized landmark into screen space
    pub fn project(&self, landmark: Landmark) -> Point {
        Point::new(
            landmark.x * self.width as f32,
            landmark.y * self.height as f32,
        )
    }
}

/// One detector result: the ordered points of a single tracked face
///
/// Indices carry the detector's anatomical meaning, so the frame is never reordered or filtered.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LandmarkFrame {
    points: Vec<Landmark>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FrameDocument {
    Bare(Vec<Landmark>),
    Wrapped { landmarks: Vec<Landmark> },
}

impl LandmarkFrame {
    pub fn new(points: Vec<Landmark>) -> Self {
        Self { points }
    }

    /// Build a frame from `(x, y)` pairs
    pub fn from_normalized(points: &[(f32, f32)]) -> Self {
        Self::new(points.iter().map(|&(x, y)| Landmark::new(x, y)).collect())
    }

    /// Parse a frame exported as JSON
    ///
    /// Accepts either a bare array of points or an object with a `landmarks` array.
    pub fn from_json(content: &str) -> Result<Self> {
        let document: FrameDocument = serde_json::from_str(content)
            .map_err(|e| LandmarkError::ParseFailed { reason: e.to_string() })?;

        let points = match document {
            FrameDocument::Bare(points) => points,
            FrameDocument::Wrapped { landmarks } => landmarks,
        };

        if points.is_empty() {
            return Err(LandmarkError::Empty.into());
        }
        Ok(Self::new(points))
    }

    /// Read and parse a JSON frame from disk
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Landmark] {
        &self.points
    }

    pub fn get(&self, index: usize) -> Option<Landmark> {
        self.points.get(index).copied()
    }

    /// Replace one point, growing the frame with copies of it if needed
    pub fn with_point(mut self, index: usize, x: f32, y: f32) -> Self {
        let landmark = Landmark::new(x, y);
        if index >= self.points.len() {
            self.points.resize(index + 1, landmark);
        }
        self.points[index] = landmark;
        self
    }

    /// Every point shifted by the same normalized offset
    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        Self::new(
            self.points
                .iter()
                .map(|p| Landmark { x: p.x + dx, y: p.y + dy, z: p.z })
                .collect(),
        )
    }

    /// Screen-space position of one landmark
    pub fn project(&self, index: usize, surface: Surface) -> Option<Point> {
        self.get(index).map(|landmark| surface.project(landmark))
    }

    /// Screen-space positions of a landmark group, `None` if any index is out of range
    pub fn project_group(&self, indices: &[usize], surface: Surface) -> Option<Vec<Point>> {
        indices
            .iter()
            .map(|&index| self.project(index, surface))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_scales_by_surface() {
        let surface = Surface::new(640, 480);
        let point = surface.project(Landmark::new(0.5, 0.25));
        assert_eq!(point, Point::new(320.0, 120.0));
    }

    #[test]
    fn test_project_group_requires_every_index() {
        let frame = LandmarkFrame::from_normalized(&[(0.1, 0.1), (0.2, 0.2)]);
        let surface = Surface::new(100, 100);

        assert_eq!(frame.project_group(&[0, 1], surface).map(|g| g.len()), Some(2));
        assert!(frame.project_group(&[0, 5], surface).is_none());
    }

    #[test]
    fn test_from_json_accepts_both_shapes() {
        let bare = LandmarkFrame::from_json(r#"[{"x":0.5,"y":0.5,"z":-0.01}]"#).unwrap();
        assert_eq!(bare.len(), 1);

        let wrapped =
            LandmarkFrame::from_json(r#"{"landmarks":[{"x":0.1,"y":0.2},{"x":0.3,"y":0.4}]}"#)
                .unwrap();
        assert_eq!(wrapped.get(1), Some(Landmark::new(0.3, 0.4)));
    }

    #[test]
    fn test_from_json_rejects_empty_frame() {
        assert!(LandmarkFrame::from_json("[]").is_err());
        assert!(LandmarkFrame::from_json("not json").is_err());
    }

    #[test]
    fn test_with_point_grows_frame() {
        let frame = LandmarkFrame::default().with_point(3, 0.5, 0.5);
        assert_eq!(frame.len(), 4);
        assert_eq!(frame.get(3), Some(Landmark::new(0.5, 0.5)));
    }

    #[test]
    fn test_centroid() {
        let points = [Point::new(0.0, 0.0), Point::new(4.0, 2.0)];
        assert_eq!(Point::centroid(&points), Some(Point::new(2.0, 1.0)));
        assert_eq!(Point::centroid(&[]), None);
    }
}
