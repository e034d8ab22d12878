use std::f32::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::landmarks::Point;
use crate::styles::Color;

/// Pixel-combination rule for a primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompositeMode {
    /// Paint over existing content
    #[default]
    SourceOver,
    /// Erase existing content where the source is opaque
    DestinationOut,
    /// Keep existing content only where the source is opaque
    DestinationIn,
    /// Darken by multiplying with existing content
    Multiply,
    /// Gently lighten or darken depending on the source
    SoftLight,
}

impl CompositeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompositeMode::SourceOver => "source-over",
            CompositeMode::DestinationOut => "destination-out",
            CompositeMode::DestinationIn => "destination-in",
            CompositeMode::Multiply => "multiply",
            CompositeMode::SoftLight => "soft-light",
        }
    }
}

/// Solid paint attributes carried by every non-gradient primitive
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Paint {
    pub color: Color,
    pub alpha: f32,
    pub composite: CompositeMode,
}

impl Paint {
    pub fn new(color: Color, alpha: f32, composite: CompositeMode) -> Self {
        Self { color, alpha, composite }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    /// Position along the gradient, 0.0 at the inner circle and 1.0 at the outer one
    pub offset: f32,
    pub color: Color,
    pub alpha: f32,
}

impl ColorStop {
    pub fn new(offset: f32, color: Color, alpha: f32) -> Self {
        Self { offset, color, alpha }
    }
}

/// Concentric radial gradient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadialGradient {
    pub center: Point,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub stops: Vec<ColorStop>,
}

impl RadialGradient {
    /// Straight RGBA in `0.0..=1.0` at a distance from the gradient center
    ///
    /// Distances inside the inner circle take the first stop, distances past the outer circle the
    /// last one.
    pub fn sample(&self, distance: f32) -> [f32; 4] {
        let (first, last) = match (self.stops.first(), self.stops.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return [0.0; 4],
        };

        let span = self.outer_radius - self.inner_radius;
        let t = if span > 0.0 {
            ((distance - self.inner_radius) / span).clamp(0.0, 1.0)
        } else if distance < self.outer_radius {
            0.0
        } else {
            1.0
        };

        if t <= first.offset {
            return stop_rgba(first);
        }
        for pair in self.stops.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if t <= b.offset {
                let width = b.offset - a.offset;
                let k = if width > 0.0 { (t - a.offset) / width } else { 1.0 };
                let (ca, cb) = (stop_rgba(a), stop_rgba(b));
                return [
                    ca[0] + (cb[0] - ca[0]) * k,
                    ca[1] + (cb[1] - ca[1]) * k,
                    ca[2] + (cb[2] - ca[2]) * k,
                    ca[3] + (cb[3] - ca[3]) * k,
                ];
            }
        }
        stop_rgba(last)
    }
}

fn stop_rgba(stop: &ColorStop) -> [f32; 4] {
    [
        stop.color.r as f32 / 255.0,
        stop.color.g as f32 / 255.0,
        stop.color.b as f32 / 255.0,
        stop.alpha,
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathSegment {
    MoveTo(Point),
    LineTo(Point),
    QuadTo { control: Point, to: Point },
    /// Clockwise arc in screen space (y down), angles in radians
    Arc { center: Point, radius: f32, start_angle: f32, end_angle: f32 },
    /// Full axis-aligned ellipse as its own closed subpath
    Ellipse { center: Point, radius_x: f32, radius_y: f32 },
    Close,
}

/// Ordered path construction commands
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Path {
    segments: Vec<PathSegment>,
}

const CURVE_STEPS: usize = 16;
const ELLIPSE_STEPS: usize = 48;

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open poly-line through `points`
    pub fn polyline(points: &[Point]) -> Self {
        let mut path = Self::new();
        for (i, &point) in points.iter().enumerate() {
            path = if i == 0 { path.move_to(point) } else { path.line_to(point) };
        }
        path
    }

    /// Closed polygon through `points`
    pub fn polygon(points: &[Point]) -> Self {
        let path = Self::polyline(points);
        if path.is_empty() {
            path
        } else {
            path.close()
        }
    }

    pub fn move_to(mut self, point: Point) -> Self {
        self.segments.push(PathSegment::MoveTo(point));
        self
    }

    pub fn line_to(mut self, point: Point) -> Self {
        self.segments.push(PathSegment::LineTo(point));
        self
    }

    pub fn quad_to(mut self, control: Point, to: Point) -> Self {
        self.segments.push(PathSegment::QuadTo { control, to });
        self
    }

    pub fn arc(mut self, center: Point, radius: f32, start_angle: f32, end_angle: f32) -> Self {
        self.segments.push(PathSegment::Arc { center, radius, start_angle, end_angle });
        self
    }

    pub fn ellipse(mut self, center: Point, radius_x: f32, radius_y: f32) -> Self {
        self.segments.push(PathSegment::Ellipse { center, radius_x, radius_y });
        self
    }

    pub fn close(mut self) -> Self {
        self.segments.push(PathSegment::Close);
        self
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of quadratic curve segments
    pub fn curve_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, PathSegment::QuadTo { .. }))
            .count()
    }

    /// Number of straight line segments
    pub fn line_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, PathSegment::LineTo(_)))
            .count()
    }

    /// Every explicit coordinate in the path, control points included
    pub fn points(&self) -> Vec<Point> {
        self.segments
            .iter()
            .flat_map(|segment| match *segment {
                PathSegment::MoveTo(p) | PathSegment::LineTo(p) => vec![p],
                PathSegment::QuadTo { control, to } => vec![control, to],
                PathSegment::Arc { center, .. } | PathSegment::Ellipse { center, .. } => vec![center],
                PathSegment::Close => vec![],
            })
            .collect()
    }

    /// Approximate the path with poly-lines, one per subpath; closed subpaths repeat their start
    pub fn flatten(&self) -> Vec<Vec<Point>> {
        let mut subpaths: Vec<Vec<Point>> = Vec::new();
        let mut current: Vec<Point> = Vec::new();

        let finish = |current: &mut Vec<Point>, subpaths: &mut Vec<Vec<Point>>| {
            if !current.is_empty() {
                subpaths.push(std::mem::take(current));
            }
        };

        for segment in &self.segments {
            match *segment {
                PathSegment::MoveTo(p) => {
                    finish(&mut current, &mut subpaths);
                    current.push(p);
                }
                PathSegment::LineTo(p) => current.push(p),
                PathSegment::QuadTo { control, to } => {
                    let from = current.last().copied().unwrap_or(control);
                    if current.is_empty() {
                        current.push(from);
                    }
                    for step in 1..=CURVE_STEPS {
                        let t = step as f32 / CURVE_STEPS as f32;
                        let mt = 1.0 - t;
                        current.push(Point::new(
                            mt * mt * from.x + 2.0 * mt * t * control.x + t * t * to.x,
                            mt * mt * from.y + 2.0 * mt * t * control.y + t * t * to.y,
                        ));
                    }
                }
                PathSegment::Arc { center, radius, start_angle, end_angle } => {
                    let sweep = end_angle - start_angle;
                    let steps = ((sweep.abs() / TAU) * ELLIPSE_STEPS as f32).ceil().max(1.0) as usize;
                    for step in 0..=steps {
                        let angle = start_angle + sweep * step as f32 / steps as f32;
                        current.push(Point::new(
                            center.x + radius * angle.cos(),
                            center.y + radius * angle.sin(),
                        ));
                    }
                }
                PathSegment::Ellipse { center, radius_x, radius_y } => {
                    finish(&mut current, &mut subpaths);
                    let ring: Vec<Point> = (0..=ELLIPSE_STEPS)
                        .map(|step| {
                            let angle = TAU * step as f32 / ELLIPSE_STEPS as f32;
                            Point::new(
                                center.x + radius_x * angle.cos(),
                                center.y + radius_y * angle.sin(),
                            )
                        })
                        .collect();
                    subpaths.push(ring);
                }
                PathSegment::Close => {
                    if let Some(&start) = current.first() {
                        current.push(start);
                    }
                    finish(&mut current, &mut subpaths);
                }
            }
        }
        finish(&mut current, &mut subpaths);
        subpaths
    }

    fn is_finite(&self) -> bool {
        self.segments.iter().all(|segment| match *segment {
            PathSegment::MoveTo(p) | PathSegment::LineTo(p) => p.is_finite(),
            PathSegment::QuadTo { control, to } => control.is_finite() && to.is_finite(),
            PathSegment::Arc { center, radius, start_angle, end_angle } => {
                center.is_finite() && radius.is_finite() && start_angle.is_finite() && end_angle.is_finite()
            }
            PathSegment::Ellipse { center, radius_x, radius_y } => {
                center.is_finite() && radius_x.is_finite() && radius_y.is_finite()
            }
            PathSegment::Close => true,
        })
    }
}

/// One self-describing paint operation
///
/// Every primitive carries its full paint state, so executing one never depends on what the
/// previous primitive left behind. Only the emission order matters, for layering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawPrimitive {
    /// Filled axis-aligned ellipse; a circle when both radii match
    FillEllipse {
        center: Point,
        radius_x: f32,
        radius_y: f32,
        paint: Paint,
    },
    /// Filled closed shape (non-zero winding)
    FillPath { path: Path, paint: Paint },
    /// Stroked path with round joins and caps
    StrokePath { path: Path, width: f32, paint: Paint },
    /// Circle of `radius` around `center` filled with a radial gradient
    RadialGradientFill {
        gradient: RadialGradient,
        center: Point,
        radius: f32,
        alpha: f32,
        composite: CompositeMode,
    },
}

impl DrawPrimitive {
    pub fn fill_circle(center: Point, radius: f32, paint: Paint) -> Self {
        DrawPrimitive::FillEllipse { center, radius_x: radius, radius_y: radius, paint }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            DrawPrimitive::FillEllipse { .. } => "fill_ellipse",
            DrawPrimitive::FillPath { .. } => "fill_path",
            DrawPrimitive::StrokePath { .. } => "stroke_path",
            DrawPrimitive::RadialGradientFill { .. } => "radial_gradient_fill",
        }
    }

    pub fn composite(&self) -> CompositeMode {
        match self {
            DrawPrimitive::FillEllipse { paint, .. }
            | DrawPrimitive::FillPath { paint, .. }
            | DrawPrimitive::StrokePath { paint, .. } => paint.composite,
            DrawPrimitive::RadialGradientFill { composite, .. } => *composite,
        }
    }

    /// Check that the geometry can be rasterized; the reason is returned on failure
    pub fn validate(&self) -> std::result::Result<(), String> {
        let alpha_ok = |alpha: f32| (0.0..=1.0).contains(&alpha);
        match self {
            DrawPrimitive::FillEllipse { center, radius_x, radius_y, paint } => {
                if !center.is_finite() || !radius_x.is_finite() || !radius_y.is_finite() {
                    return Err("non-finite ellipse geometry".to_string());
                }
                if *radius_x < 0.0 || *radius_y < 0.0 {
                    return Err(format!("negative radius ({}, {})", radius_x, radius_y));
                }
                if !alpha_ok(paint.alpha) {
                    return Err(format!("alpha {} outside 0..=1", paint.alpha));
                }
            }
            DrawPrimitive::FillPath { path, paint } => {
                if !path.is_finite() {
                    return Err("non-finite path".to_string());
                }
                if !alpha_ok(paint.alpha) {
                    return Err(format!("alpha {} outside 0..=1", paint.alpha));
                }
            }
            DrawPrimitive::StrokePath { path, width, paint } => {
                if !path.is_finite() {
                    return Err("non-finite path".to_string());
                }
                if !width.is_finite() || *width < 0.0 {
                    return Err(format!("invalid stroke width {}", width));
                }
                if !alpha_ok(paint.alpha) {
                    return Err(format!("alpha {} outside 0..=1", paint.alpha));
                }
            }
            DrawPrimitive::RadialGradientFill { gradient, center, radius, alpha, .. } => {
                if !center.is_finite() || !radius.is_finite() || *radius < 0.0 {
                    return Err("invalid gradient fill region".to_string());
                }
                if !gradient.center.is_finite()
                    || !gradient.inner_radius.is_finite()
                    || !gradient.outer_radius.is_finite()
                    || gradient.inner_radius < 0.0
                    || gradient.outer_radius < gradient.inner_radius
                {
                    return Err("invalid gradient radii".to_string());
                }
                if gradient.stops.windows(2).any(|w| w[1].offset < w[0].offset) {
                    return Err("gradient stops out of order".to_string());
                }
                if !alpha_ok(*alpha) {
                    return Err(format!("alpha {} outside 0..=1", alpha));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient() -> RadialGradient {
        RadialGradient {
            center: Point::new(0.0, 0.0),
            inner_radius: 0.0,
            outer_radius: 10.0,
            stops: vec![
                ColorStop::new(0.0, Color::WHITE, 1.0),
                ColorStop::new(1.0, Color::WHITE, 0.0),
            ],
        }
    }

    #[test]
    fn test_gradient_sample_interpolates() {
        let g = gradient();
        assert_eq!(g.sample(0.0)[3], 1.0);
        assert!((g.sample(5.0)[3] - 0.5).abs() < 1e-6);
        assert_eq!(g.sample(20.0)[3], 0.0);
    }

    #[test]
    fn test_gradient_inner_radius_pads_first_stop() {
        let mut g = gradient();
        g.inner_radius = 8.0;
        assert_eq!(g.sample(4.0)[3], 1.0);
        assert!((g.sample(9.0)[3] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_polyline_counts() {
        let points = [Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(2.0, 1.0)];
        let path = Path::polyline(&points);
        assert_eq!(path.line_count(), 2);
        assert_eq!(path.curve_count(), 0);
        assert!(Path::polyline(&[]).is_empty());
    }

    #[test]
    fn test_flatten_closes_polygons() {
        let square = Path::polygon(&[
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
        ]);
        let subpaths = square.flatten();
        assert_eq!(subpaths.len(), 1);
        assert_eq!(subpaths[0].first(), subpaths[0].last());
    }

    #[test]
    fn test_flatten_quad_ends_at_target() {
        let path = Path::new()
            .move_to(Point::new(0.0, 0.0))
            .quad_to(Point::new(5.0, -5.0), Point::new(10.0, 0.0));
        let flat = path.flatten();
        assert_eq!(flat[0].len(), CURVE_STEPS + 1);
        let end = flat[0].last().unwrap();
        assert!((end.x - 10.0).abs() < 1e-4 && end.y.abs() < 1e-4);
    }

    #[test]
    fn test_validate_rejects_bad_geometry() {
        let paint = Paint::new(Color::BLACK, 1.0, CompositeMode::SourceOver);
        let bad = DrawPrimitive::fill_circle(Point::new(f32::NAN, 0.0), 3.0, paint);
        assert!(bad.validate().is_err());

        let negative = DrawPrimitive::StrokePath { path: Path::new(), width: -1.0, paint };
        assert!(negative.validate().is_err());

        let ok = DrawPrimitive::fill_circle(Point::new(1.0, 1.0), 3.0, paint);
        assert!(ok.validate().is_ok());
    }
}
