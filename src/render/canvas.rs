use image::{imageops, DynamicImage, ImageBuffer, Rgba, RgbaImage};
use rayon::prelude::*;
use tracing::trace;

use crate::{
    error::{RenderError, Result},
    landmarks::{Point, Surface},
    render::{
        primitive::{CompositeMode, DrawPrimitive, Paint, RadialGradient},
        sink::RenderSink,
    },
};

/// Software raster target for draw primitives
///
/// A transparent RGBA overlay (straight alpha) that implements every composite mode the engine
/// emits. Rows are shaded in parallel. Like a browser canvas, `destination-in` acts on the whole
/// surface, so the overlay is meant to be composited onto a photo afterwards with
/// [`composite_over`](RasterCanvas::composite_over) rather than drawn on it directly.
#[derive(Clone, Debug)]
pub struct RasterCanvas {
    buffer: RgbaImage,
    anti_aliasing: bool,
    depth: usize,
}

impl RasterCanvas {
    /// Create a fully transparent canvas
    pub fn new(width: u32, height: u32) -> Self {
        Self::from_image(ImageBuffer::new(width, height))
    }

    /// Create a canvas filled with one color
    pub fn new_filled(width: u32, height: u32, color: [u8; 4]) -> Self {
        Self::from_image(ImageBuffer::from_fn(width, height, |_, _| Rgba(color)))
    }

    pub fn from_image(buffer: RgbaImage) -> Self {
        Self { buffer, anti_aliasing: true, depth: 0 }
    }

    pub fn with_anti_aliasing(mut self, enabled: bool) -> Self {
        self.anti_aliasing = enabled;
        self
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    /// Get a pixel at the given coordinates (returns RGBA array)
    pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.buffer.get_pixel(x, y).0
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.buffer
    }

    pub fn into_image(self) -> RgbaImage {
        self.buffer
    }

    /// Lay this overlay on top of `background`, scaled to the canvas size if needed
    pub fn composite_over(&self, background: &DynamicImage) -> RgbaImage {
        let mut base = background.to_rgba8();
        if base.dimensions() != self.buffer.dimensions() {
            base = imageops::resize(&base, self.width(), self.height(), imageops::FilterType::Triangle);
        }
        imageops::overlay(&mut base, &self.buffer, 0, 0);
        base
    }

    /// Save the canvas as a PNG file
    pub fn save_png<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        self.buffer.save(path)?;
        Ok(())
    }

    fn rasterize(&mut self, primitive: &DrawPrimitive) {
        let Some(shader) = Shader::new(primitive, self.anti_aliasing) else {
            return;
        };

        let (width, height) = self.buffer.dimensions();
        let (x0, y0, x1, y1) = if shader.composite == CompositeMode::DestinationIn {
            (0, 0, width as usize, height as usize)
        } else {
            match shader.bounds(width, height) {
                Some(bounds) => bounds,
                None => return,
            }
        };
        trace!("Rasterizing {} over rows {}..{}", primitive.kind(), y0, y1);

        let row_len = width as usize * 4;
        let shader = &shader;
        self.buffer
            .par_chunks_mut(row_len)
            .enumerate()
            .skip(y0)
            .take(y1 - y0)
            .for_each(|(y, row)| {
                let py = y as f32 + 0.5;
                for x in x0..x1 {
                    let sample = shader.sample(x as f32 + 0.5, py);
                    if sample.coverage <= 0.0 && shader.composite != CompositeMode::DestinationIn {
                        continue;
                    }
                    blend(&mut row[x * 4..x * 4 + 4], sample, shader.composite);
                }
            });
    }
}

impl RenderSink for RasterCanvas {
    fn name(&self) -> &str {
        "raster"
    }

    fn surface(&self) -> Surface {
        Surface::new(self.width(), self.height())
    }

    // Primitives carry their own paint, so the state stack only needs balancing.
    fn save(&mut self) {
        self.depth += 1;
    }

    fn restore(&mut self) -> Result<()> {
        if self.depth == 0 {
            return Err(RenderError::UnbalancedState.into());
        }
        self.depth -= 1;
        Ok(())
    }

    fn draw(&mut self, primitive: &DrawPrimitive) -> Result<()> {
        primitive.validate().map_err(|reason| RenderError::InvalidGeometry {
            primitive: primitive.kind().to_string(),
            reason,
        })?;
        self.rasterize(primitive);
        Ok(())
    }
}

enum Shape {
    Ellipse { center: Point, radius_x: f32, radius_y: f32 },
    Fill { edges: Vec<(Point, Point)> },
    Stroke { segments: Vec<(Point, Point)>, half_width: f32 },
}

enum Source<'a> {
    Solid { rgb: [f32; 3], alpha: f32 },
    Gradient { gradient: &'a RadialGradient, alpha: f32 },
}

#[derive(Debug, Clone, Copy)]
struct Sample {
    rgb: [f32; 3],
    alpha: f32,
    coverage: f32,
}

struct Shader<'a> {
    shape: Shape,
    source: Source<'a>,
    composite: CompositeMode,
    anti_aliasing: bool,
}

impl<'a> Shader<'a> {
    fn new(primitive: &'a DrawPrimitive, anti_aliasing: bool) -> Option<Self> {
        let solid = |paint: &Paint| Source::Solid {
            rgb: [
                paint.color.r as f32 / 255.0,
                paint.color.g as f32 / 255.0,
                paint.color.b as f32 / 255.0,
            ],
            alpha: paint.alpha,
        };

        let (shape, source) = match primitive {
            DrawPrimitive::FillEllipse { center, radius_x, radius_y, paint } => (
                Shape::Ellipse { center: *center, radius_x: *radius_x, radius_y: *radius_y },
                solid(paint),
            ),
            DrawPrimitive::FillPath { path, paint } => {
                let edges = path
                    .flatten()
                    .iter()
                    .filter(|subpath| subpath.len() > 1)
                    .flat_map(|subpath| {
                        let closing = (subpath[subpath.len() - 1], subpath[0]);
                        subpath.windows(2).map(|w| (w[0], w[1])).chain(std::iter::once(closing))
                    })
                    .collect();
                (Shape::Fill { edges }, solid(paint))
            }
            DrawPrimitive::StrokePath { path, width, paint } => {
                if *width <= 0.0 {
                    return None;
                }
                let segments = path
                    .flatten()
                    .iter()
                    .flat_map(|subpath| -> Vec<(Point, Point)> {
                        if subpath.len() == 1 {
                            vec![(subpath[0], subpath[0])]
                        } else {
                            subpath.windows(2).map(|w| (w[0], w[1])).collect()
                        }
                    })
                    .collect();
                (Shape::Stroke { segments, half_width: width / 2.0 }, solid(paint))
            }
            DrawPrimitive::RadialGradientFill { gradient, center, radius, alpha, .. } => (
                Shape::Ellipse { center: *center, radius_x: *radius, radius_y: *radius },
                Source::Gradient { gradient, alpha: *alpha },
            ),
        };

        Some(Self { shape, source, composite: primitive.composite(), anti_aliasing })
    }

    /// Pixel rectangle `(x0, y0, x1, y1)` touched by the shape, clipped to the surface
    fn bounds(&self, width: u32, height: u32) -> Option<(usize, usize, usize, usize)> {
        let (min, max) = match &self.shape {
            Shape::Ellipse { center, radius_x, radius_y } => (
                center.offset(-radius_x - 1.0, -radius_y - 1.0),
                center.offset(radius_x + 1.0, radius_y + 1.0),
            ),
            Shape::Fill { edges } => extent(edges.iter().map(|e| e.0), 1.0)?,
            Shape::Stroke { segments, half_width } => {
                extent(segments.iter().flat_map(|s| [s.0, s.1]), half_width + 1.0)?
            }
        };

        let x0 = min.x.floor().max(0.0) as usize;
        let y0 = min.y.floor().max(0.0) as usize;
        let x1 = (max.x.ceil().max(0.0) as usize).min(width as usize);
        let y1 = (max.y.ceil().max(0.0) as usize).min(height as usize);
        (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
    }

    fn sample(&self, px: f32, py: f32) -> Sample {
        let coverage = self.coverage(px, py);
        let (rgb, alpha) = match &self.source {
            Source::Solid { rgb, alpha } => (*rgb, *alpha),
            Source::Gradient { gradient, alpha } => {
                let distance = gradient.center.distance(&Point::new(px, py));
                let [r, g, b, a] = gradient.sample(distance);
                ([r, g, b], a * alpha)
            }
        };
        Sample { rgb, alpha, coverage }
    }

    fn coverage(&self, px: f32, py: f32) -> f32 {
        let edge = |signed_distance: f32| {
            if self.anti_aliasing {
                (0.5 - signed_distance).clamp(0.0, 1.0)
            } else if signed_distance <= 0.0 {
                1.0
            } else {
                0.0
            }
        };

        match &self.shape {
            Shape::Ellipse { center, radius_x, radius_y } => {
                if *radius_x <= 0.0 || *radius_y <= 0.0 {
                    return 0.0;
                }
                let nx = (px - center.x) / radius_x;
                let ny = (py - center.y) / radius_y;
                let normalized = (nx * nx + ny * ny).sqrt();
                edge((normalized - 1.0) * radius_x.min(*radius_y))
            }
            Shape::Fill { edges } => {
                if winding_number(edges, px, py) != 0 {
                    1.0
                } else {
                    0.0
                }
            }
            Shape::Stroke { segments, half_width } => {
                let p = Point::new(px, py);
                let distance = segments
                    .iter()
                    .map(|&(a, b)| segment_distance(p, a, b))
                    .fold(f32::INFINITY, f32::min);
                edge(distance - half_width)
            }
        }
    }
}

fn extent(points: impl Iterator<Item = Point>, pad: f32) -> Option<(Point, Point)> {
    let mut bounds: Option<(Point, Point)> = None;
    for p in points {
        bounds = Some(match bounds {
            None => (p, p),
            Some((min, max)) => (
                Point::new(min.x.min(p.x), min.y.min(p.y)),
                Point::new(max.x.max(p.x), max.y.max(p.y)),
            ),
        });
    }
    bounds.map(|(min, max)| (min.offset(-pad, -pad), max.offset(pad, pad)))
}

fn segment_distance(p: Point, a: Point, b: Point) -> f32 {
    let ab = b - a;
    let length_sq = ab.x * ab.x + ab.y * ab.y;
    if length_sq <= f32::EPSILON {
        return p.distance(&a);
    }
    let ap = p - a;
    let t = ((ap.x * ab.x + ap.y * ab.y) / length_sq).clamp(0.0, 1.0);
    p.distance(&(a + ab * t))
}

/// Non-zero winding number of the point against closed edges
fn winding_number(edges: &[(Point, Point)], px: f32, py: f32) -> i32 {
    let mut winding = 0;
    for &(a, b) in edges {
        let cross = (b.x - a.x) * (py - a.y) - (px - a.x) * (b.y - a.y);
        if a.y <= py {
            if b.y > py && cross > 0.0 {
                winding += 1;
            }
        } else if b.y <= py && cross < 0.0 {
            winding -= 1;
        }
    }
    winding
}

fn soft_light(backdrop: f32, source: f32) -> f32 {
    if source <= 0.5 {
        backdrop - (1.0 - 2.0 * source) * backdrop * (1.0 - backdrop)
    } else {
        let d = if backdrop <= 0.25 {
            ((16.0 * backdrop - 12.0) * backdrop + 4.0) * backdrop
        } else {
            backdrop.sqrt()
        };
        backdrop + (2.0 * source - 1.0) * (d - backdrop)
    }
}

/// Composite one straight-alpha RGBA pixel in place
fn blend(pixel: &mut [u8], sample: Sample, mode: CompositeMode) {
    let to_unit = |v: u8| v as f32 / 255.0;
    let to_byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;

    let backdrop = [to_unit(pixel[0]), to_unit(pixel[1]), to_unit(pixel[2])];
    let backdrop_alpha = to_unit(pixel[3]);
    let source_alpha = sample.alpha * sample.coverage;

    match mode {
        CompositeMode::DestinationIn => {
            pixel[3] = to_byte(backdrop_alpha * source_alpha);
        }
        CompositeMode::DestinationOut => {
            pixel[3] = to_byte(backdrop_alpha * (1.0 - source_alpha));
        }
        CompositeMode::SourceOver | CompositeMode::Multiply | CompositeMode::SoftLight => {
            let out_alpha = source_alpha + backdrop_alpha * (1.0 - source_alpha);
            if out_alpha <= 0.0 {
                pixel.copy_from_slice(&[0, 0, 0, 0]);
                return;
            }
            for channel in 0..3 {
                let (cb, cs) = (backdrop[channel], sample.rgb[channel]);
                let mixed = match mode {
                    CompositeMode::Multiply => cs * cb,
                    CompositeMode::SoftLight => soft_light(cb, cs),
                    _ => cs,
                };
                let source = (1.0 - backdrop_alpha) * cs + backdrop_alpha * mixed;
                let color = (source_alpha * source + backdrop_alpha * (1.0 - source_alpha) * cb) / out_alpha;
                pixel[channel] = to_byte(color);
            }
            pixel[3] = to_byte(out_alpha);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::primitive::{ColorStop, Path};
    use crate::styles::Color;

    const RED: Color = Color::rgb(255, 0, 0);

    fn paint(color: Color, composite: CompositeMode) -> Paint {
        Paint::new(color, 1.0, composite)
    }

    #[test]
    fn test_fill_circle_source_over() {
        let mut canvas = RasterCanvas::new(20, 20);
        canvas
            .draw(&DrawPrimitive::fill_circle(Point::new(10.0, 10.0), 5.0, paint(RED, CompositeMode::SourceOver)))
            .unwrap();

        assert_eq!(canvas.get_pixel(10, 10), [255, 0, 0, 255]);
        assert_eq!(canvas.get_pixel(0, 0), [0, 0, 0, 0]);
        assert_eq!(canvas.get_pixel(19, 10), [0, 0, 0, 0]);
    }

    #[test]
    fn test_destination_out_erases() {
        let mut canvas = RasterCanvas::new_filled(20, 20, [255, 255, 255, 255]);
        canvas
            .draw(&DrawPrimitive::fill_circle(Point::new(10.0, 10.0), 4.0, paint(RED, CompositeMode::DestinationOut)))
            .unwrap();

        assert_eq!(canvas.get_pixel(10, 10)[3], 0);
        assert_eq!(canvas.get_pixel(1, 1), [255, 255, 255, 255]);
    }

    #[test]
    fn test_destination_in_clears_outside() {
        let mut canvas = RasterCanvas::new_filled(20, 20, [0, 0, 255, 255]);
        canvas
            .draw(&DrawPrimitive::fill_circle(Point::new(10.0, 10.0), 5.0, paint(Color::WHITE, CompositeMode::DestinationIn)))
            .unwrap();

        assert_eq!(canvas.get_pixel(10, 10), [0, 0, 255, 255]);
        assert_eq!(canvas.get_pixel(0, 0)[3], 0);
    }

    #[test]
    fn test_multiply_darkens() {
        let mut canvas = RasterCanvas::new_filled(10, 10, [200, 200, 200, 255]);
        let half = Color::rgb(128, 128, 128);
        canvas
            .draw(&DrawPrimitive::fill_circle(Point::new(5.0, 5.0), 4.0, paint(half, CompositeMode::Multiply)))
            .unwrap();

        let [r, _, _, a] = canvas.get_pixel(5, 5);
        assert!(r < 200 && r > 90);
        assert_eq!(a, 255);
    }

    #[test]
    fn test_stroke_and_fill_path() {
        let mut canvas = RasterCanvas::new(30, 30).with_anti_aliasing(false);
        canvas
            .draw(&DrawPrimitive::StrokePath {
                path: Path::polyline(&[Point::new(2.0, 5.5), Point::new(28.0, 5.5)]),
                width: 3.0,
                paint: paint(RED, CompositeMode::SourceOver),
            })
            .unwrap();
        assert_eq!(canvas.get_pixel(15, 5)[3], 255);
        assert_eq!(canvas.get_pixel(15, 12)[3], 0);

        let triangle = Path::polygon(&[Point::new(5.0, 15.0), Point::new(25.0, 15.0), Point::new(15.0, 28.0)]);
        canvas
            .draw(&DrawPrimitive::FillPath { path: triangle, paint: paint(Color::BLACK, CompositeMode::SourceOver) })
            .unwrap();
        assert_eq!(canvas.get_pixel(15, 18), [0, 0, 0, 255]);
        assert_eq!(canvas.get_pixel(6, 26)[3], 0);
    }

    #[test]
    fn test_gradient_fades_out() {
        let mut canvas = RasterCanvas::new(40, 40);
        let center = Point::new(20.0, 20.0);
        canvas
            .draw(&DrawPrimitive::RadialGradientFill {
                gradient: RadialGradient {
                    center,
                    inner_radius: 0.0,
                    outer_radius: 15.0,
                    stops: vec![ColorStop::new(0.0, RED, 1.0), ColorStop::new(1.0, RED, 0.0)],
                },
                center,
                radius: 15.0,
                alpha: 1.0,
                composite: CompositeMode::SourceOver,
            })
            .unwrap();

        let inner = canvas.get_pixel(20, 20)[3];
        let outer = canvas.get_pixel(30, 20)[3];
        assert!(inner > 240);
        assert!(outer < inner && outer > 0);
        assert_eq!(canvas.get_pixel(37, 20)[3], 0);
    }

    #[test]
    fn test_invalid_geometry_is_rejected() {
        let mut canvas = RasterCanvas::new(10, 10);
        let bad = DrawPrimitive::fill_circle(Point::new(5.0, 5.0), -1.0, paint(RED, CompositeMode::SourceOver));
        assert!(canvas.draw(&bad).is_err());
        assert!(canvas.restore().is_err());
    }

    #[test]
    fn test_composite_over_background() {
        let mut canvas = RasterCanvas::new(8, 8);
        canvas
            .draw(&DrawPrimitive::fill_circle(Point::new(4.0, 4.0), 2.0, paint(RED, CompositeMode::SourceOver)))
            .unwrap();

        let background = DynamicImage::ImageRgba8(ImageBuffer::from_pixel(8, 8, Rgba([0, 255, 0, 255])));
        let merged = canvas.composite_over(&background);
        assert_eq!(merged.get_pixel(4, 4).0, [255, 0, 0, 255]);
        assert_eq!(merged.get_pixel(0, 0).0, [0, 255, 0, 255]);

        let large = DynamicImage::ImageRgba8(ImageBuffer::from_pixel(16, 12, Rgba([0, 255, 0, 255])));
        assert_eq!(canvas.composite_over(&large).dimensions(), (8, 8));
    }

    #[test]
    fn test_save_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("overlay.png");
        RasterCanvas::new(4, 4).save_png(&path).unwrap();
        assert!(path.exists());
    }
}
