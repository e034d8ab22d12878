//! Per-stage primitive generation.
//!
//! Each stage reads one section of the recipe and returns the primitives it paints, or nothing when
//! the section, its landmark group, or an anchor landmark is absent.

use std::f32::consts::PI;

use tracing::trace;

use crate::landmarks::{
    LandmarkFrame, Point, Surface, FACE_OVAL, FOREHEAD_CENTER, LEFT_CHEEK, LOWER_LIP, NOSE_TIP,
    OVERLAY_SAMPLE_STRIDE, RIGHT_CHEEK, UPPER_LIP,
};
use crate::render::cache::{GradientSlot, PaintCache};
use crate::render::options::RenderOptions;
use crate::render::primitive::{ColorStop, CompositeMode, DrawPrimitive, Paint, Path};
use crate::render::region::FaceRegion;
use crate::styles::{
    Color, EyeDecoration, FeatureGroup, ForeheadDecoration, MouthDecoration, NoseDecoration,
    PatchShape, Side, StyleRecipe,
};

const SIDES: [Side; 2] = [Side::Left, Side::Right];

// Eye decorations
const DRAMATIC_REACH: (f32, f32) = (30.0, -10.0);
const DRAMATIC_DOT_RADIUS: f32 = 3.0;
const PHOENIX_EYE_RADII: (f32, f32) = (25.0, 15.0);

// Mouth and forehead
const MOUTH_ARC_RADIUS: f32 = 25.0;
const MOUTH_DOT_RADIUS: f32 = 3.0;
const TIGER_STRIPE_SPACING: f32 = 8.0;
const TIGER_STRIPE_HALF_LENGTH: f32 = 20.0;
const TEARDROP_SPREAD: f32 = 15.0;
const MOON_CUT_OFFSET: f32 = 5.0;
const MOON_CUT_SCALE: f32 = 0.8;

// Post effects
const FEATHER_START: f32 = 0.8;
const LIGHT_OFFSET: f32 = -30.0;
const LIGHT_RADIUS: f32 = 60.0;
const LIGHT_ALPHA: f32 = 0.2;
const SHADOW_OFFSET: f32 = 20.0;
const SHADOW_RADIUS: f32 = 40.0;
const SHADOW_ALPHA: f32 = 0.3;

// Debug overlay
const OVERLAY_GREEN: Color = Color::rgb(0, 255, 0);
const OVERLAY_BLUE: Color = Color::rgb(0, 0, 255);
const OVERLAY_RED: Color = Color::rgb(255, 0, 0);
const OVERLAY_WIDTH: f32 = 2.0;
const OVERLAY_DOT_RADIUS: f32 = 2.0;

/// Inputs shared by every stage of one layout pass
pub(crate) struct FeaturePainter<'a> {
    pub style_key: &'a str,
    pub recipe: &'a StyleRecipe,
    pub frame: &'a LandmarkFrame,
    pub surface: Surface,
    pub options: &'a RenderOptions,
    pub region: FaceRegion,
    pub cache: &'a mut PaintCache,
}

impl FeaturePainter<'_> {
    fn paint(&self, color: Color) -> Paint {
        self.paint_alpha(color, 1.0)
    }

    fn paint_alpha(&self, color: Color, alpha: f32) -> Paint {
        Paint::new(color, alpha * self.options.opacity, self.options.blend_mode)
    }

    fn width(&self, thickness: f32) -> f32 {
        thickness * self.options.intensity
    }

    fn point(&self, index: usize) -> Option<Point> {
        self.frame.project(index, self.surface)
    }

    fn group(&self, feature: FeatureGroup) -> Option<Vec<Point>> {
        let indices = self.recipe.landmark_mapping.group(feature)?;
        self.frame.project_group(indices, self.surface)
    }

    /// Gradient filling its own circle
    fn gradient_fill(
        &mut self,
        slot: GradientSlot,
        center: Point,
        radius: f32,
        stops: &[ColorStop],
        composite: CompositeMode,
    ) -> DrawPrimitive {
        self.offset_gradient_fill(slot, center, 0.0, radius, center, radius, stops, composite)
    }

    /// Gradient whose circle differs from the filled region, as the post effects need
    #[allow(clippy::too_many_arguments)]
    fn offset_gradient_fill(
        &mut self,
        slot: GradientSlot,
        center: Point,
        inner_radius: f32,
        outer_radius: f32,
        fill_center: Point,
        fill_radius: f32,
        stops: &[ColorStop],
        composite: CompositeMode,
    ) -> DrawPrimitive {
        let gradient = self.cache.gradient(self.style_key, slot, center, inner_radius, outer_radius, stops);
        DrawPrimitive::RadialGradientFill {
            gradient,
            center: fill_center,
            radius: fill_radius,
            alpha: self.options.opacity,
            composite,
        }
    }

    pub fn face_outline(&mut self) -> Vec<DrawPrimitive> {
        let Some(outline) = &self.recipe.pattern.face_outline else {
            return Vec::new();
        };
        let color = outline.color.unwrap_or(self.recipe.colors.primary);
        let alpha = outline.opacity;
        let (center, radius) = (self.region.center, self.region.radius);

        vec![self.gradient_fill(
            GradientSlot::FaceOutline,
            center,
            radius,
            &[
                ColorStop::new(0.0, color, alpha),
                ColorStop::new(0.7, color, alpha * 0.7),
                ColorStop::new(1.0, color, 0.0),
            ],
            self.options.blend_mode,
        )]
    }

    pub fn eyebrows(&mut self) -> Vec<DrawPrimitive> {
        let Some(brows) = &self.recipe.pattern.eyebrows else {
            return Vec::new();
        };

        let mut primitives = Vec::new();
        for side in SIDES {
            let Some(points) = self.group(FeatureGroup::eyebrow(side)) else {
                trace!("No {:?} eyebrow group, skipping side", side);
                continue;
            };
            if points.len() < 2 {
                continue;
            }

            let mut path = Path::new().move_to(points[0]);
            for pair in points.windows(2) {
                let (from, to) = (pair[0], pair[1]);
                path = if brows.style.is_curved() {
                    let control = Point::new(
                        (from.x + to.x) / 2.0 + brows.style.lateral_offset(side),
                        from.y.min(to.y) - brows.thickness * brows.style.arch_factor(),
                    );
                    path.quad_to(control, to)
                } else {
                    path.line_to(to)
                };
            }

            primitives.push(DrawPrimitive::StrokePath {
                path,
                width: self.width(brows.thickness),
                paint: self.paint(brows.color),
            });
        }
        primitives
    }

    pub fn eyes(&mut self) -> Vec<DrawPrimitive> {
        let Some(decoration) = self.recipe.pattern.eye_decoration.clone() else {
            return Vec::new();
        };

        let mut primitives = Vec::new();
        for side in SIDES {
            let Some(points) = self.group(FeatureGroup::eye(side)) else {
                continue;
            };
            let Some(center) = Point::centroid(&points) else {
                continue;
            };

            match decoration {
                EyeDecoration::Liner { color, thickness } => {
                    let split = points.len().div_ceil(2);
                    let (upper, lower) = points.split_at(split);
                    for half in [upper, lower] {
                        if half.is_empty() {
                            continue;
                        }
                        primitives.push(DrawPrimitive::StrokePath {
                            path: Path::polyline(half),
                            width: self.width(thickness),
                            paint: self.paint(color),
                        });
                    }
                }
                EyeDecoration::Shadow { color, radius } => {
                    primitives.push(self.gradient_fill(
                        GradientSlot::EyeShadow(side),
                        center,
                        radius,
                        &[ColorStop::new(0.0, color, 0.5), ColorStop::new(1.0, color, 0.0)],
                        self.options.blend_mode,
                    ));
                }
                EyeDecoration::Dramatic { color, thickness } => {
                    let tip = center.offset(DRAMATIC_REACH.0 * side.sign(), DRAMATIC_REACH.1);
                    primitives.push(DrawPrimitive::StrokePath {
                        path: Path::polyline(&[center, tip]),
                        width: self.width(thickness),
                        paint: self.paint(color),
                    });
                    primitives.push(DrawPrimitive::fill_circle(tip, DRAMATIC_DOT_RADIUS, self.paint(color)));
                }
                EyeDecoration::PhoenixEye { color, thickness } => {
                    let (rx, ry) = PHOENIX_EYE_RADII;
                    primitives.push(DrawPrimitive::StrokePath {
                        path: Path::new().ellipse(center, rx, ry),
                        width: self.width(thickness),
                        paint: self.paint(color),
                    });
                    let tail = Path::new()
                        .move_to(center.offset(25.0, 0.0))
                        .quad_to(center.offset(40.0, -10.0), center.offset(35.0, -20.0));
                    primitives.push(DrawPrimitive::StrokePath {
                        path: tail,
                        width: self.width(thickness),
                        paint: self.paint(color),
                    });
                }
            }
        }
        primitives
    }

    pub fn nose(&mut self) -> Vec<DrawPrimitive> {
        let Some(NoseDecoration::WhitePatch { color, size, shape }) = self.recipe.pattern.nose else {
            return Vec::new();
        };
        if !self.recipe.landmark_mapping.has(FeatureGroup::Nose) {
            return Vec::new();
        }
        let Some(tip) = self.point(NOSE_TIP) else {
            return Vec::new();
        };

        let radius_y = match shape {
            PatchShape::Oval => size * 1.5,
            PatchShape::Round => size,
        };
        vec![DrawPrimitive::FillEllipse {
            center: tip,
            radius_x: size,
            radius_y,
            paint: self.paint(color),
        }]
    }

    pub fn cheeks(&mut self) -> Vec<DrawPrimitive> {
        let Some(blush) = self.recipe.pattern.blush.clone() else {
            return Vec::new();
        };

        let mut primitives = Vec::new();
        for (side, index) in [(Side::Left, LEFT_CHEEK), (Side::Right, RIGHT_CHEEK)] {
            let Some(anchor) = self.point(index) else {
                continue;
            };
            primitives.push(self.gradient_fill(
                GradientSlot::Blush(side),
                anchor,
                blush.size,
                &[
                    ColorStop::new(0.0, blush.color, blush.opacity),
                    ColorStop::new(1.0, blush.color, 0.0),
                ],
                self.options.blend_mode,
            ));
        }
        primitives
    }

    pub fn mouth(&mut self) -> Vec<DrawPrimitive> {
        let Some(MouthDecoration::Exaggerated { color, thickness }) = self.recipe.pattern.mouth else {
            return Vec::new();
        };
        if !self.recipe.landmark_mapping.has(FeatureGroup::Mouth) {
            return Vec::new();
        }
        let (Some(upper), Some(lower)) = (self.point(UPPER_LIP), self.point(LOWER_LIP)) else {
            return Vec::new();
        };

        let center = upper.midpoint(lower);
        vec![
            DrawPrimitive::StrokePath {
                path: Path::new().arc(center, MOUTH_ARC_RADIUS, 0.0, PI),
                width: self.width(thickness),
                paint: self.paint(color),
            },
            DrawPrimitive::fill_circle(center.offset(-MOUTH_ARC_RADIUS, 0.0), MOUTH_DOT_RADIUS, self.paint(color)),
            DrawPrimitive::fill_circle(center.offset(MOUTH_ARC_RADIUS, 0.0), MOUTH_DOT_RADIUS, self.paint(color)),
        ]
    }

    pub fn forehead(&mut self) -> Vec<DrawPrimitive> {
        let Some(decoration) = self.recipe.pattern.forehead.clone() else {
            return Vec::new();
        };
        if !self.recipe.landmark_mapping.has(FeatureGroup::Forehead) {
            return Vec::new();
        }
        let Some(center) = self.point(FOREHEAD_CENTER) else {
            return Vec::new();
        };

        match decoration {
            ForeheadDecoration::Tiger { color, thickness } => (-2..=2)
                .map(|i| {
                    let x = center.x + TIGER_STRIPE_SPACING * i as f32;
                    DrawPrimitive::StrokePath {
                        path: Path::polyline(&[
                            Point::new(x, center.y - TIGER_STRIPE_HALF_LENGTH),
                            Point::new(x, center.y + TIGER_STRIPE_HALF_LENGTH),
                        ]),
                        width: self.width(thickness),
                        paint: self.paint(color),
                    }
                })
                .collect(),
            ForeheadDecoration::Phoenix { color, size } => {
                let top = center.offset(0.0, -size);
                let path = Path::new()
                    .move_to(top)
                    .quad_to(center.offset(-TEARDROP_SPREAD, 0.0), center.offset(0.0, TEARDROP_SPREAD))
                    .quad_to(center.offset(TEARDROP_SPREAD, 0.0), top)
                    .close();
                vec![DrawPrimitive::FillPath { path, paint: self.paint(color) }]
            }
            ForeheadDecoration::Moon { color, size } => {
                let cut = Paint::new(color, self.options.opacity, CompositeMode::DestinationOut);
                vec![
                    DrawPrimitive::fill_circle(center, size, self.paint(color)),
                    DrawPrimitive::fill_circle(center.offset(MOON_CUT_OFFSET, 0.0), size * MOON_CUT_SCALE, cut),
                ]
            }
        }
    }

    pub fn edge_feathering(&mut self) -> Vec<DrawPrimitive> {
        if !self.options.edge_smoothing {
            return Vec::new();
        }
        let (center, radius) = (self.region.center, self.region.radius);
        vec![self.offset_gradient_fill(
            GradientSlot::EdgeFeather,
            center,
            radius * FEATHER_START,
            radius,
            center,
            radius,
            &[
                ColorStop::new(0.0, Color::WHITE, 1.0),
                ColorStop::new(FEATHER_START, Color::WHITE, 1.0),
                ColorStop::new(1.0, Color::BLACK, 1.0),
            ],
            CompositeMode::DestinationIn,
        )]
    }

    pub fn color_adaptation(&mut self) -> Vec<DrawPrimitive> {
        if !self.options.color_adaptation {
            return Vec::new();
        }
        let light = self.region.center.offset(LIGHT_OFFSET, LIGHT_OFFSET);
        vec![self.offset_gradient_fill(
            GradientSlot::Light,
            light,
            0.0,
            LIGHT_RADIUS,
            self.region.center,
            self.region.radius,
            &[
                ColorStop::new(0.0, Color::WHITE, LIGHT_ALPHA),
                ColorStop::new(1.0, Color::WHITE, 0.0),
            ],
            CompositeMode::SoftLight,
        )]
    }

    pub fn shadow(&mut self) -> Vec<DrawPrimitive> {
        if !self.options.shadow_quality.is_enabled() {
            return Vec::new();
        }
        let dark = self.region.center.offset(SHADOW_OFFSET, SHADOW_OFFSET);
        vec![self.offset_gradient_fill(
            GradientSlot::Shadow,
            dark,
            0.0,
            SHADOW_RADIUS,
            self.region.center,
            self.region.radius,
            &[
                ColorStop::new(0.0, Color::BLACK, SHADOW_ALPHA),
                ColorStop::new(1.0, Color::BLACK, 0.0),
            ],
            CompositeMode::Multiply,
        )]
    }

    /// Debug mesh drawn over everything else at full strength
    pub fn landmark_overlay(&mut self) -> Vec<DrawPrimitive> {
        if !self.options.show_landmarks {
            return Vec::new();
        }
        let solid = |color| Paint::new(color, 1.0, CompositeMode::SourceOver);
        let outline = |points: &[Point], color| DrawPrimitive::StrokePath {
            path: Path::polygon(points),
            width: OVERLAY_WIDTH,
            paint: solid(color),
        };

        let mut primitives = Vec::new();
        if let Some(oval) = self.frame.project_group(&FACE_OVAL, self.surface) {
            primitives.push(outline(&oval, OVERLAY_GREEN));
        }
        primitives.extend(
            self.frame
                .points()
                .iter()
                .step_by(OVERLAY_SAMPLE_STRIDE)
                .map(|&landmark| {
                    DrawPrimitive::fill_circle(self.surface.project(landmark), OVERLAY_DOT_RADIUS, solid(OVERLAY_GREEN))
                }),
        );
        for side in SIDES {
            if let Some(eye) = self.group(FeatureGroup::eye(side)) {
                primitives.push(outline(&eye, OVERLAY_BLUE));
            }
        }
        if let Some(mouth) = self.group(FeatureGroup::Mouth) {
            primitives.push(outline(&mouth, OVERLAY_RED));
        }
        primitives
    }
}
