use std::sync::Arc;

use tracing::{debug, info, trace, warn};

use crate::{
    config::EngineConfig,
    landmarks::{LandmarkFrame, Surface},
    render::{
        cache::{CacheStats, PaintCache},
        features::FeaturePainter,
        layout::{Layout, Stage},
        options::RenderOptions,
        region::FaceRegion,
        sink::RenderSink,
    },
    styles::{StyleCatalog, StyleRecipe},
};

/// Why a frame produced no drawing at all
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    EmptyFrame,
    UnknownStyle,
    MissingAnchors,
}

/// What happened to one frame
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOutcome {
    /// Nothing was sent to the sink, not even a save/restore pair
    Skipped(SkipReason),
    /// Every primitive of the layout was drawn
    Completed { primitives: usize },
    /// The sink failed part way; drawing state was still restored
    Aborted { emitted: usize, error: String },
}

impl RenderOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, RenderOutcome::Completed { .. })
    }

    /// Primitives the sink accepted for this frame
    pub fn emitted(&self) -> usize {
        match self {
            RenderOutcome::Skipped(_) => 0,
            RenderOutcome::Completed { primitives } => *primitives,
            RenderOutcome::Aborted { emitted, .. } => *emitted,
        }
    }
}

/// Decoration layout engine
///
/// Turns one landmark frame plus a style key into an ordered list of draw primitives and plays them
/// into a [`RenderSink`]. The pipeline runs in a fixed order:
/// 1. Face region - bounding geometry from four anchor landmarks
/// 2. Features - outline, eyebrows, eyes, nose, cheeks, mouth, forehead
/// 3. Post effects - edge feathering, color adaptation, shadow
/// 4. Debug overlay - the landmark mesh, when requested
///
/// Each feature stage is skipped when the recipe has no section for it. The engine owns a small
/// gradient cache; it never changes what a frame looks like and can be dropped with
/// [`clear_cache`](LayoutEngine::clear_cache) at any time.
pub struct LayoutEngine {
    catalog: Arc<StyleCatalog>,
    config: EngineConfig,
    cache: PaintCache,
}

impl LayoutEngine {
    pub fn new(catalog: Arc<StyleCatalog>, config: EngineConfig) -> Self {
        info!(
            "🎭 Layout engine ready: {} styles, cache capacity {}",
            catalog.len(),
            config.cache_capacity
        );
        let cache = PaintCache::new(config.cache_capacity);
        Self { catalog, config, cache }
    }

    /// Engine over the built-in catalog with default settings
    pub fn with_builtin_catalog() -> Self {
        Self::new(Arc::new(StyleCatalog::new()), EngineConfig::default())
    }

    pub fn catalog(&self) -> &StyleCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Swap engine settings; a capacity change drops cached paint
    pub fn update_config(&mut self, config: EngineConfig) {
        if config.cache_capacity != self.config.cache_capacity {
            debug!(
                "Cache capacity {} -> {}, clearing paint cache",
                self.config.cache_capacity, config.cache_capacity
            );
            self.cache.set_capacity(config.cache_capacity);
            self.cache.clear();
        }
        self.config = config;
    }

    pub fn clear_cache(&mut self) {
        debug!("Clearing paint cache ({} entries)", self.cache.len());
        self.cache.clear();
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Face bounding geometry for a frame, `None` when an anchor landmark is missing
    pub fn face_region(frame: &LandmarkFrame, surface: Surface) -> Option<FaceRegion> {
        FaceRegion::compute(frame, surface)
    }

    /// Lay out one frame with an explicit recipe
    ///
    /// `style_key` only scopes cached paint; any stable name for the recipe works. Returns an empty
    /// layout when the frame is empty or lacks the face anchors.
    pub fn layout(
        &mut self,
        style_key: &str,
        recipe: &StyleRecipe,
        frame: &LandmarkFrame,
        surface: Surface,
        options: &RenderOptions,
    ) -> Layout {
        self.build_layout(style_key, recipe, frame, surface, options)
            .unwrap_or_default()
    }

    /// Lay out one frame for a category or character key from the catalog
    pub fn layout_style(
        &mut self,
        style_key: &str,
        frame: &LandmarkFrame,
        surface: Surface,
        options: &RenderOptions,
    ) -> Option<Layout> {
        let catalog = Arc::clone(&self.catalog);
        let recipe = catalog.resolve(style_key)?;
        Some(self.layout(style_key, &recipe, frame, surface, options))
    }

    /// Paint one frame into `sink`
    ///
    /// An empty frame, an unknown style key or missing anchors draw nothing. Otherwise the whole
    /// layout is bracketed by exactly one save/restore pair; a sink error stops the frame, is logged,
    /// and the state is restored before returning.
    pub fn render<S>(
        &mut self,
        frame: &LandmarkFrame,
        style_key: &str,
        options: &RenderOptions,
        sink: &mut S,
    ) -> RenderOutcome
    where
        S: RenderSink + ?Sized,
    {
        if frame.is_empty() {
            trace!("Empty landmark frame, nothing to render");
            return RenderOutcome::Skipped(SkipReason::EmptyFrame);
        }

        let catalog = Arc::clone(&self.catalog);
        let Some(recipe) = catalog.resolve(style_key) else {
            debug!("Style '{}' not in catalog, nothing to render", style_key);
            return RenderOutcome::Skipped(SkipReason::UnknownStyle);
        };

        let layout = match self.build_layout(style_key, &recipe, frame, sink.surface(), options) {
            Ok(layout) => layout,
            Err(reason) => return RenderOutcome::Skipped(reason),
        };

        sink.save();
        let mut emitted = 0;
        let mut failure = None;
        for primitive in layout.primitives() {
            if let Err(e) = sink.draw(primitive) {
                failure = Some(e);
                break;
            }
            emitted += 1;
        }
        let restored = sink.restore();

        match (failure, restored) {
            (None, Ok(())) => {
                trace!("Frame complete: {} primitives to {}", emitted, sink.name());
                RenderOutcome::Completed { primitives: emitted }
            }
            (Some(e), _) | (None, Err(e)) => {
                warn!(
                    "Render aborted after {} of {} primitives on {}: {}",
                    emitted,
                    layout.len(),
                    sink.name(),
                    e
                );
                RenderOutcome::Aborted { emitted, error: e.to_string() }
            }
        }
    }

    fn build_layout(
        &mut self,
        style_key: &str,
        recipe: &StyleRecipe,
        frame: &LandmarkFrame,
        surface: Surface,
        options: &RenderOptions,
    ) -> std::result::Result<Layout, SkipReason> {
        if frame.is_empty() {
            return Err(SkipReason::EmptyFrame);
        }

        // ===== PIPELINE STEP 1: FACE REGION =====
        let Some(region) = FaceRegion::compute(frame, surface) else {
            debug!("Frame of {} points lacks face anchors, skipping", frame.len());
            return Err(SkipReason::MissingAnchors);
        };
        trace!(
            "Face region center ({:.1}, {:.1}) radius {:.1}",
            region.center.x,
            region.center.y,
            region.radius
        );

        let mut painter = FeaturePainter {
            style_key,
            recipe,
            frame,
            surface,
            options,
            region,
            cache: &mut self.cache,
        };

        let mut layout = Layout::new();
        for stage in Stage::PIPELINE {
            let primitives = match stage {
                // ===== PIPELINE STEP 2: FEATURES =====
                Stage::FaceOutline => painter.face_outline(),
                Stage::Eyebrows => painter.eyebrows(),
                Stage::Eyes => painter.eyes(),
                Stage::Nose => painter.nose(),
                Stage::Cheeks => painter.cheeks(),
                Stage::Mouth => painter.mouth(),
                Stage::Forehead => painter.forehead(),

                // ===== PIPELINE STEP 3: POST EFFECTS =====
                Stage::EdgeFeathering => painter.edge_feathering(),
                Stage::ColorAdaptation => painter.color_adaptation(),
                Stage::Shadow => painter.shadow(),

                // ===== PIPELINE STEP 4: DEBUG OVERLAY =====
                Stage::LandmarkOverlay => painter.landmark_overlay(),
            };
            if !primitives.is_empty() {
                trace!("{}: {} primitives", stage.name(), primitives.len());
            }
            layout.extend_stage(stage, primitives);
        }

        debug!(
            "Laid out '{}': {} primitives across {} stages",
            style_key,
            layout.len(),
            layout.stages().len()
        );
        Ok(layout)
    }
}
