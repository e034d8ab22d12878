use serde::Serialize;

use crate::render::primitive::DrawPrimitive;

/// Pipeline stages in emission order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    FaceOutline,
    Eyebrows,
    Eyes,
    Nose,
    Cheeks,
    Mouth,
    Forehead,
    EdgeFeathering,
    ColorAdaptation,
    Shadow,
    LandmarkOverlay,
}

impl Stage {
    pub const PIPELINE: [Stage; 11] = [
        Stage::FaceOutline,
        Stage::Eyebrows,
        Stage::Eyes,
        Stage::Nose,
        Stage::Cheeks,
        Stage::Mouth,
        Stage::Forehead,
        Stage::EdgeFeathering,
        Stage::ColorAdaptation,
        Stage::Shadow,
        Stage::LandmarkOverlay,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Stage::FaceOutline => "face_outline",
            Stage::Eyebrows => "eyebrows",
            Stage::Eyes => "eyes",
            Stage::Nose => "nose",
            Stage::Cheeks => "cheeks",
            Stage::Mouth => "mouth",
            Stage::Forehead => "forehead",
            Stage::EdgeFeathering => "edge_feathering",
            Stage::ColorAdaptation => "color_adaptation",
            Stage::Shadow => "shadow",
            Stage::LandmarkOverlay => "landmark_overlay",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutOp {
    pub stage: Stage,
    pub primitive: DrawPrimitive,
}

/// Ordered primitives for one frame, each tagged with the stage that produced it
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Layout {
    ops: Vec<LayoutOp>,
}

impl Layout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage's output
    pub fn extend_stage<I>(&mut self, stage: Stage, primitives: I)
    where
        I: IntoIterator<Item = DrawPrimitive>,
    {
        self.ops
            .extend(primitives.into_iter().map(|primitive| LayoutOp { stage, primitive }));
    }

    pub fn ops(&self) -> &[LayoutOp] {
        &self.ops
    }

    pub fn primitives(&self) -> impl Iterator<Item = &DrawPrimitive> {
        self.ops.iter().map(|op| &op.primitive)
    }

    /// Primitives emitted by one stage
    pub fn stage(&self, stage: Stage) -> Vec<&DrawPrimitive> {
        self.ops
            .iter()
            .filter(|op| op.stage == stage)
            .map(|op| &op.primitive)
            .collect()
    }

    /// Stages that emitted at least one primitive, in pipeline order
    pub fn stages(&self) -> Vec<Stage> {
        let mut stages: Vec<Stage> = Vec::new();
        for op in &self.ops {
            if stages.last() != Some(&op.stage) {
                stages.push(op.stage);
            }
        }
        stages
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn into_primitives(self) -> Vec<DrawPrimitive> {
        self.ops.into_iter().map(|op| op.primitive).collect()
    }
}
