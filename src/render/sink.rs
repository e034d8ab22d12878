use crate::{
    error::{RenderError, Result},
    landmarks::Surface,
    render::primitive::DrawPrimitive,
};

/// A drawing surface that executes primitives in emission order
///
/// Implementations stand in for a 2D vector canvas. The engine brackets every frame with exactly
/// one [`save`](RenderSink::save) / [`restore`](RenderSink::restore) pair, including frames that
/// fail part way through.
pub trait RenderSink {
    /// Returns a short name for log messages
    fn name(&self) -> &str {
        "sink"
    }

    /// Pixel dimensions that normalized landmarks are scaled to
    fn surface(&self) -> Surface;

    /// Push the drawing state
    fn save(&mut self);

    /// Pop the drawing state pushed by the matching [`save`](RenderSink::save)
    fn restore(&mut self) -> Result<()>;

    /// Execute one primitive
    ///
    /// # Returns
    ///
    /// Returns `Ok(())` once the primitive is painted, or an error if the sink rejects it. The
    /// engine stops emitting for the current frame on the first error.
    fn draw(&mut self, primitive: &DrawPrimitive) -> Result<()>;
}

/// Something a [`RecordingSink`] observed
#[derive(Debug, Clone, PartialEq)]
pub enum SinkEvent {
    Save,
    Restore,
    Draw(DrawPrimitive),
}

/// Sink that keeps every call for inspection instead of painting
#[derive(Debug, Clone)]
pub struct RecordingSink {
    surface: Surface,
    events: Vec<SinkEvent>,
    depth: usize,
    fail_at: Option<usize>,
    draws: usize,
}

impl RecordingSink {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            surface: Surface::new(width, height),
            events: Vec::new(),
            depth: 0,
            fail_at: None,
            draws: 0,
        }
    }

    /// Reject the draw call with this zero-based index (counted across frames)
    pub fn failing_at(mut self, draw_index: usize) -> Self {
        self.fail_at = Some(draw_index);
        self
    }

    pub fn events(&self) -> &[SinkEvent] {
        &self.events
    }

    /// Primitives that were accepted, in order
    pub fn primitives(&self) -> Vec<&DrawPrimitive> {
        self.events
            .iter()
            .filter_map(|event| match event {
                SinkEvent::Draw(primitive) => Some(primitive),
                _ => None,
            })
            .collect()
    }

    /// Current save depth; zero between frames
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl RenderSink for RecordingSink {
    fn name(&self) -> &str {
        "recording"
    }

    fn surface(&self) -> Surface {
        self.surface
    }

    fn save(&mut self) {
        self.depth += 1;
        self.events.push(SinkEvent::Save);
    }

    fn restore(&mut self) -> Result<()> {
        if self.depth == 0 {
            return Err(RenderError::UnbalancedState.into());
        }
        self.depth -= 1;
        self.events.push(SinkEvent::Restore);
        Ok(())
    }

    fn draw(&mut self, primitive: &DrawPrimitive) -> Result<()> {
        let index = self.draws;
        self.draws += 1;
        if self.fail_at == Some(index) {
            return Err(RenderError::SinkFailed {
                reason: format!("injected failure at draw {}", index),
            }
            .into());
        }
        self.events.push(SinkEvent::Draw(primitive.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::Point;
    use crate::render::primitive::{CompositeMode, Paint};
    use crate::styles::Color;

    fn dot() -> DrawPrimitive {
        DrawPrimitive::fill_circle(
            Point::new(1.0, 1.0),
            1.0,
            Paint::new(Color::BLACK, 1.0, CompositeMode::SourceOver),
        )
    }

    #[test]
    fn test_recording_sink_tracks_depth() {
        let mut sink = RecordingSink::new(10, 10);
        sink.save();
        sink.draw(&dot()).unwrap();
        assert_eq!(sink.depth(), 1);
        sink.restore().unwrap();
        assert_eq!(sink.depth(), 0);
        assert!(sink.restore().is_err());
        assert_eq!(sink.primitives().len(), 1);
    }

    #[test]
    fn test_injected_failure() {
        let mut sink = RecordingSink::new(10, 10).failing_at(1);
        assert!(sink.draw(&dot()).is_ok());
        assert!(sink.draw(&dot()).is_err());
        assert!(sink.draw(&dot()).is_ok());
        assert_eq!(sink.primitives().len(), 2);
    }
}
