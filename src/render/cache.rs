use std::collections::HashMap;

use tracing::trace;

use crate::landmarks::Point;
use crate::render::primitive::{ColorStop, RadialGradient};
use crate::styles::{Color, Side};

/// Which gradient of a layout a cache entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GradientSlot {
    FaceOutline,
    EyeShadow(Side),
    Blush(Side),
    EdgeFeather,
    Light,
    Shadow,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct GradientKey {
    style: String,
    slot: GradientSlot,
    geometry: [u32; 4],
    stops: Vec<StopKey>,
}

/// Exact bits of one color stop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct StopKey {
    offset: u32,
    color: Color,
    alpha: u32,
}

impl GradientKey {
    fn new(style: &str, slot: GradientSlot, center: Point, inner: f32, outer: f32, stops: &[ColorStop]) -> Self {
        Self {
            style: style.to_string(),
            slot,
            geometry: [
                center.x.to_bits(),
                center.y.to_bits(),
                inner.to_bits(),
                outer.to_bits(),
            ],
            stops: stops
                .iter()
                .map(|stop| StopKey {
                    offset: stop.offset.to_bits(),
                    color: stop.color,
                    alpha: stop.alpha.to_bits(),
                })
                .collect(),
        }
    }
}

/// Snapshot of cache usage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub entries: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
}

/// Bounded memo of built gradients, keyed by style, exact geometry and exact color stops
///
/// A hit returns a gradient equal to what a rebuild would produce, whatever recipe the stops came
/// from. When full, the cache is emptied before the next insert.
#[derive(Debug)]
pub struct PaintCache {
    gradients: HashMap<GradientKey, RadialGradient>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl PaintCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            gradients: HashMap::new(),
            capacity: capacity.max(1),
            hits: 0,
            misses: 0,
        }
    }

    /// Cached gradient for these inputs, built on a miss
    pub fn gradient(
        &mut self,
        style: &str,
        slot: GradientSlot,
        center: Point,
        inner_radius: f32,
        outer_radius: f32,
        stops: &[ColorStop],
    ) -> RadialGradient {
        let key = GradientKey::new(style, slot, center, inner_radius, outer_radius, stops);
        if let Some(gradient) = self.gradients.get(&key) {
            self.hits += 1;
            return gradient.clone();
        }

        self.misses += 1;
        if self.gradients.len() >= self.capacity {
            trace!("Paint cache full ({} entries), clearing", self.gradients.len());
            self.gradients.clear();
        }

        let gradient = RadialGradient { center, inner_radius, outer_radius, stops: stops.to_vec() };
        self.gradients.insert(key, gradient.clone());
        gradient
    }

    pub fn clear(&mut self) {
        self.gradients.clear();
        self.hits = 0;
        self.misses = 0;
    }

    /// Change the bound; shrinking below the current size empties the cache
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        if self.gradients.len() > self.capacity {
            self.gradients.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.gradients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gradients.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.gradients.len(),
            capacity: self.capacity,
            hits: self.hits,
            misses: self.misses,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE_FADE: [ColorStop; 1] = [ColorStop { offset: 0.0, color: Color::WHITE, alpha: 1.0 }];

    #[test]
    fn test_hit_and_miss_counting() {
        let mut cache = PaintCache::new(8);
        let center = Point::new(5.0, 5.0);

        let first = cache.gradient("chou", GradientSlot::FaceOutline, center, 0.0, 10.0, &WHITE_FADE);
        let second = cache.gradient("chou", GradientSlot::FaceOutline, center, 0.0, 10.0, &WHITE_FADE);
        assert_eq!(first, second);
        assert_eq!(first.stops, WHITE_FADE.to_vec());

        let stats = cache.stats();
        assert_eq!((stats.entries, stats.hits, stats.misses), (1, 1, 1));
    }

    #[test]
    fn test_keys_separate_styles_and_sides() {
        let mut cache = PaintCache::new(8);
        let center = Point::new(1.0, 1.0);
        cache.gradient("dan", GradientSlot::Blush(Side::Left), center, 0.0, 10.0, &WHITE_FADE);
        cache.gradient("dan", GradientSlot::Blush(Side::Right), center, 0.0, 10.0, &WHITE_FADE);
        cache.gradient("sheng", GradientSlot::Blush(Side::Left), center, 0.0, 10.0, &WHITE_FADE);
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_different_stops_never_share_an_entry() {
        let mut cache = PaintCache::new(8);
        let center = Point::new(320.0, 240.0);
        let blue = [ColorStop::new(0.0, Color::rgb(65, 105, 225), 0.7)];
        let red = [ColorStop::new(0.0, Color::rgb(255, 0, 0), 0.9)];

        cache.gradient("face", GradientSlot::FaceOutline, center, 0.0, 90.0, &blue);
        let second = cache.gradient("face", GradientSlot::FaceOutline, center, 0.0, 90.0, &red);

        assert_eq!(second.stops, red.to_vec());
        assert_eq!(cache.stats().hits, 0);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_capacity_bound_and_clear() {
        let mut cache = PaintCache::new(2);
        for i in 0..5 {
            let center = Point::new(i as f32, 0.0);
            cache.gradient("jing", GradientSlot::Shadow, center, 0.0, 40.0, &WHITE_FADE);
            assert!(cache.len() <= 2);
        }

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.stats().misses, 0);
    }
}
