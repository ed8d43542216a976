//! Scroll smoothing
//!
//! The page reports a raw scroll offset; the carousel animates from a smoothed
//! copy that eases toward it every frame. The gap between the two is the scroll
//! velocity that drives panel deformation.

use crate::constants::scroll::{EASE, WRAP_POSITION};

/// Linear interpolation between `start` and `end`
#[inline]
pub fn lerp(start: f32, end: f32, t: f32) -> f32 {
    start * (1.0 - t) + end * t
}

/// Raw and smoothed scroll offsets
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollState {
    /// Last raw offset read from the page
    pub target: f32,
    /// Eased offset used for animation
    pub current: f32,
}

impl ScrollState {
    /// Scroll velocity proxy: how far `current` still lags behind
    pub fn lag(&self) -> f32 {
        self.target - self.current
    }
}

/// One-pole low-pass filter over the raw scroll offset
#[derive(Debug, Clone)]
pub struct ScrollTracker {
    state: ScrollState,
    ease: f32,
}

impl Default for ScrollTracker {
    fn default() -> Self {
        Self::new(EASE)
    }
}

impl ScrollTracker {
    pub fn new(ease: f32) -> Self {
        Self {
            state: ScrollState::default(),
            ease,
        }
    }

    /// Feed the latest raw offset and advance the smoothed value one frame
    pub fn tick(&mut self, raw_offset: f32) -> f32 {
        self.state.target = raw_offset;
        self.state.current = lerp(self.state.current, self.state.target, self.ease);
        self.state.current
    }

    pub fn state(&self) -> ScrollState {
        self.state
    }
}

/// Where the page should jump to once the end of the scrollable range is hit
pub fn wrap_scroll(scroll_y: f32, total_scrollable: f32) -> Option<f32> {
    (scroll_y >= total_scrollable).then_some(WRAP_POSITION)
}

/// Fraction of the scrollable distance covered by `current`
pub fn scroll_progress(current: f32, page_height: f32, viewport_height: f32) -> f32 {
    let scrollable = page_height - viewport_height;
    if scrollable > 0.0 {
        current / scrollable
    } else {
        0.0
    }
}

/// Viewport size in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn aspect_ratio(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }
}

/// The scrollable page the carousel lives in
///
/// Implemented by the DOM on the web and by a wheel-driven virtual page natively.
pub trait PageEnvironment {
    /// Current raw scroll offset
    fn scroll_y(&self) -> f32;

    /// Jump the scroll position (used for the infinite-scroll wrap)
    fn scroll_to(&mut self, y: f32);

    /// Content height of the page. Scroll progress and the wrap are measured
    /// against this, not against the stretched scrollable layer.
    fn page_height(&self) -> f32;

    fn viewport(&self) -> Viewport;

    /// Move the content layer to follow the smoothed offset
    fn translate_content(&mut self, _offset_y: f32) {}

    /// Stretch the scrollable layer so the document keeps scrolling past the
    /// content, e.g. again after a resize. Leaves `page_height` alone.
    fn set_scrollable_height(&mut self, _height: f32) {}

    /// Raw scrollable distance before the wrap kicks in
    fn total_scrollable(&self) -> f32 {
        self.page_height() - self.viewport().height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(0.0, 10.0, 0.0), 0.0);
        assert_eq!(lerp(0.0, 10.0, 1.0), 10.0);
        assert!((lerp(0.0, 100.0, 0.075) - 7.5).abs() < 1e-5);
    }

    #[test]
    fn test_tick_converges_without_overshoot() {
        let mut tracker = ScrollTracker::default();
        let target = 1000.0;
        let mut last_gap = f32::INFINITY;

        for _ in 0..80 {
            let current = tracker.tick(target);
            let gap = (target - current).abs();
            assert!(current <= target, "overshoot: {current}");
            assert!(gap < last_gap, "gap did not shrink: {gap} >= {last_gap}");
            last_gap = gap;
        }
        assert!(last_gap < 5.0);
        assert_eq!(tracker.state().target, target);
    }

    #[test]
    fn test_tick_first_step() {
        let mut tracker = ScrollTracker::default();
        let current = tracker.tick(200.0);
        assert!((current - 15.0).abs() < 1e-4);
        assert!((tracker.state().lag() - 185.0).abs() < 1e-3);
    }

    #[test]
    fn test_wrap_scroll() {
        assert_eq!(wrap_scroll(500.0, 1000.0), None);
        assert_eq!(wrap_scroll(1000.0, 1000.0), Some(1.0));
        assert_eq!(wrap_scroll(1200.0, 1000.0), Some(1.0));
    }

    #[test]
    fn test_scroll_progress() {
        assert!((scroll_progress(460.0, 1540.0, 1080.0) - 1.0).abs() < 1e-6);
        assert_eq!(scroll_progress(100.0, 500.0, 1080.0), 0.0);
    }

    #[test]
    fn test_viewport_aspect() {
        assert!((Viewport::new(1920.0, 1080.0).aspect_ratio() - 16.0 / 9.0).abs() < 1e-6);
        assert_eq!(Viewport::new(10.0, 0.0).aspect_ratio(), 1.0);
    }
}
