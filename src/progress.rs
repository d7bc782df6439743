use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Where the per-frame progress value comes from. Picked once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressSource {
    /// Fraction of the page that has been scrolled.
    Scroll,
    /// Repeating loop of cycle_ms milliseconds.
    Time { cycle_ms: u64 },
}

impl ProgressSource {
    pub fn progress(&self, page: &Page, elapsed: Duration) -> f32 {
        match *self {
            ProgressSource::Scroll => scroll_progress(
                page.scroll_offset(),
                page.viewport_height(),
                page.document_height(),
            ),
            ProgressSource::Time { cycle_ms } => {
                time_progress(elapsed, Duration::from_millis(cycle_ms))
            }
        }
    }
}

/// t = offset / max(viewport, document - viewport), clamped to [0, 1].
/// The denominator never drops below one pixel, so a page that can't scroll gives 0.
pub fn scroll_progress(scroll_offset: f32, viewport_height: f32, document_height: f32) -> f32 {
    let max_scroll = document_height - viewport_height;
    let denominator = viewport_height.max(max_scroll).max(1.0);
    let t = scroll_offset / denominator;
    if t.is_finite() {
        t.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// t = (elapsed / cycle) mod 1. A zero length cycle always gives 0.
pub fn time_progress(elapsed: Duration, cycle: Duration) -> f32 {
    if cycle.is_zero() {
        return 0.0;
    }
    // f64 keeps millisecond precision over long sessions.
    (elapsed.as_secs_f64() / cycle.as_secs_f64()).fract() as f32
}

/// The scroll state of the page the scene is embedded in.
/// The document is a fixed number of viewport heights tall.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    scroll_offset: f32,
    viewport_height: f32,
    screens: f32,
}

impl Page {
    pub fn new(viewport_height: f32, screens: f32) -> Page {
        Page {
            scroll_offset: 0.0,
            viewport_height: viewport_height.max(0.0),
            screens: screens.max(1.0),
        }
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    pub fn viewport_height(&self) -> f32 {
        self.viewport_height
    }

    pub fn document_height(&self) -> f32 {
        self.viewport_height * self.screens
    }

    pub fn max_scroll(&self) -> f32 {
        (self.document_height() - self.viewport_height).max(0.0)
    }

    pub fn scroll_to(&mut self, offset: f32) {
        self.scroll_offset = if offset.is_finite() {
            offset.clamp(0.0, self.max_scroll())
        } else {
            0.0
        };
    }

    /// Positive deltas scroll down the page.
    pub fn scroll_by(&mut self, delta: f32) {
        self.scroll_to(self.scroll_offset + delta);
    }

    /// The document grows with the viewport; the offset is clamped to the new range.
    pub fn set_viewport_height(&mut self, viewport_height: f32) {
        self.viewport_height = viewport_height.max(0.0);
        self.scroll_to(self.scroll_offset);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use cgmath::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn scroll_progress_in_range() {
        // 4 screens tall: max scroll is 3 viewports.
        let (viewport, document) = (800.0, 3200.0);
        for offset in [0.0, 1.0, 600.0, 1200.0, 2399.0, 2400.0] {
            let t = scroll_progress(offset, viewport, document);
            assert!((0.0..=1.0).contains(&t));
        }
        assert_eq!(0.0, scroll_progress(0.0, viewport, document));
        assert_eq!(1.0, scroll_progress(2400.0, viewport, document));
        assert_eq!(0.5, scroll_progress(1200.0, viewport, document));
    }

    #[test]
    fn short_page_divides_by_viewport() {
        // max scroll (200) is less than the viewport, so the viewport is the denominator.
        assert_eq!(0.25, scroll_progress(200.0, 800.0, 1000.0));
    }

    #[test]
    fn unscrollable_page_does_not_divide_by_zero() {
        assert_eq!(0.0, scroll_progress(0.0, 0.0, 0.0));
        assert_eq!(0.0, scroll_progress(0.0, 600.0, 600.0));
        assert_eq!(1.0, scroll_progress(5.0, 0.0, 0.0));
    }

    #[test]
    fn time_progress_wraps() {
        let t = time_progress(Duration::from_millis(5000), Duration::from_millis(2000));
        assert_abs_diff_eq!(0.5, t);
        assert_eq!(
            0.0,
            time_progress(Duration::from_millis(4000), Duration::from_millis(2000))
        );
        assert_abs_diff_eq!(
            0.25,
            time_progress(Duration::from_millis(3000), Duration::from_millis(12000))
        );
        assert_eq!(0.0, time_progress(Duration::from_secs(9), Duration::ZERO));
    }

    #[test]
    fn page_scroll_is_clamped() {
        let mut page = Page::new(800.0, 4.0);
        assert_eq!(2400.0, page.max_scroll());
        page.scroll_by(-100.0);
        assert_eq!(0.0, page.scroll_offset());
        page.scroll_by(5000.0);
        assert_eq!(2400.0, page.scroll_offset());

        // Shrinking the window shrinks the document, so the offset must follow.
        page.set_viewport_height(400.0);
        assert_eq!(1200.0, page.scroll_offset());
        assert_eq!(1.0, ProgressSource::Scroll.progress(&page, Duration::ZERO));
    }

    #[test]
    fn source_dispatch() {
        let page = Page::new(800.0, 1.0);
        assert_eq!(
            0.0,
            ProgressSource::Scroll.progress(&page, Duration::from_secs(3))
        );
        let time = ProgressSource::Time { cycle_ms: 2000 };
        assert_abs_diff_eq!(0.5, time.progress(&page, Duration::from_millis(5000)));
    }
}
