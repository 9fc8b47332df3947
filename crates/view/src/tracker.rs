//! Visible-range and scroll-direction computation.

use crate::geometry::ViewportGeometry;
use backscroll_core::ViewConfig;

/// Scroll direction since the previous observation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
    /// First observation; nothing to compare against. No direction-dependent
    /// decision is made on this observation.
    Unknown,
}

/// The viewport as of one scroll observation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportState {
    pub scroll_top: i64,
    /// Inclusive index range of messages whose top edge falls inside the
    /// viewport; `None` when nothing is visible
    pub visible: Option<(usize, usize)>,
    /// Within the bottom threshold of the scrollable content
    pub at_bottom: bool,
    pub direction: ScrollDirection,
}

impl ViewportState {
    pub fn visible_start(&self) -> Option<usize> {
        self.visible.map(|(start, _)| start)
    }

    pub fn visible_end(&self) -> Option<usize> {
        self.visible.map(|(_, end)| end)
    }
}

/// Recomputes [`ViewportState`] on every scroll event.
#[derive(Debug, Clone, Default)]
pub struct ViewportTracker {
    last_scroll_top: Option<i64>,
    bottom_threshold_px: i64,
}

impl ViewportTracker {
    pub fn new(config: &ViewConfig) -> Self {
        Self { last_scroll_top: None, bottom_threshold_px: config.bottom_threshold_px }
    }

    /// Scan rendered message positions and classify the viewport.
    ///
    /// An unchanged scroll position counts as `Down`; only the very first
    /// observation yields `Unknown`.
    pub fn observe(&mut self, geo: &impl ViewportGeometry) -> ViewportState {
        let scroll_top = geo.scroll_top();
        let view_top = scroll_top;
        let view_bottom = scroll_top + geo.client_height();

        let mut visible = None;
        for index in 0..geo.message_count() {
            let Some(pos) = geo.message_offset(index) else {
                continue;
            };
            if pos >= view_top && pos <= view_bottom {
                visible = Some(match visible {
                    None => (index, index),
                    Some((start, _)) => (start, index),
                });
            }
        }

        let at_bottom = geo.scroll_height() - (scroll_top + geo.client_height()) < self.bottom_threshold_px;

        let direction = match self.last_scroll_top {
            None => ScrollDirection::Unknown,
            Some(prev) if scroll_top < prev => ScrollDirection::Up,
            Some(_) => ScrollDirection::Down,
        };
        self.last_scroll_top = Some(scroll_top);

        ViewportState { scroll_top, visible, at_bottom, direction }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::FixedRowGeometry;

    fn tracker() -> ViewportTracker {
        ViewportTracker::new(&ViewConfig::default())
    }

    #[test]
    fn test_visible_range_inclusive_bounds() {
        let mut tracker = tracker();
        let geo = FixedRowGeometry::new(20, 10, 60).with_scroll(40);
        let view = tracker.observe(&geo);
        // offsets 40, 60, 80, 100 fall inside [40, 100]
        assert_eq!(view.visible, Some((2, 5)));
    }

    #[test]
    fn test_first_observation_is_unknown() {
        let mut tracker = tracker();
        let geo = FixedRowGeometry::new(20, 10, 60);
        assert_eq!(tracker.observe(&geo).direction, ScrollDirection::Unknown);
    }

    #[test]
    fn test_direction_follows_scroll_top() {
        let mut tracker = tracker();
        let geo = FixedRowGeometry::new(20, 10, 60);
        tracker.observe(&geo.with_scroll(50));
        assert_eq!(tracker.observe(&geo.with_scroll(80)).direction, ScrollDirection::Down);
        assert_eq!(tracker.observe(&geo.with_scroll(30)).direction, ScrollDirection::Up);
        assert_eq!(tracker.observe(&geo.with_scroll(30)).direction, ScrollDirection::Down);
    }

    #[test]
    fn test_at_bottom_threshold() {
        let mut tracker = tracker();
        let geo = FixedRowGeometry::new(20, 10, 60);
        // scroll_height 200; bottom at scroll_top 140; threshold 16
        assert!(!tracker.observe(&geo.with_scroll(124)).at_bottom);
        assert!(tracker.observe(&geo.with_scroll(125)).at_bottom);
        assert!(tracker.observe(&geo.with_scroll(140)).at_bottom);
    }

    #[test]
    fn test_empty_content_has_no_visible_range() {
        let mut tracker = tracker();
        let geo = FixedRowGeometry::new(20, 0, 60);
        let view = tracker.observe(&geo);
        assert_eq!(view.visible, None);
        assert!(view.at_bottom);
    }
}
