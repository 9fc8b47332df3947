//! Scroll anchoring across snapshot replacement.
//!
//! Snapshots are replaced wholesale, so the scroll position must be carried
//! over by reference to a message: the one at the top of the viewport. The
//! anchor is captured immediately before the replacement and consumed exactly
//! once after re-render.

use crate::geometry::ViewportGeometry;
use crate::tracker::ViewportState;
use backscroll_core::{MessageId, Snapshot};

/// The message pinned to the top of the viewport at capture time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorPoint {
    pub anchor_id: MessageId,
    /// Send time of the anchor message; drives the nearest-by-time fallback
    /// when the anchor itself was evicted by the server-side window
    pub anchor_time: i64,
    /// Pixel offset of the anchor below the viewport top at capture time
    pub offset_px: i64,
    /// Viewport was at the bottom threshold; restoration sticks to the
    /// bottom instead of chasing the anchor
    pub at_bottom: bool,
}

impl AnchorPoint {
    /// Capture an anchor from the current view, snapshot, and geometry.
    /// `None` when nothing is visible to anchor on.
    pub fn capture(view: &ViewportState, snapshot: &Snapshot, geo: &impl ViewportGeometry) -> Option<Self> {
        let (start, _) = view.visible?;
        let msg = snapshot.get(start)?;
        let offset_px = geo.message_offset(start)? - geo.scroll_top();
        Some(Self { anchor_id: msg.id.clone(), anchor_time: msg.time, offset_px, at_bottom: view.at_bottom })
    }

    /// Compute the scroll position that keeps the anchor message visually
    /// stationary in the re-rendered snapshot. `geo` must describe the
    /// layout of `snapshot`, i.e. the state after re-render.
    pub fn restore(&self, snapshot: &Snapshot, geo: &impl ViewportGeometry) -> i64 {
        if self.at_bottom {
            return geo.scroll_height();
        }

        let index = snapshot.index_of(&self.anchor_id).or_else(|| {
            tracing::debug!(anchor = %self.anchor_id, "anchor evicted, clamping to nearest time");
            snapshot.nearest_by_time(self.anchor_time)
        });

        match index.and_then(|i| geo.message_offset(i)) {
            Some(offset) => offset - self.offset_px,
            // empty snapshot: nothing to anchor against, hold position
            None => geo.scroll_top(),
        }
    }
}
