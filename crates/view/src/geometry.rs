//! Read-only viewport geometry seam.
//!
//! The tracker and anchor logic never measure anything themselves; they read
//! scroll metrics and per-rendered-message vertical offsets through this
//! trait. Hosts back it with whatever actually laid the messages out.

/// Scroll container metrics plus per-message vertical offsets, as of the
/// last render. Offsets are relative to the top of the content, not the
/// viewport.
pub trait ViewportGeometry {
    fn scroll_top(&self) -> i64;
    fn scroll_height(&self) -> i64;
    fn client_height(&self) -> i64;
    /// Number of rendered messages
    fn message_count(&self) -> usize;
    /// Top offset of rendered message `index`, if it exists
    fn message_offset(&self, index: usize) -> Option<i64>;
}

/// Geometry for uniform-height rows; used by the TUI adapter, where every
/// message occupies one terminal cell row, and by tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedRowGeometry {
    pub row_height: i64,
    pub rows: usize,
    pub client_height: i64,
    pub scroll_top: i64,
}

impl FixedRowGeometry {
    pub fn new(row_height: i64, rows: usize, client_height: i64) -> Self {
        Self { row_height, rows, client_height, scroll_top: 0 }
    }

    pub fn with_scroll(mut self, scroll_top: i64) -> Self {
        self.scroll_top = scroll_top;
        self
    }

    /// Scroll position that pins the viewport to the bottom
    pub fn bottom_scroll(&self) -> i64 {
        (self.scroll_height() - self.client_height).max(0)
    }
}

impl ViewportGeometry for FixedRowGeometry {
    fn scroll_top(&self) -> i64 {
        self.scroll_top
    }

    fn scroll_height(&self) -> i64 {
        (self.rows as i64 * self.row_height).max(self.client_height)
    }

    fn client_height(&self) -> i64 {
        self.client_height
    }

    fn message_count(&self) -> usize {
        self.rows
    }

    fn message_offset(&self, index: usize) -> Option<i64> {
        (index < self.rows).then(|| index as i64 * self.row_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_row_offsets() {
        let geo = FixedRowGeometry::new(20, 5, 60);
        assert_eq!(geo.message_offset(0), Some(0));
        assert_eq!(geo.message_offset(4), Some(80));
        assert_eq!(geo.message_offset(5), None);
        assert_eq!(geo.scroll_height(), 100);
    }

    #[test]
    fn test_scroll_height_never_below_client() {
        let geo = FixedRowGeometry::new(20, 1, 60);
        assert_eq!(geo.scroll_height(), 60);
        assert_eq!(geo.bottom_scroll(), 0);
    }

    #[test]
    fn test_bottom_scroll() {
        let geo = FixedRowGeometry::new(20, 10, 60);
        assert_eq!(geo.bottom_scroll(), 140);
    }
}
