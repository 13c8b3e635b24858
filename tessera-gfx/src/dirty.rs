//! Bounded dirty-region tracking
//!
//! The tracker keeps at most [`MAX_DIRTY_REGIONS`] rectangles and degrades
//! to a single full-screen flag rather than growing. Three rules bound the
//! work per flush:
//!
//! 1. A write covering more than a quarter of the surface escalates to
//!    full-screen immediately; one big transfer beats bookkeeping.
//! 2. A write adjacent to or overlapping a tracked region is merged into
//!    that region's bounding box (cheap heuristic, not exact overlap).
//! 3. When all slots are taken and a new region would be needed, the
//!    tracker escalates to full-screen.
//!
//! Merging may cover pixels that never changed; that costs retransmission,
//! never correctness. Coverage only ever grows until the next clear.

use heapless::Vec;

use crate::rect::Rect;

/// Maximum number of tracked rectangles before escalating to full-screen
pub const MAX_DIRTY_REGIONS: usize = 8;

/// Tracks which parts of one surface changed since the last flush
#[derive(Debug, Clone)]
pub struct DirtyTracker {
    regions: Vec<Rect, MAX_DIRTY_REGIONS>,
    full_screen: bool,
    total_area: u32,
}

impl DirtyTracker {
    /// Create a tracker for a surface of the given size
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            regions: Vec::new(),
            full_screen: false,
            total_area: width as u32 * height as u32,
        }
    }

    /// Record a modified rectangle
    ///
    /// The rectangle must already be clipped to the surface; empty
    /// rectangles are ignored.
    pub fn mark(&mut self, r: Rect) {
        if r.is_empty() || self.full_screen {
            return;
        }

        // A single large write flushes cheaper as one full transfer
        if r.area() > self.total_area / 4 {
            self.mark_full();
            return;
        }

        // Try to grow an existing region instead of taking a new slot.
        // The bounding box absorbs the write when the combined extent does
        // not exceed the two extents summed, in both axes - true exactly
        // when the rectangles touch or overlap on that axis.
        for region in self.regions.iter_mut() {
            let bounding = region.union(&r);
            if bounding.w as u32 <= region.w as u32 + r.w as u32
                && bounding.h as u32 <= region.h as u32 + r.h as u32
            {
                *region = bounding;
                return;
            }
        }

        if self.regions.push(r).is_err() {
            // All slots taken: cap the transfer count at one full screen
            self.mark_full();
        }
    }

    /// Treat the whole surface as dirty, superseding the region list
    pub fn mark_full(&mut self) {
        self.full_screen = true;
        self.regions.clear();
    }

    /// Forget all dirty state
    pub fn clear(&mut self) {
        self.full_screen = false;
        self.regions.clear();
    }

    /// True if anything needs flushing
    pub fn is_dirty(&self) -> bool {
        self.full_screen || !self.regions.is_empty()
    }

    /// True if the whole surface is marked dirty
    pub fn is_full_screen(&self) -> bool {
        self.full_screen
    }

    /// Number of tracked rectangles (0 while full-screen dirty)
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// The tracked rectangles
    pub fn regions(&self) -> &[Rect] {
        &self.regions
    }

    /// True if every pixel of `r` is covered by current dirty state
    ///
    /// Diagnostic helper; flush does not use it.
    pub fn covers(&self, r: &Rect) -> bool {
        if self.full_screen {
            return true;
        }
        // Conservative: only checks containment by a single region
        self.regions.iter().any(|region| {
            region.x <= r.x
                && region.y <= r.y
                && region.right() >= r.right()
                && region.bottom() >= r.bottom()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> DirtyTracker {
        DirtyTracker::new(240, 240)
    }

    #[test]
    fn test_starts_clean() {
        let t = tracker();
        assert!(!t.is_dirty());
        assert!(!t.is_full_screen());
        assert_eq!(t.region_count(), 0);
    }

    #[test]
    fn test_mark_single_region() {
        let mut t = tracker();
        t.mark(Rect::new(10, 10, 20, 20));
        assert!(t.is_dirty());
        assert!(!t.is_full_screen());
        assert_eq!(t.region_count(), 1);
        assert_eq!(t.regions()[0], Rect::new(10, 10, 20, 20));
    }

    #[test]
    fn test_empty_rect_ignored() {
        let mut t = tracker();
        t.mark(Rect::EMPTY);
        assert!(!t.is_dirty());
    }

    #[test]
    fn test_adjacent_writes_merge() {
        let mut t = tracker();
        t.mark(Rect::new(0, 0, 10, 10));
        t.mark(Rect::new(10, 0, 10, 10));
        assert_eq!(t.region_count(), 1);
        assert_eq!(t.regions()[0], Rect::new(0, 0, 20, 10));
    }

    #[test]
    fn test_overlapping_writes_merge() {
        let mut t = tracker();
        t.mark(Rect::new(0, 0, 10, 10));
        t.mark(Rect::new(5, 5, 10, 10));
        assert_eq!(t.region_count(), 1);
        assert_eq!(t.regions()[0], Rect::new(0, 0, 15, 15));
    }

    #[test]
    fn test_distant_writes_stay_separate() {
        let mut t = tracker();
        t.mark(Rect::new(0, 0, 10, 10));
        t.mark(Rect::new(100, 100, 10, 10));
        assert_eq!(t.region_count(), 2);
    }

    #[test]
    fn test_quarter_area_escalates() {
        // 140x140 = 19600 > 240*240/4 = 14400
        let mut t = tracker();
        t.mark(Rect::new(0, 0, 140, 140));
        assert!(t.is_full_screen());
        assert_eq!(t.region_count(), 0);
    }

    #[test]
    fn test_quarter_area_boundary_does_not_escalate() {
        // Exactly a quarter (120x120) stays a tracked region
        let mut t = tracker();
        t.mark(Rect::new(0, 0, 120, 120));
        assert!(!t.is_full_screen());
        assert_eq!(t.region_count(), 1);
    }

    #[test]
    fn test_capacity_overflow_escalates() {
        // 9 disjoint, non-adjacent 4x4 rects: slots hold 8, the 9th
        // escalates to full-screen
        let mut t = tracker();
        for i in 0..8 {
            t.mark(Rect::new(i * 20, 0, 4, 4));
            assert!(!t.is_full_screen());
        }
        assert_eq!(t.region_count(), 8);

        t.mark(Rect::new(0, 100, 4, 4));
        assert!(t.is_full_screen());
        assert_eq!(t.region_count(), 0);
    }

    #[test]
    fn test_marks_after_full_screen_ignored() {
        let mut t = tracker();
        t.mark_full();
        t.mark(Rect::new(0, 0, 4, 4));
        assert!(t.is_full_screen());
        assert_eq!(t.region_count(), 0);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut t = tracker();
        t.mark(Rect::new(0, 0, 10, 10));
        t.mark_full();
        t.clear();
        assert!(!t.is_dirty());
        assert!(!t.is_full_screen());
        assert_eq!(t.region_count(), 0);
    }

    #[test]
    fn test_covers_merged_writes() {
        let mut t = tracker();
        t.mark(Rect::new(0, 0, 10, 10));
        t.mark(Rect::new(8, 8, 10, 10));
        assert!(t.covers(&Rect::new(0, 0, 10, 10)));
        assert!(t.covers(&Rect::new(8, 8, 10, 10)));
        assert!(!t.covers(&Rect::new(100, 100, 4, 4)));
    }

    #[test]
    fn test_merge_prefers_first_matching_region() {
        let mut t = tracker();
        t.mark(Rect::new(0, 0, 10, 10));
        t.mark(Rect::new(60, 60, 10, 10));
        // Touches the first region only
        t.mark(Rect::new(10, 0, 4, 4));
        assert_eq!(t.region_count(), 2);
        assert_eq!(t.regions()[0], Rect::new(0, 0, 14, 10));
        assert_eq!(t.regions()[1], Rect::new(60, 60, 10, 10));
    }
}
