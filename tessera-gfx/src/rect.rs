//! Axis-aligned rectangle geometry
//!
//! Origins are signed so callers can describe geometry that extends past
//! the top or left edge before clipping; extents are unsigned. An empty
//! rectangle (zero width or height) is the result of any fully-clipped
//! operation and is ignored by dirty tracking.

/// An axis-aligned rectangle with signed origin and unsigned extent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rect {
    pub x: i16,
    pub y: i16,
    pub w: u16,
    pub h: u16,
}

impl Rect {
    /// The canonical empty rectangle
    pub const EMPTY: Self = Self {
        x: 0,
        y: 0,
        w: 0,
        h: 0,
    };

    /// Create a rectangle from origin and extent
    pub const fn new(x: i16, y: i16, w: u16, h: u16) -> Self {
        Self { x, y, w, h }
    }

    /// True if the rectangle covers no pixels
    pub const fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Covered pixel count
    pub const fn area(&self) -> u32 {
        self.w as u32 * self.h as u32
    }

    /// Exclusive right edge
    pub const fn right(&self) -> i32 {
        self.x as i32 + self.w as i32
    }

    /// Exclusive bottom edge
    pub const fn bottom(&self) -> i32 {
        self.y as i32 + self.h as i32
    }

    /// Intersect with a surface of the given size, anchored at (0, 0)
    ///
    /// Returns the sub-rectangle that lies on the surface, or `EMPTY` if
    /// there is no overlap. The result always has a non-negative origin.
    pub fn clipped(&self, width: u16, height: u16) -> Self {
        let x0 = (self.x as i32).max(0);
        let y0 = (self.y as i32).max(0);
        let x1 = self.right().min(width as i32);
        let y1 = self.bottom().min(height as i32);

        if x1 <= x0 || y1 <= y0 {
            return Self::EMPTY;
        }

        Self {
            x: x0 as i16,
            y: y0 as i16,
            w: (x1 - x0) as u16,
            h: (y1 - y0) as u16,
        }
    }

    /// Axis-aligned bounding box of two rectangles
    ///
    /// An empty operand contributes nothing; the other rectangle is
    /// returned unchanged.
    pub fn union(&self, other: &Self) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }

        let x0 = self.x.min(other.x) as i32;
        let y0 = self.y.min(other.y) as i32;
        let x1 = self.right().max(other.right());
        let y1 = self.bottom().max(other.bottom());

        Self {
            x: x0 as i16,
            y: y0 as i16,
            w: (x1 - x0) as u16,
            h: (y1 - y0) as u16,
        }
    }

    /// True if the point lies inside the rectangle
    pub fn contains(&self, x: i16, y: i16) -> bool {
        x >= self.x && (x as i32) < self.right() && y >= self.y && (y as i32) < self.bottom()
    }
}
