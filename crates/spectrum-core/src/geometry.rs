#![forbid(unsafe_code)]

//! Geometric primitives.

/// A screen rectangle in absolute pixel coordinates.
///
/// Edges follow the toolkit convention: `left`/`top` inclusive,
/// `right`/`bottom` exclusive. Coordinates may be negative for elements
/// scrolled or translated off screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// Left edge (inclusive).
    pub left: i32,
    /// Top edge (inclusive).
    pub top: i32,
    /// Right edge (exclusive).
    pub right: i32,
    /// Bottom edge (exclusive).
    pub bottom: i32,
}

impl Rect {
    /// Create a rectangle from its four edges.
    #[inline]
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Create a rectangle from an origin and a size.
    #[inline]
    pub const fn from_origin_size(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::new(x, y, x.saturating_add(width), y.saturating_add(height))
    }

    /// Width in pixels (zero for inverted rectangles).
    #[inline]
    pub const fn width(&self) -> i32 {
        let w = self.right.saturating_sub(self.left);
        if w < 0 { 0 } else { w }
    }

    /// Height in pixels (zero for inverted rectangles).
    #[inline]
    pub const fn height(&self) -> i32 {
        let h = self.bottom.saturating_sub(self.top);
        if h < 0 { 0 } else { h }
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Move the rectangle by the given offset.
    #[inline]
    #[must_use]
    pub const fn offset(&self, dx: i32, dy: i32) -> Self {
        Self::new(
            self.left.saturating_add(dx),
            self.top.saturating_add(dy),
            self.right.saturating_add(dx),
            self.bottom.saturating_add(dy),
        )
    }

    /// Compute the intersection with another rectangle, if they overlap.
    pub fn intersection_opt(&self, other: &Rect) -> Option<Rect> {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right.min(other.right);
        let bottom = self.bottom.min(other.bottom);
        if left < right && top < bottom {
            Some(Rect::new(left, top, right, bottom))
        } else {
            None
        }
    }
}
