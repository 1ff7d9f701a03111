#![forbid(unsafe_code)]

//! Geometric primitives shared by layout and compositing.
//!
//! All coordinates are terminal cells, 0-indexed, origin at top-left.

use std::fmt;

/// A strictly positive extent: either a layout constraint handed down by a
/// parent or the size a render object resolved for itself.
///
/// # Invariants
///
/// `width > 0` and `height > 0`. The only constructors are checked, so a
/// `SizeBox` in hand is always non-degenerate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SizeBox {
    width: u16,
    height: u16,
}

impl SizeBox {
    /// Create a size box, returning `None` if either dimension is zero.
    #[inline]
    #[must_use]
    pub const fn new(width: u16, height: u16) -> Option<Self> {
        if width == 0 || height == 0 {
            None
        } else {
            Some(Self { width, height })
        }
    }

    /// Width in cells (always > 0).
    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Height in cells (always > 0).
    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Area in cells.
    #[inline]
    pub const fn area(&self) -> u32 {
        self.width as u32 * self.height as u32
    }

    /// Component-wise minimum of two boxes.
    #[inline]
    #[must_use]
    pub fn min(self, other: SizeBox) -> SizeBox {
        Self {
            width: self.width.min(other.width),
            height: self.height.min(other.height),
        }
    }

    /// Whether `other` fits inside `self` in both dimensions.
    #[inline]
    pub const fn contains(&self, other: SizeBox) -> bool {
        other.width <= self.width && other.height <= self.height
    }

    /// Shrink by the given insets.
    ///
    /// Returns `None` when the insets consume a whole dimension.
    #[must_use]
    pub fn deflate(self, sides: Sides) -> Option<SizeBox> {
        SizeBox::new(
            self.width.saturating_sub(sides.horizontal_sum()),
            self.height.saturating_sub(sides.vertical_sum()),
        )
    }

    /// Grow by the given insets, clamped to `u16::MAX`.
    #[must_use]
    pub fn inflate(self, sides: Sides) -> SizeBox {
        Self {
            width: self.width.saturating_add(sides.horizontal_sum()),
            height: self.height.saturating_add(sides.vertical_sum()),
        }
    }
}

impl fmt::Display for SizeBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Offset of a child within its parent's canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    /// Column offset.
    pub x: u16,
    /// Row offset.
    pub y: u16,
}

impl Position {
    /// The parent's top-left corner.
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    /// Create a new position.
    #[inline]
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

/// Insets for padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Sides {
    pub top: u16,
    pub right: u16,
    pub bottom: u16,
    pub left: u16,
}

impl Sides {
    /// Same inset on every side.
    pub const fn all(val: u16) -> Self {
        Self::new(val, val, val, val)
    }

    /// Left and right only.
    pub const fn horizontal(val: u16) -> Self {
        Self::new(0, val, 0, val)
    }

    /// Top and bottom only.
    pub const fn vertical(val: u16) -> Self {
        Self::new(val, 0, val, 0)
    }

    /// Clockwise from the top, CSS order.
    pub const fn new(top: u16, right: u16, bottom: u16, left: u16) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    #[inline]
    pub const fn horizontal_sum(&self) -> u16 {
        self.left.saturating_add(self.right)
    }

    #[inline]
    pub const fn vertical_sum(&self) -> u16 {
        self.top.saturating_add(self.bottom)
    }
}

impl From<u16> for Sides {
    fn from(val: u16) -> Self {
        Self::all(val)
    }
}

impl From<(u16, u16)> for Sides {
    fn from((vertical, horizontal): (u16, u16)) -> Self {
        Self::new(vertical, horizontal, vertical, horizontal)
    }
}

impl From<(u16, u16, u16, u16)> for Sides {
    fn from((top, right, bottom, left): (u16, u16, u16, u16)) -> Self {
        Self::new(top, right, bottom, left)
    }
}

/// Main axis of a sequential layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Axis {
    /// Children placed left to right.
    #[default]
    Horizontal,
    /// Children placed top to bottom.
    Vertical,
}

impl Axis {
    /// Extent of `size` along this axis.
    #[inline]
    pub const fn main(self, size: SizeBox) -> u16 {
        match self {
            Self::Horizontal => size.width,
            Self::Vertical => size.height,
        }
    }

    /// Extent of `size` across this axis.
    #[inline]
    pub const fn cross(self, size: SizeBox) -> u16 {
        match self {
            Self::Horizontal => size.height,
            Self::Vertical => size.width,
        }
    }

    /// Build a size box from main/cross extents.
    #[inline]
    pub const fn compose(self, main: u16, cross: u16) -> Option<SizeBox> {
        match self {
            Self::Horizontal => SizeBox::new(main, cross),
            Self::Vertical => SizeBox::new(cross, main),
        }
    }

    /// Build a position from main/cross offsets.
    #[inline]
    pub const fn position(self, main: u16, cross: u16) -> Position {
        match self {
            Self::Horizontal => Position::new(main, cross),
            Self::Vertical => Position::new(cross, main),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_box_rejects_zero() {
        assert!(SizeBox::new(0, 5).is_none());
        assert!(SizeBox::new(5, 0).is_none());
        assert!(SizeBox::new(0, 0).is_none());
        let size = SizeBox::new(3, 4).unwrap();
        assert_eq!((size.width(), size.height()), (3, 4));
        assert_eq!(size.area(), 12);
    }

    #[test]
    fn size_box_min_and_contains() {
        let a = SizeBox::new(10, 2).unwrap();
        let b = SizeBox::new(4, 8).unwrap();
        assert_eq!(a.min(b), SizeBox::new(4, 2).unwrap());
        assert!(a.contains(SizeBox::new(10, 1).unwrap()));
        assert!(!a.contains(b));
    }

    #[test]
    fn deflate_subtracts_insets() {
        let size = SizeBox::new(10, 5).unwrap();
        assert_eq!(
            size.deflate(Sides::new(1, 2, 1, 3)),
            SizeBox::new(5, 3)
        );
        assert_eq!(size.deflate(Sides::horizontal(5)), None);
        assert_eq!(size.deflate(Sides::vertical(2)), SizeBox::new(10, 1));
    }

    #[test]
    fn inflate_saturates() {
        let size = SizeBox::new(u16::MAX - 1, 1).unwrap();
        let grown = size.inflate(Sides::all(3));
        assert_eq!(grown.width(), u16::MAX);
        assert_eq!(grown.height(), 7);
    }

    #[test]
    fn sides_constructors_and_conversions() {
        assert_eq!(Sides::all(3), Sides::from(3));
        assert_eq!(Sides::horizontal(2), Sides::new(0, 2, 0, 2));
        assert_eq!(Sides::vertical(4), Sides::new(4, 0, 4, 0));
        assert_eq!(Sides::from((1, 2)), Sides::new(1, 2, 1, 2));
        assert_eq!(Sides::from((1, 2, 3, 4)), Sides::new(1, 2, 3, 4));
        assert_eq!(Sides::new(1, 2, 3, 4).horizontal_sum(), 6);
        assert_eq!(Sides::new(1, 2, 3, 4).vertical_sum(), 4);
    }

    #[test]
    fn axis_projection() {
        let size = SizeBox::new(7, 2).unwrap();
        assert_eq!(Axis::Horizontal.main(size), 7);
        assert_eq!(Axis::Horizontal.cross(size), 2);
        assert_eq!(Axis::Vertical.main(size), 2);
        assert_eq!(Axis::Vertical.cross(size), 7);
        assert_eq!(Axis::Vertical.compose(2, 7), Some(size));
        assert_eq!(Axis::Vertical.position(3, 1), Position::new(1, 3));
    }

    #[test]
    fn size_box_display() {
        assert_eq!(SizeBox::new(80, 24).unwrap().to_string(), "80x24");
    }

    mod property {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn deflate_never_grows(
                w in 1u16..200,
                h in 1u16..200,
                t in 0u16..20,
                r in 0u16..20,
                b in 0u16..20,
                l in 0u16..20,
            ) {
                let size = SizeBox::new(w, h).unwrap();
                if let Some(inner) = size.deflate(Sides::new(t, r, b, l)) {
                    prop_assert!(size.contains(inner));
                    prop_assert_eq!(inner.width() + l + r, w);
                    prop_assert_eq!(inner.height() + t + b, h);
                } else {
                    prop_assert!(l + r >= w || t + b >= h);
                }
            }
        }
    }
}
