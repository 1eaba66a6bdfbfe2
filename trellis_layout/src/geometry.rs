// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integer pixel geometry shared by the engine, helpers, and hosts.

/// Scroll axis of a layout.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Items flow top to bottom; the cross axis is horizontal.
    #[default]
    Vertical,
    /// Items flow left to right; the cross axis is vertical.
    Horizontal,
}

impl Axis {
    /// The other axis.
    #[must_use]
    pub const fn cross(self) -> Self {
        match self {
            Self::Vertical => Self::Horizontal,
            Self::Horizontal => Self::Vertical,
        }
    }
}

/// A width/height pair in pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Size {
    /// Horizontal extent.
    pub width: i32,
    /// Vertical extent.
    pub height: i32,
}

impl Size {
    /// The empty size.
    pub const ZERO: Self = Self::new(0, 0);

    /// Creates a size.
    #[must_use]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Extent along `axis`.
    #[must_use]
    pub const fn along(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Vertical => self.height,
            Axis::Horizontal => self.width,
        }
    }
}

/// An axis-aligned box given by its edges, in pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Bounds {
    /// Left edge.
    pub left: i32,
    /// Top edge.
    pub top: i32,
    /// Right edge (exclusive).
    pub right: i32,
    /// Bottom edge (exclusive).
    pub bottom: i32,
}

impl Bounds {
    /// The empty box at the origin.
    pub const ZERO: Self = Self::new(0, 0, 0, 0);

    /// Creates a box from its edges.
    #[must_use]
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Creates a box from an origin and a size.
    #[must_use]
    pub const fn from_origin_size(left: i32, top: i32, size: Size) -> Self {
        Self::new(left, top, left + size.width, top + size.height)
    }

    /// Width of the box.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.right - self.left
    }

    /// Height of the box.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// The box translated by `(dx, dy)`.
    #[must_use]
    pub const fn translate(&self, dx: i32, dy: i32) -> Self {
        Self::new(
            self.left + dx,
            self.top + dy,
            self.right + dx,
            self.bottom + dy,
        )
    }

    /// The box grown outward by `insets` on each edge.
    #[must_use]
    pub const fn outset(&self, insets: Insets) -> Self {
        Self::new(
            self.left - insets.left,
            self.top - insets.top,
            self.right + insets.right,
            self.bottom + insets.bottom,
        )
    }

    /// The box shrunk inward by `insets` on each edge.
    #[must_use]
    pub const fn inset(&self, insets: Insets) -> Self {
        Self::new(
            self.left + insets.left,
            self.top + insets.top,
            self.right - insets.right,
            self.bottom - insets.bottom,
        )
    }
}

/// Per-edge distances, used for margins, padding, and decorations.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Insets {
    /// Left inset.
    pub left: i32,
    /// Top inset.
    pub top: i32,
    /// Right inset.
    pub right: i32,
    /// Bottom inset.
    pub bottom: i32,
}

impl Insets {
    /// No inset on any edge.
    pub const ZERO: Self = Self::uniform(0);

    /// Creates insets from each edge.
    #[must_use]
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// The same inset on every edge.
    #[must_use]
    pub const fn uniform(value: i32) -> Self {
        Self::new(value, value, value, value)
    }

    /// Sum of two insets, edge by edge.
    #[must_use]
    pub const fn add(&self, other: Self) -> Self {
        Self::new(
            self.left + other.left,
            self.top + other.top,
            self.right + other.right,
            self.bottom + other.bottom,
        )
    }

    /// Inset on the leading edge of `axis` (top or left).
    #[must_use]
    pub const fn start(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Vertical => self.top,
            Axis::Horizontal => self.left,
        }
    }

    /// Inset on the trailing edge of `axis` (bottom or right).
    #[must_use]
    pub const fn end(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Vertical => self.bottom,
            Axis::Horizontal => self.right,
        }
    }

    /// Sum of both insets along `axis`.
    #[must_use]
    pub const fn along(&self, axis: Axis) -> i32 {
        self.start(axis) + self.end(axis)
    }
}

/// A measurement constraint along one axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MeasureSpec {
    /// The element must be exactly this size.
    Exactly(i32),
    /// The element may be at most this size.
    AtMost(i32),
    /// The element picks its own size.
    Unspecified,
}

impl MeasureSpec {
    /// Shrinks the constraint by `amount` (margins and decorations), never below zero.
    #[must_use]
    pub fn shrink(self, amount: i32) -> Self {
        match self {
            Self::Exactly(size) => Self::Exactly((size - amount).max(0)),
            Self::AtMost(size) => Self::AtMost((size - amount).max(0)),
            Self::Unspecified => Self::Unspecified,
        }
    }

    /// Resolves a desired size against this constraint.
    #[must_use]
    pub fn resolve(self, desired: i32) -> i32 {
        match self {
            Self::Exactly(size) => size,
            Self::AtMost(size) => desired.min(size),
            Self::Unspecified => desired,
        }
    }
}

#[cfg(feature = "kurbo")]
mod kurbo_conv {
    use super::{Bounds, Insets, Size};

    impl From<Size> for kurbo::Size {
        fn from(size: Size) -> Self {
            Self::new(f64::from(size.width), f64::from(size.height))
        }
    }

    impl From<Bounds> for kurbo::Rect {
        fn from(b: Bounds) -> Self {
            Self::new(
                f64::from(b.left),
                f64::from(b.top),
                f64::from(b.right),
                f64::from(b.bottom),
            )
        }
    }

    impl From<Insets> for kurbo::Insets {
        fn from(i: Insets) -> Self {
            Self::new(
                f64::from(i.left),
                f64::from(i.top),
                f64::from(i.right),
                f64::from(i.bottom),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Axis, Bounds, Insets, MeasureSpec, Size};

    #[test]
    fn insets_follow_axis() {
        let i = Insets::new(1, 2, 3, 4);
        assert_eq!(i.start(Axis::Vertical), 2);
        assert_eq!(i.end(Axis::Vertical), 4);
        assert_eq!(i.along(Axis::Horizontal), 4);
        assert_eq!(Size::new(10, 20).along(Axis::Vertical), 20);
    }

    #[test]
    fn bounds_outset_and_inset_are_inverse() {
        let b = Bounds::new(10, 10, 50, 30);
        let m = Insets::new(1, 2, 3, 4);
        assert_eq!(b.outset(m).inset(m), b);
        assert_eq!(b.translate(0, -10), Bounds::new(10, 0, 50, 20));
    }

    #[test]
    fn measure_spec_resolution() {
        assert_eq!(MeasureSpec::Exactly(10).shrink(4), MeasureSpec::Exactly(6));
        assert_eq!(MeasureSpec::AtMost(3).shrink(4), MeasureSpec::AtMost(0));
        assert_eq!(MeasureSpec::AtMost(30).resolve(50), 30);
        assert_eq!(MeasureSpec::Unspecified.resolve(50), 50);
    }

    #[cfg(feature = "kurbo")]
    #[test]
    fn converts_to_kurbo() {
        let r: kurbo::Rect = Bounds::new(0, 0, 10, 20).into();
        assert_eq!(r, kurbo::Rect::new(0.0, 0.0, 10.0, 20.0));
    }
}
