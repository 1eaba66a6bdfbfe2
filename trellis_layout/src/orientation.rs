// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Direction-agnostic access to element and container geometry.
//!
//! Every layout algorithm in this crate is written against
//! [`OrientationGeometry`] rather than against top/bottom or left/right, so the
//! same code serves vertical and horizontal lists. The engine builds one
//! instance for the scroll axis (the *primary* geometry) and one for the cross
//! axis (the *secondary* geometry).

use crate::geometry::{Axis, Bounds, Insets, Size};
use crate::host::Host;

/// Geometry accessor bound to one axis of a container.
///
/// "Decorated" values include the element's decoration insets and its margins,
/// which is the space the element actually occupies in the flow.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OrientationGeometry {
    axis: Axis,
    size: Size,
    padding: Insets,
}

impl OrientationGeometry {
    /// Creates an accessor for `axis` of a container with the given size and padding.
    #[must_use]
    pub const fn new(axis: Axis, size: Size, padding: Insets) -> Self {
        Self {
            axis,
            size,
            padding,
        }
    }

    /// Snapshots the container geometry of `host` along `axis`.
    pub fn for_host<H: Host>(host: &H, axis: Axis) -> Self {
        Self::new(axis, host.content_size(), host.padding())
    }

    /// The axis this accessor measures along.
    #[must_use]
    pub const fn axis(&self) -> Axis {
        self.axis
    }

    fn decorated_box<H: Host>(host: &H, element: H::Element) -> Bounds {
        host.element_bounds(element)
            .outset(host.element_decorations(element))
            .outset(host.element_margins(element))
    }

    /// Leading edge of the element's decorated box.
    pub fn decorated_start<H: Host>(&self, host: &H, element: H::Element) -> i32 {
        let b = Self::decorated_box(host, element);
        match self.axis {
            Axis::Vertical => b.top,
            Axis::Horizontal => b.left,
        }
    }

    /// Trailing edge of the element's decorated box.
    pub fn decorated_end<H: Host>(&self, host: &H, element: H::Element) -> i32 {
        let b = Self::decorated_box(host, element);
        match self.axis {
            Axis::Vertical => b.bottom,
            Axis::Horizontal => b.right,
        }
    }

    /// Decorated extent of the element along this axis.
    pub fn decorated_measurement<H: Host>(&self, host: &H, element: H::Element) -> i32 {
        self.decorated_end(host, element) - self.decorated_start(host, element)
    }

    /// Decorated extent of the element along the other axis.
    pub fn decorated_measurement_in_other<H: Host>(&self, host: &H, element: H::Element) -> i32 {
        let b = Self::decorated_box(host, element);
        match self.axis {
            Axis::Vertical => b.width(),
            Axis::Horizontal => b.height(),
        }
    }

    /// First coordinate inside the leading padding.
    #[must_use]
    pub const fn start_after_padding(&self) -> i32 {
        self.padding.start(self.axis)
    }

    /// Last coordinate before the trailing padding.
    #[must_use]
    pub const fn end_after_padding(&self) -> i32 {
        self.end() - self.end_padding()
    }

    /// Trailing edge of the container.
    #[must_use]
    pub const fn end(&self) -> i32 {
        self.size.along(self.axis)
    }

    /// Trailing padding.
    #[must_use]
    pub const fn end_padding(&self) -> i32 {
        self.padding.end(self.axis)
    }

    /// Space between the paddings.
    #[must_use]
    pub const fn total_space(&self) -> i32 {
        self.end_after_padding() - self.start_after_padding()
    }

    /// Moves one element by `amount` along this axis.
    pub fn offset_child<H: Host>(&self, host: &mut H, element: H::Element, amount: i32) {
        if amount == 0 {
            return;
        }
        let b = host.element_bounds(element);
        let moved = match self.axis {
            Axis::Vertical => b.translate(0, amount),
            Axis::Horizontal => b.translate(amount, 0),
        };
        host.layout_element(element, moved);
    }

    /// Moves every element in `elements` by `amount` along this axis.
    pub fn offset_children<H: Host>(
        &self,
        host: &mut H,
        elements: impl IntoIterator<Item = H::Element>,
        amount: i32,
    ) {
        if amount == 0 {
            return;
        }
        for element in elements {
            self.offset_child(host, element, amount);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::OrientationGeometry;
    use crate::geometry::{Axis, Bounds, Insets, Size};
    use crate::test_host::TestHost;

    #[test]
    fn decorated_edges_include_margins() {
        let mut host = TestHost::new(&[30], 100, 200);
        host.margins = Insets::new(1, 2, 3, 4);
        let e = host.spawn(0, Bounds::new(10, 20, 60, 50));

        let v = OrientationGeometry::for_host(&host, Axis::Vertical);
        let h = OrientationGeometry::for_host(&host, Axis::Horizontal);
        assert_eq!(v.decorated_start(&host, e), 18);
        assert_eq!(v.decorated_end(&host, e), 54);
        assert_eq!(v.decorated_measurement(&host, e), 36);
        assert_eq!(v.decorated_measurement_in_other(&host, e), 54);
        assert_eq!(h.decorated_start(&host, e), 9);
        assert_eq!(h.decorated_end(&host, e), 63);
    }

    #[test]
    fn padding_bounds_and_offsets() {
        let mut host = TestHost::new(&[30, 30], 100, 200);
        host.padding = Insets::new(5, 10, 5, 20);
        let g = OrientationGeometry::for_host(&host, Axis::Vertical);
        assert_eq!(g.start_after_padding(), 10);
        assert_eq!(g.end_after_padding(), 180);
        assert_eq!(g.total_space(), 170);
        assert_eq!(g.end(), 200);

        let a = host.spawn(0, Bounds::new(0, 0, 100, 30));
        let b = host.spawn(1, Bounds::new(0, 30, 100, 60));
        g.offset_children(&mut host, [a, b], -7);
        assert_eq!(host.bounds_of(a), Bounds::new(0, -7, 100, 23));
        assert_eq!(host.bounds_of(b), Bounds::new(0, 23, 100, 53));

        let h = OrientationGeometry::new(Axis::Horizontal, Size::new(100, 200), host.padding);
        h.offset_child(&mut host, a, 4);
        assert_eq!(host.bounds_of(a), Bounds::new(4, -7, 104, 23));
    }
}
