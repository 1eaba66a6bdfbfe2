// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The capability interface a host toolkit implements to drive the engine.

use core::fmt::Debug;
use core::hash::Hash;

use crate::geometry::{Bounds, Insets, MeasureSpec, Size};

bitflags::bitflags! {
    /// Per-element state reported by the host.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ElementFlags: u8 {
        /// The element's item was removed from the data set. It is still shown
        /// during a pre-layout pass so transitions can animate it out.
        const REMOVED   = 0b0000_0001;
        /// The element's item changed and is about to be rebound.
        const CHANGED   = 0b0000_0010;
        /// The element can take input focus.
        const FOCUSABLE = 0b0000_0100;
        /// The element currently holds input focus.
        const FOCUSED   = 0b0000_1000;
    }
}

/// What the engine needs from the hosting container.
///
/// The host owns every visual element. The engine only holds copies of the
/// [`Host::Element`] handle and asks the host to create, attach, measure,
/// position, and recycle them. All methods are called synchronously from
/// within [`LayoutEngine`](crate::LayoutEngine) operations.
///
/// Attached elements form the host's child list. The engine attaches scrolling
/// children in visual order and keeps them contiguous; elements owned by fixed
/// helpers are attached after them.
pub trait Host {
    /// A copyable handle to a visual element.
    type Element: Copy + Eq + Hash + Debug;

    /// Total number of items in the data set.
    fn item_count(&self) -> usize;

    /// Size of the container, padding included.
    fn content_size(&self) -> Size;

    /// Container padding on each edge.
    fn padding(&self) -> Insets;

    /// Whether the cross axis runs right to left.
    fn is_rtl(&self) -> bool {
        false
    }

    /// Whether the current pass is a predictive pre-layout.
    fn is_pre_layout(&self) -> bool {
        false
    }

    /// Returns an element bound to `position`, reusing a pooled element when possible.
    fn obtain_element(&mut self, position: usize) -> Self::Element;

    /// Returns a detached element to the free pool.
    fn recycle_element(&mut self, element: Self::Element);

    /// Attaches `element` to the container's child list at `index`.
    fn attach_element(&mut self, element: Self::Element, index: usize);

    /// Detaches `element` from the container's child list without recycling it.
    fn detach_element(&mut self, element: Self::Element);

    /// Hides or shows an attached element without detaching it.
    fn set_element_hidden(&mut self, element: Self::Element, hidden: bool);

    /// Measures `element` against the given constraints and returns its size.
    ///
    /// The constraints exclude margins and decorations.
    fn measure_element(
        &mut self,
        element: Self::Element,
        width: MeasureSpec,
        height: MeasureSpec,
    ) -> Size;

    /// Positions `element` at `bounds` (margins and decorations excluded).
    fn layout_element(&mut self, element: Self::Element, bounds: Bounds);

    /// Current bounds of `element`, as last passed to [`Host::layout_element`].
    fn element_bounds(&self, element: Self::Element) -> Bounds;

    /// Margins requested by `element`.
    fn element_margins(&self, element: Self::Element) -> Insets {
        let _ = element;
        Insets::ZERO
    }

    /// Decoration insets drawn around `element` by the host (dividers and the like).
    fn element_decorations(&self, element: Self::Element) -> Insets {
        let _ = element;
        Insets::ZERO
    }

    /// Live data position of `element`, or `None` if its item no longer exists.
    fn element_position(&self, element: Self::Element) -> Option<usize>;

    /// State flags of `element`.
    fn element_flags(&self, element: Self::Element) -> ElementFlags {
        let _ = element;
        ElementFlags::empty()
    }
}
