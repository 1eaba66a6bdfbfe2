// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The layout helper interface and the context helpers lay out through.

use alloc::vec::Vec;
use core::any::Any;
use core::fmt::Debug;

use crate::config::EngineConfig;
use crate::geometry::{Axis, Bounds, Insets, MeasureSpec, Size};
use crate::host::Host;
use crate::orientation::OrientationGeometry;
use crate::state::{AnchorInfo, LayoutChunkResult, LayoutState};
use crate::{LayoutError, Range};

/// The scrolling children of an engine, in visual order, plus the elements
/// attached by fixed helpers.
///
/// Scrolling children are a contiguous run: they are only added and removed
/// at either end.
#[derive(Debug)]
pub(crate) struct ChildList<E> {
    children: Vec<(E, usize)>,
    fixed: Vec<E>,
}

impl<E> Default for ChildList<E> {
    fn default() -> Self {
        Self {
            children: Vec::new(),
            fixed: Vec::new(),
        }
    }
}

impl<E: Copy + Eq> ChildList<E> {
    pub(crate) fn len(&self) -> usize {
        self.children.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub(crate) fn get(&self, index: usize) -> Option<(E, usize)> {
        self.children.get(index).copied()
    }

    pub(crate) fn first(&self) -> Option<(E, usize)> {
        self.children.first().copied()
    }

    pub(crate) fn last(&self) -> Option<(E, usize)> {
        self.children.last().copied()
    }

    pub(crate) fn iter(&self) -> impl DoubleEndedIterator<Item = (E, usize)> + '_ {
        self.children.iter().copied()
    }

    pub(crate) fn elements(&self) -> impl Iterator<Item = E> + '_ {
        self.children.iter().map(|(e, _)| *e)
    }

    pub(crate) fn find(&self, position: usize) -> Option<E> {
        self.children
            .iter()
            .find(|(_, p)| *p == position)
            .map(|(e, _)| *e)
    }

    pub(crate) fn index_of(&self, element: E) -> Option<usize> {
        self.children.iter().position(|(e, _)| *e == element)
    }

    pub(crate) fn push_back(&mut self, element: E, position: usize) {
        self.children.push((element, position));
    }

    pub(crate) fn push_front(&mut self, element: E, position: usize) {
        self.children.insert(0, (element, position));
    }

    pub(crate) fn remove(&mut self, index: usize) -> (E, usize) {
        self.children.remove(index)
    }

    pub(crate) fn drain(&mut self) -> impl Iterator<Item = (E, usize)> + '_ {
        self.children.drain(..)
    }

    pub(crate) fn fixed(&self) -> &[E] {
        &self.fixed
    }

    pub(crate) fn push_fixed(&mut self, element: E) {
        self.fixed.push(element);
    }

    pub(crate) fn remove_fixed(&mut self, element: E) -> bool {
        let before = self.fixed.len();
        self.fixed.retain(|e| *e != element);
        before != self.fixed.len()
    }
}

/// A measured size split into scroll-axis and cross-axis parts.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct OrientedSize {
    /// Extent along the scroll axis, margins and decorations included.
    pub main: i32,
    /// Extent along the cross axis, margins and decorations included.
    pub cross: i32,
}

impl OrientedSize {
    /// The same extents as a width and height.
    #[must_use]
    pub const fn to_size(self, axis: Axis) -> Size {
        match axis {
            Axis::Vertical => Size::new(self.cross, self.main),
            Axis::Horizontal => Size::new(self.main, self.cross),
        }
    }
}

/// Everything a helper may touch while laying out.
///
/// Built by the engine for each operation. It borrows the host and the child
/// list, and snapshots the container geometry.
#[derive(Debug)]
pub struct LayoutContext<'a, H: Host> {
    host: &'a mut H,
    children: &'a mut ChildList<H::Element>,
    config: &'a EngineConfig,
    primary: OrientationGeometry,
    secondary: OrientationGeometry,
}

impl<'a, H: Host> LayoutContext<'a, H> {
    pub(crate) fn new(
        host: &'a mut H,
        children: &'a mut ChildList<H::Element>,
        config: &'a EngineConfig,
    ) -> Self {
        let primary = OrientationGeometry::for_host(host, config.axis);
        let secondary = OrientationGeometry::for_host(host, config.axis.cross());
        Self {
            host,
            children,
            config,
            primary,
            secondary,
        }
    }

    /// The host.
    pub fn host(&self) -> &H {
        &*self.host
    }

    /// The host, mutably.
    pub fn host_mut(&mut self) -> &mut H {
        &mut *self.host
    }

    /// Engine configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        self.config
    }

    /// Scroll axis.
    #[must_use]
    pub fn axis(&self) -> Axis {
        self.config.axis
    }

    /// Whether the scroll axis is vertical.
    #[must_use]
    pub fn is_vertical(&self) -> bool {
        self.config.axis == Axis::Vertical
    }

    /// Whether items are laid out from the trailing edge.
    #[must_use]
    pub fn is_reverse_layout(&self) -> bool {
        self.config.reverse_layout
    }

    /// Geometry along the scroll axis.
    #[must_use]
    pub fn primary(&self) -> &OrientationGeometry {
        &self.primary
    }

    /// Geometry along the cross axis.
    #[must_use]
    pub fn secondary(&self) -> &OrientationGeometry {
        &self.secondary
    }

    /// Total number of items.
    pub fn item_count(&self) -> usize {
        self.host.item_count()
    }

    /// Number of scrolling children.
    #[must_use]
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Scrolling child at `index` in visual order, with its position.
    #[must_use]
    pub fn child_at(&self, index: usize) -> Option<(H::Element, usize)> {
        self.children.get(index)
    }

    /// Iterates scrolling children in visual order with their positions.
    pub fn children(&self) -> impl DoubleEndedIterator<Item = (H::Element, usize)> + '_ {
        self.children.iter()
    }

    /// The scrolling child laid out for `position`, if any.
    #[must_use]
    pub fn find_child(&self, position: usize) -> Option<H::Element> {
        self.children.find(position)
    }

    /// Whether `element` is attached as a fixed element.
    #[must_use]
    pub fn is_fixed(&self, element: H::Element) -> bool {
        self.children.fixed().contains(&element)
    }

    /// Adds a freshly laid-out element at the edge the fill is moving toward.
    pub fn add_child(
        &mut self,
        state: &LayoutState<H::Element>,
        element: H::Element,
        position: usize,
    ) {
        self.add_child_at_edge(element, position, state.is_layout_end());
    }

    fn add_child_at_edge(&mut self, element: H::Element, position: usize, at_end: bool) {
        self.host.set_element_hidden(element, false);
        if at_end {
            let index = self.children.len();
            self.children.push_back(element, position);
            self.host.attach_element(element, index);
        } else {
            self.children.push_front(element, position);
            self.host.attach_element(element, 0);
        }
    }

    /// Attaches an element outside the scrolling run. Fixed elements do not
    /// move when the list scrolls and are never recycled by the engine.
    pub fn attach_fixed(&mut self, element: H::Element) {
        let index = self.children.len() + self.children.fixed().len();
        self.children.push_fixed(element);
        self.host.set_element_hidden(element, false);
        self.host.attach_element(element, index);
    }

    /// Detaches and recycles a fixed element. Returns `false` if it was not fixed.
    pub fn recycle_fixed(&mut self, element: H::Element) -> bool {
        if !self.children.remove_fixed(element) {
            return false;
        }
        self.host.detach_element(element);
        self.host.recycle_element(element);
        true
    }

    /// Moves a scrolling child out of the scrolling run and attaches it as fixed.
    ///
    /// Only the first or last child may be taken, which keeps the run contiguous.
    pub fn take_child_as_fixed(&mut self, element: H::Element) -> bool {
        let Some(index) = self.children.index_of(element) else {
            return false;
        };
        if index != 0 && index + 1 != self.children.len() {
            log::warn!("refusing to take child {element:?} from the middle of the scrolling run");
            return false;
        }
        self.children.remove(index);
        self.host.detach_element(element);
        self.attach_fixed(element);
        true
    }

    /// Moves a fixed element back into the scrolling run at the given edge.
    pub fn restore_fixed_as_child(
        &mut self,
        element: H::Element,
        position: usize,
        at_end: bool,
    ) -> bool {
        if !self.children.remove_fixed(element) {
            return false;
        }
        self.host.detach_element(element);
        self.add_child_at_edge(element, position, at_end);
        true
    }

    /// Hides or shows an element without detaching it.
    pub fn set_hidden(&mut self, element: H::Element, hidden: bool) {
        self.host.set_element_hidden(element, hidden);
    }

    fn outer_insets(&self, element: H::Element) -> Insets {
        self.host
            .element_margins(element)
            .add(self.host.element_decorations(element))
    }

    /// Measures `element` and returns its decorated size.
    ///
    /// The constraints describe the decorated box; margins and decorations are
    /// subtracted before the host measures.
    pub fn measure(
        &mut self,
        element: H::Element,
        cross: MeasureSpec,
        main: MeasureSpec,
    ) -> OrientedSize {
        let axis = self.axis();
        let outer = self.outer_insets(element);
        let main = main.shrink(outer.along(axis));
        let cross = cross.shrink(outer.along(axis.cross()));
        let (width, height) = match axis {
            Axis::Vertical => (cross, main),
            Axis::Horizontal => (main, cross),
        };
        let size = self.host.measure_element(element, width, height);
        OrientedSize {
            main: size.along(axis) + outer.along(axis),
            cross: size.along(axis.cross()) + outer.along(axis.cross()),
        }
    }

    /// Positions `element` so its decorated box spans the given coordinates.
    ///
    /// Cross coordinates are mirrored for right-to-left vertical layouts.
    pub fn place(
        &mut self,
        element: H::Element,
        main_start: i32,
        main_end: i32,
        cross_start: i32,
        cross_end: i32,
    ) {
        let outer = match self.axis() {
            Axis::Vertical => {
                let (left, right) = if self.host.is_rtl() {
                    let width = self.secondary.end();
                    (width - cross_end, width - cross_start)
                } else {
                    (cross_start, cross_end)
                };
                Bounds::new(left, main_start, right, main_end)
            }
            Axis::Horizontal => Bounds::new(main_start, cross_start, main_end, cross_end),
        };
        self.place_bounds(element, outer);
    }

    /// Positions `element` so its decorated box is `outer`, in container
    /// coordinates. No mirroring is applied.
    pub fn place_bounds(&mut self, element: H::Element, outer: Bounds) {
        let insets = self.outer_insets(element);
        self.host.layout_element(element, outer.inset(insets));
    }

    /// The container's box inside its padding, in container coordinates.
    #[must_use]
    pub fn padded_bounds(&self) -> Bounds {
        Bounds::from_origin_size(0, 0, self.host.content_size()).inset(self.host.padding())
    }

    /// Leading edge of `element`'s decorated box along the scroll axis.
    pub fn decorated_start(&self, element: H::Element) -> i32 {
        self.primary.decorated_start(&*self.host, element)
    }

    /// Trailing edge of `element`'s decorated box along the scroll axis.
    pub fn decorated_end(&self, element: H::Element) -> i32 {
        self.primary.decorated_end(&*self.host, element)
    }

    /// Moves one element along the scroll axis.
    pub fn offset_child(&mut self, element: H::Element, amount: i32) {
        let primary = self.primary;
        primary.offset_child(self.host, element, amount);
    }

    /// Moves every scrolling child along the scroll axis.
    pub(crate) fn offset_children(&mut self, amount: i32) {
        let primary = self.primary;
        let elements: Vec<_> = self.children.elements().collect();
        primary.offset_children(self.host, elements, amount);
    }

    /// Detaches and recycles the scrolling child at `index`.
    pub(crate) fn recycle_child_at(&mut self, index: usize) {
        let (element, _) = self.children.remove(index);
        self.host.detach_element(element);
        self.host.recycle_element(element);
    }

    pub(crate) fn children_mut(&mut self) -> &mut ChildList<H::Element> {
        &mut *self.children
    }
}

/// Bookkeeping shared by every helper: range, item count, z order, margin, and padding.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HelperBase {
    range: Option<Range>,
    item_count: usize,
    z_index: i32,
    margin: Insets,
    padding: Insets,
}

impl HelperBase {
    /// A base holding `item_count` items and no range yet.
    #[must_use]
    pub fn new(item_count: usize) -> Self {
        Self {
            item_count,
            ..Self::default()
        }
    }

    /// Assigns the range. Its length must equal the item count.
    pub fn set_range(&mut self, range: Option<Range>) -> Result<(), LayoutError> {
        if let Some(range) = range
            && range.len() != self.item_count
        {
            return Err(LayoutError::MismatchChildCount {
                item_count: self.item_count,
                range,
            });
        }
        self.range = range;
        Ok(())
    }

    /// Owned range, if assigned.
    #[must_use]
    pub const fn range(&self) -> Option<Range> {
        self.range
    }

    /// Number of items owned.
    #[must_use]
    pub const fn item_count(&self) -> usize {
        self.item_count
    }

    /// Changes the item count. The range is dropped until reassigned.
    pub fn set_item_count(&mut self, item_count: usize) {
        if item_count != self.item_count {
            self.item_count = item_count;
            self.range = None;
        }
    }

    /// Paint order; higher is drawn later.
    #[must_use]
    pub const fn z_index(&self) -> i32 {
        self.z_index
    }

    /// Sets the paint order.
    pub fn set_z_index(&mut self, z_index: i32) {
        self.z_index = z_index;
    }

    /// Space outside the helper's content.
    #[must_use]
    pub const fn margin(&self) -> Insets {
        self.margin
    }

    /// Sets the margin.
    pub fn set_margin(&mut self, margin: Insets) {
        self.margin = margin;
    }

    /// Space between the helper's edge and its items.
    #[must_use]
    pub const fn padding(&self) -> Insets {
        self.padding
    }

    /// Sets the padding.
    pub fn set_padding(&mut self, padding: Insets) {
        self.padding = padding;
    }

    /// Margin plus padding.
    #[must_use]
    pub const fn spacing(&self) -> Insets {
        self.margin.add(self.padding)
    }

    /// Whether `position` is outside the owned range.
    #[must_use]
    pub fn is_out_of_range(&self, position: usize) -> bool {
        self.range.is_none_or(|r| !r.contains(position))
    }

    /// Space before and after the chunk holding `first..=last` along the scroll
    /// axis, toward smaller and larger coordinates respectively.
    ///
    /// The leading chunk of the range carries the leading margin and padding,
    /// the trailing chunk the trailing ones; every other chunk carries `gap`
    /// after itself. Under reverse layout the range's first item sits at the
    /// trailing edge.
    #[must_use]
    pub fn edge_spaces(
        &self,
        axis: Axis,
        reverse: bool,
        first: usize,
        last: usize,
        gap: i32,
    ) -> (i32, i32) {
        let Some(range) = self.range else {
            return (0, gap);
        };
        let spacing = self.spacing();
        let (leading_item, trailing_item) = if reverse {
            (range.upper(), range.lower())
        } else {
            (range.lower(), range.upper())
        };
        let holds = |p: usize| first.min(last) <= p && p <= first.max(last);
        let before = if holds(leading_item) {
            spacing.start(axis)
        } else {
            0
        };
        let after = if holds(trailing_item) {
            spacing.end(axis)
        } else {
            gap
        };
        (before, after)
    }

    /// Cross-axis start of the content box and the content's cross extent.
    pub fn cross_content<H: Host>(&self, ctx: &LayoutContext<'_, H>) -> (i32, i32) {
        let cross = ctx.axis().cross();
        let spacing = self.spacing();
        let start = ctx.secondary().start_after_padding() + spacing.start(cross);
        let extent = ctx.secondary().total_space() - spacing.along(cross);
        (start, extent.max(0))
    }
}

/// A layout algorithm owning one contiguous range of item positions.
///
/// Implementations are registered with the engine through
/// [`LayoutEngine::set_layout_helpers`](crate::LayoutEngine::set_layout_helpers),
/// which assigns ranges in list order. Third-party algorithms implement this
/// trait directly.
///
/// Only [`LayoutHelper::base`], [`LayoutHelper::base_mut`], and
/// [`LayoutHelper::layout_chunk`] are required.
pub trait LayoutHelper<H: Host>: Debug {
    /// Shared bookkeeping.
    fn base(&self) -> &HelperBase;

    /// Shared bookkeeping, mutably.
    fn base_mut(&mut self) -> &mut HelperBase;

    /// Owned range, if assigned.
    fn range(&self) -> Option<Range> {
        self.base().range()
    }

    /// Number of items owned.
    fn item_count(&self) -> usize {
        self.base().item_count()
    }

    /// Paint order of elements this helper attaches as fixed.
    fn z_index(&self) -> i32 {
        self.base().z_index()
    }

    /// Assigns the range; fails if its length differs from the item count.
    fn set_range(&mut self, range: Option<Range>) -> Result<(), LayoutError> {
        self.base_mut().set_range(range)
    }

    /// Called before a layout or scroll operation, in reverse position order.
    fn before_layout(&mut self, ctx: &mut LayoutContext<'_, H>) {
        let _ = ctx;
    }

    /// Lays out one chunk starting at `state`'s current position.
    ///
    /// A chunk is one or more elements taken with
    /// [`LayoutState::next_element`] (or skipped with
    /// [`LayoutState::skip_current`]). The state must advance by at least one
    /// position unless `result.finished` is set.
    fn layout_chunk(
        &mut self,
        ctx: &mut LayoutContext<'_, H>,
        state: &mut LayoutState<H::Element>,
        result: &mut LayoutChunkResult,
    );

    /// Called after a layout or scroll operation, in position order.
    ///
    /// `visible` is the range of positions held by scrolling children and
    /// `scrolled` the distance the content moved.
    fn after_layout(
        &mut self,
        ctx: &mut LayoutContext<'_, H>,
        visible: Option<Range>,
        scrolled: i32,
    ) {
        let _ = (ctx, visible, scrolled);
    }

    /// Moves `anchor` to a position this helper can start a chunk at.
    fn check_anchor_info(&mut self, ctx: &LayoutContext<'_, H>, anchor: &mut AnchorInfo) {
        let _ = (ctx, anchor);
    }

    /// Space between the start of the chunk holding `position` and its element's decorated start.
    fn leading_space(&self, ctx: &LayoutContext<'_, H>, position: usize) -> i32 {
        let _ = (ctx, position);
        0
    }

    /// Space between the element for `position`'s decorated end and the end of its chunk.
    fn trailing_space(&self, ctx: &LayoutContext<'_, H>, position: usize) -> i32 {
        let _ = (ctx, position);
        0
    }

    /// Whether the child for `position` may be recycled once it passed `limit`.
    ///
    /// Returning `false` stops recycling at this child for the current pass.
    fn is_recyclable(
        &self,
        ctx: &LayoutContext<'_, H>,
        position: usize,
        limit: i32,
        from_start: bool,
    ) -> bool {
        let _ = (ctx, position, limit, from_start);
        true
    }

    /// The data set changed; drop caches keyed by position.
    fn on_items_changed(&mut self) {}

    /// Releases every element this helper attached on its own.
    fn clear(&mut self, ctx: &mut LayoutContext<'_, H>) {
        let _ = ctx;
    }

    /// Access to the concrete helper for callers that need to reconfigure it
    /// after registration.
    fn as_any_mut(&mut self) -> Option<&mut dyn Any> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::HelperBase;
    use crate::geometry::{Axis, Insets};
    use crate::{LayoutError, Range};

    #[test]
    fn range_must_match_item_count() {
        let mut base = HelperBase::new(3);
        let bad = Range::new(0, 3).unwrap();
        assert_eq!(
            base.set_range(Some(bad)),
            Err(LayoutError::MismatchChildCount {
                item_count: 3,
                range: bad
            })
        );
        assert!(base.set_range(Range::with_len(10, 3)).is_ok());
        assert!(base.is_out_of_range(9));
        assert!(!base.is_out_of_range(12));
    }

    #[test]
    fn edge_spaces_follow_range_edges() {
        let mut base = HelperBase::new(3);
        base.set_margin(Insets::new(0, 5, 0, 7));
        base.set_padding(Insets::new(0, 1, 0, 1));
        base.set_range(Range::with_len(10, 3)).unwrap();

        assert_eq!(base.edge_spaces(Axis::Vertical, false, 10, 10, 2), (6, 2));
        assert_eq!(base.edge_spaces(Axis::Vertical, false, 11, 11, 2), (0, 2));
        assert_eq!(base.edge_spaces(Axis::Vertical, false, 12, 12, 2), (0, 8));
        assert_eq!(base.edge_spaces(Axis::Vertical, false, 10, 12, 2), (6, 8));
        // Reversed: the first item sits at the trailing edge.
        assert_eq!(base.edge_spaces(Axis::Vertical, true, 10, 10, 2), (0, 8));
        assert_eq!(base.edge_spaces(Axis::Vertical, true, 12, 12, 2), (6, 2));
    }
}
