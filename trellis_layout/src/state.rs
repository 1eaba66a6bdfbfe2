// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-pass scratch records: the fill cursor, the anchor, chunk results, and
//! the persisted anchor.

use hashbrown::HashMap;

use crate::helper::LayoutContext;
use crate::host::Host;

/// Direction in which the fill cursor moves along the scroll axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LayoutDirection {
    /// Toward smaller coordinates.
    Start,
    /// Toward larger coordinates.
    End,
}

impl LayoutDirection {
    /// `-1` for [`LayoutDirection::Start`], `1` for [`LayoutDirection::End`].
    #[must_use]
    pub const fn sign(self) -> i32 {
        match self {
            Self::Start => -1,
            Self::End => 1,
        }
    }
}

/// Direction in which the item position moves.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ItemDirection {
    /// Toward position zero.
    Head,
    /// Toward the last position.
    Tail,
}

impl ItemDirection {
    /// `-1` for [`ItemDirection::Head`], `1` for [`ItemDirection::Tail`].
    #[must_use]
    pub const fn step(self) -> isize {
        match self {
            Self::Head => -1,
            Self::Tail => 1,
        }
    }

    /// The item direction that accompanies `layout` under `reverse_layout`.
    #[must_use]
    pub const fn for_layout(layout: LayoutDirection, reverse_layout: bool) -> Self {
        match (layout, reverse_layout) {
            (LayoutDirection::End, false) | (LayoutDirection::Start, true) => Self::Tail,
            (LayoutDirection::End, true) | (LayoutDirection::Start, false) => Self::Head,
        }
    }
}

/// The cursor of one fill pass.
///
/// One value is created per layout or scroll operation and dropped at its end.
/// It is scratch space: helpers read and advance it inside
/// [`LayoutHelper::layout_chunk`](crate::LayoutHelper::layout_chunk) and must
/// not keep references to it.
#[derive(Debug)]
pub struct LayoutState<E> {
    pub(crate) current_position: isize,
    pub(crate) item_direction: ItemDirection,
    pub(crate) layout_direction: LayoutDirection,
    pub(crate) offset: i32,
    pub(crate) available: i32,
    pub(crate) extra: i32,
    pub(crate) scrolling_offset: Option<i32>,
    pub(crate) pre_layout: bool,
    pub(crate) stop_on_focusable: bool,
    pub(crate) scrap: HashMap<usize, E>,
}

impl<E> Default for LayoutState<E> {
    fn default() -> Self {
        Self {
            current_position: 0,
            item_direction: ItemDirection::Tail,
            layout_direction: LayoutDirection::End,
            offset: 0,
            available: 0,
            extra: 0,
            scrolling_offset: None,
            pre_layout: false,
            stop_on_focusable: false,
            scrap: HashMap::new(),
        }
    }
}

impl<E: Copy> LayoutState<E> {
    /// Position the next chunk starts at. May be `-1` or `item_count` at the edges.
    #[must_use]
    pub const fn current_position(&self) -> isize {
        self.current_position
    }

    /// Direction the position advances in.
    #[must_use]
    pub const fn item_direction(&self) -> ItemDirection {
        self.item_direction
    }

    /// Direction the offset cursor advances in.
    #[must_use]
    pub const fn layout_direction(&self) -> LayoutDirection {
        self.layout_direction
    }

    /// Whether the cursor moves toward larger coordinates.
    #[must_use]
    pub const fn is_layout_end(&self) -> bool {
        matches!(self.layout_direction, LayoutDirection::End)
    }

    /// Coordinate the next chunk starts from (its leading edge when laying out
    /// toward the end, its trailing edge when laying out toward the start).
    #[must_use]
    pub const fn offset(&self) -> i32 {
        self.offset
    }

    /// Pixels still requested by this pass.
    #[must_use]
    pub const fn available(&self) -> i32 {
        self.available
    }

    /// Whether this is a predictive pre-layout pass.
    #[must_use]
    pub const fn is_pre_layout(&self) -> bool {
        self.pre_layout
    }

    /// Whether `current_position` is a valid item index.
    #[must_use]
    pub fn has_more(&self, item_count: usize) -> bool {
        self.current_position >= 0 && (self.current_position as usize) < item_count
    }

    /// The current position as an index, if valid.
    #[must_use]
    pub fn position(&self, item_count: usize) -> Option<usize> {
        self.has_more(item_count)
            .then_some(self.current_position as usize)
    }

    /// Advances past the current position without producing an element.
    ///
    /// Used by helpers that consume an index but manage its element outside
    /// the scrolling children (fixed and floating helpers).
    pub fn skip_current(&mut self) -> isize {
        let skipped = self.current_position;
        self.current_position += self.item_direction.step();
        skipped
    }

    /// Produces the element for the current position and advances.
    ///
    /// Elements detached at the start of a full layout are reused from the
    /// scrap map; otherwise the host is asked for one. Returns `None` when the
    /// position is out of bounds.
    pub fn next_element<H>(&mut self, ctx: &mut LayoutContext<'_, H>) -> Option<(E, usize)>
    where
        H: Host<Element = E>,
    {
        let position = self.position(ctx.item_count())?;
        let element = match self.scrap.remove(&position) {
            Some(element) => element,
            None => ctx.host_mut().obtain_element(position),
        };
        self.current_position += self.item_direction.step();
        Some((element, position))
    }
}

/// Outcome of one [`LayoutHelper::layout_chunk`](crate::LayoutHelper::layout_chunk) call.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LayoutChunkResult {
    /// Pixels consumed along the scroll axis.
    pub consumed: i32,
    /// The helper could not produce anything; the pass stops.
    pub finished: bool,
    /// Do not charge `consumed` against the budget (elements shown only for a transition).
    pub ignore_consumed: bool,
    /// At least one laid-out element can take focus.
    pub focusable: bool,
}

impl LayoutChunkResult {
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Where a full layout pass starts.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AnchorInfo {
    /// Item position the fill starts from.
    pub position: usize,
    /// Coordinate of the anchor chunk's leading edge (trailing edge when
    /// `layout_from_end` is set).
    pub coordinate: i32,
    /// Whether the anchor is measured from the trailing edge.
    pub layout_from_end: bool,
}

/// Scroll position captured by [`LayoutEngine::save_state`](crate::LayoutEngine::save_state).
///
/// Restoring it into a freshly built engine over the same data reproduces the
/// same first visible item at the same pixel offset.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SavedState {
    /// Position of the child nearest to the controlling edge.
    pub anchor_position: usize,
    /// Distance of that child's chunk edge from the padded container edge.
    pub anchor_offset: i32,
    /// Whether the offset is measured from the trailing edge.
    pub layout_from_end: bool,
}

impl SavedState {
    /// Whether the anchor points at an existing item.
    #[must_use]
    pub const fn is_valid_for(&self, item_count: usize) -> bool {
        self.anchor_position < item_count
    }
}
