// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The fill loop and edge recycling.

use crate::Range;
use crate::helper::{LayoutContext, LayoutHelper};
use crate::helpers::LinearLayoutHelper;
use crate::host::{ElementFlags, Host};
use crate::registry::HelperRegistry;
use crate::state::{ItemDirection, LayoutChunkResult, LayoutDirection, LayoutState};

/// The helper owning `position`, or the fallback.
pub(super) fn owner<'r, H: Host>(
    registry: &'r mut HelperRegistry<H>,
    fallback: &'r mut LinearLayoutHelper,
    position: usize,
) -> &'r mut dyn LayoutHelper<H> {
    match registry.find_by_position_mut(position) {
        Some(helper) => &mut **helper,
        None => fallback,
    }
}

/// Shared-reference form of [`owner`].
pub(super) fn owner_ref<'r, H: Host>(
    registry: &'r HelperRegistry<H>,
    fallback: &'r LinearLayoutHelper,
    position: usize,
) -> &'r dyn LayoutHelper<H> {
    registry.find_by_position(position).unwrap_or(fallback)
}

/// One engine operation: the layout context plus the helpers it dispatches to.
pub(super) struct Pass<'a, H: Host> {
    pub(super) ctx: LayoutContext<'a, H>,
    pub(super) registry: &'a mut HelperRegistry<H>,
    pub(super) fallback: &'a mut LinearLayoutHelper,
}

impl<H: Host> Pass<'_, H> {
    pub(super) fn leading_space(&self, position: usize) -> i32 {
        owner_ref(self.registry, self.fallback, position).leading_space(&self.ctx, position)
    }

    pub(super) fn trailing_space(&self, position: usize) -> i32 {
        owner_ref(self.registry, self.fallback, position).trailing_space(&self.ctx, position)
    }

    /// Leading edge of the chunk holding the child.
    pub(super) fn chunk_start(&self, element: H::Element, position: usize) -> i32 {
        self.ctx.decorated_start(element) - self.leading_space(position)
    }

    /// Trailing edge of the chunk holding the child.
    pub(super) fn chunk_end(&self, element: H::Element, position: usize) -> i32 {
        self.ctx.decorated_end(element) + self.trailing_space(position)
    }

    /// Positions spanned by the scrolling children.
    pub(super) fn visible_range(&self) -> Option<Range> {
        let (low, high) = self.ctx.children().fold((usize::MAX, 0), |(low, high), (_, p)| {
            (low.min(p), high.max(p))
        });
        Range::new(low, high).ok()
    }

    /// Points `state` at `position` and `offset`, moving in `direction`.
    pub(super) fn aim(
        &self,
        state: &mut LayoutState<H::Element>,
        direction: LayoutDirection,
        position: isize,
        offset: i32,
    ) {
        let primary = self.ctx.primary();
        state.layout_direction = direction;
        state.item_direction = ItemDirection::for_layout(direction, self.ctx.is_reverse_layout());
        state.current_position = position;
        state.offset = offset;
        state.available = match direction {
            LayoutDirection::End => primary.end_after_padding() - offset,
            LayoutDirection::Start => offset - primary.start_after_padding(),
        };
        state.scrolling_offset = None;
    }

    /// Moves every scrolling child into the scrap map, keyed by live position.
    ///
    /// Children whose item is gone are recycled immediately.
    pub(super) fn scrap_children(&mut self, state: &mut LayoutState<H::Element>) {
        let count = self.ctx.item_count();
        while self.ctx.child_count() > 0 {
            let (element, _) = self.ctx.children_mut().remove(0);
            let host = self.ctx.host_mut();
            host.detach_element(element);
            let live = host
                .element_position(element)
                .filter(|p| {
                    *p < count && !host.element_flags(element).contains(ElementFlags::REMOVED)
                });
            match live {
                Some(position) => {
                    if let Some(previous) = state.scrap.insert(position, element) {
                        host.recycle_element(previous);
                    }
                }
                None => host.recycle_element(element),
            }
        }
    }

    /// Returns every element left in the scrap map to the host.
    pub(super) fn recycle_scrap(&mut self, state: &mut LayoutState<H::Element>) {
        let host = self.ctx.host_mut();
        for (_, element) in state.scrap.drain() {
            host.recycle_element(element);
        }
    }

    /// Lays out chunks until the budget in `state` is spent or items run out.
    ///
    /// Returns the pixels consumed from `available`.
    pub(super) fn fill(&mut self, state: &mut LayoutState<H::Element>) -> i32 {
        let start = state.available;
        if let Some(scrolling) = state.scrolling_offset {
            if state.available < 0 {
                state.scrolling_offset = Some(scrolling + state.available);
            }
            self.recycle_by_state(state);
        }
        let count = self.ctx.item_count();
        let check = self.ctx.config().check_contracts;
        let mut result = LayoutChunkResult::default();
        let mut remaining = state.available + state.extra;
        while remaining > 0 && state.has_more(count) {
            result.reset();
            let before = state.current_position;
            let position = before as usize;
            let helper = owner(self.registry, self.fallback, position);
            helper.layout_chunk(&mut self.ctx, state, &mut result);
            if result.finished {
                break;
            }
            if state.current_position == before {
                log::error!("{helper:?} made no progress at position {position}; fill stopped");
                debug_assert!(!check, "layout helper made no progress at position {position}");
                break;
            }
            state.offset += result.consumed * state.layout_direction.sign();
            if !result.ignore_consumed {
                state.available -= result.consumed;
                remaining -= result.consumed;
            }
            if let Some(scrolling) = state.scrolling_offset {
                let mut scrolling = scrolling + result.consumed;
                if state.available < 0 {
                    scrolling += state.available;
                }
                state.scrolling_offset = Some(scrolling);
                self.recycle_by_state(state);
            }
            if state.stop_on_focusable && result.focusable {
                break;
            }
        }
        log::trace!(
            "fill {:?} ended at position {} with {} px left",
            state.layout_direction,
            state.current_position,
            state.available
        );
        start - state.available
    }

    fn recycle_by_state(&mut self, state: &LayoutState<H::Element>) {
        let Some(scrolling) = state.scrolling_offset else {
            return;
        };
        match state.layout_direction {
            LayoutDirection::Start => self.recycle_from_end(scrolling),
            LayoutDirection::End => self.recycle_from_start(scrolling),
        }
    }

    /// Recycles leading children that end before `scrolled` minus the slack.
    fn recycle_from_start(&mut self, scrolled: i32) {
        if scrolled < 0 {
            return;
        }
        let limit = scrolled - self.ctx.config().recycle_offset;
        let mut out = 0;
        for (element, position) in self.ctx.children() {
            if self.ctx.decorated_end(element) > limit
                || !owner_ref(self.registry, self.fallback, position).is_recyclable(
                    &self.ctx,
                    position,
                    limit,
                    true,
                )
            {
                break;
            }
            out += 1;
        }
        for _ in 0..out {
            self.ctx.recycle_child_at(0);
        }
    }

    /// Recycles trailing children that start after the end minus `scrolled`
    /// plus the slack.
    fn recycle_from_end(&mut self, scrolled: i32) {
        if scrolled < 0 {
            return;
        }
        let limit = self.ctx.primary().end() - scrolled + self.ctx.config().recycle_offset;
        let mut out = 0;
        for (element, position) in self.ctx.children().rev() {
            if self.ctx.decorated_start(element) < limit
                || !owner_ref(self.registry, self.fallback, position).is_recyclable(
                    &self.ctx,
                    position,
                    limit,
                    false,
                )
            {
                break;
            }
            out += 1;
        }
        for _ in 0..out {
            let last = self.ctx.child_count() - 1;
            self.ctx.recycle_child_at(last);
        }
    }

    /// Recycles every scrolling child.
    pub(super) fn recycle_children(&mut self) {
        while self.ctx.child_count() > 0 {
            self.ctx.recycle_child_at(0);
        }
    }
}
