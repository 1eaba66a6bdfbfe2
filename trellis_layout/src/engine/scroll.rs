// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Incremental scrolling and gap correction.

use crate::host::{ElementFlags, Host};
use crate::state::{LayoutDirection, LayoutState};

use super::fill::Pass;

impl<H: Host> Pass<'_, H> {
    /// Scrolls the children by up to `delta` pixels, filling the edge being
    /// revealed and recycling the one being hidden.
    ///
    /// Positive `delta` moves content toward the leading edge. Returns the
    /// distance actually scrolled, which is smaller than `delta` in magnitude
    /// only when the data runs out.
    pub(super) fn scroll(&mut self, delta: i32) -> i32 {
        if delta == 0 || self.ctx.child_count() == 0 {
            return 0;
        }
        let direction = if delta > 0 {
            LayoutDirection::End
        } else {
            LayoutDirection::Start
        };
        let required = delta.saturating_abs();
        let mut state = LayoutState {
            pre_layout: self.ctx.host().is_pre_layout(),
            ..LayoutState::default()
        };
        let Some(scrolling) = self.prepare_scroll(&mut state, direction, required) else {
            return 0;
        };
        let consumed = scrolling + self.fill(&mut state);
        self.recycle_scrap(&mut state);
        if consumed < 0 {
            return 0;
        }
        let scrolled = if required > consumed {
            consumed * direction.sign()
        } else {
            delta
        };
        self.ctx.offset_children(-scrolled);
        log::trace!("scrolled {scrolled} of {delta} requested");
        scrolled
    }

    /// Lays out past the edge in `direction`, up to a third of the viewport,
    /// and stops after the first chunk that can take focus.
    ///
    /// Nothing scrolls and nothing is recycled. Returns the position nearest
    /// the old edge whose element can take focus.
    pub(super) fn reveal_focusable(&mut self, direction: LayoutDirection) -> Option<usize> {
        let (_, edge) = match direction {
            LayoutDirection::End => self.ctx.children().next_back()?,
            LayoutDirection::Start => self.ctx.children().next()?,
        };
        let mut state = LayoutState {
            pre_layout: self.ctx.host().is_pre_layout(),
            stop_on_focusable: true,
            ..LayoutState::default()
        };
        let budget = self.ctx.primary().total_space() / 3;
        self.prepare_scroll(&mut state, direction, budget)?;
        state.scrolling_offset = None;
        self.fill(&mut state);
        self.recycle_scrap(&mut state);

        let step = state.item_direction.step();
        let host = self.ctx.host();
        self.ctx
            .children()
            .filter(|(_, p)| if step > 0 { *p > edge } else { *p < edge })
            .filter(|(e, _)| host.element_flags(*e).contains(ElementFlags::FOCUSABLE))
            .map(|(_, p)| p)
            .min_by_key(|p| p.abs_diff(edge))
    }

    /// Aims `state` just past the edge child in `direction`.
    ///
    /// Returns the distance that can be scrolled without laying out anything.
    fn prepare_scroll(
        &self,
        state: &mut LayoutState<H::Element>,
        direction: LayoutDirection,
        required: i32,
    ) -> Option<i32> {
        let primary = self.ctx.primary();
        let (element, position) = match direction {
            LayoutDirection::End => self.ctx.children().next_back()?,
            LayoutDirection::Start => self.ctx.children().next()?,
        };
        let (edge, scrolling) = match direction {
            LayoutDirection::End => {
                let edge = self.chunk_end(element, position);
                (edge, edge - primary.end_after_padding())
            }
            LayoutDirection::Start => {
                let edge = self.chunk_start(element, position);
                (edge, primary.start_after_padding() - edge)
            }
        };
        self.aim(state, direction, position as isize, edge);
        state.current_position += state.item_direction.step();
        state.available = required - scrolling;
        state.extra = 0;
        state.scrolling_offset = Some(scrolling);
        Some(scrolling)
    }

    /// Pulls the content toward the leading edge when a gap is left there.
    pub(super) fn fix_start_gap(&mut self) -> i32 {
        let Some((element, position)) = self.ctx.children().next() else {
            return 0;
        };
        let gap = self.chunk_start(element, position) - self.ctx.primary().start_after_padding();
        if gap > 0 { self.scroll(gap) } else { 0 }
    }

    /// Pushes the content toward the trailing edge when a gap is left there.
    pub(super) fn fix_end_gap(&mut self) -> i32 {
        let Some((element, position)) = self.ctx.children().next_back() else {
            return 0;
        };
        let gap = self.ctx.primary().end_after_padding() - self.chunk_end(element, position);
        if gap > 0 { -self.scroll(-gap) } else { 0 }
    }
}
