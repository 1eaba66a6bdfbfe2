// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;
use core::fmt;

use crate::helper::{HelperBase, LayoutContext, LayoutHelper};
use crate::host::Host;
use crate::registry::{BoxedHelper, HelperRegistry};
use crate::state::{AnchorInfo, LayoutChunkResult, LayoutState};
use crate::{LayoutError, Range};

/// A helper made of nested helpers laid out one after another.
///
/// The group's range is split among its members in order, each receiving as
/// many positions as it holds items. Every call is forwarded to the member
/// owning the position in question; lifecycle hooks reach every member.
pub struct GroupLayoutHelper<H: Host> {
    base: HelperBase,
    members: HelperRegistry<H>,
}

impl<H: Host> fmt::Debug for GroupLayoutHelper<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupLayoutHelper")
            .field("base", &self.base)
            .field("members", &self.members)
            .finish()
    }
}

impl<H: Host> GroupLayoutHelper<H> {
    /// A group over `members`, holding the sum of their item counts.
    #[must_use]
    pub fn new(members: Vec<BoxedHelper<H>>) -> Self {
        let item_count = members.iter().map(|m| m.item_count()).sum();
        let mut registry = HelperRegistry::new();
        registry.set_helpers(members);
        Self {
            base: HelperBase::new(item_count),
            members: registry,
        }
    }

    /// The nested helpers in position order.
    #[must_use]
    pub fn members(&self) -> &HelperRegistry<H> {
        &self.members
    }
}

impl<H: Host> LayoutHelper<H> for GroupLayoutHelper<H> {
    fn base(&self) -> &HelperBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut HelperBase {
        &mut self.base
    }

    fn set_range(&mut self, range: Option<Range>) -> Result<(), LayoutError> {
        self.base.set_range(range)?;
        let mut next = range.map(|r| r.lower());
        for member in self.members.iter_mut() {
            let count = member.item_count();
            let assigned = next.and_then(|start| Range::with_len(start, count));
            member.set_range(assigned)?;
            if let Some(start) = next.as_mut() {
                *start += count;
            }
        }
        // Positions changed, so the position view must be rebuilt.
        let members = self.members.take_all();
        self.members.set_helpers(members);
        Ok(())
    }

    fn before_layout(&mut self, ctx: &mut LayoutContext<'_, H>) {
        for member in self.members.iter_mut().rev() {
            member.before_layout(ctx);
        }
    }

    fn layout_chunk(
        &mut self,
        ctx: &mut LayoutContext<'_, H>,
        state: &mut LayoutState<H::Element>,
        result: &mut LayoutChunkResult,
    ) {
        let member = state
            .position(ctx.item_count())
            .and_then(|p| self.members.find_by_position_mut(p));
        match member {
            Some(member) => member.layout_chunk(ctx, state, result),
            None => result.finished = true,
        }
    }

    fn after_layout(
        &mut self,
        ctx: &mut LayoutContext<'_, H>,
        visible: Option<Range>,
        scrolled: i32,
    ) {
        for member in self.members.iter_mut() {
            member.after_layout(ctx, visible, scrolled);
        }
    }

    fn check_anchor_info(&mut self, ctx: &LayoutContext<'_, H>, anchor: &mut AnchorInfo) {
        if let Some(member) = self.members.find_by_position_mut(anchor.position) {
            member.check_anchor_info(ctx, anchor);
        }
    }

    fn leading_space(&self, ctx: &LayoutContext<'_, H>, position: usize) -> i32 {
        self.members
            .find_by_position(position)
            .map_or(0, |m| m.leading_space(ctx, position))
    }

    fn trailing_space(&self, ctx: &LayoutContext<'_, H>, position: usize) -> i32 {
        self.members
            .find_by_position(position)
            .map_or(0, |m| m.trailing_space(ctx, position))
    }

    fn is_recyclable(
        &self,
        ctx: &LayoutContext<'_, H>,
        position: usize,
        limit: i32,
        from_start: bool,
    ) -> bool {
        self.members
            .find_by_position(position)
            .is_none_or(|m| m.is_recyclable(ctx, position, limit, from_start))
    }

    fn on_items_changed(&mut self) {
        for member in self.members.iter_mut() {
            member.on_items_changed();
        }
    }

    fn clear(&mut self, ctx: &mut LayoutContext<'_, H>) {
        for member in self.members.iter_mut() {
            member.clear(ctx);
        }
    }
}
