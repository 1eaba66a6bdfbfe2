// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Anchor resolution for full layouts.

use crate::host::{ElementFlags, Host};
use crate::state::{AnchorInfo, SavedState};

use super::fill::{Pass, owner};

/// A pending jump: target position and its offset from the controlling edge.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(super) struct PendingScroll {
    pub(super) position: usize,
    pub(super) offset: i32,
}

impl<H: Host> Pass<'_, H> {
    /// Picks the item and coordinate a full layout grows from.
    ///
    /// Sources in order: a restored state, a pending jump, the focused child,
    /// the child nearest the controlling edge, the edge of the data. Helpers
    /// may then move the anchor to a chunk boundary.
    ///
    /// `item_count` must be non-zero.
    pub(super) fn resolve_anchor(
        &mut self,
        saved: Option<SavedState>,
        pending: Option<PendingScroll>,
    ) -> AnchorInfo {
        let count = self.ctx.item_count();
        let from_end = self.ctx.config().layout_from_end();
        let primary = *self.ctx.primary();
        let at_edge = |offset: i32, from_end: bool| {
            if from_end {
                primary.end_after_padding() - offset
            } else {
                primary.start_after_padding() + offset
            }
        };

        let mut anchor = if let Some(saved) = saved.filter(|s| s.is_valid_for(count)) {
            log::debug!("anchoring on restored state {saved:?}");
            AnchorInfo {
                position: saved.anchor_position,
                coordinate: at_edge(saved.anchor_offset, saved.layout_from_end),
                layout_from_end: saved.layout_from_end,
            }
        } else if let Some(pending) = pending.filter(|p| p.position < count) {
            AnchorInfo {
                position: pending.position,
                coordinate: at_edge(pending.offset, from_end),
                layout_from_end: from_end,
            }
        } else if let Some(anchor) = self.anchor_from_children(from_end) {
            anchor
        } else {
            AnchorInfo {
                position: if self.ctx.config().stack_from_end {
                    count - 1
                } else {
                    0
                },
                coordinate: at_edge(0, from_end),
                layout_from_end: from_end,
            }
        };

        let rounds = count + 1;
        for _ in 0..rounds {
            let before = anchor.position;
            if let Some(helper) = self.registry.find_by_position_mut(before) {
                helper.check_anchor_info(&self.ctx, &mut anchor);
            }
            anchor.position = anchor.position.min(count - 1);
            if anchor.position == before {
                return anchor;
            }
        }
        let helper = owner(self.registry, self.fallback, anchor.position);
        panic!("anchor did not settle after {rounds} rounds; last moved by {helper:?}");
    }

    /// The child nearest the controlling edge and its distance from that edge.
    pub(super) fn snapshot(&self) -> Option<SavedState> {
        let primary = self.ctx.primary();
        if self.ctx.config().layout_from_end() {
            let (element, position) = self.ctx.children().next_back()?;
            Some(SavedState {
                anchor_position: position,
                anchor_offset: primary.end_after_padding() - self.chunk_end(element, position),
                layout_from_end: true,
            })
        } else {
            let (element, position) = self.ctx.children().next()?;
            Some(SavedState {
                anchor_position: position,
                anchor_offset: self.chunk_start(element, position) - primary.start_after_padding(),
                layout_from_end: false,
            })
        }
    }

    fn anchor_from_children(&self, from_end: bool) -> Option<AnchorInfo> {
        let count = self.ctx.item_count();
        let host = self.ctx.host();
        let live = |element: H::Element| {
            host.element_position(element)
                .filter(|p| {
                    *p < count && !host.element_flags(element).contains(ElementFlags::REMOVED)
                })
        };
        let focused = self.ctx.children().find_map(|(element, _)| {
            let position = live(element)?;
            host.element_flags(element)
                .contains(ElementFlags::FOCUSED)
                .then_some((element, position))
        });
        let edge = || {
            let mut live_children = self
                .ctx
                .children()
                .filter_map(|(element, _)| Some((element, live(element)?)));
            if from_end {
                live_children.next_back()
            } else {
                live_children.next()
            }
        };
        let (element, position) = focused.or_else(edge)?;
        let coordinate = if from_end {
            self.chunk_end(element, position)
        } else {
            self.chunk_start(element, position)
        };
        Some(AnchorInfo {
            position,
            coordinate,
            layout_from_end: from_end,
        })
    }
}
