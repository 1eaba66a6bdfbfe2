// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The virtual layout engine.

mod anchor;
mod fill;
mod scroll;

use alloc::vec::Vec;
use core::fmt;

use crate::config::EngineConfig;
use crate::geometry::Axis;
use crate::helper::{ChildList, LayoutContext, LayoutHelper};
use crate::helpers::LinearLayoutHelper;
use crate::host::Host;
use crate::orientation::OrientationGeometry;
use crate::registry::{BoxedHelper, HelperRegistry};
use crate::state::{ItemDirection, LayoutDirection, LayoutState, SavedState};
use crate::{LayoutError, Range};

use anchor::PendingScroll;
use fill::Pass;

/// Lays out a window of a large item list inside a host container.
///
/// Only items that intersect the viewport (plus
/// [`EngineConfig::extra_layout_space`]) get elements. A full
/// [`layout`](Self::layout) rebuilds the window around an anchor; a
/// [`scroll_by`](Self::scroll_by) extends one edge and recycles the other.
///
/// Positions are partitioned among [`LayoutHelper`]s registered with
/// [`set_layout_helpers`](Self::set_layout_helpers). Positions no helper claims
/// are laid out one per row.
pub struct LayoutEngine<H: Host> {
    config: EngineConfig,
    registry: HelperRegistry<H>,
    fallback: LinearLayoutHelper,
    children: ChildList<H::Element>,
    pending_state: Option<SavedState>,
    pending_scroll: Option<PendingScroll>,
    snapshot: Option<SavedState>,
    nesting: usize,
    scrolled: i32,
}

impl<H: Host> fmt::Debug for LayoutEngine<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutEngine")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .field("fallback", &self.fallback)
            .field("children", &self.children)
            .field("pending_state", &self.pending_state)
            .field("pending_scroll", &self.pending_scroll)
            .field("snapshot", &self.snapshot)
            .field("nesting", &self.nesting)
            .field("scrolled", &self.scrolled)
            .finish()
    }
}

impl<H: Host> LayoutEngine<H> {
    /// Creates an engine with no helpers.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            registry: HelperRegistry::new(),
            fallback: LinearLayoutHelper::default(),
            children: ChildList::default(),
            pending_state: None,
            pending_scroll: None,
            snapshot: None,
            nesting: 0,
            scrolled: 0,
        }
    }

    /// The configuration the engine was built with.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The scroll axis.
    #[must_use]
    pub const fn axis(&self) -> Axis {
        self.config.axis
    }

    /// The registered helpers, ordered by position.
    #[must_use]
    pub fn helpers(&self) -> &HelperRegistry<H> {
        &self.registry
    }

    /// The registered helpers in paint order.
    pub fn helpers_by_z(&self) -> impl Iterator<Item = &dyn LayoutHelper<H>> + '_ {
        self.registry.iter_by_z()
    }

    /// The helper owning `position`, for reconfiguration.
    ///
    /// Changes take effect on the next layout or scroll.
    pub fn helper_for_position_mut(&mut self, position: usize) -> Option<&mut BoxedHelper<H>> {
        self.registry.find_by_position_mut(position)
    }

    /// Number of scrolling children.
    #[must_use]
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Replaces the registered helpers.
    ///
    /// Ranges are assigned in order, each helper receiving as many positions
    /// as it holds items, starting at zero. The previous helpers release the
    /// elements they attached on their own and are handed back.
    ///
    /// Helpers may hold fewer items than the host; the remaining positions
    /// use a linear fallback. Fails without touching the registry if a helper
    /// rejects its range or the helpers hold more items than the host.
    pub fn set_layout_helpers(
        &mut self,
        host: &mut H,
        mut helpers: Vec<BoxedHelper<H>>,
    ) -> Result<Vec<BoxedHelper<H>>, LayoutError> {
        let mut start = 0;
        for helper in &mut helpers {
            let count = helper.item_count();
            helper.set_range(Range::with_len(start, count))?;
            start += count;
        }
        if start > host.item_count() {
            return Err(LayoutError::ItemCountExceeded {
                covered: start,
                item_count: host.item_count(),
            });
        }
        if start < host.item_count() {
            log::debug!(
                "helpers cover {start} items, host has {}; the rest use the fallback",
                host.item_count()
            );
        }
        let mut previous = self.registry.set_helpers(helpers);
        let mut ctx = LayoutContext::new(host, &mut self.children, &self.config);
        for helper in &mut previous {
            helper.clear(&mut ctx);
        }
        log::debug!(
            "replaced {} helpers with {}",
            previous.len(),
            self.registry.len()
        );
        Ok(previous)
    }

    /// Runs `f` as one operation: helper hooks fire once around all of it.
    ///
    /// Batches nest; only the outermost one fires hooks.
    pub fn batch<R>(&mut self, host: &mut H, f: impl FnOnce(&mut Self, &mut H) -> R) -> R {
        self.enter(host);
        let out = f(self, host);
        self.exit(host);
        out
    }

    /// Rebuilds the window around the anchor.
    ///
    /// # Panics
    ///
    /// Panics if helpers keep moving the anchor so that it never settles,
    /// which is a bug in a helper's
    /// [`check_anchor_info`](LayoutHelper::check_anchor_info).
    pub fn layout(&mut self, host: &mut H) {
        self.enter(host);
        self.layout_pass(host);
        self.exit(host);
    }

    /// Scrolls the content by `delta` pixels along the axis.
    ///
    /// Positive values reveal items past the trailing edge. Returns the
    /// distance actually scrolled: `delta`, or less once the data runs out.
    pub fn scroll_by(&mut self, host: &mut H, delta: i32) -> i32 {
        self.enter(host);
        let scrolled = self.pass(host).scroll(delta);
        self.scrolled += scrolled;
        self.exit(host);
        scrolled
    }

    /// Lays out items past the `direction` edge, up to a third of the
    /// viewport, until one can take focus, and returns its position.
    ///
    /// Hosts call this when focus cannot move any further among the laid-out
    /// elements. Revealed elements stay attached outside the viewport until a
    /// scroll or layout recycles them. Returns `None` if no item past the edge
    /// can take focus within that distance.
    pub fn reveal_focusable(&mut self, host: &mut H, direction: LayoutDirection) -> Option<usize> {
        self.enter(host);
        let found = self.pass(host).reveal_focusable(direction);
        self.exit(host);
        found
    }

    /// Lays out with `position` at the controlling edge.
    pub fn scroll_to_position(&mut self, host: &mut H, position: usize) {
        self.scroll_to_position_with_offset(host, position, 0);
    }

    /// Lays out with `position` `offset` pixels inside the controlling edge.
    ///
    /// The controlling edge is the trailing one when laying out from the end.
    pub fn scroll_to_position_with_offset(&mut self, host: &mut H, position: usize, offset: i32) {
        if position >= host.item_count() {
            log::warn!(
                "cannot scroll to {position}: only {} items",
                host.item_count()
            );
            return;
        }
        self.pending_state = None;
        self.pending_scroll = Some(PendingScroll { position, offset });
        self.layout(host);
    }

    /// The scroll position as of the last operation, or `None` if nothing
    /// is laid out.
    ///
    /// Records the child nearest the controlling edge and its distance from
    /// that edge, so that a [`restore_state`](Self::restore_state) followed by
    /// a layout reproduces the same placement. A state restored but not yet
    /// laid out is returned as is.
    #[must_use]
    pub fn save_state(&self) -> Option<SavedState> {
        self.pending_state.or(self.snapshot)
    }

    /// Applies `state` on the next layout. Ignored if it no longer fits the data.
    pub fn restore_state(&mut self, state: SavedState) {
        self.pending_scroll = None;
        self.pending_state = Some(state);
    }

    /// Smallest position with an element intersecting the padded viewport.
    #[must_use]
    pub fn first_visible_position(&self, host: &H) -> Option<usize> {
        self.visible_positions(host, false).min()
    }

    /// Largest position with an element intersecting the padded viewport.
    #[must_use]
    pub fn last_visible_position(&self, host: &H) -> Option<usize> {
        self.visible_positions(host, false).max()
    }

    /// Smallest position with an element entirely inside the padded viewport.
    #[must_use]
    pub fn first_completely_visible_position(&self, host: &H) -> Option<usize> {
        self.visible_positions(host, true).min()
    }

    /// Largest position with an element entirely inside the padded viewport.
    #[must_use]
    pub fn last_completely_visible_position(&self, host: &H) -> Option<usize> {
        self.visible_positions(host, true).max()
    }

    /// Drops caches that depend on the data; call before laying out changed data.
    pub fn notify_items_changed(&mut self) {
        for helper in self.registry.iter_mut() {
            helper.on_items_changed();
        }
    }

    /// Returns every element to the host.
    pub fn recycle_all(&mut self, host: &mut H) {
        let mut pass = self.pass(host);
        pass.recycle_children();
        for helper in pass.registry.iter_mut() {
            helper.clear(&mut pass.ctx);
        }
        self.snapshot = None;
    }

    fn visible_positions<'a>(
        &'a self,
        host: &'a H,
        complete: bool,
    ) -> impl Iterator<Item = usize> + 'a {
        let geometry = OrientationGeometry::for_host(host, self.config.axis);
        let (low, high) = (geometry.start_after_padding(), geometry.end_after_padding());
        self.children.iter().filter_map(move |(element, position)| {
            let start = geometry.decorated_start(host, element);
            let end = geometry.decorated_end(host, element);
            let visible = if complete {
                start >= low && end <= high
            } else {
                end > low && start < high
            };
            visible.then_some(position)
        })
    }

    fn pass<'a>(&'a mut self, host: &'a mut H) -> Pass<'a, H> {
        Pass {
            ctx: LayoutContext::new(host, &mut self.children, &self.config),
            registry: &mut self.registry,
            fallback: &mut self.fallback,
        }
    }

    fn layout_pass(&mut self, host: &mut H) {
        let saved = self.pending_state.take();
        let pending = self.pending_scroll.take();
        let extra = self.config.extra_layout_space;
        let reverse = self.config.reverse_layout;
        let mut pass = self.pass(host);
        if pass.ctx.item_count() == 0 {
            pass.recycle_children();
            log::debug!("no items; window cleared");
            return;
        }

        let anchor = pass.resolve_anchor(saved, pending);
        log::debug!("layout around {anchor:?}");
        let mut state = LayoutState {
            pre_layout: pass.ctx.host().is_pre_layout(),
            extra,
            ..LayoutState::default()
        };
        pass.scrap_children(&mut state);

        let (first, second) = if anchor.layout_from_end {
            (LayoutDirection::Start, LayoutDirection::End)
        } else {
            (LayoutDirection::End, LayoutDirection::Start)
        };
        let position = anchor.position as isize;
        pass.aim(&mut state, first, position, anchor.coordinate);
        pass.fill(&mut state);
        // Space the first pass could not use goes to the other side.
        let leftover = state.available.max(0);
        let step = ItemDirection::for_layout(second, reverse).step();
        pass.aim(&mut state, second, position + step, anchor.coordinate);
        state.extra = extra + leftover;
        pass.fill(&mut state);
        pass.recycle_scrap(&mut state);

        if anchor.layout_from_end {
            pass.fix_end_gap();
            pass.fix_start_gap();
        } else {
            pass.fix_start_gap();
            pass.fix_end_gap();
        }
        log::trace!("laid out {} children", pass.ctx.child_count());
    }

    fn enter(&mut self, host: &mut H) {
        self.nesting += 1;
        if self.nesting > 1 {
            return;
        }
        self.scrolled = 0;
        let mut pass = self.pass(host);
        for helper in pass.registry.iter_mut().rev() {
            helper.before_layout(&mut pass.ctx);
        }
    }

    fn exit(&mut self, host: &mut H) {
        self.nesting = self.nesting.saturating_sub(1);
        if self.nesting > 0 {
            return;
        }
        let scrolled = core::mem::take(&mut self.scrolled);
        let mut pass = self.pass(host);
        let visible = pass.visible_range();
        for helper in pass.registry.iter_mut() {
            helper.after_layout(&mut pass.ctx, visible, scrolled);
        }
        let snapshot = pass.snapshot();
        self.snapshot = snapshot;
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    use proptest::prelude::*;

    use super::LayoutEngine;
    use crate::geometry::{Bounds, Insets};
    use crate::helper::{HelperBase, LayoutContext, LayoutHelper};
    use crate::helpers::{GridLayoutHelper, LinearLayoutHelper};
    use crate::registry::BoxedHelper;
    use crate::state::{AnchorInfo, LayoutChunkResult, LayoutDirection, LayoutState, SavedState};
    use crate::test_host::TestHost;
    use crate::{EngineConfig, LayoutError, Range};

    fn laid_out(host: &mut TestHost, config: EngineConfig) -> LayoutEngine<TestHost> {
        let mut engine = LayoutEngine::<TestHost>::new(config);
        engine.layout(host);
        engine
    }

    fn tops(host: &TestHost) -> Vec<(usize, i32)> {
        let mut tops: Vec<_> = host
            .attached_positions()
            .into_iter()
            .filter_map(|p| host.bounds_at(p).map(|b| (p, b.top)))
            .collect();
        tops.sort_unstable();
        tops
    }

    #[test]
    fn fills_exactly_the_viewport() {
        let mut host = TestHost::uniform(100, 10, 100, 100);
        let engine = laid_out(&mut host, EngineConfig::vertical());
        assert_eq!(host.attached_positions(), (0..10).collect::<Vec<_>>());
        assert_eq!(host.created, 10);
        assert_eq!(engine.first_visible_position(&host), Some(0));
        assert_eq!(engine.last_completely_visible_position(&host), Some(9));
        assert_eq!(engine.save_state(), Some(SavedState {
            anchor_position: 0,
            anchor_offset: 0,
            layout_from_end: false,
        }));
    }

    #[test]
    fn relayout_reuses_elements() {
        let mut host = TestHost::uniform(100, 10, 100, 100);
        let mut engine = laid_out(&mut host, EngineConfig::vertical());
        engine.scroll_by(&mut host, 25);
        let before = tops(&host);
        let created = host.created;
        engine.layout(&mut host);
        assert_eq!(tops(&host), before);
        assert_eq!(host.created, created);
    }

    #[test]
    fn scrolling_recycles_from_the_hidden_edge() {
        let mut host = TestHost::uniform(100, 10, 100, 100);
        let mut engine = laid_out(&mut host, EngineConfig::vertical());
        assert_eq!(engine.scroll_by(&mut host, 35), 35);
        assert_eq!(host.attached_positions(), (3..14).collect::<Vec<_>>());
        assert_eq!(host.bounds_at(3), Some(Bounds::new(0, -5, 100, 5)));
        assert_eq!(host.bounds_at(13), Some(Bounds::new(0, 95, 100, 105)));
        assert_eq!(host.recycled, 3);
        assert_eq!(engine.first_visible_position(&host), Some(3));
        assert_eq!(engine.first_completely_visible_position(&host), Some(4));

        assert_eq!(engine.scroll_by(&mut host, -35), -35);
        assert_eq!(host.attached_positions(), (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn recycle_offset_keeps_elements_longer() {
        let mut host = TestHost::uniform(100, 10, 100, 100);
        let mut engine = laid_out(&mut host, EngineConfig::vertical().with_recycle_offset(20));
        engine.scroll_by(&mut host, 35);
        assert_eq!(host.attached_positions().first(), Some(&1));
    }

    #[test]
    fn scrolling_stops_at_the_data_edges() {
        let mut host = TestHost::uniform(100, 10, 100, 100);
        let mut engine = laid_out(&mut host, EngineConfig::vertical());
        assert_eq!(engine.scroll_by(&mut host, -50), 0);
        assert_eq!(engine.scroll_by(&mut host, 2000), 900);
        assert_eq!(engine.last_visible_position(&host), Some(99));
        assert_eq!(host.bounds_at(99).map(|b| b.bottom), Some(100));
        assert_eq!(engine.scroll_by(&mut host, 10), 0);
        assert_eq!(engine.scroll_by(&mut host, 0), 0);
    }

    #[test]
    fn short_lists_do_not_scroll() {
        let mut host = TestHost::uniform(3, 10, 100, 100);
        let mut engine = laid_out(&mut host, EngineConfig::vertical());
        assert_eq!(engine.scroll_by(&mut host, 40), 0);
        assert_eq!(engine.scroll_by(&mut host, -40), 0);
        assert_eq!(tops(&host), [(0, 0), (1, 10), (2, 20)]);
    }

    #[test]
    fn stack_from_end_anchors_at_the_bottom() {
        let mut host = TestHost::uniform(3, 10, 100, 100);
        let engine = laid_out(&mut host, EngineConfig::vertical().with_stack_from_end(true));
        assert_eq!(tops(&host), [(0, 70), (1, 80), (2, 90)]);
        assert_eq!(engine.save_state().map(|s| s.layout_from_end), Some(true));
    }

    #[test]
    fn reverse_layout_grows_upward() {
        let mut host = TestHost::uniform(50, 10, 100, 100);
        let mut engine = laid_out(&mut host, EngineConfig::vertical().with_reverse_layout(true));
        assert_eq!(host.bounds_at(0), Some(Bounds::new(0, 90, 100, 100)));
        assert_eq!(host.bounds_at(9), Some(Bounds::new(0, 0, 100, 10)));
        // Visual order is still top to bottom.
        assert_eq!(host.attached_positions(), (0..10).rev().collect::<Vec<_>>());

        assert_eq!(engine.scroll_by(&mut host, -20), -20);
        assert_eq!(host.bounds_at(11).map(|b| b.top), Some(0));
        assert_eq!(host.bounds_at(2).map(|b| b.bottom), Some(100));
        assert_eq!(engine.scroll_by(&mut host, 40), 20);
    }

    #[test]
    fn extra_layout_space_lays_out_beyond_the_viewport() {
        let mut host = TestHost::uniform(100, 10, 100, 100);
        laid_out(&mut host, EngineConfig::vertical().with_extra_layout_space(20));
        assert_eq!(host.attached_positions(), (0..12).collect::<Vec<_>>());
    }

    #[test]
    fn scroll_to_position_aligns_and_fills_gaps() {
        let mut host = TestHost::uniform(100, 10, 100, 100);
        let mut engine = laid_out(&mut host, EngineConfig::vertical());
        engine.scroll_to_position(&mut host, 50);
        assert_eq!(engine.first_visible_position(&host), Some(50));
        assert_eq!(host.bounds_at(50).map(|b| b.top), Some(0));

        engine.scroll_to_position_with_offset(&mut host, 40, 15);
        assert_eq!(host.bounds_at(40).map(|b| b.top), Some(15));
        assert_eq!(engine.first_visible_position(&host), Some(38));

        // The last item cannot sit at the top: the end gap is closed.
        engine.scroll_to_position(&mut host, 99);
        assert_eq!(host.bounds_at(99).map(|b| b.bottom), Some(100));
        assert_eq!(engine.first_visible_position(&host), Some(90));

        engine.scroll_to_position(&mut host, 500);
        assert_eq!(engine.first_visible_position(&host), Some(90));
    }

    #[test]
    fn saved_state_restores_exact_placement() {
        let extents: Vec<i32> = (0..60).map(|i| 5 + (i * 7 % 23)).collect();
        let mut host = TestHost::new(&extents, 120, 150);
        let mut engine = laid_out(&mut host, EngineConfig::vertical());
        assert_eq!(engine.scroll_by(&mut host, 333), 333);
        let saved = engine.save_state().unwrap();

        let mut restored_host = TestHost::new(&extents, 120, 150);
        let mut restored = LayoutEngine::<TestHost>::new(EngineConfig::vertical());
        restored.restore_state(saved);
        assert_eq!(restored.save_state(), Some(saved));
        restored.layout(&mut restored_host);
        assert_eq!(tops(&restored_host), tops(&host));
        assert_eq!(restored.save_state(), Some(saved));
    }

    fn placements(host: &TestHost) -> Vec<(usize, Bounds)> {
        let mut placements: Vec<_> = host
            .attached_positions()
            .into_iter()
            .filter_map(|p| host.bounds_at(p).map(|b| (p, b)))
            .collect();
        placements.sort_unstable_by_key(|(p, _)| *p);
        placements
    }

    /// Lays out, scrolls by `delta`, and checks that the saved state alone
    /// reproduces every placement on a fresh engine and host.
    fn assert_round_trip(
        make_host: impl Fn() -> TestHost,
        config: EngineConfig,
        make_helpers: impl Fn() -> Vec<BoxedHelper<TestHost>>,
        delta: i32,
    ) {
        let mut host = make_host();
        let mut engine = LayoutEngine::<TestHost>::new(config);
        engine.set_layout_helpers(&mut host, make_helpers()).unwrap();
        engine.layout(&mut host);
        assert_eq!(engine.scroll_by(&mut host, delta), delta);
        let saved = engine.save_state().unwrap();

        let mut restored_host = make_host();
        let mut restored = LayoutEngine::<TestHost>::new(config);
        restored
            .set_layout_helpers(&mut restored_host, make_helpers())
            .unwrap();
        restored.restore_state(saved);
        restored.layout(&mut restored_host);
        assert_eq!(placements(&restored_host), placements(&host));
    }

    fn varied_extents() -> Vec<i32> {
        (0..60).map(|i| 5 + (i * 7 % 23)).collect()
    }

    fn linear(count: usize) -> Vec<BoxedHelper<TestHost>> {
        alloc::vec![Box::new(LinearLayoutHelper::new(count))]
    }

    #[test]
    fn saved_state_round_trips_under_reverse_layout() {
        assert_round_trip(
            || TestHost::new(&varied_extents(), 120, 150),
            EngineConfig::vertical().with_reverse_layout(true),
            || linear(60),
            -333,
        );
    }

    #[test]
    fn saved_state_round_trips_when_stacked_from_end() {
        assert_round_trip(
            || TestHost::new(&varied_extents(), 120, 150),
            EngineConfig::vertical().with_stack_from_end(true),
            || linear(60),
            -333,
        );
    }

    #[test]
    fn saved_state_round_trips_horizontally_with_padding() {
        let make_host = || {
            let mut host = TestHost::new(&varied_extents(), 150, 120);
            host.horizontal = true;
            host.padding = Insets::new(6, 3, 9, 2);
            host
        };
        assert_round_trip(make_host, EngineConfig::horizontal(), || linear(60), 333);
    }

    #[test]
    fn saved_state_round_trips_across_mixed_helpers() {
        let helpers = || -> Vec<BoxedHelper<TestHost>> {
            alloc::vec![
                Box::new(LinearLayoutHelper::new(10)),
                Box::new(GridLayoutHelper::new(20, 3).with_padding(Insets::uniform(4))),
                Box::new(LinearLayoutHelper::new(10).with_padding(Insets::new(0, 7, 0, 5))),
                Box::new(LinearLayoutHelper::new(20)),
            ]
        };
        assert_round_trip(
            || TestHost::new(&varied_extents(), 120, 150),
            EngineConfig::vertical(),
            helpers,
            333,
        );
    }

    #[test]
    fn helpers_may_not_outnumber_the_items() {
        let mut host = TestHost::uniform(10, 10, 100, 100);
        let mut engine = LayoutEngine::<TestHost>::new(EngineConfig::vertical());
        let result = engine.set_layout_helpers(
            &mut host,
            alloc::vec![
                Box::new(LinearLayoutHelper::new(4)),
                Box::new(LinearLayoutHelper::new(8)),
            ],
        );
        assert!(matches!(
            result,
            Err(LayoutError::ItemCountExceeded {
                covered: 12,
                item_count: 10,
            })
        ));
        assert!(engine.helpers().is_empty());

        assert!(engine.set_layout_helpers(&mut host, linear(6)).is_ok());
        engine.layout(&mut host);
        assert_eq!(host.attached_positions().len(), 10);
    }

    #[test]
    fn reveals_the_nearest_focusable_item_past_the_edge() {
        let mut host = TestHost::uniform(100, 10, 100, 100);
        host.unfocusable = alloc::vec![10, 11];
        let mut engine = laid_out(&mut host, EngineConfig::vertical());
        assert_eq!(engine.reveal_focusable(&mut host, LayoutDirection::End), Some(12));
        assert_eq!(host.attached_positions(), (0..13).collect::<Vec<_>>());
        assert_eq!(host.bounds_at(12).map(|b| b.top), Some(120));
        assert_eq!(engine.first_visible_position(&host), Some(0));
        assert_eq!(engine.reveal_focusable(&mut host, LayoutDirection::Start), None);
    }

    #[test]
    fn focus_reveal_gives_up_after_a_third_of_the_viewport() {
        let mut host = TestHost::uniform(100, 10, 100, 100);
        host.unfocusable = (10..30).collect();
        let mut engine = laid_out(&mut host, EngineConfig::vertical());
        assert_eq!(engine.reveal_focusable(&mut host, LayoutDirection::End), None);
        assert_eq!(host.attached_positions(), (0..14).collect::<Vec<_>>());
    }

    #[test]
    fn stale_saved_state_is_ignored() {
        let mut host = TestHost::uniform(20, 10, 100, 100);
        let mut engine = LayoutEngine::<TestHost>::new(EngineConfig::vertical());
        assert_eq!(engine.save_state(), None);
        engine.restore_state(SavedState {
            anchor_position: 500,
            anchor_offset: 0,
            layout_from_end: false,
        });
        engine.layout(&mut host);
        assert_eq!(engine.first_visible_position(&host), Some(0));
    }

    #[test]
    fn focused_child_keeps_its_place() {
        let mut host = TestHost::uniform(100, 10, 100, 100);
        let mut engine = laid_out(&mut host, EngineConfig::vertical());
        engine.scroll_by(&mut host, 45);
        assert_eq!(host.bounds_at(7).map(|b| b.top), Some(25));
        host.focused = Some(7);
        for extent in &mut host.extents[4..7] {
            *extent = 20;
        }
        engine.layout(&mut host);
        assert_eq!(host.bounds_at(7).map(|b| b.top), Some(25));
        assert_eq!(host.bounds_at(6).map(|b| b.top), Some(5));
    }

    #[test]
    fn removed_items_leave_the_window() {
        let mut host = TestHost::uniform(100, 10, 100, 100);
        let mut engine = laid_out(&mut host, EngineConfig::vertical());
        engine.scroll_by(&mut host, 900);
        host.extents.truncate(5);
        engine.layout(&mut host);
        assert_eq!(host.attached_positions(), (0..5).collect::<Vec<_>>());

        host.extents.clear();
        engine.layout(&mut host);
        assert!(host.attached.is_empty(), "no items, no elements");
        assert_eq!(engine.save_state(), None);
    }

    #[test]
    fn recycle_all_returns_every_element() {
        let mut host = TestHost::uniform(100, 10, 100, 100);
        let mut engine = laid_out(&mut host, EngineConfig::vertical());
        engine.recycle_all(&mut host);
        assert!(host.attached.is_empty(), "all elements detached");
        assert_eq!(host.recycled, 10);
        assert_eq!(engine.child_count(), 0);
    }

    #[derive(Debug)]
    struct Recorder {
        inner: LinearLayoutHelper,
        log: Rc<RefCell<Vec<(&'static str, i32)>>>,
    }

    impl LayoutHelper<TestHost> for Recorder {
        fn base(&self) -> &HelperBase {
            LayoutHelper::<TestHost>::base(&self.inner)
        }

        fn base_mut(&mut self) -> &mut HelperBase {
            LayoutHelper::<TestHost>::base_mut(&mut self.inner)
        }

        fn before_layout(&mut self, _ctx: &mut LayoutContext<'_, TestHost>) {
            self.log.borrow_mut().push(("before", 0));
        }

        fn layout_chunk(
            &mut self,
            ctx: &mut LayoutContext<'_, TestHost>,
            state: &mut LayoutState<u32>,
            result: &mut LayoutChunkResult,
        ) {
            self.inner.layout_chunk(ctx, state, result);
        }

        fn after_layout(
            &mut self,
            _ctx: &mut LayoutContext<'_, TestHost>,
            _visible: Option<Range>,
            scrolled: i32,
        ) {
            self.log.borrow_mut().push(("after", scrolled));
        }
    }

    #[test]
    fn batches_fire_hooks_once() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut host = TestHost::uniform(50, 10, 100, 100);
        let mut engine = LayoutEngine::<TestHost>::new(EngineConfig::vertical());
        engine
            .set_layout_helpers(
                &mut host,
                alloc::vec![Box::new(Recorder {
                    inner: LinearLayoutHelper::new(50),
                    log: Rc::clone(&log),
                })],
            )
            .unwrap();
        engine.batch(&mut host, |engine, host| {
            engine.layout(host);
            engine.scroll_by(host, 15);
            engine.batch(host, |engine, host| engine.scroll_by(host, 5));
        });
        assert_eq!(*log.borrow(), [("before", 0), ("after", 20)]);

        log.borrow_mut().clear();
        engine.scroll_by(&mut host, -20);
        assert_eq!(*log.borrow(), [("before", 0), ("after", -20)]);
    }

    #[test]
    fn replaced_helpers_are_returned() {
        let mut host = TestHost::uniform(10, 10, 100, 100);
        let mut engine = LayoutEngine::<TestHost>::new(EngineConfig::vertical());
        engine
            .set_layout_helpers(&mut host, alloc::vec![Box::new(LinearLayoutHelper::new(10))])
            .unwrap();
        let previous = engine
            .set_layout_helpers(
                &mut host,
                alloc::vec![
                    Box::new(LinearLayoutHelper::new(4)),
                    Box::new(LinearLayoutHelper::new(6)),
                ],
            )
            .unwrap();
        assert_eq!(previous.len(), 1);
        let ranges: Vec<_> = engine.helpers().iter().map(|h| h.range()).collect();
        assert_eq!(ranges, [Range::new(0, 3).ok(), Range::new(4, 9).ok()]);
    }

    #[derive(Debug)]
    struct Stall(HelperBase);

    impl LayoutHelper<TestHost> for Stall {
        fn base(&self) -> &HelperBase {
            &self.0
        }

        fn base_mut(&mut self) -> &mut HelperBase {
            &mut self.0
        }

        fn layout_chunk(
            &mut self,
            _ctx: &mut LayoutContext<'_, TestHost>,
            _state: &mut LayoutState<u32>,
            result: &mut LayoutChunkResult,
        ) {
            result.consumed = 10;
        }
    }

    fn stalled(config: EngineConfig) -> (TestHost, LayoutEngine<TestHost>) {
        let mut host = TestHost::uniform(10, 10, 100, 100);
        let mut engine = LayoutEngine::<TestHost>::new(config);
        engine
            .set_layout_helpers(
                &mut host,
                alloc::vec![
                    Box::new(Stall(HelperBase::new(1))),
                    Box::new(LinearLayoutHelper::new(9)),
                ],
            )
            .unwrap();
        (host, engine)
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "made no progress")]
    fn zero_progress_is_a_contract_violation() {
        let (mut host, mut engine) = stalled(EngineConfig::vertical());
        engine.layout(&mut host);
    }

    #[test]
    fn zero_progress_stops_the_fill_when_unchecked() {
        let config = EngineConfig {
            check_contracts: false,
            ..EngineConfig::vertical()
        };
        let (mut host, mut engine) = stalled(config);
        engine.layout(&mut host);
        assert_eq!(engine.child_count(), 0);
    }

    #[derive(Debug)]
    struct Flip(HelperBase);

    impl LayoutHelper<TestHost> for Flip {
        fn base(&self) -> &HelperBase {
            &self.0
        }

        fn base_mut(&mut self) -> &mut HelperBase {
            &mut self.0
        }

        fn layout_chunk(
            &mut self,
            _ctx: &mut LayoutContext<'_, TestHost>,
            _state: &mut LayoutState<u32>,
            result: &mut LayoutChunkResult,
        ) {
            result.finished = true;
        }

        fn check_anchor_info(
            &mut self,
            _ctx: &LayoutContext<'_, TestHost>,
            anchor: &mut AnchorInfo,
        ) {
            anchor.position = 1 - anchor.position;
        }
    }

    #[test]
    #[should_panic(expected = "anchor did not settle")]
    fn unsettled_anchor_panics() {
        let mut host = TestHost::uniform(2, 10, 100, 100);
        let mut engine = LayoutEngine::<TestHost>::new(EngineConfig::vertical());
        engine
            .set_layout_helpers(&mut host, alloc::vec![Box::new(Flip(HelperBase::new(2)))])
            .unwrap();
        engine.layout(&mut host);
    }

    proptest! {
        #[test]
        fn window_stays_contiguous(
            extents in prop::collection::vec(0i32..40, 1..60),
            deltas in prop::collection::vec(-300i32..300, 0..12),
            reverse in any::<bool>(),
        ) {
            let mut host = TestHost::new(&extents, 100, 100);
            let config = EngineConfig::vertical().with_reverse_layout(reverse);
            let mut engine = laid_out(&mut host, config);
            for delta in deltas {
                let scrolled = engine.scroll_by(&mut host, delta);
                prop_assert!(scrolled.abs() <= delta.abs());
                prop_assert!(scrolled == 0 || scrolled.signum() == delta.signum());
                let positions = host.attached_positions();
                prop_assert!(
                    positions.windows(2).all(|w| w[1] == w[0] + 1),
                    "children not contiguous: {positions:?}"
                );
            }
        }
    }
}
