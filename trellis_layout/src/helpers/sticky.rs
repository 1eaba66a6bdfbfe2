// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::Range;
use crate::geometry::MeasureSpec;
use crate::helper::{HelperBase, LayoutContext, LayoutHelper};
use crate::host::{ElementFlags, Host};
use crate::state::{LayoutChunkResult, LayoutState};

/// A single item that scrolls with the list until it reaches an edge, then
/// stays there.
///
/// While stuck, the element leaves the scrolling run and is held as a fixed
/// element at `offset` from the padded edge. It rejoins the run as soon as the
/// fill reaches its position again.
#[derive(Clone, Debug)]
pub struct StickyLayoutHelper<E> {
    base: HelperBase,
    stick_start: bool,
    offset: i32,
    stuck: Option<E>,
}

impl<E> StickyLayoutHelper<E> {
    /// A sticky item. `stick_start` selects the leading edge, otherwise the
    /// trailing edge.
    #[must_use]
    pub fn new(stick_start: bool, offset: i32) -> Self {
        Self {
            base: HelperBase::new(1),
            stick_start,
            offset,
            stuck: None,
        }
    }

    /// Whether the element sticks to the leading edge.
    #[must_use]
    pub const fn sticks_to_start(&self) -> bool {
        self.stick_start
    }
}

impl<E: Copy> StickyLayoutHelper<E> {
    /// The element currently held at the edge, if any.
    #[must_use]
    pub fn stuck_element(&self) -> Option<E> {
        self.stuck
    }
}

impl<E: Copy + Eq> StickyLayoutHelper<E> {
    fn place_stuck<H: Host<Element = E>>(&self, ctx: &mut LayoutContext<'_, H>, element: E) {
        let (cross_start, cross_extent) = self.base.cross_content(ctx);
        let main = ctx
            .measure(
                element,
                MeasureSpec::Exactly(cross_extent),
                MeasureSpec::Unspecified,
            )
            .main;
        let main_start = if self.stick_start {
            ctx.primary().start_after_padding() + self.offset
        } else {
            ctx.primary().end_after_padding() - self.offset - main
        };
        ctx.place(
            element,
            main_start,
            main_start + main,
            cross_start,
            cross_start + cross_extent,
        );
    }

    fn release<H: Host<Element = E>>(&mut self, ctx: &mut LayoutContext<'_, H>) {
        if let Some(element) = self.stuck.take() {
            ctx.recycle_fixed(element);
        }
    }
}

impl<H: Host> LayoutHelper<H> for StickyLayoutHelper<H::Element> {
    fn base(&self) -> &HelperBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut HelperBase {
        &mut self.base
    }

    fn layout_chunk(
        &mut self,
        ctx: &mut LayoutContext<'_, H>,
        state: &mut LayoutState<H::Element>,
        result: &mut LayoutChunkResult,
    ) {
        let Some(position) = state
            .position(ctx.item_count())
            .filter(|p| !self.base.is_out_of_range(*p))
        else {
            result.finished = true;
            return;
        };
        let element = match self.stuck.take() {
            Some(element) if ctx.is_fixed(element) => {
                state.skip_current();
                ctx.restore_fixed_as_child(element, position, state.is_layout_end());
                element
            }
            _ => {
                let Some((element, _)) = state.next_element(ctx) else {
                    result.finished = true;
                    return;
                };
                ctx.add_child(state, element, position);
                element
            }
        };

        let (cross_start, cross_extent) = self.base.cross_content(ctx);
        let main = ctx
            .measure(
                element,
                MeasureSpec::Exactly(cross_extent),
                MeasureSpec::Unspecified,
            )
            .main;
        let (before, after) = self.base.edge_spaces(
            ctx.axis(),
            ctx.is_reverse_layout(),
            position,
            position,
            0,
        );
        let main_start = if state.is_layout_end() {
            state.offset() + before
        } else {
            state.offset() - after - main
        };
        ctx.place(
            element,
            main_start,
            main_start + main,
            cross_start,
            cross_start + cross_extent,
        );
        result.consumed = main + before + after;
        result.focusable = ctx
            .host()
            .element_flags(element)
            .contains(ElementFlags::FOCUSABLE);
    }

    fn after_layout(
        &mut self,
        ctx: &mut LayoutContext<'_, H>,
        visible: Option<Range>,
        _scrolled: i32,
    ) {
        let Some(range) = self.base.range() else {
            return;
        };
        let position = range.lower();
        if position >= ctx.item_count() {
            self.release(ctx);
            return;
        }
        // Whether the positions before this item lie toward the sticking edge.
        let earlier_at_edge = self.stick_start != ctx.is_reverse_layout();

        if let Some(element) = self.stuck {
            // The run moved back past the item's own place: it no longer sticks.
            let behind = visible.is_some_and(|v| {
                if earlier_at_edge {
                    v.upper() < position
                } else {
                    v.lower() > position
                }
            });
            if behind {
                log::trace!("sticky item {position} released");
                self.release(ctx);
            } else {
                self.place_stuck(ctx, element);
            }
            return;
        }

        if let Some(element) = ctx.find_child(position) {
            let passed = if self.stick_start {
                ctx.decorated_start(element) < ctx.primary().start_after_padding() + self.offset
            } else {
                ctx.decorated_end(element) > ctx.primary().end_after_padding() - self.offset
            };
            if passed && ctx.take_child_as_fixed(element) {
                self.stuck = Some(element);
                self.place_stuck(ctx, element);
            }
            return;
        }

        // The list jumped past the item without laying it out.
        let skipped = visible.is_some_and(|v| {
            if earlier_at_edge {
                v.lower() > position
            } else {
                v.upper() < position
            }
        });
        if skipped {
            let element = ctx.host_mut().obtain_element(position);
            ctx.attach_fixed(element);
            self.stuck = Some(element);
            self.place_stuck(ctx, element);
        }
    }

    fn clear(&mut self, ctx: &mut LayoutContext<'_, H>) {
        self.release(ctx);
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;

    use super::StickyLayoutHelper;
    use crate::helpers::LinearLayoutHelper;
    use crate::test_host::TestHost;
    use crate::{EngineConfig, LayoutEngine};

    fn setup(
        config: EngineConfig,
        extent: i32,
        before: usize,
        stick_start: bool,
    ) -> (TestHost, LayoutEngine<TestHost>) {
        let mut host = TestHost::uniform(20, extent, 100, 100);
        let mut engine = LayoutEngine::<TestHost>::new(config);
        engine
            .set_layout_helpers(
                &mut host,
                alloc::vec![
                    Box::new(LinearLayoutHelper::new(before)),
                    Box::new(StickyLayoutHelper::<u32>::new(stick_start, 0)),
                    Box::new(LinearLayoutHelper::new(19 - before)),
                ],
            )
            .unwrap();
        engine.layout(&mut host);
        (host, engine)
    }

    fn span(host: &TestHost, position: usize) -> Option<(i32, i32)> {
        host.bounds_at(position).map(|b| (b.top, b.bottom))
    }

    #[test]
    fn sticks_at_start_and_rejoins_the_flow() {
        let (mut host, mut engine) = setup(EngineConfig::vertical(), 20, 3, true);
        assert_eq!(host.bounds_at(3).map(|b| b.top), Some(60));

        assert_eq!(engine.scroll_by(&mut host, 70), 70);
        assert_eq!(host.bounds_at(3).map(|b| b.top), Some(0));
        assert_eq!(host.bounds_at(4).map(|b| b.top), Some(10));

        assert_eq!(engine.scroll_by(&mut host, 200), 200);
        assert_eq!(host.bounds_at(3).map(|b| b.top), Some(0));

        assert_eq!(engine.scroll_by(&mut host, -270), -270);
        assert_eq!(host.bounds_at(3).map(|b| b.top), Some(60));
        assert_eq!(host.bounds_at(0).map(|b| b.top), Some(0));
    }

    #[test]
    fn sticks_at_start_under_reverse_layout() {
        let config = EngineConfig::vertical().with_reverse_layout(true);
        let (mut host, mut engine) = setup(config, 30, 3, true);
        // Natural place is -20..10: pinned to the top.
        assert_eq!(span(&host, 3), Some((0, 30)));

        // Later passes keep it while the run below holds lower positions.
        assert_eq!(engine.scroll_by(&mut host, 0), 0);
        assert_eq!(span(&host, 3), Some((0, 30)));

        assert_eq!(engine.scroll_by(&mut host, -40), -40);
        assert_eq!(span(&host, 3), Some((20, 50)));

        assert_eq!(engine.scroll_by(&mut host, 40), 40);
        assert_eq!(span(&host, 3), Some((0, 30)));
        assert_eq!(span(&host, 0), Some((70, 100)));
    }

    #[test]
    fn sticks_at_end_until_reached() {
        let (mut host, mut engine) = setup(EngineConfig::vertical(), 20, 8, false);
        // Natural place is 160..180, beyond the viewport: pinned to the bottom.
        assert_eq!(span(&host, 8), Some((80, 100)));

        engine.scroll_by(&mut host, 100);
        assert_eq!(host.bounds_at(8).map(|b| b.top), Some(60));
    }

    #[test]
    fn sticks_at_end_under_reverse_layout() {
        let config = EngineConfig::vertical().with_reverse_layout(true);
        let (mut host, mut engine) = setup(config, 20, 8, false);
        // Above the viewport, away from the sticking edge.
        assert_eq!(span(&host, 8), None);

        assert_eq!(engine.scroll_by(&mut host, -100), -100);
        assert_eq!(span(&host, 8), Some((20, 40)));

        // Scrolled past the bottom edge: pinned there.
        assert_eq!(engine.scroll_by(&mut host, -100), -100);
        assert_eq!(span(&host, 8), Some((80, 100)));
    }
}
