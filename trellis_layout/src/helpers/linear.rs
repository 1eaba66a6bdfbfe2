// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::geometry::{Insets, MeasureSpec};
use crate::helper::{HelperBase, LayoutContext, LayoutHelper};
use crate::helpers::row::main_spec;
use crate::host::{ElementFlags, Host};
use crate::state::{LayoutChunkResult, LayoutState};

/// One item per chunk, stacked along the scroll axis.
///
/// Items span the full cross extent minus margin and padding. `gap` separates
/// consecutive items inside the range. A helper without a range lays out any
/// position; the engine uses one as its fallback for unclaimed positions.
#[derive(Clone, Debug, Default)]
pub struct LinearLayoutHelper {
    base: HelperBase,
    gap: i32,
    aspect_ratio: Option<f32>,
}

impl LinearLayoutHelper {
    /// A helper for `item_count` items.
    #[must_use]
    pub fn new(item_count: usize) -> Self {
        Self {
            base: HelperBase::new(item_count),
            ..Self::default()
        }
    }

    /// Space between consecutive items.
    #[must_use]
    pub fn with_gap(mut self, gap: i32) -> Self {
        self.gap = gap.max(0);
        self
    }

    /// Cross extent over main extent of every item; disables natural measurement.
    #[must_use]
    pub fn with_aspect_ratio(mut self, ratio: f32) -> Self {
        self.aspect_ratio = (ratio > 0.0).then_some(ratio);
        self
    }

    /// Space outside the range's content.
    #[must_use]
    pub fn with_margin(mut self, margin: Insets) -> Self {
        self.base.set_margin(margin);
        self
    }

    /// Space between the range's edge and its items.
    #[must_use]
    pub fn with_padding(mut self, padding: Insets) -> Self {
        self.base.set_padding(padding);
        self
    }

    /// Space between consecutive items.
    #[must_use]
    pub const fn gap(&self) -> i32 {
        self.gap
    }
}

impl<H: Host> LayoutHelper<H> for LinearLayoutHelper {
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
        let Some((element, position)) = state.next_element(ctx) else {
            result.finished = true;
            return;
        };
        let (cross_start, cross_extent) = self.base.cross_content(ctx);
        let size = ctx.measure(
            element,
            MeasureSpec::Exactly(cross_extent),
            main_spec(self.aspect_ratio, cross_extent),
        );
        let (before, after) = self.base.edge_spaces(
            ctx.axis(),
            ctx.is_reverse_layout(),
            position,
            position,
            self.gap,
        );
        let main_start = if state.is_layout_end() {
            state.offset() + before
        } else {
            state.offset() - after - size.main
        };
        ctx.add_child(state, element, position);
        ctx.place(
            element,
            main_start,
            main_start + size.main,
            cross_start,
            cross_start + cross_extent,
        );

        let flags = ctx.host().element_flags(element);
        result.consumed = size.main + before + after;
        result.ignore_consumed = state.is_pre_layout()
            && flags.intersects(ElementFlags::REMOVED | ElementFlags::CHANGED);
        result.focusable = flags.contains(ElementFlags::FOCUSABLE);
    }

    fn leading_space(&self, ctx: &LayoutContext<'_, H>, position: usize) -> i32 {
        self.base
            .edge_spaces(ctx.axis(), ctx.is_reverse_layout(), position, position, self.gap)
            .0
    }

    fn trailing_space(&self, ctx: &LayoutContext<'_, H>, position: usize) -> i32 {
        self.base
            .edge_spaces(ctx.axis(), ctx.is_reverse_layout(), position, position, self.gap)
            .1
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;

    use super::LinearLayoutHelper;
    use crate::geometry::{Bounds, Insets};
    use crate::test_host::TestHost;
    use crate::{EngineConfig, LayoutEngine};

    #[test]
    fn stacks_with_margin_padding_and_gap() {
        let mut host = TestHost::uniform(4, 10, 100, 200);
        let mut engine = LayoutEngine::<TestHost>::new(EngineConfig::vertical());
        engine
            .set_layout_helpers(
                &mut host,
                alloc::vec![Box::new(
                    LinearLayoutHelper::new(4)
                        .with_gap(2)
                        .with_margin(Insets::new(5, 3, 5, 4))
                        .with_padding(Insets::uniform(1)),
                )],
            )
            .unwrap();
        engine.layout(&mut host);

        assert_eq!(host.bounds_at(0), Some(Bounds::new(6, 4, 94, 14)));
        assert_eq!(host.bounds_at(1), Some(Bounds::new(6, 16, 94, 26)));
        assert_eq!(host.bounds_at(3), Some(Bounds::new(6, 40, 94, 50)));
    }

    #[test]
    fn aspect_ratio_fixes_main_extent() {
        let mut host = TestHost::uniform(2, 10, 100, 200);
        let mut engine = LayoutEngine::<TestHost>::new(EngineConfig::vertical());
        engine
            .set_layout_helpers(
                &mut host,
                alloc::vec![Box::new(LinearLayoutHelper::new(2).with_aspect_ratio(4.0))],
            )
            .unwrap();
        engine.layout(&mut host);
        assert_eq!(host.bounds_at(1), Some(Bounds::new(0, 25, 100, 50)));
    }

    #[test]
    fn horizontal_rtl_does_not_mirror_main_axis() {
        let mut host = TestHost::uniform(3, 30, 100, 50);
        host.horizontal = true;
        host.rtl = true;
        let mut engine = LayoutEngine::<TestHost>::new(EngineConfig::horizontal());
        engine.layout(&mut host);
        assert_eq!(host.bounds_at(1), Some(Bounds::new(30, 0, 60, 50)));
    }

    #[test]
    fn vertical_rtl_mirrors_cross_axis() {
        let mut host = TestHost::uniform(1, 10, 100, 50);
        host.rtl = true;
        let mut engine = LayoutEngine::<TestHost>::new(EngineConfig::vertical());
        engine
            .set_layout_helpers(
                &mut host,
                alloc::vec![Box::new(
                    LinearLayoutHelper::new(1).with_margin(Insets::new(10, 0, 30, 0))
                )],
            )
            .unwrap();
        engine.layout(&mut host);
        assert_eq!(host.bounds_at(0), Some(Bounds::new(30, 0, 90, 10)));
    }
}
