// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

use smallvec::SmallVec;

use crate::geometry::Insets;
use crate::helper::{HelperBase, LayoutContext, LayoutHelper};
use crate::helpers::row::{Cell, distribute, layout_row};
use crate::host::Host;
use crate::state::{AnchorInfo, LayoutChunkResult, LayoutState};

/// All items of the range side by side in a single row.
///
/// The whole range is one chunk, so the anchor always snaps to one of its ends.
#[derive(Clone, Debug, Default)]
pub struct ColumnLayoutHelper {
    base: HelperBase,
    gap: i32,
    weights: Vec<f32>,
    aspect_ratio: Option<f32>,
}

impl ColumnLayoutHelper {
    /// A row of `item_count` columns.
    #[must_use]
    pub fn new(item_count: usize) -> Self {
        Self {
            base: HelperBase::new(item_count),
            ..Self::default()
        }
    }

    /// Column widths in percent, leading columns first. Vertical lists only.
    #[must_use]
    pub fn with_weights(mut self, weights: impl IntoIterator<Item = f32>) -> Self {
        self.weights = weights.into_iter().collect();
        self
    }

    /// Space between columns.
    #[must_use]
    pub fn with_gap(mut self, gap: i32) -> Self {
        self.gap = gap.max(0);
        self
    }

    /// Cross extent over main extent of every column.
    #[must_use]
    pub fn with_aspect_ratio(mut self, ratio: f32) -> Self {
        self.aspect_ratio = (ratio > 0.0).then_some(ratio);
        self
    }

    /// Space outside the row.
    #[must_use]
    pub fn with_margin(mut self, margin: Insets) -> Self {
        self.base.set_margin(margin);
        self
    }

    /// Space between the row's edge and its columns.
    #[must_use]
    pub fn with_padding(mut self, padding: Insets) -> Self {
        self.base.set_padding(padding);
        self
    }
}

impl<H: Host> LayoutHelper<H> for ColumnLayoutHelper {
    fn base(&self) -> &HelperBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut HelperBase {
        &mut self.base
    }

    #[allow(
        clippy::cast_possible_truncation,
        reason = "column counts are far below i32::MAX"
    )]
    fn layout_chunk(
        &mut self,
        ctx: &mut LayoutContext<'_, H>,
        state: &mut LayoutState<H::Element>,
        result: &mut LayoutChunkResult,
    ) {
        let Some(range) = self.base.range() else {
            result.finished = true;
            return;
        };
        let count = ctx.item_count();
        let mut taken: SmallVec<[(H::Element, usize); 8]> = SmallVec::new();
        while state.position(count).is_some_and(|p| range.contains(p)) {
            match state.next_element(ctx) {
                Some(item) => taken.push(item),
                None => break,
            }
        }

        let columns = range.len();
        let (cross_origin, extent) = self.base.cross_content(ctx);
        let weights: &[f32] = if ctx.is_vertical() { &self.weights } else { &[] };
        let widths = distribute(
            extent - self.gap * (columns as i32 - 1).max(0),
            columns,
            weights,
        );
        let cells: SmallVec<[Cell<H::Element>; 8]> = taken
            .iter()
            .map(|&(element, position)| {
                let column = position - range.lower();
                let before: i32 = widths[..column].iter().sum();
                Cell {
                    element,
                    position,
                    cross_start: cross_origin + before + self.gap * column as i32,
                    cross_extent: widths[column],
                }
            })
            .collect();
        layout_row(ctx, state, &self.base, &cells, 0, self.aspect_ratio, result);
    }

    fn check_anchor_info(&mut self, ctx: &LayoutContext<'_, H>, anchor: &mut AnchorInfo) {
        if let Some(range) = self.base.range()
            && range.contains(anchor.position)
        {
            anchor.position = if anchor.layout_from_end == ctx.is_reverse_layout() {
                range.lower()
            } else {
                range.upper()
            };
        }
    }

    fn leading_space(&self, ctx: &LayoutContext<'_, H>, _position: usize) -> i32 {
        self.base.spacing().start(ctx.axis())
    }

    fn trailing_space(&self, ctx: &LayoutContext<'_, H>, _position: usize) -> i32 {
        self.base.spacing().end(ctx.axis())
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;

    use super::ColumnLayoutHelper;
    use crate::geometry::Bounds;
    use crate::helpers::LinearLayoutHelper;
    use crate::test_host::TestHost;
    use crate::{EngineConfig, LayoutEngine};

    #[test]
    fn weighted_columns_share_one_row() {
        let mut host = TestHost::new(&[10, 10, 25, 30], 301, 200);
        let mut engine = LayoutEngine::<TestHost>::new(EngineConfig::vertical());
        engine
            .set_layout_helpers(
                &mut host,
                alloc::vec![
                    Box::new(LinearLayoutHelper::new(1)),
                    Box::new(ColumnLayoutHelper::new(3).with_weights([20.0, 30.0])),
                ],
            )
            .unwrap();
        engine.layout(&mut host);
        assert_eq!(host.bounds_at(1), Some(Bounds::new(0, 10, 60, 40)));
        assert_eq!(host.bounds_at(2), Some(Bounds::new(60, 10, 150, 40)));
        assert_eq!(host.bounds_at(3), Some(Bounds::new(150, 10, 301, 40)));
    }

    #[test]
    fn anchor_inside_row_snaps_to_its_start() {
        let mut host = TestHost::uniform(10, 20, 100, 60);
        let mut engine = LayoutEngine::<TestHost>::new(EngineConfig::vertical());
        engine
            .set_layout_helpers(
                &mut host,
                alloc::vec![
                    Box::new(LinearLayoutHelper::new(4)),
                    Box::new(ColumnLayoutHelper::new(3)),
                    Box::new(LinearLayoutHelper::new(3)),
                ],
            )
            .unwrap();
        engine.scroll_to_position(&mut host, 5);
        engine.layout(&mut host);
        assert_eq!(engine.first_visible_position(&host), Some(4));
        assert_eq!(host.bounds_at(6).map(|b| b.top), Some(0));
    }
}
