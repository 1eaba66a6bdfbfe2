// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt::Debug;

use smallvec::SmallVec;

use crate::geometry::Insets;
use crate::helper::{HelperBase, LayoutContext, LayoutHelper};
use crate::helpers::row::{Cell, Widths, distribute, layout_row};
use crate::host::Host;
use crate::state::{AnchorInfo, LayoutChunkResult, LayoutState};
use crate::{LayoutError, Range};

/// Number of columns an item occupies in a [`GridLayoutHelper`].
pub trait SpanSizeLookup: Debug {
    /// Span of the item at `index`, counted from the start of the grid's range.
    ///
    /// Values are clamped to `1..=span_count`.
    fn span_size(&self, index: usize) -> usize;
}

/// Every item spans one column.
#[derive(Copy, Clone, Debug, Default)]
pub struct DefaultSpanSizeLookup;

impl SpanSizeLookup for DefaultSpanSizeLookup {
    fn span_size(&self, _index: usize) -> usize {
        1
    }
}

/// Items in rows of `span_count` columns; one row per chunk.
///
/// Rows are filled greedily in item order: an item that does not fit in the
/// remaining spans of a row starts the next one. Every item of a row gets the
/// row's main extent, which is the largest natural extent among its items.
#[derive(Debug)]
pub struct GridLayoutHelper {
    base: HelperBase,
    span_count: usize,
    lookup: Box<dyn SpanSizeLookup>,
    column_gap: i32,
    row_gap: i32,
    weights: Vec<f32>,
    auto_expand: bool,
    aspect_ratio: Option<f32>,
    /// Local index of every computed row start, ascending.
    row_starts: Vec<usize>,
    /// Local indices below this one are covered by `row_starts`.
    covered: usize,
}

impl GridLayoutHelper {
    /// A grid of `item_count` items in `span_count` columns.
    #[must_use]
    pub fn new(item_count: usize, span_count: usize) -> Self {
        Self {
            base: HelperBase::new(item_count),
            span_count: span_count.max(1),
            lookup: Box::new(DefaultSpanSizeLookup),
            column_gap: 0,
            row_gap: 0,
            weights: Vec::new(),
            auto_expand: false,
            aspect_ratio: None,
            row_starts: Vec::new(),
            covered: 0,
        }
    }

    /// Custom spans per item.
    #[must_use]
    pub fn with_span_size_lookup(mut self, lookup: impl SpanSizeLookup + 'static) -> Self {
        self.lookup = Box::new(lookup);
        self.invalidate_rows();
        self
    }

    /// Space between columns and between rows.
    #[must_use]
    pub fn with_gaps(mut self, column_gap: i32, row_gap: i32) -> Self {
        self.column_gap = column_gap.max(0);
        self.row_gap = row_gap.max(0);
        self
    }

    /// Column widths in percent, leading columns first.
    ///
    /// Applied to vertical lists only; horizontal lists split columns equally.
    #[must_use]
    pub fn with_weights(mut self, weights: impl IntoIterator<Item = f32>) -> Self {
        self.weights = weights.into_iter().collect();
        self
    }

    /// Stretch a short trailing row across the whole width.
    #[must_use]
    pub fn with_auto_expand(mut self, auto_expand: bool) -> Self {
        self.auto_expand = auto_expand;
        self
    }

    /// Cross extent over main extent of every item.
    #[must_use]
    pub fn with_aspect_ratio(mut self, ratio: f32) -> Self {
        self.aspect_ratio = (ratio > 0.0).then_some(ratio);
        self
    }

    /// Space outside the grid.
    #[must_use]
    pub fn with_margin(mut self, margin: Insets) -> Self {
        self.base.set_margin(margin);
        self
    }

    /// Space between the grid's edge and its cells.
    #[must_use]
    pub fn with_padding(mut self, padding: Insets) -> Self {
        self.base.set_padding(padding);
        self
    }

    /// Number of columns.
    #[must_use]
    pub const fn span_count(&self) -> usize {
        self.span_count
    }

    fn invalidate_rows(&mut self) {
        self.row_starts.clear();
        self.covered = 0;
    }

    fn span_of(&self, local: usize) -> usize {
        self.lookup.span_size(local).clamp(1, self.span_count)
    }

    /// End (exclusive) of the row starting at `start`.
    fn scan_row(&self, start: usize) -> usize {
        let count = self.base.item_count();
        let mut used = 0;
        let mut index = start;
        while index < count {
            let span = self.span_of(index);
            if index > start && used + span > self.span_count {
                break;
            }
            used += span;
            index += 1;
        }
        index.max(start + 1)
    }

    fn ensure_rows(&mut self, local: usize) {
        let count = self.base.item_count();
        while self.covered <= local && self.covered < count {
            let end = self.scan_row(self.covered);
            self.row_starts.push(self.covered);
            self.covered = end;
        }
    }

    /// Local bounds `(first, last)` of the row holding `local`.
    fn row_of(&self, local: usize) -> (usize, usize) {
        if local < self.covered {
            let row = self.row_starts.partition_point(|&s| s <= local) - 1;
            let start = self.row_starts[row];
            let end = self.row_starts.get(row + 1).copied().unwrap_or(self.covered);
            return (start, end - 1);
        }
        let mut start = self.row_starts.last().copied().unwrap_or(0);
        loop {
            let end = self.scan_row(start);
            if local < end {
                return (start, end - 1);
            }
            start = end;
        }
    }

    fn row_spans(&self, first: usize, last: usize) -> SmallVec<[usize; 8]> {
        (first..=last).map(|i| self.span_of(i)).collect()
    }

    #[allow(
        clippy::cast_possible_truncation,
        reason = "column counts are far below i32::MAX"
    )]
    fn column_widths<H: Host>(&self, ctx: &LayoutContext<'_, H>, columns: usize) -> Widths {
        let (_, extent) = self.base.cross_content(ctx);
        let gaps = self.column_gap * (columns as i32 - 1).max(0);
        let weights: &[f32] = if columns != self.span_count {
            &[]
        } else if ctx.is_vertical() {
            &self.weights
        } else {
            if !self.weights.is_empty() {
                log::debug!("grid weights ignored on a horizontal axis, splitting equally");
            }
            &[]
        };
        distribute(extent - gaps, columns, weights)
    }

    fn edge_spaces_for<H: Host>(&self, ctx: &LayoutContext<'_, H>, position: usize) -> (i32, i32) {
        let Some(range) = self.base.range() else {
            return (0, self.row_gap);
        };
        let (first, last) = self.row_of(position.saturating_sub(range.lower()));
        self.base.edge_spaces(
            ctx.axis(),
            ctx.is_reverse_layout(),
            range.lower() + first,
            range.lower() + last,
            self.row_gap,
        )
    }
}

impl<H: Host> LayoutHelper<H> for GridLayoutHelper {
    fn base(&self) -> &HelperBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut HelperBase {
        &mut self.base
    }

    fn set_range(&mut self, range: Option<Range>) -> Result<(), LayoutError> {
        self.invalidate_rows();
        self.base.set_range(range)
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
        let count = ctx.item_count();
        let (Some(range), Some(position)) = (self.base.range(), state.position(count)) else {
            result.finished = true;
            return;
        };
        let lower = range.lower();
        self.ensure_rows(position - lower);
        let (first, last) = self.row_of(position - lower);

        let mut taken: SmallVec<[(H::Element, usize); 8]> = SmallVec::new();
        while let Some(p) = state.position(count) {
            if p < lower + first || p > lower + last {
                break;
            }
            match state.next_element(ctx) {
                Some(item) => taken.push(item),
                None => break,
            }
        }

        let spans = self.row_spans(first, last);
        let used: usize = spans.iter().sum();
        let columns = if self.auto_expand && used < self.span_count {
            used
        } else {
            self.span_count
        };
        let widths = self.column_widths(ctx, columns);
        let (cross_origin, _) = self.base.cross_content(ctx);

        let cells: SmallVec<[Cell<H::Element>; 8]> = taken
            .iter()
            .map(|&(element, position)| {
                let local = position - lower - first;
                let column: usize = spans[..local].iter().sum();
                let span = spans[local];
                let before: i32 = widths[..column].iter().sum();
                let extent: i32 = widths[column..column + span].iter().sum();
                Cell {
                    element,
                    position,
                    cross_start: cross_origin + before + self.column_gap * column as i32,
                    cross_extent: extent + self.column_gap * (span as i32 - 1),
                }
            })
            .collect();
        layout_row(
            ctx,
            state,
            &self.base,
            &cells,
            self.row_gap,
            self.aspect_ratio,
            result,
        );
    }

    fn check_anchor_info(&mut self, ctx: &LayoutContext<'_, H>, anchor: &mut AnchorInfo) {
        let Some(range) = self.base.range() else {
            return;
        };
        if !range.contains(anchor.position) {
            return;
        }
        let local = anchor.position - range.lower();
        self.ensure_rows(local);
        let (first, last) = self.row_of(local);
        anchor.position = range.lower()
            + if anchor.layout_from_end == ctx.is_reverse_layout() {
                first
            } else {
                last
            };
    }

    fn leading_space(&self, ctx: &LayoutContext<'_, H>, position: usize) -> i32 {
        self.edge_spaces_for(ctx, position).0
    }

    fn trailing_space(&self, ctx: &LayoutContext<'_, H>, position: usize) -> i32 {
        self.edge_spaces_for(ctx, position).1
    }

    fn on_items_changed(&mut self) {
        self.invalidate_rows();
    }
}
