// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared row placement for the grid and column helpers.

use smallvec::SmallVec;

use crate::geometry::MeasureSpec;
use crate::helper::{HelperBase, LayoutContext};
use crate::host::{ElementFlags, Host};
use crate::state::{LayoutChunkResult, LayoutState};

pub(crate) type Widths = SmallVec<[i32; 8]>;

/// One element of a row with its cross-axis slot.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Cell<E> {
    pub(crate) element: E,
    pub(crate) position: usize,
    pub(crate) cross_start: i32,
    pub(crate) cross_extent: i32,
}

/// Splits `total` into `count` extents.
///
/// `weights` are percentages for the leading columns; a column is floored to
/// whole pixels, unweighted columns share what the weighted ones leave, and the
/// last column absorbs the rounding remainder.
#[allow(
    clippy::cast_possible_truncation,
    reason = "pixel extents are floored on purpose"
)]
pub(crate) fn distribute(total: i32, count: usize, weights: &[f32]) -> Widths {
    let mut out = Widths::new();
    if count == 0 {
        return out;
    }
    let total = total.max(0);
    let weighted: SmallVec<[Option<f32>; 8]> = (0..count)
        .map(|i| weights.get(i).copied().filter(|w| *w > 0.0))
        .collect();
    let claimed: i32 = weighted
        .iter()
        .flatten()
        .map(|w| (total as f32 * w / 100.0) as i32)
        .sum();
    let free = weighted.iter().filter(|w| w.is_none()).count();
    let share = if free > 0 {
        (total - claimed).max(0) / free as i32
    } else {
        0
    };
    let mut used = 0;
    for (i, w) in weighted.iter().enumerate() {
        let extent = if i + 1 == count {
            total - used
        } else {
            match w {
                Some(w) => (total as f32 * w / 100.0) as i32,
                None => share,
            }
        };
        let extent = extent.max(0);
        used += extent;
        out.push(extent);
    }
    out
}

/// Main-axis constraint for an item of cross extent `cross` under `aspect_ratio`
/// (cross over main for vertical lists).
#[allow(
    clippy::cast_possible_truncation,
    reason = "pixel extents are floored on purpose"
)]
pub(crate) fn main_spec(aspect_ratio: Option<f32>, cross: i32) -> MeasureSpec {
    match aspect_ratio {
        Some(ratio) if ratio > 0.0 => MeasureSpec::Exactly((cross as f32 / ratio) as i32),
        _ => MeasureSpec::Unspecified,
    }
}

/// Measures, attaches, and places one row of cells and fills `result`.
///
/// Cells arrive in the order the fill produced them. Every cell gets the row's
/// main extent, which is the largest natural extent in the row.
pub(crate) fn layout_row<H: Host>(
    ctx: &mut LayoutContext<'_, H>,
    state: &LayoutState<H::Element>,
    base: &HelperBase,
    cells: &[Cell<H::Element>],
    gap: i32,
    aspect_ratio: Option<f32>,
    result: &mut LayoutChunkResult,
) {
    let Some(first) = cells.first() else {
        result.finished = true;
        return;
    };
    let mut mains: SmallVec<[i32; 8]> = SmallVec::new();
    for cell in cells {
        let size = ctx.measure(
            cell.element,
            MeasureSpec::Exactly(cell.cross_extent),
            main_spec(aspect_ratio, cell.cross_extent),
        );
        mains.push(size.main);
    }
    let row_main = mains.iter().copied().max().unwrap_or(0);
    for (cell, main) in cells.iter().zip(&mains) {
        if *main != row_main {
            ctx.measure(
                cell.element,
                MeasureSpec::Exactly(cell.cross_extent),
                MeasureSpec::Exactly(row_main),
            );
        }
    }

    let last = cells.last().map_or(first.position, |c| c.position);
    let (before, after) = base.edge_spaces(
        ctx.axis(),
        ctx.is_reverse_layout(),
        first.position,
        last,
        gap,
    );
    let main_start = if state.is_layout_end() {
        state.offset() + before
    } else {
        state.offset() - after - row_main
    };

    let mut ignore = state.is_pre_layout();
    for cell in cells {
        ctx.add_child(state, cell.element, cell.position);
        ctx.place(
            cell.element,
            main_start,
            main_start + row_main,
            cell.cross_start,
            cell.cross_start + cell.cross_extent,
        );
        let flags = ctx.host().element_flags(cell.element);
        result.focusable |= flags.contains(ElementFlags::FOCUSABLE);
        ignore &= flags.intersects(ElementFlags::REMOVED | ElementFlags::CHANGED);
    }
    result.consumed = row_main + before + after;
    result.ignore_consumed = ignore;
}
