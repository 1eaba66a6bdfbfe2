// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

use smallvec::SmallVec;

use crate::geometry::{Insets, MeasureSpec};
use crate::helper::{HelperBase, LayoutContext, LayoutHelper};
use crate::helpers::row::{distribute, main_spec};
use crate::host::{ElementFlags, Host};
use crate::state::{AnchorInfo, LayoutChunkResult, LayoutState};
use crate::{LayoutError, Range};

/// Most items a [`OnePlusNLayoutHelper`] arranges.
pub const MAX_ONE_PLUS_N: usize = 5;

/// One main item on the leading side and up to four items beside it.
///
/// The main item sets the chunk's main extent. The remaining items are
/// arranged in the trailing column:
///
/// - 2 items: one beside the main item, same extent;
/// - 3 items: two stacked;
/// - 4 items: one on top, two side by side below;
/// - 5 items: a 2 by 2 grid.
///
/// Column weights split the cross extent between the main item and the
/// trailing column, row weights split the main extent between the trailing
/// rows. Both are percentages and apply to vertical lists only; horizontal
/// lists split equally.
#[derive(Clone, Debug, Default)]
pub struct OnePlusNLayoutHelper {
    base: HelperBase,
    column_weights: Vec<f32>,
    row_weights: Vec<f32>,
    aspect_ratio: Option<f32>,
}

#[derive(Copy, Clone, Debug)]
struct Slot {
    main_offset: i32,
    main_extent: i32,
    cross_offset: i32,
    cross_extent: i32,
}

impl Slot {
    const fn new(main_offset: i32, main_extent: i32, cross_offset: i32, cross_extent: i32) -> Self {
        Self {
            main_offset,
            main_extent,
            cross_offset,
            cross_extent,
        }
    }
}

impl OnePlusNLayoutHelper {
    /// A group of `item_count` items.
    ///
    /// Groups larger than [`MAX_ONE_PLUS_N`] are rejected when a range is
    /// assigned, so registering one fails with [`LayoutError::TooManyItems`].
    #[must_use]
    pub fn new(item_count: usize) -> Self {
        Self {
            base: HelperBase::new(item_count),
            ..Self::default()
        }
    }

    /// Percent of the cross extent given to the main item.
    #[must_use]
    pub fn with_column_weights(mut self, weights: impl IntoIterator<Item = f32>) -> Self {
        self.column_weights = weights.into_iter().collect();
        self
    }

    /// Percent of the main extent given to each trailing row.
    #[must_use]
    pub fn with_row_weights(mut self, weights: impl IntoIterator<Item = f32>) -> Self {
        self.row_weights = weights.into_iter().collect();
        self
    }

    /// Cross extent over main extent of the main item.
    #[must_use]
    pub fn with_aspect_ratio(mut self, ratio: f32) -> Self {
        self.aspect_ratio = (ratio > 0.0).then_some(ratio);
        self
    }

    /// Space outside the group.
    #[must_use]
    pub fn with_margin(mut self, margin: Insets) -> Self {
        self.base.set_margin(margin);
        self
    }

    /// Space between the group's edge and its items.
    #[must_use]
    pub fn with_padding(mut self, padding: Insets) -> Self {
        self.base.set_padding(padding);
        self
    }

    /// Slots for items `1..count`, relative to the chunk's main start and the
    /// trailing column.
    fn trailing_slots(
        count: usize,
        main: i32,
        width: i32,
        rows: &[i32],
    ) -> SmallVec<[Slot; MAX_ONE_PLUS_N]> {
        let mut slots = SmallVec::new();
        let top = rows.first().copied().unwrap_or(main);
        let bottom = main - top;
        let halves = distribute(width, 2, &[]);
        match count {
            0 | 1 => {}
            2 => slots.push(Slot::new(0, main, 0, width)),
            3 => {
                slots.push(Slot::new(0, top, 0, width));
                slots.push(Slot::new(top, bottom, 0, width));
            }
            4 => {
                slots.push(Slot::new(0, top, 0, width));
                slots.push(Slot::new(top, bottom, 0, halves[0]));
                slots.push(Slot::new(top, bottom, halves[0], halves[1]));
            }
            _ => {
                slots.push(Slot::new(0, top, 0, halves[0]));
                slots.push(Slot::new(0, top, halves[0], halves[1]));
                slots.push(Slot::new(top, bottom, 0, halves[0]));
                slots.push(Slot::new(top, bottom, halves[0], halves[1]));
            }
        }
        slots
    }
}

impl<H: Host> LayoutHelper<H> for OnePlusNLayoutHelper {
    fn base(&self) -> &HelperBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut HelperBase {
        &mut self.base
    }

    fn set_range(&mut self, range: Option<Range>) -> Result<(), LayoutError> {
        let item_count = self.base.item_count();
        if range.is_some() && item_count > MAX_ONE_PLUS_N {
            return Err(LayoutError::TooManyItems {
                helper: "OnePlusNLayoutHelper",
                item_count,
                max: MAX_ONE_PLUS_N,
            });
        }
        self.base.set_range(range)
    }

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
        let mut taken: SmallVec<[Option<H::Element>; MAX_ONE_PLUS_N]> =
            SmallVec::from_elem(None, range.len());
        let mut order: SmallVec<[(H::Element, usize); MAX_ONE_PLUS_N]> = SmallVec::new();
        while state.position(count).is_some_and(|p| range.contains(p)) {
            let Some((element, position)) = state.next_element(ctx) else {
                break;
            };
            taken[position - range.lower()] = Some(element);
            order.push((element, position));
        }
        let Some(&(first_taken, _)) = order.first() else {
            result.finished = true;
            return;
        };

        let (cross_origin, extent) = self.base.cross_content(ctx);
        let vertical = ctx.is_vertical();
        let columns: &[f32] = if vertical { &self.column_weights } else { &[] };
        let split = if range.len() == 1 {
            distribute(extent, 1, &[])
        } else {
            distribute(extent, 2, columns)
        };
        let leading = split[0];
        let trailing = split.get(1).copied().unwrap_or(0);

        let main_item = taken[0].unwrap_or(first_taken);
        let main = ctx
            .measure(
                main_item,
                MeasureSpec::Exactly(leading),
                main_spec(self.aspect_ratio, leading),
            )
            .main;
        let row_weights: &[f32] = if vertical { &self.row_weights } else { &[] };
        let rows = distribute(main, 2, row_weights);
        let slots = Self::trailing_slots(range.len(), main, trailing, &rows);

        let (before, after) = self.base.edge_spaces(
            ctx.axis(),
            ctx.is_reverse_layout(),
            range.lower(),
            range.upper(),
            0,
        );
        let main_start = if state.is_layout_end() {
            state.offset() + before
        } else {
            state.offset() - after - main
        };

        let mut ignore = state.is_pre_layout();
        for &(element, position) in &order {
            let local = position - range.lower();
            let slot = match local {
                0 => Slot::new(0, main, 0, leading),
                n => slots[n - 1].with_cross_shift(leading),
            };
            if local != 0 {
                ctx.measure(
                    element,
                    MeasureSpec::Exactly(slot.cross_extent),
                    MeasureSpec::Exactly(slot.main_extent),
                );
            }
            ctx.add_child(state, element, position);
            ctx.place(
                element,
                main_start + slot.main_offset,
                main_start + slot.main_offset + slot.main_extent,
                cross_origin + slot.cross_offset,
                cross_origin + slot.cross_offset + slot.cross_extent,
            );
            let flags = ctx.host().element_flags(element);
            result.focusable |= flags.contains(ElementFlags::FOCUSABLE);
            ignore &= flags.intersects(ElementFlags::REMOVED | ElementFlags::CHANGED);
        }
        result.consumed = main + before + after;
        result.ignore_consumed = ignore;
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

    fn is_recyclable(
        &self,
        ctx: &LayoutContext<'_, H>,
        _position: usize,
        limit: i32,
        from_start: bool,
    ) -> bool {
        let Some(range) = self.base.range() else {
            return true;
        };
        ctx.children()
            .filter(|(_, p)| range.contains(*p))
            .all(|(e, _)| {
                if from_start {
                    ctx.decorated_end(e) <= limit
                } else {
                    ctx.decorated_start(e) >= limit
                }
            })
    }
}

impl Slot {
    const fn with_cross_shift(mut self, shift: i32) -> Self {
        self.cross_offset += shift;
        self
    }
}
