// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::any::Any;

use crate::Range;
use crate::geometry::{Bounds, Insets};
use crate::helper::{HelperBase, LayoutContext, LayoutHelper};
use crate::helpers::fix::{FixedSlot, measure_fixed, skip_fixed};
use crate::host::Host;
use crate::state::{LayoutChunkResult, LayoutState};

/// A single item floating above the list at a movable offset.
///
/// The host moves the element (for example while it is dragged) by calling
/// [`FloatLayoutHelper::set_offset`] and requesting a layout. The element is
/// always kept fully inside the container's padded box.
#[derive(Clone, Debug)]
pub struct FloatLayoutHelper<E> {
    base: HelperBase,
    x: i32,
    y: i32,
    slot: FixedSlot<E>,
}

impl<E> Default for FloatLayoutHelper<E> {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl<E> FloatLayoutHelper<E> {
    /// A floating item whose top-left corner starts at `(x, y)` from the padded origin.
    #[must_use]
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            base: HelperBase::new(1),
            x,
            y,
            slot: FixedSlot::default(),
        }
    }

    /// Extra distance from the container's padded edges.
    #[must_use]
    pub fn with_margin(mut self, margin: Insets) -> Self {
        self.base.set_margin(margin);
        self
    }

    /// Paint order relative to other fixed helpers.
    #[must_use]
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.base.set_z_index(z_index);
        self
    }

    /// Moves the element. Takes effect on the next layout or scroll.
    pub fn set_offset(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }

    /// Requested offset of the top-left corner.
    #[must_use]
    pub const fn offset(&self) -> (i32, i32) {
        (self.x, self.y)
    }
}

impl<E: Copy + Eq> FloatLayoutHelper<E> {
    /// The attached element, if any.
    #[must_use]
    pub fn element(&self) -> Option<E> {
        self.slot.element()
    }
}

impl<H: Host> LayoutHelper<H> for FloatLayoutHelper<H::Element>
where
    H::Element: 'static,
{
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
        skip_fixed(&self.base, ctx.item_count(), state, result);
    }

    fn after_layout(
        &mut self,
        ctx: &mut LayoutContext<'_, H>,
        _visible: Option<Range>,
        _scrolled: i32,
    ) {
        let Some(range) = self.base.range() else {
            return;
        };
        if range.lower() >= ctx.item_count() {
            self.slot.hide(ctx);
            return;
        }
        let element = self.slot.show(ctx, range.lower());
        let size = measure_fixed(ctx, element);
        let area = ctx.padded_bounds().inset(self.base.margin());
        let left = (area.left + self.x).clamp(area.left, (area.right - size.width).max(area.left));
        let top = (area.top + self.y).clamp(area.top, (area.bottom - size.height).max(area.top));
        ctx.place_bounds(element, Bounds::from_origin_size(left, top, size));
    }

    fn clear(&mut self, ctx: &mut LayoutContext<'_, H>) {
        self.slot.release(ctx);
    }

    fn as_any_mut(&mut self) -> Option<&mut dyn Any> {
        Some(self)
    }
}
