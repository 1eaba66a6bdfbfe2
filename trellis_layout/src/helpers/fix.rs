// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::geometry::{Bounds, Insets, MeasureSpec, Size};
use crate::helper::{HelperBase, LayoutContext, LayoutHelper};
use crate::host::Host;
use crate::state::{LayoutChunkResult, LayoutState};
use crate::Range;

/// Corner of the container a [`FixLayoutHelper`] pins its element to.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum FixAlignment {
    /// Top-left corner.
    #[default]
    TopLeft,
    /// Top-right corner.
    TopRight,
    /// Bottom-left corner.
    BottomLeft,
    /// Bottom-right corner.
    BottomRight,
}

/// When a [`FixLayoutHelper`] shows its element.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ShowMode {
    /// Always.
    #[default]
    Always,
    /// Once the list has reached the helper's position.
    OnEnter,
    /// Once the helper's position has scrolled past the leading edge.
    OnLeave,
}

impl ShowMode {
    fn should_show(self, position: usize, visible: Option<Range>) -> bool {
        match self {
            Self::Always => true,
            Self::OnEnter => visible.is_some_and(|v| v.upper() >= position),
            Self::OnLeave => visible.is_some_and(|v| v.lower() > position),
        }
    }
}

/// The element a fixed-style helper keeps outside the scrolling run.
#[derive(Clone, Debug)]
pub(crate) struct FixedSlot<E> {
    element: Option<(E, usize)>,
}

impl<E> Default for FixedSlot<E> {
    fn default() -> Self {
        Self { element: None }
    }
}

impl<E: Copy + Eq> FixedSlot<E> {
    pub(crate) fn element(&self) -> Option<E> {
        self.element.map(|(e, _)| e)
    }

    /// Attaches an element for `position` if none is held, and unhides it.
    pub(crate) fn show<H: Host<Element = E>>(
        &mut self,
        ctx: &mut LayoutContext<'_, H>,
        position: usize,
    ) -> E {
        match self.element {
            Some((element, held)) if held == position && ctx.is_fixed(element) => {
                ctx.set_hidden(element, false);
                element
            }
            stale => {
                if let Some((element, _)) = stale {
                    ctx.recycle_fixed(element);
                }
                let element = ctx.host_mut().obtain_element(position);
                ctx.attach_fixed(element);
                self.element = Some((element, position));
                element
            }
        }
    }

    pub(crate) fn hide<H: Host<Element = E>>(&self, ctx: &mut LayoutContext<'_, H>) {
        if let Some((element, _)) = self.element {
            ctx.set_hidden(element, true);
        }
    }

    pub(crate) fn release<H: Host<Element = E>>(&mut self, ctx: &mut LayoutContext<'_, H>) {
        if let Some((element, _)) = self.element.take() {
            ctx.recycle_fixed(element);
        }
    }
}

/// Natural size of a fixed element, limited to the container.
pub(crate) fn measure_fixed<H: Host>(ctx: &mut LayoutContext<'_, H>, element: H::Element) -> Size {
    let main = ctx.primary().total_space();
    let cross = ctx.secondary().total_space();
    let axis = ctx.axis();
    ctx.measure(element, MeasureSpec::AtMost(cross), MeasureSpec::AtMost(main))
        .to_size(axis)
}

/// A single item pinned to a corner of the container.
///
/// The item consumes its index without taking space in the flow. Its element
/// is attached outside the scrolling run, so scrolling never moves or
/// recycles it; it is released when the helper is cleared.
#[derive(Clone, Debug)]
pub struct FixLayoutHelper<E> {
    base: HelperBase,
    alignment: FixAlignment,
    x_offset: i32,
    y_offset: i32,
    show_mode: ShowMode,
    slot: FixedSlot<E>,
}

impl<E> FixLayoutHelper<E> {
    /// A helper pinning one item to `alignment`, moved inward by the offsets.
    #[must_use]
    pub fn new(alignment: FixAlignment, x_offset: i32, y_offset: i32) -> Self {
        Self {
            base: HelperBase::new(1),
            alignment,
            x_offset,
            y_offset,
            show_mode: ShowMode::Always,
            slot: FixedSlot::default(),
        }
    }

    /// Sets when the element is shown.
    #[must_use]
    pub fn with_show_mode(mut self, show_mode: ShowMode) -> Self {
        self.show_mode = show_mode;
        self
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

    /// Current show mode.
    #[must_use]
    pub const fn show_mode(&self) -> ShowMode {
        self.show_mode
    }
}

impl<E: Copy + Eq> FixLayoutHelper<E> {
    /// The attached element, if any.
    #[must_use]
    pub fn element(&self) -> Option<E> {
        self.slot.element()
    }
}

/// Consumes the current index without producing a scrolling child.
pub(crate) fn skip_fixed<E: Copy>(
    base: &HelperBase,
    item_count: usize,
    state: &mut LayoutState<E>,
    result: &mut LayoutChunkResult,
) {
    match state.position(item_count) {
        Some(p) if !base.is_out_of_range(p) => {
            state.skip_current();
            result.consumed = 0;
            result.ignore_consumed = true;
        }
        _ => result.finished = true,
    }
}

impl<H: Host> LayoutHelper<H> for FixLayoutHelper<H::Element> {
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
        visible: Option<Range>,
        _scrolled: i32,
    ) {
        let Some(range) = self.base.range() else {
            return;
        };
        let position = range.lower();
        if position >= ctx.item_count() || !self.show_mode.should_show(position, visible) {
            self.slot.hide(ctx);
            return;
        }
        let element = self.slot.show(ctx, position);
        let size = measure_fixed(ctx, element);
        let area = ctx.padded_bounds().inset(self.base.margin());
        let left = match self.alignment {
            FixAlignment::TopLeft | FixAlignment::BottomLeft => area.left + self.x_offset,
            FixAlignment::TopRight | FixAlignment::BottomRight => {
                area.right - self.x_offset - size.width
            }
        };
        let top = match self.alignment {
            FixAlignment::TopLeft | FixAlignment::TopRight => area.top + self.y_offset,
            FixAlignment::BottomLeft | FixAlignment::BottomRight => {
                area.bottom - self.y_offset - size.height
            }
        };
        ctx.place_bounds(element, Bounds::from_origin_size(left, top, size));
    }

    fn clear(&mut self, ctx: &mut LayoutContext<'_, H>) {
        self.slot.release(ctx);
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;

    use super::{FixAlignment, FixLayoutHelper, ShowMode};
    use crate::geometry::{Bounds, Insets};
    use crate::helpers::LinearLayoutHelper;
    use crate::test_host::{NATURAL_CROSS, TestHost};
    use crate::{EngineConfig, LayoutEngine};

    fn engine(host: &mut TestHost, fix: FixLayoutHelper<u32>) -> LayoutEngine<TestHost> {
        let mut engine = LayoutEngine::<TestHost>::new(EngineConfig::vertical());
        engine
            .set_layout_helpers(
                host,
                alloc::vec![
                    Box::new(LinearLayoutHelper::new(5)),
                    Box::new(fix),
                    Box::new(LinearLayoutHelper::new(14)),
                ],
            )
            .unwrap();
        engine
    }

    #[test]
    fn pinned_to_corner_and_out_of_flow() {
        let mut host = TestHost::uniform(20, 10, 200, 100);
        host.padding = Insets::uniform(4);
        let mut engine = engine(
            &mut host,
            FixLayoutHelper::new(FixAlignment::BottomRight, 6, 8),
        );
        engine.layout(&mut host);

        // Item 6 follows item 4 directly.
        assert_eq!(host.bounds_at(4).map(|b| b.bottom), Some(54));
        assert_eq!(host.bounds_at(6).map(|b| b.top), Some(54));
        let fixed = host.bounds_at(5).unwrap();
        assert_eq!(
            fixed,
            Bounds::new(190 - NATURAL_CROSS, 78, 190, 88)
        );

        engine.scroll_by(&mut host, 40);
        assert_eq!(host.bounds_at(5), Some(fixed));
    }

    #[test]
    fn show_on_leave_waits_for_the_position_to_pass() {
        let mut host = TestHost::uniform(20, 10, 200, 30);
        let mut engine = engine(
            &mut host,
            FixLayoutHelper::new(FixAlignment::TopLeft, 0, 0).with_show_mode(ShowMode::OnLeave),
        );
        engine.layout(&mut host);
        let fixed = host.attached_at(5);
        assert!(fixed.is_none_or(|e| host.is_hidden(e)));

        engine.scroll_by(&mut host, 60);
        let fixed = host.attached_at(5).unwrap();
        assert!(!host.is_hidden(fixed));
        assert_eq!(host.bounds_of(fixed).top, 0);
    }

    #[test]
    fn clear_releases_the_element() {
        let mut host = TestHost::uniform(20, 10, 200, 100);
        let mut engine = engine(&mut host, FixLayoutHelper::new(FixAlignment::TopLeft, 0, 0));
        engine.layout(&mut host);
        assert!(host.attached_at(5).is_some());
        engine.set_layout_helpers(&mut host, alloc::vec![]).unwrap();
        assert!(host.attached_at(5).is_none());
    }
}
