// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A recording in-memory host shared by the unit tests.

use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::geometry::{Bounds, Insets, MeasureSpec, Size};
use crate::host::{ElementFlags, Host};

#[derive(Clone, Debug)]
struct ElementState {
    position: usize,
    bounds: Bounds,
    hidden: bool,
}

/// Elements are plain ids. Items have a natural main-axis extent taken from
/// `extents`; the natural cross extent is `NATURAL_CROSS`.
#[derive(Debug)]
pub(crate) struct TestHost {
    pub(crate) extents: Vec<i32>,
    pub(crate) size: Size,
    pub(crate) padding: Insets,
    pub(crate) margins: Insets,
    pub(crate) horizontal: bool,
    pub(crate) rtl: bool,
    pub(crate) focused: Option<usize>,
    /// Positions whose elements cannot take focus.
    pub(crate) unfocusable: Vec<usize>,
    pub(crate) attached: Vec<u32>,
    pub(crate) created: usize,
    pub(crate) recycled: usize,
    elements: HashMap<u32, ElementState>,
    pool: Vec<u32>,
    next_id: u32,
}

pub(crate) const NATURAL_CROSS: i32 = 40;

impl TestHost {
    pub(crate) fn new(extents: &[i32], width: i32, height: i32) -> Self {
        Self {
            extents: extents.to_vec(),
            size: Size::new(width, height),
            padding: Insets::ZERO,
            margins: Insets::ZERO,
            horizontal: false,
            rtl: false,
            focused: None,
            unfocusable: Vec::new(),
            attached: Vec::new(),
            created: 0,
            recycled: 0,
            elements: HashMap::new(),
            pool: Vec::new(),
            next_id: 1,
        }
    }

    pub(crate) fn uniform(count: usize, extent: i32, width: i32, height: i32) -> Self {
        Self::new(&alloc::vec![extent; count], width, height)
    }

    /// Creates and attaches an element with explicit bounds.
    pub(crate) fn spawn(&mut self, position: usize, bounds: Bounds) -> u32 {
        let e = self.obtain_element(position);
        self.attach_element(e, self.attached.len());
        self.layout_element(e, bounds);
        e
    }

    pub(crate) fn bounds_of(&self, element: u32) -> Bounds {
        self.elements[&element].bounds
    }

    pub(crate) fn is_hidden(&self, element: u32) -> bool {
        self.elements[&element].hidden
    }

    pub(crate) fn position_of(&self, element: u32) -> usize {
        self.elements[&element].position
    }

    /// The attached element bound to `position`, if any.
    pub(crate) fn attached_at(&self, position: usize) -> Option<u32> {
        self.attached
            .iter()
            .copied()
            .find(|e| self.elements[e].position == position)
    }

    /// Positions of attached elements, in attach order.
    pub(crate) fn attached_positions(&self) -> Vec<usize> {
        self.attached
            .iter()
            .map(|e| self.elements[e].position)
            .collect()
    }

    /// Bounds of the attached element bound to `position`.
    pub(crate) fn bounds_at(&self, position: usize) -> Option<Bounds> {
        self.attached_at(position).map(|e| self.bounds_of(e))
    }
}

impl Host for TestHost {
    type Element = u32;

    fn item_count(&self) -> usize {
        self.extents.len()
    }

    fn content_size(&self) -> Size {
        self.size
    }

    fn padding(&self) -> Insets {
        self.padding
    }

    fn is_rtl(&self) -> bool {
        self.rtl
    }

    fn obtain_element(&mut self, position: usize) -> u32 {
        let id = self.pool.pop().unwrap_or_else(|| {
            self.created += 1;
            self.next_id += 1;
            self.next_id - 1
        });
        self.elements.insert(
            id,
            ElementState {
                position,
                bounds: Bounds::ZERO,
                hidden: false,
            },
        );
        id
    }

    fn recycle_element(&mut self, element: u32) {
        assert!(
            !self.attached.contains(&element),
            "recycled element {element} is still attached"
        );
        self.recycled += 1;
        self.pool.push(element);
    }

    fn attach_element(&mut self, element: u32, index: usize) {
        assert!(
            !self.attached.contains(&element),
            "element {element} attached twice"
        );
        let index = index.min(self.attached.len());
        self.attached.insert(index, element);
    }

    fn detach_element(&mut self, element: u32) {
        self.attached.retain(|e| *e != element);
    }

    fn set_element_hidden(&mut self, element: u32, hidden: bool) {
        if let Some(state) = self.elements.get_mut(&element) {
            state.hidden = hidden;
        }
    }

    fn measure_element(&mut self, element: u32, width: MeasureSpec, height: MeasureSpec) -> Size {
        let position = self.elements[&element].position;
        let main = self.extents.get(position).copied().unwrap_or(0);
        if self.horizontal {
            Size::new(width.resolve(main), height.resolve(NATURAL_CROSS))
        } else {
            Size::new(width.resolve(NATURAL_CROSS), height.resolve(main))
        }
    }

    fn layout_element(&mut self, element: u32, bounds: Bounds) {
        if let Some(state) = self.elements.get_mut(&element) {
            state.bounds = bounds;
        }
    }

    fn element_bounds(&self, element: u32) -> Bounds {
        self.elements
            .get(&element)
            .map(|s| s.bounds)
            .unwrap_or_default()
    }

    fn element_margins(&self, _element: u32) -> Insets {
        self.margins
    }

    fn element_position(&self, element: u32) -> Option<usize> {
        let position = self.elements.get(&element)?.position;
        (position < self.extents.len()).then_some(position)
    }

    fn element_flags(&self, element: u32) -> ElementFlags {
        let position = self.element_position(element);
        let mut flags = ElementFlags::empty();
        if !position.is_some_and(|p| self.unfocusable.contains(&p)) {
            flags |= ElementFlags::FOCUSABLE;
        }
        if self.focused.is_some() && self.focused == position {
            flags |= ElementFlags::FOCUSED;
        }
        flags
    }
}
