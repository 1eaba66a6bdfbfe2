// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Position-sorted storage of layout helpers.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use crate::helper::LayoutHelper;
use crate::host::Host;

/// A boxed helper as stored by the registry.
pub type BoxedHelper<H> = Box<dyn LayoutHelper<H>>;

/// The active helpers of an engine.
///
/// Helpers are kept sorted by the lower bound of their range, with range-less
/// helpers last. A second index orders them by `z_index` for painting. Ranges
/// are assigned by the caller before registration and are assumed disjoint;
/// gaps between them are allowed.
pub struct HelperRegistry<H: Host> {
    helpers: Vec<BoxedHelper<H>>,
    z_order: Vec<usize>,
}

impl<H: Host> Default for HelperRegistry<H> {
    fn default() -> Self {
        Self {
            helpers: Vec::new(),
            z_order: Vec::new(),
        }
    }
}

impl<H: Host> fmt::Debug for HelperRegistry<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HelperRegistry")
            .field("helpers", &self.helpers)
            .field("z_order", &self.z_order)
            .finish()
    }
}

impl<H: Host> HelperRegistry<H> {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the full set and rebuilds both orderings.
    ///
    /// Returns the previous helpers in their position order.
    pub fn set_helpers(&mut self, helpers: Vec<BoxedHelper<H>>) -> Vec<BoxedHelper<H>> {
        let previous = core::mem::replace(&mut self.helpers, helpers);
        // Stable: range-less helpers keep their relative order at the end.
        self.helpers
            .sort_by_key(|h| h.range().map_or(usize::MAX, |r| r.lower()));
        self.rebuild_z_order();
        previous
    }

    fn rebuild_z_order(&mut self) {
        self.z_order.clear();
        self.z_order.extend(0..self.helpers.len());
        let helpers = &self.helpers;
        self.z_order.sort_by_key(|&i| helpers[i].z_index());
    }

    /// Removes and returns every helper.
    pub fn take_all(&mut self) -> Vec<BoxedHelper<H>> {
        self.z_order.clear();
        core::mem::take(&mut self.helpers)
    }

    /// Number of registered helpers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.helpers.len()
    }

    /// Whether no helper is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.helpers.is_empty()
    }

    /// Index in position order of the helper whose range contains `position`.
    ///
    /// Binary search over the ranged prefix; `None` when `position` falls in a
    /// gap or past the last range.
    #[must_use]
    pub fn index_of_position(&self, position: usize) -> Option<usize> {
        let after = self
            .helpers
            .partition_point(|h| h.range().is_some_and(|r| r.lower() <= position));
        let candidate = after.checked_sub(1)?;
        self.helpers[candidate]
            .range()
            .is_some_and(|r| r.contains(position))
            .then_some(candidate)
    }

    /// The helper owning `position`.
    #[must_use]
    pub fn find_by_position(&self, position: usize) -> Option<&dyn LayoutHelper<H>> {
        self.index_of_position(position).map(|i| &*self.helpers[i])
    }

    /// The helper owning `position`, mutably.
    pub fn find_by_position_mut(&mut self, position: usize) -> Option<&mut BoxedHelper<H>> {
        let index = self.index_of_position(position)?;
        self.helpers.get_mut(index)
    }

    /// Helper at `index` in position order.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&dyn LayoutHelper<H>> {
        self.helpers.get(index).map(|h| &**h)
    }

    /// Helper at `index` in position order, mutably.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut BoxedHelper<H>> {
        self.helpers.get_mut(index)
    }

    /// Helpers in position order. Reverse it for the before-layout order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &dyn LayoutHelper<H>> + '_ {
        self.helpers.iter().map(|h| &**h)
    }

    /// Helpers in decreasing position order.
    pub fn reverse_iter(&self) -> impl Iterator<Item = &dyn LayoutHelper<H>> + '_ {
        self.iter().rev()
    }

    /// Helpers in paint order (ascending `z_index`, ties in position order).
    pub fn iter_by_z(&self) -> impl Iterator<Item = &dyn LayoutHelper<H>> + '_ {
        self.z_order.iter().map(|&i| &*self.helpers[i])
    }

    /// Helpers in position order, mutably.
    pub fn iter_mut(&mut self) -> impl DoubleEndedIterator<Item = &mut BoxedHelper<H>> + '_ {
        self.helpers.iter_mut()
    }
}
