// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;
use core::cmp::Ordering;
use core::slice;

use crate::batch::{Coalescer, ListEvent};

/// Ordering, identity, and change notifications for an [`OrderedDiffList`].
pub trait SortedCallback<T> {
    /// Sort order of the list.
    fn compare(&self, a: &T, b: &T) -> Ordering;

    /// Whether `a` and `b` represent the same item, whatever their content.
    fn are_items_same(&self, a: &T, b: &T) -> bool;

    /// Whether the same item changed in a way worth reporting.
    fn are_contents_same(&self, old: &T, new: &T) -> bool;

    /// `count` items were inserted at `position`.
    fn on_inserted(&mut self, position: usize, count: usize);

    /// `count` items starting at `position` were removed.
    fn on_removed(&mut self, position: usize, count: usize);

    /// The item at `from` is now at `to`.
    fn on_moved(&mut self, from: usize, to: usize);

    /// `count` items starting at `position` changed content.
    fn on_changed(&mut self, position: usize, count: usize);
}

/// A list kept in comparator order that reports each change it makes.
///
/// Items are compared with [`SortedCallback::compare`]. Several items may
/// compare equal; [`SortedCallback::are_items_same`] then tells them apart, so
/// adding an item that is already present updates it instead of inserting a
/// duplicate.
///
/// Between [`begin_batch`](Self::begin_batch) and
/// [`end_batch`](Self::end_batch), consecutive inserts, removals, and changes
/// of adjacent ranges are merged into one notification. Notifications of an
/// open batch are delivered only when it ends.
#[derive(Clone, Debug)]
pub struct OrderedDiffList<T, C> {
    items: Vec<T>,
    callback: C,
    batch: Option<Coalescer>,
}

impl<T, C: SortedCallback<T>> OrderedDiffList<T, C> {
    /// An empty list reporting to `callback`.
    pub fn new(callback: C) -> Self {
        Self::with_capacity(0, callback)
    }

    /// An empty list with room for `capacity` items.
    pub fn with_capacity(capacity: usize, callback: C) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            callback,
            batch: None,
        }
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the list has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The item at `index`.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Items in order.
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Items in order, as a slice.
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// The callback.
    pub fn callback(&self) -> &C {
        &self.callback
    }

    /// Mutable access to the callback.
    pub fn callback_mut(&mut self) -> &mut C {
        &mut self.callback
    }

    /// Whether a batch is open.
    pub fn is_batching(&self) -> bool {
        self.batch.is_some()
    }

    /// Starts merging notifications. Does nothing if a batch is already open.
    pub fn begin_batch(&mut self) {
        if self.batch.is_none() {
            log::trace!("batch opened");
            self.batch = Some(Coalescer::default());
        }
    }

    /// Delivers the held notification and stops merging.
    pub fn end_batch(&mut self) {
        match self.batch.take() {
            Some(mut batch) => {
                batch.flush::<T>(&mut self.callback);
                log::trace!("batch closed");
            }
            None => log::debug!("end_batch without an open batch"),
        }
    }

    /// Inserts `item` in order, or updates the present item with its identity.
    ///
    /// Returns the item's index.
    pub fn add(&mut self, item: T) -> usize {
        let run = self.equal_run(&item);
        let same = run
            .clone()
            .find(|&i| self.callback.are_items_same(&self.items[i], &item));
        if let Some(index) = same {
            let unchanged = self.callback.are_contents_same(&self.items[index], &item);
            self.items[index] = item;
            if !unchanged {
                self.emit(ListEvent::Changed {
                    position: index,
                    count: 1,
                });
            }
            return index;
        }
        let index = run.end;
        self.items.insert(index, item);
        self.emit(ListEvent::Inserted {
            position: index,
            count: 1,
        });
        index
    }

    /// Adds every item, merging the notifications as one batch.
    pub fn add_all(&mut self, items: impl IntoIterator<Item = T>) {
        let opened = !self.is_batching();
        self.begin_batch();
        for item in items {
            self.add(item);
        }
        if opened {
            self.end_batch();
        }
    }

    /// Index of the item with the identity of `item`.
    ///
    /// Only items comparing equal to `item` are searched.
    pub fn index_of(&self, item: &T) -> Option<usize> {
        self.equal_run(item)
            .find(|&i| self.callback.are_items_same(&self.items[i], item))
    }

    /// Removes the item with the identity of `item`, if present.
    pub fn remove(&mut self, item: &T) -> Option<T> {
        let index = self.index_of(item)?;
        self.remove_item_at(index)
    }

    /// Removes the item at `index`.
    pub fn remove_item_at(&mut self, index: usize) -> Option<T> {
        if index >= self.items.len() {
            return None;
        }
        let item = self.items.remove(index);
        self.emit(ListEvent::Removed {
            position: index,
            count: 1,
        });
        Some(item)
    }

    /// Replaces the item at `index`, moving it if its order changed.
    ///
    /// A content change is reported at the old index, before any move.
    /// Returns the new index.
    pub fn update_item_at(&mut self, index: usize, item: T) -> Option<usize> {
        let existing = self.items.get(index)?;
        let changed = !self.callback.are_contents_same(existing, &item);
        let stays = self.callback.compare(existing, &item) == Ordering::Equal;
        if changed {
            self.emit(ListEvent::Changed {
                position: index,
                count: 1,
            });
        }
        if stays {
            self.items[index] = item;
            return Some(index);
        }
        self.items.remove(index);
        Some(self.reinsert(index, item))
    }

    /// Moves the item at `index` to where its order now places it.
    ///
    /// For items whose sort key changed in place. Returns the new index.
    pub fn recalculate_position_of_item_at(&mut self, index: usize) -> Option<usize> {
        if index >= self.items.len() {
            return None;
        }
        let item = self.items.remove(index);
        Some(self.reinsert(index, item))
    }

    /// Removes every item.
    pub fn clear(&mut self) {
        let count = self.items.len();
        if count == 0 {
            return;
        }
        self.items.clear();
        self.emit(ListEvent::Removed { position: 0, count });
    }

    fn reinsert(&mut self, from: usize, item: T) -> usize {
        let to = self.equal_run(&item).end;
        self.items.insert(to, item);
        if from != to {
            self.emit(ListEvent::Moved { from, to });
        }
        to
    }

    /// Indices of the items comparing equal to `item`.
    fn equal_run(&self, item: &T) -> core::ops::Range<usize> {
        let start = self
            .items
            .partition_point(|x| self.callback.compare(x, item) == Ordering::Less);
        let len = self.items[start..]
            .partition_point(|x| self.callback.compare(x, item) == Ordering::Equal);
        start..start + len
    }

    fn emit(&mut self, event: ListEvent) {
        match &mut self.batch {
            Some(batch) => batch.push::<T>(event, &mut self.callback),
            None => event.dispatch::<T>(&mut self.callback),
        }
    }
}

impl<'a, T, C> IntoIterator for &'a OrderedDiffList<T, C> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
