// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The provider and observer interfaces, and the change events between them.

use core::fmt::Debug;

/// Stable id reported by items without one. Any negative id is treated alike.
pub const NO_ID: i64 = -1;

/// View type reported by items a provider cannot classify. Any negative view
/// type is treated alike.
pub const INVALID_VIEW_TYPE: i64 = -1;

/// A source of items with their own local positions `0..item_count`.
pub trait ItemProvider: Debug {
    /// The visual element type shared by every provider of one composer.
    type Element;

    /// Number of items.
    fn item_count(&self) -> usize;

    /// Creates an element for items of `view_type`, as reported by
    /// [`ItemProvider::item_view_type`].
    fn create_element(&mut self, view_type: i64) -> Self::Element;

    /// Fills `element` with the item at local `position`.
    fn bind_element(&mut self, element: &mut Self::Element, position: usize);

    /// View type of the item at local `position`. Negative values are invalid.
    fn item_view_type(&self, position: usize) -> i64 {
        let _ = position;
        0
    }

    /// Stable id of the item at local `position`, or a negative value for none.
    fn stable_id(&self, position: usize) -> i64 {
        let _ = position;
        NO_ID
    }
}

/// Receives data change notifications.
///
/// `P` is the payload type of partial item changes.
pub trait ChangeObserver<P = ()> {
    /// Anything may have changed; positions are not comparable with before.
    fn on_changed(&mut self);

    /// `count` items were inserted at `start`.
    fn on_item_range_inserted(&mut self, start: usize, count: usize);

    /// `count` items starting at `start` were removed.
    fn on_item_range_removed(&mut self, start: usize, count: usize);

    /// `count` items moved from `from` to `to`.
    fn on_item_range_moved(&mut self, from: usize, to: usize, count: usize);

    /// `count` items starting at `start` changed content.
    fn on_item_range_changed(&mut self, start: usize, count: usize, payload: Option<P>);
}

/// One change notification as a value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AdapterChange<P = ()> {
    /// See [`ChangeObserver::on_changed`].
    Changed,
    /// See [`ChangeObserver::on_item_range_inserted`].
    Inserted {
        /// First inserted position.
        start: usize,
        /// Number of inserted items.
        count: usize,
    },
    /// See [`ChangeObserver::on_item_range_removed`].
    Removed {
        /// First removed position.
        start: usize,
        /// Number of removed items.
        count: usize,
    },
    /// See [`ChangeObserver::on_item_range_moved`].
    Moved {
        /// Old position of the first moved item.
        from: usize,
        /// New position of the first moved item.
        to: usize,
        /// Number of moved items.
        count: usize,
    },
    /// See [`ChangeObserver::on_item_range_changed`].
    ItemsChanged {
        /// First changed position.
        start: usize,
        /// Number of changed items.
        count: usize,
        /// Optional description of a partial change.
        payload: Option<P>,
    },
}

impl<P> AdapterChange<P> {
    /// The same change with every position moved by `offset`.
    #[must_use]
    pub fn shifted(self, offset: usize) -> Self {
        match self {
            Self::Changed => Self::Changed,
            Self::Inserted { start, count } => Self::Inserted {
                start: start + offset,
                count,
            },
            Self::Removed { start, count } => Self::Removed {
                start: start + offset,
                count,
            },
            Self::Moved { from, to, count } => Self::Moved {
                from: from + offset,
                to: to + offset,
                count,
            },
            Self::ItemsChanged {
                start,
                count,
                payload,
            } => Self::ItemsChanged {
                start: start + offset,
                count,
                payload,
            },
        }
    }

    /// Calls the matching method of `observer`.
    pub fn dispatch(self, observer: &mut (impl ChangeObserver<P> + ?Sized)) {
        match self {
            Self::Changed => observer.on_changed(),
            Self::Inserted { start, count } => observer.on_item_range_inserted(start, count),
            Self::Removed { start, count } => observer.on_item_range_removed(start, count),
            Self::Moved { from, to, count } => observer.on_item_range_moved(from, to, count),
            Self::ItemsChanged {
                start,
                count,
                payload,
            } => observer.on_item_range_changed(start, count, payload),
        }
    }
}
