// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! List change events and their coalescing while a batch is open.

use crate::SortedCallback;

/// One change of an [`OrderedDiffList`](crate::OrderedDiffList), as a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ListEvent {
    /// `count` items were inserted at `position`.
    Inserted {
        /// First inserted index.
        position: usize,
        /// Number of inserted items.
        count: usize,
    },
    /// `count` items starting at `position` were removed.
    Removed {
        /// First removed index.
        position: usize,
        /// Number of removed items.
        count: usize,
    },
    /// The item at `from` moved to `to`.
    Moved {
        /// Index before the move.
        from: usize,
        /// Index after the move.
        to: usize,
    },
    /// `count` items starting at `position` changed content.
    Changed {
        /// First changed index.
        position: usize,
        /// Number of changed items.
        count: usize,
    },
}

impl ListEvent {
    /// Calls the matching notification of `callback`.
    pub fn dispatch<T>(self, callback: &mut (impl SortedCallback<T> + ?Sized)) {
        match self {
            Self::Inserted { position, count } => callback.on_inserted(position, count),
            Self::Removed { position, count } => callback.on_removed(position, count),
            Self::Moved { from, to } => callback.on_moved(from, to),
            Self::Changed { position, count } => callback.on_changed(position, count),
        }
    }

    /// Widens `self` to also cover `next`, if `next` directly continues it.
    fn absorb(&mut self, next: Self) -> bool {
        match (self, next) {
            (
                Self::Inserted { position, count },
                Self::Inserted {
                    position: at,
                    count: n,
                },
            ) if at >= *position && at <= *position + *count => {
                *count += n;
                true
            }
            (
                Self::Removed { position, count },
                Self::Removed {
                    position: at,
                    count: n,
                },
            ) if at <= *position && at + n >= *position => {
                *position = at;
                *count += n;
                true
            }
            (
                Self::Changed { position, count },
                Self::Changed {
                    position: at,
                    count: n,
                },
            ) if at <= *position + *count && at + n >= *position => {
                let end = (*position + *count).max(at + n);
                *position = (*position).min(at);
                *count = end - *position;
                true
            }
            _ => false,
        }
    }
}

/// Holds back the latest event so that the next one can extend it.
///
/// Moves are never merged: they flush the held event and pass straight through.
#[derive(Clone, Debug, Default)]
pub(crate) struct Coalescer {
    pending: Option<ListEvent>,
}

impl Coalescer {
    pub(crate) fn push<T>(&mut self, event: ListEvent, callback: &mut impl SortedCallback<T>) {
        if let Some(pending) = &mut self.pending
            && pending.absorb(event)
        {
            return;
        }
        self.flush::<T>(callback);
        match event {
            ListEvent::Moved { .. } => event.dispatch::<T>(callback),
            _ => self.pending = Some(event),
        }
    }

    pub(crate) fn flush<T>(&mut self, callback: &mut impl SortedCallback<T>) {
        if let Some(event) = self.pending.take() {
            event.dispatch::<T>(callback);
        }
    }
}
