// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=trellis_sorted --heading-base-level=0

//! Trellis Sorted: a comparator-ordered list that reports its own changes.
//!
//! An [`OrderedDiffList`] keeps its items sorted by a caller-supplied
//! [`SortedCallback`] and notifies the same callback of every insert, removal,
//! move, and content change, with indices valid at the time of the event.
//! Replaying the events onto a mirror of the list keeps the mirror in sync,
//! which is what a virtual list needs to animate or relayout only the affected
//! items.
//!
//! Items that compare equal are told apart by identity, so adding an item
//! whose identity is present updates it in place. Inside a batch,
//! consecutive events over adjacent ranges are merged into one.
//!
//! ## Minimal example
//!
//! ```rust
//! use core::cmp::Ordering;
//! use trellis_sorted::{ListEvent, OrderedDiffList, SortedCallback};
//!
//! #[derive(Default)]
//! struct ByLength(Vec<ListEvent>);
//!
//! impl SortedCallback<&'static str> for ByLength {
//!     fn compare(&self, a: &&str, b: &&str) -> Ordering { a.len().cmp(&b.len()) }
//!     fn are_items_same(&self, a: &&str, b: &&str) -> bool { a == b }
//!     fn are_contents_same(&self, _: &&str, _: &&str) -> bool { true }
//!     fn on_inserted(&mut self, position: usize, count: usize) {
//!         self.0.push(ListEvent::Inserted { position, count });
//!     }
//!     fn on_removed(&mut self, position: usize, count: usize) {
//!         self.0.push(ListEvent::Removed { position, count });
//!     }
//!     fn on_moved(&mut self, from: usize, to: usize) {
//!         self.0.push(ListEvent::Moved { from, to });
//!     }
//!     fn on_changed(&mut self, position: usize, count: usize) {
//!         self.0.push(ListEvent::Changed { position, count });
//!     }
//! }
//!
//! let mut list = OrderedDiffList::new(ByLength::default());
//! list.add("three");
//! list.add("one");
//! list.add_all(["four", "two"]);
//!
//! assert_eq!(list.as_slice(), ["one", "two", "four", "three"]);
//! assert_eq!(list.index_of(&"two"), Some(1));
//! assert_eq!(
//!     list.callback().0,
//!     [
//!         ListEvent::Inserted { position: 0, count: 1 },
//!         ListEvent::Inserted { position: 0, count: 1 },
//!         ListEvent::Inserted { position: 1, count: 2 },
//!     ]
//! );
//! ```
//!
//! Notifications of an open batch are held until
//! [`OrderedDiffList::end_batch`]. A batch that is never ended never delivers
//! them.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

#[cfg(test)]
extern crate std;

mod batch;
mod list;

pub use batch::ListEvent;
pub use list::{OrderedDiffList, SortedCallback};
