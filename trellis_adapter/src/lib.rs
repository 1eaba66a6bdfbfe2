// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=trellis_adapter --heading-base-level=0

//! Trellis Adapter: several item providers behind one virtual index space.
//!
//! An [`AdapterComposer`] concatenates the items of its providers. Each
//! provider owns a contiguous slice of composed positions; a composed position
//! is resolved to its provider and local position by binary search over the
//! providers' start positions.
//!
//! View types and stable ids from different providers may collide. In
//! [`TypeMode::Paired`] the composer folds the provider's slot and the
//! provider's value into one integer with the Cantor [`pairing`] function, and
//! unfolds a composed view type to route [`AdapterComposer::create_element`]
//! back to the provider that reported it. Negative values are sentinels
//! ([`NO_ID`], [`INVALID_VIEW_TYPE`]) and pass through unchanged.
//!
//! Providers report their own changes in local positions through
//! [`AdapterComposer::notify`]. The composer re-reads the provider's item
//! count, moves the start positions of the providers after it, and forwards
//! the change to its [`ChangeObserver`] in composed positions.
//!
//! ## Minimal example
//!
//! ```rust
//! use trellis_adapter::{AdapterComposer, ItemProvider, TypeMode, pairing};
//!
//! #[derive(Debug)]
//! struct Words(Vec<&'static str>, i64);
//!
//! impl ItemProvider for Words {
//!     type Element = String;
//!     fn item_count(&self) -> usize { self.0.len() }
//!     fn create_element(&mut self, _view_type: i64) -> String { String::new() }
//!     fn bind_element(&mut self, element: &mut String, position: usize) {
//!         *element = self.0[position].to_string();
//!     }
//!     fn item_view_type(&self, _position: usize) -> i64 { self.1 }
//! }
//!
//! let mut composer = AdapterComposer::<String>::new(TypeMode::Paired);
//! composer.add_provider(Box::new(Words(vec!["a", "b", "c"], 0)));
//! let second = composer.add_provider(Box::new(Words(vec!["d", "e"], 2)));
//!
//! assert_eq!(composer.item_count(), 5);
//! assert_eq!(composer.find_provider(4), Some((1, 1)));
//!
//! let view_type = composer.item_view_type(4).unwrap();
//! assert_eq!(pairing::unpair(view_type as u64), (second, 2));
//!
//! let mut element = composer.create_element(view_type).unwrap();
//! composer.bind_element(&mut element, 4).unwrap();
//! assert_eq!(element, "e");
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

#[cfg(test)]
extern crate std;

mod composer;
mod error;
mod offsets;
pub mod pairing;
mod provider;

pub use composer::{AdapterComposer, BoxedProvider, TypeMode};
pub use error::ComposeError;
pub use provider::{AdapterChange, ChangeObserver, INVALID_VIEW_TYPE, ItemProvider, NO_ID};
