// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=trellis_layout --heading-base-level=0

//! Trellis Layout: an incremental virtual layout engine with range-partitioned helpers.
//!
//! A [`LayoutEngine`] keeps elements only for the items that intersect a
//! scrolling container's viewport. Scrolling lays out newly revealed items at
//! one edge and recycles the elements leaving at the other; a full layout
//! rebuilds the window around an anchor item so that the content stays put.
//!
//! The item positions `0..count` are split into contiguous ranges, each owned
//! by a [`LayoutHelper`]. A helper decides how its items are arranged:
//!
//! - [`helpers::LinearLayoutHelper`] stacks items one per row.
//! - [`helpers::GridLayoutHelper`] arranges rows of columns, with custom spans and weights.
//! - [`helpers::ColumnLayoutHelper`] and [`helpers::OnePlusNLayoutHelper`] build single-row shapes.
//! - [`helpers::FixLayoutHelper`], [`helpers::FloatLayoutHelper`], and
//!   [`helpers::StickyLayoutHelper`] keep an item in place while the rest scrolls.
//! - [`helpers::GroupLayoutHelper`] nests helpers inside one range.
//!
//! The engine does not own any visual element. The hosting container
//! implements [`Host`] and is passed into every operation; the engine asks it
//! to create, attach, measure, place, and recycle elements.
//!
//! ## Minimal example
//!
//! A header row followed by a four-column grid:
//!
//! ```rust
//! use trellis_layout::helpers::{GridLayoutHelper, LinearLayoutHelper};
//! use trellis_layout::{
//!     Bounds, EngineConfig, Host, Insets, LayoutEngine, MeasureSpec, Size,
//! };
//!
//! #[derive(Default)]
//! struct Rows {
//!     bounds: Vec<Bounds>,
//!     attached: Vec<usize>,
//! }
//!
//! impl Host for Rows {
//!     type Element = usize;
//!     fn item_count(&self) -> usize { 100 }
//!     fn content_size(&self) -> Size { Size::new(200, 100) }
//!     fn padding(&self) -> Insets { Insets::ZERO }
//!     fn obtain_element(&mut self, position: usize) -> usize { position }
//!     fn recycle_element(&mut self, _: usize) {}
//!     fn attach_element(&mut self, e: usize, index: usize) { self.attached.insert(index, e); }
//!     fn detach_element(&mut self, e: usize) { self.attached.retain(|a| *a != e); }
//!     fn set_element_hidden(&mut self, _: usize, _: bool) {}
//!     fn measure_element(&mut self, _: usize, w: MeasureSpec, h: MeasureSpec) -> Size {
//!         Size::new(w.resolve(50), h.resolve(20))
//!     }
//!     fn layout_element(&mut self, e: usize, bounds: Bounds) {
//!         if self.bounds.len() <= e { self.bounds.resize(e + 1, Bounds::ZERO); }
//!         self.bounds[e] = bounds;
//!     }
//!     fn element_bounds(&self, e: usize) -> Bounds {
//!         self.bounds.get(e).copied().unwrap_or_default()
//!     }
//!     fn element_position(&self, e: usize) -> Option<usize> { Some(e) }
//! }
//!
//! let mut host = Rows::default();
//! let mut engine = LayoutEngine::<Rows>::new(EngineConfig::vertical());
//! engine
//!     .set_layout_helpers(
//!         &mut host,
//!         vec![
//!             Box::new(LinearLayoutHelper::new(1)),
//!             Box::new(GridLayoutHelper::new(99, 4)),
//!         ],
//!     )
//!     .unwrap();
//! engine.layout(&mut host);
//!
//! assert_eq!(host.bounds[0], Bounds::new(0, 0, 200, 20));
//! assert_eq!(host.bounds[2], Bounds::new(50, 20, 100, 40));
//! assert_eq!(engine.last_visible_position(&host), Some(16));
//!
//! // The header scrolls out and is recycled.
//! assert_eq!(engine.scroll_by(&mut host, 30), 30);
//! assert_eq!(engine.first_visible_position(&host), Some(1));
//! ```
//!
//! ## Features
//!
//! - `kurbo`: conversions between the integer geometry types here and Kurbo's.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

#[cfg(test)]
extern crate std;

mod config;
mod engine;
mod error;
mod geometry;
mod helper;
pub mod helpers;
mod host;
mod orientation;
mod range;
mod registry;
mod state;

#[cfg(test)]
mod test_host;

pub use config::EngineConfig;
pub use engine::LayoutEngine;
pub use error::LayoutError;
pub use geometry::{Axis, Bounds, Insets, MeasureSpec, Size};
pub use helper::{HelperBase, LayoutContext, LayoutHelper, OrientedSize};
pub use host::{ElementFlags, Host};
pub use orientation::OrientationGeometry;
pub use range::Range;
pub use registry::{BoxedHelper, HelperRegistry};
pub use state::{
    AnchorInfo, ItemDirection, LayoutChunkResult, LayoutDirection, LayoutState, SavedState,
};
