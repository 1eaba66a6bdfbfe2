// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Built-in layout helpers.
//!
//! Each helper owns one contiguous range of positions once registered with a
//! [`LayoutEngine`](crate::LayoutEngine):
//!
//! - [`LinearLayoutHelper`]: one item per chunk, full cross extent.
//! - [`GridLayoutHelper`]: rows of a fixed span count, with custom spans.
//! - [`ColumnLayoutHelper`]: the whole range as a single row.
//! - [`OnePlusNLayoutHelper`]: one main item beside up to four others.
//! - [`FixLayoutHelper`]: one item pinned to a container corner.
//! - [`FloatLayoutHelper`]: one item floating at a movable offset.
//! - [`StickyLayoutHelper`]: one item that sticks to an edge once it reaches it.
//! - [`GroupLayoutHelper`]: nested helpers over consecutive sub-ranges.

mod column;
mod fix;
mod float;
mod grid;
mod group;
mod linear;
mod one_plus_n;
mod row;
mod sticky;

pub use column::ColumnLayoutHelper;
pub use fix::{FixAlignment, FixLayoutHelper, ShowMode};
pub use float::FloatLayoutHelper;
pub use grid::{DefaultSpanSizeLookup, GridLayoutHelper, SpanSizeLookup};
pub use group::GroupLayoutHelper;
pub use linear::LinearLayoutHelper;
pub use one_plus_n::{MAX_ONE_PLUS_N, OnePlusNLayoutHelper};
pub use sticky::StickyLayoutHelper;
