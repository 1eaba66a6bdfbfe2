// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Configuration errors reported before any layout pass runs.

use crate::Range;

/// Errors raised while configuring ranges and layout helpers.
///
/// These are setup-time failures. Steady-state layout and scrolling never
/// return errors; they skip and log instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// A range was requested with `lower > upper`.
    #[error("invalid range: lower bound {lower} is greater than upper bound {upper}")]
    InvalidRange {
        /// Requested lower bound.
        lower: usize,
        /// Requested upper bound.
        upper: usize,
    },
    /// A helper was assigned a range whose length differs from its item count.
    #[error("helper holds {item_count} items but was assigned range {range}")]
    MismatchChildCount {
        /// Item count the helper was configured with.
        item_count: usize,
        /// The range that was about to be assigned.
        range: Range,
    },
    /// A helper was configured with more items than it can arrange.
    #[error("{helper} holds {item_count} items but arranges at most {max}")]
    TooManyItems {
        /// Name of the helper type.
        helper: &'static str,
        /// Item count the helper was configured with.
        item_count: usize,
        /// Most items the helper arranges.
        max: usize,
    },
    /// The registered helpers together hold more items than the host has.
    #[error("helpers hold {covered} items but the host has {item_count}")]
    ItemCountExceeded {
        /// Sum of the helpers' item counts.
        covered: usize,
        /// The host's item count.
        item_count: usize,
    },
}
