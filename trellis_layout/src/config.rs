// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Engine configuration.

use crate::geometry::Axis;

/// Construction-time settings of a [`LayoutEngine`](crate::LayoutEngine).
///
/// There is no global switch anywhere in this crate; everything that changes
/// engine behavior lives here.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Scroll axis.
    pub axis: Axis,
    /// Lay items out from the trailing edge toward the leading edge.
    pub reverse_layout: bool,
    /// Resolve the fallback anchor at the trailing edge (chat-style lists).
    pub stack_from_end: bool,
    /// Extra distance an element must travel past the edge before it is recycled.
    pub recycle_offset: i32,
    /// Extra pixels laid out beyond the viewport in each direction during a full layout.
    pub extra_layout_space: i32,
    /// Check helper contracts (zero progress, anchor convergence) and log violations.
    pub check_contracts: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            axis: Axis::Vertical,
            reverse_layout: false,
            stack_from_end: false,
            recycle_offset: 0,
            extra_layout_space: 0,
            check_contracts: cfg!(debug_assertions),
        }
    }
}

impl EngineConfig {
    /// A vertical configuration with defaults.
    #[must_use]
    pub fn vertical() -> Self {
        Self::default()
    }

    /// A horizontal configuration with defaults.
    #[must_use]
    pub fn horizontal() -> Self {
        Self {
            axis: Axis::Horizontal,
            ..Self::default()
        }
    }

    /// Sets [`EngineConfig::recycle_offset`].
    #[must_use]
    pub fn with_recycle_offset(mut self, offset: i32) -> Self {
        self.recycle_offset = offset.max(0);
        self
    }

    /// Sets [`EngineConfig::extra_layout_space`].
    #[must_use]
    pub fn with_extra_layout_space(mut self, space: i32) -> Self {
        self.extra_layout_space = space.max(0);
        self
    }

    /// Sets [`EngineConfig::stack_from_end`].
    #[must_use]
    pub fn with_stack_from_end(mut self, stack_from_end: bool) -> Self {
        self.stack_from_end = stack_from_end;
        self
    }

    /// Sets [`EngineConfig::reverse_layout`].
    #[must_use]
    pub fn with_reverse_layout(mut self, reverse: bool) -> Self {
        self.reverse_layout = reverse;
        self
    }

    /// Whether the fill runs from the trailing edge: exactly one of
    /// `reverse_layout` and `stack_from_end` is set.
    #[must_use]
    pub const fn layout_from_end(&self) -> bool {
        self.reverse_layout ^ self.stack_from_end
    }
}
