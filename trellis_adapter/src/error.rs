// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by the composer.

/// Errors raised when a request names a provider, position, or view type the
/// composer does not know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ComposeError {
    /// A provider index past the end of the provider list.
    #[error("provider index {index} out of bounds for {len} providers")]
    ProviderOutOfBounds {
        /// Requested index.
        index: usize,
        /// Number of registered providers.
        len: usize,
    },
    /// No registered provider has this slot.
    #[error("no provider registered with slot {slot}")]
    UnknownSlot {
        /// Requested slot.
        slot: u64,
    },
    /// A composed position past the end of the composed item space.
    #[error("position {position} out of bounds for {item_count} items")]
    PositionOutOfBounds {
        /// Requested position.
        position: usize,
        /// Composed item count.
        item_count: usize,
    },
    /// A composed view type no provider produced.
    #[error("view type {view_type} does not belong to any provider")]
    UnknownViewType {
        /// Requested view type.
        view_type: i64,
    },
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::ComposeError;

    #[test]
    fn messages_name_the_offending_values() {
        let err = ComposeError::PositionOutOfBounds {
            position: 12,
            item_count: 10,
        };
        assert_eq!(err.to_string(), "position 12 out of bounds for 10 items");
        let err = ComposeError::UnknownViewType { view_type: -1 };
        assert_eq!(
            err.to_string(),
            "view type -1 does not belong to any provider"
        );
    }
}
