// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The Cantor pairing function and its inverse.
//!
//! `pair(a, b) = (a + b)(a + b + 1) / 2 + b` is a bijection between pairs of
//! non-negative integers and non-negative integers. It enumerates the pairs
//! diagonal by diagonal, so small inputs give small outputs.

/// Folds `(a, b)` into one integer, or `None` if the result does not fit.
#[must_use]
pub const fn checked_pair(a: u64, b: u64) -> Option<u64> {
    let Some(sum) = a.checked_add(b) else {
        return None;
    };
    // One of `sum` and `sum + 1` is even: halve it before multiplying.
    let Some(next) = sum.checked_add(1) else {
        return None;
    };
    let triangle = if sum % 2 == 0 {
        (sum / 2).checked_mul(next)
    } else {
        sum.checked_mul(next / 2)
    };
    match triangle {
        Some(t) => t.checked_add(b),
        None => None,
    }
}

/// Folds `(a, b)` into one integer.
///
/// # Panics
///
/// Panics if the result exceeds `u64::MAX`; use [`checked_pair`] for inputs
/// that are not known to be small.
#[must_use]
pub const fn pair(a: u64, b: u64) -> u64 {
    match checked_pair(a, b) {
        Some(z) => z,
        None => panic!("pairing overflow"),
    }
}

/// The exact inverse of [`pair`].
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    reason = "both halves of a pair are bounded by z"
)]
pub fn unpair(z: u64) -> (u64, u64) {
    // w is the diagonal: the largest w with w(w + 1) / 2 <= z.
    let w = ((8 * u128::from(z) + 1).isqrt() - 1) / 2;
    let triangle = w * (w + 1) / 2;
    let b = u128::from(z) - triangle;
    let a = w - b;
    (a as u64, b as u64)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{checked_pair, pair, unpair};

    #[test]
    fn enumerates_diagonals() {
        let firsts: alloc::vec::Vec<_> = (0..6).map(unpair).collect();
        assert_eq!(firsts, [(0, 0), (1, 0), (0, 1), (2, 0), (1, 1), (0, 2)]);
        assert_eq!(pair(1, 2), 8);
        assert_eq!(pair(2, 1), 7);
    }

    #[test]
    fn overflow_is_reported() {
        assert_eq!(checked_pair(u64::MAX, 1), None);
        assert_eq!(checked_pair(1 << 32, 1 << 32), None);
        assert!(checked_pair(1 << 31, 1 << 31).is_some(), "fits in 64 bits");
    }

    #[test]
    fn largest_value_round_trips() {
        let (a, b) = unpair(u64::MAX);
        assert_eq!(checked_pair(a, b), Some(u64::MAX));
    }

    proptest! {
        #[test]
        fn round_trip(a in 0u64..(1 << 31), b in 0u64..(1 << 31)) {
            prop_assert_eq!(unpair(pair(a, b)), (a, b));
        }

        #[test]
        fn inverse_is_exact(z in any::<u64>()) {
            let (a, b) = unpair(z);
            prop_assert_eq!(checked_pair(a, b), Some(z));
        }
    }
}
