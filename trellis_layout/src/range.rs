// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Closed integer intervals over item indices.

use core::fmt;

use crate::LayoutError;

/// A closed interval `[lower, upper]` of item indices.
///
/// Unlike [`core::ops::Range`], both bounds are inclusive and the interval is
/// never empty: construction rejects `lower > upper`. Helpers that own no
/// items carry `Option<Range>` instead.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Range {
    lower: usize,
    upper: usize,
}

impl Range {
    /// Creates `[lower, upper]`.
    ///
    /// Returns [`LayoutError::InvalidRange`] if `lower > upper`.
    pub const fn new(lower: usize, upper: usize) -> Result<Self, LayoutError> {
        if lower > upper {
            return Err(LayoutError::InvalidRange { lower, upper });
        }
        Ok(Self { lower, upper })
    }

    /// Creates the one-element range `[value, value]`.
    #[must_use]
    pub const fn singleton(value: usize) -> Self {
        Self {
            lower: value,
            upper: value,
        }
    }

    /// Creates the range covering `count` items starting at `start`.
    ///
    /// Returns `None` when `count` is zero.
    #[must_use]
    pub const fn with_len(start: usize, count: usize) -> Option<Self> {
        if count == 0 {
            return None;
        }
        Some(Self {
            lower: start,
            upper: start + count - 1,
        })
    }

    /// Inclusive lower bound.
    #[must_use]
    pub const fn lower(&self) -> usize {
        self.lower
    }

    /// Inclusive upper bound.
    #[must_use]
    pub const fn upper(&self) -> usize {
        self.upper
    }

    /// Number of indices in the range. Always at least one.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.upper - self.lower + 1
    }

    /// Whether `value` lies inside the range.
    #[must_use]
    pub const fn contains(&self, value: usize) -> bool {
        self.lower <= value && value <= self.upper
    }

    /// Whether `other` lies entirely inside this range.
    #[must_use]
    pub const fn contains_range(&self, other: &Self) -> bool {
        self.lower <= other.lower && other.upper <= self.upper
    }

    /// The overlap of two ranges, or `None` if they are disjoint.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        if other.upper < self.lower || self.upper < other.lower {
            return None;
        }
        if self.contains_range(other) {
            return Some(*other);
        }
        if other.contains_range(self) {
            return Some(*self);
        }
        Some(Self {
            lower: self.lower.max(other.lower),
            upper: self.upper.min(other.upper),
        })
    }

    /// The smallest range covering both inputs.
    #[must_use]
    pub fn extend(&self, other: &Self) -> Self {
        if self.contains_range(other) {
            return *self;
        }
        if other.contains_range(self) {
            return *other;
        }
        Self {
            lower: self.lower.min(other.lower),
            upper: self.upper.max(other.upper),
        }
    }

    /// The smallest range covering this range and `value`.
    #[must_use]
    pub fn extend_to(&self, value: usize) -> Self {
        self.extend(&Self::singleton(value))
    }

    /// Clamps `value` into the range.
    #[must_use]
    pub fn clamp(&self, value: usize) -> usize {
        value.clamp(self.lower, self.upper)
    }

    /// Iterates the indices of the range in ascending order.
    pub fn iter(&self) -> core::ops::RangeInclusive<usize> {
        self.lower..=self.upper
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lower, self.upper)
    }
}

impl IntoIterator for Range {
    type Item = usize;
    type IntoIter = core::ops::RangeInclusive<usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::Range;
    use crate::LayoutError;
    use proptest::prelude::*;

    #[test]
    fn rejects_inverted_bounds() {
        assert_eq!(
            Range::new(5, 4),
            Err(LayoutError::InvalidRange { lower: 5, upper: 4 })
        );
        assert!(Range::new(4, 4).is_ok());
    }

    #[test]
    fn intersect_and_extend() {
        let a = Range::new(0, 10).unwrap();
        let b = Range::new(5, 15).unwrap();
        let c = Range::new(20, 30).unwrap();

        assert_eq!(a.intersect(&b), Some(Range::new(5, 10).unwrap()));
        assert_eq!(a.intersect(&c), None);
        assert_eq!(a.extend(&c), Range::new(0, 30).unwrap());
        assert_eq!(a.extend_to(12), Range::new(0, 12).unwrap());

        // A contained range is returned as-is.
        let inner = Range::new(2, 3).unwrap();
        assert_eq!(a.intersect(&inner), Some(inner));
        assert_eq!(a.extend(&inner), a);
    }

    #[test]
    fn with_len_and_clamp() {
        assert_eq!(Range::with_len(3, 0), None);
        let r = Range::with_len(3, 4).unwrap();
        assert_eq!((r.lower(), r.upper(), r.len()), (3, 6, 4));
        assert_eq!(r.clamp(0), 3);
        assert_eq!(r.clamp(100), 6);
        assert_eq!(r.into_iter().count(), 4);
    }

    proptest! {
        #[test]
        fn bounds_are_contained(lower in 0usize..1_000_000, len in 0usize..1_000) {
            let upper = lower + len;
            let r = Range::new(lower, upper).unwrap();
            prop_assert!(r.contains(lower));
            prop_assert!(r.contains(upper));
            prop_assert!(Range::new(upper + 1, lower).is_err());
        }

        #[test]
        fn intersection_is_contained_in_both(
            a in 0usize..500, b in 0usize..500, c in 0usize..500, d in 0usize..500,
        ) {
            let x = Range::new(a.min(b), a.max(b)).unwrap();
            let y = Range::new(c.min(d), c.max(d)).unwrap();
            if let Some(i) = x.intersect(&y) {
                prop_assert!(x.contains_range(&i));
                prop_assert!(y.contains_range(&i));
            }
            let hull = x.extend(&y);
            prop_assert!(hull.contains_range(&x) && hull.contains_range(&y));
        }
    }
}
