// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Start positions of consecutive slices, kept as prefix sums of their counts.

use alloc::vec::Vec;
use core::ops::Range;

/// Per-slice item counts and the composed position each slice starts at.
///
/// Every mutation rebuilds the prefix sums from the first affected slice, so
/// queries are read-only and lookups are a binary search.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct StartOffsets {
    counts: Vec<usize>,
    starts: Vec<usize>,
}

impl StartOffsets {
    /// Sum of all counts.
    pub(crate) fn total(&self) -> usize {
        match (self.starts.last(), self.counts.last()) {
            (Some(start), Some(count)) => start + count,
            _ => 0,
        }
    }

    pub(crate) fn start(&self, index: usize) -> Option<usize> {
        self.starts.get(index).copied()
    }

    /// Composed positions of slice `index`.
    pub(crate) fn span(&self, index: usize) -> Option<Range<usize>> {
        let start = self.start(index)?;
        Some(start..start + self.counts[index])
    }

    pub(crate) fn insert(&mut self, index: usize, count: usize) {
        self.counts.insert(index, count);
        self.starts.insert(index, 0);
        self.refresh_from(index);
    }

    pub(crate) fn remove(&mut self, index: usize) -> usize {
        let count = self.counts.remove(index);
        self.starts.remove(index);
        self.refresh_from(index);
        count
    }

    pub(crate) fn clear(&mut self) {
        self.counts.clear();
        self.starts.clear();
    }

    /// Replaces the count of slice `index`, returning the previous one.
    pub(crate) fn set_count(&mut self, index: usize, count: usize) -> usize {
        let previous = core::mem::replace(&mut self.counts[index], count);
        if previous != count {
            self.refresh_from(index + 1);
        }
        previous
    }

    /// The slice holding composed `position`, and the local position in it.
    ///
    /// Empty slices never hold a position.
    pub(crate) fn locate(&self, position: usize) -> Option<(usize, usize)> {
        // The last slice starting at or before `position`: empty slices share
        // their start with the next one and sort before it.
        let index = self
            .starts
            .partition_point(|start| *start <= position)
            .checked_sub(1)?;
        let local = position - self.starts[index];
        (local < self.counts[index]).then_some((index, local))
    }

    fn refresh_from(&mut self, index: usize) {
        let mut next = match index.checked_sub(1) {
            Some(prev) => self.starts[prev] + self.counts[prev],
            None => 0,
        };
        for (start, count) in self.starts[index..].iter_mut().zip(&self.counts[index..]) {
            *start = next;
            next += count;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::StartOffsets;

    fn offsets(counts: &[usize]) -> StartOffsets {
        let mut offsets = StartOffsets::default();
        for (i, count) in counts.iter().enumerate() {
            offsets.insert(i, *count);
        }
        offsets
    }

    #[test]
    fn starts_are_prefix_sums() {
        let mut o = offsets(&[3, 5, 2]);
        assert_eq!((o.start(0), o.start(1), o.start(2)), (Some(0), Some(3), Some(8)));
        assert_eq!(o.total(), 10);
        assert_eq!(o.set_count(0, 5), 3);
        assert_eq!((o.start(1), o.start(2)), (Some(5), Some(10)));
        assert_eq!(o.remove(1), 5);
        assert_eq!(o.span(1), Some(5..7));
        assert_eq!(o.total(), 7);
    }

    #[test]
    fn locate_skips_empty_slices() {
        let o = offsets(&[2, 0, 0, 3, 0]);
        assert_eq!(o.locate(1), Some((0, 1)));
        assert_eq!(o.locate(2), Some((3, 0)));
        assert_eq!(o.locate(4), Some((3, 2)));
        assert_eq!(o.locate(5), None);
        assert_eq!(offsets(&[]).locate(0), None);
    }
}
