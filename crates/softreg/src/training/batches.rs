//! Contiguous mini-batch ranges over `[0, n_samples)`.

use std::iter::FusedIterator;
use std::ops::Range;

/// Number of batches needed to cover `n_samples` with `batch_size` rows each.
///
/// `batch_size` must be non-zero.
#[inline]
pub fn n_batches(n_samples: usize, batch_size: usize) -> usize {
    n_samples.div_ceil(batch_size)
}

/// Iterator over contiguous sample ranges of length `batch_size`.
///
/// Ranges are yielded in index order. The last one is shorter when
/// `batch_size` does not divide `n_samples`.
///
/// # Example
///
/// ```
/// use softreg::training::BatchRanges;
///
/// let ranges: Vec<_> = BatchRanges::new(5, 2).collect();
/// assert_eq!(ranges, vec![0..2, 2..4, 4..5]);
/// ```
#[derive(Debug, Clone)]
pub struct BatchRanges {
    next_start: usize,
    n_samples: usize,
    batch_size: usize,
}

impl BatchRanges {
    /// # Panics
    ///
    /// Panics if `batch_size == 0`.
    pub fn new(n_samples: usize, batch_size: usize) -> Self {
        assert!(batch_size > 0, "batch_size must be positive");
        Self {
            next_start: 0,
            n_samples,
            batch_size,
        }
    }
}

impl Iterator for BatchRanges {
    type Item = Range<usize>;

    #[inline]
    fn next(&mut self) -> Option<Range<usize>> {
        if self.next_start >= self.n_samples {
            return None;
        }
        let start = self.next_start;
        let end = start + self.batch_size.min(self.n_samples - start);
        self.next_start = end;
        Some(start..end)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = n_batches(self.n_samples - self.next_start, self.batch_size);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for BatchRanges {}
impl FusedIterator for BatchRanges {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn even_split() {
        let ranges: Vec<_> = BatchRanges::new(6, 3).collect();
        assert_eq!(ranges, vec![0..3, 3..6]);
    }

    #[test]
    fn short_final_batch() {
        let ranges: Vec<_> = BatchRanges::new(5, 2).collect();
        assert_eq!(ranges, vec![0..2, 2..4, 4..5]);
        assert_eq!(ranges.last().map(|r| r.len()), Some(5 % 2));
    }

    #[test]
    fn batch_larger_than_samples() {
        let ranges: Vec<_> = BatchRanges::new(3, 100).collect();
        assert_eq!(ranges, vec![0..3]);
    }

    #[test]
    fn no_samples_no_batches() {
        assert_eq!(BatchRanges::new(0, 4).count(), 0);
        assert_eq!(n_batches(0, 4), 0);
    }

    #[test]
    fn exact_size() {
        let mut it = BatchRanges::new(10, 3);
        assert_eq!(it.len(), 4);
        it.next();
        assert_eq!(it.len(), 3);
        assert_eq!(it.by_ref().count(), 3);
        assert_eq!(it.len(), 0);
        assert_eq!(it.next(), None);
    }

    #[test]
    #[should_panic(expected = "batch_size must be positive")]
    fn zero_batch_panics() {
        let _ = BatchRanges::new(3, 0);
    }
}
