//! Combination Enumerator
//!
//! Exhaustive subset generation over item positions. Every strategy yields each of the `2^n`
//! subsets exactly once, as ascending position lists, so a subset preserves the relative order of
//! the items it was drawn from.
//!
//! Both time and memory grow as `O(2^n)`. This exists to cross-check exact solvers on small
//! catalogs (a few tens of items at most) and to illustrate why they are needed.

use std::iter;

use smallvec::SmallVec;

/// Ascending item positions forming one subset
pub type Subset = SmallVec<[usize; 16]>;

/// How subsets are generated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EnumerationStrategy {
    /// Start from the empty subset; for each item, append a copy of every subset generated so far
    /// with that item added.
    #[default]
    Doubling,

    /// For each size `r` from 1 to `n`, walk every `r`-subset in lexicographic order. The empty
    /// subset is yielded first.
    SizeIndexed,
}

/// Number of subsets of `len` items, if it fits in a `usize`.
pub fn subset_count(len: usize) -> Option<usize> {
    u32::try_from(len)
        .ok()
        .and_then(|len| 1_usize.checked_shl(len))
}

/// Every subset of `len` items, materialised by incremental doubling.
///
/// The output for three items is `[], [0], [1], [0, 1], [2], [0, 2], [1, 2], [0, 1, 2]`.
pub fn doubling_subsets(len: usize) -> Vec<Subset> {
    let mut subsets: Vec<Subset> = Vec::with_capacity(subset_count(len).unwrap_or(0));

    subsets.push(Subset::new());

    for item in 0..len {
        let extended: Vec<Subset> = subsets
            .iter()
            .map(|subset| {
                let mut next = subset.clone();
                next.push(item);
                next
            })
            .collect();

        subsets.extend(extended);
    }

    subsets
}

/// Lazily walks the non-empty subsets of `len` items, smallest first.
#[derive(Debug, Clone)]
pub struct SizeIndexedSubsets {
    len: usize,
    size: usize,
    current: Option<Subset>,
}

impl SizeIndexedSubsets {
    /// Create a generator over the non-empty subsets of `len` items
    pub fn new(len: usize) -> Self {
        Self {
            len,
            size: 1,
            current: first_of_size(1, len),
        }
    }
}

impl Iterator for SizeIndexedSubsets {
    type Item = Subset;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current.take()?;

        self.current = next_of_same_size(&current, self.len).or_else(|| {
            self.size += 1;
            first_of_size(self.size, self.len)
        });

        Some(current)
    }
}

/// `[0, 1, .., size - 1]`, or `None` once `size` exceeds `len`.
fn first_of_size(size: usize, len: usize) -> Option<Subset> {
    (size <= len).then(|| (0..size).collect())
}

/// The lexicographic successor of `current` among subsets of the same size.
fn next_of_same_size(current: &Subset, len: usize) -> Option<Subset> {
    let size = current.len();

    // Rightmost position that can still move right: position `pos` may hold at most
    // `len - size + pos`.
    let (pivot, &value) = current
        .iter()
        .enumerate()
        .rev()
        .find(|&(pos, &value)| value + size < len + pos)?;

    let mut next = current.clone();

    for (offset, slot) in next.iter_mut().skip(pivot).enumerate() {
        *slot = value + 1 + offset;
    }

    Some(next)
}

/// Iterator over every subset, including the empty one, for a given strategy.
#[derive(Debug)]
pub enum Subsets {
    /// Pre-built subsets from [`doubling_subsets`]
    Doubling(std::vec::IntoIter<Subset>),

    /// The empty subset followed by [`SizeIndexedSubsets`]
    SizeIndexed(iter::Chain<iter::Once<Subset>, SizeIndexedSubsets>),
}

impl Subsets {
    /// Every subset of `len` items, generated with `strategy`
    pub fn new(len: usize, strategy: EnumerationStrategy) -> Self {
        match strategy {
            EnumerationStrategy::Doubling => Self::Doubling(doubling_subsets(len).into_iter()),
            EnumerationStrategy::SizeIndexed => Self::SizeIndexed(
                iter::once(Subset::new()).chain(SizeIndexedSubsets::new(len)),
            ),
        }
    }
}

impl Iterator for Subsets {
    type Item = Subset;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::Doubling(subsets) => subsets.next(),
            Self::SizeIndexed(subsets) => subsets.next(),
        }
    }
}

#[cfg(test)]
mod tests {
    use rustc_hash::FxHashSet;
    use smallvec::smallvec;

    use super::*;

    #[test]
    fn doubling_matches_documented_order() {
        let subsets = doubling_subsets(3);

        let expected: Vec<Subset> = vec![
            smallvec![],
            smallvec![0],
            smallvec![1],
            smallvec![0, 1],
            smallvec![2],
            smallvec![0, 2],
            smallvec![1, 2],
            smallvec![0, 1, 2],
        ];

        assert_eq!(subsets, expected);
    }

    #[test]
    fn size_indexed_walks_sizes_in_lexicographic_order() {
        let subsets: Vec<Subset> = SizeIndexedSubsets::new(3).collect();

        let expected: Vec<Subset> = vec![
            smallvec![0],
            smallvec![1],
            smallvec![2],
            smallvec![0, 1],
            smallvec![0, 2],
            smallvec![1, 2],
            smallvec![0, 1, 2],
        ];

        assert_eq!(subsets, expected);
    }

    #[test]
    fn strategies_produce_the_same_set_of_subsets() {
        for len in 0..=10 {
            let doubling: FxHashSet<Subset> =
                Subsets::new(len, EnumerationStrategy::Doubling).collect();
            let size_indexed: FxHashSet<Subset> =
                Subsets::new(len, EnumerationStrategy::SizeIndexed).collect();

            assert_eq!(doubling, size_indexed, "subsets differ for {len} items");
            assert_eq!(Some(doubling.len()), subset_count(len));
        }
    }

    #[test]
    fn every_subset_is_yielded_once_and_ascending() {
        for strategy in [
            EnumerationStrategy::Doubling,
            EnumerationStrategy::SizeIndexed,
        ] {
            let subsets: Vec<Subset> = Subsets::new(6, strategy).collect();

            assert_eq!(subsets.len(), 64);
            assert!(
                subsets
                    .iter()
                    .all(|subset| subset.windows(2).all(|pair| pair.first() < pair.last()))
            );
        }
    }

    #[test]
    fn empty_input_yields_only_the_empty_subset() {
        for strategy in [
            EnumerationStrategy::Doubling,
            EnumerationStrategy::SizeIndexed,
        ] {
            let subsets: Vec<Subset> = Subsets::new(0, strategy).collect();

            assert_eq!(subsets, vec![Subset::new()]);
        }
    }

    #[test]
    fn subset_count_overflows_to_none() {
        assert_eq!(subset_count(0), Some(1));
        assert_eq!(subset_count(10), Some(1_024));
        assert_eq!(subset_count(usize::BITS as usize), None);
    }
}
