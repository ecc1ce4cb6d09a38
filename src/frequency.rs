//! Symbol frequency counting.

use std::collections::btree_map::{self, BTreeMap};
use std::fmt::Debug;
use std::hash::Hash;

/// An atomic unit of input.
///
/// Anything that is cheap to copy and totally ordered can be coded. The
/// ordering is only used to make tree construction reproducible.
pub trait Symbol: Copy + Eq + Ord + Hash + Debug {}

impl<T: Copy + Eq + Ord + Hash + Debug> Symbol for T {}

/// Occurrence counts for every symbol seen in an input.
///
/// Every present key has a count of at least one. Iteration is in
/// ascending symbol order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable<S> {
    counts: BTreeMap<S, u64>,
}

impl<S: Symbol> FrequencyTable<S> {
    /// Count the occurrences of each symbol in `symbols`.
    ///
    /// An empty input produces an empty table.
    pub fn count<I: IntoIterator<Item = S>>(symbols: I) -> Self {
        let counts = symbols
            .into_iter()
            .fold(BTreeMap::new(), |mut acc, symbol| {
                *acc.entry(symbol).or_insert(0) += 1;
                acc
            });
        Self { counts }
    }

    /// Build a table from explicit `(symbol, count)` pairs.
    ///
    /// Zero counts are dropped and repeated symbols accumulate.
    pub fn from_counts<I: IntoIterator<Item = (S, u64)>>(pairs: I) -> Self {
        let mut counts = BTreeMap::new();
        for (symbol, count) in pairs.into_iter().filter(|&(_, c)| c > 0) {
            *counts.entry(symbol).or_insert(0) += count;
        }
        Self { counts }
    }

    /// Count of `symbol`, or `None` if it never occurred.
    pub fn get(&self, symbol: &S) -> Option<u64> {
        self.counts.get(symbol).copied()
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// True if no symbols were counted.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts, i.e. the length of the counted input.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Iterate `(symbol, count)` pairs in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (S, u64)> + '_ {
        self.counts.iter().map(|(&s, &c)| (s, c))
    }
}

impl FrequencyTable<u8> {
    /// Count the bytes of `data`.
    pub fn from_bytes(data: &[u8]) -> Self {
        Self::count(data.iter().copied())
    }
}

impl FrequencyTable<char> {
    /// Count the characters of `text`.
    pub fn from_text(text: &str) -> Self {
        Self::count(text.chars())
    }
}

impl<S: Symbol> Default for FrequencyTable<S> {
    fn default() -> Self {
        Self {
            counts: BTreeMap::new(),
        }
    }
}

impl<S: Symbol> FromIterator<S> for FrequencyTable<S> {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::count(iter)
    }
}

impl<'a, S: Symbol> IntoIterator for &'a FrequencyTable<S> {
    type Item = (&'a S, &'a u64);
    type IntoIter = btree_map::Iter<'a, S, u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.counts.iter()
    }
}
