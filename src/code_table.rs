//! Prefix code tables derived from a [`CodeTree`].

use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

use bitvec::prelude::*;
use log::debug;

use crate::frequency::{FrequencyTable, Symbol};
use crate::tree::{CodeTree, Node};

/// The root-to-leaf path of one symbol: `false` (`0`) descends left,
/// `true` (`1`) descends right.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Code {
    bits: BitVec<u8, Msb0>,
}

impl Code {
    /// Number of bits in the code.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// True for the zero-length code. Codes in a [`CodeTable`] are never empty.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// The bits, first to last.
    pub fn bits(&self) -> &BitSlice<u8, Msb0> {
        &self.bits
    }

    /// True if `self` is a prefix of `other` (a code is a prefix of itself).
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        other.bits.starts_with(self.bits.as_bitslice())
    }
}

impl From<BitVec<u8, Msb0>> for Code {
    fn from(bits: BitVec<u8, Msb0>) -> Self {
        Self { bits }
    }
}

impl From<Vec<bool>> for Code {
    fn from(bits: Vec<bool>) -> Self {
        Self {
            bits: bits.into_iter().collect(),
        }
    }
}

/// Renders the code as a string of `0` and `1`.
impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.bits.iter().by_vals() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Symbol to [`Code`] mapping. Prefix-free whenever it holds two or more
/// codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable<S> {
    codes: BTreeMap<S, Code>,
}

impl<S: Symbol> CodeTable<S> {
    /// Derive the code of every leaf of `tree`.
    ///
    /// An empty tree yields an empty table and a single-leaf tree maps its
    /// symbol to `0`. Otherwise every leaf gets the path from the root to it.
    pub fn from_tree(tree: &CodeTree<S>) -> Self {
        let mut codes = BTreeMap::new();
        match tree {
            CodeTree::Empty => {}
            CodeTree::SingleLeaf { symbol, .. } => {
                codes.insert(*symbol, Code::from(bitvec![u8, Msb0; 0]));
            }
            CodeTree::Full(tree) => {
                // Depth-first, left before right.
                let mut stack = vec![(tree.root(), BitVec::<u8, Msb0>::new())];
                while let Some((id, path)) = stack.pop() {
                    match tree.node(id) {
                        Node::Leaf { symbol, .. } => {
                            codes.insert(*symbol, Code::from(path));
                        }
                        Node::Internal { left, right, .. } => {
                            let mut right_path = path.clone();
                            right_path.push(true);
                            stack.push((*right, right_path));

                            let mut left_path = path;
                            left_path.push(false);
                            stack.push((*left, left_path));
                        }
                    }
                }
            }
        }

        let table = Self { codes };
        debug!(
            "generated {} codes, longest {} bits",
            table.len(),
            table.max_code_len()
        );
        table
    }

    /// Code for `symbol`, or `None` if it is not in the alphabet.
    pub fn get(&self, symbol: &S) -> Option<&Code> {
        self.codes.get(symbol)
    }

    /// Number of symbols with a code.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// True if the table holds no codes.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Iterate `(symbol, code)` pairs in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (&S, &Code)> {
        self.codes.iter()
    }

    /// Length of the longest code, 0 for an empty table.
    pub fn max_code_len(&self) -> usize {
        self.codes.values().map(Code::len).max().unwrap_or(0)
    }

    /// Number of bits needed to encode an input with these frequencies,
    /// or `None` if a counted symbol has no code.
    pub fn encoded_len(&self, freqs: &FrequencyTable<S>) -> Option<u64> {
        freqs
            .iter()
            .map(|(symbol, count)| Some(self.get(&symbol)?.len() as u64 * count))
            .sum()
    }
}

impl<S: Symbol> From<&CodeTree<S>> for CodeTable<S> {
    fn from(tree: &CodeTree<S>) -> Self {
        Self::from_tree(tree)
    }
}

impl<'a, S: Symbol> IntoIterator for &'a CodeTable<S> {
    type Item = (&'a S, &'a Code);
    type IntoIter = btree_map::Iter<'a, S, Code>;

    fn into_iter(self) -> Self::IntoIter {
        self.codes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn codes_for(text: &str) -> CodeTable<char> {
        CodeTable::from_tree(&CodeTree::from_symbols(text.chars()))
    }

    fn code_string(table: &CodeTable<char>, symbol: char) -> String {
        table.get(&symbol).unwrap().to_string()
    }

    #[test]
    fn aaabbc_codes() {
        let table = codes_for("aaabbc");
        assert_eq!(code_string(&table, 'a'), "0");
        assert_eq!(code_string(&table, 'c'), "10");
        assert_eq!(code_string(&table, 'b'), "11");
        assert_eq!(table.max_code_len(), 2);
        assert_eq!(
            table.encoded_len(&FrequencyTable::from_text("aaabbc")),
            Some(3 + 2 * 2 + 2)
        );
    }

    #[test]
    fn empty_tree_gives_empty_table() {
        let table = codes_for("");
        assert!(table.is_empty());
        assert_eq!(table.max_code_len(), 0);
    }

    #[test]
    fn single_leaf_gets_zero() {
        let table = codes_for("qqq");
        assert_eq!(table.len(), 1);
        assert_eq!(code_string(&table, 'q'), "0");
    }

    #[test]
    fn encoded_len_reports_missing_symbols() {
        let table = codes_for("ab");
        assert_eq!(table.encoded_len(&FrequencyTable::from_text("abc")), None);
    }

    #[test]
    fn prefix_relation() {
        let short = Code::from(vec![true, false]);
        let long = Code::from(vec![true, false, true]);
        assert!(short.is_prefix_of(&long));
        assert!(!long.is_prefix_of(&short));
        assert!(short.is_prefix_of(&short));

        let sibling = Code::from(bitvec![u8, Msb0; 1, 1]);
        assert!(!short.is_prefix_of(&sibling));
        assert!(!sibling.is_prefix_of(&long));
        assert_eq!(sibling.to_string(), "11");
    }

    #[test]
    fn skewed_distribution_is_monotone() {
        // Fibonacci counts give the deepest possible tree.
        let freqs = FrequencyTable::from_counts([
            (b'a', 1u64),
            (b'b', 1),
            (b'c', 2),
            (b'd', 3),
            (b'e', 5),
            (b'f', 8),
            (b'g', 13),
        ]);
        let table = CodeTable::from_tree(&CodeTree::build(&freqs));
        assert_eq!(table.get(&b'g').unwrap().len(), 1);
        assert_eq!(table.get(&b'a').unwrap().len(), 6);
        assert_eq!(table.get(&b'b').unwrap().len(), 6);
        assert_eq!(table.max_code_len(), 6);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_codes_are_prefix_free(data in prop::collection::vec(0u8..40, 0..400)) {
            let freqs = FrequencyTable::from_bytes(&data);
            let table = CodeTable::from_tree(&CodeTree::build(&freqs));
            prop_assert_eq!(table.len(), freqs.len());

            for (a, code_a) in table.iter() {
                prop_assert!(!code_a.is_empty());
                for (b, code_b) in table.iter() {
                    if a != b {
                        prop_assert!(!code_a.is_prefix_of(code_b), "{:?} prefixes {:?}", a, b);
                    }
                }
            }
        }

        #[test]
        fn prop_higher_frequency_never_longer(counts in prop::collection::vec(1u64..1000, 2..30)) {
            let freqs = FrequencyTable::from_counts(
                counts.iter().enumerate().map(|(i, &c)| (i as u16, c)),
            );
            let table = CodeTable::from_tree(&CodeTree::build(&freqs));

            for (a, fa) in freqs.iter() {
                for (b, fb) in freqs.iter() {
                    if fa > fb {
                        prop_assert!(table.get(&a).unwrap().len() <= table.get(&b).unwrap().len());
                    }
                }
            }
        }

        #[test]
        fn prop_kraft_equality(data in prop::collection::vec(any::<u8>(), 2..300)) {
            let tree = CodeTree::from_symbols(data.iter().copied());
            prop_assume!(tree.leaf_count() >= 2);
            let table = CodeTable::from_tree(&tree);

            // A full binary tree uses the whole code space.
            let max = table.max_code_len() as u32;
            let used: u64 = table.iter().map(|(_, c)| 1u64 << (max - c.len() as u32)).sum();
            prop_assert_eq!(used, 1u64 << max);
        }
    }
}
