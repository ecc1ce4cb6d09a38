//! Huffman tree construction.
//!
//! The tree is built once per input from a [`FrequencyTable`] and is never
//! mutated afterwards, so code generation and decoding can share it by
//! reference.
//!
//! # Merge order
//!
//! Leaves enter a min-priority queue keyed by `(frequency, sequence)`.
//! The sequence number is the node's index in the arena: leaves are pushed
//! in ascending symbol order and each merged node takes the next free
//! index. Ties between equal frequencies are therefore broken by insertion
//! order, which makes the tree (and every code derived from it) identical
//! across runs and platforms.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt;

use log::{debug, trace};

use crate::frequency::{FrequencyTable, Symbol};

/// Index of a node inside a [`FullTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in [`FullTree::nodes`].
    pub fn index(self) -> usize {
        self.0
    }
}

/// Huffman tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node<S> {
    /// A symbol and its frequency.
    Leaf {
        /// The coded symbol.
        symbol: S,
        /// Occurrences of `symbol` in the input.
        freq: u64,
    },
    /// A merge of two subtrees.
    Internal {
        /// Sum of the frequencies of every leaf below this node.
        freq: u64,
        /// Subtree reached by a `0` bit.
        left: NodeId,
        /// Subtree reached by a `1` bit.
        right: NodeId,
    },
}

impl<S> Node<S> {
    /// Aggregate frequency of the node.
    pub fn freq(&self) -> u64 {
        match self {
            Node::Leaf { freq, .. } => *freq,
            Node::Internal { freq, .. } => *freq,
        }
    }

    /// True for leaves.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }
}

/// A tree with at least two leaves; every internal node has two children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullTree<S> {
    nodes: Vec<Node<S>>,
    root: NodeId,
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct QueueEntry {
    freq: u64,
    // Arena index, doubling as insertion sequence number.
    node: NodeId,
}

impl<S: Symbol> FullTree<S> {
    fn build(freqs: &FrequencyTable<S>) -> Self {
        let leaf_count = freqs.len();
        let mut nodes = Vec::with_capacity(2 * leaf_count - 1);
        let mut pq = BinaryHeap::with_capacity(leaf_count);

        for (symbol, freq) in freqs.iter() {
            let node = NodeId(nodes.len());
            nodes.push(Node::Leaf { symbol, freq });
            pq.push(Reverse(QueueEntry { freq, node }));
        }

        let mut root = NodeId(0);
        while let Some(Reverse(left)) = pq.pop() {
            let Some(Reverse(right)) = pq.pop() else {
                root = left.node;
                break;
            };

            let freq = left.freq + right.freq;
            let node = NodeId(nodes.len());
            trace!(
                "merge {:?}({}) + {:?}({}) -> {:?}({})",
                left.node,
                left.freq,
                right.node,
                right.freq,
                node,
                freq
            );
            nodes.push(Node::Internal {
                freq,
                left: left.node,
                right: right.node,
            });
            pq.push(Reverse(QueueEntry { freq, node }));
        }

        Self { nodes, root }
    }

    /// The root node id.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Look up a node.
    ///
    /// # Panics
    /// Panics if `id` did not come from this tree.
    pub fn node(&self, id: NodeId) -> &Node<S> {
        &self.nodes[id.0]
    }

    /// All nodes, leaves first in ascending symbol order, then merges in
    /// the order they were created. The root is last.
    pub fn nodes(&self) -> &[Node<S>] {
        &self.nodes
    }

    /// Child of `id` selected by `bit` (`false` = left, `true` = right),
    /// or `None` if `id` is a leaf.
    pub fn child(&self, id: NodeId, bit: bool) -> Option<NodeId> {
        match self.node(id) {
            Node::Leaf { .. } => None,
            Node::Internal { left, right, .. } => Some(if bit { *right } else { *left }),
        }
    }

    /// Number of leaves (distinct symbols).
    pub fn leaf_count(&self) -> usize {
        // internal = leaves - 1, and the arena holds both
        self.nodes.len().div_ceil(2)
    }
}

/// A Huffman code tree.
///
/// The three shapes are kept apart so that encoding and decoding are total
/// over them: a lone leaf has no root-to-leaf path and is coded with a
/// single `0` bit per symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeTree<S> {
    /// Built from an empty input.
    Empty,
    /// Built from an input with exactly one distinct symbol.
    SingleLeaf {
        /// The only symbol.
        symbol: S,
        /// Its number of occurrences.
        freq: u64,
    },
    /// Built from two or more distinct symbols.
    Full(FullTree<S>),
}

impl<S: Symbol> CodeTree<S> {
    /// Build the optimal prefix-code tree for `freqs`.
    pub fn build(freqs: &FrequencyTable<S>) -> Self {
        let mut iter = freqs.iter();
        let tree = match (iter.next(), iter.next()) {
            (None, _) => CodeTree::Empty,
            (Some((symbol, freq)), None) => CodeTree::SingleLeaf { symbol, freq },
            _ => CodeTree::Full(FullTree::build(freqs)),
        };
        debug!(
            "built code tree: {} leaves, {} internal nodes, total frequency {}",
            tree.leaf_count(),
            tree.internal_count(),
            tree.total_frequency()
        );
        tree
    }

    /// Shorthand for counting `symbols` and building a tree from the counts.
    pub fn from_symbols<I: IntoIterator<Item = S>>(symbols: I) -> Self {
        Self::build(&FrequencyTable::count(symbols))
    }

    /// True for a tree built from empty input.
    pub fn is_empty(&self) -> bool {
        matches!(self, CodeTree::Empty)
    }

    /// Number of leaves, equal to the number of distinct symbols.
    pub fn leaf_count(&self) -> usize {
        match self {
            CodeTree::Empty => 0,
            CodeTree::SingleLeaf { .. } => 1,
            CodeTree::Full(tree) => tree.leaf_count(),
        }
    }

    /// Number of internal (merge) nodes.
    pub fn internal_count(&self) -> usize {
        self.leaf_count().saturating_sub(1)
    }

    /// Frequency at the root: the length of the input the tree was built from.
    pub fn total_frequency(&self) -> u64 {
        match self {
            CodeTree::Empty => 0,
            CodeTree::SingleLeaf { freq, .. } => *freq,
            CodeTree::Full(tree) => tree.node(tree.root()).freq(),
        }
    }

    /// The root of a full tree, or `None` for the degenerate shapes.
    pub fn root(&self) -> Option<NodeId> {
        match self {
            CodeTree::Full(tree) => Some(tree.root()),
            _ => None,
        }
    }
}

impl<S: Symbol> From<&FrequencyTable<S>> for CodeTree<S> {
    fn from(freqs: &FrequencyTable<S>) -> Self {
        Self::build(freqs)
    }
}

enum RenderStep {
    Node(NodeId),
    Text(&'static str),
}

/// Renders the tree as nested `Node(freq)[left, right]` groups with
/// `symbol=freq` leaves, e.g. `Node(6)['a'=3, Node(3)['c'=1, 'b'=2]]`.
impl<S: Symbol> fmt::Display for CodeTree<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tree = match self {
            CodeTree::Empty => return f.write_str("Empty CodeTree"),
            CodeTree::SingleLeaf { symbol, freq } => return write!(f, "{symbol:?}={freq}"),
            CodeTree::Full(tree) => tree,
        };

        let mut stack = vec![RenderStep::Node(tree.root())];
        while let Some(step) = stack.pop() {
            match step {
                RenderStep::Text(text) => f.write_str(text)?,
                RenderStep::Node(id) => match tree.node(id) {
                    Node::Leaf { symbol, freq } => write!(f, "{symbol:?}={freq}")?,
                    Node::Internal { freq, left, right } => {
                        write!(f, "Node({freq})[")?;
                        stack.push(RenderStep::Text("]"));
                        stack.push(RenderStep::Node(*right));
                        stack.push(RenderStep::Text(", "));
                        stack.push(RenderStep::Node(*left));
                    }
                },
            }
        }
        Ok(())
    }
}
