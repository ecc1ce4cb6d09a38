//! # Huffman Coding
//!
//! *Optimal prefix codes built from symbol frequencies.*
//!
//! ## Intuition First
//!
//! Morse code gives `E` a single dot and `Q` four symbols, because `E` is
//! common and `Q` is rare. Huffman coding does the same thing with bits, and
//! does it optimally: given how often each symbol occurs, no other prefix code
//! produces a shorter encoding of the whole input.
//!
//! The code is read off a binary tree. Every symbol is a leaf; the path from
//! the root to a leaf, `0` for left and `1` for right, is that symbol's code.
//! Because symbols only live at leaves, no code is a prefix of another and the
//! bit stream needs no separators.
//!
//! ## The Algorithm
//!
//! ```text
//! counts   a:3  b:2  c:1
//!
//! merge    c:1 + b:2  -> (3)
//! merge    a:3 + (3)  -> (6)
//!
//! tree          (6)
//!              0/  \1
//!             a    (3)
//!                 0/  \1
//!                 c    b
//!
//! codes    a=0  c=10  b=11      "aaabbc" -> 000 11 11 10
//! ```
//!
//! Repeatedly take the two least frequent subtrees out of a priority queue
//! and put back their merge. The first one taken becomes the left child.
//! Equal frequencies are ordered by insertion, so the same counts always give
//! the same tree.
//!
//! ## Historical Context
//!
//! ```text
//! 1948  Shannon     Source coding theorem bounds the average code length
//! 1949  Fano        Shannon-Fano coding: top-down splits, not always optimal
//! 1952  Huffman     Bottom-up merging of the two rarest subtrees
//! 1978  Gallager    Sibling property; adaptive Huffman follows
//! 1996  DEFLATE     RFC 1951 pairs LZ77 with Huffman codes
//! ```
//!
//! ## Degenerate Inputs
//!
//! 1. **Empty input**: no tree, no codes, no bits.
//! 2. **One distinct symbol**: the tree is a lone leaf with no path, so each
//!    occurrence is coded as a single `0` bit and the decoder emits the
//!    symbol once per bit.
//!
//! ## Usage
//!
//! ```
//! use huff::{CodeTable, CodeTree, FrequencyTable, HuffmanDecoder, HuffmanEncoder};
//!
//! let text: Vec<char> = "aaabbc".chars().collect();
//! let freqs = FrequencyTable::count(text.iter().copied());
//! let tree = CodeTree::build(&freqs);
//!
//! let encoder = HuffmanEncoder::from_table(CodeTable::from_tree(&tree));
//! let bits = encoder.encode(&text)?;
//! assert_eq!(bits.to_string(), "000111110");
//!
//! let decoded = HuffmanDecoder::new(&tree).decode(&bits)?;
//! assert_eq!(decoded, text);
//! # Ok::<(), huff::Error>(())
//! ```
//!
//! The compressed stream carries no header and no tree: the decoder must be
//! given the tree the encoder's codes came from.
//!
//! ## References
//!
//! - Huffman, D.A. (1952). "A method for the construction of minimum-redundancy codes." Proceedings of the IRE, 40(9).
//! - Cormen, T.H., et al. (2009). "Introduction to Algorithms", 3rd ed., section 16.3.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bitio;
pub mod code_table;
pub mod codec;
pub mod error;
pub mod file;
pub mod frequency;
pub mod tree;

pub use bitio::{BitReader, BitSink, BitSource, BitWriter, CompressedStream};
pub use code_table::{Code, CodeTable};
pub use codec::{compress, decompress, HuffmanDecoder, HuffmanEncoder};
pub use error::{Error, Result};
pub use frequency::{FrequencyTable, Symbol};
pub use tree::{CodeTree, FullTree, Node, NodeId};
