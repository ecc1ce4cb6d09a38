//! Bit-level encoding and decoding.
//!
//! The compressed stream is pure payload: no header, no length and no
//! tree. The decoder must be handed the exact [`CodeTree`] the encoder's
//! [`CodeTable`] came from.

use log::{debug, warn};

use crate::bitio::{BitSink, BitSource, CompressedStream};
use crate::code_table::CodeTable;
use crate::error::{Error, Result};
use crate::frequency::{FrequencyTable, Symbol};
use crate::tree::{CodeTree, FullTree, Node, NodeId};

/// Write the code of every symbol in `symbols` to `sink`.
///
/// Returns the number of bits written. An empty table comes from an empty
/// input, so nothing is written and `symbols` is not read.
///
/// # Errors
/// Returns `Error::MissingSymbol` for the first symbol without a code; the
/// bits of the symbols before it have already been written.
pub fn encode<S, I, K>(table: &CodeTable<S>, symbols: I, sink: &mut K) -> Result<u64>
where
    S: Symbol,
    I: IntoIterator<Item = S>,
    K: BitSink + ?Sized,
{
    if table.is_empty() {
        return Ok(0);
    }

    let mut written = 0u64;
    for symbol in symbols {
        let code = table
            .get(&symbol)
            .ok_or_else(|| Error::MissingSymbol(format!("{symbol:?}")))?;
        for bit in code.bits().iter().by_vals() {
            sink.write_bit(bit)?;
        }
        written += code.len() as u64;
    }
    debug!("encoded {written} bits");
    Ok(written)
}

/// Decode every bit of `source` with `tree`, passing each symbol to `emit`.
///
/// Returns the number of symbols emitted. An empty tree emits nothing and
/// does not read `source`; a single-leaf tree emits its symbol once per bit
/// whatever the bit's value.
///
/// # Errors
/// Returns `Error::TruncatedStream` if the bits run out part way down the
/// tree. Symbols decoded before that point have already been emitted.
pub fn decode<S, B, F>(tree: &CodeTree<S>, source: &mut B, mut emit: F) -> Result<u64>
where
    S: Symbol,
    B: BitSource + ?Sized,
    F: FnMut(S),
{
    let emitted = match tree {
        CodeTree::Empty => 0,
        CodeTree::SingleLeaf { symbol, .. } => {
            let mut emitted = 0u64;
            while source.read_bit()?.is_some() {
                emit(*symbol);
                emitted += 1;
            }
            emitted
        }
        CodeTree::Full(tree) => decode_full(tree, source, emit)?,
    };
    debug!("decoded {emitted} symbols");
    Ok(emitted)
}

/// Where the decoder is between bits. Landing on a leaf emits and goes
/// straight back to the root, so a leaf is never a resting state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    AtRoot,
    AtInternal(NodeId),
}

fn decode_full<S, B, F>(tree: &FullTree<S>, source: &mut B, mut emit: F) -> Result<u64>
where
    S: Symbol,
    B: BitSource + ?Sized,
    F: FnMut(S),
{
    let mut cursor = Cursor::AtRoot;
    let mut bits_read = 0u64;
    let mut emitted = 0u64;

    while let Some(bit) = source.read_bit()? {
        bits_read += 1;
        let from = match cursor {
            Cursor::AtRoot => tree.root(),
            Cursor::AtInternal(id) => id,
        };
        let Some(next) = tree.child(from, bit) else {
            unreachable!("decoder cursor rests on internal nodes only");
        };
        cursor = match tree.node(next) {
            Node::Leaf { symbol, .. } => {
                emit(*symbol);
                emitted += 1;
                Cursor::AtRoot
            }
            Node::Internal { .. } => Cursor::AtInternal(next),
        };
    }

    if cursor != Cursor::AtRoot {
        warn!("compressed stream ended inside a code after {bits_read} bits");
        return Err(Error::TruncatedStream { bits_read });
    }
    Ok(emitted)
}

/// Huffman encoder.
#[derive(Debug, Clone)]
pub struct HuffmanEncoder<S> {
    table: CodeTable<S>,
}

impl<S: Symbol> HuffmanEncoder<S> {
    /// Build the code tree for `freqs` and keep only its code table.
    ///
    /// The tree is dropped afterwards; decoding needs the same tree, so
    /// build it separately with [`CodeTree::build`] on the same table.
    pub fn new(freqs: &FrequencyTable<S>) -> Self {
        Self::from_tree(&CodeTree::build(freqs))
    }

    /// Create an encoder for the codes of `tree`.
    pub fn from_tree(tree: &CodeTree<S>) -> Self {
        Self {
            table: CodeTable::from_tree(tree),
        }
    }

    /// Create an encoder around an existing code table.
    pub fn from_table(table: CodeTable<S>) -> Self {
        Self { table }
    }

    /// The code table in use.
    pub fn table(&self) -> &CodeTable<S> {
        &self.table
    }

    /// Encode a symbol sequence into a bit stream.
    pub fn encode(&self, data: &[S]) -> Result<CompressedStream> {
        let mut stream = CompressedStream::new();
        encode(&self.table, data.iter().copied(), &mut stream)?;
        Ok(stream)
    }

    /// Encode `symbols` into any bit sink, returning the bits written.
    pub fn encode_to<I, K>(&self, symbols: I, sink: &mut K) -> Result<u64>
    where
        I: IntoIterator<Item = S>,
        K: BitSink + ?Sized,
    {
        encode(&self.table, symbols, sink)
    }
}

/// Huffman decoder. Borrows the tree it decodes with.
#[derive(Debug, Clone, Copy)]
pub struct HuffmanDecoder<'t, S> {
    tree: &'t CodeTree<S>,
}

impl<'t, S: Symbol> HuffmanDecoder<'t, S> {
    /// Create a decoder for streams produced from `tree`'s codes.
    pub fn new(tree: &'t CodeTree<S>) -> Self {
        Self { tree }
    }

    /// Decode a bit stream into a symbol sequence.
    pub fn decode(&self, stream: &CompressedStream) -> Result<Vec<S>> {
        let mut out = Vec::new();
        decode(self.tree, &mut stream.bits(), |s| out.push(s))?;
        Ok(out)
    }

    /// Decode from any bit source, passing each symbol to `emit`.
    pub fn decode_from<B, F>(&self, source: &mut B, emit: F) -> Result<u64>
    where
        B: BitSource + ?Sized,
        F: FnMut(S),
    {
        decode(self.tree, source, emit)
    }
}

/// Build a tree for `data` and encode `data` with it.
///
/// The tree is returned alongside the stream because the stream cannot be
/// decoded without it.
pub fn compress<S: Symbol>(data: &[S]) -> Result<(CodeTree<S>, CompressedStream)> {
    let tree = CodeTree::from_symbols(data.iter().copied());
    let stream = HuffmanEncoder::from_tree(&tree).encode(data)?;
    Ok((tree, stream))
}

/// Decode `stream` with the tree it was produced from.
pub fn decompress<S: Symbol>(tree: &CodeTree<S>, stream: &CompressedStream) -> Result<Vec<S>> {
    HuffmanDecoder::new(tree).decode(stream)
}
