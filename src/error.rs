//! Error types for Huffman coding.

use thiserror::Error;

/// Error variants for Huffman operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The encoder was handed a symbol its code table has no entry for.
    ///
    /// The table was not derived from this input's alphabet.
    #[error("symbol {0} has no code in the code table")]
    MissingSymbol(String),

    /// The bit stream ended part way through a code.
    #[error("compressed stream truncated after {bits_read} bits: ended inside a code")]
    TruncatedStream {
        /// Number of bits consumed before the stream ran out.
        bits_read: u64,
    },

    /// The trailing byte of a bit file claims more than 7 valid bits.
    #[error("invalid bit trailer: {0} valid bits in last byte (expected 0..=7)")]
    InvalidTrailer(u8),

    /// A non-empty bit file is too short to carry its trailing byte.
    #[error("bit stream is missing its trailer byte")]
    MissingTrailer,

    /// An I/O error occurred during encoding or decoding.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for Huffman operations.
pub type Result<T> = std::result::Result<T, Error>;
