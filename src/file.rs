//! Whole-file drivers for text.
//!
//! Text files are read as UTF-8 and coded one `char` at a time. Compressed
//! files are written with [`BitWriter`] and hold only the code bits and the
//! trailer byte; the tree has to be kept by the caller.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use log::debug;

use crate::bitio::{BitReader, BitWriter};
use crate::code_table::CodeTable;
use crate::codec::{decode, encode};
use crate::error::Result;
use crate::frequency::FrequencyTable;
use crate::tree::CodeTree;

/// Count how many times each character appears in the file at `path`.
pub fn count_frequencies<P: AsRef<Path>>(path: P) -> Result<FrequencyTable<char>> {
    let text = fs::read_to_string(path.as_ref())?;
    let freqs = FrequencyTable::from_text(&text);
    debug!(
        "{}: {} characters, {} distinct",
        path.as_ref().display(),
        freqs.total(),
        freqs.len()
    );
    Ok(freqs)
}

/// Compress the text file `input` into `compressed` using `codes`.
///
/// Returns the number of code bits written. With an empty table the output
/// file is created empty and `input` is not read. The bits are packed in
/// memory first, so `compressed` is only created once encoding succeeded.
pub fn compress_file<P, Q>(codes: &CodeTable<char>, input: P, compressed: Q) -> Result<u64>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    if codes.is_empty() {
        File::create(compressed.as_ref())?;
        return Ok(0);
    }

    let text = fs::read_to_string(input.as_ref())?;
    let mut writer = BitWriter::new(Vec::new());
    let bits = encode(codes, text.chars(), &mut writer)?;
    fs::write(compressed.as_ref(), writer.finish()?)?;

    debug!(
        "compressed {} -> {}: {} bits",
        input.as_ref().display(),
        compressed.as_ref().display(),
        bits
    );
    Ok(bits)
}

/// Decompress `compressed` into the text file `output` using the tree the
/// codes were derived from.
///
/// Returns the number of characters written. With an empty tree the output
/// file is created empty and `compressed` is not read.
pub fn decompress_file<P, Q>(tree: &CodeTree<char>, compressed: P, output: Q) -> Result<u64>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    if tree.is_empty() {
        File::create(output.as_ref())?;
        return Ok(0);
    }

    let mut reader = BitReader::new(BufReader::new(File::open(compressed.as_ref())?));
    let mut text = String::new();
    let count = decode(tree, &mut reader, |c| text.push(c))?;

    let mut out = BufWriter::new(File::create(output.as_ref())?);
    out.write_all(text.as_bytes())?;
    out.flush()?;

    debug!(
        "decompressed {} -> {}: {} characters from {} bits",
        compressed.as_ref().display(),
        output.as_ref().display(),
        count,
        reader.bits_read()
    );
    Ok(count)
}
