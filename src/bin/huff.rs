use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use log::info;

use huff::file::{compress_file, count_frequencies, decompress_file};
use huff::{CodeTable, CodeTree};

/// Huffman-compress text files.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Count, build the tree, compress INPUT, then decompress it again.
    ///
    /// The tree only lives in memory, so decompression happens in the same
    /// run.
    Roundtrip {
        /// Text file to compress.
        input: PathBuf,
        /// Where to write the compressed bits [default: INPUT_compressed.txt]
        #[arg(long)]
        compressed: Option<PathBuf>,
        /// Where to write the decompressed text [default: INPUT_decompressed.txt]
        #[arg(long)]
        decompressed: Option<PathBuf>,
    },
    /// Print the frequencies, tree and codes of INPUT.
    Inspect {
        /// Text file to analyse.
        input: PathBuf,
    },
}

fn sibling(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{stem}_{suffix}.txt"))
}

fn roundtrip(input: &Path, compressed: &Path, decompressed: &Path) -> huff::Result<()> {
    let freqs = count_frequencies(input)?;
    let tree = CodeTree::build(&freqs);
    let codes = CodeTable::from_tree(&tree);

    let bits = compress_file(&codes, input, compressed)?;
    info!(
        "file compressed to {}: {} characters -> {} bits",
        compressed.display(),
        freqs.total(),
        bits
    );

    let chars = decompress_file(&tree, compressed, decompressed)?;
    info!(
        "file decompressed to {}: {} characters",
        decompressed.display(),
        chars
    );
    Ok(())
}

fn inspect(input: &Path) -> huff::Result<()> {
    let freqs = count_frequencies(input)?;
    let tree = CodeTree::build(&freqs);
    let codes = CodeTable::from_tree(&tree);

    println!("frequencies:");
    for (symbol, count) in freqs.iter() {
        println!("  {symbol:?}\t{count}");
    }
    println!("tree: {tree}");
    println!("codes:");
    for (symbol, code) in &codes {
        println!("  {symbol:?}\t{code}");
    }
    if let Some(bits) = codes.encoded_len(&freqs) {
        println!(
            "{} characters -> {} bits ({:.3} bits/char)",
            freqs.total(),
            bits,
            bits as f64 / freqs.total().max(1) as f64
        );
    }
    Ok(())
}

fn main() -> huff::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Cli::parse().command {
        Command::Roundtrip {
            input,
            compressed,
            decompressed,
        } => {
            let compressed = compressed.unwrap_or_else(|| sibling(&input, "compressed"));
            let decompressed = decompressed.unwrap_or_else(|| sibling(&input, "decompressed"));
            roundtrip(&input, &compressed, &decompressed)
        }
        Command::Inspect { input } => inspect(&input),
    }
}
