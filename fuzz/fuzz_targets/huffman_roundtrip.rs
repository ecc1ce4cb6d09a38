#![no_main]
use huff::{compress, decompress, CompressedStream};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (Vec<u8>, Vec<u8>)| {
    let (input, noise) = data;

    let (tree, stream) = compress(&input).unwrap();
    assert!(stream.len() >= input.len() as u64);
    assert_eq!(decompress(&tree, &stream).unwrap(), input);

    // Arbitrary bits must either decode or fail cleanly.
    let bits = noise.len() as u64 * 8;
    if let Some(noise) = CompressedStream::from_bytes(noise, bits) {
        let _ = decompress(&tree, &noise);
    }
});
