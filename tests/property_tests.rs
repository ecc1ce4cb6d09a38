use huff::{
    BitReader, BitSink, BitWriter, CodeTable, CodeTree, CompressedStream, Error, FrequencyTable,
    HuffmanDecoder, HuffmanEncoder,
};
use proptest::prelude::*;

fn roundtrip<S: huff::Symbol>(data: &[S]) -> (CodeTree<S>, CompressedStream, Vec<S>) {
    let freqs = FrequencyTable::count(data.iter().copied());
    let tree = CodeTree::build(&freqs);
    let encoder = HuffmanEncoder::from_table(CodeTable::from_tree(&tree));
    let stream = encoder.encode(data).unwrap();
    let decoded = HuffmanDecoder::new(&tree).decode(&stream).unwrap();
    (tree, stream, decoded)
}

#[test]
fn test_aaabbc_scenario() {
    let data: Vec<char> = "aaabbc".chars().collect();
    let freqs = FrequencyTable::count(data.iter().copied());
    assert_eq!(freqs.get(&'a'), Some(3));
    assert_eq!(freqs.get(&'b'), Some(2));
    assert_eq!(freqs.get(&'c'), Some(1));

    let (tree, stream, decoded) = roundtrip(&data);
    assert_eq!(tree.leaf_count(), 3);
    assert_eq!(tree.total_frequency(), 6);
    assert_eq!(decoded, data);

    let codes = CodeTable::from_tree(&tree);
    for (a, code_a) in &codes {
        for (b, code_b) in &codes {
            if a != b {
                assert!(!code_a.is_prefix_of(code_b));
            }
        }
    }
    assert_eq!(stream.len(), 9);
}

#[test]
fn test_monotone_on_varied_distributions() {
    let distributions: [&[u64]; 5] = [
        &[1, 1, 1, 1],
        &[45, 13, 12, 16, 9, 5],
        &[1, 2, 4, 8, 16, 32, 64],
        &[100, 1, 1, 1, 1, 1, 1, 1, 1, 1],
        &[7, 7, 3, 3, 3, 1],
    ];

    for counts in distributions {
        let freqs = FrequencyTable::from_counts(counts.iter().enumerate().map(|(i, &c)| (i, c)));
        let codes = CodeTable::from_tree(&CodeTree::build(&freqs));
        for (a, fa) in freqs.iter() {
            for (b, fb) in freqs.iter() {
                if fa > fb {
                    let (la, lb) = (codes.get(&a).unwrap().len(), codes.get(&b).unwrap().len());
                    assert!(la <= lb, "{counts:?}: freq {fa} got {la} bits, freq {fb} got {lb}");
                }
            }
        }
    }
}

#[test]
fn test_classic_textbook_lengths() {
    // CLRS 16.3: f:5 e:9 c:12 b:13 d:16 a:45
    let freqs = FrequencyTable::from_counts([
        ('a', 45),
        ('b', 13),
        ('c', 12),
        ('d', 16),
        ('e', 9),
        ('f', 5),
    ]);
    let codes = CodeTable::from_tree(&CodeTree::build(&freqs));
    let lengths: Vec<_> = "abcdef".chars().map(|c| codes.get(&c).unwrap().len()).collect();
    assert_eq!(lengths, vec![1, 3, 3, 3, 4, 4]);
    assert_eq!(codes.encoded_len(&freqs), Some(224));
}

#[test]
fn test_truncated_file_stream() {
    let data: Vec<char> = "mississippi".chars().collect();
    let tree = CodeTree::from_symbols(data.iter().copied());
    let stream = HuffmanEncoder::from_tree(&tree).encode(&data).unwrap();

    // Re-frame all but the last bit as a bit file.
    let mut writer = BitWriter::new(Vec::new());
    for bit in stream.bits().take(stream.len() as usize - 1) {
        writer.write_bit(bit).unwrap();
    }
    let bytes = writer.finish().unwrap();

    let mut reader = BitReader::new(&bytes[..]);
    let err = HuffmanDecoder::new(&tree)
        .decode_from(&mut reader, |_| {})
        .unwrap_err();
    assert!(matches!(err, Error::TruncatedStream { .. }));
}

proptest! {
    #[test]
    fn test_roundtrip(data in prop::collection::vec(any::<u8>(), 0..1000)) {
        let (_, _, decoded) = roundtrip(&data);
        prop_assert_eq!(decoded, data);
    }

    #[test]
    fn test_roundtrip_small_alphabet(data in prop::collection::vec(0u8..3, 0..200)) {
        let (tree, stream, decoded) = roundtrip(&data);
        prop_assert!(stream.len() >= data.len() as u64);
        prop_assert_eq!(tree.leaf_count(), FrequencyTable::from_bytes(&data).len());
        prop_assert_eq!(decoded, data);
    }

    #[test]
    fn test_single_symbol(symbol in any::<char>(), n in 0usize..200) {
        let data = vec![symbol; n];
        let (tree, stream, decoded) = roundtrip(&data);
        if n == 0 {
            prop_assert!(tree.is_empty());
        } else {
            prop_assert_eq!(tree, CodeTree::SingleLeaf { symbol, freq: n as u64 });
        }
        prop_assert_eq!(stream.len(), n as u64);
        prop_assert_eq!(decoded, data);
    }

    #[test]
    fn test_rebuild_is_deterministic(text in "[a-e]{0,100}") {
        let freqs = FrequencyTable::from_text(&text);
        let first = CodeTable::from_tree(&CodeTree::build(&freqs));
        let second = CodeTable::from_tree(&CodeTree::build(&freqs.clone()));
        prop_assert_eq!(first, second);
    }
}
