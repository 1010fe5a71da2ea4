use std::io::Cursor;

use proptest::prelude::*;

use huffman_tree_compression::{
    compress_bytes, decompress_bytes, read_tree, write_tree, BitChannel, CodeTable, CodecOptions,
    FrequencyTable, HuffmanCodec, HuffmanTree, TerminatorPlacement
};


fn placement_strategy() -> impl Strategy<Value = TerminatorPlacement> {
    prop_oneof![
        Just(TerminatorPlacement::Merged),
        Just(TerminatorPlacement::BesideMostFrequent),
    ]
}


/// Bytes drawn from a narrow alphabet, so frequencies are skewed
fn skewed_bytes() -> impl Strategy<Value = Vec<u8>> {
    (1_u8..=255).prop_flat_map(|spread| prop::collection::vec(0..spread, 0..4096))
}


proptest! {

    #[test]
    fn prop_round_trip(data in prop::collection::vec(any::<u8>(), 0..4096)) {
        let compressed = compress_bytes(&data).unwrap();
        prop_assert_eq!(decompress_bytes(&compressed).unwrap(), data);
    }


    #[test]
    fn prop_round_trip_with_options(data in skewed_bytes(), placement in placement_strategy()) {

        let codec = HuffmanCodec::new(CodecOptions::new().with_terminator_placement(placement));

        let mut compressed = Vec::new();
        codec.compress(Cursor::new(&data), &mut compressed).unwrap();

        let mut decompressed = Vec::new();
        codec.decompress(compressed.as_slice(), &mut decompressed).unwrap();

        prop_assert_eq!(decompressed, data);
    }


    #[test]
    fn prop_prefix_free(data in skewed_bytes(), placement in placement_strategy()) {

        let tree = HuffmanTree::build(&FrequencyTable::from_bytes(&data), placement);
        let codes = CodeTable::from_tree(&tree);

        for (a, code_a) in codes.iter() {
            prop_assert!(!code_a.is_empty());

            for (b, code_b) in codes.iter() {
                if a != b {
                    prop_assert!(!code_a.is_prefix_of(code_b));
                }
            }
        }
    }


    #[test]
    fn prop_header_round_trip(data in skewed_bytes(), placement in placement_strategy()) {

        let tree = HuffmanTree::build(&FrequencyTable::from_bytes(&data), placement);

        let mut writer = BitChannel::writer(Vec::new());
        write_tree(&tree, &mut writer).unwrap();
        let bytes = writer.close().unwrap();

        let restored = read_tree(&mut BitChannel::reader(bytes.as_slice())).unwrap();

        prop_assert!(tree.same_shape(&restored));
    }


    #[test]
    fn prop_bit_channel_inverse(bits in prop::collection::vec(any::<bool>(), 0..512)) {

        let mut writer = BitChannel::writer(Vec::new());
        for &bit in &bits {
            writer.write_bit(bit).unwrap();
        }
        let bytes = writer.close().unwrap();

        let mut reader = BitChannel::reader(bytes.as_slice());
        let read: Vec<bool> = (0..bits.len()).map(|_| reader.read_bit().unwrap()).collect();

        prop_assert_eq!(read, bits);
    }


    #[test]
    fn prop_garbage_never_hangs(data in prop::collection::vec(any::<u8>(), 0..256)) {
        // Any outcome is fine as long as decoding returns
        let _ = decompress_bytes(&data);
    }

}
