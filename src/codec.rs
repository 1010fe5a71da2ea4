use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Cursor, Read, Seek, SeekFrom, Write};
use std::path::Path;

use log::{debug, trace, warn};

use crate::bitchannel::{least_bytes_repr_for_bits, BitChannel};
use crate::code::{Code, CodeTable};
use crate::config::CodecOptions;
use crate::error::{Error, Result};
use crate::frequency::FrequencyTable;
use crate::header;
use crate::symbol::Symbol;
use crate::tree::{HuffmanTree, Node};


#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompressionStats {

    pub input_bytes: u64,
    pub output_bytes: u64,
    pub header_bits: u64,
    /// Payload bits, terminator code included
    pub payload_bits: u64,
    /// Leaves of the tree, terminator included
    pub distinct_symbols: usize

}

impl CompressionStats {

    /// Compressed size over original size. `None` for an empty input
    pub fn ratio(&self) -> Option<f64> {
        (self.input_bytes != 0).then(|| self.output_bytes as f64 / self.input_bytes as f64)
    }

}


#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecompressionStats {

    /// Compressed bytes consumed up to the terminator
    pub input_bytes: u64,
    pub output_bytes: u64

}


/// Huffman compressor and decompressor.
///
/// A compressed stream is the pre-order tree header followed, without any
/// alignment, by the code of every input byte and finally the terminator's
/// code. Trailing bits of the last byte are zero and ignored on decoding.
#[derive(Debug, Clone, Default)]
pub struct HuffmanCodec {

    options: CodecOptions

}

impl HuffmanCodec {

    pub const fn new(options: CodecOptions) -> Self {
        Self { options }
    }


    pub const fn options(&self) -> &CodecOptions {
        &self.options
    }


    /// Compresses `input` from its current position to its end.
    ///
    /// The input is read twice: once to count byte frequencies, once to
    /// encode, seeking back in between.
    /// The output is flushed even when encoding fails, but is then incomplete.
    pub fn compress<R, W>(&self, mut input: R, output: W) -> Result<CompressionStats>
    where
        R: Read + Seek,
        W: Write
    {
        self.options.validate()?;

        let start = input.stream_position()?;
        let table = FrequencyTable::build(
            BufReader::with_capacity(self.options.buffer_capacity, &mut input)
        )?;
        input.seek(SeekFrom::Start(start))?;

        let tree = HuffmanTree::build(&table, self.options.terminator_placement);
        let codes = CodeTable::from_tree(&tree);

        debug!(
            "Compressing {} bytes over {} symbols, longest code is {} bits",
            table.total(), table.distinct_symbols(), codes.max_len()
        );

        let mut channel = BitChannel::writer(
            BufWriter::with_capacity(self.options.buffer_capacity, output)
        );

        let encoded = encode(
            &tree,
            &codes,
            BufReader::with_capacity(self.options.buffer_capacity, input),
            &mut channel
        );
        let total_bits = channel.position();

        // Close on every path so no trailing bits stay buffered
        let closed = channel.close();
        let (input_bytes, header_bits) = encoded?;
        closed?;

        let stats = CompressionStats {
            input_bytes,
            output_bytes: least_bytes_repr_for_bits(total_bits),
            header_bits,
            payload_bits: total_bits - header_bits,
            distinct_symbols: tree.leaf_count()
        };

        debug!(
            "Compressed {} bytes into {} bytes ({} header bits, {} payload bits)",
            stats.input_bytes, stats.output_bytes, stats.header_bits, stats.payload_bits
        );

        Ok(stats)
    }


    /// Decompresses a stream written by [`HuffmanCodec::compress`].
    ///
    /// Decoding stops at the terminator; trailing bytes are ignored.
    /// Fails with [`Error::CorruptHeader`] on a malformed tree and
    /// [`Error::TruncatedStream`] if the input ends before the terminator
    pub fn decompress<R, W>(&self, input: R, output: W) -> Result<DecompressionStats>
    where
        R: Read,
        W: Write
    {
        self.options.validate()?;

        let mut channel = BitChannel::reader(
            BufReader::with_capacity(self.options.buffer_capacity, input)
        );

        let tree = header::read_tree(&mut channel)?;

        trace!("Read a tree of {} leaves in {} bits", tree.leaf_count(), channel.position());

        let mut output = BufWriter::with_capacity(self.options.buffer_capacity, output);

        let decoded = decode(&tree, &mut channel, &mut output);
        let flushed = output.flush();
        let output_bytes = decoded?;
        flushed?;

        let stats = DecompressionStats {
            input_bytes: least_bytes_repr_for_bits(channel.position()),
            output_bytes
        };

        debug!("Decompressed {} bytes into {} bytes", stats.input_bytes, stats.output_bytes);

        Ok(stats)
    }


    /// Compresses the file at `input` into a new file at `output`.
    /// On failure the partially written output file is removed
    pub fn compress_file<P, Q>(&self, input: P, output: Q) -> Result<CompressionStats>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>
    {
        let input = File::open(input)?;
        let output = output.as_ref();
        let file = File::create(output)?;

        discard_on_error(output, self.compress(input, file))
    }


    /// Decompresses the file at `input` into a new file at `output`.
    /// On failure the partially written output file is removed
    pub fn decompress_file<P, Q>(&self, input: P, output: Q) -> Result<DecompressionStats>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>
    {
        let input = File::open(input)?;
        let output = output.as_ref();
        let file = File::create(output)?;

        discard_on_error(output, self.decompress(input, file))
    }

}


/// Writes the header and the payload. Returns the number of input bytes and
/// the size of the header in bits
fn encode<R, W>(tree: &HuffmanTree, codes: &CodeTable, input: R, channel: &mut BitChannel<W>) -> Result<(u64, u64)>
where
    R: Read,
    W: Write
{
    header::write_tree(tree, channel)?;
    let header_bits = channel.position();

    let mut input_bytes = 0;

    for byte in input.bytes() {
        let symbol = Symbol::Byte(byte?);
        channel.write_code(code_of(codes, symbol)?)?;
        input_bytes += 1;
    }

    channel.write_code(code_of(codes, Symbol::Terminator)?)?;

    Ok((input_bytes, header_bits))
}


fn code_of(codes: &CodeTable, symbol: Symbol) -> Result<&Code> {
    codes.get(symbol).ok_or_else(|| {
        // Only reachable if the input changed between the two passes
        Error::Io(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("{symbol} was not counted, the input changed while compressing")
        ))
    })
}


/// Walks the tree bit by bit until the terminator leaf. Returns the number
/// of bytes written
fn decode<R, W>(tree: &HuffmanTree, channel: &mut BitChannel<R>, output: &mut W) -> Result<u64>
where
    R: Read,
    W: Write
{
    let Node::Internal { left, right, .. } = tree.root() else {
        // A lone leaf passed header validation, so it is the terminator
        return Ok(0);
    };

    // Children of the internal node the walk stands on
    let root_children: [&Node; 2] = [left, right];

    let payload_start = channel.position();
    let mut written = 0;
    let mut children = root_children;

    loop {

        let bit = channel.read_bit()
            .map_err(|e| match e {
                Error::EndOfStream => Error::TruncatedStream {
                    bits_read: channel.position() - payload_start
                },
                e => e
            })?;

        match children[bit as usize] {

            Node::Internal { left, right, .. } => {
                children = [left, right];
            },

            Node::Leaf { symbol: Symbol::Terminator, .. } => {
                return Ok(written);
            },

            Node::Leaf { symbol: Symbol::Byte(b), .. } => {
                output.write_all(&[*b])?;
                written += 1;
                children = root_children;
            },
        }
    }
}


fn discard_on_error<T>(path: &Path, result: Result<T>) -> Result<T> {

    if let Err(err) = &result {
        match fs::remove_file(path) {
            Ok(()) => warn!("Removed partial output {} after error: {}", path.display(), err),
            Err(e) => warn!("Could not remove partial output {}: {}", path.display(), e)
        }
    }

    result
}


/// Compresses `input` with the default options
pub fn compress<R, W>(input: R, output: W) -> Result<CompressionStats>
where
    R: Read + Seek,
    W: Write
{
    HuffmanCodec::default().compress(input, output)
}


/// Decompresses `input` with the default options
pub fn decompress<R, W>(input: R, output: W) -> Result<DecompressionStats>
where
    R: Read,
    W: Write
{
    HuffmanCodec::default().decompress(input, output)
}


pub fn compress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut compressed = Vec::new();
    compress(Cursor::new(data), &mut compressed)?;
    Ok(compressed)
}


pub fn decompress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut decompressed = Vec::new();
    decompress(data, &mut decompressed)?;
    Ok(decompressed)
}


pub fn compress_file<P, Q>(input: P, output: Q) -> Result<CompressionStats>
where
    P: AsRef<Path>,
    Q: AsRef<Path>
{
    HuffmanCodec::default().compress_file(input, output)
}


pub fn decompress_file<P, Q>(input: P, output: Q) -> Result<DecompressionStats>
where
    P: AsRef<Path>,
    Q: AsRef<Path>
{
    HuffmanCodec::default().decompress_file(input, output)
}


#[cfg(test)]
mod tests {

    use rand::{rngs::StdRng, Rng, SeedableRng};

    use crate::config::TerminatorPlacement;

    use super::*;


    fn round_trip(codec: &HuffmanCodec, data: &[u8]) -> (Vec<u8>, CompressionStats) {

        let mut compressed = Vec::new();
        let stats = codec.compress(Cursor::new(data), &mut compressed).unwrap();

        assert_eq!(stats.output_bytes, compressed.len() as u64);
        assert_eq!(stats.input_bytes, data.len() as u64);

        let mut decompressed = Vec::new();
        let back = codec.decompress(compressed.as_slice(), &mut decompressed).unwrap();

        assert_eq!(decompressed, data);
        assert_eq!(back.output_bytes, data.len() as u64);
        assert_eq!(back.input_bytes, compressed.len() as u64);

        (compressed, stats)
    }


    #[test]
    fn small_coherency() {

        let (_, stats) = round_trip(&HuffmanCodec::default(), b"aaab");

        assert_eq!(stats.distinct_symbols, 3);
        // a: 1 bit, b and terminator: 2 bits
        assert_eq!(stats.payload_bits, 3 + 2 + 2);
        assert_eq!(stats.header_bits, 1 + 1 + 2 + 10 + 10);
    }


    #[test]
    fn empty_input() {

        let (compressed, stats) = round_trip(&HuffmanCodec::default(), b"");

        // 13 header bits, then the one-bit terminator code
        assert_eq!(compressed, [0b0111_0000, 0b0000_0000]);
        assert_eq!(stats.header_bits, 13);
        assert_eq!(stats.payload_bits, 1);
        assert_eq!(stats.ratio(), None);
    }


    #[test]
    fn repeated_byte() {

        let data = vec![0x41_u8; 10_000];

        let (compressed, stats) = round_trip(&HuffmanCodec::default(), &data);

        assert_eq!(stats.payload_bits, 10_001);
        assert_eq!(compressed.len(), 1252);
        assert!(stats.ratio().unwrap() < 0.13);
    }


    #[test]
    fn check_coherency() {

        let mut rng = StdRng::seed_from_u64(0);

        let codecs = [
            HuffmanCodec::default(),
            HuffmanCodec::new(CodecOptions::new()
                .with_terminator_placement(TerminatorPlacement::BesideMostFrequent)
                .with_buffer_capacity(7)),
        ];

        for _ in 0..50 {

            let len = rng.gen_range(0..20_000);
            let spread = rng.gen_range(1..=256_u32);
            let data: Vec<u8> = (0..len).map(|_| rng.gen_range(0..spread) as u8).collect();

            for codec in &codecs {
                round_trip(codec, &data);
            }
        }
    }


    #[test]
    fn compress_from_current_position() {

        let mut input = Cursor::new(b"skipped|kept".to_vec());
        input.set_position(8);

        let mut compressed = Vec::new();
        let stats = compress(&mut input, &mut compressed).unwrap();

        assert_eq!(stats.input_bytes, 4);
        assert_eq!(decompress_bytes(&compressed).unwrap(), b"kept");
    }


    #[test]
    fn trailing_bytes_are_ignored() {

        let mut compressed = compress_bytes(b"some text").unwrap();
        compressed.extend_from_slice(&[0xFF; 16]);

        assert_eq!(decompress_bytes(&compressed).unwrap(), b"some text");
    }


    #[test]
    fn truncated_payload() {

        let compressed = compress_bytes(&[0x41; 10_000]).unwrap();

        // 13 header bits, then only 'A' codes until the cut
        match decompress_bytes(&compressed[..100]) {
            Err(Error::TruncatedStream { bits_read }) => assert_eq!(bits_read, 800 - 13),
            other => panic!("expected a truncated stream, got {other:?}")
        }
    }


    #[test]
    fn truncated_header() {

        assert!(matches!(decompress_bytes(&[]), Err(Error::CorruptHeader { .. })));
        assert!(matches!(decompress_bytes(&[0b0111_0000]), Err(Error::CorruptHeader { .. })));
    }


    #[test]
    fn walk_restarts_from_root() {

        // Header "0 11 0 10 'a' 10 'b'" gives terminator=0, a=10, b=11.
        // Payload "10 11 10 0"
        let stream = [0x69, 0x86, 0x62, 0b1011_1000];

        assert_eq!(decompress_bytes(&stream).unwrap(), b"aba");

        // Header alone, no payload bits
        assert!(matches!(
            decompress_bytes(&stream[..3]),
            Err(Error::TruncatedStream { bits_read: 0 })
        ));
    }


    #[test]
    fn lone_terminator_decodes_to_nothing() {

        // Header "11": the root is the terminator itself
        assert_eq!(decompress_bytes(&[0b1100_0000]).unwrap(), b"");
    }


    #[test]
    fn invalid_options() {

        let codec = HuffmanCodec::new(CodecOptions::new().with_buffer_capacity(0));

        assert!(matches!(
            codec.compress(Cursor::new(b"data"), Vec::new()),
            Err(Error::InvalidConfig { .. })
        ));
        assert!(matches!(
            codec.decompress(&[0_u8][..], Vec::new()),
            Err(Error::InvalidConfig { .. })
        ));
    }


    #[test]
    fn placement_changes_only_the_shape() {

        let data = b"mostly eeeeeeeeeeeeeeeeeeeeeeeee with some other letters";

        let merged = compress_bytes(data).unwrap();
        let beside = {
            let codec = HuffmanCodec::new(
                CodecOptions::new().with_terminator_placement(TerminatorPlacement::BesideMostFrequent)
            );
            let mut out = Vec::new();
            codec.compress(Cursor::new(data), &mut out).unwrap();
            out
        };

        assert_ne!(merged, beside);
        assert_eq!(decompress_bytes(&merged).unwrap(), data);
        assert_eq!(decompress_bytes(&beside).unwrap(), data);
    }

}
