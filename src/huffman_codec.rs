use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::bit_vec::BitVec;
use crate::code_table::CodeTable;
use crate::container::CompressedFile;
use crate::error::{CodecError, Result};
use crate::frequency::FrequencyTable;
use crate::hufftree::HuffmanTree;

/// Tree and code table for one frequency table.
///
/// Built fresh for every compress or decompress call; nothing is carried
/// over between calls.
pub struct HuffmanCodec {
    frequencies: FrequencyTable,
    tree: HuffmanTree,
    encode_table: CodeTable,
}

impl HuffmanCodec {
    pub fn new(frequencies: FrequencyTable) -> Result<Self> {
        let tree = HuffmanTree::from_frequencies(&frequencies)?;
        let encode_table = tree.generate_table();
        Ok(HuffmanCodec {
            frequencies,
            tree,
            encode_table,
        })
    }

    /// Analyses `content` and builds the codec for it.
    pub fn for_content(content: &str) -> Result<Self> {
        Self::new(FrequencyTable::from_content(content)?)
    }

    pub fn frequencies(&self) -> &FrequencyTable {
        &self.frequencies
    }

    pub fn tree(&self) -> &HuffmanTree {
        &self.tree
    }

    pub fn code_table(&self) -> &CodeTable {
        &self.encode_table
    }

    /// Encodes `content`, which must only use characters known to this codec.
    pub fn encode(&self, content: &str) -> Result<CompressedFile> {
        let bits = self.encode_bits(content)?;
        Ok(CompressedFile::new(self.frequencies.clone(), bits))
    }

    /// Consumes the codec, encoding `content` without cloning the frequency table.
    pub fn into_compressed(self, content: &str) -> Result<CompressedFile> {
        let bits = self.encode_bits(content)?;
        Ok(CompressedFile::new(self.frequencies, bits))
    }

    fn encode_bits(&self, content: &str) -> Result<BitVec> {
        let mut bit_vec = BitVec::new();
        for unit in content.encode_utf16() {
            let code = self
                .encode_table
                .get(unit)
                .ok_or(CodecError::UnknownCharacter(unit))?;
            bit_vec.push_code(code);
        }
        Ok(bit_vec)
    }

    /// Decodes the payload of a file whose frequency table built this codec.
    pub fn decode(&self, bits: &BitVec) -> Result<String> {
        let units = self.tree.decode(bits, self.frequencies.total())?;
        String::from_utf16(&units).map_err(|_| CodecError::InvalidText)
    }
}

/// Compresses `content` into an in-memory container.
pub fn compress_to_vec(content: &str) -> Result<Vec<u8>> {
    HuffmanCodec::for_content(content)?
        .into_compressed(content)?
        .to_bytes()
}

/// Rebuilds the tree from the container's own frequency table and decodes it.
pub fn decompress_from_slice(bytes: &[u8]) -> Result<String> {
    decode_file(CompressedFile::from_bytes(bytes)?)
}

fn decode_file(file: CompressedFile) -> Result<String> {
    let CompressedFile { frequencies, bits } = file;
    HuffmanCodec::new(frequencies)?.decode(&bits)
}

/// Compresses `content` into a new file at `output_path`.
///
/// Nothing is created when the content cannot be encoded.
pub fn compress(content: &str, output_path: impl AsRef<Path>) -> Result<()> {
    let compressed = HuffmanCodec::for_content(content)?.into_compressed(content)?;
    let bytes = compressed.to_bytes()?;

    let mut writer = BufWriter::new(File::create(output_path)?);
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

/// Decompresses the file at `input_path` and writes the text to `output_path`.
///
/// The output file is only created once decoding has succeeded.
pub fn decompress(input_path: impl AsRef<Path>, output_path: impl AsRef<Path>) -> Result<()> {
    let mut reader = BufReader::new(File::open(input_path)?);
    let content = decode_file(CompressedFile::read_from(&mut reader)?)?;
    fs::write(output_path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    #[test]
    fn abracadabra_roundtrip() {
        let bytes = compress_to_vec("abracadabra").unwrap();
        // 5 entries, 23 bits
        assert_eq!(bytes.len(), 1 + 5 * 6 + 4 + 4 + 3);
        assert_eq!(&bytes[31..35], &23i32.to_be_bytes());
        assert_eq!(decompress_from_slice(&bytes).unwrap(), "abracadabra");
    }

    #[test]
    fn compresses_skewed_text_below_one_byte_per_char() {
        let content = "a".repeat(900) + &"b".repeat(90) + "cdefghij";
        let bytes = compress_to_vec(&content).unwrap();
        assert!(bytes.len() < content.len());
        assert_eq!(decompress_from_slice(&bytes).unwrap(), content);
    }

    #[test]
    fn single_character_roundtrip() {
        let bytes = compress_to_vec("aaaa").unwrap();
        assert_eq!(decompress_from_slice(&bytes).unwrap(), "aaaa");
        assert_eq!(decompress_from_slice(&compress_to_vec("x").unwrap()).unwrap(), "x");
    }

    #[test]
    fn unicode_roundtrip() {
        let content = "Grüße, 世界! 🦀 crabs\r\n\ttabs\0nul";
        assert_eq!(decompress_from_slice(&compress_to_vec(content).unwrap()).unwrap(), content);
    }

    #[test]
    fn random_text_roundtrip() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let len = rng.gen_range(1..2000);
            let alphabet = rng.gen_range(1..=200u32);
            let content: String = (0..len)
                .map(|_| char::from_u32(0x20 + rng.gen_range(0..alphabet)).unwrap())
                .collect();
            let bytes = compress_to_vec(&content).unwrap();
            assert_eq!(decompress_from_slice(&bytes).unwrap(), content);
        }
    }

    #[test]
    fn empty_content_is_rejected() {
        assert!(matches!(compress_to_vec(""), Err(CodecError::EmptyInput)));
    }

    #[test]
    fn too_many_distinct_characters() {
        let content: String = (0..257u32).map(|i| char::from_u32(0x100 + i).unwrap()).collect();
        assert!(matches!(compress_to_vec(&content), Err(CodecError::FormatOverflow(_))));

        let content: String = content.chars().take(256).collect();
        assert_eq!(decompress_from_slice(&compress_to_vec(&content).unwrap()).unwrap(), content);
    }

    #[test]
    fn truncated_payload_fails() {
        let bytes = compress_to_vec("the rain in spain stays mainly in the plain").unwrap();
        assert!(matches!(
            decompress_from_slice(&bytes[..bytes.len() - 1]),
            Err(CodecError::TruncatedFile(_))
        ));
    }

    #[test]
    fn shortened_bit_length_fails() {
        let mut bytes = compress_to_vec("abracadabra").unwrap();
        // 22 bits ends on a code boundary but loses the final 'a'
        bytes[31..35].copy_from_slice(&22i32.to_be_bytes());
        assert!(matches!(decompress_from_slice(&bytes), Err(CodecError::TruncatedBitstream(_))));

        // 20 bits stops inside the code for the last 'r'
        bytes[31..35].copy_from_slice(&20i32.to_be_bytes());
        assert!(matches!(decompress_from_slice(&bytes), Err(CodecError::TruncatedBitstream(_))));
    }

    #[test]
    fn encode_rejects_unknown_character() {
        let codec = HuffmanCodec::for_content("abc").unwrap();
        assert!(matches!(codec.encode("abd"), Err(CodecError::UnknownCharacter(0x64))));
        assert_eq!(codec.code_table().len(), 3);
        assert_eq!(codec.tree().root.weight(), 3);
        assert_eq!(codec.frequencies().total(), 3);
    }

    #[test]
    fn repeated_compression_is_identical() {
        let text = "she sells sea shells by the sea shore";
        let first = compress_to_vec(text).unwrap();
        assert_eq!(compress_to_vec(text).unwrap(), first);
    }
}
