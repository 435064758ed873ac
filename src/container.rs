//! On-disk layout of a compressed file. All integers are big-endian:
//!
//! | field             | size    |
//! |-------------------|---------|
//! | distinct chars    | 1       |
//! | (char, frequency) | 2 + 4 each |
//! | bit length        | 4       |
//! | payload length    | 4       |
//! | payload           | payload length |
//!
//! There is no magic number or version; anything that does not parse is corrupt.

use std::collections::BTreeMap;
use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::bit_vec::{byte_len, BitVec};
use crate::error::{CodecError, Result};
use crate::frequency::FrequencyTable;

/// Largest alphabet the one-byte count field can describe (256 is stored as 0).
pub const MAX_DISTINCT_CHARS: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedFile {
    pub frequencies: FrequencyTable,
    pub bits: BitVec,
}

impl CompressedFile {
    pub fn new(frequencies: FrequencyTable, bits: BitVec) -> Self {
        CompressedFile { frequencies, bits }
    }

    /// Size of the serialized container in bytes.
    pub fn encoded_len(&self) -> usize {
        1 + 6 * self.frequencies.len() + 4 + 4 + self.bits.as_bytes().len()
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        let distinct = self.frequencies.len();
        if distinct == 0 {
            return Err(CodecError::EmptyAlphabet);
        }
        if distinct > MAX_DISTINCT_CHARS {
            return Err(CodecError::FormatOverflow(format!(
                "{distinct} distinct characters, at most {MAX_DISTINCT_CHARS} fit the header"
            )));
        }
        let bit_count = i32::try_from(self.bits.bit_count()).map_err(|_| {
            CodecError::FormatOverflow(format!("{} encoded bits", self.bits.bit_count()))
        })?;
        let payload = self.bits.as_bytes();
        let payload_len = i32::try_from(payload.len())
            .map_err(|_| CodecError::FormatOverflow(format!("{} payload bytes", payload.len())))?;

        // 256 wraps to 0; an empty table is never written
        writer.write_u8(distinct as u8)?;
        for (unit, count) in self.frequencies.iter() {
            let count = i32::try_from(count).map_err(|_| {
                CodecError::FormatOverflow(format!("frequency {count} of character {unit:#06x}"))
            })?;
            writer.write_u16::<BigEndian>(unit)?;
            writer.write_i32::<BigEndian>(count)?;
        }
        writer.write_i32::<BigEndian>(bit_count)?;
        writer.write_i32::<BigEndian>(payload_len)?;
        writer.write_all(payload)?;
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(self.encoded_len());
        self.write_to(&mut bytes)?;
        Ok(bytes)
    }

    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let distinct = match reader.read_u8().map_err(CodecError::reading("character count"))? {
            0 => MAX_DISTINCT_CHARS,
            n => n as usize,
        };

        let mut counts = BTreeMap::new();
        for _ in 0..distinct {
            let unit = reader
                .read_u16::<BigEndian>()
                .map_err(CodecError::reading("frequency table"))?;
            let count = reader
                .read_i32::<BigEndian>()
                .map_err(CodecError::reading("frequency table"))?;
            if count <= 0 {
                return Err(CodecError::CorruptHeader(format!(
                    "character {unit:#06x} has frequency {count}"
                )));
            }
            if counts.insert(unit, count as u32).is_some() {
                return Err(CodecError::CorruptHeader(format!(
                    "character {unit:#06x} listed twice"
                )));
            }
        }

        let bit_count = reader
            .read_i32::<BigEndian>()
            .map_err(CodecError::reading("bit length"))?;
        let payload_len = reader
            .read_i32::<BigEndian>()
            .map_err(CodecError::reading("payload length"))?;
        if bit_count < 0 || payload_len < 0 {
            return Err(CodecError::CorruptHeader(format!(
                "negative length (bits {bit_count}, payload {payload_len})"
            )));
        }
        let (bit_count, payload_len) = (bit_count as usize, payload_len as usize);
        if byte_len(bit_count) != payload_len {
            return Err(CodecError::CorruptHeader(format!(
                "{bit_count} bits cannot occupy {payload_len} payload bytes"
            )));
        }

        let mut payload = vec![0u8; payload_len];
        reader
            .read_exact(&mut payload)
            .map_err(CodecError::reading("payload"))?;

        Ok(CompressedFile {
            frequencies: FrequencyTable::from_counts(counts),
            bits: BitVec::from_parts(payload, bit_count)?,
        })
    }

    pub fn from_bytes(mut bytes: &[u8]) -> Result<Self> {
        Self::read_from(&mut bytes)
    }
}
