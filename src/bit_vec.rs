use std::fmt;

use crate::code_table::Code;
use crate::error::{CodecError, Result};

/// Packed bitstream: bit `i` lives in byte `i / 8` at position `7 - i % 8`.
///
/// `bit_count` is authoritative; anything past it in the last byte is padding.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct BitVec {
    bits: Vec<u8>,
    bit_count: usize,
}

impl BitVec {
    pub fn new() -> Self {
        BitVec {
            bits: Vec::new(),
            bit_count: 0,
        }
    }

    /// Packs a textual bit-string made of `'0'` and `'1'`.
    pub fn pack(bits: &str) -> Result<Self> {
        let mut bit_vec = BitVec::with_capacity(bits.len());
        for symbol in bits.chars() {
            match symbol {
                '0' => bit_vec.push_bit(false),
                '1' => bit_vec.push_bit(true),
                other => return Err(CodecError::InvalidBit(other)),
            }
        }
        Ok(bit_vec)
    }

    /// Adopts a payload read from disk, ignoring padding past `bit_count`.
    pub fn from_parts(bits: Vec<u8>, bit_count: usize) -> Result<Self> {
        let needed = byte_len(bit_count);
        if bits.len() < needed {
            return Err(CodecError::TruncatedBitstream(format!(
                "{bit_count} bits need {needed} bytes, only {} available",
                bits.len()
            )));
        }
        Ok(BitVec { bits, bit_count })
    }

    pub fn with_capacity(bit_count: usize) -> Self {
        BitVec {
            bits: Vec::with_capacity(byte_len(bit_count)),
            bit_count: 0,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bits
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bits
    }

    pub fn bit_count(&self) -> usize {
        self.bit_count
    }

    pub fn is_empty(&self) -> bool {
        self.bit_count == 0
    }

    pub fn push_bit(&mut self, bit: bool) {
        let byte_index = self.bit_count / 8;
        let bit_offset = self.bit_count % 8;

        if byte_index >= self.bits.len() {
            self.bits.push(0);
        }

        if bit {
            self.bits[byte_index] |= 1 << (7 - bit_offset);
        }

        self.bit_count += 1;
    }

    /// Appends a code, most significant bit first.
    pub fn push_code(&mut self, code: Code) {
        for bit_pos in (0..code.len()).rev() {
            self.push_bit((code.bits() >> bit_pos) & 1 != 0);
        }
    }

    pub fn get(&self, index: usize) -> Option<bool> {
        if index >= self.bit_count {
            return None;
        }
        Some(self.bits[index / 8] & (1 << (7 - index % 8)) != 0)
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.bit_count).map(move |i| self.bits[i / 8] & (1 << (7 - i % 8)) != 0)
    }

    /// Renders the valid bits back into a `'0'`/`'1'` string.
    pub fn unpack(&self) -> String {
        self.iter().map(|b| if b { '1' } else { '0' }).collect()
    }
}

impl fmt::Display for BitVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.unpack())
    }
}

/// Bytes needed to hold `bit_count` bits.
pub fn byte_len(bit_count: usize) -> usize {
    bit_count.div_ceil(8)
}
