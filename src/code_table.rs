use std::collections::BTreeMap;
use std::fmt;

/// A codeword: the low `len` bits of `bits`, read most significant first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code {
    bits: u64,
    len: u32,
}

impl Code {
    pub const MAX_LEN: u32 = u64::BITS;

    pub fn new(bits: u64, len: u32) -> Self {
        debug_assert!(len <= Self::MAX_LEN);
        Code { bits, len }
    }

    pub fn bits(&self) -> u64 {
        self.bits
    }

    pub fn len(&self) -> u32 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Code one level deeper, with `bit` appended.
    pub fn child(&self, bit: bool) -> Self {
        Code::new((self.bits << 1) | bit as u64, self.len + 1)
    }

    /// Whether `self` is a (non-strict) prefix of `other`.
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        self.len <= other.len
            && other.bits.checked_shr(other.len - self.len).unwrap_or(0) == self.bits
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit_pos in (0..self.len).rev() {
            f.write_str(if (self.bits >> bit_pos) & 1 == 1 { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Character → codeword mapping derived from a [`HuffmanTree`](crate::HuffmanTree).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTable {
    codes: BTreeMap<u16, Code>,
}

impl CodeTable {
    pub(crate) fn insert(&mut self, unit: u16, code: Code) {
        self.codes.insert(unit, code);
    }

    pub fn get(&self, unit: u16) -> Option<Code> {
        self.codes.get(&unit).copied()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u16, Code)> + '_ {
        self.codes.iter().map(|(&unit, &code)| (unit, code))
    }

    /// True when no code is a prefix of another.
    pub fn is_prefix_free(&self) -> bool {
        let codes: Vec<Code> = self.codes.values().copied().collect();
        codes.iter().enumerate().all(|(i, a)| {
            codes
                .iter()
                .enumerate()
                .all(|(j, b)| i == j || !a.is_prefix_of(b))
        })
    }

    /// Sum of 2^-len over all codes; exactly 1.0 for a full binary tree.
    pub fn kraft_sum(&self) -> f64 {
        self.codes.values().map(|c| (-(c.len() as f64)).exp2()).sum()
    }
}
