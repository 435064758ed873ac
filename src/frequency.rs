use std::collections::BTreeMap;

use crate::error::{CodecError, Result};

/// Occurrence count of every distinct UTF-16 code unit in a text.
///
/// Entries iterate in ascending code-unit order, which keeps the container
/// header byte-for-byte reproducible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: BTreeMap<u16, u32>,
}

impl FrequencyTable {
    /// Counts every code unit of `content`.
    pub fn from_content(content: &str) -> Result<Self> {
        if content.is_empty() {
            return Err(CodecError::EmptyInput);
        }

        let wide = content
            .encode_utf16()
            .fold(BTreeMap::new(), |mut acc, unit| {
                *acc.entry(unit).or_insert(0u64) += 1;
                acc
            });

        // the container stores counts as 4-byte signed integers
        let counts = wide
            .into_iter()
            .map(|(unit, count)| match i32::try_from(count) {
                Ok(c) => Ok((unit, c as u32)),
                Err(_) => Err(CodecError::FormatOverflow(format!(
                    "character {unit:#06x} occurs {count} times"
                ))),
            })
            .collect::<Result<BTreeMap<u16, u32>>>()?;

        Ok(FrequencyTable { counts })
    }

    /// Builds a table from already-validated entries (positive counts, unique characters).
    pub(crate) fn from_counts(counts: BTreeMap<u16, u32>) -> Self {
        FrequencyTable { counts }
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn get(&self, unit: u16) -> Option<u32> {
        self.counts.get(&unit).copied()
    }

    /// Total number of characters the table describes.
    pub fn total(&self) -> u64 {
        self.counts.values().map(|&c| c as u64).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u16, u32)> + '_ {
        self.counts.iter().map(|(&unit, &count)| (unit, count))
    }
}
