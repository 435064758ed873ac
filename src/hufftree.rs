use std::cmp::Ordering;
use std::fmt;

use crate::bit_vec::BitVec;
use crate::code_table::{Code, CodeTable};
use crate::error::{CodecError, Result};
use crate::frequency::FrequencyTable;
use crate::min_heap::MinHeap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffNode {
    Leaf {
        weight: u64,
        unit: u16,
    },
    Internal {
        weight: u64,
        left: Box<HuffNode>,
        right: Box<HuffNode>,
    },
}

impl HuffNode {
    pub fn new(unit: u16, weight: u64) -> Self {
        HuffNode::Leaf { weight, unit }
    }

    pub fn weight(&self) -> u64 {
        match self {
            HuffNode::Leaf { weight, .. } => *weight,
            HuffNode::Internal { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffNode::Leaf { .. })
    }

    pub fn merge(a: Self, b: Self) -> Self {
        // a is the smaller node
        let weight = a.weight() + b.weight();
        HuffNode::Internal {
            weight,
            left: Box::new(a),
            right: Box::new(b),
        }
    }
}

/// Heap entry ordered by (weight, seq). `seq` is handed out in insertion
/// order, so equal weights pop oldest first and the tree shape is fixed by
/// the frequency table alone.
#[derive(Debug)]
struct Pending {
    seq: usize,
    node: HuffNode,
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        self.node
            .weight()
            .cmp(&other.node.weight())
            .then(self.seq.cmp(&other.seq))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    pub root: HuffNode,
}

impl HuffmanTree {
    /// Builds the tree for `frequencies`.
    ///
    /// Leaves are seeded in ascending (weight, character) order; every merge
    /// takes the two lowest (weight, seq) entries, the first becoming the left
    /// child. Compression and decompression both go through here, so a given
    /// table always yields the same tree.
    pub fn from_frequencies(frequencies: &FrequencyTable) -> Result<Self> {
        let mut leaves: Vec<HuffNode> = frequencies
            .iter()
            .map(|(unit, count)| HuffNode::new(unit, count as u64))
            .collect();
        if leaves.is_empty() {
            return Err(CodecError::EmptyAlphabet);
        }
        // stable: equal weights keep ascending character order
        leaves.sort_by_key(HuffNode::weight);

        let mut seq = leaves.len();
        let mut heap = MinHeap::build(
            leaves
                .into_iter()
                .enumerate()
                .map(|(seq, node)| Pending { seq, node })
                .collect(),
        );

        while heap.len() > 1 {
            let (Some(x), Some(y)) = (heap.extract_min(), heap.extract_min()) else {
                break;
            };
            heap.insert(Pending {
                seq,
                node: HuffNode::merge(x.node, y.node),
            });
            seq += 1;
        }

        let root = heap.into_single().ok_or(CodecError::EmptyAlphabet)?.node;
        Ok(HuffmanTree { root })
    }

    /// Assigns every leaf its root-to-leaf path (left = 0, right = 1).
    ///
    /// A single-leaf tree has no path at all, so its leaf gets the code `0`.
    pub fn generate_table(&self) -> CodeTable {
        let mut table = CodeTable::default();

        if let HuffNode::Leaf { unit, .. } = self.root {
            table.insert(unit, Code::new(0, 1));
            return table;
        }

        let mut stack = vec![(&self.root, Code::new(0, 0))];
        while let Some((node, code)) = stack.pop() {
            match node {
                HuffNode::Leaf { unit, .. } => table.insert(*unit, code),
                HuffNode::Internal { left, right, .. } => {
                    stack.push((right.as_ref(), code.child(true)));
                    stack.push((left.as_ref(), code.child(false)));
                }
            }
        }
        table
    }

    /// Walks `bits` through the tree, emitting a character at every leaf.
    ///
    /// The stream must end exactly on a character boundary and produce
    /// `expected` characters.
    pub fn decode(&self, bits: &BitVec, expected: u64) -> Result<Vec<u16>> {
        let mut result = Vec::with_capacity(expected.min(bits.bit_count() as u64) as usize);

        match &self.root {
            HuffNode::Leaf { unit, .. } => {
                for (i, bit) in bits.iter().enumerate() {
                    if bit {
                        return Err(CodecError::TruncatedBitstream(format!(
                            "bit {i} is 1 in a single-character stream"
                        )));
                    }
                    result.push(*unit);
                }
            }
            HuffNode::Internal { .. } => {
                let mut cursor = &self.root;
                for bit in bits.iter() {
                    if let HuffNode::Internal { left, right, .. } = cursor {
                        cursor = if bit { right.as_ref() } else { left.as_ref() };
                    }
                    if let HuffNode::Leaf { unit, .. } = cursor {
                        result.push(*unit);
                        cursor = &self.root;
                    }
                }
                if !std::ptr::eq(cursor, &self.root) {
                    return Err(CodecError::TruncatedBitstream(
                        "stream ends in the middle of a code".to_string(),
                    ));
                }
            }
        }

        if result.len() as u64 != expected {
            return Err(CodecError::TruncatedBitstream(format!(
                "expected {expected} characters, decoded {}",
                result.len()
            )));
        }
        Ok(result)
    }

    fn fmt_node(f: &mut fmt::Formatter<'_>, node: &HuffNode, depth: usize, label: &str) -> fmt::Result {
        let indent = "  ".repeat(depth);
        match node {
            HuffNode::Leaf { unit, weight } => {
                let shown = char::from_u32(*unit as u32).filter(|c| !c.is_control());
                match shown {
                    Some(c) => writeln!(f, "{indent}{label}-> Leaf: {c:?} ({unit}) [weight: {weight}]"),
                    None => writeln!(f, "{indent}{label}-> Leaf: {unit:#06x} [weight: {weight}]"),
                }
            }
            HuffNode::Internal { weight, left, right } => {
                writeln!(f, "{indent}{label}-> Internal [weight: {weight}]")?;
                Self::fmt_node(f, left, depth + 1, "L")?;
                Self::fmt_node(f, right, depth + 1, "R")
            }
        }
    }
}

impl fmt::Display for HuffmanTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Huffman Tree Structure:")?;
        Self::fmt_node(f, &self.root, 0, "root")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::FrequencyTable;
    use maplit::btreemap;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn unit(c: char) -> u16 {
        c as u16
    }

    fn encode(table: &CodeTable, text: &str) -> BitVec {
        let mut bits = BitVec::new();
        for u in text.encode_utf16() {
            bits.push_code(table.get(u).unwrap());
        }
        bits
    }

    #[test]
    fn abracadabra_codes() {
        let freq = FrequencyTable::from_content("abracadabra").unwrap();
        let tree = HuffmanTree::from_frequencies(&freq).unwrap();
        assert_eq!(tree.root.weight(), 11);

        let table = tree.generate_table();
        let lengths: Vec<(u16, u32)> = table.iter().map(|(u, c)| (u, c.len())).collect();
        // c,d merge first (seq 0,1); then b,r; then (cd),(br); then a joins last
        let expected = btreemap! {
            unit('a') => 1u32,
            unit('b') => 3,
            unit('c') => 3,
            unit('d') => 3,
            unit('r') => 3,
        };
        assert_eq!(lengths, expected.into_iter().collect::<Vec<_>>());
        assert_eq!(table.get(unit('a')), Some(Code::new(0b0, 1)));
        assert_eq!(table.get(unit('c')), Some(Code::new(0b100, 3)));
        assert_eq!(table.get(unit('d')), Some(Code::new(0b101, 3)));
        assert_eq!(table.get(unit('b')), Some(Code::new(0b110, 3)));
        assert_eq!(table.get(unit('r')), Some(Code::new(0b111, 3)));
        assert!(table.is_prefix_free());
        assert_eq!(table.kraft_sum(), 1.0);
    }

    #[test]
    fn rebuild_is_deterministic() {
        let freq = FrequencyTable::from_content("the quick brown fox jumps over the lazy dog").unwrap();
        let first = HuffmanTree::from_frequencies(&freq).unwrap();
        for _ in 0..10 {
            assert_eq!(HuffmanTree::from_frequencies(&freq.clone()).unwrap(), first);
        }
    }

    #[test]
    fn single_leaf_gets_code_zero() {
        let freq = FrequencyTable::from_content("aaaa").unwrap();
        let tree = HuffmanTree::from_frequencies(&freq).unwrap();
        assert!(tree.root.is_leaf());

        let table = tree.generate_table();
        assert_eq!(table.get(unit('a')), Some(Code::new(0, 1)));

        let bits = encode(&table, "aaaa");
        assert_eq!(bits.to_string(), "0000");
        assert_eq!(tree.decode(&bits, 4).unwrap(), vec![unit('a'); 4]);
    }

    #[test]
    fn single_leaf_rejects_one_bits() {
        let freq = FrequencyTable::from_content("aa").unwrap();
        let tree = HuffmanTree::from_frequencies(&freq).unwrap();
        let bits = BitVec::pack("01").unwrap();
        assert!(matches!(tree.decode(&bits, 2), Err(CodecError::TruncatedBitstream(_))));
    }

    #[test]
    fn empty_table_has_no_tree() {
        let empty = FrequencyTable::from_counts(Default::default());
        assert!(matches!(HuffmanTree::from_frequencies(&empty), Err(CodecError::EmptyAlphabet)));
    }

    #[test]
    fn decode_detects_cut_code() {
        let freq = FrequencyTable::from_content("abracadabra").unwrap();
        let tree = HuffmanTree::from_frequencies(&freq).unwrap();
        let bits = encode(&tree.generate_table(), "abracadabra");

        let cut = BitVec::pack(&bits.unpack()[..bits.bit_count() - 1]).unwrap();
        assert!(matches!(tree.decode(&cut, 11), Err(CodecError::TruncatedBitstream(_))));
        assert!(matches!(tree.decode(&bits, 12), Err(CodecError::TruncatedBitstream(_))));

        let decoded = String::from_utf16(&tree.decode(&bits, 11).unwrap()).unwrap();
        assert_eq!(decoded, "abracadabra");
    }

    #[test]
    fn random_tables_are_prefix_free_and_complete() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let symbols = rng.gen_range(2..=256u16);
            let counts = (0..symbols)
                .map(|u| (u, rng.gen_range(1..=1000u32)))
                .collect();
            let freq = FrequencyTable::from_counts(counts);
            let table = HuffmanTree::from_frequencies(&freq).unwrap().generate_table();

            assert_eq!(table.len(), symbols as usize);
            assert!(table.is_prefix_free());
            assert!((table.kraft_sum() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn display_lists_every_leaf() {
        let freq = FrequencyTable::from_content("ab\n").unwrap();
        let dump = HuffmanTree::from_frequencies(&freq).unwrap().to_string();
        assert!(dump.starts_with("Huffman Tree Structure:"));
        assert!(dump.contains("'a'"));
        assert!(dump.contains("'b'"));
        assert!(dump.contains("0x000a"));
    }
}
