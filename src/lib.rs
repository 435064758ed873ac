//! # text_huffman
//!
//! Lossless Huffman compression for text. A compressed file carries its own
//! frequency table, so the decoder rebuilds the exact same tree without any
//! side channel.
//!
//! ## Quick Start
//!
//! ```no_run
//! // Compress some text to a file
//! text_huffman::compress("abracadabra", "abracadabra.huff")?;
//!
//! // Decompress it again
//! text_huffman::decompress("abracadabra.huff", "abracadabra.txt")?;
//! # Ok::<(), text_huffman::CodecError>(())
//! ```
//!
//! In memory:
//!
//! ```
//! let bytes = text_huffman::compress_to_vec("abracadabra")?;
//! assert_eq!(text_huffman::decompress_from_slice(&bytes)?, "abracadabra");
//! # Ok::<(), text_huffman::CodecError>(())
//! ```

pub mod bit_vec;
pub mod code_table;
pub mod container;
pub mod error;
pub mod frequency;
pub mod huffman_codec;
pub mod hufftree;
pub mod report;

// Internal modules - not part of public API
mod min_heap;

// Re-export main types for convenience
pub use bit_vec::BitVec;
pub use code_table::{Code, CodeTable};
pub use container::CompressedFile;
pub use error::{CodecError, Result};
pub use frequency::FrequencyTable;
pub use huffman_codec::{compress, compress_to_vec, decompress, decompress_from_slice, HuffmanCodec};
pub use hufftree::{HuffNode, HuffmanTree};
