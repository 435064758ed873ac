use std::io;

use thiserror::Error;

/// Everything that can go wrong while compressing or decompressing.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("nothing to compress: input is empty")]
    EmptyInput,

    #[error("cannot build codes for an empty alphabet")]
    EmptyAlphabet,

    #[error("value does not fit the container format: {0}")]
    FormatOverflow(String),

    #[error("compressed file is truncated while reading {0}")]
    TruncatedFile(&'static str),

    #[error("corrupt header: {0}")]
    CorruptHeader(String),

    #[error("encoded bitstream is truncated or corrupt: {0}")]
    TruncatedBitstream(String),

    #[error("character {0:#06x} has no code")]
    UnknownCharacter(u16),

    #[error("invalid bit symbol {0:?}, expected '0' or '1'")]
    InvalidBit(char),

    #[error("decoded data is not valid UTF-16 text")]
    InvalidText,

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, CodecError>;

impl CodecError {
    /// Maps a short read to `TruncatedFile`, passing other I/O errors through.
    pub(crate) fn reading(field: &'static str) -> impl FnOnce(io::Error) -> CodecError {
        move |e| match e.kind() {
            io::ErrorKind::UnexpectedEof => CodecError::TruncatedFile(field),
            _ => CodecError::Io(e),
        }
    }
}
