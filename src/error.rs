use std::io;
use thiserror::Error;

use crate::header::SioType;

pub type Result<T, E = SioError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum SioError {
    /// A frame began with a byte other than the tag the reader required.
    #[error("Unexpected tag 0x{found:02x} (expected 0x{expected:02x})")]
    UnexpectedTag { expected: u8, found: u8 },
    #[error("Invalid tag byte 0x{0:02x}")]
    InvalidTag(u8),
    /// The Unit tag (0x1f) is reserved and carries no frame semantics.
    #[error("Reserved tag 0x1f (Unit) has no frame encoding")]
    ReservedTag,
    #[error("Bad signature byte 0x{found:02x} at position {position}")]
    BadSignature { position: usize, found: u8 },
    #[error("Wrong type {found} (expected {expected})")]
    WrongType { expected: SioType, found: SioType },
    #[error("File has no type bound; cannot write header")]
    MissingType,
    #[error("Truncated payload: declared {declared} bytes, only {available} available")]
    Truncated { declared: usize, available: usize },
    #[error("Length {0} exceeds the 21-bit frame length limit")]
    LengthOverflow(usize),
    #[error("Unknown content type: {0}")]
    UnknownContentType(String),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
