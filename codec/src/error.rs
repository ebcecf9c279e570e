//! Error types for codec operations

use thiserror::Error;

/// Error type for codec operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
    #[error("length does not fit in 32 bits: {0}")]
    LengthOverflow(usize),
    #[error("invalid length: {0}")]
    InvalidLength(i64),
    #[error("varint larger than 32 bits")]
    VarintOverflow,
    #[error("exceeded maximum container depth")]
    DepthExceeded,
    #[error("map keys are not in strictly increasing order")]
    NonCanonicalInput,
    #[error("value out of range: {0}")]
    Range(&'static str),
    #[error("not supported: {0}")]
    NotSupported(&'static str),
    #[error("not enough data to complete cobs frame")]
    TruncatedFrame,
    #[error("invalid bool: {0}")]
    InvalidBool(u8),
    #[error("invalid utf-8 in string")]
    InvalidUtf8,
    #[error("extra data found: {0} bytes")]
    ExtraData(usize),
    #[error("buffer too small: {needed} > {available}")]
    BufferTooSmall { needed: usize, available: usize },
}
