//! Top-level error type for the intpack library
//!

use crate::array::ArrayError;
use crate::array::OutOfRange;
use crate::codec::DecodeError;
use crate::format::UnknownTag;
use crate::selector::SelectError;

/// Errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No fixed-width format covers the requested range
    #[error("{0}")]
    Select(#[from] SelectError),
    /// An array operation failed
    #[error("{0}")]
    Array(#[from] ArrayError),
    /// A raw code does not name a catalog format
    #[error("{0}")]
    UnknownTag(#[from] UnknownTag),
    /// A packed container could not be decoded
    #[error("{0}")]
    Decode(#[from] DecodeError),
}

impl From<OutOfRange> for Error {
    fn from(err: OutOfRange) -> Self {
        Error::Array(err.into())
    }
}
