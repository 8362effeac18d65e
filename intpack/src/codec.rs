//! Self-describing byte layout for [`FixedWidthArray`].
//!
//! ## Format
//!
//! ```text
//! +-----+----------------+------------------------------+
//! | tag | count (u64 LE) | payload (count * width bytes) |
//! +-----+----------------+------------------------------+
//!   1B        8B
//! ```
//!
//! The tag is the ASCII code of the element format and the payload is the
//! array's raw element buffer. Decoding never trusts the header: the payload
//! size is computed with checked arithmetic and compared against an
//! allocation limit before any bytes are copied.

use std::io::{Cursor, Read};

use crate::array::{ArrayError, FixedWidthArray};
use crate::format::{FormatTag, UnknownTag};

/// Default maximum payload size in bytes (64 MiB) accepted by
/// [`Decodable::decode`].
pub const ALLOC_BYTES_LIMIT: u64 = 64 << 20;

/// Size in bytes of the format tag field.
pub const TAG_SIZE: usize = 1;

/// Size in bytes of the element count field.
pub const COUNT_SIZE: usize = std::mem::size_of::<u64>();

/// Size in bytes of the complete header.
pub const HEADER_SIZE: usize = TAG_SIZE + COUNT_SIZE;

/// Types that can be written to the container layout.
pub trait Encodable {
    /// Encodes `self` into a new byte vector.
    fn encode(&self) -> Vec<u8>;
}

/// Types that can be read back from the container layout.
pub trait Decodable: Sized {
    /// Decodes an instance from `bytes`, which must hold exactly one
    /// container.
    fn decode(bytes: &[u8]) -> Result<Self, DecodeError>;
}

/// Errors that can occur while decoding a container.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// Input buffer is empty
    #[error("empty input")]
    EmptyInput,

    /// The tag byte does not name a catalog format
    #[error("unrecognized element format: {0}")]
    UnknownTag(#[from] UnknownTag),

    /// Buffer ended before the header or payload was complete
    #[error("unexpected end of data")]
    UnexpectedEndOfData,

    /// Bytes remain after the payload
    #[error("{0} trailing bytes after the payload")]
    TrailingBytes(usize),

    /// Payload size computation overflowed
    #[error("integer overflow")]
    IntegerOverflow,

    /// Payload size exceeds the allocation limit
    #[error("byte allocation limit exceeded: {0}")]
    ByteAllocationLimit(u64),

    /// The payload could not be turned into an array
    #[error("invalid payload: {0}")]
    Array(#[from] ArrayError),

    /// I/O error while reading the input
    #[error("io error: {0}")]
    IO(#[from] std::io::Error),
}

impl Encodable for FixedWidthArray {
    fn encode(&self) -> Vec<u8> {
        let payload = self.as_bytes();
        let mut result = Vec::with_capacity(HEADER_SIZE + payload.len());

        // The tag codes are all ASCII.
        result.push(self.tag().code() as u8);
        result.extend_from_slice(&(self.len() as u64).to_le_bytes());
        result.extend_from_slice(payload);

        result
    }
}

impl Decodable for FixedWidthArray {
    fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        Self::decode_with_limit(bytes, ALLOC_BYTES_LIMIT)
    }
}

impl FixedWidthArray {
    /// Decodes a container, rejecting payloads larger than `limit` bytes.
    pub fn decode_with_limit(bytes: &[u8], limit: u64) -> Result<Self, DecodeError> {
        if bytes.is_empty() {
            return Err(DecodeError::EmptyInput);
        }

        let mut cursor = Cursor::new(bytes);

        let mut tag = [0u8; TAG_SIZE];
        read_exact(&mut cursor, &mut tag)?;
        let tag = FormatTag::try_from(tag[0])?;

        let mut count = [0u8; COUNT_SIZE];
        read_exact(&mut cursor, &mut count)?;
        let count = u64::from_le_bytes(count);

        let payload_len = count
            .checked_mul(tag.spec().byte_width as u64)
            .ok_or(DecodeError::IntegerOverflow)?;

        if payload_len > limit {
            return Err(DecodeError::ByteAllocationLimit(payload_len));
        }

        let remaining = (bytes.len() - HEADER_SIZE) as u64;
        if remaining < payload_len {
            return Err(DecodeError::UnexpectedEndOfData);
        }
        if remaining > payload_len {
            return Err(DecodeError::TrailingBytes((remaining - payload_len) as usize));
        }

        tracing::trace!(%tag, count, payload_len, "decoding fixed-width array");

        let mut payload = vec![0u8; payload_len as usize];
        read_exact(&mut cursor, &mut payload)?;

        Ok(Self::from_raw_parts(tag, payload)?)
    }
}

/// Reads exactly `buf.len()` bytes, mapping a short read to
/// [`DecodeError::UnexpectedEndOfData`].
fn read_exact(cursor: &mut Cursor<&[u8]>, buf: &mut [u8]) -> Result<(), DecodeError> {
    cursor.read_exact(buf).map_err(|error| match error.kind() {
        std::io::ErrorKind::UnexpectedEof => DecodeError::UnexpectedEndOfData,
        _ => DecodeError::IO(error),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(&[] as &[i64], &[b'B', 0, 0, 0, 0, 0, 0, 0, 0]; "empty array")]
    #[test_case(&[1, 2, 255], &[b'B', 3, 0, 0, 0, 0, 0, 0, 0, 1, 2, 255]; "unsigned 8")]
    #[test_case(&[-1, 300], &[b'h', 2, 0, 0, 0, 0, 0, 0, 0, 0xFF, 0xFF, 0x2C, 0x01]; "signed 16")]
    fn encodes_expected_bytes(values: &[i64], expected: &[u8]) {
        let array = FixedWidthArray::from_values(values).unwrap();
        assert_eq!(array.encode(), expected);
    }

    #[test]
    fn decode_reverses_encode() {
        let values: Vec<i64> = vec![-40_000, 0, 1, 70_000, i32::MAX as i64];
        let array = FixedWidthArray::from_values(&values).unwrap();
        let decoded = FixedWidthArray::decode(&array.encode()).unwrap();

        assert_eq!(decoded, array);
        assert_eq!(decoded.tag(), FormatTag::I32);
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(
            FixedWidthArray::decode(&[]),
            Err(DecodeError::EmptyInput)
        ));
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let bytes = [b'z', 0, 0, 0, 0, 0, 0, 0, 0];
        assert!(matches!(
            FixedWidthArray::decode(&bytes),
            Err(DecodeError::UnknownTag(UnknownTag('z')))
        ));
    }

    #[test_case(&[b'H']; "tag only")]
    #[test_case(&[b'H', 2, 0, 0]; "truncated count")]
    #[test_case(&[b'H', 2, 0, 0, 0, 0, 0, 0, 0, 1, 0, 2]; "truncated payload")]
    fn truncated_input_is_rejected(bytes: &[u8]) {
        assert!(matches!(
            FixedWidthArray::decode(bytes),
            Err(DecodeError::UnexpectedEndOfData)
        ));
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let mut bytes = FixedWidthArray::from_values(&[1u8, 2]).unwrap().encode();
        bytes.extend_from_slice(&[9, 9, 9]);
        assert!(matches!(
            FixedWidthArray::decode(&bytes),
            Err(DecodeError::TrailingBytes(3))
        ));
    }

    #[test]
    fn oversized_payload_is_rejected_before_allocating() {
        let mut bytes = vec![b'q'];
        bytes.extend_from_slice(&(1u64 << 40).to_le_bytes());
        assert!(matches!(
            FixedWidthArray::decode(&bytes),
            Err(DecodeError::ByteAllocationLimit(limit)) if limit == 8 << 40
        ));
    }

    #[test]
    fn payload_size_overflow_is_rejected() {
        let mut bytes = vec![b'Q'];
        bytes.extend_from_slice(&u64::MAX.to_le_bytes());
        assert!(matches!(
            FixedWidthArray::decode(&bytes),
            Err(DecodeError::IntegerOverflow)
        ));
    }

    #[test]
    fn custom_limit_is_honoured() {
        let encoded = FixedWidthArray::from_values(&[1u16, 2, 3, 60_000]).unwrap().encode();

        assert!(FixedWidthArray::decode_with_limit(&encoded, 8).is_ok());
        assert!(matches!(
            FixedWidthArray::decode_with_limit(&encoded, 7),
            Err(DecodeError::ByteAllocationLimit(8))
        ));
    }
}
