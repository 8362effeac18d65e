//! # Fixed-Width Array
//!
//! A homogeneous buffer of integers, every element stored in the same
//! catalog format. The format is fixed when the array is created.
//!
//! ## Invariants
//!
//! - The backing buffer length is always a multiple of the format's byte
//!   width; element `i` lives at `bytes[i * width..(i + 1) * width]`.
//! - Every stored element decodes to a value within the format's bounds.
//!   Writes are bounds-checked before anything is touched, so a rejected
//!   write leaves the array exactly as it was.
//!
//! Elements are little-endian: natural binary for unsigned formats and two's
//! complement for signed formats.

use crate::format::{format_of, FormatSpec, FormatTag};
use crate::selector::{select_for_values, select_format, SelectError};

/// Width of the scratch buffer used to widen elements to `i128`.
const WIDE_BYTES: usize = std::mem::size_of::<i128>();

/// A value did not fit the array's format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum OutOfRange {
    /// The value is below the format's minimum.
    #[error("underflow: {value} is below the minimum {min} of format {format}")]
    Underflow {
        /// The rejected value
        value: i128,
        /// The format's minimum
        min: i128,
        /// The array's format
        format: FormatTag,
    },

    /// The value is above the format's maximum.
    #[error("overflow: {value} is above the maximum {max} of format {format}")]
    Overflow {
        /// The rejected value
        value: i128,
        /// The format's maximum
        max: i128,
        /// The array's format
        format: FormatTag,
    },
}

/// Errors returned by [`FixedWidthArray`] operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArrayError {
    /// A write would not round-trip in the array's format.
    #[error(transparent)]
    OutOfRange(#[from] OutOfRange),

    /// The index is not less than the array length.
    #[error("index {index} is out of bounds for an array of length {len}")]
    IndexOutOfBounds {
        /// The requested index
        index: usize,
        /// The array length
        len: usize,
    },

    /// A raw buffer's length is not a whole number of elements.
    #[error("a buffer of {len} bytes does not hold whole elements of width {width}")]
    MisalignedBuffer {
        /// Raw buffer length in bytes
        len: usize,
        /// Byte width of the format
        width: usize,
    },

    /// The requested number of elements does not fit in addressable memory.
    #[error("{len} elements of width {width} exceed the addressable byte length")]
    CapacityOverflow {
        /// Requested number of elements
        len: usize,
        /// Byte width of the format
        width: usize,
    },

    /// No format could be selected for the requested range.
    #[error(transparent)]
    Select(#[from] SelectError),
}

/// Checks that `value` can be stored in `spec` without loss.
pub fn check_bounds(spec: &FormatSpec, value: i128) -> Result<(), OutOfRange> {
    if value < spec.min_value() {
        return Err(OutOfRange::Underflow {
            value,
            min: spec.min_value(),
            format: spec.tag,
        });
    }

    if value > spec.max_value() {
        return Err(OutOfRange::Overflow {
            value,
            max: spec.max_value(),
            format: spec.tag,
        });
    }

    Ok(())
}

/// Writes `value` into `slot`, which is exactly one element wide.
///
/// The caller must have bounds-checked `value` against the format; the low
/// `slot.len()` bytes of the little-endian `i128` are then its exact
/// representation in both the unsigned and the two's complement case.
fn encode_element(value: i128, slot: &mut [u8]) {
    let wide = value.to_le_bytes();
    slot.copy_from_slice(&wide[..slot.len()]);
}

/// Reads one element back, sign-extending for signed formats.
fn decode_element(spec: &FormatSpec, slot: &[u8]) -> i128 {
    let negative = spec.signed && slot.last().is_some_and(|byte| byte & 0x80 != 0);
    let mut wide = if negative {
        [0xFF; WIDE_BYTES]
    } else {
        [0x00; WIDE_BYTES]
    };
    wide[..slot.len()].copy_from_slice(slot);
    i128::from_le_bytes(wide)
}

/// Byte length of `len` elements of `format`.
fn byte_len(format: &FormatSpec, len: usize) -> Result<usize, ArrayError> {
    len.checked_mul(format.byte_width)
        .ok_or(ArrayError::CapacityOverflow { len, width: format.byte_width })
}

/// A contiguous, bounds-checked array of fixed-width integers.
#[derive(Clone, PartialEq, Eq)]
pub struct FixedWidthArray {
    format: &'static FormatSpec,
    bytes: Vec<u8>,
}

impl FixedWidthArray {
    /// Creates a zero-filled array of `len` elements in the given format.
    ///
    /// ## Errors
    /// * `CapacityOverflow` - `len` elements do not fit in a `usize` byte count
    pub fn new(tag: FormatTag, len: usize) -> Result<Self, ArrayError> {
        let format = format_of(tag);
        Ok(Self {
            format,
            bytes: vec![0; byte_len(format, len)?],
        })
    }

    /// Creates an empty array with room for `capacity` elements.
    pub fn with_capacity(tag: FormatTag, capacity: usize) -> Result<Self, ArrayError> {
        let format = format_of(tag);
        Ok(Self {
            format,
            bytes: Vec::with_capacity(byte_len(format, capacity)?),
        })
    }

    /// Selects the narrowest format for `[min, max]` and creates a
    /// zero-filled array of `len` elements in it.
    pub fn for_range(min: i128, max: i128, len: usize) -> Result<Self, ArrayError> {
        let tag = select_format(min, max)?;
        Self::new(tag, len)
    }

    /// Packs `values` into an array using the narrowest format that holds
    /// all of them.
    pub fn from_values<T>(values: &[T]) -> Result<Self, ArrayError>
    where
        T: Copy + Into<i128>,
    {
        let tag = select_for_values(values)?;
        let mut array = Self::with_capacity(tag, values.len())?;
        for &value in values {
            array.push(value.into())?;
        }

        tracing::debug!(
            format = %tag,
            count = values.len(),
            bytes = array.bytes.len(),
            "packed values into fixed-width array"
        );

        Ok(array)
    }

    /// Rebuilds an array from a raw element buffer, as returned by
    /// [`FixedWidthArray::as_bytes`].
    ///
    /// Every bit pattern of the right width is a valid element, so the only
    /// check is that the buffer holds whole elements.
    pub fn from_raw_parts(tag: FormatTag, bytes: Vec<u8>) -> Result<Self, ArrayError> {
        let format = format_of(tag);
        if bytes.len() % format.byte_width != 0 {
            return Err(ArrayError::MisalignedBuffer {
                len: bytes.len(),
                width: format.byte_width,
            });
        }

        Ok(Self { format, bytes })
    }

    /// The catalog entry every element is stored in.
    pub fn format(&self) -> &'static FormatSpec {
        self.format
    }

    /// Shorthand for `self.format().tag`.
    pub fn tag(&self) -> FormatTag {
        self.format.tag
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.bytes.len() / self.format.byte_width
    }

    /// Whether the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The raw little-endian element buffer.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the array, returning its raw element buffer.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Returns the byte range of element `index`.
    fn slot_range(&self, index: usize) -> Result<std::ops::Range<usize>, ArrayError> {
        let len = self.len();
        if index >= len {
            return Err(ArrayError::IndexOutOfBounds { index, len });
        }

        let start = index * self.format.byte_width;
        Ok(start..start + self.format.byte_width)
    }

    /// Reads element `index`.
    pub fn get(&self, index: usize) -> Result<i128, ArrayError> {
        let range = self.slot_range(index)?;
        Ok(decode_element(self.format, &self.bytes[range]))
    }

    /// Writes `value` at `index`.
    ///
    /// ## Errors
    /// * `IndexOutOfBounds` - `index >= len()`
    /// * `OutOfRange` - the value is outside the format's bounds; the stored
    ///   element is left untouched
    pub fn set(&mut self, index: usize, value: i128) -> Result<(), ArrayError> {
        let range = self.slot_range(index)?;

        if let Err(error) = check_bounds(self.format, value) {
            tracing::trace!(index, %error, "rejected write");
            return Err(error.into());
        }

        encode_element(value, &mut self.bytes[range]);
        Ok(())
    }

    /// Appends `value`, growing the array by one element.
    pub fn push(&mut self, value: i128) -> Result<(), ArrayError> {
        check_bounds(self.format, value)?;

        let start = self.bytes.len();
        self.bytes.resize(start + self.format.byte_width, 0);
        encode_element(value, &mut self.bytes[start..]);
        Ok(())
    }

    /// Iterates over the decoded elements in order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = i128> + '_ {
        self.bytes
            .chunks_exact(self.format.byte_width)
            .map(|slot| decode_element(self.format, slot))
    }
}

impl std::fmt::Debug for FixedWidthArray {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixedWidthArray")
            .field("format", &self.format.tag)
            .field("values", &self.iter().collect::<Vec<_>>())
            .finish()
    }
}
