#![deny(missing_docs)]

//! # intpack: Fixed-Width Integer Packing
//!
//! `intpack` stores large sequences of integers in dense fixed-width arrays
//! instead of variable-length text. For a known value range it picks the
//! narrowest catalog format (byte width and signedness) that holds every
//! value, and every write into the resulting array is bounds-checked so that
//! overflow and underflow are reported instead of wrapping.
//!
//! ## Usage Example
//!
//! ```
//! use intpack::{select_format, Decodable, Encodable, FixedWidthArray, FormatTag};
//!
//! assert_eq!(select_format(-1, 32_769).unwrap(), FormatTag::I32);
//!
//! let values = vec![3i64, -120, 77, 0];
//! let array = FixedWidthArray::from_values(&values).unwrap();
//! assert_eq!(array.tag(), FormatTag::I8);
//!
//! let encoded = array.encode();
//! let decoded = FixedWidthArray::decode(&encoded).unwrap();
//! assert_eq!(decoded, array);
//! ```
//!
//! ## Architecture
//!
//! * **Format**: The ordered catalog of the eight supported formats
//! * **Selector**: First-fit selection of a format for a value range
//! * **Array**: The bounds-checked fixed-width array
//! * **Codec**: Self-describing container layout for arrays

pub mod array;
pub mod codec;
pub mod error;
pub mod format;
pub mod selector;


pub use array::ArrayError;
pub use array::FixedWidthArray;
pub use array::OutOfRange;

pub use codec::Decodable;
pub use codec::DecodeError;
pub use codec::Encodable;
pub use codec::ALLOC_BYTES_LIMIT;

pub use error::Error;

pub use format::format_of;
pub use format::FormatSpec;
pub use format::FormatTag;
pub use format::UnknownTag;
pub use format::CATALOG;

pub use selector::select_for_values;
pub use selector::select_format;
pub use selector::SelectError;
