//! Implementations of the `intpack` subcommands.
//!
//! Each command takes its input already read into memory and writes to a
//! caller-supplied writer, so the binary only deals with choosing files and
//! streams.

use std::io::Write;

use intpack::{select_format, Encodable as _, FixedWidthArray, FormatTag, CATALOG};
use num_bigint::BigInt;

/// Errors produced by the subcommands.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// An input token is not an integer that fits in 128 bits.
    #[error("invalid integer '{token}' at position {position}: {source}")]
    ParseValue {
        /// The offending token
        token: String,
        /// Zero-based index of the token in the input
        position: usize,
        /// The underlying parse error
        #[source]
        source: std::num::ParseIntError,
    },

    /// A library operation failed.
    #[error(transparent)]
    Intpack(#[from] intpack::Error),

    /// Hex input could not be decoded.
    #[error("invalid hex input: {0}")]
    Hex(#[from] hex::FromHexError),

    /// JSON output could not be produced.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading or writing failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<intpack::ArrayError> for CommandError {
    fn from(err: intpack::ArrayError) -> Self {
        CommandError::Intpack(err.into())
    }
}

impl From<intpack::SelectError> for CommandError {
    fn from(err: intpack::SelectError) -> Self {
        CommandError::Intpack(err.into())
    }
}

impl From<intpack::DecodeError> for CommandError {
    fn from(err: intpack::DecodeError) -> Self {
        CommandError::Intpack(err.into())
    }
}

/// Writes the format catalog, one JSON object per line.
pub fn formats(out: &mut impl Write) -> Result<(), CommandError> {
    for spec in &CATALOG {
        let line = serde_json::json!({
            "tag": spec.tag,
            "name": spec.name,
            "byte_width": spec.byte_width,
            "signed": spec.signed,
            // Bounds are strings, u64::MAX does not survive every JSON reader.
            "min": spec.min_value().to_string(),
            "max": spec.max_value().to_string(),
        });
        serde_json::to_writer(&mut *out, &line)?;
        writeln!(out)?;
    }

    Ok(())
}

/// Selects the format for `[min, max]` and writes its tag and name.
pub fn select(min: BigInt, max: BigInt, out: &mut impl Write) -> Result<FormatTag, CommandError> {
    let tag = select_format(min, max)?;
    writeln!(out, "{}\t{}", tag, tag.spec().name)?;
    Ok(tag)
}

/// Parses whitespace-separated integers.
pub fn parse_values(text: &str) -> Result<Vec<i128>, CommandError> {
    text.split_whitespace()
        .enumerate()
        .map(|(position, token)| {
            token.parse::<i128>().map_err(|source| CommandError::ParseValue {
                token: token.to_string(),
                position,
                source,
            })
        })
        .collect()
}

/// Packs `values`, into `format` when given, otherwise into the narrowest
/// format that holds all of them.
pub fn pack(values: &[i128], format: Option<FormatTag>) -> Result<FixedWidthArray, CommandError> {
    let array = match format {
        Some(tag) => {
            let mut array = FixedWidthArray::with_capacity(tag, values.len())?;
            for &value in values {
                array.push(value)?;
            }
            array
        }
        None => FixedWidthArray::from_values(values)?,
    };

    tracing::info!(
        format = %array.tag(),
        count = array.len(),
        payload_bytes = array.as_bytes().len(),
        "packed values"
    );

    Ok(array)
}

/// Encodes `array` as a container. With `hex_output` the bytes are written
/// as a single line of lowercase hex.
pub fn write_container(
    array: &FixedWidthArray,
    hex_output: bool,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let encoded = array.encode();
    if hex_output {
        writeln!(out, "{}", hex::encode(encoded))?;
    } else {
        out.write_all(&encoded)?;
    }

    Ok(())
}

/// Decodes a container read from `input`, which is hex text when
/// `hex_input` is set.
pub fn unpack(input: &[u8], hex_input: bool, limit: u64) -> Result<FixedWidthArray, CommandError> {
    let bytes = if hex_input {
        hex::decode(String::from_utf8_lossy(input).trim())?
    } else {
        input.to_vec()
    };

    let array = FixedWidthArray::decode_with_limit(&bytes, limit)?;
    tracing::debug!(format = %array.tag(), count = array.len(), "unpacked container");

    Ok(array)
}

/// Writes every element of `array`, one per line.
pub fn write_values(array: &FixedWidthArray, out: &mut impl Write) -> Result<(), CommandError> {
    for value in array.iter() {
        writeln!(out, "{value}")?;
    }

    Ok(())
}
