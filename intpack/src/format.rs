//! # Format Catalog
//!
//! The fixed table of integer formats an array element can be stored in.
//! Each entry couples a single-character tag with a byte width and a
//! signedness flag. The representable bounds of an entry are never stored;
//! they are derived from the width and signedness on demand:
//!
//! ```text
//! top      = 256^width
//! signed   : [-top/2, top/2 - 1]
//! unsigned : [0,      top   - 1]
//! ```
//!
//! ## Ordering
//!
//! [`CATALOG`] is ordered by ascending byte width and, within a width,
//! unsigned before signed. The width selector walks the catalog front to back
//! and takes the first entry that fits, so this order is the selection
//! preference and must not be derived from anything else.

use std::fmt;

/// Number of entries in the format catalog.
pub const CATALOG_LEN: usize = 8;

/// Identifies one entry of the [`CATALOG`].
///
/// The variants are declared in catalog order, so the derived `Ord` matches
/// the selection preference (narrower first, unsigned before signed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(try_from = "char", into = "char")]
pub enum FormatTag {
    /// Unsigned 8-bit (`B`)
    U8,
    /// Signed 8-bit (`b`)
    I8,
    /// Unsigned 16-bit (`H`)
    U16,
    /// Signed 16-bit (`h`)
    I16,
    /// Unsigned 32-bit (`I`)
    U32,
    /// Signed 32-bit (`i`)
    I32,
    /// Unsigned 64-bit (`Q`)
    U64,
    /// Signed 64-bit (`q`)
    I64,
}

/// Returned when a raw code does not name any catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown format tag: {0:?}")]
pub struct UnknownTag(pub char);

impl FormatTag {
    /// All tags in catalog order.
    pub const ALL: [FormatTag; CATALOG_LEN] = [
        FormatTag::U8,
        FormatTag::I8,
        FormatTag::U16,
        FormatTag::I16,
        FormatTag::U32,
        FormatTag::I32,
        FormatTag::U64,
        FormatTag::I64,
    ];

    /// The canonical single-character code of this tag.
    pub const fn code(self) -> char {
        match self {
            FormatTag::U8 => 'B',
            FormatTag::I8 => 'b',
            FormatTag::U16 => 'H',
            FormatTag::I16 => 'h',
            FormatTag::U32 => 'I',
            FormatTag::I32 => 'i',
            FormatTag::U64 => 'Q',
            FormatTag::I64 => 'q',
        }
    }

    /// Position of this tag's entry in the [`CATALOG`].
    pub const fn position(self) -> usize {
        self as usize
    }

    /// The catalog entry for this tag.
    pub fn spec(self) -> &'static FormatSpec {
        &CATALOG[self.position()]
    }
}

impl TryFrom<char> for FormatTag {
    type Error = UnknownTag;

    fn try_from(code: char) -> Result<Self, Self::Error> {
        match code {
            'B' => Ok(FormatTag::U8),
            'b' => Ok(FormatTag::I8),
            'H' => Ok(FormatTag::U16),
            'h' => Ok(FormatTag::I16),
            'I' => Ok(FormatTag::U32),
            'i' => Ok(FormatTag::I32),
            'Q' => Ok(FormatTag::U64),
            'q' => Ok(FormatTag::I64),
            other => Err(UnknownTag(other)),
        }
    }
}

impl TryFrom<u8> for FormatTag {
    type Error = UnknownTag;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        FormatTag::try_from(char::from(byte))
    }
}

impl std::str::FromStr for FormatTag {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(code), None) => FormatTag::try_from(code),
            (Some(code), Some(_)) => Err(UnknownTag(code)),
            (None, _) => Err(UnknownTag('\0')),
        }
    }
}

impl From<FormatTag> for char {
    fn from(tag: FormatTag) -> Self {
        tag.code()
    }
}

impl fmt::Display for FormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A single catalog entry.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct FormatSpec {
    /// The tag naming this entry.
    pub tag: FormatTag,
    /// Descriptive label, e.g. "signed short".
    pub name: &'static str,
    /// Number of bytes used per element; one of 1, 2, 4 or 8.
    pub byte_width: usize,
    /// Whether values are stored in two's complement.
    pub signed: bool,
}

impl FormatSpec {
    /// `256^byte_width`, the number of distinct values the width can hold.
    pub const fn top_value(&self) -> i128 {
        1i128 << (8 * self.byte_width)
    }

    /// Smallest representable value.
    pub const fn min_value(&self) -> i128 {
        if self.signed {
            -(self.top_value() / 2)
        } else {
            0
        }
    }

    /// Largest representable value.
    pub const fn max_value(&self) -> i128 {
        if self.signed {
            self.top_value() / 2 - 1
        } else {
            self.top_value() - 1
        }
    }

    /// Whether `value` can be stored without loss.
    pub const fn contains(&self, value: i128) -> bool {
        self.min_value() <= value && value <= self.max_value()
    }
}

impl fmt::Display for FormatSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.tag, self.name)
    }
}

/// The format catalog, in selection preference order.
#[rustfmt::skip]
pub static CATALOG: [FormatSpec; CATALOG_LEN] = [
    FormatSpec { tag: FormatTag::U8,  name: "unsigned char",      byte_width: 1, signed: false },
    FormatSpec { tag: FormatTag::I8,  name: "signed char",        byte_width: 1, signed: true  },
    FormatSpec { tag: FormatTag::U16, name: "unsigned short",     byte_width: 2, signed: false },
    FormatSpec { tag: FormatTag::I16, name: "signed short",       byte_width: 2, signed: true  },
    FormatSpec { tag: FormatTag::U32, name: "unsigned int",       byte_width: 4, signed: false },
    FormatSpec { tag: FormatTag::I32, name: "signed int",         byte_width: 4, signed: true  },
    FormatSpec { tag: FormatTag::U64, name: "unsigned long long", byte_width: 8, signed: false },
    FormatSpec { tag: FormatTag::I64, name: "signed long long",   byte_width: 8, signed: true  },
];

/// Looks up the catalog entry for `tag`.
pub fn format_of(tag: FormatTag) -> &'static FormatSpec {
    tag.spec()
}
