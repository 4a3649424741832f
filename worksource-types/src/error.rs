use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the work-source crates.
///
/// In-memory mutation of attribution sets never fails; every variant here
/// describes a parcel that could not be written or a byte stream that does
/// not decode to a well-formed set.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum WorkSourceError {
    /// The input ended before a field could be read.
    #[error("unexpected end of parcel reading {field}: needed {needed} bytes, {remaining} left")]
    UnexpectedEof {
        /// Field being decoded (e.g. "entry.id").
        field: String,
        /// Bytes required by the field.
        needed: usize,
        /// Bytes still available in the input.
        remaining: usize,
    },

    /// A count or string length was negative where only `-1` or a
    /// non-negative value is meaningful.
    #[error("negative length for {field}: {value}")]
    NegativeLength {
        /// Field carrying the length.
        field: String,
        /// Raw value read from the wire.
        value: i32,
    },

    /// A count or string length exceeded the configured decoder limit.
    #[error("{field} length {len} exceeds limit {limit}")]
    LimitExceeded {
        /// Field carrying the length.
        field: String,
        /// Length read from the wire.
        len: usize,
        /// Configured limit.
        limit: usize,
    },

    /// A name or tag was not valid UTF-8.
    #[error("invalid utf-8 in {field}")]
    InvalidUtf8 {
        /// Field carrying the string.
        field: String,
    },

    /// Bytes remained after a complete value was decoded.
    #[error("{count} trailing bytes after parcel")]
    TrailingBytes {
        /// Number of unread bytes.
        count: usize,
    },

    /// The same entry id appeared twice in an encoded set.
    #[error("duplicate entry id {id}")]
    DuplicateEntry {
        /// Repeated id.
        id: i32,
    },

    /// A length does not fit the 32-bit count used on the wire.
    #[error("{field} length {len} does not fit in a parcel count")]
    TooLarge {
        /// Field carrying the length.
        field: String,
        /// Length that could not be encoded.
        len: usize,
    },
}

impl WorkSourceError {
    /// Helper: build an `UnexpectedEof` error.
    pub fn eof(field: impl Into<String>, needed: usize, remaining: usize) -> Self {
        Self::UnexpectedEof {
            field: field.into(),
            needed,
            remaining,
        }
    }

    /// Helper: build a `LimitExceeded` error.
    pub fn limit(field: impl Into<String>, len: usize, limit: usize) -> Self {
        Self::LimitExceeded {
            field: field.into(),
            len,
            limit,
        }
    }

    /// Helper: build a `TooLarge` error.
    pub fn too_large(field: impl Into<String>, len: usize) -> Self {
        Self::TooLarge {
            field: field.into(),
            len,
        }
    }

    /// Returns true if this error came from reading malformed input rather
    /// than from writing a value.
    #[must_use]
    pub const fn is_decode(&self) -> bool {
        !matches!(self, Self::TooLarge { .. })
    }
}
