//! Flat, 4-byte aligned message codec used to ship attribution sets across
//! process boundaries.
//!
//! Layout:
//! - `i32` values are four little-endian bytes.
//! - An optional string is an `i32` byte length (`-1` when absent) followed by
//!   the UTF-8 bytes, zero-padded to the next multiple of four.
//! - Collections are an `i32` count followed by their elements.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use worksource_types::{CodecLimits, WorkSourceError};

const ABSENT: i32 = -1;

/// Values that can be written to and rebuilt from a parcel.
pub trait Parcelable: Sized {
    /// Append `self` to the writer.
    ///
    /// # Errors
    /// Returns `WorkSourceError::TooLarge` if a collection or string length
    /// does not fit the 32-bit wire count.
    fn write_to_parcel(&self, out: &mut ParcelWriter) -> Result<(), WorkSourceError>;

    /// Decode one value from the reader's current position.
    ///
    /// # Errors
    /// Returns a decode error if the input is truncated, carries invalid
    /// lengths or strings, or exceeds the reader's limits.
    fn read_from_parcel(input: &mut ParcelReader<'_>) -> Result<Self, WorkSourceError>;
}

/// Growable parcel output buffer.
#[derive(Debug, Default)]
pub struct ParcelWriter {
    buf: BytesMut,
}

impl ParcelWriter {
    /// Create an empty writer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: BytesMut::new(),
        }
    }

    /// Write a raw `i32`.
    pub fn write_i32(&mut self, v: i32) {
        self.buf.put_i32_le(v);
    }

    /// Write a collection length as an `i32` count.
    ///
    /// # Errors
    /// Returns `WorkSourceError::TooLarge` if `len` exceeds `i32::MAX`.
    pub fn write_len(&mut self, field: &str, len: usize) -> Result<(), WorkSourceError> {
        let v = i32::try_from(len).map_err(|_| WorkSourceError::too_large(field, len))?;
        self.write_i32(v);
        Ok(())
    }

    /// Write an optional string with its length prefix and padding.
    ///
    /// # Errors
    /// Returns `WorkSourceError::TooLarge` if the string is longer than `i32::MAX` bytes.
    pub fn write_opt_str(&mut self, field: &str, v: Option<&str>) -> Result<(), WorkSourceError> {
        let Some(s) = v else {
            self.write_i32(ABSENT);
            return Ok(());
        };
        self.write_len(field, s.len())?;
        self.buf.put_slice(s.as_bytes());
        self.buf.put_bytes(0, padding(s.len()));
        Ok(())
    }

    /// Number of bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns true if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Finish writing and return the encoded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Bytes {
        self.buf.freeze()
    }
}

/// Cursor over an encoded parcel.
#[derive(Debug)]
pub struct ParcelReader<'a> {
    buf: &'a [u8],
    limits: CodecLimits,
}

impl<'a> ParcelReader<'a> {
    /// Read from `buf` with the default [`CodecLimits`].
    #[must_use]
    pub fn new(buf: &'a [u8]) -> Self {
        Self::with_limits(buf, CodecLimits::default())
    }

    /// Read from `buf` enforcing custom limits.
    #[must_use]
    pub const fn with_limits(buf: &'a [u8], limits: CodecLimits) -> Self {
        Self { buf, limits }
    }

    /// Limits this reader enforces.
    #[must_use]
    pub const fn limits(&self) -> &CodecLimits {
        &self.limits
    }

    /// Bytes not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    /// Read a raw `i32`.
    ///
    /// # Errors
    /// Returns `WorkSourceError::UnexpectedEof` if fewer than four bytes remain.
    pub fn read_i32(&mut self, field: &str) -> Result<i32, WorkSourceError> {
        self.ensure(field, 4)?;
        Ok(self.buf.get_i32_le())
    }

    /// Read a collection count and check it against `limit`.
    ///
    /// # Errors
    /// Returns a decode error if the count is negative, above `limit`, or
    /// the input is truncated.
    pub fn read_len(&mut self, field: &str, limit: usize) -> Result<usize, WorkSourceError> {
        let raw = self.read_i32(field)?;
        let len = usize::try_from(raw).map_err(|_| WorkSourceError::NegativeLength {
            field: field.to_string(),
            value: raw,
        })?;
        if len > limit {
            return Err(WorkSourceError::limit(field, len, limit));
        }
        Ok(len)
    }

    /// Read an optional string written by [`ParcelWriter::write_opt_str`].
    ///
    /// # Errors
    /// Returns a decode error on truncation, a length below `-1`, a length
    /// above `max_string_bytes`, or invalid UTF-8.
    pub fn read_opt_str(&mut self, field: &str) -> Result<Option<String>, WorkSourceError> {
        let raw = self.read_i32(field)?;
        if raw == ABSENT {
            return Ok(None);
        }
        let len = usize::try_from(raw).map_err(|_| WorkSourceError::NegativeLength {
            field: field.to_string(),
            value: raw,
        })?;
        if len > self.limits.max_string_bytes {
            return Err(WorkSourceError::limit(
                field,
                len,
                self.limits.max_string_bytes,
            ));
        }
        let padded = len + padding(len);
        self.ensure(field, padded)?;
        let s = std::str::from_utf8(&self.buf[..len])
            .map_err(|_| WorkSourceError::InvalidUtf8 {
                field: field.to_string(),
            })?
            .to_string();
        self.buf.advance(padded);
        Ok(Some(s))
    }

    /// Assert that the whole input was consumed.
    ///
    /// # Errors
    /// Returns `WorkSourceError::TrailingBytes` if unread bytes remain.
    pub fn finish(self) -> Result<(), WorkSourceError> {
        match self.remaining() {
            0 => Ok(()),
            count => Err(WorkSourceError::TrailingBytes { count }),
        }
    }

    fn ensure(&self, field: &str, needed: usize) -> Result<(), WorkSourceError> {
        if self.buf.remaining() < needed {
            return Err(WorkSourceError::eof(field, needed, self.buf.remaining()));
        }
        Ok(())
    }
}

const fn padding(len: usize) -> usize {
    (4 - len % 4) % 4
}
