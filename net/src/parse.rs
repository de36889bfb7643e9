// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Header parsing and serialization traits.

use core::num::NonZero;

/// Parse a header from the front of a byte buffer.
pub trait Parse: Sized {
    /// Error describing why the bytes do not form a valid header.
    type Error: core::error::Error;

    /// Parse from a buffer, returning the value and the number of bytes
    /// consumed.
    ///
    /// # Errors
    ///
    /// Returns an error in the event that parsing fails.
    fn parse(buf: &[u8]) -> Result<(Self, NonZero<usize>), ParseError<Self::Error>>;
}

/// Write a header to the front of a byte buffer.
pub trait DeParse {
    /// Error describing why the value could not be serialized.
    type Error;

    /// The number of bytes required to serialize this value.
    fn size(&self) -> NonZero<usize>;

    /// Write the value to a buffer.
    ///
    /// Returns the number of bytes written in the event of success.
    ///
    /// # Errors
    ///
    /// Will return an error if there is not enough space in the buffer.
    fn deparse(&self, buf: &mut [u8]) -> Result<NonZero<usize>, DeParseError<Self::Error>>;
}

/// Error for a buffer shorter than the header it should contain.
#[derive(Debug, thiserror::Error)]
#[error("expected at least {expected} bytes, got {actual}")]
pub struct LengthError {
    pub(crate) expected: NonZero<usize>,
    pub(crate) actual: usize,
}

impl LengthError {
    /// The number of bytes the operation needed.
    #[must_use]
    pub fn expected(&self) -> NonZero<usize> {
        self.expected
    }

    /// The number of bytes the buffer actually held.
    #[must_use]
    pub fn actual(&self) -> usize {
        self.actual
    }
}

/// Errors which may occur when parsing a header.
#[derive(Debug, thiserror::Error)]
pub enum ParseError<E> {
    /// The buffer is too short to contain the header.
    #[error(transparent)]
    Length(LengthError),
    /// The bytes are long enough but do not form a valid header.
    #[error("invalid header")]
    Invalid(E),
}

/// Errors which may occur when serializing a header.
#[derive(Debug, thiserror::Error)]
pub enum DeParseError<E> {
    /// The buffer is too short to hold the header.
    #[error(transparent)]
    Length(LengthError),
    /// The value cannot be serialized.
    #[error("invalid header")]
    Invalid(E),
}

/// A cursor which parses consecutive headers from a buffer.
#[derive(Debug)]
pub struct Reader<'buf> {
    inner: &'buf [u8],
    consumed: usize,
}

impl<'buf> Reader<'buf> {
    /// Create a reader over `buf`.
    #[must_use]
    pub fn new(buf: &'buf [u8]) -> Reader<'buf> {
        Reader {
            inner: buf,
            consumed: 0,
        }
    }

    /// The number of bytes consumed so far.
    #[must_use]
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// The number of bytes not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.inner.len() - self.consumed
    }

    /// Parse the next header from the buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the remaining bytes do not parse as a `T`.
    pub fn parse<T: Parse>(&mut self) -> Result<T, ParseError<T::Error>> {
        let (value, len) = T::parse(&self.inner[self.consumed..])?;
        self.consumed += len.get();
        Ok(value)
    }
}
