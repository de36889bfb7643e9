// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The fixed TRILL options word.
//!
//! When the options area is present it begins with this 4-byte word:
//! a 16-bit flag field and a 16-bit flow field. The flow field is reserved
//! for multipath hashing; encoders currently emit both as zero.

use crate::parse::{DeParse, DeParseError, LengthError, Parse, ParseError};
use core::convert::Infallible;
use core::num::NonZero;

/// The fixed options word at the start of a TRILL options area.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TrillOpt {
    flag: u16,
    flow: u16,
}

impl TrillOpt {
    /// The length (in bytes) of the options word on the wire.
    pub const HEADER_LEN: usize = 4;

    /// The option flags.
    #[must_use]
    pub fn flag(&self) -> u16 {
        self.flag
    }

    /// The flow word (reserved for multipath).
    #[must_use]
    pub fn flow(&self) -> u16 {
        self.flow
    }
}

impl Parse for TrillOpt {
    type Error = Infallible;

    fn parse(buf: &[u8]) -> Result<(Self, NonZero<usize>), ParseError<Self::Error>> {
        if buf.len() < Self::HEADER_LEN {
            return Err(ParseError::Length(LengthError {
                expected: NonZero::new(Self::HEADER_LEN).unwrap_or_else(|| unreachable!()),
                actual: buf.len(),
            }));
        }
        let opt = TrillOpt {
            flag: u16::from_be_bytes([buf[0], buf[1]]),
            flow: u16::from_be_bytes([buf[2], buf[3]]),
        };
        let consumed = NonZero::new(Self::HEADER_LEN).unwrap_or_else(|| unreachable!());
        Ok((opt, consumed))
    }
}

impl DeParse for TrillOpt {
    type Error = ();

    fn size(&self) -> NonZero<usize> {
        NonZero::new(Self::HEADER_LEN).unwrap_or_else(|| unreachable!())
    }

    fn deparse(&self, buf: &mut [u8]) -> Result<NonZero<usize>, DeParseError<Self::Error>> {
        if buf.len() < Self::HEADER_LEN {
            return Err(DeParseError::Length(LengthError {
                expected: self.size(),
                actual: buf.len(),
            }));
        }
        buf[0..2].copy_from_slice(&self.flag.to_be_bytes());
        buf[2..4].copy_from_slice(&self.flow.to_be_bytes());
        Ok(self.size())
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod test {
    use super::*;
    use crate::parse::{DeParse, Parse};

    #[test]
    fn default_is_all_zero() {
        let mut buf = [0xffu8; TrillOpt::HEADER_LEN];
        TrillOpt::default().deparse(&mut buf).unwrap();
        assert_eq!(buf, [0u8; TrillOpt::HEADER_LEN]);
    }

    #[test]
    fn parse_back() {
        let raw = [0x12, 0x34, 0x56, 0x78];
        let (opt, consumed) = TrillOpt::parse(&raw).unwrap();
        assert_eq!(opt.flag(), 0x1234);
        assert_eq!(opt.flow(), 0x5678);
        assert_eq!(consumed.get(), TrillOpt::HEADER_LEN);
        let mut buf = [0u8; TrillOpt::HEADER_LEN];
        opt.deparse(&mut buf).unwrap();
        assert_eq!(buf, raw);
    }
}
