// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! TRILL header validation and manipulation.
//!
//! The TRILL header is six bytes on the wire: a 16-bit flags word
//! (version, multi-destination bit, options length, hop count) followed by
//! the egress and ingress RBridge nicknames. Nicknames are kept raw here;
//! the sentinel and reserved ranges are interpreted by the forwarding
//! pipelines through [`Nickname::from_wire`].

pub mod nickname;
pub mod opt;
pub mod vnt;

pub use nickname::{InvalidNickname, Nickname};

use crate::parse::{DeParse, DeParseError, LengthError, Parse, ParseError};
use core::convert::Infallible;
use core::num::NonZero;

/// A TRILL header.
///
/// The flags word is stored raw; bit-field accessors interpret it.
/// Layout (from the most significant bit): version (2), reserved (2),
/// multi-destination (1), options length in 4-byte units (5),
/// hop count (6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrillHdr {
    flags: u16,
    egress: u16,
    ingress: u16,
}

/// Errors which may occur when building a [`TrillHdr`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrillHdrError {
    /// The options area length does not fit the 5-bit field.
    #[error("options length of {0} units does not fit the 5-bit field")]
    OptsLenTooLarge(u8),
}

impl TrillHdr {
    /// The length (in bytes) of a [`TrillHdr`] on the wire.
    pub const HEADER_LEN: usize = 6;
    /// The TRILL protocol version emitted and accepted by this
    /// implementation.
    pub const PROTOCOL_VERS: u8 = 0;
    /// The hop count stamped on every locally encapsulated frame.
    pub const DEFAULT_HOPS: u8 = 32;

    const VERSION_SHIFT: u16 = 14;
    const MULTIDEST_BIT: u16 = 1 << 11;
    const OPTSLEN_SHIFT: u16 = 6;
    const OPTSLEN_MASK: u16 = 0x1F;
    const HOPCOUNT_MASK: u16 = 0x3F;

    /// Build a header for a locally encapsulated frame.
    ///
    /// Version is [`TrillHdr::PROTOCOL_VERS`] and the hop count starts at
    /// [`TrillHdr::DEFAULT_HOPS`].
    ///
    /// # Errors
    ///
    /// Returns an error if `opts_len_units` does not fit the 5-bit field.
    pub fn new(
        multidest: bool,
        egress: Nickname,
        ingress: Nickname,
        opts_len_units: u8,
    ) -> Result<TrillHdr, TrillHdrError> {
        if u16::from(opts_len_units) > Self::OPTSLEN_MASK {
            return Err(TrillHdrError::OptsLenTooLarge(opts_len_units));
        }
        let mut flags = (u16::from(Self::PROTOCOL_VERS) << Self::VERSION_SHIFT)
            | (u16::from(opts_len_units) << Self::OPTSLEN_SHIFT)
            | u16::from(Self::DEFAULT_HOPS);
        if multidest {
            flags |= Self::MULTIDEST_BIT;
        }
        Ok(TrillHdr {
            flags,
            egress: egress.as_u16(),
            ingress: ingress.as_u16(),
        })
    }

    /// The protocol version carried in the flags word.
    #[must_use]
    pub fn version(&self) -> u8 {
        #[allow(clippy::cast_possible_truncation)] // 2-bit field
        {
            (self.flags >> Self::VERSION_SHIFT) as u8
        }
    }

    /// True iff the frame is a multi-destination (distribution-tree) frame.
    #[must_use]
    pub fn multidest(&self) -> bool {
        self.flags & Self::MULTIDEST_BIT != 0
    }

    /// The length of the options area in 4-byte units.
    #[must_use]
    pub fn opts_len_units(&self) -> u8 {
        #[allow(clippy::cast_possible_truncation)] // 5-bit field
        {
            ((self.flags >> Self::OPTSLEN_SHIFT) & Self::OPTSLEN_MASK) as u8
        }
    }

    /// The length of the options area in bytes.
    #[must_use]
    pub fn opts_len_bytes(&self) -> usize {
        usize::from(self.opts_len_units()) * 4
    }

    /// The remaining hop count.
    #[must_use]
    pub fn hopcount(&self) -> u8 {
        #[allow(clippy::cast_possible_truncation)] // 6-bit field
        {
            (self.flags & Self::HOPCOUNT_MASK) as u8
        }
    }

    /// Decrement the hop count, saturating at zero.
    ///
    /// A zero hop count is left at zero; the caller detects it and drops.
    pub fn dec_hopcount(&mut self) -> &mut Self {
        let hops = self.hopcount();
        if hops > 0 {
            self.flags = (self.flags & !Self::HOPCOUNT_MASK) | u16::from(hops - 1);
        }
        self
    }

    /// The raw egress nickname field.
    #[must_use]
    pub fn egress(&self) -> u16 {
        self.egress
    }

    /// The raw ingress nickname field.
    #[must_use]
    pub fn ingress(&self) -> u16 {
        self.ingress
    }

    /// The egress nickname, if the field holds a legal nickname.
    #[must_use]
    pub fn egress_nickname(&self) -> Option<Nickname> {
        Nickname::from_wire(self.egress)
    }

    /// The ingress nickname, if the field holds a legal nickname.
    #[must_use]
    pub fn ingress_nickname(&self) -> Option<Nickname> {
        Nickname::from_wire(self.ingress)
    }
}

impl Parse for TrillHdr {
    type Error = Infallible;

    fn parse(buf: &[u8]) -> Result<(Self, NonZero<usize>), ParseError<Self::Error>> {
        if buf.len() < Self::HEADER_LEN {
            return Err(ParseError::Length(LengthError {
                expected: NonZero::new(Self::HEADER_LEN).unwrap_or_else(|| unreachable!()),
                actual: buf.len(),
            }));
        }
        let hdr = TrillHdr {
            flags: u16::from_be_bytes([buf[0], buf[1]]),
            egress: u16::from_be_bytes([buf[2], buf[3]]),
            ingress: u16::from_be_bytes([buf[4], buf[5]]),
        };
        let consumed = NonZero::new(Self::HEADER_LEN).unwrap_or_else(|| unreachable!());
        Ok((hdr, consumed))
    }
}

impl DeParse for TrillHdr {
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
        buf[0..2].copy_from_slice(&self.flags.to_be_bytes());
        buf[2..4].copy_from_slice(&self.egress.to_be_bytes());
        buf[4..6].copy_from_slice(&self.ingress.to_be_bytes());
        Ok(self.size())
    }
}

#[cfg(any(test, feature = "arbitrary"))]
mod contract {
    use super::{Nickname, TrillHdr};
    use bolero::{Driver, TypeGenerator};

    impl TypeGenerator for TrillHdr {
        fn generate<D: Driver>(u: &mut D) -> Option<Self> {
            let egress: Nickname = u.produce()?;
            let ingress: Nickname = u.produce()?;
            let multidest: bool = u.produce()?;
            let opts_len_units: u8 = u.produce::<u8>()? & 0x1F;
            TrillHdr::new(multidest, egress, ingress, opts_len_units).ok()
        }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#[cfg(test)]
mod test {
    use super::*;
    use crate::parse::{DeParse, Parse};

    fn nick(raw: u16) -> Nickname {
        Nickname::new(raw).unwrap()
    }

    #[test]
    fn new_header_defaults() {
        let trh = TrillHdr::new(false, nick(0x0002), nick(0x0001), 0).unwrap();
        assert_eq!(trh.version(), TrillHdr::PROTOCOL_VERS);
        assert_eq!(trh.hopcount(), TrillHdr::DEFAULT_HOPS);
        assert!(!trh.multidest());
        assert_eq!(trh.opts_len_bytes(), 0);
        assert_eq!(trh.egress(), 0x0002);
        assert_eq!(trh.ingress(), 0x0001);
    }

    #[test]
    fn opts_len_bounds() {
        assert!(TrillHdr::new(true, nick(1), nick(2), 31).is_ok());
        assert_eq!(
            TrillHdr::new(true, nick(1), nick(2), 32).unwrap_err(),
            TrillHdrError::OptsLenTooLarge(32)
        );
    }

    #[test]
    fn hopcount_saturates_at_zero() {
        let mut trh = TrillHdr::new(false, nick(1), nick(2), 0).unwrap();
        for expected in (0..TrillHdr::DEFAULT_HOPS).rev() {
            trh.dec_hopcount();
            assert_eq!(trh.hopcount(), expected);
        }
        trh.dec_hopcount();
        assert_eq!(trh.hopcount(), 0);
    }

    #[test]
    fn dec_hopcount_touches_nothing_else() {
        bolero::check!().with_type().for_each(|trh: &TrillHdr| {
            let mut decremented = *trh;
            decremented.dec_hopcount();
            assert_eq!(decremented.version(), trh.version());
            assert_eq!(decremented.multidest(), trh.multidest());
            assert_eq!(decremented.opts_len_units(), trh.opts_len_units());
            assert_eq!(decremented.egress(), trh.egress());
            assert_eq!(decremented.ingress(), trh.ingress());
            assert_eq!(decremented.hopcount(), trh.hopcount().saturating_sub(1));
        });
    }

    #[test]
    fn parse_back() {
        bolero::check!().with_type().for_each(|trh: &TrillHdr| {
            let mut buf = [0u8; TrillHdr::HEADER_LEN];
            let written = trh.deparse(&mut buf).unwrap();
            let (parsed, consumed) = TrillHdr::parse(&buf).unwrap();
            assert_eq!(&parsed, trh);
            assert_eq!(consumed, written);
        });
    }

    #[test]
    fn parse_noise_round_trips() {
        bolero::check!()
            .with_type()
            .for_each(|buf: &[u8; TrillHdr::HEADER_LEN]| {
                let (parsed, _) = TrillHdr::parse(buf).unwrap();
                let mut buf2 = [0u8; TrillHdr::HEADER_LEN];
                parsed.deparse(&mut buf2).unwrap();
                assert_eq!(buf, &buf2);
            });
    }

    #[test]
    fn wire_layout() {
        // version 0, multidest set, 3 option units, 32 hops
        let trh = TrillHdr::new(true, nick(0x00aa), nick(0x00bb), 3).unwrap();
        let mut buf = [0u8; TrillHdr::HEADER_LEN];
        trh.deparse(&mut buf).unwrap();
        assert_eq!(buf, [0x08, 0xe0, 0x00, 0xaa, 0x00, 0xbb]);
    }
}
