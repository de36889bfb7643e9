// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The virtual-network (VNT) TRILL header extension.
//!
//! The extension is eight bytes on the wire: a 16-bit flags word
//! (app, nc, type, mu, length), a reserved 16-bit word, and a 32-bit word
//! whose low 24 bits carry the [`Vni`]. The `length` field counts the
//! 4-byte payload units that follow the flags word, so it is 1 here.

use crate::parse::{DeParse, DeParseError, LengthError, Parse, ParseError};
use core::num::NonZero;
use tracing::instrument;

/// A virtual-network identifier.
///
/// The [`Vni`] is a 24-bit value that identifies a virtual network.
///
/// Value 0 is reserved and means "no virtual network"; the maximum legal
/// value is 2^24 - 1.
///
/// It is deliberately not possible to create a [`Vni`] from a `u32`
/// directly, as this would allow the creation of illegal values.
/// Instead, use [`Vni::new`].
///
/// # Note
///
/// This type is marked `#[repr(transparent)]` to ensure that it has the same
/// memory layout as a [`NonZero<u32>`], so [`Option<Vni>`] has the same size
/// and alignment as `u32`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Vni(NonZero<u32>);

/// Errors that can occur when converting a `u32` to a [`Vni`]
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[must_use]
pub enum InvalidVni {
    /// Zero is reserved and means "no virtual network".
    #[error("zero is not a legal Vni")]
    ReservedZero,
    /// The value is too large to be a [`Vni`] (max is 2^24 - 1).
    #[error("{0} is too large to be a legal Vni (max is 2^24 - 1)")]
    TooLarge(u32),
}

impl Vni {
    /// The minimum legal [`Vni`] value (1).
    pub const MIN: u32 = 1;
    /// The maximum legal [`Vni`] value (2^24 - 1).
    pub const MAX: u32 = 0x00FF_FFFF;

    #[instrument(level = "trace")]
    /// Create a new [`Vni`] from a `u32`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is 0 or greater than [`Vni::MAX`].
    pub fn new(vni: u32) -> Result<Vni, InvalidVni> {
        match NonZero::<u32>::new(vni) {
            None => Err(InvalidVni::ReservedZero),
            Some(vni) => {
                if vni.get() > Vni::MAX {
                    Err(InvalidVni::TooLarge(vni.get()))
                } else {
                    Ok(Vni(vni))
                }
            }
        }
    }

    /// Get the value of the [`Vni`] as a `u32`.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0.get()
    }
}

impl From<Vni> for u32 {
    fn from(vni: Vni) -> u32 {
        vni.as_u32()
    }
}

impl TryFrom<u32> for Vni {
    type Error = InvalidVni;

    fn try_from(vni: u32) -> Result<Vni, Self::Error> {
        Vni::new(vni)
    }
}

impl core::fmt::Display for Vni {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "{}", self.as_u32())
    }
}

/// The VNT TRILL header extension.
///
/// The raw words are stored as parsed; bit-field accessors interpret the
/// flags word. Flags layout (from the most significant bit): app (1),
/// nc (1), type (4), mu (1), length (5), reserved (4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VntExtension {
    flags: u16,
    reserved: u16,
    vni: u32,
}

impl VntExtension {
    /// The length (in bytes) of the extension on the wire.
    pub const HEADER_LEN: usize = 8;
    /// The extension type value naming the VNT extension.
    ///
    /// This is a protocol constant agreed with the peer implementation;
    /// frames carrying any other type in the extension slot are dropped.
    pub const EXTENSION_TYPE: u8 = 1;
    /// The value of the `length` field: 4-byte payload units following the
    /// flags word.
    pub const EXTENSION_LENGTH: u8 = 1;

    const TYPE_SHIFT: u16 = 10;
    const TYPE_MASK: u16 = 0xF;
    const LENGTH_SHIFT: u16 = 4;
    const LENGTH_MASK: u16 = 0x1F;
    const VNI_MASK: u32 = Vni::MAX;

    /// Build the extension carrying `vni`.
    ///
    /// The app, nc and mu bits are zero; type and length are the protocol
    /// constants.
    #[must_use]
    pub fn new(vni: Vni) -> VntExtension {
        let flags = (u16::from(Self::EXTENSION_TYPE) << Self::TYPE_SHIFT)
            | (u16::from(Self::EXTENSION_LENGTH) << Self::LENGTH_SHIFT);
        VntExtension {
            flags,
            reserved: 0,
            vni: vni.as_u32(),
        }
    }

    /// The extension type field.
    #[must_use]
    pub fn extension_type(&self) -> u8 {
        #[allow(clippy::cast_possible_truncation)] // 4-bit field
        {
            ((self.flags >> Self::TYPE_SHIFT) & Self::TYPE_MASK) as u8
        }
    }

    /// The length field (4-byte payload units following the flags word).
    #[must_use]
    pub fn length(&self) -> u8 {
        #[allow(clippy::cast_possible_truncation)] // 5-bit field
        {
            ((self.flags >> Self::LENGTH_SHIFT) & Self::LENGTH_MASK) as u8
        }
    }

    /// The carried [`Vni`], if the field holds a legal value.
    #[must_use]
    pub fn vni(&self) -> Option<Vni> {
        Vni::new(self.vni & Self::VNI_MASK).ok()
    }
}

impl Parse for VntExtension {
    type Error = core::convert::Infallible;

    fn parse(buf: &[u8]) -> Result<(Self, NonZero<usize>), ParseError<Self::Error>> {
        if buf.len() < Self::HEADER_LEN {
            return Err(ParseError::Length(LengthError {
                expected: NonZero::new(Self::HEADER_LEN).unwrap_or_else(|| unreachable!()),
                actual: buf.len(),
            }));
        }
        let ext = VntExtension {
            flags: u16::from_be_bytes([buf[0], buf[1]]),
            reserved: u16::from_be_bytes([buf[2], buf[3]]),
            vni: u32::from_be_bytes([buf[4], buf[5], buf[6], buf[7]]),
        };
        let consumed = NonZero::new(Self::HEADER_LEN).unwrap_or_else(|| unreachable!());
        Ok((ext, consumed))
    }
}

impl DeParse for VntExtension {
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
        buf[2..4].copy_from_slice(&self.reserved.to_be_bytes());
        buf[4..8].copy_from_slice(&self.vni.to_be_bytes());
        Ok(self.size())
    }
}

#[cfg(any(test, feature = "arbitrary"))]
mod contract {
    use super::Vni;
    use bolero::{Driver, TypeGenerator};

    impl TypeGenerator for Vni {
        fn generate<D: Driver>(u: &mut D) -> Option<Self> {
            let raw = u.produce::<u32>()? % Vni::MAX + 1;
            Vni::new(raw).ok()
        }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#[cfg(test)]
mod test {
    use super::*;
    use crate::parse::{DeParse, Parse};

    #[test]
    fn vni_bounds() {
        bolero::check!()
            .with_type()
            .cloned()
            .for_each(|val: u32| match val {
                0 => {
                    assert_eq!(Vni::new(val).unwrap_err(), InvalidVni::ReservedZero);
                }
                val if val > Vni::MAX => {
                    assert_eq!(Vni::new(val).unwrap_err(), InvalidVni::TooLarge(val));
                }
                _ => {
                    assert_eq!(Vni::new(val).unwrap().as_u32(), val);
                }
            });
    }

    #[test]
    fn extension_carries_protocol_constants() {
        let ext = VntExtension::new(Vni::new(0x1234).unwrap());
        assert_eq!(ext.extension_type(), VntExtension::EXTENSION_TYPE);
        assert_eq!(ext.length(), VntExtension::EXTENSION_LENGTH);
        assert_eq!(ext.vni().unwrap().as_u32(), 0x1234);
    }

    #[test]
    fn parse_back() {
        bolero::check!().with_type().for_each(|vni: &Vni| {
            let ext = VntExtension::new(*vni);
            let mut buf = [0u8; VntExtension::HEADER_LEN];
            let written = ext.deparse(&mut buf).unwrap();
            let (parsed, consumed) = VntExtension::parse(&buf).unwrap();
            assert_eq!(parsed, ext);
            assert_eq!(consumed, written);
            assert_eq!(parsed.vni(), Some(*vni));
        });
    }

    #[test]
    fn parse_noise_round_trips() {
        bolero::check!()
            .with_type()
            .for_each(|buf: &[u8; VntExtension::HEADER_LEN]| {
                let (parsed, _) = VntExtension::parse(buf).unwrap();
                let mut buf2 = [0u8; VntExtension::HEADER_LEN];
                parsed.deparse(&mut buf2).unwrap();
                assert_eq!(buf, &buf2);
            });
    }

    #[test]
    fn vni_field_is_24_bits() {
        let raw = [0x04, 0x10, 0x00, 0x00, 0xab, 0x12, 0x34, 0x56];
        let (ext, _) = VntExtension::parse(&raw).unwrap();
        // the top byte of the last word is ignored
        assert_eq!(ext.vni().unwrap().as_u32(), 0x0012_3456);
    }
}
