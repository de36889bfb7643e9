// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! VLAN validation and manipulation.

use crate::eth::ethtype::EthType;
use crate::parse::{DeParse, DeParseError, LengthError, Parse, ParseError};
use core::num::NonZero;
use etherparse::{SingleVlanHeader, VlanId, VlanPcp};

/// A VLAN Identifier.
///
/// This type is marked `#[repr(transparent)]` to ensure that it has the same
/// memory layout as a [`NonZero<u16>`], so [`Option<Vid>`] has the same size
/// and alignment as `u16`.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Vid(NonZero<u16>);

/// Errors which can occur when converting a `u16` to a validated [`Vid`]
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[must_use]
pub enum InvalidVid {
    /// 0 is a reserved [`Vid`] which basically means "the native vlan."
    #[error("zero is a reserved Vid")]
    Zero,
    /// 4095 is a reserved [`Vid`] per the spec.
    #[error("4095 is a reserved Vid")]
    Reserved,
    /// The value is too large to be a legal [`Vid`] (12-bit max).
    #[error("{0} is too large to be a legal Vid")]
    TooLarge(u16),
}

impl InvalidVid {
    /// The raw `u16` value of the reserved (4095) [`Vid`]
    pub const RESERVED: u16 = 4095;
}

impl Vid {
    /// The minimum legal [`Vid`] value (1).
    #[allow(clippy::unwrap_used)] // safe due to const eval
    pub const MIN: Vid = Vid(NonZero::new(1).unwrap());

    /// The maximum legal [`Vid`] value (2^12 - 2).
    #[allow(clippy::unwrap_used)] // safe due to const eval
    pub const MAX: Vid = Vid(NonZero::new(4094).unwrap());

    /// Create a new [`Vid`] from a `u16`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is 0, 4095 (reserved), or greater than
    /// [`Vid::MAX`].
    pub fn new(vid: u16) -> Result<Self, InvalidVid> {
        match NonZero::new(vid) {
            None => Err(InvalidVid::Zero),
            Some(val) if val.get() == InvalidVid::RESERVED => Err(InvalidVid::Reserved),
            Some(val) if val.get() > InvalidVid::RESERVED => Err(InvalidVid::TooLarge(val.get())),
            Some(val) => Ok(Vid(val)),
        }
    }

    /// Get the value of the [`Vid`] as a `u16`.
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self.0.get()
    }
}

impl From<Vid> for u16 {
    fn from(vid: Vid) -> u16 {
        vid.as_u16()
    }
}

impl TryFrom<u16> for Vid {
    type Error = InvalidVid;

    fn try_from(vid: u16) -> Result<Vid, Self::Error> {
        Vid::new(vid)
    }
}

impl core::fmt::Display for Vid {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_u16())
    }
}

/// A Priority Code Point.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pcp(u8);

/// Error type for invalid [`Pcp`] values.
#[repr(transparent)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, thiserror::Error)]
#[error("invalid PCP value: {0} (3-bit max)")]
pub struct InvalidPcp(u8);

impl Pcp {
    const MAX_BINARY: u8 = 0b111;
    /// The minimum legal [`Pcp`] value
    pub const MIN: Pcp = Pcp(0);
    /// The maximum legal [`Pcp`] value
    pub const MAX: Pcp = Pcp(Pcp::MAX_BINARY);

    /// Map an u8 to a [`Pcp`]
    ///
    /// # Errors
    ///
    /// Returns an error if the supplied value is larger than 3-bits.
    pub const fn new(raw: u8) -> Result<Pcp, InvalidPcp> {
        match raw {
            0..=Pcp::MAX_BINARY => Ok(Pcp(raw)),
            _ => Err(InvalidPcp(raw)),
        }
    }

    /// Map the [`Pcp`] value back to a `u8`.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self.0
    }
}

impl From<Pcp> for VlanPcp {
    fn from(value: Pcp) -> Self {
        VlanPcp::try_new(value.as_u8()).unwrap_or_else(|_| unreachable!())
    }
}

impl From<VlanPcp> for Pcp {
    fn from(value: VlanPcp) -> Self {
        Pcp(value.value())
    }
}

impl From<Vid> for VlanId {
    fn from(value: Vid) -> Self {
        VlanId::try_new(value.as_u16()).unwrap_or_else(|_| unreachable!())
    }
}

/// A VLAN header.
///
/// This may represent 802.1Q or 802.1AD (the outer ethtype is not stored in
/// this struct)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vlan(SingleVlanHeader);

impl Vlan {
    /// The length (in bytes) of a [`Vlan`] header.
    pub const HEADER_LEN: usize = 4;

    /// Create a new [Vlan] header.
    #[must_use]
    pub fn new(vid: Vid, inner_ethtype: EthType, pcp: Pcp, dei: bool) -> Vlan {
        Vlan(SingleVlanHeader {
            pcp: pcp.into(),
            drop_eligible_indicator: dei,
            vlan_id: vid.into(),
            ether_type: inner_ethtype.0,
        })
    }

    /// Get the [`Vid`] of this `Vlan` header.
    #[must_use]
    pub fn vid(&self) -> Vid {
        Vid::new(self.0.vlan_id.value()).unwrap_or_else(|_| unreachable!())
    }

    /// Get the headers [`Pcp`]
    #[must_use]
    pub fn pcp(&self) -> Pcp {
        self.0.pcp.into()
    }

    /// Get the headers drop eligibility indicator
    #[must_use]
    pub fn dei(&self) -> bool {
        self.0.drop_eligible_indicator
    }

    /// Get the headers _inner_ ethertype (the type of the payload which
    /// follows the tag, not of the ethernet header containing it).
    #[must_use]
    pub fn inner_ethtype(&self) -> EthType {
        EthType(self.0.ether_type)
    }
}

impl Parse for Vlan {
    type Error = InvalidVid;

    fn parse(buf: &[u8]) -> Result<(Self, NonZero<usize>), ParseError<Self::Error>> {
        let (inner, rest) = SingleVlanHeader::from_slice(buf).map_err(|e| {
            let expected = NonZero::new(e.required_len).unwrap_or_else(|| unreachable!());
            ParseError::Length(LengthError {
                expected,
                actual: buf.len(),
            })
        })?;
        // validate vlan
        Vid::new(inner.vlan_id.value()).map_err(ParseError::Invalid)?;
        let consumed = NonZero::new(buf.len() - rest.len()).ok_or_else(|| unreachable!())?;
        Ok((Self(inner), consumed))
    }
}

impl DeParse for Vlan {
    type Error = ();

    fn size(&self) -> NonZero<usize> {
        NonZero::new(self.0.header_len()).unwrap_or_else(|| unreachable!())
    }

    fn deparse(&self, buf: &mut [u8]) -> Result<NonZero<usize>, DeParseError<Self::Error>> {
        if buf.len() < self.size().get() {
            return Err(DeParseError::Length(LengthError {
                expected: self.size(),
                actual: buf.len(),
            }));
        }
        buf[..self.size().get()].copy_from_slice(&self.0.to_bytes());
        Ok(self.size())
    }
}

#[cfg(any(test, feature = "arbitrary"))]
mod contract {
    use crate::eth::ethtype::EthType;
    use crate::vlan::{Pcp, Vid, Vlan};
    use bolero::{Driver, TypeGenerator};

    impl TypeGenerator for Vid {
        fn generate<D: Driver>(u: &mut D) -> Option<Self> {
            let raw = u.produce::<u16>()? % (Vid::MAX.as_u16() + 1);
            Some(Vid::new(raw).unwrap_or(Vid::MIN))
        }
    }

    impl TypeGenerator for Pcp {
        fn generate<D: Driver>(driver: &mut D) -> Option<Self> {
            Pcp::new(driver.produce::<u8>()? & Pcp::MAX.as_u8()).ok()
        }
    }

    impl TypeGenerator for Vlan {
        fn generate<D: Driver>(u: &mut D) -> Option<Self> {
            let vid = u.produce()?;
            let pcp = u.produce()?;
            let dei = u.produce()?;
            let ethertype = u.produce()?;
            Some(Vlan::new(vid, ethertype, pcp, dei))
        }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)] // valid in test code
#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn vid_min_is_valid() {
        let vid = Vid::MIN;
        assert_eq!(vid.as_u16(), 1);
        assert_eq!(vid, Vid::new(1).unwrap());
    }

    #[test]
    fn vid_max_is_valid() {
        let vid = Vid::MAX;
        assert_eq!(vid, Vid::new(Vid::MAX.as_u16()).unwrap());
    }

    #[test]
    fn vid_zero_is_invalid() {
        assert_eq!(Vid::new(0).unwrap_err(), InvalidVid::Zero);
    }

    #[test]
    fn vid_reserved_is_invalid() {
        assert_eq!(
            Vid::new(InvalidVid::RESERVED).unwrap_err(),
            InvalidVid::Reserved
        );
    }

    #[test]
    fn vid_too_large_is_invalid() {
        assert_eq!(Vid::new(4096).unwrap_err(), InvalidVid::TooLarge(4096));
    }

    #[test]
    fn parse_back() {
        bolero::check!().with_type().for_each(|vlan: &Vlan| {
            let mut buf = [0u8; Vlan::HEADER_LEN];
            let written = vlan.deparse(&mut buf).unwrap();
            assert_eq!(written.get(), Vlan::HEADER_LEN);
            let (parsed, consumed) = Vlan::parse(&buf).unwrap();
            assert_eq!(parsed, *vlan);
            assert_eq!(consumed, written);
            assert_eq!(vlan.vid(), parsed.vid());
            assert_eq!(vlan.pcp(), parsed.pcp());
            assert_eq!(vlan.dei(), parsed.dei());
            assert_eq!(vlan.inner_ethtype(), parsed.inner_ethtype());
        });
    }
}
