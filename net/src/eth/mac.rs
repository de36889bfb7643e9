// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Mac address type and logic.

use arrayvec::ArrayVec;
use std::fmt::Display;

/// A [MAC Address] type.
///
/// `Mac` is a transparent wrapper around `[u8; 6]` which provides a
/// small collection of methods and type safety.
///
/// [MAC Address]: https://en.wikipedia.org/wiki/MAC_address
#[repr(transparent)]
#[cfg_attr(any(test, feature = "arbitrary"), derive(bolero::TypeGenerator))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Mac(pub [u8; 6]);

impl From<[u8; 6]> for Mac {
    fn from(value: [u8; 6]) -> Self {
        Mac(value)
    }
}

impl From<Mac> for [u8; 6] {
    fn from(value: Mac) -> Self {
        value.0
    }
}

impl AsRef<[u8; 6]> for Mac {
    fn as_ref(&self) -> &[u8; 6] {
        &self.0
    }
}

impl AsMut<[u8; 6]> for Mac {
    fn as_mut(&mut self) -> &mut [u8; 6] {
        &mut self.0
    }
}

/// Errors which can occur while converting a string to a [`Mac`]
#[derive(Debug, thiserror::Error)]
pub enum MacFromStringError {
    /// Invalid string representation of mac address
    #[error("invalid string representation of mac address: {0}")]
    Invalid(String),
}

impl TryFrom<&str> for Mac {
    type Error = MacFromStringError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        const MAX_OCTETS: usize = 6;
        let mut octets_strs = value.split(':');
        let octets_parsed =
            octets_strs.try_fold(ArrayVec::<_, MAX_OCTETS>::new(), |mut acc, octet_str| {
                if octet_str.len() != 2 {
                    return Err(MacFromStringError::Invalid(value.to_string()));
                }
                if octet_str.chars().any(|c| !c.is_ascii_hexdigit()) {
                    return Err(MacFromStringError::Invalid(value.to_string()));
                }
                let parsed = u8::from_str_radix(octet_str, 16)
                    .map_err(|_| MacFromStringError::Invalid(value.to_string()))?;
                acc.try_push(parsed)
                    .map_err(|_| MacFromStringError::Invalid(value.to_string()))?;
                Ok(acc)
            })?;

        let octets = match octets_parsed.as_slice() {
            [o0, o1, o2, o3, o4, o5] => [*o0, *o1, *o2, *o3, *o4, *o5],
            _ => return Err(MacFromStringError::Invalid(value.to_string())),
        };

        Ok(Mac(octets))
    }
}

impl Mac {
    /// The broadcast `Mac`
    pub const BROADCAST: Mac = Mac([u8::MAX; 6]);
    /// The zero `Mac`.
    ///
    /// `ZERO` is illegal as a source or destination `Mac` in most contexts.
    pub const ZERO: Mac = Mac([0; 6]);

    /// Returns true iff the binary representation of the [`Mac`] is exclusively ones.
    #[must_use]
    pub fn is_broadcast(&self) -> bool {
        self == &Mac::BROADCAST
    }

    /// Returns true iff the least significant bit of the first octet of the `[Mac]` is one.
    #[must_use]
    pub fn is_multicast(&self) -> bool {
        self.0[0] & 0x01 == 0x01
    }

    /// Returns true iff the least significant bit of the first octet of the `[Mac]` is zero.
    #[must_use]
    pub fn is_unicast(&self) -> bool {
        !self.is_multicast()
    }

    /// Returns true iff the binary representation of the [`Mac`] is exclusively zeros.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self == &Mac::ZERO
    }

    /// Returns true if the [`Mac`] lies in the multicast block reserved for
    /// TRILL control traffic (`01:80:C2:00:00:40` through `01:80:C2:00:00:4F`).
    ///
    /// Frames addressed to these destinations are control-plane BPDUs and
    /// must never be forwarded by the data plane.
    #[must_use]
    pub fn is_trill_control(&self) -> bool {
        let bytes = self.as_ref();
        bytes[0..5] == [0x01, 0x80, 0xc2, 0x00, 0x00] && (bytes[5] & 0xf0) == 0x40
    }

    /// Returns `Ok(())` iff the [`Mac`] is a legal source `Mac`.
    ///
    /// # Errors
    ///
    /// Multicast and zero are not legal [`SourceMac`].
    pub fn valid_src(&self) -> Result<(), SourceMacAddressError> {
        if self.is_zero() {
            Err(SourceMacAddressError::ZeroSource(*self))
        } else if self.is_multicast() {
            Err(SourceMacAddressError::MulticastSource(*self))
        } else {
            Ok(())
        }
    }

    /// Returns `Ok(())` iff the [`Mac`] is a legal destination [`Mac`].
    ///
    /// # Errors
    ///
    /// Zero is not a legal destination [`Mac`].
    pub fn valid_dst(&self) -> Result<(), DestinationMacAddressError> {
        if self.is_zero() {
            Err(DestinationMacAddressError::ZeroDestination(*self))
        } else {
            Ok(())
        }
    }
}

impl Display for Mac {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:<02x}:{:<02x}:{:<02x}:{:<02x}:{:<02x}:{:<02x}",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4], self.0[5]
        )
    }
}

impl Display for SourceMac {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.inner().fmt(f)
    }
}

impl Display for DestinationMac {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.inner().fmt(f)
    }
}

/// A [`Mac`] which is legal as a source in an ethernet header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct SourceMac(Mac);

impl SourceMac {
    /// Map a [`Mac`] to a [`SourceMac`]
    ///
    /// # Errors
    ///
    /// Will return a [`SourceMacAddressError`] if the supplied [`Mac`] is not
    /// a legal source [`Mac`].
    pub fn new(mac: Mac) -> Result<SourceMac, SourceMacAddressError> {
        mac.valid_src().map(|()| SourceMac(mac))
    }

    /// Get the inner (unqualified) [`Mac`]
    #[must_use]
    pub const fn inner(self) -> Mac {
        self.0
    }
}

/// A [`Mac`] which is legal as a destination in an ethernet header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct DestinationMac(Mac);

impl DestinationMac {
    /// Map a [`Mac`] to a [`DestinationMac`]
    ///
    /// # Errors
    ///
    /// Will return a [`DestinationMacAddressError`] if the supplied [`Mac`]
    /// is not a legal destination.
    pub fn new(mac: Mac) -> Result<DestinationMac, DestinationMacAddressError> {
        mac.valid_dst().map(|()| DestinationMac(mac))
    }

    /// Get the inner (unqualified) [`Mac`]
    #[must_use]
    pub const fn inner(self) -> Mac {
        self.0
    }
}

/// Errors which may occur when qualifying a [`Mac`] as a [`SourceMac`]
#[derive(Debug, thiserror::Error)]
pub enum SourceMacAddressError {
    /// Zero is not a legal source [`Mac`]
    #[error("zero is not a legal source mac")]
    ZeroSource(Mac),
    /// Multicast addresses are not legal source [`Mac`]s
    #[error("multicast address {0} is not a legal source mac")]
    MulticastSource(Mac),
}

/// Errors which may occur when qualifying a [`Mac`] as a [`DestinationMac`]
#[derive(Debug, thiserror::Error)]
pub enum DestinationMacAddressError {
    /// Zero is not a legal destination [`Mac`]
    #[error("zero is not a legal destination mac")]
    ZeroDestination(Mac),
}

impl From<SourceMac> for Mac {
    fn from(value: SourceMac) -> Self {
        value.inner()
    }
}

impl From<DestinationMac> for Mac {
    fn from(value: DestinationMac) -> Self {
        value.inner()
    }
}

#[cfg(any(test, feature = "arbitrary"))]
mod contract {
    use crate::eth::mac::{DestinationMac, Mac, SourceMac};
    use bolero::{Driver, TypeGenerator};

    impl TypeGenerator for SourceMac {
        fn generate<D: Driver>(u: &mut D) -> Option<Self> {
            let mut mac: Mac = u.produce()?;
            mac.0[0] &= !0x01; // clear the multicast bit
            if mac.is_zero() {
                mac.0[5] = 1;
            }
            Some(SourceMac(mac))
        }
    }

    impl TypeGenerator for DestinationMac {
        fn generate<D: Driver>(u: &mut D) -> Option<Self> {
            let mut mac: Mac = u.produce()?;
            if mac.is_zero() {
                mac.0[5] = 1;
            }
            Some(DestinationMac(mac))
        }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)] // valid in test code
#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn mac_from_str() {
        let mac = Mac::try_from("02:00:00:00:00:2a").unwrap();
        assert_eq!(mac, Mac([0x02, 0, 0, 0, 0, 0x2a]));
        assert!(Mac::try_from("02:00:00:00:00").is_err());
        assert!(Mac::try_from("02:00:00:00:00:zz").is_err());
        assert!(Mac::try_from("0200:00:00:00:2a").is_err());
    }

    #[test]
    fn trill_control_block() {
        for last in 0x40..=0x4fu8 {
            assert!(Mac([0x01, 0x80, 0xc2, 0x00, 0x00, last]).is_trill_control());
        }
        assert!(!Mac([0x01, 0x80, 0xc2, 0x00, 0x00, 0x3f]).is_trill_control());
        assert!(!Mac([0x01, 0x80, 0xc2, 0x00, 0x00, 0x50]).is_trill_control());
        assert!(!Mac([0x01, 0x80, 0xc2, 0x00, 0x01, 0x40]).is_trill_control());
        assert!(!Mac::BROADCAST.is_trill_control());
    }

    #[test]
    fn source_qualification() {
        assert!(SourceMac::new(Mac::ZERO).is_err());
        assert!(SourceMac::new(Mac::BROADCAST).is_err());
        assert!(SourceMac::new(Mac([0x02, 0, 0, 0, 0, 1])).is_ok());
    }

    #[test]
    fn generated_source_macs_are_valid() {
        bolero::check!().with_type().for_each(|mac: &SourceMac| {
            assert!(mac.inner().valid_src().is_ok());
        });
    }
}
