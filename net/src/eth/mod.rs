// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Ethernet types

pub mod ethtype;
pub mod mac;

use crate::eth::ethtype::EthType;
use crate::eth::mac::{
    DestinationMac, DestinationMacAddressError, Mac, SourceMac, SourceMacAddressError,
};
use crate::parse::{DeParse, DeParseError, LengthError, Parse, ParseError};
use etherparse::Ethernet2Header;
use std::num::NonZero;

/// An [ethernet header]
///
/// [ethernet header]: https://en.wikipedia.org/wiki/Ethernet_frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Eth(Ethernet2Header);

/// An error which may occur in the event of an invalid ethernet header.
#[derive(Debug, thiserror::Error)]
pub enum EthError {
    /// Source [`Mac`] is invalid.
    #[error(transparent)]
    InvalidSource(SourceMacAddressError),
    /// Dest [`Mac`] is invalid.
    #[error(transparent)]
    InvalidDestination(DestinationMacAddressError),
}

impl Eth {
    /// The length (in bytes) of an [`Eth`] header
    pub const HEADER_LEN: usize = 14;

    /// Create a new [Eth] header.
    #[must_use]
    pub fn new(source: SourceMac, destination: DestinationMac, ether_type: EthType) -> Eth {
        Eth(Ethernet2Header {
            source: source.inner().0,
            destination: destination.inner().0,
            ether_type: ether_type.0,
        })
    }

    /// Get the source [`Mac`] of the header.
    #[must_use]
    pub fn source(&self) -> Mac {
        Mac(self.0.source)
    }

    /// Get the destination [`Mac`] of the header.
    #[must_use]
    pub fn destination(&self) -> Mac {
        Mac(self.0.destination)
    }

    /// Get the [`EthType`] of the header.
    #[must_use]
    pub fn ether_type(&self) -> EthType {
        EthType(self.0.ether_type)
    }

    /// Set the source [`Mac`] of the ethernet header.
    pub fn set_source(&mut self, source: SourceMac) -> &mut Self {
        self.0.source = source.inner().0;
        self
    }

    /// Set the destination [`Mac`] of the ethernet header.
    pub fn set_destination(&mut self, destination: DestinationMac) -> &mut Self {
        self.0.destination = destination.inner().0;
        self
    }

    /// Set the ethertype of the header.
    pub fn set_ether_type(&mut self, ether_type: EthType) -> &mut Self {
        self.0.ether_type = ether_type.0;
        self
    }
}

impl Parse for Eth {
    type Error = EthError;

    fn parse(buf: &[u8]) -> Result<(Self, NonZero<usize>), ParseError<Self::Error>> {
        let (inner, rest) = Ethernet2Header::from_slice(buf).map_err(|e| {
            let expected = NonZero::new(e.required_len).unwrap_or_else(|| unreachable!());
            ParseError::Length(LengthError {
                expected,
                actual: buf.len(),
            })
        })?;
        let consumed = NonZero::new(buf.len() - rest.len()).ok_or_else(|| unreachable!())?;
        let new = Self(inner);
        // integrity check for ethernet header
        new.destination()
            .valid_dst()
            .map_err(|e| ParseError::Invalid(EthError::InvalidDestination(e)))?;
        new.source()
            .valid_src()
            .map_err(|e| ParseError::Invalid(EthError::InvalidSource(e)))?;
        Ok((new, consumed))
    }
}

impl DeParse for Eth {
    type Error = ();

    fn size(&self) -> NonZero<usize> {
        NonZero::new(self.0.header_len()).unwrap_or_else(|| unreachable!())
    }

    fn deparse(&self, buf: &mut [u8]) -> Result<NonZero<usize>, DeParseError<Self::Error>> {
        let len = buf.len();
        let unused = self.0.write_to_slice(buf).map_err(|e| {
            let expected = NonZero::new(e.required_len).unwrap_or_else(|| unreachable!());
            DeParseError::Length(LengthError {
                expected,
                actual: len,
            })
        })?;
        let consumed = NonZero::new(len - unused.len()).ok_or_else(|| unreachable!())?;
        Ok(consumed)
    }
}

#[cfg(any(test, feature = "arbitrary"))]
mod contract {
    use crate::eth::Eth;
    use crate::eth::ethtype::EthType;
    use crate::eth::mac::{DestinationMac, SourceMac};
    use bolero::{Driver, TypeGenerator};

    impl TypeGenerator for Eth {
        fn generate<D: Driver>(u: &mut D) -> Option<Self> {
            let source_mac: SourceMac = u.produce()?;
            let destination_mac: DestinationMac = u.produce()?;
            let ether_type: EthType = u.produce()?;
            Some(Eth::new(source_mac, destination_mac, ether_type))
        }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)] // valid in test code
#[cfg(test)]
mod test {
    use crate::eth::Eth;
    use crate::parse::{DeParse, Parse, ParseError};

    #[test]
    fn eth_parse_back() {
        bolero::check!().with_type().for_each(|eth: &Eth| {
            let mut buf = [0u8; Eth::HEADER_LEN];
            eth.deparse(&mut buf).unwrap();
            let (eth2, consumed) = Eth::parse(&buf).unwrap();
            assert_eq!(eth, &eth2);
            assert_eq!(consumed.get(), Eth::HEADER_LEN);
        });
    }

    #[test]
    fn eth_parse_too_short() {
        let buf = [0u8; Eth::HEADER_LEN - 1];
        match Eth::parse(&buf) {
            Err(ParseError::Length(e)) => {
                assert_eq!(e.actual(), buf.len());
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn eth_parse_rejects_zero_source() {
        let mut buf = [0u8; Eth::HEADER_LEN];
        // zero source and destination
        buf[12] = 0x08;
        assert!(matches!(Eth::parse(&buf), Err(ParseError::Invalid(_))));
    }
}
