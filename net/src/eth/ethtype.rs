// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Ethernet type related fields and parsing

use etherparse::EtherType;

/// The ethernet header's ethertype field.
///
/// This is a transparent wrapper around the type provided by etherparse.
/// The main point of wrapping this type is to let us attach protocol
/// constants (TRILL in particular) and trait implementations of our own.
#[repr(transparent)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EthType(pub(crate) EtherType);

impl EthType {
    /// Ethernet type for [IPv4](https://en.wikipedia.org/wiki/IPv4)
    pub const IPV4: EthType = EthType(EtherType::IPV4);
    /// Ethernet type for [IPv6](https://en.wikipedia.org/wiki/IPv6)
    pub const IPV6: EthType = EthType(EtherType::IPV6);
    /// Ethernet type for [VLAN](https://en.wikipedia.org/wiki/IEEE_802.1Q)
    pub const VLAN: EthType = EthType(EtherType::VLAN_TAGGED_FRAME);
    /// Ethernet type for [TRILL](https://en.wikipedia.org/wiki/TRILL) encapsulated frames
    pub const TRILL: EthType = EthType(EtherType(0x22F3));

    /// Map a raw (native-endian) u16 into an [`EthType`]
    #[must_use]
    pub const fn new(raw: u16) -> EthType {
        EthType(EtherType(raw))
    }

    /// Map a raw (big-endian) pair of bytes into an [`EthType`]
    #[must_use]
    pub const fn new_from_be_bytes(raw: [u8; 2]) -> EthType {
        EthType(EtherType(u16::from_be_bytes(raw)))
    }

    /// get the raw `u16` value (native-endian)
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0.0
    }
}

#[cfg(any(test, feature = "arbitrary"))]
mod contract {
    use super::EthType;
    use bolero::{Driver, TypeGenerator};

    impl TypeGenerator for EthType {
        fn generate<D: Driver>(u: &mut D) -> Option<Self> {
            Some(EthType::new(u.produce()?))
        }
    }
}

#[cfg(test)]
mod test {
    use super::EthType;

    #[test]
    fn trill_ethertype_value() {
        assert_eq!(EthType::TRILL.raw(), 0x22F3);
        assert_eq!(EthType::new_from_be_bytes([0x22, 0xF3]), EthType::TRILL);
    }
}
