// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! RBridge nickname validation.

use core::num::NonZero;

/// An RBridge nickname.
///
/// A [`Nickname`] is the 16-bit identifier of an RBridge within a TRILL
/// campus. The value 0 means "no nickname assigned" and values `0xFFC0`
/// and above are reserved, so the legal range is `0x0001..=0xFFBF`.
///
/// It is deliberately not possible to create a [`Nickname`] from a `u16`
/// directly; use [`Nickname::new`] so that illegal values are rejected at
/// the boundary. On the wire (and at the control-plane API) nicknames
/// travel as raw `u16` where 0 encodes [`Option::None`].
///
/// # Note
///
/// This type is marked `#[repr(transparent)]` to ensure that it has the same
/// memory layout as a [`NonZero<u16>`], so [`Option<Nickname>`] has the same
/// size and alignment as `u16`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Nickname(NonZero<u16>);

/// Errors that can occur when converting a `u16` to a [`Nickname`]
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[must_use]
pub enum InvalidNickname {
    /// Zero means "nickname not assigned" and never names an RBridge.
    #[error("zero is the unassigned-nickname sentinel")]
    None,
    /// Values `0xFFC0..=0xFFFF` are reserved by the protocol.
    #[error("{0:#06x} lies in the reserved nickname range")]
    Reserved(u16),
}

impl Nickname {
    /// The minimum legal raw nickname value (1).
    pub const MIN: u16 = 0x0001;
    /// The maximum legal raw nickname value.
    pub const MAX: u16 = 0xFFBF;

    /// Create a new [`Nickname`] from a `u16`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is 0 or lies in the reserved range
    /// (`0xFFC0` and above).
    pub fn new(nickname: u16) -> Result<Nickname, InvalidNickname> {
        match NonZero::<u16>::new(nickname) {
            None => Err(InvalidNickname::None),
            Some(nickname) => {
                if nickname.get() > Nickname::MAX {
                    Err(InvalidNickname::Reserved(nickname.get()))
                } else {
                    Ok(Nickname(nickname))
                }
            }
        }
    }

    /// Interpret a raw wire value, mapping the 0 sentinel to `None`.
    ///
    /// Reserved values also map to `None`: the data plane treats "absent"
    /// and "nonsensical" nicknames identically (the frame is dropped).
    #[must_use]
    pub fn from_wire(raw: u16) -> Option<Nickname> {
        Nickname::new(raw).ok()
    }

    /// Get the value of the [`Nickname`] as a `u16`.
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self.0.get()
    }
}

impl From<Nickname> for u16 {
    fn from(nickname: Nickname) -> u16 {
        nickname.as_u16()
    }
}

impl TryFrom<u16> for Nickname {
    type Error = InvalidNickname;

    fn try_from(nickname: u16) -> Result<Nickname, Self::Error> {
        Nickname::new(nickname)
    }
}

impl core::fmt::Display for Nickname {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "{:#06x}", self.as_u16())
    }
}

#[cfg(any(test, feature = "arbitrary"))]
mod contract {
    use super::Nickname;
    use bolero::{Driver, TypeGenerator};

    impl TypeGenerator for Nickname {
        fn generate<D: Driver>(u: &mut D) -> Option<Self> {
            let raw = u.produce::<u16>()? % Nickname::MAX + 1;
            Nickname::new(raw).ok()
        }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn bounds() {
        bolero::check!()
            .with_type()
            .cloned()
            .for_each(|raw: u16| match raw {
                0 => {
                    assert_eq!(Nickname::new(raw).unwrap_err(), InvalidNickname::None);
                    assert!(Nickname::from_wire(raw).is_none());
                }
                raw if raw > Nickname::MAX => {
                    assert_eq!(
                        Nickname::new(raw).unwrap_err(),
                        InvalidNickname::Reserved(raw)
                    );
                    assert!(Nickname::from_wire(raw).is_none());
                }
                _ => {
                    assert_eq!(Nickname::new(raw).unwrap().as_u16(), raw);
                    assert_eq!(Nickname::from_wire(raw).unwrap().as_u16(), raw);
                }
            });
    }

    #[test]
    fn display_is_hex() {
        assert_eq!(Nickname::new(0x2a).unwrap().to_string(), "0x002a");
    }
}
