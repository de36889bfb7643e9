// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Wire types and codecs for a TRILL RBridge data plane.
//!
//! This crate holds the strictly validated value types (MAC addresses,
//! ethertypes, VLAN ids, RBridge nicknames, virtual-network ids) and the
//! parse / deparse logic for the headers the forwarding engine touches:
//! Ethernet, 802.1Q, the TRILL header, the TRILL options word and the
//! virtual-network (VNT) extension.

#![deny(clippy::all, clippy::pedantic)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(missing_docs)]

pub mod buffer;
pub mod eth;
pub mod parse;
pub mod trill;
pub mod vlan;
