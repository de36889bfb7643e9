// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The host-bridge interface.
//!
//! The Ethernet bridge owning the ports stays outside this crate; the
//! engine reaches it through [`HostBridge`]. Every method that takes a
//! [`Frame`] consumes it: once handed to the bridge, the frame's lifetime
//! is the bridge's problem.

use crate::frame::Frame;
use net::buffer::FrameBufferMut;
use net::eth::mac::Mac;

/// Opaque identifier of a bridge port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PortId(pub u32);

impl std::fmt::Display for PortId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "port{}", self.0)
    }
}

/// A forwarding-database entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FdbEntry {
    /// The port behind which the address was learned.
    pub port: PortId,
    /// The nickname of the RBridge the address was learned from, or
    /// [`crate::table::NICKNAME_NONE`] when the address is local to this
    /// bridge.
    pub nick: u16,
}

/// The surface the engine consumes from the Ethernet bridge.
pub trait HostBridge<Buf: FrameBufferMut> {
    /// Look up `mac` in the forwarding database.
    fn fdb_get(&self, mac: Mac, vid: u16) -> Option<FdbEntry>;

    /// Learn `mac` behind `port`. Clears any nickname previously recorded
    /// for the address (the sender is local).
    fn fdb_update(&self, port: PortId, mac: Mac, vid: u16);

    /// Learn `mac` behind `port` as reachable through the RBridge named by
    /// `nick`.
    fn fdb_update_nick(&self, port: PortId, mac: Mac, vid: u16, nick: u16);

    /// Transmit the frame out of `port`.
    fn forward(&self, port: PortId, frame: Frame<Buf>);

    /// Deliver the frame to the end station behind `port`.
    fn deliver(&self, port: PortId, frame: Frame<Buf>);

    /// Flood the frame to every end-station (guest) port.
    fn endstation_deliver(&self, frame: Frame<Buf>);

    /// Flood a TRILL-encapsulated frame to the core ports.
    fn trill_flood_forward(&self, frame: Frame<Buf>);

    /// Deliver a frame addressed to the bridge itself up the host stack.
    fn deliver_host(&self, frame: Frame<Buf>);

    /// Apply the VLAN ingress policy.
    ///
    /// Returns the VLAN id assigned to the frame, or `None` when the
    /// policy rejects it. The bridge may record an out-of-band tag on the
    /// frame.
    fn allowed_ingress(&self, port: PortId, frame: &mut Frame<Buf>) -> Option<u16>;

    /// The MAC address of `port`, if the port exists.
    fn port_mac(&self, port: PortId) -> Option<Mac>;

    /// The MAC address of the bridge device itself.
    fn bridge_mac(&self) -> Mac;

    /// True iff `port` faces end stations (candidates for encapsulation)
    /// rather than other RBridges.
    fn is_guest_port(&self, port: PortId) -> bool;
}
