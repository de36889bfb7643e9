// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The virtual-network (VNT) interface.
//!
//! Virtual networking is an optional side module. The engine only ever
//! talks to it through [`VntDomain`]; when the module is absent,
//! [`NoVnt`] answers every hook with "no virtual network" and the engine
//! behaves as a plain RBridge with no conditional code paths.

use crate::bridge::PortId;
use crate::frame::Frame;
use net::buffer::FrameBufferMut;
use net::trill::vnt::Vni;

/// The hooks the engine consumes from the virtual-network module.
pub trait VntDomain<Buf: FrameBufferMut> {
    /// True when virtual-network tagging is active on this bridge.
    ///
    /// When this is false a received option area is unknown data and the
    /// frame carrying it is dropped.
    fn enabled(&self) -> bool;

    /// The virtual network `port` belongs to, if any.
    fn port_vni(&self, port: PortId) -> Option<Vni>;

    /// Flood the frame within the virtual network `vni`.
    ///
    /// # Errors
    ///
    /// Hands the frame back when no such virtual network is known, so the
    /// caller can drop it and account for it.
    fn vni_flood(&self, vni: Vni, frame: Frame<Buf>) -> Result<(), Frame<Buf>>;
}

/// The absent virtual-network module.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoVnt;

impl<Buf: FrameBufferMut> VntDomain<Buf> for NoVnt {
    fn enabled(&self) -> bool {
        false
    }

    fn port_vni(&self, _port: PortId) -> Option<Vni> {
        None
    }

    fn vni_flood(&self, _vni: Vni, frame: Frame<Buf>) -> Result<(), Frame<Buf>> {
        Err(frame)
    }
}
