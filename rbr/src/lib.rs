// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The data plane of a TRILL RBridge.
//!
//! The engine plugs into an Ethernet bridge as a per-port receive hook.
//! When TRILL is enabled on the bridge, every frame arriving on a bridge
//! port is handed to [`TrillEngine::handle_frame`], which bridges it
//! locally, TRILL-encapsulates and forwards it, decapsulates it, or drops
//! it. The bridge itself (forwarding database, local delivery, flooding,
//! VLAN filtering) stays behind the [`bridge::HostBridge`] trait; the
//! optional virtual-network module stays behind [`vnt::VntDomain`].
//!
//! Nothing on the data plane blocks: the nickname table is read through
//! atomic pointer slots, counters are relaxed atomics, and every failure
//! terminates the frame with a counter bump rather than an error return.

#![deny(clippy::all, clippy::pedantic)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(missing_docs)]

pub mod bridge;
mod decap;
mod encap;
pub mod engine;
pub mod error;
pub mod frame;
mod fwd;
pub mod node;
mod recv;
pub mod stats;
pub mod table;
pub mod vnt;


pub use engine::{FrameVerdict, TrillEngine};
pub use error::{DropReason, RbrError};
