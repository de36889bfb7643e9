// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Engine lifecycle and the per-port receive hook.
//!
//! A [`TrillEngine`] hangs off one Ethernet bridge. Enabling TRILL
//! publishes a fresh nickname table through an atomic shared pointer;
//! disabling swaps it out and clears it, and data-plane holders of the old
//! table release it naturally. Control-plane mutators serialize on a
//! mutex; the receive hook never takes it.

use crate::bridge::HostBridge;
use crate::error::{DropReason, RbrError};
use crate::frame::{Frame, FrameKind};
use crate::node::NickInfo;
use crate::stats::TrillStats;
use crate::table::{NICKNAME_NONE, Rbr};
use crate::vnt::VntDomain;
use crate::{encap, recv};
use arc_swap::ArcSwapOption;
use net::buffer::FrameBufferMut;
use net::eth::ethtype::EthType;
use net::parse::ParseError;
use net::trill::Nickname;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

/// What the receive hook did with a frame.
#[derive(Debug)]
pub enum FrameVerdict<Buf: FrameBufferMut> {
    /// The engine consumed the frame: delivered, forwarded, or dropped.
    Consumed,
    /// A loopback frame; the caller keeps processing it.
    Pass(Frame<Buf>),
    /// TRILL is disabled on the bridge; the native bridge handler takes
    /// over.
    BridgeDefault(Frame<Buf>),
}

/// The TRILL engine of one bridge.
pub struct TrillEngine {
    rbr: ArcSwapOption<Rbr>,
    stats: TrillStats,
    // serializes enable/disable and nickname-table mutations
    ctl: Mutex<()>,
}

impl Default for TrillEngine {
    fn default() -> TrillEngine {
        TrillEngine::new()
    }
}

impl TrillEngine {
    /// Create a disabled engine.
    #[must_use]
    pub fn new() -> TrillEngine {
        TrillEngine {
            rbr: ArcSwapOption::empty(),
            stats: TrillStats::new(),
            ctl: Mutex::new(()),
        }
    }

    /// Enable TRILL on the bridge. A no-op when already enabled.
    pub fn enable(&self) {
        let _ctl = self.ctl.lock();
        if self.rbr.load().is_none() {
            self.rbr.store(Some(Arc::new(Rbr::new())));
        }
    }

    /// Disable TRILL on the bridge. A no-op when already disabled.
    ///
    /// The nickname table is unpublished first and cleared after, so a
    /// receive hook still running against the old table keeps its node
    /// handles until it finishes.
    pub fn disable(&self) {
        let _ctl = self.ctl.lock();
        if let Some(rbr) = self.rbr.swap(None) {
            rbr.clear_all();
        }
    }

    /// True while TRILL is enabled on the bridge.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.rbr.load().is_some()
    }

    /// The engine's drop counters.
    #[must_use]
    pub fn stats(&self) -> &TrillStats {
        &self.stats
    }

    /// This RBridge's own nickname, if TRILL is enabled and the control
    /// plane has installed one.
    #[must_use]
    pub fn local_nick(&self) -> Option<Nickname> {
        self.rbr.load().as_ref().and_then(|rbr| rbr.local_nick())
    }

    /// Install this RBridge's own nickname ([`NICKNAME_NONE`] disarms the
    /// engine).
    ///
    /// # Errors
    ///
    /// Fails when TRILL is disabled or the nickname is reserved.
    pub fn set_local_nick(&self, nick: u16) -> Result<(), RbrError> {
        let _ctl = self.ctl.lock();
        self.with_rbr(|rbr| rbr.set_local_nick(nick))
    }

    /// Install the fallback distribution-tree root.
    ///
    /// # Errors
    ///
    /// Fails when TRILL is disabled or the nickname is not usable.
    pub fn set_tree_root(&self, treeroot: u16) -> Result<(), RbrError> {
        let _ctl = self.ctl.lock();
        self.with_rbr(|rbr| rbr.set_tree_root(treeroot))
    }

    /// Publish a node record for `nick`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Fails when TRILL is disabled or the nickname is not legal.
    pub fn set_node(&self, nick: u16, ni: NickInfo) -> Result<(), RbrError> {
        let _ctl = self.ctl.lock();
        self.with_rbr(|rbr| rbr.set_node(nick, ni))
    }

    /// Remove the node record for `nick`.
    ///
    /// # Errors
    ///
    /// Fails when TRILL is disabled or the nickname is not legal.
    pub fn clear_node(&self, nick: u16) -> Result<(), RbrError> {
        let _ctl = self.ctl.lock();
        self.with_rbr(|rbr| rbr.clear_node(nick))
    }

    fn with_rbr<T>(&self, f: impl FnOnce(&Rbr) -> Result<T, RbrError>) -> Result<T, RbrError> {
        match self.rbr.load_full() {
            Some(rbr) => f(&rbr),
            None => Err(RbrError::NotEnabled),
        }
    }

    /// The per-port receive hook.
    ///
    /// Ownership of the frame transfers to the engine unless the verdict
    /// hands it back. The caller runs this on the receive path; nothing in
    /// here blocks.
    pub fn handle_frame<Buf, B, V>(
        &self,
        bridge: &B,
        vnt: &V,
        frame: Frame<Buf>,
    ) -> FrameVerdict<Buf>
    where
        Buf: FrameBufferMut,
        B: HostBridge<Buf>,
        V: VntDomain<Buf>,
    {
        if bridge.port_mac(frame.port()).is_none() {
            self.stats.inc_rx_dropped();
            debug!("rx drop: {}", DropReason::UnknownPort);
            return FrameVerdict::Consumed;
        }
        let Some(rbr) = self.rbr.load_full() else {
            return FrameVerdict::BridgeDefault(frame);
        };
        if frame.kind() == FrameKind::Loopback {
            return FrameVerdict::Pass(frame);
        }
        let ctx = Ctx {
            rbr: &rbr,
            bridge,
            vnt,
            stats: &self.stats,
        };
        classify(&ctx, frame);
        FrameVerdict::Consumed
    }
}

/// Everything one frame's trip through the pipelines needs.
pub(crate) struct Ctx<'a, B, V> {
    pub(crate) rbr: &'a Rbr,
    pub(crate) bridge: &'a B,
    pub(crate) vnt: &'a V,
    pub(crate) stats: &'a TrillStats,
}

impl<B, V> Ctx<'_, B, V> {
    /// Terminate the frame on the receive path.
    pub(crate) fn rx_drop<Buf: FrameBufferMut>(&self, frame: Frame<Buf>, reason: DropReason) {
        self.stats.inc_rx_dropped();
        debug!("rx drop: {reason}");
        drop(frame);
    }

    /// Terminate the frame on the transmit path.
    pub(crate) fn tx_drop<Buf: FrameBufferMut>(&self, frame: Frame<Buf>, reason: DropReason) {
        self.stats.inc_tx_dropped();
        debug!("tx drop: {reason}");
        drop(frame);
    }
}

/// Decide what a frame is and dispatch it.
///
/// Runs after port lookup, the TRILL-enabled check and the loopback check;
/// consumes the frame on every path.
fn classify<Buf, B, V>(ctx: &Ctx<'_, B, V>, mut frame: Frame<Buf>)
where
    Buf: FrameBufferMut,
    B: HostBridge<Buf>,
    V: VntDomain<Buf>,
{
    let eth = match frame.eth() {
        Ok(eth) => eth,
        Err(ParseError::Length(_)) => return ctx.rx_drop(frame, DropReason::Truncated),
        Err(ParseError::Invalid(_)) => return ctx.rx_drop(frame, DropReason::MalformedEthernet),
    };
    let Some(vid) = ctx.bridge.allowed_ingress(frame.port(), &mut frame) else {
        return ctx.rx_drop(frame, DropReason::IngressFiltered);
    };
    let src = eth.source();
    let dst = eth.destination();

    // never forward control-plane BPDUs
    if dst.is_trill_control() {
        ctx.bridge.fdb_update(frame.port(), src, vid);
        debug!("dropping trill control frame addressed to {dst}");
        drop(frame);
        return;
    }

    if ctx.bridge.is_guest_port(frame.port()) {
        let dst_entry = ctx.bridge.fdb_get(dst, vid);
        // short-circuit guest-to-guest traffic on the same bridge
        if let Some(entry) = dst_entry {
            if ctx.bridge.is_guest_port(entry.port) {
                // the sender may have migrated here, refresh its entry
                ctx.bridge.fdb_update(frame.port(), src, vid);
                if ctx.vnt.enabled()
                    && ctx.vnt.port_vni(frame.port()) != ctx.vnt.port_vni(entry.port)
                {
                    return ctx.rx_drop(frame, DropReason::VniMismatch);
                }
                ctx.bridge.deliver(entry.port, frame);
                return;
            }
        }
        // destination lives behind another rbridge (or is unknown):
        // encapsulate toward its nickname, or over the distribution tree
        let egress = dst_entry.map_or(NICKNAME_NONE, |entry| entry.nick);
        ctx.bridge.fdb_update(frame.port(), src, vid);
        encap::encaps_prepare(ctx, frame, egress, vid);
    } else if eth.ether_type() == EthType::TRILL {
        recv::recv(ctx, frame, vid);
    } else if dst == ctx.bridge.bridge_mac() {
        frame.set_kind(FrameKind::Host);
        ctx.bridge.deliver_host(frame);
    } else {
        ctx.rx_drop(frame, DropReason::NotTrill);
    }
}
