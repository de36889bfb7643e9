// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The nickname table.
//!
//! One slot per legal nickname, directly indexed. Slot mutations are
//! publication-style: the writer swaps an atomic shared pointer
//! (release), readers take an acquire load that bumps the node's
//! refcount, so a handle obtained from [`Rbr::find`] stays valid across
//! any later [`Rbr::clear_node`] or overwrite of its slot. The table
//! itself never blocks a reader.
//!
//! The control-plane API speaks raw `u16` nicknames (the daemon talks
//! netlink); validation happens here at the boundary.

use crate::error::RbrError;
use crate::node::{NickInfo, RbrNode};
use arc_swap::ArcSwapOption;
use net::trill::Nickname;
use std::sync::Arc;
use std::sync::atomic::{AtomicU16, Ordering};

/// The wire encoding of "no nickname".
pub const NICKNAME_NONE: u16 = 0;

const SLOTS: usize = Nickname::MAX as usize + 1;

/// The nickname directory of one bridge.
///
/// Created when TRILL is enabled on the bridge, destroyed when disabled.
/// `nick` and `treeroot` hold the raw local nickname and fallback
/// distribution-tree root ([`NICKNAME_NONE`] until the control plane
/// installs them); they are plain atomics because the data plane reads
/// them on every frame.
pub struct Rbr {
    nick: AtomicU16,
    treeroot: AtomicU16,
    nodes: Box<[ArcSwapOption<RbrNode>]>,
}

impl std::fmt::Debug for Rbr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rbr")
            .field("nick", &self.nick)
            .field("treeroot", &self.treeroot)
            .finish_non_exhaustive()
    }
}

impl Default for Rbr {
    fn default() -> Rbr {
        Rbr::new()
    }
}

impl Rbr {
    /// Create an empty table: all slots empty, no local nickname, no
    /// fallback tree root.
    #[must_use]
    pub fn new() -> Rbr {
        Rbr {
            nick: AtomicU16::new(NICKNAME_NONE),
            treeroot: AtomicU16::new(NICKNAME_NONE),
            nodes: (0..SLOTS).map(|_| ArcSwapOption::empty()).collect(),
        }
    }

    /// This RBridge's own nickname, if the control plane has installed
    /// one.
    #[must_use]
    pub fn local_nick(&self) -> Option<Nickname> {
        Nickname::from_wire(self.nick.load(Ordering::Relaxed))
    }

    /// The fallback distribution-tree root, if the control plane has
    /// installed one.
    #[must_use]
    pub fn tree_root(&self) -> Option<Nickname> {
        Nickname::from_wire(self.treeroot.load(Ordering::Relaxed))
    }

    /// Install this RBridge's own nickname.
    ///
    /// [`NICKNAME_NONE`] is allowed and disarms the engine: frames will be
    /// dropped at encapsulation until an identity is installed again.
    ///
    /// # Errors
    ///
    /// Returns [`RbrError::InvalidNickname`] for a reserved value.
    pub fn set_local_nick(&self, nick: u16) -> Result<(), RbrError> {
        if nick != NICKNAME_NONE {
            Nickname::new(nick)?;
        }
        self.nick.store(nick, Ordering::Relaxed);
        Ok(())
    }

    /// Install the fallback distribution-tree root.
    ///
    /// # Errors
    ///
    /// Returns [`RbrError::NoEntry`] when the value is not a legal
    /// nickname.
    pub fn set_tree_root(&self, treeroot: u16) -> Result<(), RbrError> {
        Nickname::new(treeroot).map_err(|_| RbrError::NoEntry)?;
        self.treeroot.store(treeroot, Ordering::Relaxed);
        Ok(())
    }

    /// Publish a node record at slot `nick`, replacing any previous
    /// occupant. Outstanding handles to the replaced node stay valid.
    ///
    /// # Errors
    ///
    /// Returns [`RbrError::InvalidNickname`] when `nick` is not a legal
    /// nickname.
    pub fn set_node(&self, nick: u16, ni: NickInfo) -> Result<(), RbrError> {
        let nick = Nickname::new(nick)?;
        self.nodes[usize::from(nick.as_u16())].store(Some(Arc::new(RbrNode::new(ni))));
        Ok(())
    }

    /// Empty slot `nick`. Outstanding handles to the removed node stay
    /// valid; the record is freed when the last one is released.
    ///
    /// # Errors
    ///
    /// Returns [`RbrError::InvalidNickname`] when `nick` is not a legal
    /// nickname.
    pub fn clear_node(&self, nick: u16) -> Result<(), RbrError> {
        let nick = Nickname::new(nick)?;
        self.nodes[usize::from(nick.as_u16())].store(None);
        Ok(())
    }

    /// Look up the node published at `nick`.
    ///
    /// Returns a borrowed handle: the node stays valid for as long as the
    /// caller holds it, independent of concurrent slot mutations. Illegal
    /// nicknames (including [`NICKNAME_NONE`]) just miss.
    #[must_use]
    pub fn find(&self, nick: u16) -> Option<Arc<RbrNode>> {
        let nick = Nickname::from_wire(nick)?;
        self.nodes[usize::from(nick.as_u16())].load_full()
    }

    /// Empty every slot. Used when TRILL is disabled on the bridge;
    /// data-plane holders of node handles release them naturally.
    pub fn clear_all(&self) {
        for slot in &self.nodes {
            slot.store(None);
        }
    }
}
