// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Per-RBridge node records.
//!
//! The control-plane daemon learns the topology and installs one
//! [`NickInfo`] per remote RBridge: the RBridge's MAC on the shared link,
//! its adjacency list and the distribution-tree roots it advertises.
//! A record is immutable once published; updates replace the whole node
//! (see [`crate::table::Rbr::set_node`]), so the forwarding path reads the
//! fields without locks.

use net::eth::mac::Mac;
use net::trill::Nickname;

/// One entry of an RBridge's adjacency list.
///
/// Nicknames are kept raw here: the control plane may install entries that
/// are not (yet) valid nicknames, and the fan-out skips them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adjacency {
    /// The neighbour's nickname.
    pub nick: u16,
    /// The neighbour's MAC on the shared link.
    pub snpa: Mac,
}

impl Adjacency {
    /// Build an adjacency entry.
    #[must_use]
    pub fn new(nick: u16, snpa: Mac) -> Adjacency {
        Adjacency { nick, snpa }
    }

    /// The neighbour's nickname, if the raw value is legal.
    #[must_use]
    pub fn nickname(&self) -> Option<Nickname> {
        Nickname::from_wire(self.nick)
    }
}

/// Everything the control plane knows about one RBridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NickInfo {
    snpa: Mac,
    adjacencies: Vec<Adjacency>,
    dtroots: Vec<u16>,
}

impl NickInfo {
    /// Build a record.
    ///
    /// `snpa` is the RBridge's own MAC on the link shared with this bridge.
    /// `dtroots` lists the distribution-tree roots the RBridge advertises,
    /// most preferred first.
    #[must_use]
    pub fn new(snpa: Mac, adjacencies: Vec<Adjacency>, dtroots: Vec<u16>) -> NickInfo {
        NickInfo {
            snpa,
            adjacencies,
            dtroots,
        }
    }

    /// The RBridge's MAC on the shared link.
    #[must_use]
    pub fn snpa(&self) -> Mac {
        self.snpa
    }

    /// The RBridge's adjacencies.
    #[must_use]
    pub fn adjacencies(&self) -> &[Adjacency] {
        &self.adjacencies
    }

    /// The distribution-tree roots the RBridge advertises, most preferred
    /// first.
    #[must_use]
    pub fn dtroots(&self) -> &[u16] {
        &self.dtroots
    }

    /// The RBridge's preferred distribution-tree root, if it advertises
    /// any.
    #[must_use]
    pub fn dtroot_preferred(&self) -> Option<u16> {
        self.dtroots.first().copied()
    }
}

/// The ref-counted envelope the nickname table publishes.
///
/// Handles to a node ([`std::sync::Arc<RbrNode>`]) stay valid after the
/// node's slot is cleared or overwritten; the record is freed when the
/// last handle goes away.
#[derive(Debug)]
pub struct RbrNode {
    ni: NickInfo,
}

impl RbrNode {
    /// Wrap a record for publication.
    #[must_use]
    pub fn new(ni: NickInfo) -> RbrNode {
        RbrNode { ni }
    }

    /// The published record.
    #[must_use]
    pub fn ni(&self) -> &NickInfo {
        &self.ni
    }
}
