// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Port to virtual-network membership.
//!
//! Guest ports may belong to at most one virtual network. The engine asks
//! for a port's [`Vni`] on every encapsulated or decapsulated frame, so the
//! table is left-right like [`crate::map::VniMap`]: the control plane owns
//! the writer, the data plane reads a snapshot.
//!
//! The table is generic over the port key; the bridge decides what a port
//! id looks like.

use ahash::RandomState;
use left_right::{Absorb, ReadHandle, WriteHandle, new_from_empty};
use net::trill::vnt::Vni;
use std::collections::HashMap;
use std::hash::Hash;

/// The membership table proper.
#[derive(Clone)]
pub struct PortVni<P: Hash + Eq + Copy>(HashMap<P, Vni, RandomState>);

impl<P: Hash + Eq + Copy> Default for PortVni<P> {
    fn default() -> Self {
        Self(HashMap::with_hasher(RandomState::with_seed(0)))
    }
}

impl<P: Hash + Eq + Copy> PortVni<P> {
    /// The [`Vni`] the port belongs to, if any.
    pub fn get(&self, port: P) -> Option<Vni> {
        self.0.get(&port).copied()
    }
}

enum PortVniChange<P> {
    Set(P, Vni),
    Clear(P),
}

impl<P: Hash + Eq + Copy> Absorb<PortVniChange<P>> for PortVni<P> {
    fn absorb_first(&mut self, change: &mut PortVniChange<P>, _: &Self) {
        match change {
            PortVniChange::Set(port, vni) => {
                self.0.insert(*port, *vni);
            }
            PortVniChange::Clear(port) => {
                self.0.remove(port);
            }
        }
    }
    fn drop_first(self: Box<Self>) {}
    fn sync_with(&mut self, first: &Self) {
        *self = first.clone();
    }
}

/// The write handle of a [`PortVni`] table. Owned by the control plane.
pub struct PortVniWriter<P: Hash + Eq + Copy>(WriteHandle<PortVni<P>, PortVniChange<P>>);

/// A read handle of a [`PortVni`] table.
pub struct PortVniReader<P: Hash + Eq + Copy>(ReadHandle<PortVni<P>>);

impl<P: Hash + Eq + Copy> PortVniWriter<P> {
    /// Create an empty table and its write handle.
    #[must_use]
    #[allow(clippy::new_without_default)]
    pub fn new() -> PortVniWriter<P> {
        let (w, _) = new_from_empty::<PortVni<P>, PortVniChange<P>>(PortVni::default());
        PortVniWriter(w)
    }

    /// Get a new read handle onto the table.
    #[must_use]
    pub fn get_reader(&self) -> PortVniReader<P> {
        PortVniReader(self.0.clone())
    }

    /// Put `port` in the virtual network `vni`, replacing any previous
    /// membership.
    pub fn set(&mut self, port: P, vni: Vni) {
        self.0.append(PortVniChange::Set(port, vni));
        self.0.publish();
    }

    /// Remove any membership of `port`.
    pub fn clear(&mut self, port: P) {
        self.0.append(PortVniChange::Clear(port));
        self.0.publish();
    }
}

impl<P: Hash + Eq + Copy> PortVniReader<P> {
    /// The [`Vni`] the port belongs to in the current snapshot, if any.
    pub fn get(&self, port: P) -> Option<Vni> {
        self.0.enter().and_then(|map| map.get(port))
    }
}
