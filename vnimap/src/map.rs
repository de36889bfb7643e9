// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! A table to store arbitrary data per virtual network.
//!
//! The map associates a [`Vni`] with data of any `Clone` type (the engine
//! uses it for per-VNI flood tables). Access is concurrent through
//! left-right: the control plane holds the single [`VniMapWriter`], every
//! data-plane thread holds a cheap [`VniMapReader`]. Readers observe a
//! consistent snapshot and never block the writer.

use crate::{VniMapError, VniMapResult};
use ahash::RandomState;
use left_right::{Absorb, ReadGuard, ReadHandle, WriteHandle, new_from_empty};
use net::trill::vnt::Vni;
use std::collections::HashMap;
use std::collections::HashSet;

/// The table proper: a hash map from [`Vni`] to `T`.
#[derive(Clone, Default)]
pub struct VniMap<T: Clone>(HashMap<Vni, T, RandomState>);

impl<T: Clone> VniMap<T> {
    pub(crate) fn new() -> Self {
        Self(HashMap::with_hasher(RandomState::with_seed(0)))
    }

    fn set(&mut self, vni: Vni, entry: T) {
        self.0.insert(vni, entry);
    }

    fn del(&mut self, vni: Vni) {
        self.0.remove(&vni);
    }

    /// Get a reference to the entry for `vni`.
    pub fn get(&self, vni: Vni) -> Option<&T> {
        self.0.get(&vni)
    }

    /// The number of entries in the map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True iff the map holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

enum VniMapChange<T: Clone> {
    Add(Vni, T),
    Del(Vni),
}

impl<T: Clone> Absorb<VniMapChange<T>> for VniMap<T> {
    fn absorb_first(&mut self, change: &mut VniMapChange<T>, _: &Self) {
        match change {
            VniMapChange::Add(vni, entry) => {
                self.set(*vni, entry.clone());
            }
            VniMapChange::Del(vni) => {
                self.del(*vni);
            }
        }
    }
    fn drop_first(self: Box<Self>) {}
    fn sync_with(&mut self, first: &Self) {
        *self = first.clone();
    }
}

/// The write handle of a [`VniMap`]. Owned by the control plane.
pub struct VniMapWriter<T: Clone> {
    inner: WriteHandle<VniMap<T>, VniMapChange<T>>,
    // mirror of the published key set so that duplicate detection does not
    // need to reach into the unpublished copy
    keys: HashSet<Vni, RandomState>,
}

/// A read handle of a [`VniMap`]. Cheap to clone, one per data-plane
/// thread.
pub struct VniMapReader<T: Clone>(ReadHandle<VniMap<T>>);

impl<T: Clone> VniMapWriter<T> {
    /// Create an empty map and its write handle.
    #[must_use]
    #[allow(clippy::new_without_default)]
    pub fn new() -> VniMapWriter<T> {
        let (w, _) = new_from_empty::<VniMap<T>, VniMapChange<T>>(VniMap::new());
        VniMapWriter {
            inner: w,
            keys: HashSet::with_hasher(RandomState::with_seed(0)),
        }
    }

    /// Get a new read handle onto the map.
    #[must_use]
    pub fn get_reader(&self) -> VniMapReader<T> {
        VniMapReader(self.inner.clone())
    }

    /// Add an entry to the map.
    ///
    /// # Errors
    ///
    /// Returns [`VniMapError::EntryExists`] if an entry for `vni` is already
    /// present.
    pub fn add(&mut self, vni: Vni, entry: T, publish: bool) -> VniMapResult<()> {
        if !self.keys.insert(vni) {
            return Err(VniMapError::EntryExists(vni));
        }
        self.inner.append(VniMapChange::Add(vni, entry));
        if publish {
            self.inner.publish();
        }
        Ok(())
    }

    /// Remove the entry for `vni`. Does nothing if it is not there.
    pub fn del(&mut self, vni: Vni, publish: bool) {
        self.keys.remove(&vni);
        self.inner.append(VniMapChange::Del(vni));
        if publish {
            self.inner.publish();
        }
    }

    /// Expose pending changes to the readers.
    pub fn publish(&mut self) {
        self.inner.publish();
    }
}

impl<T: Clone> VniMapReader<T> {
    /// Enter the read side of the map.
    ///
    /// Returns `None` only if the writer has been dropped.
    pub fn enter(&self) -> Option<ReadGuard<'_, VniMap<T>>> {
        self.0.enter()
    }

    /// Clone the entry for `vni` out of the current snapshot.
    pub fn get(&self, vni: Vni) -> Option<T> {
        self.enter().and_then(|map| map.get(vni).cloned())
    }
}
