// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Concurrent virtual-network tables for the TRILL data plane.
//!
//! This crate holds the read-mostly tables behind the engine's VNT hooks:
//! a map from [`Vni`] to arbitrary per-network data (flood tables in
//! particular) and a map from bridge port to [`Vni`]. Both use left-right
//! so that data-plane readers never block on control-plane writers.
//!
//! [`Vni`]: net::trill::vnt::Vni

#![deny(clippy::all, clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use net::trill::vnt::Vni;
use thiserror::Error;

/// The errors produced by the tables in this crate.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum VniMapError {
    /// An entry for this [`Vni`] is already present.
    #[error("an entry for vni {0} already exists")]
    EntryExists(Vni),
}

type VniMapResult<T> = Result<T, VniMapError>;

pub mod map;
#[cfg(test)]
mod map_test;
pub mod ports;
