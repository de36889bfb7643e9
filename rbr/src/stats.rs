// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Data-plane drop counters.

use std::sync::atomic::{AtomicU64, Ordering};

/// Frame drop counters for one bridge.
///
/// Receive-path failures (validation, decapsulation, local delivery) count
/// against `rx_dropped`; transmit-path failures (encapsulation, forwarding)
/// count against `tx_dropped`. Increments are relaxed; the counters are
/// diagnostics, not synchronization.
#[derive(Debug, Default)]
pub struct TrillStats {
    rx_dropped: AtomicU64,
    tx_dropped: AtomicU64,
}

impl TrillStats {
    /// Create zeroed counters.
    #[must_use]
    pub fn new() -> TrillStats {
        TrillStats::default()
    }

    /// Frames dropped on the receive path.
    #[must_use]
    pub fn rx_dropped(&self) -> u64 {
        self.rx_dropped.load(Ordering::Relaxed)
    }

    /// Frames dropped on the transmit path.
    #[must_use]
    pub fn tx_dropped(&self) -> u64 {
        self.tx_dropped.load(Ordering::Relaxed)
    }

    pub(crate) fn inc_rx_dropped(&self) {
        self.rx_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn inc_tx_dropped(&self) {
        self.tx_dropped.fetch_add(1, Ordering::Relaxed);
    }
}
