// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Error taxonomy of the engine.
//!
//! Only the control plane sees `Result`s. On the data plane every failure
//! terminates the frame's journey: the frame is freed, a drop counter is
//! bumped and a [`DropReason`] is logged. Nothing unwinds past a pipeline.

use net::trill::InvalidNickname;

/// Errors returned to the control plane.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum RbrError {
    /// The supplied nickname is outside the legal range.
    #[error(transparent)]
    InvalidNickname(#[from] InvalidNickname),
    /// The supplied nickname does not name a usable entry.
    #[error("no such nickname")]
    NoEntry,
    /// TRILL is not enabled on this bridge.
    #[error("trill is not enabled on this bridge")]
    NotEnabled,
}

/// Why the data plane terminated a frame's journey.
///
/// Bad arguments, failed lookups, resource exhaustion and policy checks all
/// end the same way; the reason only shows up in counters and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DropReason {
    /// The frame did not arrive on a known bridge port.
    #[error("frame did not arrive on a known bridge port")]
    UnknownPort,
    /// The outer Ethernet header did not parse or carries illegal addresses.
    #[error("outer ethernet header is malformed")]
    MalformedEthernet,
    /// The VLAN ingress policy rejected the frame.
    #[error("vlan ingress policy rejected the frame")]
    IngressFiltered,
    /// The frame is shorter than its declared header stack.
    #[error("frame is shorter than its declared header stack")]
    Truncated,
    /// A nickname field does not hold a valid nickname.
    #[error("nickname field does not hold a valid nickname")]
    InvalidNickname,
    /// The TRILL version is not the one this bridge speaks.
    #[error("unsupported trill protocol version")]
    VersionMismatch,
    /// The ingress nickname equals the local nickname.
    #[error("frame looped back to its ingress rbridge, check your config")]
    IngressLoop,
    /// A unicast frame names the same RBridge as ingress and egress.
    #[error("egress nickname equals ingress nickname")]
    EgressEqualsIngress,
    /// The outer destination is not the MAC of the receiving port.
    #[error("outer destination is not the receiving port")]
    NotForThisPort,
    /// The option area is present but this bridge cannot interpret it.
    #[error("unknown option area encountered, dropping frame for safety")]
    UnknownOption,
    /// The extension slot carries a type other than the VNT extension.
    #[error("unexpected extension type in the option area")]
    UnknownExtensionType,
    /// No node entry is installed for the nickname.
    #[error("no node entry for the nickname")]
    UnknownNode,
    /// The hop count reached zero before the frame reached its egress.
    #[error("hop count limit reached")]
    HopCountExhausted,
    /// A multi-destination frame arrived from a MAC that is not an
    /// adjacency on the named distribution tree.
    #[error("sender is not an adjacency on the distribution tree")]
    NotAdjacent,
    /// The ingress RBridge did not advertise the distribution tree it used.
    #[error("reverse path forwarding check failed")]
    RpfFailed,
    /// The control plane has not installed a local nickname yet.
    #[error("local nickname is not configured")]
    NoIdentity,
    /// Neither the local node nor the bridge names a distribution-tree
    /// root.
    #[error("no usable distribution-tree root")]
    NoTreeRoot,
    /// The buffer has too little headroom for the encapsulation stack.
    #[error("not enough buffer headroom for encapsulation")]
    NoHeadroom,
    /// Source and destination belong to different virtual networks.
    #[error("virtual-network ids of source and destination differ")]
    VniMismatch,
    /// The frame names a virtual network this bridge has no table for.
    #[error("no flood table for the frame's virtual network")]
    UnknownVni,
    /// A non-TRILL frame arrived on a core port and is not host-addressed.
    #[error("non-trill frame on a core port")]
    NotTrill,
}
