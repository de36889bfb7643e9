// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The TRILL receive pipeline.
//!
//! Runs on TRILL-typed frames arriving on core ports. Validates the outer
//! header stack, then either decapsulates (egress is this RBridge),
//! forwards one hop (unicast) or fans out over the distribution tree and
//! decapsulates a local copy (multi-destination).

use crate::bridge::HostBridge;
use crate::decap;
use crate::engine::Ctx;
use crate::error::DropReason;
use crate::frame::Frame;
use crate::fwd;
use crate::vnt::VntDomain;
use net::buffer::FrameBufferMut;
use net::eth::Eth;
use net::trill::TrillHdr;

pub(crate) fn recv<Buf, B, V>(ctx: &Ctx<'_, B, V>, mut frame: Frame<Buf>, vid: u16)
where
    Buf: FrameBufferMut,
    B: HostBridge<Buf>,
    V: VntDomain<Buf>,
{
    let Some(port_mac) = ctx.bridge.port_mac(frame.port()) else {
        return ctx.rx_drop(frame, DropReason::UnknownPort);
    };
    let Ok(eth) = frame.eth() else {
        return ctx.rx_drop(frame, DropReason::MalformedEthernet);
    };
    // a switch between rbridges may flood trill frames to every port;
    // anything not addressed to this port would loop until the hop count
    // ran out
    if eth.destination() != port_mac {
        return ctx.rx_drop(frame, DropReason::NotForThisPort);
    }
    let saddr = eth.source();

    let Ok(trh) = frame.trill_hdr() else {
        return ctx.rx_drop(frame, DropReason::Truncated);
    };
    let trhsize = TrillHdr::HEADER_LEN + trh.opts_len_bytes();
    // outer ethernet + trill stack + at least an inner ethernet header
    if frame.len() < Eth::HEADER_LEN + trhsize + Eth::HEADER_LEN {
        return ctx.rx_drop(frame, DropReason::Truncated);
    }
    let (Some(ingress), Some(egress)) = (trh.ingress_nickname(), trh.egress_nickname()) else {
        return ctx.rx_drop(frame, DropReason::InvalidNickname);
    };
    if trh.version() != TrillHdr::PROTOCOL_VERS {
        return ctx.rx_drop(frame, DropReason::VersionMismatch);
    }
    let local = ctx.rbr.local_nick();
    if local == Some(ingress) {
        return ctx.rx_drop(frame, DropReason::IngressLoop);
    }
    // without the virtual-network module any option area is unknown data
    if trh.opts_len_units() > 0 && !ctx.vnt.enabled() {
        return ctx.rx_drop(frame, DropReason::UnknownOption);
    }
    frame.set_encapsulated(true);

    if !trh.multidest() {
        if egress == ingress {
            return ctx.rx_drop(frame, DropReason::EgressEqualsIngress);
        }
        if local == Some(egress) {
            decap::decaps(ctx, frame, trhsize, vid);
        } else if trh.hopcount() > 0 {
            ctx.bridge.fdb_update(frame.port(), saddr, vid);
            fwd::unicast_fwd(ctx, frame, egress.as_u16(), vid);
        } else {
            ctx.rx_drop(frame, DropReason::HopCountExhausted);
        }
        return;
    }

    // multi-destination: the sender must be one of our adjacencies on the
    // distribution tree named by the egress nickname
    let Some(dest) = ctx.rbr.find(egress.as_u16()) else {
        return ctx.rx_drop(frame, DropReason::UnknownNode);
    };
    let adjacent = dest
        .ni()
        .adjacencies()
        .iter()
        .any(|adj| adj.snpa == saddr);
    drop(dest);
    if !adjacent {
        return ctx.rx_drop(frame, DropReason::NotAdjacent);
    }

    // reverse path forwarding: the ingress rbridge must have advertised
    // the tree it used, or (legacy) advertise no trees at all while the
    // frame travels the bridge's fallback tree
    let Some(source_node) = ctx.rbr.find(ingress.as_u16()) else {
        return ctx.rx_drop(frame, DropReason::RpfFailed);
    };
    let on_advertised_tree = source_node.ni().dtroots().contains(&egress.as_u16());
    let legacy_fallback =
        source_node.ni().dtroots().is_empty() && ctx.rbr.tree_root() == Some(egress);
    drop(source_node);
    if !(on_advertised_tree || legacy_fallback) {
        return ctx.rx_drop(frame, DropReason::RpfFailed);
    }

    if trh.hopcount() == 0 {
        return ctx.rx_drop(frame, DropReason::HopCountExhausted);
    }

    // the copy travels on over the tree, the original is delivered here
    let copy = frame.deep_copy();
    if fwd::multidest_fwd(
        ctx,
        copy,
        egress.as_u16(),
        ingress.as_u16(),
        Some(saddr),
        vid,
        false,
    )
    .is_err()
    {
        return ctx.rx_drop(frame, DropReason::UnknownNode);
    }
    decap::decaps(ctx, frame, trhsize, vid);
}
