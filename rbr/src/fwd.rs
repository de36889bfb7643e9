// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The forwarding pipeline.
//!
//! Unicast forwarding rewrites the outer Ethernet header toward one
//! adjacency and hands the frame back to the bridge. Multi-destination
//! forwarding fans a frame out over the adjacencies of a distribution
//! tree, with split horizon toward the ingress RBridge and toward the
//! link the frame arrived on.

use crate::bridge::HostBridge;
use crate::engine::Ctx;
use crate::error::DropReason;
use crate::frame::Frame;
use net::buffer::FrameBufferMut;
use net::eth::mac::{DestinationMac, Mac, SourceMac};
use tracing::{trace, warn};

/// Forward a TRILL frame to the adjacency named by `adj_nick`.
///
/// Decrements the hop count in place, rewrites the outer Ethernet header
/// (source: this bridge, destination: the adjacency's SNPA) and hands the
/// frame to the finish stage.
pub(crate) fn unicast_fwd<Buf, B, V>(
    ctx: &Ctx<'_, B, V>,
    mut frame: Frame<Buf>,
    adj_nick: u16,
    vid: u16,
) where
    Buf: FrameBufferMut,
    B: HostBridge<Buf>,
{
    let Some(adj) = ctx.rbr.find(adj_nick) else {
        warn!("unable to find adjacent rbridge {adj_nick:#06x}");
        return ctx.tx_drop(frame, DropReason::UnknownNode);
    };
    let Ok(mut trh) = frame.trill_hdr() else {
        return ctx.tx_drop(frame, DropReason::Truncated);
    };
    trh.dec_hopcount();
    if frame.write_trill_hdr(&trh).is_err() {
        return ctx.tx_drop(frame, DropReason::Truncated);
    }
    let Ok(mut eth) = frame.eth() else {
        return ctx.tx_drop(frame, DropReason::MalformedEthernet);
    };
    let (Ok(source), Ok(destination)) = (
        SourceMac::new(ctx.bridge.bridge_mac()),
        DestinationMac::new(adj.ni().snpa()),
    ) else {
        return ctx.tx_drop(frame, DropReason::MalformedEthernet);
    };
    drop(adj);
    eth.set_source(source).set_destination(destination);
    if frame.write_eth(&eth).is_err() {
        return ctx.tx_drop(frame, DropReason::Truncated);
    }
    fwd_finish(ctx, frame, vid);
}

/// Pick the egress port for the rewritten outer destination and transmit.
///
/// On a forwarding-database hit the outer source becomes the egress
/// port's own MAC; on a miss the frame floods over the TRILL core.
fn fwd_finish<Buf, B, V>(ctx: &Ctx<'_, B, V>, mut frame: Frame<Buf>, vid: u16)
where
    Buf: FrameBufferMut,
    B: HostBridge<Buf>,
{
    let Ok(mut eth) = frame.eth() else {
        return ctx.tx_drop(frame, DropReason::MalformedEthernet);
    };
    match ctx.bridge.fdb_get(eth.destination(), vid) {
        Some(entry) => {
            if let Some(Ok(source)) = ctx.bridge.port_mac(entry.port).map(SourceMac::new) {
                eth.set_source(source);
                if frame.write_eth(&eth).is_err() {
                    return ctx.tx_drop(frame, DropReason::Truncated);
                }
            }
            ctx.bridge.forward(entry.port, frame);
        }
        None => ctx.bridge.trill_flood_forward(frame),
    }
}

/// Fan a multi-destination frame out over the distribution tree rooted at
/// `egress`.
///
/// Two passes: the first collects the surviving adjacencies (legal
/// nickname, not the ingress RBridge, not this RBridge, a known node,
/// not the link the frame arrived on); the second sends deep copies to all but the last
/// and, when the caller surrendered the buffer (`free`), the original to
/// the last. With `free == false` the original is copied for every target
/// and then released.
///
/// # Errors
///
/// Fails when the tree root is unknown; the frame has been dropped and
/// accounted for in that case.
pub(crate) fn multidest_fwd<Buf, B, V>(
    ctx: &Ctx<'_, B, V>,
    frame: Frame<Buf>,
    egress: u16,
    ingress: u16,
    saddr: Option<Mac>,
    vid: u16,
    free: bool,
) -> Result<(), ()>
where
    Buf: FrameBufferMut,
    B: HostBridge<Buf>,
{
    let Some(dest) = ctx.rbr.find(egress) else {
        warn!("multidest frame for unknown tree root {egress:#06x}");
        ctx.tx_drop(frame, DropReason::UnknownNode);
        return Err(());
    };
    let local = ctx.rbr.local_nick().map(u16::from);
    let mut targets: Vec<u16> = Vec::with_capacity(dest.ni().adjacencies().len());
    for adj in dest.ni().adjacencies() {
        if adj.nickname().is_none() || adj.nick == ingress {
            continue;
        }
        // we are on the tree ourselves; our copy is the decapsulated one
        if local == Some(adj.nick) {
            continue;
        }
        let Some(node) = ctx.rbr.find(adj.nick) else {
            continue;
        };
        // never send back on the link the frame arrived on
        if saddr.is_some_and(|saddr| node.ni().snpa() == saddr) {
            continue;
        }
        targets.push(adj.nick);
    }
    drop(dest);

    let Some((&last, rest)) = targets.split_last() else {
        trace!("no adjacency left on tree {egress:#06x}, frame has nowhere to go");
        drop(frame);
        return Ok(());
    };
    if free {
        // reuse the original buffer for the last target, saving one copy
        for &nick in rest {
            unicast_fwd(ctx, frame.deep_copy(), nick, vid);
        }
        unicast_fwd(ctx, frame, last, vid);
    } else {
        for &nick in &targets {
            unicast_fwd(ctx, frame.deep_copy(), nick, vid);
        }
        drop(frame);
    }
    Ok(())
}
