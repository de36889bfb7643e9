// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The encapsulation pipeline.
//!
//! Native frames from guest ports are wrapped in (inner to outer) an
//! optional VNT extension, an optional options word, the TRILL header and
//! an outer Ethernet header. Unicast frames go straight to the next-hop
//! logic; frames with no known egress travel the distribution tree, with
//! one copy delivered locally first.

use crate::bridge::HostBridge;
use crate::engine::Ctx;
use crate::error::DropReason;
use crate::frame::{Frame, VlanTag};
use crate::fwd;
use crate::table::NICKNAME_NONE;
use crate::vnt::VntDomain;
use net::buffer::FrameBufferMut;
use net::eth::Eth;
use net::eth::ethtype::EthType;
use net::eth::mac::{DestinationMac, Mac, SourceMac};
use net::parse::DeParse;
use net::trill::opt::TrillOpt;
use net::trill::vnt::{Vni, VntExtension};
use net::trill::{Nickname, TrillHdr};
use net::vlan::Vlan;
use tracing::warn;

#[allow(clippy::cast_possible_truncation)] // three units
const VNT_OPTS_UNITS: u8 = ((TrillOpt::HEADER_LEN + VntExtension::HEADER_LEN) / 4) as u8;

/// Validate, choose the egress, encapsulate and hand off to forwarding.
///
/// `egress` is the raw nickname resolved from the destination MAC;
/// [`NICKNAME_NONE`] means "unknown, use the distribution tree".
pub(crate) fn encaps_prepare<Buf, B, V>(
    ctx: &Ctx<'_, B, V>,
    frame: Frame<Buf>,
    egress: u16,
    vid: u16,
) where
    Buf: FrameBufferMut,
    B: HostBridge<Buf>,
    V: VntDomain<Buf>,
{
    let egress = if egress == NICKNAME_NONE {
        None
    } else {
        match Nickname::from_wire(egress) {
            Some(egress) => Some(egress),
            None => {
                warn!("invalid destination nickname {egress:#06x}");
                return ctx.tx_drop(frame, DropReason::InvalidNickname);
            }
        }
    };
    let Some(local) = ctx.rbr.local_nick() else {
        // the daemon has not sent the local nickname yet
        return ctx.tx_drop(frame, DropReason::NoIdentity);
    };
    let vni = ctx.vnt.port_vni(frame.port());
    match egress {
        Some(egress) => match encaps(ctx, frame, local, egress, false, vni) {
            Ok(frame) => fwd::unicast_fwd(ctx, frame, egress.as_u16(), vid),
            Err((frame, reason)) => ctx.tx_drop(frame, reason),
        },
        None => multidest_encaps(ctx, frame, local, vni, vid),
    }
}

/// The distribution-tree leg: deliver one copy locally, encapsulate the
/// original toward the chosen tree root and fan it out.
fn multidest_encaps<Buf, B, V>(
    ctx: &Ctx<'_, B, V>,
    frame: Frame<Buf>,
    local: Nickname,
    vni: Option<Vni>,
    vid: u16,
) where
    Buf: FrameBufferMut,
    B: HostBridge<Buf>,
    V: VntDomain<Buf>,
{
    let Some(self_node) = ctx.rbr.find(local.as_u16()) else {
        // identity is set but our own node record has not arrived yet
        return ctx.tx_drop(frame, DropReason::UnknownNode);
    };
    let dtr_raw = match self_node.ni().dtroot_preferred() {
        Some(raw) => raw,
        None => ctx.rbr.tree_root().map_or(NICKNAME_NONE, Nickname::as_u16),
    };
    drop(self_node);
    let Some(dtr) = Nickname::from_wire(dtr_raw) else {
        return ctx.tx_drop(frame, DropReason::NoTreeRoot);
    };

    // the self-receive leg: multicast also reaches this bridge's own
    // end stations
    let local_copy = frame.deep_copy();
    match vni {
        Some(id) => {
            if let Err(copy) = ctx.vnt.vni_flood(id, local_copy) {
                ctx.rx_drop(copy, DropReason::UnknownVni);
            }
        }
        None => ctx.bridge.endstation_deliver(local_copy),
    }

    match encaps(ctx, frame, local, dtr, true, vni) {
        Ok(frame) => {
            let _ = fwd::multidest_fwd(ctx, frame, dtr.as_u16(), local.as_u16(), None, vid, true);
        }
        Err((frame, reason)) => ctx.tx_drop(frame, reason),
    }
}

/// Wrap the frame: VLAN tag materialized inline, then (inner to outer)
/// VNT extension, options word, TRILL header, outer Ethernet.
///
/// The outer source is the bridge MAC and the outer destination is a
/// placeholder; forwarding rewrites both per hop.
fn encaps<Buf, B, V>(
    ctx: &Ctx<'_, B, V>,
    mut frame: Frame<Buf>,
    ingress: Nickname,
    egress: Nickname,
    multidest: bool,
    vni: Option<Vni>,
) -> Result<Frame<Buf>, (Frame<Buf>, DropReason)>
where
    Buf: FrameBufferMut,
    B: HostBridge<Buf>,
{
    if let Some(tag) = frame.take_vlan() {
        if let Err(reason) = insert_vlan_tag(&mut frame, tag) {
            return Err((frame, reason));
        }
    }
    let mut opts_units: u8 = 0;
    if let Some(vni) = vni {
        opts_units = VNT_OPTS_UNITS;
        if let Err(reason) = prepend_header(&mut frame, &VntExtension::new(vni)) {
            return Err((frame, reason));
        }
        if let Err(reason) = prepend_header(&mut frame, &TrillOpt::default()) {
            return Err((frame, reason));
        }
    }
    let trh = TrillHdr::new(multidest, egress, ingress, opts_units)
        .unwrap_or_else(|_| unreachable!()); // three units fit the 5-bit field
    if let Err(reason) = prepend_header(&mut frame, &trh) {
        return Err((frame, reason));
    }
    let Ok(source) = SourceMac::new(ctx.bridge.bridge_mac()) else {
        return Err((frame, DropReason::MalformedEthernet));
    };
    let destination = DestinationMac::new(Mac::BROADCAST).unwrap_or_else(|_| unreachable!());
    let eth = Eth::new(source, destination, EthType::TRILL);
    if let Err(reason) = prepend_header(&mut frame, &eth) {
        return Err((frame, reason));
    }
    frame.set_encapsulated(true);
    Ok(frame)
}

fn prepend_header<Buf: FrameBufferMut, H: DeParse>(
    frame: &mut Frame<Buf>,
    hdr: &H,
) -> Result<(), DropReason> {
    let len = u16::try_from(hdr.size().get()).map_err(|_| DropReason::NoHeadroom)?;
    let Ok(slice) = frame.prepend(len) else {
        return Err(DropReason::NoHeadroom);
    };
    hdr.deparse(slice)
        .map(|_| ())
        .map_err(|_| DropReason::NoHeadroom)
}

/// Materialize an out-of-band VLAN tag into the buffer, so the inner
/// payload begins with a full Ethernet + 802.1Q header.
fn insert_vlan_tag<Buf: FrameBufferMut>(
    frame: &mut Frame<Buf>,
    tag: VlanTag,
) -> Result<(), DropReason> {
    if frame.len() < Eth::HEADER_LEN {
        return Err(DropReason::Truncated);
    }
    #[allow(clippy::cast_possible_truncation)] // four bytes
    let tag_len = Vlan::HEADER_LEN as u16;
    if frame.prepend(tag_len).is_err() {
        return Err(DropReason::NoHeadroom);
    }
    let bytes = frame.bytes_mut();
    // the mac pair moves to the front; the tag lands where the ethertype
    // was
    bytes.copy_within(4..16, 0);
    let inner_ethtype = EthType::new_from_be_bytes([bytes[16], bytes[17]]);
    bytes[12..14].copy_from_slice(&EthType::VLAN.raw().to_be_bytes());
    Vlan::new(tag.vid, inner_ethtype, tag.pcp, tag.dei)
        .deparse(&mut bytes[14..18])
        .map(|_| ())
        .map_err(|_| DropReason::NoHeadroom)
}
