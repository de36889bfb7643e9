// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The decapsulation pipeline.
//!
//! Strips the outer Ethernet + TRILL stack, learns where the inner source
//! lives (behind the ingress RBridge), and delivers the inner frame:
//! directly on a forwarding-database hit, by VNI-scoped flood when the
//! frame names a virtual network, as end-station flood otherwise.

use crate::bridge::HostBridge;
use crate::engine::Ctx;
use crate::error::DropReason;
use crate::frame::Frame;
use crate::vnt::VntDomain;
use net::buffer::FrameBufferMut;
use net::eth::Eth;
use net::eth::mac::Mac;
use net::parse::Reader;
use net::trill::TrillHdr;
use net::trill::opt::TrillOpt;
use net::trill::vnt::{Vni, VntExtension};

/// Strip the TRILL stack from a frame whose egress is this RBridge and
/// deliver the inner frame.
///
/// `trhsize` is the validated length of the TRILL header plus its option
/// area.
pub(crate) fn decaps<Buf, B, V>(ctx: &Ctx<'_, B, V>, mut frame: Frame<Buf>, trhsize: usize, vid: u16)
where
    Buf: FrameBufferMut,
    B: HostBridge<Buf>,
    V: VntDomain<Buf>,
{
    let Ok(trh) = frame.trill_hdr() else {
        return ctx.rx_drop(frame, DropReason::Truncated);
    };
    let ingress = trh.ingress();

    #[allow(clippy::cast_possible_truncation)] // twenty bytes
    let outer_len = (Eth::HEADER_LEN + TrillHdr::HEADER_LEN) as u16;
    if frame.trim_from_start(outer_len).is_err() {
        return ctx.rx_drop(frame, DropReason::Truncated);
    }

    let mut vni = None;
    if trh.opts_len_units() > 0 {
        if !ctx.vnt.enabled() {
            return ctx.rx_drop(frame, DropReason::UnknownOption);
        }
        let declared = trhsize - TrillHdr::HEADER_LEN;
        let consumed = match parse_options(frame.bytes(), declared) {
            Ok((parsed, consumed)) => {
                vni = parsed;
                consumed
            }
            Err(reason) => return ctx.rx_drop(frame, reason),
        };
        let Ok(consumed) = u16::try_from(consumed) else {
            return ctx.rx_drop(frame, DropReason::Truncated);
        };
        if frame.trim_from_start(consumed).is_err() {
            return ctx.rx_drop(frame, DropReason::Truncated);
        }
    }

    frame.set_encapsulated(false);

    let Ok(inner) = frame.eth() else {
        return ctx.rx_drop(frame, DropReason::MalformedEthernet);
    };
    // remember which rbridge the inner source lives behind
    ctx.bridge
        .fdb_update_nick(frame.port(), inner.source(), vid, ingress);
    decap_finish(ctx, frame, vid, vni, inner.destination());
}

/// Walk the option area: the fixed options word, then the VNT extension.
///
/// Any declared option bytes beyond what this bridge understands cause a
/// drop. Returns the carried VNI (zero decodes to "none") and the number
/// of bytes walked.
fn parse_options(bytes: &[u8], declared: usize) -> Result<(Option<Vni>, usize), DropReason> {
    if declared < TrillOpt::HEADER_LEN + VntExtension::HEADER_LEN {
        return Err(DropReason::UnknownOption);
    }
    let mut reader = Reader::new(bytes);
    let Ok(_opt) = reader.parse::<TrillOpt>() else {
        return Err(DropReason::Truncated);
    };
    let Ok(ext) = reader.parse::<VntExtension>() else {
        return Err(DropReason::Truncated);
    };
    if ext.extension_type() != VntExtension::EXTENSION_TYPE {
        return Err(DropReason::UnknownExtensionType);
    }
    if reader.consumed() != declared {
        return Err(DropReason::UnknownOption);
    }
    Ok((ext.vni(), reader.consumed()))
}

/// Deliver a decapsulated inner frame.
fn decap_finish<Buf, B, V>(
    ctx: &Ctx<'_, B, V>,
    frame: Frame<Buf>,
    vid: u16,
    vni: Option<Vni>,
    destination: Mac,
) where
    Buf: FrameBufferMut,
    B: HostBridge<Buf>,
    V: VntDomain<Buf>,
{
    match ctx.bridge.fdb_get(destination, vid) {
        Some(entry) => {
            // with virtual networking active, delivery never crosses
            // network boundaries
            if ctx.vnt.enabled() && ctx.vnt.port_vni(entry.port) != vni {
                return ctx.rx_drop(frame, DropReason::VniMismatch);
            }
            ctx.bridge.deliver(entry.port, frame);
        }
        None => match vni {
            Some(vni) => {
                if let Err(frame) = ctx.vnt.vni_flood(vni, frame) {
                    ctx.rx_drop(frame, DropReason::UnknownVni);
                }
            }
            None => ctx.bridge.endstation_deliver(frame),
        },
    }
}
