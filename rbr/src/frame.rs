// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The frame the engine works on.
//!
//! A [`Frame`] is an opaque byte buffer plus receive metadata. The buffer
//! always begins at the outermost Ethernet header; encapsulation prepends
//! in front of it and decapsulation trims from it. Header access is
//! view-based: parse a header out of the buffer, mutate the copy, write it
//! back. Views are never held across an operation that moves the buffer
//! start.

use crate::bridge::PortId;
use net::buffer::{FrameBufferMut, Prepend, TrimFromStart};
use net::eth::{Eth, EthError};
use net::parse::{DeParse, Parse, ParseError};
use net::trill::TrillHdr;
use net::vlan::{Pcp, Vid};

/// How the frame reached the hook.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FrameKind {
    /// An ordinary frame received on a port.
    #[default]
    Normal,
    /// A looped-back frame; the engine passes these through untouched.
    Loopback,
    /// A frame (re)classified as addressed to the host itself.
    Host,
}

/// An out-of-band VLAN tag carried in frame metadata.
///
/// The host bridge strips the 802.1Q tag on receive; encapsulation
/// materializes it back into the buffer so the inner frame is fully
/// self-describing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VlanTag {
    /// The VLAN id.
    pub vid: Vid,
    /// The priority code point.
    pub pcp: Pcp,
    /// The drop-eligibility indicator.
    pub dei: bool,
}

/// The frame is too short to hold the requested header view.
#[derive(Debug, thiserror::Error)]
#[error("frame too short for header view")]
pub struct ViewError;

/// A frame owned by the engine.
#[derive(Debug)]
pub struct Frame<Buf: FrameBufferMut> {
    buf: Buf,
    port: PortId,
    vlan: Option<VlanTag>,
    encapsulated: bool,
    kind: FrameKind,
}

impl<Buf: FrameBufferMut> Frame<Buf> {
    /// Wrap a buffer received on `port`.
    #[must_use]
    pub fn new(buf: Buf, port: PortId) -> Frame<Buf> {
        Frame {
            buf,
            port,
            vlan: None,
            encapsulated: false,
            kind: FrameKind::Normal,
        }
    }

    /// The port the frame arrived on.
    #[must_use]
    pub fn port(&self) -> PortId {
        self.port
    }

    /// The out-of-band VLAN tag, if the bridge recorded one.
    #[must_use]
    pub fn vlan(&self) -> Option<VlanTag> {
        self.vlan
    }

    /// Record an out-of-band VLAN tag.
    pub fn set_vlan(&mut self, tag: Option<VlanTag>) -> &mut Self {
        self.vlan = tag;
        self
    }

    /// Take the out-of-band VLAN tag, leaving none.
    pub fn take_vlan(&mut self) -> Option<VlanTag> {
        self.vlan.take()
    }

    /// How the frame reached the hook.
    #[must_use]
    pub fn kind(&self) -> FrameKind {
        self.kind
    }

    /// Reclassify the frame.
    pub fn set_kind(&mut self, kind: FrameKind) -> &mut Self {
        self.kind = kind;
        self
    }

    /// True while the buffer starts with an outer Ethernet + TRILL stack.
    #[must_use]
    pub fn encapsulated(&self) -> bool {
        self.encapsulated
    }

    /// Mark the frame as (de)encapsulated.
    pub fn set_encapsulated(&mut self, encapsulated: bool) -> &mut Self {
        self.encapsulated = encapsulated;
        self
    }

    /// The frame bytes, starting at the outermost Ethernet header.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        self.buf.as_ref()
    }

    /// The frame bytes, mutably.
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        self.buf.as_mut()
    }

    /// The number of bytes in the frame.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.as_ref().len()
    }

    /// True iff the frame holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Grow the frame at the front by `len` bytes.
    ///
    /// # Errors
    ///
    /// Fails when the buffer has too little headroom; the frame is
    /// unchanged in that case.
    pub fn prepend(&mut self, len: u16) -> Result<&mut [u8], <Buf as Prepend>::Error> {
        self.buf.prepend(len)
    }

    /// Shrink the frame at the front by `len` bytes.
    ///
    /// # Errors
    ///
    /// Fails when the frame holds fewer than `len` bytes; the frame is
    /// unchanged in that case.
    pub fn trim_from_start(&mut self, len: u16) -> Result<(), <Buf as TrimFromStart>::Error> {
        self.buf.trim_from_start(len).map(|_| ())
    }

    /// Deep-copy the frame: buffer bytes and metadata.
    #[must_use]
    pub fn deep_copy(&self) -> Frame<Buf> {
        Frame {
            buf: self.buf.clone(),
            port: self.port,
            vlan: self.vlan,
            encapsulated: self.encapsulated,
            kind: self.kind,
        }
    }

    /// A view of the Ethernet header at the front of the buffer.
    ///
    /// # Errors
    ///
    /// Fails when the bytes do not form a valid Ethernet header.
    pub fn eth(&self) -> Result<Eth, ParseError<EthError>> {
        Eth::parse(self.bytes()).map(|(eth, _)| eth)
    }

    /// Write an Ethernet header view back to the front of the buffer.
    ///
    /// # Errors
    ///
    /// Fails when the frame is shorter than the header.
    pub fn write_eth(&mut self, eth: &Eth) -> Result<(), ViewError> {
        eth.deparse(self.bytes_mut())
            .map(|_| ())
            .map_err(|_| ViewError)
    }

    /// A view of the TRILL header following the outer Ethernet header.
    ///
    /// # Errors
    ///
    /// Fails when the frame is too short to hold one.
    pub fn trill_hdr(&self) -> Result<TrillHdr, ViewError> {
        let bytes = self.bytes().get(Eth::HEADER_LEN..).unwrap_or(&[]);
        TrillHdr::parse(bytes)
            .map(|(trh, _)| trh)
            .map_err(|_| ViewError)
    }

    /// Write a TRILL header view back behind the outer Ethernet header.
    ///
    /// # Errors
    ///
    /// Fails when the frame is too short to hold one.
    pub fn write_trill_hdr(&mut self, trh: &TrillHdr) -> Result<(), ViewError> {
        let bytes = self
            .bytes_mut()
            .get_mut(Eth::HEADER_LEN..)
            .unwrap_or(&mut []);
        trh.deparse(bytes).map(|_| ()).map_err(|_| ViewError)
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod test {
    use super::*;
    use net::buffer::HeadroomBuffer;

    #[test]
    fn deep_copy_does_not_share_bytes() {
        let buf = HeadroomBuffer::from_frame(&[0u8; 20]);
        let mut frame = Frame::new(buf, PortId(1));
        let copy = frame.deep_copy();
        frame.bytes_mut()[0] = 0xff;
        assert_eq!(copy.bytes()[0], 0);
        assert_eq!(copy.port(), PortId(1));
    }

    #[test]
    fn trill_view_round_trips() {
        use net::trill::Nickname;
        let trh = TrillHdr::new(
            false,
            Nickname::new(2).unwrap(),
            Nickname::new(1).unwrap(),
            0,
        )
        .unwrap();
        let bytes = vec![0u8; Eth::HEADER_LEN + TrillHdr::HEADER_LEN];
        let mut frame = Frame::new(HeadroomBuffer::from_frame(&bytes), PortId(1));
        frame.write_trill_hdr(&trh).unwrap();
        let mut seen = frame.trill_hdr().unwrap();
        assert_eq!(seen, trh);
        seen.dec_hopcount();
        frame.write_trill_hdr(&seen).unwrap();
        assert_eq!(
            frame.trill_hdr().unwrap().hopcount(),
            TrillHdr::DEFAULT_HOPS - 1
        );
    }

    #[test]
    fn views_fail_on_short_frames() {
        let mut frame = Frame::new(HeadroomBuffer::from_frame(&[0u8; 10]), PortId(1));
        assert!(frame.trill_hdr().is_err());
        let trh = TrillHdr::new(
            false,
            net::trill::Nickname::new(2).unwrap(),
            net::trill::Nickname::new(1).unwrap(),
            0,
        )
        .unwrap();
        assert!(frame.write_trill_hdr(&trh).is_err());
    }
}
