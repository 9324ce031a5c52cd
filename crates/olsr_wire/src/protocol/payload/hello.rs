//! HELLO - Link Sensing and Neighbor Detection.
//!
//! ```text
//! ┌──────────────────────────────┬──────────┬─────────────┐
//! │ Reserved (2)                 │ Htime (1)│ Willingness │
//! ├──────────┬───────────────────┼──────────┴─────────────┤
//! │ Code (1) │ Reserved (1)      │ Link Message Size (2)  │  repeated
//! ├──────────┴───────────────────┴────────────────────────┤
//! │ Neighbor Interface Address (4)                        │  repeated
//! └───────────────────────────────────────────────────────┘
//! ```
//!
//! Link message size counts its own 4-byte header.

use std::fmt;
use std::net::Ipv4Addr;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::buffer::{decode_addresses, ensure_remaining, BufMutExt, IPV4_LEN};
use crate::error::{WireError, WireResult};
use crate::time::Quantum;

/// Link type, the low two bits of a link code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum LinkType {
    /// No information about the link.
    Unspecified = 0,
    /// Heard but not confirmed bidirectional.
    Asymmetric = 1,
    /// Verified bidirectional.
    Symmetric = 2,
    /// Link lost.
    Lost = 3,
}

/// Neighbor type, bits 2 and 3 of a link code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum NeighborType {
    /// No symmetric link with this neighbor.
    NotNeighbor = 0,
    /// Symmetric neighbor.
    Symmetric = 1,
    /// Symmetric neighbor selected as MPR.
    Mpr = 2,
}

impl NeighborType {
    #[inline]
    const fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0 => Some(Self::NotNeighbor),
            1 => Some(Self::Symmetric),
            2 => Some(Self::Mpr),
            _ => None,
        }
    }
}

/// One category of neighbor links inside a HELLO.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LinkMessage {
    /// Link code (`neighbor_type << 2 | link_type`).
    pub link_code: u8,
    /// Neighbor interfaces sharing this link code, in wire order.
    pub neighbor_interface_addresses: Vec<Ipv4Addr>,
}

impl LinkMessage {
    /// Code, reserved and size fields.
    pub const HEADER_SIZE: usize = 4;

    /// Creates a link message from a raw code.
    #[must_use]
    pub fn new(link_code: u8, neighbor_interface_addresses: Vec<Ipv4Addr>) -> Self {
        Self {
            link_code,
            neighbor_interface_addresses,
        }
    }

    /// Creates a link message from its typed parts.
    #[must_use]
    pub fn from_parts(
        link_type: LinkType,
        neighbor_type: NeighborType,
        neighbor_interface_addresses: Vec<Ipv4Addr>,
    ) -> Self {
        Self::new(
            ((neighbor_type as u8) << 2) | link_type as u8,
            neighbor_interface_addresses,
        )
    }

    /// Link type bits of the code.
    #[must_use]
    pub const fn link_type(&self) -> LinkType {
        match self.link_code & 0x03 {
            0 => LinkType::Unspecified,
            1 => LinkType::Asymmetric,
            2 => LinkType::Symmetric,
            _ => LinkType::Lost,
        }
    }

    /// Neighbor type bits of the code, `None` for the reserved value 3.
    #[must_use]
    pub const fn neighbor_type(&self) -> Option<NeighborType> {
        NeighborType::from_bits((self.link_code >> 2) & 0x03)
    }

    /// Bytes on the wire, header included.
    #[inline]
    #[must_use]
    pub fn serialized_size(&self) -> usize {
        Self::HEADER_SIZE + self.neighbor_interface_addresses.len() * IPV4_LEN
    }

    fn encode(&self, buf: &mut BytesMut) -> WireResult<()> {
        let size = self.serialized_size();
        let size = u16::try_from(size).map_err(|_| WireError::Oversized {
            field: "link message",
            size,
            limit: usize::from(u16::MAX),
        })?;
        buf.put_u8(self.link_code);
        buf.put_u8(0);
        buf.put_u16(size);
        for addr in &self.neighbor_interface_addresses {
            buf.put_ipv4(addr);
        }
        Ok(())
    }

    fn decode(buf: &mut Bytes) -> WireResult<Self> {
        ensure_remaining(buf, Self::HEADER_SIZE)?;
        let link_code = buf.get_u8();
        let _reserved = buf.get_u8();
        let size = usize::from(buf.get_u16());

        if size < Self::HEADER_SIZE || (size - Self::HEADER_SIZE) % IPV4_LEN != 0 {
            let whole = size.saturating_sub(Self::HEADER_SIZE) / IPV4_LEN;
            return Err(WireError::SizeMismatch {
                field: "link message size",
                declared: size,
                actual: Self::HEADER_SIZE + whole * IPV4_LEN,
            });
        }
        let body_len = size - Self::HEADER_SIZE;
        if body_len > buf.remaining() {
            return Err(WireError::SizeMismatch {
                field: "link message size",
                declared: size,
                actual: Self::HEADER_SIZE + buf.remaining(),
            });
        }

        let mut body = buf.split_to(body_len);
        Ok(Self::new(link_code, decode_addresses(&mut body)))
    }
}

/// Neighbor discovery message.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Hello {
    /// Emission interval of this node's HELLOs.
    pub htime: Quantum,
    /// Willingness to carry traffic for others (`WILL_*`).
    pub willingness: u8,
    /// Link messages, in wire order.
    pub link_messages: Vec<LinkMessage>,
}

impl Hello {
    /// Reserved, htime and willingness fields.
    pub const HEAD_SIZE: usize = 4;

    /// Never selected as MPR.
    pub const WILL_NEVER: u8 = 0;
    /// Low willingness.
    pub const WILL_LOW: u8 = 1;
    /// Default willingness.
    pub const WILL_DEFAULT: u8 = 3;
    /// High willingness.
    pub const WILL_HIGH: u8 = 6;
    /// Always selected as MPR.
    pub const WILL_ALWAYS: u8 = 7;

    /// Creates a HELLO payload.
    #[must_use]
    pub fn new(htime: Quantum, willingness: u8, link_messages: Vec<LinkMessage>) -> Self {
        Self {
            htime,
            willingness,
            link_messages,
        }
    }

    /// HELLO emission interval in seconds.
    #[must_use]
    pub fn htime_seconds(&self) -> f64 {
        self.htime.as_seconds()
    }

    /// Sets the emission interval.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::QuantizationRange`] if `seconds` is not representable.
    pub fn set_htime_seconds(&mut self, seconds: f64) -> WireResult<()> {
        self.htime = Quantum::from_seconds(seconds)?;
        Ok(())
    }

    /// Bytes on the wire.
    #[must_use]
    pub fn serialized_size(&self) -> usize {
        Self::HEAD_SIZE
            + self
                .link_messages
                .iter()
                .map(LinkMessage::serialized_size)
                .sum::<usize>()
    }

    /// Appends the payload to `buf`.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::Oversized`] if a link message overflows its size field.
    pub fn encode(&self, buf: &mut BytesMut) -> WireResult<()> {
        buf.put_u16(0);
        buf.put_u8(self.htime.to_byte());
        buf.put_u8(self.willingness);
        for link in &self.link_messages {
            link.encode(buf)?;
        }
        Ok(())
    }

    /// Decodes a payload filling `buf`.
    ///
    /// Fewer trailing bytes than a link header stay in `buf`.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::Truncated`] for a short head and
    /// [`WireError::SizeMismatch`] for an inconsistent link message size.
    pub fn decode_body(buf: &mut Bytes) -> WireResult<Self> {
        ensure_remaining(buf, Self::HEAD_SIZE)?;
        let _reserved = buf.get_u16();
        let htime = Quantum(buf.get_u8());
        let willingness = buf.get_u8();

        let mut link_messages = Vec::new();
        while buf.remaining() >= LinkMessage::HEADER_SIZE {
            link_messages.push(LinkMessage::decode(buf)?);
        }

        Ok(Self {
            htime,
            willingness,
            link_messages,
        })
    }
}

impl fmt::Display for Hello {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HELLO htime={} willingness={}", self.htime, self.willingness)?;
        for link in &self.link_messages {
            write!(
                f,
                " [code={} {:?}]",
                link.link_code, link.neighbor_interface_addresses
            )?;
        }
        Ok(())
    }
}
