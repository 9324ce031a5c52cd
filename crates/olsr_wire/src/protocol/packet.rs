//! # Packet Header
//!
//! Outermost envelope. One header, then messages until the declared
//! packet length is used up.

use std::fmt;

use bytemuck::{bytes_of, Pod, Zeroable};
use bytes::{BufMut, Bytes, BytesMut};

use super::codec::PacketDecoder;
use super::message::MessageHeader;
use super::WireFormat;
use crate::buffer::read_pod;
use crate::config::CodecConfig;
use crate::error::{WireError, WireResult};

/// Fixed 4-byte header as it sits on the wire.
#[derive(Clone, Copy, Debug, Default, Pod, Zeroable)]
#[repr(C)]
struct RawPacketHeader {
    length: [u8; 2],
    sequence: [u8; 2],
}

/// Packet header - present in every packet.
///
/// Total size: 4 bytes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PacketHeader {
    /// Bytes in the packet, this header included.
    pub packet_length: u16,
    /// Per-interface packet sequence number.
    pub packet_sequence_number: u16,
}

impl PacketHeader {
    /// Size of the header in bytes.
    pub const SIZE: usize = 4;

    /// Creates a packet header.
    #[inline]
    #[must_use]
    pub const fn new(packet_length: u16, packet_sequence_number: u16) -> Self {
        Self {
            packet_length,
            packet_sequence_number,
        }
    }

    /// Creates the header for a packet carrying `messages`.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::Oversized`] if the packet would not fit the length field.
    pub fn for_messages(
        packet_sequence_number: u16,
        messages: &[MessageHeader],
    ) -> WireResult<Self> {
        let size = Self::SIZE + messages.iter().map(MessageHeader::message_size).sum::<usize>();
        let packet_length = u16::try_from(size).map_err(|_| WireError::Oversized {
            field: "packet",
            size,
            limit: usize::from(u16::MAX),
        })?;
        Ok(Self::new(packet_length, packet_sequence_number))
    }

    /// Bytes of messages following the header.
    #[inline]
    #[must_use]
    pub const fn body_length(&self) -> usize {
        (self.packet_length as usize).saturating_sub(Self::SIZE)
    }
}

impl WireFormat for PacketHeader {
    fn serialized_size(&self) -> usize {
        Self::SIZE
    }

    fn encode(&self, buf: &mut BytesMut) -> WireResult<()> {
        let raw = RawPacketHeader {
            length: self.packet_length.to_be_bytes(),
            sequence: self.packet_sequence_number.to_be_bytes(),
        };
        buf.put_slice(bytes_of(&raw));
        Ok(())
    }

    fn decode(buf: &mut Bytes) -> WireResult<Self> {
        let raw: RawPacketHeader = read_pod(buf)?;
        Ok(Self::new(
            u16::from_be_bytes(raw.length),
            u16::from_be_bytes(raw.sequence),
        ))
    }
}

impl fmt::Display for PacketHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "OLSR packet seq={} length={}",
            self.packet_sequence_number, self.packet_length
        )
    }
}

/// A packet header together with the messages it carries.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Packet {
    /// Envelope.
    pub header: PacketHeader,
    /// Messages, in wire order.
    pub messages: Vec<MessageHeader>,
}

impl Packet {
    /// Builds a packet, computing its length from the messages.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::Oversized`] if the messages exceed the length field.
    pub fn new(packet_sequence_number: u16, messages: Vec<MessageHeader>) -> WireResult<Self> {
        let header = PacketHeader::for_messages(packet_sequence_number, &messages)?;
        Ok(Self { header, messages })
    }

    /// Packet length implied by the messages.
    #[must_use]
    pub fn computed_length(&self) -> usize {
        PacketHeader::SIZE
            + self
                .messages
                .iter()
                .map(MessageHeader::message_size)
                .sum::<usize>()
    }
}

impl WireFormat for Packet {
    fn serialized_size(&self) -> usize {
        self.computed_length()
    }

    /// Writes the header as stored; fails if it disagrees with the messages.
    fn encode(&self, buf: &mut BytesMut) -> WireResult<()> {
        let actual = self.computed_length();
        let declared = usize::from(self.header.packet_length);
        if declared != actual {
            return Err(WireError::SizeMismatch {
                field: "packet length",
                declared,
                actual,
            });
        }
        buf.reserve(actual);
        self.header.encode(buf)?;
        for message in &self.messages {
            message.encode(buf)?;
        }
        Ok(())
    }

    /// Accepts any length the header field can hold.
    fn decode(buf: &mut Bytes) -> WireResult<Self> {
        let config = CodecConfig {
            max_packet_length: u16::MAX,
            ..CodecConfig::default()
        };
        PacketDecoder::new(config)?.decode(buf)
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} messages={}", self.header, self.messages.len())?;
        for message in &self.messages {
            write!(f, "\n  {message}")?;
        }
        Ok(())
    }
}
