//! # Packet Codec
//!
//! Whole-packet encode and decode on top of the header codecs.
//!
//! ## Design
//!
//! - The encoder reuses one scratch buffer across packets
//! - The packet length is always recomputed from the messages on encode
//! - Unknown messages are skipped or rejected per [`CodecConfig`]

use bytes::{Buf, Bytes, BytesMut};

use super::message::MessageHeader;
use super::packet::{Packet, PacketHeader};
use super::WireFormat;
use crate::config::{CodecConfig, UnknownMessagePolicy};
use crate::error::{WireError, WireResult};

/// Packet encoder - writes packets into a reusable buffer.
#[derive(Debug, Default)]
pub struct PacketEncoder {
    config: CodecConfig,
    buffer: BytesMut,
}

impl PacketEncoder {
    /// Creates an encoder.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::InvalidConfig`] if `config` fails
    /// [`CodecConfig::validate`].
    pub fn new(config: CodecConfig) -> WireResult<Self> {
        config.validate()?;
        Ok(Self {
            buffer: BytesMut::with_capacity(usize::from(config.max_packet_length)),
            config,
        })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Encodes a packet. The stored packet length is ignored and rewritten.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::Oversized`] if the packet exceeds
    /// `max_packet_length`, or any message encoding error.
    pub fn encode(&mut self, packet: &Packet) -> WireResult<Bytes> {
        self.encode_messages(packet.header.packet_sequence_number, &packet.messages)
    }

    /// Encodes `messages` behind a fresh packet header.
    ///
    /// # Errors
    ///
    /// Same as [`PacketEncoder::encode`].
    pub fn encode_messages(
        &mut self,
        packet_sequence_number: u16,
        messages: &[MessageHeader],
    ) -> WireResult<Bytes> {
        let header = PacketHeader::for_messages(packet_sequence_number, messages)?;
        let limit = usize::from(self.config.max_packet_length);
        let size = usize::from(header.packet_length);
        if size > limit {
            return Err(WireError::Oversized {
                field: "packet",
                size,
                limit,
            });
        }

        self.buffer.clear();
        self.buffer.reserve(size);
        let written = Self::write(&mut self.buffer, &header, messages);
        if let Err(e) = written {
            self.buffer.clear();
            return Err(e);
        }

        tracing::trace!(
            seq = packet_sequence_number,
            size,
            messages = messages.len(),
            "encoded packet"
        );
        Ok(self.buffer.split().freeze())
    }

    fn write(
        buf: &mut BytesMut,
        header: &PacketHeader,
        messages: &[MessageHeader],
    ) -> WireResult<()> {
        header.encode(buf)?;
        for message in messages {
            message.encode(buf)?;
        }
        Ok(())
    }
}

/// Decoder statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecodeStats {
    /// Packets decoded successfully.
    pub packets: u64,
    /// Messages decoded.
    pub messages: u64,
    /// Unknown messages skipped.
    pub skipped_messages: u64,
    /// Bytes inside messages left unclaimed by their payload codec.
    pub residue_bytes: u64,
    /// Packets aborted with an error.
    pub rejected_packets: u64,
}

/// Packet decoder - reads whole packets from the front of a buffer.
#[derive(Debug, Default)]
pub struct PacketDecoder {
    config: CodecConfig,
    stats: DecodeStats,
}

impl PacketDecoder {
    /// Creates a decoder.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::InvalidConfig`] if `config` fails
    /// [`CodecConfig::validate`].
    pub fn new(config: CodecConfig) -> WireResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            stats: DecodeStats::default(),
        })
    }

    /// Counters since creation.
    #[must_use]
    pub const fn stats(&self) -> DecodeStats {
        self.stats
    }

    /// Decodes one packet, consuming exactly its declared length.
    ///
    /// When unknown messages are skipped, the returned header still holds
    /// the declared length, which then exceeds
    /// [`Packet::computed_length`].
    ///
    /// # Errors
    ///
    /// - [`WireError::Truncated`] if the header or the declared body is cut off
    /// - [`WireError::SizeMismatch`] if the packet length is below the header size
    /// - [`WireError::Oversized`] if the packet length exceeds `max_packet_length`
    /// - [`WireError::UnknownMessageType`] under [`UnknownMessagePolicy::Reject`]
    /// - any message decoding error
    pub fn decode(&mut self, buf: &mut Bytes) -> WireResult<Packet> {
        let result = self.decode_inner(buf);
        match &result {
            Ok(packet) => {
                self.stats.packets += 1;
                self.stats.messages += packet.messages.len() as u64;
            }
            Err(e) => {
                self.stats.rejected_packets += 1;
                tracing::warn!(error = %e, "aborting packet");
            }
        }
        result
    }

    fn decode_inner(&mut self, buf: &mut Bytes) -> WireResult<Packet> {
        let header = PacketHeader::decode(buf)?;
        let declared = usize::from(header.packet_length);
        if declared < PacketHeader::SIZE {
            return Err(WireError::SizeMismatch {
                field: "packet length",
                declared,
                actual: PacketHeader::SIZE,
            });
        }
        let limit = usize::from(self.config.max_packet_length);
        if declared > limit {
            return Err(WireError::Oversized {
                field: "packet",
                size: declared,
                limit,
            });
        }
        let body_len = header.body_length();
        if body_len > buf.remaining() {
            return Err(WireError::Truncated {
                needed: body_len,
                available: buf.remaining(),
            });
        }

        let mut body = buf.split_to(body_len);
        let mut messages = Vec::new();
        while body.has_remaining() {
            match MessageHeader::decode_checked(&mut body, self.config.strict_residue) {
                Ok((message, residue)) => {
                    self.stats.residue_bytes += residue as u64;
                    messages.push(message);
                }
                Err(WireError::UnknownMessageType { tag, size })
                    if self.config.unknown_messages == UnknownMessagePolicy::Skip =>
                {
                    self.stats.skipped_messages += 1;
                    tracing::debug!(tag, size, "skipping unknown message");
                }
                Err(e) => return Err(e),
            }
        }

        tracing::trace!(
            seq = header.packet_sequence_number,
            length = declared,
            messages = messages.len(),
            "decoded packet"
        );
        Ok(Packet { header, messages })
    }
}

/// Encodes a packet with the default configuration.
///
/// # Errors
///
/// See [`PacketEncoder::encode`].
pub fn encode_packet(packet: &Packet) -> WireResult<Bytes> {
    PacketEncoder::default().encode(packet)
}

/// Decodes a packet from the front of `buf` with the default configuration.
///
/// # Errors
///
/// See [`PacketDecoder::decode`].
pub fn decode_packet(buf: &mut Bytes) -> WireResult<Packet> {
    PacketDecoder::default().decode(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Mid;
    use bytes::BufMut;
    use std::net::Ipv4Addr;

    fn mid(last: u8) -> MessageHeader {
        let mut msg = MessageHeader::new(Mid::new(vec![Ipv4Addr::new(10, 1, 1, last)]));
        msg.originator_address = Ipv4Addr::new(10, 1, 1, 1);
        msg.time_to_live = 64;
        msg
    }

    /// Packet of [MID, unknown type 200, MID].
    fn packet_with_unknown() -> Bytes {
        let mut out = BytesMut::new();
        PacketHeader::new(4 + 16 + 14 + 16, 9).encode(&mut out).unwrap();
        mid(4).encode(&mut out).unwrap();
        out.put_slice(&[200, 0, 0, 14, 10, 0, 0, 9, 1, 0, 0, 1, 0xAB, 0xCD]);
        mid(5).encode(&mut out).unwrap();
        out.freeze()
    }

    #[test]
    fn test_encoder_rewrites_length() {
        let mut packet = Packet::new(1, vec![mid(4)]).unwrap();
        packet.messages.push(mid(5));

        let mut encoder = PacketEncoder::default();
        let bytes = encoder.encode(&packet).unwrap();
        assert_eq!(bytes.len(), 4 + 2 * 16);
        assert_eq!(&bytes[..2], &[0, 36]);
    }

    #[test]
    fn test_encoder_reuse() {
        let mut encoder = PacketEncoder::default();
        let first = encoder.encode_messages(1, &[mid(4)]).unwrap();
        let second = encoder.encode_messages(2, &[mid(5), mid(6)]).unwrap();
        assert_eq!(first.len(), 20);
        assert_eq!(second.len(), 36);
        assert_eq!(&second[2..4], &[0, 2]);
    }

    #[test]
    fn test_encoder_limit() {
        let config = CodecConfig {
            max_packet_length: 24,
            ..CodecConfig::default()
        };
        let mut encoder = PacketEncoder::new(config).unwrap();
        assert!(encoder.encode_messages(1, &[mid(4)]).is_ok());
        assert!(matches!(
            encoder.encode_messages(1, &[mid(4), mid(5)]),
            Err(WireError::Oversized { size: 36, limit: 24, .. })
        ));
    }

    #[test]
    fn test_skip_unknown_message() {
        let mut buf = packet_with_unknown();
        let mut decoder = PacketDecoder::default();
        let packet = decoder.decode(&mut buf).unwrap();

        assert!(buf.is_empty());
        assert_eq!(packet.messages, vec![mid(4), mid(5)]);
        let stats = decoder.stats();
        assert_eq!(stats.packets, 1);
        assert_eq!(stats.messages, 2);
        assert_eq!(stats.skipped_messages, 1);
    }

    #[test]
    fn test_reject_unknown_message() {
        let config = CodecConfig {
            unknown_messages: UnknownMessagePolicy::Reject,
            ..CodecConfig::default()
        };
        let mut decoder = PacketDecoder::new(config).unwrap();
        let mut buf = packet_with_unknown();
        assert_eq!(
            decoder.decode(&mut buf),
            Err(WireError::UnknownMessageType { tag: 200, size: 14 })
        );
        assert_eq!(decoder.stats().rejected_packets, 1);
    }

    #[test]
    fn test_packet_length_below_header() {
        let mut buf = Bytes::from_static(&[0, 2, 0, 1]);
        assert!(matches!(
            decode_packet(&mut buf),
            Err(WireError::SizeMismatch { field: "packet length", declared: 2, .. })
        ));
    }

    #[test]
    fn test_packet_body_truncated() {
        let bytes = encode_packet(&Packet::new(1, vec![mid(4)]).unwrap()).unwrap();
        let mut buf = bytes.slice(..bytes.len() - 3);
        assert!(matches!(
            decode_packet(&mut buf),
            Err(WireError::Truncated { needed: 16, available: 13 })
        ));
    }

    #[test]
    fn test_packet_over_limit() {
        let config = CodecConfig {
            max_packet_length: 16,
            ..CodecConfig::default()
        };
        let bytes = encode_packet(&Packet::new(1, vec![mid(4)]).unwrap()).unwrap();
        let mut buf = bytes.clone();
        assert!(matches!(
            PacketDecoder::new(config).unwrap().decode(&mut buf),
            Err(WireError::Oversized { size: 20, limit: 16, .. })
        ));
    }

    #[test]
    fn test_message_past_packet_end_aborts() {
        // TC declares 20 bytes but the packet only holds 16 of body
        let mut out = BytesMut::new();
        PacketHeader::new(20, 1).encode(&mut out).unwrap();
        out.put_slice(&[2, 0, 0, 20, 10, 0, 0, 1, 1, 0, 0, 1, 0, 7, 0, 0]);
        out.put_slice(&[10, 1, 1, 4]);
        let mut buf = out.freeze();

        let err = decode_packet(&mut buf).unwrap_err();
        assert!(matches!(err, WireError::Truncated { .. }));
    }

    #[test]
    fn test_consecutive_packets() {
        let mut out = BytesMut::new();
        out.extend_from_slice(&encode_packet(&Packet::new(1, vec![mid(4)]).unwrap()).unwrap());
        out.extend_from_slice(&encode_packet(&Packet::new(2, vec![mid(5)]).unwrap()).unwrap());
        let mut buf = out.freeze();

        let mut decoder = PacketDecoder::default();
        assert_eq!(decoder.decode(&mut buf).unwrap().header.packet_sequence_number, 1);
        assert_eq!(decoder.decode(&mut buf).unwrap().header.packet_sequence_number, 2);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_constructors_validate_config() {
        let config = CodecConfig {
            max_packet_length: 0,
            ..CodecConfig::default()
        };
        assert!(matches!(
            PacketEncoder::new(config.clone()),
            Err(WireError::InvalidConfig(_))
        ));
        assert!(matches!(
            PacketDecoder::new(config),
            Err(WireError::InvalidConfig(_))
        ));
    }

    /// Packet of [HELLO with two stray trailing bytes, MID].
    fn packet_with_hello_residue() -> Bytes {
        let mut out = BytesMut::new();
        PacketHeader::new(4 + 22 + 16, 3).encode(&mut out).unwrap();
        out.put_slice(&[1, 0, 0, 22, 10, 1, 1, 1, 64, 0, 0, 1]);
        out.put_slice(&[0, 0, 0x50, 3, 6, 0, 0, 4, 0xAB, 0xCD]);
        mid(4).encode(&mut out).unwrap();
        out.freeze()
    }

    #[test]
    fn test_hello_residue_skipped() {
        let mut buf = packet_with_hello_residue();
        let mut decoder = PacketDecoder::default();
        let packet = decoder.decode(&mut buf).unwrap();

        assert!(buf.is_empty());
        assert_eq!(packet.messages.len(), 2);
        let hello = packet.messages[0].payload.as_hello().unwrap();
        assert_eq!(hello.link_messages.len(), 1);
        assert_eq!(packet.messages[1], mid(4));
        assert_eq!(decoder.stats().residue_bytes, 2);
    }

    #[test]
    fn test_hello_residue_strict() {
        let config = CodecConfig {
            strict_residue: true,
            ..CodecConfig::default()
        };
        let mut buf = packet_with_hello_residue();
        assert!(matches!(
            PacketDecoder::new(config).unwrap().decode(&mut buf),
            Err(WireError::SizeMismatch { field: "message size", declared: 22, actual: 20 })
        ));
    }
}
