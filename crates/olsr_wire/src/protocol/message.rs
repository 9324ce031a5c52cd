//! # Message Header
//!
//! Common header in front of every OLSR message.
//!
//! ```text
//! ┌──────────┬───────────┬──────────────────────┐
//! │ Type (1) │ Vtime (1) │ Message Size (2)     │
//! ├──────────┴───────────┴──────────────────────┤
//! │ Originator Address (4)                      │
//! ├──────────┬───────────┬──────────────────────┤
//! │ TTL (1)  │ Hops (1)  │ Sequence Number (2)  │
//! ├──────────┴───────────┴──────────────────────┤
//! │ Payload (Message Size - 12)                 │
//! └─────────────────────────────────────────────┘
//! ```

use std::fmt;
use std::net::Ipv4Addr;

use bytemuck::{bytes_of, Pod, Zeroable};
use bytes::{Buf, BufMut, Bytes, BytesMut};

use super::payload::{MessageType, Payload};
use super::WireFormat;
use crate::buffer::read_pod;
use crate::error::{WireError, WireResult};
use crate::time::Quantum;

/// Fixed 12-byte prefix as it sits on the wire.
#[derive(Clone, Copy, Debug, Default, Pod, Zeroable)]
#[repr(C)]
struct RawMessagePrefix {
    message_type: u8,
    vtime: u8,
    message_size: [u8; 2],
    originator: [u8; 4],
    time_to_live: u8,
    hop_count: u8,
    sequence: [u8; 2],
}

/// An OLSR message: common header plus typed payload.
///
/// The message type and size are derived from the payload, so they can
/// never disagree with it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageHeader {
    /// Validity time of the information carried.
    pub vtime: Quantum,
    /// Main address of the node that generated the message.
    pub originator_address: Ipv4Addr,
    /// Remaining hops the message may travel.
    pub time_to_live: u8,
    /// Hops travelled so far.
    pub hop_count: u8,
    /// Originator's message sequence number.
    pub message_sequence_number: u16,
    /// Typed body.
    pub payload: Payload,
}

impl MessageHeader {
    /// Size of the fixed prefix.
    pub const PREFIX_SIZE: usize = 12;

    /// Creates a message with zeroed header fields.
    #[must_use]
    pub fn new(payload: impl Into<Payload>) -> Self {
        Self {
            vtime: Quantum::MIN,
            originator_address: Ipv4Addr::UNSPECIFIED,
            time_to_live: 0,
            hop_count: 0,
            message_sequence_number: 0,
            payload: payload.into(),
        }
    }

    /// Type tag of the payload.
    #[inline]
    #[must_use]
    pub const fn message_type(&self) -> MessageType {
        self.payload.message_type()
    }

    /// Value of the message size field: prefix plus payload.
    #[inline]
    #[must_use]
    pub fn message_size(&self) -> usize {
        Self::PREFIX_SIZE + self.payload.serialized_size()
    }

    /// Validity time in seconds.
    #[must_use]
    pub fn vtime_seconds(&self) -> f64 {
        self.vtime.as_seconds()
    }

    /// Sets the validity time.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::QuantizationRange`] if `seconds` is not representable.
    pub fn set_vtime_seconds(&mut self, seconds: f64) -> WireResult<()> {
        self.vtime = Quantum::from_seconds(seconds)?;
        Ok(())
    }

    /// Decodes one message, reporting how many bytes inside the declared
    /// size the payload codec left unclaimed.
    ///
    /// Exactly the declared message size is consumed from `buf`, including
    /// when the type is unknown.
    ///
    /// # Errors
    ///
    /// - [`WireError::Truncated`] if the prefix or the declared body is cut off
    /// - [`WireError::SizeMismatch`] if the size is below the prefix size, or
    ///   residue is found with `strict_residue`
    /// - [`WireError::UnknownMessageType`] for an unrecognized tag
    pub fn decode_checked(buf: &mut Bytes, strict_residue: bool) -> WireResult<(Self, usize)> {
        let raw: RawMessagePrefix = read_pod(buf)?;
        let size = u16::from_be_bytes(raw.message_size);
        let declared = usize::from(size);

        if declared < Self::PREFIX_SIZE {
            return Err(WireError::SizeMismatch {
                field: "message size",
                declared,
                actual: Self::PREFIX_SIZE,
            });
        }
        let body_len = declared - Self::PREFIX_SIZE;
        if body_len > buf.remaining() {
            return Err(WireError::Truncated {
                needed: body_len,
                available: buf.remaining(),
            });
        }
        let mut body = buf.split_to(body_len);

        let Some(message_type) = MessageType::from_u8(raw.message_type) else {
            return Err(WireError::UnknownMessageType {
                tag: raw.message_type,
                size,
            });
        };
        let payload = Payload::decode(message_type, &mut body)?;

        let residue = body.remaining();
        if residue > 0 {
            if strict_residue {
                return Err(WireError::SizeMismatch {
                    field: "message size",
                    declared,
                    actual: declared - residue,
                });
            }
            tracing::debug!(%message_type, residue, "skipping unclaimed message bytes");
        }

        tracing::trace!(%message_type, size, "decoded message");
        let message = Self {
            vtime: Quantum(raw.vtime),
            originator_address: Ipv4Addr::from(raw.originator),
            time_to_live: raw.time_to_live,
            hop_count: raw.hop_count,
            message_sequence_number: u16::from_be_bytes(raw.sequence),
            payload,
        };
        Ok((message, residue))
    }
}

impl WireFormat for MessageHeader {
    fn serialized_size(&self) -> usize {
        self.message_size()
    }

    fn encode(&self, buf: &mut BytesMut) -> WireResult<()> {
        let size = self.message_size();
        let message_size = u16::try_from(size).map_err(|_| WireError::Oversized {
            field: "message",
            size,
            limit: usize::from(u16::MAX),
        })?;

        let raw = RawMessagePrefix {
            message_type: self.message_type() as u8,
            vtime: self.vtime.to_byte(),
            message_size: message_size.to_be_bytes(),
            originator: self.originator_address.octets(),
            time_to_live: self.time_to_live,
            hop_count: self.hop_count,
            sequence: self.message_sequence_number.to_be_bytes(),
        };

        let start = buf.len();
        buf.reserve(size);
        buf.put_slice(bytes_of(&raw));
        self.payload.encode(buf)?;

        let written = buf.len() - start;
        if written != size {
            return Err(WireError::SizeMismatch {
                field: "message size",
                declared: size,
                actual: written,
            });
        }
        Ok(())
    }

    fn decode(buf: &mut Bytes) -> WireResult<Self> {
        Self::decode_checked(buf, false).map(|(message, _)| message)
    }
}

impl fmt::Display for MessageHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} from {} seq={} ttl={} hops={} vtime={} size={}: {}",
            self.message_type(),
            self.originator_address,
            self.message_sequence_number,
            self.time_to_live,
            self.hop_count,
            self.vtime,
            self.message_size(),
            self.payload
        )
    }
}
