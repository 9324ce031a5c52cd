//! # OLSR Protocol
//!
//! Packet and message header definitions (RFC 3626 section 3).
//!
//! ## Packet Structure
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ Packet Length (2) │ Packet Sequence Number (2)               │
//! ├──────────────────────────────────────────────────────────────┤
//! │ Message Header (12) + MID / HELLO / TC / HNA payload         │
//! ├──────────────────────────────────────────────────────────────┤
//! │ Message Header (12) + payload                                │
//! ├──────────────────────────────────────────────────────────────┤
//! │ ...                                                          │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Philosophy
//!
//! - Lengths are computed before anything is written
//! - Decoding removes exactly one structure from the front of the buffer
//! - Lists carry no count: the enclosing length decides

mod codec;
mod message;
mod packet;
mod payload;

use bytes::{Bytes, BytesMut};

pub use codec::{decode_packet, encode_packet, DecodeStats, PacketDecoder, PacketEncoder};
pub use message::MessageHeader;
pub use packet::{Packet, PacketHeader};
pub use payload::{
    Association, Hello, Hna, LinkMessage, LinkType, MessageType, Mid, NeighborType, Payload, Tc,
};

use crate::error::WireResult;

/// A structure with a binary wire form.
pub trait WireFormat: Sized {
    /// Bytes [`WireFormat::encode`] will append.
    fn serialized_size(&self) -> usize;

    /// Appends the wire form to `buf`.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::WireError`] if a length field would overflow or
    /// disagree with the data.
    fn encode(&self, buf: &mut BytesMut) -> WireResult<()>;

    /// Removes one structure from the front of `buf`.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::WireError`] on truncated or malformed input.
    fn decode(buf: &mut Bytes) -> WireResult<Self>;

    /// Encodes into a fresh buffer.
    ///
    /// # Errors
    ///
    /// Same as [`WireFormat::encode`].
    fn to_bytes(&self) -> WireResult<Bytes> {
        let mut buf = BytesMut::with_capacity(self.serialized_size());
        self.encode(&mut buf)?;
        Ok(buf.freeze())
    }
}

/// Decodes one structure from a slice, returning it with the number of
/// bytes it occupied.
///
/// # Errors
///
/// Same as [`WireFormat::decode`].
pub fn decode_from_slice<T: WireFormat>(data: &[u8]) -> WireResult<(T, usize)> {
    let mut buf = Bytes::copy_from_slice(data);
    let value = T::decode(&mut buf)?;
    Ok((value, data.len() - buf.len()))
}
