//! # OLSR Wire - Control Message Codec
//!
//! Binary encoding of Optimized Link State Routing (RFC 3626) control
//! traffic.
//!
//! ## Architecture
//!
//! - **Time**: mantissa/exponent quantization of intervals into one byte
//! - **Payloads**: MID, HELLO, TC and HNA message bodies
//! - **Message Header**: common 12-byte header, dispatch on the type tag
//! - **Packet Header**: 4-byte envelope around one or more messages
//! - **Codec**: whole-packet encoder/decoder with an unknown-message policy
//!
//! ## Guarantees
//!
//! - Network byte order for every multi-byte field
//! - Decoding consumes exactly one structure from the front of the buffer
//! - No global state, no I/O
//!
//! ## Example
//!
//! ```rust
//! use std::net::Ipv4Addr;
//! use olsr_wire::{decode_packet, encode_packet, MessageHeader, Mid, Packet};
//!
//! let mut msg = MessageHeader::new(Mid::new(vec![Ipv4Addr::new(10, 1, 1, 4)]));
//! msg.set_vtime_seconds(9.0)?;
//! msg.originator_address = Ipv4Addr::new(10, 1, 1, 44);
//! msg.time_to_live = 255;
//!
//! let packet = Packet::new(123, vec![msg])?;
//! let mut bytes = encode_packet(&packet)?;
//! let decoded = decode_packet(&mut bytes)?;
//!
//! assert_eq!(decoded, packet);
//! assert!(bytes.is_empty());
//! # Ok::<(), olsr_wire::WireError>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod buffer;
pub mod config;
pub mod error;
pub mod protocol;
pub mod time;

// Re-exports for convenience
pub use config::{CodecConfig, UnknownMessagePolicy};
pub use error::{WireError, WireResult};
pub use protocol::{
    decode_from_slice, decode_packet, encode_packet, Association, DecodeStats, Hello, Hna,
    LinkMessage, LinkType, MessageHeader, MessageType, Mid, NeighborType, Packet, PacketDecoder,
    PacketEncoder, PacketHeader, Payload, Tc, WireFormat,
};
pub use time::{quantum_to_seconds, seconds_to_quantum, Quantum};

/// Default OLSR UDP port (RFC 3626 section 3.1).
pub const OLSR_PORT: u16 = 698;
