//! # Message Payloads
//!
//! The four OLSR message bodies. Each codec works on a buffer that has
//! already been cut to the message's declared payload length, so list
//! lengths are inferred from what remains.

mod hello;
mod hna;
mod mid;
mod tc;

use std::fmt;

use bytes::{Bytes, BytesMut};

pub use hello::{Hello, LinkMessage, LinkType, NeighborType};
pub use hna::{Association, Hna};
pub use mid::Mid;
pub use tc::Tc;

use crate::error::WireResult;

/// Message type tags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MessageType {
    /// Neighbor discovery.
    Hello = 1,
    /// Topology control.
    Tc = 2,
    /// Multiple interface declaration.
    Mid = 3,
    /// Host and network association.
    Hna = 4,
}

impl MessageType {
    /// Maps a wire tag to a known type.
    #[inline]
    #[must_use]
    pub const fn from_u8(tag: u8) -> Option<Self> {
        match tag {
            1 => Some(Self::Hello),
            2 => Some(Self::Tc),
            3 => Some(Self::Mid),
            4 => Some(Self::Hna),
            _ => None,
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Hello => "HELLO",
            Self::Tc => "TC",
            Self::Mid => "MID",
            Self::Hna => "HNA",
        };
        f.write_str(name)
    }
}

/// Message body, one variant per message type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Payload {
    /// MID body.
    Mid(Mid),
    /// HELLO body.
    Hello(Hello),
    /// TC body.
    Tc(Tc),
    /// HNA body.
    Hna(Hna),
}

impl Payload {
    /// Type tag matching this variant.
    #[must_use]
    pub const fn message_type(&self) -> MessageType {
        match self {
            Self::Mid(_) => MessageType::Mid,
            Self::Hello(_) => MessageType::Hello,
            Self::Tc(_) => MessageType::Tc,
            Self::Hna(_) => MessageType::Hna,
        }
    }

    /// Bytes on the wire.
    #[must_use]
    pub fn serialized_size(&self) -> usize {
        match self {
            Self::Mid(mid) => mid.serialized_size(),
            Self::Hello(hello) => hello.serialized_size(),
            Self::Tc(tc) => tc.serialized_size(),
            Self::Hna(hna) => hna.serialized_size(),
        }
    }

    /// Appends the body to `buf`.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::WireError::Oversized`] from HELLO link messages.
    pub fn encode(&self, buf: &mut BytesMut) -> WireResult<()> {
        match self {
            Self::Mid(mid) => mid.encode(buf),
            Self::Hello(hello) => hello.encode(buf)?,
            Self::Tc(tc) => tc.encode(buf),
            Self::Hna(hna) => hna.encode(buf),
        }
        Ok(())
    }

    /// Decodes the body of a message of type `message_type`.
    ///
    /// Bytes the body codec does not claim are left in `buf`.
    ///
    /// # Errors
    ///
    /// Propagates errors from the HELLO and TC codecs.
    pub fn decode(message_type: MessageType, buf: &mut Bytes) -> WireResult<Self> {
        Ok(match message_type {
            MessageType::Mid => Self::Mid(Mid::decode_body(buf)),
            MessageType::Hello => Self::Hello(Hello::decode_body(buf)?),
            MessageType::Tc => Self::Tc(Tc::decode_body(buf)?),
            MessageType::Hna => Self::Hna(Hna::decode_body(buf)),
        })
    }

    /// MID view.
    #[must_use]
    pub const fn as_mid(&self) -> Option<&Mid> {
        match self {
            Self::Mid(mid) => Some(mid),
            _ => None,
        }
    }

    /// HELLO view.
    #[must_use]
    pub const fn as_hello(&self) -> Option<&Hello> {
        match self {
            Self::Hello(hello) => Some(hello),
            _ => None,
        }
    }

    /// TC view.
    #[must_use]
    pub const fn as_tc(&self) -> Option<&Tc> {
        match self {
            Self::Tc(tc) => Some(tc),
            _ => None,
        }
    }

    /// HNA view.
    #[must_use]
    pub const fn as_hna(&self) -> Option<&Hna> {
        match self {
            Self::Hna(hna) => Some(hna),
            _ => None,
        }
    }
}

impl From<Mid> for Payload {
    fn from(value: Mid) -> Self {
        Self::Mid(value)
    }
}

impl From<Hello> for Payload {
    fn from(value: Hello) -> Self {
        Self::Hello(value)
    }
}

impl From<Tc> for Payload {
    fn from(value: Tc) -> Self {
        Self::Tc(value)
    }
}

impl From<Hna> for Payload {
    fn from(value: Hna) -> Self {
        Self::Hna(value)
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mid(mid) => fmt::Display::fmt(mid, f),
            Self::Hello(hello) => fmt::Display::fmt(hello, f),
            Self::Tc(tc) => fmt::Display::fmt(tc, f),
            Self::Hna(hna) => fmt::Display::fmt(hna, f),
        }
    }
}
