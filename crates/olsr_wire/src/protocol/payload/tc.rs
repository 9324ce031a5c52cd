//! TC - Topology Control.
//!
//! ```text
//! ┌───────────────┬──────────────┐
//! │ ANSN (2)      │ Reserved (2) │
//! ├───────────────┴──────────────┤
//! │ Advertised Neighbor (4)      │  repeated
//! └──────────────────────────────┘
//! ```

use std::fmt;
use std::net::Ipv4Addr;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::buffer::{decode_addresses, ensure_remaining, BufMutExt, IPV4_LEN};
use crate::error::WireResult;

/// Link-state advertisement of a node's advertised neighbor set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tc {
    /// Advertised neighbor sequence number.
    pub ansn: u16,
    /// Advertised neighbors, in wire order.
    pub neighbor_addresses: Vec<Ipv4Addr>,
}

impl Tc {
    /// Fixed part before the address list.
    pub const HEAD_SIZE: usize = 4;

    /// Creates a TC payload.
    #[must_use]
    pub fn new(ansn: u16, neighbor_addresses: Vec<Ipv4Addr>) -> Self {
        Self {
            ansn,
            neighbor_addresses,
        }
    }

    /// Bytes on the wire.
    #[inline]
    #[must_use]
    pub fn serialized_size(&self) -> usize {
        Self::HEAD_SIZE + self.neighbor_addresses.len() * IPV4_LEN
    }

    /// Appends the payload to `buf`.
    pub fn encode(&self, buf: &mut BytesMut) {
        buf.put_u16(self.ansn);
        buf.put_u16(0);
        for addr in &self.neighbor_addresses {
            buf.put_ipv4(addr);
        }
    }

    /// Decodes a payload filling `buf`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::WireError::Truncated`] if the fixed head is missing.
    pub fn decode_body(buf: &mut Bytes) -> WireResult<Self> {
        ensure_remaining(buf, Self::HEAD_SIZE)?;
        let ansn = buf.get_u16();
        let _reserved = buf.get_u16();
        Ok(Self {
            ansn,
            neighbor_addresses: decode_addresses(buf),
        })
    }
}

impl fmt::Display for Tc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TC ansn={} neighbors={:?}", self.ansn, self.neighbor_addresses)
    }
}
