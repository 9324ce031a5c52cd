//! MID - Multiple Interface Declaration.
//!
//! ```text
//! ┌──────────────────────────────┐
//! │ Interface Address (4)        │  repeated
//! └──────────────────────────────┘
//! ```

use std::fmt;
use std::net::Ipv4Addr;

use bytes::{Bytes, BytesMut};

use crate::buffer::{decode_addresses, BufMutExt, IPV4_LEN};

/// Interface addresses of a multi-homed node.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Mid {
    /// All interface addresses except the main one, in wire order.
    pub interface_addresses: Vec<Ipv4Addr>,
}

impl Mid {
    /// Creates a MID payload.
    #[must_use]
    pub fn new(interface_addresses: Vec<Ipv4Addr>) -> Self {
        Self { interface_addresses }
    }

    /// Bytes on the wire.
    #[inline]
    #[must_use]
    pub fn serialized_size(&self) -> usize {
        self.interface_addresses.len() * IPV4_LEN
    }

    /// Appends the payload to `buf`.
    pub fn encode(&self, buf: &mut BytesMut) {
        for addr in &self.interface_addresses {
            buf.put_ipv4(addr);
        }
    }

    /// Decodes a payload filling `buf`.
    ///
    /// A trailing partial address is left in `buf`.
    #[must_use]
    pub fn decode_body(buf: &mut Bytes) -> Self {
        Self {
            interface_addresses: decode_addresses(buf),
        }
    }
}

impl fmt::Display for Mid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MID interfaces={:?}", self.interface_addresses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Buf;

    #[test]
    fn test_mid_layout() {
        let mid = Mid::new(vec![Ipv4Addr::new(10, 1, 1, 4), Ipv4Addr::new(10, 1, 1, 5)]);
        let mut out = BytesMut::new();
        mid.encode(&mut out);
        assert_eq!(&out[..], &[10, 1, 1, 4, 10, 1, 1, 5]);
        assert_eq!(mid.serialized_size(), 8);

        let mut buf = out.freeze();
        assert_eq!(Mid::decode_body(&mut buf), mid);
        assert!(!buf.has_remaining());
    }
}
