//! HNA - Host and Network Association.
//!
//! ```text
//! ┌──────────────────────────────┐
//! │ Network Address (4)          │  repeated
//! │ Netmask (4)                  │
//! └──────────────────────────────┘
//! ```

use std::fmt;
use std::net::Ipv4Addr;

use bytes::{Bytes, BytesMut};

use crate::buffer::{decode_records, BufExt, BufMutExt, IPV4_LEN};

/// One reachable external network.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Association {
    /// Network address.
    pub address: Ipv4Addr,
    /// Network mask.
    pub mask: Ipv4Addr,
}

impl Association {
    /// Size in bytes.
    pub const SIZE: usize = 2 * IPV4_LEN;

    /// Creates an association.
    #[inline]
    #[must_use]
    pub const fn new(address: Ipv4Addr, mask: Ipv4Addr) -> Self {
        Self { address, mask }
    }

    /// Creates an association from a prefix length.
    ///
    /// Lengths above 32 are treated as 32.
    #[must_use]
    pub fn with_prefix(address: Ipv4Addr, prefix_len: u8) -> Self {
        let bits = match prefix_len.min(32) {
            0 => 0,
            n => u32::MAX << (32 - u32::from(n)),
        };
        Self::new(address, Ipv4Addr::from(bits))
    }

    /// Number of leading one bits in the mask.
    #[inline]
    #[must_use]
    pub fn prefix_len(&self) -> u32 {
        u32::from(self.mask).leading_ones()
    }
}

/// Networks reachable through the originator.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Hna {
    /// Associations, in wire order.
    pub associations: Vec<Association>,
}

impl Hna {
    /// Creates an HNA payload.
    #[must_use]
    pub fn new(associations: Vec<Association>) -> Self {
        Self { associations }
    }

    /// Bytes on the wire.
    #[inline]
    #[must_use]
    pub fn serialized_size(&self) -> usize {
        self.associations.len() * Association::SIZE
    }

    /// Appends the payload to `buf`.
    pub fn encode(&self, buf: &mut BytesMut) {
        for assoc in &self.associations {
            buf.put_ipv4(&assoc.address);
            buf.put_ipv4(&assoc.mask);
        }
    }

    /// Decodes a payload filling `buf`.
    ///
    /// A trailing partial association is left in `buf`.
    #[must_use]
    pub fn decode_body(buf: &mut Bytes) -> Self {
        let associations = decode_records(buf, Association::SIZE, |b| {
            let address = b.get_ipv4();
            let mask = b.get_ipv4();
            Association::new(address, mask)
        });
        Self { associations }
    }
}

impl fmt::Display for Hna {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HNA")?;
        for assoc in &self.associations {
            write!(f, " {}/{}", assoc.address, assoc.prefix_len())?;
        }
        Ok(())
    }
}
