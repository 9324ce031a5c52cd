//! # Buffer Helpers
//!
//! Shared primitives for every codec in the crate:
//!
//! - Address get/put in network byte order
//! - Fixed-size `Pod` views read from the front of a buffer
//! - Record-count inference for lists without a count prefix

use std::net::Ipv4Addr;

use bytemuck::Pod;
use bytes::{Buf, BufMut, Bytes};

use crate::error::{WireError, WireResult};

/// Size of an IPv4 address on the wire.
pub const IPV4_LEN: usize = 4;

/// Address reads for [`Buf`].
pub trait BufExt: Buf {
    /// Reads a 4-byte address. The caller checks the length first.
    fn get_ipv4(&mut self) -> Ipv4Addr {
        Ipv4Addr::from(self.get_u32())
    }
}

impl<B: Buf + ?Sized> BufExt for B {}

/// Address writes for [`BufMut`].
pub trait BufMutExt: BufMut {
    /// Writes a 4-byte address.
    fn put_ipv4(&mut self, addr: &Ipv4Addr) {
        self.put_slice(&addr.octets());
    }
}

impl<B: BufMut + ?Sized> BufMutExt for B {}

/// Fails with [`WireError::Truncated`] unless `needed` bytes remain.
///
/// # Errors
///
/// See above.
#[inline]
pub fn ensure_remaining(buf: &impl Buf, needed: usize) -> WireResult<()> {
    let available = buf.remaining();
    if available < needed {
        return Err(WireError::Truncated { needed, available });
    }
    Ok(())
}

/// Reads a fixed-size view from the front of `buf`.
///
/// # Errors
///
/// Returns [`WireError::Truncated`] if `buf` is shorter than `T`.
pub fn read_pod<T: Pod>(buf: &mut Bytes) -> WireResult<T> {
    let size = std::mem::size_of::<T>();
    ensure_remaining(buf, size)?;
    let view = bytemuck::try_pod_read_unaligned(&buf[..size]).map_err(|_| {
        WireError::Truncated {
            needed: size,
            available: buf.len(),
        }
    })?;
    buf.advance(size);
    Ok(view)
}

/// Number of whole records of `record_size` bytes that fit in `remaining`,
/// and the leftover byte count.
///
/// OLSR lists carry no count; the count is whatever the enclosing
/// length leaves room for.
#[inline]
#[must_use]
pub const fn record_count(remaining: usize, record_size: usize) -> (usize, usize) {
    (remaining / record_size, remaining % record_size)
}

/// Decodes as many fixed-size records as `buf` holds.
///
/// A trailing partial record stays in `buf`.
pub fn decode_records<T>(
    buf: &mut Bytes,
    record_size: usize,
    mut decode: impl FnMut(&mut Bytes) -> T,
) -> Vec<T> {
    let (count, _) = record_count(buf.remaining(), record_size);
    let mut records = Vec::with_capacity(count);
    for _ in 0..count {
        records.push(decode(buf));
    }
    records
}

/// Decodes a list of addresses filling `buf`.
pub fn decode_addresses(buf: &mut Bytes) -> Vec<Ipv4Addr> {
    decode_records(buf, IPV4_LEN, |b| b.get_ipv4())
}
