//! # Wire Error Types
//!
//! All errors that can occur while encoding or decoding OLSR headers.

use thiserror::Error;

/// Errors that can occur in the wire codec.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WireError {
    /// Fewer bytes available than a fixed-size field requires.
    #[error("truncated input: need {needed} bytes, have {available}")]
    Truncated {
        /// Bytes the field needs.
        needed: usize,
        /// Bytes left in the buffer.
        available: usize,
    },

    /// Message type tag outside {HELLO, TC, MID, HNA}.
    ///
    /// The whole message (`size` bytes) has been consumed when this is
    /// returned, so the caller can carry on with the next message.
    #[error("unknown message type {tag} ({size} bytes)")]
    UnknownMessageType {
        /// The tag found on the wire.
        tag: u8,
        /// Declared message size.
        size: u16,
    },

    /// A declared length does not match the bytes produced or consumed.
    #[error("size mismatch in {field}: declared {declared}, actual {actual}")]
    SizeMismatch {
        /// Which length field disagreed.
        field: &'static str,
        /// Value on the wire.
        declared: usize,
        /// Value implied by the data.
        actual: usize,
    },

    /// Time value outside the representable quantum range.
    #[error("time value {seconds}s cannot be quantized")]
    QuantizationRange {
        /// The offending interval.
        seconds: f64,
    },

    /// A structure is too large for its length field or the configured limit.
    #[error("{field} too large: {size} bytes, limit {limit}")]
    Oversized {
        /// Which structure overflowed.
        field: &'static str,
        /// Serialized size.
        size: usize,
        /// Maximum allowed.
        limit: usize,
    },

    /// Invalid configuration file.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl WireError {
    /// Returns true if decoding may continue with the next message.
    #[inline]
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::UnknownMessageType { .. })
    }
}

/// Result type for wire operations.
pub type WireResult<T> = Result<T, WireError>;
