//! # Codec Configuration
//!
//! Decoder policy loaded from TOML:
//!
//! ```toml
//! unknown_messages = "skip"   # or "reject"
//! max_packet_length = 1500
//! strict_residue = false
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{WireError, WireResult};
use crate::protocol::PacketHeader;

/// What the packet decoder does with a message whose type it does not know.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownMessagePolicy {
    /// Skip it using its declared size and keep decoding.
    #[default]
    Skip,
    /// Abort the whole packet.
    Reject,
}

/// Codec configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodecConfig {
    /// Unknown message handling.
    pub unknown_messages: UnknownMessagePolicy,
    /// Largest packet accepted or produced, in bytes.
    pub max_packet_length: u16,
    /// Report unconsumed bytes inside a message as an error
    /// instead of skipping them.
    pub strict_residue: bool,
}

impl CodecConfig {
    /// Default packet limit: a full Ethernet MTU.
    pub const DEFAULT_MAX_PACKET_LENGTH: u16 = 1500;

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::InvalidConfig`] on parse or validation failure.
    pub fn from_toml_str(source: &str) -> WireResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| WireError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::InvalidConfig`] if the file cannot be read or parsed.
    pub fn from_toml_file(path: impl AsRef<Path>) -> WireResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| WireError::InvalidConfig(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&source)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::InvalidConfig`] if the packet limit cannot hold a header.
    pub fn validate(&self) -> WireResult<()> {
        if usize::from(self.max_packet_length) < PacketHeader::SIZE {
            return Err(WireError::InvalidConfig(format!(
                "max_packet_length {} is smaller than the packet header",
                self.max_packet_length
            )));
        }
        Ok(())
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            unknown_messages: UnknownMessagePolicy::Skip,
            max_packet_length: Self::DEFAULT_MAX_PACKET_LENGTH,
            strict_residue: false,
        }
    }
}
