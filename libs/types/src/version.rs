//! Pool protocol versions a factory can be registered with

use serde::{Deserialize, Serialize};
use std::fmt;

/// Pool protocol deployed by a whitelisted factory.
///
/// Stored as the raw numeric tag (`2` or `3`). Any other tag decodes to
/// [`ProtocolVersion::Unsupported`] so that callers must handle it rather
/// than assume it cannot happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum ProtocolVersion {
    /// Constant-product pairs resolved with `getPair(token0, token1)`
    V2,
    /// Concentrated-liquidity pools resolved with `getPool(token0, token1, fee)`
    V3,
    Unsupported(u8),
}

impl ProtocolVersion {
    pub const fn from_tag(tag: u8) -> Self {
        match tag {
            2 => ProtocolVersion::V2,
            3 => ProtocolVersion::V3,
            other => ProtocolVersion::Unsupported(other),
        }
    }

    pub const fn tag(self) -> u8 {
        match self {
            ProtocolVersion::V2 => 2,
            ProtocolVersion::V3 => 3,
            ProtocolVersion::Unsupported(tag) => tag,
        }
    }

    pub const fn is_supported(self) -> bool {
        !matches!(self, ProtocolVersion::Unsupported(_))
    }
}

impl From<u8> for ProtocolVersion {
    fn from(tag: u8) -> Self {
        Self::from_tag(tag)
    }
}

impl From<ProtocolVersion> for u8 {
    fn from(version: ProtocolVersion) -> Self {
        version.tag()
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolVersion::V2 => f.write_str("v2"),
            ProtocolVersion::V3 => f.write_str("v3"),
            ProtocolVersion::Unsupported(tag) => write!(f, "unsupported({tag})"),
        }
    }
}
