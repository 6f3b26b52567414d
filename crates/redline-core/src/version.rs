//! Content-addressed version tags.
//!
//! A tag is the SHA-256 digest of a document's content, rendered the way an
//! HTTP entity tag is: a quoted lowercase hex string.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Opaque version tag derived from document content.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VersionTag([u8; 32]);

impl VersionTag {
    /// Derive the tag for a piece of content.
    pub fn of(content: &str) -> Self {
        let digest = Sha256::digest(content.as_bytes());
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&digest);
        VersionTag(bytes)
    }

    /// Create a tag from raw digest bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        VersionTag(bytes)
    }

    /// Get the underlying digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to an unquoted hex string.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{:02x}", b)).collect()
    }

    /// Parse a tag as a client would echo it back.
    ///
    /// Accepts the bare hex digest, the quoted form produced by `Display`,
    /// and a weak `W/` prefix.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let s = s.strip_prefix("W/").unwrap_or(s);
        let s = s
            .strip_prefix('"')
            .and_then(|rest| rest.strip_suffix('"'))
            .unwrap_or(s);

        if s.len() != 64 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let mut bytes = [0u8; 32];
        for (i, chunk) in s.as_bytes().chunks(2).enumerate() {
            let hex_str = std::str::from_utf8(chunk).ok()?;
            bytes[i] = u8::from_str_radix(hex_str, 16).ok()?;
        }
        Some(VersionTag(bytes))
    }

    /// Truncated display (first 8 hex chars), for logs.
    pub fn short(&self) -> String {
        self.to_hex()[..8].to_string()
    }
}

impl fmt::Debug for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VersionTag({}...)", self.short())
    }
}

impl fmt::Display for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.to_hex())
    }
}

/// Error returned when a string is not a well-formed version tag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed version tag: {0}")]
pub struct ParseTagError(pub String);

impl FromStr for VersionTag {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VersionTag::parse(s).ok_or_else(|| ParseTagError(s.to_string()))
    }
}

impl Serialize for VersionTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for VersionTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        VersionTag::parse(&raw).ok_or_else(|| serde::de::Error::custom(ParseTagError(raw)))
    }
}
