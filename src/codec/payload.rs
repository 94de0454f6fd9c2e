//! Canonical byte payload
//!
//! The wire form of a field value: an even-length upper-case hex string.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Serialize, Serializer};

use crate::error::{FieldDataError, FieldDataResult};

/// Even-length upper-case hex string
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HexPayload(String);

impl HexPayload {
    /// Validate and normalize hex text (case-insensitive, must be even length)
    pub fn parse(data: &str) -> FieldDataResult<Self> {
        let bytes = hex::decode(data.trim()).map_err(|_| FieldDataError::InvalidHex {
            data: data.to_string(),
        })?;
        Ok(Self::from_bytes(&bytes))
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        HexPayload(hex::encode_upper(bytes))
    }

    // Callers guarantee `hex` is even-length upper-case hex.
    pub(crate) fn from_canonical(hex: String) -> Self {
        debug_assert!(hex.len() % 2 == 0);
        HexPayload(hex)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Number of bytes represented
    pub fn byte_len(&self) -> usize {
        self.0.len() / 2
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        // Invariant: always valid hex.
        hex::decode(&self.0).unwrap_or_default()
    }

    /// Base64 of the bytes, as placed in JSON request bodies
    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.to_bytes())
    }
}

impl fmt::Display for HexPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for HexPayload {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for HexPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes_case() {
        let payload = HexPayload::parse("c1c2").unwrap();
        assert_eq!(payload.as_str(), "C1C2");
        assert_eq!(payload.byte_len(), 2);
    }

    #[test]
    fn test_parse_rejects_odd_and_non_hex() {
        assert!(matches!(HexPayload::parse("ABC"), Err(FieldDataError::InvalidHex { .. })));
        assert!(matches!(HexPayload::parse("ZZ"), Err(FieldDataError::InvalidHex { .. })));
    }

    #[test]
    fn test_base64() {
        let payload = HexPayload::parse("C1C2C3").unwrap();
        assert_eq!(payload.to_base64(), "wcLD");
        assert_eq!(HexPayload::parse("").unwrap().to_base64(), "");
    }
}
