//! Sui addresses, object ids and object digests.
//!
//! Wraps `sui_sdk_types::Address` and `ObjectDigest` with WASM-friendly
//! parsing. Short forms such as `0x2` are accepted and left-padded with
//! zeros, matching `normalizeSuiAddress` in the TypeScript SDK.

use crate::error::WasmSuiError;

/// Re-export the underlying Sui types.
pub use sui_sdk_types::{Address as SuiAddress, ObjectDigest};

/// Object ids use the same encoding as account addresses.
pub type ObjectId = SuiAddress;

/// Length in bytes of an address or object id
pub const SUI_ADDRESS_LENGTH: usize = 32;

/// Extension trait for addresses parsed from and rendered for JavaScript.
pub trait AddressExt: Sized {
    /// Parse a hex address, with or without `0x`, padding short forms.
    fn parse_padded(s: &str) -> Result<Self, WasmSuiError>;
    /// Full-length `0x`-prefixed hex form.
    fn to_full_hex(&self) -> String;
    /// Shortest form with leading zeros stripped (`0x2` for the framework).
    fn to_short_hex(&self) -> String;
    /// The same bytes as a chain object id.
    fn to_object_id(&self) -> sui_sdk_types::ObjectId;
    fn from_object_id(id: &sui_sdk_types::ObjectId) -> Self;
}

impl AddressExt for SuiAddress {
    fn parse_padded(s: &str) -> Result<SuiAddress, WasmSuiError> {
        let trimmed = s.trim();
        let hex_part = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if hex_part.is_empty() {
            return Err(WasmSuiError::InvalidAddress(format!(
                "empty address: '{}'",
                s
            )));
        }
        if hex_part.len() > SUI_ADDRESS_LENGTH * 2 {
            return Err(WasmSuiError::InvalidAddress(format!(
                "address longer than {} bytes: {}",
                SUI_ADDRESS_LENGTH, s
            )));
        }

        let padded = format!("{:0>width$}", hex_part, width = SUI_ADDRESS_LENGTH * 2);
        let mut bytes = [0u8; SUI_ADDRESS_LENGTH];
        hex::decode_to_slice(&padded, &mut bytes)
            .map_err(|e| WasmSuiError::InvalidAddress(format!("{}: {}", s, e)))?;
        Ok(SuiAddress::new(bytes))
    }

    fn to_full_hex(&self) -> String {
        format!("0x{}", hex::encode(self.inner()))
    }

    fn to_short_hex(&self) -> String {
        let full = hex::encode(self.inner());
        let trimmed = full.trim_start_matches('0');
        if trimmed.is_empty() {
            "0x0".to_string()
        } else {
            format!("0x{}", trimmed)
        }
    }

    fn to_object_id(&self) -> sui_sdk_types::ObjectId {
        sui_sdk_types::ObjectId::new(*self.inner())
    }

    fn from_object_id(id: &sui_sdk_types::ObjectId) -> SuiAddress {
        SuiAddress::new(*id.inner())
    }
}

/// Extension trait for digests received as base58 strings.
pub trait DigestExt: Sized {
    fn parse_base58(s: &str) -> Result<Self, WasmSuiError>;
}

impl DigestExt for ObjectDigest {
    fn parse_base58(s: &str) -> Result<ObjectDigest, WasmSuiError> {
        ObjectDigest::from_base58(s.trim())
            .map_err(|_| WasmSuiError::InvalidInput(format!("Invalid digest: '{}'", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_address_is_padded() {
        let addr = SuiAddress::parse_padded("0x2").unwrap();
        assert_eq!(
            addr.to_full_hex(),
            "0x0000000000000000000000000000000000000000000000000000000000000002"
        );
        assert_eq!(addr.to_short_hex(), "0x2");
        assert_eq!(SuiAddress::ZERO.to_short_hex(), "0x0");
    }

    #[test]
    fn test_address_without_prefix() {
        let a = SuiAddress::parse_padded(
            "dba34672e30cb065b1f93e3ab55318768fd6fef66c15942c9f7cb846e2f900e7",
        )
        .unwrap();
        let b = SuiAddress::parse_padded(
            "0xDBA34672E30CB065B1F93E3AB55318768FD6FEF66C15942C9F7CB846E2F900E7",
        )
        .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_addresses() {
        assert!(SuiAddress::parse_padded("").is_err());
        assert!(SuiAddress::parse_padded("0x").is_err());
        assert!(SuiAddress::parse_padded("0xzz").is_err());
        let too_long = format!("0x{}", "1".repeat(65));
        assert!(matches!(
            SuiAddress::parse_padded(&too_long),
            Err(WasmSuiError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_object_id_conversion() {
        let addr = SuiAddress::new([5; 32]);
        let id = addr.to_object_id();
        assert_eq!(id.inner(), &[5; 32]);
        assert_eq!(SuiAddress::from_object_id(&id), addr);
    }

    #[test]
    fn test_digest_base58() {
        let digest = ObjectDigest::new([7u8; 32]);
        let encoded = digest.to_string();
        assert_eq!(ObjectDigest::parse_base58(&encoded).unwrap(), digest);
        assert!(matches!(
            ObjectDigest::parse_base58("abc"),
            Err(WasmSuiError::InvalidInput(_))
        ));
    }
}
