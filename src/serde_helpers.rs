//! Serde helpers for values that cross the JavaScript boundary.
//!
//! JS numbers cannot hold every `u64`, so amounts and versions are written
//! as decimal strings and read from either strings or numbers (BigInt
//! arrives as a number through `serde-wasm-bindgen`). Chain types are
//! written in the strings the Sui TypeScript SDK uses.

use serde::de::{self, Visitor};
use serde::{Deserializer, Serializer};

struct U64Visitor;

impl<'de> Visitor<'de> for U64Visitor {
    type Value = u64;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a string or number representing a u64")
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(v)
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        u64::try_from(v).map_err(|_| de::Error::custom("negative amount"))
    }

    fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        // u64::MAX rounds up to 2^64 as an f64, so the bound is exclusive
        if v.fract() == 0.0 && v >= 0.0 && v < 18_446_744_073_709_551_616.0 {
            Ok(v as u64)
        } else {
            Err(de::Error::custom(format!("not a non-negative integer: {}", v)))
        }
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        v.trim().parse().map_err(de::Error::custom)
    }
}

/// Deserialize a u64 from either string or number (for JS BigInt compatibility)
pub fn deserialize_amount<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(U64Visitor)
}

/// `#[serde(with = "u64_string")]`: write as a decimal string, read string or number.
pub mod u64_string {
    use super::*;

    pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        deserialize_amount(deserializer)
    }
}

/// `#[serde(with = "base64_bytes")]`: raw bytes as standard base64.
pub mod base64_bytes {
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&base64::engine::general_purpose::STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        base64::engine::general_purpose::STANDARD
            .decode(s)
            .map_err(serde::de::Error::custom)
    }
}

/// `#[serde(with = "address_hex")]`: full-length hex, short forms accepted.
pub mod address_hex {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::address::{AddressExt, SuiAddress};

    pub fn serialize<S: Serializer>(address: &SuiAddress, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&address.to_full_hex())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SuiAddress, D::Error> {
        let s = String::deserialize(deserializer)?;
        SuiAddress::parse_padded(&s).map_err(serde::de::Error::custom)
    }
}

/// `#[serde(with = "option_address_hex")]`
pub mod option_address_hex {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::address::{AddressExt, SuiAddress};

    pub fn serialize<S: Serializer>(
        address: &Option<SuiAddress>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match address {
            Some(address) => serializer.serialize_some(&address.to_full_hex()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<SuiAddress>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|s| SuiAddress::parse_padded(&s).map_err(serde::de::Error::custom))
            .transpose()
    }
}

/// `#[serde(with = "digest_base58")]`
pub mod digest_base58 {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::address::{DigestExt, ObjectDigest};

    pub fn serialize<S: Serializer>(digest: &ObjectDigest, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&digest.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ObjectDigest, D::Error> {
        let s = String::deserialize(deserializer)?;
        ObjectDigest::parse_base58(&s).map_err(serde::de::Error::custom)
    }
}
