//! Move type tags and coin types.
//!
//! A coin type is a struct tag such as `0x2::sui::SUI`. Tags are parsed
//! with `sui_sdk_types` after canonicalizing the text (whitespace around
//! punctuation dropped, addresses padded to full length) and always
//! rendered normalized, so two tags denote the same type iff they compare
//! equal.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::address::{AddressExt, SuiAddress};
use crate::error::WasmSuiError;

pub use sui_sdk_types::{Identifier, StructTag, TypeTag};

/// Short form of the native gas coin type
pub const SUI_TYPE_ARG: &str = "0x2::sui::SUI";

/// Address of the Sui framework package
pub const SUI_FRAMEWORK_ADDRESS: SuiAddress = {
    let mut bytes = [0u8; 32];
    bytes[31] = 2;
    SuiAddress::new(bytes)
};

/// Deepest `<...>` nesting accepted in a type tag.
pub const MAX_TYPE_DEPTH: usize = 16;

/// Rewrite a type tag into the form the parser expects.
///
/// Rejects nesting deeper than `MAX_TYPE_DEPTH` before any recursion happens.
fn canonicalize(input: &str) -> Result<String, WasmSuiError> {
    let mut out = String::with_capacity(input.len() + 64);
    let mut depth = 0usize;
    let mut after_ident = false;
    let mut spaced = false;
    let mut rest = input;

    while let Some(c) = rest.chars().next() {
        if c.is_whitespace() {
            spaced = true;
            rest = &rest[c.len_utf8()..];
            continue;
        }

        let len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());
        if len > 0 {
            if after_ident && spaced {
                return Err(WasmSuiError::InvalidCoinType(format!(
                    "unexpected whitespace in '{}'",
                    input
                )));
            }
            let token = &rest[..len];
            rest = &rest[len..];
            let is_address = token.starts_with("0x") || token.starts_with("0X");
            if is_address && rest.trim_start().starts_with("::") {
                let address = SuiAddress::parse_padded(token)
                    .map_err(|e| WasmSuiError::InvalidCoinType(format!("{}: {}", input, e)))?;
                out.push_str(&address.to_full_hex());
            } else {
                out.push_str(token);
            }
            after_ident = true;
            spaced = false;
            continue;
        }

        match c {
            '<' => {
                depth += 1;
                if depth > MAX_TYPE_DEPTH {
                    return Err(WasmSuiError::InvalidCoinType(format!(
                        "type nested deeper than {} levels",
                        MAX_TYPE_DEPTH
                    )));
                }
            }
            '>' => depth = depth.saturating_sub(1),
            _ => {}
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
        after_ident = false;
        spaced = false;
    }
    Ok(out)
}

/// Parse a type tag, accepting short addresses and spaces around punctuation.
pub fn parse_type_tag(s: &str) -> Result<TypeTag, WasmSuiError> {
    let canonical = canonicalize(s)?;
    if canonical.is_empty() {
        return Err(WasmSuiError::InvalidCoinType("empty type tag".to_string()));
    }
    TypeTag::from_str(&canonical)
        .map_err(|_| WasmSuiError::InvalidCoinType(format!("'{}' is not a valid type tag", s)))
}

/// Parse a struct tag; primitives and vectors are rejected.
pub fn parse_struct_tag(s: &str) -> Result<StructTag, WasmSuiError> {
    match parse_type_tag(s)? {
        TypeTag::Struct(tag) => Ok(*tag),
        other => Err(WasmSuiError::InvalidCoinType(format!(
            "expected a struct type, got {}",
            type_tag_string(&other)
        ))),
    }
}

/// Normalized text of a type tag: full-length addresses, `,`-joined parameters.
pub fn type_tag_string(tag: &TypeTag) -> String {
    let mut out = String::new();
    write_type_tag(&mut out, tag);
    out
}

fn write_type_tag(out: &mut String, tag: &TypeTag) {
    let primitive = match tag {
        TypeTag::U8 => "u8",
        TypeTag::U16 => "u16",
        TypeTag::U32 => "u32",
        TypeTag::U64 => "u64",
        TypeTag::U128 => "u128",
        TypeTag::U256 => "u256",
        TypeTag::Bool => "bool",
        TypeTag::Address => "address",
        TypeTag::Signer => "signer",
        TypeTag::Vector(inner) => {
            out.push_str("vector<");
            write_type_tag(out, inner);
            out.push('>');
            return;
        }
        TypeTag::Struct(tag) => {
            write_struct_tag(out, tag);
            return;
        }
    };
    out.push_str(primitive);
}

fn write_struct_tag(out: &mut String, tag: &StructTag) {
    out.push_str(&tag.address.to_full_hex());
    out.push_str("::");
    out.push_str(tag.module.as_str());
    out.push_str("::");
    out.push_str(tag.name.as_str());
    if let Some((first, rest)) = tag.type_params.split_first() {
        out.push('<');
        write_type_tag(out, first);
        for param in rest {
            out.push(',');
            write_type_tag(out, param);
        }
        out.push('>');
    }
}

/// The type tag of a fungible asset (`0x2::coin::Coin<T>` is parameterized by it).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CoinType(StructTag);

impl CoinType {
    pub fn parse(s: &str) -> Result<Self, WasmSuiError> {
        parse_struct_tag(s).map(CoinType)
    }

    /// Whether this is the native gas coin, in either its short or normalized spelling.
    pub fn is_sui(&self) -> bool {
        let tag = &self.0;
        tag.address == SUI_FRAMEWORK_ADDRESS
            && tag.module.as_str() == "sui"
            && tag.name.as_str() == "SUI"
            && tag.type_params.is_empty()
    }

    /// The coin type named by a struct type tag.
    pub fn from_type_tag(tag: &TypeTag) -> Option<Self> {
        match tag {
            TypeTag::Struct(tag) => Some(CoinType((**tag).clone())),
            _ => None,
        }
    }

    pub fn struct_tag(&self) -> &StructTag {
        &self.0
    }

    /// Struct name, e.g. `USDC` for `0x..::usdc::USDC`.
    pub fn name(&self) -> &str {
        self.0.name.as_str()
    }

    pub fn to_type_tag(&self) -> TypeTag {
        TypeTag::Struct(Box::new(self.0.clone()))
    }

    /// Canonical string form (full-length addresses).
    pub fn normalized(&self) -> String {
        let mut out = String::new();
        write_struct_tag(&mut out, &self.0);
        out
    }
}

impl FromStr for CoinType {
    type Err = WasmSuiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CoinType::parse(s)
    }
}

impl fmt::Display for CoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.normalized())
    }
}

impl Serialize for CoinType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.normalized())
    }
}

impl<'de> Deserialize<'de> for CoinType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        CoinType::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Normalize a struct tag string, like `normalizeStructTag` in the TS SDK.
pub fn normalize_struct_tag(s: &str) -> Result<String, WasmSuiError> {
    parse_struct_tag(s).map(|tag| CoinType(tag).normalized())
}
