//! # Field Elements
//!
//! Merkle roots, nullifier hashes and proof words are 256-bit field
//! elements. They travel as `0x`-prefixed hex strings in JSON and TOML.

use ethnum::U256;
use serde::{Deserialize, Deserializer, Serializer};

/// Parse a field element from `0x` hex or plain decimal
pub fn parse_u256(text: &str) -> Option<U256> {
    match text.strip_prefix("0x") {
        Some(hex_digits) => U256::from_str_radix(hex_digits, 16).ok(),
        None => U256::from_str_radix(text, 10).ok(),
    }
}

/// Serde adapter for a single field element
pub mod u256_hex {
    use super::*;

    pub fn serialize<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{:#x}", value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_u256(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid field element: {}", raw)))
    }
}

/// Serde adapter for a fixed-size array of field elements
pub mod u256_hex_array {
    use super::*;
    use serde::ser::SerializeSeq;

    pub fn serialize<S: Serializer, const N: usize>(
        values: &[U256; N],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(N))?;
        for value in values {
            seq.serialize_element(&format!("{:#x}", value))?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>, const N: usize>(
        deserializer: D,
    ) -> Result<[U256; N], D::Error> {
        let raw = Vec::<String>::deserialize(deserializer)?;
        if raw.len() != N {
            return Err(serde::de::Error::invalid_length(raw.len(), &"a full proof"));
        }
        let mut out = [U256::ZERO; N];
        for (slot, text) in out.iter_mut().zip(raw.iter()) {
            *slot = parse_u256(text)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid field element: {}", text)))?;
        }
        Ok(out)
    }
}

/// Serde adapter for wei amounts
///
/// TOML integers stop at i64 and JSON readers often stop at 2^53, so amounts
/// are written as decimal strings. Small amounts may also be read back from
/// plain integers.
pub mod u128_dec {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(u64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        match Raw::deserialize(deserializer)? {
            Raw::Int(value) => Ok(value as u128),
            Raw::Text(text) => {
                let cleaned = text.replace('_', "");
                let parsed = match cleaned.strip_prefix("0x") {
                    Some(hex_digits) => u128::from_str_radix(hex_digits, 16),
                    None => cleaned.parse::<u128>(),
                };
                parsed.map_err(|_| serde::de::Error::custom(format!("invalid amount: {}", text)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Amount {
        #[serde(with = "u128_dec")]
        value: u128,
    }

    #[test]
    fn test_parse_hex_and_decimal() {
        assert_eq!(parse_u256("0xff"), Some(U256::new(255)));
        assert_eq!(parse_u256("255"), Some(U256::new(255)));
        assert_eq!(parse_u256("0xzz"), None);
    }

    #[test]
    fn test_amounts_beyond_i64_survive_toml() {
        let amount = Amount { value: 200_000_000_000_000_000_000_000 };
        let text = toml::to_string(&amount).unwrap();
        assert_eq!(text.trim(), "value = \"200000000000000000000000\"");
        assert_eq!(toml::from_str::<Amount>(&text).unwrap(), amount);
        assert_eq!(toml::from_str::<Amount>("value = 42").unwrap().value, 42);
        assert_eq!(toml::from_str::<Amount>("value = \"1_000\"").unwrap().value, 1_000);
        assert!(toml::from_str::<Amount>("value = \"-1\"").is_err());
    }
}
