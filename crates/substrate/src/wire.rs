//! JSON shapes returned by the node's RPC methods.

use blockgate_core::{BlockHash, ChainError, Header, RuntimeVersion};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct Digest {
    #[serde(default)]
    pub logs: Vec<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireHeader {
    pub parent_hash: BlockHash,
    pub number: String,
    pub state_root: BlockHash,
    pub extrinsics_root: BlockHash,
    pub digest: Digest,
}

impl TryFrom<WireHeader> for Header {
    type Error = ChainError;

    fn try_from(value: WireHeader) -> Result<Self, Self::Error> {
        Ok(Header {
            parent_hash: value.parent_hash,
            number: parse_hex_number(&value.number)?,
            state_root: value.state_root,
            extrinsics_root: value.extrinsics_root,
            digest_logs: value.digest.logs,
        })
    }
}

#[derive(Deserialize)]
pub struct WireBlock {
    pub header: WireHeader,
    pub extrinsics: Vec<String>,
}

#[derive(Deserialize)]
pub struct SignedBlock {
    pub block: WireBlock,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireRuntimeVersion {
    pub spec_name: String,
    pub impl_name: String,
    pub authoring_version: u32,
    pub spec_version: u32,
    pub impl_version: u32,
    pub transaction_version: u32,
}

impl From<WireRuntimeVersion> for RuntimeVersion {
    fn from(value: WireRuntimeVersion) -> Self {
        RuntimeVersion {
            spec_name: value.spec_name,
            impl_name: value.impl_name,
            authoring_version: value.authoring_version,
            spec_version: value.spec_version,
            impl_version: value.impl_version,
            transaction_version: value.transaction_version,
        }
    }
}

/// Block numbers travel as `0x`-prefixed, unpadded hex.
pub fn parse_hex_number(value: &str) -> Result<u64, ChainError> {
    let digits = value
        .strip_prefix("0x")
        .ok_or_else(|| ChainError::decoding(format!("number `{value}` is not hex")))?;

    u64::from_str_radix(digits, 16).map_err(ChainError::decoding)
}

pub fn decode_hex_bytes(value: &str) -> Result<Vec<u8>, ChainError> {
    let digits = value.strip_prefix("0x").unwrap_or(value);
    hex::decode(digits).map_err(ChainError::decoding)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_numbers_parse() {
        assert_eq!(parse_hex_number("0x1b4").unwrap(), 436);
        assert_eq!(parse_hex_number("0x0").unwrap(), 0);
        assert!(parse_hex_number("436").is_err());
        assert!(parse_hex_number("0xzz").is_err());
    }

    #[test]
    fn header_converts_from_wire() {
        let wire: WireHeader = serde_json::from_value(serde_json::json!({
            "parentHash": format!("0x{}", "11".repeat(32)),
            "number": "0x10",
            "stateRoot": format!("0x{}", "22".repeat(32)),
            "extrinsicsRoot": format!("0x{}", "33".repeat(32)),
            "digest": { "logs": ["0x0642414245"] }
        }))
        .unwrap();

        let header = Header::try_from(wire).unwrap();

        assert_eq!(header.number, 16);
        assert_eq!(header.digest_logs, vec!["0x0642414245".to_string()]);
    }
}
