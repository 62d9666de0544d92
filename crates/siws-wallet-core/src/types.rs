//! Data exchanged with injected wallet extensions

use serde::{Deserialize, Serialize};

/// Account type that is never returned to callers
pub const ETHEREUM_ACCOUNT_TYPE: &str = "ethereum";

/// Account exposed by a wallet extension
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InjectedAccount {
    /// SS58 (or hex, for ethereum accounts) address
    pub address: String,
    /// Genesis hash of the chain this account is restricted to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genesis_hash: Option<String>,
    /// Human-readable label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Keypair type (`sr25519`, `ed25519`, `ecdsa`, `ethereum`)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub account_type: Option<String>,
}

impl InjectedAccount {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            genesis_hash: None,
            name: None,
            account_type: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_type(mut self, account_type: impl Into<String>) -> Self {
        self.account_type = Some(account_type.into());
        self
    }

    pub fn with_genesis_hash(mut self, genesis_hash: impl Into<String>) -> Self {
        self.genesis_hash = Some(genesis_hash.into());
        self
    }

    /// Check if this is an ethereum-style account
    pub fn is_ethereum(&self) -> bool {
        self.account_type.as_deref() == Some(ETHEREUM_ACCOUNT_TYPE)
    }
}

/// Kind of raw payload handed to the signer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RawPayloadType {
    Bytes,
    Payload,
}

/// Raw signing request: `{ address, data, type }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerPayloadRaw {
    pub address: String,
    /// Hex string or UTF-8 message
    pub data: String,
    #[serde(rename = "type")]
    pub payload_type: RawPayloadType,
}

impl SignerPayloadRaw {
    pub fn bytes(address: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            data: data.into(),
            payload_type: RawPayloadType::Bytes,
        }
    }
}

/// Signer response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerResult {
    /// Hex-encoded signature
    pub signature: String,
    /// Request id assigned by the extension, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
}
