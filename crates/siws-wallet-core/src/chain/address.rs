//! Account addresses qualified by chain: `namespace:reference:address`

use super::{ChainAgnosticId, PolkadotChainId};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

/// Account address on a specific chain
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ChainAgnosticAddress {
    chain_id: ChainAgnosticId,
    address: String,
}

impl ChainAgnosticAddress {
    /// Create from namespace, reference and address
    pub fn new(
        namespace: impl Into<String>,
        reference: impl AsRef<str>,
        address: impl Into<String>,
    ) -> Result<Self> {
        let chain_id = ChainAgnosticId::new(namespace, reference)?;
        Self::from_chain_id(chain_id, address)
    }

    /// Create from an existing chain id and address
    pub fn from_chain_id(chain_id: impl Into<ChainAgnosticId>, address: impl Into<String>) -> Result<Self> {
        let address = address.into();
        if address.is_empty() {
            return Err(Error::MissingAddress);
        }

        Ok(Self {
            chain_id: chain_id.into(),
            address,
        })
    }

    pub fn chain_id(&self) -> &ChainAgnosticId {
        &self.chain_id
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

impl fmt::Display for ChainAgnosticAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chain_id, self.address)
    }
}

impl FromStr for ChainAgnosticAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.splitn(3, ':');
        let namespace = parts.next().unwrap_or_default();
        let reference = parts
            .next()
            .ok_or_else(|| Error::InvalidFormat(format!("'{s}' is not namespace:reference:address")))?;
        let address = parts.next().unwrap_or_default();

        Self::new(namespace, reference, address)
    }
}

impl TryFrom<String> for ChainAgnosticAddress {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<ChainAgnosticAddress> for String {
    fn from(address: ChainAgnosticAddress) -> Self {
        address.to_string()
    }
}

/// Address on a Polkadot/Substrate chain
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ChainAgnosticAddress", into = "ChainAgnosticAddress")]
pub struct PolkadotAddress(ChainAgnosticAddress);

impl PolkadotAddress {
    /// Create from a genesis hash (anything that displays as one) and an address
    pub fn new(genesis_hash: impl fmt::Display, address: impl Into<String>) -> Result<Self> {
        Self::from_chain_id(PolkadotChainId::new(genesis_hash)?, address)
    }

    pub fn from_chain_id(chain_id: PolkadotChainId, address: impl Into<String>) -> Result<Self> {
        ChainAgnosticAddress::from_chain_id(chain_id, address).map(Self)
    }

    pub fn into_inner(self) -> ChainAgnosticAddress {
        self.0
    }
}

impl Deref for PolkadotAddress {
    type Target = ChainAgnosticAddress;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for PolkadotAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<PolkadotAddress> for ChainAgnosticAddress {
    fn from(address: PolkadotAddress) -> Self {
        address.0
    }
}

impl TryFrom<ChainAgnosticAddress> for PolkadotAddress {
    type Error = Error;

    fn try_from(address: ChainAgnosticAddress) -> Result<Self> {
        let ChainAgnosticAddress { chain_id, address } = address;
        Self::from_chain_id(PolkadotChainId::try_from(chain_id)?, address)
    }
}
