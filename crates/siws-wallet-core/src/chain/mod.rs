//! # Chain-Agnostic Identities
//!
//! CAIP-style identifiers for chains (`namespace:reference`) and accounts
//! (`namespace:reference:address`). Every caller compares and serializes
//! identities through these types instead of ad hoc strings, and malformed
//! input is rejected at construction.
//!
//! ## Example
//!
//! ```rust
//! use siws_wallet_core::chain::{ChainAgnosticAddress, PolkadotAddress};
//!
//! let genesis = "0x060ca79d9743b0ca58cabe294b9545a492e69de00c65154dba1f236b4a3ae5c0";
//! let address = PolkadotAddress::new(genesis, "5Dc96kiTPTfZHmq6yTFSqejJzfUNfQQjneNesRWf9MDppJsd")?;
//!
//! assert_eq!(
//!     address.to_string(),
//!     "polkadot:060ca79d9743b0ca58cabe294b9545a4:5Dc96kiTPTfZHmq6yTFSqejJzfUNfQQjneNesRWf9MDppJsd"
//! );
//!
//! let parsed: ChainAgnosticAddress = address.to_string().parse()?;
//! assert_eq!(parsed, *address);
//! # Ok::<(), siws_wallet_core::Error>(())
//! ```

mod address;

pub use address::{ChainAgnosticAddress, PolkadotAddress};

use crate::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;
use std::sync::LazyLock;

/// Namespace used for Polkadot/Substrate chains
pub const POLKADOT_CHAIN_NAMESPACE: &str = "polkadot";

/// Maximum length of a chain reference
pub const MAX_REFERENCE_LEN: usize = 32;

static NAMESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-a-z0-9]{3,8}$").expect("valid namespace pattern"));

static REFERENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-a-zA-Z0-9]{1,32}$").expect("valid reference pattern"));

/// Normalize a raw chain reference.
///
/// A reference that is already valid is kept verbatim, `0x` included. A hex
/// value too long to be one (typically a genesis hash, with or without `0x`)
/// loses its prefix and is shortened to [`MAX_REFERENCE_LEN`] characters.
/// Anything else is left to validation.
fn normalize_reference(raw: &str) -> String {
    if REFERENCE_RE.is_match(raw) {
        return raw.to_string();
    }

    let hex = raw.strip_prefix("0x").unwrap_or(raw);
    if hex.len() > MAX_REFERENCE_LEN && hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        hex[..MAX_REFERENCE_LEN].to_string()
    } else {
        raw.to_string()
    }
}

/// Chain identifier: `namespace:reference`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ChainAgnosticId {
    namespace: String,
    reference: String,
}

impl ChainAgnosticId {
    /// Create a validated chain id
    pub fn new(namespace: impl Into<String>, reference: impl AsRef<str>) -> Result<Self> {
        let namespace = namespace.into();
        if !NAMESPACE_RE.is_match(&namespace) {
            return Err(Error::InvalidFormat(format!(
                "namespace '{namespace}' must match [-a-z0-9]{{3,8}}"
            )));
        }

        let reference = normalize_reference(reference.as_ref());
        if !REFERENCE_RE.is_match(&reference) {
            return Err(Error::InvalidFormat(format!(
                "reference '{reference}' must match [-a-zA-Z0-9]{{1,32}}"
            )));
        }

        Ok(Self {
            namespace,
            reference,
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }
}

impl fmt::Display for ChainAgnosticId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.reference)
    }
}

impl FromStr for ChainAgnosticId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (namespace, reference) = s
            .split_once(':')
            .ok_or_else(|| Error::InvalidFormat(format!("'{s}' is not namespace:reference")))?;
        Self::new(namespace, reference)
    }
}

impl TryFrom<String> for ChainAgnosticId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<ChainAgnosticId> for String {
    fn from(id: ChainAgnosticId) -> Self {
        id.to_string()
    }
}

/// Chain id pinned to the `polkadot` namespace
///
/// Accepts anything that renders as a genesis hash: a hex string, or a
/// block-hash type with a [`fmt::Display`] impl.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ChainAgnosticId", into = "ChainAgnosticId")]
pub struct PolkadotChainId(ChainAgnosticId);

impl PolkadotChainId {
    pub fn new(genesis_hash: impl fmt::Display) -> Result<Self> {
        ChainAgnosticId::new(POLKADOT_CHAIN_NAMESPACE, genesis_hash.to_string()).map(Self)
    }

    pub fn into_inner(self) -> ChainAgnosticId {
        self.0
    }
}

impl Deref for PolkadotChainId {
    type Target = ChainAgnosticId;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for PolkadotChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<PolkadotChainId> for ChainAgnosticId {
    fn from(id: PolkadotChainId) -> Self {
        id.0
    }
}

impl TryFrom<ChainAgnosticId> for PolkadotChainId {
    type Error = Error;

    fn try_from(id: ChainAgnosticId) -> Result<Self> {
        if id.namespace() != POLKADOT_CHAIN_NAMESPACE {
            return Err(Error::InvalidFormat(format!(
                "expected namespace '{POLKADOT_CHAIN_NAMESPACE}', got '{}'",
                id.namespace()
            )));
        }
        Ok(Self(id))
    }
}

impl PartialEq<ChainAgnosticId> for PolkadotChainId {
    fn eq(&self, other: &ChainAgnosticId) -> bool {
        &self.0 == other
    }
}

impl PartialEq<PolkadotChainId> for ChainAgnosticId {
    fn eq(&self, other: &PolkadotChainId) -> bool {
        self == &other.0
    }
}
