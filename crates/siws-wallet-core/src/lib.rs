//! # SIWS Wallet Core
//!
//! Core library for obtaining Sign-In With Substrate proofs from browser
//! wallet extensions.
//!
//! ## Architecture
//!
//! This crate provides:
//! - **Chain-agnostic identities**: `namespace:reference[:address]` values with
//!   exact parsing, formatting and equality rules
//! - **Extension connector**: connect/enable handshake against an injected
//!   wallet registry, with failures classified into a stable taxonomy
//! - **Raw signing**: `<Bytes>` wrapping for arbitrary payloads
//! - **Account index**: accounts merged across several connected wallets
//! - **Wallet catalog**: display names and install links for known extensions
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use siws_wallet_core::{ExtensionConnector, ExtensionErrorKind};
//!
//! let connector = ExtensionConnector::new(injected_web3, "My App")?;
//!
//! match connector.connect("polkadot-js").await {
//!     Ok(_) => {}
//!     Err(e) if e.extension_kind() == Some(ExtensionErrorKind::PendingAuth) => {
//!         // ask the user to approve the request in the extension popup
//!     }
//!     Err(e) => return Err(e),
//! }
//!
//! let accounts = connector.get_accounts().await?;
//! let signature = connector
//!     .sign_message_with_wrapped_bytes(b"sign in", &accounts[0].address)
//!     .await?;
//! ```

pub mod accounts;
pub mod chain;
pub mod error;
pub mod extension;
pub mod types;
pub mod wallets;
pub mod wrap;

pub use accounts::{AccountIndex, AccountWithWallets};
pub use chain::{
    ChainAgnosticAddress, ChainAgnosticId, POLKADOT_CHAIN_NAMESPACE, PolkadotAddress,
    PolkadotChainId,
};
pub use error::{Error, ExtensionErrorKind, ProviderError, Result};
pub use extension::{
    ConnectionState, ExtensionConnector, Injected, InjectedExtension, InjectedWeb3,
    WalletProvider,
};
pub use types::{InjectedAccount, SignerPayloadRaw, SignerResult};
pub use wallets::{KNOWN_WALLETS, KnownWallet, find_known_wallet};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
