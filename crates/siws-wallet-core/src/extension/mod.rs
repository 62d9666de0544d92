//! # Wallet Extension Connector
//!
//! Browser wallet extensions publish themselves in an injected registry
//! (`window.injectedWeb3` in a browser) under a well-known name. This module
//! abstracts that registry behind the [`WalletProvider`] trait and drives the
//! connect/enable handshake, account listing and raw signing through
//! [`ExtensionConnector`].
//!
//! ## Connection states
//!
//! ```text
//! Disconnected ──connect()──► Connecting ──ok──► Connected
//!       ▲                         │
//!       └─────────error───────────┘
//! ```
//!
//! A successful `connect` replaces the stored extension wholesale. A failed
//! `connect` leaves any previously connected extension in place.

pub mod classify;
pub mod memory;

pub use classify::{
    CLASSIFICATION_RULES, CLASSIFICATION_TABLE_VERSION, ClassificationRule, classify,
    classify_message,
};
pub use memory::{HookStyle, MemoryWallet};

use crate::types::{InjectedAccount, SignerPayloadRaw, SignerResult};
use crate::wrap::{to_hex, wrap_bytes};
use crate::{Error, ExtensionErrorKind, ProviderError, Result};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, error, instrument};

/// Extension that resolves `enable` even when the user rejected the request
pub const TALISMAN: &str = "talisman";

/// Injected wallet registry: wallet name -> provider
pub type InjectedWeb3 = BTreeMap<String, Arc<dyn WalletProvider>>;

/// Account listing capability of a connected extension
#[async_trait(?Send)]
pub trait AccountsProvider {
    async fn get(&self) -> std::result::Result<Vec<InjectedAccount>, ProviderError>;
}

/// Raw signing capability of a connected extension
#[async_trait(?Send)]
pub trait RawSigner {
    async fn sign_raw(
        &self,
        payload: SignerPayloadRaw,
    ) -> std::result::Result<SignerResult, ProviderError>;
}

/// Raw result of an `enable` handshake
#[derive(Clone)]
pub struct Injected {
    pub accounts: Arc<dyn AccountsProvider>,
    pub signer: Option<Arc<dyn RawSigner>>,
}

/// Connected extension handle
#[derive(Clone)]
pub struct InjectedExtension {
    pub name: String,
    pub version: String,
    pub accounts: Arc<dyn AccountsProvider>,
    pub signer: Option<Arc<dyn RawSigner>>,
}

impl InjectedExtension {
    /// Normalize an `enable` result into an extension handle
    pub fn from_injected(
        name: impl Into<String>,
        version: impl Into<String>,
        injected: Injected,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            accounts: injected.accounts,
            signer: injected.signer,
        }
    }

    /// Check if the extension exposes a raw signer
    pub fn can_sign(&self) -> bool {
        self.signer.is_some()
    }
}

impl fmt::Debug for InjectedExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InjectedExtension")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("can_sign", &self.can_sign())
            .finish()
    }
}

/// `connect(appName)` hook returning a complete extension
#[async_trait(?Send)]
pub trait ConnectHook {
    async fn connect(&self, app_name: &str) -> std::result::Result<InjectedExtension, ProviderError>;
}

/// `enable(appName)` hook returning raw accounts/signer capabilities
#[async_trait(?Send)]
pub trait EnableHook {
    async fn enable(&self, app_name: &str) -> std::result::Result<Injected, ProviderError>;
}

/// Entry of the injected wallet registry
///
/// Providers implement one of the two handshake hooks. Both default to
/// absent, matching extensions that implement neither.
pub trait WalletProvider {
    fn version(&self) -> Option<String> {
        None
    }

    fn connect_hook(&self) -> Option<&dyn ConnectHook> {
        None
    }

    fn enable_hook(&self) -> Option<&dyn EnableHook> {
        None
    }
}

/// Handshake strategy picked for a provider
pub enum ConnectStrategy<'a> {
    Connect(&'a dyn ConnectHook),
    Enable(&'a dyn EnableHook),
}

impl<'a> ConnectStrategy<'a> {
    /// Pick `connect` when available, `enable` otherwise
    pub fn resolve(provider: &'a dyn WalletProvider) -> Option<Self> {
        if let Some(hook) = provider.connect_hook() {
            return Some(ConnectStrategy::Connect(hook));
        }
        provider.enable_hook().map(ConnectStrategy::Enable)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ConnectStrategy::Connect(_) => "connect",
            ConnectStrategy::Enable(_) => "enable",
        }
    }
}

/// Observable connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

struct ConnectingGuard<'a>(&'a AtomicBool);

impl<'a> ConnectingGuard<'a> {
    fn enter(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for ConnectingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Connection to one wallet extension out of an injected registry
pub struct ExtensionConnector {
    injected_web3: InjectedWeb3,
    app_name: String,
    extension: RwLock<Option<InjectedExtension>>,
    connecting: AtomicBool,
}

impl ExtensionConnector {
    /// Create a connector over the injected registry
    ///
    /// Fails when the host exposed no registry at all.
    pub fn new(injected_web3: Option<InjectedWeb3>, app_name: impl Into<String>) -> Result<Self> {
        let injected_web3 = injected_web3.ok_or(Error::NoInjectedRegistry)?;
        Ok(Self {
            injected_web3,
            app_name: app_name.into(),
            extension: RwLock::new(None),
            connecting: AtomicBool::new(false),
        })
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Names of the wallets present in the registry
    pub fn available_wallets(&self) -> impl Iterator<Item = &str> {
        self.injected_web3.keys().map(String::as_str)
    }

    /// Currently connected extension, if any
    pub fn injected_extension(&self) -> Option<InjectedExtension> {
        self.extension.read().clone()
    }

    pub fn state(&self) -> ConnectionState {
        if self.connecting.load(Ordering::SeqCst) {
            ConnectionState::Connecting
        } else if self.extension.read().is_some() {
            ConnectionState::Connected
        } else {
            ConnectionState::Disconnected
        }
    }

    /// Connect to the named extension
    #[instrument(skip(self), fields(app = %self.app_name))]
    pub async fn connect(&self, injected_name: &str) -> Result<InjectedExtension> {
        let wallet = self.injected_web3.get(injected_name).ok_or_else(|| {
            Error::connection(
                ExtensionErrorKind::NoExtension,
                format!("Wallet extension {injected_name} not found"),
            )
        })?;

        let strategy = ConnectStrategy::resolve(wallet.as_ref()).ok_or(Error::NoConnectHook)?;
        let _connecting = ConnectingGuard::enter(&self.connecting);

        let extension = match strategy {
            ConnectStrategy::Connect(hook) => {
                let extension = hook.connect(&self.app_name).await.map_err(classify)?;
                debug!("Connected extension {injected_name}");
                extension
            }
            ConnectStrategy::Enable(hook) => {
                let injected = hook.enable(&self.app_name).await.map_err(classify)?;
                // Talisman hands back a live-looking object after an explicit
                // rejection; only listing accounts reveals it.
                if injected_name == TALISMAN {
                    injected.accounts.get().await.map_err(classify)?;
                }
                debug!("Enabled extension {injected_name}");
                InjectedExtension::from_injected(
                    injected_name,
                    wallet.version().unwrap_or_default(),
                    injected,
                )
            }
        };

        *self.extension.write() = Some(extension.clone());
        Ok(extension)
    }

    /// List substrate accounts of the connected extension
    ///
    /// Ethereum accounts are dropped; order is preserved.
    pub async fn get_accounts(&self) -> Result<Vec<InjectedAccount>> {
        let extension = self.injected_extension().ok_or(Error::NotConnected)?;

        let accounts = extension.accounts.get().await.map_err(|e| {
            error!(error = %e, extension = %extension.name, "Failed to request accounts");
            Error::AccountsRequest(e)
        })?;

        Ok(accounts
            .into_iter()
            .filter(|account| !account.is_ethereum())
            .collect())
    }

    /// Sign `payload` framed as `<Bytes>...</Bytes>`, hex encoded
    pub async fn sign_message_with_wrapped_bytes(
        &self,
        payload: &[u8],
        address: &str,
    ) -> Result<String> {
        let signer = self.signer()?;
        let data = to_hex(&wrap_bytes(payload));
        Self::sign_raw(signer.as_ref(), SignerPayloadRaw::bytes(address, data)).await
    }

    /// Sign a UTF-8 message as-is
    pub async fn sign_message(&self, message: &str, address: &str) -> Result<String> {
        let signer = self.signer()?;
        Self::sign_raw(signer.as_ref(), SignerPayloadRaw::bytes(address, message)).await
    }

    fn signer(&self) -> Result<Arc<dyn RawSigner>> {
        self.extension
            .read()
            .as_ref()
            .and_then(|extension| extension.signer.clone())
            .ok_or(Error::SignerUnavailable)
    }

    async fn sign_raw(signer: &dyn RawSigner, payload: SignerPayloadRaw) -> Result<String> {
        let result = signer.sign_raw(payload).await.map_err(|e| {
            error!(error = %e, "Raw signing failed");
            Error::Signing(e)
        })?;
        Ok(result.signature)
    }
}

impl fmt::Debug for ExtensionConnector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionConnector")
            .field("app_name", &self.app_name)
            .field("wallets", &self.injected_web3.keys().collect::<Vec<_>>())
            .field("extension", &*self.extension.read())
            .finish()
    }
}
