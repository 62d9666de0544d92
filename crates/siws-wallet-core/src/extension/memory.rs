//! In-memory wallet extension for testing and local development
//!
//! [`MemoryWallet`] stands in for a browser-injected extension. It can be
//! scripted to use either handshake hook, to fail any step with a given
//! message, and it records every call so tests can assert which extension
//! APIs were touched.

use super::{
    AccountsProvider, ConnectHook, EnableHook, Injected, InjectedExtension, InjectedWeb3,
    RawSigner, WalletProvider,
};
use crate::ProviderError;
use crate::types::{InjectedAccount, SignerPayloadRaw, SignerResult};
use crate::wrap::to_hex;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Which handshake hook the wallet exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookStyle {
    Connect,
    Enable,
    Neither,
}

#[derive(Debug)]
struct MemoryWalletState {
    name: String,
    style: HookStyle,
    version: Mutex<Option<String>>,
    has_signer: Mutex<bool>,
    accounts: Mutex<Vec<InjectedAccount>>,
    handshake_error: Mutex<Option<ProviderError>>,
    accounts_error: Mutex<Option<ProviderError>>,
    sign_error: Mutex<Option<ProviderError>>,
    signed: Mutex<Vec<SignerPayloadRaw>>,
    hook_calls: AtomicUsize,
    account_calls: AtomicUsize,
}

/// Scriptable in-memory wallet extension
#[derive(Debug, Clone)]
pub struct MemoryWallet {
    state: Arc<MemoryWalletState>,
}

impl MemoryWallet {
    /// Create a wallet exposing the given hook
    pub fn new(name: impl Into<String>, style: HookStyle) -> Self {
        Self {
            state: Arc::new(MemoryWalletState {
                name: name.into(),
                style,
                version: Mutex::new(None),
                has_signer: Mutex::new(true),
                accounts: Mutex::new(Vec::new()),
                handshake_error: Mutex::new(None),
                accounts_error: Mutex::new(None),
                sign_error: Mutex::new(None),
                signed: Mutex::new(Vec::new()),
                hook_calls: AtomicUsize::new(0),
                account_calls: AtomicUsize::new(0),
            }),
        }
    }

    /// Wallet implementing `connect(appName)`
    pub fn connectable(name: impl Into<String>) -> Self {
        Self::new(name, HookStyle::Connect)
    }

    /// Wallet implementing `enable(appName)`
    pub fn enableable(name: impl Into<String>) -> Self {
        Self::new(name, HookStyle::Enable)
    }

    pub fn with_version(self, version: impl Into<String>) -> Self {
        *self.state.version.lock() = Some(version.into());
        self
    }

    pub fn with_accounts(self, accounts: Vec<InjectedAccount>) -> Self {
        *self.state.accounts.lock() = accounts;
        self
    }

    pub fn without_signer(self) -> Self {
        *self.state.has_signer.lock() = false;
        self
    }

    /// Make the handshake hook fail with `message`
    pub fn failing_handshake(self, message: impl Into<String>) -> Self {
        *self.state.handshake_error.lock() = Some(ProviderError::new(message));
        self
    }

    /// Make account listing fail with `message`
    pub fn failing_accounts(self, message: impl Into<String>) -> Self {
        *self.state.accounts_error.lock() = Some(ProviderError::new(message));
        self
    }

    /// Make raw signing fail with `message`
    pub fn failing_signing(self, message: impl Into<String>) -> Self {
        *self.state.sign_error.lock() = Some(ProviderError::new(message));
        self
    }

    pub fn name(&self) -> &str {
        &self.state.name
    }

    /// Number of handshake hook invocations
    pub fn hook_calls(&self) -> usize {
        self.state.hook_calls.load(Ordering::SeqCst)
    }

    /// Number of account list requests
    pub fn account_calls(&self) -> usize {
        self.state.account_calls.load(Ordering::SeqCst)
    }

    /// Payloads received by the raw signer
    pub fn signed_payloads(&self) -> Vec<SignerPayloadRaw> {
        self.state.signed.lock().clone()
    }

    /// Build a registry from several wallets, keyed by name
    pub fn registry(wallets: impl IntoIterator<Item = MemoryWallet>) -> InjectedWeb3 {
        wallets
            .into_iter()
            .map(|wallet| {
                let name = wallet.name().to_string();
                (name, Arc::new(wallet) as Arc<dyn WalletProvider>)
            })
            .collect()
    }

    fn handshake(&self) -> Result<Injected, ProviderError> {
        self.state.hook_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.state.handshake_error.lock().clone() {
            return Err(err);
        }

        let signer = if *self.state.has_signer.lock() {
            Some(Arc::new(self.clone()) as Arc<dyn RawSigner>)
        } else {
            None
        };

        Ok(Injected {
            accounts: Arc::new(self.clone()),
            signer,
        })
    }
}

impl WalletProvider for MemoryWallet {
    fn version(&self) -> Option<String> {
        self.state.version.lock().clone()
    }

    fn connect_hook(&self) -> Option<&dyn ConnectHook> {
        match self.state.style {
            HookStyle::Connect => Some(self),
            _ => None,
        }
    }

    fn enable_hook(&self) -> Option<&dyn EnableHook> {
        match self.state.style {
            HookStyle::Enable => Some(self),
            _ => None,
        }
    }
}

#[async_trait(?Send)]
impl ConnectHook for MemoryWallet {
    async fn connect(&self, _app_name: &str) -> Result<InjectedExtension, ProviderError> {
        let injected = self.handshake()?;
        let version = self.version().unwrap_or_default();
        Ok(InjectedExtension::from_injected(
            self.state.name.clone(),
            version,
            injected,
        ))
    }
}

#[async_trait(?Send)]
impl EnableHook for MemoryWallet {
    async fn enable(&self, _app_name: &str) -> Result<Injected, ProviderError> {
        self.handshake()
    }
}

#[async_trait(?Send)]
impl AccountsProvider for MemoryWallet {
    async fn get(&self) -> Result<Vec<InjectedAccount>, ProviderError> {
        self.state.account_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.state.accounts_error.lock().clone() {
            return Err(err);
        }
        Ok(self.state.accounts.lock().clone())
    }
}

#[async_trait(?Send)]
impl RawSigner for MemoryWallet {
    /// Produces a deterministic pseudo-signature over `address` and `data`;
    /// nothing here is cryptographically meaningful.
    async fn sign_raw(&self, payload: SignerPayloadRaw) -> Result<SignerResult, ProviderError> {
        if let Some(err) = self.state.sign_error.lock().clone() {
            return Err(err);
        }

        let signature = to_hex(format!("{}|{}", payload.address, payload.data).as_bytes());
        let mut signed = self.state.signed.lock();
        signed.push(payload);

        Ok(SignerResult {
            signature,
            id: Some(signed.len() as u64),
        })
    }
}
