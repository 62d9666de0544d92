//! Error types for wallet connection and identity operations

use std::fmt;
use thiserror::Error;

/// Result type alias for wallet operations
pub type Result<T> = std::result::Result<T, Error>;

/// Classified reason for a failed extension connection
///
/// Callers branch on this to show tailored guidance, e.g. "waiting for
/// extension approval" for [`ExtensionErrorKind::PendingAuth`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtensionErrorKind {
    /// Unclassified extension failure
    Unknown,
    /// The named wallet is not present in the injected registry
    NoExtension,
    /// The extension is still waiting for the user to authorize the app
    PendingAuth,
    /// The user or the extension denied access
    Unauthorized,
    /// Access was granted but no accounts were exposed
    NoAccountsAuthorized,
}

impl ExtensionErrorKind {
    /// Check if a caller may reasonably retry the connection
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ExtensionErrorKind::PendingAuth | ExtensionErrorKind::Unknown
        )
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            ExtensionErrorKind::Unknown => "UNKNOWN",
            ExtensionErrorKind::NoExtension => "NO_EXTENSION",
            ExtensionErrorKind::PendingAuth => "PENDING_AUTH",
            ExtensionErrorKind::Unauthorized => "UNAUTHORIZED",
            ExtensionErrorKind::NoAccountsAuthorized => "NO_ACCOUNTS_AUTHORIZED",
        }
    }
}

impl fmt::Display for ExtensionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Failure reported by a third-party wallet extension
///
/// Extensions only give us a message; its wording is what the connector
/// classifies.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ProviderError {
    message: String,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors that can occur while connecting to wallets or building identities
#[derive(Debug, Error)]
pub enum Error {
    // ============ Extension Errors ============
    /// No injected wallet registry was available at construction
    #[error("No web3 extensions detected on window")]
    NoInjectedRegistry,

    /// Classified connection failure
    #[error("{message}")]
    Connection {
        kind: ExtensionErrorKind,
        message: String,
        #[source]
        source: Option<ProviderError>,
    },

    /// The provider exposes neither a connect nor an enable hook
    #[error("No connect(..) or enable(...) hook found")]
    NoConnectHook,

    /// An operation needed a connected extension
    #[error("Wallet extension connection not found")]
    NotConnected,

    /// The extension failed to list accounts
    #[error("Failed to request accounts")]
    AccountsRequest(#[source] ProviderError),

    /// The connected extension has no raw signer
    #[error("Unable to access signer interface of extension")]
    SignerUnavailable,

    /// The raw signer rejected or failed the request
    #[error("Signing failed")]
    Signing(#[source] ProviderError),

    // ============ Identity Errors ============
    /// Malformed chain-agnostic identifier
    #[error("Invalid chain-agnostic identifier: {0}")]
    InvalidFormat(String),

    /// Address segment missing from a chain-agnostic address
    #[error("No address supplied")]
    MissingAddress,
}

impl Error {
    /// Build a classified connection error without an upstream cause
    pub fn connection(kind: ExtensionErrorKind, message: impl Into<String>) -> Self {
        Error::Connection {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Classified kind, if this is a connection error
    pub fn extension_kind(&self) -> Option<ExtensionErrorKind> {
        match self {
            Error::Connection { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        self.extension_kind()
            .is_some_and(|kind| kind.is_retryable())
    }
}
