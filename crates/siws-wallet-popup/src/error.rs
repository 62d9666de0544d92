//! Error types for the popup sign-in flow

use thiserror::Error;

/// Popup and messaging errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProxyError {
    /// URL could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Window could not be opened (popup blocker, no host window)
    #[error("Unable to open popup window: {0}")]
    WindowOpen(String),

    /// Messenger used after `dispose()`
    #[error("Window messenger already disposed")]
    Disposed,

    /// Session operation needed a rendered popup
    #[error("No active popup window")]
    NoActivePopup,

    /// Host transport failure while posting a message
    #[error("Transport error: {0}")]
    Transport(String),

    /// Payload (de)serialization failure
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// User closed the popup before a response arrived
    #[error("Sign-in cancelled: popup closed before a response arrived")]
    Cancelled,

    /// Response listener dropped without delivering a response
    #[error("Response channel closed before a response arrived")]
    ResponseChannelClosed,

    /// Invalid sign-in configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ProxyError {
    /// Check if starting a new sign-in attempt may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ProxyError::WindowOpen(_) | ProxyError::Cancelled | ProxyError::Transport(_)
        )
    }

    /// Check if the user abandoned the sign-in
    pub fn is_user_cancelled(&self) -> bool {
        matches!(self, ProxyError::Cancelled)
    }
}

impl From<serde_json::Error> for ProxyError {
    fn from(err: serde_json::Error) -> Self {
        ProxyError::Serialization(err.to_string())
    }
}

impl From<url::ParseError> for ProxyError {
    fn from(err: url::ParseError) -> Self {
        ProxyError::InvalidUrl(err.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ProxyError>;
