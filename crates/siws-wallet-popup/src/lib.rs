//! # SIWS Wallet Popup
//!
//! Popup-based sign-in against a wallet proxy site.
//!
//! ## Features
//!
//! - **Window Messenger**: Typed `{event, data}` envelopes over a child window,
//!   with origin checking on every inbound message
//! - **Popup Sign-In**: One caller-owned session per sign-in transaction,
//!   cancelled when the user closes the popup
//! - **Pluggable Hosts**: The browser is one [`WindowHost`]; the in-memory
//!   [`MemoryWindowHost`] scripts the proxy page for tests and simulations
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use siws_wallet_popup::{MemoryWindowHost, PopupSignIn, SignInConfig, TokioTimer};
//!
//! let config = SignInConfig::new("1", "https://proxy.example.com", "ws://localhost:9944");
//! let mut session = PopupSignIn::new(MemoryWindowHost::new(), TokioTimer, config);
//!
//! let payload = session.get_login_or_registration_payload().await?;
//! ```

pub mod config;
pub mod error;
pub mod message;
pub mod messenger;
pub mod popup;
pub mod timer;

pub use config::{PollInterval, SignInConfig, WindowFeatures};
pub use error::{ProxyError, Result};
pub use message::{
    Envelope, Message, RequestedSchema, SignInRequest, WalletProxyResponse,
    WalletProxyResponseEvent,
};
pub use messenger::{
    ChildWindow, InboundMessage, MemoryWindowHandle, MemoryWindowHost, MessageSink, WindowHost,
    WindowMessenger,
};
pub use popup::{PopupSignIn, signin_url};
pub use timer::Timer;

#[cfg(feature = "runtime")]
pub use timer::TokioTimer;
