//! Sign-in configuration
//!
//! [`SignInConfig`] is read by the popup session when a sign-in starts. It is
//! serde-compatible with the camelCase object a web page would pass in.

use crate::error::{ProxyError, Result};
use crate::message::{RequestedSchema, SignInRequest};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use url::Url;

/// Configuration for one sign-in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInConfig {
    /// Provider (application) id registered on chain
    pub provider_id: String,
    /// Base URL of the wallet proxy site
    pub proxy_url: String,
    /// Chain RPC endpoint handed to the proxy
    pub frequency_rpc_url: String,
    /// Schemas the user is asked to delegate
    #[serde(default)]
    pub schemas: Vec<RequestedSchema>,
    /// Opaque SIWS options forwarded to the proxy
    #[serde(default = "empty_object")]
    pub siws_options: Value,
}

fn empty_object() -> Value {
    Value::Object(Default::default())
}

impl SignInConfig {
    pub fn new(
        provider_id: impl Into<String>,
        proxy_url: impl Into<String>,
        frequency_rpc_url: impl Into<String>,
    ) -> Self {
        Self {
            provider_id: provider_id.into(),
            proxy_url: proxy_url.into(),
            frequency_rpc_url: frequency_rpc_url.into(),
            schemas: Vec::new(),
            siws_options: empty_object(),
        }
    }

    /// Load from a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_schema(mut self, schema: RequestedSchema) -> Self {
        self.schemas.push(schema);
        self
    }

    pub fn with_schemas(mut self, schemas: impl IntoIterator<Item = RequestedSchema>) -> Self {
        self.schemas.extend(schemas);
        self
    }

    pub fn with_siws_options(mut self, options: Value) -> Self {
        self.siws_options = options;
        self
    }

    /// Check that both URLs parse and a provider id is set
    pub fn validate(&self) -> Result<()> {
        if self.provider_id.trim().is_empty() {
            return Err(ProxyError::InvalidConfig("providerId is required".into()));
        }
        Url::parse(&self.proxy_url)?;
        Url::parse(&self.frequency_rpc_url)?;
        Ok(())
    }

    /// Body of the `signinPayload` event
    pub fn signin_request(&self) -> SignInRequest {
        SignInRequest {
            provider_id: self.provider_id.clone(),
            required_schemas: self.schemas.clone(),
            siws_options: self.siws_options.clone(),
        }
    }
}

/// Popup window geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowFeatures {
    pub width: u32,
    pub height: u32,
    pub screen_x: i32,
    pub screen_y: i32,
}

impl Default for WindowFeatures {
    fn default() -> Self {
        Self {
            width: 600,
            height: 800,
            screen_x: 400,
            screen_y: 100,
        }
    }
}

impl fmt::Display for WindowFeatures {
    // browsers split features on commas and whitespace alike
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "width={}, height={} screenX={} screenY={}",
            self.width, self.height, self.screen_x, self.screen_y
        )
    }
}

/// Interval of the popup-closed check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollInterval(Duration);

impl PollInterval {
    pub const DEFAULT_MILLIS: u64 = 500;

    pub fn from_millis(millis: u64) -> Self {
        Self(Duration::from_millis(millis))
    }

    pub fn as_duration(&self) -> Duration {
        self.0
    }
}

impl Default for PollInterval {
    fn default() -> Self {
        Self::from_millis(Self::DEFAULT_MILLIS)
    }
}

impl From<Duration> for PollInterval {
    fn from(duration: Duration) -> Self {
        Self(duration)
    }
}
