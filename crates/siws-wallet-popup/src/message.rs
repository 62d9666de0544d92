//! Cross-window wire protocol
//!
//! Every message between the application window and the wallet proxy popup
//! is a JSON envelope `{ "event": <name>, "data": <body> }`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Event names exchanged with the wallet proxy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Message {
    /// Parent -> child: sign-in request
    SigninPayload,
    /// Child -> parent: signed response
    WalletProxyResponseMessage,
}

impl Message {
    pub fn as_str(&self) -> &'static str {
        match self {
            Message::SigninPayload => "signinPayload",
            Message::WalletProxyResponseMessage => "WalletProxyResponseMessage",
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wire envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub event: String,
    #[serde(default)]
    pub data: Value,
}

impl Envelope {
    pub fn new(event: impl Into<String>, data: Value) -> Self {
        Self {
            event: event.into(),
            data,
        }
    }

    /// Build an envelope from any serializable body
    pub fn from_payload<T: Serialize>(event: impl Into<String>, payload: &T) -> serde_json::Result<Self> {
        Ok(Self::new(event, serde_json::to_value(payload)?))
    }

    pub fn is(&self, message: Message) -> bool {
        self.event == message.as_str()
    }
}

/// Schema the provider asks the user to delegate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestedSchema {
    pub name: String,
    /// Specific version; latest when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    /// Resolved on-chain schema id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
}

impl RequestedSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            id: None,
        }
    }

    pub fn with_version(mut self, version: u32) -> Self {
        self.version = Some(version);
        self
    }
}

/// Body of the `signinPayload` event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    pub provider_id: String,
    pub required_schemas: Vec<RequestedSchema>,
    pub siws_options: Value,
}

/// Signed payload returned by the wallet proxy
///
/// Its shape belongs to the proxy page, so it is kept as raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WalletProxyResponse(pub Value);

impl WalletProxyResponse {
    pub fn into_inner(self) -> Value {
        self.0
    }

    /// Decode into a concrete response type
    pub fn decode<T: serde::de::DeserializeOwned>(&self) -> serde_json::Result<T> {
        T::deserialize(&self.0)
    }
}

/// Body of the `WalletProxyResponseMessage` event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletProxyResponseEvent {
    pub detail: WalletProxyResponse,
}
