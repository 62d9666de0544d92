//! WASM-compatible error types

use siws_wallet_core::ExtensionErrorKind;
use siws_wallet_popup::ProxyError;
use thiserror::Error;
use wasm_bindgen::prelude::*;

/// Errors that can occur in WASM operations
#[derive(Debug, Error)]
pub enum WasmError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("No browser window available")]
    NoWindow,

    /// Classified extension failure
    #[error("{message}")]
    Extension {
        kind: ExtensionErrorKind,
        message: String,
    },

    #[error("{0}")]
    Core(String),

    #[error("{message}")]
    Proxy { message: String, cancelled: bool },
}

impl WasmError {
    /// Stable code exposed to JavaScript as the error's `name`
    pub fn code(&self) -> &'static str {
        match self {
            WasmError::InvalidArgument(_) => "INVALID_ARGUMENT",
            WasmError::Serialization(_) | WasmError::Deserialization(_) => "SERIALIZATION",
            WasmError::NoWindow => "NO_WINDOW",
            WasmError::Extension { kind, .. } => kind.code(),
            WasmError::Core(_) => "WALLET_ERROR",
            WasmError::Proxy { cancelled: true, .. } => "CANCELLED",
            WasmError::Proxy { .. } => "PROXY_ERROR",
        }
    }
}

impl From<WasmError> for JsValue {
    fn from(err: WasmError) -> Self {
        let js_error = js_sys::Error::new(&err.to_string());
        js_error.set_name(err.code());
        js_error.into()
    }
}

impl From<siws_wallet_core::Error> for WasmError {
    fn from(err: siws_wallet_core::Error) -> Self {
        match err.extension_kind() {
            Some(kind) => WasmError::Extension {
                kind,
                message: err.to_string(),
            },
            None => WasmError::Core(err.to_string()),
        }
    }
}

impl From<ProxyError> for WasmError {
    fn from(err: ProxyError) -> Self {
        WasmError::Proxy {
            cancelled: err.is_user_cancelled(),
            message: err.to_string(),
        }
    }
}

impl From<serde_wasm_bindgen::Error> for WasmError {
    fn from(err: serde_wasm_bindgen::Error) -> Self {
        WasmError::Deserialization(err.to_string())
    }
}

impl From<serde_json::Error> for WasmError {
    fn from(err: serde_json::Error) -> Self {
        WasmError::Serialization(err.to_string())
    }
}

/// Convert a Result to JsValue for WASM compatibility
pub fn to_js_result<T: serde::Serialize>(result: Result<T, WasmError>) -> Result<JsValue, JsValue> {
    match result {
        Ok(value) => value
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| WasmError::Serialization(e.to_string()).into()),
        Err(err) => Err(JsValue::from(err)),
    }
}

/// Best-effort message of a thrown JavaScript value
pub fn js_error_message(value: &JsValue) -> String {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    if let Some(message) = value.as_string() {
        return message;
    }
    format!("{value:?}")
}
