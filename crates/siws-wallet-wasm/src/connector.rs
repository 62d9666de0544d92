//! JS bindings for the extension connector

use crate::error::{WasmError, to_js_result};
use crate::injected::{injected_web3_from, window_injected_web3};
use serde::Serialize;
use siws_wallet_core::{ConnectionState, ExtensionConnector, InjectedExtension, wallets};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

/// Summary of a connected extension handed back to JavaScript
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExtensionInfo {
    name: String,
    display_name: String,
    version: String,
    can_sign: bool,
}

impl From<&InjectedExtension> for ExtensionInfo {
    fn from(extension: &InjectedExtension) -> Self {
        Self {
            display_name: wallets::display_name(&extension.name).to_string(),
            name: extension.name.clone(),
            version: extension.version.clone(),
            can_sign: extension.can_sign(),
        }
    }
}

/// Connector to one browser wallet extension
#[wasm_bindgen(js_name = WalletConnector)]
pub struct JsWalletConnector {
    inner: Rc<ExtensionConnector>,
}

#[wasm_bindgen(js_class = WalletConnector)]
impl JsWalletConnector {
    /// Create a connector; `injectedWeb3` defaults to `window.injectedWeb3`
    #[wasm_bindgen(constructor)]
    pub fn new(app_name: String, injected_web3: JsValue) -> Result<JsWalletConnector, JsValue> {
        let registry = if injected_web3.is_undefined() || injected_web3.is_null() {
            window_injected_web3()
        } else {
            Some(injected_web3_from(&injected_web3)?)
        };

        let inner = ExtensionConnector::new(registry, app_name).map_err(WasmError::from)?;
        Ok(Self {
            inner: Rc::new(inner),
        })
    }

    #[wasm_bindgen(getter, js_name = appName)]
    pub fn app_name(&self) -> String {
        self.inner.app_name().to_string()
    }

    #[wasm_bindgen(getter, js_name = availableWallets)]
    pub fn available_wallets(&self) -> Vec<String> {
        self.inner.available_wallets().map(String::from).collect()
    }

    /// `disconnected`, `connecting` or `connected`
    #[wasm_bindgen(getter)]
    pub fn state(&self) -> String {
        match self.inner.state() {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
        }
        .to_string()
    }

    /// Connect to the named extension; rejects with a classified error
    pub fn connect(&self, injected_name: String) -> js_sys::Promise {
        let inner = Rc::clone(&self.inner);
        future_to_promise(async move {
            let result = inner
                .connect(&injected_name)
                .await
                .map(|extension| ExtensionInfo::from(&extension))
                .map_err(WasmError::from);
            to_js_result(result)
        })
    }

    /// Substrate accounts of the connected extension
    #[wasm_bindgen(js_name = getAccounts)]
    pub fn get_accounts(&self) -> js_sys::Promise {
        let inner = Rc::clone(&self.inner);
        future_to_promise(async move {
            to_js_result(inner.get_accounts().await.map_err(WasmError::from))
        })
    }

    /// Sign `payload` wrapped in `<Bytes>` tags
    #[wasm_bindgen(js_name = signMessageWithWrappedBytes)]
    pub fn sign_message_with_wrapped_bytes(&self, payload: String, address: String) -> js_sys::Promise {
        let inner = Rc::clone(&self.inner);
        future_to_promise(async move {
            let result = inner
                .sign_message_with_wrapped_bytes(payload.as_bytes(), &address)
                .await
                .map_err(WasmError::from);
            to_js_result(result)
        })
    }

    #[wasm_bindgen(js_name = signMessage)]
    pub fn sign_message(&self, message: String, address: String) -> js_sys::Promise {
        let inner = Rc::clone(&self.inner);
        future_to_promise(async move {
            to_js_result(inner.sign_message(&message, &address).await.map_err(WasmError::from))
        })
    }
}
