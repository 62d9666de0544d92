//! Adapter over `window.injectedWeb3`
//!
//! Each registry entry is a plain JS object with optional `connect`, `enable`
//! and `version` members. The handshake results expose `accounts.get()` and
//! an optional `signer.signRaw()`; all of them are promise-returning.

use crate::error::{WasmError, js_error_message};
use async_trait::async_trait;
use js_sys::{Function, Object, Promise, Reflect};
use siws_wallet_core::extension::{
    AccountsProvider, ConnectHook, EnableHook, Injected, InjectedExtension, InjectedWeb3,
    RawSigner, WalletProvider,
};
use siws_wallet_core::{InjectedAccount, ProviderError, SignerPayloadRaw, SignerResult};
use std::collections::BTreeMap;
use std::sync::Arc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

type ProviderResult<T> = std::result::Result<T, ProviderError>;

fn provider_error(value: JsValue) -> ProviderError {
    ProviderError::new(js_error_message(&value))
}

fn property(target: &JsValue, name: &str) -> Option<JsValue> {
    Reflect::get(target, &JsValue::from_str(name))
        .ok()
        .filter(|value| !value.is_undefined() && !value.is_null())
}

fn method(target: &JsValue, name: &str) -> Option<Function> {
    property(target, name)?.dyn_into::<Function>().ok()
}

/// Call a bound method and await its (possibly non-promise) result
async fn call(target: &JsValue, function: &Function, args: &[JsValue]) -> ProviderResult<JsValue> {
    let returned = match args {
        [] => function.call0(target),
        [a] => function.call1(target, a),
        [a, b, ..] => function.call2(target, a, b),
    }
    .map_err(provider_error)?;

    JsFuture::from(Promise::resolve(&returned))
        .await
        .map_err(provider_error)
}

struct JsAccounts {
    target: JsValue,
    get: Function,
}

#[async_trait(?Send)]
impl AccountsProvider for JsAccounts {
    async fn get(&self) -> ProviderResult<Vec<InjectedAccount>> {
        let value = call(&self.target, &self.get, &[]).await?;
        serde_wasm_bindgen::from_value(value).map_err(|e| ProviderError::new(e.to_string()))
    }
}

struct JsSigner {
    target: JsValue,
    sign_raw: Function,
}

#[async_trait(?Send)]
impl RawSigner for JsSigner {
    async fn sign_raw(&self, payload: SignerPayloadRaw) -> ProviderResult<SignerResult> {
        let payload = serde_wasm_bindgen::to_value(&payload)
            .map_err(|e| ProviderError::new(e.to_string()))?;
        let value = call(&self.target, &self.sign_raw, &[payload]).await?;
        serde_wasm_bindgen::from_value(value).map_err(|e| ProviderError::new(e.to_string()))
    }
}

/// Read `{ accounts, signer? }` from a handshake result
fn injected_from_js(value: &JsValue) -> ProviderResult<Injected> {
    let accounts = property(value, "accounts")
        .ok_or_else(|| ProviderError::new("Extension did not expose accounts"))?;
    let get = method(&accounts, "get")
        .ok_or_else(|| ProviderError::new("Extension accounts interface has no get()"))?;

    let signer = property(value, "signer").and_then(|target| {
        method(&target, "signRaw").map(|sign_raw| {
            Arc::new(JsSigner { target, sign_raw }) as Arc<dyn RawSigner>
        })
    });

    Ok(Injected {
        accounts: Arc::new(JsAccounts {
            target: accounts,
            get,
        }),
        signer,
    })
}

struct JsConnectHook {
    target: JsValue,
    connect: Function,
}

#[async_trait(?Send)]
impl ConnectHook for JsConnectHook {
    async fn connect(&self, app_name: &str) -> ProviderResult<InjectedExtension> {
        let value = call(&self.target, &self.connect, &[JsValue::from_str(app_name)]).await?;
        let name = property(&value, "name")
            .and_then(|v| v.as_string())
            .unwrap_or_default();
        let version = property(&value, "version")
            .and_then(|v| v.as_string())
            .unwrap_or_default();
        Ok(InjectedExtension::from_injected(
            name,
            version,
            injected_from_js(&value)?,
        ))
    }
}

struct JsEnableHook {
    target: JsValue,
    enable: Function,
}

#[async_trait(?Send)]
impl EnableHook for JsEnableHook {
    async fn enable(&self, app_name: &str) -> ProviderResult<Injected> {
        let value = call(&self.target, &self.enable, &[JsValue::from_str(app_name)]).await?;
        injected_from_js(&value)
    }
}

/// One entry of `window.injectedWeb3`
pub struct JsWalletProvider {
    version: Option<String>,
    connect: Option<JsConnectHook>,
    enable: Option<JsEnableHook>,
}

impl JsWalletProvider {
    pub fn from_js(entry: &JsValue) -> Self {
        Self {
            version: property(entry, "version").and_then(|v| v.as_string()),
            connect: method(entry, "connect").map(|connect| JsConnectHook {
                target: entry.clone(),
                connect,
            }),
            enable: method(entry, "enable").map(|enable| JsEnableHook {
                target: entry.clone(),
                enable,
            }),
        }
    }
}

impl WalletProvider for JsWalletProvider {
    fn version(&self) -> Option<String> {
        self.version.clone()
    }

    fn connect_hook(&self) -> Option<&dyn ConnectHook> {
        self.connect.as_ref().map(|hook| hook as &dyn ConnectHook)
    }

    fn enable_hook(&self) -> Option<&dyn EnableHook> {
        self.enable.as_ref().map(|hook| hook as &dyn EnableHook)
    }
}

/// Build a registry from a JS object keyed by wallet name
pub fn injected_web3_from(value: &JsValue) -> Result<InjectedWeb3, WasmError> {
    let object = value
        .dyn_ref::<Object>()
        .ok_or_else(|| WasmError::InvalidArgument("injectedWeb3 must be an object".into()))?;

    let mut registry: InjectedWeb3 = BTreeMap::new();
    for key in Object::keys(object).iter() {
        let Some(name) = key.as_string() else {
            continue;
        };
        let entry = Reflect::get(value, &key)
            .map_err(|e| WasmError::InvalidArgument(js_error_message(&e)))?;
        registry.insert(name, Arc::new(JsWalletProvider::from_js(&entry)));
    }
    Ok(registry)
}

/// Registry published by the installed extensions, if any
pub fn window_injected_web3() -> Option<InjectedWeb3> {
    let window: JsValue = web_sys::window()?.into();
    let value = property(&window, "injectedWeb3")?;
    injected_web3_from(&value).ok()
}
