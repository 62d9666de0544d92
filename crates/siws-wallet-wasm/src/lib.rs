//! WASM bindings for SIWS wallet sign-in
//!
//! This crate exposes the wallet connector and the popup sign-in flow to
//! browsers.
//!
//! ## Features
//!
//! - `WalletConnector` - Connect to an injected extension, list accounts, sign
//! - `getLoginOrRegistrationPayload(config)` - Sign in through the wallet proxy popup
//! - `ChainAgnosticAddress` - Parse and format `namespace:reference:address`
//! - Diagnostics from the wallet and popup layers are written to the browser console
//!
//! ## Usage (JavaScript/TypeScript)
//!
//! ```javascript
//! import init, { WalletConnector, getLoginOrRegistrationPayload } from 'siws-wallet-wasm';
//!
//! await init();
//!
//! const connector = new WalletConnector("My App");
//! try {
//!   await connector.connect("polkadot-js");
//! } catch (e) {
//!   if (e.name === "PENDING_AUTH") showApprovalHint();
//! }
//!
//! const payload = await getLoginOrRegistrationPayload({
//!   providerId: "1",
//!   proxyUrl: "https://proxy.example.com",
//!   frequencyRpcUrl: "wss://rpc.example.com",
//! });
//! ```

use serde::Serialize;
use siws_wallet_core::wallets::KNOWN_WALLETS;
use siws_wallet_core::wrap;
use wasm_bindgen::prelude::*;

mod address;
mod browser;
mod connector;
mod error;
mod injected;
mod signin;
mod utils;

pub use address::*;
pub use browser::{BrowserWindowHost, GlooTimer};
pub use connector::*;
pub use error::WasmError;
pub use injected::{JsWalletProvider, injected_web3_from, window_injected_web3};
pub use signin::*;

/// Initialize the WASM module: panic hook and console logging at `INFO`
#[wasm_bindgen(start)]
pub fn init() {
    utils::set_panic_hook();
    utils::init_logging(tracing::Level::INFO);
}

/// Get the SDK version
#[wasm_bindgen(js_name = getVersion)]
pub fn get_version() -> String {
    siws_wallet_core::VERSION.to_string()
}

/// Utility function to convert hex string to bytes
#[wasm_bindgen(js_name = hexToBytes)]
pub fn hex_to_bytes(hex: &str) -> Result<Vec<u8>, JsValue> {
    let hex = hex.strip_prefix("0x").unwrap_or(hex);
    hex::decode(hex).map_err(|e| WasmError::InvalidArgument(format!("Invalid hex: {e}")).into())
}

/// Utility function to convert bytes to hex string
#[wasm_bindgen(js_name = bytesToHex)]
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    wrap::to_hex(bytes)
}

/// Frame bytes as `<Bytes>...</Bytes>`
#[wasm_bindgen(js_name = wrapBytes)]
pub fn wrap_bytes(payload: &[u8]) -> Vec<u8> {
    wrap::wrap_bytes(payload)
}

/// Strip a `<Bytes>` frame, if present
#[wasm_bindgen(js_name = unwrapBytes)]
pub fn unwrap_bytes(payload: &[u8]) -> Vec<u8> {
    wrap::unwrap_bytes(payload).to_vec()
}

#[wasm_bindgen(js_name = isWrapped)]
pub fn is_wrapped(payload: &[u8]) -> bool {
    wrap::is_wrapped(payload)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WalletEntry {
    display_name: &'static str,
    injected_name: &'static str,
    installed: bool,
    download_url: Option<&'static str>,
}

/// Known wallets, flagged with whether each is installed in this browser
#[wasm_bindgen(js_name = knownWallets)]
pub fn known_wallets() -> Result<JsValue, JsValue> {
    let installed = injected::window_injected_web3().unwrap_or_default();
    let entries: Vec<WalletEntry> = KNOWN_WALLETS
        .iter()
        .map(|wallet| WalletEntry {
            display_name: wallet.display_name,
            injected_name: wallet.injected_name,
            installed: installed.contains_key(wallet.injected_name),
            download_url: wallet.browser_download("chrome"),
        })
        .collect();
    error::to_js_result(Ok(entries))
}
