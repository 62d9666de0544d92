//! JS entry points for the popup sign-in flow

use crate::browser::{BrowserWindowHost, GlooTimer};
use crate::error::{WasmError, to_js_result};
use siws_wallet_popup::{PopupSignIn, SignInConfig};
use tracing::info;
use wasm_bindgen::prelude::*;

/// Open the wallet proxy popup and resolve with its signed payload
///
/// `config` is `{ providerId, proxyUrl, frequencyRpcUrl, schemas?, siwsOptions? }`.
/// Rejects with name `CANCELLED` when the user closes the popup.
#[wasm_bindgen(js_name = getLoginOrRegistrationPayload)]
pub async fn get_login_or_registration_payload(config: JsValue) -> Result<JsValue, JsValue> {
    let result = async {
        let config: SignInConfig = serde_wasm_bindgen::from_value(config)?;
        config.validate()?;

        let host = BrowserWindowHost::new().ok_or(WasmError::NoWindow)?;
        let mut session = PopupSignIn::new(host, GlooTimer, config);
        let response = session.get_login_or_registration_payload().await?;

        info!("Wallet proxy sign-in completed");
        Ok::<_, WasmError>(response.into_inner())
    }
    .await;

    to_js_result(result)
}

/// Popup URL for a proxy site and chain RPC endpoint
#[wasm_bindgen(js_name = signinUrl)]
pub fn signin_url(proxy_url: &str, frequency_rpc_url: &str) -> String {
    siws_wallet_popup::signin_url(proxy_url, frequency_rpc_url)
}
