//! JS bindings for chain-agnostic identities

use crate::error::WasmError;
use siws_wallet_core::{ChainAgnosticAddress, ChainAgnosticId, PolkadotAddress};
use wasm_bindgen::prelude::*;

/// `namespace:reference:address` identity
#[wasm_bindgen(js_name = ChainAgnosticAddress)]
#[derive(Debug, Clone)]
pub struct JsChainAgnosticAddress {
    inner: ChainAgnosticAddress,
}

#[wasm_bindgen(js_class = ChainAgnosticAddress)]
impl JsChainAgnosticAddress {
    #[wasm_bindgen(constructor)]
    pub fn new(
        namespace: String,
        reference: String,
        address: String,
    ) -> Result<JsChainAgnosticAddress, JsValue> {
        let inner = ChainAgnosticAddress::new(namespace, reference, address)
            .map_err(WasmError::from)?;
        Ok(Self { inner })
    }

    /// Parse `namespace:reference:address`
    #[wasm_bindgen(js_name = fromString)]
    pub fn from_string(value: &str) -> Result<JsChainAgnosticAddress, JsValue> {
        let inner = value
            .parse::<ChainAgnosticAddress>()
            .map_err(WasmError::from)?;
        Ok(Self { inner })
    }

    /// Polkadot address from a genesis hash
    pub fn polkadot(genesis_hash: &str, address: String) -> Result<JsChainAgnosticAddress, JsValue> {
        let inner = PolkadotAddress::new(genesis_hash, address)
            .map_err(WasmError::from)?
            .into_inner();
        Ok(Self { inner })
    }

    #[wasm_bindgen(getter)]
    pub fn namespace(&self) -> String {
        self.inner.chain_id().namespace().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn reference(&self) -> String {
        self.inner.chain_id().reference().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn address(&self) -> String {
        self.inner.address().to_string()
    }

    /// `namespace:reference`
    #[wasm_bindgen(getter, js_name = chainId)]
    pub fn chain_id(&self) -> String {
        self.inner.chain_id().to_string()
    }

    #[wasm_bindgen(js_name = toString)]
    pub fn to_js_string(&self) -> String {
        self.inner.to_string()
    }

    pub fn equals(&self, other: &JsChainAgnosticAddress) -> bool {
        self.inner == other.inner
    }
}

/// Normalize a chain id string (`namespace:reference`)
#[wasm_bindgen(js_name = normalizeChainId)]
pub fn normalize_chain_id(value: &str) -> Result<String, JsValue> {
    let id = value.parse::<ChainAgnosticId>().map_err(WasmError::from)?;
    Ok(id.to_string())
}
