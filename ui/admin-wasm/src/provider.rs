//! `window.ethereum` as a [`WalletProvider`].

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use ga_chain_client::WalletProvider;
use gloo_timers::future::TimeoutFuture;
use js_sys::{Function, Promise, Reflect};
use serde::Serialize;
use serde_json::{Value, json};
use std::time::Duration;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

pub struct InjectedProvider {
    ethereum: JsValue,
}

impl InjectedProvider {
    /// `None` when the page has no injected wallet.
    pub fn detect() -> Option<Self> {
        let window = crate::dom::window()?;
        let ethereum = Reflect::get(&window, &JsValue::from_str("ethereum")).ok()?;
        if ethereum.is_undefined() || ethereum.is_null() {
            return None;
        }
        Some(Self { ethereum })
    }
}

#[async_trait(?Send)]
impl WalletProvider for InjectedProvider {
    async fn request(&self, method: &str, params: Value) -> Result<Value> {
        let args = json!({ "method": method, "params": params })
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|err| anyhow!("{method} arguments: {err}"))?;

        let request: Function = Reflect::get(&self.ethereum, &JsValue::from_str("request"))
            .map_err(js_error)?
            .dyn_into()
            .map_err(|_| anyhow!("ethereum.request is not a function"))?;

        let promise: Promise = request
            .call1(&self.ethereum, &args)
            .map_err(js_error)?
            .dyn_into()
            .map_err(|_| anyhow!("ethereum.request did not return a promise"))?;

        let result = JsFuture::from(promise)
            .await
            .map_err(|err| anyhow!("{method}: {:#}", js_error(err)))?;

        if result.is_undefined() || result.is_null() {
            return Ok(Value::Null);
        }
        serde_wasm_bindgen::from_value(result).map_err(|err| anyhow!("{method} result: {err}"))
    }

    async fn pause(&self, delay: Duration) {
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        TimeoutFuture::new(millis).await;
    }
}

/// Wallet errors carry `code` and `message` (4001 is a user rejection).
fn js_error(value: JsValue) -> anyhow::Error {
    let message = Reflect::get(&value, &JsValue::from_str("message"))
        .ok()
        .and_then(|message| message.as_string())
        .unwrap_or_else(|| format!("{value:?}"));
    let code = Reflect::get(&value, &JsValue::from_str("code"))
        .ok()
        .and_then(|code| code.as_f64());

    match code {
        Some(code) => anyhow!("({code}) {message}"),
        None => anyhow!(message),
    }
}
