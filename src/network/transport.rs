//! Outbound HTTP layer for webhook runs.
//!
//! `RequestPlan` is the fully-built description of the single request a run
//! issues. `RunTransport` is the seam that lets tests drive a run against a
//! fake transport instead of the browser's `fetch`.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, RequestMode, Response};

use crate::utils::js_error_message;

/// One fully-built outbound request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestPlan {
    Get { url: String },
    Post { url: String, body: String },
}

impl RequestPlan {
    pub fn url(&self) -> &str {
        match self {
            RequestPlan::Get { url } => url,
            RequestPlan::Post { url, .. } => url,
        }
    }
}

/// What came back from the transport, before any body decoding.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportReply {
    pub ok: bool,
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

/// Seam over the browser `fetch`.
#[allow(async_fn_in_trait)]
pub trait RunTransport {
    /// Issue the request and return status plus body text. `Err` means the
    /// request never completed (network failure, unusable URL).
    async fn send(&self, plan: &RequestPlan) -> Result<TransportReply, String>;
}

/// Browser `fetch` implementation used outside of tests.
pub struct FetchTransport;

impl RunTransport for FetchTransport {
    async fn send(&self, plan: &RequestPlan) -> Result<TransportReply, String> {
        self.fetch(plan).await.map_err(js_error_message)
    }
}

impl FetchTransport {
    async fn fetch(&self, plan: &RequestPlan) -> Result<TransportReply, JsValue> {
        let opts = RequestInit::new();
        opts.set_mode(RequestMode::Cors);

        match plan {
            RequestPlan::Get { .. } => {
                opts.set_method("GET");
            }
            RequestPlan::Post { body, .. } => {
                opts.set_method("POST");
                let headers = Headers::new()?;
                headers.append("Content-Type", "application/json")?;
                opts.set_headers(&headers);
                opts.set_body(&JsValue::from_str(body));
            }
        }

        let request = Request::new_with_str_and_init(plan.url(), &opts)?;

        let window =
            web_sys::window().ok_or_else(|| JsValue::from_str("no global window exists"))?;
        let resp_value = JsFuture::from(window.fetch_with_request(&request)).await?;
        let resp: Response = resp_value.dyn_into()?;

        let text = JsFuture::from(resp.text()?).await?;
        Ok(TransportReply {
            ok: resp.ok(),
            status: resp.status(),
            status_text: resp.status_text(),
            body: text.as_string().unwrap_or_default(),
        })
    }
}
