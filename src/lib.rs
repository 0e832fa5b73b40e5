//! Browser-side webhook run panel.
//!
//! Compiled to wasm and loaded by the dashboard page. On start it mounts a
//! launcher button plus a modal panel that can fire a webhook in two modes
//! (fetch a date range via GET, trigger a workflow via POST), shows the raw
//! response and can hand array-shaped data to the page's `saveToDatabase`
//! collaborator.

use wasm_bindgen::prelude::*;

mod components;
mod constants;
mod dom_utils;
mod executor;
mod models;
mod network;
mod persistence;
mod toast;
mod utils;


// Main entry point for the WASM module
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    // Initialize better panic messages
    console_error_panic_hook::set_once();

    let window = web_sys::window().expect("no global `window` exists");
    let document = window.document().expect("should have a document on window");

    components::webhook_panel::init(&document)?;

    web_sys::console::log_1(&"Webhook panel initialized".into());
    Ok(())
}
