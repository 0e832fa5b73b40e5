//! The webhook run panel: a self-mounting modal with a launcher button, a
//! mode-dependent config area and a response console.
//!
//! `init` builds the static skeleton once and wires the stable listeners; the
//! config area is re-rendered from scratch on every mode change, so anything
//! inside it (currently the Format JSON button) gets its listener re-attached
//! by `render`.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, MouseEvent};

use crate::components::modal;
use crate::constants::{
    CLOSE_BUTTON_ID, CONFIG_AREA_ID, END_DATE_ID, FORMAT_JSON_BTN_ID, MODE_SELECT_ID,
    OPEN_BUTTON_ID, PANEL_ID, PAYLOAD_INPUT_ID, PAYLOAD_PLACEHOLDER, REGION_SELECT_ID,
    RESPONSE_LOG_ID, RUN_BUTTON_ID, SAVE_CHECKBOX_ID, SAVE_OPTION_ID, START_DATE_ID,
    TARGET_REGIONS, URL_INPUT_ID,
};
use crate::dom_utils;
use crate::executor;
use crate::models::WorkflowMode;
use crate::network::FetchTransport;
use crate::persistence::DashboardStore;
use crate::toast;
use crate::utils::{date_window, format_payload};

/// Mount the panel into the page. Safe to call more than once: the skeleton
/// and its listeners are only created on the first call.
pub fn init(document: &Document) -> Result<(), JsValue> {
    ensure_styles(document);
    toast::ensure_styles(document);

    let panel = ensure_panel(document)?;
    ensure_launcher(document, &panel)?;

    if panel.get_attribute("data-wired").is_none() {
        setup_mode_selector(document)?;
        setup_run_button(document)?;
        setup_close_button(document, &panel)?;
        panel.set_attribute("data-wired", "true")?;
    }

    render(document, current_mode(document))?;
    Ok(())
}

/// Get-or-create the panel's modal and its static skeleton. Idempotent: an
/// existing skeleton (detected by the URL input's id) is left alone.
pub fn ensure_panel(document: &Document) -> Result<Element, JsValue> {
    let (panel, content) = modal::ensure_modal(document, PANEL_ID)?;
    if dom_utils::element(document, URL_INPUT_ID).is_none() {
        build_skeleton(&content)?;
    }
    Ok(panel)
}

/// Mode currently picked in the selector.
pub fn current_mode(document: &Document) -> WorkflowMode {
    WorkflowMode::from_selector(&dom_utils::select_value(document, MODE_SELECT_ID))
}

/// Re-render the mode-dependent parts of the panel: the config area, the save
/// row visibility and the run button label. Fetch mode defaults its date
/// range to the last week each time it is rendered.
pub fn render(document: &Document, mode: WorkflowMode) -> Result<(), JsValue> {
    // Nothing to render into means nothing to do.
    let config = match dom_utils::element(document, CONFIG_AREA_ID) {
        Some(el) => el,
        None => return Ok(()),
    };

    match mode {
        WorkflowMode::Fetch => {
            let (start_date, end_date) = date_window();
            config.set_inner_html(&format!(
                "<p class='webhook-hint'>Sends a GET request with startDate and endDate query parameters. The response is shown below and can optionally be saved to a dashboard region.</p>\
                 <div class='webhook-date-grid'>\
                   <div><label class='block mb-2'>Start Date</label>\
                     <input class='input w-full' id='{start_id}' type='date' value='{start_date}' /></div>\
                   <div><label class='block mb-2'>End Date</label>\
                     <input class='input w-full' id='{end_id}' type='date' value='{end_date}' /></div>\
                 </div>",
                start_id = START_DATE_ID,
                end_id = END_DATE_ID,
                start_date = start_date,
                end_date = end_date,
            ));
        }
        WorkflowMode::Trigger => {
            config.set_inner_html(&format!(
                "<p class='webhook-hint'>Posts a JSON payload to the webhook to start a workflow.</p>\
                 <label class='block mb-2'>JSON Payload</label>\
                 <textarea class='input w-full' id='{payload_id}' rows='6' placeholder='{placeholder}'></textarea>\
                 <div class='webhook-payload-tools'>\
                   <button class='btn' id='{format_id}'>Format JSON</button>\
                 </div>",
                payload_id = PAYLOAD_INPUT_ID,
                placeholder = PAYLOAD_PLACEHOLDER,
                format_id = FORMAT_JSON_BTN_ID,
            ));
            // Recreated by the innerHTML write above, so re-wire it.
            setup_format_button(document)?;
        }
    }

    if let Some(save_row) = dom_utils::element(document, SAVE_OPTION_ID) {
        match mode {
            WorkflowMode::Fetch => dom_utils::show(&save_row),
            WorkflowMode::Trigger => dom_utils::hide(&save_row),
        }
    }

    if let Some(btn) = dom_utils::button(document, RUN_BUTTON_ID) {
        btn.set_text_content(Some(mode.run_label()));
    }

    Ok(())
}

/// One-time static markup: everything except the per-mode config area.
fn build_skeleton(content: &Element) -> Result<(), JsValue> {
    let region_options: String = TARGET_REGIONS
        .iter()
        .map(|(value, label)| format!("<option value='{}'>{}</option>", value, label))
        .collect();

    content.set_inner_html(&format!(
        "<div class='modal-header'><h2>Webhook Integration</h2>\
           <span class='close' id='{close_id}'>&times;</span></div>\
         <div class='modal-body'>\
           <label class='block mb-2'>Webhook URL</label>\
           <input class='input w-full mb-4' id='{url_id}' type='text' placeholder='https://example.com/webhook/...' />\
           <label class='block mb-2'>Mode</label>\
           <select class='input w-full mb-4' id='{mode_id}'>\
             <option value='fetch'>Fetch Data (GET)</option>\
             <option value='trigger'>Trigger Workflow (POST)</option>\
           </select>\
           <div id='{config_id}'></div>\
           <div id='{save_id}' class='webhook-save-row'>\
             <label><input type='checkbox' id='{save_checkbox_id}' /> Save response to database</label>\
             <select class='input w-full' id='{region_id}'>{region_options}</select>\
           </div>\
         </div>\
         <div class='modal-buttons'>\
           <button class='btn-primary' id='{run_id}'>Fetch Data</button>\
         </div>\
         <pre id='{log_id}' class='webhook-console'></pre>",
        close_id = CLOSE_BUTTON_ID,
        url_id = URL_INPUT_ID,
        mode_id = MODE_SELECT_ID,
        config_id = CONFIG_AREA_ID,
        save_id = SAVE_OPTION_ID,
        save_checkbox_id = SAVE_CHECKBOX_ID,
        region_id = REGION_SELECT_ID,
        region_options = region_options,
        run_id = RUN_BUTTON_ID,
        log_id = RESPONSE_LOG_ID,
    ));

    Ok(())
}

/// Fixed launcher button in the page corner that opens the panel. Skipped
/// when the host page already provides one with the same id.
fn ensure_launcher(document: &Document, panel: &Element) -> Result<(), JsValue> {
    if document.get_element_by_id(OPEN_BUTTON_ID).is_some() {
        return Ok(());
    }

    let btn = document.create_element("button")?;
    btn.set_id(OPEN_BUTTON_ID);
    btn.set_class_name("btn-primary webhook-launcher");
    btn.set_text_content(Some("Webhook Panel"));
    document
        .body()
        .ok_or_else(|| JsValue::from_str("No body found"))?
        .append_child(&btn)?;

    let panel = panel.clone();
    let cb = Closure::<dyn FnMut(_)>::wrap(Box::new(move |_e: MouseEvent| {
        modal::show(&panel);
    }));
    btn.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())?;
    cb.forget();

    Ok(())
}

fn setup_mode_selector(document: &Document) -> Result<(), JsValue> {
    if let Some(select) = dom_utils::select(document, MODE_SELECT_ID) {
        let document = document.clone();
        let cb = Closure::<dyn FnMut(_)>::wrap(Box::new(move |_e: Event| {
            let mode = current_mode(&document);
            if let Err(err) = render(&document, mode) {
                web_sys::console::error_1(&format!("Failed to render panel: {:?}", err).into());
            }
        }));
        select.add_event_listener_with_callback("change", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }
    Ok(())
}

fn setup_run_button(document: &Document) -> Result<(), JsValue> {
    if let Some(btn) = dom_utils::button(document, RUN_BUTTON_ID) {
        let document = document.clone();
        let cb = Closure::<dyn FnMut(_)>::wrap(Box::new(move |_e: MouseEvent| {
            let document = document.clone();
            wasm_bindgen_futures::spawn_local(async move {
                executor::execute_run(&document, &FetchTransport, &DashboardStore).await;
            });
        }));
        btn.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }
    Ok(())
}

fn setup_close_button(document: &Document, panel: &Element) -> Result<(), JsValue> {
    if let Some(close_btn) = dom_utils::element(document, CLOSE_BUTTON_ID) {
        let panel = panel.clone();
        let cb = Closure::<dyn FnMut(_)>::wrap(Box::new(move |_e: MouseEvent| {
            modal::hide(&panel);
        }));
        close_btn.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }
    Ok(())
}

/// Wire the Format JSON button inside the trigger config area. A parse
/// failure leaves the textarea untouched and surfaces a toast instead.
fn setup_format_button(document: &Document) -> Result<(), JsValue> {
    if let Some(btn) = dom_utils::button(document, FORMAT_JSON_BTN_ID) {
        let document = document.clone();
        let cb = Closure::<dyn FnMut(_)>::wrap(Box::new(move |_e: MouseEvent| {
            let textarea = match dom_utils::textarea(&document, PAYLOAD_INPUT_ID) {
                Some(el) => el,
                None => return,
            };
            match format_payload(&textarea.value()) {
                Ok(pretty) => textarea.set_value(&pretty),
                Err(err) => toast::error(&format!("Invalid JSON: {}", err)),
            }
        }));
        btn.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }
    Ok(())
}

/// Inject the panel stylesheet once per page.
fn ensure_styles(document: &Document) {
    if document.get_element_by_id("webhook-panel-styles").is_some() {
        return;
    }

    let css = "
.modal{position:fixed;inset:0;background:rgba(0,0,0,.45);display:flex;align-items:center;justify-content:center;z-index:9000;font-family:Arial,Helvetica,sans-serif}
.modal.hidden{display:none}
.modal-content{background:#fff;border-radius:6px;max-width:560px;width:92%;max-height:85vh;overflow-y:auto;padding-bottom:16px}
.modal-header{display:flex;align-items:center;justify-content:space-between;padding:12px 16px;border-bottom:1px solid #e5e7eb}
.modal-header h2{margin:0;font-size:18px}
.modal-header .close{cursor:pointer;font-size:22px;line-height:1}
.modal-body{padding:16px}
.modal-buttons{padding:0 16px;display:flex;justify-content:flex-end;gap:8px}
.block{display:block}
.mb-2{margin-bottom:8px}
.mb-4{margin-bottom:16px}
.w-full{width:100%}
.input{padding:8px;border:1px solid #d1d5db;border-radius:4px;box-sizing:border-box;font-family:inherit}
.btn{padding:8px 14px;border:1px solid #d1d5db;border-radius:4px;background:#f9fafb;cursor:pointer}
.btn-primary{padding:8px 14px;border:none;border-radius:4px;background:#2563eb;color:#fff;cursor:pointer}
.btn-primary:disabled{opacity:.6;cursor:default}
.webhook-launcher{position:fixed;bottom:16px;right:16px;z-index:8999}
.webhook-hint{background:#eff6ff;border:1px solid #bfdbfe;border-radius:4px;padding:8px 12px;font-size:13px;color:#1e40af;margin:0 0 16px}
.webhook-date-grid{display:grid;grid-template-columns:1fr 1fr;gap:12px;margin-bottom:16px}
.webhook-payload-tools{margin:8px 0 16px;display:flex;justify-content:flex-end}
.webhook-save-row{display:flex;flex-direction:column;gap:8px}
.webhook-console{background:#111827;color:#d1d5db;border-radius:4px;margin:16px 16px 0;padding:12px;min-height:72px;max-height:240px;overflow:auto;white-space:pre-wrap;word-break:break-word;font-size:12px}
.hidden{display:none}
";

    let style = match document.create_element("style") {
        Ok(el) => el,
        Err(_) => return,
    };
    style.set_id("webhook-panel-styles");
    style.set_text_content(Some(css));
    if let Ok(Some(head)) = document.query_selector("head") {
        let _ = head.append_child(&style);
    } else if let Some(body) = document.body() {
        let _ = body.append_child(&style);
    }
}
