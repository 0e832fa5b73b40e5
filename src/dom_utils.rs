//! Thin helper layer for repetitive DOM operations.
//!
//! The panel treats a missing element as a no-op rather than a panic, so the
//! typed getters return `Option` and the class togglers fail silently.

use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, HtmlButtonElement, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement,
};

/// Remove the `hidden` class so the element becomes visible.
pub fn show(el: &Element) {
    let _ = el.class_list().remove_1("hidden");
}

/// Hide the element by toggling CSS classes.
pub fn hide(el: &Element) {
    let _ = el.class_list().add_1("hidden");
}

pub fn is_hidden(el: &Element) -> bool {
    el.class_list().contains("hidden")
}

/// Fetch an element by id, `None` when absent.
pub fn element(document: &Document, id: &str) -> Option<Element> {
    document.get_element_by_id(id)
}

/// Fetch an `<input>` by id, `None` when absent or of a different type.
pub fn input(document: &Document, id: &str) -> Option<HtmlInputElement> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
}

pub fn select(document: &Document, id: &str) -> Option<HtmlSelectElement> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlSelectElement>().ok())
}

pub fn textarea(document: &Document, id: &str) -> Option<HtmlTextAreaElement> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlTextAreaElement>().ok())
}

pub fn button(document: &Document, id: &str) -> Option<HtmlButtonElement> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok())
}

/// Current value of an `<input>`, empty when the element is absent.
pub fn input_value(document: &Document, id: &str) -> String {
    input(document, id).map(|el| el.value()).unwrap_or_default()
}

/// Current value of a `<select>`, empty when the element is absent.
pub fn select_value(document: &Document, id: &str) -> String {
    select(document, id).map(|el| el.value()).unwrap_or_default()
}

/// Current value of a `<textarea>`, empty when the element is absent.
pub fn textarea_value(document: &Document, id: &str) -> String {
    textarea(document, id)
        .map(|el| el.value())
        .unwrap_or_default()
}

/// Replace the element's text content.
pub fn set_text(el: &Element, text: &str) {
    el.set_text_content(Some(text));
}

/// Append to the element's text content, keeping what is already there.
pub fn append_text(el: &Element, text: &str) {
    let current = el.text_content().unwrap_or_default();
    el.set_text_content(Some(&format!("{}{}", current, text)));
}
