//! Utility helpers shared across the panel.

use chrono::{Duration, Utc};
use unicode_segmentation::UnicodeSegmentation;
use wasm_bindgen::{JsCast, JsValue};

use crate::constants::FETCH_WINDOW_DAYS;

/// Truncate text to at most `max_graphemes` user-perceived characters so we
/// never slice through multi-byte characters or emoji sequences. An ellipsis
/// is appended only when something was actually cut.
pub fn truncate_preview(text: &str, max_graphemes: usize) -> String {
    let graphemes: Vec<&str> = text.graphemes(true).collect();

    if graphemes.len() <= max_graphemes {
        text.to_string()
    } else {
        let truncated: String = graphemes[..max_graphemes].concat();
        format!("{}...", truncated)
    }
}

/// Default fetch-mode date range: `(today - FETCH_WINDOW_DAYS, today)` in
/// `YYYY-MM-DD` form, UTC.
pub fn date_window() -> (String, String) {
    let today = Utc::now().date_naive();
    let start = today - Duration::days(FETCH_WINDOW_DAYS);
    (
        start.format("%Y-%m-%d").to_string(),
        today.format("%Y-%m-%d").to_string(),
    )
}

/// Parse then re-serialize payload text with 2-space indentation. On parse
/// failure the parser's message is returned so the caller can surface it; the
/// field content itself is left for the caller to keep untouched.
pub fn format_payload(raw: &str) -> Result<String, String> {
    let value: serde_json::Value = serde_json::from_str(raw).map_err(|e| e.to_string())?;
    Ok(serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string()))
}

/// Render a thrown/rejected JS value as a plain error message, preferring the
/// `message` field of `Error` objects like the console does.
pub fn js_error_message(err: JsValue) -> String {
    if let Some(error) = err.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    err.as_string().unwrap_or_else(|| format!("{:?}", err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_preview_leaves_short_text_verbatim() {
        assert_eq!(truncate_preview("{\"a\":1}", 50), "{\"a\":1}");
        assert_eq!(truncate_preview("", 50), "");
    }

    #[test]
    fn truncate_preview_cuts_and_marks_long_text() {
        let long = "x".repeat(60);
        let preview = truncate_preview(&long, 50);
        assert_eq!(preview.len(), 53);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn truncate_preview_counts_graphemes_not_bytes() {
        // Each emoji is one user-perceived character but several bytes.
        let text = "🎉🎉🎉🎉";
        assert_eq!(truncate_preview(text, 4), text);
        assert_eq!(truncate_preview(text, 2), "🎉🎉...");
    }

    #[test]
    fn date_window_spans_exactly_seven_days() {
        let (start, end) = date_window();
        let start = chrono::NaiveDate::parse_from_str(&start, "%Y-%m-%d").unwrap();
        let end = chrono::NaiveDate::parse_from_str(&end, "%Y-%m-%d").unwrap();
        assert_eq!(end - start, Duration::days(7));
    }

    #[test]
    fn format_payload_pretty_prints_with_two_space_indent() {
        assert_eq!(format_payload("{\"a\":1}").unwrap(), "{\n  \"a\": 1\n}");
    }

    #[test]
    fn format_payload_reports_the_parser_message() {
        let err = format_payload("not json").unwrap_err();
        assert!(!err.is_empty());
        assert!(err.contains("expected"), "unexpected parser message: {}", err);
    }
}
