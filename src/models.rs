//! Data shapes for one render/run cycle of the panel.
//!
//! Everything here is transient: values are read out of the form right before
//! a run and dropped once the run has settled. Nothing is persisted.

use serde::Serialize;

use crate::constants::{FETCH_RUN_LABEL, TRIGGER_RUN_LABEL};

/// Which webhook workflow the panel is configured for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowMode {
    Fetch,
    Trigger,
}

impl WorkflowMode {
    /// Parse the mode selector's value. Anything unrecognised falls back to
    /// `Trigger`, matching the executor's GET-or-else-POST branching.
    pub fn from_selector(value: &str) -> Self {
        if value == "fetch" {
            WorkflowMode::Fetch
        } else {
            WorkflowMode::Trigger
        }
    }

    pub fn selector_value(&self) -> &'static str {
        match self {
            WorkflowMode::Fetch => "fetch",
            WorkflowMode::Trigger => "trigger",
        }
    }

    /// Resting run-button label for the mode.
    pub fn run_label(&self) -> &'static str {
        match self {
            WorkflowMode::Fetch => FETCH_RUN_LABEL,
            WorkflowMode::Trigger => TRIGGER_RUN_LABEL,
        }
    }
}

/// Mode-specific inputs captured from the form at the start of a run.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionInput {
    Fetch {
        start_date: String,
        end_date: String,
    },
    Trigger {
        payload_text: String,
    },
}

impl ActionInput {
    pub fn mode(&self) -> WorkflowMode {
        match self {
            ActionInput::Fetch { .. } => WorkflowMode::Fetch,
            ActionInput::Trigger { .. } => WorkflowMode::Trigger,
        }
    }
}

/// Everything a run needs from the form, read in one pass.
#[derive(Debug, Clone, PartialEq)]
pub struct FormSnapshot {
    pub url: String,
    pub action: ActionInput,
}

/// Body of a completed response: parsed JSON when possible, otherwise the raw
/// text tagged as such. The fallback is a first-class result, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum RunResult {
    Json(serde_json::Value),
    RawText(String),
}

/// Display shape of the non-JSON fallback.
#[derive(Serialize)]
struct RawBody<'a> {
    text: &'a str,
    note: &'a str,
}

impl RunResult {
    /// Decode a response body: optimistic JSON parse, raw text otherwise.
    pub fn from_body(body: String) -> Self {
        match serde_json::from_str(&body) {
            Ok(value) => RunResult::Json(value),
            Err(_) => RunResult::RawText(body),
        }
    }

    /// Pretty-printed form for the response console.
    pub fn display_text(&self) -> String {
        match self {
            RunResult::Json(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
            RunResult::RawText(text) => {
                let body = RawBody {
                    text,
                    note: "Response was not JSON",
                };
                serde_json::to_string_pretty(&body).unwrap_or_else(|_| text.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_parsing_defaults_to_trigger() {
        assert_eq!(WorkflowMode::from_selector("fetch"), WorkflowMode::Fetch);
        assert_eq!(WorkflowMode::from_selector("trigger"), WorkflowMode::Trigger);
        assert_eq!(WorkflowMode::from_selector("unknown"), WorkflowMode::Trigger);
        assert_eq!(WorkflowMode::from_selector(""), WorkflowMode::Trigger);
    }

    #[test]
    fn run_labels_per_mode() {
        assert_eq!(WorkflowMode::Fetch.run_label(), "Fetch Data");
        assert_eq!(WorkflowMode::Trigger.run_label(), "Trigger Workflow");
    }

    #[test]
    fn body_decoding_prefers_json() {
        let result = RunResult::from_body("[1,2]".to_string());
        assert_eq!(result, RunResult::Json(serde_json::json!([1, 2])));
    }

    #[test]
    fn non_json_body_degrades_to_tagged_text() {
        let result = RunResult::from_body("OK: workflow queued".to_string());
        assert_eq!(result, RunResult::RawText("OK: workflow queued".to_string()));
        assert_eq!(
            result.display_text(),
            "{\n  \"text\": \"OK: workflow queued\",\n  \"note\": \"Response was not JSON\"\n}"
        );
    }

    #[test]
    fn json_display_uses_two_space_indent() {
        let result = RunResult::from_body("{\"a\":1}".to_string());
        assert_eq!(result.display_text(), "{\n  \"a\": 1\n}");
    }
}
