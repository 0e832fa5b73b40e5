//! The run lifecycle: validate the form, build the one outbound request,
//! interpret the reply, then maybe bridge the result into a dashboard region.
//!
//! Phases are explicit so every scenario can be driven without a network: the
//! transitions are pure data-to-data steps, and the async driver talks to the
//! DOM through a pluggable transport and store.

use std::fmt;

use serde_json::Value;
use web_sys::{Document, Element};

use crate::constants::{
    END_DATE_ID, ERR_URL_REQUIRED, LOG_INITIALIZING, MODE_SELECT_ID, PAYLOAD_INPUT_ID,
    PAYLOAD_PREVIEW_GRAPHEMES, REGION_SELECT_ID, RESPONSE_LOG_ID, RUNNING_LABEL, RUN_BUTTON_ID,
    SAVE_CHECKBOX_ID, SAVE_OK_TRAILER, SAVE_SHAPE_WARNING, START_DATE_ID, URL_INPUT_ID,
};
use crate::dom_utils;
use crate::models::{ActionInput, FormSnapshot, RunResult, WorkflowMode};
use crate::network::{RequestPlan, RunTransport, TransportReply};
use crate::persistence::{extract_records, RegionStore};
use crate::utils::truncate_preview;

/// Everything that can end a run early, worded the way the console shows it.
#[derive(Debug, Clone, PartialEq)]
pub enum RunError {
    MissingUrl,
    InvalidPayload,
    Http { status: u16, status_text: String },
    Network(String),
    Save(String),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::MissingUrl => write!(f, "Webhook URL is required."),
            RunError::InvalidPayload => write!(f, "Invalid JSON in payload."),
            RunError::Http {
                status,
                status_text,
            } => write!(f, "HTTP Error: {} {}", status, status_text),
            RunError::Network(message) => write!(f, "{}", message),
            RunError::Save(message) => write!(f, "{}", message),
        }
    }
}

/// A form snapshot that passed validation: URL known non-empty, payload
/// parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckedForm {
    pub url: String,
    pub action: CheckedAction,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CheckedAction {
    Fetch {
        start_date: String,
        end_date: String,
    },
    Trigger {
        payload: Value,
    },
}

/// Explicit run lifecycle. A run walks `Validating → Building → InFlight →
/// Completed`, or drops into `Aborted` at the first failed transition. The
/// transitions are total: phases they do not apply to pass through unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum RunPhase {
    Validating(FormSnapshot),
    Building(CheckedForm),
    InFlight(RequestPlan),
    Completed(RunResult),
    Aborted(RunError),
}

impl RunPhase {
    pub fn start(snapshot: FormSnapshot) -> Self {
        RunPhase::Validating(snapshot)
    }

    /// Validating → Building | Aborted. The URL must be non-empty once
    /// trimmed; a trigger payload must parse (empty text means `{}`).
    pub fn validate(self) -> Self {
        let snapshot = match self {
            RunPhase::Validating(snapshot) => snapshot,
            other => return other,
        };

        let url = snapshot.url.trim().to_string();
        if url.is_empty() {
            return RunPhase::Aborted(RunError::MissingUrl);
        }

        let action = match snapshot.action {
            ActionInput::Fetch {
                start_date,
                end_date,
            } => CheckedAction::Fetch {
                start_date,
                end_date,
            },
            ActionInput::Trigger { payload_text } => {
                if payload_text.trim().is_empty() {
                    CheckedAction::Trigger {
                        payload: serde_json::json!({}),
                    }
                } else {
                    match serde_json::from_str(&payload_text) {
                        Ok(payload) => CheckedAction::Trigger { payload },
                        Err(_) => return RunPhase::Aborted(RunError::InvalidPayload),
                    }
                }
            }
        };

        RunPhase::Building(CheckedForm { url, action })
    }

    /// Building → InFlight: the one outbound request this run will issue.
    /// Fetch appends the dates as literal query parameters; trigger posts
    /// the serialized payload.
    pub fn build_plan(self) -> Self {
        let form = match self {
            RunPhase::Building(form) => form,
            other => return other,
        };

        let plan = match form.action {
            CheckedAction::Fetch {
                start_date,
                end_date,
            } => {
                let sep = if form.url.contains('?') { '&' } else { '?' };
                RequestPlan::Get {
                    url: format!(
                        "{}{}startDate={}&endDate={}",
                        form.url, sep, start_date, end_date
                    ),
                }
            }
            CheckedAction::Trigger { payload } => RequestPlan::Post {
                url: form.url,
                body: payload.to_string(),
            },
        };

        RunPhase::InFlight(plan)
    }

    /// InFlight → Completed | Aborted, given what the transport came back
    /// with. A non-JSON body is a first-class result, not an error.
    pub fn interpret_reply(reply: Result<TransportReply, String>) -> Self {
        match reply {
            Ok(reply) if reply.ok => RunPhase::Completed(RunResult::from_body(reply.body)),
            Ok(reply) => RunPhase::Aborted(RunError::Http {
                status: reply.status,
                status_text: reply.status_text,
            }),
            Err(message) => RunPhase::Aborted(RunError::Network(message)),
        }
    }
}

/// Execute one run end to end against the current form state. The run button
/// is put into its busy state for the duration and restored afterwards no
/// matter how the run went.
pub async fn execute_run<T: RunTransport, S: RegionStore>(
    document: &Document,
    transport: &T,
    store: &S,
) {
    let log_el = match dom_utils::element(document, RESPONSE_LOG_ID) {
        Some(el) => el,
        None => return,
    };

    let snapshot = read_snapshot(document);
    let mode = snapshot.action.mode();

    // The URL check happens before the button enters its busy state.
    let phase = RunPhase::start(snapshot).validate();
    if let RunPhase::Aborted(RunError::MissingUrl) = &phase {
        dom_utils::set_text(&log_el, ERR_URL_REQUIRED);
        return;
    }

    let button = dom_utils::button(document, RUN_BUTTON_ID);
    let resting_label = button.as_ref().map(|btn| btn.inner_html());
    if let Some(btn) = &button {
        btn.set_disabled(true);
        btn.set_inner_html(RUNNING_LABEL);
    }
    dom_utils::set_text(&log_el, LOG_INITIALIZING);

    if let Err(err) = run_and_render(document, &log_el, phase, transport, store, mode).await {
        web_sys::console::error_1(&format!("Webhook run error: {}", err).into());
        dom_utils::append_text(&log_el, &format!("\n\n❌ Error: {}", err));
    }

    // Cleanup happens whichever way the run went.
    if let Some(btn) = &button {
        btn.set_disabled(false);
        if let Some(label) = &resting_label {
            btn.set_inner_html(label);
        }
    }
}

async fn run_and_render<T: RunTransport, S: RegionStore>(
    document: &Document,
    log_el: &Element,
    phase: RunPhase,
    transport: &T,
    store: &S,
    mode: WorkflowMode,
) -> Result<(), RunError> {
    let phase = match phase.build_plan() {
        RunPhase::InFlight(plan) => {
            dom_utils::set_text(log_el, &progress_line(&plan));
            let reply = transport.send(&plan).await;
            RunPhase::interpret_reply(reply)
        }
        other => other,
    };

    let result = match phase {
        RunPhase::Completed(result) => result,
        RunPhase::Aborted(err) => return Err(err),
        // validate() and build_plan() leave no other phase standing.
        _ => return Ok(()),
    };

    dom_utils::set_text(log_el, &result.display_text());

    // The save decision is read now, not when the run started.
    if mode == WorkflowMode::Fetch && save_requested(document) {
        bridge_save(document, log_el, &result, store).await?;
    }

    Ok(())
}

/// Console line announcing the request about to go out.
fn progress_line(plan: &RequestPlan) -> String {
    match plan {
        RequestPlan::Get { url } => format!("GET {}...\nWaiting for response...", url),
        RequestPlan::Post { url, body } => format!(
            "POST {}...\nPayload: {}",
            url,
            truncate_preview(body, PAYLOAD_PREVIEW_GRAPHEMES)
        ),
    }
}

fn save_requested(document: &Document) -> bool {
    dom_utils::input(document, SAVE_CHECKBOX_ID)
        .map(|cb| cb.checked())
        .unwrap_or(false)
}

/// Forward the extracted records to the region store and append the outcome
/// to the console. A response without an array (or a missing collaborator)
/// produces a warning instead of a save call; the run still counts as
/// successful.
async fn bridge_save<S: RegionStore>(
    document: &Document,
    log_el: &Element,
    result: &RunResult,
    store: &S,
) -> Result<(), RunError> {
    let records = match result {
        RunResult::Json(value) => extract_records(value),
        RunResult::RawText(_) => None,
    };

    let records = match records {
        Some(records) if store.available() => records,
        _ => {
            dom_utils::append_text(log_el, SAVE_SHAPE_WARNING);
            return Ok(());
        }
    };

    let region = dom_utils::select_value(document, REGION_SELECT_ID);
    dom_utils::append_text(
        log_el,
        &format!("\n\n💾 Saving {} records to {}...", records.len(), region),
    );
    store
        .save(&region, &records, true)
        .await
        .map_err(RunError::Save)?;
    dom_utils::append_text(log_el, SAVE_OK_TRAILER);

    Ok(())
}

/// One pass over the form: everything the run needs, read fresh.
fn read_snapshot(document: &Document) -> FormSnapshot {
    let url = dom_utils::input_value(document, URL_INPUT_ID);
    let mode = WorkflowMode::from_selector(&dom_utils::select_value(document, MODE_SELECT_ID));
    let action = match mode {
        WorkflowMode::Fetch => ActionInput::Fetch {
            start_date: dom_utils::input_value(document, START_DATE_ID),
            end_date: dom_utils::input_value(document, END_DATE_ID),
        },
        WorkflowMode::Trigger => ActionInput::Trigger {
            payload_text: dom_utils::textarea_value(document, PAYLOAD_INPUT_ID),
        },
    };
    FormSnapshot { url, action }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetch_snapshot(url: &str) -> FormSnapshot {
        FormSnapshot {
            url: url.to_string(),
            action: ActionInput::Fetch {
                start_date: "2024-05-01".to_string(),
                end_date: "2024-05-08".to_string(),
            },
        }
    }

    fn trigger_snapshot(url: &str, payload_text: &str) -> FormSnapshot {
        FormSnapshot {
            url: url.to_string(),
            action: ActionInput::Trigger {
                payload_text: payload_text.to_string(),
            },
        }
    }

    fn ok_reply(body: &str) -> TransportReply {
        TransportReply {
            ok: true,
            status: 200,
            status_text: "OK".to_string(),
            body: body.to_string(),
        }
    }

    #[test]
    fn blank_url_aborts_validation() {
        let phase = RunPhase::start(fetch_snapshot("")).validate();
        assert_eq!(phase, RunPhase::Aborted(RunError::MissingUrl));

        let phase = RunPhase::start(fetch_snapshot(" \t  ")).validate();
        assert_eq!(phase, RunPhase::Aborted(RunError::MissingUrl));
    }

    #[test]
    fn validation_trims_the_url() {
        let phase = RunPhase::start(fetch_snapshot("  https://hooks.example/run  ")).validate();
        match phase {
            RunPhase::Building(form) => assert_eq!(form.url, "https://hooks.example/run"),
            other => panic!("expected Building, got {:?}", other),
        }
    }

    #[test]
    fn malformed_payload_aborts_validation() {
        let phase =
            RunPhase::start(trigger_snapshot("https://hooks.example/run", "{bad json")).validate();
        assert_eq!(phase, RunPhase::Aborted(RunError::InvalidPayload));
    }

    #[test]
    fn empty_payload_becomes_an_empty_object() {
        let phase =
            RunPhase::start(trigger_snapshot("https://hooks.example/run", "   \n")).validate();
        match phase {
            RunPhase::Building(form) => assert_eq!(
                form.action,
                CheckedAction::Trigger {
                    payload: serde_json::json!({})
                }
            ),
            other => panic!("expected Building, got {:?}", other),
        }
    }

    #[test]
    fn fetch_plan_appends_date_query_parameters() {
        let phase = RunPhase::start(fetch_snapshot("https://hooks.example/run"))
            .validate()
            .build_plan();
        assert_eq!(
            phase,
            RunPhase::InFlight(RequestPlan::Get {
                url: "https://hooks.example/run?startDate=2024-05-01&endDate=2024-05-08"
                    .to_string(),
            })
        );
    }

    #[test]
    fn fetch_plan_joins_with_ampersand_when_query_present() {
        let phase = RunPhase::start(fetch_snapshot("https://hooks.example/run?token=abc"))
            .validate()
            .build_plan();
        assert_eq!(
            phase,
            RunPhase::InFlight(RequestPlan::Get {
                url: "https://hooks.example/run?token=abc&startDate=2024-05-01&endDate=2024-05-08"
                    .to_string(),
            })
        );
    }

    #[test]
    fn trigger_plan_posts_the_serialized_payload() {
        let phase = RunPhase::start(trigger_snapshot("https://hooks.example/run", "{\"x\": 1}"))
            .validate()
            .build_plan();
        assert_eq!(
            phase,
            RunPhase::InFlight(RequestPlan::Post {
                url: "https://hooks.example/run".to_string(),
                body: "{\"x\":1}".to_string(),
            })
        );
    }

    #[test]
    fn aborted_runs_pass_through_later_transitions() {
        let phase = RunPhase::start(fetch_snapshot("")).validate().build_plan();
        assert_eq!(phase, RunPhase::Aborted(RunError::MissingUrl));
    }

    #[test]
    fn successful_reply_completes_with_parsed_json() {
        let phase = RunPhase::interpret_reply(Ok(ok_reply("[{\"a\":1}]")));
        assert_eq!(
            phase,
            RunPhase::Completed(RunResult::Json(serde_json::json!([{"a": 1}])))
        );
    }

    #[test]
    fn successful_non_json_reply_completes_with_raw_text() {
        let phase = RunPhase::interpret_reply(Ok(ok_reply("workflow started")));
        assert_eq!(
            phase,
            RunPhase::Completed(RunResult::RawText("workflow started".to_string()))
        );
    }

    #[test]
    fn http_failure_carries_status_and_text() {
        let reply = TransportReply {
            ok: false,
            status: 500,
            status_text: "Internal Server Error".to_string(),
            body: String::new(),
        };
        let phase = RunPhase::interpret_reply(Ok(reply));
        match phase {
            RunPhase::Aborted(err) => {
                assert_eq!(err.to_string(), "HTTP Error: 500 Internal Server Error")
            }
            other => panic!("expected Aborted, got {:?}", other),
        }
    }

    #[test]
    fn network_failure_carries_the_transport_message() {
        let phase = RunPhase::interpret_reply(Err("Failed to fetch".to_string()));
        assert_eq!(
            phase,
            RunPhase::Aborted(RunError::Network("Failed to fetch".to_string()))
        );
    }

    #[test]
    fn progress_lines_match_the_request_kind() {
        let get = RequestPlan::Get {
            url: "https://hooks.example/run?startDate=a&endDate=b".to_string(),
        };
        assert_eq!(
            progress_line(&get),
            "GET https://hooks.example/run?startDate=a&endDate=b...\nWaiting for response..."
        );

        let post = RequestPlan::Post {
            url: "https://hooks.example/run".to_string(),
            body: "{\"x\":1}".to_string(),
        };
        assert_eq!(
            progress_line(&post),
            "POST https://hooks.example/run...\nPayload: {\"x\":1}"
        );
    }

    #[test]
    fn long_payload_previews_are_truncated() {
        let body = format!("{{\"blob\":\"{}\"}}", "a".repeat(80));
        let post = RequestPlan::Post {
            url: "https://hooks.example/run".to_string(),
            body,
        };
        let line = progress_line(&post);
        let preview = line.split("Payload: ").nth(1).unwrap();
        assert_eq!(preview.chars().count(), 53);
        assert!(preview.ends_with("..."));
    }
}
