// Element ids of the panel's fixed DOM fragment - single source of truth so
// the renderer, the executor, and the tests never drift apart.
pub const PANEL_ID: &str = "webhook-panel";
pub const OPEN_BUTTON_ID: &str = "webhook-panel-open";
pub const CLOSE_BUTTON_ID: &str = "webhook-panel-close";
pub const URL_INPUT_ID: &str = "webhook-url";
pub const MODE_SELECT_ID: &str = "webhook-mode-select";
pub const CONFIG_AREA_ID: &str = "webhook-config-area";
pub const SAVE_OPTION_ID: &str = "webhook-save-option";
pub const SAVE_CHECKBOX_ID: &str = "webhook-save-checkbox";
pub const REGION_SELECT_ID: &str = "webhook-target-region";
pub const RUN_BUTTON_ID: &str = "webhook-run-btn";
pub const RESPONSE_LOG_ID: &str = "webhook-response";

// Ids of the per-mode fields rendered into the config area.
pub const START_DATE_ID: &str = "webhook-start-date";
pub const END_DATE_ID: &str = "webhook-end-date";
pub const PAYLOAD_INPUT_ID: &str = "webhook-json-payload";
pub const FORMAT_JSON_BTN_ID: &str = "webhook-format-json";

// Run-button labels per mode plus the in-flight state.
pub const FETCH_RUN_LABEL: &str = "Fetch Data";
pub const TRIGGER_RUN_LABEL: &str = "Trigger Workflow";
pub const RUNNING_LABEL: &str = "<span class=\"spinner\"></span> Running...";

// Literal console strings the run lifecycle writes.
pub const ERR_URL_REQUIRED: &str = "Error: Webhook URL is required.";
pub const LOG_INITIALIZING: &str = "Initializing request...";
pub const SAVE_OK_TRAILER: &str = "\n✅ Saved successfully! Dashboard updated.";
pub const SAVE_SHAPE_WARNING: &str = "\n\n⚠️ Warning: Could not save to database. Response must be an array or have a 'data' array property.";

// Fetch mode defaults to the last week.
pub const FETCH_WINDOW_DAYS: i64 = 7;

// POST payload preview length, in grapheme clusters.
pub const PAYLOAD_PREVIEW_GRAPHEMES: usize = 50;

// Save destinations offered in fetch mode, as (value, label) pairs.
pub const TARGET_REGIONS: [(&str, &str); 4] = [
    ("Master", "Master (Global)"),
    ("KSA_Widget", "KSA Widget"),
    ("UAE_Widget", "UAE Widget"),
    ("ZA_Widget", "ZA Widget"),
];

// Sample document shown in the empty payload textarea.
pub const PAYLOAD_PLACEHOLDER: &str = "{\n  \"action\": \"trigger_report\",\n  \"user\": \"admin\"\n}";

// Name of the host-page function the save bridge delegates to.
pub const SAVE_FN_NAME: &str = "saveToDatabase";
