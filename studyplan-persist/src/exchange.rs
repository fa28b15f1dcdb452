use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use studyplan_core::domain::models::{Settings, Task};
use studyplan_core::domain::PlannerError;

/// Format version stamped on every exported document.
pub const EXCHANGE_VERSION: &str = "2.1";

/// Self-contained export/import document.
///
/// Carries the task collection, the display settings and metadata. On
/// import the `version` field is currently not validated against a minimum;
/// documents from older exporters are accepted as long as `tasks` parses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeDocument {
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub settings: Settings,
    pub export_date: DateTime<Utc>,
    pub version: String,
}

impl ExchangeDocument {
    pub fn to_json(&self) -> Result<String, PlannerError> {
        serde_json::to_string_pretty(self).map_err(|e| PlannerError::format(e.to_string()))
    }
}

/// Build an exchange document from the live state.
pub fn export_snapshot(tasks: &[Task], settings: &Settings, now: DateTime<Utc>) -> ExchangeDocument {
    ExchangeDocument {
        tasks: tasks.to_vec(),
        settings: settings.clone(),
        export_date: now,
        version: EXCHANGE_VERSION.to_string(),
    }
}

/// Parse an exchange document.
///
/// Fails when the document is not JSON, is not an object, or its `tasks`
/// field is absent or not an array; nothing is partially imported. A broken
/// or missing `settings` record falls back to defaults (missing individual
/// fields already merge field-by-field through serde), and unrecognized
/// top-level fields are ignored.
pub fn import_snapshot(json: &str) -> Result<(Vec<Task>, Settings), PlannerError> {
    let document: serde_json::Value =
        serde_json::from_str(json).map_err(|e| PlannerError::format(format!("not JSON: {e}")))?;
    let object = document
        .as_object()
        .ok_or_else(|| PlannerError::format("document must be a JSON object"))?;

    let tasks_value = object
        .get("tasks")
        .ok_or_else(|| PlannerError::format("missing tasks field"))?;
    if !tasks_value.is_array() {
        return Err(PlannerError::format("tasks must be an array"));
    }
    let tasks: Vec<Task> = serde_json::from_value(tasks_value.clone())
        .map_err(|e| PlannerError::format(format!("unreadable task entry: {e}")))?;

    let settings = match object.get("settings") {
        Some(value) => serde_json::from_value(value.clone()).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "unreadable settings in import; using defaults");
            Settings::default()
        }),
        None => Settings::default(),
    };

    Ok((tasks, settings))
}
