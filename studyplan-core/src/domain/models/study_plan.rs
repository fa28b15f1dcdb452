use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day of a task's study plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    pub date: NaiveDate,
    pub hours: f64,
    #[serde(default)]
    pub is_weekend: bool,
    #[serde(default)]
    pub completed: bool,
}
