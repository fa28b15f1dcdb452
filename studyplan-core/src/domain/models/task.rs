use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::{DayPlan, TaskId};

/// Category of academic work a task represents.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TaskType {
    #[default]
    Assignment,
    Exam,
    Project,
    Review,
}

/// User-declared priority, independent of the computed urgency tier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum PriorityLevel {
    Low,
    #[default]
    Medium,
    High,
}

/// A unit of academic work with a deadline and an estimated effort.
///
/// Serialized in camelCase to stay compatible with the exchange file format.
/// Optional and derivable fields carry serde defaults so documents written by
/// older exporters still import (a missing `progress` on a completed task is
/// normalized on hydrate).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub subject: String,
    #[serde(rename = "type", default)]
    pub task_type: TaskType,
    pub due_date: NaiveDate,
    pub estimated_hours: f64,
    #[serde(default)]
    pub priority: PriorityLevel,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub study_plan: Vec<DayPlan>,
}

/// User input for creating a task, before validation.
#[derive(Debug, Clone, Default)]
pub struct TaskDraft {
    pub title: String,
    pub subject: String,
    pub task_type: TaskType,
    pub due_date: Option<NaiveDate>,
    pub estimated_hours: f64,
    pub priority: PriorityLevel,
    pub description: String,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            estimated_hours: 1.0,
            ..Self::default()
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    pub fn with_task_type(mut self, task_type: TaskType) -> Self {
        self.task_type = task_type;
        self
    }

    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_estimated_hours(mut self, hours: f64) -> Self {
        self.estimated_hours = hours;
        self
    }

    pub fn with_priority(mut self, priority: PriorityLevel) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}
