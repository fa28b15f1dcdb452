use thiserror::Error;

use crate::domain::models::TaskId;

/// Errors that can occur during planner operations.
///
/// None of these are fatal to a running session: validation and lookup
/// failures refuse the operation without touching state, and format errors
/// abort an import before anything is replaced.
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("invalid task: {0}")]
    Validation(String),
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),
    #[error("snapshot not found: version {0}")]
    SnapshotNotFound(u64),
    #[error("invalid exchange document: {0}")]
    Format(String),
}

impl PlannerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }
}
