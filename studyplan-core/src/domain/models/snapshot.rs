use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Task;

/// An immutable copy of the full task collection at a point in time.
///
/// Versions are monotonic from 1 and are never reused, even after the
/// history evicts an old snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub version: u64,
    pub timestamp: DateTime<Utc>,
    pub tasks: Vec<Task>,
}

impl Snapshot {
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }
}
