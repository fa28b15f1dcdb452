use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::models::{Snapshot, Task};

/// How many snapshots the history retains; the oldest is evicted first.
pub const HISTORY_CAPACITY: usize = 10;

/// Bounded, append-only log of task collection snapshots.
///
/// The version counter is independent of the retained window: evicting
/// snapshot 1 does not free version 1 for reuse. Serialized as the bare
/// snapshot sequence; the counter is rebuilt on deserialization.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SnapshotHistory {
    snapshots: Vec<Snapshot>,
    last_version: u64,
}

impl SnapshotHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshots(snapshots: Vec<Snapshot>) -> Self {
        let last_version = snapshots.iter().map(|s| s.version).max().unwrap_or(0);
        let mut snapshots = snapshots;
        if snapshots.len() > HISTORY_CAPACITY {
            let excess = snapshots.len() - HISTORY_CAPACITY;
            snapshots.drain(..excess);
        }
        Self {
            snapshots,
            last_version,
        }
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn last_version(&self) -> u64 {
        self.last_version
    }

    pub fn latest(&self) -> Option<&Snapshot> {
        self.snapshots.last()
    }

    /// Deep-copy the current collection into a new snapshot.
    ///
    /// Returns the version assigned to it.
    pub fn push(&mut self, tasks: &[Task], now: DateTime<Utc>) -> u64 {
        self.last_version += 1;
        self.snapshots.push(Snapshot {
            version: self.last_version,
            timestamp: now,
            tasks: tasks.to_vec(),
        });
        if self.snapshots.len() > HISTORY_CAPACITY {
            self.snapshots.remove(0);
        }
        self.last_version
    }

    pub fn snapshot(&self, version: u64) -> Option<&Snapshot> {
        self.snapshots.iter().find(|s| s.version == version)
    }

    /// Snapshots newest-first, for display.
    pub fn list(&self) -> impl Iterator<Item = &Snapshot> {
        self.snapshots.iter().rev()
    }
}

impl Serialize for SnapshotHistory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.snapshots.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SnapshotHistory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let snapshots = Vec::<Snapshot>::deserialize(deserializer)?;
        Ok(Self::from_snapshots(snapshots))
    }
}
