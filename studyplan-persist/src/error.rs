use strum::Display;
use thiserror::Error;

/// A persisted record, for reporting which writes or reads degraded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Section {
    Tasks,
    History,
    Settings,
}

/// Errors at the storage boundary.
///
/// These are always caught at the gateway: a failed write or a corrupt
/// record degrades that section and is reported, it never crashes the
/// session. The in-memory model stays the source of truth.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage backend failure: {0}")]
    Backend(String),
    #[error("corrupt record under {key}: {reason}")]
    Corrupt { key: String, reason: String },
    #[error("failed to persist sections: {}", format_sections(.0))]
    PartialWrite(Vec<Section>),
}

impl StorageError {
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::Backend(err.to_string())
    }
}

fn format_sections(sections: &[Section]) -> String {
    sections
        .iter()
        .map(Section::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
