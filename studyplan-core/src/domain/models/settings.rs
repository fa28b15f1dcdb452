use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::domain::Tier;

/// How the task list is presented.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ViewMode {
    #[default]
    List,
    Week,
    Month,
}

/// Secondary sort key for task views (completion always groups first).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase", ascii_case_insensitive)]
pub enum SortKey {
    #[default]
    DueDate,
    Priority,
    Created,
    Title,
    Subject,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Task view filter: everything, one urgency tier, or a completion state.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum PriorityFilter {
    #[default]
    All,
    Overdue,
    Today,
    Urgent,
    Warning,
    Normal,
    Completed,
    Pending,
}

impl PriorityFilter {
    /// The urgency tier this filter selects, if it is a tier filter.
    pub fn tier(&self) -> Option<Tier> {
        match self {
            PriorityFilter::Overdue => Some(Tier::Overdue),
            PriorityFilter::Today => Some(Tier::Today),
            PriorityFilter::Urgent => Some(Tier::Urgent),
            PriorityFilter::Warning => Some(Tier::Warning),
            PriorityFilter::Normal => Some(Tier::Normal),
            _ => None,
        }
    }
}

/// Per-session display settings, persisted as their own record.
///
/// Every field carries a serde default so a partially written or older
/// settings record merges field-by-field instead of failing wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub is_dark_mode: bool,
    pub view_mode: ViewMode,
    pub sort_by: SortKey,
    pub sort_order: SortOrder,
    pub show_completed_tasks: bool,
    pub filter_priority: PriorityFilter,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            is_dark_mode: false,
            view_mode: ViewMode::List,
            sort_by: SortKey::DueDate,
            sort_order: SortOrder::Asc,
            show_completed_tasks: true,
            filter_priority: PriorityFilter::All,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_defaults_match_first_run() {
        let settings = Settings::default();
        assert!(!settings.is_dark_mode);
        assert_eq!(settings.view_mode, ViewMode::List);
        assert_eq!(settings.sort_by, SortKey::DueDate);
        assert_eq!(settings.sort_order, SortOrder::Asc);
        assert!(settings.show_completed_tasks);
        assert_eq!(settings.filter_priority, PriorityFilter::All);
    }

    #[test]
    fn missing_fields_fall_back_individually() {
        let settings: Settings =
            serde_json::from_str(r#"{"isDarkMode":true,"sortOrder":"desc"}"#).unwrap();
        assert!(settings.is_dark_mode);
        assert_eq!(settings.sort_order, SortOrder::Desc);
        assert_eq!(settings.sort_by, SortKey::DueDate);
        assert!(settings.show_completed_tasks);
    }

    #[test]
    fn sort_key_uses_camel_case_wire_names() {
        assert_eq!(serde_json::to_string(&SortKey::DueDate).unwrap(), r#""dueDate""#);
        assert_eq!(SortKey::DueDate.to_string(), "dueDate");
    }
}
