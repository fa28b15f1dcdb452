use chrono::NaiveDate;
use std::cmp::Ordering;

use crate::domain::{
    classify,
    models::{PriorityFilter, Settings, SortKey, SortOrder, Task},
};

/// Filter and sort parameters for a task view.
///
/// Carries `today` explicitly so tier-based filtering and sorting stay
/// deterministic under test.
#[derive(Debug, Clone)]
pub struct TaskQuery {
    pub search: String,
    pub filter_priority: PriorityFilter,
    pub show_completed: bool,
    pub sort_by: SortKey,
    pub sort_order: SortOrder,
    pub today: NaiveDate,
}

impl TaskQuery {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            search: String::new(),
            filter_priority: PriorityFilter::All,
            show_completed: true,
            sort_by: SortKey::DueDate,
            sort_order: SortOrder::Asc,
            today,
        }
    }

    pub fn from_settings(settings: &Settings, today: NaiveDate) -> Self {
        Self {
            search: String::new(),
            filter_priority: settings.filter_priority,
            show_completed: settings.show_completed_tasks,
            sort_by: settings.sort_by,
            sort_order: settings.sort_order,
            today,
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_filter(mut self, filter: PriorityFilter) -> Self {
        self.filter_priority = filter;
        self
    }

    pub fn with_sort(mut self, sort_by: SortKey, sort_order: SortOrder) -> Self {
        self.sort_by = sort_by;
        self.sort_order = sort_order;
        self
    }

    /// Whether a task passes the search, tier and completion filters.
    pub fn matches(&self, task: &Task) -> bool {
        if task.completed && !self.show_completed {
            return false;
        }

        let matches_filter = match self.filter_priority {
            PriorityFilter::All => true,
            PriorityFilter::Completed => task.completed,
            PriorityFilter::Pending => !task.completed,
            tier_filter => tier_filter.tier() == Some(classify(task.due_date, self.today)),
        };
        if !matches_filter {
            return false;
        }

        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        task.title.to_lowercase().contains(&needle)
            || task.subject.to_lowercase().contains(&needle)
            || task.description.to_lowercase().contains(&needle)
    }

    /// Total order for the view: incomplete tasks always come before
    /// completed ones; the configured key (reversed for descending) only
    /// orders within each completion group.
    pub fn compare(&self, a: &Task, b: &Task) -> Ordering {
        match a.completed.cmp(&b.completed) {
            Ordering::Equal => {}
            other => return other,
        }

        let by_key = match self.sort_by {
            SortKey::DueDate => a.due_date.cmp(&b.due_date),
            SortKey::Priority => {
                classify(a.due_date, self.today).cmp(&classify(b.due_date, self.today))
            }
            SortKey::Created => a.created_at.cmp(&b.created_at),
            SortKey::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
            SortKey::Subject => a.subject.to_lowercase().cmp(&b.subject.to_lowercase()),
        };

        match self.sort_order {
            SortOrder::Asc => by_key,
            SortOrder::Desc => by_key.reverse(),
        }
    }
}
