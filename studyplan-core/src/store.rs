use chrono::{DateTime, Utc};
use itertools::Itertools;

use crate::domain::{
    allocate, classify,
    models::{Task, TaskDraft, TaskId},
    PlannerError, TaskQuery, Tier,
};

/// Aggregate figures over the live task collection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub urgent: usize,
    pub overdue: usize,
    pub total_study_hours: f64,
    pub completed_study_hours: f64,
    /// Percent of tasks completed, rounded; 0 for an empty collection.
    pub completion_rate: u8,
}

/// The in-memory task collection.
///
/// Owns creation, completion, progress and deletion, and derives
/// filtered/sorted views. Every operation takes the current time explicitly;
/// the store never reads a clock. Operations are all-or-nothing: a refused
/// operation leaves the collection untouched.
#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    next_id: u64,
}

impl TaskStore {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            next_id: 1,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Validate a draft and add it to the collection.
    ///
    /// Assigns the next id, stamps `created_at`, and allocates the study
    /// plan from the due date and estimated hours.
    pub fn create(&mut self, draft: TaskDraft, now: DateTime<Utc>) -> Result<Task, PlannerError> {
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(PlannerError::validation("title must not be empty"));
        }
        let due_date = draft
            .due_date
            .ok_or_else(|| PlannerError::validation("due date is required"))?;
        if draft.estimated_hours < 0.5 {
            return Err(PlannerError::validation(
                "estimated hours must be at least 0.5",
            ));
        }
        if (draft.estimated_hours * 2.0).fract().abs() > 1e-9 {
            return Err(PlannerError::validation(
                "estimated hours must be a multiple of 0.5",
            ));
        }

        let id = TaskId::new(self.next_id);
        self.next_id += 1;

        let task = Task {
            id,
            title: title.to_string(),
            subject: draft.subject,
            task_type: draft.task_type,
            due_date,
            estimated_hours: draft.estimated_hours,
            priority: draft.priority,
            description: draft.description,
            completed: false,
            completed_at: None,
            created_at: now,
            progress: 0,
            study_plan: allocate(due_date, draft.estimated_hours, now.date_naive()),
        };
        tracing::debug!(id = %task.id, title = %task.title, "created task");

        self.tasks.push(task.clone());
        Ok(task)
    }

    /// Flip a task's completion state.
    ///
    /// Completing sets `completed_at` and progress 100; un-completing clears
    /// `completed_at` and resets progress to 0.
    pub fn toggle_complete(
        &mut self,
        id: TaskId,
        now: DateTime<Utc>,
    ) -> Result<Task, PlannerError> {
        let task = self.find_mut(id)?;
        task.completed = !task.completed;
        if task.completed {
            task.completed_at = Some(now);
            task.progress = 100;
        } else {
            task.completed_at = None;
            task.progress = 0;
        }
        Ok(task.clone())
    }

    /// Set a task's progress, clamped to [0, 100].
    ///
    /// Completion follows the progress value: 100 completes the task,
    /// anything lower un-completes it.
    pub fn set_progress(
        &mut self,
        id: TaskId,
        value: u8,
        now: DateTime<Utc>,
    ) -> Result<Task, PlannerError> {
        let task = self.find_mut(id)?;
        let value = value.min(100);

        task.progress = value;
        let completed = value == 100;
        if completed && !task.completed {
            task.completed_at = Some(now);
        } else if !completed {
            task.completed_at = None;
        }
        task.completed = completed;
        Ok(task.clone())
    }

    pub fn delete(&mut self, id: TaskId) -> Result<(), PlannerError> {
        let index = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(PlannerError::TaskNotFound(id))?;
        self.tasks.remove(index);
        tracing::debug!(%id, "deleted task");
        Ok(())
    }

    /// Re-run the allocator against the task's current due date and
    /// estimated hours.
    ///
    /// Never triggered implicitly; editing a task does not touch its plan
    /// until this is called.
    pub fn reallocate(&mut self, id: TaskId, now: DateTime<Utc>) -> Result<Task, PlannerError> {
        let task = self.find_mut(id)?;
        task.study_plan = allocate(task.due_date, task.estimated_hours, now.date_naive());
        Ok(task.clone())
    }

    /// Derive a filtered, deterministically ordered view of the collection.
    pub fn query(&self, query: &TaskQuery) -> Vec<Task> {
        self.tasks
            .iter()
            .filter(|t| query.matches(t))
            .cloned()
            .sorted_by(|a, b| query.compare(a, b))
            .collect()
    }

    pub fn stats(&self, today: chrono::NaiveDate) -> TaskStats {
        let total = self.tasks.len();
        let completed = self.tasks.iter().filter(|t| t.completed).count();
        let tier_count = |tier: Tier| {
            self.tasks
                .iter()
                .filter(|t| !t.completed && classify(t.due_date, today) == tier)
                .count()
        };
        let completion_rate = if total == 0 {
            0
        } else {
            ((completed as f64 / total as f64) * 100.0).round() as u8
        };

        TaskStats {
            total,
            completed,
            urgent: tier_count(Tier::Urgent),
            overdue: tier_count(Tier::Overdue),
            total_study_hours: self.tasks.iter().map(|t| t.estimated_hours).sum(),
            completed_study_hours: self
                .tasks
                .iter()
                .filter(|t| t.completed)
                .map(|t| t.estimated_hours)
                .sum(),
            completion_rate,
        }
    }

    /// Replace the whole collection, as on load or snapshot restore.
    ///
    /// Normalizes the progress/completed invariant for documents written by
    /// older exporters, and advances the id counter past the highest loaded
    /// id so future creations cannot collide.
    pub fn hydrate(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        for task in &mut self.tasks {
            if task.completed {
                task.progress = 100;
            } else if task.progress == 100 {
                task.progress = 0;
            }
        }
        let max_id = self.tasks.iter().map(|t| t.id.as_u64()).max().unwrap_or(0);
        self.next_id = self.next_id.max(max_id + 1);
    }

    fn find_mut(&mut self, id: TaskId) -> Result<&mut Task, PlannerError> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(PlannerError::TaskNotFound(id))
    }
}
