//! Task domain model.
//!
//! # Responsibility
//! - Define the task record shown by the daily list and focus picker.
//! - Apply shallow partial updates without touching completion bookkeeping.
//!
//! # Invariants
//! - `id` is stable and never reused.
//! - `completed_at` is `Some` iff `is_completed` is `true`; only toggling
//!   changes either field.
//! - `date` is always set; creation defaults it to the creation day.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a task.
pub type TaskId = Uuid;

/// User-assigned task priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

/// Recurrence hint stored with a task. The store does not expand repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepeatType {
    Daily,
    Weekly,
    Monthly,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: Option<String>,
    pub is_completed: bool,
    pub priority: Priority,
    pub category: Option<String>,
    pub repeat_type: Option<RepeatType>,
    /// Unix epoch milliseconds.
    pub reminder_at: Option<i64>,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds; present only while completed.
    pub completed_at: Option<i64>,
    pub tags: Vec<String>,
    /// Calendar day the task is planned for.
    pub date: NaiveDate,
}

/// Caller-supplied fields for task creation.
///
/// No content validation is applied: empty titles are accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub category: Option<String>,
    pub repeat_type: Option<RepeatType>,
    pub reminder_at: Option<i64>,
    pub tags: Vec<String>,
    /// `None` means "the creation day".
    pub date: Option<NaiveDate>,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Shallow partial update for a task.
///
/// `Option<Option<T>>` fields distinguish "leave as is" (`None`) from
/// "clear" (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub priority: Option<Priority>,
    pub category: Option<Option<String>>,
    pub repeat_type: Option<Option<RepeatType>>,
    pub reminder_at: Option<Option<i64>>,
    pub tags: Option<Vec<String>>,
    pub date: Option<NaiveDate>,
}

impl Task {
    /// Builds a fresh, incomplete task with a generated id.
    pub fn create(input: NewTask, now_ms: i64, today: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            is_completed: false,
            priority: input.priority,
            category: input.category,
            repeat_type: input.repeat_type,
            reminder_at: input.reminder_at,
            created_at: now_ms,
            completed_at: None,
            tags: input.tags,
            date: input.date.unwrap_or(today),
        }
    }

    /// Merges every populated patch field into this task.
    pub fn apply(&mut self, patch: TaskPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(repeat_type) = patch.repeat_type {
            self.repeat_type = repeat_type;
        }
        if let Some(reminder_at) = patch.reminder_at {
            self.reminder_at = reminder_at;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
    }

    /// Flips completion and keeps `completed_at` in step.
    pub fn toggle(&mut self, now_ms: i64) {
        self.is_completed = !self.is_completed;
        self.completed_at = self.is_completed.then_some(now_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::{NewTask, Priority, Task, TaskPatch};
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn create_defaults_date_to_creation_day() {
        let task = Task::create(NewTask::new("inbox"), 10, day(2024, 6, 1));
        assert_eq!(task.date, day(2024, 6, 1));
        assert!(!task.is_completed);
        assert_eq!(task.completed_at, None);
        assert_eq!(task.priority, Priority::Medium);
    }

    #[test]
    fn apply_clears_optional_fields_only_when_asked() {
        let mut input = NewTask::new("report");
        input.description = Some("draft".to_string());
        input.category = Some("work".to_string());
        let mut task = Task::create(input, 10, day(2024, 6, 1));

        task.apply(TaskPatch {
            description: Some(None),
            ..TaskPatch::default()
        });
        assert_eq!(task.description, None);
        assert_eq!(task.category.as_deref(), Some("work"));
        assert_eq!(task.title, "report");
    }

    #[test]
    fn toggle_tracks_completed_at() {
        let mut task = Task::create(NewTask::new("x"), 10, day(2024, 6, 1));
        task.toggle(99);
        assert!(task.is_completed);
        assert_eq!(task.completed_at, Some(99));
        task.toggle(120);
        assert!(!task.is_completed);
        assert_eq!(task.completed_at, None);
    }
}
