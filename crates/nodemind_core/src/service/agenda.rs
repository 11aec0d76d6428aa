//! Daily task views.
//!
//! # Responsibility
//! - Select and order the tasks planned for one calendar day.
//! - Compute daily progress and the focus-session task picker list.
//!
//! # Invariants
//! - Incomplete tasks sort before completed ones; insertion order is kept
//!   within each group.

use crate::model::task::Task;
use crate::store::snapshot::AppState;
use chrono::NaiveDate;

/// Completion progress for one day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayProgress {
    pub completed: usize,
    pub total: usize,
    /// `completed / total`, or `0.0` when the day has no tasks.
    pub ratio: f64,
}

/// Tasks planned for `day`, incomplete first.
pub fn tasks_for_day(state: &AppState, day: NaiveDate) -> Vec<&Task> {
    let mut tasks = state
        .tasks
        .iter()
        .filter(|task| task.date == day)
        .collect::<Vec<_>>();
    tasks.sort_by_key(|task| task.is_completed);
    tasks
}

pub fn day_progress(state: &AppState, day: NaiveDate) -> DayProgress {
    let (completed, total) = state
        .tasks
        .iter()
        .filter(|task| task.date == day)
        .fold((0, 0), |(completed, total), task| {
            (completed + usize::from(task.is_completed), total + 1)
        });
    let ratio = if total == 0 {
        0.0
    } else {
        completed as f64 / total as f64
    };
    DayProgress {
        completed,
        total,
        ratio,
    }
}

/// Incomplete tasks of `day` that a focus session can be attached to.
pub fn focus_candidates(state: &AppState, day: NaiveDate) -> Vec<&Task> {
    state
        .tasks
        .iter()
        .filter(|task| task.date == day && !task.is_completed)
        .collect()
}
