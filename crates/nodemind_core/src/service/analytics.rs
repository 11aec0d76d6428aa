//! Aggregate statistics over tasks, focus sessions and map nodes.
//!
//! # Responsibility
//! - Compute the headline summary shown by the analytics screen.
//! - Compute per-day statistics and activity streaks.
//!
//! # Invariants
//! - Tasks count toward the day of `completed_at`; sessions toward the day
//!   of `start_time`. Days are UTC.
//! - A day is "active" when it has a completed task or a completed Focus
//!   session; `streak` counts consecutive active days ending at the day
//!   asked for.

use crate::clock::day_of;
use crate::model::focus::SessionType;
use crate::store::snapshot::AppState;
use chrono::{Days, NaiveDate};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalyticsSummary {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    /// Sum over every logged session, breaks included.
    pub total_focus_minutes: f64,
    pub total_focus_hours: f64,
    pub total_nodes: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyStats {
    pub date: NaiveDate,
    pub tasks_completed: usize,
    pub focus_sessions_completed: usize,
    pub total_focus_minutes: f64,
    pub streak: u32,
}

pub fn summary(state: &AppState) -> AnalyticsSummary {
    let total_focus_minutes = state
        .sessions
        .iter()
        .map(|session| session.duration_minutes)
        .sum::<f64>();
    AnalyticsSummary {
        total_tasks: state.tasks.len(),
        completed_tasks: state.tasks.iter().filter(|task| task.is_completed).count(),
        total_focus_minutes,
        total_focus_hours: total_focus_minutes / 60.0,
        total_nodes: state.nodes.len(),
    }
}

pub fn daily_stats(state: &AppState, day: NaiveDate) -> DailyStats {
    let active_days = active_days(state);
    daily_stats_with(state, day, &active_days)
}

/// Seven consecutive days ending at `ending`, oldest first.
pub fn weekly_stats(state: &AppState, ending: NaiveDate) -> Vec<DailyStats> {
    let active_days = active_days(state);
    (0..7u64)
        .rev()
        .filter_map(|offset| ending.checked_sub_days(Days::new(offset)))
        .map(|day| daily_stats_with(state, day, &active_days))
        .collect()
}

fn daily_stats_with(
    state: &AppState,
    day: NaiveDate,
    active_days: &BTreeSet<NaiveDate>,
) -> DailyStats {
    let tasks_completed = state
        .tasks
        .iter()
        .filter(|task| task.completed_at.map(day_of) == Some(day))
        .count();
    let (focus_sessions_completed, total_focus_minutes) = state
        .sessions
        .iter()
        .filter(|session| {
            session.is_completed
                && session.session_type == SessionType::Focus
                && day_of(session.start_time) == day
        })
        .fold((0, 0.0), |(count, minutes), session| {
            (count + 1, minutes + session.duration_minutes)
        });

    DailyStats {
        date: day,
        tasks_completed,
        focus_sessions_completed,
        total_focus_minutes,
        streak: streak_ending(active_days, day),
    }
}

fn active_days(state: &AppState) -> BTreeSet<NaiveDate> {
    let task_days = state.tasks.iter().filter_map(|task| task.completed_at.map(day_of));
    let session_days = state
        .sessions
        .iter()
        .filter(|session| session.is_completed && session.session_type == SessionType::Focus)
        .map(|session| day_of(session.start_time));
    task_days.chain(session_days).collect()
}

fn streak_ending(active_days: &BTreeSet<NaiveDate>, day: NaiveDate) -> u32 {
    let mut streak = 0;
    let mut cursor = Some(day);
    while let Some(current) = cursor {
        if !active_days.contains(&current) {
            break;
        }
        streak += 1;
        cursor = current.pred_opt();
    }
    streak
}
