// Counters shown alongside the task list

use crate::models::Task;
use chrono::{Local, NaiveDate};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    /// Percentage of completed tasks, rounded; 0 for an empty list
    pub completion_rate: u32,
    /// Tasks whose creation falls on `today` in local time
    pub tasks_created_today: usize,
}

impl Stats {
    pub fn compute(tasks: &[Task], today: NaiveDate) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|t| t.completed).count();
        let completion_rate = if total > 0 {
            (completed as f64 / total as f64 * 100.0).round() as u32
        } else {
            0
        };
        let tasks_created_today = tasks
            .iter()
            .filter(|t| t.created_at.with_timezone(&Local).date_naive() == today)
            .count();

        Self {
            total,
            completed,
            pending: total - completed,
            completion_rate,
            tasks_created_today,
        }
    }
}
