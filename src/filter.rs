// View filter over the task list

use crate::error::StoreError;
use crate::models::Task;
use std::str::FromStr;

/// Which tasks the view shows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Filter {
    #[default]
    All,
    Pending,
    Completed,
}

impl Filter {
    pub const ALL: [Filter; 3] = [Filter::All, Filter::Pending, Filter::Completed];

    /// Whether `task` is visible under this filter
    pub fn matches(self, task: &Task) -> bool {
        match self {
            Filter::All => true,
            Filter::Pending => !task.completed,
            Filter::Completed => task.completed,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Pending => "pending",
            Filter::Completed => "completed",
        }
    }

    /// Title and message shown when nothing matches
    pub fn empty_message(self) -> (&'static str, &'static str) {
        match self {
            Filter::All => ("No tasks yet", "Add your first task above to get started!"),
            Filter::Pending => ("No pending tasks", "Great job! All your tasks are completed."),
            Filter::Completed => ("No completed tasks", "Complete some tasks to see them here."),
        }
    }
}

impl FromStr for Filter {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Filter::All),
            "pending" => Ok(Filter::Pending),
            "completed" => Ok(Filter::Completed),
            other => Err(StoreError::UnknownFilter(other.to_string())),
        }
    }
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
