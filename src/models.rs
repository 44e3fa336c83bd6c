// Data models for the task list

use crate::error::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum task text length, counted in characters after trimming
pub const MAX_TEXT_LEN: usize = 200;

/// Maximum length of an imported id, in characters
pub const MAX_ID_LEN: usize = 256;

/// A single to-do entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Create a pending task. `text` must already be validated.
    pub fn new(text: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: generate_id(),
            text: text.into(),
            completed: false,
            created_at: now,
            completed_at: None,
        }
    }

    /// Flip completion, keeping `completed_at` set iff `completed`
    pub fn toggle(&mut self, now: DateTime<Utc>) {
        self.completed = !self.completed;
        self.completed_at = if self.completed { Some(now) } else { None };
    }

    /// Check the record invariants of a task that did not come from `new`
    pub fn check(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("id cannot be empty".to_string());
        }
        let id_len = self.id.chars().count();
        if id_len > MAX_ID_LEN {
            return Err(format!("id too long: {} chars (max {})", id_len, MAX_ID_LEN));
        }
        validate_text(&self.text).map_err(|e| format!("text: {}", e))?;
        match (self.completed, self.completed_at) {
            (true, None) => Err("completed task has no completedAt".to_string()),
            (false, Some(_)) => Err("pending task has a completedAt".to_string()),
            _ => Ok(()),
        }
    }
}

/// Trim and validate a task text, returning the text to store
pub fn validate_text(raw: &str) -> Result<String, ValidationError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(ValidationError::Empty);
    }

    let len = text.chars().count();
    if len > MAX_TEXT_LEN {
        return Err(ValidationError::TooLong { len, max: MAX_TEXT_LEN });
    }

    Ok(text.to_string())
}

/// Time-ordered unique task id
pub fn generate_id() -> String {
    uuid::Uuid::now_v7().to_string()
}
