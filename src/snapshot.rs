// JSON snapshot encoding for persistence and export/import

use crate::error::StoreError;
use crate::models::Task;
use chrono::NaiveDate;
use serde_json::Value;
use std::collections::HashSet;

/// Compact encoding used for the storage adapter
pub fn to_json(tasks: &[Task]) -> Result<String, StoreError> {
    serde_json::to_string(tasks).map_err(|e| StoreError::Format(e.to_string()))
}

/// Indented encoding used for exported backups
pub fn to_json_pretty(tasks: &[Task]) -> Result<String, StoreError> {
    serde_json::to_string_pretty(tasks).map_err(|e| StoreError::Format(e.to_string()))
}

/// Decode and schema-check a task sequence
///
/// The top level must be an array. Each element must deserialize into a
/// `Task` and pass `Task::check`, and ids must be unique. The first bad
/// record rejects the whole snapshot. Texts are stored trimmed.
pub fn from_json(data: &str) -> Result<Vec<Task>, StoreError> {
    let value: Value = serde_json::from_str(data).map_err(|e| StoreError::Format(e.to_string()))?;

    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(StoreError::Format(format!(
                "expected an array of tasks, found {}",
                kind(&other)
            )));
        }
    };

    let mut tasks = Vec::with_capacity(items.len());
    let mut seen = HashSet::new();

    for (index, item) in items.into_iter().enumerate() {
        let mut task: Task =
            serde_json::from_value(item).map_err(|e| StoreError::Format(format!("task {}: {}", index, e)))?;

        task.check()
            .map_err(|reason| StoreError::Format(format!("task {}: {}", index, reason)))?;
        task.text = task.text.trim().to_string();

        if !seen.insert(task.id.clone()) {
            return Err(StoreError::Format(format!("task {}: duplicate id {}", index, task.id)));
        }

        tasks.push(task);
    }

    Ok(tasks)
}

/// File name for a backup taken on `date`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("todo-backup-{}.json", date.format("%Y-%m-%d"))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
