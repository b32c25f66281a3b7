use crate::error::ValidationError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }

    /// Next value of the selector, wrapping through "unset".
    pub fn cycle_next(current: Option<Priority>) -> Option<Priority> {
        match current {
            None => Some(Priority::Low),
            Some(Priority::Low) => Some(Priority::Medium),
            Some(Priority::Medium) => Some(Priority::High),
            Some(Priority::High) => None,
        }
    }

    pub fn cycle_prev(current: Option<Priority>) -> Option<Priority> {
        match current {
            None => Some(Priority::High),
            Some(Priority::High) => Some(Priority::Medium),
            Some(Priority::Medium) => Some(Priority::Low),
            Some(Priority::Low) => None,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Pending,
    Completed,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Pending => "Pending",
            Status::Completed => "Completed",
        }
    }
}

/// One row of the task file. Two tasks are the same task when every field
/// is equal; there is no id column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "Task")]
    pub description: String,
    #[serde(rename = "Priority")]
    pub priority: Option<Priority>,
    /// Empty when unset, otherwise the date exactly as it was entered.
    #[serde(rename = "Due Date")]
    pub due_date: String,
    #[serde(rename = "Status")]
    pub status: Status,
}

impl Task {
    pub fn priority_text(&self) -> &'static str {
        self.priority.map_or("", Priority::as_str)
    }
}

/// Raw contents of the "Add New Task" form.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub description: String,
    pub priority: Option<Priority>,
    pub due_date: String,
}

impl TaskDraft {
    pub fn new(description: &str, priority: Option<Priority>, due_date: &str) -> Self {
        Self {
            description: description.to_string(),
            priority,
            due_date: due_date.to_string(),
        }
    }

    /// The draft with surrounding whitespace removed from the text fields,
    /// the way the form submits it.
    pub fn trimmed(&self) -> Self {
        Self {
            description: self.description.trim().to_string(),
            priority: self.priority,
            due_date: self.due_date.trim().to_string(),
        }
    }

    /// Checks the draft and turns it into a pending task. Text is kept
    /// exactly as given.
    pub fn validate(&self) -> Result<Task, ValidationError> {
        if self.description.trim().is_empty() {
            return Err(ValidationError::EmptyDescription);
        }
        if !self.due_date.is_empty() {
            parse_due_date(&self.due_date)?;
        }

        Ok(Task {
            description: self.description.clone(),
            priority: self.priority,
            due_date: self.due_date.clone(),
            status: Status::Pending,
        })
    }

    pub fn clear(&mut self) {
        *self = TaskDraft::default();
    }
}

pub fn parse_due_date(text: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDateFormat(text.to_string()))
}
