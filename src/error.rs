use crate::app::{Notice, NoticeLevel};
use std::io;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Task cannot be empty.")]
    EmptyDescription,
    #[error("Date must be in YYYY-MM-DD format (got {0:?}).")]
    InvalidDateFormat(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on task file: {0}")]
    Io(#[from] io::Error),
    #[error("Malformed task file: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Failures of the add / delete / mark-completed commands.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("no task selected")]
    NoSelection,
    #[error("delete was not confirmed")]
    UnconfirmedDestructiveAction,
    #[error(transparent)]
    Store(StoreError),
    #[error("terminal error: {0}")]
    Io(#[from] io::Error),
}

impl From<StoreError> for CommandError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(err) => CommandError::Validation(err),
            other => CommandError::Store(other),
        }
    }
}

impl CommandError {
    /// The modal message shown for this failure. A declined confirmation
    /// shows nothing.
    pub fn notice(&self, action: &str) -> Option<Notice> {
        match self {
            CommandError::Validation(err) => Some(Notice::new(NoticeLevel::Error, err.to_string())),
            CommandError::NoSelection if action == "delete" => Some(Notice::new(
                NoticeLevel::Warning,
                "Select a task to delete.",
            )),
            CommandError::NoSelection => Some(Notice::new(
                NoticeLevel::Info,
                format!("Select a task to {action}."),
            )),
            CommandError::UnconfirmedDestructiveAction => None,
            CommandError::Store(err) => Some(Notice::new(NoticeLevel::Error, err.to_string())),
            CommandError::Io(err) => Some(Notice::new(NoticeLevel::Error, err.to_string())),
        }
    }
}
