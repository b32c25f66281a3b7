use crate::error::StoreError;
use crate::task::{Status, Task, TaskDraft};
use csv::{ReaderBuilder, Terminator, Trim, WriterBuilder};
use std::{
    collections::HashSet,
    fs::{File, OpenOptions},
    io,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

pub const HEADER: [&str; 4] = ["Task", "Priority", "Due Date", "Status"];

/// The task table on disk. Every call opens the file, does its work and
/// closes it again; nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct TaskStore {
    path: PathBuf,
}

impl TaskStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the file with just the header row if it is not there yet.
    pub fn initialize(&self) -> Result<(), StoreError> {
        if self.path.exists() {
            return Ok(());
        }
        self.write_all(&[])?;
        info!(path = %self.path.display(), "created task file");
        Ok(())
    }

    /// All tasks in file order. A missing file is an empty list.
    pub fn load_all(&self) -> Result<Vec<Task>, StoreError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut reader = ReaderBuilder::new().trim(Trim::Headers).from_reader(file);
        let tasks = reader.deserialize().collect::<Result<Vec<Task>, _>>()?;
        debug!(count = tasks.len(), "loaded tasks");
        Ok(tasks)
    }

    /// Validates the draft and appends it as a new pending row.
    pub fn append(&self, draft: &TaskDraft) -> Result<Task, StoreError> {
        let task = draft.validate().inspect_err(|err| {
            warn!(error = %err, "rejected new task");
        })?;

        self.initialize()?;
        let file = OpenOptions::new().append(true).open(&self.path)?;
        let mut writer = writer_builder().from_writer(file);
        writer.serialize(&task)?;
        writer.flush()?;

        debug!(description = %task.description, "appended task");
        Ok(task)
    }

    /// Removes every row equal to one of `targets`. Returns how many rows
    /// were dropped.
    pub fn delete_matching(&self, targets: &[Task]) -> Result<usize, StoreError> {
        let targets: HashSet<&Task> = targets.iter().collect();
        let tasks = self.load_all()?;
        let before = tasks.len();

        let kept: Vec<Task> = tasks
            .into_iter()
            .filter(|task| !targets.contains(task))
            .collect();
        let removed = before - kept.len();

        // untouched file stays byte-for-byte as it was
        if removed > 0 {
            self.write_all(&kept)?;
        }
        info!(removed, "deleted tasks");
        Ok(removed)
    }

    /// Sets every row equal to `target` to completed. Returns how many rows
    /// changed.
    pub fn mark_completed(&self, target: &Task) -> Result<usize, StoreError> {
        let mut tasks = self.load_all()?;
        let mut changed = 0;

        for task in tasks.iter_mut().filter(|task| **task == *target) {
            if task.status != Status::Completed {
                task.status = Status::Completed;
                changed += 1;
            }
        }

        if changed > 0 {
            self.write_all(&tasks)?;
        }
        info!(changed, description = %target.description, "marked tasks completed");
        Ok(changed)
    }

    /// Truncates the file and writes the header followed by `tasks`.
    fn write_all(&self, tasks: &[Task]) -> Result<(), StoreError> {
        let mut writer = writer_builder().from_path(&self.path)?;
        writer.write_record(HEADER)?;
        for task in tasks {
            writer.serialize(task)?;
        }
        writer.flush()?;
        Ok(())
    }
}

fn writer_builder() -> WriterBuilder {
    let mut builder = WriterBuilder::new();
    builder.has_headers(false).terminator(Terminator::Any(b'\n'));
    builder
}

/// Renders tasks exactly as `write_all` would put them on disk, header
/// included.
pub fn to_csv_string(tasks: &[Task]) -> Result<String, StoreError> {
    let mut writer = writer_builder().from_writer(Vec::new());
    writer.write_record(HEADER)?;
    for task in tasks {
        writer.serialize(task)?;
    }
    let buf = writer
        .into_inner()
        .map_err(|err| StoreError::Io(err.into_error()))?;
    String::from_utf8(buf)
        .map_err(|err| StoreError::Io(io::Error::new(io::ErrorKind::InvalidData, err)))
}
