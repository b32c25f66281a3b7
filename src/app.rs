use crate::error::{CommandError, StoreError};
use crate::store::TaskStore;
use crate::task::{Priority, Task, TaskDraft};
use std::io;
use tracing::debug;

pub const DELETE_PROMPT: &str = "Are you sure you want to delete the selected task(s)?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A modal message; it stays on screen until the next key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn title(&self) -> &'static str {
        match self.level {
            NoticeLevel::Info => "Info",
            NoticeLevel::Warning => "Warning",
            NoticeLevel::Error => "Error",
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    #[default]
    Description,
    Priority,
    DueDate,
    Table,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::Description => Focus::Priority,
            Focus::Priority => Focus::DueDate,
            Focus::DueDate => Focus::Table,
            Focus::Table => Focus::Description,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Focus::Description => Focus::Table,
            Focus::Priority => Focus::Description,
            Focus::DueDate => Focus::Priority,
            Focus::Table => Focus::DueDate,
        }
    }
}

/// Everything the screen shows. `tasks` is never edited in place: it is
/// re-read from the store after every change.
#[derive(Debug)]
pub struct App {
    pub store: TaskStore,
    pub tasks: Vec<Task>,
    pub form: TaskDraft,
    pub focus: Focus,
    pub selected: Option<usize>,
    pub notice: Option<Notice>,
    pub should_quit: bool,
}

impl App {
    pub fn new(store: TaskStore) -> Result<Self, StoreError> {
        store.initialize()?;
        let mut app = Self {
            store,
            tasks: Vec::new(),
            form: TaskDraft::default(),
            focus: Focus::default(),
            selected: None,
            notice: None,
            should_quit: false,
        };
        app.reload()?;
        Ok(app)
    }

    pub fn reload(&mut self) -> Result<(), StoreError> {
        self.tasks = self.store.load_all()?;
        self.selected = match (self.selected, self.tasks.len()) {
            (_, 0) => None,
            (Some(i), len) => Some(i.min(len - 1)),
            (None, _) => None,
        };
        Ok(())
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.selected.and_then(|i| self.tasks.get(i))
    }

    pub fn select_next(&mut self) {
        if self.tasks.is_empty() {
            return;
        }
        self.selected = Some(match self.selected {
            Some(i) if i + 1 < self.tasks.len() => i + 1,
            Some(i) => i,
            None => 0,
        });
    }

    pub fn select_prev(&mut self) {
        if self.tasks.is_empty() {
            return;
        }
        self.selected = Some(self.selected.map_or(0, |i| i.saturating_sub(1)));
    }

    pub fn add_task(&mut self) -> Result<Task, CommandError> {
        // checked here as well as in the store so a bad form never touches the file
        let draft = self.form.trimmed();
        draft.validate()?;
        let task = self.store.append(&draft)?;

        self.form.clear();
        self.focus = Focus::Description;
        self.reload()?;
        Ok(task)
    }

    /// Deletes every row equal to the selected one once `confirm` agrees.
    pub fn delete_selected<F>(&mut self, confirm: F) -> Result<usize, CommandError>
    where
        F: FnOnce(&App, &str) -> io::Result<bool>,
    {
        let task = self.selected_task().cloned().ok_or(CommandError::NoSelection)?;
        if !confirm(&*self, DELETE_PROMPT)? {
            debug!(description = %task.description, "delete declined");
            return Err(CommandError::UnconfirmedDestructiveAction);
        }

        let removed = self.store.delete_matching(&[task])?;
        self.reload()?;
        Ok(removed)
    }

    pub fn mark_selected_completed(&mut self) -> Result<usize, CommandError> {
        let task = self.selected_task().cloned().ok_or(CommandError::NoSelection)?;
        let changed = self.store.mark_completed(&task)?;
        self.reload()?;
        Ok(changed)
    }

    /// Turns a failed command into the notice shown to the user.
    pub fn report<T>(&mut self, action: &str, result: Result<T, CommandError>) {
        if let Err(err) = result {
            debug!(action, error = %err, "command failed");
            self.notice = err.notice(action);
        }
    }

    pub fn input_char(&mut self, c: char) {
        match self.focus {
            Focus::Description => self.form.description.push(c),
            Focus::DueDate => self.form.due_date.push(c),
            Focus::Priority | Focus::Table => {}
        }
    }

    pub fn backspace(&mut self) {
        match self.focus {
            Focus::Description => {
                self.form.description.pop();
            }
            Focus::DueDate => {
                self.form.due_date.pop();
            }
            Focus::Priority => self.form.priority = None,
            Focus::Table => {}
        }
    }

    pub fn cycle_priority(&mut self, forward: bool) {
        self.form.priority = if forward {
            Priority::cycle_next(self.form.priority)
        } else {
            Priority::cycle_prev(self.form.priority)
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Status;
    use tempfile::TempDir;

    fn new_app(dir: &TempDir) -> App {
        App::new(TaskStore::new(dir.path().join("todo.csv"))).unwrap()
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.input_char(c);
        }
    }

    fn add(app: &mut App, description: &str, priority: Option<Priority>, due: &str) {
        app.form = TaskDraft::new(description, priority, due);
        app.add_task().unwrap();
    }

    #[test]
    fn test_new_app_creates_file_and_starts_empty() {
        let dir = TempDir::new().unwrap();
        let app = new_app(&dir);

        assert!(dir.path().join("todo.csv").exists());
        assert!(app.tasks.is_empty());
        assert_eq!(app.selected, None);
        assert_eq!(app.focus, Focus::Description);
    }

    #[test]
    fn test_add_task_clears_form_and_reloads() {
        let dir = TempDir::new().unwrap();
        let mut app = new_app(&dir);

        type_text(&mut app, "Buy milk");
        app.cycle_priority(true);
        app.focus = Focus::DueDate;
        type_text(&mut app, "2024-05-01");

        let task = app.add_task().unwrap();
        assert_eq!(task.priority, Some(Priority::Low));
        assert_eq!(app.form, TaskDraft::default());
        assert_eq!(app.focus, Focus::Description);
        assert_eq!(app.tasks, vec![task]);
    }

    #[test]
    fn test_add_task_with_bad_date_keeps_form() {
        let dir = TempDir::new().unwrap();
        let mut app = new_app(&dir);
        app.form = TaskDraft::new("Pay rent", None, "tomorrow");

        let result = app.add_task();
        assert!(matches!(result, Err(CommandError::Validation(_))));
        assert_eq!(app.form.description, "Pay rent");
        assert!(app.tasks.is_empty());

        app.report("add", result);
        assert_eq!(app.notice.as_ref().map(|n| n.level), Some(NoticeLevel::Error));
    }

    #[test]
    fn test_add_task_trims_form_input() {
        let dir = TempDir::new().unwrap();
        let mut app = new_app(&dir);
        app.form = TaskDraft::new("  Buy milk  ", Some(Priority::Low), " 2024-5-1 ");

        let task = app.add_task().unwrap();
        assert_eq!(task.description, "Buy milk");
        assert_eq!(task.due_date, "2024-5-1");
        assert_eq!(app.store.load_all().unwrap(), vec![task]);
    }

    #[test]
    fn test_delete_without_selection_warns() {
        let dir = TempDir::new().unwrap();
        let mut app = new_app(&dir);
        add(&mut app, "a", None, "");

        let result = app.delete_selected(|_, _| Ok(true));
        assert!(matches!(result, Err(CommandError::NoSelection)));
        app.report("delete", result);
        assert_eq!(
            app.notice,
            Some(Notice::new(NoticeLevel::Warning, "Select a task to delete."))
        );
        assert_eq!(app.tasks.len(), 1);
    }

    #[test]
    fn test_declined_delete_changes_nothing() {
        let dir = TempDir::new().unwrap();
        let mut app = new_app(&dir);
        add(&mut app, "a", None, "");
        app.select_next();

        let mut asked = None;
        let result = app.delete_selected(|app, prompt| {
            asked = Some((app.tasks.len(), prompt.to_string()));
            Ok(false)
        });

        assert!(matches!(
            result,
            Err(CommandError::UnconfirmedDestructiveAction)
        ));
        assert_eq!(asked, Some((1, DELETE_PROMPT.to_string())));
        app.report("delete", result);
        assert_eq!(app.notice, None);
        assert_eq!(app.store.load_all().unwrap().len(), 1);
    }

    #[test]
    fn test_confirmed_delete_removes_duplicates_and_clamps_selection() {
        let dir = TempDir::new().unwrap();
        let mut app = new_app(&dir);
        add(&mut app, "keep", None, "");
        add(&mut app, "dup", Some(Priority::High), "");
        add(&mut app, "dup", Some(Priority::High), "");
        app.selected = Some(2);

        let removed = app.delete_selected(|_, _| Ok(true)).unwrap();
        assert_eq!(removed, 2);
        assert_eq!(app.tasks.len(), 1);
        assert_eq!(app.tasks[0].description, "keep");
        assert_eq!(app.selected, Some(0));
    }

    #[test]
    fn test_mark_selected_completed() {
        let dir = TempDir::new().unwrap();
        let mut app = new_app(&dir);
        add(&mut app, "first", None, "");
        add(&mut app, "second", None, "2025-01-02");
        app.select_next();
        app.select_next();

        assert_eq!(app.mark_selected_completed().unwrap(), 1);
        assert_eq!(app.tasks[0].status, Status::Pending);
        assert_eq!(app.tasks[1].status, Status::Completed);
        assert_eq!(app.selected, Some(1));
    }

    #[test]
    fn test_mark_completed_without_selection_informs() {
        let dir = TempDir::new().unwrap();
        let mut app = new_app(&dir);

        let result = app.mark_selected_completed();
        app.report("mark as completed", result);
        assert_eq!(app.notice.map(|n| n.level), Some(NoticeLevel::Info));
    }

    #[test]
    fn test_selection_bounds() {
        let dir = TempDir::new().unwrap();
        let mut app = new_app(&dir);
        app.select_next();
        assert_eq!(app.selected, None);

        add(&mut app, "a", None, "");
        add(&mut app, "b", None, "");
        app.select_prev();
        assert_eq!(app.selected, Some(0));
        app.select_prev();
        assert_eq!(app.selected, Some(0));
        app.select_next();
        app.select_next();
        assert_eq!(app.selected, Some(1));
    }

    #[test]
    fn test_editing_follows_focus() {
        let dir = TempDir::new().unwrap();
        let mut app = new_app(&dir);

        type_text(&mut app, "ab");
        app.backspace();
        app.focus = Focus::Table;
        type_text(&mut app, "zz");
        app.focus = Focus::Priority;
        app.cycle_priority(false);
        assert_eq!(app.form.priority, Some(Priority::High));
        app.backspace();

        assert_eq!(app.form, TaskDraft::new("a", None, ""));
        assert_eq!(Focus::Table.next(), Focus::Description);
        assert_eq!(Focus::Description.prev(), Focus::Table);
    }
}
