pub mod app;
pub mod config;
pub mod error;
pub mod store;
pub mod task;
pub mod ui;

pub use app::App;
pub use error::{CommandError, StoreError, ValidationError};
pub use store::TaskStore;
pub use task::{Priority, Status, Task, TaskDraft};
