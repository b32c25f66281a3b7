use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use todo_list::{config::Config, ui, App, TaskStore};
use tracing::{error, info};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();
    config.init_logging()?;

    // Creates the task file with its header on first start
    let mut app = App::new(TaskStore::new(&config.data_file))?;
    info!(path = %app.store.path().display(), tasks = app.tasks.len(), "starting");

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = ui::run_app(&mut terminal, &mut app, config.title);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        error!(error = %err, "terminal failure");
        return Err(err.into());
    }
    Ok(())
}
