use crate::app::{App, Focus, Notice, NoticeLevel};
use crate::task::{Priority, Status, Task};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, Cell, Clear, Paragraph, Row, Scrollbar, ScrollbarOrientation,
        ScrollbarState, Table, TableState, Wrap,
    },
    Frame, Terminal,
};
use std::io;

const LABEL_WIDTH: u16 = 24;
const COLUMNS: [&str; 4] = ["Task", "Priority", "Due Date", "Status"];

pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App, title: &str) -> io::Result<()> {
    loop {
        terminal.draw(|f| render(f, app, title))?;
        if app.should_quit {
            return Ok(());
        }

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            let mut quit = false;
            handle_key(app, key, |app, prompt| {
                let answer = confirm(terminal, app, title, prompt)?;
                quit = answer == Answer::Quit;
                Ok(answer == Answer::Yes)
            });
            if quit {
                app.should_quit = true;
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Answer {
    Yes,
    No,
    Quit,
}

fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}

/// Ctrl-C declines and quits.
fn confirm_answer(key: &KeyEvent) -> Option<Answer> {
    if is_ctrl_c(key) {
        return Some(Answer::Quit);
    }
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => Some(Answer::Yes),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(Answer::No),
        _ => None,
    }
}

/// Blocks on a yes/no dialog drawn over the current screen.
fn confirm<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &App,
    title: &str,
    prompt: &str,
) -> io::Result<Answer> {
    loop {
        terminal.draw(|f| {
            render(f, app, title);
            render_confirm(f, prompt);
        })?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if let Some(answer) = confirm_answer(&key) {
                return Ok(answer);
            }
        }
    }
}

pub fn handle_key<F>(app: &mut App, key: KeyEvent, confirm: F)
where
    F: FnOnce(&App, &str) -> io::Result<bool>,
{
    if is_ctrl_c(&key) {
        app.should_quit = true;
        return;
    }
    // any key closes a notice
    if app.notice.take().is_some() {
        return;
    }

    match key.code {
        KeyCode::Tab => app.focus = app.focus.next(),
        KeyCode::BackTab => app.focus = app.focus.prev(),
        KeyCode::Esc => app.focus = Focus::Table,
        code if app.focus == Focus::Table => handle_table_key(app, code, confirm),
        code => handle_form_key(app, code),
    }
}

fn handle_form_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Enter => {
            let result = app.add_task();
            app.report("add", result);
        }
        KeyCode::Up => app.focus = app.focus.prev(),
        KeyCode::Down => app.focus = app.focus.next(),
        KeyCode::Left if app.focus == Focus::Priority => app.cycle_priority(false),
        KeyCode::Right if app.focus == Focus::Priority => app.cycle_priority(true),
        KeyCode::Char(' ') if app.focus == Focus::Priority => app.cycle_priority(true),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Char(c) => app.input_char(c),
        _ => {}
    }
}

fn handle_table_key<F>(app: &mut App, code: KeyCode, confirm: F)
where
    F: FnOnce(&App, &str) -> io::Result<bool>,
{
    match code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('a') => app.focus = Focus::Description,
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Char('d') | KeyCode::Delete => {
            let result = app.delete_selected(confirm);
            app.report("delete", result);
        }
        KeyCode::Char('c') => {
            let result = app.mark_selected_completed();
            app.report("mark as completed", result);
        }
        _ => {}
    }
}

pub fn render(f: &mut Frame, app: &App, title: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(1),
            Constraint::Length(5),
            Constraint::Min(4),
            Constraint::Length(1),
        ])
        .split(f.area());

    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        ))),
        chunks[0],
    );
    render_form(f, app, chunks[1]);
    render_table(f, app, chunks[2]);
    render_actions(f, chunks[3]);

    if let Some(notice) = &app.notice {
        render_notice(f, notice);
    }
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

fn render_form(f: &mut Frame, app: &App, area: Rect) {
    let editing = app.focus != Focus::Table;
    let block = Block::default()
        .title("Add New Task")
        .borders(Borders::ALL)
        .border_style(focus_style(editing));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(1); 3])
        .split(inner);

    let priority = match app.form.priority {
        Some(p) => format!("< {p} >"),
        None => "< - >".to_string(),
    };
    let fields = [
        ("Task:", app.form.description.as_str(), Focus::Description),
        ("Priority:", priority.as_str(), Focus::Priority),
        ("Due Date (YYYY-MM-DD):", app.form.due_date.as_str(), Focus::DueDate),
    ];

    for ((label, value, focus), row) in fields.into_iter().zip(rows.iter()) {
        let focused = app.focus == focus;
        let line = Line::from(vec![
            Span::raw(format!("{label:<width$}", width = LABEL_WIDTH as usize)),
            Span::styled(value, focus_style(focused)),
        ]);
        f.render_widget(Paragraph::new(line), *row);

        if focused && focus != Focus::Priority {
            let width = u16::try_from(Span::raw(value).width()).unwrap_or(u16::MAX);
            let x = row.x.saturating_add(LABEL_WIDTH).saturating_add(width);
            f.set_cursor_position((x.min(row.right().saturating_sub(1)), row.y));
        }
    }
}

fn priority_style(priority: Option<Priority>) -> Style {
    match priority {
        Some(Priority::High) => Style::default().fg(Color::Red),
        Some(Priority::Medium) => Style::default().fg(Color::Yellow),
        Some(Priority::Low) | None => Style::default(),
    }
}

fn status_style(status: Status) -> Style {
    match status {
        Status::Pending => Style::default().fg(Color::Yellow),
        Status::Completed => Style::default().fg(Color::Green),
    }
}

fn task_row(task: &Task) -> Row<'_> {
    Row::new(vec![
        Cell::from(task.description.as_str()),
        Cell::from(task.priority_text()).style(priority_style(task.priority)),
        Cell::from(task.due_date.as_str()),
        Cell::from(task.status.as_str()).style(status_style(task.status)),
    ])
}

fn render_table(f: &mut Frame, app: &App, area: Rect) {
    let header = Row::new(COLUMNS).style(Style::default().add_modifier(Modifier::BOLD));
    let rows: Vec<Row> = app.tasks.iter().map(task_row).collect();

    let table = Table::new(
        rows,
        [
            Constraint::Min(20),
            Constraint::Length(10),
            Constraint::Length(12),
            Constraint::Length(11),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .title("Tasks")
            .borders(Borders::ALL)
            .border_style(focus_style(app.focus == Focus::Table)),
    )
    .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
    .highlight_symbol("> ");

    let mut state = TableState::default().with_selected(app.selected);
    f.render_stateful_widget(table, area, &mut state);

    let mut scrollbar =
        ScrollbarState::new(app.tasks.len()).position(app.selected.unwrap_or_default());
    f.render_stateful_widget(
        Scrollbar::new(ScrollbarOrientation::VerticalRight),
        area.inner(Margin {
            vertical: 1,
            horizontal: 0,
        }),
        &mut scrollbar,
    );
}

fn render_actions(f: &mut Frame, area: Rect) {
    let key = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let line = Line::from(vec![
        Span::styled("[Enter]", key),
        Span::raw(" Add Task  "),
        Span::styled("[d]", key),
        Span::raw(" Delete Task  "),
        Span::styled("[c]", key),
        Span::raw(" Mark Completed  "),
        Span::styled("[Tab]", key),
        Span::raw(" Field  "),
        Span::styled("[q]", key),
        Span::raw(" Quit"),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn popup_area(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_popup(f: &mut Frame, title: &str, color: Color, lines: Vec<Line>) {
    let area = popup_area(f.area(), 60, 6);
    let popup = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .title(title.to_string())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color)),
    );
    f.render_widget(Clear, area);
    f.render_widget(popup, area);
}

fn render_notice(f: &mut Frame, notice: &Notice) {
    let color = match notice.level {
        NoticeLevel::Info => Color::Blue,
        NoticeLevel::Warning => Color::Yellow,
        NoticeLevel::Error => Color::Red,
    };
    render_popup(
        f,
        notice.title(),
        color,
        vec![
            Line::from(notice.message.as_str()),
            Line::from(""),
            Line::from(Span::styled(
                "Press any key",
                Style::default().add_modifier(Modifier::DIM),
            )),
        ],
    );
}

pub fn render_confirm(f: &mut Frame, prompt: &str) {
    render_popup(
        f,
        "Delete",
        Color::Red,
        vec![
            Line::from(prompt),
            Line::from(""),
            Line::from("[y] Yes   [n] No"),
        ],
    );
}
