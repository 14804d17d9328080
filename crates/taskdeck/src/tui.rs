//! Terminal UI for browsing and updating tasks.
//!
//! The UI renders confirmed server state only: every mutation goes to
//! the API, invalidates the client cache, and triggers a refetch. The
//! first paint may come from the local mirror until the server answers.

use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use taskdeck_app::{ApiError, TaskRepository, TasksApi};
use taskdeck_core::Task;
use taskdeck_core::id::TaskId;

const TOAST_TTL: Duration = Duration::from_secs(4);
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Input mode of the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Browsing the list.
    Normal,
    /// Typing a new task title.
    Insert,
    /// Typing a replacement title for the given task.
    Edit(TaskId),
}

/// Transient user-visible error message.
struct Toast {
    message: String,
    shown_at: Instant,
}

/// Application state shared between the event loop and rendering.
pub struct App<A: TasksApi> {
    repo: TaskRepository<A>,
    /// Currently visible task collection.
    pub tasks: Vec<Task>,
    /// Selected index into [`tasks`](Self::tasks).
    pub selected: usize,
    mode: Mode,
    input: String,
    toast: Option<Toast>,
    /// True while the visible list still comes from the local mirror.
    pub seeded: bool,
    quit: bool,
}

impl<A: TasksApi> App<A> {
    /// Seed from the local mirror, then try the authoritative fetch.
    pub fn new(repo: TaskRepository<A>) -> Self {
        let mut app = Self {
            tasks: repo.seed(),
            repo,
            selected: 0,
            mode: Mode::Normal,
            input: String::new(),
            toast: None,
            seeded: true,
            quit: false,
        };
        app.refresh();
        app
    }

    /// Reload the visible collection from the repository (cache or server).
    pub fn refresh(&mut self) {
        match self.repo.tasks() {
            Ok(tasks) => {
                self.tasks = tasks;
                self.seeded = false;
                self.clamp_selection();
            }
            Err(err) => self.report(err, "Failed to load tasks"),
        }
    }

    fn clamp_selection(&mut self) {
        if self.tasks.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.tasks.len() {
            self.selected = self.tasks.len() - 1;
        }
    }

    fn selected_task(&self) -> Option<&Task> {
        self.tasks.get(self.selected)
    }

    fn report(&mut self, err: ApiError, message: &str) {
        tracing::debug!(%err, "api call failed");
        self.toast = Some(Toast {
            message: message.to_owned(),
            shown_at: Instant::now(),
        });
    }

    /// Drop the toast once it has been on screen long enough.
    pub fn expire_toast(&mut self) {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.shown_at.elapsed() >= TOAST_TTL)
        {
            self.toast = None;
        }
    }

    /// Current toast message, if any.
    #[must_use]
    pub fn toast_message(&self) -> Option<&str> {
        self.toast.as_ref().map(|toast| toast.message.as_str())
    }

    fn select_next(&mut self) {
        if !self.tasks.is_empty() && self.selected + 1 < self.tasks.len() {
            self.selected += 1;
        }
    }

    fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn toggle_selected(&mut self) {
        let Some(task) = self.selected_task() else {
            return;
        };
        let (id, completed) = (task.id, task.completed);
        match self.repo.set_completed(id, !completed) {
            Ok(_) => self.refresh(),
            Err(err) => self.report(err, "Failed to update task"),
        }
    }

    fn delete_selected(&mut self) {
        let Some(task) = self.selected_task() else {
            return;
        };
        let id = task.id;
        match self.repo.remove(id) {
            Ok(()) => self.refresh(),
            Err(err) => self.report(err, "Failed to delete task"),
        }
    }

    fn clear_completed(&mut self) {
        match self.repo.clear_completed() {
            Ok(()) => self.refresh(),
            Err(err) => self.report(err, "Failed to clear tasks"),
        }
    }

    fn begin_insert(&mut self) {
        self.mode = Mode::Insert;
        self.input.clear();
    }

    fn begin_edit(&mut self) {
        if let Some(task) = self.selected_task() {
            let id = task.id;
            let title = task.title.clone();
            self.mode = Mode::Edit(id);
            self.input = title;
        }
    }

    fn cancel_input(&mut self) {
        self.mode = Mode::Normal;
        self.input.clear();
    }

    fn submit_input(&mut self) {
        let (result, message) = match self.mode {
            Mode::Insert => (
                self.repo.create(&self.input).map(|_| ()),
                "Failed to create task",
            ),
            Mode::Edit(id) => (
                self.repo.rename(id, &self.input).map(|_| ()),
                "Failed to update task",
            ),
            Mode::Normal => return,
        };
        match result {
            Ok(()) => {
                self.cancel_input();
                self.refresh();
            }
            Err(err) => self.report(err, message),
        }
    }

    /// Apply a single key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match self.mode {
            Mode::Normal => self.handle_normal_key(key.code),
            Mode::Insert | Mode::Edit(_) => self.handle_input_key(key.code),
        }
    }

    fn handle_normal_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') => self.quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.select_prev(),
            KeyCode::Char(' ') | KeyCode::Char('x') => self.toggle_selected(),
            KeyCode::Char('a') => self.begin_insert(),
            KeyCode::Char('e') => self.begin_edit(),
            KeyCode::Char('d') => self.delete_selected(),
            KeyCode::Char('c') => self.clear_completed(),
            KeyCode::Char('r') => self.refresh(),
            _ => {}
        }
    }

    fn handle_input_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => self.cancel_input(),
            KeyCode::Enter => self.submit_input(),
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) => self.input.push(c),
            _ => {}
        }
    }

    /// Whether the event loop should exit.
    #[must_use]
    pub const fn should_quit(&self) -> bool {
        self.quit
    }
}

/// Run the TUI against the given repository until the user quits.
///
/// # Errors
/// Returns an error when the terminal cannot be set up or restored.
pub fn run<A: TasksApi>(repo: TaskRepository<A>) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let app = App::new(repo);
    let result = event_loop(&mut terminal, app);
    restore_terminal(&mut terminal)?;
    result
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn event_loop<A: TasksApi>(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    mut app: App<A>,
) -> Result<()> {
    loop {
        app.expire_toast();
        terminal.draw(|frame| draw(frame, &app))?;

        if event::poll(POLL_INTERVAL)? {
            if let CrosstermEvent::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }
        if app.should_quit() {
            return Ok(());
        }
    }
}

fn draw<A: TasksApi>(frame: &mut ratatui::Frame<'_>, app: &App<A>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let title = if app.seeded { "Tasks (local copy)" } else { "Tasks" };
    let items: Vec<ListItem<'_>> = app.tasks.iter().map(task_item).collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if !app.tasks.is_empty() {
        state.select(Some(app.selected));
    }
    frame.render_stateful_widget(list, chunks[0], &mut state);

    let status = status_line(app);
    frame.render_widget(
        Paragraph::new(status).block(Block::default().borders(Borders::ALL)),
        chunks[1],
    );

    let help = "a add · e edit · space toggle · d delete · c clear done · r refresh · q quit";
    frame.render_widget(
        Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
        chunks[2],
    );
}

fn task_item(task: &Task) -> ListItem<'_> {
    let mark = if task.completed { "[x] " } else { "[ ] " };
    let title_style = if task.completed {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default()
    };
    ListItem::new(Line::from(vec![
        Span::raw(mark),
        Span::styled(format!("{:>4}  ", task.id), Style::default().fg(Color::DarkGray)),
        Span::styled(task.title.clone(), title_style),
    ]))
}

fn status_line<A: TasksApi>(app: &App<A>) -> Line<'_> {
    match app.mode {
        Mode::Insert => Line::from(vec![
            Span::styled("New task: ", Style::default().fg(Color::Cyan)),
            Span::raw(app.input.as_str()),
        ]),
        Mode::Edit(_) => Line::from(vec![
            Span::styled("Rename: ", Style::default().fg(Color::Cyan)),
            Span::raw(app.input.as_str()),
        ]),
        Mode::Normal => app.toast_message().map_or_else(
            || {
                Line::from(Span::styled(
                    format!("{} task(s)", app.tasks.len()),
                    Style::default().fg(Color::DarkGray),
                ))
            },
            |message| Line::from(Span::styled(message.to_owned(), Style::default().fg(Color::Red))),
        ),
    }
}
