use std::fs::OpenOptions;
use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, widgets::*};

use filenav::filesystem::roots;
use filenav::opener::SystemOpener;
use filenav::permission::ReadableRoot;
use filenav::prefs::{JsonPreferences, MemoryPreferences, PreferenceStore};
use filenav::preview::PreviewContent;
use filenav::{AppConfig, Collaborators, ExternalOpen, OpenAction, Phase, SessionController, Theme};

enum Mode {
    Browse,
    Search,
    Folder(String),
}

struct App {
    session: SessionController,
    list: ListState,
    mode: Mode,
    status: String,
    quit: bool,
}

fn main() -> Result<()> {
    init_logging();
    let config = AppConfig::load()?;
    let runtime = tokio::runtime::Runtime::new()?;

    let root = roots::preferred_root(&config);
    let preferences: Box<dyn PreferenceStore> = match config.preferences_path() {
        Some(path) => Box::new(JsonPreferences::new(path)),
        None => Box::new(MemoryPreferences::default()),
    };
    let collaborators = Collaborators {
        preferences,
        permission: Box::new(ReadableRoot::new(root.clone())),
        opener: Box::new(SystemOpener::default()),
    };
    let mut session =
        SessionController::new(root, config.show_hidden, collaborators, runtime.handle().clone());
    session.start();

    let mut app = App {
        session,
        list: ListState::default(),
        mode: Mode::Browse,
        status: String::new(),
        quit: false,
    };

    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    let result = run(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

/// Logs go to a file; stderr would draw over the terminal UI.
fn init_logging() {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(path) = roots::app_private_dir().map(|d| d.join("filenav.log")) {
        if let Ok(file) = OpenOptions::new().create(true).append(true).open(path) {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
    }
    builder.init();
}

fn run<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        app.session.pump();
        app.clamp_selection();
        terminal.draw(|f| draw(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key.code);
                }
            }
        }
        if app.quit {
            return Ok(());
        }
    }
}

impl App {
    fn clamp_selection(&mut self) {
        let len = self.session.state().visible_entries().len();
        match self.list.selected() {
            _ if len == 0 => self.list.select(None),
            Some(i) if i >= len => self.list.select(Some(len - 1)),
            None => self.list.select(Some(0)),
            _ => {}
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.session.state().visible_entries().len();
        if len == 0 {
            return;
        }
        let current = self.list.selected().unwrap_or(0) as isize;
        let next = (current + delta).clamp(0, len as isize - 1);
        self.list.select(Some(next as usize));
    }

    fn selected_entry(&self) -> Option<filenav::FileEntry> {
        let index = self.list.selected()?;
        self.session.state().visible_entries().get(index).cloned()
    }

    fn handle_key(&mut self, code: KeyCode) {
        // Any key closes the viewer.
        if self.session.state().preview.is_some() {
            self.session.close_preview();
            return;
        }
        match std::mem::replace(&mut self.mode, Mode::Browse) {
            Mode::Browse => self.browse_key(code),
            Mode::Search => self.search_key(code),
            Mode::Folder(input) => self.folder_key(code, input),
        }
    }

    fn browse_key(&mut self, code: KeyCode) {
        self.status.clear();
        match code {
            KeyCode::Char('q') => self.quit = true,
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => self.open_selected(),
            KeyCode::Backspace | KeyCode::Left | KeyCode::Char('h') => {
                if self.session.navigate_up() {
                    self.list.select(Some(0));
                }
            }
            KeyCode::Char('~') => {
                self.session.navigate_to_root();
                self.list.select(Some(0));
            }
            KeyCode::Char('.') => self.session.toggle_hidden(),
            KeyCode::Char('/') => self.mode = Mode::Search,
            KeyCode::Char('g') => self.mode = Mode::Folder(String::new()),
            KeyCode::Esc => self.session.clear_search(),
            KeyCode::Char('f') => {
                if let Some(entry) = self.selected_entry() {
                    let now = self.session.toggle_favorite(entry.path());
                    self.status = format!("{} {}", if now { "Starred" } else { "Unstarred" }, entry.name());
                }
            }
            KeyCode::Char('o') => {
                if let Some(entry) = self.selected_entry() {
                    if self.session.open_externally(&entry) == ExternalOpen::NoHandler {
                        self.status = format!("No application can open {}", entry.name());
                    }
                }
            }
            KeyCode::Char('t') => {
                let next = self.session.state().theme.next();
                self.session.set_theme(next);
            }
            KeyCode::Char('p') => {
                if !self.session.recheck_permission() {
                    self.status = "Storage is still not readable".to_string();
                }
            }
            KeyCode::Char(c) if c.is_ascii_digit() && c != '0' => {
                let index = c as usize - '1' as usize;
                if self.session.jump_to_breadcrumb(index) {
                    self.list.select(Some(0));
                }
            }
            _ => {}
        }
    }

    fn search_key(&mut self, code: KeyCode) {
        let mut query = self.session.state().search_query.clone();
        match code {
            KeyCode::Esc => {
                self.session.clear_search();
                return;
            }
            KeyCode::Enter => return,
            KeyCode::Backspace => {
                query.pop();
            }
            KeyCode::Char(c) => query.push(c),
            _ => {}
        }
        self.session.search(&query);
        self.list.select(Some(0));
        self.mode = Mode::Search;
    }

    fn folder_key(&mut self, code: KeyCode, mut input: String) {
        match code {
            KeyCode::Esc => {}
            KeyCode::Enter => {
                if self.session.navigate_to_folder(&input) {
                    self.list.select(Some(0));
                } else {
                    self.status = format!("No folder named {}", input);
                }
            }
            KeyCode::Backspace => {
                input.pop();
                self.mode = Mode::Folder(input);
            }
            KeyCode::Char(c) => {
                input.push(c);
                self.mode = Mode::Folder(input);
            }
            _ => self.mode = Mode::Folder(input),
        }
    }

    fn open_selected(&mut self) {
        let Some(entry) = self.selected_entry() else { return };
        match self.session.open(&entry) {
            OpenAction::Navigating => self.list.select(Some(0)),
            OpenAction::Ignored => self.status = format!("Cannot open {}", entry.name()),
            OpenAction::Recorded { in_app: true } => {
                self.session.request_preview(&entry);
            }
            OpenAction::Recorded { in_app: false } => {
                self.status = format!("{}: press o to open with another application", entry.category());
            }
        }
    }
}

fn accent(theme: Theme) -> Color {
    match theme {
        Theme::Guinda => Color::Rgb(0x6c, 0x1d, 0x45),
        Theme::Azul => Color::Rgb(0x00, 0x5b, 0x96),
    }
}

fn draw(f: &mut Frame, app: &mut App) {
    let state = app.session.state().clone();
    let accent = accent(state.theme);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1), Constraint::Length(3)])
        .split(f.size());

    let crumbs: Vec<Span> = state
        .breadcrumbs
        .iter()
        .enumerate()
        .flat_map(|(i, dir)| {
            let label = if i == 0 {
                "Root".to_string()
            } else {
                dir.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default()
            };
            let style = if i + 1 == state.breadcrumbs.len() {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let sep = if i == 0 { "" } else { " › " };
            [Span::raw(sep), Span::styled(format!("{}:{}", i + 1, label), style)]
        })
        .collect();
    let title = format!(
        " filenav · {}{} ",
        state.theme.name(),
        if state.show_hidden { " · hidden shown" } else { "" }
    );
    let header = Paragraph::new(Line::from(crumbs))
        .block(Block::default().borders(Borders::ALL).title(title).border_style(Style::default().fg(accent)));
    f.render_widget(header, chunks[0]);

    let body_title = match state.phase {
        Phase::NoPermission => " No storage access: press p to retry ".to_string(),
        Phase::Loading => " Loading… ".to_string(),
        Phase::Searching => format!(" Results for \"{}\" ({}) ", state.search_query, state.search_results.len()),
        Phase::Browsing => state
            .current_dir
            .as_ref()
            .map(|d| format!(" {} ", d.display()))
            .unwrap_or_default(),
    };
    let items: Vec<ListItem> = state
        .visible_entries()
        .iter()
        .map(|entry| {
            let star = if state.favorites.contains(&entry.path().to_string_lossy().to_string()) { "★" } else { " " };
            let icon = if entry.is_dir() { "▸" } else { " " };
            ListItem::new(format!(
                "{}{} {:<40} {:>10}  {}",
                star,
                icon,
                entry.name(),
                entry.formatted_size(),
                entry.formatted_date()
            ))
        })
        .collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(body_title))
        .highlight_style(Style::default().bg(accent).fg(Color::White))
        .highlight_symbol(">> ");
    f.render_stateful_widget(list, chunks[1], &mut app.list);

    let footer = match &app.mode {
        Mode::Search => format!("/{}", state.search_query),
        Mode::Folder(input) => format!("go to folder: {}", input),
        _ if !app.status.is_empty() => app.status.clone(),
        _ => "enter open · h up · ~ root · / search · g folder · . hidden · f star · o external · t theme · q quit"
            .to_string(),
    };
    f.render_widget(Paragraph::new(footer).block(Block::default().borders(Borders::ALL)), chunks[2]);

    if let Some(pane) = &state.preview {
        let body = match &pane.content {
            Some(PreviewContent::Text(text) | PreviewContent::Picture(text)) => text.clone(),
            None => format!("Cannot read {}", pane.entry.name()),
        };
        let area = centered(f.size(), 80, 80);
        f.render_widget(Clear, area);
        let viewer = Paragraph::new(body)
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ", pane.entry.name()))
                    .border_style(Style::default().fg(accent)),
            );
        f.render_widget(viewer, area);
    }
}

fn centered(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
