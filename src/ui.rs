// 🖥️ Review Dashboard - ratatui view over the review state

use anyhow::Result;
use chrono::Local;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use data_review::{
    error_summary, Action, Field, LoadError, Record, RecordStore, ReviewState, Severity,
    SeverityFilter, StatusFilter,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Records,
    Views,
    Summary,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::Records => Page::Views,
            Page::Views => Page::Summary,
            Page::Summary => Page::Records,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Page::Records => Page::Summary,
            Page::Views => Page::Records,
            Page::Summary => Page::Views,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Records => "Records",
            Page::Views => "Views",
            Page::Summary => "Summary",
        }
    }
}

pub struct App {
    pub review: ReviewState,
    pub state: TableState,
    pub current_page: Page,
    pub show_detail: bool,
    pub export_dir: PathBuf,
    /// Last export result, shown in the status bar
    pub notice: Option<String>,
}

impl App {
    pub fn new(export_dir: PathBuf) -> Self {
        Self {
            review: ReviewState::new(),
            state: TableState::default(),
            current_page: Page::Records,
            show_detail: false,
            export_dir,
            notice: None,
        }
    }

    pub fn dispatch(&mut self, action: Action) {
        let review = std::mem::take(&mut self.review);
        self.review = review.apply(action);

        // Reset selection to first item
        if self.visible_len() > 0 {
            self.state.select(Some(0));
        } else {
            self.state.select(None);
        }
    }

    pub fn on_load(&mut self, result: Result<RecordStore, LoadError>) {
        match result {
            Ok(store) => self.dispatch(Action::DataLoaded(store)),
            Err(e) => self.dispatch(Action::LoadFailed(e.to_string())),
        }
    }

    pub fn visible_len(&self) -> usize {
        self.review.visible_records().len()
    }

    pub fn selected_record(&self) -> Option<&Record> {
        let i = self.state.selected()?;
        self.review.visible_records().get(i).copied()
    }

    pub fn toggle_detail(&mut self) {
        self.show_detail = !self.show_detail;
    }

    pub fn set_status_filter(&mut self, filter: StatusFilter) {
        self.dispatch(Action::SetStatusFilter(filter));
    }

    pub fn set_severity_filter(&mut self, filter: SeverityFilter) {
        self.dispatch(Action::SetSeverityFilter(filter));
    }

    pub fn clear_filters(&mut self) {
        self.dispatch(Action::ClearFilters);
    }

    pub fn export(&mut self) {
        let export = match self.review.export(Local::now().date_naive()) {
            Some(export) => export,
            None => {
                self.notice = Some("Nothing to export yet".to_string());
                return;
            }
        };

        self.notice = Some(match export.and_then(|e| e.save_to(&self.export_dir)) {
            Ok(path) => format!("Exported {}", path.display()),
            Err(e) => {
                tracing::error!(error = %e, "Export failed");
                format!("Export failed: {}", e)
            }
        });
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
    }

    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.previous();
    }

    pub fn next(&mut self) {
        let len = self.visible_len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.visible_len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn page_down(&mut self) {
        let len = self.visible_len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => (i + 20).min(len - 1),
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn page_up(&mut self) {
        if self.visible_len() == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => i.saturating_sub(20),
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn last(&mut self) {
        let len = self.visible_len();
        if len > 0 {
            self.state.select(Some(len - 1));
        }
    }

    /// Returns false when the app should quit
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return false,
            KeyCode::Enter => self.toggle_detail(),
            KeyCode::Tab => self.next_page(),
            KeyCode::BackTab => self.previous_page(),
            KeyCode::Char('c') => {
                self.clear_filters();
                self.current_page = Page::Records;
            }
            KeyCode::Char('s') => self.set_status_filter(self.review.status_filter.next()),
            KeyCode::Char('v') => self.set_severity_filter(self.review.severity_filter.next()),
            KeyCode::Char('e') => self.export(),
            KeyCode::Char(c @ '1'..='8') if self.current_page == Page::Views => {
                let n = c as usize - '1' as usize;
                if n < 4 {
                    self.set_status_filter(StatusFilter::ALL[n]);
                } else {
                    self.set_severity_filter(SeverityFilter::ALL[n - 4]);
                }
                self.current_page = Page::Records;
            }
            KeyCode::Down | KeyCode::Char('j') => self.next(),
            KeyCode::Up | KeyCode::Char('k') => self.previous(),
            KeyCode::PageDown => self.page_down(),
            KeyCode::PageUp => self.page_up(),
            KeyCode::Home => {
                if self.visible_len() > 0 {
                    self.state.select(Some(0));
                }
            }
            KeyCode::End => self.last(),
            _ => {
                tracing::trace!(?code, ?modifiers, "Unbound key");
            }
        }
        true
    }
}

pub fn run_ui(app: &mut App, loader: Receiver<Result<RecordStore, LoadError>>) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app, loader);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = %err, "UI loop failed");
        return Err(err.into());
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    loader: Receiver<Result<RecordStore, LoadError>>,
) -> io::Result<()> {
    let mut pending = Some(loader);

    loop {
        if let Some(rx) = &pending {
            match rx.try_recv() {
                Ok(result) => {
                    app.on_load(result);
                    pending = None;
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    app.on_load(Err(LoadError::Abandoned));
                    pending = None;
                }
            }
        }

        terminal.draw(|f| ui(f, app))?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if !app.handle_key(key.code, key.modifiers) {
                return Ok(());
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    if let Some(message) = app.review.failure() {
        render_load_failure(f, chunks[1], message);
    } else if app.review.is_loading() {
        render_loading(f, chunks[1]);
    } else if app.show_detail && app.current_page == Page::Records {
        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(65), // Record list
                Constraint::Percentage(35), // Error summary
            ])
            .split(chunks[1]);

        render_table(f, content_chunks[0], app);
        render_detail_panel(f, content_chunks[1], app);
    } else {
        match app.current_page {
            Page::Records => render_table(f, chunks[1], app),
            Page::Views => render_views(f, chunks[1], app),
            Page::Summary => render_summary(f, chunks[1], app),
        }
    }

    render_status_bar(f, chunks[2], app);
}

pub fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Critical => Color::Red,
        Severity::Warning => Color::Yellow,
        Severity::Valid => Color::Green,
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let pages = [Page::Records, Page::Views, Page::Summary];

    let mut tab_spans = vec![];
    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(page.title().to_string(), style));
    }

    if let Some(store) = app.review.store() {
        let summary = store.summary();
        tab_spans.push(Span::raw("  |  "));
        tab_spans.push(Span::styled(
            format!("Total: {}", summary.total),
            Style::default().fg(Color::White),
        ));
        tab_spans.push(Span::raw("  |  "));
        tab_spans.push(Span::styled(
            format!("✖ {}", summary.with_critical),
            Style::default().fg(Color::Red),
        ));
        tab_spans.push(Span::raw("  "));
        tab_spans.push(Span::styled(
            format!("⚠ {}", summary.with_warning),
            Style::default().fg(Color::Yellow),
        ));
        tab_spans.push(Span::raw("  "));
        tab_spans.push(Span::styled(
            format!("✔ {}", summary.clean),
            Style::default().fg(Color::Green),
        ));
    }

    let header = Paragraph::new(vec![Line::from(tab_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Data Review "),
    );

    f.render_widget(header, area);
}

fn render_loading(f: &mut Frame, area: Rect) {
    let loading = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "  Loading...",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
        )),
    ])
    .block(Block::default().borders(Borders::ALL).title(" Records "));

    f.render_widget(loading, area);
}

fn render_load_failure(f: &mut Frame, area: Rect, message: &str) {
    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "  Could not load records",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::raw(format!("  {}", message))),
        Line::from(""),
        Line::from(Span::styled(
            "  Press q to quit",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )),
    ];

    let panel = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red))
            .title(" Load Failed "),
    );

    f.render_widget(panel, area);
}

fn render_table(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = Field::ALL
        .iter()
        .map(|field| field.label())
        .chain(std::iter::once("Issues"))
        .map(|h| {
            Cell::from(h).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let visible = app.review.visible_records();
    let rows = visible.iter().map(|record| {
        let mut cells: Vec<Cell> = Field::ALL
            .iter()
            .map(|field| {
                let color = severity_color(record.severity_of(*field));
                Cell::from(truncate(record.value(*field), 28)).style(Style::default().fg(color))
            })
            .collect();

        let issue_count = record.issues().count();
        let issue_color = if record.has_severity(Severity::Critical) {
            Color::Red
        } else if issue_count > 0 {
            Color::Yellow
        } else {
            Color::Green
        };
        cells.push(Cell::from(format!("{}", issue_count)).style(Style::default().fg(issue_color)));

        Row::new(cells).height(1)
    });

    let title = format!(
        " Records (status: {}, severity: {}) ",
        app.review.status_filter, app.review.severity_filter
    );

    let table = Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Length(22),
            Constraint::Length(28),
            Constraint::Length(16),
            Constraint::Length(22),
            Constraint::Length(16),
            Constraint::Length(9),
            Constraint::Length(9),
            Constraint::Length(7),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(title),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let selected = app.state.selected().map(|i| i + 1).unwrap_or(0);
    let total = app.visible_len();

    let mut status_spans = vec![Span::styled(
        format!(" Row: {}/{} ", selected, total),
        Style::default().fg(Color::Cyan),
    )];

    if !app.review.status_filter.is_all() || !app.review.severity_filter.is_all() {
        status_spans.push(Span::raw(" | "));
        status_spans.push(Span::styled(
            format!(
                "Filter: {}/{}",
                app.review.status_filter, app.review.severity_filter
            ),
            Style::default().fg(Color::Green),
        ));
        status_spans.push(Span::raw(" ("));
        status_spans.push(Span::styled("c", Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(" clear)"));
    }

    if let Some(notice) = &app.notice {
        status_spans.push(Span::raw(" | "));
        status_spans.push(Span::styled(notice.clone(), Style::default().fg(Color::Magenta)));
    }

    for (key, label, color) in [
        ("Enter", " Details", Color::Yellow),
        ("s/v", " Filter", Color::Yellow),
        ("e", " Export", Color::Yellow),
        ("Tab", " Page", Color::Yellow),
        ("q", " Quit", Color::Red),
    ] {
        status_spans.push(Span::raw(" | "));
        status_spans.push(Span::styled(key, Style::default().fg(color)));
        status_spans.push(Span::raw(label));
    }

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

fn menu_line<'a>(active: bool, key: &'a str, label: String, color: Color) -> Line<'a> {
    Line::from(vec![
        Span::raw("  "),
        if active {
            Span::styled("→", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        } else {
            Span::raw(" ")
        },
        Span::styled(key, Style::default().fg(Color::Yellow)),
        Span::raw(". "),
        Span::styled(label, Style::default().fg(color)),
    ])
}

fn render_views(f: &mut Frame, area: Rect, app: &App) {
    let section = |title: &'static str| {
        Line::from(Span::styled(
            title,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
    };

    let keys = ["1", "2", "3", "4", "5", "6", "7", "8"];
    let mut content = vec![Line::from(""), section("  Status")];

    for (i, filter) in StatusFilter::ALL.iter().enumerate() {
        content.push(menu_line(
            app.review.status_filter == *filter,
            keys[i],
            filter.as_str().to_string(),
            Color::White,
        ));
    }

    content.push(Line::from(""));
    content.push(section("  Severity"));

    for (i, filter) in SeverityFilter::ALL.iter().enumerate() {
        let color = match filter {
            SeverityFilter::All => Color::White,
            SeverityFilter::Critical => Color::Red,
            SeverityFilter::Warning => Color::Yellow,
            SeverityFilter::Valid => Color::Green,
        };
        content.push(menu_line(
            app.review.severity_filter == *filter,
            keys[i + 4],
            filter.as_str().to_string(),
            color,
        ));
    }

    content.push(Line::from(""));
    content.push(Line::from(vec![
        Span::styled(
            "  Hint: ",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::ITALIC),
        ),
        Span::styled(
            "1-8 to filter, c to clear, e to export the current view",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ),
    ]));

    let paragraph = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Views - Status & Severity Filters "),
    );

    f.render_widget(paragraph, area);
}

fn render_summary(f: &mut Frame, area: Rect, app: &App) {
    let summary = app
        .review
        .store()
        .map(|s| s.summary())
        .unwrap_or_default();

    let row = |label: &'static str, count: usize, color: Color| {
        Line::from(vec![
            Span::styled(
                format!("  {:<24}", label),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("{:>5}", count), Style::default().fg(color)),
        ])
    };

    let content = vec![
        Line::from(""),
        row("Records", summary.total, Color::White),
        Line::from(""),
        row("Active", summary.active, Color::White),
        row("Pending", summary.pending, Color::White),
        row("Inactive", summary.inactive, Color::White),
        Line::from(""),
        row("With critical errors", summary.with_critical, Color::Red),
        row("With warnings", summary.with_warning, Color::Yellow),
        row("Without issues", summary.clean, Color::Green),
    ];

    let paragraph = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Summary "),
    );

    f.render_widget(paragraph, area);
}

fn render_detail_panel(f: &mut Frame, area: Rect, app: &App) {
    let record = match app.selected_record() {
        Some(r) => r,
        None => {
            let no_selection = Paragraph::new("No record selected").block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow))
                    .title(" Error Summary "),
            );
            f.render_widget(no_selection, area);
            return;
        }
    };

    let mut content = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(
                "  Record: ",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw(record.id.as_str()),
        ]),
        Line::from(vec![
            Span::styled(
                "  Name: ",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw(record.name.as_str()),
        ]),
        Line::from(""),
        Line::from("  ─────────────────────────────────────"),
        Line::from(""),
    ];

    if record.has_issues() {
        for (field, error) in record.issues() {
            let color = severity_color(error.severity);
            content.push(Line::from(vec![
                Span::styled(
                    format!("  {} ", field.label()),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("[{}]", error.severity),
                    Style::default().fg(color),
                ),
            ]));
            for line in wrap_text(&error.message, 35) {
                content.push(Line::from(Span::styled(
                    format!("    {}", line),
                    Style::default().fg(Color::Gray),
                )));
            }
            content.push(Line::from(""));
        }
    } else {
        for line in error_summary(record) {
            content.push(Line::from(Span::styled(
                format!("  {}", line),
                Style::default().fg(Color::Green),
            )));
        }
        content.push(Line::from(""));
    }

    content.push(Line::from(Span::styled(
        "  Press Enter to close",
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    )));

    let detail_panel = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Error Summary "),
    );

    f.render_widget(detail_panel, area);
}

fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current_line = String::new();

    for word in text.split_whitespace() {
        if !current_line.is_empty() && current_line.len() + word.len() + 1 > width {
            lines.push(std::mem::take(&mut current_line));
        }
        if !current_line.is_empty() {
            current_line.push(' ');
        }
        current_line.push_str(word);
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    lines
}
