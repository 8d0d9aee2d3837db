// 🖥️ Terminal browser - one page per college plus the dashboard totals
//
// Read-only: clubs are edited through the API server.

use anyhow::Result;
use club_directory::{BrowseView, Club, College, RegistryStats, Selection};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    College(College),
    Stats,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::College(College::Ggce) => Page::Stats,
            Page::College(college) => Page::College(college.next()),
            Page::Stats => Page::College(College::Ggits),
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Page::College(College::Ggits) => Page::Stats,
            Page::College(college) => Page::College(college.previous()),
            Page::Stats => Page::College(College::Ggce),
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::College(college) => college.as_str(),
            Page::Stats => "Stats",
        }
    }

    const ALL: [Page; 4] = [
        Page::College(College::Ggits),
        Page::College(College::Ggct),
        Page::College(College::Ggce),
        Page::Stats,
    ];
}

pub struct App {
    pub view: BrowseView,
    /// Clubs on the current college page, refreshed on every page change
    pub clubs: Vec<Club>,
    pub state: TableState,
    pub current_page: Page,
    pub show_detail: bool,
}

impl App {
    pub fn new(view: BrowseView) -> Self {
        let mut app = Self {
            view,
            clubs: Vec::new(),
            state: TableState::default(),
            current_page: Page::College(College::default()),
            show_detail: false,
        };
        app.refresh();
        app
    }

    /// Re-read the registry for the current page
    pub fn refresh(&mut self) {
        self.clubs = match self.current_page {
            Page::College(college) => self.view.clubs_for(college).collect(),
            Page::Stats => Vec::new(),
        };
        if self.clubs.is_empty() {
            self.state.select(None);
        } else {
            let keep = self.state.selected().unwrap_or(0).min(self.clubs.len() - 1);
            self.state.select(Some(keep));
        }
    }

    pub fn toggle_detail(&mut self) {
        self.show_detail = !self.show_detail;
    }

    /// Resolved by id, so a club removed since the last refresh selects nothing
    pub fn selection(&self) -> Selection {
        let id = self
            .state
            .selected()
            .and_then(|i| self.clubs.get(i))
            .map(|club| club.id.as_str());
        self.view.select(id)
    }

    pub fn stats(&self) -> RegistryStats {
        self.view.stats()
    }

    pub fn set_page(&mut self, page: Page) {
        if page != self.current_page {
            self.current_page = page;
            self.state.select(None);
            self.show_detail = false;
            self.refresh();
        }
    }

    pub fn next_page(&mut self) {
        self.set_page(self.current_page.next());
    }

    pub fn previous_page(&mut self) {
        self.set_page(self.current_page.previous());
    }

    pub fn next(&mut self) {
        let len = self.clubs.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i >= len - 1 => 0,
            Some(i) => i + 1,
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.clubs.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res.map_err(Into::into)
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Enter => app.toggle_detail(),
                KeyCode::BackTab => app.previous_page(),
                KeyCode::Tab => {
                    if key.modifiers.contains(KeyModifiers::SHIFT) {
                        app.previous_page();
                    } else {
                        app.next_page();
                    }
                }
                KeyCode::Char('s') => app.set_page(Page::Stats),
                KeyCode::Char('r') => app.refresh(),
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                _ => {}
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

    match app.current_page {
        Page::College(college) if app.show_detail => {
            let content_chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
                .split(chunks[1]);

            render_table(f, content_chunks[0], app, college);
            render_detail_panel(f, content_chunks[1], app);
        }
        Page::College(college) => render_table(f, chunks[1], app, college),
        Page::Stats => render_stats(f, chunks[1], app),
    }

    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let mut tab_spans = vec![];
    for (i, page) in Page::ALL.iter().enumerate() {
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

    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("Clubs: {}", app.stats().total_clubs),
        Style::default().fg(Color::White),
    ));

    let header = Paragraph::new(vec![Line::from(tab_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(header, area);
}

fn render_table(f: &mut Frame, area: Rect, app: &mut App, college: College) {
    let header_cells = ["Club", "Founded", "Members", "Events"].iter().map(|h| {
        Cell::from(*h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = app.clubs.iter().map(|club| {
        Row::new(vec![
            Cell::from(truncate(&club.name, 30)),
            Cell::from(club.founding_year.to_string()),
            Cell::from(club.member_count.to_string()).style(Style::default().fg(Color::Green)),
            Cell::from(club.past_events.len().to_string()),
        ])
        .height(1)
    });

    let title = if app.clubs.is_empty() {
        format!(" {} - no clubs yet ", college)
    } else {
        format!(" {} Clubs ", college)
    };

    let table = Table::new(
        rows,
        [
            Constraint::Min(20),
            Constraint::Length(9),
            Constraint::Length(9),
            Constraint::Length(8),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(title),
    )
    .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn label(text: &str) -> Span<'_> {
    Span::styled(text, Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
}

fn section(text: &str) -> Line<'_> {
    Line::from(Span::styled(
        text,
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
    ))
}

fn render_detail_panel(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Club Details ");

    let club = match app.selection() {
        Selection::Club(club) => club,
        Selection::Nothing => {
            f.render_widget(Paragraph::new("No club selected").block(block), area);
            return;
        }
    };

    let mut content = vec![
        Line::from(vec![label("Name: "), Span::raw(club.name.clone())]),
        Line::from(vec![label("College: "), Span::raw(club.college.to_string())]),
        Line::from(vec![
            label("Founded: "),
            Span::raw(club.founding_year.to_string()),
            Span::raw("   "),
            label("Members: "),
            Span::styled(club.member_count.to_string(), Style::default().fg(Color::Green)),
        ]),
        Line::from(vec![
            label("Register: "),
            Span::styled(club.registration_link.clone(), Style::default().fg(Color::Green)),
        ]),
        Line::from(""),
        section("ABOUT"),
        Line::from(Span::styled(
            club.description.clone(),
            Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
        )),
        Line::from(""),
        section("PAST EVENTS"),
    ];

    if club.past_events.is_empty() {
        content.push(Line::from(Span::styled(
            "No events yet",
            Style::default().fg(Color::DarkGray),
        )));
    }
    for event in &club.past_events {
        content.push(Line::from(""));
        content.push(Line::from(vec![
            Span::styled(event.title.clone(), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!("  {}", event.date.format("%b %-d, %Y"))),
        ]));
        content.push(Line::from(Span::raw(event.description.clone())));
        content.push(Line::from(Span::styled(
            format!("{} participants", event.participants),
            Style::default().fg(Color::Green),
        )));
    }

    let detail_panel = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: true });

    f.render_widget(detail_panel, area);
}

fn render_stats(f: &mut Frame, area: Rect, app: &App) {
    let stats = app.stats();

    let mut content = vec![
        Line::from(""),
        section("  DIRECTORY TOTALS"),
        Line::from(""),
        Line::from(vec![label("  Clubs:   "), Span::raw(stats.total_clubs.to_string())]),
        Line::from(vec![
            label("  Members: "),
            Span::styled(stats.total_members.to_string(), Style::default().fg(Color::Green)),
        ]),
        Line::from(vec![label("  Events:  "), Span::raw(stats.total_events.to_string())]),
        Line::from(""),
        section("  BY COLLEGE"),
        Line::from(""),
    ];

    for summary in app.view.college_summaries() {
        content.push(Line::from(vec![
            label("  "),
            Span::styled(
                format!("{:<6}", summary.college.as_str()),
                Style::default().fg(Color::Yellow),
            ),
            Span::raw(format!("{} clubs", summary.club_count)),
        ]));
    }

    let panel = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Stats "),
    );

    f.render_widget(panel, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut status_spans = Vec::new();

    if let Page::College(_) = app.current_page {
        let selected = app.state.selected().map(|i| i + 1).unwrap_or(0);
        status_spans.push(Span::styled(
            format!(" Club: {}/{} ", selected, app.clubs.len()),
            Style::default().fg(Color::Cyan),
        ));
        status_spans.push(Span::raw(" | "));
        status_spans.push(Span::styled("Enter", Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(" Details | "));
        status_spans.push(Span::styled("↑/↓", Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(" Nav | "));
    }

    status_spans.push(Span::styled("Tab", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" College | "));
    status_spans.push(Span::styled("s", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Stats | "));
    status_spans.push(Span::styled("r", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Reload | "));
    status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
    status_spans.push(Span::raw(" Quit"));

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
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

// ============================================================================
// TESTS
// ============================================================================
