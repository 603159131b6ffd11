use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use split_bill::{format_amount, BalanceStatus, FriendId, Payer, SplitApp, SplitError};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddField {
    Name,
    Image,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitField {
    Bill,
    Expense,
    Payer,
}

impl SplitField {
    pub fn next(&self) -> Self {
        match self {
            SplitField::Bill => SplitField::Expense,
            SplitField::Expense => SplitField::Payer,
            SplitField::Payer => SplitField::Bill,
        }
    }
}

/// Which panel receives key presses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Friends,
    AddFriend(AddField),
    Split(SplitField),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

pub struct App {
    pub core: SplitApp,
    pub state: TableState,
    pub focus: Focus,
    /// Raw text of the split amount fields, mirrors what the draft accepted
    pub bill_input: String,
    pub expense_input: String,
    pub message: Option<String>,
}

impl App {
    pub fn new(core: SplitApp) -> Self {
        let mut state = TableState::default();
        if !core.friends().is_empty() {
            state.select(Some(0));
        }

        Self {
            core,
            state,
            focus: Focus::Friends,
            bill_input: String::new(),
            expense_input: String::new(),
            message: None,
        }
    }

    pub fn next(&mut self) {
        let len = self.core.friends().len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.core.friends().len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    fn report(&mut self, err: SplitError) {
        self.message = Some(err.to_string());
    }

    fn reset_split_inputs(&mut self) {
        self.bill_input.clear();
        self.expense_input.clear();
    }

    /// Select/deselect the friend under the cursor
    pub fn toggle_cursor_friend(&mut self) {
        let Some(id) = self
            .state
            .selected()
            .and_then(|i| self.core.friends().get(i))
            .map(|f| f.id.clone())
        else {
            return;
        };
        self.toggle_friend(&id);
    }

    /// Close the split panel by deselecting whoever is selected
    pub fn close_split(&mut self) {
        if let Some(id) = self.core.selection().selected().cloned() {
            self.toggle_friend(&id);
        }
    }

    fn toggle_friend(&mut self, id: &FriendId) {
        match self.core.toggle_select(id).map(|selection| selection.is_none()) {
            Ok(deselected) => {
                self.focus = if deselected {
                    Focus::Friends
                } else {
                    Focus::Split(SplitField::Bill)
                };
                self.reset_split_inputs();
            }
            Err(err) => self.report(err),
        }
    }

    pub fn toggle_add_form(&mut self) {
        self.core.toggle_add_form();
        self.reset_split_inputs();
        self.focus = if self.core.add_form().open {
            Focus::AddFriend(AddField::Name)
        } else {
            Focus::Friends
        };
    }

    fn edit_add_field(&mut self, field: AddField, edit: impl FnOnce(&mut String)) {
        let form = self.core.add_form();
        let mut text = match field {
            AddField::Name => form.name.clone(),
            AddField::Image => form.image_template.clone(),
        };
        edit(&mut text);
        match field {
            AddField::Name => self.core.set_friend_name(&text),
            AddField::Image => self.core.set_image_template(&text),
        }
    }

    fn submit_add_form(&mut self) {
        match self.core.submit_new_friend() {
            Ok(_) => {
                self.message = Some("Friend added".to_string());
                self.focus = Focus::Friends;
                let last = self.core.friends().len().saturating_sub(1);
                self.state.select(Some(last));
            }
            Err(err) => self.report(err),
        }
    }

    fn edit_split_field(&mut self, field: SplitField, edit: impl FnOnce(&mut String)) {
        match field {
            SplitField::Bill => {
                let mut candidate = self.bill_input.clone();
                edit(&mut candidate);
                match self.core.set_bill_total(&candidate) {
                    Ok(()) => self.bill_input = candidate,
                    Err(err) => self.report(err),
                }
            }
            SplitField::Expense => {
                let mut candidate = self.expense_input.clone();
                edit(&mut candidate);
                match self.core.set_payer_expense(&candidate) {
                    Ok(true) => self.expense_input = candidate,
                    Ok(false) => {
                        self.message = Some("Your expense can't exceed the bill".to_string())
                    }
                    Err(err) => self.report(err),
                }
            }
            SplitField::Payer => {}
        }
    }

    fn flip_payer(&mut self) {
        let current = self.core.draft().map(|d| d.payer).unwrap_or_default();
        if let Err(err) = self.core.set_payer(current.other()) {
            self.report(err);
        }
    }

    fn submit_split(&mut self) {
        let name = self
            .core
            .selected_friend()
            .map(|f| f.name.clone())
            .unwrap_or_default();

        match self.core.submit_split() {
            Ok(balance) => {
                self.message = Some(format!(
                    "Split recorded with {}, balance now {}",
                    name,
                    format_amount(balance)
                ));
                self.focus = Focus::Friends;
                self.reset_split_inputs();
            }
            Err(err) => self.report(err),
        }
    }
}

/// Map one key press onto at most one core operation
pub fn handle_key(app: &mut App, key: KeyEvent) -> Action {
    app.message = None;

    match app.focus {
        Focus::Friends => match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Action::Quit,
            KeyCode::Down | KeyCode::Char('j') => app.next(),
            KeyCode::Up | KeyCode::Char('k') => app.previous(),
            KeyCode::Enter | KeyCode::Char(' ') => app.toggle_cursor_friend(),
            KeyCode::Char('a') => app.toggle_add_form(),
            KeyCode::Tab if app.core.add_form().open => {
                app.focus = Focus::AddFriend(AddField::Name)
            }
            KeyCode::Tab if app.core.selected_friend().is_some() => {
                app.focus = Focus::Split(SplitField::Bill)
            }
            _ => {}
        },
        Focus::AddFriend(field) => match key.code {
            KeyCode::Esc => app.toggle_add_form(),
            KeyCode::Tab => {
                app.focus = Focus::AddFriend(match field {
                    AddField::Name => AddField::Image,
                    AddField::Image => AddField::Name,
                })
            }
            KeyCode::BackTab => app.focus = Focus::Friends,
            KeyCode::Enter => app.submit_add_form(),
            KeyCode::Backspace => app.edit_add_field(field, |s| {
                s.pop();
            }),
            KeyCode::Char(c) => app.edit_add_field(field, |s| s.push(c)),
            _ => {}
        },
        Focus::Split(field) => match key.code {
            KeyCode::Esc => app.close_split(),
            KeyCode::Tab => app.focus = Focus::Split(field.next()),
            KeyCode::BackTab => app.focus = Focus::Friends,
            KeyCode::Enter => app.submit_split(),
            KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') if field == SplitField::Payer => {
                app.flip_payer()
            }
            KeyCode::Backspace => app.edit_split_field(field, |s| {
                s.pop();
            }),
            KeyCode::Char(c) if c.is_ascii_digit() || c == '.' => {
                app.edit_split_field(field, |s| s.push(c))
            }
            _ => {}
        },
    }

    Action::Continue
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = %err, "ui loop failed");
        println!("Error: {:?}", err);
    }

    Ok(())
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
            if handle_key(app, key) == Action::Quit {
                return Ok(());
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(55), // Sidebar: friends + add form
            Constraint::Percentage(45), // Split form
        ])
        .split(chunks[1]);

    let sidebar_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(if app.core.add_form().open {
            [Constraint::Min(0), Constraint::Length(6)]
        } else {
            [Constraint::Min(0), Constraint::Length(0)]
        })
        .split(content_chunks[0]);

    render_friends(f, sidebar_chunks[0], app);
    if app.core.add_form().open {
        render_add_form(f, sidebar_chunks[1], app);
    }
    render_split_form(f, content_chunks[1], app);

    render_status_bar(f, chunks[2], app);
}

fn focused_border(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::White)
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let friends = app.core.friends();
    let owed: f64 = friends.iter().filter(|fr| fr.balance > 0.0).map(|fr| fr.balance).sum();
    let owing: f64 = friends.iter().filter(|fr| fr.balance < 0.0).map(|fr| -fr.balance).sum();
    let currency = app.core.currency();

    let spans = vec![
        Span::styled(
            "Eat-'n-Split",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("Friends: {}", friends.len()),
            Style::default().fg(Color::White),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("Owed to you: {} {}", format_amount(owed), currency),
            Style::default().fg(Color::Green),
        ),
        Span::raw("  "),
        Span::styled(
            format!("You owe: {} {}", format_amount(owing), currency),
            Style::default().fg(Color::Red),
        ),
    ];

    let header = Paragraph::new(vec![Line::from(spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(header, area);
}

fn render_friends(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = ["Friend", "Balance", ""].iter().map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let currency = app.core.currency().to_string();
    let rows: Vec<Row> = app
        .core
        .friends()
        .iter()
        .map(|friend| {
            let color = match friend.status() {
                BalanceStatus::Owes => Color::Red,
                BalanceStatus::Owed => Color::Green,
                BalanceStatus::Even => Color::White,
            };
            let selected = app.core.is_selected(&friend.id);
            let button = if selected { "[Close]" } else { "[Select]" };

            let row = Row::new(vec![
                Cell::from(truncate(&friend.name, 20)),
                Cell::from(friend.describe_balance(&currency)).style(Style::default().fg(color)),
                Cell::from(button),
            ])
            .height(1);

            if selected {
                row.style(Style::default().bg(Color::Rgb(60, 50, 20)))
            } else {
                row
            }
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(22),
            Constraint::Min(20),
            Constraint::Length(9),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(focused_border(app.focus == Focus::Friends))
            .title(" Friends "),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn field_line<'a>(label: &'a str, value: String, focused: bool) -> Line<'a> {
    let value_style = if focused {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::UNDERLINED)
    } else {
        Style::default().fg(Color::White)
    };
    Line::from(vec![
        Span::styled(
            format!("  {:<22}", label),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(value, value_style),
    ])
}

fn render_add_form(f: &mut Frame, area: Rect, app: &App) {
    let form = app.core.add_form();
    let focus = app.focus;

    let content = vec![
        Line::from(""),
        field_line(
            "Friend name",
            form.name.clone(),
            focus == Focus::AddFriend(AddField::Name),
        ),
        field_line(
            "Image URL",
            form.image_template.clone(),
            focus == Focus::AddFriend(AddField::Image),
        ),
    ];

    let panel = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(focused_border(matches!(focus, Focus::AddFriend(_))))
            .title(" Add Friend (Enter to add) "),
    );

    f.render_widget(panel, area);
}

fn render_split_form(f: &mut Frame, area: Rect, app: &App) {
    let (friend, draft) = match (app.core.selected_friend(), app.core.draft()) {
        (Some(friend), Some(draft)) => (friend, draft),
        _ => {
            let hint = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "  Select a friend to split a bill",
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::ITALIC),
                )),
            ])
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::White))
                    .title(" Split a bill "),
            );
            f.render_widget(hint, area);
            return;
        }
    };

    let focus = app.focus;
    let friend_expense_label = format!("{}'s expense", friend.name);
    let payer_value = [Payer::User, Payer::Friend]
        .iter()
        .map(|p| {
            let label = p.label(&friend.name);
            if *p == draft.payer {
                format!("({}) ", label)
            } else {
                format!(" {}  ", label)
            }
        })
        .collect::<String>();

    let content = vec![
        Line::from(""),
        field_line(
            "Bill value",
            app.bill_input.clone(),
            focus == Focus::Split(SplitField::Bill),
        ),
        field_line(
            "Your expense",
            app.expense_input.clone(),
            focus == Focus::Split(SplitField::Expense),
        ),
        Line::from(vec![
            Span::styled(
                format!("  {:<22}", friend_expense_label),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(
                format_amount(draft.friend_expense()),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        field_line(
            "Who is paying the bill",
            payer_value,
            focus == Focus::Split(SplitField::Payer),
        ),
        Line::from(""),
        Line::from(Span::styled(
            "  Enter to split, Esc to close",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )),
    ];

    let panel = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(focused_border(matches!(focus, Focus::Split(_))))
            .title(format!(" Split a bill with {} ", friend.name)),
    );

    f.render_widget(panel, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut status_spans = Vec::new();

    if let Some(message) = &app.message {
        status_spans.push(Span::styled(
            format!(" {} ", message),
            Style::default().fg(Color::Magenta),
        ));
        status_spans.push(Span::raw("| "));
    }

    let hints: Vec<(&str, &str)> = match app.focus {
        Focus::Friends => vec![
            ("Enter", " Select | "),
            ("a", if app.core.add_form().open { " Close | " } else { " Add Friend | " }),
            ("↑/↓", " Nav | "),
        ],
        Focus::AddFriend(_) => vec![("Tab", " Field | "), ("Enter", " Add | "), ("Esc", " Close | ")],
        Focus::Split(_) => vec![
            ("Tab", " Field | "),
            ("←/→", " Payer | "),
            ("Enter", " Split | "),
            ("Esc", " Close | "),
        ],
    };
    for (key, text) in hints {
        status_spans.push(Span::styled(key, Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(text));
    }
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
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use ratatui::backend::TestBackend;
    use split_bill::{Config, SequentialIds};

    fn app() -> App {
        let core = SplitApp::with_ids(&Config::default(), Box::new(SequentialIds::new("t-")));
        App::new(core)
    }

    fn press(app: &mut App, code: KeyCode) -> Action {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn screen(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|f| ui(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_quit() {
        let mut app = app();
        assert_eq!(press(&mut app, KeyCode::Char('q')), Action::Quit);
    }

    #[test]
    fn test_split_with_clark_via_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.focus, Focus::Split(SplitField::Bill));

        type_text(&mut app, "20");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "12");
        assert_eq!(app.core.draft().unwrap().friend_expense(), 8.0);

        press(&mut app, KeyCode::Enter);

        assert_eq!(app.core.friends()[0].balance, 1.0);
        assert!(app.core.selection().is_none());
        assert_eq!(app.focus, Focus::Friends);
        assert!(app.bill_input.is_empty());
    }

    #[test]
    fn test_friend_pays_via_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "30");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "10");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.core.draft().unwrap().payer, Payer::Friend);

        press(&mut app, KeyCode::Enter);

        assert_eq!(app.core.friends()[1].balance, 10.0);
    }

    #[test]
    fn test_expense_over_bill_is_refused() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "50");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "10");
        type_text(&mut app, "0");

        assert_eq!(app.expense_input, "10");
        assert_eq!(app.core.draft().unwrap().payer_expense, Some(10.0));
        assert!(app.message.is_some());
    }

    #[test]
    fn test_empty_split_submit_reports_and_keeps_selection() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Enter);

        assert!(app.core.selected_friend().is_some());
        assert!(app.message.as_deref().unwrap_or("").contains("Bill value is required"));
    }

    #[test]
    fn test_add_friend_via_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.focus, Focus::AddFriend(AddField::Name));

        type_text(&mut app, "Dana");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.core.friends().len(), 4);
        assert_eq!(app.core.friends()[3].name, "Dana");
        assert!(!app.core.add_form().open);
        assert_eq!(app.state.selected(), Some(3));
    }

    #[test]
    fn test_add_friend_empty_name_stays_open() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.core.friends().len(), 3);
        assert!(app.core.add_form().open);
        assert_eq!(app.focus, Focus::AddFriend(AddField::Name));
    }

    #[test]
    fn test_escape_from_split_deselects() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Esc);

        assert!(app.core.selection().is_none());
        assert_eq!(app.focus, Focus::Friends);
    }

    #[test]
    fn test_escape_closes_selected_even_after_cursor_moves() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::BackTab);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Esc);

        assert!(app.core.selection().is_none());
    }

    #[test]
    fn test_render_shows_balances_and_split_form() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);

        let text = screen(&mut app);

        assert!(text.contains("You owe Clark 7 €"));
        assert!(text.contains("Sarah owes you 20 €"));
        assert!(text.contains("Split a bill with Clark"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Clark", 20), "Clark");
        assert_eq!(truncate("Bartholomew Featherstonehaugh", 10), "Barthol...");
    }
}
