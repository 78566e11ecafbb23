use anyhow::Result;
use atm_simulator::{mask, Status, Teller, PIN_LENGTH, VERSION};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use std::io;
use std::panic;
use std::sync::Arc;

/// Longest amount the form accepts
const MAX_AMOUNT_LEN: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Pin,
    Amount,
}

impl Field {
    pub fn next(&self) -> Self {
        match self {
            Field::Pin => Field::Amount,
            Field::Amount => Field::Pin,
        }
    }

    pub fn previous(&self) -> Self {
        // Only two fields, so both directions toggle
        self.next()
    }

    pub fn title(&self) -> &'static str {
        match self {
            Field::Pin => "Enter PIN",
            Field::Amount => "Amount (Deposit/Withdraw)",
        }
    }

    fn max_len(&self) -> usize {
        match self {
            Field::Pin => PIN_LENGTH,
            Field::Amount => MAX_AMOUNT_LEN,
        }
    }

    fn accepts(&self, c: char) -> bool {
        match self {
            Field::Pin => c.is_ascii_digit(),
            // Let malformed amounts through so the teller can reject them
            Field::Amount => c.is_ascii_digit() || c == '.' || c == '-',
        }
    }
}

pub struct App<'a> {
    pub teller: &'a mut Teller,
    pub focus: Field,
    pub show_new_pin_dialog: bool,
    pub new_pin_input: String,
    pub should_quit: bool,
}

impl<'a> App<'a> {
    pub fn new(teller: &'a mut Teller) -> Self {
        Self {
            teller,
            focus: Field::Pin,
            show_new_pin_dialog: false,
            new_pin_input: String::new(),
            should_quit: false,
        }
    }

    pub fn next_field(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn previous_field(&mut self) {
        self.focus = self.focus.previous();
    }

    fn focused_input(&mut self) -> &mut String {
        match self.focus {
            Field::Pin => &mut self.teller.pin_input,
            Field::Amount => &mut self.teller.amount_input,
        }
    }

    pub fn push_char(&mut self, c: char) {
        let field = self.focus;
        if !field.accepts(c) {
            return;
        }
        let input = self.focused_input();
        if input.len() < field.max_len() {
            input.push(c);
        }
    }

    pub fn backspace(&mut self) {
        self.focused_input().pop();
    }

    pub fn open_new_pin_dialog(&mut self) {
        self.new_pin_input.clear();
        self.show_new_pin_dialog = true;
    }

    pub fn close_new_pin_dialog(&mut self) {
        self.new_pin_input.clear();
        self.show_new_pin_dialog = false;
    }

    pub fn submit_new_pin(&mut self) {
        let new_pin = std::mem::take(&mut self.new_pin_input);
        self.teller.change_pin_action(&new_pin);
        self.show_new_pin_dialog = false;
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.show_new_pin_dialog {
            match key.code {
                KeyCode::Esc => self.close_new_pin_dialog(),
                KeyCode::Enter => self.submit_new_pin(),
                KeyCode::Backspace => {
                    self.new_pin_input.pop();
                }
                KeyCode::Char(c) if c.is_ascii_digit() && self.new_pin_input.len() < PIN_LENGTH => {
                    self.new_pin_input.push(c);
                }
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab => {
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    self.previous_field();
                } else {
                    self.next_field();
                }
            }
            KeyCode::BackTab | KeyCode::Up => self.previous_field(),
            KeyCode::Down => self.next_field(),
            KeyCode::Char('d') => {
                self.teller.deposit_action();
            }
            KeyCode::Char('w') => {
                self.teller.withdraw_action();
            }
            KeyCode::Char('b') => {
                self.teller.check_balance_action();
            }
            KeyCode::Char('p') => self.open_new_pin_dialog(),
            KeyCode::Char('c') => self.teller.clear_inputs(),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Char(c) => self.push_char(c),
            _ => {}
        }
    }
}

fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

/// Run `on_panic` before the current panic hook until the returned closure is called
fn install_panic_hook(on_panic: fn()) -> impl FnOnce() {
    let original_hook = Arc::new(panic::take_hook());

    let hook = Arc::clone(&original_hook);
    panic::set_hook(Box::new(move |panic_info| {
        on_panic();
        hook(panic_info);
    }));

    move || {
        let _ = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| original_hook(panic_info)));
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Restore the terminal if anything panics mid-draw
    let remove_panic_hook = install_panic_hook(restore_terminal);

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
    remove_panic_hook();

    if let Err(err) = &res {
        tracing::error!("UI error: {}", err);
    }

    Ok(res?)
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    while !app.should_quit {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            app.handle_key(key);
        }
    }
    Ok(())
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with field tabs
            Constraint::Min(0),    // Form + actions
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[1]);

    render_form(f, content_chunks[0], app);
    render_actions(f, content_chunks[1]);

    render_status_bar(f, chunks[2], app);

    if app.show_new_pin_dialog {
        let area = f.size();
        render_new_pin_dialog(f, area, app);
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let mut tab_spans = vec![Span::styled(
        " ATM Interface ",
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )];
    tab_spans.push(Span::raw("  |  "));

    for (i, field) in [Field::Pin, Field::Amount].iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *field == app.focus {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(field.title(), style));
    }

    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("v{}", VERSION),
        Style::default().fg(Color::DarkGray),
    ));

    let header = Paragraph::new(vec![Line::from(tab_spans)])
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn field_line<'a>(label: &'a str, value: String, focused: bool) -> Line<'a> {
    let (marker, value_style) = if focused {
        (
            Span::styled("→ ", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )
    } else {
        (Span::raw("  "), Style::default().fg(Color::White))
    };

    let cursor = if focused { "_" } else { "" };

    Line::from(vec![
        Span::raw("  "),
        marker,
        Span::styled(
            format!("{:<28}", label),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("{}{}", value, cursor), value_style),
    ])
}

fn render_form(f: &mut Frame, area: Rect, app: &App) {
    let content = vec![
        Line::from(""),
        field_line(
            "Enter PIN:",
            mask(&app.teller.pin_input),
            app.focus == Field::Pin,
        ),
        Line::from(""),
        field_line(
            "Amount (Deposit/Withdraw):",
            app.teller.amount_input.clone(),
            app.focus == Field::Amount,
        ),
        Line::from(""),
        Line::from(""),
        Line::from(vec![Span::styled(
            "  Type digits into the focused field. Tab switches fields.",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )]),
    ];

    let form = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Account "),
    );

    f.render_widget(form, area);
}

fn action_line(key: &'static str, label: &'static str, color: Color) -> Line<'static> {
    Line::from(vec![
        Span::raw("  ║ "),
        Span::styled(key, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        Span::styled(format!("{:<22}", label), Style::default().fg(color)),
        Span::raw("║"),
    ])
}

fn render_actions(f: &mut Frame, area: Rect) {
    let content = vec![
        Line::from(""),
        Line::from("  ╔═════════════════════════╗"),
        action_line("d", "Deposit", Color::Green),
        action_line("w", "Withdraw", Color::Red),
        Line::from("  ╠═════════════════════════╣"),
        action_line("b", "Check Balance", Color::Cyan),
        action_line("p", "Change PIN", Color::Yellow),
        Line::from("  ╠═════════════════════════╣"),
        action_line("c", "Clear fields", Color::White),
        action_line("q", "Exit", Color::DarkGray),
        Line::from("  ╚═════════════════════════╝"),
    ];

    let actions = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Actions "),
    );

    f.render_widget(actions, area);
}

/// Green on success, yellow for a wrong PIN, red for anything else
fn status_color(status: &Status) -> Color {
    if status.success {
        Color::Green
    } else if status.auth_failure {
        Color::Yellow
    } else {
        Color::Red
    }
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let status = app.teller.status();
    let color = status_color(status);

    let status_spans = vec![
        Span::styled(
            format!(" {} ", status.at.format("%H:%M:%S")),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw("| "),
        Span::styled(status.message.clone(), Style::default().fg(color)),
    ];

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Status "),
    );

    f.render_widget(status_bar, area);
}

fn render_new_pin_dialog(f: &mut Frame, area: Rect, app: &App) {
    let dialog_area = centered_rect(40, 7, area);

    let content = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  Enter new PIN: ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::styled(
                format!("{}_", mask(&app.new_pin_input)),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
        Line::from(vec![Span::styled(
            "  Enter confirm | Esc cancel",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )]),
    ];

    let dialog = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" New PIN "),
    );

    f.render_widget(Clear, dialog_area);
    f.render_widget(dialog, dialog_area);
}

/// Fixed-size rect centered in `area`, clipped to fit
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
