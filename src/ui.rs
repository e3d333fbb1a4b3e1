use crate::client::{
    DEFAULT_STARTING_STACK,
    SessionState,
    TableSnapshot,
};
use color_eyre::eyre::{
    Result,
    eyre,
};
use crossterm::{
    event::{
        Event,
        EventStream,
        KeyCode,
        KeyEventKind,
    },
    terminal::{
        disable_raw_mode,
        enable_raw_mode,
    },
};
use futures::StreamExt;
use itertools::Itertools;
use ratatui::{
    prelude::*,
    widgets::*,
};
use std::io::stdout;
use unicode_width::{
    UnicodeWidthChar,
    UnicodeWidthStr,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum UserEvent {
    Quit,
    Redraw,
    StartHand,
    Fold,
    Check,
    Call,
    Bet,
    Raise,
    AllIn,
    IncBet,
    DecBet,
    IncRaise,
    DecRaise,
    SyncState,
    RefreshHistory,
    ConfirmReset { starting_stack: u64 },
    ConfirmStacks { stack: u64 },
}

#[derive(Debug)]
pub struct UiState {
    mode: Mode,
    terminal: Option<Terminal<CrosstermBackend<std::io::Stdout>>>,
}

impl Default for UiState {
    fn default() -> Self {
        UiState {
            mode: Mode::Normal,
            terminal: None,
        }
    }
}

#[derive(Clone, Debug, Default)]
enum Mode {
    #[default]
    Normal,
    ResetModal(AmountState),
    StacksModal(AmountState),
    QuitModal,
}

#[derive(Clone, Debug)]
struct AmountState {
    amount: u64,
}

impl Default for AmountState {
    fn default() -> Self {
        AmountState {
            amount: DEFAULT_STARTING_STACK,
        }
    }
}

fn edit_amount(amount: &mut u64, code: KeyCode) -> bool {
    match code {
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('+') => {
            *amount = amount.saturating_add(1);
            true
        }
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('-') => {
            *amount = amount.saturating_sub(1).max(1);
            true
        }
        KeyCode::Backspace => {
            *amount /= 10;
            true
        }
        KeyCode::Char(c) if c.is_ascii_digit() => {
            let d = c.to_digit(10).unwrap() as u64;
            *amount = amount.saturating_mul(10).saturating_add(d);
            true
        }
        _ => false,
    }
}

pub type InputEvents = EventStream;

pub fn input_event_stream() -> InputEvents {
    EventStream::new()
}

pub async fn next_raw_event(events: &mut InputEvents) -> Result<Event> {
    match events.next().await {
        Some(Ok(event)) => Ok(event),
        Some(Err(err)) => Err(eyre!("input stream error: {err}")),
        None => Err(eyre!("input event stream closed")),
    }
}

pub fn terminal_enter(state: &mut UiState) -> Result<()> {
    enable_raw_mode()?;
    crossterm::execute!(
        std::io::stdout(),
        crossterm::terminal::EnterAlternateScreen,
        crossterm::event::EnableMouseCapture
    )?;
    // One persistent Terminal so buffers survive across draws
    let backend = CrosstermBackend::new(stdout());
    let terminal = Terminal::new(backend)?;
    state.terminal = Some(terminal);
    Ok(())
}

pub fn terminal_exit() -> Result<()> {
    disable_raw_mode()?;
    crossterm::execute!(
        std::io::stdout(),
        crossterm::event::DisableMouseCapture,
        crossterm::terminal::LeaveAlternateScreen
    )?;
    Ok(())
}

pub fn interpret_event(state: &mut UiState, event: Event) -> Option<UserEvent> {
    let key = match event {
        Event::Key(k) if k.kind == KeyEventKind::Press => k,
        Event::Resize(_, _) => return Some(UserEvent::Redraw),
        _ => return None,
    };
    match &mut state.mode {
        Mode::ResetModal(amount_state) => match key.code {
            KeyCode::Esc => {
                state.mode = Mode::Normal;
                Some(UserEvent::Redraw)
            }
            KeyCode::Enter => {
                let starting_stack = amount_state.amount.max(1);
                state.mode = Mode::Normal;
                Some(UserEvent::ConfirmReset { starting_stack })
            }
            code => edit_amount(&mut amount_state.amount, code)
                .then_some(UserEvent::Redraw),
        },
        Mode::StacksModal(amount_state) => match key.code {
            KeyCode::Esc => {
                state.mode = Mode::Normal;
                Some(UserEvent::Redraw)
            }
            KeyCode::Enter => {
                let stack = amount_state.amount.max(1);
                state.mode = Mode::Normal;
                Some(UserEvent::ConfirmStacks { stack })
            }
            code => edit_amount(&mut amount_state.amount, code)
                .then_some(UserEvent::Redraw),
        },
        Mode::QuitModal => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => Some(UserEvent::Quit),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                state.mode = Mode::Normal;
                Some(UserEvent::Redraw)
            }
            _ => None,
        },
        Mode::Normal => match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                state.mode = Mode::QuitModal;
                Some(UserEvent::Redraw)
            }
            KeyCode::Char('n') => Some(UserEvent::StartHand),
            KeyCode::Char('f') => Some(UserEvent::Fold),
            KeyCode::Char('x') => Some(UserEvent::Check),
            KeyCode::Char('c') => Some(UserEvent::Call),
            KeyCode::Char('b') => Some(UserEvent::Bet),
            KeyCode::Char('r') => Some(UserEvent::Raise),
            KeyCode::Char('a') => Some(UserEvent::AllIn),
            KeyCode::Char('+') | KeyCode::Char('=') => Some(UserEvent::IncBet),
            KeyCode::Char('-') => Some(UserEvent::DecBet),
            KeyCode::Char(']') => Some(UserEvent::IncRaise),
            KeyCode::Char('[') => Some(UserEvent::DecRaise),
            KeyCode::Char('g') => Some(UserEvent::SyncState),
            KeyCode::Char('h') => Some(UserEvent::RefreshHistory),
            KeyCode::Char('t') => {
                state.mode = Mode::ResetModal(AmountState::default());
                Some(UserEvent::Redraw)
            }
            KeyCode::Char('s') => {
                state.mode = Mode::StacksModal(AmountState::default());
                Some(UserEvent::Redraw)
            }
            _ => None,
        },
    }
}

pub fn draw(state: &mut UiState, snap: &TableSnapshot) -> Result<()> {
    if let Some(mut term) = state.terminal.take() {
        term.draw(|f| ui(f, state, snap))?;
        state.terminal = Some(term);
    }
    Ok(())
}

fn ui(f: &mut Frame, state: &UiState, snap: &TableSnapshot) {
    f.render_widget(Clear, f.area());
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(12),   // table + history
            Constraint::Length(5), // status/errors
            Constraint::Length(3), // help
        ])
        .split(f.area());

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[0]);

    draw_table(f, panes[0], snap);
    draw_history(f, panes[1], snap);
    draw_bottom(f, chunks[1], snap);
    draw_help(f, chunks[2]);
    draw_modals(f, state);
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

fn draw_table(f: &mut Frame, area: Rect, snap: &TableSnapshot) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(area);

    let title = match &snap.session {
        SessionState::InProgress { hand_id } => {
            format!("Playing Field | Hand {}", short_id(hand_id))
        }
        SessionState::Idle => String::from("Playing Field | Idle"),
    };
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner_height = block.inner(rows[0]).height as usize;
    let mut lines: Vec<Line> = Vec::new();
    if snap.transcript.is_empty() {
        lines.push(Line::styled(
            "No hand dealt yet; press n",
            Style::default().fg(Color::DarkGray),
        ));
    } else {
        for entry in &snap.transcript {
            lines.push(Line::from(entry.clone()));
        }
    }
    // keep the newest entries in view
    let scroll = lines.len().saturating_sub(inner_height) as u16;
    let log = Paragraph::new(lines).block(block).scroll((scroll, 0));
    f.render_widget(log, rows[0]);

    let segments = [
        String::from("[n] deal"),
        String::from("[f] fold"),
        String::from("[x] check"),
        String::from("[c] call"),
        format!("[b] bet {} (-/+)", snap.bet),
        format!("[r] raise {} ([/])", snap.raise),
        String::from("[a] all-in"),
    ];
    let bar = Paragraph::new(segments.iter().join("  "))
        .block(Block::default().borders(Borders::ALL).title("Actions"));
    f.render_widget(bar, rows[1]);
}

fn draw_history(f: &mut Frame, area: Rect, snap: &TableSnapshot) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Hand History ({})", snap.records.len()));
    let width = block.inner(area).width as usize;
    let mut lines: Vec<Line> = Vec::new();
    if snap.records.is_empty() {
        lines.push(Line::styled("None", Style::default().fg(Color::DarkGray)));
    } else {
        for record in &snap.records {
            for (i, line) in record.lines().into_iter().enumerate() {
                let fitted = fit_width(&line, width);
                if i == 0 {
                    lines.push(Line::styled(
                        fitted,
                        Style::default().add_modifier(Modifier::BOLD),
                    ));
                } else {
                    lines.push(Line::from(fitted));
                }
            }
            lines.push(Line::from(""));
        }
    }
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_bottom(f: &mut Frame, area: Rect, snap: &TableSnapshot) {
    let widget = if snap.errors.is_empty() {
        let mut lines: Vec<Line> = Vec::new();
        if snap.status.trim().is_empty() {
            lines.push(Line::from("Ready"));
        } else {
            for line in snap.status.lines() {
                lines.push(Line::from(line.to_string()));
            }
        }
        if snap.anomalies > 0 {
            lines.push(Line::styled(
                format!("log anomalies seen: {}", snap.anomalies),
                Style::default().fg(Color::Yellow),
            ));
        }
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title("Status"))
            .style(Style::default().fg(Color::Green))
    } else {
        let mut lines: Vec<Line> = Vec::new();
        for e in &snap.errors {
            lines.push(Line::from(e.clone()));
        }
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title("Errors"))
            .style(Style::default().fg(Color::Red))
    };
    f.render_widget(widget, area);
}

fn draw_help(f: &mut Frame, area: Rect) {
    let help = Paragraph::new(
        "n deal | f/x/c/a act | b bet | r raise | -/+ bet size | [/] raise size | g sync | h history | s stacks | t reset | q/Esc quit",
    )
    .block(Block::default().borders(Borders::ALL).title("Help"));
    f.render_widget(help, area);
}

fn draw_modals(f: &mut Frame, state: &UiState) {
    match &state.mode {
        Mode::ResetModal(amount_state) => {
            amount_modal(f, "Reset Table", "Starting stack", amount_state.amount);
        }
        Mode::StacksModal(amount_state) => {
            amount_modal(f, "Apply Stacks", "Stack", amount_state.amount);
        }
        Mode::QuitModal => {
            let area = centered_rect(30, 20, f.area());
            let block = Block::default().borders(Borders::ALL).title("Quit");
            let p = Paragraph::new("Leave the table? y/n");
            f.render_widget(Clear, area);
            f.render_widget(&block, area);
            f.render_widget(p, block.inner(area));
        }
        Mode::Normal => {}
    }
}

fn amount_modal(f: &mut Frame, title: &str, label: &str, amount: u64) {
    let area = centered_rect(40, 25, f.area());
    let block = Block::default().borders(Borders::ALL).title(title.to_string());
    let p = Paragraph::new(format!(
        "{label}: {amount}\nEnter=confirm Esc=cancel +/- or digits to edit"
    ));
    f.render_widget(Clear, area);
    f.render_widget(&block, area);
    f.render_widget(p, block.inner(area));
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

fn fit_width(text: &str, max: usize) -> String {
    if UnicodeWidthStr::width(text) <= max {
        return text.to_string();
    }
    let limit = max.saturating_sub(3);
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > limit {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{
        KeyEvent,
        KeyModifiers,
    };

    fn press(state: &mut UiState, code: KeyCode) -> Option<UserEvent> {
        interpret_event(
            state,
            Event::Key(KeyEvent::new(code, KeyModifiers::NONE)),
        )
    }

    #[test]
    fn reset_modal_edits_digits_and_confirms() {
        let mut state = UiState::default();
        press(&mut state, KeyCode::Char('t'));
        for _ in 0..8 {
            press(&mut state, KeyCode::Backspace);
        }
        press(&mut state, KeyCode::Char('5'));
        press(&mut state, KeyCode::Char('0'));
        let ev = press(&mut state, KeyCode::Enter);
        assert_eq!(
            ev,
            Some(UserEvent::ConfirmReset { starting_stack: 50 })
        );
    }

    #[test]
    fn quit_requires_confirmation() {
        let mut state = UiState::default();
        assert_eq!(press(&mut state, KeyCode::Char('q')), Some(UserEvent::Redraw));
        assert_eq!(press(&mut state, KeyCode::Char('n')), Some(UserEvent::Redraw));
        assert_eq!(press(&mut state, KeyCode::Char('q')), Some(UserEvent::Redraw));
        assert_eq!(press(&mut state, KeyCode::Char('y')), Some(UserEvent::Quit));
    }

    #[test]
    fn fit_width_truncates_on_char_boundaries() {
        assert_eq!(fit_width("short", 10), "short");
        assert_eq!(fit_width("a longer line", 8), "a lon...");
    }
}
