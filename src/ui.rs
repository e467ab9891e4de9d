use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

use crate::core::Group;
use crate::events::{Event as GameEvent, EventType};
use crate::game::{GameSession, GameState};

const GROUPS_PER_ROW: usize = 4;
const RECENT_EVENTS: usize = 12;

/// Live view state around a running session.
pub struct UIState {
    session: GameSession,
    recent_events: Rc<RefCell<VecDeque<String>>>,
    started_at: Option<Instant>,
    status: String,
}

impl UIState {
    pub fn new(mut session: GameSession) -> Self {
        let recent_events = Rc::new(RefCell::new(VecDeque::new()));
        let feed = Rc::clone(&recent_events);
        session.subscribe(move |event: &GameEvent| {
            let shown = matches!(
                event.event_type,
                EventType::TradeCommitted { .. }
                    | EventType::GroupCompleted { .. }
                    | EventType::GameStarted { .. }
                    | EventType::GameEnded { .. }
                    | EventType::SessionReset
                    | EventType::PlayersChanged { .. }
            );
            if shown {
                let mut feed = feed.borrow_mut();
                if feed.len() >= RECENT_EVENTS {
                    feed.pop_front();
                }
                feed.push_back(event.to_string());
            }
        });

        Self {
            session,
            recent_events,
            started_at: None,
            status: "Press S to start".to_string(),
        }
    }

    /// Catch the session's virtual clock up with the wall clock.
    fn pump(&mut self) {
        if let Some(started) = self.started_at {
            let behind = started.elapsed().saturating_sub(self.session.elapsed());
            self.session.advance(behind);
        }
        if !self.session.is_running() {
            self.started_at = None;
        }
    }

    fn start(&mut self) {
        match self.session.start() {
            Ok(()) => {
                self.started_at = Some(Instant::now());
                self.status = "Running".to_string();
            }
            Err(err) => self.status = err.to_string(),
        }
    }

    fn stop(&mut self) {
        if self.session.stop() {
            self.status = "Stopped".to_string();
        }
        self.started_at = None;
    }

    fn generate(&mut self) {
        let count = self.session.config().max_players;
        match self.session.generate_default_players(count) {
            Ok(n) => self.status = format!("{} players generated", n),
            Err(err) => self.status = err.to_string(),
        }
    }

    fn reset(&mut self) {
        self.session.reset();
        self.started_at = None;
        self.status = "Reset. Press G to generate players".to_string();
    }
}

/// Run the live terminal view until the user quits.
pub fn run_live(session: GameSession) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut ui_state = UIState::new(session);
    let res = run_app(&mut terminal, &mut ui_state);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }
    if let Some(summary) = ui_state.session.summary() {
        println!("{}", summary);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    ui_state: &mut UIState,
) -> io::Result<()> {
    loop {
        ui_state.pump();
        terminal.draw(|f| draw_ui(f, ui_state))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') => return Ok(()),
                        KeyCode::Char('s') => ui_state.start(),
                        KeyCode::Char('x') => ui_state.stop(),
                        KeyCode::Char('g') => ui_state.generate(),
                        KeyCode::Char('r') => ui_state.reset(),
                        _ => {}
                    }
                }
            }
        }
    }
}

fn draw_ui(f: &mut Frame, ui_state: &UIState) {
    let session = &ui_state.session;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Header
            Constraint::Min(10),    // Groups
            Constraint::Length(14), // Event log
            Constraint::Length(1),  // Footer
        ])
        .split(f.area());

    let remaining = session.remaining_secs();
    let header = Paragraph::new(format!(
        "Candy Exchange - {:02}:{:02} - {} players - {} - {}",
        remaining / 60,
        remaining % 60,
        session.players().len(),
        session.state(),
        ui_state.status
    ))
    .style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(header, chunks[0]);

    if session.groups().is_empty() {
        draw_players(f, chunks[1], session);
    } else {
        draw_groups(f, chunks[1], session);
    }

    let mut lines: Vec<ListItem> = ui_state
        .recent_events
        .borrow()
        .iter()
        .map(|e| ListItem::new(e.clone()))
        .collect();
    if let (GameState::Ended(_), Some(summary)) = (session.state(), session.summary()) {
        lines.push(ListItem::new(Line::from(Span::styled(
            format!(
                "Success rate {:.2}% ({}/{}), {} lollipops",
                summary.success_rate,
                summary.successful_groups,
                summary.total_groups,
                summary.survivors.len()
            ),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ))));
    }
    let events_list = List::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Exchange Log"),
        )
        .style(Style::default().fg(Color::White));
    f.render_widget(events_list, chunks[2]);

    let footer = Paragraph::new("[S] Start  [X] Stop  [G] Generate  [R] Reset  [Q] Quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(footer, chunks[3]);
}

fn draw_players(f: &mut Frame, area: Rect, session: &GameSession) {
    let items: Vec<ListItem> = session
        .players()
        .iter()
        .map(|p| ListItem::new(format!("{}  {}", p.name, p.hand())))
        .collect();
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Players (no groups yet) "),
    );
    f.render_widget(list, area);
}

fn draw_groups(f: &mut Frame, area: Rect, session: &GameSession) {
    let groups = session.groups();
    let rows = groups.len().div_ceil(GROUPS_PER_ROW);
    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            (0..rows)
                .map(|_| Constraint::Ratio(1, rows as u32))
                .collect::<Vec<_>>(),
        )
        .split(area);

    for (row, chunk) in groups.chunks(GROUPS_PER_ROW).enumerate() {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(
                (0..GROUPS_PER_ROW)
                    .map(|_| Constraint::Ratio(1, GROUPS_PER_ROW as u32))
                    .collect::<Vec<_>>(),
            )
            .split(row_areas[row]);
        for (i, group) in chunk.iter().enumerate() {
            draw_group(f, cells[i], session, group);
        }
    }
}

fn draw_group(f: &mut Frame, area: Rect, session: &GameSession, group: &Group) {
    let (status, color) = if group.objective_achieved {
        ("✅ Objective reached", Color::Green)
    } else {
        ("⏳ Pending", Color::Gray)
    };

    let mut lines: Vec<Line> = session
        .group_members(group)
        .into_iter()
        .map(|member| {
            let survivor = group.survivor == Some(member.id);
            Line::from(vec![
                Span::styled(
                    format!("{:<12}", member.name),
                    if survivor {
                        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default()
                    },
                ),
                Span::raw(member.hand()),
                Span::raw(if survivor { " 🍭" } else { "" }),
            ])
        })
        .collect();
    lines.push(Line::from(Span::styled(status, Style::default().fg(color))));

    let para = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", group.id)),
    );
    f.render_widget(para, area);
}
