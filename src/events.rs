use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::core::{LogEntry, TradeRecord};
use crate::metrics::GameSummary;
use crate::types::{GroupId, PlayerId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub timestamp: DateTime<Utc>,
    /// Exchange tick the event happened in; zero outside a running game.
    pub tick: usize,
    pub event_type: EventType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    TimeUp,
    ManualStop,
    AllObjectivesAchieved,
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndReason::TimeUp => write!(f, "time up"),
            EndReason::ManualStop => write!(f, "manual stop"),
            EndReason::AllObjectivesAchieved => write!(f, "all objectives achieved"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EventType {
    PlayersChanged {
        player_count: usize,
    },
    GameStarted {
        groups: usize,
        excluded_players: usize,
        time_limit_secs: u32,
    },
    ClockTicked {
        remaining_secs: u32,
    },
    TradeCommitted {
        trade: TradeRecord,
    },
    GroupStateChanged {
        group: GroupId,
        deficit: u32,
        objective_achieved: bool,
    },
    GroupCompleted {
        group: GroupId,
        survivor: PlayerId,
        survivor_name: String,
    },
    GameEnded {
        reason: EndReason,
        summary: GameSummary,
    },
    SessionReset,
}

impl EventType {
    /// Log line for entries that also go to the trade log.
    pub fn log_entry(&self) -> Option<LogEntry> {
        match self {
            EventType::TradeCommitted { trade } => Some(LogEntry::Exchange(trade.clone())),
            EventType::GroupCompleted {
                group,
                survivor,
                survivor_name,
            } => Some(LogEntry::Completion {
                group: *group,
                survivor: *survivor,
                survivor_name: survivor_name.clone(),
            }),
            _ => None,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] ", self.tick)?;

        if let Some(entry) = self.event_type.log_entry() {
            return write!(f, "{}", entry);
        }

        match &self.event_type {
            EventType::PlayersChanged { player_count } => {
                write!(f, "Player list now has {} players", player_count)
            }
            EventType::GameStarted {
                groups,
                excluded_players,
                time_limit_secs,
            } => {
                write!(
                    f,
                    "Game started with {} groups ({} players left out), {}s on the clock",
                    groups, excluded_players, time_limit_secs
                )
            }
            EventType::ClockTicked { remaining_secs } => {
                write!(f, "{:02}:{:02} left", remaining_secs / 60, remaining_secs % 60)
            }
            EventType::GroupStateChanged {
                group,
                deficit,
                objective_achieved,
            } => {
                write!(
                    f,
                    "{} deficit {}{}",
                    group,
                    deficit,
                    if *objective_achieved { " (done)" } else { "" }
                )
            }
            EventType::GameEnded { reason, summary } => {
                write!(
                    f,
                    "Game ended ({}): {}/{} groups succeeded",
                    reason, summary.successful_groups, summary.total_groups
                )
            }
            EventType::SessionReset => write!(f, "Session reset"),
            EventType::TradeCommitted { .. } | EventType::GroupCompleted { .. } => Ok(()),
        }
    }
}

/// Receives every event the session emits, synchronously and in order.
pub trait GameObserver {
    fn on_event(&mut self, event: &Event);
}

impl<F: FnMut(&Event)> GameObserver for F {
    fn on_event(&mut self, event: &Event) {
        self(event)
    }
}

#[derive(Default)]
pub struct EventLogger {
    events: Vec<Event>,
}

impl EventLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// A logger the caller keeps a handle to while a session feeds it.
    pub fn shared() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Observer that appends into a shared logger.
    pub fn observer(logger: &Rc<RefCell<Self>>) -> impl GameObserver + 'static {
        let logger = Rc::clone(logger);
        move |event: &Event| logger.borrow_mut().log(event.clone())
    }

    pub fn log(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn get_events(&self) -> &[Event] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn save_to_file(&self, path: &str) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(&self.events)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn load_from_file(path: &str) -> std::io::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let events: Vec<Event> = serde_json::from_str(&json)?;
        Ok(Self { events })
    }
}

impl GameObserver for EventLogger {
    fn on_event(&mut self, event: &Event) {
        self.log(event.clone());
    }
}
