//! The game session: players, groups, the clock and the state machine.
//!
//! Two periodic activities share one logical thread: a one-second countdown
//! and the exchange tick. Time is virtual. [`GameSession::advance`] moves the
//! clock forward and fires every activity that came due, one at a time and in
//! deadline order (countdown first on a tie). A real-time driver only has to
//! sleep until [`GameSession::next_deadline`] and call `advance`.
//!
//! Stopping or resetting drops both activities before anything else changes,
//! so no tick can land after cancellation.

use chrono::Utc;
use log::{debug, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::config::GameConfig;
use crate::core::{permutation, Group, LogEntry, Player};
use crate::error::GameError;
use crate::events::{EndReason, Event, EventType, GameObserver};
use crate::exchange::{exchange_round, TickOutcome};
use crate::metrics::GameSummary;
use crate::types::{CandyKind, GroupId, PlayerId};

const COUNTDOWN_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    Idle,
    Running,
    Ended(EndReason),
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameState::Idle => write!(f, "idle"),
            GameState::Running => write!(f, "running"),
            GameState::Ended(reason) => write!(f, "ended ({})", reason),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Periodic {
    period: Duration,
    next_due: Duration,
}

impl Periodic {
    fn starting_at(now: Duration, period: Duration) -> Self {
        Self {
            period,
            next_due: now + period,
        }
    }

    fn reschedule(&mut self) {
        self.next_due += self.period;
    }
}

#[derive(Debug, Clone, Copy)]
struct Activities {
    countdown: Periodic,
    exchange: Periodic,
}

impl Activities {
    fn next_due(&self) -> Duration {
        self.countdown.next_due.min(self.exchange.next_due)
    }
}

pub struct GameSession {
    config: GameConfig,
    rng: StdRng,
    players: Vec<Player>,
    groups: Vec<Group>,
    state: GameState,
    remaining_secs: u32,
    clock: Duration,
    /// `None` whenever the game is not running.
    activities: Option<Activities>,
    tick: usize,
    log: Vec<LogEntry>,
    summary: Option<GameSummary>,
    next_player_id: u64,
    observers: Vec<Box<dyn GameObserver>>,
}

impl GameSession {
    /// New idle session. Seeds from `config.random_seed` when present.
    pub fn setup(config: GameConfig) -> Result<Self, GameError> {
        let rng = match config.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(config, rng)
    }

    pub fn with_rng(config: GameConfig, rng: StdRng) -> Result<Self, GameError> {
        config.validate()?;
        Ok(Self {
            remaining_secs: config.time_limit_secs,
            config,
            rng,
            players: Vec::new(),
            groups: Vec::new(),
            state: GameState::Idle,
            clock: Duration::ZERO,
            activities: None,
            tick: 0,
            log: Vec::new(),
            summary: None,
            next_player_id: 1,
            observers: Vec::new(),
        })
    }

    pub fn subscribe(&mut self, observer: impl GameObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn group_members(&self, group: &Group) -> Vec<&Player> {
        group.member_players(&self.players).collect()
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == GameState::Running
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    /// Virtual time since the current game started.
    pub fn elapsed(&self) -> Duration {
        self.clock
    }

    pub fn tick(&self) -> usize {
        self.tick
    }

    /// Every trade and completion of the current game, oldest first.
    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    /// Results of the last game that ended, if any.
    pub fn summary(&self) -> Option<&GameSummary> {
        self.summary.as_ref()
    }

    /// Virtual time at which the next activity fires.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.activities.map(|a| a.next_due())
    }

    /// Add a player with the given hand.
    pub fn add_player(
        &mut self,
        name: &str,
        candies: Vec<CandyKind>,
    ) -> Result<PlayerId, GameError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GameError::InvalidPlayerName);
        }
        debug_assert_eq!(
            candies.len(),
            self.config.candies_per_player,
            "hand size must match candies_per_player"
        );

        let id = PlayerId(self.next_player_id);
        self.next_player_id += 1;
        self.players.push(Player::new(id, name, candies));
        info!("Player {:?} added ({} total)", name, self.players.len());
        self.emit(EventType::PlayersChanged {
            player_count: self.players.len(),
        });
        Ok(id)
    }

    /// Add a player holding random candies.
    pub fn add_random_player(&mut self, name: &str) -> Result<PlayerId, GameError> {
        let candies = (0..self.config.candies_per_player)
            .map(|_| CandyKind::random(&mut self.rng))
            .collect();
        self.add_player(name, candies)
    }

    /// Replace the player list with `count` generated players.
    ///
    /// The count is capped at `max_players` and rounded down to whole groups.
    /// Candies are dealt per block of `group_size` players from a pool holding
    /// exactly the quota plus random extras, so a group formed from one block
    /// starts with its objective met. Any finished game is discarded.
    pub fn generate_default_players(&mut self, count: usize) -> Result<usize, GameError> {
        if self.is_running() {
            return Err(GameError::AlreadyRunning);
        }

        let group_size = self.config.group_size;
        let blocks = count.min(self.config.max_players) / group_size;
        let extras = self.config.candies_per_group() - self.config.quota.total() as usize;

        self.players.clear();
        self.discard_game();

        for block in 0..blocks {
            let mut pool: Vec<CandyKind> = self
                .config
                .quota
                .iter()
                .flat_map(|(kind, n)| std::iter::repeat_n(kind, n as usize))
                .collect();
            pool.extend((0..extras).map(|_| CandyKind::random(&mut self.rng)));
            let order = permutation(pool.len(), &mut self.rng);
            let mut dealt = order.into_iter().map(|i| pool[i]);

            for seat in 0..group_size {
                let candies: Vec<CandyKind> =
                    dealt.by_ref().take(self.config.candies_per_player).collect();
                let id = PlayerId(self.next_player_id);
                self.next_player_id += 1;
                let name = format!("Player {}", block * group_size + seat + 1);
                self.players.push(Player::new(id, name, candies));
            }
        }

        info!("{} players generated", self.players.len());
        self.emit(EventType::PlayersChanged {
            player_count: self.players.len(),
        });
        Ok(self.players.len())
    }

    /// Form groups and start both activities.
    pub fn start(&mut self) -> Result<(), GameError> {
        if self.is_running() {
            return Err(GameError::AlreadyRunning);
        }
        let required = self.config.group_size;
        if self.players.len() < required {
            return Err(GameError::InsufficientPlayers {
                required,
                available: self.players.len(),
            });
        }

        self.discard_game();
        self.form_groups();
        self.remaining_secs = self.config.time_limit_secs;
        self.clock = Duration::ZERO;
        self.tick = 0;
        self.activities = Some(Activities {
            countdown: Periodic::starting_at(self.clock, COUNTDOWN_PERIOD),
            exchange: Periodic::starting_at(self.clock, self.config.exchange_period()),
        });
        self.state = GameState::Running;

        let excluded = self.players.len() - self.groups.len() * required;
        if excluded > 0 {
            warn!("{} players do not fit in a full group and sit out", excluded);
        }
        info!(
            "Game started: {} groups, {}s limit",
            self.groups.len(),
            self.config.time_limit_secs
        );
        self.emit(EventType::GameStarted {
            groups: self.groups.len(),
            excluded_players: excluded,
            time_limit_secs: self.config.time_limit_secs,
        });
        Ok(())
    }

    /// End a running game by hand. Returns false if nothing was running.
    pub fn stop(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.end(EndReason::ManualStop);
        true
    }

    /// Cancel everything and drop all players, groups and logs.
    pub fn reset(&mut self) {
        self.activities = None;
        self.players.clear();
        self.discard_game();
        self.remaining_secs = self.config.time_limit_secs;
        info!("Session reset");
        self.emit(EventType::SessionReset);
        self.emit(EventType::PlayersChanged { player_count: 0 });
    }

    /// Move the virtual clock forward, firing every activity that comes due.
    pub fn advance(&mut self, elapsed: Duration) {
        let target = self.clock + elapsed;
        while let Some(activities) = self.activities {
            let due = activities.next_due();
            if due > target {
                self.clock = target;
                break;
            }
            self.clock = due;
            if activities.countdown.next_due <= activities.exchange.next_due {
                self.countdown_tick();
            } else {
                self.exchange_tick();
            }
        }
    }

    /// Advance until the game ends. Always terminates: the countdown is finite.
    pub fn run_until_ended(&mut self) -> Option<EndReason> {
        while let Some(due) = self.next_deadline() {
            self.advance(due.saturating_sub(self.clock));
        }
        match self.state {
            GameState::Ended(reason) => Some(reason),
            _ => None,
        }
    }

    /// Run one exchange tick right away, outside the schedule.
    ///
    /// Returns `None` unless a game is running.
    pub fn step_exchange(&mut self) -> Option<TickOutcome> {
        if !self.is_running() {
            return None;
        }
        self.tick += 1;
        let outcome = exchange_round(
            &mut self.groups,
            &mut self.players,
            &self.config.quota,
            self.tick,
            &mut self.rng,
        );

        for step in &outcome.steps {
            if let Some(trade) = &step.trade {
                self.log.push(LogEntry::Exchange(trade.clone()));
                self.emit(EventType::TradeCommitted {
                    trade: trade.clone(),
                });
            }
            if let Some(entry) = &step.completion {
                self.log.push(entry.clone());
                if let LogEntry::Completion {
                    survivor,
                    survivor_name,
                    ..
                } = entry
                {
                    info!("{} reached its objective, survivor {}", step.group, survivor_name);
                    self.emit(EventType::GroupCompleted {
                        group: step.group,
                        survivor: *survivor,
                        survivor_name: survivor_name.clone(),
                    });
                }
            }
            if !step.stalled() {
                self.emit(EventType::GroupStateChanged {
                    group: step.group,
                    deficit: step.deficit_after,
                    objective_achieved: step.completion.is_some(),
                });
            }
        }

        if !outcome.any_progress() {
            debug!("Tick {}: no group made progress", self.tick);
        }
        if outcome.all_achieved {
            self.end(EndReason::AllObjectivesAchieved);
        }
        Some(outcome)
    }

    fn countdown_tick(&mut self) {
        if let Some(a) = self.activities.as_mut() {
            a.countdown.reschedule();
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        self.emit(EventType::ClockTicked {
            remaining_secs: self.remaining_secs,
        });
        if self.remaining_secs == 0 {
            self.end(EndReason::TimeUp);
        }
    }

    fn exchange_tick(&mut self) {
        if let Some(a) = self.activities.as_mut() {
            a.exchange.reschedule();
        }
        self.step_exchange();
    }

    fn form_groups(&mut self) {
        let size = self.config.group_size;
        let order = permutation(self.players.len(), &mut self.rng);
        self.groups = order
            .chunks_exact(size)
            .enumerate()
            .map(|(i, members)| Group::new(GroupId(i), members.to_vec()))
            .collect();
    }

    fn discard_game(&mut self) {
        self.activities = None;
        self.groups.clear();
        self.log.clear();
        self.summary = None;
        self.tick = 0;
        self.clock = Duration::ZERO;
        self.state = GameState::Idle;
    }

    fn end(&mut self, reason: EndReason) {
        self.activities = None;
        self.state = GameState::Ended(reason);
        let summary = GameSummary::calculate(&self.groups, &self.players, &self.config.quota);
        info!(
            "Game ended ({}): {}/{} groups succeeded",
            reason, summary.successful_groups, summary.total_groups
        );
        self.summary = Some(summary.clone());
        self.emit(EventType::GameEnded { reason, summary });
    }

    fn emit(&mut self, event_type: EventType) {
        let event = Event {
            timestamp: Utc::now(),
            tick: self.tick,
            event_type,
        };
        for observer in self.observers.iter_mut() {
            observer.on_event(&event);
        }
    }
}
