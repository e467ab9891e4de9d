use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{CandyKind, GroupId, PlayerId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Only the exchange search changes these, and only by swapping in place.
    pub candies: Vec<CandyKind>,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>, candies: Vec<CandyKind>) -> Self {
        Self {
            id,
            name: name.into(),
            candies,
        }
    }

    pub fn hand(&self) -> String {
        self.candies.iter().map(|c| c.emoji()).collect()
    }
}

/// One committed swap between two members of the same group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub tick: usize,
    pub group: GroupId,
    pub giver: PlayerId,
    pub giver_name: String,
    pub receiver: PlayerId,
    pub receiver_name: String,
    /// Candy that moved from giver to receiver.
    pub given: CandyKind,
    /// Candy that moved from receiver to giver.
    pub received: CandyKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LogEntry {
    Exchange(TradeRecord),
    Completion {
        group: GroupId,
        survivor: PlayerId,
        survivor_name: String,
    },
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogEntry::Exchange(trade) => write!(
                f,
                "{}: {} traded {} for {} with {}.",
                trade.group, trade.giver_name, trade.given, trade.received, trade.receiver_name
            ),
            LogEntry::Completion {
                group,
                survivor_name,
                ..
            } => write!(
                f,
                "{} reached the objective! Survivor: {} 🍭",
                group, survivor_name
            ),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    /// Indices into the session's player pool.
    pub members: Vec<usize>,
    pub objective_achieved: bool,
    pub survivor: Option<PlayerId>,
    pub log: Vec<LogEntry>,
}

impl Group {
    pub fn new(id: GroupId, members: Vec<usize>) -> Self {
        Self {
            id,
            members,
            objective_achieved: false,
            survivor: None,
            log: Vec::new(),
        }
    }

    /// Borrow every member's hand, in member order.
    pub fn holdings<'a>(&self, players: &'a [Player]) -> Vec<&'a [CandyKind]> {
        self.members
            .iter()
            .map(|&i| players[i].candies.as_slice())
            .collect()
    }

    pub fn member_players<'p>(&self, players: &'p [Player]) -> impl Iterator<Item = &'p Player> {
        self.members.iter().map(move |&i| &players[i])
    }

    pub fn trade_count(&self) -> usize {
        self.log
            .iter()
            .filter(|e| matches!(e, LogEntry::Exchange(_)))
            .count()
    }

    /// Flags the objective as met. Happens once; the flag never clears.
    pub(crate) fn complete(&mut self, survivor: &Player) -> LogEntry {
        debug_assert!(!self.objective_achieved, "{} completed twice", self.id);
        self.objective_achieved = true;
        self.survivor = Some(survivor.id);
        let entry = LogEntry::Completion {
            group: self.id,
            survivor: survivor.id,
            survivor_name: survivor.name.clone(),
        };
        self.log.push(entry.clone());
        entry
    }
}

/// Fresh uniformly random ordering of `0..len`.
pub fn permutation<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Vec<usize> {
    let mut order: Vec<usize> = (0..len).collect();
    order.shuffle(rng);
    order
}
