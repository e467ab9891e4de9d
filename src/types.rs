use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of candy kinds in the game.
pub const KIND_COUNT: usize = 3;

/// A single candy. The game knows three kinds and nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CandyKind {
    Lemon,
    Pear,
    Egg,
}

impl CandyKind {
    /// Every kind, in the order counts and quotas are reported.
    pub const ALL: [CandyKind; KIND_COUNT] = [CandyKind::Lemon, CandyKind::Pear, CandyKind::Egg];

    pub fn as_str(&self) -> &'static str {
        match self {
            CandyKind::Lemon => "lemon",
            CandyKind::Pear => "pear",
            CandyKind::Egg => "egg",
        }
    }

    pub fn from_str(s: &str) -> Option<CandyKind> {
        match s.to_ascii_lowercase().as_str() {
            "lemon" => Some(CandyKind::Lemon),
            "pear" => Some(CandyKind::Pear),
            "egg" => Some(CandyKind::Egg),
            _ => None,
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            CandyKind::Lemon => "🍋",
            CandyKind::Pear => "🍐",
            CandyKind::Egg => "🥚",
        }
    }

    /// Index into per-kind arrays such as [`crate::inventory::KindCounts`].
    pub fn index(&self) -> usize {
        match self {
            CandyKind::Lemon => 0,
            CandyKind::Pear => 1,
            CandyKind::Egg => 2,
        }
    }

    /// Uniformly random kind.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> CandyKind {
        CandyKind::ALL[rng.random_range(0..CandyKind::ALL.len())]
    }
}

impl fmt::Display for CandyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.emoji())
    }
}

/// Unique identifier for a player, handed out by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

/// A group is identified by its position in the session's group list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GroupId(pub usize);

impl GroupId {
    /// 1-based number used in log lines.
    pub fn number(&self) -> usize {
        self.0 + 1
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Group {}", self.number())
    }
}
