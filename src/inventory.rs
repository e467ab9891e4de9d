//! Counting candies and scoring how far a group is from its quota.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Index;

use crate::types::{CandyKind, KIND_COUNT};

/// Number of candies held for every kind. Kinds that never appear are zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KindCounts([u32; KIND_COUNT]);

impl KindCounts {
    pub fn get(&self, kind: CandyKind) -> u32 {
        self.0[kind.index()]
    }

    pub fn add(&mut self, kind: CandyKind) {
        self.0[kind.index()] += 1;
    }

    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CandyKind, u32)> + '_ {
        CandyKind::ALL.iter().map(|&kind| (kind, self.get(kind)))
    }
}

impl Index<CandyKind> for KindCounts {
    type Output = u32;

    fn index(&self, kind: CandyKind) -> &u32 {
        &self.0[kind.index()]
    }
}

impl fmt::Display for KindCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(kind, count)| format!("{}x{}", kind.emoji(), count))
            .collect();
        write!(f, "{}", parts.join(" "))
    }
}

/// Count every kind in a sequence of candies.
pub fn count_by_kind<'a, I>(candies: I) -> KindCounts
where
    I: IntoIterator<Item = &'a CandyKind>,
{
    let mut counts = KindCounts::default();
    for &candy in candies {
        counts.add(candy);
    }
    counts
}

/// Number of different kinds present in a hand.
pub fn distinct_kinds(candies: &[CandyKind]) -> usize {
    count_by_kind(candies).iter().filter(|(_, n)| *n > 0).count()
}

/// Scores a set of hands. Zero means the objective is met.
pub trait Objective {
    fn deficit(&self, holdings: &[&[CandyKind]]) -> u32;

    fn is_met(&self, holdings: &[&[CandyKind]]) -> bool {
        self.deficit(holdings) == 0
    }
}

/// Minimum number of each kind a group must hold between all its members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quota(BTreeMap<CandyKind, u32>);

impl Quota {
    pub fn new(required: impl IntoIterator<Item = (CandyKind, u32)>) -> Self {
        Self(required.into_iter().collect())
    }

    /// The same requirement for every kind.
    pub fn uniform(per_kind: u32) -> Self {
        Self::new(CandyKind::ALL.iter().map(|&kind| (kind, per_kind)))
    }

    pub fn required(&self, kind: CandyKind) -> u32 {
        self.0.get(&kind).copied().unwrap_or(0)
    }

    /// Sum of all requirements.
    pub fn total(&self) -> u32 {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CandyKind, u32)> + '_ {
        self.0.iter().map(|(&kind, &n)| (kind, n))
    }

    /// Shortfall summed over kinds for already counted candies.
    pub fn deficit_of(&self, counts: &KindCounts) -> u32 {
        self.iter()
            .map(|(kind, required)| required.saturating_sub(counts.get(kind)))
            .sum()
    }
}

impl Default for Quota {
    fn default() -> Self {
        Self::uniform(2)
    }
}

impl Objective for Quota {
    fn deficit(&self, holdings: &[&[CandyKind]]) -> u32 {
        self.deficit_of(&count_by_kind(holdings.iter().flat_map(|hand| hand.iter())))
    }
}

impl fmt::Display for Quota {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(kind, n)| format!("{} {}", n, kind.as_str()))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}
