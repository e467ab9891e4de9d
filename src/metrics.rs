//! End-of-game results: how many groups made it and who kept a lollipop.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::{Group, Player};
use crate::inventory::{count_by_kind, KindCounts, Objective, Quota};
use crate::types::{GroupId, PlayerId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurvivorEntry {
    pub group: GroupId,
    pub player: PlayerId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupReport {
    pub group: GroupId,
    pub objective_achieved: bool,
    pub survivor: Option<PlayerId>,
    pub final_deficit: u32,
    pub trades: usize,
    /// Final hand of each member as `name: 🍋🍐`.
    pub members: Vec<String>,
    /// The group's trades and completion, oldest first.
    pub log: Vec<String>,
    #[serde(skip)]
    pub counts: KindCounts,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSummary {
    pub total_groups: usize,
    pub successful_groups: usize,
    /// Percentage, two decimal places.
    pub success_rate: Decimal,
    pub survivors: Vec<SurvivorEntry>,
    pub groups: Vec<GroupReport>,
}

impl GameSummary {
    pub fn calculate(groups: &[Group], players: &[Player], quota: &Quota) -> Self {
        let reports: Vec<GroupReport> = groups
            .iter()
            .map(|group| {
                let holdings = group.holdings(players);
                GroupReport {
                    group: group.id,
                    objective_achieved: group.objective_achieved,
                    survivor: group.survivor,
                    final_deficit: quota.deficit(&holdings),
                    trades: group.trade_count(),
                    members: group
                        .member_players(players)
                        .map(|p| format!("{}: {}", p.name, p.hand()))
                        .collect(),
                    log: group.log.iter().map(|entry| entry.to_string()).collect(),
                    counts: count_by_kind(holdings.iter().flat_map(|h| h.iter())),
                }
            })
            .collect();

        let survivors: Vec<SurvivorEntry> = groups
            .iter()
            .filter(|g| g.objective_achieved)
            .filter_map(|g| {
                let id = g.survivor?;
                let player = players.iter().find(|p| p.id == id)?;
                Some(SurvivorEntry {
                    group: g.id,
                    player: id,
                    name: player.name.clone(),
                })
            })
            .collect();

        let successful_groups = groups.iter().filter(|g| g.objective_achieved).count();
        let success_rate = if groups.is_empty() {
            Decimal::ZERO
        } else {
            (Decimal::from(successful_groups) * dec!(100) / Decimal::from(groups.len())).round_dp(2)
        };

        Self {
            total_groups: groups.len(),
            successful_groups,
            success_rate,
            survivors,
            groups: reports,
        }
    }
}

impl fmt::Display for GameSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.total_groups == 0 {
            return write!(f, "No groups were formed.");
        }
        for report in &self.groups {
            writeln!(
                f,
                "{}: {} (deficit {}, {} trades)",
                report.group,
                if report.objective_achieved {
                    "objective reached"
                } else {
                    "objective missed"
                },
                report.final_deficit,
                report.trades
            )?;
            for member in &report.members {
                writeln!(f, "    {}", member)?;
            }
            if report.log.is_empty() {
                writeln!(f, "    No exchanges recorded in this group.")?;
            }
            for line in &report.log {
                writeln!(f, "    - {}", line)?;
            }
        }
        writeln!(f, "Total groups: {}", self.total_groups)?;
        writeln!(f, "Groups with objective reached: {}", self.successful_groups)?;
        writeln!(f, "Success rate: {:.2}%", self.success_rate)?;
        if self.survivors.is_empty() {
            write!(f, "No lollipop winners this round.")
        } else {
            write!(f, "Lollipop winners:")?;
            for s in &self.survivors {
                write!(f, "\n    {} ({}) 🍭", s.name, s.group)?;
            }
            Ok(())
        }
    }
}
