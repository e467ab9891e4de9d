//! Greedy pairwise exchange search.
//!
//! Each tick, every group that has not met its objective gets one chance to
//! improve. Members are visited in a fresh random order and the first swap of
//! one candy for one candy that strictly lowers the group's deficit is
//! committed. A group commits at most one swap per tick. The search takes the
//! first improving swap, not the best one.

use log::debug;
use rand::Rng;

use crate::core::{permutation, Group, LogEntry, Player, TradeRecord};
use crate::inventory::Objective;
use crate::survivor::select_survivor;
use crate::types::{CandyKind, GroupId};

/// A candidate exchange, in member positions within the group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Swap {
    pub giver: usize,
    pub receiver: usize,
    pub giver_slot: usize,
    pub receiver_slot: usize,
    pub deficit: u32,
}

/// What one group did during a tick.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupStep {
    pub group: GroupId,
    pub deficit_before: u32,
    pub deficit_after: u32,
    pub trade: Option<TradeRecord>,
    pub completion: Option<LogEntry>,
}

impl GroupStep {
    pub fn stalled(&self) -> bool {
        self.trade.is_none() && self.completion.is_none()
    }
}

/// What every group did during a tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutcome {
    pub tick: usize,
    pub steps: Vec<GroupStep>,
    pub all_achieved: bool,
}

impl TickOutcome {
    pub fn any_progress(&self) -> bool {
        self.steps.iter().any(|s| !s.stalled())
    }
}

/// Scan for the first swap that scores strictly below `current`.
///
/// `order` is the member visiting order; pairs are (giver, receiver) with
/// giver taken from the outer loop. Nothing outside the local scratch copy
/// is touched.
pub fn find_improving_swap<O: Objective + ?Sized>(
    holdings: &[&[CandyKind]],
    objective: &O,
    current: u32,
    order: &[usize],
) -> Option<Swap> {
    let mut scratch: Vec<Vec<CandyKind>> = holdings.iter().map(|h| h.to_vec()).collect();

    for &giver in order {
        for &receiver in order {
            if giver == receiver {
                continue;
            }
            for giver_slot in 0..scratch[giver].len() {
                for receiver_slot in 0..scratch[receiver].len() {
                    let given = scratch[giver][giver_slot];
                    let received = scratch[receiver][receiver_slot];
                    scratch[giver][giver_slot] = received;
                    scratch[receiver][receiver_slot] = given;

                    let view: Vec<&[CandyKind]> = scratch.iter().map(Vec::as_slice).collect();
                    let deficit = objective.deficit(&view);

                    scratch[giver][giver_slot] = given;
                    scratch[receiver][receiver_slot] = received;

                    if deficit < current {
                        return Some(Swap {
                            giver,
                            receiver,
                            giver_slot,
                            receiver_slot,
                            deficit,
                        });
                    }
                }
            }
        }
    }
    None
}

/// Run one tick of the search for a single group.
///
/// Returns `None` for a group that has already met its objective; such groups
/// are never traded again.
pub fn search_group<O, R>(
    group: &mut Group,
    players: &mut [Player],
    objective: &O,
    tick: usize,
    rng: &mut R,
) -> Option<GroupStep>
where
    O: Objective + ?Sized,
    R: Rng + ?Sized,
{
    if group.objective_achieved {
        return None;
    }

    let current = objective.deficit(&group.holdings(players));
    let mut step = GroupStep {
        group: group.id,
        deficit_before: current,
        deficit_after: current,
        trade: None,
        completion: None,
    };

    // Formed already satisfied: nothing to trade, just close it out.
    if current == 0 {
        step.completion = complete_group(group, players, rng);
        return Some(step);
    }

    let order = permutation(group.members.len(), rng);
    let Some(swap) = find_improving_swap(&group.holdings(players), objective, current, &order) else {
        debug!("{} stalled at deficit {}", group.id, current);
        return Some(step);
    };

    let trade = commit_swap(group, players, &swap, tick);
    debug!(
        "{} committed swap, deficit {} -> {}",
        group.id, current, swap.deficit
    );
    group.log.push(LogEntry::Exchange(trade.clone()));
    step.trade = Some(trade);

    let after = objective.deficit(&group.holdings(players));
    debug_assert_eq!(after, swap.deficit, "simulated and committed deficit differ");
    step.deficit_after = after;

    if after == 0 {
        step.completion = complete_group(group, players, rng);
    }
    Some(step)
}

/// One tick across every group, in group order.
pub fn exchange_round<O, R>(
    groups: &mut [Group],
    players: &mut [Player],
    objective: &O,
    tick: usize,
    rng: &mut R,
) -> TickOutcome
where
    O: Objective + ?Sized,
    R: Rng + ?Sized,
{
    let steps = groups
        .iter_mut()
        .filter_map(|group| search_group(group, players, objective, tick, rng))
        .collect();

    TickOutcome {
        tick,
        steps,
        all_achieved: !groups.is_empty() && groups.iter().all(|g| g.objective_achieved),
    }
}

fn commit_swap(group: &Group, players: &mut [Player], swap: &Swap, tick: usize) -> TradeRecord {
    let a = group.members[swap.giver];
    let b = group.members[swap.receiver];
    debug_assert_ne!(a, b);
    let sizes = (players[a].candies.len(), players[b].candies.len());

    let given = players[a].candies[swap.giver_slot];
    let received = players[b].candies[swap.receiver_slot];
    players[a].candies[swap.giver_slot] = received;
    players[b].candies[swap.receiver_slot] = given;

    debug_assert_eq!(sizes, (players[a].candies.len(), players[b].candies.len()));

    TradeRecord {
        tick,
        group: group.id,
        giver: players[a].id,
        giver_name: players[a].name.clone(),
        receiver: players[b].id,
        receiver_name: players[b].name.clone(),
        given,
        received,
    }
}

fn complete_group<R: Rng + ?Sized>(
    group: &mut Group,
    players: &[Player],
    rng: &mut R,
) -> Option<LogEntry> {
    let chosen = {
        let members: Vec<&Player> = group.member_players(players).collect();
        select_survivor(&members, rng).map(|i| group.members[i])
    }?;
    Some(group.complete(&players[chosen]))
}
