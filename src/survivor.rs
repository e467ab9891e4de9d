//! Picks the one member of a successful group who keeps the lollipop.

use rand::Rng;

use crate::core::{permutation, Player};
use crate::inventory::distinct_kinds;

/// Index (into `members`) of the member with the most distinct kinds in hand.
///
/// Members are visited in a fresh random order and the first strict maximum
/// wins, so ties resolve uniformly at random. Returns `None` only for an empty
/// member list.
pub fn select_survivor<R: Rng + ?Sized>(members: &[&Player], rng: &mut R) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None;
    for i in permutation(members.len(), rng) {
        let diversity = distinct_kinds(&members[i].candies);
        match best {
            Some((_, top)) if diversity <= top => {}
            _ => best = Some((i, diversity)),
        }
    }
    best.map(|(i, _)| i)
}
