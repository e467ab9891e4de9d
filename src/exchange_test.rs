#[cfg(test)]
mod tests {
    use super::super::core::{Group, LogEntry, Player};
    use super::super::exchange::*;
    use super::super::inventory::{distinct_kinds, Objective, Quota};
    use super::super::types::CandyKind::{self, *};
    use super::super::types::{GroupId, PlayerId};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    /// Every member should hold only different kinds.
    struct MixedHands;

    impl Objective for MixedHands {
        fn deficit(&self, holdings: &[&[CandyKind]]) -> u32 {
            holdings
                .iter()
                .map(|hand| (hand.len() - distinct_kinds(hand)) as u32)
                .sum()
        }
    }

    fn players(hands: Vec<Vec<CandyKind>>) -> Vec<Player> {
        hands
            .into_iter()
            .enumerate()
            .map(|(i, candies)| Player::new(PlayerId(i as u64 + 1), format!("Player {}", i + 1), candies))
            .collect()
    }

    fn one_group(n: usize) -> Group {
        Group::new(GroupId(0), (0..n).collect())
    }

    #[test]
    fn test_first_improving_swap_follows_order() {
        let a = [Lemon, Lemon];
        let b = [Pear, Pear];
        let holdings = [&a[..], &b[..]];

        let swap = find_improving_swap(&holdings, &MixedHands, 2, &[0, 1]).unwrap();
        assert_eq!(
            swap,
            Swap {
                giver: 0,
                receiver: 1,
                giver_slot: 0,
                receiver_slot: 0,
                deficit: 0
            }
        );

        let swap = find_improving_swap(&holdings, &MixedHands, 2, &[1, 0]).unwrap();
        assert_eq!((swap.giver, swap.receiver), (1, 0));
    }

    #[test]
    fn test_no_swap_when_nothing_improves() {
        let a = [Lemon, Pear];
        let b = [Pear, Egg];
        let holdings = [&a[..], &b[..]];
        assert_eq!(find_improving_swap(&holdings, &MixedHands, 0, &[0, 1]), None);
    }

    #[test]
    fn test_swaps_inside_a_group_never_change_quota_deficit() {
        let quota = Quota::uniform(2);
        let a = [Lemon, Lemon];
        let b = [Lemon, Pear];
        let c = [Pear, Pear];
        let d = [Lemon, Lemon];
        let holdings = [&a[..], &b[..], &c[..], &d[..]];
        let current = quota.deficit(&holdings);
        assert_eq!(current, 2);
        assert_eq!(find_improving_swap(&holdings, &quota, current, &[0, 1, 2, 3]), None);
    }

    #[test]
    fn test_group_formed_satisfied_completes_without_trading() {
        let mut players = players(vec![
            vec![Lemon, Pear],
            vec![Egg, Lemon],
            vec![Pear, Egg],
            vec![Egg, Egg],
        ]);
        let mut group = one_group(4);
        let mut rng = StdRng::seed_from_u64(1);

        let step = search_group(&mut group, &mut players, &Quota::uniform(2), 1, &mut rng).unwrap();

        assert_eq!(step.deficit_before, 0);
        assert!(step.trade.is_none());
        assert!(matches!(step.completion, Some(LogEntry::Completion { .. })));
        assert!(group.objective_achieved);
        assert_eq!(group.log.len(), 1);
        // Only the players holding two different kinds can win.
        let survivor = group.survivor.unwrap();
        assert!([PlayerId(1), PlayerId(2), PlayerId(3)].contains(&survivor));
    }

    #[test]
    fn test_single_kind_group_never_completes() {
        let mut players = players(vec![vec![Lemon, Lemon]; 4]);
        let mut group = one_group(4);
        let mut rng = StdRng::seed_from_u64(2);
        let quota = Quota::uniform(2);

        for tick in 1..=500 {
            let step = search_group(&mut group, &mut players, &quota, tick, &mut rng).unwrap();
            assert!(step.stalled());
            assert_eq!(step.deficit_after, 4);
        }
        assert!(!group.objective_achieved);
        assert!(group.survivor.is_none());
        assert!(group.log.is_empty());
    }

    #[test]
    fn test_search_converges_one_swap_per_tick() {
        let mut players = players(vec![
            vec![Lemon, Lemon],
            vec![Pear, Pear],
            vec![Egg, Egg],
            vec![Lemon, Pear],
        ]);
        let mut group = one_group(4);
        let mut rng = StdRng::seed_from_u64(3);

        let mut ticks = 0;
        while !group.objective_achieved {
            ticks += 1;
            assert!(ticks <= 10, "search did not converge");

            let trades_before = group.trade_count();
            let step = search_group(&mut group, &mut players, &MixedHands, ticks, &mut rng).unwrap();

            assert!(step.trade.is_some(), "an improving swap always exists here");
            assert!(step.deficit_after < step.deficit_before);
            assert_eq!(group.trade_count(), trades_before + 1);
            assert!(players.iter().all(|p| p.candies.len() == 2));
        }

        let survivor = group.survivor.unwrap();
        assert!(players.iter().any(|p| p.id == survivor));
        assert!(matches!(group.log.last(), Some(LogEntry::Completion { .. })));

        // A finished group is skipped from now on.
        let log_len = group.log.len();
        assert!(search_group(&mut group, &mut players, &MixedHands, 99, &mut rng).is_none());
        assert_eq!(group.log.len(), log_len);
    }

    #[test]
    fn test_trade_record_describes_the_swap() {
        let mut players = players(vec![vec![Lemon, Lemon], vec![Pear, Pear]]);
        let mut group = one_group(2);
        let mut rng = StdRng::seed_from_u64(4);

        let step = search_group(&mut group, &mut players, &MixedHands, 7, &mut rng).unwrap();
        let trade = step.trade.unwrap();

        assert_eq!(trade.tick, 7);
        assert_eq!(trade.group, GroupId(0));
        assert_ne!(trade.giver, trade.receiver);
        assert_ne!(trade.given, trade.received);

        let giver = players.iter().find(|p| p.id == trade.giver).unwrap();
        let receiver = players.iter().find(|p| p.id == trade.receiver).unwrap();
        assert!(giver.candies.contains(&trade.received));
        assert!(receiver.candies.contains(&trade.given));
        assert_eq!(
            LogEntry::Exchange(trade.clone()).to_string(),
            format!(
                "Group 1: {} traded {} for {} with {}.",
                trade.giver_name, trade.given, trade.received, trade.receiver_name
            )
        );
    }

    #[test]
    fn test_round_reports_all_achieved() {
        let mut players = players(vec![
            vec![Lemon, Pear],
            vec![Egg, Lemon],
            vec![Lemon, Lemon],
            vec![Lemon, Lemon],
        ]);
        let mut groups = vec![
            Group::new(GroupId(0), vec![0, 1]),
            Group::new(GroupId(1), vec![2, 3]),
        ];
        let quota = Quota::new([(Lemon, 1)]);
        let mut rng = StdRng::seed_from_u64(5);

        let outcome = exchange_round(&mut groups, &mut players, &quota, 1, &mut rng);
        assert_eq!(outcome.steps.len(), 2);
        assert!(outcome.all_achieved);
        assert!(outcome.any_progress());

        let outcome = exchange_round(&mut groups, &mut players, &quota, 2, &mut rng);
        assert!(outcome.steps.is_empty());
        assert!(outcome.all_achieved);
    }

    #[test]
    fn test_round_with_no_groups_is_not_all_achieved() {
        let mut rng = StdRng::seed_from_u64(6);
        let outcome = exchange_round(&mut [], &mut [], &Quota::default(), 1, &mut rng);
        assert!(!outcome.all_achieved);
        assert!(!outcome.any_progress());
    }
}
