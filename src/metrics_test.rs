#[cfg(test)]
mod tests {
    use super::super::core::{Group, LogEntry, Player, TradeRecord};
    use super::super::inventory::Quota;
    use super::super::metrics::*;
    use super::super::types::CandyKind::*;
    use super::super::types::{GroupId, PlayerId};
    use rust_decimal_macros::dec;

    fn create_test_players() -> Vec<Player> {
        vec![
            Player::new(PlayerId(1), "Ana", vec![Lemon, Pear]),
            Player::new(PlayerId(2), "Bo", vec![Egg, Egg]),
            Player::new(PlayerId(3), "Cy", vec![Lemon, Lemon]),
            Player::new(PlayerId(4), "Di", vec![Lemon, Lemon]),
            Player::new(PlayerId(5), "Ed", vec![Pear, Pear]),
            Player::new(PlayerId(6), "Fa", vec![Pear, Egg]),
        ]
    }

    fn create_test_groups() -> Vec<Group> {
        let mut done = Group::new(GroupId(0), vec![0, 1]);
        done.objective_achieved = true;
        done.survivor = Some(PlayerId(1));
        done.log.push(LogEntry::Exchange(TradeRecord {
            tick: 3,
            group: GroupId(0),
            giver: PlayerId(2),
            giver_name: "Bo".to_string(),
            receiver: PlayerId(1),
            receiver_name: "Ana".to_string(),
            given: Egg,
            received: Lemon,
        }));
        done.log.push(LogEntry::Completion {
            group: GroupId(0),
            survivor: PlayerId(1),
            survivor_name: "Ana".to_string(),
        });
        vec![
            done,
            Group::new(GroupId(1), vec![2, 3]),
            Group::new(GroupId(2), vec![4, 5]),
        ]
    }

    #[test]
    fn test_summary_counts_and_rate() {
        let quota = Quota::new([(Lemon, 1), (Egg, 1)]);
        let summary = GameSummary::calculate(&create_test_groups(), &create_test_players(), &quota);

        assert_eq!(summary.total_groups, 3);
        assert_eq!(summary.successful_groups, 1);
        assert_eq!(summary.success_rate, dec!(33.33));
        assert_eq!(
            summary.survivors,
            vec![SurvivorEntry {
                group: GroupId(0),
                player: PlayerId(1),
                name: "Ana".to_string(),
            }]
        );
    }

    #[test]
    fn test_group_reports() {
        let quota = Quota::new([(Lemon, 1), (Egg, 1)]);
        let summary = GameSummary::calculate(&create_test_groups(), &create_test_players(), &quota);

        let second = &summary.groups[1];
        assert!(!second.objective_achieved);
        assert_eq!(second.final_deficit, 1);
        assert_eq!(second.counts.get(Lemon), 4);
        assert_eq!(second.members, vec!["Cy: 🍋🍋", "Di: 🍋🍋"]);
        assert!(second.log.is_empty());
        assert_eq!(summary.groups[2].final_deficit, 1);

        let first = &summary.groups[0];
        assert_eq!(first.trades, 1);
        assert_eq!(
            first.log,
            vec![
                "Group 1: Bo traded 🥚 for 🍋 with Ana.",
                "Group 1 reached the objective! Survivor: Ana 🍭",
            ]
        );
    }

    #[test]
    fn test_empty_game_summary() {
        let summary = GameSummary::calculate(&[], &[], &Quota::default());
        assert_eq!(summary.total_groups, 0);
        assert_eq!(summary.success_rate, dec!(0));
        assert_eq!(summary.to_string(), "No groups were formed.");
    }

    #[test]
    fn test_summary_display() {
        let summary =
            GameSummary::calculate(&create_test_groups(), &create_test_players(), &Quota::default());
        let display = summary.to_string();

        assert!(display.contains("Total groups: 3"));
        assert!(display.contains("Success rate: 33.33%"));
        assert!(display.contains("Ana (Group 1) 🍭"));
        assert!(display.contains("    - Group 1: Bo traded 🥚 for 🍋 with Ana."));
        assert_eq!(display.matches("No exchanges recorded in this group.").count(), 2);
    }

    #[test]
    fn test_full_success_rate() {
        let players = create_test_players();
        let mut groups = create_test_groups();
        groups.truncate(1);
        let summary = GameSummary::calculate(&groups, &players, &Quota::default());
        assert_eq!(summary.success_rate, dec!(100));
    }
}
