#[cfg(test)]
mod tests {
    use super::super::inventory::*;
    use super::super::types::CandyKind::{self, *};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_count_by_kind_covers_every_kind() {
        let counts = count_by_kind(&[Lemon, Lemon, Egg]);
        assert_eq!(counts.get(Lemon), 2);
        assert_eq!(counts.get(Pear), 0);
        assert_eq!(counts[Egg], 1);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn test_count_by_kind_sums_to_length() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let len = rng.random_range(0..20);
            let candies: Vec<CandyKind> = (0..len).map(|_| CandyKind::random(&mut rng)).collect();
            let counts = count_by_kind(&candies);
            assert_eq!(counts.total() as usize, candies.len());
            assert_eq!(counts.iter().count(), CandyKind::ALL.len());
        }
    }

    #[test]
    fn test_empty_hand_counts_zero() {
        let empty: [CandyKind; 0] = [];
        let counts = count_by_kind(&empty);
        assert!(counts.iter().all(|(_, n)| n == 0));
    }

    #[test]
    fn test_deficit_sums_shortfalls() {
        let quota = Quota::uniform(2);
        let a = [Lemon, Lemon];
        let b = [Lemon, Pear];
        // Lemon 3, Pear 1, Egg 0: short one pear and two eggs
        assert_eq!(quota.deficit(&[&a[..], &b[..]]), 3);
    }

    #[test]
    fn test_deficit_zero_iff_every_quota_met() {
        let quota = Quota::new([(Lemon, 2), (Pear, 1), (Egg, 1)]);
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..300 {
            let hand: Vec<CandyKind> = (0..6).map(|_| CandyKind::random(&mut rng)).collect();
            let counts = count_by_kind(&hand);
            let met = quota.iter().all(|(kind, n)| counts.get(kind) >= n);
            assert_eq!(quota.deficit(&[&hand[..]]) == 0, met);
            assert_eq!(quota.is_met(&[&hand[..]]), met);
        }
    }

    #[test]
    fn test_surplus_does_not_offset_shortfall() {
        let quota = Quota::uniform(2);
        let hand = [Lemon, Lemon, Lemon, Lemon, Lemon, Lemon, Pear, Pear];
        assert_eq!(quota.deficit(&[&hand[..]]), 2);
    }

    #[test]
    fn test_unlisted_kind_requires_nothing() {
        let quota = Quota::new([(Lemon, 1)]);
        assert_eq!(quota.required(Egg), 0);
        assert_eq!(quota.total(), 1);
        assert_eq!(quota.deficit(&[&[Lemon][..]]), 0);
    }

    #[test]
    fn test_distinct_kinds() {
        assert_eq!(distinct_kinds(&[]), 0);
        assert_eq!(distinct_kinds(&[Egg, Egg]), 1);
        assert_eq!(distinct_kinds(&[Egg, Pear, Egg, Lemon]), 3);
    }

    #[test]
    fn test_quota_serialization() {
        let quota = Quota::new([(Lemon, 3), (Egg, 1)]);
        let json = serde_json::to_string(&quota).unwrap();
        assert_eq!(json, r#"{"Lemon":3,"Egg":1}"#);
        let back: Quota = serde_json::from_str(&json).unwrap();
        assert_eq!(back, quota);
    }
}
