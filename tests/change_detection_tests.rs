//! Property tests for snapshot change classification
//!
//! The partition property: for any pair of snapshots, the three buckets
//! are pairwise disjoint by id, and every id present in either snapshot is
//! accounted for by exactly one of new / expired / updated / unchanged.

use std::collections::HashSet;

use chrono::{TimeZone, Utc};
use proptest::prelude::*;

use livelo_tracker::domain::changes::detect_changes;
use livelo_tracker::domain::promotion::{Airline, Promotion};

fn promotion_strategy() -> impl Strategy<Value = Promotion> {
    let airlines = prop_oneof![
        Just(Airline::Latam),
        Just(Airline::Azul),
        Just(Airline::Smiles),
        Just(Airline::FlyingBlue),
        Just(Airline::Tap),
    ];
    (airlines, proptest::option::of(0u32..200), proptest::bool::ANY, "[a-z]{0,8}").prop_map(
        |(airline, bonus, dated, title)| {
            let valid_until = dated.then(|| Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap().date_naive());
            Promotion {
                id: Promotion::identity(airline, bonus, valid_until),
                airline,
                bonus_percentage: bonus,
                valid_until,
                minimum_points: None,
                title,
                description: String::new(),
                link: String::new(),
                scraped_at: Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap(),
            }
        },
    )
}

fn snapshot_strategy() -> impl Strategy<Value = Vec<Promotion>> {
    proptest::collection::vec(promotion_strategy(), 0..12)
}

fn id_set(promotions: &[Promotion]) -> HashSet<String> {
    promotions.iter().map(|p| p.id.clone()).collect()
}

proptest! {
    #[test]
    fn buckets_partition_the_id_space(
        old in snapshot_strategy(),
        new in snapshot_strategy(),
    ) {
        let changes = detect_changes(&old, &new);

        let new_ids = id_set(&changes.new);
        let expired_ids = id_set(&changes.expired);
        let updated_ids = id_set(&changes.updated);

        // Pairwise disjoint.
        prop_assert!(new_ids.is_disjoint(&expired_ids));
        prop_assert!(new_ids.is_disjoint(&updated_ids));
        prop_assert!(expired_ids.is_disjoint(&updated_ids));

        // Each bucket contains no duplicates.
        prop_assert_eq!(new_ids.len(), changes.new.len());
        prop_assert_eq!(expired_ids.len(), changes.expired.len());
        prop_assert_eq!(updated_ids.len(), changes.updated.len());

        // Every id in either snapshot lands in exactly one of
        // new / expired / updated / unchanged.
        let old_ids = id_set(&old);
        let current_ids = id_set(&new);
        for id in old_ids.union(&current_ids) {
            let in_old = old_ids.contains(id);
            let in_new = current_ids.contains(id);
            let classified = [
                new_ids.contains(id),
                expired_ids.contains(id),
                updated_ids.contains(id),
            ]
            .iter()
            .filter(|&&b| b)
            .count();

            match (in_old, in_new) {
                (false, true) => prop_assert!(new_ids.contains(id)),
                (true, false) => prop_assert!(expired_ids.contains(id)),
                // Present in both: either updated or unchanged, never
                // new/expired.
                (true, true) => prop_assert!(
                    classified == 0 || updated_ids.contains(id)
                ),
                (false, false) => unreachable!(),
            }
            prop_assert!(classified <= 1);
        }
    }

    #[test]
    fn diffing_a_snapshot_with_itself_is_empty(
        snapshot in snapshot_strategy(),
    ) {
        let changes = detect_changes(&snapshot, &snapshot);
        prop_assert!(changes.is_empty());
    }
}
