//! Snapshot change detection
//!
//! Compares the previous promotion snapshot against the freshly parsed one
//! and classifies every id into exactly one of new / expired / updated /
//! unchanged. Pure function over its inputs; nothing here touches storage.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::promotion::Promotion;

/// Classified delta between two snapshots. Ephemeral: handed to the
/// notification collaborator and never persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChangeSet {
    pub new: Vec<Promotion>,
    pub expired: Vec<Promotion>,
    pub updated: Vec<Promotion>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.new.is_empty() && self.expired.is_empty() && self.updated.is_empty()
    }

    /// Total number of ids that changed state between the two snapshots.
    pub fn total(&self) -> usize {
        self.new.len() + self.expired.len() + self.updated.len()
    }
}

/// Classify the delta between `old` and `new` snapshots.
///
/// - id only in `new` -> new
/// - id only in `old` -> expired
/// - id in both with any field differing -> updated (the `new` copy is kept)
/// - id in both, fully identical -> unchanged, reported in no bucket
///
/// If an id repeats within one list the last occurrence wins, matching the
/// map-building behavior downstream consumers rely on.
pub fn detect_changes(old: &[Promotion], new: &[Promotion]) -> ChangeSet {
    let old_map: HashMap<&str, &Promotion> =
        old.iter().map(|p| (p.id.as_str(), p)).collect();
    let new_map: HashMap<&str, &Promotion> =
        new.iter().map(|p| (p.id.as_str(), p)).collect();

    let mut changes = ChangeSet::default();

    // Iterate the lists rather than the maps so bucket order follows
    // snapshot order; the maps answer membership and pick the winning
    // (last) occurrence whenever an id repeats within a list.
    for promo in new {
        let winner = new_map[promo.id.as_str()];
        if !std::ptr::eq(winner, promo) {
            continue;
        }
        match old_map.get(promo.id.as_str()) {
            None => changes.new.push(promo.clone()),
            Some(previous) => {
                if *previous != promo {
                    changes.updated.push(promo.clone());
                }
            }
        }
    }

    for promo in old {
        let winner = old_map[promo.id.as_str()];
        if !std::ptr::eq(winner, promo) {
            continue;
        }
        if !new_map.contains_key(promo.id.as_str()) {
            changes.expired.push(promo.clone());
        }
    }

    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::promotion::Airline;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn promo(id: &str, title: &str) -> Promotion {
        Promotion {
            id: id.to_string(),
            airline: Airline::Latam,
            bonus_percentage: Some(30),
            valid_until: NaiveDate::from_ymd_opt(2025, 2, 24),
            minimum_points: Some(15_000),
            title: title.to_string(),
            description: String::new(),
            link: String::new(),
            // Fixed timestamp so equality compares deterministically.
            scraped_at: Utc.with_ymd_and_hms(2025, 2, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn detects_new_promotion() {
        let old = vec![promo("latam-30-2025-02-24", "LATAM")];
        let new = vec![
            promo("latam-30-2025-02-24", "LATAM"),
            promo("azul-110-ongoing", "Azul"),
        ];
        let changes = detect_changes(&old, &new);
        assert_eq!(changes.new.len(), 1);
        assert_eq!(changes.new[0].id, "azul-110-ongoing");
        assert!(changes.expired.is_empty());
        assert!(changes.updated.is_empty());
    }

    #[test]
    fn detects_expired_promotion() {
        let old = vec![promo("smiles-60-2026-01-31", "Smiles")];
        let changes = detect_changes(&old, &[]);
        assert!(changes.new.is_empty());
        assert_eq!(changes.expired.len(), 1);
        assert_eq!(changes.expired[0].id, "smiles-60-2026-01-31");
    }

    #[test]
    fn same_id_different_fields_is_updated() {
        let old = vec![promo("smiles-60-2026-01-31", "A")];
        let new = vec![promo("smiles-60-2026-01-31", "B")];
        let changes = detect_changes(&old, &new);
        assert!(changes.new.is_empty());
        assert!(changes.expired.is_empty());
        assert_eq!(changes.updated.len(), 1);
        assert_eq!(changes.updated[0].title, "B");
    }

    #[test]
    fn identical_snapshots_report_nothing() {
        let snapshot = vec![promo("latam-30-2025-02-24", "LATAM")];
        let changes = detect_changes(&snapshot, &snapshot);
        assert!(changes.is_empty());
    }

    #[test]
    fn inputs_are_not_mutated() {
        let old = vec![promo("x", "x")];
        let new: Vec<Promotion> = Vec::new();
        let old_before = old.clone();
        let _ = detect_changes(&old, &new);
        assert_eq!(old, old_before);
    }
}
