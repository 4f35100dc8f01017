use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::cancellations::CancellationRecord;

type Key = (NaiveDate, String);

/// One record per key. Duplicates inside a batch keep the greatest reason.
fn dedupe(
    records: impl IntoIterator<Item = CancellationRecord>,
) -> BTreeMap<Key, CancellationRecord> {
    let mut by_key: BTreeMap<Key, CancellationRecord> = BTreeMap::new();
    for record in records {
        let key = (record.date, record.name.clone());
        match by_key.get(&key) {
            Some(kept) if kept.reason >= record.reason => {}
            _ => {
                by_key.insert(key, record);
            }
        }
    }
    by_key
}

/// Drops prior records dated before `reference`, then unions in `fresh` by
/// `(name, date)`. Fresh records win on collision. Output is sorted by date, then name.
pub fn merge_by_key(
    existing: Vec<CancellationRecord>,
    fresh: Vec<CancellationRecord>,
    reference: NaiveDate,
) -> Vec<CancellationRecord> {
    let mut merged = dedupe(existing.into_iter().filter(|r| r.date >= reference));
    merged.extend(dedupe(fresh));

    merged.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, day: &str, reason: &str) -> CancellationRecord {
        CancellationRecord {
            name: name.to_string(),
            reason: reason.to_string(),
            date: NaiveDate::parse_from_str(day, "%Y-%m-%d").unwrap(),
        }
    }

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    #[test]
    fn test_merging_with_itself_is_idempotent() {
        let set = vec![
            record("Bushy", "2024-05-04", "Event clash"),
            record("Fell Foot", "2024-05-04", "Flooding"),
        ];

        let merged = merge_by_key(set.clone(), set.clone(), reference());
        let again = merge_by_key(merged.clone(), merged.clone(), reference());

        assert_eq!(merged.len(), 2);
        assert_eq!(merged, again);
    }

    #[test]
    fn test_drops_past_records_from_prior_set() {
        let existing = vec![
            record("Bushy", "2024-04-27", "Event clash"),
            record("Fell Foot", "2024-05-01", "Flooding"),
            record("Poolsbrook", "2024-05-04", "Works"),
        ];

        let merged = merge_by_key(existing, Vec::new(), reference());

        assert!(merged.iter().all(|r| r.date >= reference()));
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_fresh_values_win_on_collision() {
        let existing = vec![record("Bushy", "2024-05-04", "Event clash")];
        let fresh = vec![record("Bushy", "2024-05-04", "Course maintenance")];

        let merged = merge_by_key(existing, fresh, reference());

        assert_eq!(merged, vec![record("Bushy", "2024-05-04", "Course maintenance")]);
    }

    #[test]
    fn test_same_name_on_different_dates_are_distinct() {
        let existing = vec![record("Bushy", "2024-05-04", "Event clash")];
        let fresh = vec![record("Bushy", "2024-05-11", "Event clash")];

        let merged = merge_by_key(existing, fresh, reference());

        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_result_does_not_depend_on_input_order() {
        let a = record("Bushy", "2024-05-04", "Event clash");
        let b = record("Albert", "2024-05-04", "Works");
        let c = record("Fell Foot", "2024-05-05", "Flooding");

        let forward = merge_by_key(vec![a.clone(), b.clone()], vec![c.clone()], reference());
        let backward = merge_by_key(vec![b, a], vec![c], reference());

        assert_eq!(forward, backward);
        assert_eq!(forward[0].name, "Albert");
    }

    #[test]
    fn test_repeated_key_in_batch_does_not_depend_on_order() {
        let first = record("Bushy", "2024-05-04", "Course flooded");
        let second = record("Bushy", "2024-05-04", "Event clash");

        let forward = merge_by_key(Vec::new(), vec![first.clone(), second.clone()], reference());
        let backward = merge_by_key(Vec::new(), vec![second.clone(), first.clone()], reference());
        assert_eq!(forward, backward);
        assert_eq!(forward, vec![second.clone()]);

        let prior_forward = merge_by_key(vec![first.clone(), second.clone()], Vec::new(), reference());
        let prior_backward = merge_by_key(vec![second, first], Vec::new(), reference());
        assert_eq!(prior_forward, prior_backward);
    }
}
