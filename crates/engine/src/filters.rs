//! History filters: reduce a raw interaction log to the records a reader
//! should see. Filters never mutate their input and never fail.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use ads_core::config::HistoryFilterKind;
use ads_core::AdHistory;
use chrono::{DateTime, Utc};
use tracing::debug;

pub trait HistoryFilter: Send + Sync {
    fn apply(&self, history: &[AdHistory]) -> Vec<AdHistory>;
}

/// Build the filter selected by configuration.
pub fn history_filter(kind: HistoryFilterKind) -> Box<dyn HistoryFilter> {
    match kind {
        HistoryFilterKind::Confirmation => Box::new(ConfirmationFilter),
        HistoryFilterKind::None => Box::new(NoFilter),
    }
}

// ---------------------------------------------------------------------------
// ConfirmationFilter
// ---------------------------------------------------------------------------

/// Collapses the log to one canonical record per ad impression.
///
/// Only viewed, clicked and dismissed records are considered. When an
/// impression has several, the one with the lowest confirmation ordinal is
/// kept, regardless of arrival order. Output is ordered by `uuid`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfirmationFilter;

impl HistoryFilter for ConfirmationFilter {
    fn apply(&self, history: &[AdHistory]) -> Vec<AdHistory> {
        let mut retained: BTreeMap<&str, &AdHistory> = BTreeMap::new();
        let mut discarded = 0usize;

        for ad in history {
            if !ad.ad_action.is_funnel_event() {
                discarded += 1;
                continue;
            }

            match retained.entry(ad.uuid.as_str()) {
                Entry::Vacant(slot) => {
                    slot.insert(ad);
                }
                Entry::Occupied(mut slot) => {
                    if slot.get().ad_action.value() > ad.ad_action.value() {
                        slot.insert(ad);
                    }
                }
            }
        }

        debug!(
            input = history.len(),
            retained = retained.len(),
            discarded,
            "confirmation filter applied"
        );

        retained.into_values().cloned().collect()
    }
}

// ---------------------------------------------------------------------------
// DateRangeFilter
// ---------------------------------------------------------------------------

/// Keeps records whose timestamp lies within `[from, to]`. A missing bound is
/// open.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateRangeFilter {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl DateRangeFilter {
    pub fn new(from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Self {
        Self { from, to }
    }

    fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        let after_start = self.from.map_or(true, |from| timestamp >= from);
        let before_end = self.to.map_or(true, |to| timestamp <= to);
        after_start && before_end
    }
}

impl HistoryFilter for DateRangeFilter {
    fn apply(&self, history: &[AdHistory]) -> Vec<AdHistory> {
        history
            .iter()
            .filter(|ad| self.contains(ad.timestamp))
            .cloned()
            .collect()
    }
}

/// Passes every record through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFilter;

impl HistoryFilter for NoFilter {
    fn apply(&self, history: &[AdHistory]) -> Vec<AdHistory> {
        history.to_vec()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use ads_core::ConfirmationType;
    use chrono::{Duration, TimeZone};

    fn record(uuid: &str, action: ConfirmationType) -> AdHistory {
        AdHistory {
            timestamp: Utc.with_ymd_and_hms(2020, 3, 1, 9, 0, 0).unwrap(),
            uuid: uuid.to_string(),
            ad_action: action,
            creative_set_id: "cs-1".to_string(),
            ..Default::default()
        }
    }

    fn actions_for(history: &[AdHistory], uuid: &str) -> Vec<ConfirmationType> {
        history
            .iter()
            .filter(|ad| ad.uuid == uuid)
            .map(|ad| ad.ad_action)
            .collect()
    }

    #[test]
    fn test_empty_history() {
        assert!(ConfirmationFilter.apply(&[]).is_empty());
        assert!(NoFilter.apply(&[]).is_empty());
        assert!(DateRangeFilter::default().apply(&[]).is_empty());
    }

    #[test]
    fn test_clicked_beats_viewed() {
        let history = vec![
            record("u", ConfirmationType::Clicked),
            record("u", ConfirmationType::Viewed),
        ];
        let filtered = ConfirmationFilter.apply(&history);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].ad_action, ConfirmationType::Clicked);
    }

    #[test]
    fn test_lowest_ordinal_wins_regardless_of_order() {
        let history = vec![
            record("u", ConfirmationType::Viewed),
            record("u", ConfirmationType::Dismissed),
            record("u", ConfirmationType::Viewed),
        ];
        assert_eq!(
            actions_for(&ConfirmationFilter.apply(&history), "u"),
            vec![ConfirmationType::Dismissed]
        );

        let history = vec![
            record("u", ConfirmationType::Viewed),
            record("u", ConfirmationType::Clicked),
            record("u", ConfirmationType::Dismissed),
        ];
        assert_eq!(
            actions_for(&ConfirmationFilter.apply(&history), "u"),
            vec![ConfirmationType::Clicked]
        );
    }

    #[test]
    fn test_first_of_equal_actions_is_kept() {
        let mut first = record("u", ConfirmationType::Viewed);
        first.creative_instance_id = "first".to_string();
        let mut second = record("u", ConfirmationType::Viewed);
        second.creative_instance_id = "second".to_string();

        let filtered = ConfirmationFilter.apply(&[first, second]);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].creative_instance_id, "first");
    }

    #[test]
    fn test_excluded_actions_dropped() {
        let history: Vec<AdHistory> = [
            ConfirmationType::None,
            ConfirmationType::Landed,
            ConfirmationType::Flagged,
            ConfirmationType::Upvoted,
            ConfirmationType::Downvoted,
            ConfirmationType::Conversion,
        ]
        .into_iter()
        .enumerate()
        .map(|(i, action)| record(&format!("u-{i}"), action))
        .collect();

        assert!(ConfirmationFilter.apply(&history).is_empty());
    }

    #[test]
    fn test_excluded_action_does_not_displace_funnel_event() {
        let history = vec![
            record("u", ConfirmationType::Viewed),
            record("u", ConfirmationType::None),
            record("u", ConfirmationType::Landed),
        ];
        assert_eq!(
            actions_for(&ConfirmationFilter.apply(&history), "u"),
            vec![ConfirmationType::Viewed]
        );
    }

    #[test]
    fn test_one_record_per_uuid_ordered_by_uuid() {
        let history = vec![
            record("c", ConfirmationType::Viewed),
            record("a", ConfirmationType::Viewed),
            record("b", ConfirmationType::Dismissed),
            record("a", ConfirmationType::Clicked),
            record("c", ConfirmationType::Conversion),
        ];
        let filtered = ConfirmationFilter.apply(&history);
        let uuids: Vec<&str> = filtered.iter().map(|ad| ad.uuid.as_str()).collect();
        assert_eq!(uuids, vec!["a", "b", "c"]);
        assert_eq!(filtered[0].ad_action, ConfirmationType::Clicked);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let history = vec![
            record("x", ConfirmationType::Viewed),
            record("y", ConfirmationType::Clicked),
            record("x", ConfirmationType::Dismissed),
            record("z", ConfirmationType::Flagged),
            record("y", ConfirmationType::Viewed),
        ];
        let once = ConfirmationFilter.apply(&history);
        let twice = ConfirmationFilter.apply(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_input_untouched() {
        let history = vec![
            record("u", ConfirmationType::Viewed),
            record("u", ConfirmationType::Clicked),
        ];
        let snapshot = history.clone();
        let _ = ConfirmationFilter.apply(&history);
        assert_eq!(history, snapshot);
    }

    #[test]
    fn test_date_range_inclusive() {
        let base = Utc.with_ymd_and_hms(2020, 3, 1, 0, 0, 0).unwrap();
        let history: Vec<AdHistory> = (0..5)
            .map(|day| {
                let mut ad = record(&format!("u-{day}"), ConfirmationType::Viewed);
                ad.timestamp = base + Duration::days(day);
                ad
            })
            .collect();

        let filter = DateRangeFilter::new(
            Some(base + Duration::days(1)),
            Some(base + Duration::days(3)),
        );
        let uuids: Vec<String> = filter.apply(&history).into_iter().map(|ad| ad.uuid).collect();
        assert_eq!(uuids, vec!["u-1", "u-2", "u-3"]);

        let open_start = DateRangeFilter::new(None, Some(base + Duration::days(1)));
        assert_eq!(open_start.apply(&history).len(), 2);

        let open_end = DateRangeFilter::new(Some(base + Duration::days(4)), None);
        assert_eq!(open_end.apply(&history).len(), 1);
    }

    #[test]
    fn test_history_filter_from_config() {
        let history = vec![
            record("u", ConfirmationType::Viewed),
            record("u", ConfirmationType::Clicked),
        ];
        let confirmation = history_filter(HistoryFilterKind::Confirmation);
        assert_eq!(confirmation.apply(&history).len(), 1);
        assert_eq!(history_filter(HistoryFilterKind::None).apply(&history), history);
    }
}
