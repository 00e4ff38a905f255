//! Frequency capping: decides whether a creative set may still be delivered
//! given the views already recorded in the interaction log.

use ads_core::{AdHistory, Catalog, ConfirmationType, CreativeSet};
use chrono::{DateTime, Duration, Utc};
use tracing::debug;

pub struct FrequencyCapper {
    window: Duration,
}

impl FrequencyCapper {
    /// Capper with a trailing 24 hour `per_day` window.
    pub fn new() -> Self {
        Self::with_window(Duration::days(1))
    }

    pub fn with_window(window: Duration) -> Self {
        Self { window }
    }

    fn views<'a>(
        set: &'a CreativeSet,
        history: &'a [AdHistory],
    ) -> impl Iterator<Item = &'a AdHistory> {
        history.iter().filter(move |ad| {
            ad.ad_action == ConfirmationType::Viewed && ad.creative_set_id == set.id
        })
    }

    /// Views of `set` within the trailing window ending at `now`.
    pub fn views_in_window(
        &self,
        set: &CreativeSet,
        history: &[AdHistory],
        now: DateTime<Utc>,
    ) -> u32 {
        let window_start = now - self.window;
        Self::views(set, history)
            .filter(|ad| ad.timestamp > window_start && ad.timestamp <= now)
            .count() as u32
    }

    pub fn per_day_exceeded(
        &self,
        set: &CreativeSet,
        history: &[AdHistory],
        now: DateTime<Utc>,
    ) -> bool {
        self.views_in_window(set, history, now) >= set.per_day
    }

    pub fn total_max_exceeded(&self, set: &CreativeSet, history: &[AdHistory]) -> bool {
        Self::views(set, history).count() as u32 >= set.total_max
    }

    /// A set is eligible when it is deliverable at all and neither cap has
    /// been reached.
    pub fn is_eligible(
        &self,
        set: &CreativeSet,
        history: &[AdHistory],
        now: DateTime<Utc>,
    ) -> bool {
        if !set.is_deliverable() {
            return false;
        }
        if self.total_max_exceeded(set, history) {
            debug!(creative_set_id = %set.id, total_max = set.total_max, "total max reached");
            return false;
        }
        if self.per_day_exceeded(set, history, now) {
            debug!(creative_set_id = %set.id, per_day = set.per_day, "per day cap reached");
            return false;
        }
        true
    }

    /// Eligible creative sets of campaigns running at `now`, in catalog order.
    pub fn eligible_creative_sets<'c>(
        &self,
        catalog: &'c Catalog,
        history: &[AdHistory],
        now: DateTime<Utc>,
    ) -> Vec<&'c CreativeSet> {
        let eligible: Vec<&CreativeSet> = catalog
            .campaigns()
            .iter()
            .filter(|campaign| campaign.is_active(now))
            .flat_map(|campaign| campaign.creative_sets.iter())
            .filter(|set| self.is_eligible(set, history, now))
            .collect();

        debug!(
            total = catalog.creative_sets().count(),
            eligible = eligible.len(),
            "eligible creative sets computed"
        );
        eligible
    }
}

impl Default for FrequencyCapper {
    fn default() -> Self {
        Self::new()
    }
}
