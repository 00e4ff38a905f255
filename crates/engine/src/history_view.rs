//! Read path over the interaction log: date range, then the configured
//! filter, then the configured ordering.

use ads_core::config::HistoryConfig;
use ads_core::AdHistory;
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::filters::{history_filter, DateRangeFilter, HistoryFilter};
use crate::sorts::{history_sort, Sort};

pub struct HistoryView {
    filter: Box<dyn HistoryFilter>,
    sort: Box<dyn Sort<AdHistory>>,
}

impl HistoryView {
    pub fn new(config: &HistoryConfig) -> Self {
        Self {
            filter: history_filter(config.filter),
            sort: history_sort(config.sort),
        }
    }

    /// Compose a view from explicit strategies.
    pub fn with(filter: Box<dyn HistoryFilter>, sort: Box<dyn Sort<AdHistory>>) -> Self {
        Self { filter, sort }
    }

    /// Records in `[from, to]`, filtered and ordered. The input log is not
    /// modified.
    pub fn get(
        &self,
        history: &[AdHistory],
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Vec<AdHistory> {
        let in_range = DateRangeFilter::new(from, to).apply(history);
        let filtered = self.filter.apply(&in_range);
        let sorted = self.sort.apply(&filtered);

        debug!(
            input = history.len(),
            in_range = in_range.len(),
            output = sorted.len(),
            "history view built"
        );
        sorted
    }
}

impl Default for HistoryView {
    fn default() -> Self {
        Self::new(&HistoryConfig::default())
    }
}
