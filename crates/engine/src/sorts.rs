//! Ordering strategies. Callers hold a `Box<dyn Sort<T>>` chosen from
//! configuration and never name a concrete strategy.
//!
//! Every strategy is stable: elements with equal keys keep their relative
//! input order.

use std::collections::HashMap;
use std::marker::PhantomData;

use ads_core::config::SortOrder;
use ads_core::{AdConversion, AdHistory, ConfirmationType, CreativeSet};

pub trait Sort<T>: Send + Sync {
    /// Return a new, ordered copy of `list`.
    fn apply(&self, list: &[T]) -> Vec<T>;
}

/// Lowest key first.
pub struct Ascending<T, K, F> {
    key: F,
    _marker: PhantomData<fn(&T) -> K>,
}

impl<T, K, F> Ascending<T, K, F>
where
    F: Fn(&T) -> K,
{
    pub fn by(key: F) -> Self {
        Self {
            key,
            _marker: PhantomData,
        }
    }
}

impl<T, K, F> Sort<T> for Ascending<T, K, F>
where
    T: Clone,
    K: Ord,
    F: Fn(&T) -> K + Send + Sync,
{
    fn apply(&self, list: &[T]) -> Vec<T> {
        let mut sorted = list.to_vec();
        sorted.sort_by_key(|item| (self.key)(item));
        sorted
    }
}

/// Highest key first.
pub struct Descending<T, K, F> {
    key: F,
    _marker: PhantomData<fn(&T) -> K>,
}

impl<T, K, F> Descending<T, K, F>
where
    F: Fn(&T) -> K,
{
    pub fn by(key: F) -> Self {
        Self {
            key,
            _marker: PhantomData,
        }
    }
}

impl<T, K, F> Sort<T> for Descending<T, K, F>
where
    T: Clone,
    K: Ord,
    F: Fn(&T) -> K + Send + Sync,
{
    fn apply(&self, list: &[T]) -> Vec<T> {
        let mut sorted = list.to_vec();
        // Comparing b to a (rather than reversing) keeps ties in input order.
        sorted.sort_by(|a, b| (self.key)(b).cmp(&(self.key)(a)));
        sorted
    }
}

/// Keeps input order.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unsorted;

impl<T: Clone> Sort<T> for Unsorted {
    fn apply(&self, list: &[T]) -> Vec<T> {
        list.to_vec()
    }
}

fn keyed<T, K, F>(order: SortOrder, key: F) -> Box<dyn Sort<T>>
where
    T: Clone + 'static,
    K: Ord + 'static,
    F: Fn(&T) -> K + Send + Sync + 'static,
{
    match order {
        SortOrder::Ascending => Box::new(Ascending::by(key)),
        SortOrder::Descending => Box::new(Descending::by(key)),
        SortOrder::None => Box::new(Unsorted),
    }
}

/// Conversion rules ordered by observation window.
pub fn conversions_sort(order: SortOrder) -> Box<dyn Sort<AdConversion>> {
    keyed(order, |conversion: &AdConversion| conversion.observation_window)
}

/// History records ordered by timestamp.
pub fn history_sort(order: SortOrder) -> Box<dyn Sort<AdHistory>> {
    keyed(order, |ad: &AdHistory| ad.timestamp)
}

// ---------------------------------------------------------------------------
// Remaining capacity
// ---------------------------------------------------------------------------

/// Orders creative sets by how many more views their `total_max` allows,
/// most headroom first.
#[derive(Debug, Clone, Default)]
pub struct CreativeSetsByRemainingCapacity {
    views: HashMap<String, u32>,
}

impl CreativeSetsByRemainingCapacity {
    /// Count viewed records per creative set in a raw history.
    pub fn from_history(history: &[AdHistory]) -> Self {
        let mut views: HashMap<String, u32> = HashMap::new();
        for ad in history {
            if ad.ad_action == ConfirmationType::Viewed {
                *views.entry(ad.creative_set_id.clone()).or_default() += 1;
            }
        }
        Self { views }
    }

    pub fn remaining(&self, set: &CreativeSet) -> u32 {
        let delivered = self.views.get(&set.id).copied().unwrap_or(0);
        set.total_max.saturating_sub(delivered)
    }
}

impl Sort<CreativeSet> for CreativeSetsByRemainingCapacity {
    fn apply(&self, list: &[CreativeSet]) -> Vec<CreativeSet> {
        let mut sorted = list.to_vec();
        sorted.sort_by(|a, b| self.remaining(b).cmp(&self.remaining(a)));
        sorted
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
