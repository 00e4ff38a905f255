//! Ad engine: history filtering, ordering strategies, and frequency capping
//! over the catalog and interaction records from `ads-core`.

pub mod filters;
pub mod frequency_capping;
pub mod history_view;
pub mod sorts;

pub use filters::{ConfirmationFilter, DateRangeFilter, HistoryFilter, NoFilter};
pub use frequency_capping::FrequencyCapper;
pub use history_view::HistoryView;
pub use sorts::{conversions_sort, history_sort, CreativeSetsByRemainingCapacity, Sort};
