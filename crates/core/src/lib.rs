//! On-device ad catalog model, interaction history records, and the JSON
//! codec used to persist and exchange them.

pub mod ad_history;
pub mod catalog;
pub mod codec;
pub mod config;
pub mod confirmation_type;
pub mod error;
pub mod publisher_ad;

pub use ad_history::AdHistory;
pub use catalog::{AdConversion, Catalog, CatalogCampaign, CreativeSet};
pub use codec::JsonCodec;
pub use config::EngineConfig;
pub use confirmation_type::ConfirmationType;
pub use error::{AdsError, AdsResult, CatalogError, ConfirmationTypeError, DecodeError};
pub use publisher_ad::PublisherAdInfo;
