use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::codec::{decode_object, JsonCodec};
use crate::confirmation_type::ConfirmationType;
use crate::error::{ConfirmationTypeError, DecodeError};
use crate::publisher_ad::PublisherAdInfo;

/// One logged interaction with a delivered ad.
///
/// Records are appended once per interaction and never mutated. The raw log
/// may hold several records per `uuid`; filtering collapses them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdHistory {
    pub timestamp: DateTime<Utc>,
    pub uuid: String,
    pub ad_action: ConfirmationType,
    pub creative_instance_id: String,
    pub creative_set_id: String,
    pub campaign_id: String,
}

impl AdHistory {
    pub fn new(uuid: impl Into<String>, ad_action: ConfirmationType) -> Self {
        Self {
            timestamp: Utc::now(),
            uuid: uuid.into(),
            ad_action,
            ..Default::default()
        }
    }

    /// Build the record for an interaction with a delivered ad.
    pub fn from_ad(
        ad: &PublisherAdInfo,
        ad_action: ConfirmationType,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            timestamp,
            uuid: ad.uuid.clone(),
            ad_action,
            creative_instance_id: ad.creative_instance_id.clone(),
            creative_set_id: ad.creative_set_id.clone(),
            campaign_id: ad.campaign_id.clone(),
        }
    }

    /// Build a record from a raw persisted ordinal, rejecting unknown values.
    pub fn from_raw(
        uuid: impl Into<String>,
        ad_action: u8,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, ConfirmationTypeError> {
        Ok(Self {
            timestamp,
            uuid: uuid.into(),
            ad_action: ConfirmationType::try_from(ad_action)?,
            ..Default::default()
        })
    }
}

impl JsonCodec for AdHistory {
    fn to_json(&self) -> String {
        json!({
            "timestamp": self.timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            "uuid": self.uuid,
            "adAction": self.ad_action.as_str(),
            "creativeInstanceId": self.creative_instance_id,
            "creativeSetId": self.creative_set_id,
            "campaignId": self.campaign_id,
        })
        .to_string()
    }

    fn from_json(json: &str) -> Result<Self, DecodeError> {
        decode_object(json)
    }
}
