//! Catalog data model: campaigns, their creative sets, and everything a
//! creative set owns (targeting, creatives, conversion rules).
//!
//! A `Catalog` is an immutable snapshot. It is built once from a downloaded
//! payload, validated, and then only read. Nested lists are owned inline.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::codec::decode_object;
use crate::config::CatalogConfig;
use crate::error::CatalogError;

/// Creative type code for notification ads.
pub const NOTIFICATION_CREATIVE_CODE: &str = "notification_all_v1";
/// Creative type code for publisher ads.
pub const PUBLISHER_AD_CREATIVE_CODE: &str = "publisher_ad_all_v1";

// ─── Model ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSegment {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogOs {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogGeoTarget {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogCreativeType {
    pub code: String,
    pub name: String,
    pub platform: String,
    pub version: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub title: String,
    pub body: String,
    pub target_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublisherAdPayload {
    pub size: String,
    pub creative_url: String,
    pub target_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogNotificationCreative {
    pub creative_instance_id: String,
    pub creative_type: CatalogCreativeType,
    pub payload: NotificationPayload,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogPublisherAdCreative {
    pub creative_instance_id: String,
    pub creative_type: CatalogCreativeType,
    pub payload: PublisherAdPayload,
}

/// A conversion-tracking rule owned by a creative set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdConversion {
    pub creative_set_id: String,
    pub conversion_type: String,
    pub url_pattern: String,
    /// Observation window in days.
    pub observation_window: u32,
}

/// One campaign variant: caps, targeting and renderable creatives.
///
/// A set with `per_day == 0` or `total_max == 0` is never deliverable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreativeSet {
    pub id: String,
    pub per_day: u32,
    pub total_max: u32,
    pub segments: Vec<CatalogSegment>,
    pub oses: Vec<CatalogOs>,
    pub notification_creatives: Vec<CatalogNotificationCreative>,
    pub publisher_ad_creatives: Vec<CatalogPublisherAdCreative>,
    pub conversions: Vec<AdConversion>,
}

impl CreativeSet {
    pub fn is_deliverable(&self) -> bool {
        self.per_day > 0 && self.total_max > 0
    }

    pub fn targets_segment(&self, code: &str) -> bool {
        self.segments.iter().any(|s| s.code == code)
    }

    /// An empty OS list means every OS is eligible.
    pub fn targets_os(&self, code: &str) -> bool {
        self.oses.is_empty() || self.oses.iter().any(|os| os.code == code)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogCampaign {
    pub campaign_id: String,
    pub priority: u32,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub daily_cap: u32,
    pub advertiser_id: String,
    pub geo_targets: Vec<CatalogGeoTarget>,
    pub creative_sets: Vec<CreativeSet>,
}

impl CatalogCampaign {
    /// Whether `now` falls inside the campaign's flight dates. Missing bounds
    /// are open.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        let started = self.start_at.map_or(true, |start| start <= now);
        let ended = self.end_at.map_or(false, |end| now > end);
        started && !ended
    }
}

/// A validated, immutable catalog snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Catalog {
    catalog_id: String,
    version: u32,
    ping: u64,
    campaigns: Vec<CatalogCampaign>,
}

impl Catalog {
    /// Assemble a snapshot, enforcing structural invariants: non-empty ids,
    /// unique creative set ids, ordered flight dates. Conversion rules are
    /// stamped with the id of the set that owns them.
    pub fn new(
        catalog_id: impl Into<String>,
        version: u32,
        ping: u64,
        mut campaigns: Vec<CatalogCampaign>,
    ) -> Result<Self, CatalogError> {
        let catalog_id = catalog_id.into();
        if catalog_id.is_empty() {
            return Err(CatalogError::MissingId("catalog id"));
        }

        let mut seen = HashSet::new();
        for campaign in &mut campaigns {
            if campaign.campaign_id.is_empty() {
                return Err(CatalogError::MissingId("campaign id"));
            }
            if let (Some(start), Some(end)) = (campaign.start_at, campaign.end_at) {
                if end < start {
                    return Err(CatalogError::InvalidDateRange(campaign.campaign_id.clone()));
                }
            }
            for set in &mut campaign.creative_sets {
                if set.id.is_empty() {
                    return Err(CatalogError::MissingId("creative set id"));
                }
                if !seen.insert(set.id.clone()) {
                    return Err(CatalogError::DuplicateCreativeSet(set.id.clone()));
                }
                for conversion in &mut set.conversions {
                    conversion.creative_set_id = set.id.clone();
                }
            }
        }

        Ok(Self {
            catalog_id,
            version,
            ping,
            campaigns,
        })
    }

    /// Parse and validate a catalog payload using the default configuration.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Self::from_json_with(json, &CatalogConfig::default())
    }

    pub fn from_json_with(json: &str, config: &CatalogConfig) -> Result<Self, CatalogError> {
        let payload: wire::Catalog = decode_object(json)?;
        if payload.version != config.supported_version {
            return Err(CatalogError::UnsupportedVersion {
                found: payload.version,
                expected: config.supported_version,
            });
        }

        let campaigns = payload
            .campaigns
            .into_iter()
            .map(wire::Campaign::into_model)
            .collect();
        let catalog = Self::new(payload.catalog_id, payload.version, payload.ping, campaigns)?;

        debug!(
            catalog_id = %catalog.catalog_id,
            campaigns = catalog.campaigns.len(),
            creative_sets = catalog.creative_sets().count(),
            "catalog parsed"
        );
        Ok(catalog)
    }

    pub fn catalog_id(&self) -> &str {
        &self.catalog_id
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// Refresh interval requested by the catalog server, in seconds.
    pub fn ping(&self) -> u64 {
        self.ping
    }

    pub fn campaigns(&self) -> &[CatalogCampaign] {
        &self.campaigns
    }

    /// All creative sets across campaigns, in catalog order.
    pub fn creative_sets(&self) -> impl Iterator<Item = &CreativeSet> {
        self.campaigns.iter().flat_map(|c| c.creative_sets.iter())
    }

    pub fn creative_set(&self, id: &str) -> Option<&CreativeSet> {
        self.creative_sets().find(|set| set.id == id)
    }

    /// The campaign owning the creative set `id`.
    pub fn campaign_for_creative_set(&self, id: &str) -> Option<&CatalogCampaign> {
        self.campaigns
            .iter()
            .find(|c| c.creative_sets.iter().any(|set| set.id == id))
    }

    /// Every conversion rule, flattened in catalog order.
    pub fn conversions(&self) -> Vec<AdConversion> {
        self.creative_sets()
            .flat_map(|set| set.conversions.iter().cloned())
            .collect()
    }
}

// ─── Wire format ────────────────────────────────────────────────────────

mod wire {
    use super::*;

    #[derive(Debug, Default, Deserialize)]
    #[serde(default, rename_all = "camelCase")]
    pub struct Catalog {
        pub catalog_id: String,
        pub version: u32,
        pub ping: u64,
        pub campaigns: Vec<Campaign>,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(default, rename_all = "camelCase")]
    pub struct Campaign {
        pub campaign_id: String,
        pub priority: u32,
        pub start_at: Option<DateTime<Utc>>,
        pub end_at: Option<DateTime<Utc>>,
        pub daily_cap: u32,
        pub advertiser_id: String,
        pub geo_targets: Vec<CodeName>,
        pub creative_sets: Vec<CreativeSet>,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    pub struct CodeName {
        pub code: String,
        pub name: String,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(default, rename_all = "camelCase")]
    pub struct CreativeSet {
        pub creative_set_id: String,
        pub per_day: u32,
        pub total_max: u32,
        pub segments: Vec<CodeName>,
        pub oses: Vec<CodeName>,
        pub conversions: Vec<Conversion>,
        pub creatives: Vec<Creative>,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(default, rename_all = "camelCase")]
    pub struct Conversion {
        #[serde(rename = "type")]
        pub conversion_type: String,
        pub url_pattern: String,
        pub observation_window: u32,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(default, rename_all = "camelCase")]
    pub struct Creative {
        pub creative_instance_id: String,
        #[serde(rename = "type")]
        pub creative_type: CreativeType,
        pub payload: Payload,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    pub struct CreativeType {
        pub code: String,
        pub name: String,
        pub platform: String,
        pub version: u32,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(default, rename_all = "camelCase")]
    pub struct Payload {
        pub title: String,
        pub body: String,
        pub target_url: String,
        pub creative_url: String,
        pub size: String,
    }

    impl Campaign {
        pub fn into_model(self) -> CatalogCampaign {
            CatalogCampaign {
                campaign_id: self.campaign_id,
                priority: self.priority,
                start_at: self.start_at,
                end_at: self.end_at,
                daily_cap: self.daily_cap,
                advertiser_id: self.advertiser_id,
                geo_targets: self
                    .geo_targets
                    .into_iter()
                    .map(|g| CatalogGeoTarget {
                        code: g.code,
                        name: g.name,
                    })
                    .collect(),
                creative_sets: self
                    .creative_sets
                    .into_iter()
                    .map(CreativeSet::into_model)
                    .collect(),
            }
        }
    }

    impl CreativeSet {
        fn into_model(self) -> super::CreativeSet {
            let mut set = super::CreativeSet {
                id: self.creative_set_id,
                per_day: self.per_day,
                total_max: self.total_max,
                segments: self
                    .segments
                    .into_iter()
                    .map(|s| CatalogSegment {
                        code: s.code,
                        name: s.name,
                    })
                    .collect(),
                oses: self
                    .oses
                    .into_iter()
                    .map(|os| CatalogOs {
                        code: os.code,
                        name: os.name,
                    })
                    .collect(),
                conversions: self
                    .conversions
                    .into_iter()
                    .map(|c| AdConversion {
                        creative_set_id: String::new(),
                        conversion_type: c.conversion_type,
                        url_pattern: c.url_pattern,
                        observation_window: c.observation_window,
                    })
                    .collect(),
                ..Default::default()
            };

            for creative in self.creatives {
                let creative_type = CatalogCreativeType {
                    code: creative.creative_type.code,
                    name: creative.creative_type.name,
                    platform: creative.creative_type.platform,
                    version: creative.creative_type.version,
                };
                match creative_type.code.as_str() {
                    NOTIFICATION_CREATIVE_CODE => {
                        set.notification_creatives.push(CatalogNotificationCreative {
                            creative_instance_id: creative.creative_instance_id,
                            creative_type,
                            payload: NotificationPayload {
                                title: creative.payload.title,
                                body: creative.payload.body,
                                target_url: creative.payload.target_url,
                            },
                        })
                    }
                    PUBLISHER_AD_CREATIVE_CODE => {
                        set.publisher_ad_creatives.push(CatalogPublisherAdCreative {
                            creative_instance_id: creative.creative_instance_id,
                            creative_type,
                            payload: PublisherAdPayload {
                                size: creative.payload.size,
                                creative_url: creative.payload.creative_url,
                                target_url: creative.payload.target_url,
                            },
                        })
                    }
                    code => {
                        warn!(
                            code,
                            creative_set_id = %set.id,
                            creative_instance_id = %creative.creative_instance_id,
                            "skipping creative with unknown type"
                        );
                    }
                }
            }

            set
        }
    }
}
