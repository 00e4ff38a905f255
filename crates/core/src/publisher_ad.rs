use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::codec::{decode_object, JsonCodec};
use crate::error::DecodeError;

/// A single renderable ad as delivered to a publisher slot.
///
/// Two instances with the same `uuid` denote the same delivered impression.
/// Presentation fields are `None` when the producer did not provide them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PublisherAdInfo {
    pub uuid: String,
    pub creative_instance_id: String,
    pub creative_set_id: String,
    pub campaign_id: String,
    pub category: Option<String>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub creative_url: Option<String>,
    pub size: Option<String>,
    pub target_url: Option<String>,
    pub geo_target: Option<String>,
}

impl PublisherAdInfo {
    /// Whether `other` refers to the same delivered impression.
    pub fn same_impression(&self, other: &PublisherAdInfo) -> bool {
        !self.uuid.is_empty() && self.uuid == other.uuid
    }
}

impl JsonCodec for PublisherAdInfo {
    fn to_json(&self) -> String {
        json!({
            "uuid": self.uuid,
            "creativeInstanceId": self.creative_instance_id,
            "creativeSetId": self.creative_set_id,
            "campaignId": self.campaign_id,
            "category": self.category,
            "title": self.title,
            "body": self.body,
            "creativeUrl": self.creative_url,
            "size": self.size,
            "targetUrl": self.target_url,
            "geoTarget": self.geo_target,
        })
        .to_string()
    }

    fn from_json(json: &str) -> Result<Self, DecodeError> {
        decode_object(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn sample_ad() -> PublisherAdInfo {
        PublisherAdInfo {
            uuid: "9a11b60f-e29d-4446-8d1f-318311e36e0a".to_string(),
            creative_instance_id: "c7a368b4-2dce-4bb7-a4fb-cbe0b9b7f1a0".to_string(),
            creative_set_id: "ab9deba5-01df-4bea-8e2e-8e2ae8d57cdf".to_string(),
            campaign_id: "f9a8bb4c-3c81-4c23-b9ad-1e0d1d1d7f2b".to_string(),
            category: Some("Technology & Computing".to_string()),
            title: Some("Faster browsing".to_string()),
            body: Some("Try it today".to_string()),
            creative_url: Some("https://cdn.example.com/creative.png".to_string()),
            size: Some("300x250".to_string()),
            target_url: Some("https://example.com/landing".to_string()),
            geo_target: Some("US".to_string()),
        }
    }

    #[test]
    fn test_round_trip_populated() {
        let ad = sample_ad();
        let decoded = PublisherAdInfo::from_json(&ad.to_json()).unwrap();
        assert_eq!(decoded, ad);
    }

    #[test]
    fn test_round_trip_all_defaults() {
        let ad = PublisherAdInfo::default();
        let decoded = PublisherAdInfo::from_json(&ad.to_json()).unwrap();
        assert_eq!(decoded, ad);
    }

    #[test]
    fn test_round_trip_empty_strings_stay_provided() {
        let ad = PublisherAdInfo {
            title: Some(String::new()),
            ..Default::default()
        };
        let decoded = PublisherAdInfo::from_json(&ad.to_json()).unwrap();
        assert_eq!(decoded.title, Some(String::new()));
        assert_eq!(decoded.body, None);
    }

    #[test]
    fn test_encode_emits_every_field_with_external_names() {
        let value: Value = serde_json::from_str(&PublisherAdInfo::default().to_json()).unwrap();
        let object = value.as_object().unwrap();
        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        keys.sort();
        assert_eq!(
            keys,
            vec![
                "body",
                "campaignId",
                "category",
                "creativeInstanceId",
                "creativeSetId",
                "creativeUrl",
                "geoTarget",
                "size",
                "targetUrl",
                "title",
                "uuid",
            ]
        );
    }

    #[test]
    fn test_encode_matches_serde_mapping() {
        let ad = sample_ad();
        let manual: Value = serde_json::from_str(&ad.to_json()).unwrap();
        assert_eq!(manual, serde_json::to_value(&ad).unwrap());
    }

    #[test]
    fn test_decode_partial_leaves_defaults() {
        let ad = PublisherAdInfo::from_json(
            r#"{"uuid":"u-1","creativeInstanceId":"ci-1","title":"Hello"}"#,
        )
        .unwrap();
        assert_eq!(ad.uuid, "u-1");
        assert_eq!(ad.creative_instance_id, "ci-1");
        assert_eq!(ad.title.as_deref(), Some("Hello"));
        assert!(ad.creative_set_id.is_empty());
        assert_eq!(ad.geo_target, None);
    }

    #[test]
    fn test_decode_ignores_internal_names() {
        let ad = PublisherAdInfo::from_json(r#"{"creative_instance_id":"ci-1"}"#).unwrap();
        assert!(ad.creative_instance_id.is_empty());
    }

    #[test]
    fn test_decode_malformed_is_parse_failure() {
        let err = PublisherAdInfo::from_json("{\"uuid\": \"u-1\"").unwrap_err();
        assert!(matches!(err, DecodeError::ParseFailure(_)));
    }

    #[test]
    fn test_decode_wrong_shape_rejects_record() {
        let err = PublisherAdInfo::from_json(r#"{"uuid":"u-1","title":42}"#).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidField { .. }));

        let err = PublisherAdInfo::from_json(r#"{"uuid":null}"#).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidField { .. }));
    }

    #[test]
    fn test_same_impression() {
        let a = sample_ad();
        let mut b = PublisherAdInfo::default();
        assert!(!a.same_impression(&b));
        b.uuid = a.uuid.clone();
        assert!(a.same_impression(&b));
        assert!(!PublisherAdInfo::default().same_impression(&PublisherAdInfo::default()));
    }
}
