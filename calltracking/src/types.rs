//! Wire types of the call-tracking provider API.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CampaignsResponse {
    #[serde(default)]
    pub campaigns: Vec<Campaign>,
}

/// Campaign details payload. Only the tag map matters to us: each entry is
/// one media buyer's tracking setup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CampaignDetails {
    #[serde(default, rename = "jsTags")]
    pub js_tags: HashMap<String, JsTag>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JsTag {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "campaignId")]
    pub campaign_id: String,
    #[serde(default, rename = "previousNumber")]
    pub previous_number: Option<PreviousNumber>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PreviousNumber {
    #[serde(default, rename = "e164Number")]
    pub e164_number: String,
}

/// One assignable buyer, derived per campaign selection and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaBuyer {
    pub name: String,
    #[serde(rename = "campaignId")]
    pub campaign_id: String,
    #[serde(rename = "e164Number")]
    pub e164_number: String,
}

/// A campaign-level routing pair; buyer-level values override these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutingDetails {
    pub ringba_id: &'static str,
    pub phone_number: &'static str,
}
