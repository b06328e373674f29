//! HTTP client for the call-tracking provider.
//!
//! The provider sits behind a trait so the resolution engine can be driven
//! by a canned double in tests.

use crate::types::{Campaign, CampaignDetails, CampaignsResponse};
use async_trait::async_trait;
use serde::Deserialize;
use shared::cache::{CAMPAIGN_DETAILS_TTL, CAMPAIGNS_TTL, ResponseCache};
use shared::http::{HttpError, cached_get_json};
use std::sync::Arc;
use url::Url;

#[derive(thiserror::Error, Debug)]
pub enum ProviderError {
    #[error("provider request failed: {0}")]
    Http(#[from] HttpError),
    #[error("could not decode provider response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid provider base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

#[async_trait]
pub trait CampaignProvider: Send + Sync {
    async fn list_campaigns(&self) -> Result<Vec<Campaign>, ProviderError>;
    async fn campaign_details(&self, campaign_id: &str) -> Result<CampaignDetails, ProviderError>;
}

fn default_base_url() -> String {
    "https://api.ringba.com".to_string()
}

/// Provider section of the console configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub account_id: String,
    /// Static token, sent with the provider's `Token` scheme. Distinct from
    /// the internal bearer token.
    pub api_token: String,
}

pub struct RingbaClient {
    http: reqwest::Client,
    base_url: String,
    account_id: String,
    api_token: String,
    cache: Arc<ResponseCache>,
}

impl RingbaClient {
    pub fn new(config: &ProviderConfig, cache: Arc<ResponseCache>) -> Result<Self, ProviderError> {
        Url::parse(&config.base_url)?;
        Ok(RingbaClient {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            account_id: config.account_id.clone(),
            api_token: config.api_token.clone(),
            cache,
        })
    }

    fn authorized_get(&self, url: &str) -> reqwest::RequestBuilder {
        self.http
            .get(url)
            .header("Authorization", format!("Token {}", self.api_token))
    }
}

#[async_trait]
impl CampaignProvider for RingbaClient {
    async fn list_campaigns(&self) -> Result<Vec<Campaign>, ProviderError> {
        let url = format!(
            "{}/v2/{}/campaigns/ui?includestats=true&includeDI=true&includeRTB=true",
            self.base_url, self.account_id
        );
        let payload = cached_get_json(&self.cache, self.authorized_get(&url), &url, CAMPAIGNS_TTL).await?;
        let response: CampaignsResponse = serde_json::from_value((*payload).clone())?;
        Ok(response.campaigns)
    }

    async fn campaign_details(&self, campaign_id: &str) -> Result<CampaignDetails, ProviderError> {
        let url = format!("{}/v2/{}/campaigns/{campaign_id}", self.base_url, self.account_id);
        let payload =
            cached_get_json(&self.cache, self.authorized_get(&url), &url, CAMPAIGN_DETAILS_TTL).await?;
        Ok(serde_json::from_value((*payload).clone())?)
    }
}
