//! The campaign resolution engine: organization + vertical + campaign in,
//! routing metadata and assignable media buyers out.

use crate::buyers;
use crate::catalog::{
    self, ELITE_MEDICARE_LABEL, Organization, PARAGON_DEBT, PARAGON_MEDICARE,
    PARAGON_SPANISH_MEDICARE, Vertical,
};
use crate::client::CampaignProvider;
use crate::metrics_defs::{DETAILS_FALLBACK, PROVIDER_ERROR};
use crate::types::{Campaign, MediaBuyer};
use registry::types::{Role, User};
use shared::counter;
use std::sync::Arc;

/// The wizard's step-2 output.
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignSelection {
    pub organization: Organization,
    pub vertical: Vertical,
    pub campaign: Campaign,
}

/// What a selection resolves to. `ringba_id`/`phone_number` hold the
/// campaign-level defaults until a buyer overrides them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    pub ringba_id: String,
    pub phone_number: String,
    pub media_buyers: Vec<MediaBuyer>,
}

impl Resolution {
    /// Buyer-level values take precedence over the campaign-level defaults.
    pub fn apply_buyer(&mut self, buyer: &MediaBuyer) {
        self.ringba_id = buyer.campaign_id.clone();
        self.phone_number = buyer.e164_number.clone();
    }
}

/// Given the campaign list, the id to retry when the selected campaign's
/// details come back empty. Only the Spanish Medicare campaign has one: it
/// shares its media buyers with the base Medicare campaign.
pub fn fallback_campaign_id(campaigns: &[Campaign], selected_id: &str) -> Option<String> {
    let selected = campaigns.iter().find(|c| c.id == selected_id)?;
    if selected.name != PARAGON_SPANISH_MEDICARE {
        return None;
    }
    campaigns
        .iter()
        .find(|c| c.name == PARAGON_MEDICARE)
        .map(|c| c.id.clone())
}

pub struct ResolutionEngine {
    provider: Arc<dyn CampaignProvider>,
}

impl ResolutionEngine {
    pub fn new(provider: Arc<dyn CampaignProvider>) -> Self {
        ResolutionEngine { provider }
    }

    /// Campaigns offered for a vertical/organization pair.
    ///
    /// Provider-backed verticals filter the account's campaign list down to
    /// the canonical names; for Elite the Medicare campaign is relabeled for
    /// display while keeping its external id. Provider failures degrade to
    /// an empty list.
    pub async fn campaigns_for(&self, vertical: Vertical, organization: Organization) -> Vec<Campaign> {
        if !vertical.uses_provider() {
            return catalog::static_campaigns(vertical);
        }

        let campaigns = match self.provider.list_campaigns().await {
            Ok(campaigns) => campaigns,
            Err(err) => {
                counter!(PROVIDER_ERROR).increment(1);
                tracing::warn!(error = %err, "campaign list lookup failed");
                return Vec::new();
            }
        };

        match (vertical, organization) {
            (Vertical::MedicarePpc, Organization::Elite) => campaigns
                .into_iter()
                .filter(|c| c.name.eq_ignore_ascii_case(PARAGON_MEDICARE))
                .map(|c| Campaign {
                    id: c.id,
                    name: ELITE_MEDICARE_LABEL.to_string(),
                })
                .collect(),
            (Vertical::MedicarePpc, Organization::ParagonMedia) => campaigns
                .into_iter()
                .filter(|c| {
                    c.name.eq_ignore_ascii_case(PARAGON_MEDICARE)
                        || c.name.eq_ignore_ascii_case(PARAGON_SPANISH_MEDICARE)
                })
                .collect(),
            (Vertical::DebtPpc, _) => campaigns
                .into_iter()
                .filter(|c| c.name == PARAGON_DEBT)
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Media buyers for a campaign, retrying the fallback campaign exactly
    /// once when the primary lookup yields nothing. Errors degrade to an
    /// empty list; the caller treats that as manual entry required.
    pub async fn media_buyers_for(
        &self,
        campaign_id: &str,
        fallback_id: Option<&str>,
    ) -> Vec<MediaBuyer> {
        let primary = self.lookup_buyers(campaign_id).await;
        if !primary.is_empty() {
            return primary;
        }
        let Some(fallback_id) = fallback_id else {
            return primary;
        };
        counter!(DETAILS_FALLBACK).increment(1);
        tracing::warn!(campaign_id, fallback_id, "no media buyers on campaign, retrying fallback");
        self.lookup_buyers(fallback_id).await
    }

    async fn lookup_buyers(&self, campaign_id: &str) -> Vec<MediaBuyer> {
        match self.provider.campaign_details(campaign_id).await {
            Ok(details) => buyers::media_buyers_from(&details),
            Err(err) => {
                counter!(PROVIDER_ERROR).increment(1);
                tracing::warn!(campaign_id, error = %err, "campaign details lookup failed");
                Vec::new()
            }
        }
    }

    async fn buyers_with_fallback(&self, selection: &CampaignSelection) -> Vec<MediaBuyer> {
        // The fallback is derived from the campaign list by name, so the
        // Spanish Medicare selection keeps working even when the provider
        // re-creates the base campaign under a new id.
        let fallback = if selection.campaign.name == PARAGON_SPANISH_MEDICARE {
            self.provider
                .list_campaigns()
                .await
                .ok()
                .and_then(|campaigns| fallback_campaign_id(&campaigns, &selection.campaign.id))
        } else {
            None
        };
        self.media_buyers_for(&selection.campaign.id, fallback.as_deref()).await
    }

    /// Resolve a completed step-2 selection.
    ///
    /// Elite pins the routing pair to the Elite constant; privileged roles
    /// still get the buyer list for provider-backed verticals so they can
    /// attribute the route to a buyer. mediaBuyer-role users are
    /// auto-matched to their own buyer and never see anyone else's numbers.
    pub async fn resolve(&self, selection: &CampaignSelection, user: Option<&User>) -> Resolution {
        let role = user.map(|u| u.role);
        let privileged = role.is_some_and(Role::is_privileged);
        let mut resolution = Resolution::default();

        if selection.organization == Organization::Elite {
            resolution.ringba_id = buyers::ELITE_DETAILS.ringba_id.to_string();
            resolution.phone_number = buyers::ELITE_DETAILS.phone_number.to_string();
            if privileged {
                if selection.vertical.uses_provider() {
                    resolution.media_buyers = self.buyers_with_fallback(selection).await;
                } else {
                    resolution.media_buyers = buyers::roster_media_buyers();
                }
            }
            return resolution;
        }

        if selection.vertical.uses_provider() {
            resolution.media_buyers = self.buyers_with_fallback(selection).await;
        } else {
            resolution.media_buyers = buyers::roster_media_buyers();
        }

        if role == Some(Role::MediaBuyer)
            && let Some(user) = user
        {
            match buyers::match_media_buyer(&resolution.media_buyers, &user.first_name, &user.last_name) {
                Some(buyer) => {
                    let own = buyer.clone();
                    resolution.apply_buyer(&own);
                    resolution.media_buyers = vec![own];
                }
                None => {
                    tracing::warn!(
                        email = %user.email,
                        "no campaign buyer matched the logged-in media buyer"
                    );
                    resolution.media_buyers.clear();
                }
            }
        }

        resolution
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ProviderError;
    use crate::types::{CampaignDetails, JsTag, PreviousNumber};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct StaticProvider {
        campaigns: Vec<Campaign>,
        details: HashMap<String, CampaignDetails>,
        detail_calls: Mutex<Vec<String>>,
        fail_details: bool,
    }

    impl StaticProvider {
        fn new(campaigns: Vec<Campaign>, details: HashMap<String, CampaignDetails>) -> Self {
            StaticProvider {
                campaigns,
                details,
                detail_calls: Mutex::new(Vec::new()),
                fail_details: false,
            }
        }

        fn detail_calls(&self) -> Vec<String> {
            self.detail_calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CampaignProvider for StaticProvider {
        async fn list_campaigns(&self) -> Result<Vec<Campaign>, ProviderError> {
            Ok(self.campaigns.clone())
        }

        async fn campaign_details(&self, campaign_id: &str) -> Result<CampaignDetails, ProviderError> {
            self.detail_calls.lock().unwrap().push(campaign_id.to_string());
            if self.fail_details {
                return Err(ProviderError::Decode(serde::de::Error::custom("boom")));
            }
            Ok(self.details.get(campaign_id).cloned().unwrap_or_default())
        }
    }

    fn campaign(id: &str, name: &str) -> Campaign {
        Campaign { id: id.into(), name: name.into() }
    }

    fn details_with(name: &str, campaign_id: &str, number: &str) -> CampaignDetails {
        let mut js_tags = HashMap::new();
        js_tags.insert(
            "t1".to_string(),
            JsTag {
                name: name.into(),
                campaign_id: campaign_id.into(),
                previous_number: Some(PreviousNumber { e164_number: number.into() }),
            },
        );
        CampaignDetails { js_tags }
    }

    fn account_campaigns() -> Vec<Campaign> {
        vec![
            campaign("med-1", PARAGON_MEDICARE),
            campaign("med-es", PARAGON_SPANISH_MEDICARE),
            campaign("debt-1", PARAGON_DEBT),
            campaign("junk", "Something Else"),
        ]
    }

    fn user(email: &str, first: &str, last: &str, role: Role) -> User {
        User {
            email: email.into(),
            first_name: first.into(),
            last_name: last.into(),
            role,
        }
    }

    #[tokio::test]
    async fn paragon_medicare_offers_both_campaigns() {
        let engine = ResolutionEngine::new(Arc::new(StaticProvider::new(
            account_campaigns(),
            HashMap::new(),
        )));
        let campaigns = engine
            .campaigns_for(Vertical::MedicarePpc, Organization::ParagonMedia)
            .await;
        let names: Vec<&str> = campaigns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec![PARAGON_MEDICARE, PARAGON_SPANISH_MEDICARE]);
    }

    #[tokio::test]
    async fn elite_relabels_the_medicare_campaign_but_keeps_its_id() {
        let engine = ResolutionEngine::new(Arc::new(StaticProvider::new(
            account_campaigns(),
            HashMap::new(),
        )));
        let campaigns = engine
            .campaigns_for(Vertical::MedicarePpc, Organization::Elite)
            .await;
        assert_eq!(campaigns.len(), 1);
        assert_eq!(campaigns[0].name, ELITE_MEDICARE_LABEL);
        assert_eq!(campaigns[0].id, "med-1");
    }

    #[tokio::test]
    async fn debt_filters_to_the_debt_campaign() {
        let engine = ResolutionEngine::new(Arc::new(StaticProvider::new(
            account_campaigns(),
            HashMap::new(),
        )));
        let campaigns = engine
            .campaigns_for(Vertical::DebtPpc, Organization::ParagonMedia)
            .await;
        assert_eq!(campaigns.len(), 1);
        assert_eq!(campaigns[0].id, "debt-1");
    }

    #[tokio::test]
    async fn non_provider_verticals_use_the_static_lists() {
        let engine = ResolutionEngine::new(Arc::new(StaticProvider::new(Vec::new(), HashMap::new())));
        let campaigns = engine
            .campaigns_for(Vertical::Sweeps, Organization::ParagonMedia)
            .await;
        assert_eq!(campaigns.len(), 2);
    }

    #[tokio::test]
    async fn spanish_medicare_falls_back_exactly_once() {
        let mut details = HashMap::new();
        // Spanish campaign has no tags; base campaign carries the buyers.
        details.insert("med-es".to_string(), CampaignDetails::default());
        details.insert(
            "med-1".to_string(),
            details_with("Jake Hunter", "CA-jake", "+18664982822"),
        );
        let provider = Arc::new(StaticProvider::new(account_campaigns(), details));
        let engine = ResolutionEngine::new(provider.clone());

        let selection = CampaignSelection {
            organization: Organization::ParagonMedia,
            vertical: Vertical::MedicarePpc,
            campaign: campaign("med-es", PARAGON_SPANISH_MEDICARE),
        };
        let resolution = engine.resolve(&selection, None).await;

        assert_eq!(resolution.media_buyers.len(), 1);
        assert_eq!(resolution.media_buyers[0].name, "Jake Hunter");
        assert_eq!(provider.detail_calls(), vec!["med-es", "med-1"]);
    }

    #[tokio::test]
    async fn fallback_that_is_also_empty_gives_up() {
        let provider = Arc::new(StaticProvider::new(account_campaigns(), HashMap::new()));
        let engine = ResolutionEngine::new(provider.clone());

        let buyers = engine.media_buyers_for("med-es", Some("med-1")).await;
        assert!(buyers.is_empty());
        // Exactly one retry, never a loop.
        assert_eq!(provider.detail_calls(), vec!["med-es", "med-1"]);
    }

    #[tokio::test]
    async fn provider_failure_degrades_to_empty_buyers() {
        let mut provider = StaticProvider::new(account_campaigns(), HashMap::new());
        provider.fail_details = true;
        let engine = ResolutionEngine::new(Arc::new(provider));

        let selection = CampaignSelection {
            organization: Organization::ParagonMedia,
            vertical: Vertical::MedicarePpc,
            campaign: campaign("med-1", PARAGON_MEDICARE),
        };
        let resolution = engine.resolve(&selection, None).await;
        assert!(resolution.media_buyers.is_empty());
        assert!(resolution.ringba_id.is_empty());
    }

    #[tokio::test]
    async fn elite_pins_routing_details_without_lookup_for_media_buyers() {
        let provider = Arc::new(StaticProvider::new(account_campaigns(), HashMap::new()));
        let engine = ResolutionEngine::new(provider.clone());

        let selection = CampaignSelection {
            organization: Organization::Elite,
            vertical: Vertical::MedicarePpc,
            campaign: campaign("med-1", ELITE_MEDICARE_LABEL),
        };
        let viewer = user("jake@paragonmedia.io", "Jake", "Hunter", Role::MediaBuyer);
        let resolution = engine.resolve(&selection, Some(&viewer)).await;

        assert_eq!(resolution.ringba_id, buyers::ELITE_DETAILS.ringba_id);
        assert_eq!(resolution.phone_number, buyers::ELITE_DETAILS.phone_number);
        assert!(resolution.media_buyers.is_empty());
        assert!(provider.detail_calls().is_empty(), "no details lookup for elite media buyers");
    }

    #[tokio::test]
    async fn elite_still_lists_buyers_for_privileged_roles() {
        let mut details = HashMap::new();
        details.insert(
            "med-1".to_string(),
            details_with("Jake Hunter", "CA-jake", "+18664982822"),
        );
        let engine = ResolutionEngine::new(Arc::new(StaticProvider::new(account_campaigns(), details)));

        let selection = CampaignSelection {
            organization: Organization::Elite,
            vertical: Vertical::MedicarePpc,
            campaign: campaign("med-1", ELITE_MEDICARE_LABEL),
        };
        let admin = user("boss@paragonmedia.io", "Boss", "", Role::Admin);
        let resolution = engine.resolve(&selection, Some(&admin)).await;

        // Buyers are listed for attribution, the routing pair stays pinned.
        assert_eq!(resolution.media_buyers.len(), 1);
        assert_eq!(resolution.ringba_id, buyers::ELITE_DETAILS.ringba_id);
    }

    #[tokio::test]
    async fn media_buyer_is_auto_matched_and_sees_only_themselves() {
        let mut js_tags = HashMap::new();
        js_tags.insert(
            "t1".to_string(),
            JsTag {
                name: "Jake".into(),
                campaign_id: "CA-jake".into(),
                previous_number: Some(PreviousNumber { e164_number: "+18664982822".into() }),
            },
        );
        js_tags.insert(
            "t2".to_string(),
            JsTag {
                name: "Addy Jaloudi".into(),
                campaign_id: "CA-addy".into(),
                previous_number: Some(PreviousNumber { e164_number: "+18447840433".into() }),
            },
        );
        let mut details = HashMap::new();
        details.insert("med-1".to_string(), CampaignDetails { js_tags });
        let engine = ResolutionEngine::new(Arc::new(StaticProvider::new(account_campaigns(), details)));

        let selection = CampaignSelection {
            organization: Organization::ParagonMedia,
            vertical: Vertical::MedicarePpc,
            campaign: campaign("med-1", PARAGON_MEDICARE),
        };
        let viewer = user("jake@paragonmedia.io", "Jake", "Hunter", Role::MediaBuyer);
        let resolution = engine.resolve(&selection, Some(&viewer)).await;

        // The short provider name matched via the first-name tier; the
        // buyer's own values overrode the campaign defaults.
        assert_eq!(resolution.ringba_id, "CA-jake");
        assert_eq!(resolution.phone_number, "+18664982822");
        assert_eq!(resolution.media_buyers.len(), 1);
        assert_eq!(resolution.media_buyers[0].name, "Jake");
    }

    #[tokio::test]
    async fn fixed_roster_for_other_verticals_with_buyer_override() {
        let engine = ResolutionEngine::new(Arc::new(StaticProvider::new(Vec::new(), HashMap::new())));
        let selection = CampaignSelection {
            organization: Organization::ParagonMedia,
            vertical: Vertical::Sweeps,
            campaign: campaign("sweep", "$750 Walmart Gift Card"),
        };
        let admin = user("boss@paragonmedia.io", "Boss", "", Role::Admin);
        let mut resolution = engine.resolve(&selection, Some(&admin)).await;

        assert_eq!(resolution.media_buyers.len(), 3);
        let addy = resolution
            .media_buyers
            .iter()
            .find(|b| b.name == "Addy Jaloudi")
            .cloned()
            .unwrap();
        resolution.apply_buyer(&addy);
        assert_eq!(resolution.phone_number, "+18447840433");
    }

    #[test]
    fn fallback_id_only_for_spanish_medicare() {
        let campaigns = account_campaigns();
        assert_eq!(fallback_campaign_id(&campaigns, "med-es"), Some("med-1".to_string()));
        assert_eq!(fallback_campaign_id(&campaigns, "med-1"), None);
        assert_eq!(fallback_campaign_id(&campaigns, "unknown"), None);
    }
}
