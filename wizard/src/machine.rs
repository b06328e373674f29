//! The 4-step landing-page creation flow.
//!
//! Strictly linear: `next` advances only when the active step validates,
//! `prev` always succeeds and never re-validates. Resetting an upstream
//! selection cascades through everything downstream of it.

use crate::errors::WizardError;
use calltracking::buyers::ELITE_DETAILS;
use calltracking::catalog::{self, Organization, Vertical};
use calltracking::resolve::Resolution;
use calltracking::types::{Campaign, MediaBuyer};
use registry::types::{Domain, Role, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Step {
    #[default]
    Organization,
    VerticalCampaign,
    Domain,
    Details,
}

impl Step {
    pub const ALL: &'static [Step] = &[
        Step::Organization,
        Step::VerticalCampaign,
        Step::Domain,
        Step::Details,
    ];

    pub const fn title(self) -> &'static str {
        match self {
            Step::Organization => "Organization",
            Step::VerticalCampaign => "Vertical & Campaign",
            Step::Domain => "Domain",
            Step::Details => "Details",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct WizardState {
    step: Step,
    pub organization: Option<Organization>,
    pub vertical: Option<Vertical>,
    pub campaign: Option<Campaign>,
    pub media_buyer: Option<MediaBuyer>,
    pub domain: String,
    pub route: String,
    pub template: Option<String>,
    pub rtk_id: String,
    pub platform: String,
    pub ringba_id: String,
    pub phone_number: String,
    // RT id carried by the selected domain, when it is a known one. A
    // non-empty value here suppresses the manual RT id field.
    domain_rtk_id: String,
    // Bumped on every selection change that invalidates in-flight campaign
    // lookups; stale resolutions are dropped in `apply_resolution`.
    generation: u64,
}

impl WizardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn step(&self) -> Step {
        self.step
    }

    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Non-empty when the selected domain carries its own RT id; the manual
    /// field is hidden in that case.
    pub fn domain_rtk_id(&self) -> &str {
        &self.domain_rtk_id
    }

    pub fn requires_manual_rtk_id(&self) -> bool {
        self.domain_rtk_id.is_empty()
    }

    /// Selecting an organization invalidates every downstream choice:
    /// vertical, campaign, media buyer, domain and template all reset
    /// together. Leaving any of them stale is a correctness bug.
    pub fn set_organization(&mut self, organization: Organization) {
        self.organization = Some(organization);
        self.vertical = None;
        self.campaign = None;
        self.media_buyer = None;
        self.domain.clear();
        self.domain_rtk_id.clear();
        self.template = None;
        self.generation += 1;

        match organization {
            Organization::Elite => {
                self.ringba_id = ELITE_DETAILS.ringba_id.to_string();
                self.phone_number = ELITE_DETAILS.phone_number.to_string();
            }
            Organization::ParagonMedia => {
                self.ringba_id.clear();
                self.phone_number.clear();
            }
        }
    }

    pub fn set_vertical(&mut self, vertical: Vertical) -> Result<(), WizardError> {
        let Some(organization) = self.organization else {
            return Err(WizardError::MissingOrganization);
        };
        if !catalog::verticals_for(organization).contains(&vertical) {
            return Err(WizardError::VerticalUnavailable {
                organization: organization.as_str(),
                vertical: vertical.as_str(),
            });
        }
        self.vertical = Some(vertical);
        self.campaign = None;
        self.media_buyer = None;
        self.domain.clear();
        self.domain_rtk_id.clear();
        self.template = None;
        self.generation += 1;
        Ok(())
    }

    pub fn set_campaign(&mut self, campaign: Campaign) {
        self.campaign = Some(campaign);
        self.media_buyer = None;
        self.generation += 1;
    }

    /// Explicit buyer selection. The buyer's own values override the
    /// campaign-level defaults, except under Elite where the routing pair
    /// stays pinned.
    pub fn select_media_buyer(&mut self, buyer: MediaBuyer) {
        if self.organization != Some(Organization::Elite) {
            self.ringba_id = buyer.campaign_id.clone();
            self.phone_number = buyer.e164_number.clone();
        }
        self.media_buyer = Some(buyer);
    }

    /// Apply an asynchronously resolved campaign lookup. Returns false and
    /// changes nothing when the selections moved on while the lookup was in
    /// flight.
    pub fn apply_resolution(&mut self, generation: u64, resolution: &Resolution) -> bool {
        if generation != self.generation {
            tracing::warn!(
                stale = generation,
                current = self.generation,
                "dropping stale campaign resolution"
            );
            return false;
        }
        if !resolution.ringba_id.is_empty() {
            self.ringba_id = resolution.ringba_id.clone();
        }
        if !resolution.phone_number.is_empty() {
            self.phone_number = resolution.phone_number.clone();
        }
        true
    }

    /// Free text is tolerated; a value matching a known domain additionally
    /// pulls in that domain's RT id and platform.
    pub fn set_domain(&mut self, value: &str, known_domains: &[Domain]) {
        self.domain = value.to_string();
        let matched = known_domains.iter().find(|d| d.domain == value);
        match matched {
            Some(domain) if domain.has_rtk_id() => {
                self.domain_rtk_id = domain.rtk_id.trim().to_string();
            }
            _ => self.domain_rtk_id.clear(),
        }
        if let Some(domain) = matched
            && !domain.platform.is_empty()
        {
            self.platform = domain.platform.clone();
        }
    }

    pub fn validate_step(&self, step: Step, user: Option<&User>) -> Result<(), WizardError> {
        match step {
            Step::Organization => {
                if self.organization.is_none() {
                    return Err(WizardError::MissingOrganization);
                }
            }
            Step::VerticalCampaign => {
                if self.vertical.is_none() {
                    return Err(WizardError::MissingVertical);
                }
                if self.campaign.is_none() {
                    return Err(WizardError::MissingCampaign);
                }
                // mediaBuyer-role users are auto-matched by the resolution
                // engine; everyone else must pick a buyer explicitly.
                let auto_selected = user.is_some_and(|u| u.role == Role::MediaBuyer);
                if !auto_selected && self.media_buyer.is_none() {
                    return Err(WizardError::MissingMediaBuyer);
                }
            }
            Step::Domain => {
                if self.domain.trim().is_empty() {
                    return Err(WizardError::MissingDomain);
                }
            }
            Step::Details => {
                if self.route.trim().is_empty() {
                    return Err(WizardError::MissingRoute);
                }
                if self.template.as_deref().is_none_or(|t| t.trim().is_empty()) {
                    return Err(WizardError::MissingTemplate);
                }
                if self.requires_manual_rtk_id() && self.rtk_id.trim().is_empty() {
                    return Err(WizardError::MissingRtkId);
                }
            }
        }
        Ok(())
    }

    /// Advance only when the active step validates.
    pub fn next(&mut self, user: Option<&User>) -> Result<Step, WizardError> {
        self.validate_step(self.step, user)?;
        self.step = match self.step {
            Step::Organization => Step::VerticalCampaign,
            Step::VerticalCampaign => Step::Domain,
            Step::Domain | Step::Details => Step::Details,
        };
        Ok(self.step)
    }

    /// Going back never re-validates; on the first step it stays put.
    pub fn prev(&mut self) -> Step {
        self.step = match self.step {
            Step::Organization | Step::VerticalCampaign => Step::Organization,
            Step::Domain => Step::VerticalCampaign,
            Step::Details => Step::Domain,
        };
        self.step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> User {
        User {
            email: "someone@paragonmedia.io".into(),
            first_name: String::new(),
            last_name: String::new(),
            role,
        }
    }

    fn campaign() -> Campaign {
        Campaign {
            id: "med-1".into(),
            name: "Paragon - Medicare".into(),
        }
    }

    fn buyer() -> MediaBuyer {
        MediaBuyer {
            name: "Jake Hunter".into(),
            campaign_id: "CA-jake".into(),
            e164_number: "+18664982822".into(),
        }
    }

    fn filled_through_step_two() -> WizardState {
        let mut state = WizardState::new();
        state.set_organization(Organization::ParagonMedia);
        state.set_vertical(Vertical::MedicarePpc).unwrap();
        state.set_campaign(campaign());
        state.select_media_buyer(buyer());
        state
    }

    #[test]
    fn next_is_gated_by_the_active_step() {
        let admin = user(Role::Admin);
        let mut state = WizardState::new();

        assert_eq!(state.next(Some(&admin)), Err(WizardError::MissingOrganization));
        assert_eq!(state.step(), Step::Organization);

        state.set_organization(Organization::ParagonMedia);
        assert_eq!(state.next(Some(&admin)), Ok(Step::VerticalCampaign));

        assert_eq!(state.next(Some(&admin)), Err(WizardError::MissingVertical));
        state.set_vertical(Vertical::MedicarePpc).unwrap();
        assert_eq!(state.next(Some(&admin)), Err(WizardError::MissingCampaign));
        state.set_campaign(campaign());
        assert_eq!(state.next(Some(&admin)), Err(WizardError::MissingMediaBuyer));
        state.select_media_buyer(buyer());
        assert_eq!(state.next(Some(&admin)), Ok(Step::Domain));
    }

    #[test]
    fn media_buyer_role_skips_explicit_buyer_selection() {
        let viewer = user(Role::MediaBuyer);
        let mut state = WizardState::new();
        state.set_organization(Organization::ParagonMedia);
        state.next(Some(&viewer)).unwrap();
        state.set_vertical(Vertical::MedicarePpc).unwrap();
        state.set_campaign(campaign());
        assert_eq!(state.next(Some(&viewer)), Ok(Step::Domain));
    }

    #[test]
    fn prev_always_succeeds_and_stays_on_step_one() {
        let mut state = filled_through_step_two();
        let admin = user(Role::Admin);
        state.next(Some(&admin)).unwrap();
        state.next(Some(&admin)).unwrap();
        state.next(Some(&admin)).unwrap_err(); // domain still empty
        assert_eq!(state.prev(), Step::VerticalCampaign);
        assert_eq!(state.prev(), Step::Organization);
        assert_eq!(state.prev(), Step::Organization);
    }

    #[test]
    fn organization_change_clears_all_five_downstream_selections() {
        let mut state = filled_through_step_two();
        state.set_domain("example.com", &[]);
        state.template = Some("cb-groc".into());

        state.set_organization(Organization::Elite);

        assert_eq!(state.vertical, None);
        assert_eq!(state.campaign, None);
        assert_eq!(state.media_buyer, None);
        assert!(state.domain.is_empty());
        assert_eq!(state.template, None);
        // Elite also pins the routing pair.
        assert_eq!(state.ringba_id, ELITE_DETAILS.ringba_id);
        assert_eq!(state.phone_number, ELITE_DETAILS.phone_number);
    }

    #[test]
    fn vertical_change_cascades_below_it() {
        let mut state = filled_through_step_two();
        state.set_domain("example.com", &[]);
        state.template = Some("cb-groc".into());

        state.set_vertical(Vertical::DebtPpc).unwrap();

        assert_eq!(state.campaign, None);
        assert_eq!(state.media_buyer, None);
        assert!(state.domain.is_empty());
        assert_eq!(state.template, None);
        // The organization itself survives.
        assert_eq!(state.organization, Some(Organization::ParagonMedia));
    }

    #[test]
    fn elite_rejects_non_medicare_verticals() {
        let mut state = WizardState::new();
        state.set_organization(Organization::Elite);
        assert!(matches!(
            state.set_vertical(Vertical::Sweeps),
            Err(WizardError::VerticalUnavailable { .. })
        ));
        state.set_vertical(Vertical::MedicarePpc).unwrap();
    }

    #[test]
    fn stale_resolution_is_dropped() {
        let mut state = filled_through_step_two();
        let generation = state.generation();

        let resolution = Resolution {
            ringba_id: "CA-old".into(),
            phone_number: "+1000".into(),
            media_buyers: Vec::new(),
        };
        // The organization changes while the lookup is in flight.
        state.set_organization(Organization::ParagonMedia);
        assert!(!state.apply_resolution(generation, &resolution));
        assert!(state.ringba_id.is_empty());

        // A current-generation resolution applies.
        let fresh = state.generation();
        assert!(state.apply_resolution(fresh, &resolution));
        assert_eq!(state.ringba_id, "CA-old");
    }

    #[test]
    fn elite_keeps_pinned_values_through_buyer_selection() {
        let mut state = WizardState::new();
        state.set_organization(Organization::Elite);
        state.set_vertical(Vertical::MedicarePpc).unwrap();
        state.set_campaign(campaign());
        state.select_media_buyer(buyer());

        assert_eq!(state.ringba_id, ELITE_DETAILS.ringba_id);
        assert_eq!(state.phone_number, ELITE_DETAILS.phone_number);
        assert!(state.media_buyer.is_some());
    }

    #[test]
    fn known_domain_supplies_rtk_id_and_platform() {
        let domains = vec![Domain {
            domain: "example.com".into(),
            rtk_id: "xyz".into(),
            platform: "Facebook".into(),
            ..Domain::default()
        }];
        let mut state = filled_through_step_two();

        state.set_domain("example.com", &domains);
        assert!(!state.requires_manual_rtk_id());
        assert_eq!(state.domain_rtk_id(), "xyz");
        assert_eq!(state.platform, "Facebook");

        // Free text that matches nothing keeps the manual field.
        state.set_domain("unknown.com", &domains);
        assert!(state.requires_manual_rtk_id());
    }

    #[test]
    fn details_step_requires_rtk_only_without_domain_level_id() {
        let domains = vec![Domain {
            domain: "example.com".into(),
            rtk_id: "xyz".into(),
            ..Domain::default()
        }];
        let mut state = filled_through_step_two();
        state.route = "promo".into();
        state.template = Some("cb-groc".into());

        state.set_domain("example.com", &domains);
        assert_eq!(state.validate_step(Step::Details, None), Ok(()));

        state.set_domain("fresh.com", &domains);
        assert_eq!(
            state.validate_step(Step::Details, None),
            Err(WizardError::MissingRtkId)
        );
        state.rtk_id = "abc123".into();
        assert_eq!(state.validate_step(Step::Details, None), Ok(()));
    }
}
