//! Final submission: re-validate the whole flow and assemble the
//! create-route request.

use crate::errors::WizardError;
use crate::machine::{Step, WizardState};
use calltracking::catalog;
use registry::session::Session;
use registry::types::{CreateRouteRequest, Domain, Role};
use shared::{sanitize, validate};

/// Build the `POST /route` body from a completed wizard.
///
/// Every step is re-validated, not just the last one: back-navigation lets
/// steps be revisited out of order, and an organization change can leave a
/// previously valid selection stale. The effective RT id is the selected
/// domain's own id when it carries one, else the manually entered value. The
/// Elite Medicare template substitution happens here, immediately before
/// dispatch.
pub fn compose_request(
    state: &WizardState,
    domains: &[Domain],
    session: &Session,
) -> Result<CreateRouteRequest, WizardError> {
    let user = &session.user;
    for step in Step::ALL {
        state.validate_step(*step, Some(user))?;
    }

    let selected = domains.iter().find(|d| d.domain == state.domain);

    // A media buyer can type any domain into step 3; the assignment check
    // happens here where the record is at hand.
    if user.role == Role::MediaBuyer
        && let Some(domain) = selected
        && domain.assigned_to != user.email
    {
        return Err(WizardError::DomainNotAssigned(domain.domain.clone()));
    }

    let organization = state.organization.ok_or(WizardError::MissingOrganization)?;
    let vertical = state.vertical.ok_or(WizardError::MissingVertical)?;

    let domain_value = sanitize::domain(&state.domain);
    if !validate::is_required(&domain_value) || !validate::is_valid_domain(&domain_value) {
        return Err(WizardError::InvalidDomain(state.domain.clone()));
    }

    let template = state.template.clone().unwrap_or_default();
    let template = sanitize::text(&template);
    let template = catalog::submit_template(&template, organization, vertical).to_string();

    // Domain-level RT id wins; the form value only applies when the domain
    // record has none.
    let domain_rtk = selected.map(|d| d.rtk_id.trim()).unwrap_or_default();
    let effective_rtk = if domain_rtk.is_empty() {
        state.rtk_id.trim()
    } else {
        domain_rtk
    };
    if effective_rtk.is_empty() {
        return Err(WizardError::MissingRtkId);
    }

    let created_by = sanitize::email(&user.email);
    if created_by.is_empty() {
        return Err(WizardError::NotAuthenticated);
    }

    let request = CreateRouteRequest {
        // Trim only; the backend expects the organization casing as-is.
        organization: organization.as_str().trim().to_string(),
        domain: domain_value,
        route: sanitize::route(&state.route),
        template,
        platform: sanitize::text(&state.platform),
        rtk_id: sanitize::id(effective_rtk),
        ringba_id: sanitize::id(&state.ringba_id),
        phone_number: sanitize::phone(&state.phone_number),
        created_by,
    };

    if !validate::is_required(&request.route) {
        return Err(WizardError::MissingRoute);
    }
    if !validate::is_required(&request.template) {
        return Err(WizardError::MissingTemplate);
    }
    if !validate::is_required(&request.platform) {
        return Err(WizardError::InvalidField("platform"));
    }

    Ok(request)
}
