//! Role- and identity-based visibility and edit rules.
//!
//! Everything here is a pure function over the domain set and the session
//! user. Results are never cached: role and identity change across sessions
//! and the computation is O(n) over the list.

use crate::types::{Domain, Role, User};

/// Accounts pinned to their own assigned domains regardless of role. This
/// composes with the role rules; both must pass.
pub const RESTRICTED_ACCOUNTS: &[&str] = &[
    "jake@paragonmedia.io",
    "addy@paragonmedia.io",
    "neil@paragonmedia.io",
];

fn passes_identity_filter(domain: &Domain, user: &User) -> bool {
    if RESTRICTED_ACCOUNTS.contains(&user.email.as_str()) {
        domain.assigned_to == user.email
    } else {
        true
    }
}

/// Visibility. An absent user context sees everything (mutation predicates
/// below stay closed for it).
pub fn can_see(domain: &Domain, user: Option<&User>) -> bool {
    let Some(user) = user else {
        return true;
    };
    if !passes_identity_filter(domain, user) {
        return false;
    }
    match user.role {
        Role::Ceo | Role::Tech | Role::Admin => true,
        Role::MediaBuyer | Role::Other => domain.assigned_to == user.email,
    }
}

/// Filter a domain list down to what the user may see. Input order is
/// preserved; the result is always a subset of the input.
pub fn visible_domains<'a>(domains: &'a [Domain], user: Option<&User>) -> Vec<&'a Domain> {
    domains.iter().filter(|domain| can_see(domain, user)).collect()
}

/// Full domain edit: organization, id, platform, certification tags,
/// assignment. Media buyers never get this, whatever the assignment.
pub fn can_edit(domain: &Domain, user: Option<&User>) -> bool {
    let Some(user) = user else {
        return false;
    };
    if !passes_identity_filter(domain, user) {
        return false;
    }
    match user.role {
        Role::Ceo | Role::Tech | Role::Admin => true,
        Role::MediaBuyer => false,
        Role::Other => domain.assigned_to == user.email,
    }
}

pub fn can_edit_routes(domain: &Domain, user: Option<&User>) -> bool {
    let Some(user) = user else {
        return false;
    };
    if !passes_identity_filter(domain, user) {
        return false;
    }
    match user.role {
        Role::Ceo | Role::Tech | Role::Admin => true,
        Role::MediaBuyer | Role::Other => domain.assigned_to == user.email,
    }
}

/// The one domain-level field a media buyer may change on an assigned
/// domain.
pub fn can_edit_rtk_id_only(domain: &Domain, user: Option<&User>) -> bool {
    match user {
        Some(user) => user.role == Role::MediaBuyer && domain.assigned_to == user.email,
        None => false,
    }
}

pub fn can_create_domains(user: Option<&User>) -> bool {
    matches!(user, Some(user) if user.role != Role::MediaBuyer)
}

pub fn can_delete_domains(user: Option<&User>) -> bool {
    matches!(user, Some(user) if user.role != Role::MediaBuyer)
}

/// Optional narrowing applied on top of visibility in the admin list view.
#[derive(Debug, Clone, Default)]
pub struct DomainFilters {
    pub organization: Option<String>,
    pub platform: Option<String>,
    pub assigned_to: Option<String>,
    pub search: Option<String>,
}

/// Search matches the domain name, the domain id, or any route's ringba id,
/// case-insensitively.
pub fn matches_search(domain: &Domain, term: &str) -> bool {
    let term = term.to_lowercase();
    if term.is_empty() {
        return true;
    }
    if domain.domain.to_lowercase().contains(&term) || domain.id.to_lowercase().contains(&term) {
        return true;
    }
    domain
        .routes
        .iter()
        .any(|route| route.ringba_id.to_lowercase().contains(&term))
}

pub fn filter_domains<'a>(
    domains: &'a [Domain],
    user: Option<&User>,
    filters: &DomainFilters,
) -> Vec<&'a Domain> {
    domains
        .iter()
        .filter(|domain| can_see(domain, user))
        .filter(|domain| {
            filters
                .organization
                .as_deref()
                .is_none_or(|org| domain.organization == org)
        })
        .filter(|domain| {
            filters
                .platform
                .as_deref()
                .is_none_or(|platform| domain.platform == platform)
        })
        .filter(|domain| {
            filters
                .assigned_to
                .as_deref()
                .is_none_or(|email| domain.assigned_to == email)
        })
        .filter(|domain| {
            filters
                .search
                .as_deref()
                .is_none_or(|term| matches_search(domain, term))
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    pub organizations: Vec<String>,
    pub platforms: Vec<String>,
    pub media_buyers: Vec<String>,
}

/// Distinct non-empty values present in a domain set, in first-seen order.
pub fn filter_options(domains: &[Domain]) -> FilterOptions {
    let mut options = FilterOptions::default();
    let mut push_unique = |list: &mut Vec<String>, value: &str| {
        if !value.is_empty() && !list.iter().any(|existing| existing == value) {
            list.push(value.to_string());
        }
    };
    for domain in domains {
        push_unique(&mut options.organizations, &domain.organization);
        push_unique(&mut options.platforms, &domain.platform);
        push_unique(&mut options.media_buyers, &domain.assigned_to);
    }
    options
}
