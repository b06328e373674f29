//! HTTP client for the internal console API.
//!
//! Reads go through the injected response cache; every mutation invalidates
//! the domains cache group on success so the next read observes the write.
//! Access-control predicates are enforced here before anything touches the
//! network.

use crate::access;
use crate::errors::RegistryError;
use crate::metrics_defs::{MUTATION_REJECTED, MUTATION_SENT, UNEXPECTED_LIST_PAYLOAD};
use crate::session::Session;
use crate::types::{
    CreateRouteRequest, Domain, DomainUpdate, NewDomain, RouteUpdate, User,
};
use serde_json::Value;
use shared::cache::{DOMAINS_TTL, ResponseCache};
use shared::counter;
use shared::http::{cached_get_json, error_message};
use std::sync::Arc;
use tokio::sync::{Semaphore, SemaphorePermit};
use url::Url;

#[derive(serde::Deserialize)]
struct LoginResponse {
    user: User,
    token: String,
}

pub struct RegistryClient {
    http: reqwest::Client,
    base_url: String,
    cache: Arc<ResponseCache>,
    // At-most-one in-flight mutation; concurrent attempts are rejected and
    // retried by the user, never automatically.
    mutation_lock: Semaphore,
}

impl RegistryClient {
    pub fn new(base_url: &str, cache: Arc<ResponseCache>) -> Result<Self, RegistryError> {
        Url::parse(base_url)?;
        Ok(RegistryClient {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            cache,
            mutation_lock: Semaphore::new(1),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        if path.is_empty() {
            self.base_url.clone()
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn require_auth(&self, session: &Session) -> Result<(), RegistryError> {
        if session.is_authenticated() {
            Ok(())
        } else {
            Err(RegistryError::NotAuthenticated)
        }
    }

    fn mutation_permit(&self) -> Result<SemaphorePermit<'_>, RegistryError> {
        match self.mutation_lock.try_acquire() {
            Ok(permit) => Ok(permit),
            Err(_) => {
                counter!(MUTATION_REJECTED).increment(1);
                Err(RegistryError::MutationInFlight)
            }
        }
    }

    async fn send_mutation(&self, request: reqwest::RequestBuilder) -> Result<(), RegistryError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RegistryError::Api {
                status,
                message: error_message(response).await,
            });
        }
        counter!(MUTATION_SENT).increment(1);
        self.cache.invalidate_domains();
        Ok(())
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Session, RegistryError> {
        let url = self.endpoint("auth/login");
        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RegistryError::Api {
                status,
                message: error_message(response).await,
            });
        }
        let LoginResponse { user, token } = response.json().await?;
        Ok(Session { user, token })
    }

    /// Full domain list (cached). The caller narrows it through the access
    /// filter; the backend returns every record.
    pub async fn list_domains(&self, session: &Session) -> Result<Vec<Domain>, RegistryError> {
        self.require_auth(session)?;
        let url = self.endpoint("");
        let request = self.http.get(&url).bearer_auth(&session.token);
        let payload = cached_get_json(&self.cache, request, &url, DOMAINS_TTL).await?;
        Ok(extract_domains(&payload))
    }

    pub async fn create_domain(
        &self,
        session: &Session,
        new_domain: &NewDomain,
    ) -> Result<(), RegistryError> {
        self.require_auth(session)?;
        if !access::can_create_domains(Some(&session.user)) {
            return Err(RegistryError::PermissionDenied("create domain"));
        }
        let _permit = self.mutation_permit()?;
        let url = self.endpoint("domain");
        self.send_mutation(self.http.post(&url).bearer_auth(&session.token).json(new_domain))
            .await
    }

    /// Full domain edit. The media-buyer path goes through
    /// [`RegistryClient::set_rtk_id`] instead.
    pub async fn update_domain(
        &self,
        session: &Session,
        current: &Domain,
        update: &DomainUpdate,
    ) -> Result<(), RegistryError> {
        self.require_auth(session)?;
        if !access::can_edit(current, Some(&session.user)) {
            return Err(RegistryError::PermissionDenied("edit domain"));
        }
        let _permit = self.mutation_permit()?;
        let url = self.endpoint("updateDomain");
        self.send_mutation(self.http.put(&url).bearer_auth(&session.token).json(update))
            .await
    }

    /// RT-id-only update, the one domain-level change a media buyer may make
    /// on an assigned domain.
    pub async fn set_rtk_id(
        &self,
        session: &Session,
        current: &Domain,
        new_rtk_id: &str,
    ) -> Result<(), RegistryError> {
        self.require_auth(session)?;
        let user = Some(&session.user);
        if !access::can_edit_rtk_id_only(current, user) && !access::can_edit(current, user) {
            return Err(RegistryError::PermissionDenied("edit RT campaign id"));
        }
        let _permit = self.mutation_permit()?;
        let update = DomainUpdate::rtk_id_only(current, new_rtk_id);
        let url = self.endpoint("updateDomain");
        self.send_mutation(self.http.put(&url).bearer_auth(&session.token).json(&update))
            .await
    }

    pub async fn delete_domain(&self, session: &Session, domain: &str) -> Result<(), RegistryError> {
        self.require_auth(session)?;
        if !access::can_delete_domains(Some(&session.user)) {
            return Err(RegistryError::PermissionDenied("delete domain"));
        }
        let _permit = self.mutation_permit()?;
        let url = self.endpoint(&format!("domain/{domain}"));
        self.send_mutation(self.http.delete(&url).bearer_auth(&session.token))
            .await
    }

    pub async fn create_route(
        &self,
        session: &Session,
        request: &CreateRouteRequest,
    ) -> Result<(), RegistryError> {
        self.require_auth(session)?;
        let _permit = self.mutation_permit()?;
        let url = self.endpoint("route");
        self.send_mutation(self.http.post(&url).bearer_auth(&session.token).json(request))
            .await
    }

    pub async fn update_route(
        &self,
        session: &Session,
        domain: &Domain,
        update: &RouteUpdate,
    ) -> Result<(), RegistryError> {
        self.require_auth(session)?;
        if !access::can_edit_routes(domain, Some(&session.user)) {
            return Err(RegistryError::PermissionDenied("edit route"));
        }
        let _permit = self.mutation_permit()?;
        let url = self.endpoint("updateData");
        self.send_mutation(self.http.put(&url).bearer_auth(&session.token).json(update))
            .await
    }

    pub async fn delete_route(
        &self,
        session: &Session,
        domain: &Domain,
        route: &str,
    ) -> Result<(), RegistryError> {
        self.require_auth(session)?;
        if !access::can_edit_routes(domain, Some(&session.user)) {
            return Err(RegistryError::PermissionDenied("delete route"));
        }
        let _permit = self.mutation_permit()?;
        let url = self.endpoint(&format!("domain/{}/route/{route}", domain.domain));
        self.send_mutation(self.http.delete(&url).bearer_auth(&session.token))
            .await
    }
}

/// The backend has returned the list as a bare array, `{domains: []}` and
/// `{data: []}` over time; accept all three.
fn extract_domains(payload: &Value) -> Vec<Domain> {
    let items = if payload.is_array() {
        payload
    } else if let Some(domains) = payload.get("domains").filter(|v| v.is_array()) {
        domains
    } else if let Some(data) = payload.get("data").filter(|v| v.is_array()) {
        data
    } else {
        counter!(UNEXPECTED_LIST_PAYLOAD).increment(1);
        tracing::warn!("domain list response had an unexpected shape");
        return Vec::new();
    };

    match serde_json::from_value(items.clone()) {
        Ok(domains) => domains,
        Err(err) => {
            counter!(UNEXPECTED_LIST_PAYLOAD).increment(1);
            tracing::warn!(error = %err, "could not decode domain list");
            Vec::new()
        }
    }
}
