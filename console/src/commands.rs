//! Subcommand dispatch. All decision logic lives in the library crates;
//! this wires config, cache, clients and session together.

use crate::config::{Config, ConfigError, MetricsConfig};
use crate::{Cli, Command, DomainsCommand, RoutesCommand};
use calltracking::buyers::buyer_email;
use calltracking::catalog::{Organization, Vertical};
use calltracking::client::{ProviderError, RingbaClient};
use calltracking::resolve::{CampaignSelection, ResolutionEngine};
use metrics_exporter_statsd::StatsdBuilder;
use registry::access::{self, DomainFilters};
use registry::client::RegistryClient;
use registry::errors::RegistryError;
use registry::session::{Session, SessionStore};
use registry::types::{Domain, DomainEdit, DomainUpdate, NewDomain, Role, RouteUpdate};
use shared::cache::{ResponseCache, SWEEP_INTERVAL};
use shared::{sanitize, validate};
use std::sync::Arc;
use wizard::{WizardError, WizardState, compose_request};

#[derive(thiserror::Error, Debug)]
pub enum ConsoleError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Wizard(#[from] WizardError),
    #[error("{0}")]
    Usage(String),
}

pub async fn run(cli: Cli) -> Result<(), ConsoleError> {
    let config = Config::from_file(&cli.config)?;
    if let Some(metrics_config) = &config.metrics {
        install_metrics(metrics_config);
    }
    describe_metrics();

    let cache = Arc::new(ResponseCache::new());
    let _sweeper = Arc::clone(&cache).spawn_sweeper(SWEEP_INTERVAL);

    let registry = RegistryClient::new(&config.api.base_url, Arc::clone(&cache))?;
    let provider = RingbaClient::new(&config.calltracking, Arc::clone(&cache))?;
    let engine = ResolutionEngine::new(Arc::new(provider));
    let store = SessionStore::new(config.session_file.clone());

    match cli.command {
        Command::Login { email, password } => {
            let session = registry.login(&email, &password).await?;
            store.save(&session)?;
            let name = session.user.full_name();
            if name.is_empty() {
                println!("logged in as {} ({})", session.user.email, session.user.role.as_str());
            } else {
                println!("logged in as {name} ({})", session.user.role.as_str());
            }
        }
        Command::Logout => {
            store.clear()?;
            println!("session cleared");
        }
        Command::Domains(command) => run_domains(command, &registry, &store).await?,
        Command::Routes(command) => run_routes(command, &registry, &engine, &store).await?,
    }
    Ok(())
}

fn install_metrics(config: &MetricsConfig) {
    match StatsdBuilder::from(config.statsd_host.as_str(), config.statsd_port).build(Some("console")) {
        Ok(recorder) => {
            if let Err(err) = metrics::set_global_recorder(recorder) {
                tracing::warn!(error = %err, "metrics recorder already installed");
            }
        }
        Err(err) => tracing::warn!(error = %err, "could not set up the statsd recorder"),
    }
}

fn describe_metrics() {
    for defs in [
        shared::cache::ALL_METRICS,
        registry::metrics_defs::ALL_METRICS,
        calltracking::metrics_defs::ALL_METRICS,
    ] {
        shared::metrics_defs::describe(defs);
    }
}

fn require_session(store: &SessionStore) -> Result<Session, ConsoleError> {
    store
        .load()
        .ok_or(ConsoleError::Registry(RegistryError::NotAuthenticated))
}

fn find_domain<'a>(domains: &'a [Domain], name: &str) -> Result<&'a Domain, ConsoleError> {
    domains
        .iter()
        .find(|d| d.domain == name)
        .ok_or_else(|| ConsoleError::Usage(format!("unknown domain {name}")))
}

async fn run_domains(
    command: DomainsCommand,
    registry: &RegistryClient,
    store: &SessionStore,
) -> Result<(), ConsoleError> {
    let session = require_session(store)?;
    match command {
        DomainsCommand::List {
            organization,
            platform,
            assigned_to,
            search,
        } => {
            let domains = registry.list_domains(&session).await?;
            // The assignee filter takes an email or a buyer name, the
            // provider's short form included.
            let assigned_to =
                assigned_to.map(|value| match buyer_email(&value) {
                    Some(email) => email.to_string(),
                    None => value,
                });
            let filters = DomainFilters {
                organization,
                platform,
                assigned_to,
                search,
            };
            let visible = access::filter_domains(&domains, Some(&session.user), &filters);
            for domain in &visible {
                println!(
                    "{}\t{}\t{}\t{}\t{} route(s)",
                    domain.domain,
                    domain.organization,
                    domain.platform,
                    domain.assigned_to,
                    domain.routes.len()
                );
            }
            println!("{} domain(s)", visible.len());
        }
        DomainsCommand::Create {
            domain,
            organization,
            id,
            platform,
            rtk_id,
            certification_tags,
            assigned_to,
        } => {
            let domain = sanitize::domain(&domain);
            if !validate::is_valid_domain(&domain) {
                return Err(ConsoleError::Usage(format!("{domain:?} is not a valid domain name")));
            }
            let assigned_to = sanitize::email(&assigned_to);
            if assigned_to.is_empty() {
                return Err(ConsoleError::Usage("--assigned-to must be an email".into()));
            }
            let new_domain = NewDomain {
                domain: domain.clone(),
                organization: sanitize::text(&organization),
                id: sanitize::id(&id),
                platform: sanitize::text(&platform),
                rtk_id: sanitize::id(&rtk_id),
                certification_tags,
                assigned_to,
                created_by: session.user.email.clone(),
            };
            registry.create_domain(&session, &new_domain).await?;
            println!("created {domain}");
        }
        DomainsCommand::Update {
            domain,
            new_domain,
            organization,
            id,
            platform,
            rtk_id,
            certification_tags,
            assigned_to,
        } => {
            let domains = registry.list_domains(&session).await?;
            let current = find_domain(&domains, &domain)?;
            let edit = DomainEdit {
                domain: new_domain.map_or_else(|| current.domain.clone(), |v| sanitize::domain(&v)),
                organization: organization
                    .map_or_else(|| current.organization.clone(), |v| sanitize::text(&v)),
                id: id.map_or_else(|| current.id.clone(), |v| sanitize::id(&v)),
                platform: platform.map_or_else(|| current.platform.clone(), |v| sanitize::text(&v)),
                rtk_id: rtk_id.map_or_else(|| current.rtk_id.clone(), |v| sanitize::id(&v)),
                certification_tags: if certification_tags.is_empty() {
                    current.certification_tags.clone()
                } else {
                    certification_tags
                },
                assigned_to: assigned_to
                    .map_or_else(|| current.owner().to_string(), |v| sanitize::email(&v)),
            };
            if !validate::is_valid_domain(&edit.domain) {
                return Err(ConsoleError::Usage(format!(
                    "{:?} is not a valid domain name",
                    edit.domain
                )));
            }
            let update = DomainUpdate::from_edit(current, &edit);
            registry.update_domain(&session, current, &update).await?;
            println!("updated {domain}");
        }
        DomainsCommand::Delete { domain } => {
            registry.delete_domain(&session, &domain).await?;
            println!("deleted {domain}");
        }
        DomainsCommand::SetRtkId { domain, rtk_id } => {
            let domains = registry.list_domains(&session).await?;
            let current = find_domain(&domains, &domain)?;
            registry
                .set_rtk_id(&session, current, &sanitize::id(&rtk_id))
                .await?;
            println!("updated RT campaign id on {domain}");
        }
    }
    Ok(())
}

async fn run_routes(
    command: RoutesCommand,
    registry: &RegistryClient,
    engine: &ResolutionEngine,
    store: &SessionStore,
) -> Result<(), ConsoleError> {
    let session = require_session(store)?;
    match command {
        RoutesCommand::Create {
            organization,
            vertical,
            campaign,
            media_buyer,
            domain,
            route,
            template,
            rtk_id,
            platform,
        } => {
            let user = session.user.clone();
            let organization = Organization::parse(&organization)
                .ok_or_else(|| ConsoleError::Usage(format!("unknown organization {organization:?}")))?;
            let vertical = Vertical::parse(&vertical)
                .ok_or_else(|| ConsoleError::Usage(format!("unknown vertical {vertical:?}")))?;

            // Step 1: organization.
            let mut state = WizardState::new();
            state.set_organization(organization);
            state.next(Some(&user))?;
            tracing::debug!(step = state.step().title(), "wizard advanced");

            // Step 2: vertical, campaign, media buyer.
            state.set_vertical(vertical)?;
            let campaigns = engine.campaigns_for(vertical, organization).await;
            let selected = campaigns
                .iter()
                .find(|c| c.id == campaign || c.name.eq_ignore_ascii_case(&campaign))
                .cloned()
                .ok_or_else(|| ConsoleError::Usage(format!("unknown campaign {campaign:?}")))?;
            state.set_campaign(selected.clone());

            let generation = state.generation();
            let selection = CampaignSelection {
                organization,
                vertical,
                campaign: selected,
            };
            let resolution = engine.resolve(&selection, Some(&user)).await;
            state.apply_resolution(generation, &resolution);

            if user.role == Role::MediaBuyer {
                // Auto-matched by the engine; nothing to pick.
                state.media_buyer = resolution.media_buyers.first().cloned();
            } else {
                let wanted = media_buyer.ok_or(WizardError::MissingMediaBuyer)?;
                let buyer = resolution
                    .media_buyers
                    .iter()
                    .find(|b| b.name.eq_ignore_ascii_case(&wanted))
                    .cloned()
                    .ok_or_else(|| ConsoleError::Usage(format!("unknown media buyer {wanted:?}")))?;
                state.select_media_buyer(buyer);
            }
            state.next(Some(&user))?;
            tracing::debug!(step = state.step().title(), "wizard advanced");

            // Step 3: domain (free text, known domains enrich it).
            let domains = registry.list_domains(&session).await?;
            state.set_domain(&domain, &domains);
            state.next(Some(&user))?;
            tracing::debug!(step = state.step().title(), "wizard advanced");

            // Step 4: details.
            state.route = route;
            state.template = Some(template);
            if let Some(rtk_id) = rtk_id {
                state.rtk_id = rtk_id;
            }
            if let Some(platform) = platform {
                state.platform = platform;
            }

            let request = compose_request(&state, &domains, &session)?;
            registry.create_route(&session, &request).await?;
            println!("created {}/{}", request.domain, request.route);
        }
        RoutesCommand::Update {
            domain,
            route,
            new_route,
            template,
        } => {
            let domains = registry.list_domains(&session).await?;
            let current = find_domain(&domains, &domain)?;
            let existing = current
                .routes
                .iter()
                .find(|r| r.route == route)
                .ok_or_else(|| ConsoleError::Usage(format!("unknown route {route} on {domain}")))?;
            let update = RouteUpdate {
                domain: current.domain.clone(),
                route: existing.route.clone(),
                new_route: new_route.map_or_else(|| existing.route.clone(), |v| sanitize::route(&v)),
                old_template: existing.template.clone(),
                new_template: template.map_or_else(|| existing.template.clone(), |v| sanitize::text(&v)),
                organization: if existing.organization.is_empty() {
                    "paragon media".to_string()
                } else {
                    existing.organization.clone()
                },
                rtk_id: existing.rtk_id.clone(),
                ringba_id: existing.ringba_id.clone(),
                phone_number: existing.phone_number.clone(),
                created_by: existing.created_by.clone(),
            };
            registry.update_route(&session, current, &update).await?;
            println!("updated {domain}/{route}");
        }
        RoutesCommand::Delete { domain, route } => {
            let domains = registry.list_domains(&session).await?;
            let current = find_domain(&domains, &domain)?;
            registry.delete_route(&session, current, &route).await?;
            println!("deleted {domain}/{route}");
        }
    }
    Ok(())
}
