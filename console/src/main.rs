mod commands;
mod config;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "console", about = "Domain and landing-page console")]
struct Cli {
    #[arg(long, default_value = "console.yaml")]
    config: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in and persist the session
    Login {
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Drop the stored session
    Logout,
    /// Domain administration
    #[command(subcommand)]
    Domains(DomainsCommand),
    /// Landing-page routes
    #[command(subcommand)]
    Routes(RoutesCommand),
}

#[derive(Subcommand)]
enum DomainsCommand {
    /// List the domains visible to the logged-in user
    List {
        #[arg(long)]
        organization: Option<String>,
        #[arg(long)]
        platform: Option<String>,
        #[arg(long)]
        assigned_to: Option<String>,
        #[arg(long)]
        search: Option<String>,
    },
    /// Register a domain
    Create {
        #[arg(long)]
        domain: String,
        #[arg(long)]
        organization: String,
        #[arg(long)]
        id: String,
        #[arg(long)]
        platform: String,
        #[arg(long, default_value = "")]
        rtk_id: String,
        #[arg(long = "certification-tag")]
        certification_tags: Vec<String>,
        #[arg(long)]
        assigned_to: String,
    },
    /// Edit a domain; omitted flags keep the current values
    Update {
        domain: String,
        #[arg(long)]
        new_domain: Option<String>,
        #[arg(long)]
        organization: Option<String>,
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        platform: Option<String>,
        #[arg(long)]
        rtk_id: Option<String>,
        /// Replaces the tag set when given at least once
        #[arg(long = "certification-tag")]
        certification_tags: Vec<String>,
        #[arg(long)]
        assigned_to: Option<String>,
    },
    /// Delete a domain and its routes
    Delete {
        domain: String,
    },
    /// Update only the RT campaign id of a domain
    SetRtkId {
        domain: String,
        rtk_id: String,
    },
}

#[derive(Subcommand)]
enum RoutesCommand {
    /// Create a landing page through the 4-step flow
    Create {
        #[arg(long)]
        organization: String,
        #[arg(long)]
        vertical: String,
        /// Campaign name or id
        #[arg(long)]
        campaign: String,
        /// Required for tech/ceo/admin users; media buyers are auto-matched
        #[arg(long)]
        media_buyer: Option<String>,
        #[arg(long)]
        domain: String,
        #[arg(long)]
        route: String,
        #[arg(long)]
        template: String,
        /// Ignored when the domain carries its own RT id
        #[arg(long)]
        rtk_id: Option<String>,
        #[arg(long)]
        platform: Option<String>,
    },
    /// Edit one route; omitted flags keep the current values
    Update {
        domain: String,
        route: String,
        #[arg(long)]
        new_route: Option<String>,
        #[arg(long)]
        template: Option<String>,
    },
    /// Delete one route from a domain
    Delete {
        domain: String,
        route: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    if let Err(err) = commands::run(cli).await {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
