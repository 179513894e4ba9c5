//! TSquare command-line entry point
//!
//! Logs in, runs one query against the portal, prints the result as JSON
//! and logs out again.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tsquare::config::{load_config, Config};
use tsquare::scrape::backend_names;
use tsquare::{Credentials, TsquareClient};

/// TSquare: query the T-Square course portal from the command line
#[derive(Parser, Debug)]
#[command(name = "tsquare")]
#[command(version)]
#[command(about = "Query the T-Square course portal", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults to the production portal)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Login username
    #[arg(short, long, env = "TSQUARE_USERNAME")]
    username: String,

    /// Login password
    #[arg(long, env = "TSQUARE_PASSWORD", hide_env_values = true)]
    password: String,

    /// Extraction backend, overriding the configuration; unknown names fall back to `default`
    #[arg(short, long, value_name = "NAME")]
    backend: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the logged-in user
    User,

    /// List sites
    Sites {
        /// Only sites of this term (e.g. "FALL 2013")
        #[arg(long)]
        term: Option<String>,
    },

    /// List recent announcements
    Announcements {
        /// Restrict to one site
        #[arg(long)]
        site: Option<String>,

        /// Maximum number of announcements
        #[arg(short = 'n', long, default_value_t = 10)]
        num: u32,

        /// Maximum age in days
        #[arg(long, default_value_t = 20)]
        age: u32,
    },

    /// List the tools of a site
    Tools { site: String },

    /// List the assignments of a site
    Assignments { site: String },

    /// Show the gradebook of a site
    Grades { site: String },

    /// Print the syllabus of a site
    Syllabus { site: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?
        }
        None => Config::default(),
    };

    if let Some(backend) = cli.backend {
        select_backend(&mut config, backend);
    }

    let credentials = Credentials::new(cli.username, cli.password);
    let client = TsquareClient::login(config, credentials)
        .await
        .context("Login failed")?;

    let outcome = run(&client, cli.command).await;

    if client.is_authenticated() {
        if let Err(e) = client.logout().await {
            tracing::warn!("Logout failed: {}", e);
        }
    }

    outcome
}

/// Points the configuration at `backend`
///
/// Unregistered names are kept; the registry falls back to its default
/// backend for them.
fn select_backend(config: &mut Config, backend: String) {
    let known = backend_names();
    if !known.contains(&backend.as_str()) {
        tracing::warn!(
            "Unknown scraper backend '{}' (available: {})",
            backend,
            known.join(", ")
        );
    }
    config.scraper.backend = backend;
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("tsquare=info,warn"),
            1 => EnvFilter::new("tsquare=debug,info"),
            2 => EnvFilter::new("tsquare=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(client: &TsquareClient, command: Command) -> Result<()> {
    match command {
        Command::User => print_json(&client.user_info().await?),
        Command::Sites { term } => {
            let sites = client
                .sites_filtered(|site| term.as_deref().map_or(true, |t| site.term() == Some(t)))
                .await?;
            print_json(&sites)
        }
        Command::Announcements { site, num, age } => {
            let site = match site {
                Some(id) => Some(client.site_by_id(&id).await?),
                None => None,
            };
            print_json(&client.announcements(site.as_ref(), num, age).await?)
        }
        Command::Tools { site } => {
            let site = client.site_by_id(&site).await?;
            print_json(&client.tools(&site).await?)
        }
        Command::Assignments { site } => {
            let site = client.site_by_id(&site).await?;
            print_json(&client.assignments(&site).await?)
        }
        Command::Grades { site } => {
            let site = client.site_by_id(&site).await?;
            print_json(&client.grades(&site).await?)
        }
        Command::Syllabus { site } => {
            let site = client.site_by_id(&site).await?;
            print_json(&client.syllabus(&site).await?)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
