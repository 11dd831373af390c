//! `availability` CLI: compute provider unavailable hours from working-hours
//! schedules, offline from JSON files or live from the working-hours API.
//!
//! ## Usage
//!
//! ```sh
//! # Normalize one raw working-hours response into blocks
//! availability normalize -i awhours.json
//!
//! # Unavailable hours per weekday for {providerId: response} (stdin → stdout)
//! cat providers.json | availability compute
//!
//! # Unavailable hours for one date
//! availability compute -i providers.json --date 2026-03-16
//!
//! # Fetch live schedules and compute (token and account from flags or env)
//! availability fetch --provider p1 --provider p2 --account acct-1 --token $TOKEN
//!
//! # List events for the current month
//! availability events --provider p1 --account acct-1
//! ```
//!
//! Logs go to stderr. The default level is `warn`; `-v` raises it to `info`,
//! `-vv` to `debug`, and `RUST_LOG` overrides both.

use std::collections::BTreeMap;
use std::env;
use std::io::{self, Read};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use availability_engine::time::parse_date;
use availability_engine::{
    normalize_working_hours, unavailable_hours_by_day_of_week, unavailable_hours_for_date,
    ProviderMap, UnavailableHour, WorkingHoursResponse,
};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;
use working_hours_sync::{
    fetch_all_events, ApiClient, AvailabilitySync, ClientContext, EventQuery, HttpEventSource,
    StaticToken, SyncConfig,
};

#[derive(Parser)]
#[command(
    name = "availability",
    version,
    about = "Provider availability from working-hours schedules"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize a raw working-hours response into blocks
    Normalize {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Compute unavailable hours from a JSON object of provider id → response
    Compute {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Only this date (YYYY-MM-DD) instead of every weekday
        #[arg(long)]
        date: Option<String>,
    },
    /// Fetch working hours for providers and compute unavailable hours
    Fetch {
        #[command(flatten)]
        remote: RemoteArgs,
        /// Only this date (YYYY-MM-DD) instead of every weekday
        #[arg(long)]
        date: Option<String>,
    },
    /// List internal and external events
    Events {
        #[command(flatten)]
        remote: RemoteArgs,
        /// Calendar ids for the external feed (repeatable)
        #[arg(long = "calendar")]
        calendars: Vec<String>,
        /// Brand id (defaults to the standard brand)
        #[arg(long)]
        brand: Option<String>,
        /// Range start (defaults to the start of the current month, UTC+05:30)
        #[arg(long, requires = "end")]
        start: Option<String>,
        /// Range end
        #[arg(long, requires = "start")]
        end: Option<String>,
    },
}

#[derive(clap::Args)]
struct RemoteArgs {
    /// Provider id (repeatable)
    #[arg(long = "provider")]
    providers: Vec<String>,
    /// Account id [env: AVAILABILITY_ACCOUNT_ID]
    #[arg(long)]
    account: Option<String>,
    /// Bearer token [env: AVAILABILITY_ACCESS_TOKEN]
    #[arg(long)]
    token: Option<String>,
}

impl RemoteArgs {
    fn token(&self) -> Result<String> {
        self.token
            .clone()
            .or_else(|| env::var("AVAILABILITY_ACCESS_TOKEN").ok())
            .filter(|t| !t.is_empty())
            .context("No access token: pass --token or set AVAILABILITY_ACCESS_TOKEN")
    }

    fn context(&self) -> ClientContext {
        ClientContext {
            merchant_id: self
                .account
                .clone()
                .or_else(|| env::var("AVAILABILITY_ACCOUNT_ID").ok()),
            provider_ids: self.providers.clone(),
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Normalize { input, output } => {
            let json = read_input(input.as_deref())?;
            let response: WorkingHoursResponse =
                serde_json::from_str(&json).context("Invalid working hours JSON")?;
            let data = normalize_working_hours(&response)?;
            write_json(output.as_deref(), &data)?;
        }
        Commands::Compute {
            input,
            output,
            date,
        } => {
            let json = read_input(input.as_deref())?;
            let providers = parse_providers(&json)?;
            match date {
                Some(date) => {
                    let date = parse_date(&date)?;
                    write_json(
                        output.as_deref(),
                        &unavailable_hours_for_date(&providers, date),
                    )?;
                }
                None => {
                    write_json(
                        output.as_deref(),
                        &unavailable_hours_by_day_of_week(&providers),
                    )?;
                }
            }
        }
        Commands::Fetch { remote, date } => {
            let date = date.as_deref().map(parse_date).transpose()?;
            fetch(&remote, date).await?;
        }
        Commands::Events {
            remote,
            calendars,
            brand,
            start,
            end,
        } => {
            let mut context = remote.context();
            context.calendar_ids = calendars;
            context.brand_id = brand;
            let query = match (start, end) {
                (Some(start), Some(end)) => EventQuery::for_context(&context, start, end),
                _ => EventQuery::current_month(&context, Utc::now()),
            };

            let config = SyncConfig::from_env()?;
            let client = ApiClient::new(&config, Arc::new(StaticToken(remote.token()?)))?;
            let source =
                HttpEventSource::new(client, config.endpoints.events.clone(), config.event_page_limit);
            let events = fetch_all_events(&source, &query).await?;
            info!(count = events.len(), "fetched events");
            write_json(None, &events)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(io::stderr)
        .init();
}

async fn fetch(remote: &RemoteArgs, date: Option<NaiveDate>) -> Result<()> {
    if remote.providers.is_empty() {
        bail!("At least one --provider is required");
    }

    let config = SyncConfig::from_env()?;
    let tokens = Arc::new(StaticToken(remote.token()?));
    let sync = AvailabilitySync::from_config(&config, tokens)?;

    let report = sync.refresh(&remote.context()).await?;
    for warning in &report.warnings {
        eprintln!("warning: provider {}: {}", warning.provider_id, warning.message);
    }

    match date {
        Some(date) => write_json(None, &sync.unavailable_for(date).await),
        None => {
            let mut week: BTreeMap<u8, Vec<UnavailableHour>> = BTreeMap::new();
            for day in 0..7 {
                week.insert(day, sync.unavailable_for_weekday(day).await);
            }
            write_json(None, &week)
        }
    }
}

/// Parse `{providerId: response}` and normalize every schedule.
fn parse_providers(json: &str) -> Result<ProviderMap> {
    let raw: BTreeMap<String, WorkingHoursResponse> =
        serde_json::from_str(json).context("Invalid providers JSON")?;
    raw.into_iter()
        .map(|(id, response)| {
            let data = normalize_working_hours(&response)
                .with_context(|| format!("Provider '{}' has an invalid schedule", id))?;
            Ok((id, data))
        })
        .collect()
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_json<T: Serialize>(path: Option<&str>, value: &T) -> Result<()> {
    let pretty = serde_json::to_string_pretty(value)?;
    match path {
        Some(path) => {
            std::fs::write(path, pretty + "\n")
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", pretty);
        }
    }
    Ok(())
}
