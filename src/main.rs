mod api;
mod cache;
mod error;
mod loader;
mod model;
mod parser;
mod render;
mod settings;
mod works;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use cache::{ContentStore, SqliteStore, TtlPolicy};
use loader::LoadOptions;
use model::WorkItem;
use render::{JsonTarget, RenderTarget, TextTarget, WorkSummary};
use settings::Settings;

#[derive(Parser)]
#[command(name = "portfolio_works", about = "Portfolio works from a hosted document collection")]
struct Cli {
    /// Bypass the cache and fetch the collection
    #[arg(long, global = true, conflicts_with = "offline")]
    refresh: bool,
    /// Read only from the cache
    #[arg(long, global = true)]
    offline: bool,
    /// Emit JSON instead of text
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Latest published works
    Landing {
        #[arg(short = 'n', long, default_value_t = works::DEFAULT_LATEST_LIMIT)]
        limit: usize,
    },
    /// All published works, optionally filtered by role
    Works {
        /// Role to filter by ("all" for everything)
        #[arg(short, long)]
        role: Option<String>,
    },
    /// Roles available as filters
    Roles,
    /// Detail view of one work
    Work {
        /// Work id
        id: Option<String>,
    },
    /// Derived views of every published work as JSON
    Export {
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Inspect or clear the local cache
    Cache {
        #[command(subcommand)]
        action: Option<CacheAction>,
    },
}

#[derive(Subcommand, Clone, Copy)]
enum CacheAction {
    /// Show age and size of the cached collection
    Status,
    /// Remove the cached collection
    Clear,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load()?;
    let policy = TtlPolicy::new(settings.cache_ttl()?);

    let store = match SqliteStore::open(&settings.cache_path) {
        Ok(store) => Some(store),
        Err(e) => {
            warn!("Cache unavailable: {:#}", e);
            None
        }
    };

    let mut target: Box<dyn RenderTarget> = if cli.json {
        Box::new(JsonTarget::new(io::stdout()))
    } else {
        Box::new(TextTarget::new(io::stdout()))
    };

    let code = match &cli.command {
        Commands::Cache { action } => {
            let Some(store) = store.as_ref() else {
                anyhow::bail!("Cache at {} cannot be opened", settings.cache_path);
            };
            cache_command(store, &settings, &policy, action.unwrap_or(CacheAction::Status))?;
            ExitCode::SUCCESS
        }
        command => {
            let all = load_collection(&cli, &settings, store.as_ref(), policy).await;
            let published = works::filter_published(&all);
            info!("{} of {} works published", published.len(), all.len());
            run(command, &published, target.as_mut())?
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        info!("Done in {:.1}s", elapsed.as_secs_f64());
    }

    Ok(code)
}

async fn load_collection(
    cli: &Cli,
    settings: &Settings,
    store: Option<&SqliteStore>,
    policy: TtlPolicy,
) -> Vec<WorkItem> {
    if cli.offline {
        return store
            .map(|s| loader::cached_works(s, &policy, Utc::now()))
            .unwrap_or_default();
    }

    let opts = LoadOptions {
        force_refresh: cli.refresh,
        policy,
    };
    loader::load_works(store, api::fetch_works(settings), &opts).await
}

fn run(command: &Commands, published: &[WorkItem], target: &mut dyn RenderTarget) -> anyhow::Result<ExitCode> {
    match command {
        Commands::Landing { limit } => {
            let latest: Vec<WorkSummary> = works::latest_works(published, *limit)
                .iter()
                .map(WorkSummary::from)
                .collect();
            target.listing("Latest works", &latest)?;
        }
        Commands::Works { role } => {
            let filtered: Vec<WorkSummary> = works::filter_by_role(published, role.as_deref())
                .into_iter()
                .map(WorkSummary::from)
                .collect();
            let heading = match role.as_deref() {
                None | Some("all") => "All works".to_string(),
                Some(role) => format!("Works: {}", role),
            };
            target.listing(&heading, &filtered)?;
        }
        Commands::Roles => {
            target.roles(&works::unique_roles(published))?;
        }
        Commands::Work { id } => {
            let Some(work) = id.as_deref().and_then(|id| works::work_by_id(published, id)) else {
                target.not_found(id.as_deref())?;
                return Ok(ExitCode::FAILURE);
            };
            target.detail(&parser::process_work(work))?;
        }
        Commands::Export { output } => export(published, output.as_ref())?,
        Commands::Cache { .. } => unreachable!("handled before loading"),
    }
    Ok(ExitCode::SUCCESS)
}

fn export(published: &[WorkItem], output: Option<&PathBuf>) -> anyhow::Result<()> {
    use rayon::prelude::*;

    let details: Vec<_> = published.par_iter().map(parser::process_work).collect();
    let json = serde_json::to_string_pretty(&details)?;

    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Exported {} works to {}", details.len(), path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn cache_command(
    store: &SqliteStore,
    settings: &Settings,
    policy: &TtlPolicy,
    action: CacheAction,
) -> anyhow::Result<()> {
    match action {
        CacheAction::Status => match store.get()? {
            Some(entry) => {
                let now = Utc::now();
                let age = entry.age(now);
                println!("Path:    {}", settings.cache_path);
                println!("Items:   {}", entry.data.len());
                println!("Age:     {}m", age.num_minutes());
                println!(
                    "Status:  {}",
                    if policy.is_fresh(&entry, now) { "fresh" } else { "expired" }
                );
            }
            None => println!("Cache is empty."),
        },
        CacheAction::Clear => {
            store.clear()?;
            println!("Cache cleared.");
        }
    }
    Ok(())
}
