//! ads-inspect: loads a catalog payload and an interaction log from disk and
//! prints the validated and filtered views the engine exposes.

use std::path::{Path, PathBuf};

use ads_core::config::{EngineConfig, SortOrder};
use ads_core::{AdHistory, Catalog, JsonCodec};
use ads_engine::{conversions_sort, FrequencyCapper, HistoryView};
use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "ads-inspect")]
#[command(about = "Inspect ad catalogs and interaction history")]
#[command(version)]
struct Cli {
    /// History ordering (overrides config)
    #[arg(long, env = "ADS_ENGINE__HISTORY__SORT", global = true)]
    history_sort: Option<SortArg>,

    /// Conversion ordering (overrides config)
    #[arg(long, env = "ADS_ENGINE__CONVERSIONS__SORT", global = true)]
    conversion_sort: Option<SortArg>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a catalog payload and summarise its creative sets
    Catalog { path: PathBuf },

    /// Print the filtered history view of a JSON-lines interaction log
    History {
        path: PathBuf,
        #[arg(long)]
        from: Option<DateTime<Utc>>,
        #[arg(long)]
        to: Option<DateTime<Utc>>,
    },

    /// List creative sets still eligible for delivery
    Eligible {
        #[arg(long)]
        catalog: PathBuf,
        #[arg(long)]
        history: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SortArg {
    Ascending,
    Descending,
    None,
}

impl From<SortArg> for SortOrder {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Ascending => SortOrder::Ascending,
            SortArg::Descending => SortOrder::Descending,
            SortArg::None => SortOrder::None,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ads_inspect=info,ads_engine=info,ads_core=info".into()),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();

    let mut config = EngineConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        EngineConfig::default()
    });
    if let Some(sort) = cli.history_sort {
        config.history.sort = sort.into();
    }
    if let Some(sort) = cli.conversion_sort {
        config.conversions.sort = sort.into();
    }

    match cli.command {
        Command::Catalog { path } => inspect_catalog(&config, &path),
        Command::History { path, from, to } => inspect_history(&config, &path, from, to),
        Command::Eligible { catalog, history } => inspect_eligible(&config, &catalog, &history),
    }
}

fn load_catalog(config: &EngineConfig, path: &Path) -> anyhow::Result<Catalog> {
    let payload = std::fs::read_to_string(path)
        .with_context(|| format!("reading catalog {}", path.display()))?;
    let catalog = Catalog::from_json_with(&payload, &config.catalog)
        .with_context(|| format!("validating catalog {}", path.display()))?;
    info!(
        catalog_id = catalog.catalog_id(),
        creative_sets = catalog.creative_sets().count(),
        "catalog loaded"
    );
    Ok(catalog)
}

/// Decode one record per non-empty line. Corrupt lines are skipped.
fn load_history(path: &Path) -> anyhow::Result<Vec<AdHistory>> {
    let log = std::fs::read_to_string(path)
        .with_context(|| format!("reading history {}", path.display()))?;

    let mut history = Vec::new();
    for (index, line) in log.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match AdHistory::from_json(line) {
            Ok(record) => history.push(record),
            Err(e) => warn!(line = index + 1, error = %e, "skipping corrupt history record"),
        }
    }
    info!(records = history.len(), "history loaded");
    Ok(history)
}

fn inspect_catalog(config: &EngineConfig, path: &Path) -> anyhow::Result<()> {
    let catalog = load_catalog(config, path)?;
    let conversions = conversions_sort(config.conversions.sort).apply(&catalog.conversions());

    let creative_sets: Vec<_> = catalog
        .creative_sets()
        .map(|set| {
            json!({
                "id": set.id,
                "perDay": set.per_day,
                "totalMax": set.total_max,
                "deliverable": set.is_deliverable(),
                "notificationCreatives": set.notification_creatives.len(),
                "publisherAdCreatives": set.publisher_ad_creatives.len(),
            })
        })
        .collect();

    let summary = json!({
        "catalogId": catalog.catalog_id(),
        "version": catalog.version(),
        "ping": catalog.ping(),
        "creativeSets": creative_sets,
        "conversions": conversions,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn inspect_history(
    config: &EngineConfig,
    path: &Path,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> anyhow::Result<()> {
    let history = load_history(path)?;
    for record in HistoryView::new(&config.history).get(&history, from, to) {
        println!("{}", record.to_json());
    }
    Ok(())
}

fn inspect_eligible(
    config: &EngineConfig,
    catalog_path: &Path,
    history_path: &Path,
) -> anyhow::Result<()> {
    let catalog = load_catalog(config, catalog_path)?;
    let history = load_history(history_path)?;
    for set in FrequencyCapper::new().eligible_creative_sets(&catalog, &history, Utc::now()) {
        println!("{}", set.id);
    }
    Ok(())
}
