use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing::{error, info, warn};

use event_radar::config::{Config, SourceConfig};
use event_radar::geocode::NominatimGeocoder;
use event_radar::logging::init_logging;
use event_radar::pipeline::{Engine, PageContext, PageReport, RunSummary};
use event_radar::scrapers::{extract_blocks, BrowserPageSource, HttpPageSource, PageSource};
use event_radar::store::{EventStore, InMemoryStore, SupabaseStore};

#[derive(Parser, Debug)]
#[command(name = "event-radar", about = "Scrape ticketing sites into draft events")]
struct Args {
    /// Path to the TOML config
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Run a single source by name
    #[arg(long)]
    source: Option<String>,

    /// Keep records in memory instead of writing to the store
    #[arg(long)]
    dry_run: bool,

    /// Also write every constructed record to this JSON file, and the run
    /// summary next to it
    #[arg(long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_logging();

    let args = Args::parse();
    let config = Config::load(&args.config)
        .with_context(|| format!("Failed to load {}", args.config.display()))?;
    let sources = select_sources(&config, args.source.as_deref())?;

    info!("📅 Event Radar - {} source(s)", sources.len());
    if sources.is_empty() {
        warn!("No sources configured, nothing to do");
        return Ok(());
    }

    let store: Arc<dyn EventStore> = if args.dry_run {
        info!("Dry run: records stay in memory");
        Arc::new(InMemoryStore::new())
    } else {
        let credentials = config
            .store
            .credentials()
            .context("Store credentials are missing")?;
        let store = SupabaseStore::connect(&credentials, &config.store.table)
            .await
            .context("Could not connect to the event store")?;
        Arc::new(store)
    };

    let geocoder = Arc::new(NominatimGeocoder::new(&config.geocoder)?);
    let engine = Engine::new(geocoder, store, config.politeness.write_delay());

    let http = HttpPageSource::new()?;
    let browser = if sources.iter().any(|s| s.render) {
        Some(BrowserPageSource::new()?)
    } else {
        None
    };

    let mut summary = RunSummary::default();
    let mut records = Vec::new();

    for (i, source) in sources.iter().enumerate() {
        if i > 0 {
            tokio::time::sleep(config.politeness.page_delay()).await;
        }

        let page_source: &dyn PageSource = match (&browser, source.render) {
            (Some(browser), true) => browser,
            _ => &http,
        };

        match scrape_source(&engine, page_source, source, &config).await {
            Ok(report) => {
                summary.merge(report.summary);
                records.extend(report.records);
            }
            Err(e) => {
                error!("[{}] Failed: {:#}", source.name, e);
                summary.record_page_failure(&source.name);
            }
        }
    }

    summary.log();

    if let Some(path) = args.output {
        let json = serde_json::to_string_pretty(&records)?;
        tokio::fs::write(&path, json).await?;
        info!("💾 Saved {} events to {}", records.len(), path.display());

        let summary_path = path.with_extension("summary.json");
        let json = serde_json::to_string_pretty(&summary)?;
        tokio::fs::write(&summary_path, json).await?;
        info!("💾 Saved run summary to {}", summary_path.display());
    }

    Ok(())
}

async fn scrape_source(
    engine: &Engine,
    page_source: &dyn PageSource,
    source: &SourceConfig,
    config: &Config,
) -> Result<PageReport> {
    info!(
        "--- Running {} via {} ---",
        source.name,
        page_source.source_name()
    );

    let html = page_source.fetch(&source.url).await?;
    let blocks = extract_blocks(&html, source)?;
    let page = PageContext {
        base: source.base_url()?,
        now: config.engine.now(),
    };

    Ok(engine.process_page(&source.name, &blocks, &page).await)
}

fn select_sources<'a>(config: &'a Config, name: Option<&str>) -> Result<Vec<&'a SourceConfig>> {
    match name {
        Some(name) => config.source(name).map(|s| vec![s]).ok_or_else(|| {
            anyhow!(
                "Unknown source: {}. Available sources: {}",
                name,
                config.source_names().join(", ")
            )
        }),
        None => Ok(config.sources.iter().collect()),
    }
}
