use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use sqlx::postgres::PgPoolOptions;
use tokio::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ai_client::Claude;
use apify_client::ApifyClient;
use contextlink_common::Config;
use contextlink_ingest::scheduler::run_periodically;
use contextlink_ingest::{
    ClaudeClassifier, DatasetSync, InMemoryRecordStore, PgRawRecordStore, PostClassification,
    RawRecordStore,
};

#[derive(Parser)]
#[command(
    name = "contextlink-worker",
    about = "Syncs Apify datasets into raw records and classifies them"
)]
struct Cli {
    /// Run a single pass and exit instead of scheduling both loops
    #[arg(long, value_enum)]
    once: Option<Pass>,

    /// Keep records in process memory instead of Postgres
    #[arg(long)]
    dry_run: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Pass {
    Sync,
    Classify,
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        builder.json().init();
    } else {
        builder.init();
    }

    info!("contextlink worker starting...");

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let store: Arc<dyn RawRecordStore> = if cli.dry_run {
        info!("Dry run: records are kept in memory only");
        Arc::new(InMemoryRecordStore::new())
    } else {
        let pool = PgPoolOptions::new()
            .max_connections(4)
            .connect(config.require_database_url()?)
            .await?;
        let store = PgRawRecordStore::new(pool);
        store.migrate().await?;
        info!("Connected to database, migrations complete");
        Arc::new(store)
    };

    let mut apify = ApifyClient::try_new(config.apify_api_key.clone())?;
    if let Some(base_url) = &config.apify_base_url {
        apify = apify.with_base_url(base_url.clone());
    }

    let claude = Claude::new(&config.anthropic_api_key, &config.classifier_model);

    let sync = Arc::new(DatasetSync::new(Arc::new(apify), store.clone()));
    let classify = Arc::new(PostClassification::new(
        store,
        Arc::new(ClaudeClassifier::new(claude)),
    ));

    match cli.once {
        Some(Pass::Sync) => {
            let stats = sync.run().await?;
            info!("Sync complete. {stats}");
            return Ok(());
        }
        Some(Pass::Classify) => {
            let stats = classify.run().await?;
            info!("Classification complete. {stats}");
            return Ok(());
        }
        None => {}
    }

    // Sync waits one interval before its first pass; classification starts immediately.
    let sync_loop = tokio::spawn(run_periodically(
        "sync",
        Instant::now() + config.sync_interval,
        config.sync_interval,
        move || {
            let sync = sync.clone();
            async move { sync.run().await }
        },
    ));
    let classify_loop = tokio::spawn(run_periodically(
        "classify",
        Instant::now(),
        config.classify_interval,
        move || {
            let classify = classify.clone();
            async move { classify.run().await }
        },
    ));

    tokio::select! {
        res = sync_loop => res?,
        res = classify_loop => res?,
        _ = tokio::signal::ctrl_c() => info!("Shutdown signal received"),
    }

    Ok(())
}
