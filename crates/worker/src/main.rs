//! Maintenance CLI: duplicate cleanup and batch enrichment against the
//! configured store.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use craftbook_core::cleanup::PermanentTieBreak;
use craftbook_core::enrichment::DEFAULT_CONCURRENCY;
use craftbook_db::maintenance;
use craftbook_wowhead::cache::DEFAULT_XREF_TTL_SECS;
use craftbook_wowhead::{CachingResolver, WowheadApi, WowheadConfig, WowheadResolver};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "craftbook-worker", version, about = "Craftbook store maintenance")]
struct Cli {
    #[arg(
        long,
        global = true,
        env = "REDIS_URL",
        default_value = "redis://127.0.0.1:6379",
        help = "Store URL (memory:// for an in-process store)"
    )]
    redis_url: String,
    #[arg(long, global = true, help = "Print the report as JSON")]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Delete duplicate characters, keeping one per name and server.
    Cleanup(CleanupArgs),
    /// Fill missing recipe/item links in a community list.
    #[command(name = "enrich-community")]
    EnrichCommunity(EnrichCommunityArgs),
    /// Fill missing recipe/item links in every stored character.
    #[command(name = "enrich-characters")]
    EnrichCharacters(EnrichArgs),
}

#[derive(Debug, Args)]
struct CleanupArgs {
    #[arg(
        long,
        env = "CLEANUP_PERMANENT_TIE_BREAK",
        default_value_t = PermanentTieBreak::default(),
        help = "Survivor between two permanent duplicates: latest or first"
    )]
    tie_break: PermanentTieBreak,
}

#[derive(Debug, Args)]
struct EnrichArgs {
    #[arg(long, help = "Report what would change without writing")]
    dry_run: bool,
    #[arg(long, env = "ENRICH_CONCURRENCY", default_value_t = DEFAULT_CONCURRENCY)]
    concurrency: usize,
    #[arg(long, env = "XREF_CACHE_TTL_SECS", default_value_t = DEFAULT_XREF_TTL_SECS)]
    xref_cache_ttl_secs: u64,
}

#[derive(Debug, Args)]
struct EnrichCommunityArgs {
    #[arg(long, help = "Community list suffix (community:crafts:<suffix>)")]
    suffix: Option<String>,
    #[command(flatten)]
    enrich: EnrichArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "craftbook_worker=info,craftbook_db=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let store = craftbook_db::create_store(&cli.redis_url)
        .await
        .with_context(|| format!("connecting to store at {}", cli.redis_url))?;
    craftbook_db::health_check(store.as_ref())
        .await
        .context("store health check failed")?;

    let report = match cli.command {
        Commands::Cleanup(args) => {
            let report = maintenance::run_cleanup(store.as_ref(), args.tie_break).await?;
            serde_json::to_value(report)?
        }
        Commands::EnrichCommunity(args) => {
            let resolver = build_resolver(&store, args.enrich.xref_cache_ttl_secs)?;
            let result = maintenance::enrich_community(
                store.as_ref(),
                &resolver,
                args.suffix.as_deref(),
                args.enrich.dry_run,
                args.enrich.concurrency,
            )
            .await?;
            tracing::info!(
                updated = result.updated,
                persisted = result.persisted,
                "Community enrichment finished"
            );
            serde_json::json!({
                "updated": result.updated,
                "dryRun": result.dry_run,
                "persisted": result.persisted,
                "records": result.records.len(),
            })
        }
        Commands::EnrichCharacters(args) => {
            let resolver = build_resolver(&store, args.xref_cache_ttl_secs)?;
            let report = maintenance::enrich_all_characters(
                store.as_ref(),
                &resolver,
                args.dry_run,
                args.concurrency,
            )
            .await?;
            serde_json::to_value(report)?
        }
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }
    Ok(())
}

fn build_resolver(
    store: &craftbook_db::StoreHandle,
    ttl_secs: u64,
) -> Result<CachingResolver<WowheadResolver>> {
    let config = WowheadConfig::from_env();
    let api = WowheadApi::new(&config).context("building Wowhead HTTP client")?;
    Ok(CachingResolver::new(
        WowheadResolver::new(api, config.defaults.clone()),
        Arc::clone(store),
        ttl_secs,
        config.defaults,
    ))
}
