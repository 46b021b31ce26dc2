//! tenusage - serve per-tenant compute usage reports over HTTP

use clap::Parser;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tenusage::{
    api::{router, AllowAll, AppState},
    error::Result,
    flavors::{FlavorResolver, StaticFlavorCatalog},
    instances::StaticInstanceStore,
    usage::UsageReporter,
    window::SystemClock,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Serve per-tenant compute usage reports
#[derive(Parser, Debug)]
#[command(name = "tenusage")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8774", env = "TENUSAGE_BIND")]
    bind: SocketAddr,

    /// JSON file holding the instance records to report over
    #[arg(long, env = "TENUSAGE_INSTANCES")]
    instances: PathBuf,

    /// JSON file mapping flavor ids to resource shapes, for legacy records
    /// without an embedded snapshot
    #[arg(long, env = "TENUSAGE_FLAVORS")]
    flavors: Option<PathBuf>,

    /// Only log warnings and errors
    #[arg(long, short = 'q')]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging. The --quiet flag should override RUST_LOG.
    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("warn")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("tenusage=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let store = Arc::new(StaticInstanceStore::from_path(&cli.instances)?);
    let catalog = match &cli.flavors {
        Some(path) => Arc::new(StaticFlavorCatalog::from_path(path)?),
        None => Arc::new(StaticFlavorCatalog::new(HashMap::new())),
    };

    let state = AppState {
        reporter: Arc::new(UsageReporter::new(store, FlavorResolver::new(catalog))),
        authorizer: Arc::new(AllowAll),
        clock: Arc::new(SystemClock),
    };

    info!("listening on {}", cli.bind);
    let listener = tokio::net::TcpListener::bind(cli.bind).await?;
    axum::serve(listener, router(state)).await?;
    Ok(())
}
