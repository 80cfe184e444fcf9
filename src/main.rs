//! tree-router
//!
//! Loads a route table, drives an in-memory history through a list of hrefs
//! and reports where each navigation ended.
//!
//! # Architecture Overview
//!
//! ```text
//!   hrefs ──▶ MemoryHistory ──▶ Scheduler ──▶ middleware ──▶ matcher
//!                                   ▲                          │
//!                                   │                          ▼
//!                               events ◀── Store ◀── commit ◀── executor (hooks)
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use tree_router::config::{load_config, RouterConfig};
use tree_router::history::MemoryHistory;
use tree_router::observability::{logging, metrics};
use tree_router::{Location, Middleware, Router};

#[derive(Parser)]
#[command(name = "tree-router")]
#[command(about = "Resolve hrefs against a route table", long_about = None)]
struct Cli {
    /// Route table (TOML).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Location the history starts at; overrides the config.
    #[arg(short, long)]
    initial: Option<String>,

    /// Print the final state as JSON.
    #[arg(long)]
    json: bool,

    /// Hrefs to push, in order.
    hrefs: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => RouterConfig::default(),
    };

    logging::init_logging(Some(&config.observability.log_level))?;
    metrics::set_enabled(config.observability.metrics_enabled);

    let initial = cli
        .initial
        .as_deref()
        .unwrap_or(&config.router.initial_location);
    tracing::info!(
        routes = config.routes.len(),
        initial = %initial,
        "Configuration loaded"
    );

    let history = Arc::new(MemoryHistory::new(Location::parse(initial)?));
    let router = Router::install(history, config.route_configs(), Middleware::identity())?;
    router.start();
    router.settled().await;
    report(&router, initial, cli.json);

    for href in &cli.hrefs {
        router.push(href)?;
        router.settled().await;
        report(&router, href, cli.json);
    }

    router.stop();
    Ok(())
}

fn report(router: &Router, href: &str, json: bool) {
    let state = router.store().snapshot();
    let location = state.location.as_ref().map(Location::href).unwrap_or_default();
    let error = state.error.as_ref().map(ToString::to_string);

    if json {
        let value = serde_json::json!({
            "href": href,
            "location": location,
            "active": state.active,
            "error": error,
        });
        println!("{value}");
        return;
    }

    match &error {
        Some(error) => tracing::warn!(href, location = %location, error = %error, "Navigation failed"),
        None => tracing::info!(
            href,
            location = %location,
            active = ?state.active_paths(),
            "Navigation settled"
        ),
    }
}
