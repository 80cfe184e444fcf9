//! Structured logging.
//!
//! # Responsibilities
//! - Install the global `tracing` subscriber
//! - Pick the filter from `RUST_LOG`, falling back to the configured level
//!
//! # Design Decisions
//! - Uses the tracing crate everywhere; navigations are correlated by their
//!   `navigation_id` field
//! - Environment filter wins over configuration

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when neither `RUST_LOG` nor the config sets one.
pub const DEFAULT_DIRECTIVE: &str = "tree_router=info";

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(level: Option<&str>) -> Result<(), TryInitError> {
    let fallback = level
        .map(|l| format!("tree_router={l}"))
        .unwrap_or_else(|| DEFAULT_DIRECTIVE.to_string());

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into()))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
}
