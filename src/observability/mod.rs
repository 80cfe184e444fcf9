//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Scheduler / executor / loaders produce:
//!     → logging.rs (structured log events, one navigation_id per navigation)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout via the fmt layer
//!     → whatever `metrics` recorder the application installs
//! ```
//!
//! # Design Decisions
//! - Structured fields instead of formatted messages
//! - Metrics are cheap and off the hot path of hook execution

pub mod logging;
pub mod metrics;
