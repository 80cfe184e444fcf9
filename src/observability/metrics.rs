//! Router metrics.
//!
//! # Metrics
//! - `router_navigations_total` (counter): terminal navigations by outcome
//!   (`end`, `cancelled`, `superseded`)
//! - `router_navigation_duration_seconds` (histogram): scheduling to terminal event
//! - `router_hook_rejections_total` (counter): guard rejections by phase
//! - `router_children_loaded_total` (counter): lazy children loads that succeeded
//!
//! # Design Decisions
//! - Recorded through the `metrics` facade; installing an exporter is up to
//!   the embedding application
//! - A process-wide switch turns recording off entirely

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use crate::routing::hooks::HookPhase;

static ENABLED: AtomicBool = AtomicBool::new(true);

/// Turn metric recording on or off for the whole process.
pub fn set_enabled(enabled: bool) {
    ENABLED.store(enabled, Ordering::Relaxed);
}

pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}

/// Record a navigation reaching a terminal event.
pub fn record_navigation(outcome: &'static str, started: Instant) {
    if !is_enabled() {
        return;
    }
    metrics::counter!("router_navigations_total", "outcome" => outcome).increment(1);
    metrics::histogram!("router_navigation_duration_seconds", "outcome" => outcome)
        .record(started.elapsed().as_secs_f64());
}

pub fn record_hook_rejection(phase: HookPhase) {
    if !is_enabled() {
        return;
    }
    metrics::counter!("router_hook_rejections_total", "phase" => phase.as_str()).increment(1);
}

pub fn record_children_loaded() {
    if !is_enabled() {
        return;
    }
    metrics::counter!("router_children_loaded_total").increment(1);
}
