//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Route configs → Store → Scheduler → listen to history → initial navigation
//!
//! Shutdown (shutdown.rs):
//!     stop() → detach from history → signal reaction task → task exits
//! ```
//!
//! # Design Decisions
//! - Ordered startup: tree first, then scheduler, then history
//! - Ordered shutdown: no new navigations, then stop processing
//! - Dropping a router or scheduler stops its tasks as well

pub mod shutdown;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::Router;
