//! Scheduling subsystem: the navigation engine.
//!
//! # Data Flow
//! ```text
//! schedule_navigation(to, kind)
//!     → current.rs (sequence + 1)
//!     → scheduler.rs dispatch: middleware, current-event cell, queue
//!     → reaction task: process.rs (match, load children, execute)
//!     → executor.rs (guards, lifecycle hooks, commit to the store)
//!     → result newer or equal to tracked sequence? dispatch : cancel
//! ```
//!
//! # Design Decisions
//! - Store mutations happen only at commit, so cancelling is always safe
//! - No timeouts: a hung guard stalls its own navigation only
//! - Commit and advancing the sequence exclude each other

pub mod current;
pub mod executor;
pub mod process;
pub mod scheduler;

pub use current::CurrentNavigation;
pub use executor::{execute, Transition, TransitionOutcome};
pub use process::process_event;
pub use scheduler::Scheduler;
