//! History adapters.
//!
//! # Data Flow
//! ```text
//! push / replace / go ──▶ History ──▶ listeners(HistoryEvent)
//!                                          │
//!                                          ▼
//!                              Scheduler::schedule_navigation
//! ```
//!
//! # Design Decisions
//! - History is the source of truth for the requested location; the router
//!   never writes back into it
//! - Listeners run synchronously, so a navigation is scheduled before
//!   `push` returns

pub mod memory;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use thiserror::Error;

use crate::navigation::{Location, NavigationKind};

pub use memory::MemoryHistory;

/// A location change reported by a history.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEvent {
    pub location: Location,
    pub action: NavigationKind,
}

pub type HistoryListener = Arc<dyn Fn(&HistoryEvent) + Send + Sync>;

static LISTENER_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Handle returned by `listen`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    pub fn new() -> Self {
        Self(LISTENER_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for ListenerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener-{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    #[error("history has no entry at offset {delta} from index {index} (len {len})")]
    OutOfRange { delta: isize, index: usize, len: usize },
}

/// Source of location changes and sink for push/replace.
pub trait History: Send + Sync {
    /// Location of the current entry.
    fn location(&self) -> Location;

    /// Call `listener` on every later change.
    fn listen(&self, listener: HistoryListener) -> ListenerId;

    fn unlisten(&self, id: ListenerId);

    fn push(&self, location: Location);

    fn replace(&self, location: Location);
}
