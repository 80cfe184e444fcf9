//! Middleware composition.

use std::fmt;
use std::sync::Arc;

use crate::navigation::Event;

/// A single event transform. `None` drops the event.
pub type MiddlewareFn = Arc<dyn Fn(Event) -> Option<Event> + Send + Sync>;

/// An ordered chain of event transforms.
///
/// The chain is a value: `concat` builds a new chain, so a scheduler's chain
/// is fixed once constructed.
#[derive(Clone, Default)]
pub struct Middleware {
    steps: Vec<MiddlewareFn>,
}

impl Middleware {
    /// Chain holding a single transform.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Event) -> Option<Event> + Send + Sync + 'static,
    {
        Self {
            steps: vec![Arc::new(f)],
        }
    }

    /// Chain that passes every event through unchanged.
    pub fn identity() -> Self {
        Self::default()
    }

    /// `self` first, then `other`.
    pub fn concat(mut self, other: Middleware) -> Self {
        self.steps.extend(other.steps);
        self
    }

    /// Run `event` through every step; stops at the first step returning `None`.
    pub fn fold(&self, event: Event) -> Option<Event> {
        self.steps.iter().try_fold(event, |event, step| step(event))
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl fmt::Debug for Middleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Middleware")
            .field("steps", &self.steps.len())
            .finish()
    }
}
