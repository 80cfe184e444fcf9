//! Observable router state.

use std::sync::Arc;

use crate::navigation::{Location, Navigation, NavigationError};
use crate::routing::node::NodeKey;
use crate::routing::route::Route;

/// Snapshot published by the store on every change.
#[derive(Debug, Clone, Default)]
pub struct RouterState {
    /// Committed chain, root to leaf.
    pub active: Vec<Route>,
    /// Committed location; `None` until the first navigation commits.
    pub location: Option<Location>,
    /// Why the last navigation failed; cleared by the next commit.
    pub error: Option<NavigationError>,
    /// The navigation that produced `active` and `location`.
    pub navigation: Option<Arc<Navigation>>,
}

impl RouterState {
    pub fn active_keys(&self) -> Vec<NodeKey> {
        self.active.iter().map(|r| r.node).collect()
    }

    pub fn pathname(&self) -> Option<&str> {
        self.location.as_ref().map(|l| l.pathname.as_str())
    }

    /// Paths of the active chain, as configured.
    pub fn active_paths(&self) -> Vec<&str> {
        self.active.iter().map(|r| r.path.as_str()).collect()
    }
}
