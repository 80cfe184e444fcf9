//! Router store.
//!
//! # Responsibilities
//! - Own the route tree
//! - Hold the committed active chain, location and last error
//! - Publish every change as a `RouterState` snapshot
//!
//! # Design Decisions
//! - One explicit value per router, shared as `Arc<Store>`; no global
//! - State lives in a `watch` channel: readers get snapshots, observers
//!   await `changed()`
//! - Active chain and location only change together, in `commit`
//! - `replace_children`, `update_node`, `activate_nodes` and `set_location`
//!   exist for setup and tests

pub mod state;

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::watch;

use crate::navigation::{Location, Navigation, NavigationError};
use crate::routing::node::{NodeKey, NodeUpdate, RouteConfig, RouteNode};
use crate::routing::route::{create_route, Route};
use crate::routing::tree::{RouteTree, TreeError};

pub use state::RouterState;

/// Process state of one router instance.
#[derive(Debug)]
pub struct Store {
    tree: RouteTree,
    state: watch::Sender<RouterState>,
}

impl Store {
    /// Store with an empty tree (root only).
    pub fn new() -> Self {
        let (state, _) = watch::channel(RouterState::default());
        Self {
            tree: RouteTree::new(),
            state,
        }
    }

    /// Store whose root has `routes` as children.
    pub fn with_routes(routes: Vec<RouteConfig>) -> Result<Self, TreeError> {
        let store = Self::new();
        store.tree.replace_children(store.tree.root(), routes)?;
        Ok(store)
    }

    /// The route tree backing this store.
    pub fn tree(&self) -> &RouteTree {
        &self.tree
    }

    /// Key of the root node.
    pub fn root(&self) -> NodeKey {
        self.tree.root()
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> RouterState {
        self.state.borrow().clone()
    }

    /// Committed location, if any navigation has committed.
    pub fn location(&self) -> Option<Location> {
        self.state.borrow().location.clone()
    }

    /// Why the last navigation failed.
    pub fn error(&self) -> Option<NavigationError> {
        self.state.borrow().error.clone()
    }

    /// Committed routes, root to leaf.
    pub fn active_routes(&self) -> Vec<Route> {
        self.state.borrow().active.clone()
    }

    /// Nodes of the active chain, root to leaf.
    pub fn active_nodes(&self) -> Vec<RouteNode> {
        let keys = self.state.borrow().active_keys();
        keys.into_iter().filter_map(|k| self.tree.get(k)).collect()
    }

    /// Receiver yielding a snapshot after every change.
    pub fn subscribe(&self) -> watch::Receiver<RouterState> {
        self.state.subscribe()
    }

    /// Replace the children of `parent`. See [`RouteTree::replace_children`].
    pub fn replace_children(
        &self,
        parent: NodeKey,
        configs: Vec<RouteConfig>,
    ) -> Result<Vec<NodeKey>, TreeError> {
        self.tree.replace_children(parent, configs)
    }

    /// Apply a partial update to one node.
    pub fn update_node(&self, key: NodeKey, update: NodeUpdate) -> Result<(), TreeError> {
        self.tree.update_node(key, update)
    }

    /// Make `keys` the active chain without running any hooks.
    pub fn activate_nodes(&self, keys: &[NodeKey]) -> Result<(), TreeError> {
        let routes = keys
            .iter()
            .map(|key| {
                let node = self.tree.get(*key).ok_or(TreeError::UnknownNode(*key))?;
                let params = node.params.clone().unwrap_or_default();
                Ok(create_route(&node, node.segment(), params, Default::default()))
            })
            .collect::<Result<Vec<_>, TreeError>>()?;

        self.swap_active_flags(&routes)?;
        self.state.send_modify(|state| state.active = routes);
        Ok(())
    }

    /// Set the committed location without navigating.
    pub fn set_location(&self, location: Location) {
        self.state
            .send_modify(|state| state.location = Some(location.normalized()));
    }

    /// Replace active chain and location together and clear the error.
    pub(crate) fn commit(
        &self,
        routes: Vec<Route>,
        location: Location,
        navigation: Arc<Navigation>,
    ) -> Result<(), NavigationError> {
        self.swap_active_flags(&routes)
            .map_err(|e| NavigationError::InvalidNavigation(e.to_string()))?;

        self.state.send_modify(|state| {
            state.active = routes;
            state.location = Some(location);
            state.error = None;
            state.navigation = Some(navigation);
        });
        Ok(())
    }

    /// Record a failed navigation; active chain and location stay as they are.
    pub(crate) fn fail(&self, error: NavigationError) {
        self.state.send_modify(|state| state.error = Some(error));
    }

    fn swap_active_flags(&self, routes: &[Route]) -> Result<(), TreeError> {
        if let Some(missing) = routes.iter().find(|r| !self.tree.contains(r.node)) {
            return Err(TreeError::UnknownNode(missing.node));
        }

        let next: HashSet<NodeKey> = routes.iter().map(|r| r.node).collect();
        let previous = self.state.borrow().active_keys();
        for key in previous {
            if !next.contains(&key) {
                self.tree.set_inactive(key);
            }
        }
        for route in routes {
            self.tree.set_active(route.node, route.params.clone())?;
        }
        Ok(())
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::{NavigationDefinition, NavigationKind};
    use crate::routing::pattern::Params;

    fn todos() -> Vec<RouteConfig> {
        vec![
            RouteConfig::new(""),
            RouteConfig::new("todos")
                .with_children(vec![RouteConfig::new(""), RouteConfig::new(":id")]),
        ]
    }

    #[test]
    fn test_activate_nodes() {
        let store = Store::with_routes(todos()).unwrap();
        let todos = store.tree().find_by_paths(&["todos"]).unwrap();
        let index = store.tree().find_by_paths(&["todos", ""]).unwrap();

        store.activate_nodes(&[store.root(), todos, index]).unwrap();
        let state = store.snapshot();
        assert_eq!(state.active_paths(), vec!["", "todos", ""]);
        assert!(store.tree().get(todos).unwrap().is_active);

        // Switching chains clears flags of nodes that left.
        let home = store.tree().find_by_paths(&[""]).unwrap();
        store.activate_nodes(&[store.root(), home]).unwrap();
        assert!(!store.tree().get(todos).unwrap().is_active);
        assert_eq!(store.active_nodes().len(), 2);
    }

    #[test]
    fn test_activate_unknown_node_changes_nothing() {
        let store = Store::with_routes(todos()).unwrap();
        let missing = NodeKey::new();
        assert_eq!(
            store.activate_nodes(&[store.root(), missing]),
            Err(TreeError::UnknownNode(missing))
        );
        assert!(store.active_routes().is_empty());
        assert!(!store.tree().get(store.root()).unwrap().is_active);
    }

    #[tokio::test]
    async fn test_commit_publishes_and_clears_error() {
        let store = Store::with_routes(todos()).unwrap();
        let mut rx = store.subscribe();

        store.fail(NavigationError::NoMatch { url: "/x".into() });
        assert!(store.error().is_some());
        rx.changed().await.unwrap();

        let navigation = Arc::new(Navigation::initial().next(NavigationDefinition {
            kind: NavigationKind::Push,
            to: Location::new("/"),
        }));
        let root = store.tree().get(store.root()).unwrap();
        let route = create_route(&root, "", Params::new(), Default::default());
        store
            .commit(vec![route], Location::new("/"), navigation)
            .unwrap();

        rx.changed().await.unwrap();
        let state = rx.borrow().clone();
        assert!(state.error.is_none());
        assert_eq!(state.pathname(), Some("/"));
        assert_eq!(state.active.len(), 1);
    }
}
