//! Transition executor.
//!
//! # Responsibilities
//! - Diff the committed chain against a newly matched one
//! - Run `canDeactivate` and `onLeave` leaf to root, then `canActivate` and
//!   `onEnter` root to leaf
//! - Commit active chain and location in one step
//!
//! # Design Decisions
//! - Chains are compared by route key along their common prefix; below the
//!   first difference everything leaves and everything enters again
//! - First guard rejection stops the navigation; no later hook runs
//! - `onLeave` / `onEnter` failures are logged and ignored; nothing is rolled back
//! - Staleness is re-checked before every phase and at commit

use std::sync::Arc;

use crate::navigation::{Location, Navigation, NavigationError};
use crate::observability::metrics;
use crate::routing::hooks::{Hook, HookContext, HookPhase, Rejection};
use crate::routing::route::Route;
use crate::scheduling::current::CurrentNavigation;
use crate::store::Store;

/// Work needed to move from one committed chain to another.
#[derive(Debug, Clone)]
pub struct Transition {
    pub navigation: Arc<Navigation>,
    /// Leaf to root.
    pub deactivate: Vec<Route>,
    /// Root to leaf.
    pub activate: Vec<Route>,
    /// The full chain committed on success.
    pub routes: Vec<Route>,
    /// The location committed on success, normalised.
    pub location: Location,
}

impl Transition {
    pub fn between(
        previous: &[Route],
        next: Vec<Route>,
        navigation: Arc<Navigation>,
    ) -> Result<Self, NavigationError> {
        let location = navigation
            .to
            .as_ref()
            .map(Location::normalized)
            .ok_or_else(|| {
                NavigationError::InvalidNavigation(format!("navigation {navigation} has no target"))
            })?;
        if next.is_empty() {
            return Err(NavigationError::InvalidNavigation(format!(
                "navigation {navigation} matched an empty chain"
            )));
        }

        let common = previous
            .iter()
            .zip(next.iter())
            .take_while(|(a, b)| a.key == b.key)
            .count();

        Ok(Self {
            deactivate: previous[common..].iter().rev().cloned().collect(),
            activate: next[common..].to_vec(),
            routes: next,
            location,
            navigation,
        })
    }

    pub fn is_noop(&self) -> bool {
        self.deactivate.is_empty() && self.activate.is_empty()
    }
}

/// How a transition ended.
#[derive(Debug, Clone)]
pub enum TransitionOutcome {
    Committed(Vec<Route>),
    Failed(NavigationError),
    /// A newer navigation was scheduled; nothing was committed or recorded.
    Superseded,
}

/// Run `transition` against `store`.
pub async fn execute(
    transition: Transition,
    store: &Store,
    current: &CurrentNavigation,
) -> TransitionOutcome {
    let navigation = transition.navigation.clone();

    let phases = [
        (HookPhase::CanDeactivate, &transition.deactivate),
        (HookPhase::OnLeave, &transition.deactivate),
        (HookPhase::CanActivate, &transition.activate),
        (HookPhase::OnEnter, &transition.activate),
    ];
    for (phase, routes) in phases {
        if !current.is_current(&navigation) {
            return TransitionOutcome::Superseded;
        }
        if let Err(error) = run_phase(phase, routes, store, &navigation).await {
            return TransitionOutcome::Failed(error);
        }
    }

    let Transition {
        routes, location, ..
    } = transition;
    let committed = routes.clone();
    let result = current.while_current(&navigation, || {
        store.commit(routes, location, navigation.clone())
    });
    match result {
        None => TransitionOutcome::Superseded,
        Some(Err(error)) => TransitionOutcome::Failed(error),
        Some(Ok(())) => TransitionOutcome::Committed(committed),
    }
}

async fn run_phase(
    phase: HookPhase,
    routes: &[Route],
    store: &Store,
    navigation: &Arc<Navigation>,
) -> Result<(), NavigationError> {
    for route in routes {
        let Some(node) = store.tree().get(route.node) else {
            // A guard that can no longer run must not be read as consent.
            if phase.is_guard() {
                tracing::warn!(
                    navigation_id = %navigation.id,
                    node = %route.node,
                    phase = %phase,
                    "Guarded node was removed from the tree"
                );
                return Err(NavigationError::InvalidNavigation(format!(
                    "node {} was removed before its {phase} guard ran",
                    route.node
                )));
            }
            tracing::debug!(
                navigation_id = %navigation.id,
                node = %route.node,
                phase = %phase,
                "Skipping hooks of removed node"
            );
            continue;
        };

        let ctx = HookContext {
            node: node.key,
            path: node.path.clone(),
            params: route.params.clone(),
            data: node.data.clone(),
            context: node.context.clone(),
            phase,
            navigation: navigation.clone(),
        };

        for hook in node.hooks.get(phase) {
            let Err(reason) = hook.call(ctx.clone()).await else {
                continue;
            };

            if !phase.is_guard() {
                tracing::warn!(
                    navigation_id = %navigation.id,
                    node = %node.key,
                    path = %node.path,
                    phase = %phase,
                    reason = %reason.reason,
                    "Lifecycle hook failed"
                );
                continue;
            }

            tracing::info!(
                navigation_id = %navigation.id,
                node = %node.key,
                path = %node.path,
                phase = %phase,
                reason = %reason.reason,
                "Navigation blocked by guard"
            );
            metrics::record_hook_rejection(phase);
            run_on_error(&ctx, node.hooks.get(HookPhase::OnError), &reason).await;

            return Err(NavigationError::TransitionFailure {
                node: node.key,
                path: node.path.clone(),
                phase,
                target: navigation
                    .to
                    .as_ref()
                    .map(Location::href)
                    .unwrap_or_default(),
                navigation: navigation.clone(),
                reason,
            });
        }
    }
    Ok(())
}

async fn run_on_error(ctx: &HookContext, hooks: &[Hook], reason: &Rejection) {
    let ctx = HookContext {
        phase: HookPhase::OnError,
        ..ctx.clone()
    };
    for hook in hooks {
        if let Err(err) = hook.call(ctx.clone()).await {
            tracing::warn!(
                navigation_id = %ctx.navigation.id,
                node = %ctx.node,
                guard_reason = %reason.reason,
                reason = %err.reason,
                "onError hook failed"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::{NavigationDefinition, NavigationKind};
    use crate::routing::node::NodeKey;
    use crate::routing::pattern::Params;
    use crate::routing::route::create_route_key;

    fn route(node: NodeKey, segment: &str) -> Route {
        Route {
            key: create_route_key(node, segment, &Default::default()),
            node,
            path: segment.to_string(),
            segment: segment.to_string(),
            params: Params::new(),
            query: Default::default(),
            data: serde_json::Value::Null,
            context: serde_json::Value::Null,
        }
    }

    fn navigation(path: &str) -> Arc<Navigation> {
        Arc::new(Navigation::initial().next(NavigationDefinition {
            kind: NavigationKind::Push,
            to: Location::new(path),
        }))
    }

    #[test]
    fn test_diff_by_common_prefix() {
        let (root, todos, index, item) = (NodeKey::new(), NodeKey::new(), NodeKey::new(), NodeKey::new());
        let previous = vec![route(root, ""), route(todos, "todos"), route(index, "")];
        let next = vec![route(root, ""), route(todos, "todos"), route(item, "123")];

        let transition = Transition::between(&previous, next, navigation("/todos/123")).unwrap();
        assert_eq!(transition.deactivate.len(), 1);
        assert_eq!(transition.deactivate[0].node, index);
        assert_eq!(transition.activate.len(), 1);
        assert_eq!(transition.activate[0].node, item);
        assert_eq!(transition.location.pathname, "/todos/123/");
    }

    #[test]
    fn test_changed_ancestor_reactivates_descendants() {
        let (root, item, detail) = (NodeKey::new(), NodeKey::new(), NodeKey::new());
        let previous = vec![route(root, ""), route(item, "1"), route(detail, "detail")];
        let next = vec![route(root, ""), route(item, "2"), route(detail, "detail")];

        let transition = Transition::between(&previous, next, navigation("/2/detail")).unwrap();
        let leaving: Vec<_> = transition.deactivate.iter().map(|r| r.segment.as_str()).collect();
        let entering: Vec<_> = transition.activate.iter().map(|r| r.segment.as_str()).collect();
        assert_eq!(leaving, vec!["detail", "1"]);
        assert_eq!(entering, vec!["2", "detail"]);
    }

    #[test]
    fn test_first_navigation_activates_everything() {
        let (root, home) = (NodeKey::new(), NodeKey::new());
        let transition =
            Transition::between(&[], vec![route(root, ""), route(home, "")], navigation("/")).unwrap();
        assert!(transition.deactivate.is_empty());
        assert_eq!(transition.activate.len(), 2);
        assert!(!transition.is_noop());
    }

    #[tokio::test]
    async fn test_removed_node_fails_guard_phases_only() {
        let store = Store::new();
        let gone = vec![route(NodeKey::new(), "gone")];
        let navigation = navigation("/");

        let err = run_phase(HookPhase::CanDeactivate, &gone, &store, &navigation)
            .await
            .unwrap_err();
        assert!(matches!(err, NavigationError::InvalidNavigation(ref m) if m.contains("canDeactivate")));
        assert!(run_phase(HookPhase::OnLeave, &gone, &store, &navigation).await.is_ok());
    }

    #[test]
    fn test_missing_target_is_invalid() {
        let err = Transition::between(&[], vec![route(NodeKey::new(), "")], Arc::new(Navigation::initial()))
            .unwrap_err();
        assert!(matches!(err, NavigationError::InvalidNavigation(_)));
    }
}
