//! Shared fixtures for scheduler and router tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::Notify;
use tree_router::navigation::Location;
use tree_router::routing::{Hook, HookContext, HookPhase, NodeKey, NodeUpdate, Params, Rejection, RouteConfig};
use tree_router::{Middleware, Scheduler, Store};

/// `/` and `/todos`, `/todos/:id`.
pub fn todo_routes() -> Vec<RouteConfig> {
    vec![
        RouteConfig::new(""),
        RouteConfig::new("todos").with_children(vec![RouteConfig::new(""), RouteConfig::new(":id")]),
    ]
}

/// A started scheduler over `routes`, committed at `/` without running hooks.
#[allow(dead_code)]
pub fn create_scheduler(routes: Vec<RouteConfig>, middleware: Middleware) -> (Arc<Store>, Scheduler) {
    let store = Arc::new(Store::with_routes(routes).unwrap());
    let home = store.tree().find_by_paths(&[""]).unwrap();
    store.activate_nodes(&[store.root(), home]).unwrap();
    store.set_location(Location::new("/"));

    let scheduler = Scheduler::new(store.clone(), middleware);
    assert!(scheduler.start());
    (store, scheduler)
}

/// Look a node up by its path from the root.
#[allow(dead_code)]
pub fn node(store: &Store, paths: &[&str]) -> NodeKey {
    store
        .tree()
        .find_by_paths(paths)
        .unwrap_or_else(|| panic!("no node at {paths:?}"))
}

#[allow(dead_code)]
pub fn set_hooks(store: &Store, key: NodeKey, phase: HookPhase, hooks: Vec<Hook>) {
    store
        .update_node(key, NodeUpdate::new().hooks(phase, hooks))
        .unwrap();
}

/// One recorded hook invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub label: String,
    pub phase: HookPhase,
    pub params: Params,
}

/// Records hook invocations across nodes, in order.
#[derive(Clone, Default)]
pub struct Spy {
    calls: Arc<Mutex<Vec<Call>>>,
}

#[allow(dead_code)]
impl Spy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hook that records `label` and continues.
    pub fn hook(&self, label: &str) -> Hook {
        self.recording(label, None)
    }

    /// Hook that records `label` and rejects with `reason`.
    pub fn rejecting(&self, label: &str, reason: &str) -> Hook {
        self.recording(label, Some(Rejection::new(reason)))
    }

    fn recording(&self, label: &str, outcome: Option<Rejection>) -> Hook {
        let calls = self.calls.clone();
        let label = label.to_string();
        Hook::new(move |ctx: HookContext| {
            calls.lock().unwrap().push(Call {
                label: label.clone(),
                phase: ctx.phase,
                params: ctx.params.clone(),
            });
            let outcome = outcome.clone();
            async move {
                match outcome {
                    Some(rejection) => Err(rejection),
                    None => Ok(()),
                }
            }
        })
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls as `label.phase` strings.
    pub fn trace(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .map(|c| format!("{}.{}", c.label, c.phase))
            .collect()
    }
}

/// Hook that signals `entered`, then waits until `release` is notified.
#[allow(dead_code)]
pub fn gate(entered: Arc<Notify>, release: Arc<Notify>) -> Hook {
    Hook::new(move |_| {
        let entered = entered.clone();
        let release = release.clone();
        async move {
            entered.notify_one();
            release.notified().await;
            Ok(())
        }
    })
}

/// Upper bound for waits that should finish almost immediately.
#[allow(dead_code)]
pub const WAIT: Duration = Duration::from_secs(5);
