//! Route nodes and their declarative configuration.

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::routing::hooks::{Hook, HookPhase, Hooks, Rejection};
use crate::routing::pattern::{Params, PathPattern};

/// Process-wide counter for node keys.
/// Relaxed ordering is enough: keys only need to be unique.
static NODE_KEY_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Stable, globally unique identifier of a route node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeKey(u64);

impl NodeKey {
    /// Generate a fresh key.
    pub fn new() -> Self {
        Self(NODE_KEY_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw counter value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Default for NodeKey {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node-{}", self.0)
    }
}

/// Async source of a node's children, consulted the first time a URL
/// needs to descend below the node.
#[derive(Clone)]
pub struct ChildrenLoader(
    Arc<dyn Fn() -> BoxFuture<'static, Result<Vec<RouteConfig>, Rejection>> + Send + Sync>,
);

impl ChildrenLoader {
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<RouteConfig>, Rejection>> + Send + 'static,
    {
        Self(Arc::new(move || Box::pin(f())))
    }

    pub fn load(&self) -> BoxFuture<'static, Result<Vec<RouteConfig>, Rejection>> {
        (self.0)()
    }
}

impl fmt::Debug for ChildrenLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ChildrenLoader(..)")
    }
}

/// Declarative description of a route and its subtree.
#[derive(Debug, Clone)]
pub struct RouteConfig {
    pub path: String,
    pub data: Value,
    /// Shared values handed to hooks and copied onto every route of the node.
    pub context: Value,
    pub children: Vec<RouteConfig>,
    pub hooks: Hooks,
    pub load_children: Option<ChildrenLoader>,
}

impl RouteConfig {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            data: Value::Object(Default::default()),
            context: Value::Object(Default::default()),
            children: Vec::new(),
            hooks: Hooks::default(),
            load_children: None,
        }
    }

    pub fn with_children(mut self, children: Vec<RouteConfig>) -> Self {
        self.children = children;
        self
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }

    pub fn with_context(mut self, context: Value) -> Self {
        self.context = context;
        self
    }

    pub fn with_hooks(mut self, phase: HookPhase, hooks: Vec<Hook>) -> Self {
        self.hooks.set(phase, hooks);
        self
    }

    pub fn with_loader(mut self, loader: ChildrenLoader) -> Self {
        self.load_children = Some(loader);
        self
    }
}

/// A node of the route tree, stored in the tree's arena.
#[derive(Debug, Clone)]
pub struct RouteNode {
    pub key: NodeKey,
    /// Raw path as configured.
    pub path: String,
    /// Compiled path; `None` for the empty path.
    pub pattern: Option<PathPattern>,
    /// Params captured when the node was last activated.
    pub params: Option<Params>,
    pub data: Value,
    pub context: Value,
    pub is_active: bool,
    pub hooks: Hooks,
    pub(crate) parent: Option<NodeKey>,
    pub(crate) children: Vec<NodeKey>,
    pub(crate) loader: Option<ChildrenLoader>,
}

impl RouteNode {
    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    /// True while the node has a loader that has not been consumed yet.
    pub fn has_pending_children(&self) -> bool {
        self.loader.is_some()
    }

    /// The concrete segment this node covers under its current params.
    pub fn segment(&self) -> String {
        match &self.pattern {
            Some(pattern) => pattern.render(self.params.as_ref().unwrap_or(&Params::new())),
            None => String::new(),
        }
    }
}

/// Partial update applied by `update_node`.
#[derive(Debug, Clone, Default)]
pub struct NodeUpdate {
    pub hooks: Vec<(HookPhase, Vec<Hook>)>,
    pub data: Option<Value>,
    pub context: Option<Value>,
}

impl NodeUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hooks(mut self, phase: HookPhase, hooks: Vec<Hook>) -> Self {
        self.hooks.push((phase, hooks));
        self
    }

    pub fn data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn context(mut self, context: Value) -> Self {
        self.context = Some(context);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_keys_are_unique() {
        let a = NodeKey::new();
        let b = NodeKey::new();
        assert_ne!(a, b);
        assert!(b.as_u64() > a.as_u64());
        assert_eq!(format!("{}", NodeKey(7)), "node-7");
    }

    #[test]
    fn test_config_builder_defaults() {
        let config = RouteConfig::new("todos")
            .with_children(vec![RouteConfig::new(""), RouteConfig::new(":id")]);
        assert_eq!(config.children.len(), 2);
        assert_eq!(config.data, Value::Object(Default::default()));
        assert_eq!(config.hooks.get(HookPhase::CanActivate).len(), 1);
        assert!(config.load_children.is_none());
    }
}
