//! Arena-backed route tree.
//!
//! # Responsibilities
//! - Own every `RouteNode`, indexed by `NodeKey`
//! - Build subtrees from `RouteConfig`
//! - Apply controlled mutations (replace children, update node, activation flags)
//!
//! # Design Decisions
//! - Nodes reference parent and children by key, never by pointer
//! - Shape changes only through `replace_children` and `append_children`;
//!   values through `update_node`
//! - Accessors return clones so no map guard outlives a call (hooks are awaited
//!   outside the arena)

use dashmap::DashMap;
use thiserror::Error;

use crate::routing::hooks::Hooks;
use crate::routing::node::{ChildrenLoader, NodeKey, NodeUpdate, RouteConfig, RouteNode};
use crate::routing::pattern::{Params, PathPattern, PatternError};

/// Errors from tree mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("unknown route node {0}")]
    UnknownNode(NodeKey),

    #[error("invalid route path: {0}")]
    Pattern(#[from] PatternError),
}

/// The route tree. The root always has the empty path.
#[derive(Debug)]
pub struct RouteTree {
    root: NodeKey,
    nodes: DashMap<NodeKey, RouteNode>,
}

impl RouteTree {
    /// Create a tree holding only the root node.
    pub fn new() -> Self {
        let root = NodeKey::new();
        let nodes = DashMap::new();
        nodes.insert(
            root,
            RouteNode {
                key: root,
                path: String::new(),
                pattern: None,
                params: None,
                data: serde_json::Value::Object(Default::default()),
                context: serde_json::Value::Object(Default::default()),
                is_active: false,
                hooks: Hooks::default(),
                parent: None,
                children: Vec::new(),
                loader: None,
            },
        );
        Self { root, nodes }
    }

    /// Key of the root node.
    pub fn root(&self) -> NodeKey {
        self.root
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `key` is still in the arena.
    pub fn contains(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(&key)
    }

    /// Snapshot of a node.
    pub fn get(&self, key: NodeKey) -> Option<RouteNode> {
        self.nodes.get(&key).map(|r| r.value().clone())
    }

    /// Child keys of `key`, in match order.
    pub fn children(&self, key: NodeKey) -> Vec<NodeKey> {
        self.nodes
            .get(&key)
            .map(|r| r.children.clone())
            .unwrap_or_default()
    }

    /// The `index`-th child of `parent`.
    pub fn child(&self, parent: NodeKey, index: usize) -> Option<NodeKey> {
        self.nodes
            .get(&parent)
            .and_then(|r| r.children.get(index).copied())
    }

    /// Walk down from the root following child paths, first match per level.
    pub fn find_by_paths(&self, paths: &[&str]) -> Option<NodeKey> {
        paths.iter().try_fold(self.root, |current, wanted| {
            self.children(current)
                .into_iter()
                .find(|child| self.nodes.get(child).is_some_and(|n| n.path == *wanted))
        })
    }

    /// Replace all children of `parent` with subtrees built from `configs`.
    ///
    /// The old subtrees are removed from the arena. On error nothing changes.
    pub fn replace_children(
        &self,
        parent: NodeKey,
        configs: Vec<RouteConfig>,
    ) -> Result<Vec<NodeKey>, TreeError> {
        let new_children = self.build_all(parent, configs)?;

        let old_children = match self.nodes.get_mut(&parent) {
            Some(mut node) => std::mem::replace(&mut node.children, new_children.clone()),
            None => return Err(TreeError::UnknownNode(parent)),
        };
        for child in old_children {
            self.remove_subtree(child);
        }

        Ok(new_children)
    }

    /// Add subtrees built from `configs` after the existing children of
    /// `parent`. Existing children keep their keys. On error nothing changes.
    pub fn append_children(
        &self,
        parent: NodeKey,
        configs: Vec<RouteConfig>,
    ) -> Result<Vec<NodeKey>, TreeError> {
        let new_children = self.build_all(parent, configs)?;

        match self.nodes.get_mut(&parent) {
            Some(mut node) => node.children.extend(new_children.iter().copied()),
            None => {
                for key in &new_children {
                    self.remove_subtree(*key);
                }
                return Err(TreeError::UnknownNode(parent));
            }
        }

        Ok(new_children)
    }

    /// Apply a partial update to one node.
    pub fn update_node(&self, key: NodeKey, update: NodeUpdate) -> Result<(), TreeError> {
        let mut node = self.nodes.get_mut(&key).ok_or(TreeError::UnknownNode(key))?;
        for (phase, hooks) in update.hooks {
            node.hooks.set(phase, hooks);
        }
        if let Some(data) = update.data {
            node.data = data;
        }
        if let Some(context) = update.context {
            node.context = context;
        }
        Ok(())
    }

    pub(crate) fn set_active(&self, key: NodeKey, params: Params) -> Result<(), TreeError> {
        let mut node = self.nodes.get_mut(&key).ok_or(TreeError::UnknownNode(key))?;
        node.is_active = true;
        node.params = Some(params);
        Ok(())
    }

    /// Clear the active flag. Missing nodes are ignored: they may have been
    /// removed by a `replace_children` while active.
    pub(crate) fn set_inactive(&self, key: NodeKey) {
        if let Some(mut node) = self.nodes.get_mut(&key) {
            node.is_active = false;
        }
    }

    pub(crate) fn loader(&self, key: NodeKey) -> Option<ChildrenLoader> {
        self.nodes.get(&key).and_then(|r| r.loader.clone())
    }

    /// Install loaded children under `parent` and consume its loader.
    ///
    /// Loaded children go after the static ones, so nodes on the active chain
    /// stay in the arena and keep their guards.
    pub(crate) fn install_loaded_children(
        &self,
        parent: NodeKey,
        configs: Vec<RouteConfig>,
    ) -> Result<Vec<NodeKey>, TreeError> {
        let keys = self.append_children(parent, configs)?;
        if let Some(mut node) = self.nodes.get_mut(&parent) {
            node.loader = None;
        }
        Ok(keys)
    }

    /// Build one subtree per config under `parent`, without linking them.
    /// On error every node inserted so far is removed again.
    fn build_all(
        &self,
        parent: NodeKey,
        configs: Vec<RouteConfig>,
    ) -> Result<Vec<NodeKey>, TreeError> {
        if !self.contains(parent) {
            return Err(TreeError::UnknownNode(parent));
        }

        let mut inserted = Vec::new();
        let mut built = Vec::with_capacity(configs.len());
        for config in configs {
            match self.build(parent, config, &mut inserted) {
                Ok(key) => built.push(key),
                Err(e) => {
                    for key in inserted {
                        self.nodes.remove(&key);
                    }
                    return Err(e.into());
                }
            }
        }
        Ok(built)
    }

    fn build(
        &self,
        parent: NodeKey,
        config: RouteConfig,
        inserted: &mut Vec<NodeKey>,
    ) -> Result<NodeKey, PatternError> {
        let pattern = PathPattern::compile(&config.path)?;
        let key = NodeKey::new();
        self.nodes.insert(
            key,
            RouteNode {
                key,
                path: config.path,
                pattern,
                params: None,
                data: config.data,
                context: config.context,
                is_active: false,
                hooks: config.hooks,
                parent: Some(parent),
                children: Vec::new(),
                loader: config.load_children,
            },
        );
        inserted.push(key);

        let mut children = Vec::with_capacity(config.children.len());
        for child in config.children {
            children.push(self.build(key, child, inserted)?);
        }
        if let Some(mut node) = self.nodes.get_mut(&key) {
            node.children = children;
        }
        Ok(key)
    }

    fn remove_subtree(&self, key: NodeKey) {
        let Some((_, node)) = self.nodes.remove(&key) else {
            return;
        };
        if node.is_active {
            tracing::warn!(node = %key, path = %node.path, "Removing an active route node");
        }
        for child in node.children {
            self.remove_subtree(child);
        }
    }
}

impl Default for RouteTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::hooks::{Hook, HookPhase};

    fn todos() -> Vec<RouteConfig> {
        vec![
            RouteConfig::new(""),
            RouteConfig::new("todos")
                .with_children(vec![RouteConfig::new(""), RouteConfig::new(":id")]),
        ]
    }

    #[test]
    fn test_build_and_lookup() {
        let tree = RouteTree::new();
        let children = tree.replace_children(tree.root(), todos()).unwrap();
        assert_eq!(children.len(), 2);
        assert_eq!(tree.len(), 5);

        let id = tree.find_by_paths(&["todos", ":id"]).unwrap();
        let node = tree.get(id).unwrap();
        assert_eq!(node.path, ":id");
        assert_eq!(node.parent(), tree.child(tree.root(), 1));
        assert!(tree.find_by_paths(&["nope"]).is_none());
    }

    #[test]
    fn test_replace_children_drops_old_subtree() {
        let tree = RouteTree::new();
        tree.replace_children(tree.root(), todos()).unwrap();
        let old = tree.find_by_paths(&["todos", ":id"]).unwrap();

        tree.replace_children(tree.root(), vec![RouteConfig::new("about")]).unwrap();
        assert!(!tree.contains(old));
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_replace_children_is_atomic_on_error() {
        let tree = RouteTree::new();
        tree.replace_children(tree.root(), todos()).unwrap();

        let err = tree
            .replace_children(
                tree.root(),
                vec![RouteConfig::new("ok"), RouteConfig::new("bad/:")],
            )
            .unwrap_err();
        assert!(matches!(err, TreeError::Pattern(PatternError::EmptyParam(_))));
        assert_eq!(tree.len(), 5);
        assert!(tree.find_by_paths(&["todos"]).is_some());
    }

    #[test]
    fn test_loaded_children_are_appended() {
        let tree = RouteTree::new();
        let loader = ChildrenLoader::new(|| async { Ok(Vec::new()) });
        tree.replace_children(
            tree.root(),
            vec![RouteConfig::new("p")
                .with_children(vec![RouteConfig::new("x")])
                .with_loader(loader)],
        )
        .unwrap();
        let p = tree.find_by_paths(&["p"]).unwrap();
        let x = tree.find_by_paths(&["p", "x"]).unwrap();

        let added = tree
            .install_loaded_children(p, vec![RouteConfig::new("y")])
            .unwrap();
        assert_eq!(added.len(), 1);
        assert!(tree.contains(x));
        assert_eq!(tree.children(p), vec![x, added[0]]);
        assert!(tree.loader(p).is_none());

        let err = tree
            .append_children(p, vec![RouteConfig::new("bad/:")])
            .unwrap_err();
        assert!(matches!(err, TreeError::Pattern(_)));
        assert_eq!(tree.children(p).len(), 2);
    }

    #[test]
    fn test_update_node() {
        let tree = RouteTree::new();
        tree.replace_children(tree.root(), todos()).unwrap();
        let key = tree.find_by_paths(&["todos"]).unwrap();

        tree.update_node(
            key,
            NodeUpdate::new()
                .hooks(HookPhase::CanActivate, vec![Hook::reject("no"), Hook::reject("no")])
                .data(serde_json::json!({ "title": "Todos" })),
        )
        .unwrap();

        let node = tree.get(key).unwrap();
        assert_eq!(node.hooks.get(HookPhase::CanActivate).len(), 2);
        assert_eq!(node.data["title"], "Todos");

        let missing = NodeKey::new();
        assert_eq!(
            tree.update_node(missing, NodeUpdate::new()),
            Err(TreeError::UnknownNode(missing))
        );
    }
}
