//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route declaration (at install):
//!     RouteConfig[]
//!     → pattern.rs (compile paths)
//!     → tree.rs (build nodes in the arena)
//!
//! Navigation target:
//!     pathname
//!     → matcher.rs (depth-first search from the root)
//!     → route.rs (one Route per matched node)
//!     → Return: Complete(routes), Pending(leaf) or NoMatch
//! ```
//!
//! # Design Decisions
//! - Nodes live in one arena keyed by `NodeKey`; routes refer to nodes by key
//! - Matching is synchronous; lazy children surface as `Pending`
//! - First child subtree that consumes the URL wins, in declaration order
//! - Every hook phase has at least one hook, so execution needs no fallbacks

pub mod hooks;
pub mod matcher;
pub mod node;
pub mod pattern;
pub mod route;
pub mod tree;

pub use hooks::{Hook, HookContext, HookPhase, Hooks, Rejection};
pub use matcher::{find_path_from_root, resolve, PathMatch, Resolution};
pub use node::{ChildrenLoader, NodeKey, NodeUpdate, RouteConfig, RouteNode};
pub use pattern::{Params, PathPattern, PatternError};
pub use route::{create_route, create_route_key, Route};
pub use tree::{RouteTree, TreeError};
