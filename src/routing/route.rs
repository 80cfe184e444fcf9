//! Per-navigation route values derived from matched nodes.
//!
//! A route snapshots the node's `data` and `context` at match time. There is
//! no per-route transition state: progress of a navigation is observable
//! through `Event`s and the store, so routes stay plain values.

use serde::Serialize;
use serde_json::Value;

use crate::navigation::location::{serialize_query, Query};
use crate::routing::node::{NodeKey, RouteNode};
use crate::routing::pattern::Params;

/// One matched segment of a navigation target.
///
/// Holds the node's key, not the node: the tree owns nodes, routes only
/// point at them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    /// Identity used to diff chains across navigations.
    pub key: String,
    pub node: NodeKey,
    pub path: String,
    pub segment: String,
    pub params: Params,
    pub query: Query,
    pub data: Value,
    pub context: Value,
}

/// Derive a route for `node` as matched by `segment`.
pub fn create_route(node: &RouteNode, segment: impl Into<String>, params: Params, query: Query) -> Route {
    let segment = segment.into();
    Route {
        key: create_route_key(node.key, &segment, &query),
        node: node.key,
        path: node.path.clone(),
        segment,
        params,
        query,
        data: node.data.clone(),
        context: node.context.clone(),
    }
}

/// Deterministic key from node key, matched segment and query.
///
/// Same node under different params or query yields a different key, so the
/// executor treats it as leave-then-enter.
pub fn create_route_key(node: NodeKey, segment: &str, query: &Query) -> String {
    if query.is_empty() {
        format!("{node}:/{segment}")
    } else {
        format!("{node}:/{segment}?{}", serialize_query(query))
    }
}
