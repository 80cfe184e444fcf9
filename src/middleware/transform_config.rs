//! Rewriting lazily loaded route configs.

use std::sync::Arc;

use crate::middleware::chain::Middleware;
use crate::navigation::Event;
use crate::routing::node::RouteConfig;

/// Middleware applying `f` to every config carried by a `ChildrenLoad`
/// event, depth first: `f` sees a config before its (rewritten) children.
pub fn transform_config<F>(f: F) -> Middleware
where
    F: Fn(RouteConfig) -> RouteConfig + Send + Sync + 'static,
{
    let f = Arc::new(f);
    Middleware::new(move |event: Event| match event {
        Event::ChildrenLoad {
            navigation,
            leaf,
            partial_path,
            children,
        } => Some(Event::ChildrenLoad {
            navigation,
            leaf,
            partial_path,
            children: children.into_iter().map(|c| rewrite(f.as_ref(), c)).collect(),
        }),
        other => Some(other),
    })
}

fn rewrite<F>(f: &F, config: RouteConfig) -> RouteConfig
where
    F: Fn(RouteConfig) -> RouteConfig,
{
    let mut config = f(config);
    let children = std::mem::take(&mut config.children);
    config.children = children.into_iter().map(|c| rewrite(f, c)).collect();
    config
}
