//! Configuration schema definitions.
//!
//! Routes are declared recursively; hooks cannot be expressed in a file and
//! are attached in code with `Store::update_node`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::routing::node::RouteConfig;

/// Root configuration of a router.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouterConfig {
    pub router: RouterSettings,

    pub observability: ObservabilityConfig,

    /// Children of the root node.
    pub routes: Vec<RouteDefinition>,
}

impl RouterConfig {
    /// Route configs for the root node, with default hooks.
    pub fn route_configs(&self) -> Vec<RouteConfig> {
        self.routes.iter().map(RouteDefinition::to_route_config).collect()
    }
}

/// Router behaviour.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RouterSettings {
    /// Href the in-memory history starts at.
    pub initial_location: String,
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self {
            initial_location: "/".to_string(),
        }
    }
}

/// Logging and metrics.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins.
    pub log_level: String,

    /// Record metrics through the `metrics` facade.
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
        }
    }
}

/// One route and its subtree.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteDefinition {
    /// Path relative to the parent; empty for index / pass-through routes.
    #[serde(default)]
    pub path: String,

    /// Opaque payload handed to consumers.
    #[serde(default = "empty_object")]
    pub data: Value,

    /// Values shared with the route's hooks.
    #[serde(default = "empty_object")]
    pub context: Value,

    #[serde(default)]
    pub children: Vec<RouteDefinition>,
}

impl RouteDefinition {
    pub fn to_route_config(&self) -> RouteConfig {
        RouteConfig::new(self.path.clone())
            .with_data(self.data.clone())
            .with_context(self.context.clone())
            .with_children(self.children.iter().map(Self::to_route_config).collect())
    }
}

fn empty_object() -> Value {
    Value::Object(Default::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_routes() {
        let config: RouterConfig = toml::from_str(
            r#"
            [router]
            initial_location = "/todos"

            [[routes]]
            path = ""

            [[routes]]
            path = "todos"
            data = { title = "Todos" }
            context = { section = "work" }

            [[routes.children]]
            path = ""

            [[routes.children]]
            path = ":id"
            "#,
        )
        .unwrap();

        assert_eq!(config.router.initial_location, "/todos");
        assert_eq!(config.observability.log_level, "info");
        assert_eq!(config.routes.len(), 2);
        assert_eq!(config.routes[1].data["title"], "Todos");
        assert_eq!(config.routes[1].children.len(), 2);

        let routes = config.route_configs();
        assert_eq!(routes[1].children[1].path, ":id");
        assert_eq!(routes[0].data, empty_object());
        assert_eq!(routes[1].context["section"], "work");
        assert_eq!(routes[0].context, empty_object());
    }

    #[test]
    fn test_defaults() {
        let config: RouterConfig = toml::from_str("").unwrap();
        assert_eq!(config.router.initial_location, "/");
        assert!(config.observability.metrics_enabled);
        assert!(config.routes.is_empty());
    }
}
