//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Compile every route path
//! - Reject parameter names repeated along one branch
//! - Check the initial location and log level
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Runs before any route is installed

use std::fmt;

use crate::config::schema::{RouteDefinition, RouterConfig};
use crate::navigation::Location;
use crate::routing::pattern::PathPattern;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// One semantic problem, located by a dotted field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let initial = &config.router.initial_location;
    if !initial.starts_with('/') {
        errors.push(ValidationError::new(
            "router.initial_location",
            format!("`{initial}` must start with `/`"),
        ));
    } else if let Err(e) = Location::parse(initial) {
        errors.push(ValidationError::new("router.initial_location", e.to_string()));
    }

    if !LOG_LEVELS.contains(&config.observability.log_level.as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!(
                "`{}` is not one of {}",
                config.observability.log_level,
                LOG_LEVELS.join(", ")
            ),
        ));
    }

    for (i, route) in config.routes.iter().enumerate() {
        validate_route(route, &format!("routes[{i}]"), &mut Vec::new(), &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_route(
    route: &RouteDefinition,
    field: &str,
    ancestors: &mut Vec<String>,
    errors: &mut Vec<ValidationError>,
) {
    let own = match PathPattern::compile(&route.path) {
        Ok(pattern) => pattern
            .map(|p| p.param_names().into_iter().map(str::to_string).collect())
            .unwrap_or_default(),
        Err(e) => {
            errors.push(ValidationError::new(format!("{field}.path"), e.to_string()));
            Vec::new()
        }
    };

    for name in &own {
        if ancestors.contains(name) {
            errors.push(ValidationError::new(
                format!("{field}.path"),
                format!("parameter `{name}` is already bound by an ancestor route"),
            ));
        }
    }

    let depth = ancestors.len();
    ancestors.extend(own);
    for (i, child) in route.children.iter().enumerate() {
        validate_route(child, &format!("{field}.children[{i}]"), ancestors, errors);
    }
    ancestors.truncate(depth);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(path: &str, children: Vec<RouteDefinition>) -> RouteDefinition {
        RouteDefinition {
            path: path.to_string(),
            data: serde_json::Value::Null,
            context: serde_json::Value::Null,
            children,
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&RouterConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = RouterConfig::default();
        config.router.initial_location = "todos".into();
        config.observability.log_level = "loud".into();
        config.routes = vec![
            route("/todos", vec![]),
            route("users/:id", vec![route("posts/:id", vec![])]),
            route("a/:", vec![]),
        ];

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "router.initial_location",
                "observability.log_level",
                "routes[0].path",
                "routes[1].children[0].path",
                "routes[2].path",
            ]
        );
        assert!(errors[3].message.contains("`id`"));
    }

    #[test]
    fn test_same_param_in_sibling_branches_is_fine() {
        let mut config = RouterConfig::default();
        config.routes = vec![
            route("users", vec![route(":id", vec![])]),
            route("posts", vec![route(":id", vec![])]),
        ];
        assert!(validate_config(&config).is_ok());
    }
}
