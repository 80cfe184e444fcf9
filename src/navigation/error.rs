//! Navigation failures recorded in the store.

use std::sync::Arc;

use thiserror::Error;

use crate::navigation::navigation::Navigation;
use crate::routing::hooks::{HookPhase, Rejection};
use crate::routing::node::NodeKey;

/// Why a navigation did not commit.
#[derive(Debug, Clone, Error)]
pub enum NavigationError {
    /// No node chain consumes the full URL.
    #[error("No match for {url}")]
    NoMatch { url: String },

    /// A guard hook rejected the transition.
    #[error("Transition to {target} blocked by {phase} of {node} (`{path}`): {reason}")]
    TransitionFailure {
        node: NodeKey,
        path: String,
        phase: HookPhase,
        target: String,
        navigation: Arc<Navigation>,
        reason: Rejection,
    },

    /// An inconsistent navigation reached the executor.
    #[error("Invalid navigation: {0}")]
    InvalidNavigation(String),
}

impl NavigationError {
    /// Node that blocked the transition, if a guard did.
    pub fn blocking_node(&self) -> Option<NodeKey> {
        match self {
            NavigationError::TransitionFailure { node, .. } => Some(*node),
            _ => None,
        }
    }

    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            NavigationError::NoMatch { .. } => "no_match",
            NavigationError::TransitionFailure { .. } => "transition_failure",
            NavigationError::InvalidNavigation(_) => "invalid_navigation",
        }
    }
}
