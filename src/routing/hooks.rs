//! Lifecycle hook types.
//!
//! Every phase holds an ordered list of async functions sharing one
//! capability type, [`Hook`]. Nodes built without explicit hooks get a single
//! [`Hook::always_continue`] per phase, so the executor never special-cases
//! missing hooks.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use serde_json::Value;
use thiserror::Error;

use crate::navigation::Navigation;
use crate::routing::node::NodeKey;
use crate::routing::pattern::Params;

/// Reason a hook refused a transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("hook rejected: {reason}")]
pub struct Rejection {
    pub reason: String,
}

impl Rejection {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Default for Rejection {
    fn default() -> Self {
        Self::new("no reason given")
    }
}

/// Lifecycle phases a node can hook into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookPhase {
    CanActivate,
    OnEnter,
    OnLeave,
    CanDeactivate,
    OnError,
}

impl HookPhase {
    /// Guards can block a transition; lifecycle callbacks cannot.
    pub fn is_guard(self) -> bool {
        matches!(self, HookPhase::CanActivate | HookPhase::CanDeactivate)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HookPhase::CanActivate => "canActivate",
            HookPhase::OnEnter => "onEnter",
            HookPhase::OnLeave => "onLeave",
            HookPhase::CanDeactivate => "canDeactivate",
            HookPhase::OnError => "onError",
        }
    }
}

impl fmt::Display for HookPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a hook is told about the node it runs for.
#[derive(Debug, Clone)]
pub struct HookContext {
    pub node: NodeKey,
    pub path: String,
    pub params: Params,
    pub data: Value,
    pub context: Value,
    pub phase: HookPhase,
    pub navigation: Arc<Navigation>,
}

pub type HookFuture = BoxFuture<'static, Result<(), Rejection>>;

/// An async guard or lifecycle callback.
#[derive(Clone)]
pub struct Hook(Arc<dyn Fn(HookContext) -> HookFuture + Send + Sync>);

impl Hook {
    /// Wrap an async function as a hook.
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(HookContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), Rejection>> + Send + 'static,
    {
        Self(Arc::new(move |ctx| Box::pin(f(ctx))))
    }

    /// The default hook: resolves immediately and never blocks.
    pub fn always_continue() -> Self {
        Self::new(|_| async { Ok(()) })
    }

    /// A hook that always rejects with the given reason.
    pub fn reject(reason: impl Into<String>) -> Self {
        let rejection = Rejection::new(reason);
        Self::new(move |_| {
            let rejection = rejection.clone();
            async move { Err(rejection) }
        })
    }

    pub fn call(&self, ctx: HookContext) -> HookFuture {
        (self.0)(ctx)
    }
}

impl fmt::Debug for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Hook(..)")
    }
}

/// Per-phase hook lists of a route node.
#[derive(Debug, Clone)]
pub struct Hooks {
    pub can_activate: Vec<Hook>,
    pub on_enter: Vec<Hook>,
    pub on_leave: Vec<Hook>,
    pub can_deactivate: Vec<Hook>,
    pub on_error: Vec<Hook>,
}

impl Default for Hooks {
    fn default() -> Self {
        Self {
            can_activate: vec![Hook::always_continue()],
            on_enter: vec![Hook::always_continue()],
            on_leave: vec![Hook::always_continue()],
            can_deactivate: vec![Hook::always_continue()],
            on_error: Vec::new(),
        }
    }
}

impl Hooks {
    pub fn get(&self, phase: HookPhase) -> &[Hook] {
        match phase {
            HookPhase::CanActivate => &self.can_activate,
            HookPhase::OnEnter => &self.on_enter,
            HookPhase::OnLeave => &self.on_leave,
            HookPhase::CanDeactivate => &self.can_deactivate,
            HookPhase::OnError => &self.on_error,
        }
    }

    /// Replace the hooks of one phase.
    pub fn set(&mut self, phase: HookPhase, hooks: Vec<Hook>) {
        let slot = match phase {
            HookPhase::CanActivate => &mut self.can_activate,
            HookPhase::OnEnter => &mut self.on_enter,
            HookPhase::OnLeave => &mut self.on_leave,
            HookPhase::CanDeactivate => &mut self.can_deactivate,
            HookPhase::OnError => &mut self.on_error,
        };
        *slot = hooks;
    }
}
