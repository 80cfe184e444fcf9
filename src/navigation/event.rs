//! Events flowing through the middleware chain and the scheduler.

use std::fmt;
use std::sync::Arc;

use crate::navigation::error::NavigationError;
use crate::navigation::navigation::Navigation;
use crate::routing::node::{NodeKey, RouteConfig};
use crate::routing::route::Route;

/// Discriminant of an [`Event`], for logs and metrics labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Empty,
    NavigationStart,
    ChildrenLoad,
    NavigationCancelled,
    NavigationEnd,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Empty => "EMPTY",
            EventKind::NavigationStart => "NAVIGATION_START",
            EventKind::ChildrenLoad => "CHILDREN_LOAD",
            EventKind::NavigationCancelled => "NAVIGATION_CANCELLED",
            EventKind::NavigationEnd => "NAVIGATION_END",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One step of a navigation's life.
#[derive(Debug, Clone)]
pub enum Event {
    /// Placeholder before anything was scheduled.
    Empty { navigation: Arc<Navigation> },

    NavigationStart { navigation: Arc<Navigation> },

    /// Children of `leaf` were loaded and must be installed before matching
    /// can continue. `children` may be rewritten by middleware.
    ChildrenLoad {
        navigation: Arc<Navigation>,
        leaf: NodeKey,
        partial_path: Vec<Route>,
        children: Vec<RouteConfig>,
    },

    /// Terminal. `error` is `None` when a newer navigation superseded this one.
    NavigationCancelled {
        navigation: Arc<Navigation>,
        error: Option<NavigationError>,
    },

    /// Terminal. The transition committed `routes`.
    NavigationEnd {
        navigation: Arc<Navigation>,
        routes: Vec<Route>,
    },
}

impl Event {
    pub fn empty() -> Self {
        Event::Empty {
            navigation: Arc::new(Navigation::initial()),
        }
    }

    pub fn navigation(&self) -> &Arc<Navigation> {
        match self {
            Event::Empty { navigation }
            | Event::NavigationStart { navigation }
            | Event::ChildrenLoad { navigation, .. }
            | Event::NavigationCancelled { navigation, .. }
            | Event::NavigationEnd { navigation, .. } => navigation,
        }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            Event::Empty { .. } => EventKind::Empty,
            Event::NavigationStart { .. } => EventKind::NavigationStart,
            Event::ChildrenLoad { .. } => EventKind::ChildrenLoad,
            Event::NavigationCancelled { .. } => EventKind::NavigationCancelled,
            Event::NavigationEnd { .. } => EventKind::NavigationEnd,
        }
    }

    /// True for events that end a navigation.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Event::NavigationCancelled { .. } | Event::NavigationEnd { .. }
        )
    }

    /// Same event carrying a different navigation.
    pub fn with_navigation(self, navigation: Arc<Navigation>) -> Self {
        match self {
            Event::Empty { .. } => Event::Empty { navigation },
            Event::NavigationStart { .. } => Event::NavigationStart { navigation },
            Event::ChildrenLoad {
                leaf,
                partial_path,
                children,
                ..
            } => Event::ChildrenLoad {
                navigation,
                leaf,
                partial_path,
                children,
            },
            Event::NavigationCancelled { error, .. } => {
                Event::NavigationCancelled { navigation, error }
            }
            Event::NavigationEnd { routes, .. } => Event::NavigationEnd { navigation, routes },
        }
    }

    /// Cancellation of `navigation` because a newer one took over.
    pub fn superseded(navigation: Arc<Navigation>) -> Self {
        Event::NavigationCancelled {
            navigation,
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::{Location, NavigationDefinition, NavigationKind};

    #[test]
    fn test_event_accessors() {
        let empty = Event::empty();
        assert_eq!(empty.kind(), EventKind::Empty);
        assert_eq!(empty.navigation().sequence, -1);
        assert!(!empty.is_terminal());

        let navigation = Arc::new(Navigation::initial().next(NavigationDefinition {
            kind: NavigationKind::Push,
            to: Location::new("/a"),
        }));
        let start = Event::NavigationStart {
            navigation: navigation.clone(),
        };
        assert_eq!(start.kind().to_string(), "NAVIGATION_START");

        let cancelled = Event::superseded(navigation.clone());
        assert!(cancelled.is_terminal());
        assert_eq!(cancelled.navigation().sequence, 0);

        let rewritten = start.with_navigation(Arc::new(navigation.with_to(Location::new("/b"))));
        assert_eq!(rewritten.kind(), EventKind::NavigationStart);
        assert_eq!(rewritten.navigation().pathname(), Some("/b"));
    }
}
