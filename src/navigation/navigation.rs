//! The Navigation value object.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::navigation::location::Location;

/// How a navigation was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NavigationKind {
    Push,
    Replace,
    Pop,
}

impl fmt::Display for NavigationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NavigationKind::Push => "PUSH",
            NavigationKind::Replace => "REPLACE",
            NavigationKind::Pop => "POP",
        })
    }
}

/// Target of the next navigation.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationDefinition {
    pub kind: NavigationKind,
    pub to: Location,
}

/// One proposed transition, immutable once created.
#[derive(Debug, Clone)]
pub struct Navigation {
    /// Correlates log lines of one navigation.
    pub id: Uuid,
    pub kind: NavigationKind,
    /// -1 for the initial navigation, then +1 per scheduled navigation.
    pub sequence: i64,
    pub to: Option<Location>,
    pub from: Option<Location>,
    /// The navigation this one was derived from, without its own history.
    pub previous: Option<Arc<Navigation>>,
    pub created_at: Instant,
}

impl Navigation {
    /// The navigation a scheduler starts from.
    pub fn initial() -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: NavigationKind::Pop,
            sequence: -1,
            to: None,
            from: None,
            previous: None,
            created_at: Instant::now(),
        }
    }

    /// Derive the next navigation: `sequence + 1`, `from` is our `to`.
    pub fn next(&self, definition: NavigationDefinition) -> Self {
        // Only one level of back-reference is kept so chains stay bounded.
        let previous = Self {
            previous: None,
            ..self.clone()
        };
        Self {
            id: Uuid::new_v4(),
            kind: definition.kind,
            sequence: self.sequence + 1,
            to: Some(definition.to),
            from: self.to.clone(),
            previous: Some(Arc::new(previous)),
            created_at: Instant::now(),
        }
    }

    /// Same navigation with a rewritten target; identity and sequence kept.
    pub fn with_to(&self, to: Location) -> Self {
        Self {
            to: Some(to),
            ..self.clone()
        }
    }

    pub fn pathname(&self) -> Option<&str> {
        self.to.as_ref().map(|l| l.pathname.as_str())
    }
}

impl fmt::Display for Navigation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} {}",
            self.sequence,
            self.kind,
            self.to.as_ref().map(Location::href).unwrap_or_else(|| "-".into())
        )
    }
}
