//! Navigation values.
//!
//! # Data Flow
//! ```text
//! href ──▶ Location::parse ──▶ Navigation::next ──▶ Event::NavigationStart
//!                                                        │
//!                     NavigationEnd / NavigationCancelled ◀┘
//! ```
//!
//! # Design Decisions
//! - Navigations are immutable and shared as `Arc<Navigation>`
//! - `sequence` alone decides which navigation is current
//! - Events are a closed enum; middleware rewrites them by value

pub mod error;
pub mod event;
pub mod location;
#[allow(clippy::module_inception)]
pub mod navigation;

pub use error::NavigationError;
pub use event::{Event, EventKind};
pub use location::{Location, LocationError, Query};
pub use navigation::{Navigation, NavigationDefinition, NavigationKind};
