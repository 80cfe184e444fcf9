//! Tree-structured router with an async navigation engine.

pub mod config;
pub mod history;
pub mod lifecycle;
pub mod middleware;
pub mod navigation;
pub mod observability;
pub mod routing;
pub mod scheduling;
pub mod store;

pub use config::schema::RouterConfig;
pub use history::{History, MemoryHistory};
pub use lifecycle::Router;
pub use middleware::Middleware;
pub use navigation::{Event, Location, Navigation, NavigationError, NavigationKind};
pub use routing::{Hook, HookPhase, Rejection, RouteConfig};
pub use scheduling::Scheduler;
pub use store::Store;
