//! Event middleware.
//!
//! # Data Flow
//! ```text
//! dispatch(event)
//!     → with_query_middleware (always first)
//!     → consumer middleware, in the order given at construction
//!     → Some(event): becomes the current event
//!     → None: dropped, nothing else runs
//! ```
//!
//! # Design Decisions
//! - Middleware is a plain `Event -> Option<Event>` function, no trait objects
//!   with lifecycle methods
//! - Transforms are synchronous; async work belongs to event processing

pub mod chain;
pub mod query;
pub mod transform_config;

pub use chain::{Middleware, MiddlewareFn};
pub use query::with_query_middleware;
pub use transform_config::transform_config;
