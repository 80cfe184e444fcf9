//! Built-in query-string middleware.

use std::sync::Arc;

use crate::middleware::chain::Middleware;
use crate::navigation::location::parse_query;
use crate::navigation::Event;

/// Parses `to.search` into `to.query` on every event that has a target.
/// `search` itself is left as is.
pub fn with_query_middleware() -> Middleware {
    Middleware::new(|event: Event| {
        let Some(to) = event.navigation().to.as_ref() else {
            return Some(event);
        };
        let query = parse_query(&to.search);
        if query == to.query {
            return Some(event);
        }

        let mut to = to.clone();
        to.query = query;
        let navigation = Arc::new(event.navigation().with_to(to));
        Some(event.with_navigation(navigation))
    })
}
