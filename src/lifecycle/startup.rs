//! Router installation.
//!
//! # Responsibilities
//! - Build the store from route configs
//! - Wire a scheduler (with consumer middleware) to a history adapter
//! - Schedule the history's current location on start
//!
//! # Design Decisions
//! - Fail fast: invalid route paths are reported by `install`
//! - Navigation requests go through history; history events drive the scheduler
//! - `stop` detaches from history before stopping the scheduler

use std::sync::{Arc, Mutex};

use crate::history::{History, HistoryEvent, ListenerId};
use crate::middleware::Middleware;
use crate::navigation::{Location, LocationError, NavigationKind};
use crate::routing::node::RouteConfig;
use crate::routing::tree::TreeError;
use crate::scheduling::Scheduler;
use crate::store::Store;

/// A store, its scheduler and the history feeding it.
pub struct Router {
    store: Arc<Store>,
    scheduler: Arc<Scheduler>,
    history: Arc<dyn History>,
    listener: Mutex<Option<ListenerId>>,
}

impl Router {
    pub fn install(
        history: Arc<dyn History>,
        routes: Vec<RouteConfig>,
        middleware: Middleware,
    ) -> Result<Self, TreeError> {
        let store = Arc::new(Store::with_routes(routes)?);
        let scheduler = Arc::new(Scheduler::new(store.clone(), middleware));
        tracing::debug!(nodes = store.tree().len(), "Router installed");

        Ok(Self {
            store,
            scheduler,
            history,
            listener: Mutex::new(None),
        })
    }

    /// Start the scheduler, follow history and navigate to its current
    /// location. Returns `false` if already started.
    pub fn start(&self) -> bool {
        if !self.scheduler.start() {
            return false;
        }

        let scheduler = self.scheduler.clone();
        let id = self.history.listen(Arc::new(move |event: &HistoryEvent| {
            scheduler.schedule_navigation(event.location.clone(), event.action);
        }));
        *self.listener.lock().expect("router listener mutex poisoned") = Some(id);

        let initial = self.history.location();
        tracing::info!(location = %initial.href(), "Router started");
        self.scheduler.schedule_navigation(initial, NavigationKind::Pop);
        true
    }

    pub fn stop(&self) {
        if let Some(id) = self
            .listener
            .lock()
            .expect("router listener mutex poisoned")
            .take()
        {
            self.history.unlisten(id);
        }
        self.scheduler.stop();
        tracing::info!("Router stopped");
    }

    /// Push `href` onto the history.
    pub fn push(&self, href: &str) -> Result<(), LocationError> {
        self.history.push(Location::parse(href)?);
        Ok(())
    }

    /// Replace the current history entry with `href`.
    pub fn replace(&self, href: &str) -> Result<(), LocationError> {
        self.history.replace(Location::parse(href)?);
        Ok(())
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    pub fn scheduler(&self) -> &Arc<Scheduler> {
        &self.scheduler
    }

    pub fn history(&self) -> &Arc<dyn History> {
        &self.history
    }

    /// Wait until the most recently scheduled navigation has ended.
    pub async fn settled(&self) {
        self.scheduler.settled().await
    }
}

impl Drop for Router {
    fn drop(&mut self) {
        if let Ok(mut listener) = self.listener.lock() {
            if let Some(id) = listener.take() {
                self.history.unlisten(id);
            }
        }
    }
}
