//! Navigation scheduler.
//!
//! # Responsibilities
//! - Turn navigation requests into `NavigationStart` events
//! - Run every dispatched event through the middleware chain
//! - Drive non-terminal events through `process_event` on a reaction task
//! - Replace results of superseded navigations with `NavigationCancelled`
//!
//! # Design Decisions
//! - The current event is a `watch` cell (last write wins); the reaction task
//!   is fed by an unbounded queue so no event is skipped
//! - Several navigations may be in flight; only sequence numbers decide
//! - `settled` tracks the highest sequence that reached a terminal event

use std::sync::{Arc, Mutex};

use futures_util::stream::{FuturesUnordered, StreamExt};
use tokio::sync::{broadcast, mpsc, watch};

use crate::lifecycle::shutdown::Shutdown;
use crate::middleware::{with_query_middleware, Middleware};
use crate::navigation::{Event, Location, NavigationDefinition, NavigationError, NavigationKind};
use crate::observability::metrics;
use crate::scheduling::current::CurrentNavigation;
use crate::scheduling::process::process_event;
use crate::store::Store;

/// State shared between the scheduler handle and its reaction task.
struct Dispatcher {
    store: Arc<Store>,
    current: Arc<CurrentNavigation>,
    middleware: Middleware,
    current_event: watch::Sender<Event>,
    queue: mpsc::UnboundedSender<Event>,
    settled: watch::Sender<i64>,
}

impl Dispatcher {
    fn dispatch(&self, event: Event) -> bool {
        let kind = event.kind();
        let navigation = event.navigation().clone();

        let Some(event) = self.middleware.fold(event) else {
            tracing::debug!(
                navigation_id = %navigation.id,
                sequence = navigation.sequence,
                event = %kind,
                "Event dropped by middleware"
            );
            // Nothing else will happen for this navigation.
            self.settle(navigation.sequence);
            return false;
        };

        tracing::debug!(
            navigation_id = %event.navigation().id,
            sequence = event.navigation().sequence,
            event = %event.kind(),
            "Dispatching event"
        );

        if event.is_terminal() {
            self.finish(&event);
        } else if !matches!(event, Event::Empty { .. }) {
            // The receiver lives as long as the reaction task; after stop the
            // event only updates the cell.
            let _ = self.queue.send(event.clone());
        }
        self.current_event.send_replace(event);
        true
    }

    fn finish(&self, event: &Event) {
        let navigation = event.navigation();
        let outcome = match event {
            Event::NavigationEnd { routes, .. } => {
                tracing::info!(
                    navigation_id = %navigation.id,
                    sequence = navigation.sequence,
                    kind = %navigation.kind,
                    to = %navigation.to.as_ref().map(Location::href).unwrap_or_default(),
                    routes = routes.len(),
                    "Navigation committed"
                );
                "end"
            }
            Event::NavigationCancelled { error: Some(_), .. } => "cancelled",
            _ => {
                tracing::debug!(
                    navigation_id = %navigation.id,
                    sequence = navigation.sequence,
                    "Navigation superseded"
                );
                "superseded"
            }
        };
        metrics::record_navigation(outcome, navigation.created_at);
        self.settle(navigation.sequence);
    }

    fn settle(&self, sequence: i64) {
        self.settled.send_if_modified(|settled| {
            if sequence > *settled {
                *settled = sequence;
                true
            } else {
                false
            }
        });
    }
}

/// Sequences navigations for one store.
pub struct Scheduler {
    dispatcher: Arc<Dispatcher>,
    receiver: Mutex<Option<mpsc::UnboundedReceiver<Event>>>,
    shutdown: Shutdown,
}

impl Scheduler {
    /// Scheduler over `store`; `middleware` runs after the built-in query parsing.
    pub fn new(store: Arc<Store>, middleware: Middleware) -> Self {
        let (queue, receiver) = mpsc::unbounded_channel();
        let (current_event, _) = watch::channel(Event::empty());
        let (settled, _) = watch::channel(-1);

        Self {
            dispatcher: Arc::new(Dispatcher {
                store,
                current: Arc::new(CurrentNavigation::new()),
                middleware: with_query_middleware().concat(middleware),
                current_event,
                queue,
                settled,
            }),
            receiver: Mutex::new(Some(receiver)),
            shutdown: Shutdown::new(),
        }
    }

    /// Spawn the reaction task. Returns `false` if it was already started.
    pub fn start(&self) -> bool {
        let Some(receiver) = self
            .receiver
            .lock()
            .expect("scheduler receiver mutex poisoned")
            .take()
        else {
            return false;
        };

        let shutdown = self.shutdown.subscribe();
        tokio::spawn(react(self.dispatcher.clone(), receiver, shutdown));
        tracing::debug!("Scheduler started");
        true
    }

    /// Stop the reaction task. In-flight processing is dropped.
    pub fn stop(&self) {
        if self.shutdown.trigger() > 0 {
            tracing::debug!("Scheduler stopped");
        }
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.dispatcher.store
    }

    pub fn current(&self) -> &CurrentNavigation {
        &self.dispatcher.current
    }

    /// Schedule a navigation to `to`.
    ///
    /// Returns `false` without doing anything when `to` is the committed
    /// location (same pathname and search). Never fails: outcomes show up
    /// in the store.
    pub fn schedule_navigation(&self, to: Location, kind: NavigationKind) -> bool {
        let committed = self.dispatcher.store.location();
        if committed.as_ref().is_some_and(|l| l.same_target(&to)) {
            tracing::debug!(to = %to.href(), "Already at location; navigation skipped");
            return false;
        }

        let navigation = self
            .dispatcher
            .current
            .advance(NavigationDefinition { kind, to });
        tracing::debug!(
            navigation_id = %navigation.id,
            sequence = navigation.sequence,
            kind = %navigation.kind,
            to = %navigation.to.as_ref().map(Location::href).unwrap_or_default(),
            "Navigation scheduled"
        );
        self.dispatcher.dispatch(Event::NavigationStart { navigation });
        true
    }

    pub fn push(&self, href: &str) -> bool {
        self.schedule_href(href, NavigationKind::Push)
    }

    pub fn replace(&self, href: &str) -> bool {
        self.schedule_href(href, NavigationKind::Replace)
    }

    fn schedule_href(&self, href: &str, kind: NavigationKind) -> bool {
        match Location::parse(href) {
            Ok(to) => self.schedule_navigation(to, kind),
            Err(err) => {
                tracing::warn!(href, error = %err, "Rejecting unparsable href");
                self.dispatcher
                    .store
                    .fail(NavigationError::InvalidNavigation(err.to_string()));
                false
            }
        }
    }

    /// Run `event` through the middleware; returns whether it was accepted.
    pub fn dispatch(&self, event: Event) -> bool {
        self.dispatcher.dispatch(event)
    }

    pub fn current_event(&self) -> Event {
        self.dispatcher.current_event.borrow().clone()
    }

    /// Receiver observing the current event.
    pub fn events(&self) -> watch::Receiver<Event> {
        self.dispatcher.current_event.subscribe()
    }

    /// Wait until the most recently scheduled navigation has ended.
    pub async fn settled(&self) {
        let target = self.dispatcher.current.sequence();
        let mut settled = self.dispatcher.settled.subscribe();
        // The sender lives in `self`, so this cannot observe a closed channel.
        let _ = settled.wait_for(|sequence| *sequence >= target).await;
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

async fn react(
    dispatcher: Arc<Dispatcher>,
    mut receiver: mpsc::UnboundedReceiver<Event>,
    mut shutdown: broadcast::Receiver<()>,
) {
    let mut in_flight = FuturesUnordered::new();

    loop {
        tokio::select! {
            biased;
            _ = shutdown.recv() => break,
            Some(event) = receiver.recv() => {
                in_flight.push(process_event(
                    event,
                    dispatcher.store.clone(),
                    dispatcher.current.clone(),
                ));
            }
            Some(result) = in_flight.next(), if !in_flight.is_empty() => {
                let Some(next) = result else {
                    continue;
                };
                if dispatcher.current.is_current(next.navigation()) {
                    dispatcher.dispatch(next);
                } else {
                    dispatcher.dispatch(Event::superseded(next.navigation().clone()));
                }
            }
            else => break,
        }
    }
}
