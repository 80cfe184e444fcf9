//! Event processing: one step of a navigation.
//!
//! # Data Flow
//! ```text
//! NavigationStart ─┬─▶ resolve ─▶ Complete ─▶ execute ─▶ NavigationEnd
//!                  │                                  └─▶ NavigationCancelled
//!                  │          └─▶ Pending ─▶ load children ─▶ ChildrenLoad
//!                  └─▶ NoMatch ─▶ NavigationCancelled
//! ChildrenLoad ─▶ install children ─▶ resolve again
//! ```

use std::sync::Arc;

use crate::navigation::{Event, Navigation, NavigationError};
use crate::observability::metrics;
use crate::routing::matcher::{resolve, Resolution};
use crate::routing::node::{NodeKey, RouteConfig};
use crate::scheduling::current::CurrentNavigation;
use crate::scheduling::executor::{execute, Transition, TransitionOutcome};
use crate::store::Store;

/// Process `event` and produce the next one.
///
/// Terminal events and `Empty` produce nothing. Failures never escape: they
/// become `NavigationCancelled` with the error, recorded in the store unless
/// a newer navigation has taken over.
pub async fn process_event(
    event: Event,
    store: Arc<Store>,
    current: Arc<CurrentNavigation>,
) -> Option<Event> {
    match event {
        Event::NavigationStart { navigation } => Some(advance(navigation, &store, &current).await),
        Event::ChildrenLoad {
            navigation,
            leaf,
            children,
            ..
        } => {
            if !current.is_current(&navigation) {
                return Some(Event::superseded(navigation));
            }
            if let Err(err) = store.tree().install_loaded_children(leaf, children) {
                let error = NavigationError::InvalidNavigation(format!(
                    "installing children of {leaf} failed: {err}"
                ));
                return Some(fail(&store, &current, navigation, error));
            }
            metrics::record_children_loaded();
            tracing::debug!(
                navigation_id = %navigation.id,
                node = %leaf,
                "Installed lazily loaded children"
            );
            Some(advance(navigation, &store, &current).await)
        }
        Event::Empty { .. } | Event::NavigationCancelled { .. } | Event::NavigationEnd { .. } => {
            None
        }
    }
}

/// Match the navigation's target and either load children or run the transition.
async fn advance(
    navigation: Arc<Navigation>,
    store: &Store,
    current: &CurrentNavigation,
) -> Event {
    let Some(to) = navigation.to.clone() else {
        let error = NavigationError::InvalidNavigation(format!("navigation {navigation} has no target"));
        return fail(store, current, navigation, error);
    };

    match resolve(store.tree(), &to) {
        Err(error) => fail(store, current, navigation, error),
        Ok(Resolution::Pending { partial_path, leaf }) => {
            match load_children(leaf, store, &navigation).await {
                Ok(children) => Event::ChildrenLoad {
                    navigation,
                    leaf,
                    partial_path,
                    children,
                },
                Err(error) => fail(store, current, navigation, error),
            }
        }
        Ok(Resolution::Complete(routes)) => {
            let transition =
                match Transition::between(&store.active_routes(), routes, navigation.clone()) {
                    Ok(transition) => transition,
                    Err(error) => return fail(store, current, navigation, error),
                };
            match execute(transition, store, current).await {
                TransitionOutcome::Committed(routes) => Event::NavigationEnd { navigation, routes },
                TransitionOutcome::Failed(error) => fail(store, current, navigation, error),
                TransitionOutcome::Superseded => Event::superseded(navigation),
            }
        }
    }
}

async fn load_children(
    leaf: NodeKey,
    store: &Store,
    navigation: &Navigation,
) -> Result<Vec<RouteConfig>, NavigationError> {
    let loader = store.tree().loader(leaf).ok_or_else(|| {
        NavigationError::InvalidNavigation(format!("node {leaf} has no children loader"))
    })?;

    tracing::debug!(navigation_id = %navigation.id, node = %leaf, "Loading children");
    loader.load().await.map_err(|rejection| {
        NavigationError::InvalidNavigation(format!(
            "loading children of {leaf} failed: {}",
            rejection.reason
        ))
    })
}

fn fail(
    store: &Store,
    current: &CurrentNavigation,
    navigation: Arc<Navigation>,
    error: NavigationError,
) -> Event {
    let recorded = current
        .while_current(&navigation, || store.fail(error.clone()))
        .is_some();
    if recorded {
        tracing::info!(
            navigation_id = %navigation.id,
            sequence = navigation.sequence,
            error_kind = error.kind(),
            error = %error,
            "Navigation failed"
        );
    } else {
        tracing::debug!(
            navigation_id = %navigation.id,
            error = %error,
            "Stale navigation failed; error not recorded"
        );
    }
    Event::NavigationCancelled {
        navigation,
        error: Some(error),
    }
}
