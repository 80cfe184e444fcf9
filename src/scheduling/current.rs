//! The tracked current navigation.

use std::sync::{Arc, Mutex};

use arc_swap::ArcSwap;

use crate::navigation::{Navigation, NavigationDefinition};

/// Most recently scheduled navigation of one scheduler.
///
/// Reads are lock-free. Advancing and committing go through `gate`, so a
/// commit checked against sequence `n` cannot land after `n + 1` was scheduled.
#[derive(Debug)]
pub struct CurrentNavigation {
    navigation: ArcSwap<Navigation>,
    gate: Mutex<()>,
}

impl CurrentNavigation {
    pub fn new() -> Self {
        Self {
            navigation: ArcSwap::new(Arc::new(Navigation::initial())),
            gate: Mutex::new(()),
        }
    }

    pub fn load(&self) -> Arc<Navigation> {
        self.navigation.load_full()
    }

    pub fn sequence(&self) -> i64 {
        self.navigation.load().sequence
    }

    /// Whether `navigation` is at least as new as the tracked one.
    pub fn is_current(&self, navigation: &Navigation) -> bool {
        navigation.sequence >= self.sequence()
    }

    /// Derive and track the next navigation.
    pub(crate) fn advance(&self, definition: NavigationDefinition) -> Arc<Navigation> {
        let _gate = self.gate.lock().expect("navigation gate poisoned");
        let next = Arc::new(self.navigation.load().next(definition));
        self.navigation.store(next.clone());
        next
    }

    /// Run `f` only if `navigation` is still current, with advancing held off.
    pub(crate) fn while_current<T>(&self, navigation: &Navigation, f: impl FnOnce() -> T) -> Option<T> {
        let _gate = self.gate.lock().expect("navigation gate poisoned");
        self.is_current(navigation).then(f)
    }
}

impl Default for CurrentNavigation {
    fn default() -> Self {
        Self::new()
    }
}
