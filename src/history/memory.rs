//! In-memory history for tests, the CLI and non-browser hosts.

use std::sync::{Mutex, MutexGuard};

use crate::history::{History, HistoryError, HistoryEvent, HistoryListener, ListenerId};
use crate::navigation::{Location, NavigationKind};

#[derive(Debug)]
struct Entries {
    stack: Vec<Location>,
    index: usize,
}

/// A stack of entries with a cursor, like a browser session history.
pub struct MemoryHistory {
    entries: Mutex<Entries>,
    listeners: Mutex<Vec<(ListenerId, HistoryListener)>>,
}

impl MemoryHistory {
    pub fn new(initial: Location) -> Self {
        Self {
            entries: Mutex::new(Entries {
                stack: vec![initial],
                index: 0,
            }),
            listeners: Mutex::new(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries().stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().stack.is_empty()
    }

    pub fn index(&self) -> usize {
        self.entries().index
    }

    /// Move the cursor by `delta` entries and emit a `Pop`.
    pub fn go(&self, delta: isize) -> Result<(), HistoryError> {
        let location = {
            let mut entries = self.entries();
            let len = entries.stack.len();
            let target = entries
                .index
                .checked_add_signed(delta)
                .filter(|t| *t < len)
                .ok_or(HistoryError::OutOfRange {
                    delta,
                    index: entries.index,
                    len,
                })?;
            entries.index = target;
            entries.stack[target].clone()
        };
        self.emit(location, NavigationKind::Pop);
        Ok(())
    }

    pub fn back(&self) -> Result<(), HistoryError> {
        self.go(-1)
    }

    pub fn forward(&self) -> Result<(), HistoryError> {
        self.go(1)
    }

    fn entries(&self) -> MutexGuard<'_, Entries> {
        self.entries.lock().expect("history entries mutex poisoned")
    }

    fn listeners(&self) -> MutexGuard<'_, Vec<(ListenerId, HistoryListener)>> {
        self.listeners.lock().expect("history listeners mutex poisoned")
    }

    fn emit(&self, location: Location, action: NavigationKind) {
        // Listeners are called without any lock held; they may call back in.
        let listeners: Vec<HistoryListener> =
            self.listeners().iter().map(|(_, l)| l.clone()).collect();
        let event = HistoryEvent { location, action };
        for listener in listeners {
            listener(&event);
        }
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new(Location::new("/"))
    }
}

impl std::fmt::Debug for MemoryHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryHistory")
            .field("entries", &*self.entries())
            .field("listeners", &self.listeners().len())
            .finish()
    }
}

impl History for MemoryHistory {
    fn location(&self) -> Location {
        let entries = self.entries();
        entries.stack[entries.index].clone()
    }

    fn listen(&self, listener: HistoryListener) -> ListenerId {
        let id = ListenerId::new();
        self.listeners().push((id, listener));
        id
    }

    fn unlisten(&self, id: ListenerId) {
        self.listeners().retain(|(existing, _)| *existing != id);
    }

    fn push(&self, location: Location) {
        {
            let mut entries = self.entries();
            let next = entries.index + 1;
            entries.stack.truncate(next);
            entries.stack.push(location.clone());
            entries.index = next;
        }
        self.emit(location, NavigationKind::Push);
    }

    fn replace(&self, location: Location) {
        {
            let mut entries = self.entries();
            let index = entries.index;
            entries.stack[index] = location.clone();
        }
        self.emit(location, NavigationKind::Replace);
    }
}
