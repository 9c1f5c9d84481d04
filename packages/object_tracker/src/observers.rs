use std::fmt;
use std::sync::Arc;

use crate::TrackedObject;

/// Callback signature for track/untrack notifications.
///
/// The payload is the wrapper the event concerns. Dispatch happens
/// synchronously on the thread that performed the operation, strictly
/// outside every registry lock, so observers may re-enter the registry.
pub type Observer = dyn Fn(&Arc<dyn TrackedObject>) + Send + Sync;

/// Identifies one registered observer, for later removal.
///
/// Identifiers are scoped to the observer list that issued them; an
/// identifier from the tracked list means nothing to the untracked list.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ObserverId(u64);

/// One registry's list of observers for a single event kind.
///
/// Registration order is preserved; dispatch happens in that order.
pub(crate) struct ObserverSet {
    observers: Vec<(ObserverId, Arc<Observer>)>,
    next_id: u64,
}

impl ObserverSet {
    pub(crate) fn new() -> Self {
        Self {
            observers: Vec::new(),
            next_id: 0,
        }
    }

    pub(crate) fn insert(&mut self, observer: Arc<Observer>) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id = self
            .next_id
            .checked_add(1)
            .expect("observer id counter overflows u64 - this indicates an unrealistic scenario");

        self.observers.push((id, observer));
        id
    }

    /// Removes the observer with the given identifier, reporting whether
    /// anything was removed.
    pub(crate) fn remove(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(candidate, _)| *candidate != id);
        self.observers.len() != before
    }

    /// Clones out the current observers, in registration order.
    ///
    /// Callers invoke the clones after releasing the list's lock, so an
    /// observer that re-enters the registry cannot deadlock.
    pub(crate) fn snapshot(&self) -> Vec<Arc<Observer>> {
        self.observers
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect()
    }
}

impl fmt::Debug for ObserverSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverSet")
            .field("len", &self.observers.len())
            .field("next_id", &self.next_id)
            .finish_non_exhaustive()
    }
}
