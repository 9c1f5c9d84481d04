use std::fmt;
use std::sync::{Arc, Mutex};

use hash_hasher::HashedMap;
use tracing::{debug, trace};

use crate::constants::ERR_POISONED_LOCK;
use crate::observers::ObserverSet;
use crate::{Handle, LeakReport, NativeObject, ObserverId, ReferenceEntry, TrackedObject};

/// Closure consulted at track time to capture a diagnostic trace for the
/// new entry. The returned string is opaque to the registry.
pub type TraceProvider = dyn Fn() -> String + Send + Sync;

/// Registry of live native-handle wrappers, used to detect resource leaks.
///
/// Maps each native [`Handle`] to the ordered list of [`ReferenceEntry`]
/// records tracked against it. Several distinct wrappers may legitimately
/// wrap the same handle (for example, two interface views onto the same
/// underlying resource), so multiple entries per handle are expected.
///
/// The registry holds only weak references: tracking a wrapper never keeps
/// it alive, which is the whole point - a wrapper that became unreachable
/// without being untracked is precisely what the leak report exists to
/// surface. Entries whose wrapper has been collected are swept
/// opportunistically during [`untrack`][Self::untrack].
///
/// Most callers do not construct a `Registry` directly but go through the
/// scope-routed free functions ([`track`][crate::track],
/// [`untrack`][crate::untrack], ...). Explicit instances are useful for
/// tests and for tooling that wants an isolated registry.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use object_tracker::{Handle, NativeObject, Registry};
///
/// struct Texture {
///     handle: Handle,
/// }
///
/// impl NativeObject for Texture {
///     fn handle(&self) -> Handle {
///         self.handle
///     }
/// }
///
/// let registry = Registry::new();
///
/// let leaked = Arc::new(Texture {
///     handle: Handle::new(0x1000),
/// });
/// registry.track(&leaked);
///
/// // The wrapper was never untracked, so it shows up in the report.
/// let report = registry.to_report();
/// assert_eq!(report.live_count(), 1);
/// assert_eq!(report.counts_per_type().next(), Some(("Texture", 1)));
/// ```
pub struct Registry {
    table: Mutex<HashedMap<Handle, Vec<ReferenceEntry>>>,

    tracked_observers: Mutex<ObserverSet>,
    untracked_observers: Mutex<ObserverSet>,

    trace_provider: Mutex<Option<Arc<TraceProvider>>>,
}

impl Registry {
    /// Creates an empty registry with no observers and no trace provider.
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: Mutex::new(HashedMap::default()),
            tracked_observers: Mutex::new(ObserverSet::new()),
            untracked_observers: Mutex::new(ObserverSet::new()),
            trace_provider: Mutex::new(None),
        }
    }

    /// Records that `wrapper` has acquired its native handle.
    ///
    /// Appends a new [`ReferenceEntry`] (creation time, weak reference to
    /// the wrapper, captured trace) to the handle's entry list, then
    /// dispatches the tracked notification outside the lock.
    ///
    /// A wrapper whose handle is [`Handle::NULL`] is silently ignored:
    /// tracking must never break the interop call site that triggers it,
    /// so there is no error path.
    pub fn track<W>(&self, wrapper: &Arc<W>)
    where
        W: NativeObject,
    {
        let handle = NativeObject::handle(wrapper.as_ref());
        if handle.is_null() {
            return;
        }

        let payload: Arc<dyn TrackedObject> = Arc::clone(wrapper) as _;

        // The provider is user code; it runs before the table lock is taken.
        let captured_trace = self.capture_trace();

        {
            let mut table = self.table.lock().expect(ERR_POISONED_LOCK);
            table.entry(handle).or_default().push(ReferenceEntry::new(
                handle,
                Arc::downgrade(&payload),
                captured_trace,
            ));
        }

        trace!(handle = %handle, type_name = payload.type_name(), "tracked object");

        Self::notify(&self.tracked_observers, &payload);
    }

    /// Records that `wrapper` has released its native handle.
    ///
    /// Sweeps the handle's entry list once, removing the entry owned by
    /// `wrapper` (identity match, not value equality) as well as any stale
    /// entry whose wrapper has been collected without being untracked. If
    /// the list empties, the handle key is removed entirely.
    ///
    /// Dispatches the untracked notification outside the lock, and only
    /// when the wrapper's own entry was actually removed - a repeated
    /// `untrack` of the same wrapper is an idempotent no-op that fires
    /// nothing.
    pub fn untrack<W>(&self, wrapper: &Arc<W>)
    where
        W: NativeObject,
    {
        let handle = NativeObject::handle(wrapper.as_ref());
        if handle.is_null() {
            return;
        }

        let candidate = Arc::as_ptr(wrapper).cast::<()>();

        let removed_own_entry = {
            let mut table = self.table.lock().expect(ERR_POISONED_LOCK);

            let Some(entries) = table.get_mut(&handle) else {
                return;
            };

            let mut removed_own_entry = false;
            entries.retain(|entry| {
                if entry.is_owned_by(candidate) {
                    removed_own_entry = true;
                    return false;
                }

                // Stale entries are swept while we are here anyway.
                entry.is_alive()
            });

            if entries.is_empty() {
                table.remove(&handle);
            }

            removed_own_entry
        };

        if removed_own_entry {
            let payload: Arc<dyn TrackedObject> = Arc::clone(wrapper) as _;

            trace!(handle = %handle, type_name = payload.type_name(), "untracked object");

            Self::notify(&self.untracked_observers, &payload);
        }
    }

    /// Returns a snapshot of the entries currently tracked against
    /// `handle`, or an empty vector if the handle is untracked.
    ///
    /// The snapshot reflects the registry at the moment of the call;
    /// callers must not assume it reflects later state.
    #[must_use]
    pub fn find_by_handle(&self, handle: Handle) -> Vec<ReferenceEntry> {
        if handle.is_null() {
            return Vec::new();
        }

        let table = self.table.lock().expect(ERR_POISONED_LOCK);
        table.get(&handle).cloned().unwrap_or_default()
    }

    /// Returns the entry tracked for exactly this wrapper (identity match),
    /// if any.
    #[must_use]
    pub fn find_by_wrapper<W>(&self, wrapper: &Arc<W>) -> Option<ReferenceEntry>
    where
        W: NativeObject,
    {
        let handle = NativeObject::handle(wrapper.as_ref());
        if handle.is_null() {
            return None;
        }

        let candidate = Arc::as_ptr(wrapper).cast::<()>();

        let table = self.table.lock().expect(ERR_POISONED_LOCK);
        table
            .get(&handle)?
            .iter()
            .find(|entry| entry.is_owned_by(candidate))
            .cloned()
    }

    /// Returns a snapshot of every entry whose wrapper is still alive at
    /// this instant - the authoritative "what is still outstanding" view.
    ///
    /// Entries are enumerated with handles in ascending order and in
    /// insertion order within a handle, so the derived report is
    /// deterministic for a fixed set of live entries.
    #[must_use]
    pub fn find_active_objects(&self) -> Vec<ReferenceEntry> {
        let table = self.table.lock().expect(ERR_POISONED_LOCK);

        let mut handles: Vec<Handle> = table.keys().copied().collect();
        handles.sort_unstable();

        let mut active = Vec::new();
        for handle in handles {
            if let Some(entries) = table.get(&handle) {
                active.extend(entries.iter().filter(|entry| entry.is_alive()).cloned());
            }
        }

        active
    }

    /// Builds a [`LeakReport`] over the currently live entries.
    #[must_use]
    pub fn to_report(&self) -> LeakReport {
        let active = self.find_active_objects();

        debug!(live_entries = active.len(), "building leak report");

        LeakReport::from_entries(&active)
    }

    /// Renders the leak report over the currently live entries as text.
    ///
    /// This is the externally consumed artifact; see [`LeakReport`] for the
    /// exact shape.
    #[must_use]
    pub fn report_active_objects(&self) -> String {
        self.to_report().to_string()
    }

    /// Registers an observer for tracked notifications, returning its
    /// identifier for later removal.
    ///
    /// Observers run synchronously on the tracking thread, in registration
    /// order, strictly outside every registry lock - an observer may
    /// re-enter the registry freely. A panicking observer propagates to the
    /// [`track`][Self::track] caller; registry state is already consistent
    /// by then.
    pub fn on_tracked<F>(&self, observer: F) -> ObserverId
    where
        F: Fn(&Arc<dyn TrackedObject>) + Send + Sync + 'static,
    {
        self.tracked_observers
            .lock()
            .expect(ERR_POISONED_LOCK)
            .insert(Arc::new(observer))
    }

    /// Removes a tracked-notification observer, reporting whether anything
    /// was removed.
    pub fn remove_tracked_observer(&self, id: ObserverId) -> bool {
        self.tracked_observers
            .lock()
            .expect(ERR_POISONED_LOCK)
            .remove(id)
    }

    /// Registers an observer for untracked notifications, returning its
    /// identifier for later removal.
    ///
    /// Same dispatch contract as [`on_tracked`][Self::on_tracked].
    pub fn on_untracked<F>(&self, observer: F) -> ObserverId
    where
        F: Fn(&Arc<dyn TrackedObject>) + Send + Sync + 'static,
    {
        self.untracked_observers
            .lock()
            .expect(ERR_POISONED_LOCK)
            .insert(Arc::new(observer))
    }

    /// Removes an untracked-notification observer, reporting whether
    /// anything was removed.
    pub fn remove_untracked_observer(&self, id: ObserverId) -> bool {
        self.untracked_observers
            .lock()
            .expect(ERR_POISONED_LOCK)
            .remove(id)
    }

    /// Sets the closure consulted at track time to capture each entry's
    /// diagnostic trace, replacing any previous provider.
    ///
    /// The provider runs on the tracking thread, outside every registry
    /// lock. When no provider is set, entries carry an empty trace.
    pub fn set_trace_provider<F>(&self, provider: F)
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        *self.trace_provider.lock().expect(ERR_POISONED_LOCK) = Some(Arc::new(provider));
    }

    /// Removes the trace provider; subsequent entries carry an empty trace.
    pub fn clear_trace_provider(&self) {
        *self.trace_provider.lock().expect(ERR_POISONED_LOCK) = None;
    }

    fn capture_trace(&self) -> String {
        let provider = self
            .trace_provider
            .lock()
            .expect(ERR_POISONED_LOCK)
            .clone();

        provider.map(|provider| provider()).unwrap_or_default()
    }

    /// Dispatches to a snapshot of the observers, taken and released before
    /// any observer runs, so re-entrant observers cannot deadlock.
    fn notify(observers: &Mutex<ObserverSet>, payload: &Arc<dyn TrackedObject>) {
        let snapshot = observers.lock().expect(ERR_POISONED_LOCK).snapshot();

        for observer in snapshot {
            observer(payload);
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tracked_handles = self.table.lock().expect(ERR_POISONED_LOCK).len();

        f.debug_struct("Registry")
            .field("tracked_handles", &tracked_handles)
            .finish_non_exhaustive()
    }
}
