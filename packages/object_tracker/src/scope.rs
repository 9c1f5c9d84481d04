use std::sync::{Arc, LazyLock, OnceLock};

use crate::error::Result;
use crate::{
    Error, Handle, LeakReport, NativeObject, ObserverId, ReferenceEntry, Registry, TrackedObject,
};

/// Whether tracking operations observe one shared process-wide registry or
/// an isolated registry per calling thread.
///
/// `PerThread` removes all cross-thread lock contention at the cost of
/// per-thread reports: each thread sees only the wrappers tracked on that
/// thread.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum TrackingScope {
    /// All threads observe one shared registry.
    Global,

    /// Each calling thread observes its own isolated registry.
    PerThread,
}

/// The process-wide scope selection, fixed at first read.
static SCOPE: OnceLock<TrackingScope> = OnceLock::new();

/// The registry shared by all threads in `Global` scope.
///
/// Created lazily on first use; never torn down for the process lifetime.
static GLOBAL_REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

thread_local! {
    /// The calling thread's registry in `PerThread` scope.
    ///
    /// Created lazily on the thread's first tracking operation and living
    /// for the thread's lifetime.
    static THREAD_REGISTRY: Registry = Registry::new();
}

/// The process-wide tracking scope.
///
/// Defaults to [`TrackingScope::Global`] and is fixed from the first call
/// onward - every tracking operation reads it, so it can only be changed
/// via [`set_tracking_scope`] before any tracking begins.
#[must_use]
pub fn tracking_scope() -> TrackingScope {
    *SCOPE.get_or_init(|| TrackingScope::Global)
}

/// Selects the process-wide tracking scope.
///
/// Must be called before any tracking operation; once the scope has been
/// read or set it is fixed for the process lifetime and attempting to
/// change it returns [`Error::ScopeAlreadyFixed`]. Re-asserting the scope
/// the process is already fixed to succeeds and has no effect.
///
/// # Errors
///
/// Returns [`Error::ScopeAlreadyFixed`] when the scope is already fixed to
/// a different value.
///
/// # Example
///
/// ```
/// use object_tracker::TrackingScope;
///
/// object_tracker::set_tracking_scope(TrackingScope::PerThread).unwrap();
/// assert_eq!(object_tracker::tracking_scope(), TrackingScope::PerThread);
///
/// // The scope is now fixed.
/// assert!(object_tracker::set_tracking_scope(TrackingScope::Global).is_err());
/// ```
pub fn set_tracking_scope(scope: TrackingScope) -> Result<()> {
    if SCOPE.set(scope).is_ok() {
        return Ok(());
    }

    let current = *SCOPE.get().expect("scope was just observed as set");
    if current == scope {
        Ok(())
    } else {
        Err(Error::ScopeAlreadyFixed { current })
    }
}

/// Executes a closure against the scope-selected registry of the calling
/// thread.
///
/// This is the escape hatch for compound operations; every other free
/// function in this module is a shorthand for a single registry call
/// through here.
pub fn with_registry<F, R>(f: F) -> R
where
    F: FnOnce(&Registry) -> R,
{
    match tracking_scope() {
        TrackingScope::Global => f(LazyLock::force(&GLOBAL_REGISTRY)),
        TrackingScope::PerThread => THREAD_REGISTRY.with(|registry| f(registry)),
    }
}

/// Records that `wrapper` has acquired its native handle, in the ambient
/// registry. See [`Registry::track`].
pub fn track<W>(wrapper: &Arc<W>)
where
    W: NativeObject,
{
    with_registry(|registry| registry.track(wrapper));
}

/// Records that `wrapper` has released its native handle, in the ambient
/// registry. See [`Registry::untrack`].
pub fn untrack<W>(wrapper: &Arc<W>)
where
    W: NativeObject,
{
    with_registry(|registry| registry.untrack(wrapper));
}

/// Snapshot of the ambient registry's entries for `handle`.
/// See [`Registry::find_by_handle`].
#[must_use]
pub fn find_by_handle(handle: Handle) -> Vec<ReferenceEntry> {
    with_registry(|registry| registry.find_by_handle(handle))
}

/// The ambient registry's entry for exactly this wrapper, if any.
/// See [`Registry::find_by_wrapper`].
#[must_use]
pub fn find_by_wrapper<W>(wrapper: &Arc<W>) -> Option<ReferenceEntry>
where
    W: NativeObject,
{
    with_registry(|registry| registry.find_by_wrapper(wrapper))
}

/// Snapshot of every currently live entry in the ambient registry.
/// See [`Registry::find_active_objects`].
#[must_use]
pub fn find_active_objects() -> Vec<ReferenceEntry> {
    with_registry(Registry::find_active_objects)
}

/// Builds a [`LeakReport`] over the ambient registry's live entries.
/// See [`Registry::to_report`].
#[must_use]
pub fn to_report() -> LeakReport {
    with_registry(Registry::to_report)
}

/// Renders the ambient registry's leak report as text.
/// See [`Registry::report_active_objects`].
#[must_use]
pub fn report_active_objects() -> String {
    with_registry(Registry::report_active_objects)
}

/// Registers a tracked-notification observer on the ambient registry.
///
/// In `PerThread` scope this registers only on the calling thread's
/// registry. See [`Registry::on_tracked`].
pub fn on_tracked<F>(observer: F) -> ObserverId
where
    F: Fn(&Arc<dyn TrackedObject>) + Send + Sync + 'static,
{
    with_registry(|registry| registry.on_tracked(observer))
}

/// Removes a tracked-notification observer from the ambient registry.
/// See [`Registry::remove_tracked_observer`].
pub fn remove_tracked_observer(id: ObserverId) -> bool {
    with_registry(|registry| registry.remove_tracked_observer(id))
}

/// Registers an untracked-notification observer on the ambient registry.
///
/// In `PerThread` scope this registers only on the calling thread's
/// registry. See [`Registry::on_untracked`].
pub fn on_untracked<F>(observer: F) -> ObserverId
where
    F: Fn(&Arc<dyn TrackedObject>) + Send + Sync + 'static,
{
    with_registry(|registry| registry.on_untracked(observer))
}

/// Removes an untracked-notification observer from the ambient registry.
/// See [`Registry::remove_untracked_observer`].
pub fn remove_untracked_observer(id: ObserverId) -> bool {
    with_registry(|registry| registry.remove_untracked_observer(id))
}

/// Sets the trace provider on the ambient registry.
/// See [`Registry::set_trace_provider`].
pub fn set_trace_provider<F>(provider: F)
where
    F: Fn() -> String + Send + Sync + 'static,
{
    with_registry(|registry| registry.set_trace_provider(provider));
}

/// Removes the trace provider from the ambient registry.
/// See [`Registry::clear_trace_provider`].
pub fn clear_trace_provider() {
    with_registry(Registry::clear_trace_provider);
}
