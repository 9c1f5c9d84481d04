use std::fmt;
use std::fmt::Write;
use std::ptr;
use std::sync::{Arc, Weak};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::{Handle, TrackedObject};

/// A record of one track event: when it happened, which wrapper it was and
/// the diagnostic trace captured at that moment.
///
/// Entries are immutable once created. The wrapper is referenced weakly, so
/// an entry never keeps its wrapper alive - [`ReferenceEntry::is_alive`] is
/// a point-in-time observation that may turn false at any moment as the
/// last strong reference elsewhere is dropped.
#[derive(Clone, Debug)]
pub struct ReferenceEntry {
    created_at: SystemTime,
    handle: Handle,
    owner: Weak<dyn TrackedObject>,
    trace: String,
}

impl ReferenceEntry {
    pub(crate) fn new(handle: Handle, owner: Weak<dyn TrackedObject>, trace: String) -> Self {
        Self {
            created_at: SystemTime::now(),
            handle,
            owner,
            trace,
        }
    }

    /// When the wrapper was tracked.
    #[must_use]
    pub fn created_at(&self) -> SystemTime {
        self.created_at
    }

    /// The native handle the wrapper was tracked against.
    #[must_use]
    pub fn handle(&self) -> Handle {
        self.handle
    }

    /// The diagnostic trace captured at track time.
    ///
    /// Empty when no trace provider was configured.
    #[must_use]
    pub fn trace(&self) -> &str {
        &self.trace
    }

    /// Whether the tracked wrapper is still reachable at this instant.
    ///
    /// This may transition from `true` to `false` at any time without
    /// notification; there is no callback on collection.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.owner.strong_count() > 0
    }

    /// Resolves the tracked wrapper to a strong reference, if it is still
    /// alive.
    #[must_use]
    pub fn owner(&self) -> Option<Arc<dyn TrackedObject>> {
        self.owner.upgrade()
    }

    /// Identity comparison against a candidate wrapper, by address.
    ///
    /// Valid even after the owner has been dropped - the weak reference
    /// pins the allocation, so the address cannot be reused while this
    /// entry exists. Never upgrades to ownership as a side effect.
    pub(crate) fn is_owned_by(&self, candidate: *const ()) -> bool {
        ptr::addr_eq(self.owner.as_ptr(), candidate)
    }

    /// Renders the leak report description for a resolved owner.
    pub(crate) fn describe(&self, owner: &dyn TrackedObject) -> String {
        let seconds = self
            .created_at
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        let mut text = format!(
            "Active object: [{}] Class: [{}] Time: [{seconds}]",
            self.handle,
            owner.type_name()
        );

        if !self.trace.is_empty() {
            write!(text, " Stack: {}", self.trace).expect("writing to a String cannot fail");
        }

        text
    }
}

/// Renders the entry's leak report description, or nothing if the wrapper
/// has already been collected.
impl fmt::Display for ReferenceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.owner() {
            Some(owner) => f.write_str(&self.describe(owner.as_ref())),
            None => Ok(()),
        }
    }
}
