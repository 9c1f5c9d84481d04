use std::any::type_name;

use crate::Handle;

/// A managed wrapper that owns exactly one native resource handle.
///
/// This is the interface through which the registry observes wrappers; the
/// registry itself owns nothing. Wrappers are shared as `Arc<W>` and the
/// registry holds only downgraded [`Weak`][std::sync::Weak] references, so
/// tracking never extends a wrapper's lifetime - a wrapper that was leaked
/// remains leaked and shows up in the report as such.
///
/// Call sites are expected to invoke [`Registry::track`][crate::Registry::track]
/// when the wrapper acquires its handle and
/// [`Registry::untrack`][crate::Registry::untrack] when it releases it.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use object_tracker::{Handle, NativeObject, Registry};
///
/// struct Device {
///     handle: Handle,
/// }
///
/// impl NativeObject for Device {
///     fn handle(&self) -> Handle {
///         self.handle
///     }
/// }
///
/// let registry = Registry::new();
/// let device = Arc::new(Device {
///     handle: Handle::new(0x1000),
/// });
///
/// registry.track(&device);
/// assert!(registry.find_by_wrapper(&device).is_some());
///
/// registry.untrack(&device);
/// assert!(registry.find_by_wrapper(&device).is_none());
/// ```
pub trait NativeObject: Send + Sync + 'static {
    /// The native handle currently owned by this wrapper.
    ///
    /// Used only as a lookup key; the registry never dereferences it.
    fn handle(&self) -> Handle;
}

/// Object-safe view of a tracked wrapper, as stored by the registry and
/// delivered to observers.
///
/// Blanket-implemented for every [`NativeObject`]; user code implements
/// only [`NativeObject`].
pub trait TrackedObject: Send + Sync + 'static {
    /// The native handle currently owned by this wrapper.
    fn handle(&self) -> Handle;

    /// Unqualified type name of the concrete wrapper, used to aggregate
    /// leak report counts.
    fn type_name(&self) -> &'static str;
}

impl<T> TrackedObject for T
where
    T: NativeObject,
{
    fn handle(&self) -> Handle {
        NativeObject::handle(self)
    }

    fn type_name(&self) -> &'static str {
        short_type_name(type_name::<T>())
    }
}

/// Trims a fully qualified type path to its unqualified name.
///
/// Generic arguments, if any, are left untouched; wrapper types are
/// expected to be plain named structs.
pub(crate) fn short_type_name(full: &'static str) -> &'static str {
    let base_len = full.find('<').unwrap_or(full.len());
    let base = full.get(..base_len).unwrap_or(full);

    match base.rfind("::") {
        Some(separator) => full
            .get(separator..)
            .and_then(|tail| tail.strip_prefix("::"))
            .unwrap_or(full),
        None => full,
    }
}
