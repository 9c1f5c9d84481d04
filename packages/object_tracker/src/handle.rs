use std::fmt;

/// Opaque address-sized identifier for a native resource.
///
/// The registry never dereferences a handle; it is used purely as an
/// equality/hash key for grouping tracked wrappers. The zero value is
/// reserved as the null sentinel and is never tracked.
///
/// # Example
///
/// ```
/// use object_tracker::Handle;
///
/// let handle = Handle::new(0x1000);
/// assert!(!handle.is_null());
/// assert_eq!(format!("{handle}"), "0x1000");
///
/// assert!(Handle::NULL.is_null());
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Handle(usize);

impl Handle {
    /// The reserved null handle. Tracking operations treat it as a no-op.
    pub const NULL: Self = Self(0);

    /// Creates a handle from a raw address-sized value.
    #[must_use]
    pub const fn new(value: usize) -> Self {
        Self(value)
    }

    /// Creates a handle from a raw pointer's address.
    ///
    /// The pointer is never dereferenced; only its address survives.
    #[must_use]
    pub fn from_ptr<T>(ptr: *const T) -> Self {
        Self(ptr.addr())
    }

    /// The raw address-sized value of this handle.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }

    /// Whether this is the reserved null handle.
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl From<usize> for Handle {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl fmt::LowerHex for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_handle_is_null() {
        assert!(Handle::NULL.is_null());
        assert!(Handle::new(0).is_null());
        assert!(!Handle::new(1).is_null());
    }

    #[test]
    fn round_trips_raw_value() {
        let handle = Handle::new(0xDEAD_BEEF);
        assert_eq!(handle.get(), 0xDEAD_BEEF);
        assert_eq!(Handle::from(0xDEAD_BEEF_usize), handle);
    }

    #[test]
    fn from_ptr_uses_address() {
        let value = 42_u64;
        let handle = Handle::from_ptr(&raw const value);
        assert!(!handle.is_null());
        assert_eq!(handle.get(), (&raw const value).addr());
    }

    #[test]
    fn displays_as_hex() {
        assert_eq!(format!("{}", Handle::new(0x1000)), "0x1000");
        assert_eq!(format!("{:x}", Handle::new(0x1000)), "1000");
    }

    // Handles are plain values and travel freely between threads.
    static_assertions::assert_impl_all!(Handle: Send, Sync, Copy);
}
