//! Diagnostic registry that observes native-handle wrappers to detect
//! resource leaks.
//!
//! This package is the diagnostic backbone of an interop layer in which
//! every managed wrapper owns exactly one native handle and must explicitly
//! release it. The registry observes lifecycle events reported to it and
//! can enumerate, at any moment, the wrappers that are still outstanding -
//! typically at shutdown, where anything still alive is a leak.
//!
//! The core functionality includes:
//! - [`Registry`] - maps native handles to the wrappers tracked against them
//! - [`NativeObject`] - the trait a wrapper implements to become trackable
//! - [`ReferenceEntry`] - one track event: timestamp, weak reference, trace
//! - [`LeakReport`] - deterministic, per-type-aggregated leak report
//! - [`TrackingScope`] - process-global vs. per-thread registry selection
//!
//! The registry owns nothing: it holds only weak references, so tracking a
//! wrapper never keeps it alive. A wrapper that became unreachable without
//! being untracked stays collectable and is exactly what the report exists
//! to surface. The registry does not free any native resource itself and
//! infers liveness of the *wrapper*, never of the native resource.
//!
//! # Simple usage
//!
//! Wrappers call [`track`] when they acquire a handle and [`untrack`] when
//! they release it; the report shows whatever was never released:
//!
//! ```
//! use std::sync::Arc;
//!
//! use object_tracker::{Handle, NativeObject};
//!
//! struct Texture {
//!     handle: Handle,
//! }
//!
//! impl NativeObject for Texture {
//!     fn handle(&self) -> Handle {
//!         self.handle
//!     }
//! }
//!
//! let released = Arc::new(Texture {
//!     handle: Handle::new(0x1000),
//! });
//! let leaked = Arc::new(Texture {
//!     handle: Handle::new(0x2000),
//! });
//!
//! object_tracker::track(&released);
//! object_tracker::track(&leaked);
//!
//! // `released` is released properly...
//! object_tracker::untrack(&released);
//!
//! // ...so only `leaked` remains outstanding.
//! let report = object_tracker::to_report();
//! assert_eq!(report.live_count(), 1);
//! assert_eq!(
//!     report.counts_per_type().collect::<Vec<_>>(),
//!     vec![("Texture", 1)]
//! );
//! ```
//!
//! # Notifications
//!
//! Observers can subscribe to track/untrack events. Dispatch is
//! synchronous, in registration order, on the calling thread, and always
//! outside the registry's locks, so observers may re-enter the registry:
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! use object_tracker::{Handle, NativeObject, Registry};
//!
//! struct Device {
//!     handle: Handle,
//! }
//!
//! impl NativeObject for Device {
//!     fn handle(&self) -> Handle {
//!         self.handle
//!     }
//! }
//!
//! let registry = Registry::new();
//!
//! let tracked_count = Arc::new(AtomicUsize::new(0));
//! let observed = Arc::clone(&tracked_count);
//! registry.on_tracked(move |_wrapper| {
//!     observed.fetch_add(1, Ordering::Relaxed);
//! });
//!
//! let device = Arc::new(Device {
//!     handle: Handle::new(0x1000),
//! });
//! registry.track(&device);
//!
//! assert_eq!(tracked_count.load(Ordering::Relaxed), 1);
//! ```
//!
//! # Tracking scope
//!
//! By default every thread observes one shared registry
//! ([`TrackingScope::Global`]). Calling
//! [`set_tracking_scope`]`(`[`TrackingScope::PerThread`]`)` before any
//! tracking begins gives each thread its own isolated registry instead,
//! trading cross-thread visibility for an uncontended lock. The scope is a
//! process-wide value fixed at first use; neither registry is ever torn
//! down.
//!
//! Explicit [`Registry`] instances are independent of the scope machinery
//! and are the natural choice for tests and embedded tooling.
//!
//! # Overhead
//!
//! Every operation is a short synchronous critical section over in-memory
//! map and list state. No user code (observers, the trace provider) ever
//! runs while a registry lock is held, so the critical sections stay
//! bounded and a correct program is not slowed down materially.

mod constants;
mod entry;
mod error;
mod handle;
mod object;
mod observers;
mod registry;
mod report;
mod scope;

pub use entry::ReferenceEntry;
pub use error::Error;
pub use handle::Handle;
pub use object::{NativeObject, TrackedObject};
pub use observers::{Observer, ObserverId};
pub use registry::{Registry, TraceProvider};
pub use report::LeakReport;
pub use scope::*;
