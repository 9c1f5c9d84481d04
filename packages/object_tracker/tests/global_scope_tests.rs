//! Integration tests for the ambient API in `Global` scope.
//!
//! The tracking scope is a process-wide value fixed at first use, which is
//! why these tests live in their own binary: the per-thread counterpart
//! has its own (`thread_scope_tests.rs`). Tests here run in parallel
//! against one shared registry, so each uses its own handles and wrappers
//! and never asserts global emptiness.

use std::sync::Arc;
use std::thread;

use object_tracker::{Handle, NativeObject, TrackingScope};

struct Sensor {
    handle: Handle,
}

impl NativeObject for Sensor {
    fn handle(&self) -> Handle {
        self.handle
    }
}

fn sensor(handle: usize) -> Arc<Sensor> {
    Arc::new(Sensor {
        handle: Handle::new(handle),
    })
}

#[test]
fn default_scope_is_global_and_fixed() {
    assert_eq!(object_tracker::tracking_scope(), TrackingScope::Global);

    // Re-asserting the fixed scope is fine...
    object_tracker::set_tracking_scope(TrackingScope::Global).unwrap();

    // ...but changing it no longer is.
    let error = object_tracker::set_tracking_scope(TrackingScope::PerThread).unwrap_err();
    assert!(error.to_string().contains("already fixed"));
}

#[test]
fn wrappers_tracked_on_other_threads_are_visible() {
    let wrapper = sensor(0xA000);

    let worker = {
        let wrapper = Arc::clone(&wrapper);
        thread::spawn(move || {
            object_tracker::track(&wrapper);
        })
    };
    worker.join().unwrap();

    // Global scope: all threads observe one shared registry.
    let entry = object_tracker::find_by_wrapper(&wrapper).expect("entry must be visible");
    assert_eq!(entry.handle(), Handle::new(0xA000));
    assert_eq!(object_tracker::find_by_handle(Handle::new(0xA000)).len(), 1);

    object_tracker::untrack(&wrapper);
    assert!(object_tracker::find_by_wrapper(&wrapper).is_none());
}

#[test]
fn untrack_on_another_thread_is_visible() {
    let wrapper = sensor(0xB000);

    object_tracker::track(&wrapper);
    assert!(object_tracker::find_by_wrapper(&wrapper).is_some());

    let worker = {
        let wrapper = Arc::clone(&wrapper);
        thread::spawn(move || {
            object_tracker::untrack(&wrapper);
        })
    };
    worker.join().unwrap();

    assert!(object_tracker::find_by_wrapper(&wrapper).is_none());
}

#[test]
fn with_registry_sees_the_shared_instance() {
    let wrapper = sensor(0xC000);

    object_tracker::track(&wrapper);

    let found = object_tracker::with_registry(|registry| {
        registry.find_by_wrapper(&wrapper).is_some()
    });
    assert!(found);

    object_tracker::untrack(&wrapper);
}
