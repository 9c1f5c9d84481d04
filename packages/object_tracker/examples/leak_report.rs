//! Demonstrates leak detection over a set of native-handle wrappers.
//!
//! Three wrappers acquire handles; one releases properly, one is dropped
//! without releasing (a stale entry swept later), and one is simply held
//! past shutdown - the leak the report exists to catch.
//!
//! Run with: `cargo run --example leak_report`

use std::sync::Arc;

use object_tracker::{Handle, NativeObject, Registry};

struct Texture {
    handle: Handle,
}

impl NativeObject for Texture {
    fn handle(&self) -> Handle {
        self.handle
    }
}

struct Buffer {
    handle: Handle,
}

impl NativeObject for Buffer {
    fn handle(&self) -> Handle {
        self.handle
    }
}

fn main() {
    let registry = Registry::new();

    registry.set_trace_provider(|| "acquired in main()".to_string());

    registry.on_tracked(|wrapper| {
        println!("tracked:   {} ({})", wrapper.handle(), wrapper.type_name());
    });
    registry.on_untracked(|wrapper| {
        println!("untracked: {} ({})", wrapper.handle(), wrapper.type_name());
    });

    // A well-behaved wrapper: acquires, works, releases.
    let released = Arc::new(Buffer {
        handle: Handle::new(0x1000),
    });
    registry.track(&released);
    registry.untrack(&released);

    // Dropped without untracking: its weak reference goes stale and no
    // longer counts as a leak, it just lingers until swept.
    let vanished = Arc::new(Buffer {
        handle: Handle::new(0x2000),
    });
    registry.track(&vanished);
    drop(vanished);

    // Still alive at shutdown: this is the leak.
    let leaked = Arc::new(Texture {
        handle: Handle::new(0x3000),
    });
    registry.track(&leaked);

    println!();
    let report = registry.to_report();
    if report.is_empty() {
        println!("No outstanding objects.");
    } else {
        println!("Outstanding objects at shutdown:");
        print!("{report}");
    }
}
