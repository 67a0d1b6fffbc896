//! Engine event boundary.
//!
//! Store and materializer logic MUST NOT depend on any concrete sink; all
//! instrumentation flows through [`Event`] and [`EventSink`]. Tests install a
//! recording sink via [`with_sink`] to observe engine behavior.

use crate::date::Date;
use std::cell::RefCell;

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<*const dyn EventSink>> = const { RefCell::new(None) };
}

///
/// Event
///

#[derive(Clone, Copy, Debug)]
pub enum Event {
    /// A previously committed snapshot was returned untouched.
    MaterializeHit { date: Date },
    /// A new day was built from the template and the fixed roster.
    MaterializeMerge { date: Date, fixed: usize },
    /// A snapshot was committed to the date store.
    Commit { date: Date },
    /// The fixed-vendor roster was rebuilt.
    RosterRebuild { entries: usize },
    /// Every persisted key was dropped.
    Wipe,
}

///
/// EventSink
///

pub trait EventSink {
    fn record(&self, event: Event);
}

/// Emit an engine event to the scoped sink, if one is installed.
///
/// Without an override this is a no-op; the engine has no global sink state.
pub(crate) fn emit(event: Event) {
    let override_ptr = SINK_OVERRIDE.with(|cell| *cell.borrow());
    if let Some(ptr) = override_ptr {
        // SAFETY:
        // - `ptr` was produced from a valid `&dyn EventSink` in `with_sink`.
        // - `with_sink` always restores the previous pointer before
        //   returning, including unwind paths via `Guard::drop`.
        // - `emit` is synchronous and never stores `ptr` beyond this call,
        //   and only a shared reference is materialized.
        unsafe { (*ptr).record(event) };
    }
}

/// Run a closure with a temporary event sink override.
pub fn with_sink<T>(sink: &dyn EventSink, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<*const dyn EventSink>);

    impl Drop for Guard {
        fn drop(&mut self) {
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = self.0;
            });
        }
    }

    // SAFETY:
    // - `sink_ptr` is installed only for this dynamic scope.
    // - `Guard` restores the previous slot on all exits, including panic.
    // - `emit` only dereferences synchronously and never persists the
    //   pointer, so it cannot outlive the borrowed sink.
    let sink_ptr = unsafe { std::mem::transmute::<&dyn EventSink, *const dyn EventSink>(sink) };
    let prev = SINK_OVERRIDE.with(|cell| {
        let mut slot = cell.borrow_mut();
        slot.replace(sink_ptr)
    });
    let _guard = Guard(prev);

    f()
}

///
/// TESTS
///

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Sink that records every event for later assertions.
    #[derive(Default)]
    pub struct RecordingSink {
        events: RefCell<Vec<Event>>,
    }

    impl RecordingSink {
        pub fn events(&self) -> Vec<Event> {
            self.events.borrow().clone()
        }
    }

    impl EventSink for RecordingSink {
        fn record(&self, event: Event) {
            self.events.borrow_mut().push(event);
        }
    }
}
