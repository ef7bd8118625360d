//! The thread-local registry of every live allocation and the
//! mark-and-sweep collector that runs over it.
//!
//! This is deliberately a simple stop-the-world collector, not a
//! generational or incremental one — host-provided reclamation cadence
//! is sufficient and optimizing the collector itself is out of scope.

use std::cell::RefCell;
use std::ptr::NonNull;

use crate::gc_box::{ErasedGcBox, GcBox};
use crate::trace::Trace;

thread_local! {
    static HEAP: RefCell<Vec<NonNull<dyn ErasedGcBox>>> = RefCell::new(Vec::new());
}

pub(crate) fn register<T: Trace + 'static>(ptr: NonNull<GcBox<T>>) {
    HEAP.with(|heap| {
        let erased: NonNull<dyn ErasedGcBox> = ptr;
        heap.borrow_mut().push(erased);
    });
}

/// Runs a full mark-and-sweep collection over every allocation made on
/// the current thread. Boxes with at least one live [`crate::Gc`] root
/// are kept (transitively, along with everything they reach); everything
/// else is finalized and freed.
pub fn collect_garbage() {
    HEAP.with(|heap| {
        let boxes = heap.borrow();

        // Mark: every box whose root count is non-zero is a GC root, plus
        // everything transitively reachable from it.
        for b in boxes.iter() {
            // SAFETY: pointers in `HEAP` stay valid until swept below.
            let b = unsafe { b.as_ref() };
            if b.header().roots.get() > 0 {
                b.mark_and_trace();
            }
        }

        drop(boxes);

        // Sweep: anything left unmarked is unreachable garbage.
        let mut boxes = heap.borrow_mut();
        let mut keep = Vec::with_capacity(boxes.len());
        for b in boxes.drain(..) {
            // SAFETY: still valid; not yet swept.
            let marked = unsafe { b.as_ref().header().marked.get() };
            if marked {
                keep.push(b);
            } else {
                // SAFETY: unreachable, so no `Gc` can observe the free.
                unsafe {
                    let r = b.as_ref();
                    r.finalize_value();
                    r.drop_and_dealloc();
                }
            }
        }
        *boxes = keep;

        // Reset marks for the next cycle.
        for b in boxes.iter() {
            unsafe { b.as_ref().header().marked.set(false) };
        }
    });
}

/// Number of allocations currently tracked on this thread (live or not
/// yet swept); mainly useful for tests asserting the collector runs.
pub fn heap_len() -> usize {
    HEAP.with(|heap| heap.borrow().len())
}
