use std::fmt;
use std::ops::Deref;
use std::ptr::NonNull;

use crate::gc_box::GcBox;
use crate::trace::{Finalize, Trace};

/// A garbage-collected pointer, the heap reference every [`crate::Trace`]
/// graph (objects, environments, module records) is built from.
///
/// Cloning a `Gc` is cheap and increments the pointee's root count;
/// dropping the last live `Gc` for a box does not free it immediately —
/// reclamation happens the next time [`crate::collect_garbage`] runs,
/// which is what lets cyclic structures (an object whose prototype chain
/// loops back to it, a closure whose environment captures the function
/// that owns it) collect correctly.
pub struct Gc<T: Trace + 'static> {
    pub(crate) ptr: NonNull<GcBox<T>>,
}

impl<T: Trace + 'static> Gc<T> {
    pub fn new(value: T) -> Self {
        Gc {
            ptr: GcBox::new(value),
        }
    }

    fn inner(&self) -> &GcBox<T> {
        // SAFETY: a `Gc` always holds its pointee's root count above zero
        // while it exists, so the box cannot have been swept.
        unsafe { self.ptr.as_ref() }
    }

    /// Identity comparison: do these two handles point at the same box?
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        std::ptr::eq(this.ptr.as_ptr(), other.ptr.as_ptr())
    }

    /// The box's address, stable for the lifetime of the allocation —
    /// used by callers that need to hash or otherwise key on identity
    /// (e.g. `JsObject`'s `Hash` impl).
    pub fn as_ptr(&self) -> *const () {
        self.ptr.as_ptr() as *const ()
    }
}

impl<T: Trace + 'static> Deref for Gc<T> {
    type Target = T;
    fn deref(&self) -> &T {
        &self.inner().value
    }
}

impl<T: Trace + 'static> Clone for Gc<T> {
    fn clone(&self) -> Self {
        let header = &self.inner().header;
        header.roots.set(header.roots.get() + 1);
        Gc { ptr: self.ptr }
    }
}

impl<T: Trace + 'static> Drop for Gc<T> {
    fn drop(&mut self) {
        let header = &self.inner().header;
        header.roots.set(header.roots.get().saturating_sub(1));
        // The box itself is reclaimed by the next `collect_garbage`, not
        // here — freeing eagerly would be unsound for cycles.
    }
}

unsafe impl<T: Trace + 'static> Trace for Gc<T> {
    fn trace(&self) {
        // Only recurse the first time this box is visited in a cycle;
        // without this check a reference cycle would recurse forever.
        if !self.inner().header.marked.replace(true) {
            self.inner().value.trace();
        }
    }
}

impl<T: Trace + 'static> Finalize for Gc<T> {}

impl<T: Trace + fmt::Debug> fmt::Debug for Gc<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, f)
    }
}

impl<T: Trace + fmt::Display> fmt::Display for Gc<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&**self, f)
    }
}

impl<T: Trace + PartialEq> PartialEq for Gc<T> {
    fn eq(&self, other: &Self) -> bool {
        **self == **other
    }
}
impl<T: Trace + Eq> Eq for Gc<T> {}
