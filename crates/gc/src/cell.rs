use std::cell::{Ref, RefCell, RefMut};
use std::fmt;

use crate::trace::{Finalize, Trace};

/// A [`RefCell`] whose contents participate in tracing. Objects,
/// environment records and module records wrap their mutable state in
/// this rather than a bare `RefCell`, so the collector can still see
/// through an object that has been mutated after creation.
#[derive(Default)]
pub struct GcRefCell<T> {
    cell: RefCell<T>,
}

impl<T> GcRefCell<T> {
    pub fn new(value: T) -> Self {
        Self {
            cell: RefCell::new(value),
        }
    }

    pub fn borrow(&self) -> Ref<'_, T> {
        self.cell.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.cell.borrow_mut()
    }

    pub fn into_inner(self) -> T {
        self.cell.into_inner()
    }
}

impl<T: fmt::Debug> fmt::Debug for GcRefCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.cell.fmt(f)
    }
}

unsafe impl<T: Trace> Trace for GcRefCell<T> {
    fn trace(&self) {
        self.cell.borrow().trace();
    }
}

impl<T: Finalize> Finalize for GcRefCell<T> {
    fn finalize(&self) {
        self.cell.borrow().finalize();
    }
}
