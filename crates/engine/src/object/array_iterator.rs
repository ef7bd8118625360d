//! The array iterator exotic object created by
//! `Array.prototype[@@iterator]` (and its `keys`/`values`/`entries`
//! variants): holds the
//! `[[ArrayIteratorNextIndex]]`/`[[IteratedArrayLike]]` internal slots.

use crate::object::JsObject;
use vesper_gc::{Finalize, Trace};

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ArrayIterKind {
    Keys,
    Values,
    Entries,
}

pub struct ArrayIteratorData {
    pub target: JsObject,
    pub index: u64,
    pub kind: ArrayIterKind,
    pub done: bool,
}

impl Finalize for ArrayIteratorData {
    fn finalize(&self) {
        self.target.finalize();
    }
}
unsafe impl Trace for ArrayIteratorData {
    fn trace(&self) {
        self.target.trace();
    }
}
