//! The string iterator exotic object created by
//! `String.prototype[@@iterator]`: holds the
//! `[[IteratedString]]`/`[[StringIteratorNextIndex]]` internal slots.

use vesper_gc::{Finalize, Trace};
use vesper_string::JsString;

pub struct StringIteratorData {
    pub target: JsString,
    pub index: usize,
    pub done: bool,
}

impl Finalize for StringIteratorData {
    fn finalize(&self) {}
}
unsafe impl Trace for StringIteratorData {
    fn trace(&self) {}
}
