//! Capturing native functions: `NativeFn` (a bare `fn` pointer) can't
//! close over state, so anything that needs to remember a value across
//! calls — a `Promise`'s resolve/reject pair remembering which promise
//! they settle, an iterator remembering its source and position — is
//! built from this kind instead: a `fn` pointer plus an explicit vector
//! of captured values, the same shape `BoundFunctionData` already uses
//! for bound `this`/arguments.

use super::JsObject;
use crate::context::Context;
use crate::error::JsResult;
use crate::value::JsValue;
use vesper_gc::{Finalize, Trace};

pub type NativeClosureFn =
    fn(this: &JsValue, args: &[JsValue], captures: &[JsValue], ctx: &mut Context) -> JsResult<JsValue>;

#[derive(Clone)]
pub struct NativeClosureData {
    pub call: NativeClosureFn,
    pub captures: Vec<JsValue>,
    pub name: &'static str,
    pub length: usize,
}

impl Finalize for NativeClosureData {
    fn finalize(&self) {
        self.captures.finalize();
    }
}
unsafe impl Trace for NativeClosureData {
    fn trace(&self) {
        self.captures.trace();
    }
}
