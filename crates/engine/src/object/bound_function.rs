//! Bound-function exotic objects: `[[Call]]`/`[[Construct]]`
//! prepend the bound `this` and bound arguments ahead of the caller's.

use super::JsObject;
use crate::context::Context;
use crate::error::JsResult;
use crate::value::JsValue;
use vesper_gc::{Finalize, Trace};

pub struct BoundFunctionData {
    pub target: JsObject,
    pub bound_this: JsValue,
    pub bound_args: Vec<JsValue>,
}

impl Finalize for BoundFunctionData {
    fn finalize(&self) {
        self.target.finalize();
        self.bound_this.finalize();
        self.bound_args.finalize();
    }
}
unsafe impl Trace for BoundFunctionData {
    fn trace(&self) {
        self.target.trace();
        self.bound_this.trace();
        self.bound_args.trace();
    }
}

pub fn call(obj: &JsObject, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let (target, bound_this, bound_args) = {
        let data = obj.data();
        let super::ObjectKind::BoundFunction(b) = &data.kind else {
            unreachable!("call() dispatched only for BoundFunction kind")
        };
        (b.target.clone(), b.bound_this.clone(), b.bound_args.clone())
    };
    let mut full_args = bound_args;
    full_args.extend_from_slice(args);
    target.call(&bound_this, &full_args, ctx)
}

pub fn construct(obj: &JsObject, args: &[JsValue], new_target: &JsValue, ctx: &mut Context) -> JsResult<JsValue> {
    let (target, bound_args) = {
        let data = obj.data();
        let super::ObjectKind::BoundFunction(b) = &data.kind else {
            unreachable!("construct() dispatched only for BoundFunction kind")
        };
        (b.target.clone(), b.bound_args.clone())
    };
    let mut full_args = bound_args;
    full_args.extend_from_slice(args);
    // If `new_target` is this bound function itself, ECMA-262 rewrites
    // it to the underlying target so `new.target` inside the target
    // sees the real constructor, not the bound wrapper.
    let new_target = if matches!(new_target, JsValue::Object(o) if JsObject::ptr_eq(o, obj)) {
        JsValue::Object(target.clone())
    } else {
        new_target.clone()
    };
    target.construct(&full_args, &new_target, ctx)
}
