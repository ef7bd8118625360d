//! `%IteratorPrototype%`, the array/string iterator prototypes, and a
//! placeholder `%GeneratorPrototype%`.

use super::{arg, method, symbol_method};
use crate::context::Context;
use crate::error::JsResult;
use crate::object::{ArrayIterKind, ArrayIteratorData, JsObject, ObjectKind, StringIteratorData};
use crate::property::PropertyKey;
use crate::value::{JsValue, WellKnownSymbols};

pub use crate::object::ArrayIterKind as ArrayIterKindAlias;
pub type ArrayIterKindPub = ArrayIterKind;

fn return_this(this: &JsValue, _args: &[JsValue], _ctx: &mut Context) -> JsResult<JsValue> {
    Ok(this.clone())
}

/// `%IteratorPrototype%[Symbol.iterator]` just returns `this` — every
/// built-in iterator inherits this rather than redefining it.
pub fn init_iterator_prototype(proto: &JsObject, function_prototype: &JsObject, wks: &WellKnownSymbols) {
    symbol_method(proto, function_prototype, wks.iterator.clone(), "[Symbol.iterator]", 0, return_this);
}

fn iter_result(value: JsValue, done: bool, ctx: &mut Context) -> JsObject {
    let obj = JsObject::new(Some(ctx.realm().intrinsics.object_prototype.clone()), ObjectKind::Ordinary);
    super::data_property(&obj, "value", value);
    // `value`/`done` are ordinary writable/enumerable/configurable data
    // properties on iterator results, not the builtin-shaped ones.
    let _ = obj.define_own_property(PropertyKey::from("value"), crate::property::PropertyDescriptor::data(JsValue::Undefined, true, true, true));
    let _ = obj.define_own_property(PropertyKey::from("done"), crate::property::PropertyDescriptor::data(JsValue::from(done), true, true, true));
    obj
}

fn set_result_value(obj: &JsObject, value: JsValue) {
    let _ = obj.define_own_property(PropertyKey::from("value"), crate::property::PropertyDescriptor::data(value, true, true, true));
}

pub fn make_array_iterator(target: JsObject, kind: ArrayIterKind, ctx: &mut Context) -> JsObject {
    JsObject::new(
        Some(ctx.realm().intrinsics.array_iterator_prototype.clone()),
        ObjectKind::ArrayIterator(ArrayIteratorData { target, index: 0, kind, done: false }),
    )
}

pub fn init_array_iterator_prototype(_proto: &JsObject, _function_prototype: &JsObject, _wks: &WellKnownSymbols) {
    // `next` is installed by `init_array_iterator_methods`, called once
    // `create_realm` has the array prototype available to build the
    // `%ArrayIteratorPrototype%` object against.
}

pub fn init_array_iterator_methods(proto: &JsObject, function_prototype: &JsObject, _wks: &WellKnownSymbols) {
    method(proto, function_prototype, "next", 0, array_iterator_next);
}

fn array_iterator_next(this: &JsValue, _args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let JsValue::Object(obj) = this else {
        return Err(ctx.throw_native(crate::error::NativeError::typ("not an array iterator")));
    };
    let (target, index, kind, done) = {
        let data = obj.data();
        let ObjectKind::ArrayIterator(it) = &data.kind else {
            return Err(ctx.throw_native(crate::error::NativeError::typ("not an array iterator")));
        };
        (it.target.clone(), it.index, it.kind, it.done)
    };
    if done {
        return Ok(JsValue::Object(iter_result(JsValue::Undefined, true, ctx)));
    }
    let len = crate::operations::to_length(
        &target.get(&PropertyKey::from("length"), &JsValue::Object(target.clone()), ctx)?,
        ctx,
    )?;
    if index >= len {
        obj.data_mut().kind = ObjectKind::ArrayIterator(ArrayIteratorData { target, index, kind, done: true });
        return Ok(JsValue::Object(iter_result(JsValue::Undefined, true, ctx)));
    }
    let value = match kind {
        ArrayIterKind::Keys => JsValue::from(index as f64),
        ArrayIterKind::Values => target.get(&PropertyKey::from(index as u32), &JsValue::Object(target.clone()), ctx)?,
        ArrayIterKind::Entries => {
            let v = target.get(&PropertyKey::from(index as u32), &JsValue::Object(target.clone()), ctx)?;
            JsValue::Object(crate::operations::array_from_values(&[JsValue::from(index as f64), v], ctx))
        }
    };
    obj.data_mut().kind = ObjectKind::ArrayIterator(ArrayIteratorData { target, index: index + 1, kind, done: false });
    let result = iter_result(JsValue::Undefined, false, ctx);
    set_result_value(&result, value);
    Ok(JsValue::Object(result))
}

pub fn make_string_iterator(target: vesper_string::JsString, ctx: &mut Context) -> JsObject {
    JsObject::new(
        Some(ctx.realm().intrinsics.string_iterator_prototype.clone()),
        ObjectKind::StringIterator(StringIteratorData { target, index: 0, done: false }),
    )
}

pub fn init_string_iterator_prototype(proto: &JsObject, function_prototype: &JsObject, _wks: &WellKnownSymbols) {
    method(proto, function_prototype, "next", 0, string_iterator_next);
}

fn string_iterator_next(this: &JsValue, _args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let JsValue::Object(obj) = this else {
        return Err(ctx.throw_native(crate::error::NativeError::typ("not a string iterator")));
    };
    let (target, index, done) = {
        let data = obj.data();
        let ObjectKind::StringIterator(it) = &data.kind else {
            return Err(ctx.throw_native(crate::error::NativeError::typ("not a string iterator")));
        };
        (it.target.clone(), it.index, it.done)
    };
    let units = target.as_slice();
    if done || index >= units.len() {
        obj.data_mut().kind = ObjectKind::StringIterator(StringIteratorData { target, index, done: true });
        return Ok(JsValue::Object(iter_result(JsValue::Undefined, true, ctx)));
    }
    let first = units[index];
    let width = if (0xD800..=0xDBFF).contains(&first) && index + 1 < units.len() && (0xDC00..=0xDFFF).contains(&units[index + 1]) {
        2
    } else {
        1
    };
    let grapheme = vesper_string::JsString::from(&units[index..index + width]);
    obj.data_mut().kind = ObjectKind::StringIterator(StringIteratorData { target, index: index + width, done: false });
    let result = iter_result(JsValue::Undefined, false, ctx);
    set_result_value(&result, JsValue::from(grapheme));
    Ok(JsValue::Object(result))
}

/// This engine evaluates generator bodies eagerly, buffering yielded
/// values rather than suspending a real call stack (see the evaluator's
/// generator support) — `%GeneratorPrototype%.next` only replays that
/// buffer, it never re-enters user code.
pub fn init_generator_prototype(proto: &JsObject, function_prototype: &JsObject) {
    method(proto, function_prototype, "next", 1, generator_next);
    method(proto, function_prototype, "return", 1, generator_return);
    method(proto, function_prototype, "throw", 1, generator_throw);
}

fn generator_next(this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    crate::evaluator::generator::resume(this, arg(args, 0), ctx)
}

fn generator_return(this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    crate::evaluator::generator::finish(this, arg(args, 0), ctx)
}

fn generator_throw(this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    crate::evaluator::generator::throw_into(this, arg(args, 0), ctx)
}
