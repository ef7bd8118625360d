//! `Boolean.prototype` and the `Boolean` constructor.

use super::{arg, data_property, method, native_constructor};
use crate::context::Context;
use crate::error::{JsResult, NativeError};
use crate::object::{JsObject, ObjectKind};
use crate::value::JsValue;

pub fn init_prototype(proto: &JsObject, function_prototype: &JsObject) {
    method(proto, function_prototype, "toString", 0, to_string);
    method(proto, function_prototype, "valueOf", 0, value_of);
}

pub fn constructor(function_prototype: &JsObject, boolean_prototype: &JsObject) -> JsObject {
    let ctor = native_constructor(function_prototype, "Boolean", 1, call, construct);
    data_property(&ctor, "prototype", JsValue::Object(boolean_prototype.clone()));
    data_property(boolean_prototype, "constructor", JsValue::Object(ctor.clone()));
    ctor
}

fn call(_this: &JsValue, args: &[JsValue], _ctx: &mut Context) -> JsResult<JsValue> {
    Ok(JsValue::Boolean(arg(args, 0).to_boolean()))
}

fn construct(args: &[JsValue], new_target: &JsValue, ctx: &mut Context) -> JsResult<JsValue> {
    let proto = crate::evaluator::function_call::ordinary_create_from_constructor(
        new_target.as_object().ok_or_else(|| ctx.throw_native(NativeError::typ("new.target must be an object")))?,
        ctx,
    )?;
    proto.data_mut().kind = ObjectKind::BooleanObject(arg(args, 0).to_boolean());
    Ok(JsValue::Object(proto))
}

fn this_boolean_value(this: &JsValue, ctx: &mut Context) -> JsResult<bool> {
    match this {
        JsValue::Boolean(b) => Ok(*b),
        JsValue::Object(o) => match o.data().kind {
            ObjectKind::BooleanObject(b) => Ok(b),
            _ => Err(ctx.throw_native(NativeError::typ("not a Boolean"))),
        },
        _ => Err(ctx.throw_native(NativeError::typ("not a Boolean"))),
    }
}

fn to_string(this: &JsValue, _args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    Ok(JsValue::from(if this_boolean_value(this, ctx)? { "true" } else { "false" }))
}

fn value_of(this: &JsValue, _args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    Ok(JsValue::Boolean(this_boolean_value(this, ctx)?))
}
