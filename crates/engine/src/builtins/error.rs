//! `Error.prototype` and the native error constructors:
//! `Error`, `TypeError`, `RangeError`, `ReferenceError`, `SyntaxError`,
//! `EvalError`, `URIError`. All seven share this one module — they
//! differ only in prototype chain and the `name` baked into each
//! `.prototype.name`.

use super::{arg, data_property, method, native_constructor};
use crate::context::Context;
use crate::error::JsResult;
use crate::object::{JsObject, ObjectKind};
use crate::property::{PropertyDescriptor, PropertyKey};
use crate::value::JsValue;

pub fn init_prototype(proto: &JsObject, function_prototype: &JsObject, name: &str) {
    data_property(proto, "name", JsValue::from(name));
    data_property(proto, "message", JsValue::from(""));
    method(proto, function_prototype, "toString", 0, to_string);
}

pub fn constructor(function_prototype: &JsObject, error_prototype: &JsObject, name: &'static str, parent_ctor: Option<JsObject>) -> JsObject {
    let ctor = native_constructor(function_prototype, name, 1, call, construct);
    data_property(&ctor, "prototype", JsValue::Object(error_prototype.clone()));
    let _ = error_prototype.define_own_property(
        PropertyKey::from("constructor"),
        PropertyDescriptor::data(JsValue::Object(ctor.clone()), true, false, true),
    );
    if let Some(parent) = parent_ctor {
        let _ = ctor.set_prototype_of(Some(parent));
    }
    ctor
}

/// `Error(message)` called without `new` produces a plain `Error`
/// regardless of which native error constructor is invoked as a
/// function.
fn call(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let err = crate::error::NativeError::new(crate::error::NativeErrorKind::Error, message_of(args, ctx)?);
    Ok(ctx.throw_native(err).into_value())
}

fn construct(args: &[JsValue], new_target: &JsValue, ctx: &mut Context) -> JsResult<JsValue> {
    let JsValue::Object(new_target) = new_target else {
        return Err(ctx.throw_native(crate::error::NativeError::typ("new.target must be an object")));
    };
    let proto_value = new_target.get(&PropertyKey::from("prototype"), &JsValue::Object(new_target.clone()), ctx)?;
    let proto = match proto_value {
        JsValue::Object(o) => o,
        _ => ctx.realm().intrinsics.error_prototype.clone(),
    };
    let obj = JsObject::new(Some(proto), ObjectKind::Error);
    if !matches!(arg(args, 0), JsValue::Undefined) {
        let message = message_of(args, ctx)?;
        let _ = obj.define_own_property(
            PropertyKey::from("message"),
            PropertyDescriptor::data(JsValue::from(message), true, false, true),
        );
    }
    Ok(JsValue::Object(obj))
}

fn message_of(args: &[JsValue], ctx: &mut Context) -> JsResult<vesper_string::JsString> {
    match arg(args, 0) {
        JsValue::Undefined => Ok(vesper_string::JsString::from("")),
        other => crate::operations::to_js_string(&other, ctx),
    }
}

fn to_string(this: &JsValue, _args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let obj = super::this_object(this, ctx)?;
    let name = match obj.get(&PropertyKey::from("name"), this, ctx)? {
        JsValue::Undefined => "Error".to_string(),
        other => crate::operations::to_js_string(&other, ctx)?.to_std_string_lossy(),
    };
    let message = match obj.get(&PropertyKey::from("message"), this, ctx)? {
        JsValue::Undefined => String::new(),
        other => crate::operations::to_js_string(&other, ctx)?.to_std_string_lossy(),
    };
    let result = if name.is_empty() {
        message
    } else if message.is_empty() {
        name
    } else {
        format!("{name}: {message}")
    };
    Ok(JsValue::from(result.as_str()))
}
