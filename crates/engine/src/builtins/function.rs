//! `Function.prototype` and the `Function` constructor.
//! `Function.prototype` itself is a callable accepting any arguments
//! and returning `undefined` — `noop_call` backs that.

use super::{arg, data_property, method, native_function};
use crate::context::Context;
use crate::error::{JsResult, NativeError};
use crate::object::JsObject;
use crate::property::PropertyKey;
use crate::value::JsValue;

pub fn noop_call(_this: &JsValue, _args: &[JsValue], _ctx: &mut Context) -> JsResult<JsValue> {
    Ok(JsValue::Undefined)
}

pub fn init_prototype(proto: &JsObject) {
    let proto_clone = proto.clone();
    method(proto, &proto_clone, "call", 1, call);
    method(proto, &proto_clone, "apply", 2, apply);
    method(proto, &proto_clone, "bind", 1, bind);
    method(proto, &proto_clone, "toString", 0, to_string);
}

/// `Function` itself is not constructible from source in this engine
/// (no `new Function(body)` — that would require re-entering the
/// parser from a builtin, which the evaluator's embedding surface does
/// not expose). It still exists as an intrinsic so `fn.constructor ===
/// Function` holds.
pub fn constructor(function_prototype: &JsObject) -> JsObject {
    let ctor = native_function(function_prototype, "Function", 1, call_ctor);
    data_property(&ctor, "prototype", JsValue::Object(function_prototype.clone()));
    data_property(function_prototype, "constructor", JsValue::Object(ctor.clone()));
    ctor
}

fn call_ctor(_this: &JsValue, _args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    Err(ctx.throw_native(NativeError::typ("Function constructor is not supported")))
}

fn call(this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let JsValue::Object(f) = this else {
        return Err(ctx.throw_native(NativeError::typ("Function.prototype.call called on non-callable")));
    };
    let bound_this = arg(args, 0);
    let rest = if args.is_empty() { &[][..] } else { &args[1..] };
    f.call(&bound_this, rest, ctx)
}

fn apply(this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let JsValue::Object(f) = this else {
        return Err(ctx.throw_native(NativeError::typ("Function.prototype.apply called on non-callable")));
    };
    let bound_this = arg(args, 0);
    let arg_list = match arg(args, 1) {
        JsValue::Undefined | JsValue::Null => Vec::new(),
        JsValue::Object(array_like) => {
            let len = crate::operations::to_length(
                &array_like.get(&PropertyKey::from("length"), &JsValue::Object(array_like.clone()), ctx)?,
                ctx,
            )?;
            let mut out = Vec::with_capacity(len as usize);
            for i in 0..len {
                out.push(array_like.get(&PropertyKey::from(i as u32), &JsValue::Object(array_like.clone()), ctx)?);
            }
            out
        }
        _ => return Err(ctx.throw_native(NativeError::typ("CreateListFromArrayLike called on non-object"))),
    };
    f.call(&bound_this, &arg_list, ctx)
}

fn bind(this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let JsValue::Object(target) = this else {
        return Err(ctx.throw_native(NativeError::typ("Function.prototype.bind called on non-callable")));
    };
    let bound_this = arg(args, 0);
    let bound_args = if args.is_empty() { Vec::new() } else { args[1..].to_vec() };
    let data = crate::object::BoundFunctionData {
        target: target.clone(),
        bound_this,
        bound_args,
    };
    let proto = target.get_prototype_of()?;
    let bound = JsObject::new(proto, crate::object::ObjectKind::BoundFunction(data));
    let name_value = target.get(&PropertyKey::from("name"), this, ctx)?;
    let base_name = name_value.as_string().map(|s| s.to_std_string_lossy()).unwrap_or_default();
    data_property(&bound, "name", JsValue::from(format!("bound {base_name}").as_str()));
    let length_value = target.get(&PropertyKey::from("length"), this, ctx)?;
    let base_length = crate::operations::to_integer_or_infinity(&length_value, ctx)?.max(0.0);
    let remaining = (base_length - (args.len().saturating_sub(1)) as f64).max(0.0);
    data_property(&bound, "length", JsValue::from(remaining));
    Ok(JsValue::Object(bound))
}

fn to_string(this: &JsValue, _args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let JsValue::Object(f) = this else {
        return Err(ctx.throw_native(NativeError::typ("Function.prototype.toString called on non-function")));
    };
    let name = f
        .get(&PropertyKey::from("name"), this, ctx)?
        .as_string()
        .map(|s| s.to_std_string_lossy())
        .unwrap_or_default();
    Ok(JsValue::from(format!("function {name}() {{ [native code] }}").as_str()))
}
