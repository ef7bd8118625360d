//! The `Reflect` namespace object: the internal methods,
//! exposed as ordinary callable functions rather than operators/
//! statements — `Proxy` traps are defined in terms of these.

use super::{arg, from_property_descriptor, method, to_property_descriptor};
use crate::context::Context;
use crate::error::{JsResult, NativeError};
use crate::object::{JsObject, ObjectKind};
use crate::value::JsValue;

pub fn build(function_prototype: &JsObject, object_prototype: &JsObject) -> JsObject {
    let reflect = JsObject::new(Some(object_prototype.clone()), ObjectKind::Ordinary);

    method(&reflect, function_prototype, "get", 2, get);
    method(&reflect, function_prototype, "set", 3, set);
    method(&reflect, function_prototype, "has", 2, has);
    method(&reflect, function_prototype, "deleteProperty", 2, delete_property);
    method(&reflect, function_prototype, "ownKeys", 1, own_keys);
    method(&reflect, function_prototype, "getPrototypeOf", 1, get_prototype_of);
    method(&reflect, function_prototype, "setPrototypeOf", 2, set_prototype_of);
    method(&reflect, function_prototype, "defineProperty", 3, define_property);
    method(&reflect, function_prototype, "getOwnPropertyDescriptor", 2, get_own_property_descriptor);
    method(&reflect, function_prototype, "isExtensible", 1, is_extensible);
    method(&reflect, function_prototype, "preventExtensions", 1, prevent_extensions);
    method(&reflect, function_prototype, "apply", 3, apply);
    method(&reflect, function_prototype, "construct", 2, construct);

    reflect
}

fn target_object(args: &[JsValue], ctx: &mut Context) -> JsResult<JsObject> {
    match arg(args, 0) {
        JsValue::Object(o) => Ok(o),
        _ => Err(ctx.throw_native(NativeError::typ("Reflect target must be an object"))),
    }
}

fn get(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let obj = target_object(args, ctx)?;
    let key = crate::operations::to_property_key(&arg(args, 1), ctx)?;
    let receiver = if args.len() > 2 { arg(args, 2) } else { JsValue::Object(obj.clone()) };
    obj.get(&key, &receiver, ctx)
}

fn set(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let obj = target_object(args, ctx)?;
    let key = crate::operations::to_property_key(&arg(args, 1), ctx)?;
    let value = arg(args, 2);
    let receiver = if args.len() > 3 { arg(args, 3) } else { JsValue::Object(obj.clone()) };
    Ok(JsValue::from(obj.set(key, value, &receiver, ctx)?))
}

fn has(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let obj = target_object(args, ctx)?;
    let key = crate::operations::to_property_key(&arg(args, 1), ctx)?;
    Ok(JsValue::from(obj.has_property(&key)?))
}

fn delete_property(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let obj = target_object(args, ctx)?;
    let key = crate::operations::to_property_key(&arg(args, 1), ctx)?;
    Ok(JsValue::from(obj.delete(&key)?))
}

fn own_keys(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let obj = target_object(args, ctx)?;
    let keys: Vec<JsValue> = obj
        .own_property_keys()?
        .into_iter()
        .map(|k| match k {
            crate::property::PropertyKey::String(s) => JsValue::String(s),
            crate::property::PropertyKey::Symbol(s) => JsValue::Symbol(s),
        })
        .collect();
    Ok(JsValue::Object(crate::operations::array_from_values(&keys, ctx)))
}

fn get_prototype_of(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let obj = target_object(args, ctx)?;
    Ok(obj.get_prototype_of()?.map(JsValue::Object).unwrap_or(JsValue::Null))
}

fn set_prototype_of(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let obj = target_object(args, ctx)?;
    let proto = match arg(args, 1) {
        JsValue::Object(o) => Some(o),
        JsValue::Null => None,
        _ => return Err(ctx.throw_native(NativeError::typ("prototype must be an Object or null"))),
    };
    Ok(JsValue::from(obj.set_prototype_of(proto)?))
}

fn define_property(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let obj = target_object(args, ctx)?;
    let key = crate::operations::to_property_key(&arg(args, 1), ctx)?;
    let desc = to_property_descriptor(&arg(args, 2), ctx)?;
    Ok(JsValue::from(obj.define_own_property(key, desc)?))
}

fn get_own_property_descriptor(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let obj = target_object(args, ctx)?;
    let key = crate::operations::to_property_key(&arg(args, 1), ctx)?;
    match obj.get_own_property(&key)? {
        Some(desc) => Ok(JsValue::Object(from_property_descriptor(&desc.complete(), ctx))),
        None => Ok(JsValue::Undefined),
    }
}

fn is_extensible(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let obj = target_object(args, ctx)?;
    Ok(JsValue::from(obj.is_extensible()?))
}

fn prevent_extensions(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let obj = target_object(args, ctx)?;
    Ok(JsValue::from(obj.prevent_extensions()?))
}

fn apply(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let target = arg(args, 0);
    if !target.is_callable() {
        return Err(ctx.throw_native(NativeError::typ("Reflect.apply target is not callable")));
    }
    let this_arg = arg(args, 1);
    let arg_list = args_from_array_like(&arg(args, 2), ctx)?;
    crate::operations::call(&target, &this_arg, &arg_list, ctx)
}

fn construct(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let target = arg(args, 0);
    if !target.is_constructor() {
        return Err(ctx.throw_native(NativeError::typ("Reflect.construct target is not a constructor")));
    }
    let arg_list = args_from_array_like(&arg(args, 1), ctx)?;
    let new_target = if args.len() > 2 { arg(args, 2) } else { target.clone() };
    if !new_target.is_constructor() {
        return Err(ctx.throw_native(NativeError::typ("Reflect.construct newTarget is not a constructor")));
    }
    Ok(JsValue::Object(crate::operations::construct(&target, &arg_list, &new_target, ctx)?))
}

fn args_from_array_like(value: &JsValue, ctx: &mut Context) -> JsResult<Vec<JsValue>> {
    let JsValue::Object(array_like) = value else {
        return Err(ctx.throw_native(NativeError::typ("CreateListFromArrayLike called on non-object")));
    };
    let len = crate::operations::to_length(
        &array_like.get(&crate::property::PropertyKey::from("length"), value, ctx)?,
        ctx,
    )?;
    let mut out = Vec::with_capacity(len as usize);
    for i in 0..len {
        out.push(array_like.get(&crate::property::PropertyKey::from(i as u32), value, ctx)?);
    }
    Ok(out)
}

