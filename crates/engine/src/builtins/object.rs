//! `Object.prototype` and the `Object` constructor.

use super::{arg, data_property, from_property_descriptor, method, native_constructor, this_object, to_property_descriptor};
use crate::context::Context;
use crate::error::{JsResult, NativeError};
use crate::object::{JsObject, ObjectKind};
use crate::property::PropertyKey;
use crate::value::JsValue;

pub fn init_prototype(proto: &JsObject, function_prototype: &JsObject) {
    method(proto, function_prototype, "hasOwnProperty", 1, has_own_property);
    method(proto, function_prototype, "isPrototypeOf", 1, is_prototype_of);
    method(proto, function_prototype, "propertyIsEnumerable", 1, property_is_enumerable);
    method(proto, function_prototype, "toString", 0, to_string);
    method(proto, function_prototype, "toLocaleString", 0, to_string);
    method(proto, function_prototype, "valueOf", 0, value_of);
}

pub fn constructor(function_prototype: &JsObject, object_prototype: &JsObject) -> JsObject {
    let ctor = native_constructor(function_prototype, "Object", 1, call, construct);
    data_property(&ctor, "prototype", JsValue::Object(object_prototype.clone()));
    data_property(object_prototype, "constructor", JsValue::Object(ctor.clone()));

    method(&ctor, function_prototype, "keys", 1, keys);
    method(&ctor, function_prototype, "values", 1, values);
    method(&ctor, function_prototype, "entries", 1, entries);
    method(&ctor, function_prototype, "assign", 2, assign);
    method(&ctor, function_prototype, "freeze", 1, freeze);
    method(&ctor, function_prototype, "isFrozen", 1, is_frozen);
    method(&ctor, function_prototype, "create", 2, create);
    method(&ctor, function_prototype, "getPrototypeOf", 1, get_prototype_of);
    method(&ctor, function_prototype, "setPrototypeOf", 2, set_prototype_of);
    method(&ctor, function_prototype, "defineProperty", 3, define_property);
    method(&ctor, function_prototype, "defineProperties", 2, define_properties);
    method(&ctor, function_prototype, "getOwnPropertyDescriptor", 2, get_own_property_descriptor);
    method(&ctor, function_prototype, "getOwnPropertyNames", 1, get_own_property_names);
    ctor
}

fn call(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    match arg(args, 0) {
        JsValue::Undefined | JsValue::Null => Ok(JsValue::Object(JsObject::new(
            Some(ctx.realm().intrinsics.object_prototype.clone()),
            ObjectKind::Ordinary,
        ))),
        other => Ok(JsValue::Object(crate::operations::to_object(&other, ctx)?)),
    }
}

fn construct(args: &[JsValue], _new_target: &JsValue, ctx: &mut Context) -> JsResult<JsValue> {
    call(&JsValue::Undefined, args, ctx)
}

fn has_own_property(this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let obj = this_object(this, ctx)?;
    let key = crate::operations::to_property_key(&arg(args, 0), ctx)?;
    Ok(JsValue::from(obj.get_own_property(&key)?.is_some()))
}

fn is_prototype_of(this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let obj = this_object(this, ctx)?;
    let JsValue::Object(mut candidate) = arg(args, 0) else {
        return Ok(JsValue::from(false));
    };
    loop {
        let Some(proto) = candidate.get_prototype_of()? else {
            return Ok(JsValue::from(false));
        };
        if JsObject::ptr_eq(&proto, &obj) {
            return Ok(JsValue::from(true));
        }
        candidate = proto;
    }
}

fn property_is_enumerable(this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let obj = this_object(this, ctx)?;
    let key = crate::operations::to_property_key(&arg(args, 0), ctx)?;
    Ok(JsValue::from(obj.get_own_property(&key)?.map(|d| d.enumerable()).unwrap_or(false)))
}

fn to_string(this: &JsValue, _args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let tag = match this {
        JsValue::Undefined => "Undefined".to_string(),
        JsValue::Null => "Null".to_string(),
        JsValue::Object(o) => {
            let key = PropertyKey::Symbol(ctx.well_known_symbols().to_string_tag.clone());
            let explicit = o.get(&key, this, ctx)?;
            match explicit {
                JsValue::String(s) => s.to_std_string_lossy(),
                _ if o.is_callable() => "Function".to_string(),
                _ if matches!(o.data().kind, ObjectKind::Array) => "Array".to_string(),
                _ if matches!(o.data().kind, ObjectKind::Error) => "Error".to_string(),
                _ if matches!(o.data().kind, ObjectKind::BooleanObject(_)) => "Boolean".to_string(),
                _ if matches!(o.data().kind, ObjectKind::NumberObject(_)) => "Number".to_string(),
                _ if matches!(o.data().kind, ObjectKind::StringExotic(_)) => "String".to_string(),
                _ => "Object".to_string(),
            }
        }
        _ => "Object".to_string(),
    };
    Ok(JsValue::from(format!("[object {tag}]").as_str()))
}

fn value_of(this: &JsValue, _args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    Ok(JsValue::Object(crate::operations::to_object(this, ctx)?))
}

fn keys(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let obj = crate::operations::to_object(&arg(args, 0), ctx)?;
    let keys = enumerable_own_string_keys(&obj, ctx)?;
    Ok(JsValue::Object(crate::operations::array_from_values(&keys, ctx)))
}

fn values(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let obj = crate::operations::to_object(&arg(args, 0), ctx)?;
    let mut out = Vec::new();
    for key in own_enumerable_string_property_keys(&obj)? {
        out.push(obj.get(&key, &JsValue::Object(obj.clone()), ctx)?);
    }
    Ok(JsValue::Object(crate::operations::array_from_values(&out, ctx)))
}

fn entries(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let obj = crate::operations::to_object(&arg(args, 0), ctx)?;
    let mut out = Vec::new();
    for key in own_enumerable_string_property_keys(&obj)? {
        let value = obj.get(&key, &JsValue::Object(obj.clone()), ctx)?;
        let pair = crate::operations::array_from_values(&[JsValue::from(key.to_string().as_str()), value], ctx);
        out.push(JsValue::Object(pair));
    }
    Ok(JsValue::Object(crate::operations::array_from_values(&out, ctx)))
}

fn enumerable_own_string_keys(obj: &JsObject, _ctx: &mut Context) -> JsResult<Vec<JsValue>> {
    Ok(own_enumerable_string_property_keys(obj)?
        .into_iter()
        .map(|k| JsValue::from(k.to_string().as_str()))
        .collect())
}

fn own_enumerable_string_property_keys(obj: &JsObject) -> JsResult<Vec<PropertyKey>> {
    let mut out = Vec::new();
    for key in obj.own_property_keys()? {
        if matches!(key, PropertyKey::Symbol(_)) {
            continue;
        }
        if let Some(desc) = obj.get_own_property(&key)? {
            if desc.enumerable() {
                out.push(key);
            }
        }
    }
    Ok(out)
}

fn assign(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let target = crate::operations::to_object(&arg(args, 0), ctx)?;
    for source in args.iter().skip(1) {
        if source.is_null_or_undefined() {
            continue;
        }
        let source_obj = crate::operations::to_object(source, ctx)?;
        for key in own_enumerable_string_property_keys(&source_obj)? {
            let value = source_obj.get(&key, source, ctx)?;
            target.set(key, value, &JsValue::Object(target.clone()), ctx)?;
        }
        for key in source_obj.own_property_keys()? {
            let PropertyKey::Symbol(_) = &key else { continue };
            if let Some(desc) = source_obj.get_own_property(&key)? {
                if desc.enumerable() {
                    let value = source_obj.get(&key, source, ctx)?;
                    target.set(key, value, &JsValue::Object(target.clone()), ctx)?;
                }
            }
        }
    }
    Ok(JsValue::Object(target))
}

fn freeze(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let value = arg(args, 0);
    if let JsValue::Object(obj) = &value {
        obj.prevent_extensions()?;
        for key in obj.own_property_keys()? {
            if let Some(mut desc) = obj.get_own_property(&key)? {
                desc.configurable = Some(false);
                if desc.is_data_descriptor() {
                    desc.writable = Some(false);
                }
                obj.define_own_property(key, desc)?;
            }
        }
        let _ = ctx;
    }
    Ok(value)
}

fn is_frozen(_this: &JsValue, args: &[JsValue], _ctx: &mut Context) -> JsResult<JsValue> {
    let JsValue::Object(obj) = arg(args, 0) else {
        return Ok(JsValue::from(true));
    };
    if obj.is_extensible()? {
        return Ok(JsValue::from(false));
    }
    for key in obj.own_property_keys()? {
        if let Some(desc) = obj.get_own_property(&key)? {
            if desc.configurable() || (desc.is_data_descriptor() && desc.writable()) {
                return Ok(JsValue::from(false));
            }
        }
    }
    Ok(JsValue::from(true))
}

fn create(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let proto = match arg(args, 0) {
        JsValue::Object(o) => Some(o),
        JsValue::Null => None,
        _ => return Err(ctx.throw_native(NativeError::typ("Object prototype may only be an Object or null"))),
    };
    let obj = JsObject::new(proto, ObjectKind::Ordinary);
    if let JsValue::Object(props) = arg(args, 1) {
        define_properties_on(&obj, &props, ctx)?;
    }
    Ok(JsValue::Object(obj))
}

fn get_prototype_of(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let obj = crate::operations::to_object(&arg(args, 0), ctx)?;
    Ok(obj.get_prototype_of()?.map(JsValue::Object).unwrap_or(JsValue::Null))
}

fn set_prototype_of(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let target = arg(args, 0);
    let JsValue::Object(obj) = &target else {
        return Err(ctx.throw_native(NativeError::typ("Object.setPrototypeOf called on non-object")));
    };
    let proto = match arg(args, 1) {
        JsValue::Object(o) => Some(o),
        JsValue::Null => None,
        _ => return Err(ctx.throw_native(NativeError::typ("prototype must be an Object or null"))),
    };
    if !obj.set_prototype_of(proto)? {
        return Err(ctx.throw_native(NativeError::typ("could not set prototype")));
    }
    Ok(target)
}

fn define_property(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let target = arg(args, 0);
    let JsValue::Object(obj) = &target else {
        return Err(ctx.throw_native(NativeError::typ("Object.defineProperty called on non-object")));
    };
    let key = crate::operations::to_property_key(&arg(args, 1), ctx)?;
    let desc = to_property_descriptor(&arg(args, 2), ctx)?;
    if !obj.define_own_property(key, desc)? {
        return Err(ctx.throw_native(NativeError::typ("cannot redefine property")));
    }
    Ok(target)
}

fn define_properties(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let target = arg(args, 0);
    let JsValue::Object(obj) = &target else {
        return Err(ctx.throw_native(NativeError::typ("Object.defineProperties called on non-object")));
    };
    let JsValue::Object(props) = arg(args, 1) else {
        return Err(ctx.throw_native(NativeError::typ("property descriptor map must be an object")));
    };
    define_properties_on(obj, &props, ctx)?;
    Ok(target)
}

fn define_properties_on(obj: &JsObject, props: &JsObject, ctx: &mut Context) -> JsResult<()> {
    for key in own_enumerable_string_property_keys(props)? {
        let desc_value = props.get(&key, &JsValue::Object(props.clone()), ctx)?;
        let desc = to_property_descriptor(&desc_value, ctx)?;
        if !obj.define_own_property(key, desc)? {
            return Err(ctx.throw_native(NativeError::typ("cannot define property")));
        }
    }
    Ok(())
}

fn get_own_property_descriptor(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let obj = crate::operations::to_object(&arg(args, 0), ctx)?;
    let key = crate::operations::to_property_key(&arg(args, 1), ctx)?;
    match obj.get_own_property(&key)? {
        Some(desc) => Ok(JsValue::Object(from_property_descriptor(&desc.complete(), ctx))),
        None => Ok(JsValue::Undefined),
    }
}

fn get_own_property_names(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let obj = crate::operations::to_object(&arg(args, 0), ctx)?;
    let names: Vec<JsValue> = obj
        .own_property_keys()?
        .into_iter()
        .filter(|k| matches!(k, PropertyKey::String(_)))
        .map(|k| JsValue::from(k.to_string().as_str()))
        .collect();
    Ok(JsValue::Object(crate::operations::array_from_values(&names, ctx)))
}

pub(crate) fn own_enumerable_keys(obj: &JsObject) -> JsResult<Vec<PropertyKey>> {
    own_enumerable_string_property_keys(obj)
}
