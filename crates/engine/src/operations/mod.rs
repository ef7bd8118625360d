//! Abstract operations that bridge values and operations:
//! type conversions ([`conversion`]), comparisons ([`equality`]), and
//! the iteration protocol ([`iteration`]). This module also collects
//! the handful of cross-cutting abstract operations (`Call`,
//! `Construct`, `SpeciesConstructor`, `InstanceofOperator`,
//! `CreateArrayFromList`) that don't belong to any one of those three.

pub mod conversion;
pub mod equality;
pub mod iteration;

pub use conversion::{
    number_to_string, to_big_int, to_index, to_int32, to_integer_or_infinity, to_js_string,
    to_length, to_number, to_object, to_primitive, to_property_key, to_uint32, PreferredType,
};
pub use equality::{abstract_equals, strict_equals};
pub use iteration::{
    for_of_iterate, get_iterator, iterator_close, iterator_complete, iterator_step,
    iterator_to_list, iterator_value, IteratorRecord,
};

use crate::context::Context;
use crate::error::{JsResult, NativeError};
use crate::object::{array::array_create, JsObject};
use crate::property::PropertyKey;
use crate::value::JsValue;

/// `Call(F, V, argumentsList)`: `TypeError` if `F` is not
/// callable, otherwise dispatches to `[[Call]]`.
pub fn call(func: &JsValue, this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    match func {
        JsValue::Object(o) if o.is_callable() => o.call(this, args, ctx),
        _ => Err(ctx.throw_native(NativeError::typ("value is not a function"))),
    }
}

/// `Construct(F, argumentsList, newTarget)`.
pub fn construct(func: &JsValue, args: &[JsValue], new_target: &JsValue, ctx: &mut Context) -> JsResult<JsObject> {
    match func {
        JsValue::Object(o) if o.is_constructor() => {
            let result = o.construct(args, new_target, ctx)?;
            match result {
                JsValue::Object(obj) => Ok(obj),
                _ => Err(ctx.throw_native(NativeError::typ("constructor did not return an object"))),
            }
        }
        _ => Err(ctx.throw_native(NativeError::typ("value is not a constructor"))),
    }
}

/// `GetV(V, P)`/`GetMethod(V, P)`: read `P` off `V` (coercing `V` to an
/// object if necessary for primitives), returning `None` if the method
/// is absent/`null`/`undefined` and `TypeError` if it exists but is not
/// callable.
pub fn get_method(value: &JsValue, key: &PropertyKey, ctx: &mut Context) -> JsResult<Option<JsObject>> {
    let func = match value {
        JsValue::Object(o) => o.get(key, value, ctx)?,
        _ => {
            let obj = to_object(value, ctx)?;
            obj.get(key, value, ctx)?
        }
    };
    match func {
        JsValue::Undefined | JsValue::Null => Ok(None),
        JsValue::Object(o) if o.is_callable() => Ok(Some(o)),
        _ => Err(ctx.throw_native(NativeError::typ("property is not callable"))),
    }
}

/// `SpeciesConstructor(O, defaultConstructor)`: consults
/// `O.constructor`, then `@@species` on it, falling back to
/// `defaultConstructor` if either is absent/`undefined`/`null` —
/// backs derived-class creation in `Array.prototype` and
/// `Promise.prototype` methods.
pub fn species_constructor(obj: &JsObject, default_ctor: JsObject, ctx: &mut Context) -> JsResult<JsObject> {
    let ctor_key = PropertyKey::from("constructor");
    let ctor_value = obj.get(&ctor_key, &JsValue::Object(obj.clone()), ctx)?;
    if ctor_value.is_undefined() {
        return Ok(default_ctor);
    }
    let JsValue::Object(ctor) = &ctor_value else {
        return Err(ctx.throw_native(NativeError::typ("constructor property is not an object")));
    };
    let species_key = PropertyKey::Symbol(ctx.well_known_symbols().species.clone());
    let species = ctor.get(&species_key, &ctor_value, ctx)?;
    match species {
        JsValue::Undefined | JsValue::Null => Ok(default_ctor),
        JsValue::Object(s) if s.is_constructor() => Ok(s),
        _ => Err(ctx.throw_native(NativeError::typ("@@species is not a constructor"))),
    }
}

/// `InstanceofOperator(O, C)`: consults `@@hasInstance` if present on
/// `C`, else `OrdinaryHasInstance`.
pub fn instance_of(obj: &JsValue, ctor: &JsValue, ctx: &mut Context) -> JsResult<bool> {
    let JsValue::Object(ctor_obj) = ctor else {
        return Err(ctx.throw_native(NativeError::typ("right-hand side of instanceof is not an object")));
    };
    let has_instance_key = PropertyKey::Symbol(ctx.well_known_symbols().has_instance.clone());
    if let Some(method) = get_method(ctor, &has_instance_key, ctx)? {
        let result = method.call(ctor, &[obj.clone()], ctx)?;
        return Ok(result.to_boolean());
    }
    ordinary_has_instance(obj, ctor_obj, ctx)
}

/// `OrdinaryHasInstance`: walks `O`'s prototype chain looking for
/// `C.prototype`.
pub fn ordinary_has_instance(obj: &JsValue, ctor: &JsObject, ctx: &mut Context) -> JsResult<bool> {
    if !ctor.is_callable() {
        return Err(ctx.throw_native(NativeError::typ("right-hand side of instanceof is not callable")));
    }
    if let crate::object::ObjectKind::BoundFunction(b) = &ctor.data().kind {
        let target = b.target.clone();
        return ordinary_has_instance(obj, &target, ctx);
    }
    let JsValue::Object(obj) = obj else {
        return Ok(false);
    };
    let proto_key = PropertyKey::from("prototype");
    let proto_value = ctor.get(&proto_key, &JsValue::Object(ctor.clone()), ctx)?;
    let JsValue::Object(proto) = proto_value else {
        return Err(ctx.throw_native(NativeError::typ("function has non-object prototype")));
    };
    let mut current = obj.get_prototype_of()?;
    while let Some(p) = current {
        if JsObject::ptr_eq(&p, &proto) {
            return Ok(true);
        }
        current = p.get_prototype_of()?;
    }
    Ok(false)
}

/// `CreateArrayFromList`: builds a (dense, fully-populated) array
/// intrinsic from a Rust slice of already-computed values — used by
/// `arguments`, `Function.prototype.apply`/spread, and `Proxy`'s
/// `apply`/`construct` trap argument marshalling.
pub fn array_from_values(values: &[JsValue], ctx: &mut Context) -> JsObject {
    let proto = ctx.realm().intrinsics.array_prototype.clone();
    let array = array_create(Some(proto), values.len() as u32);
    for (i, v) in values.iter().enumerate() {
        let _ = array.define_own_property(
            PropertyKey::from(i as u32),
            crate::property::PropertyDescriptor::data(v.clone(), true, true, true),
        );
    }
    array
}
