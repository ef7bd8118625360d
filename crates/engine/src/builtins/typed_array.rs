//! `Uint8Array`: one concrete instantiation of the `IntegerIndexed`
//! exotic kind, proving the kind works without building out the full
//! typed-array element-type matrix — `Int16Array`/`Float64Array`/etc.
//! would be mechanical repetition over the same internal-method table.

use super::{arg, data_property, method, native_constructor};
use crate::context::Context;
use crate::error::{JsResult, NativeError};
use crate::object::{IntegerIndexedData, JsObject, ObjectKind};
use crate::value::JsValue;
use vesper_gc::GcRefCell;

pub fn install(object_prototype: &JsObject, function_prototype: &JsObject) -> JsObject {
    let proto = JsObject::new(Some(object_prototype.clone()), ObjectKind::Ordinary);
    method(&proto, function_prototype, "fill", 1, fill);
    method(&proto, function_prototype, "join", 1, join);

    let ctor = native_constructor(function_prototype, "Uint8Array", 1, call, construct);
    data_property(&ctor, "prototype", JsValue::Object(proto.clone()));
    data_property(&proto, "constructor", JsValue::Object(ctor.clone()));
    ctor
}

fn call(_this: &JsValue, _args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    Err(ctx.throw_native(NativeError::typ("Constructor Uint8Array requires 'new'")))
}

fn construct(args: &[JsValue], new_target: &JsValue, ctx: &mut Context) -> JsResult<JsValue> {
    let obj = crate::evaluator::function_call::ordinary_create_from_constructor(
        new_target.as_object().ok_or_else(|| ctx.throw_native(NativeError::typ("new.target must be an object")))?,
        ctx,
    )?;
    let buffer = match arg(args, 0) {
        JsValue::Number(n) => {
            let len = n.max(0.0) as usize;
            vec![0u8; len]
        }
        JsValue::Object(source) if matches!(source.data().kind, ObjectKind::Array) => {
            let len = crate::object::array::current_length(&source);
            let mut buf = Vec::with_capacity(len as usize);
            for i in 0..len {
                let v = source.get(&crate::property::PropertyKey::from(i), &JsValue::Object(source.clone()), ctx)?;
                buf.push(crate::operations::to_uint32(&v, ctx)? as u8);
            }
            buf
        }
        JsValue::Undefined => Vec::new(),
        other => {
            let len = crate::operations::to_length(&other, ctx)?;
            vec![0u8; len as usize]
        }
    };
    let length = buffer.len();
    obj.data_mut().kind = ObjectKind::IntegerIndexed(IntegerIndexedData { buffer: GcRefCell::new(buffer), length });
    Ok(JsValue::Object(obj))
}

fn this_buffer(this: &JsValue, ctx: &mut Context) -> JsResult<JsObject> {
    match this {
        JsValue::Object(o) if matches!(o.data().kind, ObjectKind::IntegerIndexed(_)) => Ok(o.clone()),
        _ => Err(ctx.throw_native(NativeError::typ("not a Uint8Array"))),
    }
}

fn fill(this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let obj = this_buffer(this, ctx)?;
    let value = crate::operations::to_uint32(&arg(args, 0), ctx)? as u8;
    let data = obj.data();
    let ObjectKind::IntegerIndexed(indexed) = &data.kind else { unreachable!() };
    let mut buffer = indexed.buffer.borrow_mut();
    buffer.iter_mut().for_each(|b| *b = value);
    drop(buffer);
    drop(data);
    Ok(this.clone())
}

fn join(this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let obj = this_buffer(this, ctx)?;
    let sep = match arg(args, 0) {
        JsValue::Undefined => ",".to_string(),
        other => crate::operations::to_js_string(&other, ctx)?.to_std_string_lossy(),
    };
    let data = obj.data();
    let ObjectKind::IntegerIndexed(indexed) = &data.kind else { unreachable!() };
    let buffer = indexed.buffer.borrow();
    let joined = buffer.iter().map(|b| b.to_string()).collect::<Vec<_>>().join(&sep);
    Ok(JsValue::from(joined.as_str()))
}
