//! `Number.prototype` and the `Number` constructor.

use super::{arg, data_property, method, native_constructor};
use crate::context::Context;
use crate::error::{JsResult, NativeError};
use crate::object::{JsObject, ObjectKind};
use crate::value::JsValue;

pub fn init_prototype(proto: &JsObject, function_prototype: &JsObject) {
    method(proto, function_prototype, "toString", 1, to_string);
    method(proto, function_prototype, "toLocaleString", 0, to_string);
    method(proto, function_prototype, "valueOf", 0, value_of);
    method(proto, function_prototype, "toFixed", 1, to_fixed);
}

pub fn constructor(function_prototype: &JsObject, number_prototype: &JsObject) -> JsObject {
    let ctor = native_constructor(function_prototype, "Number", 1, call, construct);
    data_property(&ctor, "prototype", JsValue::Object(number_prototype.clone()));
    data_property(number_prototype, "constructor", JsValue::Object(ctor.clone()));

    data_property(&ctor, "MAX_SAFE_INTEGER", JsValue::from(9007199254740991.0));
    data_property(&ctor, "MIN_SAFE_INTEGER", JsValue::from(-9007199254740991.0));
    data_property(&ctor, "MAX_VALUE", JsValue::from(f64::MAX));
    data_property(&ctor, "MIN_VALUE", JsValue::from(f64::MIN_POSITIVE));
    data_property(&ctor, "EPSILON", JsValue::from(f64::EPSILON));
    data_property(&ctor, "POSITIVE_INFINITY", JsValue::from(f64::INFINITY));
    data_property(&ctor, "NEGATIVE_INFINITY", JsValue::from(f64::NEG_INFINITY));
    data_property(&ctor, "NaN", JsValue::from(f64::NAN));

    method(&ctor, function_prototype, "isInteger", 1, is_integer);
    method(&ctor, function_prototype, "isFinite", 1, is_finite);
    method(&ctor, function_prototype, "isNaN", 1, is_nan);
    method(&ctor, function_prototype, "isSafeInteger", 1, is_safe_integer);
    method(&ctor, function_prototype, "parseFloat", 1, parse_float);
    method(&ctor, function_prototype, "parseInt", 2, parse_int);
    ctor
}

fn call(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    if args.is_empty() {
        return Ok(JsValue::Number(0.0));
    }
    Ok(JsValue::Number(crate::operations::to_number(&arg(args, 0), ctx)?))
}

fn construct(args: &[JsValue], new_target: &JsValue, ctx: &mut Context) -> JsResult<JsValue> {
    let n = if args.is_empty() { 0.0 } else { crate::operations::to_number(&arg(args, 0), ctx)? };
    let proto = crate::evaluator::function_call::ordinary_create_from_constructor(
        new_target.as_object().ok_or_else(|| ctx.throw_native(NativeError::typ("new.target must be an object")))?,
        ctx,
    )?;
    proto.data_mut().kind = ObjectKind::NumberObject(n);
    Ok(JsValue::Object(proto))
}

fn this_number_value(this: &JsValue, ctx: &mut Context) -> JsResult<f64> {
    match this {
        JsValue::Number(n) => Ok(*n),
        JsValue::Object(o) => match o.data().kind {
            ObjectKind::NumberObject(n) => Ok(n),
            _ => Err(ctx.throw_native(NativeError::typ("not a Number"))),
        },
        _ => Err(ctx.throw_native(NativeError::typ("not a Number"))),
    }
}

fn to_string(this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let n = this_number_value(this, ctx)?;
    let radix_value = arg(args, 0);
    if radix_value.is_undefined() {
        return Ok(JsValue::from(crate::operations::number_to_string(n).as_str()));
    }
    let radix = crate::operations::to_integer_or_infinity(&radix_value, ctx)? as u32;
    if radix == 10 {
        return Ok(JsValue::from(crate::operations::number_to_string(n).as_str()));
    }
    if !(2..=36).contains(&radix) {
        return Err(ctx.throw_native(NativeError::range("radix must be between 2 and 36")));
    }
    Ok(JsValue::from(to_radix_string(n, radix).as_str()))
}

fn to_radix_string(n: f64, radix: u32) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity".to_string() } else { "-Infinity".to_string() };
    }
    let negative = n < 0.0;
    let mut int_part = n.abs().trunc() as u64;
    let digits = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut out = Vec::new();
    if int_part == 0 {
        out.push(b'0');
    }
    while int_part > 0 {
        out.push(digits[(int_part % radix as u64) as usize]);
        int_part /= radix as u64;
    }
    out.reverse();
    let mut result = String::from_utf8(out).unwrap();
    if negative {
        result.insert(0, '-');
    }
    result
}

fn value_of(this: &JsValue, _args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    Ok(JsValue::Number(this_number_value(this, ctx)?))
}

fn to_fixed(this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let n = this_number_value(this, ctx)?;
    let digits = crate::operations::to_integer_or_infinity(&arg(args, 0), ctx)?;
    if !(0.0..=100.0).contains(&digits) {
        return Err(ctx.throw_native(NativeError::range("toFixed digits out of range")));
    }
    if n.is_nan() {
        return Ok(JsValue::from("NaN"));
    }
    Ok(JsValue::from(format!("{n:.*}", digits as usize).as_str()))
}

fn is_integer(_this: &JsValue, args: &[JsValue], _ctx: &mut Context) -> JsResult<JsValue> {
    Ok(JsValue::from(matches!(arg(args, 0), JsValue::Number(n) if n.is_finite() && n.trunc() == n)))
}

fn is_finite(_this: &JsValue, args: &[JsValue], _ctx: &mut Context) -> JsResult<JsValue> {
    Ok(JsValue::from(matches!(arg(args, 0), JsValue::Number(n) if n.is_finite())))
}

fn is_nan(_this: &JsValue, args: &[JsValue], _ctx: &mut Context) -> JsResult<JsValue> {
    Ok(JsValue::from(matches!(arg(args, 0), JsValue::Number(n) if n.is_nan())))
}

fn is_safe_integer(_this: &JsValue, args: &[JsValue], _ctx: &mut Context) -> JsResult<JsValue> {
    Ok(JsValue::from(
        matches!(arg(args, 0), JsValue::Number(n) if n.is_finite() && n.trunc() == n && n.abs() <= 9007199254740991.0),
    ))
}

fn parse_float(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    super::globals::parse_float(&JsValue::Undefined, args, ctx)
}

fn parse_int(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    super::globals::parse_int(&JsValue::Undefined, args, ctx)
}
