//! Type-conversion abstract operations.

use crate::context::Context;
use crate::error::{JsResult, NativeError};
use crate::object::{JsObject, ObjectKind};
use crate::value::{JsBigInt, JsValue};
use vesper_string::JsString;

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum PreferredType {
    Default,
    String,
    Number,
}

/// `ToPrimitive`: tries `Symbol.toPrimitive` first, then falls back to
/// the ordinary `valueOf`/`toString` (or `toString`/`valueOf`) order
/// per `hint`.
pub fn to_primitive(value: &JsValue, hint: PreferredType, ctx: &mut Context) -> JsResult<JsValue> {
    let JsValue::Object(obj) = value else {
        return Ok(value.clone());
    };
    let exotic_key = crate::property::PropertyKey::Symbol(ctx.well_known_symbols().to_primitive.clone());
    let exotic = obj.get(&exotic_key, value, ctx)?;
    if let JsValue::Object(f) = &exotic {
        if f.is_callable() {
            let hint_str = match hint {
                PreferredType::Default => "default",
                PreferredType::String => "string",
                PreferredType::Number => "number",
            };
            let result = f.call(value, &[JsValue::from(hint_str)], ctx)?;
            if !result.is_object() {
                return Ok(result);
            }
            return Err(ctx.throw_native(NativeError::typ("Symbol.toPrimitive returned an object")));
        }
    }
    let method_order: [&str; 2] = match hint {
        PreferredType::String => ["toString", "valueOf"],
        _ => ["valueOf", "toString"],
    };
    for method_name in method_order {
        let key = crate::property::PropertyKey::from(method_name);
        let method = obj.get(&key, value, ctx)?;
        if let JsValue::Object(f) = &method {
            if f.is_callable() {
                let result = f.call(value, &[], ctx)?;
                if !result.is_object() {
                    return Ok(result);
                }
            }
        }
    }
    Err(ctx.throw_native(NativeError::typ("cannot convert object to primitive value")))
}

/// `ToBoolean` never throws and is cheap enough to live on `JsValue`
/// itself (`JsValue::to_boolean`); kept out of this module.
pub fn to_number(value: &JsValue, ctx: &mut Context) -> JsResult<f64> {
    match value {
        JsValue::Undefined => Ok(f64::NAN),
        JsValue::Null => Ok(0.0),
        JsValue::Boolean(b) => Ok(if *b { 1.0 } else { 0.0 }),
        JsValue::Number(n) => Ok(*n),
        JsValue::String(s) => Ok(string_to_number(s)),
        JsValue::BigInt(_) => Err(ctx.throw_native(NativeError::typ("cannot convert a BigInt to a number"))),
        JsValue::Symbol(_) => Err(ctx.throw_native(NativeError::typ("cannot convert a Symbol to a number"))),
        JsValue::Object(_) => {
            let prim = to_primitive(value, PreferredType::Number, ctx)?;
            to_number(&prim, ctx)
        }
    }
}

fn string_to_number(s: &JsString) -> f64 {
    let text = s.to_std_string_lossy();
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    if let Some(hex) = trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
        return i64::from_str_radix(hex, 16).map(|n| n as f64).unwrap_or(f64::NAN);
    }
    if let Some(oct) = trimmed.strip_prefix("0o").or_else(|| trimmed.strip_prefix("0O")) {
        return i64::from_str_radix(oct, 8).map(|n| n as f64).unwrap_or(f64::NAN);
    }
    if let Some(bin) = trimmed.strip_prefix("0b").or_else(|| trimmed.strip_prefix("0B")) {
        return i64::from_str_radix(bin, 2).map(|n| n as f64).unwrap_or(f64::NAN);
    }
    match trimmed {
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        _ => trimmed.parse::<f64>().unwrap_or(f64::NAN),
    }
}

/// `ToString` (the abstract operation, not `JsValue`'s own `Debug`
/// rendering, which is diagnostic-only).
pub fn to_js_string(value: &JsValue, ctx: &mut Context) -> JsResult<JsString> {
    match value {
        JsValue::Undefined => Ok(JsString::from("undefined")),
        JsValue::Null => Ok(JsString::from("null")),
        JsValue::Boolean(b) => Ok(JsString::from(if *b { "true" } else { "false" })),
        JsValue::Number(n) => Ok(JsString::from(number_to_string(*n).as_str())),
        JsValue::String(s) => Ok(s.clone()),
        JsValue::BigInt(b) => Ok(JsString::from(b.to_string().as_str())),
        JsValue::Symbol(_) => Err(ctx.throw_native(NativeError::typ("cannot convert a Symbol to a string"))),
        JsValue::Object(_) => {
            let prim = to_primitive(value, PreferredType::String, ctx)?;
            to_js_string(&prim, ctx)
        }
    }
}

/// A condensed `Number::toString` (the full shortest-round-trip
/// grammar is not reproduced here; covers NaN/Infinity/zero/integers/
/// general floats well enough for diagnostic and builtin-`String()`
/// purposes).
pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity".to_string() } else { "-Infinity".to_string() };
    }
    if n.fract() == 0.0 && n.abs() < 1e21 {
        return format!("{n:.0}");
    }
    format!("{n}")
}

pub fn to_object(value: &JsValue, ctx: &mut Context) -> JsResult<JsObject> {
    match value {
        JsValue::Undefined | JsValue::Null => Err(ctx.throw_native(NativeError::typ("cannot convert undefined or null to object"))),
        JsValue::Object(o) => Ok(o.clone()),
        JsValue::Boolean(b) => Ok(JsObject::new(
            Some(ctx.realm().intrinsics.boolean_prototype.clone()),
            ObjectKind::BooleanObject(*b),
        )),
        JsValue::Number(n) => Ok(JsObject::new(
            Some(ctx.realm().intrinsics.number_prototype.clone()),
            ObjectKind::NumberObject(*n),
        )),
        JsValue::String(s) => {
            let obj = JsObject::new(
                Some(ctx.realm().intrinsics.string_prototype.clone()),
                ObjectKind::StringExotic(s.clone()),
            );
            obj.data_mut().properties.insert(
                crate::property::PropertyKey::from("length"),
                crate::property::PropertyDescriptor::data(JsValue::from(s.len() as u32), false, false, false),
            );
            Ok(obj)
        }
        JsValue::BigInt(_) | JsValue::Symbol(_) => Ok(JsObject::new(
            Some(ctx.realm().intrinsics.object_prototype.clone()),
            ObjectKind::Ordinary,
        )),
    }
}

/// `ToIntegerOrInfinity`.
pub fn to_integer_or_infinity(value: &JsValue, ctx: &mut Context) -> JsResult<f64> {
    let n = to_number(value, ctx)?;
    if n.is_nan() {
        return Ok(0.0);
    }
    if n.is_infinite() {
        return Ok(n);
    }
    Ok(n.trunc())
}

pub fn to_length(value: &JsValue, ctx: &mut Context) -> JsResult<u64> {
    let n = to_integer_or_infinity(value, ctx)?;
    if n <= 0.0 {
        return Ok(0);
    }
    Ok(n.min(2f64.powi(53) - 1.0) as u64)
}

pub fn to_int32(value: &JsValue, ctx: &mut Context) -> JsResult<i32> {
    let n = to_number(value, ctx)?;
    if !n.is_finite() {
        return Ok(0);
    }
    let n = n.trunc();
    let m = n.rem_euclid(2f64.powi(32));
    Ok(if m >= 2f64.powi(31) { (m - 2f64.powi(32)) as i32 } else { m as i32 })
}

pub fn to_uint32(value: &JsValue, ctx: &mut Context) -> JsResult<u32> {
    let n = to_number(value, ctx)?;
    if !n.is_finite() {
        return Ok(0);
    }
    Ok(n.trunc().rem_euclid(2f64.powi(32)) as u32)
}

/// `ToIndex`: a non-negative integer index, `RangeError` out of range.
pub fn to_index(value: &JsValue, ctx: &mut Context) -> JsResult<u64> {
    let integer = to_integer_or_infinity(value, ctx)?;
    if integer < 0.0 || integer > (2f64.powi(53) - 1.0) {
        return Err(ctx.throw_native(NativeError::range("index out of range")));
    }
    Ok(integer as u64)
}

pub fn to_property_key(value: &JsValue, ctx: &mut Context) -> JsResult<crate::property::PropertyKey> {
    if let JsValue::Symbol(s) = value {
        return Ok(crate::property::PropertyKey::Symbol(s.clone()));
    }
    let prim = to_primitive(value, PreferredType::String, ctx)?;
    if let JsValue::Symbol(s) = &prim {
        return Ok(crate::property::PropertyKey::Symbol(s.clone()));
    }
    Ok(crate::property::PropertyKey::String(to_js_string(&prim, ctx)?))
}

pub fn to_big_int(value: &JsValue, ctx: &mut Context) -> JsResult<JsBigInt> {
    match value {
        JsValue::BigInt(b) => Ok(b.clone()),
        JsValue::Boolean(b) => Ok(JsBigInt::from_i64(if *b { 1 } else { 0 })),
        JsValue::String(s) => JsBigInt::parse(&s.to_std_string_lossy())
            .ok_or_else(|| ctx.throw_native(NativeError::syntax("invalid BigInt literal"))),
        JsValue::Object(_) => {
            let prim = to_primitive(value, PreferredType::Number, ctx)?;
            to_big_int(&prim, ctx)
        }
        _ => Err(ctx.throw_native(NativeError::typ("cannot convert value to a BigInt"))),
    }
}
