//! `SetDefaultGlobalBindings`: every well-known global
//! property, plus the free global functions (`parseInt`, `parseFloat`,
//! `isNaN`, `isFinite`, `encodeURIComponent`, `decodeURIComponent`).
//! `globalThis` and the var-declared-names machinery itself live in
//! [`crate::environment::global`] — this module only populates the
//! object those bindings resolve against.

use super::{arg, data_property, method};
use crate::context::Context;
use crate::error::{JsResult, NativeError};
use crate::property::{PropertyDescriptor, PropertyKey};
use crate::realm::Realm;
use crate::value::JsValue;

pub fn install(realm: &mut Realm) {
    let global = realm.global_object.clone();
    let function_prototype = realm.intrinsics.function_prototype.clone();

    data_property(&global, "undefined", JsValue::Undefined);
    data_property(&global, "NaN", JsValue::from(f64::NAN));
    data_property(&global, "Infinity", JsValue::from(f64::INFINITY));
    data_property(&global, "globalThis", JsValue::Object(global.clone()));

    bind_ctor(&global, "Object", &realm.intrinsics.object_constructor);
    bind_ctor(&global, "Function", &realm.intrinsics.function_constructor);
    bind_ctor(&global, "Array", &realm.intrinsics.array_constructor);
    bind_ctor(&global, "String", &realm.intrinsics.string_constructor);
    bind_ctor(&global, "Number", &realm.intrinsics.number_constructor);
    bind_ctor(&global, "Boolean", &realm.intrinsics.boolean_constructor);
    bind_ctor(&global, "Symbol", &realm.intrinsics.symbol_constructor);
    bind_ctor(&global, "Error", &realm.intrinsics.error_constructor);
    bind_ctor(&global, "TypeError", &realm.intrinsics.type_error_constructor);
    bind_ctor(&global, "RangeError", &realm.intrinsics.range_error_constructor);
    bind_ctor(&global, "ReferenceError", &realm.intrinsics.reference_error_constructor);
    bind_ctor(&global, "SyntaxError", &realm.intrinsics.syntax_error_constructor);
    bind_ctor(&global, "EvalError", &realm.intrinsics.eval_error_constructor);
    bind_ctor(&global, "URIError", &realm.intrinsics.uri_error_constructor);
    bind_ctor(&global, "Promise", &realm.intrinsics.promise_constructor);
    bind_ctor(&global, "Proxy", &realm.intrinsics.proxy_constructor);
    bind_ctor(&global, "Uint8Array", &realm.intrinsics.uint8array_constructor);

    bind_ctor(&global, "Math", &realm.intrinsics.math);
    bind_ctor(&global, "JSON", &realm.intrinsics.json);
    bind_ctor(&global, "Reflect", &realm.intrinsics.reflect);

    method(&global, &function_prototype, "parseInt", 2, parse_int);
    method(&global, &function_prototype, "parseFloat", 1, parse_float);
    method(&global, &function_prototype, "isNaN", 1, is_nan);
    method(&global, &function_prototype, "isFinite", 1, is_finite);
    method(&global, &function_prototype, "encodeURIComponent", 1, encode_uri_component);
    method(&global, &function_prototype, "decodeURIComponent", 1, decode_uri_component);
}

/// Constructors/namespace objects are bound writable+configurable,
/// non-enumerable (matching how `%Object%` &c. global bindings are
/// installed), not via `data_property`'s all-false attributes.
fn bind_ctor(global: &crate::object::JsObject, name: &str, value: &crate::object::JsObject) {
    let _ = global.define_own_property(
        PropertyKey::from(name),
        PropertyDescriptor::data(JsValue::Object(value.clone()), true, false, true),
    );
}

/// `Number.parseInt` delegates here.
pub(crate) fn parse_int(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let input = crate::operations::to_js_string(&arg(args, 0), ctx)?.to_std_string_lossy();
    let s = input.trim_start();
    let (sign, s) = match s.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, s.strip_prefix('+').unwrap_or(s)),
    };
    let radix_arg = crate::operations::to_int32(&arg(args, 1), ctx)?;
    let (radix, s) = if radix_arg == 0 {
        if let Some(rest) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            (16u32, rest)
        } else {
            (10u32, s)
        }
    } else if !(2..=36).contains(&radix_arg) {
        return Ok(JsValue::from(f64::NAN));
    } else if radix_arg == 16 {
        (16u32, s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s))
    } else {
        (radix_arg as u32, s)
    };

    let end = s.find(|c: char| !c.is_digit(radix)).unwrap_or(s.len());
    if end == 0 {
        return Ok(JsValue::from(f64::NAN));
    }
    let digits = &s[..end];
    let mut value = 0.0f64;
    for c in digits.chars() {
        value = value * radix as f64 + c.to_digit(radix).unwrap() as f64;
    }
    Ok(JsValue::from(sign * value))
}

/// `Number.parseFloat` delegates here.
pub(crate) fn parse_float(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let input = crate::operations::to_js_string(&arg(args, 0), ctx)?.to_std_string_lossy();
    let s = input.trim_start();
    if let Some(rest) = s.strip_prefix("Infinity").or_else(|| s.strip_prefix("+Infinity")) {
        let _ = rest;
        return Ok(JsValue::from(f64::INFINITY));
    }
    if let Some(_rest) = s.strip_prefix("-Infinity") {
        return Ok(JsValue::from(f64::NEG_INFINITY));
    }
    let mut end = 0;
    let bytes = s.as_bytes();
    let mut seen_dot = false;
    let mut seen_exp = false;
    let mut seen_digit = false;
    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    while end < bytes.len() {
        let c = bytes[end] as char;
        if c.is_ascii_digit() {
            seen_digit = true;
            end += 1;
        } else if c == '.' && !seen_dot && !seen_exp {
            seen_dot = true;
            end += 1;
        } else if (c == 'e' || c == 'E') && seen_digit && !seen_exp {
            seen_exp = true;
            end += 1;
            if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
                end += 1;
            }
        } else {
            break;
        }
    }
    if !seen_digit {
        return Ok(JsValue::from(f64::NAN));
    }
    match s[..end].parse::<f64>() {
        Ok(n) => Ok(JsValue::from(n)),
        Err(_) => Ok(JsValue::from(f64::NAN)),
    }
}

fn is_nan(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    Ok(JsValue::from(crate::operations::to_number(&arg(args, 0), ctx)?.is_nan()))
}

fn is_finite(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    Ok(JsValue::from(crate::operations::to_number(&arg(args, 0), ctx)?.is_finite()))
}

fn encode_uri_component(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let s = crate::operations::to_js_string(&arg(args, 0), ctx)?.to_std_string_lossy();
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'!' | b'~' | b'*' | b'\'' | b'(' | b')' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    Ok(JsValue::from(out.as_str()))
}

fn decode_uri_component(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let s = crate::operations::to_js_string(&arg(args, 0), ctx)?.to_std_string_lossy();
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            if i + 2 >= bytes.len() {
                return Err(ctx.throw_native(NativeError::uri("malformed URI sequence")));
            }
            let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).map_err(|_| ctx.throw_native(NativeError::uri("malformed URI sequence")));
            let hex = hex?;
            let byte = u8::from_str_radix(hex, 16).map_err(|_| ctx.throw_native(NativeError::uri("malformed URI sequence")))?;
            out.push(byte);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    let decoded = String::from_utf8(out).map_err(|_| ctx.throw_native(NativeError::uri("malformed URI sequence")))?;
    Ok(JsValue::from(decoded.as_str()))
}
