//! `String.prototype` and the `String` constructor. Code
//! unit (not code point) semantics throughout, matching `JsString`'s
//! UTF-16 representation — `charAt`/`slice`/`indexOf` index by code
//! unit, `codePointAt`/`[Symbol.iterator]` step by code point.

use super::{arg, data_property, method, native_constructor, symbol_method};
use crate::context::Context;
use crate::error::{JsResult, NativeError};
use crate::object::{JsObject, ObjectKind};
use crate::value::{JsValue, WellKnownSymbols};
use vesper_string::JsString;

pub fn init_prototype(proto: &JsObject, function_prototype: &JsObject, wks: &WellKnownSymbols, string_iterator_prototype: &JsObject) {
    let _ = string_iterator_prototype;
    method(proto, function_prototype, "toString", 0, to_string);
    method(proto, function_prototype, "valueOf", 0, to_string);
    method(proto, function_prototype, "charAt", 1, char_at);
    method(proto, function_prototype, "charCodeAt", 1, char_code_at);
    method(proto, function_prototype, "codePointAt", 1, code_point_at);
    method(proto, function_prototype, "indexOf", 1, index_of);
    method(proto, function_prototype, "lastIndexOf", 1, last_index_of);
    method(proto, function_prototype, "includes", 1, includes);
    method(proto, function_prototype, "startsWith", 1, starts_with);
    method(proto, function_prototype, "endsWith", 1, ends_with);
    method(proto, function_prototype, "slice", 2, slice);
    method(proto, function_prototype, "substring", 2, substring);
    method(proto, function_prototype, "split", 2, split);
    method(proto, function_prototype, "toUpperCase", 0, to_upper_case);
    method(proto, function_prototype, "toLowerCase", 0, to_lower_case);
    method(proto, function_prototype, "trim", 0, trim);
    method(proto, function_prototype, "trimStart", 0, trim_start);
    method(proto, function_prototype, "trimEnd", 0, trim_end);
    method(proto, function_prototype, "padStart", 2, pad_start);
    method(proto, function_prototype, "padEnd", 2, pad_end);
    method(proto, function_prototype, "repeat", 1, repeat);
    method(proto, function_prototype, "concat", 1, concat);
    method(proto, function_prototype, "replace", 2, replace);
    method(proto, function_prototype, "replaceAll", 2, replace_all);
    method(proto, function_prototype, "at", 1, at);
    symbol_method(proto, function_prototype, wks.iterator.clone(), "[Symbol.iterator]", 0, symbol_iterator);
}

pub fn constructor(function_prototype: &JsObject, string_prototype: &JsObject) -> JsObject {
    let ctor = native_constructor(function_prototype, "String", 1, call, construct);
    data_property(&ctor, "prototype", JsValue::Object(string_prototype.clone()));
    data_property(string_prototype, "constructor", JsValue::Object(ctor.clone()));
    method(&ctor, function_prototype, "fromCharCode", 1, from_char_code);
    ctor
}

fn call(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let s = match arg(args, 0) {
        JsValue::Undefined if args.is_empty() => JsString::from(""),
        JsValue::Symbol(sym) => JsString::from(sym.to_string().as_str()),
        other => crate::operations::to_js_string(&other, ctx)?,
    };
    Ok(JsValue::String(s))
}

fn construct(args: &[JsValue], new_target: &JsValue, ctx: &mut Context) -> JsResult<JsValue> {
    let s = match arg(args, 0) {
        JsValue::Undefined if args.is_empty() => JsString::from(""),
        other => crate::operations::to_js_string(&other, ctx)?,
    };
    let obj = crate::evaluator::function_call::ordinary_create_from_constructor(
        new_target.as_object().ok_or_else(|| ctx.throw_native(NativeError::typ("new.target must be an object")))?,
        ctx,
    )?;
    obj.data_mut().kind = ObjectKind::StringExotic(s);
    Ok(JsValue::Object(obj))
}

fn from_char_code(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let mut units = Vec::with_capacity(args.len());
    for a in args {
        units.push(crate::operations::to_uint32(a, ctx)? as u16);
    }
    Ok(JsValue::from(JsString::from(units)))
}

fn this_string_value(this: &JsValue, ctx: &mut Context) -> JsResult<JsString> {
    match this {
        JsValue::String(s) => Ok(s.clone()),
        JsValue::Object(o) => match &o.data().kind {
            ObjectKind::StringExotic(s) | ObjectKind::StringObject(s) => Ok(s.clone()),
            _ => Err(ctx.throw_native(NativeError::typ("not a String"))),
        },
        _ => Err(ctx.throw_native(NativeError::typ("not a String"))),
    }
}

fn to_string(this: &JsValue, _args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    Ok(JsValue::from(this_string_value(this, ctx)?))
}

/// Clamp a (possibly negative/NaN/infinite) index argument into `0..=len`
/// the way `ToIntegerOrInfinity` + clamping is written throughout
/// `String.prototype`'s abstract operations.
fn clamp_index(value: f64, len: usize) -> usize {
    if value.is_nan() || value < 0.0 {
        0
    } else if value as usize > len {
        len
    } else {
        value as usize
    }
}

fn char_at(this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let s = this_string_value(this, ctx)?;
    let index = crate::operations::to_integer_or_infinity(&arg(args, 0), ctx)?;
    if index < 0.0 || index as usize >= s.len() {
        return Ok(JsValue::from(""));
    }
    match s.code_unit_at(index as usize) {
        Some(u) => Ok(JsValue::from(JsString::from(vec![u]))),
        None => Ok(JsValue::from("")),
    }
}

fn char_code_at(this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let s = this_string_value(this, ctx)?;
    let index = crate::operations::to_integer_or_infinity(&arg(args, 0), ctx)?;
    if index < 0.0 || index as usize >= s.len() {
        return Ok(JsValue::from(f64::NAN));
    }
    match s.code_unit_at(index as usize) {
        Some(u) => Ok(JsValue::from(u as f64)),
        None => Ok(JsValue::from(f64::NAN)),
    }
}

fn code_point_at(this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let s = this_string_value(this, ctx)?;
    let index = crate::operations::to_integer_or_infinity(&arg(args, 0), ctx)?;
    if index < 0.0 || index as usize >= s.len() {
        return Ok(JsValue::Undefined);
    }
    let index = index as usize;
    let units = s.as_slice();
    let first = units[index];
    if (0xD800..=0xDBFF).contains(&first) && index + 1 < units.len() && (0xDC00..=0xDFFF).contains(&units[index + 1]) {
        let high = first as u32 - 0xD800;
        let low = units[index + 1] as u32 - 0xDC00;
        Ok(JsValue::from(((high << 10) + low + 0x10000) as f64))
    } else {
        Ok(JsValue::from(first as f64))
    }
}

fn at(this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let s = this_string_value(this, ctx)?;
    let relative = crate::operations::to_integer_or_infinity(&arg(args, 0), ctx)?;
    let len = s.len() as f64;
    let index = if relative < 0.0 { relative + len } else { relative };
    if index < 0.0 || index >= len {
        return Ok(JsValue::Undefined);
    }
    match s.code_unit_at(index as usize) {
        Some(u) => Ok(JsValue::from(JsString::from(vec![u]))),
        None => Ok(JsValue::Undefined),
    }
}

fn index_of(this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let s = this_string_value(this, ctx)?.to_std_string_lossy();
    let needle = crate::operations::to_js_string(&arg(args, 0), ctx)?.to_std_string_lossy();
    let start = clamp_index(crate::operations::to_integer_or_infinity(&arg(args, 1), ctx)?, s.chars().count());
    let from: String = s.chars().skip(start).collect();
    match from.find(&needle) {
        Some(byte_pos) => Ok(JsValue::from((start + from[..byte_pos].chars().count()) as f64)),
        None => Ok(JsValue::from(-1.0)),
    }
}

fn last_index_of(this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let s = this_string_value(this, ctx)?.to_std_string_lossy();
    let needle = crate::operations::to_js_string(&arg(args, 0), ctx)?.to_std_string_lossy();
    match s.rfind(&needle) {
        Some(byte_pos) => Ok(JsValue::from(s[..byte_pos].chars().count() as f64)),
        None => Ok(JsValue::from(-1.0)),
    }
}

fn includes(this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let s = this_string_value(this, ctx)?.to_std_string_lossy();
    let needle = crate::operations::to_js_string(&arg(args, 0), ctx)?.to_std_string_lossy();
    Ok(JsValue::from(s.contains(&needle)))
}

fn starts_with(this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let s = this_string_value(this, ctx)?.to_std_string_lossy();
    let needle = crate::operations::to_js_string(&arg(args, 0), ctx)?.to_std_string_lossy();
    Ok(JsValue::from(s.starts_with(&needle)))
}

fn ends_with(this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let s = this_string_value(this, ctx)?.to_std_string_lossy();
    let needle = crate::operations::to_js_string(&arg(args, 0), ctx)?.to_std_string_lossy();
    Ok(JsValue::from(s.ends_with(&needle)))
}

fn slice(this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let s = this_string_value(this, ctx)?;
    let len = s.len();
    let relative_start = crate::operations::to_integer_or_infinity(&arg(args, 0), ctx)?;
    let start = if relative_start < 0.0 { (len as f64 + relative_start).max(0.0) as usize } else { clamp_index(relative_start, len) };
    let end = match arg(args, 1) {
        JsValue::Undefined => len,
        other => {
            let relative_end = crate::operations::to_integer_or_infinity(&other, ctx)?;
            if relative_end < 0.0 { (len as f64 + relative_end).max(0.0) as usize } else { clamp_index(relative_end, len) }
        }
    };
    if start >= end {
        return Ok(JsValue::from(""));
    }
    Ok(JsValue::from(JsString::from(&s.as_slice()[start..end])))
}

fn substring(this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let s = this_string_value(this, ctx)?;
    let len = s.len();
    let a = clamp_index(crate::operations::to_integer_or_infinity(&arg(args, 0), ctx)?, len);
    let b = match arg(args, 1) {
        JsValue::Undefined => len,
        other => clamp_index(crate::operations::to_integer_or_infinity(&other, ctx)?, len),
    };
    let (start, end) = if a < b { (a, b) } else { (b, a) };
    Ok(JsValue::from(JsString::from(&s.as_slice()[start..end])))
}

fn split(this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let s = this_string_value(this, ctx)?.to_std_string_lossy();
    let limit = match arg(args, 1) {
        JsValue::Undefined => usize::MAX,
        other => crate::operations::to_uint32(&other, ctx)? as usize,
    };
    let parts: Vec<JsValue> = match arg(args, 0) {
        JsValue::Undefined => vec![JsValue::from(s.as_str())],
        sep => {
            let sep = crate::operations::to_js_string(&sep, ctx)?.to_std_string_lossy();
            if sep.is_empty() {
                s.chars().map(|c| JsValue::from(c.to_string().as_str())).collect()
            } else {
                s.split(sep.as_str()).map(JsValue::from).collect()
            }
        }
    };
    let parts: Vec<JsValue> = parts.into_iter().take(limit).collect();
    Ok(JsValue::Object(crate::operations::array_from_values(&parts, ctx)))
}

fn to_upper_case(this: &JsValue, _args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    Ok(JsValue::from(this_string_value(this, ctx)?.to_std_string_lossy().to_uppercase().as_str()))
}

fn to_lower_case(this: &JsValue, _args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    Ok(JsValue::from(this_string_value(this, ctx)?.to_std_string_lossy().to_lowercase().as_str()))
}

fn trim(this: &JsValue, _args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    Ok(JsValue::from(this_string_value(this, ctx)?.to_std_string_lossy().trim().to_string().as_str()))
}

fn trim_start(this: &JsValue, _args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    Ok(JsValue::from(this_string_value(this, ctx)?.to_std_string_lossy().trim_start().to_string().as_str()))
}

fn trim_end(this: &JsValue, _args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    Ok(JsValue::from(this_string_value(this, ctx)?.to_std_string_lossy().trim_end().to_string().as_str()))
}

fn pad_start(this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    pad(this, args, ctx, true)
}

fn pad_end(this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    pad(this, args, ctx, false)
}

fn pad(this: &JsValue, args: &[JsValue], ctx: &mut Context, start: bool) -> JsResult<JsValue> {
    let s = this_string_value(this, ctx)?.to_std_string_lossy();
    let target_len = crate::operations::to_length(&arg(args, 0), ctx)? as usize;
    let filler = match arg(args, 1) {
        JsValue::Undefined => " ".to_string(),
        other => crate::operations::to_js_string(&other, ctx)?.to_std_string_lossy(),
    };
    let cur_len = s.chars().count();
    if cur_len >= target_len || filler.is_empty() {
        return Ok(JsValue::from(s.as_str()));
    }
    let needed = target_len - cur_len;
    let pad_str: String = filler.chars().cycle().take(needed).collect();
    let result = if start { format!("{pad_str}{s}") } else { format!("{s}{pad_str}") };
    Ok(JsValue::from(result.as_str()))
}

fn repeat(this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let s = this_string_value(this, ctx)?;
    let count = crate::operations::to_integer_or_infinity(&arg(args, 0), ctx)?;
    if count < 0.0 || count.is_infinite() {
        return Err(ctx.throw_native(NativeError::range("repeat count must be non-negative and finite")));
    }
    Ok(JsValue::from(s.repeat(count as usize)))
}

fn concat(this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let mut s = this_string_value(this, ctx)?;
    for a in args {
        let next = crate::operations::to_js_string(a, ctx)?;
        s = s.concat(&next);
    }
    Ok(JsValue::from(s))
}

fn replace(this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let s = this_string_value(this, ctx)?.to_std_string_lossy();
    let pattern = crate::operations::to_js_string(&arg(args, 0), ctx)?.to_std_string_lossy();
    let replacement = crate::operations::to_js_string(&arg(args, 1), ctx)?.to_std_string_lossy();
    let result = match s.find(&pattern) {
        Some(pos) => format!("{}{}{}", &s[..pos], replacement, &s[pos + pattern.len()..]),
        None => s,
    };
    Ok(JsValue::from(result.as_str()))
}

fn replace_all(this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let s = this_string_value(this, ctx)?.to_std_string_lossy();
    let pattern = crate::operations::to_js_string(&arg(args, 0), ctx)?.to_std_string_lossy();
    let replacement = crate::operations::to_js_string(&arg(args, 1), ctx)?.to_std_string_lossy();
    if pattern.is_empty() {
        return Ok(JsValue::from(s.as_str()));
    }
    Ok(JsValue::from(s.replace(&pattern, &replacement).as_str()))
}

fn symbol_iterator(this: &JsValue, _args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let s = this_string_value(this, ctx)?;
    Ok(JsValue::Object(super::iteration::make_string_iterator(s, ctx)))
}
