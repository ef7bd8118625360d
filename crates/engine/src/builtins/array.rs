//! `Array.prototype`, the `Array` constructor, and the array iterator.

use super::{arg, data_property, method, native_constructor, symbol_method};
use crate::context::Context;
use crate::error::{JsResult, NativeError};
use crate::object::{array::array_create, ObjectKind};
use crate::object::JsObject;
use crate::property::{PropertyDescriptor, PropertyKey};
use crate::value::{JsValue, WellKnownSymbols};

fn length_of(obj: &JsObject, ctx: &mut Context) -> JsResult<u64> {
    let len = obj.get(&PropertyKey::from("length"), &JsValue::Object(obj.clone()), ctx)?;
    crate::operations::to_length(&len, ctx)
}

fn get_index(obj: &JsObject, i: u64, ctx: &mut Context) -> JsResult<JsValue> {
    obj.get(&PropertyKey::from(i as u32), &JsValue::Object(obj.clone()), ctx)
}

fn set_index(obj: &JsObject, i: u64, value: JsValue, ctx: &mut Context) -> JsResult<()> {
    obj.set(PropertyKey::from(i as u32), value, &JsValue::Object(obj.clone()), ctx)?;
    Ok(())
}

fn set_length(obj: &JsObject, len: u64, ctx: &mut Context) -> JsResult<()> {
    obj.set(PropertyKey::from("length"), JsValue::from(len as f64), &JsValue::Object(obj.clone()), ctx)?;
    Ok(())
}

fn this_array(this: &JsValue, ctx: &mut Context) -> JsResult<JsObject> {
    crate::operations::to_object(this, ctx)
}

pub fn init_prototype(proto: &JsObject, function_prototype: &JsObject, wks: &WellKnownSymbols, array_iterator_prototype: &JsObject) {
    method(proto, function_prototype, "push", 1, push);
    method(proto, function_prototype, "pop", 0, pop);
    method(proto, function_prototype, "shift", 0, shift);
    method(proto, function_prototype, "unshift", 1, unshift);
    method(proto, function_prototype, "slice", 2, slice);
    method(proto, function_prototype, "splice", 2, splice);
    method(proto, function_prototype, "concat", 1, concat);
    method(proto, function_prototype, "join", 1, join);
    method(proto, function_prototype, "indexOf", 1, index_of);
    method(proto, function_prototype, "includes", 1, includes);
    method(proto, function_prototype, "find", 1, find);
    method(proto, function_prototype, "findIndex", 1, find_index);
    method(proto, function_prototype, "filter", 1, filter);
    method(proto, function_prototype, "map", 1, map);
    method(proto, function_prototype, "forEach", 1, for_each);
    method(proto, function_prototype, "reduce", 1, reduce);
    method(proto, function_prototype, "reduceRight", 1, reduce_right);
    method(proto, function_prototype, "some", 1, some);
    method(proto, function_prototype, "every", 1, every);
    method(proto, function_prototype, "flat", 0, flat);
    method(proto, function_prototype, "flatMap", 1, flat_map);
    method(proto, function_prototype, "sort", 1, sort);
    method(proto, function_prototype, "reverse", 0, reverse);
    method(proto, function_prototype, "fill", 1, fill);
    method(proto, function_prototype, "keys", 0, keys);
    method(proto, function_prototype, "values", 0, values);
    method(proto, function_prototype, "entries", 0, entries);
    symbol_method(proto, function_prototype, wks.iterator.clone(), "[Symbol.iterator]", 0, values);

    super::iteration::init_array_iterator_methods(array_iterator_prototype, function_prototype, wks);
}

pub fn constructor(function_prototype: &JsObject, array_prototype: &JsObject, wks: &WellKnownSymbols) -> JsObject {
    let _ = wks;
    let ctor = native_constructor(function_prototype, "Array", 1, call, construct);
    data_property(&ctor, "prototype", JsValue::Object(array_prototype.clone()));
    data_property(array_prototype, "constructor", JsValue::Object(ctor.clone()));
    method(&ctor, function_prototype, "isArray", 1, is_array);
    method(&ctor, function_prototype, "of", 0, of);
    method(&ctor, function_prototype, "from", 1, from);
    ctor
}

fn build(args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let proto = ctx.realm().intrinsics.array_prototype.clone();
    if args.len() == 1 {
        if let JsValue::Number(n) = args[0] {
            if n >= 0.0 && n.fract() == 0.0 && n <= u32::MAX as f64 {
                return Ok(JsValue::Object(array_create(Some(proto), n as u32)));
            }
            return Err(ctx.throw_native(NativeError::range("invalid array length")));
        }
    }
    let array = array_create(Some(proto), args.len() as u32);
    for (i, v) in args.iter().enumerate() {
        array.define_own_property(PropertyKey::from(i as u32), PropertyDescriptor::data(v.clone(), true, true, true))?;
    }
    Ok(JsValue::Object(array))
}

fn call(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    build(args, ctx)
}

fn construct(args: &[JsValue], _new_target: &JsValue, ctx: &mut Context) -> JsResult<JsValue> {
    build(args, ctx)
}

fn is_array(_this: &JsValue, args: &[JsValue], _ctx: &mut Context) -> JsResult<JsValue> {
    Ok(JsValue::from(matches!(arg(args, 0), JsValue::Object(o) if matches!(o.data().kind, ObjectKind::Array))))
}

fn of(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    build(args, ctx)
}

fn from(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let source = arg(args, 0);
    let mapper = match arg(args, 1) {
        JsValue::Undefined => None,
        other if other.is_callable() => Some(other),
        _ => return Err(ctx.throw_native(NativeError::typ("Array.from mapper must be a function"))),
    };
    let items = if crate::operations::get_method(&source, &PropertyKey::Symbol(ctx.well_known_symbols().iterator.clone()), ctx)?.is_some() {
        crate::operations::iterator_to_list(&source, ctx)?
    } else {
        let obj = crate::operations::to_object(&source, ctx)?;
        let len = length_of(&obj, ctx)?;
        let mut out = Vec::with_capacity(len as usize);
        for i in 0..len {
            out.push(get_index(&obj, i, ctx)?);
        }
        out
    };
    let mut mapped = Vec::with_capacity(items.len());
    for (i, item) in items.into_iter().enumerate() {
        match &mapper {
            Some(f) => mapped.push(crate::operations::call(f, &JsValue::Undefined, &[item, JsValue::from(i as i32)], ctx)?),
            None => mapped.push(item),
        }
    }
    build(&mapped, ctx)
}

fn push(this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let obj = this_array(this, ctx)?;
    let mut len = length_of(&obj, ctx)?;
    for v in args {
        set_index(&obj, len, v.clone(), ctx)?;
        len += 1;
    }
    set_length(&obj, len, ctx)?;
    Ok(JsValue::from(len as f64))
}

fn pop(this: &JsValue, _args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let obj = this_array(this, ctx)?;
    let len = length_of(&obj, ctx)?;
    if len == 0 {
        set_length(&obj, 0, ctx)?;
        return Ok(JsValue::Undefined);
    }
    let last = len - 1;
    let value = get_index(&obj, last, ctx)?;
    obj.delete(&PropertyKey::from(last as u32))?;
    set_length(&obj, last, ctx)?;
    Ok(value)
}

fn shift(this: &JsValue, _args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let obj = this_array(this, ctx)?;
    let len = length_of(&obj, ctx)?;
    if len == 0 {
        set_length(&obj, 0, ctx)?;
        return Ok(JsValue::Undefined);
    }
    let first = get_index(&obj, 0, ctx)?;
    for i in 1..len {
        let v = get_index(&obj, i, ctx)?;
        set_index(&obj, i - 1, v, ctx)?;
    }
    obj.delete(&PropertyKey::from((len - 1) as u32))?;
    set_length(&obj, len - 1, ctx)?;
    Ok(first)
}

fn unshift(this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let obj = this_array(this, ctx)?;
    let len = length_of(&obj, ctx)?;
    let count = args.len() as u64;
    let mut i = len;
    while i > 0 {
        let v = get_index(&obj, i - 1, ctx)?;
        set_index(&obj, i - 1 + count, v, ctx)?;
        i -= 1;
    }
    for (j, v) in args.iter().enumerate() {
        set_index(&obj, j as u64, v.clone(), ctx)?;
    }
    set_length(&obj, len + count, ctx)?;
    Ok(JsValue::from((len + count) as f64))
}

fn normalize_index(n: f64, len: u64) -> u64 {
    if n < 0.0 {
        (len as f64 + n).max(0.0) as u64
    } else {
        (n as u64).min(len)
    }
}

fn slice(this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let obj = this_array(this, ctx)?;
    let len = length_of(&obj, ctx)?;
    let start = match arg(args, 0) {
        JsValue::Undefined => 0,
        v => normalize_index(crate::operations::to_integer_or_infinity(&v, ctx)?, len),
    };
    let end = match arg(args, 1) {
        JsValue::Undefined => len,
        v => normalize_index(crate::operations::to_integer_or_infinity(&v, ctx)?, len),
    };
    let mut out = Vec::new();
    let mut i = start;
    while i < end {
        out.push(get_index(&obj, i, ctx)?);
        i += 1;
    }
    Ok(JsValue::Object(crate::operations::array_from_values(&out, ctx)))
}

fn splice(this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let obj = this_array(this, ctx)?;
    let len = length_of(&obj, ctx)?;
    let start = match arg(args, 0) {
        JsValue::Undefined => 0,
        v => normalize_index(crate::operations::to_integer_or_infinity(&v, ctx)?, len),
    };
    let delete_count = if args.len() <= 1 {
        len - start
    } else {
        (crate::operations::to_integer_or_infinity(&arg(args, 1), ctx)?.max(0.0) as u64).min(len - start)
    };
    let items: Vec<JsValue> = if args.len() > 2 { args[2..].to_vec() } else { Vec::new() };

    let mut removed = Vec::with_capacity(delete_count as usize);
    for i in 0..delete_count {
        removed.push(get_index(&obj, start + i, ctx)?);
    }

    let new_len = len - delete_count + items.len() as u64;
    if items.len() as u64 > delete_count {
        let shift_by = items.len() as u64 - delete_count;
        let mut i = len;
        while i > start + delete_count {
            let v = get_index(&obj, i - 1, ctx)?;
            set_index(&obj, i - 1 + shift_by, v, ctx)?;
            i -= 1;
        }
    } else if (items.len() as u64) < delete_count {
        let shift_by = delete_count - items.len() as u64;
        let mut i = start + delete_count;
        while i < len {
            let v = get_index(&obj, i, ctx)?;
            set_index(&obj, i - shift_by, v, ctx)?;
            i += 1;
        }
        for i in new_len..len {
            obj.delete(&PropertyKey::from(i as u32))?;
        }
    }
    for (j, item) in items.into_iter().enumerate() {
        set_index(&obj, start + j as u64, item, ctx)?;
    }
    set_length(&obj, new_len, ctx)?;
    Ok(JsValue::Object(crate::operations::array_from_values(&removed, ctx)))
}

fn concat(this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let mut out = Vec::new();
    let mut append = |v: &JsValue, ctx: &mut Context, out: &mut Vec<JsValue>| -> JsResult<()> {
        if let JsValue::Object(o) = v {
            if matches!(o.data().kind, ObjectKind::Array) {
                let len = length_of(o, ctx)?;
                for i in 0..len {
                    out.push(get_index(o, i, ctx)?);
                }
                return Ok(());
            }
        }
        out.push(v.clone());
        Ok(())
    };
    append(this, ctx, &mut out)?;
    for a in args {
        append(a, ctx, &mut out)?;
    }
    Ok(JsValue::Object(crate::operations::array_from_values(&out, ctx)))
}

fn join(this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let obj = this_array(this, ctx)?;
    let len = length_of(&obj, ctx)?;
    let sep = match arg(args, 0) {
        JsValue::Undefined => ",".to_string(),
        v => crate::operations::to_js_string(&v, ctx)?.to_std_string_lossy(),
    };
    let mut parts = Vec::with_capacity(len as usize);
    for i in 0..len {
        let v = get_index(&obj, i, ctx)?;
        parts.push(if v.is_null_or_undefined() {
            String::new()
        } else {
            crate::operations::to_js_string(&v, ctx)?.to_std_string_lossy()
        });
    }
    Ok(JsValue::from(parts.join(&sep).as_str()))
}

fn index_of(this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let obj = this_array(this, ctx)?;
    let len = length_of(&obj, ctx)?;
    let target = arg(args, 0);
    for i in 0..len {
        let v = get_index(&obj, i, ctx)?;
        if crate::operations::strict_equals(&v, &target) {
            return Ok(JsValue::from(i as f64));
        }
    }
    Ok(JsValue::from(-1.0))
}

fn includes(this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let obj = this_array(this, ctx)?;
    let len = length_of(&obj, ctx)?;
    let target = arg(args, 0);
    for i in 0..len {
        let v = get_index(&obj, i, ctx)?;
        if crate::value::is_same_value_js(&v, &target) || crate::operations::strict_equals(&v, &target) {
            return Ok(JsValue::from(true));
        }
    }
    Ok(JsValue::from(false))
}

fn callback_each(this: &JsValue, args: &[JsValue], ctx: &mut Context, mut f: impl FnMut(JsValue, u64, &JsObject, &mut Context) -> JsResult<Option<bool>>) -> JsResult<Option<u64>> {
    let obj = this_array(this, ctx)?;
    let len = length_of(&obj, ctx)?;
    let callback = arg(args, 0);
    if !callback.is_callable() {
        return Err(ctx.throw_native(NativeError::typ("callback is not a function")));
    }
    let this_arg = arg(args, 1);
    for i in 0..len {
        let v = get_index(&obj, i, ctx)?;
        let result = crate::operations::call(&callback, &this_arg, &[v.clone(), JsValue::from(i as f64), JsValue::Object(obj.clone())], ctx)?;
        if let Some(stop) = f(result, i, &obj, ctx)? {
            if stop {
                return Ok(Some(i));
            }
        }
    }
    Ok(None)
}

fn find(this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let obj = this_array(this, ctx)?;
    let len = length_of(&obj, ctx)?;
    let callback = arg(args, 0);
    if !callback.is_callable() {
        return Err(ctx.throw_native(NativeError::typ("callback is not a function")));
    }
    let this_arg = arg(args, 1);
    for i in 0..len {
        let v = get_index(&obj, i, ctx)?;
        let result = crate::operations::call(&callback, &this_arg, &[v.clone(), JsValue::from(i as f64), JsValue::Object(obj.clone())], ctx)?;
        if result.to_boolean() {
            return Ok(v);
        }
    }
    Ok(JsValue::Undefined)
}

fn find_index(this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let found = callback_each(this, args, ctx, |result, _i, _obj, _ctx| Ok(Some(result.to_boolean())))?;
    Ok(found.map(|i| JsValue::from(i as f64)).unwrap_or(JsValue::from(-1.0)))
}

fn filter(this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let obj = this_array(this, ctx)?;
    let len = length_of(&obj, ctx)?;
    let callback = arg(args, 0);
    if !callback.is_callable() {
        return Err(ctx.throw_native(NativeError::typ("callback is not a function")));
    }
    let this_arg = arg(args, 1);
    let mut out = Vec::new();
    for i in 0..len {
        let v = get_index(&obj, i, ctx)?;
        let keep = crate::operations::call(&callback, &this_arg, &[v.clone(), JsValue::from(i as f64), JsValue::Object(obj.clone())], ctx)?;
        if keep.to_boolean() {
            out.push(v);
        }
    }
    Ok(JsValue::Object(crate::operations::array_from_values(&out, ctx)))
}

fn map(this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let obj = this_array(this, ctx)?;
    let len = length_of(&obj, ctx)?;
    let callback = arg(args, 0);
    if !callback.is_callable() {
        return Err(ctx.throw_native(NativeError::typ("callback is not a function")));
    }
    let this_arg = arg(args, 1);
    let mut out = Vec::with_capacity(len as usize);
    for i in 0..len {
        let v = get_index(&obj, i, ctx)?;
        out.push(crate::operations::call(&callback, &this_arg, &[v, JsValue::from(i as f64), JsValue::Object(obj.clone())], ctx)?);
    }
    Ok(JsValue::Object(crate::operations::array_from_values(&out, ctx)))
}

fn for_each(this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    callback_each(this, args, ctx, |_r, _i, _o, _c| Ok(None))?;
    Ok(JsValue::Undefined)
}

fn reduce(this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let obj = this_array(this, ctx)?;
    let len = length_of(&obj, ctx)?;
    let callback = arg(args, 0);
    if !callback.is_callable() {
        return Err(ctx.throw_native(NativeError::typ("callback is not a function")));
    }
    let mut acc;
    let mut i = 0u64;
    if args.len() > 1 {
        acc = args[1].clone();
    } else {
        if len == 0 {
            return Err(ctx.throw_native(NativeError::typ("reduce of empty array with no initial value")));
        }
        acc = get_index(&obj, 0, ctx)?;
        i = 1;
    }
    while i < len {
        let v = get_index(&obj, i, ctx)?;
        acc = crate::operations::call(&callback, &JsValue::Undefined, &[acc, v, JsValue::from(i as f64), JsValue::Object(obj.clone())], ctx)?;
        i += 1;
    }
    Ok(acc)
}

fn reduce_right(this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let obj = this_array(this, ctx)?;
    let len = length_of(&obj, ctx)?;
    let callback = arg(args, 0);
    if !callback.is_callable() {
        return Err(ctx.throw_native(NativeError::typ("callback is not a function")));
    }
    if len == 0 && args.len() <= 1 {
        return Err(ctx.throw_native(NativeError::typ("reduce of empty array with no initial value")));
    }
    let mut acc;
    let mut i;
    if args.len() > 1 {
        acc = args[1].clone();
        i = len;
    } else {
        i = len - 1;
        acc = get_index(&obj, i, ctx)?;
    }
    while i > 0 {
        i -= 1;
        let v = get_index(&obj, i, ctx)?;
        acc = crate::operations::call(&callback, &JsValue::Undefined, &[acc, v, JsValue::from(i as f64), JsValue::Object(obj.clone())], ctx)?;
    }
    Ok(acc)
}

fn some(this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let found = callback_each(this, args, ctx, |result, _i, _o, _c| Ok(Some(result.to_boolean())))?;
    Ok(JsValue::from(found.is_some()))
}

fn every(this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let found = callback_each(this, args, ctx, |result, _i, _o, _c| Ok(Some(!result.to_boolean())))?;
    Ok(JsValue::from(found.is_none()))
}

fn flatten_into(obj: &JsObject, depth: i64, out: &mut Vec<JsValue>, ctx: &mut Context) -> JsResult<()> {
    let len = length_of(obj, ctx)?;
    for i in 0..len {
        let v = get_index(obj, i, ctx)?;
        if depth > 0 {
            if let JsValue::Object(o) = &v {
                if matches!(o.data().kind, ObjectKind::Array) {
                    flatten_into(o, depth - 1, out, ctx)?;
                    continue;
                }
            }
        }
        out.push(v);
    }
    Ok(())
}

fn flat(this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let obj = this_array(this, ctx)?;
    let depth = match arg(args, 0) {
        JsValue::Undefined => 1,
        v => crate::operations::to_integer_or_infinity(&v, ctx)? as i64,
    };
    let mut out = Vec::new();
    flatten_into(&obj, depth, &mut out, ctx)?;
    Ok(JsValue::Object(crate::operations::array_from_values(&out, ctx)))
}

fn flat_map(this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let mapped = map(this, args, ctx)?;
    let JsValue::Object(mapped_obj) = mapped else { unreachable!() };
    let mut out = Vec::new();
    flatten_into(&mapped_obj, 1, &mut out, ctx)?;
    Ok(JsValue::Object(crate::operations::array_from_values(&out, ctx)))
}

fn sort(this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let obj = this_array(this, ctx)?;
    let len = length_of(&obj, ctx)? as usize;
    let comparator = arg(args, 0);
    let mut items = Vec::with_capacity(len);
    for i in 0..len as u64 {
        items.push(get_index(&obj, i, ctx)?);
    }
    let mut err = None;
    items.sort_by(|a, b| {
        if err.is_some() {
            return std::cmp::Ordering::Equal;
        }
        if comparator.is_callable() {
            match crate::operations::call(&comparator, &JsValue::Undefined, &[a.clone(), b.clone()], ctx) {
                Ok(v) => {
                    let n = v.as_number().unwrap_or(0.0);
                    n.partial_cmp(&0.0).unwrap_or(std::cmp::Ordering::Equal)
                }
                Err(e) => {
                    err = Some(e);
                    std::cmp::Ordering::Equal
                }
            }
        } else {
            let sa = crate::operations::to_js_string(a, ctx).unwrap_or_else(|_| vesper_string::JsString::from(""));
            let sb = crate::operations::to_js_string(b, ctx).unwrap_or_else(|_| vesper_string::JsString::from(""));
            sa.cmp(&sb)
        }
    });
    if let Some(e) = err {
        return Err(e);
    }
    for (i, v) in items.into_iter().enumerate() {
        set_index(&obj, i as u64, v, ctx)?;
    }
    Ok(JsValue::Object(obj))
}

fn reverse(this: &JsValue, _args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let obj = this_array(this, ctx)?;
    let len = length_of(&obj, ctx)?;
    let mut items = Vec::with_capacity(len as usize);
    for i in 0..len {
        items.push(get_index(&obj, i, ctx)?);
    }
    items.reverse();
    for (i, v) in items.into_iter().enumerate() {
        set_index(&obj, i as u64, v, ctx)?;
    }
    Ok(JsValue::Object(obj))
}

fn fill(this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let obj = this_array(this, ctx)?;
    let len = length_of(&obj, ctx)?;
    let value = arg(args, 0);
    let start = match arg(args, 1) {
        JsValue::Undefined => 0,
        v => normalize_index(crate::operations::to_integer_or_infinity(&v, ctx)?, len),
    };
    let end = match arg(args, 2) {
        JsValue::Undefined => len,
        v => normalize_index(crate::operations::to_integer_or_infinity(&v, ctx)?, len),
    };
    let mut i = start;
    while i < end {
        set_index(&obj, i, value.clone(), ctx)?;
        i += 1;
    }
    Ok(JsValue::Object(obj))
}

fn keys(this: &JsValue, _args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let obj = this_array(this, ctx)?;
    Ok(JsValue::Object(super::iteration::make_array_iterator(obj, super::iteration::ArrayIterKind::Keys, ctx)))
}

fn values(this: &JsValue, _args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let obj = this_array(this, ctx)?;
    Ok(JsValue::Object(super::iteration::make_array_iterator(obj, super::iteration::ArrayIterKind::Values, ctx)))
}

fn entries(this: &JsValue, _args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let obj = this_array(this, ctx)?;
    Ok(JsValue::Object(super::iteration::make_array_iterator(obj, super::iteration::ArrayIterKind::Entries, ctx)))
}
