//! The iteration protocol abstract operations:
//! `GetIterator`, `IteratorNext`, `IteratorStep`, `IteratorValue`,
//! `IteratorClose`, `IteratorToList` — backing `for-of`, array
//! destructuring, spread, and `Array.from`/`Promise.all`.

use crate::context::Context;
use crate::error::{JsError, JsResult, NativeError};
use crate::object::JsObject;
use crate::property::PropertyKey;
use crate::value::JsValue;

/// A live iterator: the iterator object plus its `next` method,
/// resolved once at `GetIterator` time (the Iterator Record).
pub struct IteratorRecord {
    pub iterator: JsObject,
    pub next: JsObject,
    pub done: bool,
}

/// `GetIterator` over `@@iterator` (the sync protocol only — this
/// engine does not implement `@@asyncIterator`-driven `for-await-of`).
pub fn get_iterator(value: &JsValue, ctx: &mut Context) -> JsResult<IteratorRecord> {
    let key = PropertyKey::Symbol(ctx.well_known_symbols().iterator.clone());
    let method = match value {
        JsValue::Object(o) => o.get(&key, value, ctx)?,
        _ => {
            let obj = crate::operations::conversion::to_object(value, ctx)?;
            obj.get(&key, value, ctx)?
        }
    };
    let JsValue::Object(method_obj) = method else {
        return Err(ctx.throw_native(NativeError::typ("value is not iterable")));
    };
    if !method_obj.is_callable() {
        return Err(ctx.throw_native(NativeError::typ("value is not iterable")));
    }
    let iterator_value = method_obj.call(value, &[], ctx)?;
    let JsValue::Object(iterator) = iterator_value else {
        return Err(ctx.throw_native(NativeError::typ("iterator result is not an object")));
    };
    let next_key = PropertyKey::String(vesper_string::JsString::from("next"));
    let next_value = iterator.get(&next_key, &JsValue::Object(iterator.clone()), ctx)?;
    let JsValue::Object(next) = next_value else {
        return Err(ctx.throw_native(NativeError::typ("iterator has no next method")));
    };
    Ok(IteratorRecord {
        iterator,
        next,
        done: false,
    })
}

/// `IteratorNext`: calls `next`, validates the result shape.
pub fn iterator_next(record: &IteratorRecord, arg: Option<JsValue>, ctx: &mut Context) -> JsResult<JsObject> {
    let args = arg.map(|a| vec![a]).unwrap_or_default();
    let result = record.next.call(&JsValue::Object(record.iterator.clone()), &args, ctx)?;
    let JsValue::Object(result) = result else {
        return Err(ctx.throw_native(NativeError::typ("iterator result is not an object")));
    };
    Ok(result)
}

/// `IteratorComplete`.
pub fn iterator_complete(result: &JsObject, ctx: &mut Context) -> JsResult<bool> {
    let done_key = PropertyKey::String(vesper_string::JsString::from("done"));
    let done = result.get(&done_key, &JsValue::Object(result.clone()), ctx)?;
    Ok(done.to_boolean())
}

/// `IteratorValue`.
pub fn iterator_value(result: &JsObject, ctx: &mut Context) -> JsResult<JsValue> {
    let value_key = PropertyKey::String(vesper_string::JsString::from("value"));
    result.get(&value_key, &JsValue::Object(result.clone()), ctx)
}

/// `IteratorStep`: `next()` then check `done`; returns `None` at the
/// end of iteration.
pub fn iterator_step(record: &mut IteratorRecord, ctx: &mut Context) -> JsResult<Option<JsObject>> {
    let result = iterator_next(record, None, ctx)?;
    if iterator_complete(&result, ctx)? {
        record.done = true;
        return Ok(None);
    }
    Ok(Some(result))
}

/// `IteratorClose`: calls `return` if present, swallowing its result
/// but propagating a thrown error from the original completion only
/// if the original completion wasn't itself already an abrupt one
/// (modelled by the caller choosing whether to propagate `result` or
/// `close`'s own error).
pub fn iterator_close(record: &IteratorRecord, completion: JsResult<JsValue>, ctx: &mut Context) -> JsResult<JsValue> {
    let return_key = PropertyKey::String(vesper_string::JsString::from("return"));
    let return_method = record
        .iterator
        .get(&return_key, &JsValue::Object(record.iterator.clone()), ctx);
    let return_method = match return_method {
        Ok(m) => m,
        Err(_) => return completion,
    };
    let JsValue::Object(return_fn) = return_method else {
        return completion;
    };
    if !return_fn.is_callable() {
        return completion;
    }
    let close_result = return_fn.call(&JsValue::Object(record.iterator.clone()), &[], ctx);
    match completion {
        Err(e) => Err(e),
        Ok(v) => match close_result {
            Ok(_) => Ok(v),
            Err(e) => Err(e),
        },
    }
}

/// `IteratorToList`: drains an iterable fully into a `Vec` — used by
/// spread elements, array destructuring, and `Array.from`.
pub fn iterator_to_list(value: &JsValue, ctx: &mut Context) -> JsResult<Vec<JsValue>> {
    let mut record = get_iterator(value, ctx)?;
    let mut items = Vec::new();
    while let Some(result) = iterator_step(&mut record, ctx)? {
        items.push(iterator_value(&result, ctx)?);
    }
    Ok(items)
}

/// Convenience used by `for-of` evaluation: runs `body` for each
/// yielded value, closing the iterator on early `break` (an `Err`
/// tagged `ControlFlowBreak`) the way the evaluator's loop machinery
/// requests it.
pub fn for_of_iterate(
    value: &JsValue,
    ctx: &mut Context,
    mut body: impl FnMut(JsValue, &mut Context) -> JsResult<Option<()>>,
) -> JsResult<()> {
    let mut record = get_iterator(value, ctx)?;
    loop {
        let Some(result) = iterator_step(&mut record, ctx)? else {
            break;
        };
        let item = iterator_value(&result, ctx)?;
        match body(item, ctx) {
            Ok(Some(())) => continue,
            Ok(None) => {
                iterator_close(&record, Ok(JsValue::Undefined), ctx)?;
                break;
            }
            Err(e) => {
                let _ = iterator_close(&record, Err(e.clone()), ctx);
                return Err(e);
            }
        }
    }
    Ok(())
}
