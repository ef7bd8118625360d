//! `Symbol.prototype` and the `Symbol` function. `Symbol`
//! is callable but not constructible — `new Symbol()` is a `TypeError`.

use super::{arg, data_property, method, native_function};
use crate::context::Context;
use crate::error::{JsResult, NativeError};
use crate::object::JsObject;
use crate::value::{JsSymbol, JsValue, WellKnownSymbols};
use std::cell::RefCell;
use vesper_string::JsString;

thread_local! {
    /// The `Symbol.for`/`Symbol.keyFor` global symbol registry — keyed
    /// by description, shared across every `Symbol()` call in this
    /// agent.
    static REGISTRY: RefCell<Vec<(String, JsSymbol)>> = const { RefCell::new(Vec::new()) };
}

pub fn init_prototype(proto: &JsObject, function_prototype: &JsObject, wks: &WellKnownSymbols) {
    method(proto, function_prototype, "toString", 0, to_string);
    method(proto, function_prototype, "valueOf", 0, value_of);
    super::symbol_method(proto, function_prototype, wks.to_primitive.clone(), "[Symbol.toPrimitive]", 1, value_of);
}

pub fn constructor(function_prototype: &JsObject, symbol_prototype: &JsObject, wks: &WellKnownSymbols) -> JsObject {
    let ctor = native_function(function_prototype, "Symbol", 0, call);
    data_property(&ctor, "prototype", JsValue::Object(symbol_prototype.clone()));
    data_property(symbol_prototype, "constructor", JsValue::Object(ctor.clone()));

    data_property(&ctor, "iterator", JsValue::Symbol(wks.iterator.clone()));
    data_property(&ctor, "asyncIterator", JsValue::Symbol(wks.async_iterator.clone()));
    data_property(&ctor, "toPrimitive", JsValue::Symbol(wks.to_primitive.clone()));
    data_property(&ctor, "toStringTag", JsValue::Symbol(wks.to_string_tag.clone()));
    data_property(&ctor, "hasInstance", JsValue::Symbol(wks.has_instance.clone()));
    data_property(&ctor, "species", JsValue::Symbol(wks.species.clone()));
    data_property(&ctor, "unscopables", JsValue::Symbol(wks.unscopables.clone()));
    data_property(&ctor, "isConcatSpreadable", JsValue::Symbol(wks.is_concat_spreadable.clone()));
    data_property(&ctor, "match", JsValue::Symbol(wks.match_.clone()));

    method(&ctor, function_prototype, "for", 1, for_);
    method(&ctor, function_prototype, "keyFor", 1, key_for);
    ctor
}

fn call(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let description = match arg(args, 0) {
        JsValue::Undefined => None,
        other => Some(crate::operations::to_js_string(&other, ctx)?),
    };
    Ok(JsValue::Symbol(JsSymbol::new(description)))
}

fn this_symbol_value(this: &JsValue, ctx: &mut Context) -> JsResult<JsSymbol> {
    match this {
        JsValue::Symbol(s) => Ok(s.clone()),
        _ => Err(ctx.throw_native(NativeError::typ("not a Symbol"))),
    }
}

fn to_string(this: &JsValue, _args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let s = this_symbol_value(this, ctx)?;
    Ok(JsValue::from(s.to_string().as_str()))
}

fn value_of(this: &JsValue, _args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    Ok(JsValue::Symbol(this_symbol_value(this, ctx)?))
}

fn for_(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let key = crate::operations::to_js_string(&arg(args, 0), ctx)?.to_std_string_lossy();
    Ok(REGISTRY.with(|registry| {
        let mut registry = registry.borrow_mut();
        if let Some((_, sym)) = registry.iter().find(|(k, _)| k == &key) {
            return JsValue::Symbol(sym.clone());
        }
        let sym = JsSymbol::new(Some(JsString::from(key.as_str())));
        registry.push((key, sym.clone()));
        JsValue::Symbol(sym)
    }))
}

fn key_for(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let JsValue::Symbol(sym) = arg(args, 0) else {
        return Err(ctx.throw_native(NativeError::typ("Symbol.keyFor requires a Symbol")));
    };
    REGISTRY.with(|registry| {
        let registry = registry.borrow();
        Ok(registry
            .iter()
            .find(|(_, s)| s == &sym)
            .map(|(k, _)| JsValue::from(k.as_str()))
            .unwrap_or(JsValue::Undefined))
    })
}
