//! Default ("ordinary") internal-method algorithms.
//! Every exotic kind starts from these and only overrides what it must.

use super::{JsObject, ObjectKind};
use crate::context::Context;
use crate::error::{JsResult, NativeError};
use crate::property::{PropertyDescriptor, PropertyKey};
use crate::value::JsValue;

pub fn get_prototype_of(obj: &JsObject) -> Option<JsObject> {
    obj.data().prototype.clone()
}

pub fn set_prototype_of(obj: &JsObject, proto: Option<JsObject>) -> bool {
    let current = obj.data().prototype.clone();
    if same_opt(&current, &proto) {
        return true;
    }
    if !obj.data().extensible.get() {
        return false;
    }
    // Cycle check: walk the candidate chain; reject if `obj` itself appears.
    let mut p = proto.clone();
    while let Some(candidate) = p {
        if JsObject::ptr_eq(&candidate, obj) {
            return false;
        }
        if matches!(candidate.data().kind, ObjectKind::Proxy(_)) {
            break; // cannot statically walk through a proxy's trap here
        }
        p = candidate.data().prototype.clone();
    }
    obj.data_mut().prototype = proto;
    true
}

fn same_opt(a: &Option<JsObject>, b: &Option<JsObject>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => JsObject::ptr_eq(a, b),
        _ => false,
    }
}

pub fn get_own_property(obj: &JsObject, key: &PropertyKey) -> Option<PropertyDescriptor> {
    obj.data().properties.get(key).cloned()
}

/// `OrdinaryDefineOwnProperty`: fetch the current
/// descriptor (if any) and merge with `ValidateAndApplyPropertyDescriptor`.
pub fn define_own_property(obj: &JsObject, key: PropertyKey, desc: PropertyDescriptor) -> bool {
    let current = obj.data().properties.get(&key).cloned();
    let extensible = obj.data().extensible.get();
    match validate_and_apply(extensible, current, desc) {
        Some(applied) => {
            obj.data_mut().properties.insert(key, applied);
            true
        }
        None => false,
    }
}

/// `ValidateAndApplyPropertyDescriptor`. Returns the
/// descriptor to store if the change is legal, `None` if it must be
/// rejected. `current = None` models "no object"/extending a fresh
/// own-property (always legal if extensible).
pub fn validate_and_apply(
    extensible_if_absent: bool,
    current: Option<PropertyDescriptor>,
    desc: PropertyDescriptor,
) -> Option<PropertyDescriptor> {
    let Some(current) = current else {
        if !extensible_if_absent {
            return None;
        }
        return Some(desc.complete());
    };

    if desc.value.is_none()
        && desc.writable.is_none()
        && desc.get.is_none()
        && desc.set.is_none()
        && desc.enumerable.is_none()
        && desc.configurable.is_none()
    {
        return Some(current);
    }

    if !current.configurable() {
        if desc.configurable == Some(true) {
            return None;
        }
        if let Some(e) = desc.enumerable {
            if e != current.enumerable() {
                return None;
            }
        }
        let current_is_data = current.is_data_descriptor();
        let incoming_is_accessor = desc.is_accessor_descriptor();
        let incoming_is_data = desc.is_data_descriptor();
        if !desc.is_generic_descriptor() && current_is_data != incoming_is_data && incoming_is_accessor == current_is_data
        {
            // non-configurable data <-> accessor interconversion
            return None;
        }
        if current_is_data && incoming_is_data {
            if !current.writable() {
                if desc.writable == Some(true) {
                    return None;
                }
                if let Some(v) = &desc.value {
                    if !crate::value::is_same_value_js(v, current.value.as_ref().unwrap()) {
                        return None;
                    }
                }
            }
        } else if !current_is_data && incoming_is_accessor {
            if let Some(get) = &desc.get {
                if !same_value_opt(get, current.get.as_ref()) {
                    return None;
                }
            }
            if let Some(set) = &desc.set {
                if !same_value_opt(set, current.set.as_ref()) {
                    return None;
                }
            }
        }
    }

    // Merge: fields explicitly present in `desc` override; absent
    // fields keep `current`'s value. Switching data<->accessor resets
    // the fields of the shape being left behind.
    let mut merged = current;
    if desc.is_accessor_descriptor() && merged.is_data_descriptor() {
        merged.value = None;
        merged.writable = None;
    } else if desc.is_data_descriptor() && merged.is_accessor_descriptor() {
        merged.get = None;
        merged.set = None;
    }
    if let Some(v) = desc.value {
        merged.value = Some(v);
    }
    if let Some(w) = desc.writable {
        merged.writable = Some(w);
    }
    if let Some(g) = desc.get {
        merged.get = Some(g);
    }
    if let Some(s) = desc.set {
        merged.set = Some(s);
    }
    if let Some(e) = desc.enumerable {
        merged.enumerable = Some(e);
    }
    if let Some(c) = desc.configurable {
        merged.configurable = Some(c);
    }
    Some(merged.complete())
}

fn same_value_opt(a: &JsValue, b: Option<&JsValue>) -> bool {
    match b {
        Some(b) => crate::value::is_same_value_js(a, b),
        None => false,
    }
}

pub fn has_property(obj: &JsObject, key: &PropertyKey) -> JsResult<bool> {
    if obj.get_own_property(key)?.is_some() {
        return Ok(true);
    }
    match obj.get_prototype_of()? {
        Some(parent) => parent.has_property(key),
        None => Ok(false),
    }
}

/// `OrdinaryGet`: walks the prototype chain; forwards the *original*
/// `receiver` to accessor calls, not the holder currently being
/// examined.
pub fn get(obj: &JsObject, key: &PropertyKey, receiver: &JsValue, ctx: &mut Context) -> JsResult<JsValue> {
    let desc = obj.get_own_property(key)?;
    match desc {
        Some(d) if d.is_accessor_descriptor() => match d.get {
            Some(getter) if !matches!(getter, JsValue::Undefined) => {
                let getter_obj = getter.as_object().cloned();
                match getter_obj {
                    Some(f) => f.call(receiver, &[], ctx),
                    None => Ok(JsValue::Undefined),
                }
            }
            _ => Ok(JsValue::Undefined),
        },
        Some(d) => Ok(d.value.unwrap_or(JsValue::Undefined)),
        None => match obj.get_prototype_of()? {
            Some(parent) => parent.get(key, receiver, ctx),
            None => Ok(JsValue::Undefined),
        },
    }
}

/// `OrdinarySet`: distinguishes own vs inherited data/accessor; when
/// the inherited (or absent) shape is a data property, creates a new
/// own data property at the *receiver*, which may differ from `obj`
/// when called via `[[Set]]` on a prototype during a receiver-chain
/// walk.
pub fn set(obj: &JsObject, key: PropertyKey, value: JsValue, receiver: &JsValue, ctx: &mut Context) -> JsResult<bool> {
    let own_desc = obj.get_own_property(&key)?;
    match own_desc {
        Some(d) if d.is_accessor_descriptor() => match d.set {
            Some(setter) if !matches!(setter, JsValue::Undefined) => {
                if let Some(f) = setter.as_object() {
                    f.call(receiver, &[value], ctx)?;
                    Ok(true)
                } else {
                    Ok(false)
                }
            }
            _ => Ok(false),
        },
        Some(d) => {
            if !d.writable() {
                return Ok(false);
            }
            let Some(receiver_obj) = receiver.as_object().cloned() else {
                return Ok(false);
            };
            let existing = receiver_obj.get_own_property(&key)?;
            match existing {
                Some(existing_desc) => {
                    if existing_desc.is_accessor_descriptor() || !existing_desc.writable() {
                        return Ok(false);
                    }
                    let mut new_desc = existing_desc;
                    new_desc.value = Some(value);
                    Ok(receiver_obj.define_own_property(key, new_desc)?)
                }
                None => Ok(receiver_obj.define_own_property(
                    key,
                    PropertyDescriptor::data(value, true, true, true),
                )?),
            }
        }
        None => match obj.get_prototype_of()? {
            Some(parent) => parent.set(key, value, receiver, ctx),
            None => {
                let Some(receiver_obj) = receiver.as_object().cloned() else {
                    return Ok(false);
                };
                let existing = receiver_obj.get_own_property(&key)?;
                if let Some(existing_desc) = existing {
                    if existing_desc.is_accessor_descriptor() || !existing_desc.writable() {
                        return Ok(false);
                    }
                    let mut new_desc = existing_desc;
                    new_desc.value = Some(value);
                    Ok(receiver_obj.define_own_property(key, new_desc)?)
                } else {
                    Ok(receiver_obj.define_own_property(
                        key,
                        PropertyDescriptor::data(value, true, true, true),
                    )?)
                }
            }
        },
    }
}

pub fn delete(obj: &JsObject, key: &PropertyKey) -> bool {
    match obj.data().properties.get(key) {
        Some(d) if !d.configurable() => false,
        Some(_) => {
            obj.data_mut().properties.shift_remove(key);
            true
        }
        None => true,
    }
}

/// `OrdinaryOwnPropertyKeys`: integer-index keys ascending, then
/// string keys in insertion order, then symbol keys in insertion
/// order.
pub fn own_property_keys(obj: &JsObject) -> Vec<PropertyKey> {
    let data = obj.data();
    let mut indices: Vec<(u32, PropertyKey)> = Vec::new();
    let mut strings: Vec<PropertyKey> = Vec::new();
    let mut symbols: Vec<PropertyKey> = Vec::new();
    for key in data.properties.keys() {
        if let Some(i) = key.as_array_index() {
            indices.push((i, key.clone()));
        } else {
            match key {
                PropertyKey::String(_) => strings.push(key.clone()),
                PropertyKey::Symbol(_) => symbols.push(key.clone()),
            }
        }
    }
    indices.sort_by_key(|(i, _)| *i);
    let mut out = Vec::with_capacity(indices.len() + strings.len() + symbols.len());
    out.extend(indices.into_iter().map(|(_, k)| k));
    out.extend(strings);
    out.extend(symbols);
    out
}

/// `ToPropertyKey`-adjacent helper used by the evaluator for plain
/// property creation (`CreateDataPropertyOrThrow`), raising a
/// `TypeError` on failure rather than silently dropping the write —
/// used for array-literal/object-literal construction where failure
/// indicates an engine bug, not user error.
pub fn create_data_property_or_throw(
    obj: &JsObject,
    key: PropertyKey,
    value: JsValue,
    ctx: &mut Context,
) -> JsResult<()> {
    let ok = obj.define_own_property(key, PropertyDescriptor::data(value, true, true, true))?;
    if !ok {
        return Err(ctx.throw_native(NativeError::typ("cannot define property")));
    }
    Ok(())
}
