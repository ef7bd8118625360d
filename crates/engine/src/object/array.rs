//! Array-exotic `[[DefineOwnProperty]]`: enforces `length` coherence and the
//! integer-index-raises-length rule.

use super::{ordinary, JsObject};
use crate::error::JsResult;
use crate::property::{PropertyDescriptor, PropertyKey};
use crate::value::JsValue;
use vesper_string::JsString;

pub struct ArrayData;

fn length_key() -> PropertyKey {
    PropertyKey::String(JsString::from("length"))
}

pub fn current_length(obj: &JsObject) -> u32 {
    match obj.data().properties.get(&length_key()) {
        Some(d) => match &d.value {
            Some(JsValue::Number(n)) => *n as u32,
            _ => 0,
        },
        None => 0,
    }
}

/// `ArraySetLength` + the general `[[DefineOwnProperty]]` dispatch for
/// array-exotic objects.
pub fn define_own_property(obj: &JsObject, key: PropertyKey, desc: PropertyDescriptor) -> JsResult<bool> {
    if key == length_key() {
        return Ok(set_length(obj, desc));
    }
    if let Some(index) = key.as_array_index() {
        let old_len_desc = obj.data().properties.get(&length_key()).cloned();
        let old_len = old_len_desc.as_ref().map(current_length_from_desc).unwrap_or(0);
        let old_len_writable = old_len_desc.as_ref().map(|d| d.writable()).unwrap_or(true);
        if index >= old_len && !old_len_writable {
            return Ok(false);
        }
        let current = obj.data().properties.get(&key).cloned();
        let extensible = obj.data().extensible.get();
        let Some(applied) = ordinary::validate_and_apply(extensible, current, desc) else {
            return Ok(false);
        };
        obj.data_mut().properties.insert(key, applied);
        if index >= old_len {
            if let Some(mut len_desc) = obj.data().properties.get(&length_key()).cloned() {
                len_desc.value = Some(JsValue::Number((index as f64) + 1.0));
                obj.data_mut().properties.insert(length_key(), len_desc);
            }
        }
        return Ok(true);
    }
    Ok(ordinary::define_own_property(obj, key, desc))
}

fn current_length_from_desc(d: &PropertyDescriptor) -> u32 {
    match &d.value {
        Some(JsValue::Number(n)) => *n as u32,
        _ => 0,
    }
}

/// Setting `length` to `N` deletes every own integer-index property
/// with index `>= N`, descending, aborting (and truncating `length`
/// partway) on the first non-configurable index it cannot delete.
fn set_length(obj: &JsObject, desc: PropertyDescriptor) -> bool {
    let Some(new_len_value) = &desc.value else {
        // No value in the descriptor: just apply writable/enumerable/etc.
        let current = obj.data().properties.get(&length_key()).cloned();
        let extensible = obj.data().extensible.get();
        return match ordinary::validate_and_apply(extensible, current, desc) {
            Some(applied) => {
                obj.data_mut().properties.insert(length_key(), applied);
                true
            }
            None => false,
        };
    };
    let new_len = match new_len_value {
        JsValue::Number(n) if *n >= 0.0 && n.fract() == 0.0 && *n <= u32::MAX as f64 => *n as u32,
        _ => return false, // RangeError is raised by the caller (Array.prototype length setter)
    };
    let old_len = current_length(obj);
    if new_len >= old_len {
        let mut new_desc = desc;
        new_desc.value = Some(JsValue::Number(new_len as f64));
        let current = obj.data().properties.get(&length_key()).cloned();
        let extensible = obj.data().extensible.get();
        return match ordinary::validate_and_apply(extensible, current, new_desc) {
            Some(applied) => {
                obj.data_mut().properties.insert(length_key(), applied);
                true
            }
            None => false,
        };
    }

    let current_len_desc = obj.data().properties.get(&length_key()).cloned();
    if let Some(d) = &current_len_desc {
        if !d.writable() {
            return false;
        }
    }

    let mut indices: Vec<u32> = obj
        .data()
        .properties
        .keys()
        .filter_map(|k| k.as_array_index())
        .filter(|i| *i >= new_len)
        .collect();
    indices.sort_unstable_by(|a, b| b.cmp(a)); // descending

    let mut final_len = old_len;
    for index in indices {
        let key = PropertyKey::from(index);
        let deletable = obj
            .data()
            .properties
            .get(&key)
            .map(|d| d.configurable())
            .unwrap_or(true);
        if !deletable {
            final_len = index + 1;
            break;
        }
        obj.data_mut().properties.shift_remove(&key);
        final_len = index;
    }

    let mut final_desc = current_len_desc.unwrap_or_default();
    final_desc.value = Some(JsValue::Number(final_len as f64));
    obj.data_mut().properties.insert(length_key(), final_desc);
    final_len == new_len
}

pub fn array_create(proto: Option<JsObject>, length: u32) -> JsObject {
    let obj = JsObject::new(proto, super::ObjectKind::Array);
    obj.data_mut().properties.insert(
        length_key(),
        PropertyDescriptor::data(JsValue::Number(length as f64), true, false, false),
    );
    obj
}

