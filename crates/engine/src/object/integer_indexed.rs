//! Integer-indexed exotic overrides:
//! numeric indices read/write directly into the backing byte buffer,
//! clamped to `u8` range, rather than going through the property map —
//! the same shape as [`super::string_exotic`] but for the single
//! concrete element type this engine instantiates (`Uint8Array`).

use super::IntegerIndexedData;
use crate::property::{PropertyDescriptor, PropertyKey};
use crate::value::JsValue;

pub fn get_own_property(data: &IntegerIndexedData, key: &PropertyKey) -> Option<PropertyDescriptor> {
    if let PropertyKey::String(ps) = key {
        if *ps == vesper_string::JsString::from("length") {
            return Some(PropertyDescriptor::data(JsValue::Number(data.length as f64), false, false, false));
        }
    }
    let index = key.as_array_index()? as usize;
    let buffer = data.buffer.borrow();
    let byte = *buffer.get(index)?;
    Some(PropertyDescriptor::data(JsValue::from(byte as f64), true, true, true))
}

/// Returns `true` if the index was in range and the write applied —
/// out-of-range numeric writes on an integer-indexed exotic object are
/// silently ignored (`IntegerIndexedElementSet`'s "if index is out of
/// range, return").
pub fn set(data: &IntegerIndexedData, key: &PropertyKey, value: f64) -> bool {
    let Some(index) = key.as_array_index() else { return false };
    let mut buffer = data.buffer.borrow_mut();
    match buffer.get_mut(index as usize) {
        Some(slot) => {
            *slot = to_uint8_clamp(value);
            true
        }
        None => false,
    }
}

fn to_uint8_clamp(value: f64) -> u8 {
    if value.is_nan() {
        0
    } else if value <= 0.0 {
        0
    } else if value >= 255.0 {
        255
    } else {
        value as u8
    }
}

pub fn own_property_keys(data: &IntegerIndexedData, obj: &super::JsObject) -> Vec<PropertyKey> {
    let mut out: Vec<PropertyKey> = (0..data.length as u32).map(PropertyKey::from).collect();
    out.push(PropertyKey::String(vesper_string::JsString::from("length")));
    out.extend(super::ordinary::own_property_keys(obj));
    out
}
