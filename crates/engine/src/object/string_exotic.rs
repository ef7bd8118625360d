//! String-exotic overrides: code-unit indices are exposed
//! as own properties without actually materialising them in the
//! property map, and `length` is a non-configurable, non-writable own
//! property of the wrapped length.

use super::JsObject;
use crate::property::{PropertyDescriptor, PropertyKey};
use crate::value::JsValue;
use vesper_string::JsString;

pub fn get_own_property(s: &JsString, key: &PropertyKey) -> Option<PropertyDescriptor> {
    if let PropertyKey::String(ps) = key {
        if *ps == JsString::from("length") {
            return Some(PropertyDescriptor::data(
                JsValue::Number(s.len() as f64),
                false,
                false,
                false,
            ));
        }
    }
    let index = key.as_array_index()?;
    let unit = s.code_unit_at(index as usize)?;
    Some(PropertyDescriptor::data(
        JsValue::String(JsString::new(vec![unit])),
        false,
        true,
        false,
    ))
}

/// Index keys (ascending) for the wrapped string's code units, then
/// `"length"`, then the object's own non-index properties (already
/// ordinary-ordered) — the String-exotic variant of the
/// `[[OwnPropertyKeys]]` ordering rule.
pub fn own_property_keys(s: &JsString, obj: &JsObject) -> Vec<PropertyKey> {
    let mut out: Vec<PropertyKey> = (0..s.len() as u32).map(PropertyKey::from).collect();
    out.push(PropertyKey::String(JsString::from("length")));
    out.extend(super::ordinary::own_property_keys(obj));
    out
}

