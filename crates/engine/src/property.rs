//! Property keys and descriptors.

use crate::value::{JsSymbol, JsValue};
use std::fmt;
use vesper_gc::{Finalize, Trace};
use vesper_string::JsString;

/// A property key: either a string or a symbol.
/// `ToPropertyKey` is the abstract operation that produces one of these
/// from an arbitrary value (used by computed member expressions).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    String(JsString),
    Symbol(JsSymbol),
}

impl PropertyKey {
    /// If this key is a canonical numeric string (`"0"`, `"1"`, ...,
    /// but not `"-0"`, `"01"`, or anything out of `u32` range), its
    /// array-index value — used for the array-index key ordering rule
    /// and for array-exotic `length` coherence.
    pub fn as_array_index(&self) -> Option<u32> {
        let PropertyKey::String(s) = self else {
            return None;
        };
        let text = s.to_std_string().ok()?;
        if text == "0" {
            return Some(0);
        }
        if text.starts_with('0') || text.starts_with('-') {
            return None;
        }
        let n: u64 = text.parse().ok()?;
        if n >= u32::MAX as u64 {
            return None;
        }
        Some(n as u32)
    }

    pub fn is_array_index(&self) -> bool {
        self.as_array_index().is_some()
    }
}

impl From<&str> for PropertyKey {
    fn from(s: &str) -> Self {
        PropertyKey::String(JsString::from(s))
    }
}
impl From<JsString> for PropertyKey {
    fn from(s: JsString) -> Self {
        PropertyKey::String(s)
    }
}
impl From<JsSymbol> for PropertyKey {
    fn from(s: JsSymbol) -> Self {
        PropertyKey::Symbol(s)
    }
}
impl From<u32> for PropertyKey {
    fn from(n: u32) -> Self {
        PropertyKey::String(JsString::from(n.to_string().as_str()))
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyKey::String(s) => write!(f, "{s}"),
            PropertyKey::Symbol(s) => write!(f, "{s}"),
        }
    }
}

impl Finalize for PropertyKey {}
unsafe impl Trace for PropertyKey {
    fn trace(&self) {
        if let PropertyKey::Symbol(s) = self {
            s.trace();
        }
    }
}

/// A property descriptor. Fields are `Option`s because a
/// descriptor *argument* (e.g. to `Object.defineProperty`) may omit a
/// field — omission has distinct merge semantics from an explicit
/// `undefined`/`false`, handled by `ValidateAndApplyPropertyDescriptor`.
/// A descriptor that has *settled* on an object (returned
/// from `[[GetOwnProperty]]`) always has every field populated in
/// practice, but we keep the `Option` uniformly rather than a separate
/// "complete descriptor" type, treating descriptor *records* as
/// partial by default.
#[derive(Debug, Clone, Default)]
pub struct PropertyDescriptor {
    pub value: Option<JsValue>,
    pub writable: Option<bool>,
    pub get: Option<JsValue>,
    pub set: Option<JsValue>,
    pub enumerable: Option<bool>,
    pub configurable: Option<bool>,
}

impl PropertyDescriptor {
    pub fn data(value: JsValue, writable: bool, enumerable: bool, configurable: bool) -> Self {
        Self {
            value: Some(value),
            writable: Some(writable),
            enumerable: Some(enumerable),
            configurable: Some(configurable),
            ..Default::default()
        }
    }

    /// The shape used pervasively for intrinsic methods: writable and
    /// configurable, not enumerable — "every built-in Function object
    /// ... has [[Writable]]: true, [[Enumerable]]: false,
    /// [[Configurable]]: true" as ECMA-262 specifies for intrinsics.
    pub fn builtin(value: JsValue) -> Self {
        Self::data(value, true, false, true)
    }

    pub fn accessor(get: Option<JsValue>, set: Option<JsValue>, enumerable: bool, configurable: bool) -> Self {
        Self {
            get,
            set,
            enumerable: Some(enumerable),
            configurable: Some(configurable),
            ..Default::default()
        }
    }

    pub fn is_data_descriptor(&self) -> bool {
        self.value.is_some() || self.writable.is_some()
    }

    pub fn is_accessor_descriptor(&self) -> bool {
        self.get.is_some() || self.set.is_some()
    }

    pub fn is_generic_descriptor(&self) -> bool {
        !self.is_data_descriptor() && !self.is_accessor_descriptor()
    }

    pub fn enumerable(&self) -> bool {
        self.enumerable.unwrap_or(false)
    }
    pub fn configurable(&self) -> bool {
        self.configurable.unwrap_or(false)
    }
    pub fn writable(&self) -> bool {
        self.writable.unwrap_or(false)
    }

    /// `CompletePropertyDescriptor`: fills in the defaults for
    /// any absent field, based on which "shape" this descriptor has.
    pub fn complete(mut self) -> Self {
        if self.is_generic_descriptor() || self.is_data_descriptor() {
            self.value.get_or_insert(JsValue::Undefined);
            self.writable.get_or_insert(false);
        } else {
            self.get.get_or_insert(JsValue::Undefined);
            self.set.get_or_insert(JsValue::Undefined);
        }
        self.enumerable.get_or_insert(false);
        self.configurable.get_or_insert(false);
        self
    }
}

impl Finalize for PropertyDescriptor {}
unsafe impl Trace for PropertyDescriptor {
    fn trace(&self) {
        self.value.trace();
        self.get.trace();
        self.set.trace();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_index_parsing_rejects_leading_zero() {
        let key = PropertyKey::from("01");
        assert_eq!(key.as_array_index(), None);
    }

    #[test]
    fn array_index_parsing_accepts_zero_and_small_indices() {
        assert_eq!(PropertyKey::from("0").as_array_index(), Some(0));
        assert_eq!(PropertyKey::from("42").as_array_index(), Some(42));
    }

    #[test]
    fn non_numeric_key_is_not_an_array_index() {
        assert_eq!(PropertyKey::from("length").as_array_index(), None);
    }
}
