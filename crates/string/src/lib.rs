//! `JsString`: the immutable UTF-16 code-unit sequence value from the
//! language's Value model. Language-level string indexing, `.length`,
//! and the String-exotic object's code-unit exposure all read through
//! this type rather than through `std::String`, because ECMAScript
//! strings are sequences of UTF-16 code units, not Unicode scalar
//! values — an unpaired surrogate is a legal (if unusual) `JsString`
//! but not a legal Rust `char`.

mod common;

pub use common::well_known;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// An immutable sequence of UTF-16 code units. Cloning is a refcount
/// bump, not a copy — primitives compare by structural equality, and
/// an `Rc`-backed buffer keeps that comparison cheap to clone around.
#[derive(Clone, Eq)]
pub struct JsString {
    units: Rc<[u16]>,
}

impl JsString {
    pub fn new(units: impl Into<Rc<[u16]>>) -> Self {
        Self {
            units: units.into(),
        }
    }

    pub fn as_slice(&self) -> &[u16] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Code unit at `index`, the primitive operation String-exotic
    /// `[[GetOwnProperty]]` and `CodePointAt` build on.
    pub fn code_unit_at(&self, index: usize) -> Option<u16> {
        self.units.get(index).copied()
    }

    /// Lossy conversion to a Rust `String`, replacing unpaired
    /// surrogates with U+FFFD. Used for diagnostics and for host APIs
    /// (`console`-shaped output) that do not need to preserve them.
    pub fn to_std_string_lossy(&self) -> String {
        String::from_utf16_lossy(&self.units)
    }

    /// Strict conversion; fails if the sequence contains an unpaired
    /// surrogate, which is legal ECMAScript but not legal UTF-8/UTF-16.
    pub fn to_std_string(&self) -> Result<String, std::string::FromUtf16Error> {
        String::from_utf16(&self.units)
    }

    pub fn concat(&self, other: &JsString) -> JsString {
        let mut units = Vec::with_capacity(self.len() + other.len());
        units.extend_from_slice(&self.units);
        units.extend_from_slice(&other.units);
        JsString::new(units)
    }

    pub fn repeat(&self, count: usize) -> JsString {
        let mut units = Vec::with_capacity(self.len() * count);
        for _ in 0..count {
            units.extend_from_slice(&self.units);
        }
        JsString::new(units)
    }
}

impl From<&str> for JsString {
    fn from(s: &str) -> Self {
        JsString::new(s.encode_utf16().collect::<Vec<u16>>())
    }
}

impl From<String> for JsString {
    fn from(s: String) -> Self {
        JsString::from(s.as_str())
    }
}

impl From<Vec<u16>> for JsString {
    fn from(units: Vec<u16>) -> Self {
        JsString::new(units)
    }
}

impl From<&[u16]> for JsString {
    fn from(units: &[u16]) -> Self {
        JsString::new(units.to_vec())
    }
}

impl PartialEq for JsString {
    fn eq(&self, other: &Self) -> bool {
        self.units == other.units
    }
}

impl PartialEq<str> for JsString {
    fn eq(&self, other: &str) -> bool {
        self.units.iter().copied().eq(other.encode_utf16())
    }
}

impl PartialOrd for JsString {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.units.cmp(&other.units))
    }
}
impl Ord for JsString {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.units.cmp(&other.units)
    }
}

impl Hash for JsString {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.units.hash(state);
    }
}

impl fmt::Debug for JsString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.to_std_string_lossy())
    }
}

impl fmt::Display for JsString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_std_string_lossy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_ascii() {
        let s = JsString::from("hello");
        assert_eq!(s.len(), 5);
        assert_eq!(s.to_std_string_lossy(), "hello");
    }

    #[test]
    fn unpaired_surrogate_is_legal() {
        let lone_high_surrogate = JsString::new(vec![0xD800]);
        assert_eq!(lone_high_surrogate.len(), 1);
        assert!(lone_high_surrogate.to_std_string().is_err());
        assert_eq!(lone_high_surrogate.to_std_string_lossy(), "\u{FFFD}");
    }

    #[test]
    fn equality_is_structural() {
        assert_eq!(JsString::from("a"), JsString::from("a"));
        assert_ne!(JsString::from("a"), JsString::from("b"));
    }

    #[test]
    fn concat_preserves_all_units() {
        let a = JsString::from("foo");
        let b = JsString::from("bar");
        assert_eq!(a.concat(&b), JsString::from("foobar"));
    }
}
