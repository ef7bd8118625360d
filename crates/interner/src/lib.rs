//! Identifier interning.
//!
//! The parser never hands the evaluator a bare `String` for an
//! identifier; it hands a [`Sym`], a small `Copy` handle into an
//! [`Interner`]. Environment records then compare bindings by `Sym`
//! equality (a `u32` compare) instead of string compare, which is both
//! faster and is what lets `Sym` be used directly as a `HashMap` key in
//! the property map and environment bindings.

use hashbrown::HashMap;
use std::num::NonZeroU32;

/// An interned identifier. `Sym`s are only comparable within the
/// [`Interner`] that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Sym(NonZeroU32);

// Well-known syms get fixed, stable indices so the engine can refer to
// them (e.g. the `length` property key) without a runtime lookup. They
// are seeded into every fresh `Interner` in this exact order.
pub const WELL_KNOWN_STRINGS: &[&str] = &[
    "length", "constructor", "prototype", "name", "message", "toString",
    "valueOf", "next", "value", "done", "get", "set", "arguments", "this",
    "__proto__",
];

impl Sym {
    pub const LENGTH: Sym = Sym(NonZeroU32::new(1).unwrap());
    pub const CONSTRUCTOR: Sym = Sym(NonZeroU32::new(2).unwrap());
    pub const PROTOTYPE: Sym = Sym(NonZeroU32::new(3).unwrap());
    pub const NAME: Sym = Sym(NonZeroU32::new(4).unwrap());
    pub const MESSAGE: Sym = Sym(NonZeroU32::new(5).unwrap());
    pub const TO_STRING: Sym = Sym(NonZeroU32::new(6).unwrap());
    pub const VALUE_OF: Sym = Sym(NonZeroU32::new(7).unwrap());
    pub const NEXT: Sym = Sym(NonZeroU32::new(8).unwrap());
    pub const VALUE: Sym = Sym(NonZeroU32::new(9).unwrap());
    pub const DONE: Sym = Sym(NonZeroU32::new(10).unwrap());
    pub const GET: Sym = Sym(NonZeroU32::new(11).unwrap());
    pub const SET: Sym = Sym(NonZeroU32::new(12).unwrap());
    pub const ARGUMENTS: Sym = Sym(NonZeroU32::new(13).unwrap());
    pub const THIS: Sym = Sym(NonZeroU32::new(14).unwrap());
    pub const DUNDER_PROTO: Sym = Sym(NonZeroU32::new(15).unwrap());

    fn from_index(index: u32) -> Self {
        Sym(NonZeroU32::new(index + 1).expect("interner index overflow"))
    }

    fn index(self) -> u32 {
        self.0.get() - 1
    }

    /// Raw numeric form, for callers (module namespace accessors) that
    /// need to stash a `Sym` somewhere that isn't a `Sym` field, such as
    /// a native closure's `JsValue` capture list.
    pub fn to_raw(self) -> u32 {
        self.0.get()
    }

    pub fn from_raw(raw: u32) -> Self {
        Sym(NonZeroU32::new(raw).expect("Sym raw value must be nonzero"))
    }
}

/// Maps identifier text to [`Sym`]s and back. One `Interner` is shared
/// by every script/module parsed into the same `Agent`.
#[derive(Debug, Default)]
pub struct Interner {
    map: HashMap<Box<str>, Sym>,
    strings: Vec<Box<str>>,
}

impl Interner {
    pub fn new() -> Self {
        let mut interner = Self {
            map: HashMap::new(),
            strings: Vec::new(),
        };
        for s in WELL_KNOWN_STRINGS {
            interner.get_or_intern(s);
        }
        interner
    }

    pub fn get_or_intern(&mut self, s: &str) -> Sym {
        if let Some(sym) = self.map.get(s) {
            return *sym;
        }
        let sym = Sym::from_index(self.strings.len() as u32);
        let boxed: Box<str> = s.into();
        self.strings.push(boxed.clone());
        self.map.insert(boxed, sym);
        sym
    }

    pub fn resolve(&self, sym: Sym) -> &str {
        &self.strings[sym.index() as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_known_syms_round_trip() {
        let interner = Interner::new();
        assert_eq!(interner.resolve(Sym::LENGTH), "length");
        assert_eq!(interner.resolve(Sym::PROTOTYPE), "prototype");
    }

    #[test]
    fn interning_is_idempotent() {
        let mut interner = Interner::new();
        let a = interner.get_or_intern("foo");
        let b = interner.get_or_intern("foo");
        assert_eq!(a, b);
        assert_eq!(interner.resolve(a), "foo");
    }
}
