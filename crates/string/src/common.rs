//! Frequently used property-key strings, built once and cheaply cloned
//! (a refcount bump) instead of re-encoded from UTF-8 at every lookup.

use crate::JsString;
use once_cell::sync::Lazy;

macro_rules! well_known {
    ($($fn_name:ident => $text:expr),+ $(,)?) => {
        $(
            #[allow(non_snake_case)]
            pub fn $fn_name() -> JsString {
                static CACHED: Lazy<JsString> = Lazy::new(|| JsString::from($text));
                CACHED.clone()
            }
        )+
    };
}

/// Commonly used property-key and well-known-value strings.
pub mod well_known {
    use super::*;

    well_known! {
        length => "length",
        constructor => "constructor",
        prototype => "prototype",
        name => "name",
        message => "message",
        to_string => "toString",
        value_of => "valueOf",
        next => "next",
        value => "value",
        done => "done",
        get => "get",
        set => "set",
        undefined => "undefined",
        null => "null",
        boolean => "boolean",
        number => "number",
        string => "string",
        object => "object",
        function => "function",
        symbol => "symbol",
        bigint => "bigint",
    }
}
