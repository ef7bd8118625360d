//! Realm and intrinsic bootstrapping.
//!
//! The intrinsics table is a fixed struct of named slots — bootstraps
//! faster than a string map — rather than an enum-indexed array; with
//! a deliberately reduced set of roughly thirty slots, a struct is
//! both simpler and just as fast, while still giving a name-indexed
//! diagnostic view via [`Intrinsics::named`].

use crate::environment::{global::GlobalEnvironmentData, Environment, EnvironmentKind};
use crate::object::JsObject;
use crate::value::WellKnownSymbols;

/// The intrinsics every realm bootstraps: prototypes first
/// (object prototype at the root), then constructors wired to them.
pub struct Intrinsics {
    pub object_prototype: JsObject,
    pub function_prototype: JsObject,
    pub array_prototype: JsObject,
    pub string_prototype: JsObject,
    pub number_prototype: JsObject,
    pub boolean_prototype: JsObject,
    pub symbol_prototype: JsObject,
    pub error_prototype: JsObject,
    pub type_error_prototype: JsObject,
    pub range_error_prototype: JsObject,
    pub reference_error_prototype: JsObject,
    pub syntax_error_prototype: JsObject,
    pub eval_error_prototype: JsObject,
    pub uri_error_prototype: JsObject,
    pub promise_prototype: JsObject,
    pub iterator_prototype: JsObject,
    pub array_iterator_prototype: JsObject,
    pub string_iterator_prototype: JsObject,
    pub generator_function_prototype: JsObject,
    pub generator_prototype: JsObject,

    pub object_constructor: JsObject,
    pub function_constructor: JsObject,
    pub array_constructor: JsObject,
    pub string_constructor: JsObject,
    pub number_constructor: JsObject,
    pub boolean_constructor: JsObject,
    pub symbol_constructor: JsObject,
    pub error_constructor: JsObject,
    pub type_error_constructor: JsObject,
    pub range_error_constructor: JsObject,
    pub reference_error_constructor: JsObject,
    pub syntax_error_constructor: JsObject,
    pub eval_error_constructor: JsObject,
    pub uri_error_constructor: JsObject,
    pub promise_constructor: JsObject,
    pub proxy_constructor: JsObject,
    pub uint8array_constructor: JsObject,

    pub math: JsObject,
    pub json: JsObject,
    pub reflect: JsObject,

    pub well_known_symbols: WellKnownSymbols,
}

impl Intrinsics {
    /// Name-indexed diagnostic view, for embedder introspection.
    pub fn named(&self) -> Vec<(&'static str, &JsObject)> {
        vec![
            ("Object.prototype", &self.object_prototype),
            ("Function.prototype", &self.function_prototype),
            ("Array.prototype", &self.array_prototype),
            ("String.prototype", &self.string_prototype),
            ("Number.prototype", &self.number_prototype),
            ("Boolean.prototype", &self.boolean_prototype),
            ("Symbol.prototype", &self.symbol_prototype),
            ("Error.prototype", &self.error_prototype),
            ("Promise.prototype", &self.promise_prototype),
            ("Object", &self.object_constructor),
            ("Array", &self.array_constructor),
            ("Promise", &self.promise_constructor),
        ]
    }
}

/// A self-contained universe of intrinsics plus a global.
/// Each object created under a realm is associated with exactly that
/// realm at creation — this reduced engine does not track that
/// association explicitly per object (no multi-realm cross-boundary
/// tests are part of this crate's scope), but `Realm` itself stays a
/// distinct, independently-bootstrapped value so embedding code that
/// *does* create multiple realms gets independent intrinsics and
/// globals.
pub struct Realm {
    pub intrinsics: Intrinsics,
    pub global_object: JsObject,
    pub global_env: Environment,
}

impl Realm {
    /// Constructs intrinsics in topological order and wires up the
    /// global environment. The actual intrinsic method/property
    /// installation lives in `crate::builtins::initialize_realm`,
    /// which this calls — kept as a separate module so each builtin's
    /// surface can live beside its own file.
    pub fn new() -> Self {
        crate::builtins::create_realm()
    }

    pub fn global_environment_data(&self) -> std::cell::Ref<'_, GlobalEnvironmentData> {
        std::cell::Ref::map(self.global_env.inner_borrow(), |rec| match &rec.kind {
            EnvironmentKind::Global(g) => g,
            _ => unreachable!("realm's global_env is always a Global environment record"),
        })
    }
}

impl Default for Realm {
    fn default() -> Self {
        Self::new()
    }
}
