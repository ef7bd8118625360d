use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use vesper_gc::{Finalize, Trace};
use vesper_string::JsString;

static NEXT_SYMBOL_ID: AtomicU64 = AtomicU64::new(1);

struct SymbolData {
    id: u64,
    description: Option<JsString>,
}

/// A unique, non-forgeable value: identity plus an
/// optional human-readable description. Two distinct `Symbol()` calls
/// never compare equal even with the same description; `Symbol.for`
/// registry symbols are handled separately, in the `Symbol` intrinsic,
/// by caching and reusing a `JsSymbol` per registry key.
#[derive(Clone)]
pub struct JsSymbol(Rc<SymbolData>);

impl JsSymbol {
    pub fn new(description: Option<JsString>) -> Self {
        let id = NEXT_SYMBOL_ID.fetch_add(1, Ordering::Relaxed);
        JsSymbol(Rc::new(SymbolData { id, description }))
    }

    pub fn description(&self) -> Option<&JsString> {
        self.0.description.as_ref()
    }

    pub fn id(&self) -> u64 {
        self.0.id
    }
}

impl PartialEq for JsSymbol {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}
impl Eq for JsSymbol {}

impl std::hash::Hash for JsSymbol {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}

impl fmt::Display for JsSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.description {
            Some(d) => write!(f, "Symbol({d})"),
            None => write!(f, "Symbol()"),
        }
    }
}
impl fmt::Debug for JsSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl Finalize for JsSymbol {}
unsafe impl Trace for JsSymbol {
    fn trace(&self) {}
}

/// Well-known symbols installed on the `Symbol` intrinsic at realm
/// bootstrap. Stored as a fixed struct so the engine can
/// reach `@@iterator` etc. without a registry lookup.
#[derive(Clone)]
pub struct WellKnownSymbols {
    pub iterator: JsSymbol,
    pub async_iterator: JsSymbol,
    pub to_primitive: JsSymbol,
    pub to_string_tag: JsSymbol,
    pub has_instance: JsSymbol,
    pub species: JsSymbol,
    pub unscopables: JsSymbol,
    pub is_concat_spreadable: JsSymbol,
    pub match_: JsSymbol,
}

impl WellKnownSymbols {
    pub fn new() -> Self {
        let sym = |desc: &str| JsSymbol::new(Some(JsString::from(format!("Symbol.{desc}").as_str())));
        Self {
            iterator: sym("iterator"),
            async_iterator: sym("asyncIterator"),
            to_primitive: sym("toPrimitive"),
            to_string_tag: sym("toStringTag"),
            has_instance: sym("hasInstance"),
            species: sym("species"),
            unscopables: sym("unscopables"),
            is_concat_spreadable: sym("isConcatSpreadable"),
            match_: sym("match"),
        }
    }
}

impl Default for WellKnownSymbols {
    fn default() -> Self {
        Self::new()
    }
}
