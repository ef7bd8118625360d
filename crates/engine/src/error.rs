//! Thrown-completion values.
//!
//! `JsError` wraps the value carried by a `throw` completion. It is
//! deliberately *not* `std::error::Error` — a thrown value can be any
//! `JsValue`, not just a
//! diagnostic message, so it does not fit Rust's error-description
//! contract. Programmer-facing engine-internal errors (a malformed
//! intrinsic table, an unreachable-invariant violation) use
//! `EngineError` / `thiserror` instead and never flow through the
//! Completion protocol.

use crate::value::JsValue;
use std::fmt;
use vesper_gc::{Finalize, Trace};
use vesper_string::JsString;

/// The native error kinds, used to construct the matching prototype
/// chain when the engine itself raises an error (as opposed to user
/// code calling `new TypeError(...)`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeErrorKind {
    Error,
    Type,
    Range,
    Reference,
    Syntax,
    Eval,
    Uri,
}

impl NativeErrorKind {
    pub fn name(self) -> &'static str {
        match self {
            NativeErrorKind::Error => "Error",
            NativeErrorKind::Type => "TypeError",
            NativeErrorKind::Range => "RangeError",
            NativeErrorKind::Reference => "ReferenceError",
            NativeErrorKind::Syntax => "SyntaxError",
            NativeErrorKind::Eval => "EvalError",
            NativeErrorKind::Uri => "URIError",
        }
    }
}

/// The value carried by a `throw` completion. Every abrupt
/// completion of kind `throw` is represented at the Rust layer as
/// `Err(JsError)`, never as a bare value — this is what keeps the
/// completion-uniformity invariant true without a
/// wrapping `Completion` struct on every call site: `JsResult<T> =
/// Result<T, JsError>` already *is* the throw half of the Completion
/// triple, and `Ok(T)` already is `normal/T`.
#[derive(Debug, Clone)]
pub struct JsError {
    value: JsValue,
}

impl JsError {
    pub fn from_value(value: JsValue) -> Self {
        JsError { value }
    }

    pub fn value(&self) -> &JsValue {
        &self.value
    }

    pub fn into_value(self) -> JsValue {
        self.value
    }
}

impl fmt::Display for JsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.value)
    }
}

impl Finalize for JsError {}
unsafe impl Trace for JsError {
    fn trace(&self) {
        self.value.trace();
    }
}

/// A `Result` alias for the throw-only half of the Completion protocol:
/// everywhere an abstract operation can only produce `normal` or
/// `throw`, this is the Rust type. Statement
/// evaluation additionally needs `break`/`continue`/`return`, carried
/// as `Ok(StatementCompletion::...)` — see [`crate::completion`].
pub type JsResult<T> = Result<T, JsError>;

/// Programmer-facing internal errors: these never reach a `throw`
/// completion and never reach script — they indicate a bug in this
/// engine (a corrupt intrinsic table, a static-semantics invariant
/// violated by a parser bug), not a language-level failure.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("intrinsic `{0}` missing from realm")]
    MissingIntrinsic(&'static str),
    #[error("malformed property descriptor: {0}")]
    MalformedDescriptor(&'static str),
    #[error("module `{0}` resolution failed: {1}")]
    ModuleResolution(String, String),
}

/// Helper constructors, used pervasively by abstract operations and the
/// evaluator to raise a native error of a given kind with a message.
/// The concrete error *object* (with the right prototype from the
/// realm's intrinsics) is built by `crate::realm::Realm::create_error`;
/// these are consumed at call sites that already have a `Context`/
/// `Realm` in scope.
pub struct NativeError {
    pub kind: NativeErrorKind,
    pub message: JsString,
}

impl NativeError {
    pub fn new(kind: NativeErrorKind, message: impl Into<JsString>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
    pub fn typ(message: impl Into<JsString>) -> Self {
        Self::new(NativeErrorKind::Type, message)
    }
    pub fn range(message: impl Into<JsString>) -> Self {
        Self::new(NativeErrorKind::Range, message)
    }
    pub fn reference(message: impl Into<JsString>) -> Self {
        Self::new(NativeErrorKind::Reference, message)
    }
    pub fn syntax(message: impl Into<JsString>) -> Self {
        Self::new(NativeErrorKind::Syntax, message)
    }
    pub fn uri(message: impl Into<JsString>) -> Self {
        Self::new(NativeErrorKind::Uri, message)
    }
}
