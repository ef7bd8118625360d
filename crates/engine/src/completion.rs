//! The abrupt-completion envelope for statement evaluation.
//!
//! Expressions can only produce `normal` or `throw` — that half is
//! `JsResult<JsValue>` (see [`crate::error`]). Statements can *also*
//! produce `break`, `continue` and `return`; those three are modelled
//! here as [`StatementCompletion`], carried inside the `Ok` arm of
//! `JsResult<StatementCompletion>`. Splitting throw (an `Err`) from the
//! other three (variants of the `Ok` payload) rather than cramming five
//! cases into one enum is the idiomatic-Rust reading, and it still keeps
//! completion type uniform (`C.Type` is always one of the five, never a
//! bare value) because no call site ever unwraps past
//! `StatementCompletion` before the statement-evaluation API boundary.

use crate::value::JsValue;
use vesper_interner::Sym;

/// The non-throw completion types a statement can produce.
#[derive(Debug, Clone)]
pub enum StatementCompletion {
    /// `normal`; the carried value is
    /// the completion value of the executed statement (often `empty`,
    /// represented here as `JsValue::Undefined` — the evaluator never
    /// surfaces this distinction to script, only to the completion
    /// chaining inside blocks, which is why `Empty` isn't a separate
    /// variant: whether a value is "empty" is a property of whether
    /// block evaluation overwrites it with the next statement's value,
    /// tracked by the caller, not by this type).
    Normal(JsValue),
    /// `break`, optionally labelled.
    Break(Option<Sym>),
    /// `continue`, optionally labelled.
    Continue(Option<Sym>),
    /// `return`, always carrying a value (`undefined` for a bare
    /// `return;`).
    Return(JsValue),
}

impl StatementCompletion {
    pub fn normal_empty() -> Self {
        StatementCompletion::Normal(JsValue::Undefined)
    }

    pub fn is_abrupt(&self) -> bool {
        !matches!(self, StatementCompletion::Normal(_))
    }

    /// The completion value carried forward when this completion's
    /// `normal`-ness is irrelevant to the caller (e.g. chaining
    /// statement-list completion values) — `None` for the control-flow
    /// variants, which have no completion *value* in the sense the
    /// block-completion chaining rule cares about.
    pub fn value(&self) -> Option<&JsValue> {
        match self {
            StatementCompletion::Normal(v) | StatementCompletion::Return(v) => Some(v),
            _ => None,
        }
    }

    /// Does this abrupt completion's (optional) target label match
    /// `label`? Loop and switch constructs consume matching
    /// break/continue completions whose target is empty or names the
    /// construct's label.
    pub fn matches_label(target: Option<Sym>, label: Option<Sym>) -> bool {
        target.is_none() || target == label
    }
}
