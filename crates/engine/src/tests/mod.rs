//! End-to-end language-behaviour tests: each runs a JS snippet through a
//! fresh [`Context`] and asserts on the resulting value or thrown error,
//! the way a host embedding this crate would observe it. Unit tests for
//! a single algorithm live next to that algorithm instead (see
//! `property.rs`, `value/number.rs`).

mod array;
mod completion;
mod json;
mod module;
mod object;
mod promise;

use crate::{Context, JsError, JsResult, JsValue};

/// Evaluates `source` in a fresh context, returning the completion
/// value or the thrown error.
fn eval(source: &str) -> JsResult<JsValue> {
    let mut ctx = Context::new();
    crate::evaluate(source, &mut ctx)
}

/// Asserts `source` evaluates to a number equal to `expected`.
fn assert_number(source: &str, expected: f64) {
    match eval(source) {
        Ok(JsValue::Number(n)) => assert_eq!(n, expected, "evaluating {source:?}"),
        other => panic!("evaluating {source:?}: expected Number({expected}), got {other:?}"),
    }
}

/// Asserts `source` evaluates to a boolean equal to `expected`.
fn assert_bool(source: &str, expected: bool) {
    match eval(source) {
        Ok(JsValue::Boolean(b)) => assert_eq!(b, expected, "evaluating {source:?}"),
        other => panic!("evaluating {source:?}: expected Boolean({expected}), got {other:?}"),
    }
}

/// Asserts `source` evaluates to a string equal to `expected`.
fn assert_string(source: &str, expected: &str) {
    match eval(source) {
        Ok(JsValue::String(s)) => assert_eq!(s.to_std_string_lossy(), expected, "evaluating {source:?}"),
        other => panic!("evaluating {source:?}: expected String({expected:?}), got {other:?}"),
    }
}

/// Asserts `source` throws, and that the thrown value's `.name` is
/// `kind_name` (`"TypeError"`, `"ReferenceError"`, ...).
fn assert_throws(source: &str, kind_name: &str) {
    let mut ctx = Context::new();
    let err = crate::evaluate(source, &mut ctx).expect_err(&format!("evaluating {source:?}: expected a throw"));
    assert_error_name(&err, &mut ctx, kind_name, source);
}

fn assert_error_name(err: &JsError, ctx: &mut Context, kind_name: &str, source: &str) {
    let name = match err.value() {
        JsValue::Object(obj) => obj
            .get(&crate::PropertyKey::from("name"), err.value(), ctx)
            .ok()
            .and_then(|v| v.as_string().map(|s| s.to_std_string_lossy())),
        _ => None,
    };
    assert_eq!(
        name.as_deref(),
        Some(kind_name),
        "evaluating {source:?}: expected a thrown {kind_name}, got {:?}",
        err.value()
    );
}
