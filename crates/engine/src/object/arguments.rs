//! Arguments-exotic objects: a non-strict, simple-
//! parameter-list function's `arguments` object aliases its indexed
//! properties to the corresponding parameter bindings, so
//! `arguments[0] = x` is visible as the parameter and vice versa,
//! until the parameter is itself reassigned through a path that breaks
//! the alias (it never does, in this model — assignment always goes
//! through the shared environment record binding).
//!
//! Strict-mode and non-simple-parameter-list functions get an
//! *unmapped* arguments object instead: a plain ordinary object with
//! own data properties and no aliasing, built directly as
//! `ObjectKind::Ordinary` by the evaluator's declaration instantiation
//! and never routed through this module at all.

use crate::context::Context;
use crate::environment::Environment;
use crate::error::JsResult;
use crate::property::PropertyKey;
use crate::value::JsValue;
use vesper_gc::{Finalize, Trace};
use vesper_interner::Sym;

/// Maps an arguments-object integer index to the parameter name it
/// aliases, plus the environment the parameter lives in.
pub struct ArgumentsData {
    pub env: Environment,
    pub mapped: Vec<(u32, Sym)>,
}

impl Finalize for ArgumentsData {}
unsafe impl Trace for ArgumentsData {
    fn trace(&self) {
        self.env.trace();
    }
}

pub fn mapped_get(data: &ArgumentsData, key: &PropertyKey, ctx: &mut Context) -> JsResult<Option<JsValue>> {
    let Some(index) = key.as_array_index() else {
        return Ok(None);
    };
    let Some((_, name)) = data.mapped.iter().find(|(i, _)| *i == index) else {
        return Ok(None);
    };
    Ok(Some(data.env.get_binding_value(*name, false, ctx)?))
}

/// Returns `true` if `key` names a mapped index (the caller still
/// performs the ordinary own-data-property write afterwards; this just
/// keeps the parameter binding in sync per the alias).
pub fn mapped_set(data: &ArgumentsData, key: &PropertyKey, value: &JsValue, ctx: &mut Context) -> JsResult<bool> {
    let Some(index) = key.as_array_index() else {
        return Ok(false);
    };
    let Some((_, name)) = data.mapped.iter().find(|(i, _)| *i == index) else {
        return Ok(false);
    };
    data.env.set_mutable_binding(*name, value.clone(), false, ctx)?;
    Ok(true)
}
