//! `[[GeneratorState]]`/`[[GeneratorBody]]` slots, as
//! this engine actually represents them: rather than suspending a real
//! call stack, a generator body runs to completion eagerly the moment
//! it's called, buffering every `yield`ed value; `%GeneratorPrototype%.
//! next`/`.return`/`.throw` then just replay that buffer (see
//! `evaluator::generator`).

use crate::value::JsValue;
use vesper_gc::{Finalize, Trace};

/// How the eagerly-run body finished, delivered by the `next()` call
/// that drains the last buffered value.
pub enum GeneratorOutcome {
    Return(JsValue),
    Throw(JsValue),
}

pub struct GeneratorData {
    pub values: Vec<JsValue>,
    pub index: usize,
    pub outcome: GeneratorOutcome,
    /// Set once the outcome has been delivered (or the generator was
    /// closed early by `.return`/`.throw`) — every subsequent `next()`
    /// just returns `{value: undefined, done: true}`.
    pub finished: bool,
    pub is_async: bool,
}

impl Finalize for GeneratorData {
    fn finalize(&self) {
        for v in &self.values {
            v.finalize();
        }
        match &self.outcome {
            GeneratorOutcome::Return(v) | GeneratorOutcome::Throw(v) => v.finalize(),
        }
    }
}
unsafe impl Trace for GeneratorData {
    fn trace(&self) {
        for v in &self.values {
            v.trace();
        }
        match &self.outcome {
            GeneratorOutcome::Return(v) | GeneratorOutcome::Throw(v) => v.trace(),
        }
    }
}
