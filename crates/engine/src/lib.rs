//! `vesper_engine` — the runtime core of the `vesper` ECMAScript
//! interpreter: value model, completion protocol, property/descriptor
//! model, object kinds, environment records, realm & intrinsics, agent,
//! abstract operations, the tree-walking evaluator, and the module
//! loader. Everything in this crate is a faithful rendering of
//! ECMA-262-shaped algorithms; the lexer/parser that produces the
//! `vesper_ast` trees this crate consumes lives in `vesper_parser`.

pub mod agent;
pub mod builtins;
pub mod completion;
pub mod context;
pub mod environment;
pub mod error;
pub mod evaluator;
pub mod execution_context;
pub mod job;
pub mod module;
pub mod object;
pub mod operations;
pub mod property;
pub mod realm;
#[cfg(test)]
mod tests;
pub mod value;

pub use agent::{Agent, FeatureSet};
pub use completion::StatementCompletion;
pub use context::Context;
pub use error::{EngineError, JsError, JsResult, NativeError, NativeErrorKind};
pub use module::{HostModuleLoader, ModuleId};
pub use object::JsObject;
pub use property::{PropertyDescriptor, PropertyKey};
pub use realm::{Intrinsics, Realm};
pub use value::{JsBigInt, JsSymbol, JsValue};

/// Parses and evaluates `source` as a Script in a fresh [`Context`],
/// returning the completion value of the last statement
/// (`ScriptEvaluation`). The convenience entry point `vesper_cli` and
/// integration tests use; embedders needing finer control construct
/// their own `Context` and call [`evaluator::evaluate_script`] directly.
pub fn evaluate(source: &str, ctx: &mut Context) -> JsResult<JsValue> {
    let script = vesper_parser::parse_script(source, ctx.interner_mut())
        .map_err(|e| ctx.throw_native(NativeError::syntax(e.to_string())))?;
    let result = evaluator::evaluate_script(&script, ctx);
    ctx.run_jobs()?;
    result
}
