//! The tree-walking evaluator: turns a parsed
//! [`vesper_ast`] tree into Completions by direct recursive descent
//! over the syntax, rather than compiling to any intermediate
//! bytecode — the AST *is* the program representation this crate
//! executes.

pub mod class;
pub mod declaration_instantiation;
pub mod expression;
pub mod function_call;
pub mod generator;
pub mod reference;
pub mod statement;

pub use reference::{Reference, ReferenceBase};

use crate::completion::StatementCompletion;
use crate::context::Context;
use crate::environment::Environment;
use crate::error::JsResult;
use crate::execution_context::{ExecutionContext, ScriptOrModule};
use crate::value::JsValue;
use vesper_ast::StatementList;

/// `ScriptEvaluation`: global declaration instantiation
/// over `script`, then the statement list itself, run in a fresh
/// execution context over the realm's global environment.
pub fn evaluate_script(script: &StatementList, ctx: &mut Context) -> JsResult<JsValue> {
    let global_env = ctx.global_env();
    ctx.push_context(ExecutionContext {
        function: None,
        lexical_env: global_env.clone(),
        variable_env: global_env.clone(),
        script_or_module: ScriptOrModule::Script,
        strict: script.strict,
    });
    let result = (|| {
        declaration_instantiation::global_declaration_instantiation(script, ctx)?;
        statement::evaluate_statement_list(script, ctx)
    })();
    ctx.pop_context();
    let completion = result?;
    Ok(completion.value().unwrap_or(JsValue::Undefined))
}

/// Runs `body` as a fresh declarative scope nested in `outer` — used by
/// blocks, `catch` clauses, and `for` loop per-iteration environments.
pub fn evaluate_block_in_new_scope(
    body: &StatementList,
    outer: Environment,
    ctx: &mut Context,
) -> JsResult<StatementCompletion> {
    let block_env = Environment::declarative(Some(outer));
    let previous = ctx.lexical_environment();
    ctx.set_lexical_environment(block_env);
    let result = declaration_instantiation::block_declaration_instantiation(body, ctx)
        .and_then(|()| statement::evaluate_statement_list(body, ctx));
    ctx.set_lexical_environment(previous);
    result
}
