//! Generator and async-function evaluation, done the way a tree-walking evaluator with
//! no coroutine support can do it: a generator body runs to completion
//! the instant it's called, buffering every `yield`ed value into the
//! [`crate::context::Context`]-scoped buffer this module pushes; the
//! resulting generator object just replays that buffer from `.next()`.
//! An `async function` resolves the same way — the body runs eagerly,
//! `await` drains the job queue until the awaited promise settles, and
//! the function's ordinary return value/thrown error becomes an
//! already-settled `Promise` returned to the caller.
//!
//! This trades true concurrency (two generators interleaving their
//! side effects across alternating `.next()` calls) for a model that
//! still gets every other generator/async behavior right: buffered
//! values, `done` sequencing, early `.return()`/`.throw()`, `yield*`
//! delegation, and `await` unwrapping. Recorded as an Open Question
//! resolution in DESIGN.md.

use crate::completion::StatementCompletion;
use crate::context::Context;
use crate::environment::function::ThisBindingStatus;
use crate::environment::{Environment, EnvironmentKind, FunctionEnvironmentData};
use crate::error::{JsError, JsResult, NativeError};
use crate::object::function::ThisMode;
use crate::object::{GeneratorData, GeneratorOutcome, JsObject, ObjectKind};
use crate::value::JsValue;
use vesper_ast::expression::Expression;
use vesper_ast::function::Function as AstFunction;

/// Dispatched from `function_call::ordinary_call` for any `ast.
/// is_generator() || ast.is_async()` function body.
pub fn call_generator_or_async(
    func_obj: &JsObject,
    ast: &AstFunction,
    this: &JsValue,
    args: &[JsValue],
    captured_env: Environment,
    ctx: &mut Context,
) -> JsResult<JsValue> {
    let this_mode = if ast.is_arrow() {
        ThisMode::Lexical
    } else if ast.body.strict {
        ThisMode::Strict
    } else {
        ThisMode::Global
    };

    let local_env = Environment::new(
        Some(captured_env),
        EnvironmentKind::Function(FunctionEnvironmentData {
            bindings: crate::environment::Bindings::default(),
            this_value: None,
            this_status: if this_mode == ThisMode::Lexical {
                ThisBindingStatus::Lexical
            } else {
                ThisBindingStatus::Initialized
            },
            new_target: None,
            home_object: match &func_obj.data().kind {
                ObjectKind::Function(f) => f.home_object.clone(),
                _ => None,
            },
            function: Some(func_obj.clone()),
        }),
    );

    if this_mode != ThisMode::Lexical {
        let bound_this = match this_mode {
            ThisMode::Strict => this.clone(),
            ThisMode::Global => match this {
                JsValue::Undefined | JsValue::Null => JsValue::Object(ctx.global_object()),
                JsValue::Object(_) => this.clone(),
                other => crate::operations::to_object(other, ctx).map(JsValue::Object).unwrap_or_else(|_| this.clone()),
            },
            ThisMode::Lexical => unreachable!(),
        };
        local_env.bind_this_value(bound_this)?;
    }

    if ast.is_generator() {
        ctx.push_generator_buffer();
        let body_result = super::function_call::run_ordinary_body(func_obj, ast, args, local_env, ctx);
        let buffer = ctx.current_generator_buffer().expect("generator buffer just pushed");
        ctx.pop_generator_buffer();
        let values = buffer.borrow().clone();

        let outcome = match body_result {
            Ok(v) => GeneratorOutcome::Return(v),
            Err(e) => GeneratorOutcome::Throw(e.into_value()),
        };
        let proto = ctx.realm().intrinsics.generator_prototype.clone();
        let gen_obj = JsObject::new(
            Some(proto),
            ObjectKind::Generator(GeneratorData { values, index: 0, outcome, finished: false, is_async: ast.is_async() }),
        );
        return Ok(JsValue::Object(gen_obj));
    }

    // Plain `async function`: settle a fresh promise with the eagerly
    // computed outcome.
    let body_result = super::function_call::run_ordinary_body(func_obj, ast, args, local_env, ctx);
    let capability = crate::builtins::promise::new_promise_capability(ctx);
    match body_result {
        Ok(v) => {
            capability.resolve.call(&JsValue::Undefined, &[v], ctx)?;
        }
        Err(e) => {
            capability.reject.call(&JsValue::Undefined, &[e.into_value()], ctx)?;
        }
    }
    Ok(JsValue::Object(capability.promise))
}

/// `yield`/`yield*`: pushes onto the innermost generator
/// buffer. With no true suspension, the expression's own value is
/// always `undefined` — there is no way for `.next(v)`'s argument to
/// flow back in in this model (documented simplification).
pub fn evaluate_yield(argument: Option<&Expression>, delegate: bool, ctx: &mut Context) -> JsResult<JsValue> {
    let value = match argument {
        Some(expr) => super::expression::evaluate_expression(expr, ctx)?,
        None => JsValue::Undefined,
    };
    let Some(buffer) = ctx.current_generator_buffer() else {
        return Err(ctx.throw_native(NativeError::syntax("yield is only valid inside a generator function")));
    };
    if delegate {
        let items = crate::operations::iterator_to_list(&value, ctx)?;
        buffer.borrow_mut().extend(items);
    } else {
        buffer.borrow_mut().push(value);
    }
    Ok(JsValue::Undefined)
}

/// `await`: wraps the operand in a
/// resolved-or-passthrough promise, then runs the job queue to
/// completion so that promise resolves (or rejects) before continuing.
/// A promise that is still pending once the job queue has drained with
/// nothing left to produce a settlement is, in this single-threaded
/// synchronous engine, one that never will — that's reported as a
/// `TypeError` rather than hanging.
pub fn evaluate_await(operand: &Expression, ctx: &mut Context) -> JsResult<JsValue> {
    let value = super::expression::evaluate_expression(operand, ctx)?;
    let promise_value = crate::builtins::promise::resolve_static(&JsValue::Undefined, &[value], ctx)?;
    let JsValue::Object(promise) = &promise_value else { unreachable!("Promise.resolve always returns a Promise object") };

    ctx.run_jobs()?;

    let settled = {
        let data = promise.data();
        let ObjectKind::Promise(p) = &data.kind else { unreachable!() };
        match &p.state {
            crate::object::PromiseState::Pending => None,
            crate::object::PromiseState::Fulfilled(v) => Some(Ok(v.clone())),
            crate::object::PromiseState::Rejected(v) => Some(Err(v.clone())),
        }
    };
    match settled {
        Some(Ok(v)) => Ok(v),
        Some(Err(v)) => Err(JsError::from_value(v)),
        None => Err(ctx.throw_native(NativeError::typ("await on a promise that never settles"))),
    }
}

fn generator_state(this: &JsValue, ctx: &mut Context) -> JsResult<JsObject> {
    match this {
        JsValue::Object(o) if matches!(o.data().kind, ObjectKind::Generator(_)) => Ok(o.clone()),
        _ => Err(ctx.throw_native(NativeError::typ("not a generator"))),
    }
}

fn iter_result(value: JsValue, done: bool, ctx: &mut Context) -> JsValue {
    let obj = JsObject::new(Some(ctx.realm().intrinsics.object_prototype.clone()), ObjectKind::Ordinary);
    let _ = obj.define_own_property(
        crate::property::PropertyKey::from("value"),
        crate::property::PropertyDescriptor::data(value, true, true, true),
    );
    let _ = obj.define_own_property(
        crate::property::PropertyKey::from("done"),
        crate::property::PropertyDescriptor::data(JsValue::from(done), true, true, true),
    );
    JsValue::Object(obj)
}

/// `%GeneratorPrototype%.next`: replays one buffered value, or (on the
/// call that drains the buffer) delivers the eagerly-computed outcome.
pub fn resume(this: &JsValue, _sent: JsValue, ctx: &mut Context) -> JsResult<JsValue> {
    let obj = generator_state(this, ctx)?;
    let (value, done, throw, is_async) = {
        let mut data = obj.data_mut();
        let ObjectKind::Generator(g) = &mut data.kind else { unreachable!() };
        let is_async = g.is_async;
        if g.index < g.values.len() {
            let v = g.values[g.index].clone();
            g.index += 1;
            (v, false, None, is_async)
        } else if !g.finished {
            g.finished = true;
            match &g.outcome {
                GeneratorOutcome::Return(v) => (v.clone(), true, None, is_async),
                GeneratorOutcome::Throw(v) => (JsValue::Undefined, true, Some(v.clone()), is_async),
            }
        } else {
            (JsValue::Undefined, true, None, is_async)
        }
    };
    let result = match throw {
        Some(reason) => Err(JsError::from_value(reason)),
        None => Ok(iter_result(value, done, ctx)),
    };
    settle_for_caller(result, is_async, ctx)
}

/// `%GeneratorPrototype%.return`: abandons any remaining buffered
/// values and reports `{value, done: true}` immediately — there is no
/// paused body to run `finally` blocks in on early exit.
pub fn finish(this: &JsValue, value: JsValue, ctx: &mut Context) -> JsResult<JsValue> {
    let obj = generator_state(this, ctx)?;
    let is_async = {
        let mut data = obj.data_mut();
        let ObjectKind::Generator(g) = &mut data.kind else { unreachable!() };
        g.finished = true;
        g.index = g.values.len();
        g.is_async
    };
    settle_for_caller(Ok(iter_result(value, true, ctx)), is_async, ctx)
}

/// `%GeneratorPrototype%.throw`: since the body already ran to
/// completion at call time, there is no suspended `yield` to resume
/// with an exception — this abandons the generator and reports the
/// value as thrown out of the call, the closest available analogue.
pub fn throw_into(this: &JsValue, value: JsValue, ctx: &mut Context) -> JsResult<JsValue> {
    let obj = generator_state(this, ctx)?;
    let is_async = {
        let mut data = obj.data_mut();
        let ObjectKind::Generator(g) = &mut data.kind else { unreachable!() };
        g.finished = true;
        g.index = g.values.len();
        g.is_async
    };
    settle_for_caller(Err(JsError::from_value(value)), is_async, ctx)
}

/// Async generators report `{value, done}` through a promise rather
/// than synchronously; plain generators propagate the result directly.
fn settle_for_caller(result: JsResult<JsValue>, is_async: bool, ctx: &mut Context) -> JsResult<JsValue> {
    if !is_async {
        return result;
    }
    let capability = crate::builtins::promise::new_promise_capability(ctx);
    match result {
        Ok(v) => {
            capability.resolve.call(&JsValue::Undefined, &[v], ctx)?;
        }
        Err(e) => {
            capability.reject.call(&JsValue::Undefined, &[e.into_value()], ctx)?;
        }
    }
    Ok(JsValue::Object(capability.promise))
}
