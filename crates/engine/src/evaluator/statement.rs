//! Statement evaluation: the half of the evaluator
//! that can produce `break`/`continue`/`return` completions in addition
//! to `normal`/`throw`, hence [`StatementCompletion`] rather than a
//! bare [`JsValue`]. Loop and switch constructs consume matching
//! `break`/`continue` here; everything else propagates an abrupt
//! completion straight to its caller.
//!
//! Completion *values* threaded through a statement list approximate
//! but do not exactly reproduce `UpdateEmpty`: this evaluator has no
//! separate "empty" completion value distinct from `undefined`, so a
//! value-less statement (an empty block, a falsy `if` with no `else`)
//! overwrites the running completion value with `undefined` rather
//! than leaving the previous value in place. This is observable only
//! in the completion *value* a REPL or `evaluateScript` caller sees for
//! a script's last statement — it never affects bindings, side effects,
//! exceptions, or control flow.

use super::expression::{self, BindMode};
use crate::completion::StatementCompletion;
use crate::context::Context;
use crate::environment::Environment;
use crate::error::{JsError, JsResult};
use crate::object::JsObject;
use crate::operations::{get_iterator, iterator_close, iterator_step, iterator_value};
use crate::property::PropertyKey;
use crate::value::JsValue;
use vesper_ast::declaration::{Declaration, VariableDeclaration, VariableKind};
use vesper_ast::statement::iteration::{
    DoWhileLoop, ForBinding, ForInLoop, ForInit, ForLoop, ForOfLoop, WhileLoop,
};
use vesper_ast::statement::{Catch, Statement, SwitchStatement, TryStatement};
use vesper_ast::statement_list::{StatementList, StatementListItem};
use vesper_interner::Sym;

/// `StatementListEvaluation`/`ScriptEvaluation`'s inner loop: runs every
/// item in source order, short-circuiting on the first abrupt
/// completion.
pub fn evaluate_statement_list(list: &StatementList, ctx: &mut Context) -> JsResult<StatementCompletion> {
    let mut last = JsValue::Undefined;
    for item in &list.items {
        match evaluate_statement_list_item(item, ctx)? {
            StatementCompletion::Normal(v) => last = v,
            other => return Ok(other),
        }
    }
    Ok(StatementCompletion::Normal(last))
}

pub(crate) fn evaluate_statement_list_item(item: &StatementListItem, ctx: &mut Context) -> JsResult<StatementCompletion> {
    match item {
        StatementListItem::Statement(stmt) => evaluate_statement(stmt, ctx),
        StatementListItem::Declaration(decl) => {
            evaluate_declaration(decl, ctx)?;
            Ok(StatementCompletion::normal_empty())
        }
    }
}

pub(crate) fn evaluate_declaration(decl: &Declaration, ctx: &mut Context) -> JsResult<()> {
    match decl {
        Declaration::Variable(var_decl) => evaluate_variable_declaration(var_decl, ctx),
        // Function declarations are bound by declaration instantiation's
        // hoisting pass before the statement list ever runs; nothing to
        // do at the point this item is reached in source order.
        Declaration::Function(_) => Ok(()),
        Declaration::Class(class) => {
            let ctor = super::class::build_class(class, ctx)?;
            if let Some(name) = class.name {
                ctx.lexical_environment().initialize_binding(name, JsValue::Object(ctor), ctx)?;
            }
            Ok(())
        }
    }
}

fn evaluate_variable_declaration(decl: &VariableDeclaration, ctx: &mut Context) -> JsResult<()> {
    let mode = if decl.kind == VariableKind::Var { BindMode::Assign } else { BindMode::Initialize };
    for d in &decl.declarators {
        if decl.kind == VariableKind::Var && d.initializer.is_none() {
            // Hoisting already bound this name to `undefined`; leave it
            // (possibly already overwritten by a function declaration of
            // the same name) alone.
            continue;
        }
        let value = match &d.initializer {
            Some(expr) => expression::evaluate_expression(expr, ctx)?,
            None => JsValue::Undefined,
        };
        let env = ctx.lexical_environment();
        expression::bind_binding(&d.binding, value, &env, mode, ctx)?;
    }
    Ok(())
}

/// Does an abrupt completion's (possibly absent) target label belong to
/// this construct's label set? An unlabelled `break`/`continue` always
/// matches (targets the innermost enclosing construct).
fn label_matches(target: Option<Sym>, labels: &[Sym]) -> bool {
    target.map_or(true, |t| labels.contains(&t))
}

pub fn evaluate_statement(stmt: &Statement, ctx: &mut Context) -> JsResult<StatementCompletion> {
    evaluate_labelled(stmt, &[], ctx)
}

/// Threads the accumulated label set of enclosing `Labelled` wrappers
/// down to the construct that actually consumes `break`/`continue`
/// (loops and `switch`); any other statement only catches a matching
/// `break` aimed at one of its own labels.
fn evaluate_labelled(stmt: &Statement, labels: &[Sym], ctx: &mut Context) -> JsResult<StatementCompletion> {
    match stmt {
        Statement::Labelled(name, inner) => {
            let mut nested = labels.to_vec();
            nested.push(*name);
            evaluate_labelled(inner, &nested, ctx)
        }
        Statement::For(for_loop) => evaluate_for(for_loop, labels, ctx),
        Statement::ForIn(for_in) => evaluate_for_in(for_in, labels, ctx),
        Statement::ForOf(for_of) => evaluate_for_of(for_of, labels, ctx),
        Statement::While(while_loop) => evaluate_while(while_loop, labels, ctx),
        Statement::DoWhile(do_while) => evaluate_do_while(do_while, labels, ctx),
        Statement::Switch(switch) => evaluate_switch(switch, labels, ctx),
        other => match evaluate_statement_inner(other, ctx)? {
            StatementCompletion::Break(Some(name)) if labels.contains(&name) => Ok(StatementCompletion::normal_empty()),
            completion => Ok(completion),
        },
    }
}

fn evaluate_statement_inner(stmt: &Statement, ctx: &mut Context) -> JsResult<StatementCompletion> {
    match stmt {
        Statement::Block(list) => super::evaluate_block_in_new_scope(list, ctx.lexical_environment(), ctx),
        Statement::Empty => Ok(StatementCompletion::normal_empty()),
        Statement::Expression(expr) => Ok(StatementCompletion::Normal(expression::evaluate_expression(expr, ctx)?)),
        Statement::If { test, consequent, alternate } => {
            if expression::evaluate_expression(test, ctx)?.to_boolean() {
                evaluate_statement(consequent, ctx)
            } else if let Some(alt) = alternate {
                evaluate_statement(alt, ctx)
            } else {
                Ok(StatementCompletion::normal_empty())
            }
        }
        Statement::Break(label) => Ok(StatementCompletion::Break(*label)),
        Statement::Continue(label) => Ok(StatementCompletion::Continue(*label)),
        Statement::Return(expr) => {
            let value = match expr {
                Some(e) => expression::evaluate_expression(e, ctx)?,
                None => JsValue::Undefined,
            };
            Ok(StatementCompletion::Return(value))
        }
        Statement::Throw(expr) => {
            let value = expression::evaluate_expression(expr, ctx)?;
            Err(JsError::from_value(value))
        }
        Statement::Try(try_stmt) => evaluate_try(try_stmt, ctx),
        Statement::With { object, body } => evaluate_with(object, body, ctx),
        // For/ForIn/ForOf/While/DoWhile/Switch/Labelled are dispatched
        // in `evaluate_labelled` — they need the enclosing label set,
        // which this function (reached only for everything else) never
        // sees.
        Statement::For(_)
        | Statement::ForIn(_)
        | Statement::ForOf(_)
        | Statement::While(_)
        | Statement::DoWhile(_)
        | Statement::Switch(_)
        | Statement::Labelled(..) => unreachable!("dispatched in evaluate_labelled"),
    }
}

fn evaluate_with(object: &vesper_ast::Expression, body: &Statement, ctx: &mut Context) -> JsResult<StatementCompletion> {
    let value = expression::evaluate_expression(object, ctx)?;
    let obj = crate::operations::to_object(&value, ctx)?;
    let outer = ctx.lexical_environment();
    let with_env = crate::environment::object_env::with_environment(obj, outer.clone());
    ctx.set_lexical_environment(with_env);
    let result = evaluate_statement(body, ctx);
    ctx.set_lexical_environment(outer);
    result
}

fn evaluate_try(try_stmt: &TryStatement, ctx: &mut Context) -> JsResult<StatementCompletion> {
    let block_result = super::evaluate_block_in_new_scope(&try_stmt.block, ctx.lexical_environment(), ctx);
    let result = match block_result {
        Err(err) => match &try_stmt.catch {
            Some(catch) => run_catch(catch, err.into_value(), ctx),
            None => Err(err),
        },
        ok => ok,
    };
    match &try_stmt.finally {
        Some(finally_block) => {
            let finally_result = super::evaluate_block_in_new_scope(finally_block, ctx.lexical_environment(), ctx);
            match finally_result {
                Err(e) => Err(e),
                Ok(StatementCompletion::Normal(_)) => result,
                Ok(abrupt) => Ok(abrupt),
            }
        }
        None => result,
    }
}

fn run_catch(catch: &Catch, thrown: JsValue, ctx: &mut Context) -> JsResult<StatementCompletion> {
    let outer = ctx.lexical_environment();
    let catch_env = Environment::declarative(Some(outer.clone()));
    ctx.set_lexical_environment(catch_env.clone());
    let bound = match &catch.parameter {
        Some(param) => expression::bind_binding(param, thrown, &catch_env, BindMode::Declare, ctx),
        None => Ok(()),
    };
    let result = bound.and_then(|()| {
        super::declaration_instantiation::block_declaration_instantiation(&catch.block, ctx)?;
        evaluate_statement_list(&catch.block, ctx)
    });
    ctx.set_lexical_environment(outer);
    result
}

fn evaluate_switch(switch: &SwitchStatement, labels: &[Sym], ctx: &mut Context) -> JsResult<StatementCompletion> {
    let discriminant = expression::evaluate_expression(&switch.discriminant, ctx)?;
    let outer = ctx.lexical_environment();
    let block_env = Environment::declarative(Some(outer.clone()));
    ctx.set_lexical_environment(block_env);
    for case in &switch.cases {
        super::declaration_instantiation::block_declaration_instantiation(&case.body, ctx)?;
    }

    let run = (|| -> JsResult<StatementCompletion> {
        let mut matched = None;
        for (i, case) in switch.cases.iter().enumerate() {
            if let Some(test) = &case.test {
                let test_value = expression::evaluate_expression(test, ctx)?;
                if crate::operations::strict_equals(&discriminant, &test_value) {
                    matched = Some(i);
                    break;
                }
            }
        }
        let start = matched.or_else(|| switch.cases.iter().position(|c| c.test.is_none()));
        let Some(start) = start else {
            return Ok(StatementCompletion::normal_empty());
        };
        let mut last = JsValue::Undefined;
        for case in &switch.cases[start..] {
            match evaluate_statement_list(&case.body, ctx)? {
                StatementCompletion::Normal(v) => last = v,
                StatementCompletion::Break(target) if label_matches(target, labels) => {
                    return Ok(StatementCompletion::normal_empty())
                }
                other => return Ok(other),
            }
        }
        Ok(StatementCompletion::Normal(last))
    })();

    ctx.set_lexical_environment(outer);
    run
}

// ---- loops ----

fn evaluate_while(while_loop: &WhileLoop, labels: &[Sym], ctx: &mut Context) -> JsResult<StatementCompletion> {
    loop {
        if !expression::evaluate_expression(&while_loop.test, ctx)?.to_boolean() {
            return Ok(StatementCompletion::normal_empty());
        }
        match evaluate_statement(&while_loop.body, ctx)? {
            StatementCompletion::Normal(_) => {}
            StatementCompletion::Break(target) if label_matches(target, labels) => {
                return Ok(StatementCompletion::normal_empty())
            }
            StatementCompletion::Continue(target) if label_matches(target, labels) => {}
            other => return Ok(other),
        }
    }
}

fn evaluate_do_while(do_while: &DoWhileLoop, labels: &[Sym], ctx: &mut Context) -> JsResult<StatementCompletion> {
    loop {
        match evaluate_statement(&do_while.body, ctx)? {
            StatementCompletion::Normal(_) => {}
            StatementCompletion::Break(target) if label_matches(target, labels) => {
                return Ok(StatementCompletion::normal_empty())
            }
            StatementCompletion::Continue(target) if label_matches(target, labels) => {}
            other => return Ok(other),
        }
        if !expression::evaluate_expression(&do_while.test, ctx)?.to_boolean() {
            return Ok(StatementCompletion::normal_empty());
        }
    }
}

fn evaluate_for(for_loop: &ForLoop, labels: &[Sym], ctx: &mut Context) -> JsResult<StatementCompletion> {
    let outer = ctx.lexical_environment();
    let mut per_iteration_names = Vec::new();
    let mut is_const = false;

    let mut current_env = outer.clone();
    if let Some(init) = &for_loop.init {
        match &**init {
            ForInit::Variable(decl) if decl.kind != VariableKind::Var => {
                is_const = decl.kind == VariableKind::Const;
                let env = Environment::declarative(Some(outer.clone()));
                for d in &decl.declarators {
                    let mut names = Vec::new();
                    d.binding.bound_names(&mut names);
                    for n in &names {
                        if is_const {
                            env.create_immutable_binding(*n, true)?;
                        } else {
                            env.create_mutable_binding(*n, false, ctx)?;
                        }
                    }
                    per_iteration_names.extend(names);
                }
                ctx.set_lexical_environment(env.clone());
                for d in &decl.declarators {
                    let value = match &d.initializer {
                        Some(e) => expression::evaluate_expression(e, ctx)?,
                        None => JsValue::Undefined,
                    };
                    expression::bind_binding(&d.binding, value, &env, BindMode::Initialize, ctx)?;
                }
                current_env = env;
            }
            ForInit::Variable(decl) => {
                ctx.set_lexical_environment(outer.clone());
                for d in &decl.declarators {
                    if let Some(init_expr) = &d.initializer {
                        let value = expression::evaluate_expression(init_expr, ctx)?;
                        expression::bind_binding(&d.binding, value, &outer, BindMode::Assign, ctx)?;
                    }
                }
            }
            ForInit::Expression(expr) => {
                ctx.set_lexical_environment(outer.clone());
                expression::evaluate_expression(expr, ctx)?;
            }
        }
    }

    let result = (|| -> JsResult<StatementCompletion> {
        loop {
            if !per_iteration_names.is_empty() {
                current_env = create_per_iteration_env(&per_iteration_names, is_const, &current_env, &outer, ctx)?;
            }
            ctx.set_lexical_environment(current_env.clone());
            if let Some(test) = &for_loop.test {
                if !expression::evaluate_expression(test, ctx)?.to_boolean() {
                    return Ok(StatementCompletion::normal_empty());
                }
            }
            match evaluate_statement(&for_loop.body, ctx)? {
                StatementCompletion::Normal(_) => {}
                StatementCompletion::Break(target) if label_matches(target, labels) => {
                    return Ok(StatementCompletion::normal_empty())
                }
                StatementCompletion::Continue(target) if label_matches(target, labels) => {}
                other => return Ok(other),
            }
            if let Some(update) = &for_loop.update {
                expression::evaluate_expression(update, ctx)?;
            }
        }
    })();

    ctx.set_lexical_environment(outer);
    result
}

/// `CreatePerIterationEnvironment`: a fresh declarative environment per
/// loop turn, its bindings' values copied from the previous turn's
/// environment — this is what makes a closure created inside `for (let
/// i = ...; ...)`'s body capture a distinct `i` per iteration.
fn create_per_iteration_env(
    names: &[Sym],
    is_const: bool,
    source: &Environment,
    outer: &Environment,
    ctx: &mut Context,
) -> JsResult<Environment> {
    let fresh = Environment::declarative(Some(outer.clone()));
    for name in names {
        if is_const {
            fresh.create_immutable_binding(*name, true)?;
        } else {
            fresh.create_mutable_binding(*name, false, ctx)?;
        }
        let value = source.get_binding_value(*name, false, ctx)?;
        fresh.initialize_binding(*name, value, ctx)?;
    }
    Ok(fresh)
}

fn bind_for_target(binding: &ForBinding, value: JsValue, env: &Environment, ctx: &mut Context) -> JsResult<()> {
    match binding {
        ForBinding::Var(b) => expression::bind_binding(b, value, env, BindMode::Assign, ctx),
        ForBinding::Let(b) | ForBinding::Const(b) => expression::bind_binding(b, value, env, BindMode::Declare, ctx),
        ForBinding::Pattern(expr) => expression::assign_to_expression_target(expr, value, ctx),
    }
}

fn evaluate_for_of(for_of: &ForOfLoop, labels: &[Sym], ctx: &mut Context) -> JsResult<StatementCompletion> {
    let outer = ctx.lexical_environment();
    let iterable = expression::evaluate_expression(&for_of.iterable, ctx)?;
    let mut record = get_iterator(&iterable, ctx)?;

    let result: JsResult<StatementCompletion> = loop {
        let step = match iterator_step(&mut record, ctx) {
            Ok(Some(s)) => s,
            Ok(None) => break Ok(StatementCompletion::normal_empty()),
            Err(e) => break Err(e),
        };
        let item = match iterator_value(&step, ctx) {
            Ok(v) => v,
            Err(e) => break Err(e),
        };
        let iter_env = Environment::declarative(Some(outer.clone()));
        ctx.set_lexical_environment(iter_env.clone());
        if let Err(e) = bind_for_target(&for_of.binding, item, &iter_env, ctx) {
            break Err(e);
        }
        let completion = evaluate_statement(&for_of.body, ctx);
        ctx.set_lexical_environment(outer.clone());
        match completion {
            Err(e) => break Err(e),
            Ok(StatementCompletion::Break(target)) if label_matches(target, labels) => {
                break Ok(StatementCompletion::normal_empty())
            }
            Ok(StatementCompletion::Continue(target)) if label_matches(target, labels) => continue,
            Ok(StatementCompletion::Normal(_)) => continue,
            Ok(other) => break Ok(other),
        }
    };

    match &result {
        Err(_) => {
            let _ = iterator_close(&record, Ok(JsValue::Undefined), ctx);
        }
        Ok(c) if c.is_abrupt() => {
            let _ = iterator_close(&record, Ok(JsValue::Undefined), ctx);
        }
        _ => {}
    }
    result
}

fn evaluate_for_in(for_in: &ForInLoop, labels: &[Sym], ctx: &mut Context) -> JsResult<StatementCompletion> {
    let outer = ctx.lexical_environment();
    let object_value = expression::evaluate_expression(&for_in.object, ctx)?;
    if object_value.is_null_or_undefined() {
        return Ok(StatementCompletion::normal_empty());
    }
    let obj = crate::operations::to_object(&object_value, ctx)?;
    let keys = enumerate_for_in_keys(&obj, ctx)?;

    for key in keys {
        let iter_env = Environment::declarative(Some(outer.clone()));
        ctx.set_lexical_environment(iter_env.clone());
        bind_for_target(&for_in.binding, key, &iter_env, ctx)?;
        let completion = evaluate_statement(&for_in.body, ctx);
        ctx.set_lexical_environment(outer.clone());
        match completion? {
            StatementCompletion::Normal(_) => {}
            StatementCompletion::Break(target) if label_matches(target, labels) => {
                return Ok(StatementCompletion::normal_empty())
            }
            StatementCompletion::Continue(target) if label_matches(target, labels) => {}
            other => return Ok(other),
        }
    }
    Ok(StatementCompletion::normal_empty())
}

/// `EnumerateObjectProperties`: own enumerable string keys, then walk
/// up the prototype chain doing the same, skipping any name already
/// seen (whether or not the shadowing copy was itself enumerable).
fn enumerate_for_in_keys(obj: &JsObject, ctx: &mut Context) -> JsResult<Vec<JsValue>> {
    let _ = ctx;
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    let mut current = Some(obj.clone());
    while let Some(o) = current {
        for key in o.own_property_keys()? {
            if matches!(key, PropertyKey::Symbol(_)) {
                continue;
            }
            let key_str = key.to_string();
            if !seen.insert(key_str.clone()) {
                continue;
            }
            if let Some(desc) = o.get_own_property(&key)? {
                if desc.enumerable() {
                    out.push(JsValue::from(key_str.as_str()));
                }
            }
        }
        current = o.get_prototype_of()?;
    }
    Ok(out)
}
