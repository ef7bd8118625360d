//! `GlobalDeclarationInstantiation` / `BlockDeclarationInstantiation` /
//! `FunctionDeclarationInstantiation`: the hoisting pass
//! that runs before a scope's statements do, creating (but, for `let`/
//! `const`, not yet initialising) every binding the scope's static
//! semantics say it owns.

use crate::context::Context;
use crate::environment::Environment;
use crate::error::JsResult;
use crate::value::JsValue;
use vesper_ast::operations::{lexically_declared_names, top_level_function_declarations, var_declared_names};
use vesper_ast::StatementList;

/// `GlobalDeclarationInstantiation(script, env)`. Runs once, before the
/// top-level statement list of a script.
pub fn global_declaration_instantiation(script: &StatementList, ctx: &mut Context) -> JsResult<()> {
    hoist_into(ctx.global_env(), script, ctx)
}

/// `BlockDeclarationInstantiation(code, env)`: declares `let`/`const`/
/// class bindings (left uninitialised — TDZ) and, per annex-B-free
/// lexical scoping, hoists block-scoped function declarations as
/// mutable bindings initialised to their function object immediately.
pub fn block_declaration_instantiation(body: &StatementList, ctx: &mut Context) -> JsResult<()> {
    let env = ctx.lexical_environment();
    for (name, is_const) in lexically_declared_names(body) {
        if is_const {
            env.create_immutable_binding(name, true)?;
        } else {
            env.create_mutable_binding(name, false, ctx)?;
        }
    }
    for func in top_level_function_declarations(body) {
        let name = func.name.expect("block-scoped function declarations are always named");
        let func_obj = super::function_call::create_function_object(std::rc::Rc::new(func.clone()), env.clone(), ctx);
        env.create_mutable_binding(name, false, ctx)?;
        env.initialize_binding(name, JsValue::Object(func_obj), ctx)?;
    }
    Ok(())
}

/// Shared by global and module top-level instantiation: lexical
/// declarations, then hoisted function declarations, then hoisted
/// `var`s left as `undefined` if nothing already bound them.
pub(crate) fn hoist_into(env: Environment, list: &StatementList, ctx: &mut Context) -> JsResult<()> {
    for (name, is_const) in lexically_declared_names(list) {
        if is_const {
            env.create_immutable_binding(name, true)?;
        } else {
            env.create_mutable_binding(name, false, ctx)?;
        }
    }
    for func in top_level_function_declarations(list) {
        let name = func.name.expect("top-level function declarations are always named");
        let func_obj = super::function_call::create_function_object(std::rc::Rc::new(func.clone()), env.clone(), ctx);
        env.create_mutable_binding(name, false, ctx)?;
        env.initialize_binding(name, JsValue::Object(func_obj), ctx)?;
    }
    for name in var_declared_names(list) {
        if !env.has_binding(name, ctx)? {
            env.create_mutable_binding(name, false, ctx)?;
            env.initialize_binding(name, JsValue::Undefined, ctx)?;
        }
    }
    Ok(())
}

/// `FunctionDeclarationInstantiation`: binds parameters
/// (destructuring, defaults, rest) and, for non-arrow functions,
/// `arguments`, then hoists the body's own `var`/function/lexical
/// declarations into the same environment.
pub fn function_declaration_instantiation(
    func: &vesper_ast::function::Function,
    args: &[JsValue],
    env: Environment,
    ctx: &mut Context,
) -> JsResult<()> {
    for (i, param) in func.parameters.iter().enumerate() {
        if param.is_rest {
            let rest: Vec<JsValue> = args.iter().skip(i).cloned().collect();
            let rest_array = JsValue::Object(crate::operations::array_from_values(&rest, ctx));
            bind_parameter(&param.binding, rest_array, &env, ctx)?;
            break;
        }
        let mut value = args.get(i).cloned().unwrap_or(JsValue::Undefined);
        if value.is_undefined() {
            if let Some(default) = &param.default {
                value = super::expression::evaluate_expression(default, ctx)?;
            }
        }
        bind_parameter(&param.binding, value, &env, ctx)?;
    }

    if !func.is_arrow() {
        let arguments_sym = ctx.intern("arguments");
        if !env.has_binding(arguments_sym, ctx)? {
            let mapped = !func.body.strict && !func.has_non_simple_parameter_list();
            let arguments_obj = create_arguments_object(func, args, &env, mapped, ctx);
            env.create_mutable_binding(arguments_sym, false, ctx)?;
            env.initialize_binding(arguments_sym, JsValue::Object(arguments_obj), ctx)?;
        }
    }

    for (name, is_const) in lexically_declared_names(&func.body) {
        if is_const {
            env.create_immutable_binding(name, true)?;
        } else {
            env.create_mutable_binding(name, false, ctx)?;
        }
    }
    for f in top_level_function_declarations(&func.body) {
        let name = f.name.expect("hoisted function declarations are always named");
        let func_obj = super::function_call::create_function_object(std::rc::Rc::new(f.clone()), env.clone(), ctx);
        if !env.has_binding(name, ctx)? {
            env.create_mutable_binding(name, false, ctx)?;
        }
        env.initialize_binding(name, JsValue::Object(func_obj), ctx)?;
    }
    for name in var_declared_names(&func.body) {
        if !env.has_binding(name, ctx)? {
            env.create_mutable_binding(name, false, ctx)?;
            env.initialize_binding(name, JsValue::Undefined, ctx)?;
        }
    }

    Ok(())
}

/// `CreateMappedArgumentsObject` / `CreateUnmappedArgumentsObject`
///: an ordinary object carrying own indexed data
/// properties and `length`, exotic-mapped to the parameter
/// environment only for sloppy-mode simple-parameter-list functions.
fn create_arguments_object(
    func: &vesper_ast::function::Function,
    args: &[JsValue],
    env: &Environment,
    mapped: bool,
    ctx: &mut Context,
) -> crate::object::JsObject {
    use crate::object::{ArgumentsData, JsObject, ObjectKind};
    use crate::property::PropertyDescriptor;

    let proto = ctx.realm().intrinsics.object_prototype.clone();
    let kind = if mapped {
        let mut pairs = Vec::new();
        for (i, param) in func.parameters.iter().enumerate() {
            if let vesper_ast::pattern::Binding::Identifier(name) = param.binding {
                if i < args.len() {
                    pairs.push((i as u32, name));
                }
            }
        }
        ObjectKind::Arguments(ArgumentsData {
            env: env.clone(),
            mapped: pairs,
        })
    } else {
        ObjectKind::Ordinary
    };
    let obj = JsObject::new(Some(proto), kind);
    for (i, arg) in args.iter().enumerate() {
        let _ = obj.define_own_property(
            crate::property::PropertyKey::from(i as u32),
            PropertyDescriptor::data(arg.clone(), true, true, true),
        );
    }
    let _ = obj.define_own_property(
        crate::property::PropertyKey::from("length"),
        PropertyDescriptor::data(JsValue::from(args.len() as f64), true, false, true),
    );
    obj
}

fn bind_parameter(
    binding: &vesper_ast::pattern::Binding,
    value: JsValue,
    env: &Environment,
    ctx: &mut Context,
) -> JsResult<()> {
    match binding {
        vesper_ast::pattern::Binding::Identifier(name) => {
            env.create_mutable_binding(*name, false, ctx)?;
            env.initialize_binding(*name, value, ctx)
        }
        vesper_ast::pattern::Binding::Pattern(pattern) => {
            super::expression::bind_pattern_declare(pattern, value, env, ctx)
        }
    }
}
