//! The ordinary function call/construct protocol:
//! `PrepareForOrdinaryCall`, `OrdinaryCallBindThis`,
//! `OrdinaryCallEvaluateBody`, and `OrdinaryCreateFromConstructor` for
//! instance allocation. Dispatched to from `JsObject::call`/`construct`
//! (see `object/mod.rs`) for every `ObjectKind::Function`.

use crate::completion::StatementCompletion;
use crate::context::Context;
use crate::environment::function::ThisBindingStatus;
use crate::environment::{Environment, EnvironmentKind, FunctionEnvironmentData};
use crate::error::{JsResult, NativeError};
use crate::execution_context::{ExecutionContext, ScriptOrModule};
use crate::object::function::{FunctionData, ThisMode};
use crate::object::{JsObject, ObjectKind};
use crate::property::{PropertyDescriptor, PropertyKey};
use crate::value::JsValue;
use std::rc::Rc;
use vesper_ast::function::{Function as AstFunction, FunctionKind as AstFunctionKind};

/// `OrdinaryFunctionCreate`: builds a `Function`-kind
/// object from a parsed AST function plus its defining environment.
/// Generator/async bodies are marked by `ast.kind` alone — the call
/// protocol below and [`super::generator`] read it from there, so no
/// separate object kind is needed for them.
pub fn create_function_object(ast: Rc<AstFunction>, env: Environment, ctx: &mut Context) -> JsObject {
    let this_mode = if ast.is_arrow() {
        ThisMode::Lexical
    } else if ast.body.strict {
        ThisMode::Strict
    } else {
        ThisMode::Global
    };
    let is_derived_constructor = matches!(ast.kind, AstFunctionKind::ClassConstructor { derived: true });
    let proto = ctx.realm().intrinsics.function_prototype.clone();
    let length = ast.parameters.iter().take_while(|p| p.default.is_none() && !p.is_rest).count();
    let name = ast.name.map(|s| ctx.resolve(s).to_string()).unwrap_or_default();

    let func_obj = JsObject::new(
        Some(proto),
        ObjectKind::Function(FunctionData {
            ast: ast.clone(),
            environment: env,
            this_mode,
            home_object: None,
            is_derived_constructor,
            fields: Rc::new(Vec::new()),
        }),
    );

    let _ = func_obj.define_own_property(
        PropertyKey::from("length"),
        PropertyDescriptor::data(JsValue::from(length as f64), false, false, true),
    );
    let _ = func_obj.define_own_property(
        PropertyKey::from("name"),
        PropertyDescriptor::data(JsValue::from(name.as_str()), false, false, true),
    );

    if matches!(ast.kind, AstFunctionKind::Normal) {
        let object_proto = ctx.realm().intrinsics.object_prototype.clone();
        let proto_obj = JsObject::new(Some(object_proto), ObjectKind::Ordinary);
        let _ = proto_obj.define_own_property(
            PropertyKey::from("constructor"),
            PropertyDescriptor::data(JsValue::Object(func_obj.clone()), true, false, true),
        );
        let _ = func_obj.define_own_property(
            PropertyKey::from("prototype"),
            PropertyDescriptor::data(JsValue::Object(proto_obj), true, false, false),
        );
    }

    func_obj
}

/// Associates a method's `HomeObject` after creation (`MakeMethod`) —
/// used for object-literal and class methods, which
/// need `super` resolution but aren't otherwise distinct from ordinary
/// functions.
pub fn make_method(func_obj: &JsObject, home_object: JsObject) {
    if let ObjectKind::Function(f) = &mut func_obj.data_mut().kind {
        f.home_object = Some(home_object);
    }
}

/// `[[Call]]` for an ordinary function object: allocates a
/// function environment, binds `this`/parameters/`arguments`, then runs
/// the body. Generator and async function bodies are dispatched to
/// [`super::generator`] instead of executed inline.
pub fn ordinary_call(
    func_obj: &JsObject,
    this: &JsValue,
    args: &[JsValue],
    new_target: Option<&JsValue>,
    ctx: &mut Context,
) -> JsResult<JsValue> {
    let (ast, captured_env, this_mode, fields) = {
        let data = func_obj.data();
        let ObjectKind::Function(f) = &data.kind else {
            unreachable!("ordinary_call dispatched only for Function kind")
        };
        (f.ast.clone(), f.environment.clone(), f.this_mode, f.fields.clone())
    };

    if ast.is_generator() || ast.is_async() {
        return super::generator::call_generator_or_async(func_obj, &ast, this, args, captured_env, ctx);
    }

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
            new_target: new_target.cloned(),
            home_object: func_home_object(func_obj),
            function: Some(func_obj.clone()),
        }),
    );

    if this_mode != ThisMode::Lexical {
        let bound_this = match this_mode {
            ThisMode::Strict => this.clone(),
            ThisMode::Global => coerce_sloppy_this(this, ctx),
            ThisMode::Lexical => unreachable!(),
        };
        local_env.bind_this_value(bound_this)?;
    }

    for field in fields.iter() {
        if !field.is_static {
            run_field_initializer(field, this, &local_env, ctx)?;
        }
    }

    run_ordinary_body(func_obj, &ast, args, local_env, ctx)
}

/// Shared by `ordinary_call` and the generator/async path once the
/// function environment is ready: binds parameters/`arguments`, pushes
/// an execution context, and runs the body to a `JsValue` result.
pub(super) fn run_ordinary_body(
    func_obj: &JsObject,
    ast: &AstFunction,
    args: &[JsValue],
    local_env: Environment,
    ctx: &mut Context,
) -> JsResult<JsValue> {
    super::declaration_instantiation::function_declaration_instantiation(ast, args, local_env.clone(), ctx)?;

    ctx.push_context(ExecutionContext {
        function: Some(func_obj.clone()),
        lexical_env: local_env.clone(),
        variable_env: local_env,
        script_or_module: ScriptOrModule::Script,
        strict: ast.body.strict,
    });

    let result = super::statement::evaluate_statement_list(&ast.body, ctx);
    ctx.pop_context();

    match result? {
        StatementCompletion::Return(v) => Ok(v),
        _ => Ok(JsValue::Undefined),
    }
}

/// `[[Construct]]` for an ordinary function object: base
/// classes allocate `this` up front (`OrdinaryCreateFromConstructor`);
/// derived classes leave `this` uninitialised until `super()` runs
/// inside the body (handled by [`super::class`]).
pub fn ordinary_construct(
    func_obj: &JsObject,
    args: &[JsValue],
    new_target: &JsValue,
    ctx: &mut Context,
) -> JsResult<JsValue> {
    let (ast, captured_env, is_derived, fields) = {
        let data = func_obj.data();
        let ObjectKind::Function(f) = &data.kind else {
            unreachable!("ordinary_construct dispatched only for Function kind")
        };
        (f.ast.clone(), f.environment.clone(), f.is_derived_constructor, f.fields.clone())
    };

    let JsValue::Object(new_target_obj) = new_target else {
        return Err(ctx.throw_native(NativeError::typ("new.target must be an object")));
    };

    let this_value = if is_derived {
        None
    } else {
        Some(JsValue::Object(ordinary_create_from_constructor(new_target_obj, ctx)?))
    };

    let local_env = Environment::new(
        Some(captured_env),
        EnvironmentKind::Function(FunctionEnvironmentData {
            bindings: crate::environment::Bindings::default(),
            this_value: this_value.clone(),
            this_status: if is_derived {
                ThisBindingStatus::Uninitialized
            } else {
                ThisBindingStatus::Initialized
            },
            new_target: Some(new_target.clone()),
            home_object: func_home_object(func_obj),
            function: Some(func_obj.clone()),
        }),
    );

    if let Some(this) = &this_value {
        for field in fields.iter() {
            if !field.is_static {
                run_field_initializer(field, this, &local_env, ctx)?;
            }
        }
    }

    let result = run_ordinary_body(func_obj, &ast, args, local_env.clone(), ctx)?;

    match result {
        JsValue::Object(_) => Ok(result),
        JsValue::Undefined => {
            let bound = local_env.get_this_binding(ctx)?;
            if bound.is_undefined() && is_derived {
                return Err(ctx.throw_native(NativeError::reference(
                    "must call super constructor before returning from derived class",
                )));
            }
            Ok(bound)
        }
        _ if matches!(ast.kind, AstFunctionKind::ClassConstructor { .. }) => local_env.get_this_binding(ctx),
        other => Ok(other),
    }
}

/// `OrdinaryCreateFromConstructor`: allocates the new instance's
/// prototype from `new_target.prototype`, falling back to
/// `%Object.prototype%` if that slot isn't itself an object.
pub fn ordinary_create_from_constructor(new_target: &JsObject, ctx: &mut Context) -> JsResult<JsObject> {
    let proto_key = PropertyKey::from("prototype");
    let proto_value = new_target.get(&proto_key, &JsValue::Object(new_target.clone()), ctx)?;
    let proto = match proto_value {
        JsValue::Object(o) => o,
        _ => ctx.realm().intrinsics.object_prototype.clone(),
    };
    Ok(JsObject::new(Some(proto), ObjectKind::Ordinary))
}

fn func_home_object(func_obj: &JsObject) -> Option<JsObject> {
    match &func_obj.data().kind {
        ObjectKind::Function(f) => f.home_object.clone(),
        _ => None,
    }
}

/// sloppy-mode `this` substitution: `undefined`/`null` become the
/// global object, primitives are boxed.
fn coerce_sloppy_this(this: &JsValue, ctx: &mut Context) -> JsValue {
    match this {
        JsValue::Undefined | JsValue::Null => JsValue::Object(ctx.global_object()),
        JsValue::Object(_) => this.clone(),
        other => crate::operations::to_object(other, ctx)
            .map(JsValue::Object)
            .unwrap_or_else(|_| this.clone()),
    }
}

pub(super) fn run_field_initializer(
    field: &crate::object::function::ClassFieldInit,
    this: &JsValue,
    env: &Environment,
    ctx: &mut Context,
) -> JsResult<()> {
    let JsValue::Object(this_obj) = this else {
        return Ok(());
    };
    let previous = ctx.lexical_environment();
    ctx.set_lexical_environment(env.clone());
    let value = match &field.initializer {
        Some(expr) => super::expression::evaluate_expression(expr, ctx),
        None => Ok(JsValue::Undefined),
    };
    ctx.set_lexical_environment(previous);
    let value = value?;
    let key = super::expression::evaluate_property_key(&field.key, ctx)?;
    this_obj.define_own_property(key, PropertyDescriptor::data(value, true, true, true))?;
    Ok(())
}
