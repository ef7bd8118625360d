//! Class evaluation: builds the constructor object, wires up
//! the prototype chain for `extends`, installs methods/accessors, and
//! runs static field initializers. Instance field initializers run
//! from `ordinary_construct`/[`evaluate_super_call`] instead, once
//! `this` actually exists.

use crate::context::Context;
use crate::environment::{Environment, EnvironmentKind};
use crate::error::{JsResult, NativeError};
use crate::object::function::ClassFieldInit;
use crate::object::{JsObject, ObjectKind};
use crate::property::{PropertyDescriptor, PropertyKey};
use crate::value::JsValue;
use std::rc::Rc;
use vesper_ast::expression::ArrayElement;
use vesper_ast::function::class::{Class, ClassElement};
use vesper_ast::function::{Function as AstFunction, FunctionKind as AstFunctionKind};
use vesper_ast::property::MethodKind;
use vesper_ast::statement_list::{StatementList, StatementListItem};

pub fn evaluate_class_expression(class: &Class, ctx: &mut Context) -> JsResult<JsValue> {
    Ok(JsValue::Object(build_class(class, ctx)?))
}

/// Builds the constructor object and, if `class.name` is set,
/// initialises that binding in a fresh scope wrapping the class body —
/// used both for class expressions and (by [`super::statement`]) class
/// declarations, which additionally bind the outer name themselves.
pub fn build_class(class: &Class, ctx: &mut Context) -> JsResult<JsObject> {
    let outer_env = ctx.lexical_environment();
    let class_env = Environment::declarative(Some(outer_env));
    if let Some(name) = class.name {
        class_env.create_immutable_binding(name, true)?;
    }

    let (super_ctor, proto_parent) = match &class.super_class {
        Some(expr) => {
            let previous = ctx.lexical_environment();
            ctx.set_lexical_environment(class_env.clone());
            let value = super::expression::evaluate_expression(expr, ctx);
            ctx.set_lexical_environment(previous);
            let value = value?;
            match value {
                JsValue::Null => (None, None),
                JsValue::Object(ref o) if o.is_constructor() => {
                    let proto_key = PropertyKey::from("prototype");
                    let proto_value = o.get(&proto_key, &value, ctx)?;
                    let proto = match proto_value {
                        JsValue::Object(p) => Some(p),
                        JsValue::Null => None,
                        _ => return Err(ctx.throw_native(NativeError::typ("class prototype must be an object or null"))),
                    };
                    (Some(o.clone()), proto)
                }
                _ => return Err(ctx.throw_native(NativeError::typ("class extends value is not a constructor"))),
            }
        }
        None => (None, Some(ctx.realm().intrinsics.object_prototype.clone())),
    };

    let proto_obj = JsObject::new(proto_parent, ObjectKind::Ordinary);

    let is_derived = class.super_class.is_some();
    let ctor_ast = match &class.constructor {
        Some(ctor) => ctor.clone(),
        None => default_constructor_ast(class.name, is_derived, ctx),
    };

    let ctor_obj = super::function_call::create_function_object(Rc::new(ctor_ast), class_env.clone(), ctx);
    let default_proto = ctx.realm().intrinsics.function_prototype.clone();
    ctor_obj.set_prototype_of(Some(super_ctor.unwrap_or(default_proto)))?;
    ctor_obj.define_own_property(
        PropertyKey::from("prototype"),
        PropertyDescriptor::data(JsValue::Object(proto_obj.clone()), false, false, false),
    )?;
    proto_obj.define_own_property(
        PropertyKey::from("constructor"),
        PropertyDescriptor::data(JsValue::Object(ctor_obj.clone()), true, false, true),
    )?;

    let mut fields = Vec::new();
    for element in &class.elements {
        match element {
            ClassElement::Method { key, function, kind, is_static } => {
                let home = if *is_static { ctor_obj.clone() } else { proto_obj.clone() };
                let target = if *is_static { &ctor_obj } else { &proto_obj };
                let previous = ctx.lexical_environment();
                ctx.set_lexical_environment(class_env.clone());
                let prop_key = super::expression::evaluate_property_key(key, ctx);
                ctx.set_lexical_environment(previous);
                let prop_key = prop_key?;
                let func_obj = super::function_call::create_function_object(
                    Rc::new(function.clone()),
                    class_env.clone(),
                    ctx,
                );
                super::function_call::make_method(&func_obj, home);
                match kind {
                    MethodKind::Normal => {
                        target.define_own_property(
                            prop_key,
                            PropertyDescriptor::data(JsValue::Object(func_obj), true, false, true),
                        )?;
                    }
                    MethodKind::Get => {
                        let mut desc = target.get_own_property(&prop_key)?.unwrap_or_default();
                        desc.get = Some(JsValue::Object(func_obj));
                        desc.enumerable.get_or_insert(false);
                        desc.configurable.get_or_insert(true);
                        target.define_own_property(prop_key, desc)?;
                    }
                    MethodKind::Set => {
                        let mut desc = target.get_own_property(&prop_key)?.unwrap_or_default();
                        desc.set = Some(JsValue::Object(func_obj));
                        desc.enumerable.get_or_insert(false);
                        desc.configurable.get_or_insert(true);
                        target.define_own_property(prop_key, desc)?;
                    }
                }
            }
            ClassElement::Field { key, initializer, is_static } => {
                if *is_static {
                    let previous = ctx.lexical_environment();
                    ctx.set_lexical_environment(class_env.clone());
                    let value = match initializer {
                        Some(expr) => super::expression::evaluate_expression(expr, ctx),
                        None => Ok(JsValue::Undefined),
                    };
                    ctx.set_lexical_environment(previous);
                    let value = value?;
                    let prop_key = super::expression::evaluate_property_key(key, ctx)?;
                    ctor_obj.define_own_property(prop_key, PropertyDescriptor::data(value, true, true, true))?;
                } else {
                    fields.push(ClassFieldInit {
                        key: key.clone(),
                        initializer: initializer.clone(),
                        is_static: false,
                    });
                }
            }
        }
    }

    if let ObjectKind::Function(f) = &mut ctor_obj.data_mut().kind {
        f.fields = Rc::new(fields);
    }

    if let Some(name) = class.name {
        class_env.initialize_binding(name, JsValue::Object(ctor_obj.clone()), ctx)?;
    }

    Ok(ctor_obj)
}

/// The implicit constructor a class body gets when it writes none
///: a derived class forwards every argument on to its
/// parent via `constructor(...args) { super(...args); }`; a base class
/// gets an empty body.
fn default_constructor_ast(name: Option<vesper_interner::Sym>, derived: bool, ctx: &mut Context) -> AstFunction {
    use vesper_ast::function::FormalParameter;
    use vesper_ast::pattern::Binding;

    if !derived {
        return AstFunction {
            name,
            parameters: Vec::new(),
            body: StatementList { items: Vec::new(), strict: true },
            kind: AstFunctionKind::ClassConstructor { derived: false },
        };
    }

    let args_sym = ctx.intern("args");
    let parameters = vec![FormalParameter {
        binding: Binding::Identifier(args_sym),
        default: None,
        is_rest: true,
    }];
    let body = StatementList {
        items: vec![StatementListItem::Statement(vesper_ast::statement::Statement::Expression(
            vesper_ast::expression::Expression::SuperCall(vec![ArrayElement::Spread(
                vesper_ast::expression::Expression::Identifier(args_sym),
            )]),
        ))],
        strict: true,
    };
    AstFunction {
        name,
        parameters,
        body,
        kind: AstFunctionKind::ClassConstructor { derived: true },
    }
}

/// `super(...)` inside a derived class constructor: builds
/// the instance via the parent constructor, binds it as `this`, then
/// runs this class's own (non-static) field initializers.
pub fn evaluate_super_call(arguments: &[ArrayElement], ctx: &mut Context) -> JsResult<JsValue> {
    let this_env = ctx.lexical_environment().get_this_environment();
    let (func_obj, new_target) = {
        let rec = this_env.inner_borrow();
        let EnvironmentKind::Function(f) = &rec.kind else {
            return Err(ctx.throw_native(NativeError::syntax("'super' keyword is only valid inside a constructor")));
        };
        (
            f.function
                .clone()
                .ok_or_else(|| ctx.throw_native(NativeError::syntax("'super' keyword unexpected here")))?,
            f.new_target.clone().unwrap_or(JsValue::Undefined),
        )
    };
    let parent_ctor = func_obj
        .get_prototype_of()?
        .ok_or_else(|| ctx.throw_native(NativeError::typ("'super' keyword is only valid inside a derived class constructor")))?;
    if !parent_ctor.is_constructor() {
        return Err(ctx.throw_native(NativeError::typ("super constructor is not a constructor")));
    }

    let args = super::expression::evaluate_arguments(arguments, ctx)?;
    let this_obj = crate::operations::construct(&JsValue::Object(parent_ctor), &args, &new_target, ctx)?;
    this_env.bind_this_value(JsValue::Object(this_obj.clone()))?;

    let fields = match &func_obj.data().kind {
        ObjectKind::Function(f) => f.fields.clone(),
        _ => Rc::new(Vec::new()),
    };
    for field in fields.iter() {
        super::function_call::run_field_initializer(field, &JsValue::Object(this_obj.clone()), &this_env, ctx)?;
    }

    Ok(JsValue::Object(this_obj))
}
