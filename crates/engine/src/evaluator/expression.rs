//! Expression evaluation: every [`vesper_ast::Expression`]
//! variant reduces either straight to a [`JsValue`] or, for identifier
//! and member expressions, to a [`Reference`] that `GetValue`/
//! `PutValue` then bridges to a value.

use super::reference::Reference;
use crate::context::Context;
use crate::environment::Environment;
use crate::error::{JsResult, NativeError};
use crate::object::{JsObject, ObjectKind};
use crate::operations::{
    abstract_equals, array_from_values, call, construct, get_iterator, instance_of, iterator_close,
    iterator_step, iterator_value, strict_equals, to_int32, to_js_string, to_number, to_object,
    to_primitive, to_property_key, to_uint32, PreferredType,
};
use crate::property::{PropertyDescriptor, PropertyKey};
use crate::value::{JsBigInt, JsValue};
use vesper_ast::expression::{ArrayElement, MemberProperty};
use vesper_ast::pattern::{ArrayPattern, Binding, ObjectPattern, Pattern};
use vesper_ast::property::PropertyKeyNode;
use vesper_ast::Expression;
use vesper_interner::Sym;
use vesper_string::JsString;

/// `ResolveBinding(name)`: walks the lexical environment
/// chain outward for the nearest environment with `name` bound.
pub fn resolve_binding(name: Sym, ctx: &mut Context) -> JsResult<Reference> {
    let key = PropertyKey::String(JsString::from(ctx.resolve(name)));
    let strict = ctx.is_strict();
    let mut env = ctx.lexical_environment();
    loop {
        if env.has_binding(name, ctx)? {
            return Ok(Reference::environment(env, key, strict));
        }
        match env.outer() {
            Some(outer) => env = outer,
            None => return Ok(Reference::unresolvable(key, strict)),
        }
    }
}

/// Evaluates `expr` to a [`Reference`] — valid only for expressions
/// that are assignment targets (`Identifier`, `Member`); anything else
/// is a static-semantics error the (out-of-scope) parser should have
/// already rejected, so this panics rather than returning a Completion.
pub fn evaluate_reference(expr: &Expression, ctx: &mut Context) -> JsResult<Reference> {
    match expr {
        Expression::Identifier(name) => resolve_binding(*name, ctx),
        Expression::Member { object, property, optional } => {
            let base = evaluate_expression(object, ctx)?;
            if *optional && base.is_null_or_undefined() {
                return Ok(Reference::unresolvable(PropertyKey::from("optional"), ctx.is_strict()));
            }
            let key = evaluate_member_property(property, ctx)?;
            Ok(Reference::property(base, key, ctx.is_strict()))
        }
        Expression::SuperMember { property } => {
            let key = evaluate_member_property(property, ctx)?;
            let env = ctx.lexical_environment();
            let this_value = env.get_this_binding(ctx)?;
            let base = env
                .get_super_base()
                .ok_or_else(|| ctx.throw_native(NativeError::syntax("'super' keyword is only valid inside a method")))?;
            let mut reference = Reference::property(base, key, ctx.is_strict());
            reference.this_value = Some(this_value);
            Ok(reference)
        }
        _ => unreachable!("evaluate_reference called on a non-reference expression"),
    }
}

fn evaluate_member_property(property: &MemberProperty, ctx: &mut Context) -> JsResult<PropertyKey> {
    match property {
        MemberProperty::Static(name) => Ok(PropertyKey::String(JsString::from(ctx.resolve(*name)))),
        MemberProperty::Computed(expr) => {
            let value = evaluate_expression(expr, ctx)?;
            to_property_key(&value, ctx)
        }
    }
}

pub fn evaluate_property_key(key: &PropertyKeyNode, ctx: &mut Context) -> JsResult<PropertyKey> {
    match key {
        PropertyKeyNode::Identifier(name) => Ok(PropertyKey::String(JsString::from(ctx.resolve(*name)))),
        PropertyKeyNode::StringLiteral(s) => Ok(PropertyKey::String(s.clone())),
        PropertyKeyNode::NumericLiteral(n) => Ok(PropertyKey::String(JsString::from(
            crate::operations::number_to_string(*n).as_str(),
        ))),
        PropertyKeyNode::Computed(expr) => {
            let value = evaluate_expression(expr, ctx)?;
            to_property_key(&value, ctx)
        }
    }
}

/// Evaluates `expr` to a value, applying `GetValue` for reference-shaped
/// expressions automatically.
pub fn evaluate_expression(expr: &Expression, ctx: &mut Context) -> JsResult<JsValue> {
    match expr {
        Expression::This => ctx.lexical_environment().get_this_binding(ctx),
        Expression::Identifier(_) | Expression::Member { .. } | Expression::SuperMember { .. } => {
            evaluate_reference(expr, ctx)?.get_value(ctx)
        }
        Expression::Literal(lit) => evaluate_literal(lit, ctx),
        Expression::ArrayLiteral(array) => evaluate_array_literal(array, ctx),
        Expression::ObjectLiteral(object) => evaluate_object_literal(object, ctx),
        Expression::TemplateLiteral(template) => evaluate_template_literal(template, ctx),
        Expression::Function(func) => Ok(JsValue::Object(super::function_call::create_function_object(
            std::rc::Rc::new((**func).clone()),
            ctx.lexical_environment(),
            ctx,
        ))),
        Expression::Class(class) => super::class::evaluate_class_expression(class, ctx),

        Expression::Unary(op, operand) => evaluate_unary(*op, operand, ctx),
        Expression::Update { op, prefix, target } => evaluate_update(*op, *prefix, target, ctx),
        Expression::Binary(op, left, right) => evaluate_binary(*op, left, right, ctx),
        Expression::Logical(op, left, right) => evaluate_logical(*op, left, right, ctx),
        Expression::Conditional { test, consequent, alternate } => {
            if evaluate_expression(test, ctx)?.to_boolean() {
                evaluate_expression(consequent, ctx)
            } else {
                evaluate_expression(alternate, ctx)
            }
        }
        Expression::Assign { op, target, value } => evaluate_assign(*op, target, value, ctx),
        Expression::Sequence(exprs) => {
            let mut last = JsValue::Undefined;
            for e in exprs {
                last = evaluate_expression(e, ctx)?;
            }
            Ok(last)
        }
        Expression::Call { callee, arguments, optional } => evaluate_call(callee, arguments, *optional, ctx),
        Expression::New { callee, arguments } => evaluate_new(callee, arguments, ctx),
        Expression::Spread(_) => unreachable!("spread is only meaningful inside an argument/element list"),
        Expression::Yield { argument, delegate } => super::generator::evaluate_yield(argument.as_deref(), *delegate, ctx),
        Expression::Await(operand) => super::generator::evaluate_await(operand, ctx),
        Expression::SuperCall(arguments) => super::class::evaluate_super_call(arguments, ctx),
        Expression::ImportCall(specifier) => evaluate_import_call(specifier, ctx),
    }
}

/// `import(specifier)`: resolves against the running
/// execution context's own module, or `None` for script code importing
/// its first module.
fn evaluate_import_call(specifier: &Expression, ctx: &mut Context) -> JsResult<JsValue> {
    let specifier_value = evaluate_expression(specifier, ctx)?;
    let specifier_string = to_js_string(&specifier_value, ctx)?.to_std_string_lossy();
    let referencing = match ctx.running_context().script_or_module {
        crate::execution_context::ScriptOrModule::Module(id) => Some(crate::module::ModuleId(id)),
        crate::execution_context::ScriptOrModule::Script => None,
    };
    Ok(crate::module::dynamic_import(ctx, referencing, &specifier_string))
}

fn evaluate_literal(lit: &vesper_ast::expression::literal::Literal, ctx: &mut Context) -> JsResult<JsValue> {
    use vesper_ast::expression::literal::Literal;
    Ok(match lit {
        Literal::Undefined => JsValue::Undefined,
        Literal::Null => JsValue::Null,
        Literal::Boolean(b) => JsValue::Boolean(*b),
        Literal::Number(n) => JsValue::Number(*n),
        Literal::BigInt(text) => JsValue::BigInt(
            JsBigInt::parse(text).ok_or_else(|| ctx.throw_native(NativeError::syntax("invalid BigInt literal")))?,
        ),
        Literal::String(s) => JsValue::String(s.clone()),
    })
}

fn evaluate_array_literal(array: &vesper_ast::expression::literal::ArrayLiteral, ctx: &mut Context) -> JsResult<JsValue> {
    let mut values = Vec::new();
    for element in &array.elements {
        match element {
            None => values.push(JsValue::Undefined),
            Some(ArrayElement::Expression(expr)) => values.push(evaluate_expression(expr, ctx)?),
            Some(ArrayElement::Spread(expr)) => {
                let spread_value = evaluate_expression(expr, ctx)?;
                let mut record = get_iterator(&spread_value, ctx)?;
                while let Some(result) = iterator_step(&mut record, ctx)? {
                    values.push(iterator_value(&result, ctx)?);
                }
            }
        }
    }
    Ok(JsValue::Object(array_from_values(&values, ctx)))
}

fn evaluate_object_literal(object: &vesper_ast::expression::literal::ObjectLiteral, ctx: &mut Context) -> JsResult<JsValue> {
    use vesper_ast::expression::literal::PropertyDefinition;
    let proto = ctx.realm().intrinsics.object_prototype.clone();
    let obj = JsObject::new(Some(proto), ObjectKind::Ordinary);
    for prop in &object.properties {
        match prop {
            PropertyDefinition::IdentifierShorthand(name) => {
                let value = resolve_binding(*name, ctx)?.get_value(ctx)?;
                let key = PropertyKey::String(JsString::from(ctx.resolve(*name)));
                obj.define_own_property(key, PropertyDescriptor::data(value, true, true, true))?;
            }
            PropertyDefinition::KeyValue(key_node, value_expr) => {
                let key = evaluate_property_key(key_node, ctx)?;
                let value = evaluate_expression(value_expr, ctx)?;
                if is_proto_key(&key) {
                    if let JsValue::Object(p) = &value {
                        obj.set_prototype_of(Some(p.clone()))?;
                    } else if value.is_null() {
                        obj.set_prototype_of(None)?;
                    }
                    continue;
                }
                obj.define_own_property(key, PropertyDescriptor::data(value, true, true, true))?;
            }
            PropertyDefinition::Method(key_node, func, kind) => {
                let key = evaluate_property_key(key_node, ctx)?;
                let func_obj = super::function_call::create_function_object(
                    std::rc::Rc::new(func.clone()),
                    ctx.lexical_environment(),
                    ctx,
                );
                super::function_call::make_method(&func_obj, obj.clone());
                use vesper_ast::function::MethodKind;
                match kind {
                    MethodKind::Normal => {
                        obj.define_own_property(key, PropertyDescriptor::data(JsValue::Object(func_obj), true, true, true))?;
                    }
                    MethodKind::Get => {
                        let mut desc = existing_accessor(&obj, &key);
                        desc.get = Some(JsValue::Object(func_obj));
                        desc.enumerable.get_or_insert(true);
                        desc.configurable.get_or_insert(true);
                        obj.define_own_property(key, desc)?;
                    }
                    MethodKind::Set => {
                        let mut desc = existing_accessor(&obj, &key);
                        desc.set = Some(JsValue::Object(func_obj));
                        desc.enumerable.get_or_insert(true);
                        desc.configurable.get_or_insert(true);
                        obj.define_own_property(key, desc)?;
                    }
                }
            }
            PropertyDefinition::Spread(expr) => {
                let value = evaluate_expression(expr, ctx)?;
                if value.is_null_or_undefined() {
                    continue;
                }
                let source = to_object(&value, ctx)?;
                for key in source.own_property_keys()? {
                    if let Some(desc) = source.get_own_property(&key)? {
                        if desc.enumerable() {
                            let v = source.get(&key, &JsValue::Object(source.clone()), ctx)?;
                            obj.define_own_property(key, PropertyDescriptor::data(v, true, true, true))?;
                        }
                    }
                }
            }
        }
    }
    Ok(JsValue::Object(obj))
}

fn is_proto_key(key: &PropertyKey) -> bool {
    matches!(key, PropertyKey::String(s) if s.to_std_string_lossy() == "__proto__")
}

fn existing_accessor(obj: &JsObject, key: &PropertyKey) -> PropertyDescriptor {
    obj.data().properties.get(key).cloned().unwrap_or_default()
}

fn evaluate_template_literal(template: &vesper_ast::expression::literal::TemplateLiteral, ctx: &mut Context) -> JsResult<JsValue> {
    let mut out = template.cooked.first().map(|s| s.to_std_string_lossy()).unwrap_or_default();
    for (i, expr) in template.expressions.iter().enumerate() {
        let value = evaluate_expression(expr, ctx)?;
        out.push_str(&to_js_string(&value, ctx)?.to_std_string_lossy());
        if let Some(cooked) = template.cooked.get(i + 1) {
            out.push_str(&cooked.to_std_string_lossy());
        }
    }
    Ok(JsValue::from(out.as_str()))
}

fn evaluate_unary(op: vesper_ast::expression::operator::UnaryOp, operand: &Expression, ctx: &mut Context) -> JsResult<JsValue> {
    use vesper_ast::expression::operator::UnaryOp;
    if op == UnaryOp::TypeOf {
        if let Expression::Identifier(name) = operand {
            let reference = resolve_binding(*name, ctx)?;
            if reference.is_unresolvable() {
                return Ok(JsValue::from("undefined"));
            }
            return Ok(JsValue::from(reference.get_value(ctx)?.type_of()));
        }
        return Ok(JsValue::from(evaluate_expression(operand, ctx)?.type_of()));
    }
    if op == UnaryOp::Delete {
        return match operand {
            Expression::Member { .. } | Expression::SuperMember { .. } => {
                Ok(JsValue::Boolean(evaluate_reference(operand, ctx)?.delete(ctx)?))
            }
            _ => Ok(JsValue::Boolean(true)),
        };
    }
    if op == UnaryOp::Void {
        evaluate_expression(operand, ctx)?;
        return Ok(JsValue::Undefined);
    }
    let value = evaluate_expression(operand, ctx)?;
    match op {
        UnaryOp::Minus => match to_numeric(&value, ctx)? {
            Numeric::Number(n) => Ok(JsValue::Number(-n)),
            Numeric::BigInt(b) => Ok(JsValue::BigInt(b.neg())),
        },
        UnaryOp::Plus => Ok(JsValue::Number(to_number(&value, ctx)?)),
        UnaryOp::Not => Ok(JsValue::Boolean(!value.to_boolean())),
        UnaryOp::BitNot => match to_numeric(&value, ctx)? {
            Numeric::Number(n) => Ok(JsValue::Number(!to_int32(&JsValue::Number(n), ctx)? as f64)),
            Numeric::BigInt(b) => Ok(JsValue::BigInt(JsBigInt::from_i64(-1).sub(&b))),
        },
        UnaryOp::TypeOf | UnaryOp::Void | UnaryOp::Delete => unreachable!("handled above"),
    }
}

enum Numeric {
    Number(f64),
    BigInt(JsBigInt),
}

fn to_numeric(value: &JsValue, ctx: &mut Context) -> JsResult<Numeric> {
    let prim = to_primitive(value, PreferredType::Number, ctx)?;
    match prim {
        JsValue::BigInt(b) => Ok(Numeric::BigInt(b)),
        other => Ok(Numeric::Number(to_number(&other, ctx)?)),
    }
}

fn evaluate_update(op: vesper_ast::expression::operator::UpdateOp, prefix: bool, target: &Expression, ctx: &mut Context) -> JsResult<JsValue> {
    use vesper_ast::expression::operator::UpdateOp;
    let reference = evaluate_reference(target, ctx)?;
    let old = reference.get_value(ctx)?;
    let (old_numeric, new_value) = match to_numeric(&old, ctx)? {
        Numeric::Number(n) => {
            let delta = if op == UpdateOp::Increment { 1.0 } else { -1.0 };
            (JsValue::Number(n), JsValue::Number(n + delta))
        }
        Numeric::BigInt(b) => {
            let one = JsBigInt::from_i64(1);
            let updated = if op == UpdateOp::Increment { b.add(&one) } else { b.sub(&one) };
            (JsValue::BigInt(b), JsValue::BigInt(updated))
        }
    };
    reference.put_value(new_value.clone(), ctx)?;
    Ok(if prefix { new_value } else { old_numeric })
}

fn evaluate_binary(op: vesper_ast::expression::operator::BinaryOp, left: &Expression, right: &Expression, ctx: &mut Context) -> JsResult<JsValue> {
    use vesper_ast::expression::operator::BinaryOp;
    if op == BinaryOp::InstanceOf {
        let l = evaluate_expression(left, ctx)?;
        let r = evaluate_expression(right, ctx)?;
        return Ok(JsValue::Boolean(instance_of(&l, &r, ctx)?));
    }
    if op == BinaryOp::In {
        let l = evaluate_expression(left, ctx)?;
        let r = evaluate_expression(right, ctx)?;
        let JsValue::Object(obj) = &r else {
            return Err(ctx.throw_native(NativeError::typ("cannot use 'in' operator on a non-object")));
        };
        let key = to_property_key(&l, ctx)?;
        return Ok(JsValue::Boolean(obj.has_property(&key)?));
    }
    let l = evaluate_expression(left, ctx)?;
    let r = evaluate_expression(right, ctx)?;
    match op {
        BinaryOp::Equal => Ok(JsValue::Boolean(abstract_equals(&l, &r, ctx)?)),
        BinaryOp::NotEqual => Ok(JsValue::Boolean(!abstract_equals(&l, &r, ctx)?)),
        BinaryOp::StrictEqual => Ok(JsValue::Boolean(strict_equals(&l, &r))),
        BinaryOp::StrictNotEqual => Ok(JsValue::Boolean(!strict_equals(&l, &r))),
        BinaryOp::LessThan | BinaryOp::GreaterThan | BinaryOp::LessThanOrEqual | BinaryOp::GreaterThanOrEqual => {
            evaluate_relational(op, &l, &r, ctx)
        }
        BinaryOp::Add => evaluate_add(&l, &r, ctx),
        BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod | BinaryOp::Exp => {
            evaluate_arithmetic(op, &l, &r, ctx)
        }
        BinaryOp::BitAnd | BinaryOp::BitOr | BinaryOp::BitXor => evaluate_bitwise(op, &l, &r, ctx),
        BinaryOp::Shl | BinaryOp::Shr | BinaryOp::UShr => evaluate_shift(op, &l, &r, ctx),
        BinaryOp::In | BinaryOp::InstanceOf => unreachable!("handled above"),
    }
}

fn evaluate_relational(op: vesper_ast::expression::operator::BinaryOp, l: &JsValue, r: &JsValue, ctx: &mut Context) -> JsResult<JsValue> {
    use vesper_ast::expression::operator::BinaryOp;
    let lp = to_primitive(l, PreferredType::Number, ctx)?;
    let rp = to_primitive(r, PreferredType::Number, ctx)?;
    if let (JsValue::String(ls), JsValue::String(rs)) = (&lp, &rp) {
        let ordering = ls.to_std_string_lossy().cmp(&rs.to_std_string_lossy());
        return Ok(JsValue::Boolean(match op {
            BinaryOp::LessThan => ordering.is_lt(),
            BinaryOp::GreaterThan => ordering.is_gt(),
            BinaryOp::LessThanOrEqual => ordering.is_le(),
            BinaryOp::GreaterThanOrEqual => ordering.is_ge(),
            _ => unreachable!(),
        }));
    }
    if let (JsValue::BigInt(lb), JsValue::BigInt(rb)) = (&lp, &rp) {
        return Ok(JsValue::Boolean(match op {
            BinaryOp::LessThan => lb < rb,
            BinaryOp::GreaterThan => lb > rb,
            BinaryOp::LessThanOrEqual => lb <= rb,
            BinaryOp::GreaterThanOrEqual => lb >= rb,
            _ => unreachable!(),
        }));
    }
    let ln = to_number(&lp, ctx)?;
    let rn = to_number(&rp, ctx)?;
    if ln.is_nan() || rn.is_nan() {
        return Ok(JsValue::Boolean(false));
    }
    Ok(JsValue::Boolean(match op {
        BinaryOp::LessThan => ln < rn,
        BinaryOp::GreaterThan => ln > rn,
        BinaryOp::LessThanOrEqual => ln <= rn,
        BinaryOp::GreaterThanOrEqual => ln >= rn,
        _ => unreachable!(),
    }))
}

/// `+` needs its own dance: string-concatenation if either operand's
/// primitive form is a string, else numeric addition.
fn evaluate_add(l: &JsValue, r: &JsValue, ctx: &mut Context) -> JsResult<JsValue> {
    let lp = to_primitive(l, PreferredType::Default, ctx)?;
    let rp = to_primitive(r, PreferredType::Default, ctx)?;
    if matches!(lp, JsValue::String(_)) || matches!(rp, JsValue::String(_)) {
        let ls = to_js_string(&lp, ctx)?;
        let rs = to_js_string(&rp, ctx)?;
        let mut combined = ls.to_std_string_lossy();
        combined.push_str(&rs.to_std_string_lossy());
        return Ok(JsValue::from(combined.as_str()));
    }
    match (to_numeric(&lp, ctx)?, to_numeric(&rp, ctx)?) {
        (Numeric::BigInt(a), Numeric::BigInt(b)) => Ok(JsValue::BigInt(a.add(&b))),
        (Numeric::Number(a), Numeric::Number(b)) => Ok(JsValue::Number(a + b)),
        _ => Err(ctx.throw_native(NativeError::typ("cannot mix BigInt and other types"))),
    }
}

fn evaluate_arithmetic(op: vesper_ast::expression::operator::BinaryOp, l: &JsValue, r: &JsValue, ctx: &mut Context) -> JsResult<JsValue> {
    use vesper_ast::expression::operator::BinaryOp;
    match (to_numeric(l, ctx)?, to_numeric(r, ctx)?) {
        (Numeric::Number(a), Numeric::Number(b)) => Ok(JsValue::Number(match op {
            BinaryOp::Sub => a - b,
            BinaryOp::Mul => a * b,
            BinaryOp::Div => a / b,
            BinaryOp::Mod => a % b,
            BinaryOp::Exp => a.powf(b),
            _ => unreachable!(),
        })),
        (Numeric::BigInt(a), Numeric::BigInt(b)) => match op {
            BinaryOp::Sub => Ok(JsValue::BigInt(a.sub(&b))),
            BinaryOp::Mul => Ok(JsValue::BigInt(a.mul(&b))),
            _ => Err(ctx.throw_native(NativeError::typ("unsupported BigInt operation"))),
        },
        _ => Err(ctx.throw_native(NativeError::typ("cannot mix BigInt and other types"))),
    }
}

fn evaluate_bitwise(op: vesper_ast::expression::operator::BinaryOp, l: &JsValue, r: &JsValue, ctx: &mut Context) -> JsResult<JsValue> {
    use vesper_ast::expression::operator::BinaryOp;
    let a = to_int32(l, ctx)?;
    let b = to_int32(r, ctx)?;
    Ok(JsValue::Number(match op {
        BinaryOp::BitAnd => (a & b) as f64,
        BinaryOp::BitOr => (a | b) as f64,
        BinaryOp::BitXor => (a ^ b) as f64,
        _ => unreachable!(),
    }))
}

fn evaluate_shift(op: vesper_ast::expression::operator::BinaryOp, l: &JsValue, r: &JsValue, ctx: &mut Context) -> JsResult<JsValue> {
    use vesper_ast::expression::operator::BinaryOp;
    match op {
        BinaryOp::Shl => {
            let a = to_int32(l, ctx)?;
            let shift = to_uint32(r, ctx)? & 31;
            Ok(JsValue::Number((a << shift) as f64))
        }
        BinaryOp::Shr => {
            let a = to_int32(l, ctx)?;
            let shift = to_uint32(r, ctx)? & 31;
            Ok(JsValue::Number((a >> shift) as f64))
        }
        BinaryOp::UShr => {
            let a = to_uint32(l, ctx)?;
            let shift = to_uint32(r, ctx)? & 31;
            Ok(JsValue::Number((a >> shift) as f64))
        }
        _ => unreachable!(),
    }
}

fn evaluate_logical(op: vesper_ast::expression::operator::LogicalOp, left: &Expression, right: &Expression, ctx: &mut Context) -> JsResult<JsValue> {
    use vesper_ast::expression::operator::LogicalOp;
    let l = evaluate_expression(left, ctx)?;
    match op {
        LogicalOp::And => {
            if !l.to_boolean() {
                Ok(l)
            } else {
                evaluate_expression(right, ctx)
            }
        }
        LogicalOp::Or => {
            if l.to_boolean() {
                Ok(l)
            } else {
                evaluate_expression(right, ctx)
            }
        }
        LogicalOp::Coalesce => {
            if l.is_null_or_undefined() {
                evaluate_expression(right, ctx)
            } else {
                Ok(l)
            }
        }
    }
}

fn evaluate_assign(op: vesper_ast::expression::operator::AssignOp, target: &Expression, value: &Expression, ctx: &mut Context) -> JsResult<JsValue> {
    use vesper_ast::expression::operator::AssignOp;
    if op == AssignOp::Assign {
        let v = evaluate_expression(value, ctx)?;
        let reference = evaluate_reference(target, ctx)?;
        reference.put_value(v.clone(), ctx)?;
        return Ok(v);
    }
    if matches!(op, AssignOp::LogicalAnd | AssignOp::LogicalOr | AssignOp::Coalesce) {
        let reference = evaluate_reference(target, ctx)?;
        let current = reference.get_value(ctx)?;
        let short_circuit = match op {
            AssignOp::LogicalAnd => !current.to_boolean(),
            AssignOp::LogicalOr => current.to_boolean(),
            AssignOp::Coalesce => !current.is_null_or_undefined(),
            _ => unreachable!(),
        };
        if short_circuit {
            return Ok(current);
        }
        let v = evaluate_expression(value, ctx)?;
        reference.put_value(v.clone(), ctx)?;
        return Ok(v);
    }
    let reference = evaluate_reference(target, ctx)?;
    let current = reference.get_value(ctx)?;
    let rhs = evaluate_expression(value, ctx)?;
    let binary_op = match op {
        AssignOp::Add => vesper_ast::expression::operator::BinaryOp::Add,
        AssignOp::Sub => vesper_ast::expression::operator::BinaryOp::Sub,
        AssignOp::Mul => vesper_ast::expression::operator::BinaryOp::Mul,
        AssignOp::Div => vesper_ast::expression::operator::BinaryOp::Div,
        AssignOp::Mod => vesper_ast::expression::operator::BinaryOp::Mod,
        AssignOp::Exp => vesper_ast::expression::operator::BinaryOp::Exp,
        AssignOp::BitAnd => vesper_ast::expression::operator::BinaryOp::BitAnd,
        AssignOp::BitOr => vesper_ast::expression::operator::BinaryOp::BitOr,
        AssignOp::BitXor => vesper_ast::expression::operator::BinaryOp::BitXor,
        AssignOp::Shl => vesper_ast::expression::operator::BinaryOp::Shl,
        AssignOp::Shr => vesper_ast::expression::operator::BinaryOp::Shr,
        AssignOp::UShr => vesper_ast::expression::operator::BinaryOp::UShr,
        _ => unreachable!(),
    };
    let result = match binary_op {
        vesper_ast::expression::operator::BinaryOp::Add => evaluate_add(&current, &rhs, ctx)?,
        vesper_ast::expression::operator::BinaryOp::BitAnd
        | vesper_ast::expression::operator::BinaryOp::BitOr
        | vesper_ast::expression::operator::BinaryOp::BitXor => evaluate_bitwise(binary_op, &current, &rhs, ctx)?,
        vesper_ast::expression::operator::BinaryOp::Shl
        | vesper_ast::expression::operator::BinaryOp::Shr
        | vesper_ast::expression::operator::BinaryOp::UShr => evaluate_shift(binary_op, &current, &rhs, ctx)?,
        _ => evaluate_arithmetic(binary_op, &current, &rhs, ctx)?,
    };
    reference.put_value(result.clone(), ctx)?;
    Ok(result)
}

/// `ArgumentListEvaluation`: expands spread elements in place.
pub(super) fn evaluate_arguments(arguments: &[ArrayElement], ctx: &mut Context) -> JsResult<Vec<JsValue>> {
    let mut out = Vec::new();
    for arg in arguments {
        match arg {
            ArrayElement::Expression(expr) => out.push(evaluate_expression(expr, ctx)?),
            ArrayElement::Spread(expr) => {
                let value = evaluate_expression(expr, ctx)?;
                let mut record = get_iterator(&value, ctx)?;
                while let Some(result) = iterator_step(&mut record, ctx)? {
                    out.push(iterator_value(&result, ctx)?);
                }
            }
        }
    }
    Ok(out)
}

fn evaluate_call(callee: &Expression, arguments: &[ArrayElement], optional: bool, ctx: &mut Context) -> JsResult<JsValue> {
    let (func, this) = match callee {
        Expression::Member { .. } | Expression::SuperMember { .. } => {
            let reference = evaluate_reference(callee, ctx)?;
            let this = match &reference.base {
                super::ReferenceBase::Value(v) => reference.this_value.clone().unwrap_or_else(|| v.clone()),
                _ => JsValue::Undefined,
            };
            (reference.get_value(ctx)?, this)
        }
        _ => (evaluate_expression(callee, ctx)?, JsValue::Undefined),
    };
    if optional && func.is_null_or_undefined() {
        return Ok(JsValue::Undefined);
    }
    let args = evaluate_arguments(arguments, ctx)?;
    call(&func, &this, &args, ctx)
}

fn evaluate_new(callee: &Expression, arguments: &[ArrayElement], ctx: &mut Context) -> JsResult<JsValue> {
    let func = evaluate_expression(callee, ctx)?;
    let args = evaluate_arguments(arguments, ctx)?;
    Ok(JsValue::Object(construct(&func, &args, &func, ctx)?))
}

// ---- destructuring ----

/// How a pattern's leaf identifiers are bound: freshly (parameters,
/// `catch`, `for (let ...)` per-iteration scopes) or by assignment into
/// an already-resolvable binding (`var` destructuring, `for (x of ...)`
/// into a pre-existing variable).
#[derive(Clone, Copy)]
pub enum BindMode {
    Declare,
    Assign,
    /// Every leaf's binding already exists (created during declaration
    /// instantiation's hoisting pass) and is still in its TDZ — used for
    /// `let`/`const` statement execution, which only needs to clear the
    /// TDZ, not create a new binding.
    Initialize,
}

/// Declares (or assigns, or initialises, per `mode`) every leaf of
/// `binding` against `value`, recursing into nested array/object
/// patterns.
pub fn bind_binding(binding: &Binding, value: JsValue, env: &Environment, mode: BindMode, ctx: &mut Context) -> JsResult<()> {
    match binding {
        Binding::Identifier(name) => match mode {
            BindMode::Declare => {
                env.create_mutable_binding(*name, false, ctx)?;
                env.initialize_binding(*name, value, ctx)
            }
            BindMode::Assign => resolve_binding(*name, ctx)?.put_value(value, ctx),
            BindMode::Initialize => env.initialize_binding(*name, value, ctx),
        },
        Binding::Pattern(pattern) => bind_pattern(pattern, value, env, mode, ctx),
    }
}

/// Used by [`super::declaration_instantiation`] for parameter binding,
/// where every leaf is freshly declared in the function environment.
pub fn bind_pattern_declare(pattern: &Pattern, value: JsValue, env: &Environment, ctx: &mut Context) -> JsResult<()> {
    bind_pattern(pattern, value, env, BindMode::Declare, ctx)
}

/// Used by [`super::statement`] for `let`/`const` declarations, whose
/// leaves were already created (uninitialised) by hoisting.
pub fn bind_pattern_initialize(pattern: &Pattern, value: JsValue, env: &Environment, ctx: &mut Context) -> JsResult<()> {
    bind_pattern(pattern, value, env, BindMode::Initialize, ctx)
}

fn bind_pattern(pattern: &Pattern, value: JsValue, env: &Environment, mode: BindMode, ctx: &mut Context) -> JsResult<()> {
    match pattern {
        Pattern::Array(array) => bind_array_pattern(array, value, env, mode, ctx),
        Pattern::Object(object) => bind_object_pattern(object, value, env, mode, ctx),
    }
}

fn bind_array_pattern(pattern: &ArrayPattern, value: JsValue, env: &Environment, mode: BindMode, ctx: &mut Context) -> JsResult<()> {
    let mut record = get_iterator(&value, ctx)?;
    let mut exhausted = false;
    let result: JsResult<()> = (|| {
        for element in &pattern.elements {
            let item = if exhausted {
                JsValue::Undefined
            } else {
                match iterator_step(&mut record, ctx)? {
                    Some(result) => iterator_value(&result, ctx)?,
                    None => {
                        exhausted = true;
                        JsValue::Undefined
                    }
                }
            };
            let Some(element) = element else { continue };
            let mut item = item;
            if item.is_undefined() {
                if let Some(default) = &element.default {
                    item = evaluate_expression(default, ctx)?;
                }
            }
            bind_binding(&element.binding, item, env, mode, ctx)?;
        }
        if let Some(rest) = &pattern.rest {
            let mut collected = Vec::new();
            if !exhausted {
                while let Some(result) = iterator_step(&mut record, ctx)? {
                    collected.push(iterator_value(&result, ctx)?);
                }
            }
            let rest_array = JsValue::Object(array_from_values(&collected, ctx));
            bind_binding(rest, rest_array, env, mode, ctx)?;
        }
        Ok(())
    })();
    if !exhausted && !record.done {
        let _ = iterator_close(&record, Ok(JsValue::Undefined), ctx);
    }
    result
}

fn bind_object_pattern(pattern: &ObjectPattern, value: JsValue, env: &Environment, mode: BindMode, ctx: &mut Context) -> JsResult<()> {
    if value.is_null_or_undefined() {
        return Err(ctx.throw_native(NativeError::typ("cannot destructure null or undefined")));
    }
    let mut used_keys = Vec::new();
    for prop in &pattern.properties {
        let key = evaluate_property_key(&prop.key, ctx)?;
        used_keys.push(key.clone());
        let mut item = get_property_value(&value, &key, ctx)?;
        if item.is_undefined() {
            if let Some(default) = &prop.default {
                item = evaluate_expression(default, ctx)?;
            }
        }
        bind_binding(&prop.value, item, env, mode, ctx)?;
    }
    if let Some(rest) = &pattern.rest {
        let source = to_object(&value, ctx)?;
        let proto = ctx.realm().intrinsics.object_prototype.clone();
        let rest_obj = JsObject::new(Some(proto), ObjectKind::Ordinary);
        for key in source.own_property_keys()? {
            if used_keys.contains(&key) {
                continue;
            }
            if let Some(desc) = source.get_own_property(&key)? {
                if desc.enumerable() {
                    let v = source.get(&key, &JsValue::Object(source.clone()), ctx)?;
                    rest_obj.define_own_property(key, PropertyDescriptor::data(v, true, true, true))?;
                }
            }
        }
        bind_binding(rest, JsValue::Object(rest_obj), env, mode, ctx)?;
    }
    Ok(())
}

fn get_property_value(value: &JsValue, key: &PropertyKey, ctx: &mut Context) -> JsResult<JsValue> {
    match value {
        JsValue::Object(o) => o.get(key, value, ctx),
        _ => {
            let obj = to_object(value, ctx)?;
            obj.get(key, value, ctx)
        }
    }
}

/// Also used for `for (x of/in ...)` into an existing binding/member
/// target, which the AST represents as `ForBinding::Pattern(Expression)`
/// rather than a `Binding` (the target may be a member expression).
pub fn assign_to_expression_target(target: &Expression, value: JsValue, ctx: &mut Context) -> JsResult<()> {
    evaluate_reference(target, ctx)?.put_value(value, ctx)
}
