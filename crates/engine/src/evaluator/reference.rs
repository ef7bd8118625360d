//! The Reference type: the
//! internal lvalue produced by identifier and member expressions.
//! Never exposed past the evaluator — `GetValue`/`PutValue` are the
//! only way a `Reference` turns into (or receives) a `JsValue`.

use crate::context::Context;
use crate::environment::Environment;
use crate::error::{JsResult, NativeError};
use crate::property::PropertyKey;
use crate::value::JsValue;

pub enum ReferenceBase {
    /// An identifier that resolved to no environment — `GetValue`
    /// throws `ReferenceError`; `PutValue` creates a global property in
    /// sloppy mode (the "unresolvable reference" rule).
    Unresolvable,
    Environment(Environment),
    /// A member reference `obj.prop`/`obj[prop]`: the base value itself
    /// (primitives are valid bases for `[[Get]]`/`[[Set]]`, which
    /// coerce to an object as needed).
    Value(JsValue),
}

pub struct Reference {
    pub base: ReferenceBase,
    pub name: PropertyKey,
    pub strict: bool,
    /// Set for `super.prop` references: `[[Get]]`/`[[Set]]` still
    /// target the home object's prototype, but the receiver passed to
    /// accessors is this value, not the base.
    pub this_value: Option<JsValue>,
}

impl Reference {
    pub fn unresolvable(name: PropertyKey, strict: bool) -> Self {
        Self {
            base: ReferenceBase::Unresolvable,
            name,
            strict,
            this_value: None,
        }
    }

    pub fn environment(env: Environment, name: PropertyKey, strict: bool) -> Self {
        Self {
            base: ReferenceBase::Environment(env),
            name,
            strict,
            this_value: None,
        }
    }

    pub fn property(base: JsValue, name: PropertyKey, strict: bool) -> Self {
        Self {
            base: ReferenceBase::Value(base),
            name,
            strict,
            this_value: None,
        }
    }

    pub fn is_unresolvable(&self) -> bool {
        matches!(self.base, ReferenceBase::Unresolvable)
    }

    /// `GetValue(V)`.
    pub fn get_value(&self, ctx: &mut Context) -> JsResult<JsValue> {
        match &self.base {
            ReferenceBase::Unresolvable => Err(crate::environment::reference_error(&self.name.to_string(), ctx)),
            ReferenceBase::Environment(env) => {
                let PropertyKey::String(s) = &self.name else {
                    unreachable!("identifier references always use a string key")
                };
                let sym = ctx.intern(&s.to_std_string_lossy());
                env.get_binding_value(sym, self.strict, ctx)
            }
            ReferenceBase::Value(base) => {
                let obj = crate::operations::to_object(base, ctx)?;
                let receiver = self.this_value.clone().unwrap_or_else(|| base.clone());
                obj.get(&self.name, &receiver, ctx)
            }
        }
    }

    /// `PutValue(V, W)`.
    pub fn put_value(&self, value: JsValue, ctx: &mut Context) -> JsResult<()> {
        match &self.base {
            ReferenceBase::Unresolvable => {
                if self.strict {
                    return Err(crate::environment::reference_error(&self.name.to_string(), ctx));
                }
                let global = ctx.global_object();
                global.set(self.name.clone(), value, &JsValue::Object(global.clone()), ctx)?;
                Ok(())
            }
            ReferenceBase::Environment(env) => {
                let PropertyKey::String(s) = &self.name else {
                    unreachable!("identifier references always use a string key")
                };
                let sym = ctx.intern(&s.to_std_string_lossy());
                env.set_mutable_binding(sym, value, self.strict, ctx)
            }
            ReferenceBase::Value(base) => {
                let obj = crate::operations::to_object(base, ctx)?;
                let receiver = self.this_value.clone().unwrap_or_else(|| base.clone());
                let ok = obj.set(self.name.clone(), value, &receiver, ctx)?;
                if !ok && self.strict {
                    return Err(ctx.throw_native(NativeError::typ("cannot assign to read only property")));
                }
                Ok(())
            }
        }
    }

    /// `DeletePropertyOrThrow`-adjacent: `delete` only has an effect on
    /// property references; identifier references are not deletable
    /// through `delete x` in strict mode (a `SyntaxError` at parse
    /// time, which this evaluator does not re-validate) and resolve to
    /// the environment's `DeleteBinding` in sloppy mode.
    pub fn delete(&self, ctx: &mut Context) -> JsResult<bool> {
        match &self.base {
            ReferenceBase::Unresolvable => Ok(true),
            ReferenceBase::Environment(env) => {
                let PropertyKey::String(s) = &self.name else {
                    unreachable!()
                };
                let sym = ctx.intern(&s.to_std_string_lossy());
                env.delete_binding(sym)
            }
            ReferenceBase::Value(base) => {
                let obj = crate::operations::to_object(base, ctx)?;
                let ok = obj.delete(&self.name)?;
                if !ok && self.strict {
                    return Err(ctx.throw_native(NativeError::typ("cannot delete non-configurable property")));
                }
                Ok(ok)
            }
        }
    }
}
