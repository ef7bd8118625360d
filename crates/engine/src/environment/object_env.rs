//! Object environment records: bindings backed by an
//! object's own properties — used for `with` statements and as the
//! object half of the Global environment.

use super::Environment;
use crate::context::Context;
use crate::error::{JsResult, NativeError};
use crate::object::JsObject;
use crate::property::PropertyDescriptor;
use crate::value::JsValue;
use vesper_gc::{Finalize, Trace};
use vesper_interner::Sym;

#[derive(Clone)]
pub struct ObjectEnvironmentData {
    pub binding_object: JsObject,
    /// `with`-base objects participate in unqualified-identifier
    /// lookup (`WithBaseObject` returns `Some`); the global environment's
    /// object component does not.
    pub is_with_environment: bool,
}

impl ObjectEnvironmentData {
    fn key(ctx: &Context, name: Sym) -> crate::property::PropertyKey {
        crate::property::PropertyKey::String(ctx.resolve(name).into())
    }

    pub fn has_binding(&self, name: Sym, ctx: &mut Context) -> JsResult<bool> {
        let key = Self::key(ctx, name);
        if !self.binding_object.has_property(&key)? {
            return Ok(false);
        }
        if !self.is_with_environment {
            return Ok(true);
        }
        // `with` environments hide a binding shadowed by `@@unscopables`.
        let unscopables_key = crate::property::PropertyKey::Symbol(ctx.well_known_symbols().unscopables.clone());
        let unscopables = self
            .binding_object
            .get(&unscopables_key, &JsValue::Object(self.binding_object.clone()), ctx)?;
        if let JsValue::Object(u) = unscopables {
            let blocked = u.get(&key, &JsValue::Object(u.clone()), ctx)?.to_boolean();
            if blocked {
                return Ok(false);
            }
        }
        Ok(true)
    }

    pub fn create_mutable_binding(&self, name: Sym, deletable: bool, ctx: &mut Context) -> JsResult<()> {
        let key = Self::key(ctx, name);
        self.binding_object
            .define_own_property(key, PropertyDescriptor::data(JsValue::Undefined, true, true, deletable))?;
        Ok(())
    }

    pub fn set_mutable_binding(&self, name: Sym, value: JsValue, strict: bool, ctx: &mut Context) -> JsResult<()> {
        let key = Self::key(ctx, name);
        let exists = self.binding_object.has_property(&key)?;
        if !exists && strict {
            return Err(ctx.throw_native(NativeError::reference("assignment to an undeclared variable")));
        }
        let receiver = JsValue::Object(self.binding_object.clone());
        let ok = self.binding_object.set(key, value, &receiver, ctx)?;
        if !ok && strict {
            return Err(ctx.throw_native(NativeError::typ("cannot assign to read only property")));
        }
        Ok(())
    }

    pub fn get_binding_value(&self, name: Sym, strict: bool, ctx: &mut Context) -> JsResult<JsValue> {
        let key = Self::key(ctx, name);
        if !self.binding_object.has_property(&key)? {
            if strict {
                return Err(super::reference_error(ctx.resolve(name), ctx));
            }
            return Ok(JsValue::Undefined);
        }
        let receiver = JsValue::Object(self.binding_object.clone());
        self.binding_object.get(&key, &receiver, ctx)
    }

    pub fn with_base_object(&self) -> Option<JsObject> {
        self.is_with_environment.then(|| self.binding_object.clone())
    }
}

impl Finalize for ObjectEnvironmentData {
    fn finalize(&self) {
        self.binding_object.finalize();
    }
}
unsafe impl Trace for ObjectEnvironmentData {
    fn trace(&self) {
        self.binding_object.trace();
    }
}

/// Convenience for constructing a `with`-statement environment.
pub fn with_environment(object: JsObject, outer: Environment) -> Environment {
    Environment::new(
        Some(outer),
        super::EnvironmentKind::Object(ObjectEnvironmentData {
            binding_object: object,
            is_with_environment: true,
        }),
    )
}
