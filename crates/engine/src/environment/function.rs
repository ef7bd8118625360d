//! Function environment records: a declarative
//! environment plus `this`-binding state, `new.target`, and an optional
//! `HomeObject` for `super`.

use super::Bindings;
use crate::context::Context;
use crate::error::JsResult;
use crate::object::JsObject;
use crate::value::JsValue;
use vesper_gc::{Finalize, Trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThisBindingStatus {
    /// Arrow functions: no `this`-binding of their own at all.
    Lexical,
    /// Derived-class constructor before `super()` has run: TDZ on `this`.
    Uninitialized,
    Initialized,
}

pub struct FunctionEnvironmentData {
    pub bindings: Bindings,
    pub this_value: Option<JsValue>,
    pub this_status: ThisBindingStatus,
    pub new_target: Option<JsValue>,
    pub home_object: Option<JsObject>,
    pub function: Option<JsObject>,
}

impl FunctionEnvironmentData {
    pub fn has_this_binding(&self) -> bool {
        self.this_status != ThisBindingStatus::Lexical
    }

    pub fn this_value(&self, ctx: &mut Context) -> JsResult<JsValue> {
        match self.this_status {
            ThisBindingStatus::Lexical => unreachable!("arrow functions delegate to an outer this-environment"),
            ThisBindingStatus::Uninitialized => Err(ctx.throw_native(crate::error::NativeError::reference(
                "must call super constructor before accessing 'this'",
            ))),
            ThisBindingStatus::Initialized => Ok(self.this_value.clone().unwrap_or(JsValue::Undefined)),
        }
    }

    pub fn bind_this(&mut self, value: JsValue) -> JsResult<()> {
        self.this_value = Some(value);
        self.this_status = ThisBindingStatus::Initialized;
        Ok(())
    }
}

impl Finalize for FunctionEnvironmentData {
    fn finalize(&self) {
        self.bindings.finalize();
        self.this_value.finalize();
        self.new_target.finalize();
        self.home_object.finalize();
        self.function.finalize();
    }
}
unsafe impl Trace for FunctionEnvironmentData {
    fn trace(&self) {
        self.bindings.trace();
        self.this_value.trace();
        self.new_target.trace();
        self.home_object.trace();
        self.function.trace();
    }
}
