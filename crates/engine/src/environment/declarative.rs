//! The binding table shared by every non-object-backed environment
//! record kind: a map from identifier to binding state,
//! where an uninitialised `let`/`const` binding is present in the map
//! but has no value yet — the temporal dead zone.

use crate::context::Context;
use crate::error::{JsResult, NativeError};
use crate::value::JsValue;
use hashbrown::HashMap;
use vesper_gc::{Finalize, Trace};
use vesper_interner::Sym;

struct Binding {
    value: Option<JsValue>,
    mutable: bool,
    /// Deletable only applies to `var`-created bindings in a
    /// declarative/global environment (`CreateMutableBinding`'s `D`
    /// parameter); `let`/`const`/function bindings are never deletable.
    deletable: bool,
}

#[derive(Default)]
pub struct Bindings(HashMap<Sym, Binding>);

impl Bindings {
    pub fn has(&self, name: Sym) -> bool {
        self.0.contains_key(&name)
    }

    pub fn create_mutable(&mut self, name: Sym, deletable: bool) {
        self.0.insert(
            name,
            Binding {
                value: None,
                mutable: true,
                deletable,
            },
        );
    }

    pub fn create_immutable(&mut self, name: Sym, _strict: bool) {
        self.0.insert(
            name,
            Binding {
                value: None,
                mutable: false,
                deletable: false,
            },
        );
    }

    pub fn initialize(&mut self, name: Sym, value: JsValue) {
        if let Some(binding) = self.0.get_mut(&name) {
            binding.value = Some(value);
        }
    }

    pub fn set_mutable(&mut self, name: Sym, value: JsValue, strict: bool, ctx: &mut Context) -> JsResult<()> {
        let Some(binding) = self.0.get_mut(&name) else {
            if strict {
                return Err(ctx.throw_native(NativeError::reference("assignment to an undeclared variable")));
            }
            self.0.insert(
                name,
                Binding {
                    value: Some(value),
                    mutable: true,
                    deletable: true,
                },
            );
            return Ok(());
        };
        if binding.value.is_none() {
            return Err(ctx.throw_native(NativeError::reference(
                "cannot access binding before initialization",
            )));
        }
        if !binding.mutable {
            if strict {
                return Err(ctx.throw_native(NativeError::typ("assignment to constant variable")));
            }
            return Ok(());
        }
        binding.value = Some(value);
        Ok(())
    }

    pub fn get(&self, name: Sym, ctx: &mut Context) -> JsResult<JsValue> {
        let Some(binding) = self.0.get(&name) else {
            return Err(crate::environment::reference_error("binding", ctx));
        };
        match &binding.value {
            Some(v) => Ok(v.clone()),
            None => Err(ctx.throw_native(NativeError::reference(
                "cannot access binding before initialization",
            ))),
        }
    }

    pub fn delete(&mut self, name: Sym) -> bool {
        match self.0.get(&name) {
            Some(b) if b.deletable => {
                self.0.remove(&name);
                true
            }
            Some(_) => false,
            None => true,
        }
    }
}

impl Finalize for Bindings {
    fn finalize(&self) {
        for b in self.0.values() {
            b.value.finalize();
        }
    }
}
unsafe impl Trace for Bindings {
    fn trace(&self) {
        for b in self.0.values() {
            b.value.trace();
        }
    }
}
