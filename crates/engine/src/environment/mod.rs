//! Environment records and the lexical-scope chain.
//!
//! Every variant provides the same operation set
//! (`HasBinding`/`CreateMutableBinding`/...); rather than five structs
//! each re-implementing binding storage, the common declarative
//! binding table lives in [`declarative::Bindings`] and the
//! Function/Global/Module variants compose it — Global, for instance,
//! is an object env plus a declarative env plus a varnames set.

pub mod declarative;
pub mod function;
pub mod global;
pub mod module;
pub mod object_env;

pub use declarative::Bindings;
pub use function::FunctionEnvironmentData;
pub use global::GlobalEnvironmentData;
pub use module::ModuleEnvironmentData;
pub use object_env::ObjectEnvironmentData;

use crate::context::Context;
use crate::error::{JsResult, NativeError};
use crate::value::JsValue;
use vesper_gc::{Finalize, Gc, GcRefCell, Trace};
use vesper_interner::Sym;

pub enum EnvironmentKind {
    Declarative(Bindings),
    Object(ObjectEnvironmentData),
    Function(FunctionEnvironmentData),
    Global(GlobalEnvironmentData),
    Module(ModuleEnvironmentData),
}

pub struct EnvironmentRecord {
    pub outer: Option<Environment>,
    pub kind: EnvironmentKind,
}

impl Finalize for EnvironmentRecord {
    fn finalize(&self) {
        self.outer.finalize();
        self.kind.finalize();
    }
}
unsafe impl Trace for EnvironmentRecord {
    fn trace(&self) {
        self.outer.trace();
        self.kind.trace();
    }
}

impl Finalize for EnvironmentKind {}
unsafe impl Trace for EnvironmentKind {
    fn trace(&self) {
        match self {
            EnvironmentKind::Declarative(b) => b.trace(),
            EnvironmentKind::Object(o) => o.trace(),
            EnvironmentKind::Function(f) => f.trace(),
            EnvironmentKind::Global(g) => g.trace(),
            EnvironmentKind::Module(m) => m.trace(),
        }
    }
}

/// A handle into the environment chain (environment records form a
/// chain via `OuterEnv`). Cloning is cheap; closures capturing an
/// environment extend its lifetime simply by holding a clone.
#[derive(Clone)]
pub struct Environment(Gc<GcRefCell<EnvironmentRecord>>);

impl Environment {
    pub fn new(outer: Option<Environment>, kind: EnvironmentKind) -> Self {
        Environment(Gc::new(GcRefCell::new(EnvironmentRecord { outer, kind })))
    }

    pub fn declarative(outer: Option<Environment>) -> Self {
        Self::new(outer, EnvironmentKind::Declarative(Bindings::default()))
    }

    /// A fresh module environment, created eagerly at the start of
    /// linking so cyclic imports can capture a handle to it before its
    /// bindings are populated (see `vesper_engine::module`).
    pub fn module(outer: Option<Environment>) -> Self {
        Self::new(
            outer,
            EnvironmentKind::Module(ModuleEnvironmentData {
                bindings: Bindings::default(),
                indirect: hashbrown::HashMap::new(),
            }),
        )
    }

    /// Wires `local` in this (module) environment to alias
    /// `target_env`'s `target_name` binding, the `ResolveExport`
    /// indirection a named/default `import` produces.
    ///
    /// # Panics
    /// Panics if `self` is not a module environment.
    pub fn create_import_binding(&self, local: Sym, target_env: Environment, target_name: Sym) {
        let mut rec = self.0.borrow_mut();
        let EnvironmentKind::Module(m) = &mut rec.kind else {
            panic!("create_import_binding called on a non-module environment");
        };
        m.indirect.insert(local, (target_env, target_name));
    }

    pub fn outer(&self) -> Option<Environment> {
        self.0.borrow().outer.clone()
    }

    /// Direct access to the underlying record, for callers (the realm's
    /// global-environment accessor) that need to match on `kind` rather
    /// than go through a binding operation.
    pub fn inner_borrow(&self) -> std::cell::Ref<'_, EnvironmentRecord> {
        self.0.borrow()
    }

    pub fn has_binding(&self, name: Sym, ctx: &mut Context) -> JsResult<bool> {
        match &self.0.borrow().kind {
            EnvironmentKind::Declarative(b) => Ok(b.has(name)),
            EnvironmentKind::Function(f) => Ok(f.bindings.has(name)),
            EnvironmentKind::Module(m) => Ok(m.bindings.has(name) || m.indirect.contains_key(&name)),
            EnvironmentKind::Global(g) => {
                if g.declarative.has(name) {
                    return Ok(true);
                }
                g.object.has_binding(name, ctx)
            }
            EnvironmentKind::Object(o) => o.has_binding(name, ctx),
        }
    }

    pub fn create_mutable_binding(&self, name: Sym, deletable: bool, ctx: &mut Context) -> JsResult<()> {
        let object_env = {
            let mut rec = self.0.borrow_mut();
            match &mut rec.kind {
                EnvironmentKind::Declarative(b) => {
                    b.create_mutable(name, deletable);
                    None
                }
                EnvironmentKind::Function(f) => {
                    f.bindings.create_mutable(name, deletable);
                    None
                }
                EnvironmentKind::Module(m) => {
                    m.bindings.create_mutable(name, deletable);
                    None
                }
                EnvironmentKind::Global(g) => {
                    g.var_names.borrow_mut().insert(name);
                    g.declarative.create_mutable(name, deletable);
                    None
                }
                EnvironmentKind::Object(o) => Some(o.clone()),
            }
        };
        if let Some(o) = object_env {
            o.create_mutable_binding(name, deletable, ctx)?;
        }
        Ok(())
    }

    pub fn create_immutable_binding(&self, name: Sym, strict: bool) -> JsResult<()> {
        match &mut self.0.borrow_mut().kind {
            EnvironmentKind::Declarative(b) => b.create_immutable(name, strict),
            EnvironmentKind::Function(f) => f.bindings.create_immutable(name, strict),
            EnvironmentKind::Module(m) => m.bindings.create_immutable(name, strict),
            EnvironmentKind::Global(g) => g.declarative.create_immutable(name, strict),
            EnvironmentKind::Object(_) => {}
        }
        Ok(())
    }

    pub fn initialize_binding(&self, name: Sym, value: JsValue, ctx: &mut Context) -> JsResult<()> {
        match &mut self.0.borrow_mut().kind {
            EnvironmentKind::Declarative(b) => {
                b.initialize(name, value);
                return Ok(());
            }
            EnvironmentKind::Function(f) => {
                f.bindings.initialize(name, value);
                return Ok(());
            }
            EnvironmentKind::Module(m) => {
                m.bindings.initialize(name, value);
                return Ok(());
            }
            EnvironmentKind::Global(g) => {
                g.declarative.initialize(name, value);
                return Ok(());
            }
            EnvironmentKind::Object(_) => {}
        };
        self.set_mutable_binding(name, value, false, ctx)
    }

    pub fn set_mutable_binding(&self, name: Sym, value: JsValue, strict: bool, ctx: &mut Context) -> JsResult<()> {
        enum Action {
            Declarative,
            ObjectEnv,
            GlobalDecl,
            GlobalObject,
        }
        let action = match &self.0.borrow().kind {
            EnvironmentKind::Declarative(_) | EnvironmentKind::Function(_) | EnvironmentKind::Module(_) => {
                Action::Declarative
            }
            EnvironmentKind::Global(g) => {
                if g.declarative.has(name) {
                    Action::GlobalDecl
                } else {
                    Action::GlobalObject
                }
            }
            EnvironmentKind::Object(_) => Action::ObjectEnv,
        };
        match action {
            Action::Declarative => {
                let mut rec = self.0.borrow_mut();
                let bindings = match &mut rec.kind {
                    EnvironmentKind::Declarative(b) => b,
                    EnvironmentKind::Function(f) => &mut f.bindings,
                    EnvironmentKind::Module(m) => &mut m.bindings,
                    _ => unreachable!(),
                };
                bindings.set_mutable(name, value, strict, ctx)
            }
            Action::GlobalDecl => {
                let mut rec = self.0.borrow_mut();
                let EnvironmentKind::Global(g) = &mut rec.kind else {
                    unreachable!()
                };
                g.declarative.set_mutable(name, value, strict, ctx)
            }
            Action::GlobalObject => {
                let obj_env = { let rec = self.0.borrow(); let EnvironmentKind::Global(g) = &rec.kind else { unreachable!() }; g.object.clone() };
                obj_env.set_mutable_binding(name, value, strict, ctx)
            }
            Action::ObjectEnv => {
                let obj_env = { let rec = self.0.borrow(); let EnvironmentKind::Object(o) = &rec.kind else { unreachable!() }; o.clone() };
                obj_env.set_mutable_binding(name, value, strict, ctx)
            }
        }
    }

    pub fn get_binding_value(&self, name: Sym, strict: bool, ctx: &mut Context) -> JsResult<JsValue> {
        enum Action {
            Declarative,
            ModuleIndirect,
            GlobalDecl,
            GlobalObject,
            ObjectEnv,
        }
        let action = match &self.0.borrow().kind {
            EnvironmentKind::Declarative(_) | EnvironmentKind::Function(_) => Action::Declarative,
            EnvironmentKind::Module(m) => {
                if m.bindings.has(name) {
                    Action::Declarative
                } else {
                    Action::ModuleIndirect
                }
            }
            EnvironmentKind::Global(g) => {
                if g.declarative.has(name) {
                    Action::GlobalDecl
                } else {
                    Action::GlobalObject
                }
            }
            EnvironmentKind::Object(_) => Action::ObjectEnv,
        };
        match action {
            Action::Declarative => {
                let rec = self.0.borrow();
                let bindings = match &rec.kind {
                    EnvironmentKind::Declarative(b) => b,
                    EnvironmentKind::Function(f) => &f.bindings,
                    EnvironmentKind::Module(m) => &m.bindings,
                    _ => unreachable!(),
                };
                bindings.get(name, ctx)
            }
            Action::ModuleIndirect => {
                let (target_env, target_name) = {
                    let rec = self.0.borrow();
                    let EnvironmentKind::Module(m) = &rec.kind else { unreachable!() };
                    m.indirect.get(&name).cloned().expect("checked by has_binding")
                };
                target_env.get_binding_value_for_indirection(target_name, ctx)
            }
            Action::GlobalDecl => {
                let rec = self.0.borrow();
                let EnvironmentKind::Global(g) = &rec.kind else { unreachable!() };
                g.declarative.get(name, ctx)
            }
            Action::GlobalObject => {
                let obj_env = { let rec = self.0.borrow(); let EnvironmentKind::Global(g) = &rec.kind else { unreachable!() }; g.object.clone() };
                obj_env.get_binding_value(name, strict, ctx)
            }
            Action::ObjectEnv => {
                let obj_env = { let rec = self.0.borrow(); let EnvironmentKind::Object(o) = &rec.kind else { unreachable!() }; o.clone() };
                obj_env.get_binding_value(name, strict, ctx)
            }
        }
    }

    /// Module import-binding indirection throws `ReferenceError` if the
    /// exporting module's binding is itself still uninitialised (TDZ).
    fn get_binding_value_for_indirection(&self, name: Sym, ctx: &mut Context) -> JsResult<JsValue> {
        self.get_binding_value(name, true, ctx)
    }

    pub fn delete_binding(&self, name: Sym) -> JsResult<bool> {
        let mut rec = self.0.borrow_mut();
        Ok(match &mut rec.kind {
            EnvironmentKind::Declarative(b) => b.delete(name),
            EnvironmentKind::Function(f) => f.bindings.delete(name),
            EnvironmentKind::Module(_) => false,
            EnvironmentKind::Global(g) => {
                let deleted = g.declarative.delete(name);
                if deleted {
                    g.var_names.borrow_mut().shift_remove(&name);
                }
                deleted
            }
            EnvironmentKind::Object(_) => true,
        })
    }

    pub fn has_this_binding(&self) -> bool {
        matches!(
            &self.0.borrow().kind,
            EnvironmentKind::Function(f) if f.has_this_binding()
        ) || matches!(&self.0.borrow().kind, EnvironmentKind::Global(_))
            || matches!(&self.0.borrow().kind, EnvironmentKind::Module(_))
    }

    pub fn has_super_binding(&self) -> bool {
        matches!(&self.0.borrow().kind, EnvironmentKind::Function(f) if f.home_object.is_some())
    }

    /// `GetThisEnvironment`: walk outward until a `this`-binding
    /// environment is found.
    pub fn get_this_environment(&self) -> Environment {
        let mut env = self.clone();
        loop {
            if env.has_this_binding() {
                return env;
            }
            env = env.outer().expect("global environment always has a this-binding");
        }
    }

    pub fn get_this_binding(&self, ctx: &mut Context) -> JsResult<JsValue> {
        let this_env = self.get_this_environment();
        let rec = this_env.0.borrow();
        match &rec.kind {
            EnvironmentKind::Function(f) => f.this_value(ctx),
            EnvironmentKind::Global(g) => Ok(JsValue::Object(g.global_this.clone())),
            EnvironmentKind::Module(_) => Ok(JsValue::Undefined),
            _ => unreachable!(),
        }
    }

    /// `BindThisValue`, run once per call by `OrdinaryCallBindThis`.
    pub fn bind_this_value(&self, value: JsValue) -> JsResult<()> {
        let mut rec = self.0.borrow_mut();
        let EnvironmentKind::Function(f) = &mut rec.kind else {
            return Err(crate::error::JsError::from_value(JsValue::from(
                "BindThisValue called on a non-function environment",
            )));
        };
        f.bind_this(value)
    }

    pub fn set_new_target(&self, value: Option<JsValue>) {
        let mut rec = self.0.borrow_mut();
        if let EnvironmentKind::Function(f) = &mut rec.kind {
            f.new_target = value;
        }
    }

    pub fn get_new_target(&self) -> JsValue {
        let env = self.get_this_environment();
        let rec = env.0.borrow();
        if let EnvironmentKind::Function(f) = &rec.kind {
            return f.new_target.clone().unwrap_or(JsValue::Undefined);
        }
        JsValue::Undefined
    }

    pub fn get_super_base(&self) -> Option<JsValue> {
        let mut env = self.clone();
        loop {
            let rec = env.0.borrow();
            if let EnvironmentKind::Function(f) = &rec.kind {
                if let Some(home) = &f.home_object {
                    return home.get_prototype_of().ok().flatten().map(JsValue::Object);
                }
            }
            drop(rec);
            env = env.outer()?;
        }
    }
}

impl Finalize for Environment {}
unsafe impl Trace for Environment {
    fn trace(&self) {
        self.0.trace();
    }
}

/// `ThrowReferenceError`, the shared helper every unresolved-binding or
/// TDZ-access path routes through.
pub fn reference_error(name: &str, ctx: &mut Context) -> crate::error::JsError {
    ctx.throw_native(NativeError::reference(format!("{name} is not defined")))
}
