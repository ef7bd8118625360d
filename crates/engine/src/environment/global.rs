//! The Global environment record: a composite of a
//! declarative environment (for `let`/`const`/class at top level) and
//! an object environment wrapping the global object (for `var`/
//! function declarations, so they show up as configurable-false
//! properties of `globalThis`), plus the set of declared var names.

use super::{Bindings, ObjectEnvironmentData};
use crate::object::JsObject;
use indexmap::IndexSet;
use std::cell::RefCell;
use vesper_gc::{Finalize, Trace};
use vesper_interner::Sym;

pub struct GlobalEnvironmentData {
    pub declarative: Bindings,
    pub object: ObjectEnvironmentData,
    /// Plain `RefCell`, not `GcRefCell`: `Sym`s are interner handles,
    /// not `Gc` pointers, so this set never needs tracing.
    pub var_names: RefCell<IndexSet<Sym>>,
    pub global_this: JsObject,
}

impl GlobalEnvironmentData {
    pub fn new(global_object: JsObject) -> Self {
        Self {
            declarative: Bindings::default(),
            object: ObjectEnvironmentData {
                binding_object: global_object.clone(),
                is_with_environment: false,
            },
            var_names: RefCell::new(IndexSet::new()),
            global_this: global_object,
        }
    }
}

impl Finalize for GlobalEnvironmentData {
    fn finalize(&self) {
        self.declarative.finalize();
        self.object.finalize();
        self.global_this.finalize();
    }
}
unsafe impl Trace for GlobalEnvironmentData {
    fn trace(&self) {
        self.declarative.trace();
        self.object.trace();
        self.global_this.trace();
    }
}
