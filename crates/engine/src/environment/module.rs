//! Module environment records: a declarative
//! environment for local bindings plus indirect import bindings that
//! alias another module's export binding.

use super::{Bindings, Environment};
use hashbrown::HashMap;
use vesper_gc::{Finalize, Trace};
use vesper_interner::Sym;

pub struct ModuleEnvironmentData {
    pub bindings: Bindings,
    /// `import { x } from "mod"` resolves to `(mod's environment, x)`;
    /// `GetBindingValue` on one of these forwards to the target
    /// environment, which throws `ReferenceError` itself if `x` is
    /// still in its TDZ.
    pub indirect: HashMap<Sym, (Environment, Sym)>,
}

impl Finalize for ModuleEnvironmentData {
    fn finalize(&self) {
        self.bindings.finalize();
        for (env, _) in self.indirect.values() {
            env.finalize();
        }
    }
}
unsafe impl Trace for ModuleEnvironmentData {
    fn trace(&self) {
        self.bindings.trace();
        for (env, _) in self.indirect.values() {
            env.trace();
        }
    }
}
