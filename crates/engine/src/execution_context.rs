//! Execution contexts: `{Function, Realm, LexicalEnv,
//! VariableEnv, ScriptOrModule}` plus generator/async continuation
//! slots. The Agent's context stack is a LIFO; the top is the running
//! context.

use crate::environment::Environment;
use crate::object::JsObject;
use vesper_gc::{Finalize, Trace};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ScriptOrModule {
    Script,
    Module(u32),
}

pub struct ExecutionContext {
    /// The function object this context is running, `None` for
    /// top-level script/module code.
    pub function: Option<JsObject>,
    pub lexical_env: Environment,
    pub variable_env: Environment,
    pub script_or_module: ScriptOrModule,
    /// Strict mode is a static property of the running code, threaded
    /// through the context rather than recomputed per statement.
    pub strict: bool,
}

impl ExecutionContext {
    pub fn new_script(env: Environment, strict: bool) -> Self {
        Self {
            function: None,
            lexical_env: env.clone(),
            variable_env: env,
            script_or_module: ScriptOrModule::Script,
            strict,
        }
    }
}

impl Finalize for ExecutionContext {
    fn finalize(&self) {
        self.function.finalize();
        self.lexical_env.finalize();
        self.variable_env.finalize();
    }
}
unsafe impl Trace for ExecutionContext {
    fn trace(&self) {
        self.function.trace();
        self.lexical_env.trace();
        self.variable_env.trace();
    }
}
