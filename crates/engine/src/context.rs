//! `Context`: the embedder-facing handle.
//!
//! This model separates Agent (process-wide job queue and feature set)
//! from Realm (per-evaluation intrinsics and global). This engine
//! targets exactly one realm per embedding, so `Context` bundles both
//! behind a single type rather than making callers thread an `&Agent`
//! and an `&Realm` through every abstract operation separately — an
//! Open Question resolution recorded in DESIGN.md.

use crate::agent::{Agent, FeatureSet};
use crate::environment::Environment;
use crate::error::{JsError, NativeError};
use crate::execution_context::ExecutionContext;
use crate::job::{Job, JobQueue};
use crate::module::{HostModuleLoader, ModuleId, ModuleRecord};
use crate::object::JsObject;
use crate::property::{PropertyDescriptor, PropertyKey};
use crate::realm::Realm;
use crate::value::{JsValue, WellKnownSymbols};
use std::cell::RefCell;
use std::rc::Rc;
use vesper_interner::{Interner, Sym};

pub struct Context {
    agent: Agent,
    realm: Realm,
    interner: Interner,
    contexts: Vec<ExecutionContext>,
    jobs: JobQueue,
    /// One buffer per generator body currently being eagerly evaluated
    /// (nested when a generator calls another generator) — `yield`
    /// pushes onto whichever buffer is innermost (see
    /// `evaluator::generator`).
    generator_buffers: Vec<Rc<RefCell<Vec<JsValue>>>>,
    /// Every module reached so far, indexed by `ModuleId`. Lives for
    /// the whole `Context`, the same way `contexts` does — see
    /// `vesper_engine::module`'s module-level doc comment.
    pub(crate) modules: Vec<ModuleRecord>,
    /// Maps a host loader's resolved cache key to the module already
    /// registered under it, so two import sites resolving to the same
    /// file share one `ModuleRecord`.
    pub(crate) module_cache: hashbrown::HashMap<String, ModuleId>,
    pub(crate) module_loader: Option<Box<dyn HostModuleLoader>>,
}

impl Context {
    pub fn new() -> Self {
        Self::with_features(FeatureSet::empty())
    }

    pub fn with_features(features: FeatureSet) -> Self {
        let realm = Realm::new();
        let global_env = realm.global_env.clone();
        let mut ctx = Self {
            agent: Agent::new(features),
            realm,
            interner: Interner::new(),
            contexts: Vec::new(),
            jobs: JobQueue::default(),
            generator_buffers: Vec::new(),
            modules: Vec::new(),
            module_cache: hashbrown::HashMap::new(),
            module_loader: None,
        };
        ctx.contexts.push(ExecutionContext::new_script(global_env, false));
        ctx
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    pub fn realm(&self) -> &Realm {
        &self.realm
    }

    pub fn realm_mut(&mut self) -> &mut Realm {
        &mut self.realm
    }

    pub fn well_known_symbols(&self) -> &WellKnownSymbols {
        &self.realm.intrinsics.well_known_symbols
    }

    pub fn global_object(&self) -> JsObject {
        self.realm.global_object.clone()
    }

    pub fn global_env(&self) -> Environment {
        self.realm.global_env.clone()
    }

    // ---- identifier interning ----

    pub fn intern(&mut self, s: &str) -> Sym {
        self.interner.get_or_intern(s)
    }

    pub fn resolve(&self, sym: Sym) -> &str {
        self.interner.resolve(sym)
    }

    /// Exposed for `vesper_parser`, which interns identifiers straight
    /// into this context's table as it lexes so the evaluator never has
    /// to re-resolve a `Sym` back through a different interner.
    pub fn interner_mut(&mut self) -> &mut Interner {
        &mut self.interner
    }

    // ---- execution context stack ----

    pub fn push_context(&mut self, ctx: ExecutionContext) {
        self.contexts.push(ctx);
    }

    pub fn pop_context(&mut self) -> ExecutionContext {
        self.contexts
            .pop()
            .expect("execution context stack must never underflow")
    }

    pub fn running_context(&self) -> &ExecutionContext {
        self.contexts
            .last()
            .expect("there is always at least the top-level script context")
    }

    pub fn running_context_mut(&mut self) -> &mut ExecutionContext {
        self.contexts
            .last_mut()
            .expect("there is always at least the top-level script context")
    }

    pub fn lexical_environment(&self) -> Environment {
        self.running_context().lexical_env.clone()
    }

    pub fn variable_environment(&self) -> Environment {
        self.running_context().variable_env.clone()
    }

    pub fn set_lexical_environment(&mut self, env: Environment) {
        self.running_context_mut().lexical_env = env;
    }

    pub fn set_variable_environment(&mut self, env: Environment) {
        self.running_context_mut().variable_env = env;
    }

    pub fn is_strict(&self) -> bool {
        self.running_context().strict
    }

    // ---- job queue ----

    pub fn enqueue_job(&mut self, job: Job) {
        self.jobs.enqueue(job);
    }

    /// `RunJobs`: drains the job queue to completion, in FIFO order,
    /// each under a fresh execution context over this realm. A job
    /// that enqueues further jobs (a `.then` chain) keeps the loop
    /// going until the queue is genuinely empty.
    pub fn run_jobs(&mut self) -> Result<(), JsError> {
        while let Some(job) = self.jobs.pop() {
            crate::builtins::promise::run_job(job, self)?;
        }
        Ok(())
    }

    pub fn jobs_pending(&self) -> bool {
        !self.jobs.is_empty()
    }

    // ---- generator yield buffering (see `evaluator::generator`) ----

    pub(crate) fn push_generator_buffer(&mut self) -> Rc<RefCell<Vec<JsValue>>> {
        let buf = Rc::new(RefCell::new(Vec::new()));
        self.generator_buffers.push(buf.clone());
        buf
    }

    pub(crate) fn pop_generator_buffer(&mut self) {
        self.generator_buffers.pop();
    }

    pub(crate) fn current_generator_buffer(&self) -> Option<Rc<RefCell<Vec<JsValue>>>> {
        self.generator_buffers.last().cloned()
    }

    // ---- module loader ----

    /// Installs the embedder's `HostModuleLoader`, consulted by every
    /// `import`/`export ... from` this context ever resolves.
    pub fn set_module_loader(&mut self, loader: Box<dyn HostModuleLoader>) {
        self.module_loader = Some(loader);
    }

    /// Registers `source` as a module under `key` without going through
    /// the host loader — the entry point for a program the embedder
    /// itself is asked to run as a module; modules `source` imports
    /// still resolve through the installed loader.
    pub fn create_source_text_module(&mut self, key: impl Into<String>, source: &str) -> Result<ModuleId, JsError> {
        crate::module::create_source_text_module(self, key.into(), source)
    }

    /// `Link`: creates every reachable module's environment. Must run
    /// before `evaluate_module`.
    pub fn link_module(&mut self, id: ModuleId) -> Result<(), JsError> {
        crate::module::link(self, id)
    }

    /// `Evaluate`: runs `id`'s body (and, transitively, every module it
    /// depends on that hasn't already evaluated). Returns the
    /// evaluation-result Promise, always already settled.
    pub fn evaluate_module(&mut self, id: ModuleId) -> JsValue {
        crate::module::evaluate(self, id)
    }

    /// The module namespace object for `id`, as `import * as ns` or a
    /// dynamic `import()` would observe it.
    pub fn module_namespace(&mut self, id: ModuleId) -> Result<JsObject, JsError> {
        crate::module::module_namespace(self, id)
    }

    // ---- error construction ----

    /// Builds and returns (without throwing in the Rust sense — the
    /// caller wraps it in `Err`) the `JsError` for a native error of
    /// the given kind, with the matching prototype from this realm's
    /// intrinsics.
    pub fn throw_native(&mut self, err: NativeError) -> JsError {
        let proto = match err.kind {
            crate::error::NativeErrorKind::Error => self.realm.intrinsics.error_prototype.clone(),
            crate::error::NativeErrorKind::Type => self.realm.intrinsics.type_error_prototype.clone(),
            crate::error::NativeErrorKind::Range => self.realm.intrinsics.range_error_prototype.clone(),
            crate::error::NativeErrorKind::Reference => self.realm.intrinsics.reference_error_prototype.clone(),
            crate::error::NativeErrorKind::Syntax => self.realm.intrinsics.syntax_error_prototype.clone(),
            crate::error::NativeErrorKind::Eval => self.realm.intrinsics.eval_error_prototype.clone(),
            crate::error::NativeErrorKind::Uri => self.realm.intrinsics.uri_error_prototype.clone(),
        };
        let obj = JsObject::new(Some(proto), crate::object::ObjectKind::Error);
        obj.data_mut().properties.insert(
            PropertyKey::from("message"),
            PropertyDescriptor::data(JsValue::from(err.message), true, false, true),
        );
        JsError::from_value(JsValue::Object(obj))
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
