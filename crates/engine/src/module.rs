//! The module loader: static import/export analysis, the
//! Tarjan-SCC-based `Link`/`Evaluate` traversal of a module's
//! dependency graph, `ResolveExport`, module namespace objects, and
//! dynamic `import()`.
//!
//! A `ModuleRecord` is plain data owned by `Context.modules` — it holds
//! `Environment`/`JsObject` handles directly as fields rather than
//! behind a `Gc`, the same way `Context.contexts: Vec<ExecutionContext>`
//! already does; those handles stay rooted for as long as the
//! `Context` (and hence the `Vec`) is alive.

use crate::context::Context;
use crate::environment::Environment;
use crate::error::{EngineError, JsError, JsResult, NativeError};
use crate::object::{JsObject, NativeClosureData, ObjectKind, PromiseState};
use crate::property::{PropertyDescriptor, PropertyKey};
use crate::value::JsValue;
use vesper_ast::declaration::{Declaration, ExportDeclaration, ImportSpecifier};
use vesper_ast::{ModuleItem, ModuleItemList, StatementList, StatementListItem};
use vesper_interner::Sym;

/// A stable handle into `Context.modules`. Never reused, even after a
/// module is unreachable, since cyclic graphs keep every participant
/// alive for the `Context`'s whole lifetime anyway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModuleId(pub(crate) u32);

/// A module's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleStatus {
    Unlinked,
    Linking,
    Linked,
    Evaluating,
    Evaluated,
}

/// Which binding an import entry pulls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportName {
    Default,
    Star,
    Name(Sym),
}

#[derive(Debug, Clone)]
pub struct ImportEntry {
    pub module_request: String,
    pub import_name: ImportName,
    pub local_name: Sym,
}

/// `export <decl>` / `export { a as b }`: a name exported from *this*
/// module's own environment.
#[derive(Debug, Clone)]
pub struct LocalExportEntry {
    pub export_name: Sym,
    pub local_name: Sym,
}

/// `export { a as b } from "mod"` / `export * as ns from "mod"`: a name
/// re-exported from another module without ever binding locally.
#[derive(Debug, Clone)]
pub struct IndirectExportEntry {
    pub export_name: Sym,
    pub module_request: String,
    pub import_name: ImportName,
}

/// `export * from "mod"`.
#[derive(Debug, Clone)]
pub struct StarExportEntry {
    pub module_request: String,
}

/// A Source Text Module Record: static import/export
/// entries extracted once at parse time, plus the mutable linking/
/// evaluation state the two traversals update in place.
pub struct ModuleRecord {
    pub specifier: String,
    pub body: ModuleItemList,
    pub requested_modules: Vec<String>,
    pub import_entries: Vec<ImportEntry>,
    pub local_export_entries: Vec<LocalExportEntry>,
    pub indirect_export_entries: Vec<IndirectExportEntry>,
    pub star_export_entries: Vec<StarExportEntry>,
    pub status: ModuleStatus,
    dfs_index: Option<u32>,
    dfs_ancestor_index: Option<u32>,
    /// `None` until `Link` creates it (needed eagerly, before bindings
    /// are populated, so cyclic imports can capture a handle to it).
    pub environment: Option<Environment>,
    pub evaluation_error: Option<JsValue>,
    pub namespace: Option<JsObject>,
}

/// The embedder hook that turns a module specifier into a resolved key
/// and source text (a synchronous host-loader callback, since this
/// engine has no event loop of its own).
pub trait HostModuleLoader {
    /// Resolves `specifier`, as written in an `import`/`export ... from`
    /// naming `referencing_specifier` (`None` for the entry module), to
    /// a `(cache_key, source_text)` pair. The cache key need not equal
    /// `specifier` verbatim (e.g. a relative specifier resolves against
    /// `referencing_specifier`'s directory) — it is what
    /// `Context.module_cache` keys on, so two different specifiers that
    /// resolve to the same file must produce the same key.
    fn resolve(&mut self, referencing_specifier: Option<&str>, specifier: &str) -> Result<(String, String), String>;
}

fn bound_names_of_declaration(decl: &Declaration, out: &mut Vec<Sym>) {
    match decl {
        Declaration::Variable(var_decl) => {
            for d in &var_decl.declarators {
                d.binding.bound_names(out);
            }
        }
        Declaration::Function(f) => {
            if let Some(name) = f.name {
                out.push(name);
            }
        }
        Declaration::Class(c) => {
            if let Some(name) = c.name {
                out.push(name);
            }
        }
    }
}

fn push_requested(specifier: &str, out: &mut Vec<String>) {
    if !out.iter().any(|s| s == specifier) {
        out.push(specifier.to_string());
    }
}

/// Extracts a fresh `ModuleRecord`'s static import/export entries from
/// its parsed body (the `ParseModule` static-analysis half).
fn build_module_record(specifier: String, body: ModuleItemList, ctx: &mut Context) -> ModuleRecord {
    let default_sym = ctx.intern("default");
    let star_default_sym = ctx.intern("*default*");

    let mut requested_modules = Vec::new();
    let mut import_entries = Vec::new();
    let mut local_export_entries = Vec::new();
    let mut indirect_export_entries = Vec::new();
    let mut star_export_entries = Vec::new();

    for item in &body.items {
        match item {
            ModuleItem::StatementListItem(_) => {}
            ModuleItem::Import(decl) => {
                let request = decl.module_specifier.to_std_string_lossy();
                push_requested(&request, &mut requested_modules);
                for specifier in &decl.specifiers {
                    match specifier {
                        ImportSpecifier::Default(local) => {
                            import_entries.push(ImportEntry {
                                module_request: request.clone(),
                                import_name: ImportName::Default,
                                local_name: *local,
                            });
                        }
                        ImportSpecifier::Namespace(local) => {
                            import_entries.push(ImportEntry {
                                module_request: request.clone(),
                                import_name: ImportName::Star,
                                local_name: *local,
                            });
                        }
                        ImportSpecifier::Named { imported, local } => {
                            import_entries.push(ImportEntry {
                                module_request: request.clone(),
                                import_name: ImportName::Name(*imported),
                                local_name: *local,
                            });
                        }
                    }
                }
            }
            ModuleItem::Export(export) => match export {
                ExportDeclaration::Local(decl) => {
                    let mut names = Vec::new();
                    bound_names_of_declaration(decl, &mut names);
                    for name in names {
                        local_export_entries.push(LocalExportEntry {
                            export_name: name,
                            local_name: name,
                        });
                    }
                }
                ExportDeclaration::Default(_) => {
                    local_export_entries.push(LocalExportEntry {
                        export_name: default_sym,
                        local_name: star_default_sym,
                    });
                }
                ExportDeclaration::Named(specifiers) => {
                    for (local, exported_as) in specifiers {
                        local_export_entries.push(LocalExportEntry {
                            export_name: exported_as.unwrap_or(*local),
                            local_name: *local,
                        });
                    }
                }
                ExportDeclaration::NamedFrom { specifiers, module_specifier } => {
                    let request = module_specifier.to_std_string_lossy();
                    push_requested(&request, &mut requested_modules);
                    for (imported, exported) in specifiers {
                        indirect_export_entries.push(IndirectExportEntry {
                            export_name: *exported,
                            module_request: request.clone(),
                            import_name: ImportName::Name(*imported),
                        });
                    }
                }
                ExportDeclaration::AllFrom { exported_as, module_specifier } => {
                    let request = module_specifier.to_std_string_lossy();
                    push_requested(&request, &mut requested_modules);
                    match exported_as {
                        Some(name) => indirect_export_entries.push(IndirectExportEntry {
                            export_name: *name,
                            module_request: request,
                            import_name: ImportName::Star,
                        }),
                        None => star_export_entries.push(StarExportEntry { module_request: request }),
                    }
                }
            },
        }
    }

    ModuleRecord {
        specifier,
        body,
        requested_modules,
        import_entries,
        local_export_entries,
        indirect_export_entries,
        star_export_entries,
        status: ModuleStatus::Unlinked,
        dfs_index: None,
        dfs_ancestor_index: None,
        environment: None,
        evaluation_error: None,
        namespace: None,
    }
}

/// Parses `source` and registers it as a new module under `key`,
/// without going through the host loader — the embedder's entry point
/// for loading the program it was asked to run as a module (the host
/// loader only resolves modules *reached from* that entry point).
pub fn create_source_text_module(ctx: &mut Context, key: String, source: &str) -> JsResult<ModuleId> {
    let body = vesper_parser::parse_module(source, ctx.interner_mut())
        .map_err(|e| ctx.throw_native(NativeError::syntax(e.to_string())))?;
    let record = build_module_record(key.clone(), body, ctx);
    let id = ModuleId(ctx.modules.len() as u32);
    ctx.modules.push(record);
    ctx.module_cache.insert(key, id);
    Ok(id)
}

/// `HostResolveImportedModule`: resolves `specifier` against
/// `referencing`'s own specifier through the host loader, returning the
/// already-registered module if its resolved key is already cached.
/// There is no per-module resolved-module cache (an Open Question in
/// DESIGN.md) — every call re-resolves through the host loader, which
/// is assumed to be cheap (a path join), and then consults the single
/// realm-wide `Context.module_cache`.
pub fn get_imported_module(ctx: &mut Context, referencing: Option<ModuleId>, specifier: &str) -> JsResult<ModuleId> {
    let referencing_specifier = referencing.map(|id| ctx.modules[id.0 as usize].specifier.clone());

    let mut loader = match ctx.module_loader.take() {
        Some(loader) => loader,
        None => return Err(ctx.throw_native(NativeError::typ("no module loader configured"))),
    };
    let resolved = loader.resolve(referencing_specifier.as_deref(), specifier);
    ctx.module_loader = Some(loader);
    let (key, source) = resolved.map_err(|msg| {
        ctx.throw_native(NativeError::syntax(
            EngineError::ModuleResolution(specifier.to_string(), msg).to_string(),
        ))
    })?;

    if let Some(&id) = ctx.module_cache.get(&key) {
        return Ok(id);
    }
    create_source_text_module(ctx, key, &source)
}

// ---- Link ----

/// `Link` / `Module.prototype.[[Link]]`: the Tarjan-SCC walk
/// that creates every reachable module's environment (but does not yet
/// populate it) before any of them run.
pub fn link(ctx: &mut Context, id: ModuleId) -> JsResult<()> {
    let status = ctx.modules[id.0 as usize].status;
    if matches!(status, ModuleStatus::Linked | ModuleStatus::Evaluating | ModuleStatus::Evaluated) {
        return Ok(());
    }
    let mut stack = Vec::new();
    inner_module_linking(ctx, id, &mut stack, 0)?;
    debug_assert!(stack.is_empty(), "module-linking stack must be empty once the root module settles");
    Ok(())
}

fn inner_module_linking(ctx: &mut Context, id: ModuleId, stack: &mut Vec<ModuleId>, mut index: u32) -> JsResult<u32> {
    let status = ctx.modules[id.0 as usize].status;
    if matches!(
        status,
        ModuleStatus::Linking | ModuleStatus::Linked | ModuleStatus::Evaluating | ModuleStatus::Evaluated
    ) {
        return Ok(index);
    }

    let outer = ctx.global_env();
    let env = Environment::module(Some(outer));
    {
        let m = &mut ctx.modules[id.0 as usize];
        m.status = ModuleStatus::Linking;
        m.dfs_index = Some(index);
        m.dfs_ancestor_index = Some(index);
        m.environment = Some(env);
    }
    index += 1;
    stack.push(id);

    let requested = ctx.modules[id.0 as usize].requested_modules.clone();
    for specifier in &requested {
        let required_id = get_imported_module(ctx, Some(id), specifier)?;
        let required_status = ctx.modules[required_id.0 as usize].status;
        if required_status == ModuleStatus::Unlinked {
            index = inner_module_linking(ctx, required_id, stack, index)?;
            let required_ancestor = ctx.modules[required_id.0 as usize].dfs_ancestor_index.unwrap();
            let m = &mut ctx.modules[id.0 as usize];
            m.dfs_ancestor_index = Some(m.dfs_ancestor_index.unwrap().min(required_ancestor));
        } else if required_status == ModuleStatus::Linking {
            let required_index = ctx.modules[required_id.0 as usize].dfs_index.unwrap();
            let m = &mut ctx.modules[id.0 as usize];
            m.dfs_ancestor_index = Some(m.dfs_ancestor_index.unwrap().min(required_index));
        }
    }

    populate_module_environment(ctx, id)?;

    let (ancestor, dfs) = {
        let m = &ctx.modules[id.0 as usize];
        (m.dfs_ancestor_index, m.dfs_index)
    };
    if ancestor == dfs {
        loop {
            let popped = stack.pop().expect("module must be on the linking stack");
            ctx.modules[popped.0 as usize].status = ModuleStatus::Linked;
            if popped == id {
                break;
            }
        }
    }
    Ok(index)
}

fn flattened_body(body: &ModuleItemList) -> StatementList {
    let mut items = Vec::new();
    for item in &body.items {
        match item {
            ModuleItem::StatementListItem(sli) => items.push(sli.clone()),
            ModuleItem::Export(ExportDeclaration::Local(decl)) => {
                items.push(StatementListItem::Declaration(decl.clone()));
            }
            ModuleItem::Import(_) | ModuleItem::Export(_) => {}
        }
    }
    // Modules are always strict.
    StatementList::new(items, true)
}

/// `InitializeEnvironment`: hoists the module's own
/// declarations into its environment, then wires every import entry to
/// the binding (or namespace object) it resolves to.
fn populate_module_environment(ctx: &mut Context, id: ModuleId) -> JsResult<()> {
    let env = ctx.modules[id.0 as usize]
        .environment
        .clone()
        .expect("environment created before populate_module_environment runs");

    let body = ctx.modules[id.0 as usize].body.clone();
    let flat = flattened_body(&body);
    crate::evaluator::declaration_instantiation::hoist_into(env.clone(), &flat, ctx)?;

    let star_default_sym = ctx.intern("*default*");
    let has_default_local = ctx.modules[id.0 as usize]
        .local_export_entries
        .iter()
        .any(|e| e.local_name == star_default_sym);
    if has_default_local && !env.has_binding(star_default_sym, ctx)? {
        env.create_immutable_binding(star_default_sym, true)?;
    }

    let default_sym = ctx.intern("default");
    let import_entries = ctx.modules[id.0 as usize].import_entries.clone();
    for entry in &import_entries {
        match entry.import_name {
            ImportName::Star => {
                let target_id = get_imported_module(ctx, Some(id), &entry.module_request)?;
                let ns = module_namespace(ctx, target_id)?;
                env.create_immutable_binding(entry.local_name, true)?;
                env.initialize_binding(entry.local_name, JsValue::Object(ns), ctx)?;
            }
            ImportName::Default | ImportName::Name(_) => {
                let export_name = match entry.import_name {
                    ImportName::Default => default_sym,
                    ImportName::Name(n) => n,
                    ImportName::Star => unreachable!("handled above"),
                };
                let target_id = get_imported_module(ctx, Some(id), &entry.module_request)?;
                let mut resolve_set = Vec::new();
                match resolve_export(ctx, target_id, export_name, &mut resolve_set)? {
                    ResolveOutcome::Resolved(found_module, ExportedName::Binding(found_name)) => {
                        let target_env = ctx.modules[found_module.0 as usize]
                            .environment
                            .clone()
                            .expect("a resolved export's module is always itself linked");
                        env.create_import_binding(entry.local_name, target_env, found_name);
                    }
                    ResolveOutcome::Resolved(found_module, ExportedName::Namespace) => {
                        let ns = module_namespace(ctx, found_module)?;
                        env.create_immutable_binding(entry.local_name, true)?;
                        env.initialize_binding(entry.local_name, JsValue::Object(ns), ctx)?;
                    }
                    ResolveOutcome::Ambiguous => {
                        let name = ctx.resolve(export_name).to_string();
                        return Err(ctx.throw_native(NativeError::syntax(format!(
                            "ambiguous import: multiple modules export `{name}`"
                        ))));
                    }
                    ResolveOutcome::NotFound => {
                        let name = ctx.resolve(export_name).to_string();
                        return Err(ctx.throw_native(NativeError::syntax(format!(
                            "module has no export named `{name}`"
                        ))));
                    }
                }
            }
        }
    }
    Ok(())
}

// ---- ResolveExport ----

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExportedName {
    Binding(Sym),
    Namespace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResolveOutcome {
    Resolved(ModuleId, ExportedName),
    Ambiguous,
    NotFound,
}

/// `ResolveExport(exportName, resolveSet)`: follows local,
/// indirect, then star export entries, detecting both re-export cycles
/// (via `resolve_set`) and star-export ambiguity.
fn resolve_export(
    ctx: &mut Context,
    id: ModuleId,
    export_name: Sym,
    resolve_set: &mut Vec<(ModuleId, Sym)>,
) -> JsResult<ResolveOutcome> {
    if resolve_set.iter().any(|&(m, n)| m == id && n == export_name) {
        return Ok(ResolveOutcome::NotFound);
    }
    resolve_set.push((id, export_name));

    if let Some(entry) = ctx.modules[id.0 as usize]
        .local_export_entries
        .iter()
        .find(|e| e.export_name == export_name)
        .cloned()
    {
        return Ok(ResolveOutcome::Resolved(id, ExportedName::Binding(entry.local_name)));
    }

    if let Some(entry) = ctx.modules[id.0 as usize]
        .indirect_export_entries
        .iter()
        .find(|e| e.export_name == export_name)
        .cloned()
    {
        let target_id = get_imported_module(ctx, Some(id), &entry.module_request)?;
        return match entry.import_name {
            ImportName::Star => Ok(ResolveOutcome::Resolved(target_id, ExportedName::Namespace)),
            ImportName::Name(n) => resolve_export(ctx, target_id, n, resolve_set),
            ImportName::Default => unreachable!("indirect export entries never carry ImportName::Default"),
        };
    }

    let default_sym = ctx.intern("default");
    if export_name == default_sym {
        return Ok(ResolveOutcome::NotFound);
    }

    let star_entries = ctx.modules[id.0 as usize].star_export_entries.clone();
    let mut found: Option<(ModuleId, ExportedName)> = None;
    for entry in &star_entries {
        let target_id = get_imported_module(ctx, Some(id), &entry.module_request)?;
        match resolve_export(ctx, target_id, export_name, resolve_set)? {
            ResolveOutcome::Ambiguous => return Ok(ResolveOutcome::Ambiguous),
            ResolveOutcome::NotFound => continue,
            ResolveOutcome::Resolved(m, e) => match &found {
                None => found = Some((m, e)),
                Some((fm, fe)) => {
                    if *fm != m || *fe != e {
                        return Ok(ResolveOutcome::Ambiguous);
                    }
                }
            },
        }
    }
    Ok(found.map_or(ResolveOutcome::NotFound, |(m, e)| ResolveOutcome::Resolved(m, e)))
}

/// `GetExportedNames(exportStarSet)`: every name reachable
/// through this module's local/indirect/star entries, used to build the
/// module namespace object's property set.
fn get_exported_names(ctx: &mut Context, id: ModuleId, export_star_set: &mut Vec<ModuleId>) -> JsResult<Vec<Sym>> {
    if export_star_set.contains(&id) {
        return Ok(Vec::new());
    }
    export_star_set.push(id);

    let (mut names, star_entries) = {
        let record = &ctx.modules[id.0 as usize];
        let mut names: Vec<Sym> = record.local_export_entries.iter().map(|e| e.export_name).collect();
        names.extend(record.indirect_export_entries.iter().map(|e| e.export_name));
        (names, record.star_export_entries.clone())
    };

    let default_sym = ctx.intern("default");
    for entry in &star_entries {
        let target_id = get_imported_module(ctx, Some(id), &entry.module_request)?;
        let nested = get_exported_names(ctx, target_id, export_star_set)?;
        for n in nested {
            if n != default_sym && !names.contains(&n) {
                names.push(n);
            }
        }
    }
    Ok(names)
}

// ---- Evaluate ----

/// `Evaluate` / `Module.prototype.[[Evaluate]]`: the
/// parallel Tarjan-SCC walk that actually runs module bodies, returning
/// a Promise that is always already settled — this engine has no
/// top-level-await suspension, so module evaluation completes
/// synchronously within this call.
pub fn evaluate(ctx: &mut Context, id: ModuleId) -> JsValue {
    let capability = crate::builtins::promise::new_promise_capability(ctx);
    let mut stack = Vec::new();
    match inner_module_evaluation(ctx, id, &mut stack, 0) {
        Ok(_) => {
            let _ = capability.resolve.call(&JsValue::Undefined, &[JsValue::Undefined], ctx);
        }
        Err(e) => {
            let err_value = e.value().clone();
            for leftover in stack.drain(..) {
                let m = &mut ctx.modules[leftover.0 as usize];
                m.status = ModuleStatus::Evaluated;
                m.evaluation_error = Some(err_value.clone());
            }
            let _ = capability.reject.call(&JsValue::Undefined, &[err_value], ctx);
        }
    }
    JsValue::Object(capability.promise)
}

fn inner_module_evaluation(ctx: &mut Context, id: ModuleId, stack: &mut Vec<ModuleId>, mut index: u32) -> JsResult<u32> {
    let status = ctx.modules[id.0 as usize].status;
    if status == ModuleStatus::Evaluated {
        if let Some(err) = ctx.modules[id.0 as usize].evaluation_error.clone() {
            return Err(JsError::from_value(err));
        }
        return Ok(index);
    }
    if status == ModuleStatus::Evaluating {
        return Ok(index);
    }
    debug_assert_eq!(status, ModuleStatus::Linked, "module must be linked before evaluation");

    {
        let m = &mut ctx.modules[id.0 as usize];
        m.status = ModuleStatus::Evaluating;
        m.dfs_index = Some(index);
        m.dfs_ancestor_index = Some(index);
    }
    index += 1;
    stack.push(id);

    let requested = ctx.modules[id.0 as usize].requested_modules.clone();
    for specifier in &requested {
        let required_id = get_imported_module(ctx, Some(id), specifier)?;
        index = inner_module_evaluation(ctx, required_id, stack, index)?;
        let required_status = ctx.modules[required_id.0 as usize].status;
        if required_status == ModuleStatus::Evaluating {
            let required_ancestor = ctx.modules[required_id.0 as usize].dfs_ancestor_index.unwrap();
            let m = &mut ctx.modules[id.0 as usize];
            m.dfs_ancestor_index = Some(m.dfs_ancestor_index.unwrap().min(required_ancestor));
        }
    }

    execute_module(ctx, id)?;

    let (ancestor, dfs) = {
        let m = &ctx.modules[id.0 as usize];
        (m.dfs_ancestor_index, m.dfs_index)
    };
    if ancestor == dfs {
        loop {
            let popped = stack.pop().expect("module must be on the evaluation stack");
            ctx.modules[popped.0 as usize].status = ModuleStatus::Evaluated;
            if popped == id {
                break;
            }
        }
    }
    Ok(index)
}

fn execute_module(ctx: &mut Context, id: ModuleId) -> JsResult<()> {
    let env = ctx.modules[id.0 as usize]
        .environment
        .clone()
        .expect("module linked before evaluation");
    let body = ctx.modules[id.0 as usize].body.clone();
    ctx.push_context(crate::execution_context::ExecutionContext {
        function: None,
        lexical_env: env.clone(),
        variable_env: env,
        script_or_module: crate::execution_context::ScriptOrModule::Module(id.0),
        strict: true,
    });
    let result = evaluate_module_body(&body, ctx);
    ctx.pop_context();
    result
}

/// Runs a module's top-level items in source order: plain statements
/// and `export <decl>` reuse the statement evaluator directly; `import`
/// and re-export forms have no runtime effect of their own (their work
/// already happened in `populate_module_environment`).
fn evaluate_module_body(body: &ModuleItemList, ctx: &mut Context) -> JsResult<()> {
    let star_default_sym = ctx.intern("*default*");
    for item in &body.items {
        match item {
            ModuleItem::StatementListItem(sli) => {
                crate::evaluator::statement::evaluate_statement_list_item(sli, ctx)?;
            }
            ModuleItem::Import(_) => {}
            ModuleItem::Export(ExportDeclaration::Local(decl)) => {
                crate::evaluator::statement::evaluate_declaration(decl, ctx)?;
            }
            ModuleItem::Export(ExportDeclaration::Default(expr)) => {
                let value = crate::evaluator::expression::evaluate_expression(expr, ctx)?;
                ctx.lexical_environment().initialize_binding(star_default_sym, value, ctx)?;
            }
            ModuleItem::Export(ExportDeclaration::Named(_))
            | ModuleItem::Export(ExportDeclaration::NamedFrom { .. })
            | ModuleItem::Export(ExportDeclaration::AllFrom { .. }) => {}
        }
    }
    Ok(())
}

// ---- module namespace objects ----

/// `GetModuleNamespace`: builds (once, then caches on the
/// record) the namespace exotic object — here an ordinary null-
/// prototype object whose properties are accessor-defined so reads stay
/// live against the exporting module's bindings, rather than a frozen
/// snapshot taken at namespace-creation time.
pub fn module_namespace(ctx: &mut Context, id: ModuleId) -> JsResult<JsObject> {
    if let Some(ns) = ctx.modules[id.0 as usize].namespace.clone() {
        return Ok(ns);
    }

    let mut export_star_set = Vec::new();
    let mut names = get_exported_names(ctx, id, &mut export_star_set)?;
    let default_sym = ctx.intern("default");
    names.retain(|&n| n != default_sym);
    names.sort_by_key(|&n| ctx.resolve(n).to_string());
    names.dedup();

    let ns_obj = JsObject::new(None, ObjectKind::Ordinary);
    let function_prototype = ctx.realm().intrinsics.function_prototype.clone();
    for name in &names {
        let mut resolve_set = Vec::new();
        let outcome = resolve_export(ctx, id, *name, &mut resolve_set)?;
        let key = PropertyKey::from(ctx.resolve(*name));
        match outcome {
            ResolveOutcome::Resolved(target_module, ExportedName::Binding(target_name)) => {
                let getter = JsObject::new(
                    Some(function_prototype.clone()),
                    ObjectKind::NativeClosure(NativeClosureData {
                        call: namespace_binding_getter,
                        captures: vec![JsValue::from(target_module.0), JsValue::from(target_name.to_raw())],
                        name: "",
                        length: 0,
                    }),
                );
                let _ = ns_obj.define_own_property(key, PropertyDescriptor::accessor(Some(JsValue::Object(getter)), None, true, false));
            }
            ResolveOutcome::Resolved(target_module, ExportedName::Namespace) => {
                let getter = JsObject::new(
                    Some(function_prototype.clone()),
                    ObjectKind::NativeClosure(NativeClosureData {
                        call: namespace_reexport_getter,
                        captures: vec![JsValue::from(target_module.0)],
                        name: "",
                        length: 0,
                    }),
                );
                let _ = ns_obj.define_own_property(key, PropertyDescriptor::accessor(Some(JsValue::Object(getter)), None, true, false));
            }
            // An ambiguous or unresolvable star-exported name is simply
            // omitted from the namespace object.
            ResolveOutcome::Ambiguous | ResolveOutcome::NotFound => {}
        }
    }

    let tag = ctx.well_known_symbols().to_string_tag.clone();
    let _ = ns_obj.define_own_property(
        PropertyKey::Symbol(tag),
        PropertyDescriptor::data(JsValue::from("Module"), false, false, false),
    );

    ctx.modules[id.0 as usize].namespace = Some(ns_obj.clone());
    Ok(ns_obj)
}

fn namespace_binding_getter(_this: &JsValue, _args: &[JsValue], captures: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let module_id = ModuleId(captures[0].as_number().expect("module id capture") as u32);
    let sym = Sym::from_raw(captures[1].as_number().expect("sym capture") as u32);
    let env = ctx.modules[module_id.0 as usize]
        .environment
        .clone()
        .expect("namespace getter only runs against a linked module");
    env.get_binding_value(sym, true, ctx)
}

fn namespace_reexport_getter(_this: &JsValue, _args: &[JsValue], captures: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let module_id = ModuleId(captures[0].as_number().expect("module id capture") as u32);
    Ok(JsValue::Object(module_namespace(ctx, module_id)?))
}

// ---- dynamic import ----

/// `import(specifier)`: builds a
/// Promise capability and links+evaluates synchronously rather than
/// queuing a host job, since this engine's job queue only models
/// Promise reactions, not a real event loop. The returned promise is
/// therefore always already settled by the time this returns.
pub fn dynamic_import(ctx: &mut Context, referencing: Option<ModuleId>, specifier: &str) -> JsValue {
    let capability = crate::builtins::promise::new_promise_capability(ctx);
    match dynamic_import_inner(ctx, referencing, specifier) {
        Ok(ns) => {
            let _ = capability.resolve.call(&JsValue::Undefined, &[JsValue::Object(ns)], ctx);
        }
        Err(e) => {
            let _ = capability.reject.call(&JsValue::Undefined, &[e.into_value()], ctx);
        }
    }
    JsValue::Object(capability.promise)
}

fn dynamic_import_inner(ctx: &mut Context, referencing: Option<ModuleId>, specifier: &str) -> JsResult<JsObject> {
    let id = get_imported_module(ctx, referencing, specifier)?;
    link(ctx, id)?;
    let settled = evaluate(ctx, id);
    let JsValue::Object(promise) = settled else {
        unreachable!("evaluate always resolves/rejects a freshly created Promise object")
    };
    let outcome = {
        let data = promise.data();
        let ObjectKind::Promise(p) = &data.kind else {
            unreachable!("evaluate's capability is always backed by ObjectKind::Promise")
        };
        match &p.state {
            PromiseState::Fulfilled(_) => Ok(()),
            PromiseState::Rejected(reason) => Err(JsError::from_value(reason.clone())),
            PromiseState::Pending => {
                panic!("module evaluation must settle synchronously in this engine")
            }
        }
    };
    outcome?;
    module_namespace(ctx, id)
}
