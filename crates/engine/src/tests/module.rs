use crate::error::JsError;
use crate::module::HostModuleLoader;
use crate::property::PropertyKey;
use crate::value::JsValue;
use crate::Context;
use hashbrown::HashMap;

/// Resolves every specifier against a fixed, in-memory source map —
/// good enough for tests that don't need real filesystem/URL semantics.
struct MapLoader(HashMap<&'static str, &'static str>);

impl HostModuleLoader for MapLoader {
    fn resolve(&mut self, _referencing_specifier: Option<&str>, specifier: &str) -> Result<(String, String), String> {
        self.0
            .get(specifier)
            .map(|src| (specifier.to_string(), src.to_string()))
            .ok_or_else(|| format!("no such module: {specifier}"))
    }
}

fn evaluate_entry(sources: HashMap<&'static str, &'static str>, entry_key: &str, entry_source: &str) -> Result<(Context, JsValue), JsError> {
    let mut ctx = Context::new();
    ctx.set_module_loader(Box::new(MapLoader(sources)));
    let id = ctx.create_source_text_module(entry_key.to_string(), entry_source)?;
    ctx.link_module(id)?;
    ctx.evaluate_module(id);
    let ns = ctx.module_namespace(id)?;
    Ok((ctx, JsValue::Object(ns)))
}

fn get_export(ctx: &mut Context, ns: &JsValue, name: &str) -> JsValue {
    let JsValue::Object(ns_obj) = ns else { panic!("expected a namespace object") };
    ns_obj.get(&PropertyKey::from(name), &JsValue::Undefined, ctx).expect("export lookup should not throw")
}

#[test]
fn a_cycle_of_two_modules_each_calls_into_the_other_through_a_live_binding() {
    let mut sources = HashMap::new();
    sources.insert(
        "a.js",
        "
        import { getB } from 'b.js';
        export let a = 1;
        export function getA() { return a; }
        export function bThroughA() { return getB(); }
        ",
    );
    sources.insert(
        "b.js",
        "
        import { getA } from 'a.js';
        export let b = 2;
        export function getB() { return b; }
        export function aThroughB() { return getA(); }
        ",
    );

    let (mut ctx, ns) = evaluate_entry(
        sources,
        "entry.js",
        "
        import { bThroughA } from 'a.js';
        import { aThroughB } from 'b.js';
        export const viaA = bThroughA();
        export const viaB = aThroughB();
        ",
    )
    .expect("cyclic module graph should link and evaluate");

    let via_a = get_export(&mut ctx, &ns, "viaA");
    let via_b = get_export(&mut ctx, &ns, "viaB");
    assert!(matches!(via_a, JsValue::Number(n) if n == 2.0), "expected b's export, got {via_a:?}");
    assert!(matches!(via_b, JsValue::Number(n) if n == 1.0), "expected a's export, got {via_b:?}");
}

#[test]
fn exported_function_sees_the_live_binding_of_state_mutated_after_import() {
    let mut sources = HashMap::new();
    sources.insert(
        "counter.js",
        "
        export let count = 0;
        export function increment() { count += 1; }
        export function current() { return count; }
        ",
    );
    let (mut ctx, ns) = evaluate_entry(
        sources,
        "entry.js",
        "
        import { increment, current } from 'counter.js';
        increment();
        increment();
        export const seen = current();
        ",
    )
    .expect("module graph should link and evaluate");

    let seen = get_export(&mut ctx, &ns, "seen");
    assert!(matches!(seen, JsValue::Number(n) if n == 2.0));
}

#[test]
fn importing_a_module_that_does_not_exist_fails_to_link() {
    let sources = HashMap::new();
    let result = evaluate_entry(sources, "entry.js", "import { x } from 'missing.js';");
    assert!(result.is_err());
}
