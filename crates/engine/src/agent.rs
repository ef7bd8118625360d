//! The Agent: process-wide execution-context stack, job
//! queue, and feature-flag set, represented as a `clap`-free,
//! serializable `FeatureSet`.

use bitflags::bitflags;

bitflags! {
    /// Guarded syntactic/semantic extensions. Represented as bitflags
    /// rather than a `Vec<String>` so checking a flag at a hot
    /// evaluator path is a single bit test.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FeatureSet: u32 {
        const TOP_LEVEL_AWAIT = 0b0000_0001;
        const WEAK_REFS = 0b0000_0010;
        const ARRAY_GROUPING = 0b0000_0100;
    }
}

impl FeatureSet {
    /// `{name, url}` pairs for the embedder's `list` introspection mode.
    pub fn catalog() -> &'static [(&'static str, &'static str)] {
        &[
            (
                "top-level-await",
                "https://github.com/tc39/proposal-top-level-await",
            ),
            ("weak-refs", "https://github.com/tc39/proposal-weakrefs"),
            (
                "array-grouping",
                "https://github.com/tc39/proposal-array-grouping",
            ),
        ]
    }

    pub fn from_names(names: &[&str]) -> Result<Self, String> {
        let mut set = FeatureSet::empty();
        for name in names {
            let flag = match *name {
                "top-level-await" => FeatureSet::TOP_LEVEL_AWAIT,
                "weak-refs" => FeatureSet::WEAK_REFS,
                "array-grouping" => FeatureSet::ARRAY_GROUPING,
                other => return Err(format!("unknown feature flag `{other}`")),
            };
            set |= flag;
        }
        Ok(set)
    }
}

/// Process-wide execution state. `Context` (the embedder-facing
/// `new Agent`/`new Realm` composite) owns one `Agent` and pushes/pops
/// `ExecutionContext`s on its stack as it runs.
pub struct Agent {
    pub features: FeatureSet,
}

impl Agent {
    pub fn new(features: FeatureSet) -> Self {
        Self { features }
    }

    /// Backs `Math.random()`: a fresh uniform `[0, 1)` draw per call,
    /// not a seeded/reproducible stream — `Math.random` is
    /// implementation-defined.
    pub fn random_f64(&self) -> f64 {
        rand::random::<f64>()
    }
}

impl Default for Agent {
    fn default() -> Self {
        Self::new(FeatureSet::empty())
    }
}
