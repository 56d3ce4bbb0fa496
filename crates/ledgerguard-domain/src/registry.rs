//! Rule registry.
//!
//! Built once (single writer) before any run, then shared read-only across concurrent
//! runs behind an `Arc`. The process-wide instance lives behind a one-time initializer;
//! tests and embedders construct their own registry and hand it to the engine directly.

use crate::checks;
use crate::rule::Rule;
use ledgerguard_types::Phase;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, OnceLock};

#[derive(Default)]
pub struct RuleRegistry {
    rules: Vec<Arc<dyn Rule>>,
    by_id: HashMap<String, usize>,
    by_phase: BTreeMap<Phase, Vec<usize>>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in rule library.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        checks::register_builtin(&mut registry);
        registry
    }

    pub fn register<R: Rule + 'static>(&mut self, rule: R) -> bool {
        self.register_arc(Arc::new(rule))
    }

    /// Add a rule. A duplicate id is logged and ignored: the first registration wins.
    pub fn register_arc(&mut self, rule: Arc<dyn Rule>) -> bool {
        let meta = rule.meta();
        if self.by_id.contains_key(&meta.id) {
            tracing::warn!(rule_id = %meta.id, "duplicate rule registration ignored");
            return false;
        }

        let idx = self.rules.len();
        self.by_id.insert(meta.id.clone(), idx);
        self.by_phase.entry(meta.phase).or_default().push(idx);
        tracing::debug!(rule_id = %meta.id, phase = %meta.phase, "rule registered");
        self.rules.push(rule);
        true
    }

    pub fn get(&self, id: &str) -> Option<&Arc<dyn Rule>> {
        self.by_id.get(id).map(|&idx| &self.rules[idx])
    }

    /// Enabled rules of `phase`, in registration order.
    pub fn by_phase(&self, phase: Phase) -> Vec<Arc<dyn Rule>> {
        self.by_phase
            .get(&phase)
            .into_iter()
            .flatten()
            .map(|&idx| &self.rules[idx])
            .filter(|r| r.meta().enabled)
            .cloned()
            .collect()
    }

    /// Every registered rule (enabled or not), in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Rule>> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

static GLOBAL: OnceLock<Arc<RuleRegistry>> = OnceLock::new();

/// Initialize the process-wide registry. Returns false (and leaves the existing registry
/// untouched) if it was already initialized.
pub fn init_global<F>(build: F) -> bool
where
    F: FnOnce(&mut RuleRegistry),
{
    let mut initialized = false;
    GLOBAL.get_or_init(|| {
        initialized = true;
        let mut registry = RuleRegistry::new();
        build(&mut registry);
        tracing::info!(rules = registry.len(), "global rule registry initialized");
        Arc::new(registry)
    });
    initialized
}

/// The process-wide registry, initialized with the built-in rules on first use.
pub fn global() -> Arc<RuleRegistry> {
    init_global(checks::register_builtin);
    GLOBAL
        .get()
        .cloned()
        .unwrap_or_else(|| Arc::new(RuleRegistry::with_builtin()))
}
