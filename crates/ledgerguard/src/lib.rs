//! Public facade over the ledgerguard engine.
//!
//! Embedders register their own [`Rule`] implementations next to (or instead of) the
//! built-in ones and run an [`Engine`] over a [`Context`](model::Context).

#![forbid(unsafe_code)]

pub use ledgerguard_domain::{
    CancellationToken, ContextError, Engine, EngineError, Magnitude, Rule, RuleError, RuleMeta,
    RuleRegistry, Threshold, checks, model, policy, registry, scoring,
};
pub use ledgerguard_types as types;
pub use ledgerguard_types::{ExecutionResult, Finding, Phase, RiskLevel, RuleStatus, Severity};
