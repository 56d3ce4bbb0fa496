//! Rule evaluation engine (no IO).
//!
//! Input: a ledger [`Context`](model::Context) built elsewhere and a [`RuleRegistry`].
//! Output: an [`ExecutionResult`](ledgerguard_types::ExecutionResult) with per-phase rule
//! outcomes, severity counts, and a risk score.
//!
//! Phases run strictly in order (intake, compute, analyze, crosscheck). Within a phase,
//! rules run sequentially in dependency order, each bounded by a wall-clock timeout.

#![forbid(unsafe_code)]

pub mod cancel;
pub mod checks;
pub mod error;
pub mod model;
pub mod policy;
pub mod registry;
pub mod rule;
pub mod scoring;
pub mod threshold;

mod engine;
mod executor;
mod fingerprint;

pub use cancel::CancellationToken;
pub use engine::Engine;
pub use error::{ContextError, EngineError, RuleError};
pub use executor::{PhaseExecutor, dependency_order, evaluate_rule};
pub use registry::RuleRegistry;
pub use rule::{Rule, RuleMeta};
pub use threshold::{Magnitude, Threshold};

#[cfg(test)]
mod properties;
#[cfg(test)]
mod test_support;
