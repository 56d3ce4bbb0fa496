//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - Risk scoring bounds and order independence
//! - Dependency ordering
//! - Run-to-run determinism of the engine

use crate::engine::Engine;
use crate::executor::dependency_order;
use crate::rule::Rule;
use crate::scoring::{MAX_RISK_SCORE, ScoringPolicy};
use crate::test_support::{Behavior, ScriptedRule, context, ids_of, registry_of};
use ledgerguard_types::{Phase, RuleStatus, Severity};
use proptest::prelude::*;
use std::sync::Arc;

// ============================================================================
// Strategies
// ============================================================================

fn arb_severity() -> impl Strategy<Value = Severity> {
    prop::sample::select(Severity::ALL.to_vec())
}

fn arb_phase() -> impl Strategy<Value = Phase> {
    prop::sample::select(Phase::ALL.to_vec())
}

fn arb_behavior() -> impl Strategy<Value = Behavior> {
    prop_oneof![
        Just(Behavior::Pass),
        arb_severity().prop_map(Behavior::Trigger),
        Just(Behavior::Fail("generated failure")),
        Just(Behavior::MissingInput),
    ]
}

/// Rule `i` may only depend on rules `0..i`, so the graph is acyclic.
fn arb_dag() -> impl Strategy<Value = Vec<Vec<usize>>> {
    (1usize..12).prop_flat_map(|n| {
        (0..n)
            .map(|i| {
                if i == 0 {
                    Just(Vec::new()).boxed()
                } else {
                    prop::collection::vec(0..i, 0..3).boxed()
                }
            })
            .collect::<Vec<_>>()
    })
}

fn rules_from_dag(deps: &[Vec<usize>]) -> Vec<Arc<dyn Rule>> {
    // Registered in reverse so dependents usually come before their dependencies.
    (0..deps.len())
        .rev()
        .map(|i| {
            let names: Vec<String> = deps[i].iter().map(|d| format!("r{d}")).collect();
            let refs: Vec<&str> = names.iter().map(String::as_str).collect();
            Arc::new(
                ScriptedRule::new(&format!("r{i}"), Phase::Analyze, Behavior::Pass)
                    .depends_on(&refs),
            ) as Arc<dyn Rule>
        })
        .collect()
}

// ============================================================================
// Scoring
// ============================================================================

proptest! {
    #[test]
    fn score_is_bounded(severities in prop::collection::vec(arb_severity(), 0..40)) {
        let score = ScoringPolicy::default().score_severities(severities);
        prop_assert!(score <= MAX_RISK_SCORE);
    }

    #[test]
    fn score_ignores_order(severities in prop::collection::vec(arb_severity(), 0..20)) {
        let policy = ScoringPolicy::default();
        let forward = policy.score_severities(severities.iter().copied());
        let backward = policy.score_severities(severities.iter().rev().copied());
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn adding_a_finding_never_lowers_score_or_level(
        severities in prop::collection::vec(arb_severity(), 0..20),
        extra in arb_severity(),
    ) {
        let policy = ScoringPolicy::default();
        let before = policy.score_severities(severities.iter().copied());
        let after = policy.score_severities(severities.iter().copied().chain([extra]));
        prop_assert!(after >= before);
        prop_assert!(policy.level(after) >= policy.level(before));
    }
}

// ============================================================================
// Dependency ordering
// ============================================================================

proptest! {
    #[test]
    fn dependency_order_is_a_permutation(deps in arb_dag()) {
        let rules = rules_from_dag(&deps);
        let mut input = ids_of(&rules);
        let mut output = ids_of(&dependency_order(rules));
        input.sort();
        output.sort();
        prop_assert_eq!(input, output);
    }

    #[test]
    fn dependencies_precede_dependents(deps in arb_dag()) {
        let ordered = ids_of(&dependency_order(rules_from_dag(&deps)));
        let position = |id: &str| ordered.iter().position(|x| x == id);
        for (i, ds) in deps.iter().enumerate() {
            let me = position(&format!("r{i}")).expect("present");
            for d in ds {
                let dep = position(&format!("r{d}")).expect("present");
                prop_assert!(dep < me, "r{} must precede r{}", d, i);
            }
        }
    }
}

// ============================================================================
// Engine determinism
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn rerun_yields_identical_outcomes(
        specs in prop::collection::vec((arb_phase(), arb_behavior()), 0..10),
    ) {
        let rules: Vec<ScriptedRule> = specs
            .into_iter()
            .enumerate()
            .map(|(i, (phase, behavior))| {
                ScriptedRule::new(&format!("{phase}.r{i}"), phase, behavior)
            })
            .collect();
        let engine = Engine::new(Arc::new(registry_of(rules)));
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .expect("runtime");

        let first = runtime.block_on(engine.execute(context(Vec::new()))).expect("first");
        let second = runtime.block_on(engine.execute(context(Vec::new()))).expect("second");

        let outcome = |r: &ledgerguard_types::ExecutionResult| -> Vec<(String, RuleStatus)> {
            r.rule_results().map(|x| (x.rule_id.clone(), x.status)).collect()
        };
        prop_assert_eq!(outcome(&first), outcome(&second));
        prop_assert_eq!(first.status, second.status);
        prop_assert_eq!(first.risk_score, second.risk_score);
        prop_assert!(first.risk_score <= MAX_RISK_SCORE);
    }
}
