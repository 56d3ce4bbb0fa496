use crate::engine::Engine;
use crate::model::{Context, SummaryFigures};
use crate::registry::RuleRegistry;
use crate::test_support::{context, line};
use ledgerguard_types::{
    ExecutionStatus, Phase, PhaseStatus, RiskLevel, RuleStatus, Severity, explain, ids,
};
use std::sync::Arc;

fn builtin_engine() -> Engine {
    Engine::new(Arc::new(RuleRegistry::with_builtin()))
}

fn clean_books() -> Context {
    let mut ctx = context(vec![
        line("1001", "Cash", 50_000.0, 0.0),
        line("160101", "Company car", 250_000.0, 0.0),
        line("2202", "Payables", 0.0, 100_000.0),
        line("4001", "Revenue", 0.0, 200_000.0),
    ]);
    ctx.rates
        .limits
        .insert(ids::RATE_VEHICLE_LIMIT.to_string(), 1_600_000.0);
    ctx.summary = Some(SummaryFigures {
        total_debit: Some(300_000.0),
        total_credit: Some(300_000.0),
        ..SummaryFigures::default()
    });
    ctx
}

#[test]
fn every_builtin_rule_is_explained_and_named_after_its_phase() {
    let registry = RuleRegistry::with_builtin();
    assert_eq!(registry.len(), explain::all_rule_ids().len());
    for rule in registry.iter() {
        let meta = rule.meta();
        assert!(
            explain::lookup_explanation(&meta.id).is_some(),
            "missing explanation for {}",
            meta.id
        );
        assert!(
            meta.id.starts_with(&format!("{}.", meta.phase)),
            "{} does not start with its phase",
            meta.id
        );
    }
}

#[test]
fn builtin_dependencies_can_gate() {
    // Dependencies only gate within the same phase or from the previous one.
    let registry = RuleRegistry::with_builtin();
    for rule in registry.iter() {
        let meta = rule.meta();
        for dep in &meta.dependencies {
            let dep_phase = registry.get(dep).expect("dependency registered").meta().phase;
            assert!(
                dep_phase == meta.phase || meta.phase.previous() == Some(dep_phase),
                "{} depends on {dep} from {dep_phase}",
                meta.id
            );
        }
    }
}

#[tokio::test]
async fn clean_books_score_zero() {
    let result = builtin_engine()
        .execute(clean_books())
        .await
        .expect("execute");

    assert_eq!(result.status, ExecutionStatus::Completed);
    assert_eq!(result.summary.total_rules, 5);
    assert_eq!(result.summary.triggered_rules, 0);
    assert_eq!(result.risk_score, 0);
    assert_eq!(result.risk_level, RiskLevel::Low);
}

#[tokio::test]
async fn unbalanced_books_with_credit_cash_score_fifty() {
    let mut ctx = clean_books();
    // Cash overdrawn: asset with a credit balance, and debits no longer equal credits.
    ctx.ledger[0] = line("1001", "Cash", 0.0, 5_000.0);
    ctx.summary = None;

    let result = builtin_engine().execute(ctx).await.expect("execute");

    let triggered: Vec<(&str, Option<Severity>)> = result
        .triggered()
        .map(|r| (r.rule_id.as_str(), r.severity()))
        .collect();
    assert_eq!(
        triggered,
        vec![
            (ids::RULE_INTAKE_TRIAL_BALANCE, Some(Severity::Critical)),
            (ids::RULE_ANALYZE_ABNORMAL_BALANCE, Some(Severity::High)),
        ]
    );
    // Findings never block: every phase ran.
    assert_eq!(result.status, ExecutionStatus::Completed);
    assert_eq!(result.phases.len(), 4);
    assert_eq!(result.risk_score, 50);
    assert_eq!(result.risk_level, RiskLevel::High);
}

#[tokio::test]
async fn missing_vehicle_rate_fails_compute_only() {
    let mut ctx = clean_books();
    ctx.rates.limits.clear();

    let result = builtin_engine().execute(ctx).await.expect("execute");

    assert_eq!(result.status, ExecutionStatus::Partial);
    let compute = result.phase(Phase::Compute).expect("compute ran");
    assert_eq!(compute.status, PhaseStatus::Failed);
    assert!(compute.blocking_errors[0].contains("vehicle_limit"));
    let crosscheck = result.phase(Phase::Crosscheck).expect("crosscheck ran");
    assert_eq!(
        crosscheck
            .result_for(ids::RULE_CROSSCHECK_SUMMARY_TOTALS)
            .map(|r| r.status),
        Some(RuleStatus::Passed)
    );
}

#[tokio::test]
async fn malformed_ledger_stops_at_intake() {
    let mut ctx = clean_books();
    ctx.ledger.push(line("9999", "Broken", f64::INFINITY, 0.0));

    let result = builtin_engine().execute(ctx).await.expect("execute");

    assert_eq!(result.status, ExecutionStatus::Failed);
    assert_eq!(result.phases.len(), 1);
    assert_eq!(result.summary.failed_rules, 2);
}
