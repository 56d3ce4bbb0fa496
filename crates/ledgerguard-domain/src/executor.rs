//! Phase execution: dependency ordering, gating, and timeout-bounded rule evaluation.

use crate::cancel::CancellationToken;
use crate::fingerprint::fingerprint_for_finding;
use crate::model::Context;
use crate::policy::EngineConfig;
use crate::registry::RuleRegistry;
use crate::rule::{Rule, RuleMeta, unsatisfied_dependency};
use ledgerguard_types::{
    Finding, Phase, PhaseCounts, PhaseResult, PhaseStatus, RuleResult, RuleStatus, ids,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use time::OffsetDateTime;
use tokio::task::JoinError;
use tokio::time::Instant;

/// Runs every selected, enabled rule of one phase to completion.
pub struct PhaseExecutor<'a> {
    registry: &'a RuleRegistry,
    config: &'a EngineConfig,
}

impl<'a> PhaseExecutor<'a> {
    pub fn new(registry: &'a RuleRegistry, config: &'a EngineConfig) -> Self {
        Self { registry, config }
    }

    /// Execute `phase`. One rule's failure never aborts the phase: every rule gets a result.
    pub async fn run(
        &self,
        phase: Phase,
        ctx: &Arc<Context>,
        cancel: &CancellationToken,
    ) -> PhaseResult {
        let started_at = OffsetDateTime::now_utc();
        let clock = Instant::now();

        let rules: Vec<Arc<dyn Rule>> = self
            .registry
            .by_phase(phase)
            .into_iter()
            .filter(|r| self.config.rule_selected(r.meta()))
            .collect();
        let ordered = dependency_order(rules);
        tracing::info!(%phase, rules = ordered.len(), "phase started");

        let mut results: Vec<RuleResult> = Vec::with_capacity(ordered.len());
        for rule in &ordered {
            let meta = rule.meta();
            let result = if cancel.is_cancelled() {
                skipped(meta, ids::SKIP_REASON_CANCELLED.to_string())
            } else if let Some(reason) = same_phase_blocker(meta, &results) {
                skipped(meta, reason)
            } else if !rule.can_execute(ctx) {
                let reason = unsatisfied_dependency(meta, ctx)
                    .unwrap_or_else(|| "dependency gate not satisfied".to_string());
                skipped(meta, reason)
            } else {
                evaluate_rule(rule, ctx, self.config.rule_timeout, cancel).await
            };

            if self.config.debug_mode {
                tracing::info!(
                    rule_id = %result.rule_id,
                    status = %result.status,
                    duration_ms = result.duration_ms,
                    "rule evaluated"
                );
            } else {
                tracing::debug!(
                    rule_id = %result.rule_id,
                    status = %result.status,
                    duration_ms = result.duration_ms,
                    "rule evaluated"
                );
            }
            results.push(result);
        }

        let phase_result = summarize(phase, results, started_at, clock.elapsed());
        tracing::info!(
            %phase,
            passed = phase_result.counts.passed,
            triggered = phase_result.counts.triggered,
            failed = phase_result.counts.failed,
            skipped = phase_result.counts.skipped,
            can_proceed = phase_result.can_proceed,
            "phase finished"
        );
        phase_result
    }
}

/// Order rules so that same-phase dependencies come first.
///
/// Depth-first visit in registration order; a rule is marked visited before its
/// dependencies are visited, so cycles terminate. Dependency ids outside `rules` are
/// skipped: a dangling dependency means "no ordering constraint".
pub fn dependency_order(rules: Vec<Arc<dyn Rule>>) -> Vec<Arc<dyn Rule>> {
    let index: HashMap<&str, usize> = rules
        .iter()
        .enumerate()
        .map(|(i, r)| (r.meta().id.as_str(), i))
        .collect();

    let mut visited = vec![false; rules.len()];
    let mut order: Vec<usize> = Vec::with_capacity(rules.len());

    fn visit(
        i: usize,
        rules: &[Arc<dyn Rule>],
        index: &HashMap<&str, usize>,
        visited: &mut [bool],
        order: &mut Vec<usize>,
    ) {
        if visited[i] {
            return;
        }
        visited[i] = true;
        for dep in &rules[i].meta().dependencies {
            if let Some(&j) = index.get(dep.as_str()) {
                visit(j, rules, index, visited, order);
            }
        }
        order.push(i);
    }

    for i in 0..rules.len() {
        visit(i, &rules, &index, &mut visited, &mut order);
    }

    order.into_iter().map(|i| Arc::clone(&rules[i])).collect()
}

/// Evaluate one rule under a wall-clock timeout.
///
/// The body runs on a spawned task racing a timer. On timeout the rule's token is
/// cancelled and the task aborted; whatever it later produces is dropped. A body that
/// blocks without awaiting or polling its token keeps its worker thread until it returns.
///
/// On a current-thread runtime such a body finishes before the timer is polled, so any
/// outcome that arrives after the budget is recorded as a timeout as well.
pub async fn evaluate_rule(
    rule: &Arc<dyn Rule>,
    ctx: &Arc<Context>,
    timeout: Duration,
    cancel: &CancellationToken,
) -> RuleResult {
    let meta = rule.meta();
    let started_at = OffsetDateTime::now_utc();
    let clock = Instant::now();

    let token = cancel.child();
    let task = {
        let rule = Arc::clone(rule);
        let ctx = Arc::clone(ctx);
        let token = token.clone();
        tokio::spawn(async move { rule.evaluate(&ctx, &token).await })
    };
    let abort = task.abort_handle();

    let raced = tokio::time::timeout(timeout, task).await;
    let overran = clock.elapsed() > timeout;
    let outcome = match raced {
        Err(_) => {
            token.cancel();
            abort.abort();
            Err(format!("timed out after {} ms", timeout.as_millis()))
        }
        Ok(_) if overran => {
            token.cancel();
            Err(format!("timed out after {} ms", timeout.as_millis()))
        }
        Ok(Ok(Ok(Some(finding)))) => match validate_finding(&finding) {
            Ok(()) => Ok(Some(finding)),
            Err(msg) => Err(msg),
        },
        Ok(Ok(Ok(None))) => Ok(None),
        Ok(Ok(Err(err))) => Err(err.to_string()),
        Ok(Err(join_err)) => Err(join_failure(join_err)),
    };

    let mut result = base_result(meta, started_at, clock.elapsed());
    match outcome {
        Ok(Some(mut finding)) => {
            if finding.fingerprint.is_none() {
                finding.fingerprint = Some(fingerprint_for_finding(&meta.id, &finding));
            }
            result.status = RuleStatus::Triggered;
            result.triggered = true;
            result.finding = Some(finding);
        }
        Ok(None) => result.status = RuleStatus::Passed,
        Err(error) => {
            tracing::warn!(rule_id = %meta.id, %error, "rule evaluation failed");
            result.status = RuleStatus::Failed;
            result.error = Some(error);
        }
    }
    result
}

/// A same-phase dependency that already ran and neither passed nor triggered.
fn same_phase_blocker(meta: &RuleMeta, done: &[RuleResult]) -> Option<String> {
    meta.dependencies.iter().find_map(|dep| {
        let prior = done.iter().find(|r| &r.rule_id == dep)?;
        if prior.status.satisfies_dependency() {
            None
        } else {
            Some(format!(
                "dependency '{dep}' was {} in phase {}",
                prior.status, meta.phase
            ))
        }
    })
}

fn validate_finding(finding: &Finding) -> Result<(), String> {
    if finding.title.trim().is_empty() {
        return Err("malformed finding: empty title".to_string());
    }
    if let Some(amount) = finding.impact.estimated_amount
        && !amount.is_finite()
    {
        return Err("malformed finding: non-finite estimated amount".to_string());
    }
    Ok(())
}

fn join_failure(err: JoinError) -> String {
    if !err.is_panic() {
        return "rule task was cancelled".to_string();
    }
    let payload = err.into_panic();
    let msg = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string());
    format!("rule panicked: {msg}")
}

fn base_result(meta: &RuleMeta, started_at: OffsetDateTime, elapsed: Duration) -> RuleResult {
    RuleResult {
        rule_id: meta.id.clone(),
        rule_name: meta.name.clone(),
        phase: meta.phase,
        category: meta.category.clone(),
        status: RuleStatus::Skipped,
        triggered: false,
        finding: None,
        error: None,
        skip_reason: None,
        started_at,
        duration_ms: elapsed.as_millis() as u64,
    }
}

fn skipped(meta: &RuleMeta, reason: String) -> RuleResult {
    let mut result = base_result(meta, OffsetDateTime::now_utc(), Duration::ZERO);
    result.skip_reason = Some(reason);
    result
}

fn summarize(
    phase: Phase,
    rule_results: Vec<RuleResult>,
    started_at: OffsetDateTime,
    elapsed: Duration,
) -> PhaseResult {
    let counts = PhaseCounts::from_results(&rule_results);
    let status = if counts.failed > 0 {
        PhaseStatus::Failed
    } else if counts.triggered > 0 {
        PhaseStatus::Partial
    } else {
        PhaseStatus::Completed
    };
    let blocking_errors = rule_results
        .iter()
        .filter(|r| r.status == RuleStatus::Failed)
        .map(|r| {
            format!(
                "{}: {}",
                r.rule_id,
                r.error.as_deref().unwrap_or("unknown error")
            )
        })
        .collect();

    PhaseResult {
        phase,
        status,
        can_proceed: counts.failed == 0,
        counts,
        blocking_errors,
        rule_results,
        started_at,
        duration_ms: elapsed.as_millis() as u64,
    }
}
