use crate::cancel::CancellationToken;
use crate::error::EngineError;
use crate::executor::PhaseExecutor;
use crate::model::Context;
use crate::policy::EngineConfig;
use crate::registry::RuleRegistry;
use crate::scoring::ScoringPolicy;
use ledgerguard_types::{
    ExecutionResult, ExecutionStatus, ExecutionSummary, Phase, PhaseResult, RuleResult,
    RuleStatus, SeverityCounts,
};
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::time::Instant;
use tracing::Instrument;

/// Runs the four phases in fixed order and aggregates their results.
///
/// An engine holds no per-run state; one instance can serve concurrent runs.
#[derive(Clone)]
pub struct Engine {
    registry: Arc<RuleRegistry>,
    config: EngineConfig,
    scoring: ScoringPolicy,
}

impl Engine {
    pub fn new(registry: Arc<RuleRegistry>) -> Self {
        Self {
            registry,
            config: EngineConfig::default(),
            scoring: ScoringPolicy::default(),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_scoring(mut self, scoring: ScoringPolicy) -> Self {
        self.scoring = scoring;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn scoring(&self) -> &ScoringPolicy {
        &self.scoring
    }

    /// Evaluate `context` and return the complete report.
    ///
    /// Only a structurally invalid context is an error; every rule failure, timeout, or
    /// blocked phase is reported inside the returned result.
    pub async fn execute(&self, context: Context) -> Result<ExecutionResult, EngineError> {
        self.execute_with_cancel(context, &CancellationToken::new())
            .await
    }

    /// Like [`Engine::execute`], stopping early once `cancel` fires.
    ///
    /// Cancellation is observed at phase boundaries and before each rule evaluation.
    pub async fn execute_with_cancel(
        &self,
        mut context: Context,
        cancel: &CancellationToken,
    ) -> Result<ExecutionResult, EngineError> {
        context.validate()?;

        let started_at = OffsetDateTime::now_utc();
        let execution_id = uuid::Uuid::new_v4().to_string();
        context.execution_id = execution_id.clone();
        context.executed_at = Some(started_at);
        context.phase_results.clear();

        let span = tracing::info_span!(
            "execute",
            execution_id = %execution_id,
            subject = %context.subject.id
        );
        let result = self
            .run_phases(context, cancel, started_at)
            .instrument(span)
            .await;
        Ok(result)
    }

    async fn run_phases(
        &self,
        context: Context,
        cancel: &CancellationToken,
        started_at: OffsetDateTime,
    ) -> ExecutionResult {
        let clock = Instant::now();
        let execution_id = context.execution_id.clone();
        let subject_id = context.subject.id.clone();
        let period = context.period.describe();

        let mut ctx = Arc::new(context);
        let executor = PhaseExecutor::new(&self.registry, &self.config);
        let mut phases: Vec<PhaseResult> = Vec::new();
        let mut status = ExecutionStatus::Completed;

        for phase in self.config.phases() {
            if cancel.is_cancelled() {
                status = ExecutionStatus::Cancelled;
                break;
            }

            let result = executor.run(phase, &ctx, cancel).await;
            let can_proceed = result.can_proceed;
            // Rules still running from a timed-out evaluation keep their own snapshot.
            Arc::make_mut(&mut ctx)
                .phase_results
                .insert(phase, result.clone());
            phases.push(result);

            if cancel.is_cancelled() {
                status = ExecutionStatus::Cancelled;
                break;
            }
            if !can_proceed {
                if phase == Phase::Intake && self.config.stop_on_phase0_failure {
                    tracing::warn!("intake phase cannot proceed; aborting run");
                    status = ExecutionStatus::Failed;
                    break;
                }
                tracing::warn!(%phase, "phase cannot proceed; continuing with partial results");
                status = ExecutionStatus::Partial;
            }
        }

        let all: Vec<&RuleResult> = phases.iter().flat_map(|p| &p.rule_results).collect();
        let summary = summarize(&all);
        let risk_score = self.scoring.score(all.iter().copied());
        let risk_level = self.scoring.level(risk_score);

        tracing::info!(
            %status,
            risk_score,
            %risk_level,
            triggered = summary.triggered_rules,
            failed = summary.failed_rules,
            "execution finished"
        );

        ExecutionResult {
            execution_id,
            subject_id,
            period,
            status,
            phases,
            summary,
            risk_score,
            risk_level,
            started_at,
            finished_at: OffsetDateTime::now_utc(),
            duration_ms: clock.elapsed().as_millis() as u64,
        }
    }
}

fn summarize(results: &[&RuleResult]) -> ExecutionSummary {
    let count = |status: RuleStatus| results.iter().filter(|r| r.status == status).count() as u32;
    let skipped = count(RuleStatus::Skipped);
    ExecutionSummary {
        total_rules: results.len() as u32,
        executed_rules: results.len() as u32 - skipped,
        triggered_rules: count(RuleStatus::Triggered),
        failed_rules: count(RuleStatus::Failed),
        skipped_rules: skipped,
        by_severity: SeverityCounts::from_results(results.iter().copied()),
    }
}
