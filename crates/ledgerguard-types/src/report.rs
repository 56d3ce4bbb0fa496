use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;

/// Stable schema identifier for the execution report envelope.
pub const SCHEMA_EXECUTION_V1: &str = "ledgerguard.execution.v1";

/// Severity of a finding. Declaration order is most to least severe.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Info,
}

impl Severity {
    pub const ALL: [Severity; 5] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
        Severity::Info,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
            Severity::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four fixed stages rules belong to, in execution order.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    /// Validation of the input snapshot.
    Intake,
    /// Derived calculations.
    Compute,
    /// Risk analysis.
    Analyze,
    /// Reconciliation across sources.
    Crosscheck,
}

impl Phase {
    pub const ALL: [Phase; 4] = [
        Phase::Intake,
        Phase::Compute,
        Phase::Analyze,
        Phase::Crosscheck,
    ];

    /// The phase that runs immediately before this one, if any.
    pub fn previous(self) -> Option<Phase> {
        match self {
            Phase::Intake => None,
            Phase::Compute => Some(Phase::Intake),
            Phase::Analyze => Some(Phase::Compute),
            Phase::Crosscheck => Some(Phase::Analyze),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Intake => "intake",
            Phase::Compute => "compute",
            Phase::Analyze => "analyze",
            Phase::Crosscheck => "crosscheck",
        }
    }

    pub fn parse(v: &str) -> Option<Phase> {
        Phase::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(v.trim()))
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of evaluating one rule once. Exactly one holds per Rule Result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleStatus {
    Passed,
    Triggered,
    Failed,
    Skipped,
}

impl RuleStatus {
    /// Whether a dependent rule may run after this outcome.
    pub fn satisfies_dependency(self) -> bool {
        matches!(self, RuleStatus::Passed | RuleStatus::Triggered)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RuleStatus::Passed => "PASSED",
            RuleStatus::Triggered => "TRIGGERED",
            RuleStatus::Failed => "FAILED",
            RuleStatus::Skipped => "SKIPPED",
        }
    }
}

impl fmt::Display for RuleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PhaseStatus {
    Completed,
    Partial,
    Failed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionStatus {
    Completed,
    Partial,
    Failed,
    Cancelled,
}

impl ExecutionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ExecutionStatus::Completed => "COMPLETED",
            ExecutionStatus::Partial => "PARTIAL",
            ExecutionStatus::Failed => "FAILED",
            ExecutionStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Headline risk classification derived from the risk score.
///
/// Ordered from least to most severe so `level >= fail_on` comparisons read naturally.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionPriority {
    Immediate,
    High,
    Normal,
    Low,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RecommendedAction {
    pub description: String,
    pub priority: ActionPriority,
    /// Role expected to carry the action out (e.g. "accountant", "tax_advisor").
    pub assignee_role: String,
}

/// Pointer into the source data that justified a finding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EvidenceRef {
    /// Which input the pointer refers to (`ledger`, `summary`, `rates`).
    pub source: String,
    /// Location inside the source, e.g. `line[12]` or `account:1001`.
    pub reference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Impact {
    pub area: String,
    pub potential_issue: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_amount: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Finding {
    pub severity: Severity,
    pub title: String,
    pub summary: String,
    pub rationale: String,

    #[serde(default)]
    pub actions: Vec<RecommendedAction>,
    #[serde(default)]
    pub evidence: Vec<EvidenceRef>,
    pub impact: Impact,
    #[serde(default)]
    pub tags: Vec<String>,

    /// Stable identifier intended for dedup and trending. A hash of:
    /// `rule_id + title + evidence references`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RuleResult {
    pub rule_id: String,
    pub rule_name: String,
    pub phase: Phase,
    pub category: String,
    pub status: RuleStatus,
    /// True iff `status` is `TRIGGERED` and `finding` is present.
    pub triggered: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finding: Option<Finding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_reason: Option<String>,

    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    pub duration_ms: u64,
}

impl RuleResult {
    /// Severity of the finding, for triggered results only.
    pub fn severity(&self) -> Option<Severity> {
        if self.triggered {
            self.finding.as_ref().map(|f| f.severity)
        } else {
            None
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PhaseCounts {
    pub total: u32,
    pub passed: u32,
    pub triggered: u32,
    pub failed: u32,
    pub skipped: u32,
}

impl PhaseCounts {
    pub fn from_results(results: &[RuleResult]) -> Self {
        let mut counts = PhaseCounts::default();
        for r in results {
            counts.total += 1;
            match r.status {
                RuleStatus::Passed => counts.passed += 1,
                RuleStatus::Triggered => counts.triggered += 1,
                RuleStatus::Failed => counts.failed += 1,
                RuleStatus::Skipped => counts.skipped += 1,
            }
        }
        counts
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PhaseResult {
    pub phase: Phase,
    pub status: PhaseStatus,
    pub counts: PhaseCounts,
    /// False iff at least one rule in this phase Failed.
    pub can_proceed: bool,
    #[serde(default)]
    pub blocking_errors: Vec<String>,
    pub rule_results: Vec<RuleResult>,

    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    pub duration_ms: u64,
}

impl PhaseResult {
    pub fn result_for(&self, rule_id: &str) -> Option<&RuleResult> {
        self.rule_results.iter().find(|r| r.rule_id == rule_id)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SeverityCounts {
    pub critical: u32,
    pub high: u32,
    pub medium: u32,
    pub low: u32,
    pub info: u32,
}

impl SeverityCounts {
    /// Counts triggered results only; failed and skipped rules carry no severity.
    pub fn from_results<'a>(results: impl IntoIterator<Item = &'a RuleResult>) -> Self {
        let mut counts = SeverityCounts::default();
        for sev in results.into_iter().filter_map(RuleResult::severity) {
            match sev {
                Severity::Critical => counts.critical += 1,
                Severity::High => counts.high += 1,
                Severity::Medium => counts.medium += 1,
                Severity::Low => counts.low += 1,
                Severity::Info => counts.info += 1,
            }
        }
        counts
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ExecutionSummary {
    pub total_rules: u32,
    /// Rules whose body was actually invoked (everything except Skipped).
    pub executed_rules: u32,
    pub triggered_rules: u32,
    pub failed_rules: u32,
    pub skipped_rules: u32,
    pub by_severity: SeverityCounts,
}

/// Final report for one engine run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ExecutionResult {
    pub execution_id: String,
    pub subject_id: String,
    pub period: String,
    pub status: ExecutionStatus,
    pub phases: Vec<PhaseResult>,
    pub summary: ExecutionSummary,
    /// Additive, saturating score in `0..=100`.
    pub risk_score: u32,
    pub risk_level: RiskLevel,

    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub finished_at: OffsetDateTime,
    pub duration_ms: u64,
}

impl ExecutionResult {
    pub fn rule_results(&self) -> impl Iterator<Item = &RuleResult> {
        self.phases.iter().flat_map(|p| p.rule_results.iter())
    }

    /// Triggered results in phase order; what evidence sections are built from.
    pub fn triggered(&self) -> impl Iterator<Item = &RuleResult> {
        self.rule_results().filter(|r| r.triggered)
    }

    pub fn phase(&self, phase: Phase) -> Option<&PhaseResult> {
        self.phases.iter().find(|p| p.phase == phase)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

/// Versioned outer shape wrapping an [`ExecutionResult`] for downstream consumers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ExecutionReport {
    pub schema: String,
    pub tool: ToolMeta,
    pub result: ExecutionResult,
}
