use crate::error::ContextError;
use ledgerguard_types::{Phase, PhaseResult, RuleStatus};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::{Date, OffsetDateTime};

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// Read-only snapshot every rule in one run inspects.
///
/// Upstream collaborators (document parsers, rate fetchers) fill the input fields; the
/// engine owns `execution_id`, `executed_at`, and `phase_results` for the lifetime of a run.
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct Context {
    pub subject: Subject,
    pub period: Period,

    /// Normalized ledger lines in source order.
    #[serde(default)]
    pub ledger: Vec<LedgerLine>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<SummaryFigures>,

    #[serde(default)]
    pub rates: ReferenceRates,

    #[serde(skip)]
    pub execution_id: String,
    #[serde(skip)]
    pub executed_at: Option<OffsetDateTime>,
    /// Results of phases already completed in this run.
    #[serde(skip)]
    pub phase_results: BTreeMap<Phase, PhaseResult>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct Subject {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
pub struct Period {
    #[schemars(with = "String")]
    #[serde(with = "iso_date")]
    pub start: Date,
    #[schemars(with = "String")]
    #[serde(with = "iso_date")]
    pub end: Date,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Default for Period {
    fn default() -> Self {
        Self {
            start: Date::MIN,
            end: Date::MIN,
            label: None,
        }
    }
}

impl Period {
    /// The label if one was supplied, otherwise `start..end`.
    pub fn describe(&self) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => format!("{}..{}", self.start, self.end),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BalanceDirection {
    Debit,
    Credit,
    /// Zero balance.
    Flat,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LedgerLine {
    pub account_code: String,
    pub account_name: String,
    #[serde(default)]
    pub debit: f64,
    #[serde(default)]
    pub credit: f64,
    /// Signed closing balance: positive for debit balances, negative for credit balances.
    #[serde(default)]
    pub balance: f64,
    pub direction: BalanceDirection,
}

impl LedgerLine {
    pub fn is_finite(&self) -> bool {
        self.debit.is_finite() && self.credit.is_finite() && self.balance.is_finite()
    }
}

/// Optional aggregate figures supplied alongside the ledger.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SummaryFigures {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_debit: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_credit: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub net_income: Option<f64>,
}

/// Reference-rate table, grouped by kind. Treated as an immutable input.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReferenceRates {
    #[serde(default)]
    pub interest: BTreeMap<String, f64>,
    #[serde(default)]
    pub tax: BTreeMap<String, f64>,
    #[serde(default)]
    pub fx: BTreeMap<String, f64>,
    /// Statutory limits such as `vehicle_limit`.
    #[serde(default)]
    pub limits: BTreeMap<String, f64>,
}

impl ReferenceRates {
    pub fn limit(&self, key: &str) -> Option<f64> {
        self.limits.get(key).copied()
    }
}

impl Context {
    /// Reject snapshots the engine cannot evaluate at all.
    pub fn validate(&self) -> Result<(), ContextError> {
        if self.subject.id.trim().is_empty() {
            return Err(ContextError::MissingSubjectId);
        }
        if self.period.end < self.period.start {
            return Err(ContextError::InvalidPeriod {
                start: self.period.start,
                end: self.period.end,
            });
        }
        Ok(())
    }

    pub fn total_debit(&self) -> f64 {
        self.ledger.iter().map(|l| l.debit).sum()
    }

    pub fn total_credit(&self) -> f64 {
        self.ledger.iter().map(|l| l.credit).sum()
    }

    pub fn phase_result(&self, phase: Phase) -> Option<&PhaseResult> {
        self.phase_results.get(&phase)
    }

    /// Status of `rule_id` in an already-completed phase, if it ran there.
    pub fn rule_status(&self, phase: Phase, rule_id: &str) -> Option<RuleStatus> {
        self.phase_result(phase)
            .and_then(|p| p.result_for(rule_id))
            .map(|r| r.status)
    }
}
