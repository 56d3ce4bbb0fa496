use crate::cancel::CancellationToken;
use crate::error::RuleError;
use crate::model::{BalanceDirection, Context, LedgerLine, Period, Subject};
use crate::registry::RuleRegistry;
use crate::rule::{Rule, RuleMeta};
use async_trait::async_trait;
use ledgerguard_types::{
    Finding, Impact, Phase, PhaseCounts, PhaseResult, PhaseStatus, RuleResult, RuleStatus,
    Severity,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use time::OffsetDateTime;
use time::macros::date;

pub fn line(code: &str, name: &str, debit: f64, credit: f64) -> LedgerLine {
    let balance = debit - credit;
    let direction = if balance > 0.0 {
        BalanceDirection::Debit
    } else if balance < 0.0 {
        BalanceDirection::Credit
    } else {
        BalanceDirection::Flat
    };
    LedgerLine {
        account_code: code.to_string(),
        account_name: name.to_string(),
        debit,
        credit,
        balance,
        direction,
    }
}

pub fn context(ledger: Vec<LedgerLine>) -> Context {
    Context {
        subject: Subject {
            id: "acme".to_string(),
            name: Some("Acme Ltd".to_string()),
            tax_id: None,
        },
        period: Period {
            start: date!(2024 - 01 - 01),
            end: date!(2024 - 12 - 31),
            label: Some("FY2024".to_string()),
        },
        ledger,
        ..Context::default()
    }
}

pub fn finding(severity: Severity) -> Finding {
    Finding {
        severity,
        title: "Test finding".to_string(),
        summary: "Something is off".to_string(),
        rationale: "Because the test said so".to_string(),
        actions: Vec::new(),
        evidence: Vec::new(),
        impact: Impact {
            area: "test".to_string(),
            potential_issue: "none".to_string(),
            estimated_amount: None,
        },
        tags: Vec::new(),
        fingerprint: None,
    }
}

pub fn rule_result(id: &str, phase: Phase, status: RuleStatus) -> RuleResult {
    let triggered = status == RuleStatus::Triggered;
    RuleResult {
        rule_id: id.to_string(),
        rule_name: id.to_string(),
        phase,
        category: "test".to_string(),
        status,
        triggered,
        finding: triggered.then(|| finding(Severity::Medium)),
        error: (status == RuleStatus::Failed).then(|| "failed".to_string()),
        skip_reason: None,
        started_at: OffsetDateTime::UNIX_EPOCH,
        duration_ms: 0,
    }
}

pub fn phase_result_with(phase: Phase, rule_results: Vec<RuleResult>) -> PhaseResult {
    let counts = PhaseCounts::from_results(&rule_results);
    PhaseResult {
        phase,
        status: PhaseStatus::Completed,
        can_proceed: counts.failed == 0,
        counts,
        blocking_errors: Vec::new(),
        rule_results,
        started_at: OffsetDateTime::UNIX_EPOCH,
        duration_ms: 0,
    }
}

#[derive(Clone, Debug)]
pub enum Behavior {
    Pass,
    Trigger(Severity),
    Fail(&'static str),
    MissingInput,
    Hang,
    Panic,
    /// Returns a finding with an empty title.
    Malformed,
    SleepThen(Duration, Severity),
    /// Holds its thread for the duration without yielding, then triggers.
    BlockThen(Duration, Severity),
}

/// A rule whose outcome is fixed up front.
pub struct ScriptedRule {
    meta: RuleMeta,
    behavior: Behavior,
    log: Option<Arc<Mutex<Vec<String>>>>,
}

impl ScriptedRule {
    pub fn new(id: &str, phase: Phase, behavior: Behavior) -> Self {
        Self::with_meta(RuleMeta::new(id, id, phase, "test"), behavior)
    }

    pub fn with_meta(meta: RuleMeta, behavior: Behavior) -> Self {
        Self {
            meta,
            behavior,
            log: None,
        }
    }

    pub fn depends_on(mut self, ids: &[&str]) -> Self {
        self.meta = self.meta.depends_on(ids);
        self
    }

    pub fn category(mut self, category: &str) -> Self {
        self.meta.category = category.to_string();
        self
    }

    /// Append this rule's id to `log` whenever its body runs.
    pub fn recording(mut self, log: &Arc<Mutex<Vec<String>>>) -> Self {
        self.log = Some(Arc::clone(log));
        self
    }
}

#[async_trait]
impl Rule for ScriptedRule {
    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    async fn evaluate(
        &self,
        _ctx: &Context,
        _cancel: &CancellationToken,
    ) -> Result<Option<Finding>, RuleError> {
        if let Some(log) = &self.log {
            log.lock().unwrap().push(self.meta.id.clone());
        }
        match &self.behavior {
            Behavior::Pass => Ok(None),
            Behavior::Trigger(sev) => Ok(Some(finding(*sev))),
            Behavior::Fail(msg) => Err(RuleError::Internal(msg.to_string())),
            Behavior::MissingInput => Err(RuleError::MissingInput("test input".to_string())),
            Behavior::Hang => {
                std::future::pending::<()>().await;
                Ok(None)
            }
            Behavior::Panic => panic!("scripted panic"),
            Behavior::Malformed => {
                let mut f = finding(Severity::High);
                f.title.clear();
                Ok(Some(f))
            }
            Behavior::SleepThen(delay, sev) => {
                tokio::time::sleep(*delay).await;
                Ok(Some(finding(*sev)))
            }
            Behavior::BlockThen(delay, sev) => {
                std::thread::sleep(*delay);
                Ok(Some(finding(*sev)))
            }
        }
    }
}

pub fn registry_of(rules: Vec<ScriptedRule>) -> RuleRegistry {
    let mut registry = RuleRegistry::new();
    for rule in rules {
        registry.register(rule);
    }
    registry
}

pub fn ids_of(rules: &[Arc<dyn Rule>]) -> Vec<String> {
    rules.iter().map(|r| r.meta().id.clone()).collect()
}
