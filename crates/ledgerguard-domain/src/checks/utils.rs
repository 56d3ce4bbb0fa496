use crate::cancel::CancellationToken;
use crate::error::RuleError;
use crate::model::{Context, LedgerLine};
use ledgerguard_types::{ActionPriority, EvidenceRef, RecommendedAction, ids};

/// Bail out early once the run or the rule's own budget has been cancelled.
pub fn checkpoint(cancel: &CancellationToken) -> Result<(), RuleError> {
    if cancel.is_cancelled() {
        return Err(RuleError::Cancelled);
    }
    Ok(())
}

/// Every ledger amount must be a finite number before totals mean anything.
pub fn ensure_finite_ledger(ctx: &Context) -> Result<(), RuleError> {
    match ctx.ledger.iter().position(|line| !line.is_finite()) {
        Some(i) => Err(RuleError::MalformedInput(format!(
            "ledger line[{i}] (account {}) has a non-finite amount",
            ctx.ledger[i].account_code
        ))),
        None => Ok(()),
    }
}

pub fn ledger_evidence(index: usize, line: &LedgerLine) -> EvidenceRef {
    EvidenceRef {
        source: ids::SOURCE_LEDGER.to_string(),
        reference: format!("line[{index}]"),
        detail: Some(format!(
            "account {} {} balance {:.2}",
            line.account_code, line.account_name, line.balance
        )),
    }
}

pub fn summary_evidence(field: &str, value: f64) -> EvidenceRef {
    EvidenceRef {
        source: ids::SOURCE_SUMMARY.to_string(),
        reference: field.to_string(),
        detail: Some(format!("{value:.2}")),
    }
}

pub fn rate_evidence(key: &str, value: f64) -> EvidenceRef {
    EvidenceRef {
        source: ids::SOURCE_RATES.to_string(),
        reference: format!("limits.{key}"),
        detail: Some(format!("{value:.2}")),
    }
}

pub fn action(description: &str, priority: ActionPriority, role: &str) -> RecommendedAction {
    RecommendedAction {
        description: description.to_string(),
        priority,
        assignee_role: role.to_string(),
    }
}

pub fn matches_prefix(code: &str, prefixes: &[String]) -> bool {
    prefixes.iter().any(|p| code.starts_with(p.as_str()))
}

/// Round to cents so reported figures do not carry float noise.
pub fn cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
