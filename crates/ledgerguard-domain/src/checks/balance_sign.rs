use super::utils::{action, cents, checkpoint, ensure_finite_ledger, ledger_evidence};
use crate::cancel::CancellationToken;
use crate::error::RuleError;
use crate::model::{BalanceDirection, Context, LedgerLine};
use crate::rule::{Rule, RuleMeta};
use crate::threshold::{Magnitude, Threshold};
use async_trait::async_trait;
use ledgerguard_types::{ActionPriority, Finding, Impact, Phase, Severity, ids};

/// A line's stated direction must agree with the sign of its balance.
pub struct BalanceSign {
    meta: RuleMeta,
}

impl BalanceSign {
    pub fn new() -> Self {
        Self {
            meta: RuleMeta::new(
                ids::RULE_INTAKE_BALANCE_SIGN,
                "Balance sign consistency",
                Phase::Intake,
                ids::CATEGORY_INTEGRITY,
            )
            .describe("Each ledger line's balance direction agrees with its signed balance.")
            .tagged(&["integrity", "normalization"])
            .with_threshold(Threshold::count(1).and_amount(0.01)),
        }
    }
}

impl Default for BalanceSign {
    fn default() -> Self {
        Self::new()
    }
}

fn direction_mismatch(line: &LedgerLine) -> bool {
    match line.direction {
        BalanceDirection::Debit => line.balance < 0.0,
        BalanceDirection::Credit => line.balance > 0.0,
        BalanceDirection::Flat => line.balance != 0.0,
    }
}

#[async_trait]
impl Rule for BalanceSign {
    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    async fn evaluate(
        &self,
        ctx: &Context,
        cancel: &CancellationToken,
    ) -> Result<Option<Finding>, RuleError> {
        checkpoint(cancel)?;
        ensure_finite_ledger(ctx)?;

        let offending: Vec<(usize, &LedgerLine)> = ctx
            .ledger
            .iter()
            .enumerate()
            .filter(|(_, line)| direction_mismatch(line))
            .collect();
        let amount = cents(offending.iter().map(|(_, l)| l.balance.abs()).sum::<f64>());
        let magnitude = Magnitude::amount(amount).with_count(offending.len() as u64);
        if !self.meta.threshold.is_material(&magnitude, ctx) {
            return Ok(None);
        }

        Ok(Some(Finding {
            severity: Severity::Medium,
            title: "Balance direction disagrees with balance sign".to_string(),
            summary: format!(
                "{} ledger line(s) carry a direction that contradicts their balance ({amount:.2} in total)",
                offending.len()
            ),
            rationale: "Downstream rules read the balance direction to classify accounts; \
                        a contradicting direction produces wrong classifications."
                .to_string(),
            actions: vec![action(
                "Review the ledger normalization mapping for the listed accounts.",
                ActionPriority::Normal,
                "accountant",
            )],
            evidence: offending
                .iter()
                .map(|(i, line)| ledger_evidence(*i, line))
                .collect(),
            impact: Impact {
                area: "ledger data quality".to_string(),
                potential_issue: "misclassified balances".to_string(),
                estimated_amount: Some(amount),
            },
            tags: vec!["integrity".to_string()],
            fingerprint: None,
        }))
    }
}
