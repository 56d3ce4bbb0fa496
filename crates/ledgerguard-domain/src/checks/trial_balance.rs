use super::utils::{action, cents, checkpoint, ensure_finite_ledger};
use crate::cancel::CancellationToken;
use crate::error::RuleError;
use crate::model::Context;
use crate::rule::{Rule, RuleMeta};
use crate::threshold::{Magnitude, Threshold};
use async_trait::async_trait;
use ledgerguard_types::{ActionPriority, EvidenceRef, Finding, Impact, Phase, Severity, ids};

/// Total debits must equal total credits.
pub struct TrialBalance {
    meta: RuleMeta,
}

impl TrialBalance {
    pub fn new() -> Self {
        Self::with_floor(1.0)
    }

    pub fn with_floor(floor: f64) -> Self {
        Self {
            meta: RuleMeta::new(
                ids::RULE_INTAKE_TRIAL_BALANCE,
                "Trial balance",
                Phase::Intake,
                ids::CATEGORY_INTEGRITY,
            )
            .describe("Total debits across the ledger equal total credits.")
            .tagged(&["integrity", "ledger"])
            .with_threshold(Threshold::amount(floor)),
        }
    }
}

impl Default for TrialBalance {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Rule for TrialBalance {
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

        let debit = ctx.total_debit();
        let credit = ctx.total_credit();
        let difference = cents(debit - credit);
        if !self
            .meta
            .threshold
            .is_material(&Magnitude::amount(difference), ctx)
        {
            return Ok(None);
        }

        Ok(Some(Finding {
            severity: Severity::Critical,
            title: "Trial balance does not balance".to_string(),
            summary: format!(
                "total debits {debit:.2} differ from total credits {credit:.2} by {difference:.2}"
            ),
            rationale: "Double-entry bookkeeping requires every debit to be matched by a credit; \
                        an unbalanced ledger makes every downstream figure unreliable."
                .to_string(),
            actions: vec![action(
                "Reconcile the ledger export against the general journal before continuing.",
                ActionPriority::Immediate,
                "accountant",
            )],
            evidence: vec![EvidenceRef {
                source: ids::SOURCE_LEDGER.to_string(),
                reference: "totals".to_string(),
                detail: Some(format!("debit {debit:.2} credit {credit:.2}")),
            }],
            impact: Impact {
                area: "financial statements".to_string(),
                potential_issue: "misstated balances".to_string(),
                estimated_amount: Some(difference.abs()),
            },
            tags: vec!["integrity".to_string()],
            fingerprint: None,
        }))
    }
}
