use super::utils::{
    action, cents, checkpoint, ensure_finite_ledger, ledger_evidence, matches_prefix,
};
use crate::cancel::CancellationToken;
use crate::error::RuleError;
use crate::model::{BalanceDirection, Context, LedgerLine};
use crate::rule::{Rule, RuleMeta};
use crate::threshold::{Magnitude, Threshold};
use async_trait::async_trait;
use ledgerguard_types::{ActionPriority, Finding, Impact, Phase, Severity, ids};

pub const ASSET_PREFIX: &str = "1";
/// Allowances and accumulated depreciation/amortization normally carry credit balances.
pub const CONTRA_ASSET_PREFIXES: &[&str] = &["1231", "1602", "1702"];

/// Asset accounts carrying a credit balance.
pub struct AbnormalBalance {
    meta: RuleMeta,
    contra: Vec<String>,
}

impl AbnormalBalance {
    pub fn new() -> Self {
        Self::with_floor(1000.0)
    }

    pub fn with_floor(floor: f64) -> Self {
        Self {
            meta: RuleMeta::new(
                ids::RULE_ANALYZE_ABNORMAL_BALANCE,
                "Abnormal asset balance",
                Phase::Analyze,
                ids::CATEGORY_RISK,
            )
            .describe("Asset accounts whose balance direction is credit.")
            .tagged(&["risk", "classification"])
            .with_threshold(Threshold::amount(floor).and_count(1)),
            contra: CONTRA_ASSET_PREFIXES.iter().map(|p| p.to_string()).collect(),
        }
    }

    fn is_plain_asset(&self, line: &LedgerLine) -> bool {
        line.account_code.starts_with(ASSET_PREFIX)
            && !matches_prefix(&line.account_code, &self.contra)
    }
}

impl Default for AbnormalBalance {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Rule for AbnormalBalance {
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

        let abnormal: Vec<(usize, &LedgerLine)> = ctx
            .ledger
            .iter()
            .enumerate()
            .filter(|(_, line)| {
                self.is_plain_asset(line) && line.direction == BalanceDirection::Credit
            })
            .collect();
        let amount = cents(abnormal.iter().map(|(_, line)| line.balance.abs()).sum::<f64>());
        let magnitude = Magnitude::amount(amount).with_count(abnormal.len() as u64);
        if !self.meta.threshold.is_material(&magnitude, ctx) {
            return Ok(None);
        }

        let accounts: Vec<&str> = abnormal
            .iter()
            .map(|(_, line)| line.account_code.as_str())
            .collect();

        Ok(Some(Finding {
            severity: Severity::High,
            title: "Asset accounts with credit balances".to_string(),
            summary: format!(
                "{} asset account(s) carry credit balances totalling {amount:.2}: {}",
                abnormal.len(),
                accounts.join(", ")
            ),
            rationale: "An asset with a credit balance usually points to misposted entries, \
                        unrecorded liabilities, or prepayments booked to the wrong side."
                .to_string(),
            actions: vec![
                action(
                    "Trace the postings that drove each account negative.",
                    ActionPriority::High,
                    "accountant",
                ),
                action(
                    "Reclassify genuine customer prepayments to liabilities.",
                    ActionPriority::Normal,
                    "accountant",
                ),
            ],
            evidence: abnormal
                .iter()
                .map(|(i, line)| ledger_evidence(*i, line))
                .collect(),
            impact: Impact {
                area: "balance sheet".to_string(),
                potential_issue: "misclassified assets and liabilities".to_string(),
                estimated_amount: Some(amount),
            },
            tags: vec!["risk".to_string()],
            fingerprint: None,
        }))
    }
}
