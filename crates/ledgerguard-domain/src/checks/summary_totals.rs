use super::utils::{action, cents, checkpoint, ensure_finite_ledger, summary_evidence};
use crate::cancel::CancellationToken;
use crate::error::RuleError;
use crate::model::Context;
use crate::rule::{Rule, RuleMeta};
use crate::threshold::{Magnitude, Threshold};
use async_trait::async_trait;
use ledgerguard_types::{ActionPriority, EvidenceRef, Finding, Impact, Phase, Severity, ids};

/// Summary totals must agree with the ledger within a relative tolerance.
pub struct SummaryTotals {
    meta: RuleMeta,
}

impl SummaryTotals {
    pub fn new() -> Self {
        Self::with_ratio(0.005)
    }

    pub fn with_ratio(ratio: f64) -> Self {
        Self {
            meta: RuleMeta::new(
                ids::RULE_CROSSCHECK_SUMMARY_TOTALS,
                "Summary totals",
                Phase::Crosscheck,
                ids::CATEGORY_RECONCILIATION,
            )
            .describe("Reported summary debit and credit totals agree with the ledger.")
            .tagged(&["reconciliation"])
            .with_threshold(Threshold::ratio(ratio)),
        }
    }
}

impl Default for SummaryTotals {
    fn default() -> Self {
        Self::new()
    }
}

struct Gap {
    field: &'static str,
    reported: f64,
    ledger: f64,
    ratio: f64,
}

fn relative_gap(reported: f64, ledger: f64) -> f64 {
    let base = ledger.abs().max(reported.abs());
    if base == 0.0 {
        0.0
    } else {
        (reported - ledger).abs() / base
    }
}

#[async_trait]
impl Rule for SummaryTotals {
    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    async fn evaluate(
        &self,
        ctx: &Context,
        cancel: &CancellationToken,
    ) -> Result<Option<Finding>, RuleError> {
        checkpoint(cancel)?;
        let Some(summary) = &ctx.summary else {
            return Ok(None);
        };
        ensure_finite_ledger(ctx)?;

        let pairs = [
            ("total_debit", summary.total_debit, ctx.total_debit()),
            ("total_credit", summary.total_credit, ctx.total_credit()),
        ];
        let mut gaps: Vec<Gap> = Vec::new();
        for (field, reported, ledger) in pairs {
            let Some(reported) = reported else { continue };
            if !reported.is_finite() {
                return Err(RuleError::MalformedInput(format!(
                    "summary.{field} is not a finite number"
                )));
            }
            let ratio = relative_gap(reported, ledger);
            let magnitude = Magnitude::amount(reported - ledger).with_ratio(ratio);
            if self.meta.threshold.is_material(&magnitude, ctx) {
                gaps.push(Gap {
                    field,
                    reported,
                    ledger,
                    ratio,
                });
            }
        }
        if gaps.is_empty() {
            return Ok(None);
        }

        let largest = gaps
            .iter()
            .map(|g| (g.reported - g.ledger).abs())
            .fold(0.0_f64, f64::max);
        let detail: Vec<String> = gaps
            .iter()
            .map(|g| {
                format!(
                    "{} reported {:.2} vs ledger {:.2} ({:.2}%)",
                    g.field,
                    g.reported,
                    g.ledger,
                    g.ratio * 100.0
                )
            })
            .collect();
        let mut evidence: Vec<EvidenceRef> = gaps
            .iter()
            .map(|g| summary_evidence(g.field, g.reported))
            .collect();
        evidence.push(EvidenceRef {
            source: ids::SOURCE_LEDGER.to_string(),
            reference: "totals".to_string(),
            detail: Some(format!(
                "debit {:.2} credit {:.2}",
                ctx.total_debit(),
                ctx.total_credit()
            )),
        });

        Ok(Some(Finding {
            severity: Severity::High,
            title: "Summary totals disagree with the ledger".to_string(),
            summary: detail.join("; "),
            rationale: "Reported statements must be derived from the same ledger that was \
                        evaluated; a gap means one of them is stale or incomplete."
                .to_string(),
            actions: vec![action(
                "Regenerate the summary from the current ledger and compare again.",
                ActionPriority::High,
                "accountant",
            )],
            evidence,
            impact: Impact {
                area: "financial reporting".to_string(),
                potential_issue: "statements not supported by the books".to_string(),
                estimated_amount: Some(cents(largest)),
            },
            tags: vec!["reconciliation".to_string()],
            fingerprint: None,
        }))
    }
}
