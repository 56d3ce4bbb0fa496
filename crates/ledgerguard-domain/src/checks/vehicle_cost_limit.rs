use super::utils::{
    action, cents, checkpoint, ensure_finite_ledger, ledger_evidence, matches_prefix,
    rate_evidence,
};
use crate::cancel::CancellationToken;
use crate::error::RuleError;
use crate::model::{Context, LedgerLine};
use crate::rule::{Rule, RuleMeta};
use crate::threshold::{Magnitude, Threshold};
use async_trait::async_trait;
use ledgerguard_types::{ActionPriority, Finding, Impact, Phase, Severity, ids};

pub const DEFAULT_VEHICLE_PREFIXES: &[&str] = &["1601"];

/// Vehicle acquisitions above the deductible cost ceiling.
///
/// Each vehicle line whose debit exceeds `limits.vehicle_limit` contributes the excess.
pub struct VehicleCostLimit {
    meta: RuleMeta,
    prefixes: Vec<String>,
}

impl VehicleCostLimit {
    pub fn new() -> Self {
        Self::with_prefixes(DEFAULT_VEHICLE_PREFIXES)
    }

    pub fn with_prefixes(prefixes: &[&str]) -> Self {
        Self {
            meta: RuleMeta::new(
                ids::RULE_COMPUTE_VEHICLE_COST_LIMIT,
                "Vehicle cost limit",
                Phase::Compute,
                ids::CATEGORY_TAX,
            )
            .describe("Vehicle acquisitions whose cost exceeds the deductible ceiling.")
            .tagged(&["tax", "fixed-assets"])
            .depends_on(&[ids::RULE_INTAKE_TRIAL_BALANCE])
            .with_threshold(Threshold::amount(0.01).and_count(1))
            .with_legal_refs(&["corporate income tax: vehicle cost ceiling"]),
            prefixes: prefixes.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl Default for VehicleCostLimit {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Rule for VehicleCostLimit {
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

        let vehicles: Vec<(usize, &LedgerLine)> = ctx
            .ledger
            .iter()
            .enumerate()
            .filter(|(_, line)| matches_prefix(&line.account_code, &self.prefixes))
            .collect();
        if vehicles.is_empty() {
            return Ok(None);
        }

        let limit = ctx.rates.limit(ids::RATE_VEHICLE_LIMIT).ok_or_else(|| {
            RuleError::MissingInput(format!("rates.limits.{}", ids::RATE_VEHICLE_LIMIT))
        })?;
        if !limit.is_finite() || limit < 0.0 {
            return Err(RuleError::MalformedInput(format!(
                "rates.limits.{} must be a non-negative number",
                ids::RATE_VEHICLE_LIMIT
            )));
        }

        let over: Vec<(usize, &LedgerLine)> = vehicles
            .into_iter()
            .filter(|(_, line)| line.debit > limit)
            .collect();
        let excess = cents(over.iter().map(|(_, line)| line.debit - limit).sum::<f64>());
        let magnitude = Magnitude::amount(excess).with_count(over.len() as u64);
        if !self.meta.threshold.is_material(&magnitude, ctx) {
            return Ok(None);
        }

        let mut evidence = vec![rate_evidence(ids::RATE_VEHICLE_LIMIT, limit)];
        evidence.extend(over.iter().map(|(i, line)| ledger_evidence(*i, line)));

        Ok(Some(Finding {
            severity: Severity::Medium,
            title: "Vehicle cost exceeds deductible limit".to_string(),
            summary: format!(
                "{} vehicle acquisition(s) exceed the {limit:.2} ceiling by {excess:.2}",
                over.len()
            ),
            rationale: "Depreciation on the part of a vehicle's cost above the ceiling is not \
                        deductible and must be added back in the tax computation."
                .to_string(),
            actions: vec![action(
                "Add back depreciation on the excess cost in the tax computation.",
                ActionPriority::High,
                "tax_advisor",
            )],
            evidence,
            impact: Impact {
                area: "corporate income tax".to_string(),
                potential_issue: "overstated deductible expense".to_string(),
                estimated_amount: Some(excess),
            },
            tags: vec!["tax".to_string()],
            fingerprint: None,
        }))
    }
}
