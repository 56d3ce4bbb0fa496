//! Explain registry for the built-in rules.
//!
//! Maps rule IDs to human-readable explanations with remediation guidance.

use crate::ids;

/// Explanation entry for a rule.
#[derive(Debug, Clone)]
pub struct Explanation {
    /// Short description of the rule.
    pub title: &'static str,
    /// What the rule checks and when it triggers.
    pub description: &'static str,
    /// How to resolve a finding.
    pub remediation: &'static str,
    /// Which inputs the rule cites as evidence.
    pub evidence: &'static str,
}

/// Look up an explanation by rule_id.
///
/// Returns `None` if the identifier is not recognized.
pub fn lookup_explanation(identifier: &str) -> Option<Explanation> {
    match identifier {
        ids::RULE_INTAKE_TRIAL_BALANCE => Some(explain_trial_balance()),
        ids::RULE_INTAKE_BALANCE_SIGN => Some(explain_balance_sign()),
        ids::RULE_COMPUTE_VEHICLE_COST_LIMIT => Some(explain_vehicle_cost_limit()),
        ids::RULE_ANALYZE_ABNORMAL_BALANCE => Some(explain_abnormal_balance()),
        ids::RULE_CROSSCHECK_SUMMARY_TOTALS => Some(explain_summary_totals()),
        _ => None,
    }
}

/// List all built-in rule IDs, in phase order.
pub fn all_rule_ids() -> &'static [&'static str] {
    &[
        ids::RULE_INTAKE_TRIAL_BALANCE,
        ids::RULE_INTAKE_BALANCE_SIGN,
        ids::RULE_COMPUTE_VEHICLE_COST_LIMIT,
        ids::RULE_ANALYZE_ABNORMAL_BALANCE,
        ids::RULE_CROSSCHECK_SUMMARY_TOTALS,
    ]
}

fn explain_trial_balance() -> Explanation {
    Explanation {
        title: "Trial Balance",
        description: "\
Sums every debit and every credit in the ledger snapshot. A double-entry ledger must
balance; any difference at or above the materiality floor means lines are missing,
duplicated, or were exported incompletely.

Later rules that depend on a balanced ledger are skipped when this rule cannot be
evaluated.",
        remediation: "\
Re-export the ledger for the full reporting period and confirm that opening balances
and closing entries are included. Locate the unbalanced journal with the general
ledger report before re-running.",
        evidence: "Ledger totals (all lines).",
    }
}

fn explain_balance_sign() -> Explanation {
    Explanation {
        title: "Balance Sign Consistency",
        description: "\
Each normalized ledger line carries a signed balance and a balance direction.
A DEBIT line must have a positive balance, a CREDIT line a negative one, and a FLAT
line a zero balance. Disagreement means the normalization step or the source export
is inconsistent.",
        remediation: "\
Check the parser mapping for the affected accounts. Opening-balance columns are the
usual culprit when the signed balance is taken from a different column than the
movements.",
        evidence: "Ledger lines whose signed balance or direction disagree.",
    }
}

fn explain_vehicle_cost_limit() -> Explanation {
    Explanation {
        title: "Vehicle Cost Limit",
        description: "\
Compares debits posted to vehicle asset accounts against the deductible vehicle cost
limit from the reference-rate table. Amounts above the limit are not deductible and
must be adjusted in the tax computation.

The rule fails (rather than passing) when vehicle accounts are present but the rate
table has no vehicle limit.",
        remediation: "\
Record the non-deductible portion as a tax adjustment, or reclassify the cost if the
asset is not a passenger vehicle.",
        evidence: "Vehicle account lines and the vehicle_limit reference rate.",
    }
}

fn explain_abnormal_balance() -> Explanation {
    Explanation {
        title: "Abnormal Asset Balance",
        description: "\
Asset accounts normally carry a debit balance. An asset account showing a credit
balance above the materiality floor suggests misposting, an unrecorded liability, or
an overdrawn bank account that should be reclassified.",
        remediation: "\
Review postings to the listed accounts. Reclassify overdrafts to short-term borrowings
and correct misposted entries.",
        evidence: "Asset account lines with a credit balance direction.",
    }
}

fn explain_summary_totals() -> Explanation {
    Explanation {
        title: "Summary Totals Reconciliation",
        description: "\
When aggregate summary figures accompany the ledger, their total debit and total
credit must agree with the ledger lines within a small tolerance ratio. Snapshots
without summary figures are not applicable and pass.",
        remediation: "\
Regenerate the summary from the same ledger export, or identify the journals that were
posted after the summary was produced.",
        evidence: "Summary totals and computed ledger totals.",
    }
}
