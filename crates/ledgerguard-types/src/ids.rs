//! Stable identifiers for built-in rules, categories, and tags.
//!
//! `rule_id` is a dotted namespace whose first segment names the phase the rule runs in.

// Rules
pub const RULE_INTAKE_TRIAL_BALANCE: &str = "intake.trial_balance";
pub const RULE_INTAKE_BALANCE_SIGN: &str = "intake.balance_sign";
pub const RULE_COMPUTE_VEHICLE_COST_LIMIT: &str = "compute.vehicle_cost_limit";
pub const RULE_ANALYZE_ABNORMAL_BALANCE: &str = "analyze.abnormal_balance";
pub const RULE_CROSSCHECK_SUMMARY_TOTALS: &str = "crosscheck.summary_totals";

// Categories
pub const CATEGORY_INTEGRITY: &str = "integrity";
pub const CATEGORY_TAX: &str = "tax";
pub const CATEGORY_RISK: &str = "risk";
pub const CATEGORY_RECONCILIATION: &str = "reconciliation";

// Reference-rate keys
pub const RATE_VEHICLE_LIMIT: &str = "vehicle_limit";

// Evidence sources
pub const SOURCE_LEDGER: &str = "ledger";
pub const SOURCE_SUMMARY: &str = "summary";
pub const SOURCE_RATES: &str = "rates";

// Tool-level
pub const TOOL_NAME: &str = "ledgerguard";
pub const SKIP_REASON_CANCELLED: &str = "run cancelled";
