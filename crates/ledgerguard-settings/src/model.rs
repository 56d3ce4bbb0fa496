use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `ledgerguard.toml` schema v1.
///
/// Every field is optional; anything left out falls back to the selected profile.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LedgerguardConfigV1 {
    /// Optional schema string for tooling (`ledgerguard.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// `standard` (default), `strict`, or `lenient`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    /// Abort the run when intake cannot proceed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_on_phase0_failure: Option<bool>,

    /// Per-rule wall-clock budget in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_timeout_ms: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_parallel_rules: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_mode: Option<bool>,

    /// Only rules in these categories run. Absent means all categories.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled_categories: Option<Vec<String>>,

    /// Only these phases run, still in fixed order. Absent means all phases.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled_phases: Option<Vec<String>>,

    /// Lowest risk level that fails the check: `low`, `medium`, `high`, `critical`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_on: Option<String>,

    /// Map of rule_id -> config.
    #[serde(default)]
    pub rules: BTreeMap<String, RuleConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scoring: Option<ScoringConfig>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RuleConfig {
    /// Switch a rule off (or back on) regardless of the profile.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScoringConfig {
    /// Severity name (`critical`, `high`, `medium`, `low`, `info`) -> weight.
    #[serde(default)]
    pub weights: BTreeMap<String, u32>,
}
