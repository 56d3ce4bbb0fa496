use crate::rule::RuleMeta;
use ledgerguard_types::Phase;
use std::collections::BTreeSet;
use std::time::Duration;

pub const DEFAULT_RULE_TIMEOUT_MS: u64 = 30_000;

/// Run-level engine configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Abort the run when the intake phase cannot proceed.
    pub stop_on_phase0_failure: bool,
    /// Wall-clock budget for a single rule evaluation.
    pub rule_timeout: Duration,
    /// Advisory; rules currently run sequentially.
    pub max_parallel_rules: usize,
    /// Verbosity only.
    pub debug_mode: bool,
    /// Allow-list of rule categories. `None` runs every category.
    pub enabled_categories: Option<BTreeSet<String>>,
    /// Allow-list of phases. `None` runs every phase.
    pub enabled_phases: Option<BTreeSet<Phase>>,
    /// Rule ids switched off by configuration, on top of each rule's own flag.
    pub disabled_rules: BTreeSet<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            stop_on_phase0_failure: true,
            rule_timeout: Duration::from_millis(DEFAULT_RULE_TIMEOUT_MS),
            max_parallel_rules: 1,
            debug_mode: false,
            enabled_categories: None,
            enabled_phases: None,
            disabled_rules: BTreeSet::new(),
        }
    }
}

impl EngineConfig {
    /// Phases to run, always in fixed order.
    pub fn phases(&self) -> impl Iterator<Item = Phase> + '_ {
        Phase::ALL.into_iter().filter(|p| self.phase_enabled(*p))
    }

    pub fn phase_enabled(&self, phase: Phase) -> bool {
        self.enabled_phases
            .as_ref()
            .is_none_or(|set| set.contains(&phase))
    }

    pub fn rule_selected(&self, meta: &RuleMeta) -> bool {
        if self.disabled_rules.contains(&meta.id) {
            return false;
        }
        self.enabled_categories
            .as_ref()
            .is_none_or(|set| set.contains(&meta.category))
    }
}
