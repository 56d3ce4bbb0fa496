//! Risk scoring policy.
//!
//! The score is additive and saturating: the sum of a per-severity weight over every
//! triggered result, clamped to `0..=MAX_RISK_SCORE`. It does not depend on evaluation
//! order, so the same set of findings always yields the same score.

use ledgerguard_types::{RiskLevel, RuleResult, Severity};
use std::collections::BTreeMap;

pub const MAX_RISK_SCORE: u32 = 100;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoringPolicy {
    weights: BTreeMap<Severity, u32>,
    /// `(minimum score, level)` pairs, highest minimum first.
    levels: Vec<(u32, RiskLevel)>,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        let weights = BTreeMap::from([
            (Severity::Critical, 30),
            (Severity::High, 20),
            (Severity::Medium, 10),
            (Severity::Low, 3),
            (Severity::Info, 1),
        ]);
        Self::new(
            weights,
            vec![
                (70, RiskLevel::Critical),
                (50, RiskLevel::High),
                (25, RiskLevel::Medium),
            ],
        )
    }
}

impl ScoringPolicy {
    /// Severities missing from `weights` weigh nothing. Scores below every threshold are Low.
    pub fn new(weights: BTreeMap<Severity, u32>, mut levels: Vec<(u32, RiskLevel)>) -> Self {
        levels.sort_by(|a, b| b.0.cmp(&a.0));
        Self { weights, levels }
    }

    pub fn with_weight(mut self, severity: Severity, weight: u32) -> Self {
        self.weights.insert(severity, weight);
        self
    }

    pub fn weight(&self, severity: Severity) -> u32 {
        self.weights.get(&severity).copied().unwrap_or(0)
    }

    pub fn levels(&self) -> &[(u32, RiskLevel)] {
        &self.levels
    }

    pub fn score_severities(&self, severities: impl IntoIterator<Item = Severity>) -> u32 {
        severities
            .into_iter()
            .fold(0u32, |acc, sev| acc.saturating_add(self.weight(sev)))
            .min(MAX_RISK_SCORE)
    }

    /// Score over triggered results only; failed and skipped rules contribute nothing.
    pub fn score<'a>(&self, results: impl IntoIterator<Item = &'a RuleResult>) -> u32 {
        self.score_severities(results.into_iter().filter_map(RuleResult::severity))
    }

    pub fn level(&self, score: u32) -> RiskLevel {
        self.levels
            .iter()
            .find(|(min, _)| score >= *min)
            .map(|(_, level)| *level)
            .unwrap_or(RiskLevel::Low)
    }
}
