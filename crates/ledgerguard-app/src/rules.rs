//! The `rules` use case: list what the registry would run.

use ledgerguard_domain::RuleRegistry;
use ledgerguard_types::Phase;

/// One registered rule, as shown by `ledgerguard rules`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleInfo {
    pub id: String,
    pub name: String,
    pub phase: Phase,
    pub category: String,
    pub dependencies: Vec<String>,
    pub enabled: bool,
}

/// Rules in phase order, then registration order within a phase.
pub fn list_rules(registry: &RuleRegistry) -> Vec<RuleInfo> {
    let mut rules: Vec<RuleInfo> = registry
        .iter()
        .map(|rule| {
            let meta = rule.meta();
            RuleInfo {
                id: meta.id.clone(),
                name: meta.name.clone(),
                phase: meta.phase,
                category: meta.category.clone(),
                dependencies: meta.dependencies.clone(),
                enabled: meta.enabled,
            }
        })
        .collect();
    // Stable sort keeps registration order inside each phase.
    rules.sort_by_key(|r| r.phase);
    rules
}

pub fn format_rules(rules: &[RuleInfo]) -> String {
    let width = rules.iter().map(|r| r.id.len()).max().unwrap_or(0);
    let mut out = String::new();
    for rule in rules {
        let mut line = format!(
            "{:<width$}  {:<10}  {:<14}",
            rule.id,
            rule.phase.as_str(),
            rule.category
        );
        if !rule.dependencies.is_empty() {
            line.push_str(&format!("  after {}", rule.dependencies.join(", ")));
        }
        if !rule.enabled {
            line.push_str("  (disabled)");
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
