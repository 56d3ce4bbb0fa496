use crate::{model::LedgerguardConfigV1, presets};
use anyhow::Context;
use ledgerguard_domain::policy::EngineConfig;
use ledgerguard_domain::scoring::ScoringPolicy;
use ledgerguard_types::{Phase, RiskLevel, Severity};
use std::collections::BTreeSet;
use std::time::Duration;

/// Command-line overrides; these win over both the profile and the config file.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub profile: Option<String>,
    pub rule_timeout_ms: Option<u64>,
    /// Replace `enabled_phases` when non-empty.
    pub phases: Vec<String>,
    /// Replace `enabled_categories` when non-empty.
    pub categories: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub profile: String,
    pub effective: EngineConfig,
    pub scoring: ScoringPolicy,
    pub fail_on: RiskLevel,
}

pub fn resolve_config(
    cfg: LedgerguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    let profile = overrides
        .profile
        .clone()
        .or(cfg.profile.clone())
        .unwrap_or_else(|| "standard".to_string());

    let preset = presets::preset(&profile).with_context(|| {
        format!(
            "unknown profile: {profile} (expected {})",
            presets::PROFILES.join("|")
        )
    })?;
    let mut effective = preset.engine;
    let mut fail_on = preset.fail_on;

    if let Some(stop) = cfg.stop_on_phase0_failure {
        effective.stop_on_phase0_failure = stop;
    }
    if let Some(ms) = overrides.rule_timeout_ms.or(cfg.rule_timeout_ms) {
        if ms == 0 {
            anyhow::bail!("rule_timeout_ms must be greater than zero");
        }
        effective.rule_timeout = Duration::from_millis(ms);
    }
    if let Some(n) = cfg.max_parallel_rules {
        if n == 0 {
            anyhow::bail!("max_parallel_rules must be at least 1");
        }
        effective.max_parallel_rules = n;
    }
    if let Some(debug) = cfg.debug_mode {
        effective.debug_mode = debug;
    }

    // Phase and category allow-lists
    let phases = if overrides.phases.is_empty() {
        cfg.enabled_phases.clone()
    } else {
        Some(overrides.phases.clone())
    };
    if let Some(names) = phases {
        effective.enabled_phases = Some(parse_phases(&names)?);
    }
    let categories = if overrides.categories.is_empty() {
        cfg.enabled_categories.clone()
    } else {
        Some(overrides.categories.clone())
    };
    if let Some(names) = categories {
        effective.enabled_categories = Some(names.into_iter().collect());
    }

    // per-rule switches
    for (rule_id, rc) in cfg.rules.iter() {
        match rc.enabled {
            Some(false) => {
                effective.disabled_rules.insert(rule_id.clone());
            }
            Some(true) => {
                effective.disabled_rules.remove(rule_id);
            }
            None => {}
        }
    }

    let mut scoring = ScoringPolicy::default();
    if let Some(sc) = &cfg.scoring {
        for (name, weight) in &sc.weights {
            let severity = parse_severity(name)
                .with_context(|| format!("invalid scoring weight key: {name}"))?;
            scoring = scoring.with_weight(severity, *weight);
        }
    }

    if let Some(fail_on_s) = cfg.fail_on.as_deref() {
        fail_on = parse_fail_on(fail_on_s)?;
    }

    Ok(ResolvedConfig {
        profile,
        effective,
        scoring,
        fail_on,
    })
}

fn parse_phases(names: &[String]) -> anyhow::Result<BTreeSet<Phase>> {
    names
        .iter()
        .map(|n| {
            Phase::parse(n).with_context(|| {
                format!("unknown phase: {n} (expected intake|compute|analyze|crosscheck)")
            })
        })
        .collect()
}

fn parse_severity(v: &str) -> anyhow::Result<Severity> {
    Severity::ALL
        .into_iter()
        .find(|s| s.as_str().eq_ignore_ascii_case(v))
        .with_context(|| format!("unknown severity: {v} (expected critical|high|medium|low|info)"))
}

fn parse_fail_on(v: &str) -> anyhow::Result<RiskLevel> {
    match v.to_ascii_lowercase().as_str() {
        "low" => Ok(RiskLevel::Low),
        "medium" => Ok(RiskLevel::Medium),
        "high" => Ok(RiskLevel::High),
        "critical" => Ok(RiskLevel::Critical),
        other => anyhow::bail!("unknown fail_on: {other} (expected low|medium|high|critical)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_config_toml;

    fn resolve(toml: &str, overrides: Overrides) -> anyhow::Result<ResolvedConfig> {
        resolve_config(parse_config_toml(toml)?, overrides)
    }

    #[test]
    fn defaults_to_standard_profile() {
        let resolved = resolve("", Overrides::default()).expect("resolve");
        assert_eq!(resolved.profile, "standard");
        assert_eq!(resolved.effective, EngineConfig::default());
        assert_eq!(resolved.fail_on, RiskLevel::High);
        assert_eq!(resolved.scoring, ScoringPolicy::default());
    }

    #[test]
    fn file_values_override_profile() {
        let resolved = resolve(
            r#"
profile = "strict"
rule_timeout_ms = 2500
stop_on_phase0_failure = false
fail_on = "critical"
"#,
            Overrides::default(),
        )
        .expect("resolve");
        assert_eq!(resolved.profile, "strict");
        assert_eq!(resolved.effective.rule_timeout, Duration::from_millis(2500));
        assert!(!resolved.effective.stop_on_phase0_failure);
        assert_eq!(resolved.fail_on, RiskLevel::Critical);
    }

    #[test]
    fn cli_overrides_win_over_file() {
        let resolved = resolve(
            r#"
profile = "strict"
rule_timeout_ms = 2500
enabled_phases = ["intake"]
"#,
            Overrides {
                profile: Some("lenient".to_string()),
                rule_timeout_ms: Some(100),
                phases: vec!["Analyze".to_string(), "compute".to_string()],
                categories: vec!["tax".to_string()],
            },
        )
        .expect("resolve");
        assert_eq!(resolved.profile, "lenient");
        assert_eq!(resolved.effective.rule_timeout, Duration::from_millis(100));
        let phases: Vec<Phase> = resolved.effective.phases().collect();
        assert_eq!(phases, vec![Phase::Compute, Phase::Analyze]);
        assert_eq!(
            resolved.effective.enabled_categories,
            Some(["tax".to_string()].into_iter().collect())
        );
    }

    #[test]
    fn rule_switches_and_weights_apply() {
        let resolved = resolve(
            r#"
[rules."analyze.abnormal_balance"]
enabled = false

[rules."intake.trial_balance"]
enabled = true

[scoring.weights]
High = 25
info = 0
"#,
            Overrides::default(),
        )
        .expect("resolve");
        assert!(
            resolved
                .effective
                .disabled_rules
                .contains("analyze.abnormal_balance")
        );
        assert_eq!(resolved.effective.disabled_rules.len(), 1);
        assert_eq!(resolved.scoring.weight(Severity::High), 25);
        assert_eq!(resolved.scoring.weight(Severity::Info), 0);
        assert_eq!(resolved.scoring.weight(Severity::Critical), 30);
    }

    #[test]
    fn invalid_values_are_errors() {
        assert!(resolve("profile = \"paranoid\"", Overrides::default()).is_err());
        assert!(resolve("rule_timeout_ms = 0", Overrides::default()).is_err());
        assert!(resolve("max_parallel_rules = 0", Overrides::default()).is_err());
        assert!(resolve("enabled_phases = [\"audit\"]", Overrides::default()).is_err());
        assert!(resolve("fail_on = \"sometimes\"", Overrides::default()).is_err());
        assert!(resolve("[scoring.weights]\nsevere = 5", Overrides::default()).is_err());
    }
}
