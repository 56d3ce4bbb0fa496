use ledgerguard_domain::policy::EngineConfig;
use ledgerguard_types::RiskLevel;
use std::time::Duration;

pub const PROFILES: [&str; 3] = ["standard", "strict", "lenient"];

/// Profile defaults before the config file and overrides apply.
#[derive(Clone, Debug)]
pub struct Preset {
    pub engine: EngineConfig,
    pub fail_on: RiskLevel,
}

pub fn preset(profile: &str) -> Option<Preset> {
    match profile {
        "standard" => Some(standard_profile()),
        "strict" => Some(strict_profile()),
        "lenient" => Some(lenient_profile()),
        _ => None,
    }
}

fn standard_profile() -> Preset {
    Preset {
        engine: EngineConfig::default(),
        fail_on: RiskLevel::High,
    }
}

fn strict_profile() -> Preset {
    Preset {
        engine: EngineConfig {
            rule_timeout: Duration::from_secs(10),
            ..EngineConfig::default()
        },
        fail_on: RiskLevel::Medium,
    }
}

fn lenient_profile() -> Preset {
    // Keep going after intake failures so later phases still report something.
    Preset {
        engine: EngineConfig {
            stop_on_phase0_failure: false,
            rule_timeout: Duration::from_secs(60),
            ..EngineConfig::default()
        },
        fail_on: RiskLevel::Critical,
    }
}
