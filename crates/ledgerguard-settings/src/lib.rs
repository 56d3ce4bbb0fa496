//! Config parsing and profile/preset resolution.
//!
//! This crate is IO-free: it parses and resolves configuration provided as strings.

#![forbid(unsafe_code)]

mod model;
mod presets;
mod resolve;

pub use model::{LedgerguardConfigV1, RuleConfig, ScoringConfig};
pub use presets::PROFILES;
pub use resolve::{Overrides, ResolvedConfig};

/// Parse `ledgerguard.toml` (or equivalent) into a typed model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<LedgerguardConfigV1> {
    let cfg: LedgerguardConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

/// Resolve the engine configuration, scoring policy, and fail threshold
/// (profile, then file, then overrides).
pub fn resolve_config(
    cfg: LedgerguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    resolve::resolve_config(cfg, overrides)
}
