//! The `check` use case: evaluate a ledger context and produce a report.

use anyhow::Context as _;
use ledgerguard_domain::model::Context;
use ledgerguard_domain::{Engine, registry};
use ledgerguard_settings::{Overrides, ResolvedConfig};
use ledgerguard_types::{
    ExecutionReport, ExecutionResult, ExecutionStatus, RiskLevel, SCHEMA_EXECUTION_V1, ToolMeta,
    ids,
};

/// Input for the check use case.
#[derive(Clone, Debug)]
pub struct CheckInput<'a> {
    /// Context JSON document.
    pub context_json: &'a str,
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    /// CLI overrides.
    pub overrides: Overrides,
}

/// Output from the check use case.
#[derive(Clone, Debug)]
pub struct CheckOutput {
    /// The generated report.
    pub report: ExecutionReport,
    /// The resolved configuration used.
    pub resolved_config: ResolvedConfig,
}

/// Run the check use case: parse config and context, execute every phase, wrap the result.
pub fn run_check(input: CheckInput<'_>) -> anyhow::Result<CheckOutput> {
    // Parse config (empty is allowed, defaults apply).
    let cfg = if input.config_text.trim().is_empty() {
        ledgerguard_settings::LedgerguardConfigV1::default()
    } else {
        ledgerguard_settings::parse_config_toml(input.config_text).context("parse config")?
    };
    let resolved = ledgerguard_settings::resolve_config(cfg, input.overrides.clone())
        .context("resolve config")?;

    let context: Context = serde_json::from_str(input.context_json).context("parse context")?;
    tracing::debug!(
        subject = %context.subject.id,
        lines = context.ledger.len(),
        profile = %resolved.profile,
        "context loaded"
    );

    let engine = Engine::new(registry::global())
        .with_config(resolved.effective.clone())
        .with_scoring(resolved.scoring.clone());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("start async runtime")?;
    let result = runtime
        .block_on(engine.execute(context))
        .context("execute rules")?;

    Ok(CheckOutput {
        report: ExecutionReport {
            schema: SCHEMA_EXECUTION_V1.to_string(),
            tool: ToolMeta {
                name: ids::TOOL_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            result,
        },
        resolved_config: resolved,
    })
}

/// Map a result to exit code: 2 when the run failed or risk reached `fail_on`, else 0.
pub fn exit_code(result: &ExecutionResult, fail_on: RiskLevel) -> i32 {
    if result.status == ExecutionStatus::Failed || result.risk_level >= fail_on {
        2
    } else {
        0
    }
}
