use anyhow::Context;
use camino::Utf8Path;
use ledgerguard_types::{ExecutionReport, SCHEMA_EXECUTION_V1};

pub fn serialize_report(report: &ExecutionReport) -> anyhow::Result<Vec<u8>> {
    serde_json::to_vec_pretty(report).context("serialize execution report")
}

/// Parse a report previously written by `check`. Unknown schemas are rejected.
pub fn parse_report_json(text: &str) -> anyhow::Result<ExecutionReport> {
    let value: serde_json::Value = serde_json::from_str(text).context("parse report json")?;

    let schema = value
        .get("schema")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    if schema != SCHEMA_EXECUTION_V1 {
        anyhow::bail!("unknown report schema: {schema:?} (expected {SCHEMA_EXECUTION_V1})");
    }

    serde_json::from_value(value).context("parse ledgerguard execution report")
}

/// Write `report` to `path`, creating parent directories as needed.
pub fn write_report(path: &Utf8Path, report: &ExecutionReport) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_str().is_empty()
    {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {parent}"))?;
    }
    let data = serialize_report(report)?;
    std::fs::write(path, data).with_context(|| format!("write report: {path}"))?;
    Ok(())
}
