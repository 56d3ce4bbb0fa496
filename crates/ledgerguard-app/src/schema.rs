//! JSON Schemas for the documents ledgerguard reads and writes.

use anyhow::Context as _;
use ledgerguard_domain::model::Context;
use ledgerguard_settings::LedgerguardConfigV1;
use ledgerguard_types::ExecutionReport;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchemaKind {
    /// `ledgerguard.toml`
    Config,
    /// `ledgerguard.execution.v1` report
    Report,
    /// Context input document
    Context,
}

impl SchemaKind {
    pub fn parse(v: &str) -> anyhow::Result<Self> {
        match v {
            "config" => Ok(Self::Config),
            "report" => Ok(Self::Report),
            "context" => Ok(Self::Context),
            other => anyhow::bail!("unknown schema: {other} (expected config|report|context)"),
        }
    }
}

/// Pretty-printed JSON Schema for `kind`.
pub fn schema_json(kind: SchemaKind) -> anyhow::Result<String> {
    let schema = match kind {
        SchemaKind::Config => schemars::schema_for!(LedgerguardConfigV1),
        SchemaKind::Report => schemars::schema_for!(ExecutionReport),
        SchemaKind::Context => schemars::schema_for!(Context),
    };
    serde_json::to_string_pretty(&schema).context("serialize schema")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_renders_an_object_schema() {
        for kind in [SchemaKind::Config, SchemaKind::Report, SchemaKind::Context] {
            let text = schema_json(kind).expect("schema");
            let value: serde_json::Value = serde_json::from_str(&text).expect("json");
            assert!(value.get("properties").is_some(), "{kind:?}");
        }
    }

    #[test]
    fn context_schema_omits_engine_owned_fields() {
        let text = schema_json(SchemaKind::Context).expect("schema");
        assert!(text.contains("\"ledger\""));
        assert!(!text.contains("phase_results"));
        assert!(!text.contains("execution_id"));
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert!(SchemaKind::parse("receipt").is_err());
        assert_eq!(SchemaKind::parse("report").expect("kind"), SchemaKind::Report);
    }
}
