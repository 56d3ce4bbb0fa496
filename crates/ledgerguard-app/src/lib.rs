//! Use case orchestration for ledgerguard.
//!
//! This crate is the application layer: it wires settings, the rule registry, and the
//! engine together. The CLI crate depends on it and only handles argument parsing and I/O.

#![forbid(unsafe_code)]

mod check;
mod explain;
mod render;
mod report;
mod rules;
mod schema;

pub use check::{CheckInput, CheckOutput, exit_code, run_check};
pub use explain::{ExplainOutput, format_explanation, format_not_found, run_explain};
pub use render::render_markdown;
pub use report::{parse_report_json, serialize_report, write_report};
pub use rules::{RuleInfo, format_rules, list_rules};
pub use schema::{SchemaKind, schema_json};
