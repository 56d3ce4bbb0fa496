//! Stable DTOs and IDs used across the ledgerguard workspace.
//!
//! This crate is intentionally boring:
//! - data types for rule, phase, and execution results
//! - stable string IDs for the built-in rules
//! - explain registry for remediation guidance

#![forbid(unsafe_code)]

pub mod explain;
pub mod ids;
pub mod report;

pub use explain::{Explanation, lookup_explanation};
pub use report::{
    ActionPriority, EvidenceRef, ExecutionReport, ExecutionResult, ExecutionStatus,
    ExecutionSummary, Finding, Impact, Phase, PhaseCounts, PhaseResult, PhaseStatus,
    RecommendedAction, RiskLevel, RuleResult, RuleStatus, SCHEMA_EXECUTION_V1, Severity,
    SeverityCounts, ToolMeta,
};
