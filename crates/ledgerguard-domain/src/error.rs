use thiserror::Error;
use time::Date;

/// A Context that cannot be evaluated at all. Callers must guarantee these fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    #[error("subject id is empty")]
    MissingSubjectId,

    #[error("reporting period ends ({end}) before it starts ({start})")]
    InvalidPeriod { start: Date, end: Date },
}

/// The only error `Engine::execute` returns; every per-rule failure is captured in its result.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid context: {0}")]
    InvalidContext(#[from] ContextError),
}

/// Raised by a rule body that cannot complete. Distinct from "no finding".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("missing input: {0}")]
    MissingInput(String),

    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("evaluation cancelled")]
    Cancelled,

    #[error("{0}")]
    Internal(String),
}
