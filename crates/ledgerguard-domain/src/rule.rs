use crate::cancel::CancellationToken;
use crate::error::RuleError;
use crate::model::Context;
use crate::threshold::Threshold;
use async_trait::async_trait;
use ledgerguard_types::{Finding, Phase};

/// Static definition of a rule. Immutable once the rule is registered.
#[derive(Clone, Debug)]
pub struct RuleMeta {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub phase: Phase,
    pub tags: Vec<String>,
    /// Rule ids this rule depends on. Ids that are not registered impose no constraint.
    pub dependencies: Vec<String>,
    pub threshold: Threshold,
    pub legal_refs: Vec<String>,
    pub enabled: bool,
}

impl RuleMeta {
    pub fn new(id: &str, name: &str, phase: Phase, category: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            category: category.to_string(),
            phase,
            tags: Vec::new(),
            dependencies: Vec::new(),
            threshold: Threshold::none(),
            legal_refs: Vec::new(),
            enabled: true,
        }
    }

    pub fn describe(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn depends_on(mut self, ids: &[&str]) -> Self {
        self.dependencies = ids.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn tagged(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_threshold(mut self, threshold: Threshold) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_legal_refs(mut self, refs: &[&str]) -> Self {
        self.legal_refs = refs.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// A unit of compliance logic.
///
/// Implementations must not mutate shared state: one instance serves every concurrent run.
#[async_trait]
pub trait Rule: Send + Sync {
    fn meta(&self) -> &RuleMeta;

    /// False only when a declared dependency did not pass or trigger in the previous phase.
    fn can_execute(&self, ctx: &Context) -> bool {
        unsatisfied_dependency(self.meta(), ctx).is_none()
    }

    /// Inspect the context and return a finding only if the discrepancy is material.
    ///
    /// `Ok(None)` is a legitimate negative. `Err` means the check could not complete and is
    /// recorded as Failed. Long-running bodies should poll `cancel` and bail out with
    /// [`RuleError::Cancelled`] once it fires.
    async fn evaluate(
        &self,
        ctx: &Context,
        cancel: &CancellationToken,
    ) -> Result<Option<Finding>, RuleError>;
}

/// Describe the first dependency that failed the previous-phase gate, if any.
///
/// Intake rules and rules without dependencies always pass. A dependency that did not run
/// in the previous phase (or a previous phase that did not run) is no constraint.
pub fn unsatisfied_dependency(meta: &RuleMeta, ctx: &Context) -> Option<String> {
    let previous = meta.phase.previous()?;
    meta.dependencies.iter().find_map(|dep| {
        let status = ctx.rule_status(previous, dep)?;
        if status.satisfies_dependency() {
            None
        } else {
            Some(format!("dependency '{dep}' was {status} in phase {previous}"))
        }
    })
}
