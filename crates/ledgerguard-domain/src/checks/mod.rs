//! Built-in rules.
//!
//! Rules supplied by other crates implement the same [`Rule`](crate::rule::Rule) trait and
//! are registered the same way.

use crate::registry::RuleRegistry;

mod abnormal_balance;
mod balance_sign;
mod summary_totals;
mod trial_balance;
mod utils;
mod vehicle_cost_limit;

pub use abnormal_balance::AbnormalBalance;
pub use balance_sign::BalanceSign;
pub use summary_totals::SummaryTotals;
pub use trial_balance::TrialBalance;
pub use vehicle_cost_limit::VehicleCostLimit;

pub fn register_builtin(registry: &mut RuleRegistry) {
    registry.register(TrialBalance::new());
    registry.register(BalanceSign::new());
    registry.register(VehicleCostLimit::new());
    registry.register(AbnormalBalance::new());
    registry.register(SummaryTotals::new());
}

#[cfg(test)]
mod tests;
