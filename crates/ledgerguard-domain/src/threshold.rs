//! Materiality thresholds.
//!
//! A [`Threshold`] decides whether a discrepancy a rule computed is large enough to report.
//! Every configured bound must pass. One instance is shared by every run that evaluates
//! its rule, so evaluation never mutates it.

use crate::model::Context;
use std::fmt;
use std::sync::Arc;

/// Custom materiality predicate. Receives the candidate and the full context.
pub type CustomPredicate = Arc<dyn Fn(&Magnitude, &Context) -> bool + Send + Sync>;

/// The size of a discrepancy, as computed by a rule.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Magnitude {
    pub amount: Option<f64>,
    pub ratio: Option<f64>,
    pub count: Option<u64>,
}

impl Magnitude {
    pub fn amount(amount: f64) -> Self {
        Self {
            amount: Some(amount),
            ..Self::default()
        }
    }

    pub fn with_ratio(mut self, ratio: f64) -> Self {
        self.ratio = Some(ratio);
        self
    }

    pub fn with_count(mut self, count: u64) -> Self {
        self.count = Some(count);
        self
    }
}

#[derive(Clone, Default)]
pub struct Threshold {
    /// Floor on the absolute amount.
    pub min_amount: Option<f64>,
    /// Floor on the absolute ratio.
    pub min_ratio: Option<f64>,
    pub min_count: Option<u64>,
    custom: Option<CustomPredicate>,
}

impl Threshold {
    /// No bounds: any discrepancy is material.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn amount(floor: f64) -> Self {
        Self {
            min_amount: Some(floor),
            ..Self::default()
        }
    }

    pub fn ratio(floor: f64) -> Self {
        Self {
            min_ratio: Some(floor),
            ..Self::default()
        }
    }

    pub fn count(floor: u64) -> Self {
        Self {
            min_count: Some(floor),
            ..Self::default()
        }
    }

    pub fn and_amount(mut self, floor: f64) -> Self {
        self.min_amount = Some(floor);
        self
    }

    pub fn and_ratio(mut self, floor: f64) -> Self {
        self.min_ratio = Some(floor);
        self
    }

    pub fn and_count(mut self, floor: u64) -> Self {
        self.min_count = Some(floor);
        self
    }

    pub fn with_custom<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Magnitude, &Context) -> bool + Send + Sync + 'static,
    {
        self.custom = Some(Arc::new(predicate));
        self
    }

    pub fn has_custom(&self) -> bool {
        self.custom.is_some()
    }

    /// Conjunction of every configured bound.
    ///
    /// A configured bound whose candidate value is absent (or NaN) fails. The custom
    /// predicate, when present, has the final word among the passing bounds.
    pub fn is_material(&self, candidate: &Magnitude, ctx: &Context) -> bool {
        if let Some(floor) = self.min_amount {
            match candidate.amount {
                Some(v) if v.abs() >= floor => {}
                _ => return false,
            }
        }
        if let Some(floor) = self.min_ratio {
            match candidate.ratio {
                Some(v) if v.abs() >= floor => {}
                _ => return false,
            }
        }
        if let Some(floor) = self.min_count {
            match candidate.count {
                Some(v) if v >= floor => {}
                _ => return false,
            }
        }
        match &self.custom {
            Some(predicate) => predicate(candidate, ctx),
            None => true,
        }
    }
}

impl fmt::Debug for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Threshold")
            .field("min_amount", &self.min_amount)
            .field("min_ratio", &self.min_ratio)
            .field("min_count", &self.min_count)
            .field("custom", &self.custom.is_some())
            .finish()
    }
}
