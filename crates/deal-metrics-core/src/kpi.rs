//! KPI classification against strategy-specific threshold tables.
//!
//! The evaluator only compares; it never re-derives a metric. Thresholds
//! travel in an explicit `KpiThresholdTable` value passed in by the
//! caller, so alternative policies can be tested side by side.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::returns::MetricSet;
use crate::scenario::Strategy;

// ---------------------------------------------------------------------------
// Metric identity
// ---------------------------------------------------------------------------

/// Which computed metric a threshold row applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricKind {
    CapRate,
    Dscr,
    CashOnCash,
    OperatingExpenseRatio,
}

impl MetricKind {
    pub fn label(&self) -> &'static str {
        match self {
            MetricKind::CapRate => "Cap Rate",
            MetricKind::Dscr => "Debt Service Coverage Ratio",
            MetricKind::CashOnCash => "Cash-on-Cash Return",
            MetricKind::OperatingExpenseRatio => "Operating Expense Ratio",
        }
    }

    fn unit(&self) -> &'static str {
        match self {
            MetricKind::Dscr => "x",
            _ => "%",
        }
    }
}

// ---------------------------------------------------------------------------
// Comparisons
// ---------------------------------------------------------------------------

/// Favorability direction for one threshold row. Range bounds are
/// inclusive on both ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Comparison {
    AtLeast(Decimal),
    AtMost(Decimal),
    WithinRange(Decimal, Decimal),
}

impl Comparison {
    pub fn is_favorable(&self, value: Decimal) -> bool {
        match self {
            Comparison::AtLeast(threshold) => value >= *threshold,
            Comparison::AtMost(threshold) => value <= *threshold,
            Comparison::WithinRange(low, high) => *low <= value && value <= *high,
        }
    }

    fn describe(&self, unit: &str) -> String {
        match self {
            Comparison::AtLeast(threshold) => format!("at least {threshold}{unit}"),
            Comparison::AtMost(threshold) => format!("at most {threshold}{unit}"),
            Comparison::WithinRange(low, high) => format!("{low}{unit} to {high}{unit}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Threshold table
// ---------------------------------------------------------------------------

/// One row in a strategy's threshold policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KpiThreshold {
    pub metric: MetricKind,
    pub comparison: Comparison,
}

impl KpiThreshold {
    fn new(metric: MetricKind, comparison: Comparison) -> Self {
        KpiThreshold { metric, comparison }
    }
}

/// Threshold policy keyed by strategy, versioned so callers can track
/// which policy produced an assessment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KpiThresholdTable {
    pub version: String,
    pub long_term_rental: Vec<KpiThreshold>,
    pub brrrr: Vec<KpiThreshold>,
    pub multi_family: Vec<KpiThreshold>,
    pub lease_option: Vec<KpiThreshold>,
}

impl KpiThresholdTable {
    /// The standard policy. Cap-rate bands vary by strategy; lease
    /// options carry no cap-rate or DSCR rows because those metrics are
    /// never computed for them.
    pub fn standard() -> Self {
        use Comparison::*;
        use MetricKind::*;

        KpiThresholdTable {
            version: "standard-1".into(),
            long_term_rental: vec![
                KpiThreshold::new(CapRate, WithinRange(dec!(6), dec!(12))),
                KpiThreshold::new(Dscr, AtLeast(dec!(1.25))),
                KpiThreshold::new(CashOnCash, AtLeast(dec!(8))),
                KpiThreshold::new(OperatingExpenseRatio, AtMost(dec!(50))),
            ],
            brrrr: vec![
                KpiThreshold::new(CapRate, WithinRange(dec!(7), dec!(12))),
                KpiThreshold::new(Dscr, AtLeast(dec!(1.2))),
                KpiThreshold::new(CashOnCash, AtLeast(dec!(10))),
                KpiThreshold::new(OperatingExpenseRatio, AtMost(dec!(50))),
            ],
            multi_family: vec![
                KpiThreshold::new(CapRate, WithinRange(dec!(5), dec!(10))),
                KpiThreshold::new(Dscr, AtLeast(dec!(1.25))),
                KpiThreshold::new(CashOnCash, AtLeast(dec!(8))),
                KpiThreshold::new(OperatingExpenseRatio, AtMost(dec!(55))),
            ],
            lease_option: vec![
                KpiThreshold::new(CashOnCash, AtLeast(dec!(12))),
                KpiThreshold::new(OperatingExpenseRatio, AtMost(dec!(50))),
            ],
        }
    }

    pub fn rows(&self, strategy: Strategy) -> &[KpiThreshold] {
        match strategy {
            Strategy::LongTermRental => &self.long_term_rental,
            Strategy::Brrrr => &self.brrrr,
            Strategy::MultiFamily => &self.multi_family,
            Strategy::LeaseOption => &self.lease_option,
        }
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// One classified metric.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KpiAssessment {
    pub metric: MetricKind,
    pub label: String,
    pub value: Decimal,
    /// Human-readable threshold, e.g. "6% to 12%" or "at least 1.25x".
    pub threshold: String,
    pub favorable: bool,
}

/// Classify each metric in the strategy's threshold rows. Metrics the
/// scenario did not produce are omitted, not marked unfavorable.
pub fn evaluate(
    metrics: &MetricSet,
    strategy: Strategy,
    table: &KpiThresholdTable,
) -> Vec<KpiAssessment> {
    table
        .rows(strategy)
        .iter()
        .filter_map(|row| {
            let value = metric_value(metrics, row.metric)?;
            Some(KpiAssessment {
                metric: row.metric,
                label: row.metric.label().to_string(),
                value,
                threshold: row.comparison.describe(row.metric.unit()),
                favorable: row.comparison.is_favorable(value),
            })
        })
        .collect()
}

fn metric_value(metrics: &MetricSet, kind: MetricKind) -> Option<Decimal> {
    match kind {
        MetricKind::CapRate => metrics.cap_rate,
        MetricKind::Dscr => metrics.dscr,
        MetricKind::CashOnCash => Some(metrics.cash_on_cash_return),
        MetricKind::OperatingExpenseRatio => Some(metrics.operating_expense_ratio),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
