//! Scenario orchestration: aggregate income and expenses, derive the
//! metric set, classify it against a KPI threshold policy, and wrap the
//! result in the standard computation envelope.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::income;
use crate::kpi::{self, KpiAssessment, KpiThresholdTable};
use crate::returns::{self, MetricSet, CASH_ON_CASH_CAP};
use crate::scenario::{Scenario, Strategy};
use crate::types::{with_metadata, ComputationOutput};
use crate::DealMetricsResult;

/// Complete analysis output: the metric set plus its KPI classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioAnalysis {
    pub strategy: Strategy,
    pub metrics: MetricSet,
    pub assessments: Vec<KpiAssessment>,
}

/// Run the full analysis for one scenario.
///
/// Structural validation is the only error path; arithmetic edge cases
/// degrade to sentinels or omitted metrics inside the calculators.
/// Stateless and synchronous, so any number of scenarios may be analyzed
/// concurrently without coordination.
pub fn analyze(
    scenario: &Scenario,
    thresholds: &KpiThresholdTable,
) -> DealMetricsResult<ComputationOutput<ScenarioAnalysis>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    scenario.validate()?;

    let statement = income::aggregate(scenario);
    let metrics = returns::metric_set(scenario, &statement);
    let assessments = kpi::evaluate(&metrics, scenario.strategy(), thresholds);

    collect_warnings(scenario, &metrics, &mut warnings);

    let output = ScenarioAnalysis {
        strategy: scenario.strategy(),
        metrics,
        assessments,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Investment Scenario Metrics & KPI Assessment",
        scenario,
        warnings,
        elapsed,
        output,
    ))
}

fn collect_warnings(scenario: &Scenario, metrics: &MetricSet, warnings: &mut Vec<String>) {
    if metrics.monthly_noi < Decimal::ZERO {
        warnings.push(format!(
            "Negative monthly NOI of {} — expenses exceed income",
            metrics.monthly_noi
        ));
    }

    if let Some(dscr) = metrics.dscr {
        if dscr < dec!(1.2) && dscr > Decimal::ZERO {
            warnings.push(format!("DSCR of {dscr:.2} is below 1.20x — lender covenant risk"));
        }
    }

    if metrics.cash_on_cash_return == CASH_ON_CASH_CAP {
        warnings.push(
            "Cash-on-cash return capped at 999.99% — invested capital is effectively zero".into(),
        );
    }

    if scenario.expenses.vacancy_pct > dec!(15) {
        warnings.push(format!(
            "Vacancy allowance of {}% exceeds 15% — above typical market norms",
            scenario.expenses.vacancy_pct
        ));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::{ExpenseProfile, FinancingTerms, Loan};
    use rust_decimal_macros::dec;

    fn rental_scenario() -> Scenario {
        Scenario {
            purchase_price: dec!(200000),
            after_repair_value: dec!(0),
            renovation_cost: dec!(0),
            renovation_months: 0,
            expenses: ExpenseProfile {
                property_taxes: dec!(150),
                insurance: dec!(80),
                management_pct: dec!(8),
                capex_pct: dec!(2),
                repairs_pct: dec!(2),
                vacancy_pct: dec!(4),
                ..ExpenseProfile::default()
            },
            income_sharing: None,
            financing: FinancingTerms::LongTermRental {
                monthly_rent: dec!(2000),
                loans: vec![Loan {
                    amount: dec!(160000),
                    annual_rate: dec!(7),
                    term_months: 360,
                    interest_only: false,
                    down_payment: dec!(40000),
                    closing_costs: dec!(5000),
                }],
            },
        }
    }

    #[test]
    fn test_methodology_string() {
        let result = analyze(&rental_scenario(), &KpiThresholdTable::standard()).unwrap();
        assert_eq!(
            result.methodology,
            "Investment Scenario Metrics & KPI Assessment"
        );
    }

    #[test]
    fn test_invalid_scenario_is_the_only_error() {
        let mut scenario = rental_scenario();
        scenario.expenses.vacancy_pct = dec!(140);
        assert!(analyze(&scenario, &KpiThresholdTable::standard()).is_err());
    }

    #[test]
    fn test_negative_noi_warning() {
        let mut scenario = rental_scenario();
        scenario.expenses.property_taxes = dec!(2500);
        let result = analyze(&scenario, &KpiThresholdTable::standard()).unwrap();
        assert!(result.warnings.iter().any(|w| w.contains("Negative monthly NOI")));
    }

    #[test]
    fn test_sentinel_warning_for_zero_investment() {
        let mut scenario = rental_scenario();
        scenario.financing = FinancingTerms::LongTermRental {
            monthly_rent: dec!(2000),
            loans: vec![],
        };
        let result = analyze(&scenario, &KpiThresholdTable::standard()).unwrap();
        assert_eq!(result.result.metrics.cash_on_cash_return, dec!(999.99));
        assert!(result.warnings.iter().any(|w| w.contains("capped")));
    }

    #[test]
    fn test_high_vacancy_warning() {
        let mut scenario = rental_scenario();
        scenario.expenses.vacancy_pct = dec!(18);
        let result = analyze(&scenario, &KpiThresholdTable::standard()).unwrap();
        assert!(result.warnings.iter().any(|w| w.contains("Vacancy")));
    }
}
