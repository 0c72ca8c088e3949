//! Income and operating-expense aggregation.
//!
//! Vacancy is modeled as an expense-side deduction rather than an income
//! haircut, so effective gross income equals gross potential income and
//! the vacancy percentage is summed into total operating expenses.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::scenario::{FinancingTerms, Scenario};
use crate::types::Money;

/// Monthly income and operating-expense aggregate for one scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeStatement {
    pub gross_potential_income: Money,
    pub effective_gross_income: Money,
    pub total_operating_expenses: Money,
    pub monthly_noi: Money,
    pub annual_noi: Money,
}

/// Aggregate a scenario's income and operating expenses.
///
/// Negative NOI propagates unchanged; it signals a bad deal, not an
/// error. All-zero input yields an all-zero statement.
pub fn aggregate(scenario: &Scenario) -> IncomeStatement {
    let gross_potential_income = gross_potential_income(scenario);
    let effective_gross_income = gross_potential_income;

    let mut fixed = scenario.expenses.fixed_total();
    let mut rate_sum = scenario.expenses.percentage_total();
    if let Some(sharing) = &scenario.income_sharing {
        fixed += sharing.fixed_total();
        rate_sum += sharing.platform_fee_pct;
    }

    let total_operating_expenses = fixed + rate_sum * gross_potential_income / dec!(100);
    let monthly_noi = gross_potential_income - total_operating_expenses;

    IncomeStatement {
        gross_potential_income,
        effective_gross_income,
        total_operating_expenses,
        monthly_noi,
        annual_noi: monthly_noi * dec!(12),
    }
}

fn gross_potential_income(scenario: &Scenario) -> Money {
    match &scenario.financing {
        FinancingTerms::MultiFamily {
            unit_types,
            other_income,
            ..
        } => {
            let unit_rent: Decimal = unit_types
                .iter()
                .map(|u| Decimal::from(u.count) * u.monthly_rent)
                .sum();
            unit_rent + other_income
        }
        FinancingTerms::LongTermRental { monthly_rent, .. }
        | FinancingTerms::Brrrr { monthly_rent, .. }
        | FinancingTerms::LeaseOption { monthly_rent, .. } => *monthly_rent,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
