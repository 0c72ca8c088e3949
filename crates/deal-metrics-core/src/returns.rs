//! Return metrics: operating-expense ratio, cap rate, debt-service
//! coverage, and cash-on-cash return.
//!
//! Divisions that would be undefined degrade to a defined value: a
//! missing denominator omits the metric (`None`) or engages the
//! cash-on-cash sentinel. Nothing here panics and nothing produces NaN.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::amortization::monthly_payment;
use crate::brrrr::{self, BrrrrCapitalFlow};
use crate::income::IncomeStatement;
use crate::scenario::{FinancingTerms, Scenario, Strategy};
use crate::types::{Money, Percent};

/// Sentinel returned when invested capital is effectively zero:
/// "infinite return" without breaking downstream numeric handling.
pub const CASH_ON_CASH_CAP: Decimal = dec!(999.99);

/// Invested capital at or below this is treated as zero.
const NEAR_ZERO_INVESTMENT: Decimal = dec!(0.01);

/// The full computed metric set for one scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricSet {
    pub gross_potential_income: Money,
    pub effective_gross_income: Money,
    pub total_operating_expenses: Money,
    pub monthly_noi: Money,
    pub annual_noi: Money,
    pub operating_expense_ratio: Percent,
    /// Absent for lease options (strike-price economics) and when the
    /// purchase price is not positive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cap_rate: Option<Percent>,
    pub annual_debt_service: Money,
    /// Absent for lease options and debt-free scenarios.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dscr: Option<Decimal>,
    pub total_cash_invested: Money,
    pub cash_on_cash_return: Percent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capital_flow: Option<BrrrrCapitalFlow>,
}

/// Assemble the metric set from a scenario and its income statement.
pub fn metric_set(scenario: &Scenario, statement: &IncomeStatement) -> MetricSet {
    let capital_flow = brrrr::capital_flow(scenario);
    let annual_debt_service = annual_debt_service(scenario);
    let total_cash_invested = total_cash_invested(scenario, capital_flow.as_ref());
    let annual_cash_flow = statement.annual_noi - annual_debt_service;

    MetricSet {
        gross_potential_income: statement.gross_potential_income,
        effective_gross_income: statement.effective_gross_income,
        total_operating_expenses: statement.total_operating_expenses,
        monthly_noi: statement.monthly_noi,
        annual_noi: statement.annual_noi,
        operating_expense_ratio: operating_expense_ratio(statement),
        cap_rate: cap_rate(scenario, statement),
        annual_debt_service,
        dscr: dscr(scenario.strategy(), statement.annual_noi, annual_debt_service),
        total_cash_invested,
        cash_on_cash_return: cash_on_cash_return(annual_cash_flow, total_cash_invested),
        capital_flow,
    }
}

/// Annual operating expenses as a share of annual gross income, 0-100.
/// Defined as zero when there is no income.
pub fn operating_expense_ratio(statement: &IncomeStatement) -> Percent {
    if statement.gross_potential_income.is_zero() {
        return Decimal::ZERO;
    }
    // Annualizing cancels out of the ratio.
    statement.total_operating_expenses / statement.gross_potential_income * dec!(100)
}

/// Annual NOI over purchase price, 0-100. Omitted for lease options and
/// when the purchase price is not positive.
pub fn cap_rate(scenario: &Scenario, statement: &IncomeStatement) -> Option<Percent> {
    if scenario.strategy() == Strategy::LeaseOption {
        return None;
    }
    if scenario.purchase_price <= Decimal::ZERO {
        return None;
    }
    Some(statement.annual_noi / scenario.purchase_price * dec!(100))
}

/// Steady-state annual debt service. For BRRRR the refinance loan's
/// payment is the steady state; the bridge loan never counts. Other
/// strategies sum every active generic loan.
pub fn annual_debt_service(scenario: &Scenario) -> Money {
    let monthly: Decimal = match &scenario.financing {
        FinancingTerms::Brrrr { refinance_loan, .. } => monthly_payment(refinance_loan),
        _ => scenario
            .financing
            .generic_loans()
            .iter()
            .map(monthly_payment)
            .sum(),
    };
    monthly * dec!(12)
}

/// Annual NOI over annual debt service. Omitted for lease options and
/// when there is no debt service.
pub fn dscr(strategy: Strategy, annual_noi: Money, annual_debt_service: Money) -> Option<Decimal> {
    if strategy == Strategy::LeaseOption {
        return None;
    }
    if annual_debt_service.is_zero() {
        return None;
    }
    Some(annual_noi / annual_debt_service)
}

/// Cash the investor has tied up, derived per strategy: down payments,
/// closing costs, and renovation for conventional purchases; the option
/// consideration for lease options; the post-refinance invested capital
/// for BRRRR.
pub fn total_cash_invested(scenario: &Scenario, capital_flow: Option<&BrrrrCapitalFlow>) -> Money {
    match &scenario.financing {
        FinancingTerms::LongTermRental { loans, .. }
        | FinancingTerms::MultiFamily { loans, .. } => {
            let loan_cash: Decimal = loans
                .iter()
                .filter(|l| !l.is_absent())
                .map(|l| l.down_payment + l.closing_costs)
                .sum();
            loan_cash + scenario.renovation_cost
        }
        FinancingTerms::LeaseOption {
            consideration_fee, ..
        } => *consideration_fee,
        FinancingTerms::Brrrr { .. } => capital_flow
            .map(|f| f.final_invested_capital)
            .unwrap_or(Decimal::ZERO),
    }
}

/// Annual cash flow over invested capital, 0-100. Capped at
/// `CASH_ON_CASH_CAP` when invested capital is effectively zero.
pub fn cash_on_cash_return(annual_cash_flow: Money, total_cash_invested: Money) -> Percent {
    if total_cash_invested <= NEAR_ZERO_INVESTMENT {
        return CASH_ON_CASH_CAP;
    }
    annual_cash_flow / total_cash_invested * dec!(100)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
