//! Two-phase capital accounting for the buy-rehab-rent-refinance-repeat
//! strategy: a short-term acquisition loan funds the purchase and rehab,
//! then a long-term refinance retires it and returns cash to the
//! investor.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::scenario::{FinancingTerms, Scenario};
use crate::types::Money;

/// Capital-flow breakdown across the acquisition and refinance phases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrrrrCapitalFlow {
    /// Purchase price + renovation + bridge closing costs (+ furnishing
    /// for the income-sharing variant).
    pub initial_investment: Money,
    pub initial_loan_amount: Money,
    /// Cash the investor puts in at acquisition, after bridge financing.
    pub initial_out_of_pocket: Money,
    pub refinance_amount: Money,
    pub refinance_closing_costs: Money,
    /// Cash returned at refinance once the bridge loan and refinance
    /// closing costs are covered.
    pub cash_recouped: Money,
    /// Capital still tied up after the refinance.
    pub final_invested_capital: Money,
    /// After-repair value minus the refinance balance. Negative means
    /// the refinance over-levered the property.
    pub equity_captured: Money,
}

/// Compute the capital flow for a BRRRR scenario. Returns `None` for
/// every other strategy.
///
/// Out-of-pocket, recouped cash, and final invested capital are clamped
/// at zero: a negative figure for any of them has no real-world meaning
/// and must not reach the cash-on-cash denominator.
pub fn capital_flow(scenario: &Scenario) -> Option<BrrrrCapitalFlow> {
    let (initial_loan, refinance_loan) = match &scenario.financing {
        FinancingTerms::Brrrr {
            initial_loan,
            refinance_loan,
            ..
        } => (initial_loan, refinance_loan),
        _ => return None,
    };

    let furnishing = scenario
        .income_sharing
        .as_ref()
        .map(|s| s.furnishing_cost)
        .unwrap_or(Decimal::ZERO);

    let initial_investment =
        scenario.purchase_price + scenario.renovation_cost + initial_loan.closing_costs + furnishing;

    let initial_out_of_pocket = (initial_investment - initial_loan.amount).max(Decimal::ZERO);

    // The refinance must retire the bridge loan and absorb its own
    // closing costs before any cash comes back.
    let cash_recouped = (refinance_loan.amount - initial_loan.amount - refinance_loan.closing_costs)
        .max(Decimal::ZERO);

    let final_invested_capital = (initial_out_of_pocket - cash_recouped).max(Decimal::ZERO);

    let equity_captured = scenario.after_repair_value - refinance_loan.amount;

    Some(BrrrrCapitalFlow {
        initial_investment,
        initial_loan_amount: initial_loan.amount,
        initial_out_of_pocket,
        refinance_amount: refinance_loan.amount,
        refinance_closing_costs: refinance_loan.closing_costs,
        cash_recouped,
        final_invested_capital,
        equity_captured,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::{ExpenseProfile, IncomeSharingTerms, Loan};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn brrrr_scenario() -> Scenario {
        Scenario {
            purchase_price: dec!(100000),
            after_repair_value: dec!(160000),
            renovation_cost: dec!(30000),
            renovation_months: 4,
            expenses: ExpenseProfile::default(),
            income_sharing: None,
            financing: FinancingTerms::Brrrr {
                monthly_rent: dec!(1600),
                initial_loan: Loan {
                    amount: dec!(80000),
                    annual_rate: dec!(10),
                    term_months: 12,
                    interest_only: true,
                    down_payment: dec!(20000),
                    closing_costs: dec!(3000),
                },
                refinance_loan: Loan {
                    amount: dec!(120000),
                    annual_rate: dec!(7),
                    term_months: 360,
                    interest_only: false,
                    down_payment: dec!(0),
                    closing_costs: dec!(4000),
                },
            },
        }
    }

    #[test]
    fn test_capital_flow_breakdown() {
        let flow = capital_flow(&brrrr_scenario()).unwrap();

        // 100000 + 30000 + 3000
        assert_eq!(flow.initial_investment, dec!(133000));
        // 133000 - 80000
        assert_eq!(flow.initial_out_of_pocket, dec!(53000));
        // 120000 - 80000 - 4000
        assert_eq!(flow.cash_recouped, dec!(36000));
        // 53000 - 36000
        assert_eq!(flow.final_invested_capital, dec!(17000));
        // 160000 - 120000
        assert_eq!(flow.equity_captured, dec!(40000));
    }

    #[test]
    fn test_undersized_refinance_clamps_recoupment() {
        let mut scenario = brrrr_scenario();
        if let FinancingTerms::Brrrr { refinance_loan, .. } = &mut scenario.financing {
            refinance_loan.amount = dec!(82000); // below bridge + closing
        }

        let flow = capital_flow(&scenario).unwrap();
        assert_eq!(flow.cash_recouped, Decimal::ZERO);
        assert_eq!(flow.final_invested_capital, flow.initial_out_of_pocket);
    }

    #[test]
    fn test_oversized_bridge_clamps_out_of_pocket() {
        let mut scenario = brrrr_scenario();
        if let FinancingTerms::Brrrr { initial_loan, .. } = &mut scenario.financing {
            initial_loan.amount = dec!(140000); // covers the whole project
        }

        let flow = capital_flow(&scenario).unwrap();
        assert_eq!(flow.initial_out_of_pocket, Decimal::ZERO);
        assert_eq!(flow.final_invested_capital, Decimal::ZERO);
    }

    #[test]
    fn test_furnishing_joins_initial_investment() {
        let mut scenario = brrrr_scenario();
        scenario.income_sharing = Some(IncomeSharingTerms {
            furnishing_cost: dec!(8000),
            ..IncomeSharingTerms::default()
        });

        let flow = capital_flow(&scenario).unwrap();
        assert_eq!(flow.initial_investment, dec!(141000));
        assert_eq!(flow.initial_out_of_pocket, dec!(61000));
    }

    #[test]
    fn test_negative_equity_is_not_clamped() {
        let mut scenario = brrrr_scenario();
        scenario.after_repair_value = dec!(110000);

        let flow = capital_flow(&scenario).unwrap();
        assert_eq!(flow.equity_captured, dec!(-10000));
    }

    #[test]
    fn test_non_brrrr_has_no_flow() {
        let scenario = Scenario {
            financing: FinancingTerms::LongTermRental {
                monthly_rent: dec!(2000),
                loans: vec![],
            },
            ..brrrr_scenario()
        };
        assert!(capital_flow(&scenario).is_none());
    }
}
