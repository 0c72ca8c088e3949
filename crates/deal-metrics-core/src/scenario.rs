//! Scenario data model.
//!
//! A `Scenario` is the full set of pre-validated inputs for one investment
//! analysis. Strategy-specific rent and financing slots live in the
//! `FinancingTerms` sum type, so a slot a strategy does not use is not
//! representable rather than ambiguously zero-filled. The income-sharing
//! ("room by room") variant is orthogonal to the strategy and carried as
//! `Option<IncomeSharingTerms>`.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DealMetricsError;
use crate::types::{Money, Percent};
use crate::DealMetricsResult;

/// Generic loan slots per scenario (LTR / multi-family / lease option).
pub const MAX_GENERIC_LOANS: usize = 3;

// ---------------------------------------------------------------------------
// Strategy
// ---------------------------------------------------------------------------

/// Investment strategy tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    LongTermRental,
    Brrrr,
    MultiFamily,
    LeaseOption,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::LongTermRental => write!(f, "Long-Term Rental"),
            Strategy::Brrrr => write!(f, "BRRRR"),
            Strategy::MultiFamily => write!(f, "Multi-Family"),
            Strategy::LeaseOption => write!(f, "Lease Option"),
        }
    }
}

// ---------------------------------------------------------------------------
// Loans and units
// ---------------------------------------------------------------------------

/// A single financing record. An amount of zero means the slot is unused
/// and every calculator treats the loan as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Loan {
    pub amount: Money,
    /// Annual interest rate, 0-100.
    pub annual_rate: Percent,
    /// Term in monthly periods.
    pub term_months: u32,
    pub interest_only: bool,
    pub down_payment: Money,
    pub closing_costs: Money,
}

impl Loan {
    pub fn is_absent(&self) -> bool {
        self.amount <= Decimal::ZERO
    }
}

/// One rentable unit category in a multi-family property.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitType {
    pub label: String,
    pub count: u32,
    /// Units currently occupied. Must not exceed `count`.
    pub occupied: u32,
    /// Square footage per unit.
    pub square_footage: Decimal,
    /// Asking rent per unit per month.
    pub monthly_rent: Money,
}

// ---------------------------------------------------------------------------
// Expenses
// ---------------------------------------------------------------------------

/// Fixed monthly dollar expenses plus percentage-of-income reserves.
/// Categories the caller leaves out default to zero, never to an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpenseProfile {
    pub property_taxes: Money,
    pub insurance: Money,
    pub hoa_fees: Money,
    pub maintenance: Money,
    pub other: Money,
    /// Property management fee as a share of gross income, 0-100.
    pub management_pct: Percent,
    /// Capital-expenditure reserve, 0-100.
    pub capex_pct: Percent,
    /// Repairs reserve, 0-100.
    pub repairs_pct: Percent,
    /// Vacancy allowance, 0-100. Deducted on the expense side, not as an
    /// income haircut.
    pub vacancy_pct: Percent,
}

impl ExpenseProfile {
    /// Sum of the fixed monthly dollar categories.
    pub fn fixed_total(&self) -> Money {
        self.property_taxes + self.insurance + self.hoa_fees + self.maintenance + self.other
    }

    /// Sum of the percentage-of-income rates.
    pub fn percentage_total(&self) -> Percent {
        self.management_pct + self.capex_pct + self.repairs_pct + self.vacancy_pct
    }
}

/// Extra cost categories carried only by the income-sharing variant,
/// where the operator furnishes the home and rents by the room through a
/// platform that takes a fee off gross income.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncomeSharingTerms {
    pub utilities: Money,
    pub internet: Money,
    pub cleaning: Money,
    pub supplies: Money,
    pub lawn_care: Money,
    /// Platform fee as a share of gross income, 0-100.
    pub platform_fee_pct: Percent,
    /// One-time furnishing outlay, part of BRRRR acquisition capital.
    pub furnishing_cost: Money,
}

impl IncomeSharingTerms {
    /// Sum of the variant-only fixed monthly categories.
    pub fn fixed_total(&self) -> Money {
        self.utilities + self.internet + self.cleaning + self.supplies + self.lawn_care
    }
}

// ---------------------------------------------------------------------------
// Financing terms
// ---------------------------------------------------------------------------

/// Strategy-specific rent and financing slots. Exactly one rent
/// representation exists per variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FinancingTerms {
    LongTermRental {
        monthly_rent: Money,
        /// Up to `MAX_GENERIC_LOANS` records; a zero-amount loan is absent.
        loans: Vec<Loan>,
    },
    Brrrr {
        monthly_rent: Money,
        /// Short-term acquisition (bridge) loan.
        initial_loan: Loan,
        /// Long-term loan that retires the bridge at refinance.
        refinance_loan: Loan,
    },
    MultiFamily {
        unit_types: Vec<UnitType>,
        /// Flat monthly income outside unit rents (parking, laundry).
        other_income: Money,
        loans: Vec<Loan>,
    },
    LeaseOption {
        monthly_rent: Money,
        /// Non-refundable option consideration paid up front.
        consideration_fee: Money,
        loans: Vec<Loan>,
    },
}

impl FinancingTerms {
    pub fn strategy(&self) -> Strategy {
        match self {
            FinancingTerms::LongTermRental { .. } => Strategy::LongTermRental,
            FinancingTerms::Brrrr { .. } => Strategy::Brrrr,
            FinancingTerms::MultiFamily { .. } => Strategy::MultiFamily,
            FinancingTerms::LeaseOption { .. } => Strategy::LeaseOption,
        }
    }

    /// Generic loan slots for the strategies that carry them. BRRRR
    /// financing is two named phases, not generic slots.
    pub fn generic_loans(&self) -> &[Loan] {
        match self {
            FinancingTerms::LongTermRental { loans, .. }
            | FinancingTerms::MultiFamily { loans, .. }
            | FinancingTerms::LeaseOption { loans, .. } => loans,
            FinancingTerms::Brrrr { .. } => &[],
        }
    }
}

// ---------------------------------------------------------------------------
// Scenario
// ---------------------------------------------------------------------------

/// A fully-populated, pre-validated set of inputs for one analysis.
/// Never mutated inside the engine; every derived output is fresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub purchase_price: Money,
    pub after_repair_value: Money,
    pub renovation_cost: Money,
    pub renovation_months: u32,
    pub expenses: ExpenseProfile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub income_sharing: Option<IncomeSharingTerms>,
    pub financing: FinancingTerms,
}

impl Scenario {
    pub fn strategy(&self) -> Strategy {
        self.financing.strategy()
    }

    pub fn is_income_sharing(&self) -> bool {
        self.income_sharing.is_some()
    }

    /// Structural validation. This is the gate the calling layer runs
    /// before handing a scenario to the engine; the calculators
    /// themselves never re-validate and degrade gracefully instead.
    pub fn validate(&self) -> DealMetricsResult<()> {
        match &self.financing {
            FinancingTerms::Brrrr {
                initial_loan,
                refinance_loan,
                ..
            } => {
                validate_loan(initial_loan, "initial_loan")?;
                validate_loan(refinance_loan, "refinance_loan")?;
            }
            _ => {
                let loans = self.financing.generic_loans();
                if loans.len() > MAX_GENERIC_LOANS {
                    return Err(DealMetricsError::InvalidScenario {
                        field: "loans".into(),
                        reason: format!("At most {MAX_GENERIC_LOANS} loans per scenario"),
                    });
                }
                for (i, loan) in loans.iter().enumerate() {
                    validate_loan(loan, &format!("loans[{i}]"))?;
                }
            }
        }

        if let FinancingTerms::MultiFamily { unit_types, .. } = &self.financing {
            for unit in unit_types {
                if unit.occupied > unit.count {
                    return Err(DealMetricsError::InvalidScenario {
                        field: "unit_types".into(),
                        reason: format!(
                            "Unit type {:?} has {} occupied of {} units",
                            unit.label, unit.occupied, unit.count
                        ),
                    });
                }
            }
        }

        validate_pct(self.expenses.management_pct, "management_pct")?;
        validate_pct(self.expenses.capex_pct, "capex_pct")?;
        validate_pct(self.expenses.repairs_pct, "repairs_pct")?;
        validate_pct(self.expenses.vacancy_pct, "vacancy_pct")?;
        if let Some(sharing) = &self.income_sharing {
            validate_pct(sharing.platform_fee_pct, "platform_fee_pct")?;
        }

        Ok(())
    }
}

fn validate_loan(loan: &Loan, field: &str) -> DealMetricsResult<()> {
    if loan.amount < Decimal::ZERO {
        return Err(DealMetricsError::InvalidScenario {
            field: field.into(),
            reason: "Loan amount must not be negative".into(),
        });
    }
    if loan.annual_rate < Decimal::ZERO || loan.annual_rate > dec!(100) {
        return Err(DealMetricsError::InvalidScenario {
            field: field.into(),
            reason: "Interest rate must be between 0 and 100".into(),
        });
    }
    if loan.amount > Decimal::ZERO && !loan.interest_only && loan.term_months == 0 {
        return Err(DealMetricsError::InvalidScenario {
            field: field.into(),
            reason: "Amortizing loan requires a term of at least 1 period".into(),
        });
    }
    Ok(())
}

fn validate_pct(value: Percent, field: &str) -> DealMetricsResult<()> {
    if value < Decimal::ZERO || value > dec!(100) {
        return Err(DealMetricsError::InvalidScenario {
            field: field.into(),
            reason: "Percentage must be between 0 and 100".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn base_scenario(financing: FinancingTerms) -> Scenario {
        Scenario {
            purchase_price: dec!(200000),
            after_repair_value: dec!(0),
            renovation_cost: dec!(0),
            renovation_months: 0,
            expenses: ExpenseProfile::default(),
            income_sharing: None,
            financing,
        }
    }

    #[test]
    fn test_strategy_tag() {
        let s = base_scenario(FinancingTerms::LeaseOption {
            monthly_rent: dec!(1800),
            consideration_fee: dec!(10000),
            loans: vec![],
        });
        assert_eq!(s.strategy(), Strategy::LeaseOption);
    }

    #[test]
    fn test_default_loan_is_absent() {
        assert!(Loan::default().is_absent());
    }

    #[test]
    fn test_validate_occupied_exceeds_count() {
        let s = base_scenario(FinancingTerms::MultiFamily {
            unit_types: vec![UnitType {
                label: "2BR".into(),
                count: 4,
                occupied: 5,
                square_footage: dec!(850),
                monthly_rent: dec!(1200),
            }],
            other_income: Decimal::ZERO,
            loans: vec![],
        });
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_validate_rate_out_of_range() {
        let s = base_scenario(FinancingTerms::LongTermRental {
            monthly_rent: dec!(2000),
            loans: vec![Loan {
                amount: dec!(160000),
                annual_rate: dec!(107),
                term_months: 360,
                ..Loan::default()
            }],
        });
        match s.validate() {
            Err(DealMetricsError::InvalidScenario { field, .. }) => {
                assert_eq!(field, "loans[0]");
            }
            other => panic!("Expected InvalidScenario, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_amortizing_needs_term() {
        let s = base_scenario(FinancingTerms::LongTermRental {
            monthly_rent: dec!(2000),
            loans: vec![Loan {
                amount: dec!(160000),
                annual_rate: dec!(7),
                term_months: 0,
                ..Loan::default()
            }],
        });
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_validate_interest_only_term_free() {
        // Interest-only payment does not depend on the term, so a zero
        // term is structurally fine.
        let s = base_scenario(FinancingTerms::LongTermRental {
            monthly_rent: dec!(2000),
            loans: vec![Loan {
                amount: dec!(160000),
                annual_rate: dec!(9),
                term_months: 0,
                interest_only: true,
                ..Loan::default()
            }],
        });
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_validate_too_many_loans() {
        let loan = Loan {
            amount: dec!(50000),
            annual_rate: dec!(6),
            term_months: 120,
            ..Loan::default()
        };
        let s = base_scenario(FinancingTerms::LongTermRental {
            monthly_rent: dec!(2000),
            loans: vec![loan.clone(), loan.clone(), loan.clone(), loan],
        });
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_validate_platform_fee_range() {
        let mut s = base_scenario(FinancingTerms::LongTermRental {
            monthly_rent: dec!(2000),
            loans: vec![],
        });
        s.income_sharing = Some(IncomeSharingTerms {
            platform_fee_pct: dec!(115),
            ..IncomeSharingTerms::default()
        });
        assert!(s.validate().is_err());
    }
}
