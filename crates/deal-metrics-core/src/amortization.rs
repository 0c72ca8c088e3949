//! Loan payment arithmetic.
//!
//! Foundational for every component that needs a debt-service figure.
//! All arithmetic uses `rust_decimal::Decimal`; nothing is rounded
//! mid-calculation, so annualized figures chain from the unrounded
//! monthly payment.

use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;

use crate::scenario::Loan;
use crate::types::Money;

/// Fixed monthly payment for a loan record.
///
/// Absent loans (zero amount) pay zero. Interest-only loans pay
/// `amount * rate / 100 / 12` regardless of term. Amortizing loans use
/// the standard formula `P * r(1+r)^n / ((1+r)^n - 1)`, degrading to
/// straight-line `P / n` when the rate is zero.
pub fn monthly_payment(loan: &Loan) -> Money {
    if loan.is_absent() {
        return Decimal::ZERO;
    }

    let monthly_rate = loan.annual_rate / dec!(100) / dec!(12);

    if loan.interest_only {
        return loan.amount * monthly_rate;
    }

    if loan.term_months == 0 {
        return Decimal::ZERO;
    }

    if monthly_rate.is_zero() {
        return loan.amount / Decimal::from(loan.term_months);
    }

    let compound = (Decimal::ONE + monthly_rate).powd(Decimal::from(loan.term_months));
    loan.amount * monthly_rate * compound / (compound - Decimal::ONE)
}

/// Outstanding principal after `periods_paid` payments at the fixed
/// monthly payment. Interest-only loans retain full principal; the
/// balance never goes below zero.
pub fn remaining_balance(loan: &Loan, periods_paid: u32) -> Money {
    if loan.is_absent() {
        return Decimal::ZERO;
    }

    if loan.interest_only {
        return loan.amount;
    }

    if loan.term_months == 0 {
        return loan.amount;
    }

    let monthly_rate = loan.annual_rate / dec!(100) / dec!(12);

    if monthly_rate.is_zero() {
        let periods = periods_paid.min(loan.term_months);
        let paid = loan.amount * Decimal::from(periods) / Decimal::from(loan.term_months);
        return loan.amount - paid;
    }

    let payment = monthly_payment(loan);
    let mut balance = loan.amount;
    for _ in 0..periods_paid {
        let interest = balance * monthly_rate;
        balance -= payment - interest;
        if balance < Decimal::ZERO {
            balance = Decimal::ZERO;
            break;
        }
    }

    balance
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
