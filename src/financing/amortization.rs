//! Monthly loan amortization aggregated into yearly debt buckets

use crate::input::{DeferralType, LoanType, RentabilityInput};
use crate::numeric::{clamp_int, clamp_pct, money, Money};
use serde::{Deserialize, Serialize};

/// Rates below this are treated as interest free
pub const ZERO_RATE_EPSILON: f64 = 1e-12;

/// Longest accepted loan term (months)
pub const MAX_TERM_MONTHS: u32 = 1200;

/// Normalized loan parameters
#[derive(Debug, Clone, PartialEq)]
pub struct LoanTerms {
    /// Borrowed principal, including any folded-in acquisition costs
    pub principal: Money,
    /// Nominal annual rate, percent
    pub annual_rate_pct: f64,
    pub term_months: u32,
    /// Annual insurance rate on the initial principal, percent
    pub insurance_rate_pct: f64,
    pub loan_type: LoanType,
    pub deferral: DeferralType,
    pub deferral_months: u32,
}

impl LoanTerms {
    /// Plain amortizing loan without deferral
    pub fn amortizing(
        principal: Money,
        annual_rate_pct: f64,
        term_months: u32,
        insurance_rate_pct: f64,
    ) -> Self {
        Self {
            principal,
            annual_rate_pct: clamp_pct(annual_rate_pct),
            term_months: term_months.min(MAX_TERM_MONTHS),
            insurance_rate_pct: clamp_pct(insurance_rate_pct),
            loan_type: LoanType::Amortizing,
            deferral: DeferralType::None,
            deferral_months: 0,
        }
    }

    /// Build the loan from the financing assumptions
    pub fn from_input(input: &RentabilityInput) -> Self {
        let financing = &input.financing;
        let context = &input.context;

        let mut principal = money(financing.loan_amount);
        if financing.include_notary_fees {
            principal += money(context.notary_fees);
        }
        if financing.include_renovation {
            principal += money(context.renovation_cost);
        }

        let term_months = clamp_int(financing.duration, 0, MAX_TERM_MONTHS);
        let deferral_months = match financing.deferral_type {
            DeferralType::None => 0,
            _ => clamp_int(financing.deferral_months, 0, term_months.saturating_sub(1)),
        };

        Self {
            principal,
            annual_rate_pct: clamp_pct(financing.interest_rate),
            term_months,
            insurance_rate_pct: clamp_pct(financing.insurance_rate),
            loan_type: financing.loan_type,
            deferral: financing.deferral_type,
            deferral_months,
        }
    }

    pub fn monthly_rate(&self) -> f64 {
        self.annual_rate_pct / 100.0 / 12.0
    }

    /// Flat monthly insurance premium on the initial principal
    pub fn monthly_insurance(&self) -> Money {
        if !self.principal.is_positive() || self.term_months == 0 {
            return Money::ZERO;
        }
        self.principal.scale(self.insurance_rate_pct / 100.0 / 12.0)
    }

    /// Constant monthly installment of the annuity (zero for in-fine loans)
    pub fn monthly_payment(&self) -> Money {
        match self.loan_type {
            LoanType::Amortizing => {
                annuity_payment(self.principal, self.monthly_rate(), self.term_months)
            }
            LoanType::InFine => Money::ZERO,
        }
    }
}

/// Debt service and balance for one simulation year
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyDebt {
    /// Installments paid (interest + principal, insurance excluded)
    pub payment: Money,
    pub insurance: Money,
    pub interest: Money,
    pub principal: Money,
    /// Outstanding balance after the year's last simulated month
    pub remaining_debt: Money,
}

/// Fixed installment `P·r / (1 - (1+r)^-n)`, straight line when `r ≈ 0`
pub fn annuity_payment(principal: Money, monthly_rate: f64, months: u32) -> Money {
    if !principal.is_positive() || months == 0 {
        return Money::ZERO;
    }
    if monthly_rate.abs() < ZERO_RATE_EPSILON {
        return principal.scale(1.0 / months as f64);
    }
    let discount = 1.0 - (1.0 + monthly_rate).powi(-(months as i32));
    money(principal.to_f64() * monthly_rate / discount)
}

/// Amortize the loan month by month and aggregate into `years` yearly buckets.
///
/// The output always has exactly `years` entries; years after maturity are
/// all zero. Months beyond `years * 12` are not simulated.
pub fn amortize(terms: &LoanTerms, years: u32) -> Vec<YearlyDebt> {
    let mut buckets = vec![YearlyDebt::default(); years as usize];

    if !terms.principal.is_positive() || terms.term_months == 0 {
        return buckets;
    }

    let term = terms.term_months;
    let rate = terms.monthly_rate();
    let insurance = terms.monthly_insurance();
    let deferral = terms.deferral_months.min(term.saturating_sub(1));

    let mut balance = terms.principal;
    let mut installment = if deferral == 0 { terms.monthly_payment() } else { Money::ZERO };

    for month in 1..=term.min(years.saturating_mul(12)) {
        let interest = balance.scale(rate);

        let (interest_paid, principal_paid) = if month <= deferral {
            match terms.deferral {
                DeferralType::Total => {
                    balance += interest;
                    (Money::ZERO, Money::ZERO)
                }
                _ => (interest, Money::ZERO),
            }
        } else {
            if month == deferral + 1 && deferral > 0 && terms.loan_type == LoanType::Amortizing {
                // Re-amortize what is left over the remaining months
                installment = annuity_payment(balance, rate, term - deferral);
            }

            let principal_paid = if month == term {
                // Settle the cent residue left by installment rounding
                balance
            } else {
                match terms.loan_type {
                    LoanType::Amortizing => (installment - interest).min(balance).floor_zero(),
                    LoanType::InFine => Money::ZERO,
                }
            };
            (interest, principal_paid)
        };

        balance -= principal_paid;

        let bucket = &mut buckets[((month - 1) / 12) as usize];
        bucket.payment += interest_paid + principal_paid;
        bucket.interest += interest_paid;
        bucket.principal += principal_paid;
        bucket.insurance += insurance;
        bucket.remaining_debt = balance;
    }

    buckets
}
