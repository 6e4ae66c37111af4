//! Mortgage modelling

mod amortization;

pub use amortization::{
    amortize, annuity_payment, LoanTerms, YearlyDebt, MAX_TERM_MONTHS, ZERO_RATE_EPSILON,
};
