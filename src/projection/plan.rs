//! Normalized view of a simulation input
//!
//! Every raw figure is clamped or rounded here, once, before the yearly loop
//! reads it.

use crate::financing::LoanTerms;
use crate::input::{ExitValuation, IndexationMethod, RentabilityInput};
use crate::numeric::{clamp_int, clamp_pct, money, non_negative, Money};
use crate::tax::TaxProfile;

/// Shortest simulated holding period (years)
pub const MIN_HOLD_YEARS: u32 = 1;

/// Longest simulated holding period (years)
pub const MAX_HOLD_YEARS: u32 = 60;

/// Months per year when no seasonality is given
pub const MONTHS_PER_YEAR: f64 = 12.0;

#[derive(Debug, Clone, PartialEq)]
pub struct RevenuePlan {
    pub monthly_rent: Money,
    /// Parking, storage and other monthly revenues
    pub ancillary_monthly: Money,
    pub indexation_rate_pct: f64,
    pub vacancy_rate_pct: f64,
    /// Number of rent months collected per year (12, or the seasonality sum)
    pub rent_months: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChargePlan {
    pub condo_fees_monthly: Money,
    pub insurance_annual: Money,
    pub property_tax_annual: Money,
    pub management_pct: f64,
    pub maintenance_pct: f64,
    pub recoverable_monthly: Money,
    pub increase_pct: f64,
    /// (year, amount) of planned works
    pub capex: Vec<(u32, Money)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExitPlan {
    pub valuation: ExitValuation,
    pub selling_costs_pct: f64,
    pub capital_gains_tax_pct: f64,
    /// Zero unless the sale settles the early-repayment penalty
    pub early_repayment_penalty_pct: f64,
}

/// Everything the simulation reads, already sanitized
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationPlan {
    pub hold_years: u32,
    pub surface: f64,
    pub purchase_price: Money,
    pub notary_fees: Money,
    pub renovation_cost: Money,
    pub furniture_cost: Money,
    /// Requested loan amount, before any folded acquisition costs
    pub loan_amount: Money,
    pub revenues: RevenuePlan,
    pub charges: ChargePlan,
    pub loan: LoanTerms,
    pub tax: TaxProfile,
    pub exit: ExitPlan,
    /// A seasonality vector was supplied but did not have 12 entries
    pub seasonality_ignored: bool,
}

impl SimulationPlan {
    pub fn from_input(input: &RentabilityInput) -> Self {
        let context = &input.context;
        let revenues = &input.revenues;
        let charges = &input.charges;

        let hold_years = clamp_int(
            input.exit.hold_years.unwrap_or(context.horizon),
            MIN_HOLD_YEARS,
            MAX_HOLD_YEARS,
        );

        let (rent_months, seasonality_ignored) = match &revenues.seasonality {
            Some(coefficients) if coefficients.len() == 12 => {
                (coefficients.iter().copied().map(non_negative).sum::<f64>(), false)
            }
            Some(coefficients) => {
                log::warn!(
                    "ignoring seasonality with {} coefficients, expected 12",
                    coefficients.len()
                );
                (MONTHS_PER_YEAR, true)
            }
            None => (MONTHS_PER_YEAR, false),
        };

        let indexation_rate_pct = match revenues.indexation_method {
            IndexationMethod::None => 0.0,
            IndexationMethod::Fixed | IndexationMethod::Irl => clamp_pct(revenues.indexation_rate),
        };

        Self {
            hold_years,
            surface: non_negative(context.surface),
            purchase_price: money(context.purchase_price),
            notary_fees: money(context.notary_fees),
            renovation_cost: money(context.renovation_cost),
            furniture_cost: money(context.furniture_cost),
            loan_amount: money(input.financing.loan_amount),
            revenues: RevenuePlan {
                monthly_rent: money(revenues.monthly_rent),
                ancillary_monthly: money(revenues.parking_rent)
                    + money(revenues.storage_rent)
                    + money(revenues.other_revenue),
                indexation_rate_pct,
                vacancy_rate_pct: clamp_pct(revenues.vacancy_rate),
                rent_months,
            },
            charges: ChargePlan {
                condo_fees_monthly: money(charges.condo_fees),
                insurance_annual: money(charges.insurance),
                property_tax_annual: money(charges.property_tax),
                management_pct: clamp_pct(charges.management_fees),
                maintenance_pct: clamp_pct(charges.maintenance_rate),
                recoverable_monthly: money(charges.recoverable_charges),
                increase_pct: clamp_pct(charges.charges_increase),
                capex: charges
                    .capex
                    .iter()
                    .map(|item| (item.year, money(item.amount)))
                    .collect(),
            },
            loan: LoanTerms::from_input(input),
            tax: TaxProfile::from_input(input),
            exit: ExitPlan {
                valuation: normalize_valuation(&input.exit.valuation),
                selling_costs_pct: clamp_pct(input.exit.selling_costs),
                capital_gains_tax_pct: clamp_pct(input.exit.capital_gains_tax),
                early_repayment_penalty_pct: if input.exit.apply_early_repayment_penalty {
                    clamp_pct(input.financing.early_repayment_penalty)
                } else {
                    0.0
                },
            },
            seasonality_ignored,
        }
    }

    /// Purchase price, notary fees, renovation and furniture
    pub fn total_investment(&self) -> Money {
        self.purchase_price + self.notary_fees + self.renovation_cost + self.furniture_cost
    }

    /// Equity brought by the investor; may be zero or negative
    pub fn own_funds(&self) -> Money {
        self.total_investment() - self.loan_amount
    }

    /// CAPEX planned for exactly `year`
    pub fn capex_for_year(&self, year: u32) -> Money {
        self.charges
            .capex
            .iter()
            .filter(|(capex_year, _)| *capex_year == year)
            .map(|(_, amount)| *amount)
            .sum()
    }
}

fn normalize_valuation(valuation: &ExitValuation) -> ExitValuation {
    match *valuation {
        ExitValuation::CapRate { target_cap_rate } => ExitValuation::CapRate {
            target_cap_rate: clamp_pct(target_cap_rate),
        },
        ExitValuation::Appreciation { annual_appreciation } => ExitValuation::Appreciation {
            annual_appreciation: clamp_pct(annual_appreciation),
        },
        ExitValuation::PricePerSqm { target_price_per_sqm } => ExitValuation::PricePerSqm {
            target_price_per_sqm: money(target_price_per_sqm).to_f64(),
        },
        ExitValuation::PurchasePrice => ExitValuation::PurchasePrice,
    }
}
