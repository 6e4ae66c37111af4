//! Simulation output structures

use crate::input::RentabilityInput;
use crate::numeric::{unbounded_years, Money};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// One simulated year (1-indexed)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyResult {
    pub year: u32,

    // Revenue
    pub gross_revenue: Money,
    pub vacancy_loss: Money,
    pub net_revenue: Money,

    // Charges
    pub condo_fees: Money,
    pub insurance: Money,
    pub property_tax: Money,
    pub management: Money,
    pub maintenance: Money,
    pub capex: Money,
    pub recoverable_charges: Money,
    pub total_charges: Money,

    // Debt service
    pub loan_payment: Money,
    pub loan_interest: Money,
    pub loan_principal: Money,
    pub loan_insurance: Money,
    pub remaining_debt: Money,

    // Taxation
    pub taxable_income: Money,
    pub depreciation: Money,
    pub tax: Money,

    // Cash flow
    pub cashflow_before_tax: Money,
    pub cashflow_after_tax: Money,
    pub cumulative_cashflow: Money,
}

impl YearlyResult {
    /// Net operating income: net revenue less recurring operating charges.
    /// CAPEX and debt service are excluded.
    pub fn net_operating_income(&self) -> Money {
        self.net_revenue
            - (self.condo_fees
                + self.insurance
                + self.property_tax
                + self.management
                + self.maintenance
                - self.recoverable_charges)
    }

    /// Loan installments plus borrower insurance
    pub fn debt_service(&self) -> Money {
        self.loan_payment + self.loan_insurance
    }
}

/// Investment-level indicators
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalKpis {
    pub total_investment: Money,
    pub own_funds: Money,

    // Yields (percent, year 1)
    pub gross_yield: f64,
    pub net_yield: f64,
    pub net_net_yield: f64,
    pub cash_on_cash: f64,
    pub cap_rate: f64,

    // Leverage
    pub dscr: f64,
    pub ltv: f64,

    // Returns
    /// Internal rate of return, percent
    pub irr: f64,
    /// Net present value at the reference discount rate
    pub npv: Money,
    /// Monthly rent covering year-1 charges, debt service and tax
    pub break_even_rent: Money,
    /// Years to recover own funds; infinite when never recovered
    #[serde(with = "unbounded_years")]
    pub payback_years: f64,

    // Exit
    pub exit_price: Money,
    pub capital_gain: Money,
    pub net_capital_gain: Money,
    /// Total profit relative to own funds, percent
    pub total_return: f64,
    /// Cumulative after-tax cash flow plus net exit proceeds
    pub final_equity: Money,
}

/// Complete simulation result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentabilityResult {
    pub input: RentabilityInput,
    pub yearly_results: Vec<YearlyResult>,
    pub kpis: GlobalKpis,
    pub calculated_at: DateTime<Utc>,
}

impl RentabilityResult {
    pub fn last_year(&self) -> Option<&YearlyResult> {
        self.yearly_results.last()
    }

    /// Totals over the whole schedule
    pub fn summary(&self) -> ScheduleSummary {
        let total = |field: fn(&YearlyResult) -> Money| -> Money {
            self.yearly_results.iter().map(field).sum()
        };

        ScheduleSummary {
            years: self.yearly_results.len() as u32,
            total_net_revenue: total(|r| r.net_revenue),
            total_charges: total(|r| r.total_charges),
            total_interest: total(|r| r.loan_interest),
            total_tax: total(|r| r.tax),
            total_cashflow: total(|r| r.cashflow_after_tax),
            final_debt: self.last_year().map(|r| r.remaining_debt).unwrap_or(Money::ZERO),
        }
    }
}

/// Summary statistics for a schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSummary {
    pub years: u32,
    pub total_net_revenue: Money,
    pub total_charges: Money,
    pub total_interest: Money,
    pub total_tax: Money,
    pub total_cashflow: Money,
    pub final_debt: Money,
}

/// Write the yearly schedule as CSV, one row per year with a header line
pub fn write_schedule_csv<W: Write>(writer: W, rows: &[YearlyResult]) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}
