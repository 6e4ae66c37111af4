//! Terminal sale price and net exit proceeds

use super::cashflows::YearlyResult;
use super::plan::SimulationPlan;
use crate::input::ExitValuation;
use crate::numeric::Money;
use serde::{Deserialize, Serialize};

/// Sale price at the end of the holding period.
///
/// `last_year` is the final simulated year; only the cap-rate method reads it.
pub fn exit_price(plan: &SimulationPlan, last_year: &YearlyResult) -> Money {
    match plan.exit.valuation {
        ExitValuation::CapRate { target_cap_rate } => {
            if target_cap_rate <= 0.0 {
                log::warn!(
                    "cap rate {} is not positive, exit price is degenerate",
                    target_cap_rate
                );
            }
            // A zero rate divides to infinity, which normalizes to 0
            Money::from_f64(last_year.gross_revenue.to_f64() / (target_cap_rate / 100.0))
        }
        ExitValuation::Appreciation { annual_appreciation } => {
            let factor = (1.0 + annual_appreciation / 100.0).powi(plan.hold_years as i32);
            plan.purchase_price.scale(factor)
        }
        ExitValuation::PricePerSqm { target_price_per_sqm } => {
            Money::from_f64(target_price_per_sqm * plan.surface)
        }
        ExitValuation::PurchasePrice => plan.purchase_price,
    }
}

/// Breakdown of the sale at the end of the holding period
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExitProceeds {
    pub price: Money,
    pub selling_costs: Money,
    pub capital_gains_tax: Money,
    /// Debt repaid out of the sale price
    pub remaining_debt: Money,
    pub early_repayment_penalty: Money,
}

impl ExitProceeds {
    pub fn evaluate(plan: &SimulationPlan, last_year: &YearlyResult) -> Self {
        let price = exit_price(plan, last_year);
        let gain = (price - plan.purchase_price).floor_zero();

        Self {
            price,
            selling_costs: price.percent(plan.exit.selling_costs_pct),
            capital_gains_tax: gain.percent(plan.exit.capital_gains_tax_pct),
            remaining_debt: last_year.remaining_debt,
            early_repayment_penalty: last_year
                .remaining_debt
                .percent(plan.exit.early_repayment_penalty_pct),
        }
    }

    pub fn capital_gain(&self, purchase_price: Money) -> Money {
        self.price - purchase_price
    }

    /// Capital gain after selling costs and capital gains tax
    pub fn net_capital_gain(&self, purchase_price: Money) -> Money {
        self.capital_gain(purchase_price) - self.selling_costs - self.capital_gains_tax
    }

    /// Cash left to the investor once the sale closes
    pub fn terminal_net(&self) -> Money {
        self.price
            - self.selling_costs
            - self.capital_gains_tax
            - self.remaining_debt
            - self.early_repayment_penalty
    }
}
