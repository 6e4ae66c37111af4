//! Taxable income, depreciation and tax due for one simulated year

use crate::input::{RentabilityInput, TaxRegime};
use crate::numeric::{clamp_int, clamp_pct, money, Money};
use serde::{Deserialize, Serialize};

/// Share of net revenue taxed under the micro regime
pub const MICRO_TAXABLE_SHARE: f64 = 0.5;

/// Rental-income contribution added to the tax rate when enabled, percent
pub const CRL_RATE_PCT: f64 = 2.5;

/// Longest accepted depreciation period (years)
pub const MAX_DEPRECIATION_YEARS: u32 = 100;

/// Tax figures for one year
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxOutcome {
    pub taxable_income: Money,
    pub depreciation: Money,
    pub tax: Money,
}

/// Normalized taxation assumptions
#[derive(Debug, Clone, PartialEq)]
pub struct TaxProfile {
    pub regime: TaxRegime,
    /// Marginal rate plus social contributions, percent
    pub combined_rate_pct: f64,
    pub crl: bool,
    /// Depreciable building value: purchase price net of land
    pub building_base: Money,
    pub furniture_base: Money,
}

impl TaxProfile {
    pub fn from_input(input: &RentabilityInput) -> Self {
        let tax = &input.tax;
        let context = &input.context;

        let building_base =
            (money(context.purchase_price) - money(context.land_value)).floor_zero();

        Self {
            regime: tax.regime.clone(),
            combined_rate_pct: clamp_pct(tax.marginal_tax_rate)
                + clamp_pct(tax.social_contributions),
            crl: tax.crl,
            building_base,
            furniture_base: money(context.furniture_cost).floor_zero(),
        }
    }

    /// Annual depreciation allowance (furnished regimes only).
    ///
    /// Each component is spread linearly over its period; the allowance is
    /// the same every simulated year.
    pub fn depreciation(&self) -> Money {
        let (building_years, furniture_years) = match self.regime {
            TaxRegime::Lmnp { depreciation_years, furniture_depreciation_years }
            | TaxRegime::Lmp { depreciation_years, furniture_depreciation_years } => (
                clamp_int(depreciation_years, 1, MAX_DEPRECIATION_YEARS),
                clamp_int(furniture_depreciation_years, 1, MAX_DEPRECIATION_YEARS),
            ),
            _ => return Money::ZERO,
        };

        self.building_base.scale(1.0 / building_years as f64)
            + self.furniture_base.scale(1.0 / furniture_years as f64)
    }

    /// Rate applied to a positive taxable income, percent
    pub fn tax_rate_pct(&self) -> f64 {
        if self.crl {
            self.combined_rate_pct + CRL_RATE_PCT
        } else {
            self.combined_rate_pct
        }
    }

    /// Resolve taxable income and tax for one year.
    ///
    /// `total_charges` excludes loan interest, which is passed separately.
    pub fn resolve(&self, net_revenue: Money, total_charges: Money, interest: Money) -> TaxOutcome {
        let operating_result = net_revenue - total_charges - interest;

        let (taxable_income, depreciation) = match self.regime {
            TaxRegime::Micro => (net_revenue.scale(MICRO_TAXABLE_SHARE), Money::ZERO),
            TaxRegime::Lmnp { .. } | TaxRegime::Lmp { .. } => {
                // Depreciation may absorb the whole result but never creates a loss
                let depreciation = self.depreciation();
                ((operating_result - depreciation).floor_zero(), depreciation)
            }
            TaxRegime::Real { deficit_carry_forward: true } => (operating_result, Money::ZERO),
            TaxRegime::Real { .. } | TaxRegime::Other => {
                (operating_result.floor_zero(), Money::ZERO)
            }
        };

        let tax = if taxable_income.is_positive() {
            taxable_income.percent(self.tax_rate_pct())
        } else {
            Money::ZERO
        };

        TaxOutcome {
            taxable_income,
            depreciation,
            tax,
        }
    }
}
