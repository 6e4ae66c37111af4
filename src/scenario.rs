//! Scenario runner for batch simulations and sensitivity sweeps
//!
//! Holds a base input, then evaluates variants of it (or unrelated inputs)
//! in parallel. Every evaluation is an independent pure call.

use crate::input::RentabilityInput;
use crate::projection::{calculate_at, GlobalKpis, RentabilityResult, SimulationEngine};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Input figure varied by a sensitivity sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SensitivityParameter {
    MonthlyRent,
    VacancyRate,
    InterestRate,
    PurchasePrice,
    ChargesIncrease,
    SellingCosts,
    MarginalTaxRate,
}

impl SensitivityParameter {
    /// Overwrite the parameter in `input` with `value`
    pub fn apply(self, input: &mut RentabilityInput, value: f64) {
        match self {
            Self::MonthlyRent => input.revenues.monthly_rent = value,
            Self::VacancyRate => input.revenues.vacancy_rate = value,
            Self::InterestRate => input.financing.interest_rate = value,
            Self::PurchasePrice => input.context.purchase_price = value,
            Self::ChargesIncrease => input.charges.charges_increase = value,
            Self::SellingCosts => input.exit.selling_costs = value,
            Self::MarginalTaxRate => input.tax.marginal_tax_rate = value,
        }
    }
}

/// KPIs obtained for one value of the swept parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensitivityPoint {
    pub value: f64,
    pub kpis: GlobalKpis,
}

/// Runner bound to a base investment
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new(input);
/// let sweep = runner.sensitivity(SensitivityParameter::MonthlyRent, &[800.0, 900.0, 1000.0]);
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    base: RentabilityInput,
}

impl ScenarioRunner {
    pub fn new(base: RentabilityInput) -> Self {
        Self { base }
    }

    pub fn base(&self) -> &RentabilityInput {
        &self.base
    }

    pub fn base_mut(&mut self) -> &mut RentabilityInput {
        &mut self.base
    }

    /// Simulate the base input
    pub fn run(&self) -> RentabilityResult {
        self.run_at(Utc::now())
    }

    pub fn run_at(&self, calculated_at: DateTime<Utc>) -> RentabilityResult {
        calculate_at(self.base.clone(), calculated_at)
    }

    /// Simulate a copy of the base input modified by `edit`
    pub fn run_with<F>(&self, edit: F) -> RentabilityResult
    where
        F: FnOnce(&mut RentabilityInput),
    {
        let mut input = self.base.clone();
        edit(&mut input);
        calculate_at(input, Utc::now())
    }

    /// Simulate independent inputs in parallel, all stamped with the same time.
    /// Results keep the order of `inputs`.
    pub fn run_batch(inputs: &[RentabilityInput]) -> Vec<RentabilityResult> {
        let calculated_at = Utc::now();
        log::debug!("running batch of {} simulations", inputs.len());

        inputs
            .par_iter()
            .map(|input| calculate_at(input.clone(), calculated_at))
            .collect()
    }

    /// Sweep one parameter of the base input over `values`
    pub fn sensitivity(
        &self,
        parameter: SensitivityParameter,
        values: &[f64],
    ) -> Vec<SensitivityPoint> {
        values
            .par_iter()
            .map(|&value| {
                let mut input = self.base.clone();
                parameter.apply(&mut input, value);
                SensitivityPoint {
                    value,
                    kpis: SimulationEngine::from_input(&input).run().kpis,
                }
            })
            .collect()
    }
}
