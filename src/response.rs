//! Request/response envelope around a simulation
//!
//! Metadata supplied by the caller is passed through untouched. Warnings
//! raised by the engine are appended after the caller's own.

use crate::input::RentabilityInput;
use crate::projection::{RentabilityResult, SimulationEngine, SimulationOutcome, SimulationPlan};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Version reported when the request does not carry one
pub const CALCULATION_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentabilityRequest {
    pub input: RentabilityInput,
    #[serde(default)]
    pub calculation_version: Option<String>,
    #[serde(default)]
    pub inputs_hash: Option<String>,
    #[serde(default)]
    pub is_certified: bool,
    #[serde(default)]
    pub warnings: Vec<String>,
}

/// Simulation result with its metadata, serialized flat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentabilityResponse {
    #[serde(flatten)]
    pub result: RentabilityResult,
    pub warnings: Vec<String>,
    pub calculation_version: String,
    pub inputs_hash: Option<String>,
    pub is_certified: bool,
}

impl RentabilityRequest {
    pub fn from_input(input: RentabilityInput) -> Self {
        Self {
            input,
            calculation_version: None,
            inputs_hash: None,
            is_certified: false,
            warnings: Vec::new(),
        }
    }

    pub fn evaluate(self) -> RentabilityResponse {
        self.evaluate_at(Utc::now())
    }

    pub fn evaluate_at(self, calculated_at: DateTime<Utc>) -> RentabilityResponse {
        let engine = SimulationEngine::from_input(&self.input);
        let outcome = engine.run();

        let mut warnings = self.warnings;
        warnings.extend(engine_warnings(engine.plan(), &outcome));

        RentabilityResponse {
            result: RentabilityResult {
                input: self.input,
                yearly_results: outcome.yearly_results,
                kpis: outcome.kpis,
                calculated_at,
            },
            warnings,
            calculation_version: self
                .calculation_version
                .unwrap_or_else(|| CALCULATION_VERSION.to_string()),
            inputs_hash: self.inputs_hash,
            is_certified: self.is_certified,
        }
    }
}

/// Conditions worth flagging to the user, in a stable order
pub fn engine_warnings(plan: &SimulationPlan, outcome: &SimulationOutcome) -> Vec<String> {
    let kpis = &outcome.kpis;
    let mut warnings = Vec::new();

    if !kpis.own_funds.is_positive() {
        warnings.push(format!(
            "own funds are {}: the loan covers the whole investment",
            kpis.own_funds
        ));
    }

    let has_debt_service = outcome
        .yearly_results
        .first()
        .is_some_and(|year| year.debt_service().is_positive());
    if has_debt_service && kpis.dscr < 1.0 {
        warnings.push(format!(
            "debt service coverage ratio {:.2} is below 1",
            kpis.dscr
        ));
    }

    if let Some(first) = outcome.yearly_results.first() {
        if first.cashflow_after_tax.is_negative() {
            warnings.push(format!(
                "year 1 cash flow after tax is negative ({})",
                first.cashflow_after_tax
            ));
        }
    }

    if plan.seasonality_ignored {
        warnings
            .push("seasonality ignored: exactly 12 monthly coefficients are required".to_string());
    }

    if outcome.irr.is_err() {
        warnings.push("no internal rate of return found, IRR reported as 0".to_string());
    }

    warnings
}
