//! Rentability Engine - deterministic cash-flow simulation for rental property investments
//!
//! This library provides:
//! - Input model and JSON loading for an investment's assumptions
//! - Loan amortization with deferral and in-fine repayment
//! - Tax resolution for the micro, real and furnished (LMNP/LMP) regimes
//! - Yearly cash-flow schedule, exit valuation and investment KPIs (IRR, NPV, payback)
//! - Batch runs and sensitivity sweeps

pub mod numeric;
pub mod input;
pub mod financing;
pub mod tax;
pub mod projection;
pub mod scenario;
pub mod response;

// Re-export commonly used types
pub use input::{load_input, parse_input, InputError, RentabilityInput};
pub use numeric::Money;
pub use projection::{
    calculate, calculate_at, GlobalKpis, RentabilityResult, SimulationEngine, YearlyResult,
};
pub use response::{RentabilityRequest, RentabilityResponse};
pub use scenario::{ScenarioRunner, SensitivityParameter};
