//! Yearly simulation, exit valuation and investment indicators

mod cashflows;
mod engine;
mod exit;
pub mod irr;
mod kpi;
mod plan;

pub use cashflows::{
    write_schedule_csv, GlobalKpis, RentabilityResult, ScheduleSummary, YearlyResult,
};
pub use engine::{calculate, calculate_at, SimulationEngine, SimulationOutcome};
pub use exit::{exit_price, ExitProceeds};
pub use irr::{calculate_irr, npv, NoRootFound};
pub use kpi::{aggregate, payback_years, KpiOutcome};
pub use plan::{ChargePlan, ExitPlan, RevenuePlan, SimulationPlan, MAX_HOLD_YEARS, MIN_HOLD_YEARS};
