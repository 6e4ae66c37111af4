//! Simulation inputs and their JSON loading

mod data;
pub mod loader;

#[cfg(test)]
pub(crate) mod fixtures;

pub use data::{
    CapexItem, Charges, DeferralType, ExitSettings, ExitValuation, Financing, IndexationMethod,
    InvestmentStrategy, LoanType, Objective, PropertyContext, PropertyState, PropertyType,
    RentabilityInput, Revenues, TaxRegime, TaxSettings, DEFAULT_DEPRECIATION_YEARS,
    DEFAULT_FURNITURE_DEPRECIATION_YEARS,
};
pub use loader::{load_input, load_input_from_reader, parse_input, InputError};
