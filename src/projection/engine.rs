//! Yearly rentability simulation
//!
//! Each year is computed from the normalized plan and the previous year's
//! cumulative cash flow only, so the schedule is a left fold over
//! `1..=hold_years`.

use super::cashflows::{GlobalKpis, RentabilityResult, YearlyResult};
use super::irr::NoRootFound;
use super::kpi::aggregate;
use super::plan::{SimulationPlan, MONTHS_PER_YEAR};
use crate::financing::{amortize, YearlyDebt};
use crate::input::RentabilityInput;
use crate::numeric::Money;
use chrono::{DateTime, Utc};

/// Schedule and indicators of one simulation run
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationOutcome {
    pub yearly_results: Vec<YearlyResult>,
    pub kpis: GlobalKpis,
    /// Raw IRR solve; `kpis.irr` is 0 when this is an error
    pub irr: Result<f64, NoRootFound>,
}

/// Simulation engine for a single investment
#[derive(Debug, Clone)]
pub struct SimulationEngine {
    plan: SimulationPlan,
    /// Debt buckets, one per simulated year
    debt: Vec<YearlyDebt>,
}

impl SimulationEngine {
    pub fn new(plan: SimulationPlan) -> Self {
        let debt = amortize(&plan.loan, plan.hold_years);
        Self { plan, debt }
    }

    pub fn from_input(input: &RentabilityInput) -> Self {
        Self::new(SimulationPlan::from_input(input))
    }

    pub fn plan(&self) -> &SimulationPlan {
        &self.plan
    }

    /// Run the full horizon and aggregate the indicators
    pub fn run(&self) -> SimulationOutcome {
        let yearly_results = self.simulate();
        let outcome = aggregate(&self.plan, &yearly_results);

        log::debug!(
            "simulated {} years under the {} regime: irr {:.2}%, final equity {}",
            yearly_results.len(),
            self.plan.tax.regime.name(),
            outcome.kpis.irr,
            outcome.kpis.final_equity
        );

        SimulationOutcome {
            yearly_results,
            kpis: outcome.kpis,
            irr: outcome.irr,
        }
    }

    /// Yearly schedule over the holding period
    pub fn simulate(&self) -> Vec<YearlyResult> {
        (1..=self.plan.hold_years)
            .scan(Money::ZERO, |cumulative, year| {
                let row = self.simulate_year(year, *cumulative);
                *cumulative = row.cumulative_cashflow;
                Some(row)
            })
            .collect()
    }

    /// Simulate one year given the cumulative cash flow at the end of the
    /// previous one
    pub fn simulate_year(&self, year: u32, previous_cumulative: Money) -> YearlyResult {
        let mut row = YearlyResult {
            year,
            ..Default::default()
        };

        self.calculate_revenue(year, &mut row);
        self.calculate_charges(year, &mut row);
        self.apply_debt(year, &mut row);
        self.apply_tax(&mut row);

        row.cashflow_before_tax =
            row.net_revenue - row.total_charges - row.loan_payment - row.loan_insurance;
        row.cashflow_after_tax = row.cashflow_before_tax - row.tax;
        row.cumulative_cashflow = previous_cumulative + row.cashflow_after_tax;

        log::debug!(
            "year {}: net revenue {}, charges {}, debt service {}, tax {}, cash flow {}",
            year,
            row.net_revenue,
            row.total_charges,
            row.debt_service(),
            row.tax,
            row.cashflow_after_tax
        );

        row
    }

    fn calculate_revenue(&self, year: u32, row: &mut YearlyResult) {
        let revenues = &self.plan.revenues;
        let index = compound(revenues.indexation_rate_pct, year);

        row.gross_revenue = revenues.monthly_rent.scale(index * revenues.rent_months)
            + revenues.ancillary_monthly.scale(index * MONTHS_PER_YEAR);
        row.vacancy_loss = row.gross_revenue.percent(revenues.vacancy_rate_pct);
        row.net_revenue = row.gross_revenue - row.vacancy_loss;
    }

    /// Operating charges; management and maintenance follow net revenue
    fn calculate_charges(&self, year: u32, row: &mut YearlyResult) {
        let charges = &self.plan.charges;
        let growth = compound(charges.increase_pct, year);

        row.condo_fees = charges.condo_fees_monthly.scale(MONTHS_PER_YEAR * growth);
        row.insurance = charges.insurance_annual.scale(growth);
        row.property_tax = charges.property_tax_annual.scale(growth);
        row.management = row.net_revenue.percent(charges.management_pct);
        row.maintenance = row.net_revenue.percent(charges.maintenance_pct);
        row.capex = self.plan.capex_for_year(year);
        row.recoverable_charges = charges.recoverable_monthly.scale(MONTHS_PER_YEAR);

        row.total_charges = row.condo_fees
            + row.insurance
            + row.property_tax
            + row.management
            + row.maintenance
            + row.capex
            - row.recoverable_charges;
    }

    fn apply_debt(&self, year: u32, row: &mut YearlyResult) {
        let debt = year
            .checked_sub(1)
            .and_then(|index| self.debt.get(index as usize))
            .copied()
            .unwrap_or_default();

        row.loan_payment = debt.payment;
        row.loan_interest = debt.interest;
        row.loan_principal = debt.principal;
        row.loan_insurance = debt.insurance;
        row.remaining_debt = debt.remaining_debt;
    }

    fn apply_tax(&self, row: &mut YearlyResult) {
        let outcome = self
            .plan
            .tax
            .resolve(row.net_revenue, row.total_charges, row.loan_interest);

        row.taxable_income = outcome.taxable_income;
        row.depreciation = outcome.depreciation;
        row.tax = outcome.tax;
    }
}

/// `(1 + pct/100)^(year-1)`
fn compound(pct: f64, year: u32) -> f64 {
    (1.0 + pct / 100.0).powi(year.saturating_sub(1) as i32)
}

/// Simulate an investment, stamping the result with the current time
pub fn calculate(input: RentabilityInput) -> RentabilityResult {
    calculate_at(input, Utc::now())
}

/// Simulate an investment with an explicit calculation timestamp
pub fn calculate_at(input: RentabilityInput, calculated_at: DateTime<Utc>) -> RentabilityResult {
    let outcome = SimulationEngine::from_input(&input).run();

    RentabilityResult {
        input,
        yearly_results: outcome.yearly_results,
        kpis: outcome.kpis,
        calculated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::fixtures::standard_input;
    use crate::input::{CapexItem, TaxRegime};
    use crate::numeric::money;
    use approx::assert_relative_eq;
    use chrono::TimeZone;

    fn timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 9, 30, 0).unwrap()
    }

    fn simulate(input: &RentabilityInput) -> Vec<YearlyResult> {
        SimulationEngine::from_input(input).simulate()
    }

    #[test]
    fn test_schedule_length_follows_hold_years() {
        let mut input = standard_input();
        assert_eq!(simulate(&input).len(), 10);

        input.exit.hold_years = Some(7.0);
        assert_eq!(simulate(&input).len(), 7);

        input.exit.hold_years = None;
        input.context.horizon = 100.0;
        assert_eq!(simulate(&input).len(), 60);

        input.exit.hold_years = Some(0.0);
        let years = simulate(&input);
        assert_eq!(years.len(), 1);
        assert_eq!(years[0].year, 1);
    }

    #[test]
    fn test_first_year_figures() {
        let years = simulate(&standard_input());
        let first = &years[0];

        assert_eq!(first.gross_revenue, money(12_000.0));
        assert_eq!(first.vacancy_loss, money(600.0));
        assert_eq!(first.net_revenue, money(11_400.0));
        assert_eq!(first.condo_fees, money(960.0));
        assert_eq!(first.management, money(798.0));
        assert_eq!(first.maintenance, money(342.0));
        assert_eq!(first.recoverable_charges, money(480.0));
        // 960 + 250 + 1200 + 798 + 342 - 480
        assert_eq!(first.total_charges, money(3_070.0));
        assert!(first.loan_payment.is_positive());
        assert!(first.loan_insurance.is_positive());
    }

    #[test]
    fn test_vacancy_identities() {
        let mut input = standard_input();
        for vacancy in [0.0, 5.0, 33.3, 100.0] {
            input.revenues.vacancy_rate = vacancy;
            for row in simulate(&input) {
                assert_eq!(row.net_revenue, row.gross_revenue - row.vacancy_loss);
                assert_eq!(row.vacancy_loss, row.gross_revenue.percent(vacancy));
            }
        }
    }

    #[test]
    fn test_rent_indexation_compounds() {
        let years = simulate(&standard_input());
        for pair in years.windows(2) {
            let growth = pair[1].gross_revenue.to_f64() / pair[0].gross_revenue.to_f64();
            assert_relative_eq!(growth, 1.015, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_full_vacancy_removes_management_fees() {
        let mut input = standard_input();
        input.revenues.vacancy_rate = 100.0;

        for row in simulate(&input) {
            assert_eq!(row.net_revenue, Money::ZERO);
            assert_eq!(row.management, Money::ZERO);
            assert_eq!(row.maintenance, Money::ZERO);
        }
    }

    #[test]
    fn test_recoverable_charges_reduce_total() {
        let mut input = standard_input();
        input.charges.recoverable_charges = 0.0;
        let without = simulate(&input);
        input.charges.recoverable_charges = 40.0;
        let with = simulate(&input);

        for (a, b) in without.iter().zip(&with) {
            assert_eq!(a.total_charges - b.total_charges, money(480.0));
        }
    }

    #[test]
    fn test_charges_grow_with_increase_rate() {
        let years = simulate(&standard_input());
        // 1200 × 1.02^2
        assert_eq!(years[2].property_tax, money(1_248.48));
        assert_eq!(years[0].recoverable_charges, years[9].recoverable_charges);
    }

    #[test]
    fn test_capex_hits_its_year_only() {
        let mut input = standard_input();
        input.charges.capex = vec![CapexItem {
            year: 4,
            amount: 6_000.0,
            description: "kitchen".into(),
        }];
        let with = simulate(&input);
        input.charges.capex.clear();
        let without = simulate(&input);

        assert_eq!(with[3].capex, money(6_000.0));
        assert_eq!(with[3].cashflow_before_tax, without[3].cashflow_before_tax - money(6_000.0));
        assert_eq!(with[2], without[2]);
    }

    #[test]
    fn test_constant_installments_before_maturity() {
        let years = simulate(&standard_input());
        let payment = years[0].loan_payment;
        assert!(years.iter().all(|row| row.loan_payment == payment));
        assert!(years.windows(2).all(|w| w[1].remaining_debt < w[0].remaining_debt));
    }

    #[test]
    fn test_debt_service_stops_after_maturity() {
        let mut input = standard_input();
        input.financing.duration = 60.0;
        let years = simulate(&input);

        assert_eq!(years[4].remaining_debt, Money::ZERO);
        for row in &years[5..] {
            assert_eq!(row.loan_payment, Money::ZERO);
            assert_eq!(row.loan_insurance, Money::ZERO);
        }
    }

    #[test]
    fn test_cash_flow_identities() {
        let years = simulate(&standard_input());
        let mut cumulative = Money::ZERO;
        for row in &years {
            assert_eq!(
                row.cashflow_before_tax,
                row.net_revenue - row.total_charges - row.loan_payment - row.loan_insurance
            );
            assert_eq!(row.cashflow_after_tax, row.cashflow_before_tax - row.tax);
            cumulative += row.cashflow_after_tax;
            assert_eq!(row.cumulative_cashflow, cumulative);
        }
    }

    #[test]
    fn test_micro_taxes_half_of_net_revenue() {
        let mut input = standard_input();
        input.tax.regime = TaxRegime::Micro;

        for row in simulate(&input) {
            assert_eq!(row.taxable_income, row.net_revenue.scale(0.5));
            assert_eq!(row.depreciation, Money::ZERO);
        }
    }

    #[test]
    fn test_lmnp_taxable_income_non_negative() {
        let mut input = standard_input();
        input.tax.regime = TaxRegime::lmnp();

        for rent in [300.0, 1_000.0, 4_000.0] {
            input.revenues.monthly_rent = rent;
            for row in simulate(&input) {
                assert!(!row.taxable_income.is_negative());
                assert!(row.depreciation.is_positive());
            }
        }
    }

    #[test]
    fn test_lmnp_depreciation_constant_over_hold() {
        let mut input = standard_input();
        input.tax.regime = TaxRegime::lmnp();

        // Past the 7-year furniture period the allowance does not change
        for row in simulate(&input) {
            assert_eq!(row.depreciation, money(6_380.96));
        }
    }

    #[test]
    fn test_irr_decreases_with_selling_costs() {
        let mut input = standard_input();
        let irrs: Vec<f64> = [0.0, 5.0, 10.0]
            .iter()
            .map(|&costs| {
                input.exit.selling_costs = costs;
                SimulationEngine::from_input(&input).run().irr.unwrap()
            })
            .collect();

        assert!(irrs[0] > irrs[1]);
        assert!(irrs[1] > irrs[2]);
    }

    #[test]
    fn test_standard_scenario_kpis_are_finite() {
        let kpis = SimulationEngine::from_input(&standard_input()).run().kpis;

        for value in [
            kpis.gross_yield,
            kpis.net_yield,
            kpis.net_net_yield,
            kpis.irr,
            kpis.npv.to_f64(),
            kpis.total_return,
            kpis.dscr,
            kpis.cash_on_cash,
        ] {
            assert!(value.is_finite());
        }
        assert!(kpis.dscr > 0.0);
    }

    #[test]
    fn test_zero_rate_loan_payback_exceeds_one_year() {
        let mut input = standard_input();
        input.context.purchase_price = 100_000.0;
        input.financing.loan_amount = 50_000.0;
        input.financing.interest_rate = 0.0;
        input.financing.duration = 120.0;

        let kpis = SimulationEngine::from_input(&input).run().kpis;
        assert!(kpis.payback_years > 1.0);
    }

    #[test]
    fn test_calculate_is_deterministic() {
        let a = calculate_at(standard_input(), timestamp());
        let b = calculate_at(standard_input(), timestamp());
        assert_eq!(a, b);
    }

    #[test]
    fn test_result_json_round_trip() {
        let mut input = standard_input();
        input.tax.regime = TaxRegime::lmnp();
        input.charges.capex = vec![CapexItem {
            year: 2,
            amount: 3_333.33,
            description: "windows".into(),
        }];
        let result = calculate_at(input, timestamp());

        let json = serde_json::to_string(&result).unwrap();
        let restored: RentabilityResult = serde_json::from_str(&json).unwrap();
        assert_eq!(result, restored);
    }

    #[test]
    fn test_unrecovered_payback_survives_json() {
        let mut input = standard_input();
        input.revenues.monthly_rent = 200.0;
        let result = calculate_at(input, timestamp());
        assert!(result.kpis.payback_years.is_infinite());

        let json = serde_json::to_value(&result).unwrap();
        assert!(json["kpis"]["paybackYears"].is_null());
        let restored: RentabilityResult = serde_json::from_value(json).unwrap();
        assert!(restored.kpis.payback_years.is_infinite());
    }
}
