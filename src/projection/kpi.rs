//! Global indicators derived from the yearly schedule

use super::cashflows::{GlobalKpis, YearlyResult};
use super::exit::ExitProceeds;
use super::irr::{calculate_irr, npv, NoRootFound, NPV_DISCOUNT_RATE};
use super::plan::SimulationPlan;
use crate::numeric::{percent_of, ratio, round2, Money};

/// KPIs together with the raw solver outcome they were sanitized from
#[derive(Debug, Clone, PartialEq)]
pub struct KpiOutcome {
    pub kpis: GlobalKpis,
    /// Periodic IRR as a decimal, before sanitization
    pub irr: Result<f64, NoRootFound>,
    /// Investor cash flows, index 0 = acquisition
    pub cashflows: Vec<f64>,
}

/// Aggregate the schedule into investment-level indicators.
///
/// `years` must hold the complete simulated horizon in order.
pub fn aggregate(plan: &SimulationPlan, years: &[YearlyResult]) -> KpiOutcome {
    let first = years.first().cloned().unwrap_or_default();
    let last = years.last().cloned().unwrap_or_default();

    let total_investment = plan.total_investment();
    let own_funds = plan.own_funds();
    let invested = own_funds.floor_zero();

    let proceeds = ExitProceeds::evaluate(plan, &last);
    let terminal_net = proceeds.terminal_net();

    let cashflows = investor_cashflows(invested, years, terminal_net);
    let irr = calculate_irr(&cashflows);
    if irr.is_err() {
        log::warn!("no IRR found for cash flows {:?}, reporting 0", cashflows);
    }

    let gross_yield = round2(percent_of(first.gross_revenue, total_investment));
    let net_net_income = first.net_revenue - first.total_charges - first.loan_insurance;
    let realized: Money = years.iter().map(|r| r.cashflow_after_tax).sum();
    let final_equity = realized + terminal_net;

    let kpis = GlobalKpis {
        total_investment,
        own_funds,
        gross_yield,
        net_yield: round2(percent_of(first.net_revenue, total_investment)),
        net_net_yield: round2(percent_of(net_net_income, total_investment)),
        cash_on_cash: round2(percent_of(first.cashflow_after_tax, own_funds)),
        cap_rate: gross_yield,
        dscr: round2(ratio(first.net_operating_income(), first.debt_service())),
        ltv: round2(percent_of(plan.loan_amount, plan.purchase_price)),
        irr: irr.map(|rate| round2(rate * 100.0)).unwrap_or(0.0),
        npv: Money::from_f64(npv(NPV_DISCOUNT_RATE, &cashflows)),
        break_even_rent: (first.total_charges + first.debt_service() + first.tax).scale(1.0 / 12.0),
        payback_years: payback_years(own_funds, years),
        exit_price: proceeds.price,
        capital_gain: proceeds.capital_gain(plan.purchase_price),
        net_capital_gain: proceeds.net_capital_gain(plan.purchase_price),
        total_return: round2(percent_of(final_equity - invested, own_funds)),
        final_equity,
    };

    KpiOutcome { kpis, irr, cashflows }
}

/// Acquisition outflow followed by yearly after-tax cash flows, with the net
/// sale proceeds added to the final year
fn investor_cashflows(invested: Money, years: &[YearlyResult], terminal_net: Money) -> Vec<f64> {
    let mut flows = Vec::with_capacity(years.len() + 1);
    flows.push(-invested.to_f64());
    flows.extend(years.iter().map(|r| r.cashflow_after_tax.to_f64()));

    match years.last() {
        Some(last) => {
            let final_flow = (last.cashflow_after_tax + terminal_net).to_f64();
            if let Some(slot) = flows.last_mut() {
                *slot = final_flow;
            }
        }
        None => flows.push(terminal_net.to_f64()),
    }
    flows
}

/// Years until cumulative after-tax cash flow recovers own funds, with
/// linear interpolation inside the crossing year.
///
/// Zero when nothing was invested, infinite when the horizon ends first.
pub fn payback_years(own_funds: Money, years: &[YearlyResult]) -> f64 {
    if !own_funds.is_positive() {
        return 0.0;
    }

    let target = own_funds.to_f64();
    let mut previous = 0.0;
    for (elapsed, row) in years.iter().enumerate() {
        let cumulative = row.cumulative_cashflow.to_f64();
        if cumulative >= target {
            let gained = cumulative - previous;
            let fraction = if gained > 0.0 { (target - previous) / gained } else { 1.0 };
            return round2(elapsed as f64 + fraction);
        }
        previous = cumulative;
    }

    f64::INFINITY
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::fixtures::standard_input;
    use crate::numeric::money;
    use approx::assert_relative_eq;

    fn schedule(flows: &[f64]) -> Vec<YearlyResult> {
        let mut cumulative = Money::ZERO;
        flows
            .iter()
            .enumerate()
            .map(|(i, &cf)| {
                cumulative += money(cf);
                YearlyResult {
                    year: i as u32 + 1,
                    cashflow_after_tax: money(cf),
                    cumulative_cashflow: cumulative,
                    ..Default::default()
                }
            })
            .collect()
    }

    #[test]
    fn test_payback_interpolates() {
        let years = schedule(&[4_000.0, 4_000.0, 4_000.0]);
        // 10000 recovered half way through year 3
        assert_eq!(payback_years(money(10_000.0), &years), 2.5);
    }

    #[test]
    fn test_payback_edges() {
        let years = schedule(&[1_000.0, 1_000.0]);
        assert_eq!(payback_years(Money::ZERO, &years), 0.0);
        assert_eq!(payback_years(money(-5_000.0), &years), 0.0);
        assert!(payback_years(money(50_000.0), &years).is_infinite());
    }

    #[test]
    fn test_cashflow_vector_includes_exit() {
        let years = schedule(&[100.0, 200.0]);
        let flows = investor_cashflows(money(1_000.0), &years, money(900.0));
        assert_eq!(flows, vec![-1_000.0, 100.0, 1_100.0]);
    }

    #[test]
    fn test_standard_kpis() {
        let input = standard_input();
        let plan = SimulationPlan::from_input(&input);
        let mut years = schedule(&[-1_500.0; 10]);
        years[0].gross_revenue = money(12_000.0);
        years[0].net_revenue = money(11_400.0);
        years[9].remaining_debt = money(95_000.0);

        let outcome = aggregate(&plan, &years);
        let kpis = &outcome.kpis;

        assert_eq!(kpis.total_investment, money(220_000.0));
        assert_eq!(kpis.own_funds, money(60_000.0));
        // 12000 / 220000
        assert_relative_eq!(kpis.gross_yield, 5.45);
        assert_eq!(kpis.cap_rate, kpis.gross_yield);
        assert_relative_eq!(kpis.net_yield, 5.18);
        assert_relative_eq!(kpis.ltv, 80.0);
        assert_relative_eq!(kpis.cash_on_cash, -2.5);
        assert!(kpis.payback_years.is_infinite());
        assert_eq!(outcome.cashflows.len(), 11);
        assert_eq!(outcome.cashflows[0], -60_000.0);
        assert!(outcome.irr.is_ok());
        assert!(kpis.irr.is_finite());
    }

    #[test]
    fn test_capital_gain_and_equity() {
        let plan = SimulationPlan::from_input(&standard_input());
        let years = schedule(&[1_000.0; 10]);
        let outcome = aggregate(&plan, &years);
        let kpis = &outcome.kpis;

        let proceeds = ExitProceeds::evaluate(&plan, years.last().unwrap());
        assert_eq!(kpis.exit_price, proceeds.price);
        assert_eq!(kpis.capital_gain, proceeds.price - money(200_000.0));
        assert_eq!(kpis.final_equity, money(10_000.0) + proceeds.terminal_net());
    }

    #[test]
    fn test_no_root_reports_zero_irr() {
        // Nothing invested and only inflows: the NPV never changes sign
        let mut input = standard_input();
        input.financing.loan_amount = 220_000.0;
        input.exit.selling_costs = 0.0;
        let plan = SimulationPlan::from_input(&input);
        let years = schedule(&[500.0; 10]);

        let outcome = aggregate(&plan, &years);
        assert_eq!(outcome.irr, Err(NoRootFound));
        assert_eq!(outcome.kpis.irr, 0.0);
        assert_eq!(outcome.kpis.payback_years, 0.0);
        assert_eq!(outcome.kpis.total_return, 0.0);
        assert_eq!(outcome.kpis.cash_on_cash, 0.0);
    }

    #[test]
    fn test_ltv_ignores_folded_costs() {
        let mut input = standard_input();
        input.financing.include_notary_fees = true;
        let plan = SimulationPlan::from_input(&input);
        let outcome = aggregate(&plan, &schedule(&[1_000.0; 10]));

        assert_relative_eq!(outcome.kpis.ltv, 80.0);
        assert_eq!(outcome.kpis.own_funds, money(60_000.0));
    }

    #[test]
    fn test_zero_debt_service_gives_zero_dscr() {
        let plan = SimulationPlan::from_input(&standard_input());
        let mut years = schedule(&[1_000.0; 10]);
        years[0].net_revenue = money(11_400.0);

        assert_eq!(aggregate(&plan, &years).kpis.dscr, 0.0);
    }
}
