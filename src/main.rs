//! Rentability CLI
//!
//! Command-line interface for simulating rental property investments

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rentability_engine::projection::write_schedule_csv;
use rentability_engine::{
    load_input, RentabilityRequest, RentabilityResponse, ScenarioRunner, SensitivityParameter,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "rentability",
    version,
    about = "Simulate the cash flows and returns of a rental property investment"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate one investment and print its schedule and indicators
    Run(RunArgs),
    /// Vary one input over a list of values and compare the indicators
    Sensitivity(SensitivityArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Investment assumptions (JSON)
    input: PathBuf,

    /// Write the full response as JSON
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write the yearly schedule as CSV
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Number of years printed to the console
    #[arg(long, default_value_t = 10)]
    show_years: usize,

    /// Input fingerprint passed through to the response
    #[arg(long)]
    inputs_hash: Option<String>,
}

#[derive(Args)]
struct SensitivityArgs {
    /// Investment assumptions (JSON)
    input: PathBuf,

    /// Input to vary
    #[arg(short, long, value_enum)]
    parameter: Parameter,

    /// Values to try, comma separated
    #[arg(short, long, value_delimiter = ',', required = true)]
    values: Vec<f64>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Parameter {
    MonthlyRent,
    VacancyRate,
    InterestRate,
    PurchasePrice,
    ChargesIncrease,
    SellingCosts,
    MarginalTaxRate,
}

impl From<Parameter> for SensitivityParameter {
    fn from(parameter: Parameter) -> Self {
        match parameter {
            Parameter::MonthlyRent => SensitivityParameter::MonthlyRent,
            Parameter::VacancyRate => SensitivityParameter::VacancyRate,
            Parameter::InterestRate => SensitivityParameter::InterestRate,
            Parameter::PurchasePrice => SensitivityParameter::PurchasePrice,
            Parameter::ChargesIncrease => SensitivityParameter::ChargesIncrease,
            Parameter::SellingCosts => SensitivityParameter::SellingCosts,
            Parameter::MarginalTaxRate => SensitivityParameter::MarginalTaxRate,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    match Cli::parse().command {
        Commands::Run(args) => run(args),
        Commands::Sensitivity(args) => sensitivity(args),
    }
}

fn run(args: RunArgs) -> Result<()> {
    let input = load_input(&args.input)
        .with_context(|| format!("failed to load {}", args.input.display()))?;

    let mut request = RentabilityRequest::from_input(input);
    request.inputs_hash = args.inputs_hash;
    let response = request.evaluate();

    print_schedule(&response, args.show_years);
    print_kpis(&response);

    if let Some(path) = &args.csv {
        let file = File::create(path)
            .with_context(|| format!("unable to create {}", path.display()))?;
        write_schedule_csv(BufWriter::new(file), &response.result.yearly_results)
            .with_context(|| format!("unable to write {}", path.display()))?;
        println!("\nYearly schedule written to: {}", path.display());
    }

    if let Some(path) = &args.output {
        let file = File::create(path)
            .with_context(|| format!("unable to create {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &response)
            .with_context(|| format!("unable to write {}", path.display()))?;
        println!("Full response written to: {}", path.display());
    }

    Ok(())
}

fn print_schedule(response: &RentabilityResponse, show_years: usize) {
    let years = &response.result.yearly_results;

    println!("Rentability Simulation ({} years)", years.len());
    println!("{}", "=".repeat(34));
    println!(
        "{:>4} {:>12} {:>12} {:>12} {:>12} {:>10} {:>12} {:>12}",
        "Year", "Net Rev", "Charges", "Debt Svc", "Interest", "Tax", "CF After", "Remaining"
    );
    println!("{}", "-".repeat(94));

    for row in years.iter().take(show_years) {
        println!(
            "{:>4} {:>12} {:>12} {:>12} {:>12} {:>10} {:>12} {:>12}",
            row.year,
            row.net_revenue,
            row.total_charges,
            row.debt_service(),
            row.loan_interest,
            row.tax,
            row.cashflow_after_tax,
            row.remaining_debt,
        );
    }

    if years.len() > show_years {
        println!("... ({} more years)", years.len() - show_years);
    }

    let summary = response.result.summary();
    println!("\nTotals:");
    println!("  Net Revenue:   {}", summary.total_net_revenue);
    println!("  Charges:       {}", summary.total_charges);
    println!("  Interest:      {}", summary.total_interest);
    println!("  Tax:           {}", summary.total_tax);
    println!("  Cash Flow:     {}", summary.total_cashflow);
    println!("  Final Debt:    {}", summary.final_debt);
}

fn print_kpis(response: &RentabilityResponse) {
    let kpis = &response.result.kpis;

    println!("\nIndicators:");
    println!("  Total Investment: {}", kpis.total_investment);
    println!("  Own Funds:        {}", kpis.own_funds);
    println!("  Gross Yield:      {:.2}%", kpis.gross_yield);
    println!("  Net Yield:        {:.2}%", kpis.net_yield);
    println!("  Net-Net Yield:    {:.2}%", kpis.net_net_yield);
    println!("  Cash on Cash:     {:.2}%", kpis.cash_on_cash);
    println!("  DSCR:             {:.2}", kpis.dscr);
    println!("  LTV:              {:.2}%", kpis.ltv);
    println!("  IRR:              {:.2}%", kpis.irr);
    println!("  NPV (6%):         {}", kpis.npv);
    println!("  Break-even Rent:  {}", kpis.break_even_rent);
    if kpis.payback_years.is_finite() {
        println!("  Payback:          {:.2} years", kpis.payback_years);
    } else {
        println!("  Payback:          not within the holding period");
    }
    println!("  Exit Price:       {}", kpis.exit_price);
    println!("  Net Capital Gain: {}", kpis.net_capital_gain);
    println!("  Final Equity:     {}", kpis.final_equity);
    println!("  Total Return:     {:.2}%", kpis.total_return);

    if !response.warnings.is_empty() {
        println!("\nWarnings:");
        for warning in &response.warnings {
            println!("  - {}", warning);
        }
    }
}

fn sensitivity(args: SensitivityArgs) -> Result<()> {
    let input = load_input(&args.input)
        .with_context(|| format!("failed to load {}", args.input.display()))?;

    let runner = ScenarioRunner::new(input);
    let points = runner.sensitivity(args.parameter.into(), &args.values);

    println!("Sensitivity to {:?}", args.parameter);
    println!(
        "{:>12} {:>10} {:>10} {:>10} {:>14} {:>10}",
        "Value", "Gross %", "IRR %", "DSCR", "Final Equity", "Payback"
    );
    println!("{}", "-".repeat(71));
    for point in &points {
        let kpis = &point.kpis;
        println!(
            "{:>12.2} {:>10.2} {:>10.2} {:>10.2} {:>14} {:>10.2}",
            point.value,
            kpis.gross_yield,
            kpis.irr,
            kpis.dscr,
            kpis.final_equity,
            kpis.payback_years
        );
    }

    Ok(())
}
