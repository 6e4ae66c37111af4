//! Reference scenarios shared by unit tests

use super::*;

/// 10-year hold, 200k purchase, 160k loan at 3% over 20 years, 1000/month rent, 5% vacancy
pub fn standard_input() -> RentabilityInput {
    RentabilityInput {
        context: PropertyContext {
            surface: 45.0,
            horizon: 10.0,
            purchase_price: 200_000.0,
            notary_fees: 15_000.0,
            land_value: 30_000.0,
            furniture_cost: 5_000.0,
            ..Default::default()
        },
        revenues: Revenues {
            monthly_rent: 1_000.0,
            indexation_rate: 1.5,
            vacancy_rate: 5.0,
            ..Default::default()
        },
        charges: Charges {
            condo_fees: 80.0,
            insurance: 250.0,
            property_tax: 1_200.0,
            management_fees: 7.0,
            maintenance_rate: 3.0,
            recoverable_charges: 40.0,
            charges_increase: 2.0,
            ..Default::default()
        },
        financing: Financing {
            loan_amount: 160_000.0,
            interest_rate: 3.0,
            duration: 240.0,
            insurance_rate: 0.3,
            ..Default::default()
        },
        tax: TaxSettings {
            regime: TaxRegime::Real { deficit_carry_forward: false },
            marginal_tax_rate: 30.0,
            social_contributions: 17.2,
            crl: false,
        },
        exit: ExitSettings {
            valuation: ExitValuation::Appreciation { annual_appreciation: 1.5 },
            selling_costs: 5.0,
            capital_gains_tax: 19.0,
            apply_early_repayment_penalty: false,
            hold_years: Some(10.0),
        },
    }
}
