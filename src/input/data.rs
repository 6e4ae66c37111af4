//! Investment assumptions as submitted by the caller
//!
//! Every numeric field is a raw `f64` exactly as received. Nothing here is
//! trusted: the simulation plan clamps and rounds each value before use.

use serde::{Deserialize, Serialize};

/// Default building depreciation period for furnished regimes (years)
pub const DEFAULT_DEPRECIATION_YEARS: f64 = 30.0;

/// Default furniture depreciation period for furnished regimes (years)
pub const DEFAULT_FURNITURE_DEPRECIATION_YEARS: f64 = 7.0;

fn default_depreciation_years() -> f64 {
    DEFAULT_DEPRECIATION_YEARS
}

fn default_furniture_depreciation_years() -> f64 {
    DEFAULT_FURNITURE_DEPRECIATION_YEARS
}

/// Complete set of assumptions for one simulation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RentabilityInput {
    pub context: PropertyContext,
    pub revenues: Revenues,
    pub charges: Charges,
    pub financing: Financing,
    pub tax: TaxSettings,
    pub exit: ExitSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PropertyType {
    #[default]
    Apartment,
    House,
    Building,
    Commercial,
    Parking,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PropertyState {
    New,
    #[default]
    Good,
    ToRenovate,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InvestmentStrategy {
    #[default]
    LongTerm,
    Furnished,
    Seasonal,
    Colocation,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Objective {
    #[default]
    Cashflow,
    Patrimony,
    TaxOptimization,
    #[serde(other)]
    Other,
}

/// The property and the acquisition costs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PropertyContext {
    pub property_type: PropertyType,
    pub location: String,
    /// Living surface in square meters
    pub surface: f64,
    pub state: PropertyState,
    pub strategy: InvestmentStrategy,
    /// Investment horizon in years, used when `exit.holdYears` is absent
    pub horizon: f64,
    pub objective: Objective,
    pub purchase_price: f64,
    pub notary_fees: f64,
    pub renovation_cost: f64,
    /// Share of the purchase price attributable to land (not depreciable)
    pub land_value: f64,
    pub furniture_cost: f64,
}

impl Default for PropertyContext {
    fn default() -> Self {
        Self {
            property_type: PropertyType::default(),
            location: String::new(),
            surface: 0.0,
            state: PropertyState::default(),
            strategy: InvestmentStrategy::default(),
            horizon: 20.0,
            objective: Objective::default(),
            purchase_price: 0.0,
            notary_fees: 0.0,
            renovation_cost: 0.0,
            land_value: 0.0,
            furniture_cost: 0.0,
        }
    }
}

/// How rents evolve from one year to the next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IndexationMethod {
    /// Rents never change; the indexation rate is ignored
    None,
    /// Fixed annual rate
    #[default]
    Fixed,
    /// Rent reference index, projected at the given annual rate
    Irl,
}

/// Rental income assumptions (amounts are monthly)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Revenues {
    pub monthly_rent: f64,
    pub indexation_method: IndexationMethod,
    /// Annual indexation, percent
    pub indexation_rate: f64,
    /// Share of gross revenue lost to vacancy and unpaid rent, percent
    pub vacancy_rate: f64,
    /// Twelve monthly rent coefficients for seasonal lettings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seasonality: Option<Vec<f64>>,
    pub parking_rent: f64,
    pub storage_rent: f64,
    pub other_revenue: f64,
}

/// A one-off capital expenditure planned for a given simulation year
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CapexItem {
    pub year: u32,
    pub amount: f64,
    pub description: String,
}

/// Operating charges
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Charges {
    /// Monthly condominium fees
    pub condo_fees: f64,
    /// Annual landlord insurance premium
    pub insurance: f64,
    /// Annual property tax
    pub property_tax: f64,
    /// Management fees, percent of net revenue
    pub management_fees: f64,
    /// Maintenance provision, percent of net revenue
    pub maintenance_rate: f64,
    /// Monthly charges recovered from the tenant
    pub recoverable_charges: f64,
    /// Annual growth of condo fees, insurance and property tax, percent
    pub charges_increase: f64,
    pub capex: Vec<CapexItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LoanType {
    /// Constant annuity
    #[default]
    Amortizing,
    /// Interest only, principal repaid at maturity
    InFine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeferralType {
    #[default]
    None,
    /// Interest is paid, principal repayment is postponed
    Partial,
    /// Nothing is paid, interest is capitalized
    Total,
}

/// Mortgage assumptions
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Financing {
    pub loan_amount: f64,
    pub loan_type: LoanType,
    /// Nominal annual rate, percent
    pub interest_rate: f64,
    /// Loan term in months
    pub duration: f64,
    /// Annual borrower insurance, percent of the initial principal
    pub insurance_rate: f64,
    pub deferral_type: DeferralType,
    pub deferral_months: f64,
    /// Penalty on the outstanding balance when repaid at exit, percent
    pub early_repayment_penalty: f64,
    /// Borrow the notary fees on top of `loan_amount`
    pub include_notary_fees: bool,
    /// Borrow the renovation cost on top of `loan_amount`
    pub include_renovation: bool,
}

/// Taxation regime with the parameters each regime needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum TaxRegime {
    /// Flat 50% abatement on net revenue
    Micro,
    /// Actual charges and interest deducted
    Real {
        #[serde(default)]
        deficit_carry_forward: bool,
    },
    /// Furnished non-professional rental with depreciation
    Lmnp {
        #[serde(default = "default_depreciation_years")]
        depreciation_years: f64,
        #[serde(default = "default_furniture_depreciation_years")]
        furniture_depreciation_years: f64,
    },
    /// Furnished professional rental with depreciation
    Lmp {
        #[serde(default = "default_depreciation_years")]
        depreciation_years: f64,
        #[serde(default = "default_furniture_depreciation_years")]
        furniture_depreciation_years: f64,
    },
    /// Any other regime: taxed like `Real` without carry-forward
    #[serde(other)]
    Other,
}

impl Default for TaxRegime {
    fn default() -> Self {
        TaxRegime::Real {
            deficit_carry_forward: false,
        }
    }
}

impl TaxRegime {
    pub fn lmnp() -> Self {
        TaxRegime::Lmnp {
            depreciation_years: DEFAULT_DEPRECIATION_YEARS,
            furniture_depreciation_years: DEFAULT_FURNITURE_DEPRECIATION_YEARS,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TaxRegime::Micro => "micro",
            TaxRegime::Real { .. } => "real",
            TaxRegime::Lmnp { .. } => "lmnp",
            TaxRegime::Lmp { .. } => "lmp",
            TaxRegime::Other => "other",
        }
    }
}

/// Tax assumptions.
///
/// On the wire the regime is either a plain name with its parameters beside
/// it (`{"regime": "lmnp", "depreciationYears": 25}`) or a tagged object
/// (`{"regime": {"kind": "lmnp", "depreciationYears": 25}}`). Serialization
/// always writes the flat form.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "TaxSettingsDocument", into = "TaxSettingsDocument")]
pub struct TaxSettings {
    pub regime: TaxRegime,
    /// Marginal income tax rate, percent
    pub marginal_tax_rate: f64,
    /// Social contributions, percent
    pub social_contributions: f64,
    /// Apply the 2.5% rental-income contribution
    pub crl: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
enum RegimeName {
    Micro,
    #[default]
    Real,
    Lmnp,
    Lmp,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
enum RegimeDocument {
    Tagged(TaxRegime),
    Name(RegimeName),
}

impl Default for RegimeDocument {
    fn default() -> Self {
        RegimeDocument::Name(RegimeName::Real)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct TaxSettingsDocument {
    regime: RegimeDocument,
    #[serde(skip_serializing_if = "Option::is_none")]
    deficit_carry_forward: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    depreciation_years: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    furniture_depreciation_years: Option<f64>,
    marginal_tax_rate: f64,
    social_contributions: f64,
    crl: bool,
}

impl From<TaxSettingsDocument> for TaxSettings {
    fn from(doc: TaxSettingsDocument) -> Self {
        let depreciation_years = doc.depreciation_years.unwrap_or(DEFAULT_DEPRECIATION_YEARS);
        let furniture_depreciation_years = doc
            .furniture_depreciation_years
            .unwrap_or(DEFAULT_FURNITURE_DEPRECIATION_YEARS);

        let regime = match doc.regime {
            RegimeDocument::Tagged(regime) => regime,
            RegimeDocument::Name(RegimeName::Micro) => TaxRegime::Micro,
            RegimeDocument::Name(RegimeName::Real) => TaxRegime::Real {
                deficit_carry_forward: doc.deficit_carry_forward.unwrap_or(false),
            },
            RegimeDocument::Name(RegimeName::Lmnp) => TaxRegime::Lmnp {
                depreciation_years,
                furniture_depreciation_years,
            },
            RegimeDocument::Name(RegimeName::Lmp) => TaxRegime::Lmp {
                depreciation_years,
                furniture_depreciation_years,
            },
            RegimeDocument::Name(RegimeName::Other) => TaxRegime::Other,
        };

        TaxSettings {
            regime,
            marginal_tax_rate: doc.marginal_tax_rate,
            social_contributions: doc.social_contributions,
            crl: doc.crl,
        }
    }
}

impl From<TaxSettings> for TaxSettingsDocument {
    fn from(settings: TaxSettings) -> Self {
        let mut doc = TaxSettingsDocument {
            marginal_tax_rate: settings.marginal_tax_rate,
            social_contributions: settings.social_contributions,
            crl: settings.crl,
            ..Default::default()
        };

        let name = match settings.regime {
            TaxRegime::Micro => RegimeName::Micro,
            TaxRegime::Real { deficit_carry_forward } => {
                doc.deficit_carry_forward = Some(deficit_carry_forward);
                RegimeName::Real
            }
            TaxRegime::Lmnp { depreciation_years, furniture_depreciation_years } => {
                doc.depreciation_years = Some(depreciation_years);
                doc.furniture_depreciation_years = Some(furniture_depreciation_years);
                RegimeName::Lmnp
            }
            TaxRegime::Lmp { depreciation_years, furniture_depreciation_years } => {
                doc.depreciation_years = Some(depreciation_years);
                doc.furniture_depreciation_years = Some(furniture_depreciation_years);
                RegimeName::Lmp
            }
            TaxRegime::Other => RegimeName::Other,
        };
        doc.regime = RegimeDocument::Name(name);
        doc
    }
}

/// How the resale price is estimated
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ExitValuation {
    /// Last year's gross revenue capitalized at a target rate (percent)
    CapRate { target_cap_rate: f64 },
    /// Purchase price compounded at an annual rate (percent)
    Appreciation { annual_appreciation: f64 },
    /// Market price per square meter times surface
    PricePerSqm { target_price_per_sqm: f64 },
    /// Resale at the purchase price
    #[default]
    #[serde(other)]
    PurchasePrice,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExitSettings {
    pub valuation: ExitValuation,
    /// Agency and transaction costs at resale, percent of the exit price
    pub selling_costs: f64,
    /// Tax on the gross capital gain, percent
    pub capital_gains_tax: f64,
    /// Deduct `financing.earlyRepaymentPenalty` on the debt repaid at sale
    pub apply_early_repayment_penalty: bool,
    /// Holding period in years; falls back to `context.horizon`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hold_years: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_document_uses_defaults() {
        let input: RentabilityInput = serde_json::from_str(
            r#"{"context": {"purchasePrice": 150000}, "revenues": {"monthlyRent": 700}}"#,
        )
        .unwrap();

        assert_eq!(input.context.purchase_price, 150_000.0);
        assert_eq!(input.context.horizon, 20.0);
        assert_eq!(input.revenues.monthly_rent, 700.0);
        assert_eq!(input.revenues.indexation_method, IndexationMethod::Fixed);
        assert_eq!(input.tax.regime, TaxRegime::default());
        assert_eq!(input.exit.valuation, ExitValuation::PurchasePrice);
        assert!(input.exit.hold_years.is_none());
    }

    #[test]
    fn test_tax_regime_tags() {
        let regime: TaxRegime = serde_json::from_str(r#"{"kind": "micro"}"#).unwrap();
        assert_eq!(regime, TaxRegime::Micro);

        let regime: TaxRegime =
            serde_json::from_str(r#"{"kind": "real", "deficitCarryForward": true}"#).unwrap();
        assert_eq!(regime, TaxRegime::Real { deficit_carry_forward: true });

        let regime: TaxRegime =
            serde_json::from_str(r#"{"kind": "lmnp", "depreciationYears": 25}"#).unwrap();
        assert_eq!(
            regime,
            TaxRegime::Lmnp {
                depreciation_years: 25.0,
                furniture_depreciation_years: DEFAULT_FURNITURE_DEPRECIATION_YEARS,
            }
        );

        let regime: TaxRegime = serde_json::from_str(r#"{"kind": "sci_is"}"#).unwrap();
        assert_eq!(regime, TaxRegime::Other);
    }

    #[test]
    fn test_flat_tax_settings() {
        let tax: TaxSettings = serde_json::from_str(
            r#"{"regime": "lmnp", "depreciationYears": 25, "marginalTaxRate": 30, "crl": true}"#,
        )
        .unwrap();
        assert_eq!(
            tax.regime,
            TaxRegime::Lmnp {
                depreciation_years: 25.0,
                furniture_depreciation_years: DEFAULT_FURNITURE_DEPRECIATION_YEARS,
            }
        );
        assert_eq!(tax.marginal_tax_rate, 30.0);
        assert!(tax.crl);

        let tax: TaxSettings =
            serde_json::from_str(r#"{"regime": "real", "deficitCarryForward": true}"#).unwrap();
        assert_eq!(tax.regime, TaxRegime::Real { deficit_carry_forward: true });

        let tax: TaxSettings = serde_json::from_str(r#"{"regime": "sci_is"}"#).unwrap();
        assert_eq!(tax.regime, TaxRegime::Other);

        let tax: TaxSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(tax.regime, TaxRegime::default());
    }

    #[test]
    fn test_tagged_tax_settings() {
        let tax: TaxSettings =
            serde_json::from_str(r#"{"regime": {"kind": "micro"}, "socialContributions": 17.2}"#)
                .unwrap();
        assert_eq!(tax.regime, TaxRegime::Micro);
        assert_eq!(tax.social_contributions, 17.2);
    }

    #[test]
    fn test_tax_settings_written_flat() {
        let tax = TaxSettings {
            regime: TaxRegime::lmnp(),
            ..Default::default()
        };
        let value = serde_json::to_value(&tax).unwrap();
        assert_eq!(value["regime"], "lmnp");
        assert_eq!(value["depreciationYears"], 30.0);

        let back: TaxSettings = serde_json::from_value(value).unwrap();
        assert_eq!(back, tax);
    }

    #[test]
    fn test_exit_valuation_tags() {
        let valuation: ExitValuation =
            serde_json::from_str(r#"{"method": "capRate", "targetCapRate": 5.5}"#).unwrap();
        assert_eq!(valuation, ExitValuation::CapRate { target_cap_rate: 5.5 });

        let valuation: ExitValuation =
            serde_json::from_str(r#"{"method": "pricePerSqm", "targetPricePerSqm": 4200}"#)
                .unwrap();
        assert_eq!(valuation, ExitValuation::PricePerSqm { target_price_per_sqm: 4200.0 });

        let valuation: ExitValuation = serde_json::from_str(r#"{"method": "dcf"}"#).unwrap();
        assert_eq!(valuation, ExitValuation::PurchasePrice);
    }

    #[test]
    fn test_unknown_enum_values_fall_back() {
        let context: PropertyContext =
            serde_json::from_str(r#"{"propertyType": "castle", "strategy": "colocation"}"#)
                .unwrap();
        assert_eq!(context.property_type, PropertyType::Other);
        assert_eq!(context.strategy, InvestmentStrategy::Colocation);
    }
}
