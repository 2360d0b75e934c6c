use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::ValidationErrors;

/// How often loan payments are made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentFrequency {
    Monthly,
    Biweekly,
}

impl PaymentFrequency {
    pub fn periods_per_year(&self) -> u32 {
        match self {
            Self::Monthly => 12,
            Self::Biweekly => 26,
        }
    }
}

/// Governs how [`VehicleQuote::into_inputs`] treats missing or invalid
/// fields.
///
/// `Lenient` backfills documented defaults and clamps bad values (the
/// "always render something" policy of a public-facing calculator);
/// `Strict` rejects them with a field-keyed error map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputMode {
    Strict,
    Lenient,
}

/// Raw user input for the vehicle calculators. Every field is optional;
/// convert to [`VehicleInputs`] with [`VehicleQuote::into_inputs`] before
/// calling any calculation function.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleQuote {
    pub purchase_price: Option<Decimal>,
    pub trade_in_value: Option<Decimal>,
    pub vehicle_weight_lbs: Option<u32>,
    pub electric: Option<bool>,
    pub used: Option<bool>,
    pub county: Option<String>,
    pub zip_code: Option<String>,
    pub loan_term_months: Option<u32>,
    /// Annual percentage rate, e.g. `6.5` for 6.5% APR.
    pub annual_rate_pct: Option<Decimal>,
    pub down_payment: Option<Decimal>,
    pub payment_frequency: Option<PaymentFrequency>,
    pub loan_start_date: Option<NaiveDate>,
    pub lease_annual_mileage: Option<u32>,
    pub lease_buyout: Option<Decimal>,
    pub residual_value: Option<Decimal>,
    pub money_factor: Option<Decimal>,
}

/// Fully-populated calculation input. The raw calculators take this type
/// only; the sole way to obtain one is the total conversion from
/// [`VehicleQuote`], so every invariant (monetary fields non-negative, loan
/// term positive) holds by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleInputs {
    pub purchase_price: Decimal,
    pub trade_in_value: Decimal,
    pub vehicle_weight_lbs: u32,
    pub electric: bool,
    pub used: bool,
    pub county: String,
    pub zip_code: String,
    pub loan_term_months: u32,
    pub annual_rate_pct: Decimal,
    pub down_payment: Decimal,
    pub payment_frequency: PaymentFrequency,
    pub loan_start_date: Option<NaiveDate>,
    pub lease_annual_mileage: u32,
    pub lease_buyout: Decimal,
    pub residual_value: Decimal,
    pub money_factor: Decimal,
}

/// Defaults backfilled for missing (or, in lenient mode, invalid) fields.
pub mod defaults {
    use rust_decimal::Decimal;

    pub const VEHICLE_WEIGHT_LBS: u32 = 4000;
    pub const COUNTY: &str = "dallas";
    pub const ZIP_CODE: &str = "75201";
    pub const LOAN_TERM_MONTHS: u32 = 60;
    pub const LEASE_ANNUAL_MILEAGE: u32 = 12000;
    /// 6.5% APR.
    pub const ANNUAL_RATE_PCT: Decimal = Decimal::from_parts(65, 0, 0, false, 1);
    /// 0.00125, roughly a 3% APR equivalent.
    pub const MONEY_FACTOR: Decimal = Decimal::from_parts(125, 0, 0, false, 5);
    /// Residual value as a share of purchase price: 55%.
    pub const RESIDUAL_SHARE: Decimal = Decimal::from_parts(55, 0, 0, false, 2);
}

fn zip_regex() -> &'static Regex {
    static ZIP: OnceLock<Regex> = OnceLock::new();
    ZIP.get_or_init(|| Regex::new(r"^\d{5}$").expect("zip pattern is valid"))
}

impl VehicleQuote {
    /// Total conversion to [`VehicleInputs`].
    ///
    /// In [`InputMode::Strict`], a missing purchase price or any field that
    /// violates its invariant is reported in the returned
    /// [`ValidationErrors`], keyed by field name. In [`InputMode::Lenient`],
    /// the same conditions are logged as warnings and replaced with the
    /// values from [`defaults`]; negative monetary fields become zero.
    pub fn into_inputs(
        self,
        mode: InputMode,
    ) -> Result<VehicleInputs, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let purchase_price = match self.purchase_price {
            Some(price) if price >= Decimal::ZERO => price,
            Some(price) => {
                lenient_or(
                    mode,
                    &mut errors,
                    "purchase_price",
                    format!("must be non-negative, got {price}"),
                );
                Decimal::ZERO
            }
            None => {
                lenient_or(mode, &mut errors, "purchase_price", "is required");
                Decimal::ZERO
            }
        };

        let trade_in_value =
            money_field(self.trade_in_value, "trade_in_value", mode, &mut errors);
        let down_payment = money_field(self.down_payment, "down_payment", mode, &mut errors);
        let lease_buyout_raw = self.lease_buyout;

        let annual_rate_pct = match self.annual_rate_pct {
            Some(rate) if rate >= Decimal::ZERO => rate,
            Some(rate) => {
                lenient_or(
                    mode,
                    &mut errors,
                    "annual_rate_pct",
                    format!("must be non-negative, got {rate}"),
                );
                defaults::ANNUAL_RATE_PCT
            }
            None => defaults::ANNUAL_RATE_PCT,
        };

        let money_factor = match self.money_factor {
            Some(mf) if mf >= Decimal::ZERO => mf,
            Some(mf) => {
                lenient_or(
                    mode,
                    &mut errors,
                    "money_factor",
                    format!("must be non-negative, got {mf}"),
                );
                defaults::MONEY_FACTOR
            }
            None => defaults::MONEY_FACTOR,
        };

        let loan_term_months = match self.loan_term_months {
            Some(term) if term > 0 => term,
            Some(_) => {
                lenient_or(
                    mode,
                    &mut errors,
                    "loan_term_months",
                    "must be greater than zero",
                );
                defaults::LOAN_TERM_MONTHS
            }
            None => defaults::LOAN_TERM_MONTHS,
        };

        let vehicle_weight_lbs = match self.vehicle_weight_lbs {
            Some(weight) if weight > 0 => weight,
            Some(_) => {
                lenient_or(
                    mode,
                    &mut errors,
                    "vehicle_weight_lbs",
                    "must be greater than zero",
                );
                defaults::VEHICLE_WEIGHT_LBS
            }
            None => defaults::VEHICLE_WEIGHT_LBS,
        };

        let zip_code = match self.zip_code {
            Some(zip) if zip_regex().is_match(zip.trim()) => zip.trim().to_string(),
            Some(zip) => {
                lenient_or(
                    mode,
                    &mut errors,
                    "zip_code",
                    format!("must be five digits, got '{zip}'"),
                );
                defaults::ZIP_CODE.to_string()
            }
            None => defaults::ZIP_CODE.to_string(),
        };

        let county = match self.county {
            Some(county) if !county.trim().is_empty() => county.trim().to_lowercase(),
            Some(_) => {
                lenient_or(mode, &mut errors, "county", "must not be empty");
                defaults::COUNTY.to_string()
            }
            None => defaults::COUNTY.to_string(),
        };

        let residual_value = match self.residual_value {
            Some(residual) if residual >= Decimal::ZERO => residual,
            Some(residual) => {
                lenient_or(
                    mode,
                    &mut errors,
                    "residual_value",
                    format!("must be non-negative, got {residual}"),
                );
                purchase_price * defaults::RESIDUAL_SHARE
            }
            None => purchase_price * defaults::RESIDUAL_SHARE,
        };

        let lease_buyout = match lease_buyout_raw {
            Some(buyout) if buyout >= Decimal::ZERO => buyout,
            Some(buyout) => {
                lenient_or(
                    mode,
                    &mut errors,
                    "lease_buyout",
                    format!("must be non-negative, got {buyout}"),
                );
                residual_value
            }
            // Absent a stated buyout, assume the residual.
            None => residual_value,
        };

        errors.into_result()?;

        Ok(VehicleInputs {
            purchase_price,
            trade_in_value,
            vehicle_weight_lbs,
            electric: self.electric.unwrap_or(false),
            used: self.used.unwrap_or(false),
            county,
            zip_code,
            loan_term_months,
            annual_rate_pct,
            down_payment,
            payment_frequency: self.payment_frequency.unwrap_or(PaymentFrequency::Monthly),
            loan_start_date: self.loan_start_date,
            lease_annual_mileage: self
                .lease_annual_mileage
                .unwrap_or(defaults::LEASE_ANNUAL_MILEAGE),
            lease_buyout,
            residual_value,
            money_factor,
        })
    }
}

/// Records the problem in strict mode, logs and falls through to the default
/// in lenient mode.
fn lenient_or(
    mode: InputMode,
    errors: &mut ValidationErrors,
    field: &str,
    message: impl Into<String>,
) {
    let message = message.into();
    match mode {
        InputMode::Strict => errors.push(field, message),
        InputMode::Lenient => warn!(field, %message, "substituting default for vehicle input"),
    }
}

fn money_field(
    value: Option<Decimal>,
    field: &str,
    mode: InputMode,
    errors: &mut ValidationErrors,
) -> Decimal {
    match value {
        Some(amount) if amount >= Decimal::ZERO => amount,
        Some(amount) => {
            lenient_or(
                mode,
                errors,
                field,
                format!("must be non-negative, got {amount}"),
            );
            Decimal::ZERO
        }
        None => Decimal::ZERO,
    }
}

/// Title, tax, and license fees for one purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TtlBreakdown {
    pub sales_tax: Decimal,
    pub title_fee: Decimal,
    pub registration_fee: Decimal,
    pub processing_fee: Decimal,
    pub local_fee: Decimal,
    pub electric_fee: Decimal,
    pub total: Decimal,
}

/// One row of a loan amortization schedule. The payment date is present only
/// when the loan start date was supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationEntry {
    pub period: u32,
    pub payment_date: Option<NaiveDate>,
    pub payment: Decimal,
    pub interest: Decimal,
    pub principal: Decimal,
    pub balance: Decimal,
}

/// Amortized loan payment plus the full schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentResult {
    /// Price net of trade-in and down payment, with TTL fees financed in.
    pub amount_financed: Decimal,
    pub periodic_payment: Decimal,
    pub periods_per_year: u32,
    pub total_periods: u32,
    pub total_interest: Decimal,
    pub total_paid: Decimal,
    pub schedule: Vec<AmortizationEntry>,
}

/// Monthly lease payment broken into its components, alongside the loan
/// alternative for a side-by-side comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaseComparison {
    pub monthly_lease_payment: Decimal,
    pub depreciation_charge: Decimal,
    pub finance_charge: Decimal,
    /// Residual after the mileage-allowance adjustment.
    pub adjusted_residual: Decimal,
    /// Down payment plus every lease payment over the term.
    pub total_lease_cost: Decimal,
    /// Total lease cost plus the end-of-lease buyout.
    pub buyout_total: Decimal,
    pub loan_periodic_payment: Decimal,
    pub loan_total_cost: Decimal,
    pub lease_is_cheaper: bool,
}

/// Total cost of ownership over the loan term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TcoBreakdown {
    pub down_payment: Decimal,
    pub fees_financed: Decimal,
    pub total_loan_payments: Decimal,
    pub total_interest: Decimal,
    pub estimated_resale_value: Decimal,
    pub depreciation: Decimal,
    pub ownership_months: u32,
    pub total_cost: Decimal,
}

/// Aggregate of the four vehicle calculators, each independently computable
/// from the same [`VehicleInputs`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleResults {
    pub ttl: TtlBreakdown,
    pub payment: PaymentResult,
    pub lease: LeaseComparison,
    pub tco: TcoBreakdown,
}
