//! Biweekly pay period generation.
//!
//! Given an hourly rate, hours per period, filing status, and tax year, the
//! generator produces exactly 26 ordered pay periods with dates, gross pay,
//! withholding, and running totals. Input validation is a separate pre-step;
//! generation assumes validated inputs and does not re-check them.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::calculations::common::round_half_up;
use crate::calculations::withholding::{
    WithholdingError, federal_withholding, medicare, social_security, table_for,
};
use crate::models::{
    PayPeriod, PayTotals, PaystubData, PaystubInputs, TaxTableSet, ValidationErrors,
};

/// Pay periods per year for a biweekly schedule.
pub const BIWEEKLY_PERIODS: u32 = 26;

/// Errors that can occur during paystub generation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaystubError {
    #[error(transparent)]
    Withholding(#[from] WithholdingError),

    /// The year has no representable calendar dates (far outside chrono's
    /// supported range).
    #[error("no calendar dates for year {0}")]
    InvalidYear(i32),
}

/// Pre-generation validation, surfaced as a field-keyed error map.
///
/// Rejects an empty employee name, non-positive hourly rate, non-positive
/// hours per period, a state tax rate outside [0, 1], and negative other
/// deductions. Passing validation does not guarantee the tax year is covered
/// — that is the generator's job, so coverage can vary by table set.
pub fn validate_paystub_inputs(inputs: &PaystubInputs) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if inputs.employee_name.trim().is_empty() {
        errors.push("employee_name", "must not be empty");
    }
    if inputs.hourly_rate <= Decimal::ZERO {
        errors.push("hourly_rate", "must be greater than zero");
    }
    if inputs.hours_per_period <= Decimal::ZERO {
        errors.push("hours_per_period", "must be greater than zero");
    }
    if inputs.state_tax_rate < Decimal::ZERO || inputs.state_tax_rate > Decimal::ONE {
        errors.push("state_tax_rate", "must be between 0 and 1");
    }
    if inputs.other_deductions < Decimal::ZERO {
        errors.push("other_deductions", "must be non-negative");
    }

    errors.into_result()
}

/// The 26 biweekly pay dates for a year: the first Friday of the year, then
/// every 14 days after it.
pub fn biweekly_pay_dates(year: i32) -> Option<Vec<NaiveDate>> {
    let jan_first = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let offset = (Weekday::Fri.num_days_from_monday() + 7
        - jan_first.weekday().num_days_from_monday())
        % 7;
    let first_friday = jan_first.checked_add_days(Days::new(offset as u64))?;

    let mut dates = Vec::with_capacity(BIWEEKLY_PERIODS as usize);
    let mut date = first_friday;
    for _ in 0..BIWEEKLY_PERIODS {
        dates.push(date);
        date = date.checked_add_days(Days::new(14))?;
    }
    Some(dates)
}

/// Generates a full year of biweekly paystubs against a validated table set.
#[derive(Debug, Clone)]
pub struct PaystubGenerator<'a> {
    tables: &'a TaxTableSet,
}

impl<'a> PaystubGenerator<'a> {
    pub fn new(tables: &'a TaxTableSet) -> Self {
        Self { tables }
    }

    /// Produces exactly [`BIWEEKLY_PERIODS`] ordered pay periods plus totals.
    ///
    /// For period `i` (0-based), the YTD gross baseline is
    /// `gross_per_period × i`; Social Security capping and the Medicare
    /// surtax key off that baseline. Totals are accumulated from the rounded
    /// per-period values, so they equal the element-wise sums exactly.
    ///
    /// Pure and deterministic: identical inputs always yield identical
    /// output.
    ///
    /// # Errors
    ///
    /// Fails with [`WithholdingError::UnsupportedTaxYear`] when the table set
    /// does not cover `inputs.tax_year`, and with
    /// [`WithholdingError::MissingFilingStatus`] when the year's table lacks
    /// the filing status.
    pub fn generate(
        &self,
        inputs: &PaystubInputs,
    ) -> Result<PaystubData, PaystubError> {
        let table = table_for(self.tables, inputs.tax_year)?;
        let pay_dates =
            biweekly_pay_dates(inputs.tax_year).ok_or(PaystubError::InvalidYear(inputs.tax_year))?;

        let gross = round_half_up(inputs.hourly_rate * inputs.hours_per_period);
        let state_tax = round_half_up(gross * inputs.state_tax_rate);
        let other_deductions = round_half_up(inputs.other_deductions);
        // Federal withholding annualizes the period gross, so it is the same
        // for every period of the year.
        let federal_tax =
            federal_withholding(table, gross, inputs.filing_status, BIWEEKLY_PERIODS)?;

        let mut pay_periods = Vec::with_capacity(BIWEEKLY_PERIODS as usize);
        let mut totals = PayTotals::default();

        for i in 0..BIWEEKLY_PERIODS {
            let ytd_gross = gross * Decimal::from(i);
            let ss = social_security(table, gross, ytd_gross);
            let medicare_tax = medicare(table, gross, ytd_gross, inputs.filing_status);

            // Net pay is not clamped at zero: deductions exceeding gross
            // show up as a negative net.
            let net_pay = gross - federal_tax - ss - medicare_tax - state_tax - other_deductions;

            let period = PayPeriod {
                period: i + 1,
                pay_date: pay_dates[i as usize],
                hours: inputs.hours_per_period,
                gross_pay: gross,
                federal_tax,
                social_security: ss,
                medicare: medicare_tax,
                state_tax,
                other_deductions,
                net_pay,
            };
            totals.accumulate(&period);
            pay_periods.push(period);
        }

        Ok(PaystubData {
            employee_name: inputs.employee_name.clone(),
            employer_name: inputs.employer_name.clone(),
            hourly_rate: inputs.hourly_rate,
            hours_per_period: inputs.hours_per_period,
            filing_status: inputs.filing_status,
            tax_year: inputs.tax_year,
            pay_periods,
            totals,
        })
    }
}
