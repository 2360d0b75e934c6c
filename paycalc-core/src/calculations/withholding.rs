//! Per-period payroll withholding: federal income tax, Social Security, and
//! Medicare.
//!
//! All three calculators work on a single pay period. Federal withholding
//! annualizes the period's gross, runs marginal bracket accumulation against
//! the annualized figure, and de-annualizes the result. Social Security and
//! Medicare depend on the year-to-date gross *before* the period, which the
//! caller must supply — the wage-base cap and the additional-Medicare surtax
//! both hinge on where the cumulative total sits relative to a threshold.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::calculations::common::{max, round_half_up};
use crate::models::{FilingStatus, TaxTableSet, TaxYearTable};

/// Errors that can occur during withholding calculations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WithholdingError {
    /// No bracket table exists for the requested tax year. This is never
    /// silently defaulted: computing with another year's table would produce
    /// financially wrong numbers.
    #[error("unsupported tax year {0}")]
    UnsupportedTaxYear(i32),

    /// The year's table has no bracket schedule for the filing status.
    #[error("tax year {year} has no bracket table for filing status {status}")]
    MissingFilingStatus { year: i32, status: FilingStatus },
}

/// Resolves the table for `year`, failing loudly when the year is not
/// covered.
pub fn table_for(
    tables: &TaxTableSet,
    year: i32,
) -> Result<&TaxYearTable, WithholdingError> {
    tables
        .get(year)
        .ok_or(WithholdingError::UnsupportedTaxYear(year))
}

/// Federal income tax withheld for one pay period.
///
/// The period's gross is annualized (`period_gross × periods_per_year`),
/// taxed by marginal bracket accumulation, and the annual figure divided back
/// down to a per-period amount, rounded half-up. Zero or negative gross pay
/// returns zero — there is no negative tax.
pub fn federal_withholding(
    table: &TaxYearTable,
    period_gross: Decimal,
    status: FilingStatus,
    periods_per_year: u32,
) -> Result<Decimal, WithholdingError> {
    if period_gross <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }

    let brackets = table
        .brackets_for(status)
        .ok_or(WithholdingError::MissingFilingStatus {
            year: table.tax_year,
            status,
        })?;

    let periods = Decimal::from(periods_per_year);
    let annualized = period_gross * periods;

    let mut annual_tax = Decimal::ZERO;
    for bracket in brackets {
        if annualized <= bracket.lower {
            break;
        }
        let slice_top = match bracket.upper {
            Some(upper) if upper < annualized => upper,
            _ => annualized,
        };
        annual_tax += (slice_top - bracket.lower) * bracket.rate;
    }

    Ok(round_half_up(annual_tax / periods))
}

/// Social Security tax for one pay period.
///
/// The flat rate applies only to the portion of the period's gross that keeps
/// cumulative YTD gross at or below the annual wage base. Once the base is
/// exhausted, the tax is zero; in the crossing period only the sub-base slice
/// is taxed.
pub fn social_security(
    table: &TaxYearTable,
    period_gross: Decimal,
    ytd_gross_before: Decimal,
) -> Decimal {
    if period_gross <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let base = table.ss_wage_base;
    let capped_after = (ytd_gross_before + period_gross).min(base);
    let capped_before = ytd_gross_before.min(base);
    let taxable = max(capped_after - capped_before, Decimal::ZERO);

    round_half_up(taxable * table.ss_rate)
}

/// Medicare tax for one pay period.
///
/// The flat rate applies to all gross pay. The additional surtax applies only
/// to the slice of this period's wages that lies above the filing-status
/// threshold, computed from the YTD delta so the crossing period is surtaxed
/// on the above-threshold portion alone.
pub fn medicare(
    table: &TaxYearTable,
    period_gross: Decimal,
    ytd_gross_before: Decimal,
    status: FilingStatus,
) -> Decimal {
    if period_gross <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let base_tax = period_gross * table.medicare_rate;

    let threshold = table.medicare_thresholds.for_status(status);
    let over_after = max(ytd_gross_before + period_gross - threshold, Decimal::ZERO);
    let over_before = max(ytd_gross_before - threshold, Decimal::ZERO);
    let surtax = (over_after - over_before) * table.medicare_surtax_rate;

    round_half_up(base_tax + surtax)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use crate::models::{MedicareThresholds, TaxBracket, TaxYearTable};

    use super::*;

    /// 2024 single-filer schedule, shared by the per-period tests.
    fn single_brackets_2024() -> Vec<TaxBracket> {
        vec![
            TaxBracket {
                lower: dec!(0),
                upper: Some(dec!(11600)),
                rate: dec!(0.10),
            },
            TaxBracket {
                lower: dec!(11600),
                upper: Some(dec!(47150)),
                rate: dec!(0.12),
            },
            TaxBracket {
                lower: dec!(47150),
                upper: Some(dec!(100525)),
                rate: dec!(0.22),
            },
            TaxBracket {
                lower: dec!(100525),
                upper: Some(dec!(191950)),
                rate: dec!(0.24),
            },
            TaxBracket {
                lower: dec!(191950),
                upper: Some(dec!(243725)),
                rate: dec!(0.32),
            },
            TaxBracket {
                lower: dec!(243725),
                upper: Some(dec!(609350)),
                rate: dec!(0.35),
            },
            TaxBracket {
                lower: dec!(609350),
                upper: None,
                rate: dec!(0.37),
            },
        ]
    }

    fn table_2024() -> TaxYearTable {
        let mut brackets = BTreeMap::new();
        brackets.insert(FilingStatus::Single, single_brackets_2024());
        TaxYearTable {
            tax_year: 2024,
            brackets,
            ss_wage_base: dec!(168600),
            ss_rate: dec!(0.062),
            medicare_rate: dec!(0.0145),
            medicare_surtax_rate: dec!(0.009),
            medicare_thresholds: MedicareThresholds {
                single: dec!(200000),
                married_filing_jointly: dec!(250000),
                married_filing_separately: dec!(125000),
                head_of_household: dec!(200000),
            },
        }
    }

    // =========================================================================
    // federal_withholding tests
    // =========================================================================

    #[test]
    fn federal_zero_gross_is_zero_tax() {
        let table = table_2024();

        let tax = federal_withholding(&table, dec!(0), FilingStatus::Single, 26).unwrap();

        assert_eq!(tax, dec!(0));
    }

    #[test]
    fn federal_negative_gross_is_zero_tax() {
        let table = table_2024();

        let tax = federal_withholding(&table, dec!(-100), FilingStatus::Single, 26).unwrap();

        assert_eq!(tax, dec!(0));
    }

    #[test]
    fn federal_first_bracket_only() {
        let table = table_2024();

        // 400/period annualizes to 10400, entirely inside the 10% bracket.
        let tax = federal_withholding(&table, dec!(400), FilingStatus::Single, 26).unwrap();

        // 10400 * 0.10 / 26 = 40
        assert_eq!(tax, dec!(40.00));
    }

    #[test]
    fn federal_accumulates_across_brackets() {
        let table = table_2024();

        // 3200/period annualizes to 83200.
        // Annual tax: 11600*0.10 + (47150-11600)*0.12 + (83200-47150)*0.22
        //           = 1160 + 4266 + 7931 = 13357; per period 513.73 (13357/26).
        let tax = federal_withholding(&table, dec!(3200), FilingStatus::Single, 26).unwrap();

        assert_eq!(tax, dec!(513.73));
    }

    #[test]
    fn federal_top_bracket_is_unbounded() {
        let table = table_2024();

        // 30000/period annualizes to 780000, reaching the 37% bracket.
        // Annual: 1160 + 4266 + 11742.50 + 21942 + 16568 + 127968.75
        //         + (780000-609350)*0.37 = 183647.25 + 63140.50 = 246787.75
        let tax = federal_withholding(&table, dec!(30000), FilingStatus::Single, 26).unwrap();

        assert_eq!(tax, round_half_up(dec!(246787.75) / dec!(26)));
    }

    #[test]
    fn federal_missing_filing_status_errors() {
        let table = table_2024();

        let result = federal_withholding(&table, dec!(3200), FilingStatus::HeadOfHousehold, 26);

        assert_eq!(
            result,
            Err(WithholdingError::MissingFilingStatus {
                year: 2024,
                status: FilingStatus::HeadOfHousehold,
            })
        );
    }

    #[test]
    fn table_for_rejects_unsupported_year() {
        let tables = TaxTableSet::new(vec![]).unwrap();

        assert_eq!(
            table_for(&tables, 1999).unwrap_err(),
            WithholdingError::UnsupportedTaxYear(1999)
        );
    }

    // =========================================================================
    // social_security tests
    // =========================================================================

    #[test]
    fn ss_flat_rate_below_wage_base() {
        let table = table_2024();

        let tax = social_security(&table, dec!(3200), dec!(0));

        assert_eq!(tax, dec!(198.40));
    }

    #[test]
    fn ss_partial_period_at_wage_base_crossing() {
        let table = table_2024();

        // YTD 168000 + 3200 crosses the 168600 base; only 600 is taxable.
        let tax = social_security(&table, dec!(3200), dec!(168000));

        assert_eq!(tax, dec!(37.20));
        // Strictly less than the uncapped amount.
        assert!(tax < dec!(3200) * dec!(0.062));
    }

    #[test]
    fn ss_zero_after_wage_base_exhausted() {
        let table = table_2024();

        let tax = social_security(&table, dec!(3200), dec!(168600));

        assert_eq!(tax, dec!(0));
    }

    #[test]
    fn ss_zero_gross_is_zero() {
        let table = table_2024();

        assert_eq!(social_security(&table, dec!(0), dec!(50000)), dec!(0));
    }

    // =========================================================================
    // medicare tests
    // =========================================================================

    #[test]
    fn medicare_flat_rate_below_threshold() {
        let table = table_2024();

        let tax = medicare(&table, dec!(3200), dec!(0), FilingStatus::Single);

        assert_eq!(tax, dec!(46.40));
    }

    #[test]
    fn medicare_surtax_applies_to_crossing_portion_only() {
        let table = table_2024();

        // YTD 199000 + 3200 crosses the 200000 single threshold;
        // surtax hits the 2200 above it, not the full period.
        let tax = medicare(&table, dec!(3200), dec!(199000), FilingStatus::Single);

        // 3200 * 0.0145 + 2200 * 0.009 = 46.40 + 19.80
        assert_eq!(tax, dec!(66.20));
    }

    #[test]
    fn medicare_surtax_full_period_above_threshold() {
        let table = table_2024();

        let tax = medicare(&table, dec!(3200), dec!(250000), FilingStatus::Single);

        // 46.40 + 3200 * 0.009 = 46.40 + 28.80
        assert_eq!(tax, dec!(75.20));
    }

    #[test]
    fn medicare_threshold_depends_on_filing_status() {
        let table = table_2024();

        // MFS threshold is 125000, so the same YTD triggers the surtax.
        let mfs = medicare(
            &table,
            dec!(3200),
            dec!(130000),
            FilingStatus::MarriedFilingSeparately,
        );
        let single = medicare(&table, dec!(3200), dec!(130000), FilingStatus::Single);

        assert_eq!(mfs, dec!(75.20));
        assert_eq!(single, dec!(46.40));
    }

    #[test]
    fn medicare_zero_gross_is_zero() {
        let table = table_2024();

        assert_eq!(
            medicare(&table, dec!(0), dec!(300000), FilingStatus::Single),
            dec!(0)
        );
    }
}
