//! Built-in federal withholding tables.
//!
//! Bracket thresholds, the Social Security wage base, and the Medicare
//! parameters are inflation-adjusted by the IRS each fall; a new tax year
//! means adding one `year_table` call here. Years outside
//! [`SUPPORTED_YEARS`] are deliberately absent — callers get an explicit
//! unsupported-year error instead of a silently wrong table.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use paycalc_core::models::{
    FilingStatus, MedicareThresholds, TaxBracket, TaxTableSet, TaxYearTable,
};

/// Tax years covered by the built-in tables, ascending.
pub const SUPPORTED_YEARS: [i32; 3] = [2023, 2024, 2025];

/// The seven federal marginal rates, unchanged across the supported years.
const RATES: [Decimal; 7] = [
    dec!(0.10),
    dec!(0.12),
    dec!(0.22),
    dec!(0.24),
    dec!(0.32),
    dec!(0.35),
    dec!(0.37),
];

/// Builds a seven-bracket schedule from the six inner thresholds; the top
/// bracket is unbounded.
fn schedule(thresholds: [Decimal; 6]) -> Vec<TaxBracket> {
    let mut brackets = Vec::with_capacity(7);
    let mut lower = Decimal::ZERO;
    for (i, upper) in thresholds.into_iter().enumerate() {
        brackets.push(TaxBracket {
            lower,
            upper: Some(upper),
            rate: RATES[i],
        });
        lower = upper;
    }
    brackets.push(TaxBracket {
        lower,
        upper: None,
        rate: RATES[6],
    });
    brackets
}

fn year_table(
    tax_year: i32,
    ss_wage_base: Decimal,
    single: [Decimal; 6],
    married_joint: [Decimal; 6],
    married_separate: [Decimal; 6],
    head_of_household: [Decimal; 6],
) -> TaxYearTable {
    let mut brackets = BTreeMap::new();
    brackets.insert(FilingStatus::Single, schedule(single));
    brackets.insert(FilingStatus::MarriedFilingJointly, schedule(married_joint));
    brackets.insert(
        FilingStatus::MarriedFilingSeparately,
        schedule(married_separate),
    );
    brackets.insert(FilingStatus::HeadOfHousehold, schedule(head_of_household));

    TaxYearTable {
        tax_year,
        brackets,
        ss_wage_base,
        ss_rate: dec!(0.062),
        medicare_rate: dec!(0.0145),
        medicare_surtax_rate: dec!(0.009),
        // Additional-Medicare thresholds are statutory and do not float.
        medicare_thresholds: MedicareThresholds {
            single: dec!(200000),
            married_filing_jointly: dec!(250000),
            married_filing_separately: dec!(125000),
            head_of_household: dec!(200000),
        },
    }
}

fn table_2023() -> TaxYearTable {
    year_table(
        2023,
        dec!(160200),
        [
            dec!(11000),
            dec!(44725),
            dec!(95375),
            dec!(182100),
            dec!(231250),
            dec!(578125),
        ],
        [
            dec!(22000),
            dec!(89450),
            dec!(190750),
            dec!(364200),
            dec!(462500),
            dec!(693750),
        ],
        [
            dec!(11000),
            dec!(44725),
            dec!(95375),
            dec!(182100),
            dec!(231250),
            dec!(346875),
        ],
        [
            dec!(15700),
            dec!(59850),
            dec!(95350),
            dec!(182100),
            dec!(231250),
            dec!(578100),
        ],
    )
}

fn table_2024() -> TaxYearTable {
    year_table(
        2024,
        dec!(168600),
        [
            dec!(11600),
            dec!(47150),
            dec!(100525),
            dec!(191950),
            dec!(243725),
            dec!(609350),
        ],
        [
            dec!(23200),
            dec!(94300),
            dec!(201050),
            dec!(383900),
            dec!(487450),
            dec!(731200),
        ],
        [
            dec!(11600),
            dec!(47150),
            dec!(100525),
            dec!(191950),
            dec!(243725),
            dec!(365600),
        ],
        [
            dec!(16550),
            dec!(63100),
            dec!(100500),
            dec!(191950),
            dec!(243725),
            dec!(609350),
        ],
    )
}

fn table_2025() -> TaxYearTable {
    year_table(
        2025,
        dec!(176100),
        [
            dec!(11925),
            dec!(48475),
            dec!(103350),
            dec!(197300),
            dec!(250525),
            dec!(626350),
        ],
        [
            dec!(23850),
            dec!(96950),
            dec!(206700),
            dec!(394600),
            dec!(501050),
            dec!(751600),
        ],
        [
            dec!(11925),
            dec!(48475),
            dec!(103350),
            dec!(197300),
            dec!(250525),
            dec!(375800),
        ],
        [
            dec!(17000),
            dec!(64850),
            dec!(103350),
            dec!(197300),
            dec!(250500),
            dec!(626350),
        ],
    )
}

/// The full validated set of built-in tables.
pub fn builtin_tables() -> TaxTableSet {
    TaxTableSet::new(vec![table_2023(), table_2024(), table_2025()])
        .expect("built-in tables satisfy the bracket invariants")
}

/// The built-in table for one year, if covered.
pub fn builtin_table(year: i32) -> Option<TaxYearTable> {
    match year {
        2023 => Some(table_2023()),
        2024 => Some(table_2024()),
        2025 => Some(table_2025()),
        _ => None,
    }
}
