use std::collections::HashMap;
use std::io::Read;

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use paycalc_core::models::{FilingStatus, TaxBracket, TaxTableError, TaxTableSet};

/// Errors that can occur when loading bracket data.
#[derive(Debug, Error)]
pub enum BracketLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),

    #[error("Tax year {0} is not in the table set (load the built-in tables first)")]
    TaxYearNotFound(i32),

    #[error("Bracket table invariant violated: {0}")]
    Table(#[from] TaxTableError),
}

impl From<csv::Error> for BracketLoaderError {
    fn from(err: csv::Error) -> Self {
        BracketLoaderError::CsvParse(err.to_string())
    }
}

/// Maps IRS schedule codes to filing statuses.
///
/// - Schedule X → Single
/// - Schedule Y-1 → Married Filing Jointly
/// - Schedule Y-2 → Married Filing Separately
/// - Schedule Z → Head of Household
fn schedule_to_filing_status(schedule: &str) -> Result<FilingStatus, BracketLoaderError> {
    match schedule {
        "X" => Ok(FilingStatus::Single),
        "Y-1" => Ok(FilingStatus::MarriedFilingJointly),
        "Y-2" => Ok(FilingStatus::MarriedFilingSeparately),
        "Z" => Ok(FilingStatus::HeadOfHousehold),
        _ => Err(BracketLoaderError::InvalidSchedule(schedule.to_string())),
    }
}

/// A single record from the tax brackets CSV file.
///
/// The CSV format uses IRS schedule designations:
/// - `tax_year`: The tax year (e.g., 2025)
/// - `schedule`: The IRS schedule code (X, Y-1, Y-2, Z)
/// - `min_income`: The minimum income for this bracket
/// - `max_income`: The maximum income for this bracket (empty for unlimited)
/// - `rate`: The marginal tax rate as a decimal (e.g., 0.10 for 10%)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BracketRecord {
    pub tax_year: i32,
    pub schedule: String,
    pub min_income: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub max_income: Option<Decimal>,
    pub rate: Decimal,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Loader for bracket data from CSV files.
///
/// Reads CSV data and overlays it onto an existing [`TaxTableSet`], so
/// mid-year IRS corrections can be applied without a rebuild. The CSV uses
/// IRS schedule codes (X, Y-1, Y-2, Z) which are mapped to filing statuses.
pub struct BracketLoader;

impl BracketLoader {
    /// Parse bracket records from a CSV reader.
    ///
    /// The reader can be any type that implements `Read`, such as a file or
    /// a string slice.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<BracketRecord>, BracketLoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: BracketRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Overlay bracket records onto a table set.
    ///
    /// For each unique (tax_year, schedule) combination in the records the
    /// existing schedule for that year is replaced wholesale, then the
    /// modified year table is re-validated. Loading is idempotent: applying
    /// the same records twice produces the same set.
    ///
    /// The year must already exist in the set (built-in or previously
    /// loaded) because the CSV carries no payroll parameters.
    ///
    /// Returns the number of brackets applied.
    pub fn apply(
        tables: &mut TaxTableSet,
        records: &[BracketRecord],
    ) -> Result<usize, BracketLoaderError> {
        let mut applied = 0;

        // Group records by (tax_year, schedule) so each schedule is
        // replaced as a unit.
        let mut groups: HashMap<(i32, String), Vec<&BracketRecord>> = HashMap::new();
        for record in records {
            groups
                .entry((record.tax_year, record.schedule.clone()))
                .or_default()
                .push(record);
        }

        // Rebuild each affected year once, applying every schedule for
        // it, then validate via replace.
        let mut years: Vec<i32> = groups.keys().map(|(year, _)| *year).collect();
        years.sort_unstable();
        years.dedup();

        for year in years {
            let mut table = tables
                .get(year)
                .cloned()
                .ok_or(BracketLoaderError::TaxYearNotFound(year))?;

            for ((_, schedule), group) in groups.iter().filter(|((y, _), _)| *y == year) {
                let status = schedule_to_filing_status(schedule)?;

                let mut group: Vec<&&BracketRecord> = group.iter().collect();
                group.sort_by_key(|r| r.min_income);

                let brackets: Vec<TaxBracket> = group
                    .iter()
                    .map(|r| TaxBracket {
                        lower: r.min_income,
                        upper: r.max_income,
                        rate: r.rate,
                    })
                    .collect();

                applied += brackets.len();
                table.brackets.insert(status, brackets);
            }

            tables.replace(table)?;
            info!(year, "applied bracket overrides");
        }

        Ok(applied)
    }
}
