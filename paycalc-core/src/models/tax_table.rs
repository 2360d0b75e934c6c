use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::FilingStatus;

/// Errors raised by [`TaxYearTable::validate`] and [`TaxTableSet::new`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxTableError {
    #[error("tax year {0} has no bracket table for filing status {1}")]
    MissingFilingStatus(i32, FilingStatus),

    #[error("bracket table for {year}/{status} is empty")]
    EmptyBrackets { year: i32, status: FilingStatus },

    #[error("bracket table for {year}/{status} must start at zero, starts at {lower}")]
    FirstBracketNotZero {
        year: i32,
        status: FilingStatus,
        lower: Decimal,
    },

    #[error("bracket thresholds for {year}/{status} are not strictly increasing at {at}")]
    ThresholdsNotIncreasing {
        year: i32,
        status: FilingStatus,
        at: Decimal,
    },

    #[error("bracket table for {year}/{status} has a gap or overlap at {at}")]
    BracketsNotContiguous {
        year: i32,
        status: FilingStatus,
        at: Decimal,
    },

    #[error("bracket rates for {year}/{status} decrease at rate {rate}")]
    RatesDecreasing {
        year: i32,
        status: FilingStatus,
        rate: Decimal,
    },

    #[error("rate {0} is outside [0, 1]")]
    RateOutOfRange(Decimal),

    #[error("only the last bracket of {year}/{status} may be unbounded")]
    UnboundedBracketNotLast { year: i32, status: FilingStatus },

    #[error("the last bracket of {year}/{status} must be unbounded")]
    LastBracketBounded { year: i32, status: FilingStatus },

    #[error("social security wage base must be positive, got {0}")]
    InvalidWageBase(Decimal),

    #[error("duplicate table for tax year {0}")]
    DuplicateYear(i32),
}

/// One marginal bracket: income from `lower` up to `upper` (exclusive of
/// `lower`, inclusive of `upper`) is taxed at `rate`. The final bracket of a
/// schedule has `upper: None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub lower: Decimal,
    pub upper: Option<Decimal>,
    pub rate: Decimal,
}

/// Additional-Medicare surtax thresholds. These are set by statute and do not
/// float with inflation, but they are carried per table so a future year can
/// change them without touching calculation code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicareThresholds {
    pub single: Decimal,
    pub married_filing_jointly: Decimal,
    pub married_filing_separately: Decimal,
    pub head_of_household: Decimal,
}

impl MedicareThresholds {
    pub fn for_status(
        &self,
        status: FilingStatus,
    ) -> Decimal {
        match status {
            FilingStatus::Single => self.single,
            FilingStatus::MarriedFilingJointly => self.married_filing_jointly,
            FilingStatus::MarriedFilingSeparately => self.married_filing_separately,
            FilingStatus::HeadOfHousehold => self.head_of_household,
        }
    }
}

/// Everything needed to compute per-period withholding for one tax year:
/// federal bracket schedules per filing status, the Social Security wage base
/// and rate, and the Medicare rate plus surtax parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxYearTable {
    pub tax_year: i32,
    pub brackets: BTreeMap<FilingStatus, Vec<TaxBracket>>,
    pub ss_wage_base: Decimal,
    pub ss_rate: Decimal,
    pub medicare_rate: Decimal,
    pub medicare_surtax_rate: Decimal,
    pub medicare_thresholds: MedicareThresholds,
}

impl TaxYearTable {
    /// Bracket schedule for a filing status, if the table carries one.
    pub fn brackets_for(
        &self,
        status: FilingStatus,
    ) -> Option<&[TaxBracket]> {
        self.brackets.get(&status).map(Vec::as_slice)
    }

    /// Checks every structural invariant of the table:
    ///
    /// * each filing status has a non-empty schedule,
    /// * the first bracket starts at zero,
    /// * thresholds are strictly increasing and contiguous,
    /// * rates are non-decreasing and within [0, 1],
    /// * exactly the last bracket is unbounded,
    /// * the wage base is positive and all flat rates are within [0, 1].
    pub fn validate(&self) -> Result<(), TaxTableError> {
        for status in FilingStatus::ALL {
            let brackets = self
                .brackets_for(status)
                .ok_or(TaxTableError::MissingFilingStatus(self.tax_year, status))?;
            self.validate_schedule(status, brackets)?;
        }

        if self.ss_wage_base <= Decimal::ZERO {
            return Err(TaxTableError::InvalidWageBase(self.ss_wage_base));
        }
        for rate in [self.ss_rate, self.medicare_rate, self.medicare_surtax_rate] {
            if rate < Decimal::ZERO || rate > Decimal::ONE {
                return Err(TaxTableError::RateOutOfRange(rate));
            }
        }

        Ok(())
    }

    fn validate_schedule(
        &self,
        status: FilingStatus,
        brackets: &[TaxBracket],
    ) -> Result<(), TaxTableError> {
        let year = self.tax_year;

        let Some(first) = brackets.first() else {
            return Err(TaxTableError::EmptyBrackets { year, status });
        };
        if first.lower != Decimal::ZERO {
            return Err(TaxTableError::FirstBracketNotZero {
                year,
                status,
                lower: first.lower,
            });
        }

        let mut prev_rate = Decimal::ZERO;
        for (i, bracket) in brackets.iter().enumerate() {
            if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
                return Err(TaxTableError::RateOutOfRange(bracket.rate));
            }
            if bracket.rate < prev_rate {
                return Err(TaxTableError::RatesDecreasing {
                    year,
                    status,
                    rate: bracket.rate,
                });
            }
            prev_rate = bracket.rate;

            let is_last = i == brackets.len() - 1;
            match bracket.upper {
                Some(upper) => {
                    if is_last {
                        return Err(TaxTableError::LastBracketBounded { year, status });
                    }
                    if upper <= bracket.lower {
                        return Err(TaxTableError::ThresholdsNotIncreasing {
                            year,
                            status,
                            at: upper,
                        });
                    }
                    // The next bracket must pick up exactly where this one ends.
                    if brackets[i + 1].lower != upper {
                        return Err(TaxTableError::BracketsNotContiguous {
                            year,
                            status,
                            at: brackets[i + 1].lower,
                        });
                    }
                }
                None => {
                    if !is_last {
                        return Err(TaxTableError::UnboundedBracketNotLast { year, status });
                    }
                }
            }
        }

        Ok(())
    }
}

/// A validated collection of [`TaxYearTable`]s keyed by year.
///
/// Lookups for a year that is not covered fail explicitly — silently falling
/// back to a different year's table would produce financially wrong numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxTableSet {
    tables: BTreeMap<i32, TaxYearTable>,
}

impl TaxTableSet {
    /// Builds a set from individual year tables, validating each one and
    /// rejecting duplicate years.
    pub fn new(tables: Vec<TaxYearTable>) -> Result<Self, TaxTableError> {
        let mut map = BTreeMap::new();
        for table in tables {
            table.validate()?;
            let year = table.tax_year;
            if map.insert(year, table).is_some() {
                return Err(TaxTableError::DuplicateYear(year));
            }
        }
        Ok(Self { tables: map })
    }

    pub fn get(
        &self,
        year: i32,
    ) -> Option<&TaxYearTable> {
        self.tables.get(&year)
    }

    /// Covered tax years, ascending.
    pub fn years(&self) -> Vec<i32> {
        self.tables.keys().copied().collect()
    }

    /// Replaces the table for `table.tax_year` after validating it.
    /// Used by the CSV loader to overlay custom bracket data.
    pub fn replace(
        &mut self,
        table: TaxYearTable,
    ) -> Result<(), TaxTableError> {
        table.validate()?;
        self.tables.insert(table.tax_year, table);
        Ok(())
    }
}
