use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::FilingStatus;

/// User-provided values for generating a full year of biweekly paystubs.
///
/// `state_tax_rate` is a flat per-period rate applied to gross pay (zero for
/// states with no income tax) and `other_deductions` is a flat per-period
/// amount (benefits, garnishments, etc.).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaystubInputs {
    pub employee_name: String,
    pub employer_name: String,
    pub hourly_rate: Decimal,
    pub hours_per_period: Decimal,
    pub filing_status: FilingStatus,
    pub tax_year: i32,
    pub state_tax_rate: Decimal,
    pub other_deductions: Decimal,
}

/// One biweekly pay period.
///
/// `net_pay = gross_pay - federal_tax - social_security - medicare -
/// state_tax - other_deductions`. Net pay is deliberately not clamped at
/// zero: a deduction load that exceeds gross shows up as a negative net.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayPeriod {
    /// 1-based period index (1..=26 for biweekly).
    pub period: u32,
    pub pay_date: NaiveDate,
    pub hours: Decimal,
    pub gross_pay: Decimal,
    pub federal_tax: Decimal,
    pub social_security: Decimal,
    pub medicare: Decimal,
    pub state_tax: Decimal,
    pub other_deductions: Decimal,
    pub net_pay: Decimal,
}

/// Element-wise sums across all pay periods.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayTotals {
    pub gross_pay: Decimal,
    pub federal_tax: Decimal,
    pub social_security: Decimal,
    pub medicare: Decimal,
    pub state_tax: Decimal,
    pub other_deductions: Decimal,
    pub net_pay: Decimal,
}

impl PayTotals {
    /// Adds one period's rounded amounts, keeping the totals exactly equal to
    /// the element-wise sum of the periods.
    pub fn accumulate(
        &mut self,
        period: &PayPeriod,
    ) {
        self.gross_pay += period.gross_pay;
        self.federal_tax += period.federal_tax;
        self.social_security += period.social_security;
        self.medicare += period.medicare;
        self.state_tax += period.state_tax;
        self.other_deductions += period.other_deductions;
        self.net_pay += period.net_pay;
    }
}

/// A complete generated paystub set: the inputs echoed back, all pay periods
/// in order, and the running totals. Suitable for direct JSON serialization
/// or rendering into a document template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaystubData {
    pub employee_name: String,
    pub employer_name: String,
    pub hourly_rate: Decimal,
    pub hours_per_period: Decimal,
    pub filing_status: FilingStatus,
    pub tax_year: i32,
    pub pay_periods: Vec<PayPeriod>,
    pub totals: PayTotals,
}
