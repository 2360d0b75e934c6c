mod filing_status;
mod paystub;
mod saved;
mod tax_table;
mod validation;
mod vehicle;

pub use filing_status::FilingStatus;
pub use paystub::{PayPeriod, PayTotals, PaystubData, PaystubInputs};
pub use saved::{NewSavedCalculation, SavedCalculation};
pub use tax_table::{MedicareThresholds, TaxBracket, TaxTableError, TaxTableSet, TaxYearTable};
pub use validation::ValidationErrors;
pub use vehicle::{
    AmortizationEntry, InputMode, LeaseComparison, PaymentFrequency, PaymentResult, TcoBreakdown,
    TtlBreakdown, VehicleInputs, VehicleQuote, VehicleResults, defaults,
};
