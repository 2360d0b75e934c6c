//! Pure calculation routines: per-period payroll withholding, the biweekly
//! pay period generator, and the vehicle TTL/payment/lease/TCO calculators.
//!
//! Everything here is synchronous and deterministic — identical inputs always
//! yield identical output. Persistence and presentation live elsewhere.

pub mod common;
pub mod paystub;
pub mod vehicle;
pub mod withholding;

pub use paystub::{BIWEEKLY_PERIODS, PaystubError, PaystubGenerator, validate_paystub_inputs};
pub use vehicle::{
    calculate_all, calculate_lease_comparison, calculate_payment, calculate_tco, calculate_ttl,
};
pub use withholding::{WithholdingError, federal_withholding, medicare, social_security};
