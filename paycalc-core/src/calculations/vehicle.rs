//! Vehicle purchase calculators: title/tax/license fees, loan amortization,
//! lease comparison, and total cost of ownership.
//!
//! All four entry points are pure functions over a complete
//! [`VehicleInputs`] — obtain one via [`crate::models::VehicleQuote::into_inputs`]
//! — and are independently computable; none depends on another's output.
//! The fee schedule models a Texas-style jurisdiction: a flat sales tax on
//! the price net of trade-in, a fixed title fee, weight-tiered registration,
//! a per-county road and bridge fee, and an annual electric-vehicle
//! surcharge.

use chrono::{Days, Months, NaiveDate};
use rust_decimal::Decimal;

use crate::calculations::common::{max, pow_u32, round_half_up};
use crate::models::{
    AmortizationEntry, LeaseComparison, PaymentFrequency, PaymentResult, TcoBreakdown,
    TtlBreakdown, VehicleInputs, VehicleResults,
};

/// 6.25% motor vehicle sales tax.
const SALES_TAX_RATE: Decimal = Decimal::from_parts(625, 0, 0, false, 4);
/// Title application fee.
const TITLE_FEE: Decimal = Decimal::from_parts(3300, 0, 0, false, 2);
/// Base registration for vehicles at or under [`HEAVY_WEIGHT_LBS`].
const BASE_REGISTRATION: Decimal = Decimal::from_parts(5075, 0, 0, false, 2);
/// Registration for vehicles over [`HEAVY_WEIGHT_LBS`].
const HEAVY_REGISTRATION: Decimal = Decimal::from_parts(5400, 0, 0, false, 2);
const HEAVY_WEIGHT_LBS: u32 = 6000;
/// Registration processing and handling fee.
const PROCESSING_FEE: Decimal = Decimal::from_parts(475, 0, 0, false, 2);
/// First-year electric vehicle fee on a new registration.
const EV_FEE_NEW: Decimal = Decimal::from_parts(40000, 0, 0, false, 2);
/// Annual electric vehicle fee on a renewal (used purchase).
const EV_FEE_USED: Decimal = Decimal::from_parts(20000, 0, 0, false, 2);
/// Road and bridge fee for counties not in the lookup table.
const DEFAULT_COUNTY_FEE: Decimal = Decimal::from_parts(1000, 0, 0, false, 2);

/// Mileage allowance built into the residual; miles above it reduce the
/// residual by [`MILEAGE_PENALTY_PER_MILE`] per year of the lease.
const BASE_LEASE_MILEAGE: u32 = 12000;
const MILEAGE_PENALTY_PER_MILE: Decimal = Decimal::from_parts(8, 0, 0, false, 2);

/// Share of value retained after the first year of ownership (20% drop).
const FIRST_YEAR_RETENTION: Decimal = Decimal::from_parts(80, 0, 0, false, 2);
/// Share retained each subsequent year (15% drop).
const LATER_YEAR_RETENTION: Decimal = Decimal::from_parts(85, 0, 0, false, 2);

/// Per-county road and bridge fee. Counties not listed fall back to
/// [`DEFAULT_COUNTY_FEE`]; county names are matched lowercase, which the
/// input conversion guarantees.
fn county_road_bridge_fee(county: &str) -> Decimal {
    match county {
        "harris" | "travis" => Decimal::from_parts(1150, 0, 0, false, 2),
        "bexar" => Decimal::from_parts(1100, 0, 0, false, 2),
        "dallas" | "tarrant" | "collin" | "denton" => DEFAULT_COUNTY_FEE,
        _ => DEFAULT_COUNTY_FEE,
    }
}

/// Title, tax, and license fees for the purchase.
///
/// Sales tax applies to the purchase price net of trade-in (never below
/// zero); registration is tiered by vehicle weight; electric vehicles pay a
/// surcharge that is higher on a new registration than on a renewal.
pub fn calculate_ttl(inputs: &VehicleInputs) -> TtlBreakdown {
    let taxable = max(inputs.purchase_price - inputs.trade_in_value, Decimal::ZERO);
    let sales_tax = round_half_up(taxable * SALES_TAX_RATE);

    let registration_fee = if inputs.vehicle_weight_lbs > HEAVY_WEIGHT_LBS {
        HEAVY_REGISTRATION
    } else {
        BASE_REGISTRATION
    };

    let electric_fee = if inputs.electric {
        if inputs.used { EV_FEE_USED } else { EV_FEE_NEW }
    } else {
        Decimal::ZERO
    };

    let local_fee = county_road_bridge_fee(&inputs.county);

    let total =
        sales_tax + TITLE_FEE + registration_fee + PROCESSING_FEE + local_fee + electric_fee;

    TtlBreakdown {
        sales_tax,
        title_fee: TITLE_FEE,
        registration_fee,
        processing_fee: PROCESSING_FEE,
        local_fee,
        electric_fee,
        total,
    }
}

/// Amortized loan payment with the full schedule.
///
/// The amount financed is the price net of trade-in and down payment with
/// the TTL fees rolled in. Each period's interest accrues on the outstanding
/// balance at `annual_rate / periods_per_year`; the final payment is adjusted
/// to clear the remaining balance exactly, so rounding never leaves a
/// residual cent.
pub fn calculate_payment(inputs: &VehicleInputs) -> PaymentResult {
    let ttl = calculate_ttl(inputs);
    let amount_financed = max(
        inputs.purchase_price - inputs.trade_in_value - inputs.down_payment,
        Decimal::ZERO,
    ) + ttl.total;

    let periods_per_year = inputs.payment_frequency.periods_per_year();
    let total_periods = inputs.loan_term_months * periods_per_year / 12;

    if amount_financed.is_zero() || total_periods == 0 {
        return PaymentResult {
            amount_financed,
            periodic_payment: Decimal::ZERO,
            periods_per_year,
            total_periods,
            total_interest: Decimal::ZERO,
            total_paid: Decimal::ZERO,
            schedule: Vec::new(),
        };
    }

    let rate = inputs.annual_rate_pct / Decimal::ONE_HUNDRED / Decimal::from(periods_per_year);
    let periodic_payment = if rate.is_zero() {
        round_half_up(amount_financed / Decimal::from(total_periods))
    } else {
        let factor = pow_u32(Decimal::ONE + rate, total_periods);
        round_half_up(amount_financed * rate * factor / (factor - Decimal::ONE))
    };

    let mut schedule = Vec::with_capacity(total_periods as usize);
    let mut balance = amount_financed;
    let mut total_interest = Decimal::ZERO;
    let mut total_paid = Decimal::ZERO;

    for period in 1..=total_periods {
        let interest = round_half_up(balance * rate);
        let is_last = period == total_periods;
        let (payment, principal) = if is_last {
            // Clear whatever the rounded payments left behind.
            (round_half_up(balance + interest), balance)
        } else {
            (periodic_payment, periodic_payment - interest)
        };
        balance -= principal;

        total_interest += interest;
        total_paid += payment;

        schedule.push(AmortizationEntry {
            period,
            payment_date: payment_date(inputs, period),
            payment,
            interest,
            principal,
            balance,
        });
    }

    PaymentResult {
        amount_financed,
        periodic_payment,
        periods_per_year,
        total_periods,
        total_interest,
        total_paid,
        schedule,
    }
}

fn payment_date(
    inputs: &VehicleInputs,
    period: u32,
) -> Option<NaiveDate> {
    let start = inputs.loan_start_date?;
    match inputs.payment_frequency {
        PaymentFrequency::Monthly => start.checked_add_months(Months::new(period)),
        PaymentFrequency::Biweekly => start.checked_add_days(Days::new(14 * period as u64)),
    }
}

/// Monthly lease payment alongside the loan alternative.
///
/// The capitalized cost is the price net of trade-in and down payment. The
/// residual is reduced for annual mileage above the built-in allowance, then
/// the payment splits into the usual depreciation charge and money-factor
/// finance charge. The side-by-side comparison pits lease-then-buy-out
/// against financing the purchase, since both paths end in ownership.
pub fn calculate_lease_comparison(inputs: &VehicleInputs) -> LeaseComparison {
    let term = Decimal::from(inputs.loan_term_months.max(1));
    let lease_years = Decimal::from(inputs.loan_term_months.div_ceil(12));

    let cap_cost = max(
        inputs.purchase_price - inputs.trade_in_value - inputs.down_payment,
        Decimal::ZERO,
    );

    let excess_miles = Decimal::from(
        inputs
            .lease_annual_mileage
            .saturating_sub(BASE_LEASE_MILEAGE),
    );
    let mileage_penalty = excess_miles * MILEAGE_PENALTY_PER_MILE * lease_years;
    let adjusted_residual = max(inputs.residual_value - mileage_penalty, Decimal::ZERO);

    let depreciation_charge = round_half_up(max(cap_cost - adjusted_residual, Decimal::ZERO) / term);
    let finance_charge = round_half_up((cap_cost + adjusted_residual) * inputs.money_factor);
    let monthly_lease_payment = depreciation_charge + finance_charge;

    let total_lease_cost = inputs.down_payment + monthly_lease_payment * term;
    let buyout_total = total_lease_cost + inputs.lease_buyout;

    let loan = calculate_payment(inputs);
    let loan_total_cost = inputs.down_payment + loan.total_paid;

    LeaseComparison {
        monthly_lease_payment,
        depreciation_charge,
        finance_charge,
        adjusted_residual,
        total_lease_cost,
        buyout_total,
        loan_periodic_payment: loan.periodic_payment,
        loan_total_cost,
        lease_is_cheaper: buyout_total < loan_total_cost,
    }
}

/// Total cost of ownership over the loan term.
///
/// Resale value is estimated from a simple depreciation curve: 20% off in
/// the first year, then 15% of the remaining value each later year. Total
/// cost is the down payment plus every loan payment, less the estimated
/// resale; TTL fees are already inside the financed amount.
pub fn calculate_tco(inputs: &VehicleInputs) -> TcoBreakdown {
    let ttl = calculate_ttl(inputs);
    let loan = calculate_payment(inputs);

    let ownership_years = inputs.loan_term_months.div_ceil(12);
    let estimated_resale_value = if ownership_years == 0 {
        inputs.purchase_price
    } else {
        round_half_up(
            inputs.purchase_price
                * FIRST_YEAR_RETENTION
                * pow_u32(LATER_YEAR_RETENTION, ownership_years - 1),
        )
    };
    let depreciation = inputs.purchase_price - estimated_resale_value;

    let total_cost = inputs.down_payment + loan.total_paid - estimated_resale_value;

    TcoBreakdown {
        down_payment: inputs.down_payment,
        fees_financed: ttl.total,
        total_loan_payments: loan.total_paid,
        total_interest: loan.total_interest,
        estimated_resale_value,
        depreciation,
        ownership_months: inputs.loan_term_months,
        total_cost,
    }
}

/// Runs all four calculators and aggregates the results.
pub fn calculate_all(inputs: &VehicleInputs) -> VehicleResults {
    VehicleResults {
        ttl: calculate_ttl(inputs),
        payment: calculate_payment(inputs),
        lease: calculate_lease_comparison(inputs),
        tco: calculate_tco(inputs),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use crate::models::{InputMode, VehicleQuote};

    use super::*;

    /// The $30,000 / Dallas / 60-month / 6.5% / $5,000-down scenario.
    fn dallas_inputs() -> VehicleInputs {
        VehicleQuote {
            purchase_price: Some(dec!(30000)),
            trade_in_value: Some(dec!(0)),
            county: Some("dallas".to_string()),
            loan_term_months: Some(60),
            annual_rate_pct: Some(dec!(6.5)),
            down_payment: Some(dec!(5000)),
            used: Some(false),
            ..VehicleQuote::default()
        }
        .into_inputs(InputMode::Strict)
        .unwrap()
    }

    // =========================================================================
    // calculate_ttl tests
    // =========================================================================

    #[test]
    fn ttl_dallas_new_vehicle() {
        let ttl = calculate_ttl(&dallas_inputs());

        // 30000 * 6.25% = 1875
        assert_eq!(ttl.sales_tax, dec!(1875.00));
        assert_eq!(ttl.title_fee, dec!(33.00));
        assert_eq!(ttl.registration_fee, dec!(50.75));
        assert_eq!(ttl.processing_fee, dec!(4.75));
        assert_eq!(ttl.local_fee, dec!(10.00));
        assert_eq!(ttl.electric_fee, dec!(0));
        assert_eq!(ttl.total, dec!(1973.50));
        assert!(ttl.total > dec!(0));
    }

    #[test]
    fn ttl_is_deterministic() {
        let inputs = dallas_inputs();

        assert_eq!(calculate_ttl(&inputs), calculate_ttl(&inputs));
    }

    #[test]
    fn ttl_trade_in_reduces_sales_tax() {
        let mut inputs = dallas_inputs();
        inputs.trade_in_value = dec!(10000);

        let ttl = calculate_ttl(&inputs);

        assert_eq!(ttl.sales_tax, dec!(1250.00));
    }

    #[test]
    fn ttl_trade_in_above_price_taxes_nothing() {
        let mut inputs = dallas_inputs();
        inputs.trade_in_value = dec!(40000);

        let ttl = calculate_ttl(&inputs);

        assert_eq!(ttl.sales_tax, dec!(0));
    }

    #[test]
    fn ttl_heavy_vehicle_pays_higher_registration() {
        let mut inputs = dallas_inputs();
        inputs.vehicle_weight_lbs = 7200;

        let ttl = calculate_ttl(&inputs);

        assert_eq!(ttl.registration_fee, dec!(54.00));
    }

    #[test]
    fn ttl_electric_fee_differs_new_vs_used() {
        let mut new_ev = dallas_inputs();
        new_ev.electric = true;
        let mut used_ev = new_ev.clone();
        used_ev.used = true;

        assert_eq!(calculate_ttl(&new_ev).electric_fee, dec!(400.00));
        assert_eq!(calculate_ttl(&used_ev).electric_fee, dec!(200.00));
    }

    #[test]
    fn ttl_unknown_county_uses_default_fee() {
        let mut inputs = dallas_inputs();
        inputs.county = "loving".to_string();

        assert_eq!(calculate_ttl(&inputs).local_fee, dec!(10.00));
    }

    #[test]
    fn ttl_harris_county_fee() {
        let mut inputs = dallas_inputs();
        inputs.county = "harris".to_string();

        assert_eq!(calculate_ttl(&inputs).local_fee, dec!(11.50));
    }

    // =========================================================================
    // calculate_payment tests
    // =========================================================================

    #[test]
    fn payment_matches_standard_amortization_formula() {
        let inputs = dallas_inputs();

        let result = calculate_payment(&inputs);

        // Recompute independently: financed = 30000 - 5000 + 1973.50.
        let financed = dec!(26973.50);
        assert_eq!(result.amount_financed, financed);

        let r = dec!(6.5) / dec!(100) / dec!(12);
        let mut factor = Decimal::ONE;
        for _ in 0..60 {
            factor *= Decimal::ONE + r;
        }
        let expected = round_half_up(financed * r * factor / (factor - Decimal::ONE));
        assert_eq!(result.periodic_payment, expected);
        assert!(result.periodic_payment > dec!(0));
    }

    #[test]
    fn payment_schedule_amortizes_to_zero() {
        let result = calculate_payment(&dallas_inputs());

        assert_eq!(result.schedule.len(), 60);
        assert_eq!(result.schedule.last().unwrap().balance, dec!(0));

        // Principal repaid over the schedule equals the amount financed.
        let principal: Decimal = result.schedule.iter().map(|e| e.principal).sum();
        assert_eq!(principal, result.amount_financed);

        // Totals match the schedule.
        let interest: Decimal = result.schedule.iter().map(|e| e.interest).sum();
        let paid: Decimal = result.schedule.iter().map(|e| e.payment).sum();
        assert_eq!(interest, result.total_interest);
        assert_eq!(paid, result.total_paid);
        assert_eq!(result.total_paid, result.amount_financed + result.total_interest);
    }

    #[test]
    fn payment_zero_rate_divides_evenly() {
        let mut inputs = dallas_inputs();
        inputs.annual_rate_pct = dec!(0);

        let result = calculate_payment(&inputs);

        assert_eq!(
            result.periodic_payment,
            round_half_up(result.amount_financed / dec!(60))
        );
        assert_eq!(result.total_interest, dec!(0));
    }

    #[test]
    fn payment_biweekly_frequency_scales_periods() {
        let mut inputs = dallas_inputs();
        inputs.payment_frequency = PaymentFrequency::Biweekly;

        let result = calculate_payment(&inputs);

        assert_eq!(result.periods_per_year, 26);
        assert_eq!(result.total_periods, 130);
        // More frequent, smaller payments.
        assert!(result.periodic_payment < calculate_payment(&dallas_inputs()).periodic_payment);
    }

    #[test]
    fn payment_dates_follow_the_start_date() {
        let mut inputs = dallas_inputs();
        inputs.loan_start_date = NaiveDate::from_ymd_opt(2025, 1, 15);

        let result = calculate_payment(&inputs);

        assert_eq!(
            result.schedule[0].payment_date,
            NaiveDate::from_ymd_opt(2025, 2, 15)
        );
        assert_eq!(
            result.schedule[11].payment_date,
            NaiveDate::from_ymd_opt(2026, 1, 15)
        );
    }

    #[test]
    fn payment_without_start_date_has_no_dates() {
        let result = calculate_payment(&dallas_inputs());

        assert!(result.schedule.iter().all(|e| e.payment_date.is_none()));
    }

    #[test]
    fn fully_paid_vehicle_finances_only_fees() {
        let mut inputs = dallas_inputs();
        inputs.down_payment = dec!(30000);

        let result = calculate_payment(&inputs);

        // Only the TTL total is financed.
        assert_eq!(result.amount_financed, dec!(1973.50));
    }

    // =========================================================================
    // calculate_lease_comparison tests
    // =========================================================================

    #[test]
    fn lease_payment_splits_into_depreciation_and_finance() {
        let mut inputs = dallas_inputs();
        inputs.residual_value = dec!(15000);
        inputs.money_factor = dec!(0.00125);

        let lease = calculate_lease_comparison(&inputs);

        // Cap cost 25000, residual 15000 over 60 months.
        assert_eq!(lease.adjusted_residual, dec!(15000));
        assert_eq!(lease.depreciation_charge, round_half_up(dec!(10000) / dec!(60)));
        assert_eq!(
            lease.finance_charge,
            round_half_up(dec!(40000) * dec!(0.00125))
        );
        assert_eq!(
            lease.monthly_lease_payment,
            lease.depreciation_charge + lease.finance_charge
        );
    }

    #[test]
    fn lease_mileage_above_allowance_reduces_residual() {
        let mut inputs = dallas_inputs();
        inputs.residual_value = dec!(15000);
        inputs.lease_annual_mileage = 15000;

        let lease = calculate_lease_comparison(&inputs);

        // 3000 excess miles * 0.08 * 5 years = 1200.
        assert_eq!(lease.adjusted_residual, dec!(13800.00));
    }

    #[test]
    fn lease_comparison_includes_loan_alternative() {
        let inputs = dallas_inputs();

        let lease = calculate_lease_comparison(&inputs);
        let loan = calculate_payment(&inputs);

        assert_eq!(lease.loan_periodic_payment, loan.periodic_payment);
        assert_eq!(
            lease.loan_total_cost,
            inputs.down_payment + loan.total_paid
        );
        assert_eq!(
            lease.buyout_total,
            lease.total_lease_cost + inputs.lease_buyout
        );
    }

    // =========================================================================
    // calculate_tco tests
    // =========================================================================

    #[test]
    fn tco_depreciation_curve_over_five_years() {
        let inputs = dallas_inputs();

        let tco = calculate_tco(&inputs);

        // 30000 * 0.80 * 0.85^4
        let expected_resale =
            round_half_up(dec!(30000) * dec!(0.80) * pow_u32(dec!(0.85), 4));
        assert_eq!(tco.estimated_resale_value, expected_resale);
        assert_eq!(tco.depreciation, dec!(30000) - expected_resale);
        assert_eq!(tco.ownership_months, 60);
    }

    #[test]
    fn tco_total_cost_nets_out_resale() {
        let inputs = dallas_inputs();

        let tco = calculate_tco(&inputs);
        let loan = calculate_payment(&inputs);

        assert_eq!(
            tco.total_cost,
            inputs.down_payment + loan.total_paid - tco.estimated_resale_value
        );
        assert_eq!(tco.total_interest, loan.total_interest);
    }

    // =========================================================================
    // calculate_all tests
    // =========================================================================

    #[test]
    fn calculate_all_is_deterministic_and_consistent() {
        let inputs = dallas_inputs();

        let first = calculate_all(&inputs);
        let second = calculate_all(&inputs);

        assert_eq!(first, second);
        assert_eq!(first.ttl, calculate_ttl(&inputs));
        assert_eq!(first.payment.periodic_payment, first.lease.loan_periodic_payment);
    }
}
