use rust_decimal::Decimal;

use paycalc_core::models::{
    LeaseComparison, PaymentResult, SavedCalculation, TcoBreakdown, TtlBreakdown, VehicleResults,
};

/// Fixed two-decimal dollar rendering, negative amounts as `-$12.34`.
pub fn money(amount: Decimal) -> String {
    if amount.is_sign_negative() {
        format!("-${:.2}", -amount)
    } else {
        format!("${:.2}", amount)
    }
}

pub fn print_ttl(ttl: &TtlBreakdown) {
    println!("Title, tax, and license");
    println!("  Sales tax:        {:>12}", money(ttl.sales_tax));
    println!("  Title fee:        {:>12}", money(ttl.title_fee));
    println!("  Registration:     {:>12}", money(ttl.registration_fee));
    println!("  Processing:       {:>12}", money(ttl.processing_fee));
    println!("  County fee:       {:>12}", money(ttl.local_fee));
    if !ttl.electric_fee.is_zero() {
        println!("  EV fee:           {:>12}", money(ttl.electric_fee));
    }
    println!("  Total:            {:>12}", money(ttl.total));
}

pub fn print_payment(
    payment: &PaymentResult,
    with_schedule: bool,
) {
    println!("Loan");
    println!("  Amount financed:  {:>12}", money(payment.amount_financed));
    println!(
        "  Payment:          {:>12}  ({} per year, {} total)",
        money(payment.periodic_payment),
        payment.periods_per_year,
        payment.total_periods
    );
    println!("  Total interest:   {:>12}", money(payment.total_interest));
    println!("  Total paid:       {:>12}", money(payment.total_paid));

    if with_schedule {
        println!();
        println!("  {:>4} {:>10}  {:>12} {:>12} {:>12} {:>14}",
            "#", "date", "payment", "interest", "principal", "balance");
        for entry in &payment.schedule {
            let date = entry
                .payment_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string());
            println!(
                "  {:>4} {:>10}  {:>12} {:>12} {:>12} {:>14}",
                entry.period,
                date,
                money(entry.payment),
                money(entry.interest),
                money(entry.principal),
                money(entry.balance)
            );
        }
    }
}

pub fn print_lease(lease: &LeaseComparison) {
    println!("Lease vs. loan");
    println!(
        "  Monthly lease:    {:>12}  (depreciation {}, finance {})",
        money(lease.monthly_lease_payment),
        money(lease.depreciation_charge),
        money(lease.finance_charge)
    );
    println!("  Adjusted residual:{:>12}", money(lease.adjusted_residual));
    println!("  Lease total:      {:>12}", money(lease.total_lease_cost));
    println!("  Lease + buyout:   {:>12}", money(lease.buyout_total));
    println!("  Loan total:       {:>12}", money(lease.loan_total_cost));
    println!(
        "  Cheaper option:   {:>12}",
        if lease.lease_is_cheaper { "lease" } else { "loan" }
    );
}

pub fn print_tco(tco: &TcoBreakdown) {
    println!("Cost of ownership ({} months)", tco.ownership_months);
    println!("  Down payment:     {:>12}", money(tco.down_payment));
    println!("  Fees financed:    {:>12}", money(tco.fees_financed));
    println!("  Loan payments:    {:>12}", money(tco.total_loan_payments));
    println!("  Interest:         {:>12}", money(tco.total_interest));
    println!(
        "  Est. resale:      {:>12}  (depreciation {})",
        money(tco.estimated_resale_value),
        money(tco.depreciation)
    );
    println!("  Total cost:       {:>12}", money(tco.total_cost));
}

pub fn print_vehicle_results(
    results: &VehicleResults,
    with_schedule: bool,
) {
    print_ttl(&results.ttl);
    println!();
    print_payment(&results.payment, with_schedule);
    println!();
    print_lease(&results.lease);
    println!();
    print_tco(&results.tco);
}

pub fn print_saved_row(record: &SavedCalculation) {
    println!(
        "  {:>4}  {}  {:>12}  {:>12}/period  {}",
        record.id,
        record.created_at.format("%Y-%m-%d %H:%M"),
        money(record.inputs.purchase_price),
        money(record.results.payment.periodic_payment),
        record.label
    );
}
