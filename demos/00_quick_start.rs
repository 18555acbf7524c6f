/// quick start - one term loan over the current quarter
use service_charge_rs::{
    compute_periodic_charge, ChargeReport, InMemoryRepaymentReader, LoanCategory, LoanProductSnapshot,
    LoanSnapshot, Money, SafeTimeProvider, ServiceChargeConfig, TimeSource,
};
use chrono::NaiveDate;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let product = LoanProductSnapshot {
        id: 1,
        name: "Personal Term Loan".to_string(),
        short_name: "PTL".to_string(),
        category: LoanCategory::Term,
    };
    let loan = LoanSnapshot {
        id: 1001,
        client_id: 42,
        product_id: 1,
        principal_outstanding: Money::from_major(10_000),
        total_outstanding_amount: Money::from_major(10_400),
        disbursement_date: NaiveDate::from_ymd_opt(2023, 6, 1).ok_or("bad date")?,
    };

    // no repayments recorded yet
    let reader = InMemoryRepaymentReader::new();
    let time = SafeTimeProvider::new(TimeSource::System);

    let result = compute_periodic_charge(&[loan], &[product], &ServiceChargeConfig::quarterly(), &reader, &time)?;

    println!("{}", ChargeReport::from_computation(&result).to_json()?);

    Ok(())
}
