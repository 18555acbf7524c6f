/// portfolio report - demand and term loans over a fixed quarter, with logging
use service_charge_rs::{
    FailurePolicy, InMemoryRepaymentReader, LoanCategory, LoanProductSnapshot, LoanSnapshot, Money,
    PeriodConfig, RepaymentEvent, SafeTimeProvider, ServiceChargeCalculator, ServiceChargeConfig, TimeSource,
};
use chrono::{NaiveDate, TimeZone, Utc};
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("service_charge_rs=debug".parse()?))
        .init();

    let date = |y: i32, m: u32, d: u32| NaiveDate::from_ymd_opt(y, m, d).ok_or("bad date");

    let products = vec![
        LoanProductSnapshot {
            id: 1,
            name: "Gold Demand Loan".to_string(),
            short_name: "GDL".to_string(),
            category: LoanCategory::Demand,
        },
        LoanProductSnapshot {
            id: 2,
            name: "Housing Term Loan".to_string(),
            short_name: "HTL".to_string(),
            category: LoanCategory::Term,
        },
    ];

    let loans = vec![
        LoanSnapshot {
            id: 1,
            client_id: 11,
            product_id: 1,
            principal_outstanding: Money::from_major(25_000),
            total_outstanding_amount: Money::from_major(25_900),
            disbursement_date: date(2024, 2, 12)?,
        },
        LoanSnapshot {
            id: 2,
            client_id: 12,
            product_id: 2,
            principal_outstanding: Money::from_major(180_000),
            total_outstanding_amount: Money::from_major(196_500),
            disbursement_date: date(2021, 4, 1)?,
        },
        // references a product that is not loaded
        LoanSnapshot {
            id: 3,
            client_id: 13,
            product_id: 9,
            principal_outstanding: Money::from_major(5_000),
            total_outstanding_amount: Money::from_major(5_000),
            disbursement_date: date(2023, 1, 1)?,
        },
    ];

    let reader = InMemoryRepaymentReader::new().with_events([
        RepaymentEvent::repayment(1, date(2024, 3, 4)?, Money::from_major(2_300), Money::from_major(2_000)),
        RepaymentEvent::repayment(1, date(2024, 3, 25)?, Money::from_major(1_150), Money::from_major(1_000)),
        RepaymentEvent::repayment(2, date(2024, 1, 10)?, Money::from_major(3_100), Money::from_major(1_700)),
        RepaymentEvent::repayment(2, date(2024, 2, 10)?, Money::from_major(3_100), Money::from_major(1_710)),
        RepaymentEvent::repayment(2, date(2024, 3, 10)?, Money::from_major(3_100), Money::from_major(1_720)),
    ]);

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).single().ok_or("bad time")?,
    ));

    let config = ServiceChargeConfig::new(PeriodConfig::quarterly().with_month("March"))
        .with_failure_policy(FailurePolicy::CollectErrors);
    let result = ServiceChargeCalculator::new(config).compute(&loans, &products, &reader, &time)?;

    println!("\nperiod: {}", result.period);
    println!("demand loans ({}): {:?}", result.demand_loan_count, result.demand_loan_monthly_series);
    println!("term loans ({}):   {:?}", result.term_loan_count, result.term_loan_monthly_series);
    for failure in &result.failures {
        println!("skipped loan {}: {}", failure.loan_id, failure.error);
    }

    Ok(())
}
