use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal_macros::dec;
use service_charge_rs::{
    compute_periodic_charge, AveragingPolicy, ChargeReport, InMemoryRepaymentReader, LoanCategory,
    LoanProductSnapshot, LoanSnapshot, Money, PeriodConfig, RepaymentEvent, SafeTimeProvider,
    ServiceChargeConfig, TimeSource, TransactionType,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn clock() -> SafeTimeProvider {
    SafeTimeProvider::new(TimeSource::Test(Utc.with_ymd_and_hms(2024, 10, 3, 8, 0, 0).unwrap()))
}

fn products() -> Vec<LoanProductSnapshot> {
    vec![
        LoanProductSnapshot {
            id: 1,
            name: "Gold Demand Loan".to_string(),
            short_name: "GDL".to_string(),
            category: LoanCategory::Demand,
        },
        LoanProductSnapshot {
            id: 2,
            name: "Agri Term Loan".to_string(),
            short_name: "ATL".to_string(),
            category: LoanCategory::Term,
        },
    ]
}

fn loan(id: u64, product_id: u64, principal: Money, total: Money, disbursed: NaiveDate) -> LoanSnapshot {
    LoanSnapshot {
        id,
        client_id: id * 10,
        product_id,
        principal_outstanding: principal,
        total_outstanding_amount: total,
        disbursement_date: disbursed,
    }
}

fn portfolio() -> (Vec<LoanSnapshot>, InMemoryRepaymentReader) {
    let loans = vec![
        loan(1, 1, Money::from_major(1_000), Money::from_major(1_050), date(2023, 5, 1)),
        loan(2, 1, Money::from_major(2_000), Money::from_major(2_000), date(2024, 2, 15)),
        loan(3, 2, Money::from_major(4_000), Money::from_major(4_400), date(2022, 9, 9)),
    ];

    let reader = InMemoryRepaymentReader::new().with_events([
        // loan 1: two repayments on the same day in march
        RepaymentEvent::repayment(1, date(2024, 3, 21), Money::from_major(110), Money::from_major(100)),
        RepaymentEvent::repayment(1, date(2024, 3, 21), Money::from_major(55), Money::from_major(50)),
        // loan 2: repaid in february, after disbursement
        RepaymentEvent::repayment(2, date(2024, 2, 20), Money::from_major(300), Money::from_major(250)),
        // loan 3: monthly instalments plus a non-repayment entry
        RepaymentEvent::repayment(3, date(2024, 1, 5), Money::from_major(200), Money::from_major(150)),
        RepaymentEvent::repayment(3, date(2024, 2, 5), Money::from_major(200), Money::from_major(160)),
        RepaymentEvent::repayment(3, date(2024, 3, 5), Money::from_major(200), Money::from_major(170)),
        RepaymentEvent {
            loan_id: 3,
            transaction_date: date(2024, 3, 6),
            transaction_type: TransactionType::Waiver,
            amount: Money::from_major(40),
            principal_portion: Money::ZERO,
        },
    ]);

    (loans, reader)
}

#[test]
fn quarterly_portfolio_series() {
    let (loans, reader) = portfolio();
    let config = ServiceChargeConfig::new(PeriodConfig::quarterly().with_month("Feb").with_year(2024));

    let result = compute_periodic_charge(&loans, &products(), &config, &reader, &clock()).unwrap();

    assert_eq!(result.period.from_date(), date(2024, 1, 1));
    assert_eq!(result.period.to_date(), date(2024, 3, 31));

    // loan 1 (daily): march 1000 x 11 (21st..31st) + 1150 x 20, feb 1150 x 29, jan 1150 x 31
    // loan 2 (daily): march 2000 x 31, feb 2000 x 10 (20th..29th) + 2250 x 5 (15th..19th), jan 0
    assert_eq!(
        result.demand_loan_monthly_series,
        vec![
            Money::from_major(1_150 * 31),
            Money::from_major(1_150 * 29 + 2_000 * 10 + 2_250 * 5),
            Money::from_major(1_000 * 11 + 1_150 * 20 + 2_000 * 31),
        ]
    );
    assert_eq!(
        result.demand_loan_monthly_repayments,
        vec![Money::ZERO, Money::from_major(250), Money::from_major(150)]
    );

    // loan 3 (monthly): march 4400, feb 4600, jan 4800
    assert_eq!(
        result.term_loan_monthly_series,
        vec![Money::from_major(4_800), Money::from_major(4_600), Money::from_major(4_400)]
    );
    assert_eq!(result.term_loan_monthly_repayments, vec![Money::from_major(200); 3]);
    assert_eq!(result.total_loans(), 3);
}

#[test]
fn daily_average_policy_divides_by_month_length() {
    let (loans, reader) = portfolio();
    let config = ServiceChargeConfig::new(PeriodConfig::quarterly().with_month("january").with_year(2024))
        .with_averaging_policy(AveragingPolicy::DailyAverage);

    let result = compute_periodic_charge(&loans[..1], &products(), &config, &reader, &clock()).unwrap();

    // march: (11000 + 23000) / 31 = 1096.774.. -> 1096.77
    assert_eq!(
        result.demand_loan_monthly_series,
        vec![
            Money::from_major(1_150),
            Money::from_major(1_150),
            Money::from_decimal(dec!(1096.77)),
        ]
    );
}

#[test]
fn yearly_report_serializes() {
    let (loans, reader) = portfolio();
    let config = ServiceChargeConfig::new(PeriodConfig::yearly().with_year(2024));

    let result = compute_periodic_charge(&loans, &products(), &config, &reader, &clock()).unwrap();
    assert_eq!(result.demand_loan_monthly_series.len(), 12);
    assert_eq!(result.term_loan_monthly_series.len(), 12);

    let report = ChargeReport::from_computation(&result);
    assert_eq!(report.period.months, 12);
    assert_eq!(report.loans.len(), 3);
    assert!(report.loans.iter().all(|l| l.outstanding.len() == 12 && l.repayments.len() == 12));

    let json = report.to_json().unwrap();
    assert!(json.contains("\"name\": \"YEARLY\""));
}
