pub mod aggregator;
pub mod calendar;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod period;
pub mod reader;
pub mod report;
pub mod summary;
pub mod types;

// re-export key types
pub use aggregator::{
    compute_periodic_charge, LoanFailure, LoanSummaryCache, PeriodicChargeComputation,
    ServiceChargeCalculator,
};
pub use calendar::{DescendingDays, MonthWindow, MonthWindows};
pub use config::{AveragingPolicy, FailurePolicy, PeriodConfig, ServiceChargeConfig, SummaryStrategy};
pub use decimal::Money;
pub use errors::{Result, ServiceChargeError};
pub use events::{Event, EventStore};
pub use period::{ActivePeriod, BillingPeriod, DateRangeFactory, Quarter};
pub use reader::{InMemoryRepaymentReader, RepaymentReader};
pub use report::ChargeReport;
pub use summary::{LoanBalanceSeries, SummaryBuilder};
pub use types::{
    CalculationMethod, ClientId, LoanCategory, LoanId, LoanProductSnapshot, LoanSnapshot,
    ProductId, RepaymentEvent, SummaryMode, TransactionType,
};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
