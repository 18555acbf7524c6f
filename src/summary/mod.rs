pub mod daily;
pub mod monthly;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AveragingPolicy;
use crate::decimal::Money;
use crate::errors::{Result, ServiceChargeError};
use crate::period::ActivePeriod;
use crate::reader::RepaymentReader;
use crate::types::{LoanId, LoanProductSnapshot, LoanSnapshot, SummaryMode};

pub use daily::{DailyAccumulator, DailySummary};
pub use monthly::MonthlySummary;

/// per sub-period balances and repayments of one loan, oldest sub-period first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanBalanceSeries {
    loan_id: LoanId,
    is_demand_loan: bool,
    disbursement_date: NaiveDate,
    mode: SummaryMode,
    outstanding: Vec<Money>,
    repayments: Vec<Money>,
}

impl LoanBalanceSeries {
    /// build from vectors recorded most recent sub-period first
    pub fn from_backward(
        loan: &LoanSnapshot,
        is_demand_loan: bool,
        mode: SummaryMode,
        mut outstanding: Vec<Money>,
        mut repayments: Vec<Money>,
    ) -> Result<Self> {
        if outstanding.len() != repayments.len() {
            return Err(ServiceChargeError::InconsistentSeriesLength {
                loan_id: loan.id,
                expected: outstanding.len(),
                found: repayments.len(),
            });
        }
        outstanding.reverse();
        repayments.reverse();
        Ok(Self {
            loan_id: loan.id,
            is_demand_loan,
            disbursement_date: loan.disbursement_date,
            mode,
            outstanding,
            repayments,
        })
    }

    pub fn loan_id(&self) -> LoanId {
        self.loan_id
    }

    pub fn is_demand_loan(&self) -> bool {
        self.is_demand_loan
    }

    pub fn disbursement_date(&self) -> NaiveDate {
        self.disbursement_date
    }

    pub fn mode(&self) -> SummaryMode {
        self.mode
    }

    pub fn outstanding(&self) -> &[Money] {
        &self.outstanding
    }

    pub fn repayments(&self) -> &[Money] {
        &self.repayments
    }

    /// number of sub-periods
    pub fn len(&self) -> usize {
        self.outstanding.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outstanding.is_empty()
    }

    pub fn total_outstanding(&self) -> Money {
        self.outstanding.iter().sum()
    }

    pub fn total_repayments(&self) -> Money {
        self.repayments.iter().sum()
    }
}

/// builds loan summaries for one billing period
pub struct SummaryBuilder<'a, R: RepaymentReader> {
    period: &'a ActivePeriod,
    reader: &'a R,
    averaging: AveragingPolicy,
    average_scale: u32,
}

impl<'a, R: RepaymentReader> SummaryBuilder<'a, R> {
    pub fn new(period: &'a ActivePeriod, reader: &'a R) -> Self {
        Self {
            period,
            reader,
            averaging: AveragingPolicy::WeightedSum,
            average_scale: 2,
        }
    }

    pub fn with_averaging(mut self, averaging: AveragingPolicy, average_scale: u32) -> Self {
        self.averaging = averaging;
        self.average_scale = average_scale;
        self
    }

    pub fn period(&self) -> &ActivePeriod {
        self.period
    }

    pub fn build(
        &self,
        loan: &LoanSnapshot,
        product: &LoanProductSnapshot,
        mode: SummaryMode,
    ) -> Result<LoanBalanceSeries> {
        debug!(
            loan_id = loan.id,
            client_id = loan.client_id,
            principal_outstanding = %loan.principal_outstanding,
            disbursement_date = %loan.disbursement_date,
            ?mode,
            "summarising loan"
        );

        let is_demand_loan = product.is_demand_loan();
        let (outstanding, repayments) = match mode {
            SummaryMode::Monthly => MonthlySummary::new(self.period, self.reader).summarise(loan)?,
            SummaryMode::Daily => DailySummary::new(self.period, self.reader)
                .with_averaging(self.averaging, self.average_scale)
                .summarise(loan)?,
        };

        let series = LoanBalanceSeries::from_backward(loan, is_demand_loan, mode, outstanding, repayments)?;
        let expected = self.period.duration_in_months() as usize;
        if series.len() != expected {
            return Err(ServiceChargeError::InconsistentSeriesLength {
                loan_id: loan.id,
                expected,
                found: series.len(),
            });
        }
        debug!(loan_id = loan.id, outstanding = ?series.outstanding(), "loan summarised");
        Ok(series)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::NaiveDate;

    use crate::decimal::Money;
    use crate::period::{ActivePeriod, BillingPeriod, Quarter};
    use crate::types::{LoanCategory, LoanProductSnapshot, LoanSnapshot};

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    pub fn q1_2024() -> ActivePeriod {
        ActivePeriod::new(BillingPeriod::Quarterly(Quarter::Q1), 2024).unwrap()
    }

    pub fn loan(id: u64, balance: i64, disbursed: NaiveDate) -> LoanSnapshot {
        LoanSnapshot {
            id,
            client_id: 100 + id,
            product_id: 1,
            principal_outstanding: Money::from_major(balance),
            total_outstanding_amount: Money::from_major(balance),
            disbursement_date: disbursed,
        }
    }

    pub fn product(category: LoanCategory) -> LoanProductSnapshot {
        LoanProductSnapshot {
            id: 1,
            name: "Test Product".to_string(),
            short_name: "TP".to_string(),
            category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::reader::InMemoryRepaymentReader;
    use crate::types::{LoanCategory, RepaymentEvent};

    #[test]
    fn test_series_reads_chronologically() {
        let loan = loan(1, 1_000, date(2023, 6, 1));
        let series = LoanBalanceSeries::from_backward(
            &loan,
            false,
            SummaryMode::Monthly,
            vec![Money::from_major(3), Money::from_major(2), Money::from_major(1)],
            vec![Money::ZERO; 3],
        )
        .unwrap();
        assert_eq!(series.outstanding(), &[Money::from_major(1), Money::from_major(2), Money::from_major(3)]);
        assert_eq!(series.total_outstanding(), Money::from_major(6));
    }

    #[test]
    fn test_mismatched_lengths_rejected() {
        let loan = loan(9, 1_000, date(2023, 6, 1));
        let err = LoanBalanceSeries::from_backward(
            &loan,
            false,
            SummaryMode::Monthly,
            vec![Money::ZERO; 3],
            vec![Money::ZERO; 2],
        )
        .unwrap_err();
        assert!(matches!(err, ServiceChargeError::InconsistentSeriesLength { loan_id: 9, .. }));
    }

    #[test]
    fn test_builder_lengths_match_period() {
        let period = q1_2024();
        let reader = InMemoryRepaymentReader::new().with_events([RepaymentEvent::repayment(
            1,
            date(2024, 2, 10),
            Money::from_major(50),
            Money::from_major(40),
        )]);
        let builder = SummaryBuilder::new(&period, &reader);
        let loan = loan(1, 1_000, date(2023, 6, 1));

        for mode in [SummaryMode::Monthly, SummaryMode::Daily] {
            let series = builder.build(&loan, &product(LoanCategory::Demand), mode).unwrap();
            assert_eq!(series.len(), 3);
            assert_eq!(series.outstanding().len(), series.repayments().len());
            assert!(series.is_demand_loan());
            assert_eq!(series.mode(), mode);
        }
    }
}
