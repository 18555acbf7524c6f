use tracing::debug;

use crate::decimal::Money;
use crate::errors::Result;
use crate::period::ActivePeriod;
use crate::reader::RepaymentReader;
use crate::types::LoanSnapshot;

/// month-end balance snapshots, reconstructed backwards from today's
/// outstanding by adding back each month's repayments
pub struct MonthlySummary<'a, R: RepaymentReader> {
    period: &'a ActivePeriod,
    reader: &'a R,
}

impl<'a, R: RepaymentReader> MonthlySummary<'a, R> {
    pub fn new(period: &'a ActivePeriod, reader: &'a R) -> Self {
        Self { period, reader }
    }

    /// returns (outstanding, repayments), most recent sub-period first
    pub fn summarise(&self, loan: &LoanSnapshot) -> Result<(Vec<Money>, Vec<Money>)> {
        let months = self.period.duration_in_months() as usize;
        let mut outstanding = Vec::with_capacity(months);
        let mut repayments = Vec::with_capacity(months);
        let mut balance = loan.total_outstanding_amount;

        for window in self.period.month_windows() {
            // not yet disbursed
            if loan.disbursement_date >= window.last_day {
                outstanding.push(Money::ZERO);
                repayments.push(Money::ZERO);
                continue;
            }

            outstanding.push(balance);

            let repaid: Money = self
                .reader
                .fetch(loan.id, window.first_day, window.last_day)?
                .iter()
                .filter(|event| event.is_repayment())
                .map(|event| event.amount)
                .sum();
            balance += repaid;
            repayments.push(repaid);

            debug!(
                loan_id = loan.id,
                month = %window.first_day,
                %repaid,
                opening_balance = %balance,
                "monthly snapshot"
            );
        }

        Ok((outstanding, repayments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::BillingPeriod;
    use crate::reader::InMemoryRepaymentReader;
    use crate::summary::test_support::*;
    use crate::types::{RepaymentEvent, TransactionType};

    fn event(loan_id: u64, d: chrono::NaiveDate, amount: i64, kind: TransactionType) -> RepaymentEvent {
        RepaymentEvent {
            loan_id,
            transaction_date: d,
            transaction_type: kind,
            amount: Money::from_major(amount),
            principal_portion: Money::from_major(amount),
        }
    }

    #[test]
    fn test_balances_rebuilt_backwards() {
        let period = q1_2024();
        let reader = InMemoryRepaymentReader::new().with_events([
            event(1, date(2024, 3, 10), 100, TransactionType::Repayment),
            event(1, date(2024, 2, 5), 50, TransactionType::Repayment),
            event(1, date(2024, 2, 20), 25, TransactionType::RepaymentAtDisbursement),
            event(1, date(2024, 2, 21), 999, TransactionType::Disbursement),
        ]);
        let loan = loan(1, 1_000, date(2023, 11, 1));

        let (mut outstanding, mut repayments) = MonthlySummary::new(&period, &reader).summarise(&loan).unwrap();
        outstanding.reverse();
        repayments.reverse();

        // jan, feb, mar
        assert_eq!(outstanding, vec![Money::from_major(1_175), Money::from_major(1_100), Money::from_major(1_000)]);
        assert_eq!(repayments, vec![Money::ZERO, Money::from_major(75), Money::from_major(100)]);
    }

    #[test]
    fn test_pre_disbursement_months_are_zero() {
        let period = q1_2024();
        let reader = InMemoryRepaymentReader::new()
            .with_events([event(2, date(2024, 3, 1), 200, TransactionType::Repayment)]);
        let loan = loan(2, 800, date(2024, 2, 15));

        let (mut outstanding, mut repayments) = MonthlySummary::new(&period, &reader).summarise(&loan).unwrap();
        outstanding.reverse();
        repayments.reverse();

        assert_eq!(outstanding, vec![Money::ZERO, Money::from_major(1_000), Money::from_major(800)]);
        assert_eq!(repayments, vec![Money::ZERO, Money::ZERO, Money::from_major(200)]);
    }

    #[test]
    fn test_disbursed_on_last_day_of_month_is_not_active() {
        let period = q1_2024();
        let reader = InMemoryRepaymentReader::new();
        let loan = loan(5, 600, date(2024, 1, 31));

        let (mut outstanding, _) = MonthlySummary::new(&period, &reader).summarise(&loan).unwrap();
        outstanding.reverse();

        assert_eq!(outstanding, vec![Money::ZERO, Money::from_major(600), Money::from_major(600)]);
    }

    #[test]
    fn test_repayments_reconcile_with_period_total() {
        let period = ActivePeriod::new(BillingPeriod::Yearly, 2023).unwrap();
        let events: Vec<_> = (1..=12)
            .map(|m| event(3, date(2023, m, 28), 10 * m as i64, TransactionType::Repayment))
            .chain([event(3, date(2023, 6, 1), 500, TransactionType::Waiver)])
            .collect();
        let expected: Money = events.iter().filter(|e| e.is_repayment()).map(|e| e.amount).sum();
        let reader = InMemoryRepaymentReader::new().with_events(events);
        let loan = loan(3, 5_000, date(2022, 1, 1));

        let (outstanding, repayments) = MonthlySummary::new(&period, &reader).summarise(&loan).unwrap();
        assert_eq!(outstanding.len(), 12);
        assert_eq!(repayments.iter().sum::<Money>(), expected);
    }

    #[test]
    fn test_reader_failure_propagates() {
        let period = q1_2024();
        let mut reader = InMemoryRepaymentReader::new();
        reader.mark_unavailable(4, "timeout");
        let loan = loan(4, 500, date(2023, 1, 1));

        let err = MonthlySummary::new(&period, &reader).summarise(&loan).unwrap_err();
        assert!(matches!(err, crate::errors::ServiceChargeError::DataAccessFailure { loan_id: 4, .. }));
    }
}
