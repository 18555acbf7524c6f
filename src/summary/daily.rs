use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::debug;

use crate::calendar::{days_between, MonthWindow};
use crate::config::AveragingPolicy;
use crate::decimal::{divide_and_multiply_non_zero, Money};
use crate::errors::{Result, ServiceChargeError};
use crate::period::ActivePeriod;
use crate::reader::RepaymentReader;
use crate::types::{LoanSnapshot, RepaymentEvent};

/// state carried while walking a month backwards one day at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyAccumulator {
    /// balance in effect from `date_marker` onwards
    pub running_balance: Money,
    /// exclusive upper end of the span the running balance covers
    pub date_marker: NaiveDate,
    /// sum of balance x days held so far
    pub weighted_sum: Money,
}

impl DailyAccumulator {
    pub fn new(closing_balance: Money, window: &MonthWindow) -> Result<Self> {
        let date_marker = window.last_day.succ_opt().ok_or_else(|| ServiceChargeError::InvalidDate {
            message: format!("no day follows {}", window.last_day),
        })?;
        Ok(Self {
            running_balance: closing_balance,
            date_marker,
            weighted_sum: Money::ZERO,
        })
    }

    /// weigh the current balance from `day` up to the marker, then undo the
    /// repayment made on `day`
    pub fn repaid(self, day: NaiveDate, amount: Money) -> Self {
        let held = self.running_balance.weighted_by_days(days_between(day, self.date_marker));
        Self {
            running_balance: self.running_balance + amount,
            date_marker: day,
            weighted_sum: self.weighted_sum + held,
        }
    }

    /// weigh the remaining span down to `boundary` with no balance change
    pub fn close(self, boundary: NaiveDate) -> Self {
        let held = self.running_balance.weighted_by_days(days_between(boundary, self.date_marker));
        Self {
            weighted_sum: self.weighted_sum + held,
            date_marker: boundary,
            ..self
        }
    }
}

/// principal repaid per calendar day, same-day repayments summed
pub fn repayments_by_day(events: &[RepaymentEvent]) -> BTreeMap<NaiveDate, Money> {
    events
        .iter()
        .filter(|event| event.is_repayment())
        .fold(BTreeMap::new(), |mut by_day, event| {
            *by_day.entry(event.transaction_date).or_insert(Money::ZERO) += event.principal_portion;
            by_day
        })
}

/// time-weighted outstanding of one month window.
///
/// days before `disbursement_date` are never visited, so they weigh zero.
pub fn weigh_window(
    window: &MonthWindow,
    disbursement_date: NaiveDate,
    closing_balance: Money,
    by_day: &BTreeMap<NaiveDate, Money>,
) -> Result<DailyAccumulator> {
    let boundary = window.first_day.max(disbursement_date);
    let start = DailyAccumulator::new(closing_balance, window)?;

    let walked = window
        .days_descending(boundary)
        .fold(start, |acc, day| match by_day.get(&day) {
            Some(amount) => acc.repaid(day, *amount),
            None => acc,
        });

    Ok(walked.close(boundary))
}

/// daily time-weighted balances, reconstructed backwards from today's
/// principal outstanding
pub struct DailySummary<'a, R: RepaymentReader> {
    period: &'a ActivePeriod,
    reader: &'a R,
    averaging: AveragingPolicy,
    average_scale: u32,
}

impl<'a, R: RepaymentReader> DailySummary<'a, R> {
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

    /// returns (outstanding, repayments), most recent sub-period first
    pub fn summarise(&self, loan: &LoanSnapshot) -> Result<(Vec<Money>, Vec<Money>)> {
        let months = self.period.duration_in_months() as usize;
        let mut outstanding = Vec::with_capacity(months);
        let mut repayments = Vec::with_capacity(months);
        let mut balance = loan.principal_outstanding;

        for window in self.period.month_windows() {
            if loan.disbursement_date >= window.last_day {
                outstanding.push(Money::ZERO);
                repayments.push(Money::ZERO);
                continue;
            }

            let events = self.reader.fetch(loan.id, window.first_day, window.last_day)?;
            let mut by_day = repayments_by_day(&events);
            // the walk stops at disbursement; earlier entries cannot be undone
            let boundary = window.first_day.max(loan.disbursement_date);
            by_day.retain(|day, _| *day >= boundary);
            let repaid: Money = by_day.values().sum();

            let weighed = weigh_window(&window, loan.disbursement_date, balance, &by_day)?;
            balance = weighed.running_balance;

            let value = match self.averaging {
                AveragingPolicy::WeightedSum => weighed.weighted_sum,
                AveragingPolicy::DailyAverage => Money::from_decimal(divide_and_multiply_non_zero(
                    Some(weighed.weighted_sum.as_decimal()),
                    Some(Decimal::from(window.days())),
                    None,
                    self.average_scale,
                )?),
            };

            debug!(
                loan_id = loan.id,
                month = %window.first_day,
                repayment_days = by_day.len(),
                weighted_sum = %weighed.weighted_sum,
                %repaid,
                "daily weighting"
            );

            outstanding.push(value);
            repayments.push(repaid);
        }

        Ok((outstanding, repayments))
    }
}
