use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;
use crate::period::BillingPeriod;
use crate::types::{LoanId, SummaryMode};

/// audit trail of a service charge computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    PeriodResolved {
        run_id: Uuid,
        period: BillingPeriod,
        year: i32,
        from_date: NaiveDate,
        to_date: NaiveDate,
    },
    LoanSummarised {
        run_id: Uuid,
        loan_id: LoanId,
        mode: SummaryMode,
        total_outstanding: Money,
        total_repayments: Money,
    },
    /// the loan appeared more than once and its summary was reused
    LoanSummaryReused {
        run_id: Uuid,
        loan_id: LoanId,
    },
    LoanSummaryFailed {
        run_id: Uuid,
        loan_id: LoanId,
        reason: String,
    },
    PortfolioAggregated {
        run_id: Uuid,
        is_demand_loan: bool,
        loan_count: usize,
        total_outstanding: Money,
    },
}

/// event store for collecting events during a computation
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }
}
