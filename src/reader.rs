use chrono::NaiveDate;
use std::collections::HashMap;

use crate::errors::{Result, ServiceChargeError};
use crate::types::{LoanId, RepaymentEvent};

/// source of loan transactions, usually backed by the platform's loan store.
///
/// implementations return every transaction dated within `from..=to`, in any
/// order. an empty vector means no activity and is not an error.
pub trait RepaymentReader {
    fn fetch(&self, loan_id: LoanId, from: NaiveDate, to: NaiveDate) -> Result<Vec<RepaymentEvent>>;
}

impl<R: RepaymentReader + ?Sized> RepaymentReader for &R {
    fn fetch(&self, loan_id: LoanId, from: NaiveDate, to: NaiveDate) -> Result<Vec<RepaymentEvent>> {
        (**self).fetch(loan_id, from, to)
    }
}

/// in-memory transaction store
#[derive(Debug, Default, Clone)]
pub struct InMemoryRepaymentReader {
    transactions: HashMap<LoanId, Vec<RepaymentEvent>>,
    unavailable: HashMap<LoanId, String>,
}

impl InMemoryRepaymentReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: RepaymentEvent) {
        self.transactions.entry(event.loan_id).or_default().push(event);
    }

    pub fn with_events(mut self, events: impl IntoIterator<Item = RepaymentEvent>) -> Self {
        for event in events {
            self.record(event);
        }
        self
    }

    /// make every fetch for `loan_id` fail with a data access error
    pub fn mark_unavailable(&mut self, loan_id: LoanId, message: impl Into<String>) {
        self.unavailable.insert(loan_id, message.into());
    }

    pub fn events(&self, loan_id: LoanId) -> &[RepaymentEvent] {
        self.transactions.get(&loan_id).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl RepaymentReader for InMemoryRepaymentReader {
    fn fetch(&self, loan_id: LoanId, from: NaiveDate, to: NaiveDate) -> Result<Vec<RepaymentEvent>> {
        if let Some(message) = self.unavailable.get(&loan_id) {
            return Err(ServiceChargeError::DataAccessFailure {
                loan_id,
                message: message.clone(),
            });
        }
        Ok(self
            .events(loan_id)
            .iter()
            .filter(|e| e.transaction_date >= from && e.transaction_date <= to)
            .cloned()
            .collect())
    }
}
