use chrono::NaiveDate;
use thiserror::Error;

use crate::types::{LoanId, ProductId};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceChargeError {
    #[error("invalid period code: {code:?}")]
    InvalidPeriodCode {
        code: String,
    },

    #[error("repayment data unavailable for loan {loan_id}: {message}")]
    DataAccessFailure {
        loan_id: LoanId,
        message: String,
    },

    #[error("inconsistent series length for loan {loan_id}: expected {expected}, found {found}")]
    InconsistentSeriesLength {
        loan_id: LoanId,
        expected: usize,
        found: usize,
    },

    #[error("invalid date: {message}")]
    InvalidDate {
        message: String,
    },

    #[error("invalid date range: {from} is not before {to}")]
    InvalidDateRange {
        from: NaiveDate,
        to: NaiveDate,
    },

    #[error("loan {loan_id} references unknown product {product_id}")]
    UnknownProduct {
        loan_id: LoanId,
        product_id: ProductId,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("calculation error: {message}")]
    CalculationError {
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, ServiceChargeError>;
