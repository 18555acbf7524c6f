use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;

/// loan account identifier as issued by the core banking platform
pub type LoanId = u64;

/// loan product identifier
pub type ProductId = u64;

/// client identifier
pub type ClientId = u64;

/// how the billing period is laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CalculationMethod {
    /// one calendar quarter, three monthly sub-periods
    Quarterly,
    /// one calendar year, twelve monthly sub-periods
    Yearly,
}

/// loan product category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoanCategory {
    /// repayable on demand, balances weighted daily
    Demand,
    /// fixed repayment schedule
    Term,
}

/// how a single loan's sub-period balances are derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SummaryMode {
    /// closing balance snapshot per month
    Monthly,
    /// sum of balance x days held per month
    Daily,
}

/// loan transaction types relevant to balance reconstruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    Disbursement,
    Repayment,
    RepaymentAtDisbursement,
    Waiver,
    WriteOff,
    Accrual,
    Charge,
}

impl TransactionType {
    /// transactions that reduce the outstanding balance going forward
    pub fn is_repayment(&self) -> bool {
        matches!(self, TransactionType::Repayment | TransactionType::RepaymentAtDisbursement)
    }
}

/// a loan transaction as read from the repayment store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepaymentEvent {
    pub loan_id: LoanId,
    pub transaction_date: NaiveDate,
    pub transaction_type: TransactionType,
    pub amount: Money,
    pub principal_portion: Money,
}

impl RepaymentEvent {
    pub fn repayment(loan_id: LoanId, transaction_date: NaiveDate, amount: Money, principal_portion: Money) -> Self {
        Self {
            loan_id,
            transaction_date,
            transaction_type: TransactionType::Repayment,
            amount,
            principal_portion,
        }
    }

    pub fn is_repayment(&self) -> bool {
        self.transaction_type.is_repayment()
    }
}

/// read-only view of a loan account at calculation time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanSnapshot {
    pub id: LoanId,
    pub client_id: ClientId,
    pub product_id: ProductId,
    pub principal_outstanding: Money,
    pub total_outstanding_amount: Money,
    pub disbursement_date: NaiveDate,
}

/// read-only view of a loan product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanProductSnapshot {
    pub id: ProductId,
    pub name: String,
    pub short_name: String,
    pub category: LoanCategory,
}

impl LoanProductSnapshot {
    pub fn is_demand_loan(&self) -> bool {
        self.category == LoanCategory::Demand
    }
}
