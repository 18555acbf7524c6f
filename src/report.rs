//! serializable view of a service charge computation
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::aggregator::PeriodicChargeComputation;
use crate::decimal::Money;
use crate::errors::{Result, ServiceChargeError};
use crate::types::{LoanId, SummaryMode};

#[derive(Debug, Serialize, Deserialize)]
pub struct ChargeReport {
    pub run_id: Uuid,
    pub period: PeriodView,
    pub demand_loans: CategoryView,
    pub term_loans: CategoryView,
    pub total_outstanding_amount: Money,
    pub loans: Vec<LoanView>,
    pub failures: Vec<FailureView>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PeriodView {
    pub name: String,
    pub year: i32,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub months: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryView {
    pub loan_count: usize,
    pub monthly_outstanding: Vec<Money>,
    pub monthly_repayments: Vec<Money>,
    pub total_outstanding: Money,
    pub total_repayments: Money,
}

impl CategoryView {
    fn new(loan_count: usize, monthly_outstanding: &[Money], monthly_repayments: &[Money]) -> Self {
        CategoryView {
            loan_count,
            monthly_outstanding: monthly_outstanding.to_vec(),
            monthly_repayments: monthly_repayments.to_vec(),
            total_outstanding: monthly_outstanding.iter().sum(),
            total_repayments: monthly_repayments.iter().sum(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoanView {
    pub loan_id: LoanId,
    pub is_demand_loan: bool,
    pub disbursement_date: NaiveDate,
    pub mode: SummaryMode,
    pub outstanding: Vec<Money>,
    pub repayments: Vec<Money>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FailureView {
    pub loan_id: LoanId,
    pub reason: String,
}

impl ChargeReport {
    pub fn from_computation(computation: &PeriodicChargeComputation) -> Self {
        let period = &computation.period;
        ChargeReport {
            run_id: computation.run_id,
            period: PeriodView {
                name: period.period.name().to_string(),
                year: period.year,
                from_date: period.from_date(),
                to_date: period.to_date(),
                months: period.duration_in_months(),
            },
            demand_loans: CategoryView::new(
                computation.demand_loan_count,
                &computation.demand_loan_monthly_series,
                &computation.demand_loan_monthly_repayments,
            ),
            term_loans: CategoryView::new(
                computation.term_loan_count,
                &computation.term_loan_monthly_series,
                &computation.term_loan_monthly_repayments,
            ),
            total_outstanding_amount: computation.total_outstanding_amount,
            loans: computation
                .summaries
                .iter()
                .map(|s| LoanView {
                    loan_id: s.loan_id(),
                    is_demand_loan: s.is_demand_loan(),
                    disbursement_date: s.disbursement_date(),
                    mode: s.mode(),
                    outstanding: s.outstanding().to_vec(),
                    repayments: s.repayments().to_vec(),
                })
                .collect(),
            failures: computation
                .failures
                .iter()
                .map(|f| FailureView {
                    loan_id: f.loan_id,
                    reason: f.error.to_string(),
                })
                .collect(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| ServiceChargeError::CalculationError {
            message: format!("failed to serialize report: {e}"),
        })
    }
}
