use serde::{Deserialize, Serialize};

use crate::errors::{Result, ServiceChargeError};
use crate::types::{CalculationMethod, LoanCategory, SummaryMode};

/// which billing period to compute over
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodConfig {
    pub calculation_method: CalculationMethod,
    /// english month name or three letter abbreviation; the current month when absent
    pub month_code: Option<String>,
    /// calendar year; the current year when absent or zero
    pub year: Option<i32>,
}

impl PeriodConfig {
    pub fn quarterly() -> Self {
        Self {
            calculation_method: CalculationMethod::Quarterly,
            month_code: None,
            year: None,
        }
    }

    pub fn yearly() -> Self {
        Self {
            calculation_method: CalculationMethod::Yearly,
            month_code: None,
            year: None,
        }
    }

    pub fn with_month(mut self, month_code: impl Into<String>) -> Self {
        self.month_code = Some(month_code.into());
        self
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }
}

/// which summary mode each loan gets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SummaryStrategy {
    AlwaysMonthly,
    AlwaysDaily,
    /// daily weighting for demand loans, monthly snapshots for term loans
    ByLoanCategory,
}

impl SummaryStrategy {
    pub fn mode_for(&self, category: LoanCategory) -> SummaryMode {
        match (self, category) {
            (SummaryStrategy::AlwaysMonthly, _) => SummaryMode::Monthly,
            (SummaryStrategy::AlwaysDaily, _) => SummaryMode::Daily,
            (SummaryStrategy::ByLoanCategory, LoanCategory::Demand) => SummaryMode::Daily,
            (SummaryStrategy::ByLoanCategory, LoanCategory::Term) => SummaryMode::Monthly,
        }
    }
}

/// what the daily mode reports per sub-period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AveragingPolicy {
    /// sum of balance x days held
    WeightedSum,
    /// weighted sum divided by the days in the sub-period
    DailyAverage,
}

/// what happens when a single loan cannot be summarised
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailurePolicy {
    /// abort the whole computation on the first failing loan
    FailFast,
    /// record the failure and carry on with the remaining loans
    CollectErrors,
}

/// service charge computation configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceChargeConfig {
    pub period: PeriodConfig,
    pub summary_strategy: SummaryStrategy,
    pub averaging_policy: AveragingPolicy,
    pub failure_policy: FailurePolicy,
    /// decimal places kept when averaging
    pub average_scale: u32,
}

impl ServiceChargeConfig {
    pub fn new(period: PeriodConfig) -> Self {
        Self {
            period,
            summary_strategy: SummaryStrategy::ByLoanCategory,
            averaging_policy: AveragingPolicy::WeightedSum,
            failure_policy: FailurePolicy::FailFast,
            average_scale: 2,
        }
    }

    /// quarterly charge for the current quarter
    pub fn quarterly() -> Self {
        Self::new(PeriodConfig::quarterly())
    }

    /// yearly charge for the current year
    pub fn yearly() -> Self {
        Self::new(PeriodConfig::yearly())
    }

    pub fn with_summary_strategy(mut self, strategy: SummaryStrategy) -> Self {
        self.summary_strategy = strategy;
        self
    }

    pub fn with_averaging_policy(mut self, policy: AveragingPolicy) -> Self {
        self.averaging_policy = policy;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ServiceChargeError::InvalidConfiguration {
            message: e.to_string(),
        })
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| ServiceChargeError::InvalidConfiguration {
            message: e.to_string(),
        })
    }
}

impl Default for ServiceChargeConfig {
    fn default() -> Self {
        Self::quarterly()
    }
}
