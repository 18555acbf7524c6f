pub mod factory;

use chrono::{Month, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::calendar::MonthWindows;
use crate::errors::{Result, ServiceChargeError};
use crate::types::CalculationMethod;

pub use factory::DateRangeFactory;

/// pattern the boundary templates are completed with, e.g. "31 Mar 2024"
const BOUNDARY_FORMAT: &str = "%d %b %Y";

/// calendar quarter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quarter {
    pub const ALL: [Quarter; 4] = [Quarter::Q1, Quarter::Q2, Quarter::Q3, Quarter::Q4];

    /// quarter that contains the given month
    pub fn containing(month: Month) -> Self {
        match month {
            Month::January | Month::February | Month::March => Quarter::Q1,
            Month::April | Month::May | Month::June => Quarter::Q2,
            Month::July | Month::August | Month::September => Quarter::Q3,
            Month::October | Month::November | Month::December => Quarter::Q4,
        }
    }

    pub fn id(&self) -> u32 {
        match self {
            Quarter::Q1 => 1,
            Quarter::Q2 => 2,
            Quarter::Q3 => 3,
            Quarter::Q4 => 4,
        }
    }

    fn templates(&self) -> (&'static str, &'static str) {
        match self {
            Quarter::Q1 => ("01 Jan ", "31 Mar "),
            Quarter::Q2 => ("01 Apr ", "30 Jun "),
            Quarter::Q3 => ("01 Jul ", "30 Sep "),
            Quarter::Q4 => ("01 Oct ", "31 Dec "),
        }
    }
}

/// billing period a service charge is computed over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BillingPeriod {
    Quarterly(Quarter),
    Yearly,
}

impl BillingPeriod {
    pub const ALL: [BillingPeriod; 5] = [
        BillingPeriod::Quarterly(Quarter::Q1),
        BillingPeriod::Quarterly(Quarter::Q2),
        BillingPeriod::Quarterly(Quarter::Q3),
        BillingPeriod::Quarterly(Quarter::Q4),
        BillingPeriod::Yearly,
    ];

    pub fn id(&self) -> u32 {
        match self {
            BillingPeriod::Quarterly(q) => q.id(),
            BillingPeriod::Yearly => 1,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BillingPeriod::Quarterly(Quarter::Q1) => "Q1",
            BillingPeriod::Quarterly(Quarter::Q2) => "Q2",
            BillingPeriod::Quarterly(Quarter::Q3) => "Q3",
            BillingPeriod::Quarterly(Quarter::Q4) => "Q4",
            BillingPeriod::Yearly => "YEARLY",
        }
    }

    pub fn calculation_method(&self) -> CalculationMethod {
        match self {
            BillingPeriod::Quarterly(_) => CalculationMethod::Quarterly,
            BillingPeriod::Yearly => CalculationMethod::Yearly,
        }
    }

    pub fn duration_in_months(&self) -> u32 {
        match self {
            BillingPeriod::Quarterly(_) => 3,
            BillingPeriod::Yearly => 12,
        }
    }

    /// "dd Mon " prefixes for the first and last day of the period
    pub fn boundary_templates(&self) -> (&'static str, &'static str) {
        match self {
            BillingPeriod::Quarterly(q) => q.templates(),
            BillingPeriod::Yearly => ("01 Jan ", "31 Dec "),
        }
    }

    pub fn from_date(&self, year: i32) -> Result<NaiveDate> {
        resolve_boundary(self.boundary_templates().0, year)
    }

    pub fn to_date(&self, year: i32) -> Result<NaiveDate> {
        resolve_boundary(self.boundary_templates().1, year)
    }
}

impl fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn resolve_boundary(template: &str, year: i32) -> Result<NaiveDate> {
    let text = format!("{template}{year}");
    NaiveDate::parse_from_str(&text, BOUNDARY_FORMAT).map_err(|e| ServiceChargeError::InvalidDate {
        message: format!("cannot resolve period boundary {text:?}: {e}"),
    })
}

/// a billing period pinned to a calendar year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ActivePeriodRecord")]
pub struct ActivePeriod {
    pub period: BillingPeriod,
    pub year: i32,
    from_date: NaiveDate,
    to_date: NaiveDate,
}

impl ActivePeriod {
    pub fn new(period: BillingPeriod, year: i32) -> Result<Self> {
        let from_date = period.from_date(year)?;
        let to_date = period.to_date(year)?;
        if from_date >= to_date {
            return Err(ServiceChargeError::InvalidDateRange { from: from_date, to: to_date });
        }
        Ok(Self { period, year, from_date, to_date })
    }

    pub fn from_date(&self) -> NaiveDate {
        self.from_date
    }

    pub fn to_date(&self) -> NaiveDate {
        self.to_date
    }

    pub fn duration_in_months(&self) -> u32 {
        self.period.duration_in_months()
    }

    /// monthly sub-periods, most recent first
    pub fn month_windows(&self) -> MonthWindows {
        MonthWindows::new(self.to_date, self.duration_in_months())
    }
}

/// serialized form of an active period; the boundaries are derived again on load
#[derive(Deserialize)]
struct ActivePeriodRecord {
    period: BillingPeriod,
    year: i32,
    from_date: Option<NaiveDate>,
    to_date: Option<NaiveDate>,
}

impl TryFrom<ActivePeriodRecord> for ActivePeriod {
    type Error = ServiceChargeError;

    fn try_from(record: ActivePeriodRecord) -> Result<Self> {
        let active = ActivePeriod::new(record.period, record.year)?;
        let from = record.from_date.unwrap_or(active.from_date);
        let to = record.to_date.unwrap_or(active.to_date);
        if from != active.from_date || to != active.to_date {
            return Err(ServiceChargeError::InvalidDateRange { from, to });
        }
        Ok(active)
    }
}

impl fmt::Display for ActivePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({} to {})", self.period, self.year, self.from_date, self.to_date)
    }
}
