use chrono::{Datelike, Month};
use hourglass_rs::SafeTimeProvider;
use tracing::debug;

use crate::config::PeriodConfig;
use crate::errors::{Result, ServiceChargeError};
use crate::period::{ActivePeriod, BillingPeriod, Quarter};
use crate::types::CalculationMethod;

/// picks the billing period a computation runs over
pub struct DateRangeFactory;

impl DateRangeFactory {
    /// resolve a period configuration against the current date.
    ///
    /// the month code only matters for quarterly periods; an explicit
    /// non-zero year overrides the current year.
    pub fn resolve(config: &PeriodConfig, time_provider: &SafeTimeProvider) -> Result<ActivePeriod> {
        let today = time_provider.now().date_naive();

        let period = match config.calculation_method {
            CalculationMethod::Quarterly => {
                let month = match config.month_code.as_deref().map(str::trim) {
                    Some(code) if !code.is_empty() => parse_month_code(code)?,
                    _ => current_month(today.month())?,
                };
                BillingPeriod::Quarterly(Quarter::containing(month))
            }
            CalculationMethod::Yearly => BillingPeriod::Yearly,
        };

        let year = match config.year {
            Some(year) if year != 0 => year,
            _ => today.year(),
        };

        let active = ActivePeriod::new(period, year)?;
        debug!(period = %active, "derived billing period");
        Ok(active)
    }
}

/// parse an english month name or abbreviation, ignoring case
pub fn parse_month_code(code: &str) -> Result<Month> {
    code.parse::<Month>().map_err(|_| ServiceChargeError::InvalidPeriodCode {
        code: code.to_string(),
    })
}

fn current_month(month: u32) -> Result<Month> {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .ok_or_else(|| ServiceChargeError::InvalidDate {
            message: format!("month {month} out of range"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use hourglass_rs::TimeSource;

    fn clock(y: i32, m: u32, d: u32) -> SafeTimeProvider {
        SafeTimeProvider::new(TimeSource::Test(Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()))
    }

    #[test]
    fn test_month_code_selects_quarter() {
        let time = clock(2024, 11, 5);
        let cases = [
            ("JANUARY", Quarter::Q1),
            ("march", Quarter::Q1),
            ("Apr", Quarter::Q2),
            ("june", Quarter::Q2),
            ("AUGUST", Quarter::Q3),
            ("Dec", Quarter::Q4),
        ];
        for (code, quarter) in cases {
            let config = PeriodConfig::quarterly().with_month(code);
            let active = DateRangeFactory::resolve(&config, &time).unwrap();
            assert_eq!(active.period, BillingPeriod::Quarterly(quarter), "{code}");
            assert_eq!(active.year, 2024);
        }
    }

    #[test]
    fn test_defaults_to_current_month_and_year() {
        let time = clock(2025, 5, 20);
        let active = DateRangeFactory::resolve(&PeriodConfig::quarterly(), &time).unwrap();
        assert_eq!(active.period, BillingPeriod::Quarterly(Quarter::Q2));
        assert_eq!(active.from_date(), NaiveDate::from_ymd_opt(2025, 4, 1).unwrap());
        assert_eq!(active.to_date(), NaiveDate::from_ymd_opt(2025, 6, 30).unwrap());

        // blank codes behave like absent ones
        let blank = PeriodConfig::quarterly().with_month("  ");
        assert_eq!(DateRangeFactory::resolve(&blank, &time).unwrap(), active);
    }

    #[test]
    fn test_explicit_year_overrides() {
        let time = clock(2025, 5, 20);
        let config = PeriodConfig::quarterly().with_month("february").with_year(2024);
        let active = DateRangeFactory::resolve(&config, &time).unwrap();
        assert_eq!(active.from_date(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(active.to_date(), NaiveDate::from_ymd_opt(2024, 3, 31).unwrap());

        // zero means "not supplied"
        let config = PeriodConfig::yearly().with_year(0);
        assert_eq!(DateRangeFactory::resolve(&config, &time).unwrap().year, 2025);
    }

    #[test]
    fn test_invalid_month_code() {
        let time = clock(2025, 5, 20);
        let config = PeriodConfig::quarterly().with_month("Smarch");
        let err = DateRangeFactory::resolve(&config, &time).unwrap_err();
        assert_eq!(err, ServiceChargeError::InvalidPeriodCode { code: "Smarch".to_string() });
    }

    #[test]
    fn test_yearly_ignores_month_code() {
        let time = clock(2025, 5, 20);
        let config = PeriodConfig::yearly().with_month("not-a-month").with_year(2023);
        let active = DateRangeFactory::resolve(&config, &time).unwrap();
        assert_eq!(active.period, BillingPeriod::Yearly);
        assert_eq!(active.month_windows().count(), 12);
        assert_eq!(active.from_date(), NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        assert_eq!(active.to_date(), NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
    }
}
