use rust_decimal::RoundingStrategy;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use std::str::FromStr;

use crate::errors::{Result, ServiceChargeError};

/// Money type with 8 decimal places of working precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);
    pub const ONE: Money = Money(Decimal::ONE);

    /// working scale applied after every operation
    pub const SCALE: u32 = 8;

    /// create from decimal
    pub fn from_decimal(d: Decimal) -> Self {
        Money(d.round_dp(Self::SCALE))
    }

    /// create from string with exact parsing
    pub fn from_str_exact(s: &str) -> std::result::Result<Self, rust_decimal::Error> {
        Ok(Money(Decimal::from_str(s)?.round_dp(Self::SCALE)))
    }

    /// create from integer amount (dollars, rupees, etc)
    pub fn from_major(amount: i64) -> Self {
        Money(Decimal::from(amount))
    }

    /// get underlying decimal
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// round to specified decimal places
    pub fn round_dp(&self, dp: u32) -> Self {
        Money(self.0.round_dp(dp))
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// balance held for a number of days, i.e. one term of a time-weighted sum
    pub fn weighted_by_days(&self, days: i64) -> Self {
        Money::from_decimal(self.0 * Decimal::from(days))
    }

    /// divide rounding half-up at `dp` places
    pub fn div_half_up(&self, divisor: Decimal, dp: u32) -> Result<Self> {
        if divisor.is_zero() {
            return Err(ServiceChargeError::CalculationError {
                message: format!("division of {} by zero", self.0),
            });
        }
        let quotient = self.0.checked_div(divisor).ok_or_else(|| {
            ServiceChargeError::CalculationError {
                message: format!("overflow dividing {} by {}", self.0, divisor),
            }
        })?;
        Ok(Money(quotient.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)))
    }
}

/// divide then multiply, skipping any step whose factor is absent or zero.
///
/// the division rounds half-up at `dp` places. an absent operand yields one
/// so that the result can be used directly as a neutral multiplier.
pub fn divide_and_multiply_non_zero(
    operand: Option<Decimal>,
    divisor: Option<Decimal>,
    multiplicand: Option<Decimal>,
    dp: u32,
) -> Result<Decimal> {
    let Some(mut value) = operand else {
        return Ok(Decimal::ONE);
    };
    if let Some(divisor) = divisor.filter(|d| !d.is_zero()) {
        value = value
            .checked_div(divisor)
            .ok_or_else(|| ServiceChargeError::CalculationError {
                message: format!("overflow dividing {value} by {divisor}"),
            })?
            .round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    }
    if let Some(multiplicand) = multiplicand.filter(|m| !m.is_zero()) {
        value = value
            .checked_mul(multiplicand)
            .ok_or_else(|| ServiceChargeError::CalculationError {
                message: format!("overflow multiplying {value} by {multiplicand}"),
            })?;
    }
    Ok(value)
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Money::from_str_exact(s)
    }
}

impl From<Decimal> for Money {
    fn from(d: Decimal) -> Self {
        Money::from_decimal(d)
    }
}

impl From<i64> for Money {
    fn from(i: i64) -> Self {
        Money::from_major(i)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money((self.0 + other.0).round_dp(Self::SCALE))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Money) {
        self.0 = (self.0 + other.0).round_dp(Self::SCALE);
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money((self.0 - other.0).round_dp(Self::SCALE))
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Money) {
        self.0 = (self.0 - other.0).round_dp(Self::SCALE);
    }
}

impl Mul<Decimal> for Money {
    type Output = Money;

    fn mul(self, other: Decimal) -> Money {
        Money((self.0 * other).round_dp(Self::SCALE))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + *m)
    }
}
