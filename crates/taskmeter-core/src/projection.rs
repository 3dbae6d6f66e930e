//! Exact compound-growth projection of session earnings.
//!
//! Projects "earn this amount every day for `years` years, compounding at a
//! fixed daily rate" into a single future value:
//!
//! ```text
//! FV = P * ((1 + r)^n - 1) / r        r = pct / 100, n = years * 365
//! FV = P * n                          when r == 0 or n == 0
//! ```
//!
//! `1 + r` is held as the fixed-point fraction `(SCALE + r_scaled) / SCALE`.
//! Both powers are computed in full with arbitrary-precision integers,
//! principal and scale factors are folded into one numerator and one
//! denominator, and the only division happens last (truncating). The result
//! is therefore identical on every platform and for every call.

use num_bigint::BigInt;
use num_traits::{ToPrimitive, Zero};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::ProjectionError;

/// Fixed-point scale for the daily rate (8 decimal places).
pub const RATE_SCALE: u64 = 100_000_000;

/// Principal is carried in hundredths before being combined.
pub const PRINCIPAL_SCALE: u64 = 100;

/// Compounding periods per year.
pub const DAYS_PER_YEAR: u64 = 365;

/// Guard against unbounded exponent work: ten thousand years of daily
/// periods. The powers already run to roughly a hundred million bits here;
/// anything longer is reported as a calculation error instead of stalling.
pub const MAX_PERIODS: u64 = DAYS_PER_YEAR * 10_000;

/// User inputs for a projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionParams {
    pub years: u32,
    /// Daily interest in percent (`0.5` means 0.5 % per day).
    pub daily_rate_pct: Decimal,
}

impl ProjectionParams {
    pub fn new(years: u32, daily_rate_pct: Decimal) -> Self {
        Self {
            years,
            daily_rate_pct,
        }
    }

    /// Number of daily compounding periods.
    pub fn periods(&self) -> Result<u64, ProjectionError> {
        let periods = u64::from(self.years)
            .checked_mul(DAYS_PER_YEAR)
            .ok_or(ProjectionError::PeriodOverflow { years: self.years })?;
        if periods > MAX_PERIODS {
            return Err(ProjectionError::TooManyPeriods {
                periods,
                max: MAX_PERIODS,
            });
        }
        Ok(periods)
    }
}

impl Default for ProjectionParams {
    fn default() -> Self {
        Self {
            years: 15,
            daily_rate_pct: Decimal::new(5, 1),
        }
    }
}

/// Outcome of a successful projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectedValue {
    /// Future value in whole currency units, truncated.
    pub amount: BigInt,
    pub periods: u64,
    /// `false` when the linear fallback was used.
    pub compounded: bool,
}

impl ProjectedValue {
    /// Plain digit string of the amount.
    pub fn digits(&self) -> String {
        self.amount.to_string()
    }
}

/// Computes the future value of `principal` under `params`.
///
/// The caller is expected to skip non-positive principals; this function
/// itself accepts any value and passes it through the formula.
pub fn project_future_value(
    principal: Decimal,
    params: &ProjectionParams,
) -> Result<ProjectedValue, ProjectionError> {
    let periods = params.periods()?;

    if params.daily_rate_pct.is_zero() || periods == 0 {
        return linear(principal, periods);
    }

    let r_scaled = scale_rate(params.daily_rate_pct)?;
    if r_scaled.is_zero() {
        // Rate too small to register at 8 decimal places.
        return linear(principal, periods);
    }

    let p_scaled = round_to_integer(
        principal
            .checked_mul(Decimal::from(PRINCIPAL_SCALE))
            .ok_or_else(|| unscalable("principal", principal))?,
        "principal",
    )?;

    let scale = BigInt::from(RATE_SCALE);
    let exponent = u32::try_from(periods).map_err(|_| ProjectionError::TooManyPeriods {
        periods,
        max: MAX_PERIODS,
    })?;

    let num_pow = (&scale + &r_scaled).pow(exponent);
    let den_pow = scale.pow(exponent);

    let numerator = p_scaled * (num_pow - &den_pow) * &scale;
    let denominator = BigInt::from(PRINCIPAL_SCALE) * den_pow * r_scaled;
    if denominator.is_zero() {
        return Err(ProjectionError::DivisionByZero);
    }

    Ok(ProjectedValue {
        amount: numerator / denominator,
        periods,
        compounded: true,
    })
}

fn linear(principal: Decimal, periods: u64) -> Result<ProjectedValue, ProjectionError> {
    let whole = round_to_integer(principal, "principal")?;
    Ok(ProjectedValue {
        amount: whole * BigInt::from(periods),
        periods,
        compounded: false,
    })
}

/// `round(pct * RATE_SCALE / 100)`
fn scale_rate(pct: Decimal) -> Result<BigInt, ProjectionError> {
    let factor = Decimal::from(RATE_SCALE / 100);
    let scaled = pct
        .checked_mul(factor)
        .ok_or_else(|| unscalable("daily rate", pct))?;
    round_to_integer(scaled, "daily rate")
}

fn round_to_integer(value: Decimal, field: &'static str) -> Result<BigInt, ProjectionError> {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i128()
        .map(BigInt::from)
        .ok_or_else(|| unscalable(field, value))
}

fn unscalable(field: &'static str, value: Decimal) -> ProjectionError {
    ProjectionError::Unscalable {
        field,
        value: value.to_string(),
    }
}
