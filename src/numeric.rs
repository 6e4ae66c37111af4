//! Rounding and clamping helpers shared by every stage of the simulation
//!
//! Monetary amounts are carried as [`Money`], a decimal rounded to the cent on
//! construction. Percentages and durations coming from user input go through
//! [`clamp_pct`] and [`clamp_int`] before any arithmetic touches them.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Lowest accepted percentage input
pub const PCT_MIN: f64 = -100.0;

/// Highest accepted percentage input
pub const PCT_MAX: f64 = 1000.0;

/// Ratios whose denominator is below this are reported as zero
pub const DIVISION_EPSILON: f64 = 1e-12;

/// Monetary amount rounded half away from zero to two decimals
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// Round a float to the cent. Non-finite or out-of-range values become zero.
    pub fn from_f64(value: f64) -> Self {
        if !value.is_finite() {
            return Self::ZERO;
        }
        Decimal::from_f64_retain(value)
            .map(Self::from_decimal)
            .unwrap_or(Self::ZERO)
    }

    pub fn from_decimal(value: Decimal) -> Self {
        Self(value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
    }

    pub fn to_f64(self) -> f64 {
        self.0.to_f64().unwrap_or(0.0)
    }

    pub fn as_decimal(self) -> Decimal {
        self.0
    }

    /// Multiply by a float factor and round back to the cent
    pub fn scale(self, factor: f64) -> Self {
        Self::from_f64(self.to_f64() * factor)
    }

    /// `pct` percent of this amount
    pub fn percent(self, pct: f64) -> Self {
        self.scale(pct / 100.0)
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn is_negative(self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Clamp negative amounts to zero
    pub fn floor_zero(self) -> Self {
        self.max(Self::ZERO)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&format!("{:.2}", self.0))
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Self::from_decimal(value)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0.saturating_sub(rhs.0))
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money(-self.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        *self = *self + rhs;
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        *self = *self - rhs;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}

// Serialized as a plain JSON number; reading re-rounds to the cent so a
// write/read cycle reproduces the same value.
impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_f64())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        f64::deserialize(deserializer).map(Money::from_f64)
    }
}

/// Round a float to the cent (non-finite → 0)
pub fn money(value: f64) -> Money {
    Money::from_f64(value)
}

/// Round a ratio or percentage to two decimals (non-finite → 0)
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    (value * 100.0).round() / 100.0
}

/// Clamp a percentage input to `[PCT_MIN, PCT_MAX]` (non-finite → 0)
pub fn clamp_pct(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    value.clamp(PCT_MIN, PCT_MAX)
}

/// Floor then clamp an integral input to `[lo, hi]` (non-finite → lo)
pub fn clamp_int(value: f64, lo: u32, hi: u32) -> u32 {
    if !value.is_finite() {
        return lo;
    }
    value.floor().clamp(lo as f64, hi as f64) as u32
}

/// Non-negative finite float, zero otherwise
pub fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// `numerator / denominator × 100`, or zero for a vanishing denominator
pub fn percent_of(numerator: Money, denominator: Money) -> f64 {
    ratio(numerator, denominator) * 100.0
}

/// `numerator / denominator`, or zero for a vanishing denominator
pub fn ratio(numerator: Money, denominator: Money) -> f64 {
    let denominator = denominator.to_f64();
    if denominator.abs() < DIVISION_EPSILON {
        return 0.0;
    }
    let value = numerator.to_f64() / denominator;
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Serde adapter for year counts that may be unbounded: infinity is written
/// as `null` and `null` reads back as infinity.
pub mod unbounded_years {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_some(value)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
    }
}
