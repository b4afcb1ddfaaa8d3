use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};

/// An exact currency amount stored as whole cents.
///
/// The backend sends amounts as JSON floating-point numbers. They are rounded
/// to the nearest cent once on decode, so sums never accumulate drift.
/// Decoded amounts lie in `0..=Money::MAX`; arithmetic saturates instead of
/// overflowing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Money {
    cents: i64,
}

impl Money {
    pub const ZERO: Money = Money { cents: 0 };

    /// Largest amount accepted on decode, about $92 billion. A million of
    /// these still fit in an `i64` of cents.
    pub const MAX: Money = Money {
        cents: i64::MAX / 1_000_000,
    };

    pub const fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    /// Whole currency units, e.g. `Money::from_units(12)` is $12.00.
    pub const fn from_units(units: i64) -> Self {
        Self {
            cents: units.saturating_mul(100),
        }
    }

    pub const fn cents(self) -> i64 {
        self.cents
    }

    pub fn as_f64(self) -> f64 {
        self.cents as f64 / 100.0
    }

    pub fn is_zero(self) -> bool {
        self.cents == 0
    }
}

impl TryFrom<f64> for Money {
    type Error = String;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() {
            return Err(format!("amount must be a finite number, got {value}"));
        }
        if value < 0.0 {
            return Err(format!("amount must not be negative, got {value}"));
        }
        let cents = (value * 100.0).round();
        if cents > Money::MAX.cents as f64 {
            return Err(format!("amount {value} exceeds the maximum of {}", Money::MAX));
        }
        Ok(Self {
            cents: cents as i64,
        })
    }
}

impl From<Money> for f64 {
    fn from(m: Money) -> Self {
        m.as_f64()
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money {
            cents: self.cents.saturating_add(rhs.cents),
        }
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        *self = *self + rhs;
    }
}

impl Mul<u32> for Money {
    type Output = Money;

    fn mul(self, rhs: u32) -> Money {
        Money {
            cents: self.cents.saturating_mul(i64::from(rhs)),
        }
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

/// Renders as dollars with thousands separators: `$1,234.56`, or `-$0.05`
/// for a negative amount.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.cents < 0 { "-" } else { "" };
        let abs = self.cents.unsigned_abs();
        let units = abs / 100;
        let cents = abs % 100;

        let digits = units.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        write!(f, "{sign}${grouped}.{cents:02}")
    }
}
