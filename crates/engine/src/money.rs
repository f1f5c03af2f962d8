use std::fmt;

use crate::{EngineError, ResultEngine};

/// Money amount represented as **integer cents** (minor units).
///
/// Every monetary value the engine handles (transaction amounts, budget
/// ceilings and spend, goal targets) goes through this type so sums never
/// drift the way floating point would.
///
/// # Examples
///
/// ```rust
/// use engine::MoneyCents;
///
/// let amount = MoneyCents::new(12_34);
/// assert_eq!(amount.cents(), 1234);
/// assert_eq!(amount.to_string(), "12.34");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct MoneyCents(i64);

impl MoneyCents {
    pub const ZERO: MoneyCents = MoneyCents(0);

    /// Creates a new amount from integer cents.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: MoneyCents) -> Option<MoneyCents> {
        self.0.checked_add(rhs.0).map(MoneyCents)
    }

    /// Checked subtraction (returns `None` on overflow).
    #[must_use]
    pub fn checked_sub(self, rhs: MoneyCents) -> Option<MoneyCents> {
        self.0.checked_sub(rhs.0).map(MoneyCents)
    }

    /// Returns `true` when `self / whole >= numerator / denominator`.
    ///
    /// The comparison is done by cross multiplication in `i128`, so the
    /// boundary itself is exact. `whole` must be positive.
    #[must_use]
    pub fn reaches_fraction_of(self, whole: MoneyCents, numerator: i64, denominator: i64) -> bool {
        i128::from(self.0) * i128::from(denominator) >= i128::from(whole.0) * i128::from(numerator)
    }

    /// Percentage of `self` over `total`, rounded to one decimal.
    ///
    /// Returns `0.0` when `total` is zero.
    #[must_use]
    pub fn percentage_of(self, total: MoneyCents) -> f64 {
        if total.is_zero() {
            return 0.0;
        }
        let raw = self.0 as f64 * 100.0 / total.0 as f64;
        (raw * 10.0).round() / 10.0
    }
}

impl fmt::Display for MoneyCents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let units = abs / 100;
        let cents = abs % 100;
        write!(f, "{sign}{units}.{cents:02}")
    }
}

impl From<i64> for MoneyCents {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<MoneyCents> for i64 {
    fn from(value: MoneyCents) -> Self {
        value.0
    }
}

/// `lhs + rhs`, with overflow reported as [`EngineError::InvalidAmount`].
pub(crate) fn add(lhs: MoneyCents, rhs: MoneyCents) -> ResultEngine<MoneyCents> {
    lhs.checked_add(rhs)
        .ok_or_else(|| EngineError::InvalidAmount(format!("{lhs} + {rhs} overflows")))
}

/// `lhs - rhs`, with overflow reported as [`EngineError::InvalidAmount`].
pub(crate) fn sub(lhs: MoneyCents, rhs: MoneyCents) -> ResultEngine<MoneyCents> {
    lhs.checked_sub(rhs)
        .ok_or_else(|| EngineError::InvalidAmount(format!("{lhs} - {rhs} overflows")))
}

pub(crate) fn sum<I>(amounts: I) -> ResultEngine<MoneyCents>
where
    I: IntoIterator<Item = MoneyCents>,
{
    amounts.into_iter().try_fold(MoneyCents::ZERO, add)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_two_decimals() {
        assert_eq!(MoneyCents::new(0).to_string(), "0.00");
        assert_eq!(MoneyCents::new(1).to_string(), "0.01");
        assert_eq!(MoneyCents::new(10).to_string(), "0.10");
        assert_eq!(MoneyCents::new(1050).to_string(), "10.50");
        assert_eq!(MoneyCents::new(-1050).to_string(), "-10.50");
    }

    #[test]
    fn fraction_boundary_is_exact() {
        let whole = MoneyCents::new(100_000);
        assert!(!MoneyCents::new(79_999).reaches_fraction_of(whole, 8, 10));
        assert!(MoneyCents::new(80_000).reaches_fraction_of(whole, 8, 10));
        assert!(!MoneyCents::new(99_999).reaches_fraction_of(whole, 1, 1));
        assert!(MoneyCents::new(100_000).reaches_fraction_of(whole, 1, 1));
    }

    #[test]
    fn percentage_rounds_to_one_decimal() {
        let total = MoneyCents::new(170_000);
        assert_eq!(MoneyCents::new(125_000).percentage_of(total), 73.5);
        assert_eq!(MoneyCents::new(45_000).percentage_of(total), 26.5);
        assert_eq!(MoneyCents::new(1).percentage_of(MoneyCents::ZERO), 0.0);
    }

    #[test]
    fn sum_of_empty_is_zero() {
        assert_eq!(sum(Vec::new()).unwrap(), MoneyCents::ZERO);
    }

    #[test]
    fn overflow_is_an_error() {
        let half = MoneyCents::new(i64::MAX / 2 + 1);
        assert!(half.checked_add(half).is_none());
        assert!(matches!(add(half, half), Err(EngineError::InvalidAmount(_))));
        assert!(matches!(
            sub(MoneyCents::new(i64::MIN), MoneyCents::new(1)),
            Err(EngineError::InvalidAmount(_))
        ));
        assert!(matches!(sum([half, half]), Err(EngineError::InvalidAmount(_))));
        assert_eq!(sum([half, MoneyCents::new(-1)]).unwrap().cents(), i64::MAX / 2);
    }
}
