use std::fmt;

use serde::{Deserialize, Serialize};

/// Money amount represented as **integer cents**.
///
/// Use this type for **all** monetary values in the engine (unit prices,
/// expense amounts, fees) to avoid floating-point drift when line totals are
/// summed again and again.
///
/// # Examples
///
/// ```rust
/// use engine::MoneyCents;
///
/// let price = MoneyCents::new(12_34);
/// assert_eq!(price.cents(), 1234);
/// assert_eq!(price.to_string(), "12.34");
/// assert_eq!(price.checked_times(3), Some(MoneyCents::new(37_02)));
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
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

    /// Returns `true` if the amount is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: MoneyCents) -> Option<MoneyCents> {
        self.0.checked_add(rhs.0).map(MoneyCents)
    }

    /// Unit price times a quantity (returns `None` on overflow).
    #[must_use]
    pub fn checked_times(self, quantity: i64) -> Option<MoneyCents> {
        self.0.checked_mul(quantity).map(MoneyCents)
    }
}

impl fmt::Display for MoneyCents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_major_units() {
        assert_eq!(MoneyCents::new(0).to_string(), "0.00");
        assert_eq!(MoneyCents::new(1).to_string(), "0.01");
        assert_eq!(MoneyCents::new(1050).to_string(), "10.50");
        assert_eq!(MoneyCents::new(-1050).to_string(), "-10.50");
    }

    #[test]
    fn checked_times_detects_overflow() {
        assert_eq!(MoneyCents::new(100).checked_times(0), Some(MoneyCents::ZERO));
        assert_eq!(MoneyCents::new(250).checked_times(4), Some(MoneyCents::new(1000)));
        assert_eq!(MoneyCents::new(i64::MAX).checked_times(2), None);
    }

    #[test]
    fn checked_add_detects_overflow() {
        let a = MoneyCents::new(300);
        assert_eq!(a.checked_add(MoneyCents::new(50)), Some(MoneyCents::new(350)));
        assert_eq!(MoneyCents::new(i64::MAX).checked_add(MoneyCents::new(1)), None);
    }
}
