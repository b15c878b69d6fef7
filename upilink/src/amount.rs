//! Rupee amounts and the configured UPI limit regime.
//!
//! Amounts are denominated in rupees (the major unit) and carried as exact
//! decimals; paise precision appears only when formatting into a link. The
//! limit regime is an explicit [`UpiLimits`] value passed to validation and
//! generation rather than a hidden global, so callers can test against
//! different regimes. [`UpiLimits::default`] carries NPCI's published
//! per-transaction bounds.
//!
//! # Serialization
//!
//! [`Amount`] serializes as a two-decimal string to match the wire form used
//! inside payment links:
//!
//! ```json
//! "250.00"
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::fmt;
use std::str::FromStr;

/// A rupee amount, exact to arbitrary decimal precision.
///
/// Construction is unchecked; range checks live in [`UpiLimits::validate`]
/// so the same amount can be judged against different regimes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(Decimal);

impl Amount {
    /// Wraps a raw decimal rupee value.
    #[must_use]
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Converts a float rupee value, rejecting NaN and infinities.
    ///
    /// # Errors
    ///
    /// Returns [`AmountError::NotFinite`] for non-finite input.
    pub fn from_f64(value: f64) -> Result<Self, AmountError> {
        Decimal::from_f64_retain(value)
            .map(Self)
            .ok_or(AmountError::NotFinite)
    }

    /// Returns the raw decimal rupee value.
    #[must_use]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    /// Returns the amount rounded to paise (two decimal places), half away
    /// from zero.
    #[must_use]
    pub fn to_paise_precision(&self) -> Decimal {
        let mut rounded = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(2);
        rounded
    }

    /// Renders the amount in Indian convention: `₹` prefix and lakh/crore
    /// digit grouping, e.g. `₹1,00,000` or `₹83,333.34`.
    ///
    /// Whole-rupee amounts omit the paise; fractional amounts show exactly
    /// two decimal places.
    #[must_use]
    pub fn format_inr(&self) -> String {
        let rounded = self.to_paise_precision();
        let text = rounded.abs().to_string();
        let (int_digits, paise) = text.split_once('.').unwrap_or((text.as_str(), "00"));
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        let grouped = group_indian(int_digits);
        if paise == "00" {
            format!("{sign}₹{grouped}")
        } else {
            format!("{sign}₹{grouped}.{paise}")
        }
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Self(Decimal::from(value))
    }
}

impl fmt::Display for Amount {
    /// Formats with exactly two decimal places, the form used in links.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_paise_precision())
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim())
            .map(Self)
            .map_err(|_| AmountError::Unparseable(s.into()))
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(de::Error::custom)
    }
}

/// Groups an unsigned digit string Indian-style: last three digits, then
/// pairs (`1234567` becomes `12,34,567`).
fn group_indian(int_digits: &str) -> String {
    if int_digits.len() <= 3 {
        return int_digits.to_owned();
    }
    let (head, tail) = int_digits.split_at(int_digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 2 {
        groups.push(&head[end - 2..end]);
        end -= 2;
    }
    groups.push(&head[..end]);
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

/// Why an amount was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum AmountError {
    /// The input was NaN or infinite.
    #[error("Amount must be a valid number")]
    NotFinite,

    /// The input string did not parse as a decimal number.
    #[error("Amount {0:?} is not a valid number")]
    Unparseable(String),

    /// The amount is below the configured floor.
    #[error("Minimum amount is {}", .min.format_inr())]
    BelowMinimum {
        /// The configured floor.
        min: Amount,
    },

    /// The amount exceeds the configured per-transaction ceiling.
    #[error("Maximum amount is {}", .max.format_inr())]
    AboveMaximum {
        /// The configured ceiling.
        max: Amount,
        /// The largest per-installment amount that divides the request into
        /// whole installments within the ceiling; always within bounds.
        suggested: Amount,
    },
}

/// The UPI limit regime amounts are validated against.
///
/// Pass this into validation and generation explicitly; [`Default`] carries
/// NPCI's published bounds (₹1 floor, ₹1,00,000 per-transaction ceiling,
/// ₹10,00,000 daily aggregate).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpiLimits {
    /// Smallest payable amount.
    pub min_amount: Amount,

    /// Per-transaction ceiling.
    pub max_amount: Amount,

    /// Daily aggregate ceiling. Advisory only: enforcing it would require
    /// cumulative per-payer state this crate does not own, so it is exposed
    /// for callers that track their own totals and never checked here.
    pub daily_cap: Amount,
}

impl UpiLimits {
    /// Creates a limit regime from explicit bounds.
    #[must_use]
    pub const fn new(min_amount: Amount, max_amount: Amount, daily_cap: Amount) -> Self {
        Self {
            min_amount,
            max_amount,
            daily_cap,
        }
    }

    /// Checks an amount against this regime.
    ///
    /// # Errors
    ///
    /// Returns [`AmountError::BelowMinimum`] under the floor and
    /// [`AmountError::AboveMaximum`] over the ceiling; the latter always
    /// carries a suggested per-installment amount for a split flow.
    pub fn validate(&self, amount: Amount) -> Result<(), AmountError> {
        if amount < self.min_amount {
            return Err(AmountError::BelowMinimum {
                min: self.min_amount,
            });
        }
        if amount > self.max_amount {
            return Err(AmountError::AboveMaximum {
                max: self.max_amount,
                suggested: self.installment_amount(amount),
            });
        }
        Ok(())
    }

    /// Minimum number of equal installments, each within the ceiling, that
    /// cover the amount. Amounts already within the ceiling need one.
    #[must_use]
    pub fn installment_count(&self, amount: Amount) -> u32 {
        if amount <= self.max_amount {
            return 1;
        }
        (amount.value() / self.max_amount.value())
            .ceil()
            .to_u32()
            .unwrap_or(u32::MAX)
    }

    /// The equal per-installment amount for [`Self::installment_count`]
    /// installments, rounded up to paise so the schedule covers the total.
    #[must_use]
    pub fn installment_amount(&self, amount: Amount) -> Amount {
        let count = Decimal::from(self.installment_count(amount));
        Amount::new(
            (amount.value() / count)
                .round_dp_with_strategy(2, RoundingStrategy::ToPositiveInfinity),
        )
    }
}

impl Default for UpiLimits {
    fn default() -> Self {
        Self {
            min_amount: Amount::from(1_u64),
            max_amount: Amount::from(100_000_u64),
            daily_cap: Amount::from(1_000_000_u64),
        }
    }
}
