//! Decimal amounts for prices and totals.

use std::fmt;
use std::str::FromStr;

use crate::error::PrintError;

/// A decimal amount stored as hundredths.
///
/// Parsing accepts an optional sign, digits, and at most two fractional
/// digits (`"5"`, `"5.5"`, `"-0.25"`). Display always renders exactly two
/// fractional digits, which is the form that reaches the printer.
///
/// ```
/// use tillprint::receipt::Money;
///
/// let price: Money = "5.5".parse()?;
/// assert_eq!(price.to_string(), "5.50");
/// # Ok::<(), tillprint::PrintError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money {
    cents: i64,
}

impl Money {
    pub const ZERO: Money = Money { cents: 0 };
}

impl FromStr for Money {
    type Err = PrintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PrintError::encoding(format!("'{}' is not a decimal amount", s));

        let trimmed = s.trim();
        let (negative, unsigned) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, &trimmed[1..]),
            Some(b'+') => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };

        let (whole, frac) = match unsigned.split_once('.') {
            Some((w, f)) => (w, f),
            None => (unsigned, ""),
        };
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if whole.is_empty() && frac.is_empty() {
            return Err(invalid());
        }
        if !all_digits(whole) || !all_digits(frac) {
            return Err(invalid());
        }
        if frac.len() > 2 {
            return Err(PrintError::encoding(format!(
                "'{}' has more than two fractional digits",
                s
            )));
        }

        let whole_value: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };
        let frac_value: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => frac.parse().map_err(|_| invalid())?,
        };

        let cents = whole_value
            .checked_mul(100)
            .and_then(|c| c.checked_add(frac_value))
            .ok_or_else(invalid)?;
        Ok(Money {
            cents: if negative { -cents } else { cents },
        })
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.cents < 0 { "-" } else { "" };
        let abs = self.cents.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}
