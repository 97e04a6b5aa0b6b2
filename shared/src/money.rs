//! Money arithmetic on integer minor units
//!
//! All monetary values are an `i64` amount of minor units (cents) tagged with
//! a [`Currency`]. No currency math ever touches floating point. Rounding
//! happens in exactly one place: [`Money::percent_of`], which rounds half
//! away from zero on the minor unit. Every other operation is exact or fails.

use crate::error::{PosError, PosResult};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Currency code
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Currency {
    #[default]
    Brl,
    Usd,
    Eur,
}

impl Currency {
    /// ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Self::Brl => "BRL",
            Self::Usd => "USD",
            Self::Eur => "EUR",
        }
    }

    /// Display symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Brl => "R$",
            Self::Usd => "$",
            Self::Eur => "€",
        }
    }

    /// Minor units per major unit (all supported currencies use 2 decimals)
    pub fn minor_per_major(&self) -> i64 {
        100
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A fixed-precision monetary amount in minor units
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Money {
    /// Amount in minor units (e.g. cents). Negative values are legal and
    /// represent change due or shortfall depending on context.
    amount: i64,
    currency: Currency,
}

impl Money {
    pub fn new(amount: i64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    pub fn zero(currency: Currency) -> Self {
        Self {
            amount: 0,
            currency,
        }
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    fn require_same_currency(&self, other: &Money) -> PosResult<()> {
        if self.currency != other.currency {
            return Err(PosError::CurrencyMismatch {
                left: self.currency,
                right: other.currency,
            });
        }
        Ok(())
    }

    /// Checked addition; fails on currency mismatch or overflow
    pub fn add(&self, other: Money) -> PosResult<Money> {
        self.require_same_currency(&other)?;
        let amount = self
            .amount
            .checked_add(other.amount)
            .ok_or(PosError::AmountOverflow)?;
        Ok(Money::new(amount, self.currency))
    }

    /// Checked subtraction; the result may be negative
    pub fn sub(&self, other: Money) -> PosResult<Money> {
        self.require_same_currency(&other)?;
        let amount = self
            .amount
            .checked_sub(other.amount)
            .ok_or(PosError::AmountOverflow)?;
        Ok(Money::new(amount, self.currency))
    }

    /// Checked multiplication by an integer factor (e.g. quantity)
    pub fn scale(&self, factor: i64) -> PosResult<Money> {
        let amount = self
            .amount
            .checked_mul(factor)
            .ok_or(PosError::AmountOverflow)?;
        Ok(Money::new(amount, self.currency))
    }

    /// Percentage in basis points (10000 bps = 100%), rounded half away from
    /// zero on the minor unit.
    ///
    /// This is the single rounding point in the system. No other component
    /// performs its own rounding.
    pub fn percent_of(&self, bps: i64) -> PosResult<Money> {
        let numerator = (self.amount as i128) * (bps as i128);
        let rounded = (numerator.abs() + 5_000) / 10_000;
        let signed = if numerator < 0 { -rounded } else { rounded };
        let amount = i64::try_from(signed).map_err(|_| PosError::AmountOverflow)?;
        Ok(Money::new(amount, self.currency))
    }

    /// Compare two amounts of the same currency
    pub fn compare(&self, other: Money) -> PosResult<Ordering> {
        self.require_same_currency(&other)?;
        Ok(self.amount.cmp(&other.amount))
    }

    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    pub fn is_negative(&self) -> bool {
        self.amount < 0
    }

    pub fn is_positive(&self) -> bool {
        self.amount > 0
    }

    /// Clamp negatives to zero, keeping the currency
    pub fn max_zero(&self) -> Money {
        Money::new(self.amount.max(0), self.currency)
    }

    /// The smaller of two same-currency amounts
    pub fn min(&self, other: Money) -> PosResult<Money> {
        self.require_same_currency(&other)?;
        Ok(Money::new(self.amount.min(other.amount), self.currency))
    }

    /// Format for display, e.g. `R$ 20.00`
    pub fn format(&self) -> String {
        let per_major = self.currency.minor_per_major();
        let sign = if self.amount < 0 { "-" } else { "" };
        let abs = self.amount.unsigned_abs() as i64;
        format!(
            "{} {}{}.{:02}",
            self.currency.symbol(),
            sign,
            abs / per_major,
            abs % per_major
        )
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format())
    }
}
