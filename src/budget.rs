//! Budget

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::items::minor_units_from_major;

/// Errors raised while constructing a budget.
#[derive(Debug, Error, PartialEq)]
pub enum BudgetError {
    /// Budgets cannot be negative.
    #[error("budget cannot be negative: {0} minor units")]
    Negative(i64),

    /// Amount does not fit in whole minor units.
    #[error("budget cannot be represented in minor units: {0}")]
    NotRepresentable(Decimal),
}

/// Maximum total spend for one solve, in minor currency units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Budget {
    minor_units: usize,
}

impl Budget {
    /// A budget that admits nothing
    pub const ZERO: Self = Self { minor_units: 0 };

    /// Create a budget from minor units.
    ///
    /// # Errors
    ///
    /// - [`BudgetError::Negative`]: `minor_units` is below zero.
    /// - [`BudgetError::NotRepresentable`]: `minor_units` does not fit a table index.
    pub fn from_minor(minor_units: i64) -> Result<Self, BudgetError> {
        if minor_units < 0 {
            return Err(BudgetError::Negative(minor_units));
        }

        let minor_units = usize::try_from(minor_units)
            .map_err(|_err| BudgetError::NotRepresentable(Decimal::from(minor_units)))?;

        Ok(Self { minor_units })
    }

    /// Create a budget from an amount in major units (e.g. `500` for €500.00).
    ///
    /// # Errors
    ///
    /// Returns a [`BudgetError`] if the amount is negative or cannot be expressed in minor units.
    pub fn from_major(amount: Decimal) -> Result<Self, BudgetError> {
        let minor_units =
            minor_units_from_major(amount).ok_or(BudgetError::NotRepresentable(amount))?;

        Self::from_minor(minor_units)
    }

    /// Create a budget from a money amount.
    ///
    /// # Errors
    ///
    /// Returns a [`BudgetError`] if the amount is negative.
    pub fn from_money(money: &Money<'_, Currency>) -> Result<Self, BudgetError> {
        Self::from_minor(money.to_minor_units())
    }

    /// Budget in minor units
    pub const fn minor_units(self) -> usize {
        self.minor_units
    }

    /// Budget as money in the given currency
    pub fn to_money<'a>(self, currency: &'a Currency) -> Money<'a, Currency> {
        let minor_units = i64::try_from(self.minor_units).unwrap_or(i64::MAX);

        Money::from_minor(minor_units, currency)
    }

    /// Whether a total spend of `minor_units` stays within this budget.
    pub fn admits(self, minor_units: i64) -> bool {
        usize::try_from(minor_units).is_ok_and(|spend| spend <= self.minor_units)
    }
}
