//! Items

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

/// Decimal places of the minor unit every amount is scaled to.
pub const CURRENCY_EXPONENT: u32 = 2;

/// Minor currency units in one major unit (cents per euro, pence per pound).
pub const MINOR_UNITS_PER_MAJOR: Decimal = Decimal::ONE_HUNDRED;

/// Errors raised while constructing an item.
#[derive(Debug, Error, PartialEq)]
pub enum ItemError {
    /// Items must cost at least one minor unit.
    #[error("item {name:?} has a non-positive cost of {minor_units} minor units")]
    NonPositiveCost {
        /// Item name
        name: String,
        /// Offending cost in minor units
        minor_units: i64,
    },

    /// Profit could not be derived without overflowing.
    #[error("profit for item {name:?} cannot be represented")]
    ProfitOverflow {
        /// Item name
        name: String,
    },
}

/// A candidate investment, normalised to minor currency units.
///
/// The absolute profit is derived once, at construction, from the cost and the profit rate.
#[derive(Clone, Debug, PartialEq)]
pub struct Item<'a> {
    name: String,
    cost: Money<'a, Currency>,
    rate: Percentage,
    profit: Decimal,
}

impl<'a> Item<'a> {
    /// Creates a new item from its cost and profit rate.
    ///
    /// # Errors
    ///
    /// - [`ItemError::NonPositiveCost`]: the cost is zero or negative.
    /// - [`ItemError::ProfitOverflow`]: the derived profit does not fit in a [`Decimal`].
    pub fn new(
        name: impl Into<String>,
        cost: Money<'a, Currency>,
        rate: Percentage,
    ) -> Result<Self, ItemError> {
        let name = name.into();
        let minor_units = cost.to_minor_units();

        if minor_units <= 0 {
            return Err(ItemError::NonPositiveCost { name, minor_units });
        }

        let Some(profit) = profit_of(rate, minor_units) else {
            return Err(ItemError::ProfitOverflow { name });
        };

        Ok(Self {
            name,
            cost,
            rate,
            profit,
        })
    }

    /// Returns the display name of the item
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the cost of the item
    pub fn cost(&self) -> &Money<'a, Currency> {
        &self.cost
    }

    /// Returns the cost of the item in minor units
    pub fn cost_minor(&self) -> i64 {
        self.cost.to_minor_units()
    }

    /// Returns the profit rate as a fraction (`0.05` for 5%)
    pub fn rate(&self) -> Percentage {
        self.rate
    }

    /// Returns the profit rate in percent points (`5` for 5%)
    pub fn rate_points(&self) -> Decimal {
        (self.rate * Decimal::ONE) * Decimal::ONE_HUNDRED
    }

    /// Returns the absolute profit in minor units
    pub fn profit(&self) -> Decimal {
        self.profit
    }
}

/// Absolute profit, in minor units, earned by spending `minor_units` at `rate`.
pub fn profit_of(rate: Percentage, minor_units: i64) -> Option<Decimal> {
    (rate * Decimal::ONE).checked_mul(Decimal::from(minor_units))
}

/// Converts a major-unit amount to whole minor units, rounding half away from zero.
pub fn minor_units_from_major(amount: Decimal) -> Option<i64> {
    amount
        .checked_mul(MINOR_UNITS_PER_MAJOR)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
}

/// Converts a minor-unit amount to major units for display, rounded to two places.
pub fn major_units_from_minor(amount: Decimal) -> Decimal {
    (amount / MINOR_UNITS_PER_MAJOR).round_dp(2)
}

/// Returns the total cost of a list of items in minor units
pub fn total_cost(items: &[Item<'_>]) -> i64 {
    items.iter().map(Item::cost_minor).sum()
}

/// Returns the total pre-derived profit of a list of items in minor units
pub fn total_profit(items: &[Item<'_>]) -> Decimal {
    items.iter().map(Item::profit).sum()
}
