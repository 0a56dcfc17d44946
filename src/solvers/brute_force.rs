//! Brute-Force Solver
//!
//! Scores every subset produced by the combination enumerator and keeps the first one with a
//! strictly greater profit. Exponential in the number of items; used as an oracle for the exact
//! solvers on small catalogs.

use rust_decimal::Decimal;
use smallvec::SmallVec;
use tracing::debug;

use crate::{
    budget::Budget,
    combinations::{EnumerationStrategy, Subset, Subsets, subset_count},
    items::{Item, profit_of},
    solvers::{Solver, SolverError, SolverResult},
};

/// Default upper bound on the number of items enumerated exhaustively.
pub const DEFAULT_ITEM_LIMIT: usize = 20;

/// Solver that enumerates every subset of the items
#[derive(Debug, Clone, Copy)]
pub struct BruteForceSolver {
    strategy: EnumerationStrategy,
    item_limit: usize,
}

impl Default for BruteForceSolver {
    fn default() -> Self {
        Self {
            strategy: EnumerationStrategy::default(),
            item_limit: DEFAULT_ITEM_LIMIT,
        }
    }
}

impl BruteForceSolver {
    /// Create a solver with the default strategy and item limit
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the given enumeration strategy
    #[must_use]
    pub const fn with_strategy(mut self, strategy: EnumerationStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Refuse catalogs with more than `item_limit` items
    #[must_use]
    pub const fn with_item_limit(mut self, item_limit: usize) -> Self {
        self.item_limit = item_limit;
        self
    }

    /// Configured enumeration strategy
    pub const fn strategy(&self) -> EnumerationStrategy {
        self.strategy
    }

    /// Configured item limit
    pub const fn item_limit(&self) -> usize {
        self.item_limit
    }
}

/// Cost and profit of a subset, or `None` if it does not fit the budget.
///
/// Profits are recomputed from each item's cost and rate rather than read back from the item.
fn score(
    items: &[Item<'_>],
    subset: &Subset,
    budget: Budget,
) -> Result<Option<Decimal>, SolverError> {
    let mut spend: i64 = 0;
    let mut profit = Decimal::ZERO;

    for &idx in subset {
        let item = items.get(idx).ok_or(SolverError::InvariantViolation {
            message: "subset position outside the item list",
        })?;

        let minor_units = item.cost_minor();

        spend = spend
            .checked_add(minor_units)
            .ok_or(SolverError::CostNotRepresentable { minor_units })?;

        let earned = profit_of(item.rate(), minor_units)
            .ok_or(SolverError::ProfitNotRepresentable { item: idx })?;

        profit = profit
            .checked_add(earned)
            .ok_or(SolverError::ProfitNotRepresentable { item: idx })?;
    }

    Ok(budget.admits(spend).then_some(profit))
}

impl Solver for BruteForceSolver {
    fn name(&self) -> &'static str {
        "brute-force"
    }

    fn solve<'a>(
        &self,
        items: &[Item<'a>],
        budget: Budget,
    ) -> Result<SolverResult<'a>, SolverError> {
        if items.len() > self.item_limit || subset_count(items.len()).is_none() {
            return Err(SolverError::TooManyItems {
                items: items.len(),
                limit: self.item_limit,
            });
        }

        debug!(
            items = items.len(),
            strategy = ?self.strategy,
            "enumerating subsets"
        );

        let mut best: Option<(Decimal, Subset)> = None;
        let mut feasible: usize = 0;

        for subset in Subsets::new(items.len(), self.strategy) {
            let Some(profit) = score(items, &subset, budget)? else {
                continue;
            };

            feasible += 1;

            if best
                .as_ref()
                .is_none_or(|(best_profit, _)| profit > *best_profit)
            {
                best = Some((profit, subset));
            }
        }

        debug!(feasible, "subsets enumerated");

        // The empty subset is always feasible, so `best` is only empty for an empty enumeration.
        let Some((max_profit, subset)) = best else {
            return Ok(SolverResult::empty());
        };

        let selected_indices: SmallVec<[usize; 10]> = subset.into_iter().collect();

        SolverResult::from_indices(items, selected_indices, max_profit)
    }
}

#[cfg(test)]
mod tests {
    use decimal_percentage::Percentage;
    use rusty_money::{Money, iso::EUR};
    use testresult::TestResult;

    use super::*;

    fn item<'a>(name: &str, cost: i64, rate_points: i64) -> TestResult<Item<'a>> {
        Ok(Item::new(
            name,
            Money::from_minor(cost, EUR),
            Percentage::from(Decimal::new(rate_points, 2)),
        )?)
    }

    fn tie_items<'a>() -> TestResult<Vec<Item<'a>>> {
        Ok(vec![
            item("A", 20_000, 10)?,
            item("B", 30_000, 15)?,
            item("C", 10_000, 20)?,
        ])
    }

    #[test]
    fn first_seen_optimum_wins_ties() -> TestResult {
        let items = tie_items()?;
        let result = BruteForceSolver::new().solve_minor(&items, 50_000)?;

        // [0, 1] is generated before [1, 2]; both earn 65.00.
        assert_eq!(result.max_profit, Decimal::from(6_500));
        assert_eq!(result.selected_indices.as_slice(), &[0, 1]);

        Ok(())
    }

    #[test]
    fn strategies_agree_on_profit() -> TestResult {
        let items = vec![
            item("A", 2_000, 5)?,
            item("B", 3_000, 10)?,
            item("C", 5_000, 15)?,
            item("D", 7_000, 20)?,
            item("E", 6_000, 17)?,
        ];

        let doubling = BruteForceSolver::new().solve_minor(&items, 12_000)?;
        let size_indexed = BruteForceSolver::new()
            .with_strategy(EnumerationStrategy::SizeIndexed)
            .solve_minor(&items, 12_000)?;

        assert_eq!(doubling.max_profit, size_indexed.max_profit);
        assert!(doubling.total_cost_minor() <= 12_000);
        assert!(size_indexed.total_cost_minor() <= 12_000);

        Ok(())
    }

    #[test]
    fn nothing_affordable_yields_empty_selection() -> TestResult {
        let items = tie_items()?;
        let result = BruteForceSolver::new().solve_minor(&items, 9_999)?;

        assert!(result.is_empty());
        assert_eq!(result.max_profit, Decimal::ZERO);

        Ok(())
    }

    #[test]
    fn empty_catalog_yields_empty_selection() -> TestResult {
        let result = BruteForceSolver::new().solve(&[], Budget::from_minor(100)?)?;

        assert!(result.is_empty());

        Ok(())
    }

    #[test]
    fn item_limit_is_enforced() -> TestResult {
        let items = tie_items()?;
        let result = BruteForceSolver::new()
            .with_item_limit(2)
            .solve_minor(&items, 50_000);

        assert!(matches!(
            result,
            Err(SolverError::TooManyItems { items: 3, limit: 2 })
        ));

        Ok(())
    }

    #[test]
    fn default_limit_refuses_more_than_twenty_items() -> TestResult {
        let mut items = Vec::new();

        for idx in 0..21 {
            items.push(item(&format!("Action-{idx}"), 100, 5)?);
        }

        let result = BruteForceSolver::new().solve_minor(&items, 1_000);

        assert!(matches!(
            result,
            Err(SolverError::TooManyItems {
                items: 21,
                limit: 20,
            })
        ));

        Ok(())
    }

    #[test]
    fn negative_budget_is_rejected() -> TestResult {
        let items = tie_items()?;
        let result = BruteForceSolver::new().solve_minor(&items, -10);

        assert!(matches!(result, Err(SolverError::InvalidBudget(_))));

        Ok(())
    }
}
