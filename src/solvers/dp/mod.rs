//! Knapsack DP Solver
//!
//! Exact 0/1 knapsack by bottom-up tabulation. For item `i` (1-based) and spend level `b`:
//!
//! ```text
//! table[i][b] = max(table[i - 1][b], table[i - 1][b - cost_i] + profit_i)   if cost_i <= b
//! table[i][b] = table[i - 1][b]                                              otherwise
//! ```
//!
//! The selection is recovered by walking rows bottom-up at the full budget: whenever a row
//! differs from the row above, that row's item was taken. For tied optimal subsets this walk
//! order is the tie-break, so the same table always yields the same selection.
//!
//! Time and memory are `O(items x budget)`; budgets are in minor units.

use rust_decimal::Decimal;
use tracing::debug;

use crate::{
    budget::Budget,
    items::Item,
    solvers::{Solver, SolverError, SolverResult},
};

pub mod observer;
pub mod table;

pub use observer::{DpObserver, NoopObserver};
pub use table::ProfitTable;

/// Default upper bound on profit table cells (4 GB of `Decimal` cells).
pub const DEFAULT_CELL_LIMIT: usize = 250_000_000;

/// Per-solve working state: the profit table and cost buffer.
///
/// A context is owned by its caller and can be reused between solves; nothing is shared across
/// contexts. After a solve the table can be inspected until the next solve resets it.
#[derive(Debug, Default)]
pub struct SolveContext {
    table: ProfitTable,
    costs: Vec<usize>,
}

impl SolveContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Profit table from the last solve
    pub fn table(&self) -> &ProfitTable {
        &self.table
    }

    /// Best profit from the last solve, in minor units
    pub fn max_profit(&self) -> Decimal {
        self.table.max_profit()
    }

    /// Run one solve, reusing this context's buffers.
    ///
    /// # Errors
    ///
    /// - [`SolverError::CostNotRepresentable`]: an item cost is not a valid table index.
    /// - [`SolverError::TableTooLarge`]: the table would exceed `cell_limit` cells.
    pub fn solve<'a>(
        &mut self,
        items: &[Item<'a>],
        budget: Budget,
        cell_limit: usize,
        observer: &mut dyn DpObserver,
    ) -> Result<SolverResult<'a>, SolverError> {
        self.costs.clear();

        for item in items {
            let minor_units = item.cost_minor();

            let cost = usize::try_from(minor_units)
                .ok()
                .filter(|&cost| cost > 0)
                .ok_or(SolverError::CostNotRepresentable { minor_units })?;

            self.costs.push(cost);
        }

        self.table.reset(items.len(), budget.minor_units(), cell_limit)?;

        debug!(
            items = items.len(),
            budget = budget.minor_units(),
            cells = self.table.len(),
            "building profit table"
        );

        observer.on_solve_begin(items.len(), budget, self.table.len());
        observer.on_table_allocated(self.table.footprint_bytes());

        for (idx, (item, &cost)) in items.iter().zip(&self.costs).enumerate() {
            let row = idx + 1;
            let best_at_budget = self.table.fill_row(row, cost, item.profit())?;

            observer.on_row_complete(row, item, best_at_budget);
        }

        let selected_indices = self.table.backtrack(&self.costs)?;
        let max_profit = self.table.max_profit();

        let result = SolverResult::from_indices(items, selected_indices, max_profit)?;

        for (&idx, item) in result.selected_indices.iter().zip(&result.selected) {
            observer.on_item_selected(idx, item);
        }

        observer.on_solve_end(max_profit);

        debug!(
            %max_profit,
            selected = result.len(),
            spent = result.total_cost_minor(),
            "profit table solved"
        );

        Ok(result)
    }
}

/// Solver using dynamic programming over a profit table
#[derive(Debug, Clone, Copy)]
pub struct DpSolver {
    cell_limit: usize,
}

impl Default for DpSolver {
    fn default() -> Self {
        Self {
            cell_limit: DEFAULT_CELL_LIMIT,
        }
    }
}

impl DpSolver {
    /// Create a solver with the default cell limit
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a solver that refuses tables above `cell_limit` cells
    #[must_use]
    pub const fn with_cell_limit(cell_limit: usize) -> Self {
        Self { cell_limit }
    }

    /// Configured cell limit
    pub const fn cell_limit(self) -> usize {
        self.cell_limit
    }

    /// Solve with an observer following the table construction.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError`] if the solver encounters an error.
    ///
    /// # Example
    ///
    /// ```rust
    /// use satchel::prelude::*;
    /// use satchel::instrumentation::ProgressSeries;
    /// # use rusty_money::iso::EUR;
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// # let csv = "name,price,profit\nA,2,10\nB,3,15\n";
    /// # let catalog = Catalog::from_reader(csv.as_bytes(), EUR)?;
    ///
    /// let mut progress = ProgressSeries::default();
    /// let result = DpSolver::new().solve_with_observer(
    ///     catalog.items(),
    ///     Budget::from_major(5.into())?,
    ///     &mut progress,
    /// )?;
    ///
    /// assert_eq!(progress.points().len(), 2);
    /// # Ok(())
    /// # }
    /// ```
    pub fn solve_with_observer<'a>(
        &self,
        items: &[Item<'a>],
        budget: Budget,
        observer: &mut dyn DpObserver,
    ) -> Result<SolverResult<'a>, SolverError> {
        SolveContext::new().solve(items, budget, self.cell_limit, observer)
    }

    /// Solve using a caller-owned context, keeping the profit table available afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError`] if the solver encounters an error.
    pub fn solve_in<'a>(
        &self,
        context: &mut SolveContext,
        items: &[Item<'a>],
        budget: Budget,
        observer: &mut dyn DpObserver,
    ) -> Result<SolverResult<'a>, SolverError> {
        context.solve(items, budget, self.cell_limit, observer)
    }
}

impl Solver for DpSolver {
    fn name(&self) -> &'static str {
        "dp"
    }

    fn solve<'a>(
        &self,
        items: &[Item<'a>],
        budget: Budget,
    ) -> Result<SolverResult<'a>, SolverError> {
        let mut observer = NoopObserver;

        self.solve_with_observer(items, budget, &mut observer)
    }
}
