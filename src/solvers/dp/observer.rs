//! DP Observer

use rust_decimal::Decimal;

use crate::{budget::Budget, items::Item};

/// Observer trait for following a DP solve as the table is built.
///
/// Callbacks fire at row boundaries, never per cell, so observers can time, measure or plot a
/// solve without touching the inner loop. The solver stays the only implementation of the
/// recurrence; observers only record what happens.
pub trait DpObserver {
    /// Called once before any row is filled.
    ///
    /// # Parameters
    ///
    /// - `items`: Number of items being considered
    /// - `budget`: Budget for this solve
    /// - `cells`: Number of cells in the profit table
    fn on_solve_begin(&mut self, _items: usize, _budget: Budget, _cells: usize) {}

    /// Called after the profit table has been (re)allocated.
    ///
    /// # Parameters
    ///
    /// - `bytes`: Memory held by the table cells
    fn on_table_allocated(&mut self, _bytes: usize) {}

    /// Called after each row of the profit table is complete.
    ///
    /// # Parameters
    ///
    /// - `row`: 1-based row number (the number of items considered so far)
    /// - `item`: The item that row `row` added
    /// - `best_at_budget`: Best profit for this prefix at the full budget, in minor units
    fn on_row_complete(&mut self, row: usize, item: &Item<'_>, best_at_budget: Decimal);

    /// Called for each item recovered while backtracking, highest position first.
    fn on_item_selected(&mut self, _index: usize, _item: &Item<'_>) {}

    /// Called once the selection has been recovered.
    fn on_solve_end(&mut self, _max_profit: Decimal) {}
}

/// No-op observer for unobserved solves.
#[derive(Debug, Default)]
pub struct NoopObserver;

impl DpObserver for NoopObserver {
    fn on_row_complete(&mut self, _: usize, _: &Item<'_>, _: Decimal) {}
}
