//! Instrumentation
//!
//! Observers for the DP solver. Each one records a single concern (wall time, table memory,
//! per-row progress) and several can be attached to one solve through [`CompositeObserver`].

use std::time::{Duration, Instant};

use humanize_duration::{Truncate, prelude::DurationExt};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    budget::Budget,
    items::{Item, major_units_from_minor},
    solvers::dp::DpObserver,
};

/// Records wall-clock time for a solve.
#[derive(Debug, Default)]
pub struct TimingObserver {
    started: Option<Instant>,
    table_built: Option<Duration>,
    elapsed: Option<Duration>,
}

impl TimingObserver {
    /// Time spent building the table, once every row is filled
    pub fn table_built(&self) -> Option<Duration> {
        self.table_built
    }

    /// Total solve time, once the solve has finished
    pub fn elapsed(&self) -> Option<Duration> {
        self.elapsed
    }

    /// Human-readable total solve time
    pub fn display(&self) -> Option<String> {
        self.elapsed.map(|elapsed| elapsed.human(Truncate::Nano).to_string())
    }
}

impl DpObserver for TimingObserver {
    fn on_solve_begin(&mut self, _items: usize, _budget: Budget, _cells: usize) {
        self.started = Some(Instant::now());
        self.table_built = None;
        self.elapsed = None;
    }

    fn on_row_complete(&mut self, _row: usize, _item: &Item<'_>, _best_at_budget: Decimal) {
        self.table_built = self.started.map(|started| started.elapsed());
    }

    fn on_solve_end(&mut self, _max_profit: Decimal) {
        self.elapsed = self.started.map(|started| started.elapsed());
    }
}

/// Records the memory held by the profit table.
#[derive(Debug, Default)]
pub struct MemoryObserver {
    cells: usize,
    table_bytes: usize,
    peak_bytes: usize,
}

impl MemoryObserver {
    /// Cells in the most recent table
    pub fn cells(&self) -> usize {
        self.cells
    }

    /// Bytes held by the most recent table
    pub fn table_bytes(&self) -> usize {
        self.table_bytes
    }

    /// Largest table seen by this observer, in bytes
    pub fn peak_bytes(&self) -> usize {
        self.peak_bytes
    }
}

impl DpObserver for MemoryObserver {
    fn on_solve_begin(&mut self, _items: usize, _budget: Budget, cells: usize) {
        self.cells = cells;
    }

    fn on_table_allocated(&mut self, bytes: usize) {
        self.table_bytes = bytes;
        self.peak_bytes = self.peak_bytes.max(bytes);
    }

    fn on_row_complete(&mut self, _: usize, _: &Item<'_>, _: Decimal) {}
}

/// One point of the progress series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressPoint {
    /// Items considered so far
    pub row: usize,

    /// Name of the item added by this row
    pub item: String,

    /// Best profit at the full budget with the items considered so far, in minor units
    pub best_at_budget: Decimal,
}

impl ProgressPoint {
    /// Best profit in major units
    pub fn best_at_budget_major(&self) -> Decimal {
        major_units_from_minor(self.best_at_budget)
    }
}

/// Collects the best profit after each row, the data a live plot would draw.
#[derive(Debug, Default)]
pub struct ProgressSeries {
    points: Vec<ProgressPoint>,
}

impl ProgressSeries {
    /// Points recorded for the most recent solve, in row order
    pub fn points(&self) -> &[ProgressPoint] {
        &self.points
    }

    /// Consume the series
    pub fn into_points(self) -> Vec<ProgressPoint> {
        self.points
    }
}

impl DpObserver for ProgressSeries {
    fn on_solve_begin(&mut self, items: usize, _budget: Budget, _cells: usize) {
        self.points.clear();
        self.points.reserve(items);
    }

    fn on_row_complete(&mut self, row: usize, item: &Item<'_>, best_at_budget: Decimal) {
        self.points.push(ProgressPoint {
            row,
            item: item.name().to_string(),
            best_at_budget,
        });
    }
}

/// Logs solve progress through `tracing`, roughly every tenth of the rows.
#[derive(Debug, Default)]
pub struct TracingProgress {
    rows: usize,
    stride: usize,
}

impl TracingProgress {
    /// Rows between progress events for a solve over `items` items
    fn stride_for(items: usize) -> usize {
        (items / 10).max(1)
    }
}

impl DpObserver for TracingProgress {
    fn on_solve_begin(&mut self, items: usize, budget: Budget, cells: usize) {
        self.rows = items;
        self.stride = Self::stride_for(items);

        debug!(items, budget = budget.minor_units(), cells, "solve started");
    }

    fn on_table_allocated(&mut self, bytes: usize) {
        debug!(bytes, "profit table allocated");
    }

    fn on_row_complete(&mut self, row: usize, item: &Item<'_>, best_at_budget: Decimal) {
        if row.is_multiple_of(self.stride.max(1)) || row == self.rows {
            debug!(
                row,
                rows = self.rows,
                item = item.name(),
                best = %major_units_from_minor(best_at_budget),
                "row complete"
            );
        }
    }

    fn on_item_selected(&mut self, index: usize, item: &Item<'_>) {
        debug!(index, item = item.name(), "item selected");
    }

    fn on_solve_end(&mut self, max_profit: Decimal) {
        info!(max_profit = %major_units_from_minor(max_profit), "solve finished");
    }
}

/// Forwards every callback to each attached observer, in attachment order.
#[derive(Default)]
pub struct CompositeObserver<'o> {
    observers: Vec<&'o mut dyn DpObserver>,
}

impl<'o> CompositeObserver<'o> {
    /// Create an empty composite
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an observer
    pub fn push(&mut self, observer: &'o mut dyn DpObserver) {
        self.observers.push(observer);
    }

    /// Attach an observer, builder style
    #[must_use]
    pub fn with(mut self, observer: &'o mut dyn DpObserver) -> Self {
        self.push(observer);
        self
    }

    /// Number of attached observers
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Whether no observers are attached
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl std::fmt::Debug for CompositeObserver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl DpObserver for CompositeObserver<'_> {
    fn on_solve_begin(&mut self, items: usize, budget: Budget, cells: usize) {
        for observer in &mut self.observers {
            observer.on_solve_begin(items, budget, cells);
        }
    }

    fn on_table_allocated(&mut self, bytes: usize) {
        for observer in &mut self.observers {
            observer.on_table_allocated(bytes);
        }
    }

    fn on_row_complete(&mut self, row: usize, item: &Item<'_>, best_at_budget: Decimal) {
        for observer in &mut self.observers {
            observer.on_row_complete(row, item, best_at_budget);
        }
    }

    fn on_item_selected(&mut self, index: usize, item: &Item<'_>) {
        for observer in &mut self.observers {
            observer.on_item_selected(index, item);
        }
    }

    fn on_solve_end(&mut self, max_profit: Decimal) {
        for observer in &mut self.observers {
            observer.on_solve_end(max_profit);
        }
    }
}
