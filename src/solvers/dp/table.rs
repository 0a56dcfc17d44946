//! Profit Table
//!
//! `(items + 1) x (budget + 1)` cells, row-major. Cell `(i, b)` holds the best total profit
//! achievable with the first `i` items while spending at most `b` minor units. Row 0 and column 0
//! are zero; row `i` is derived from row `i - 1` alone and never decreases along a row.

use std::mem;

use rust_decimal::Decimal;
use smallvec::SmallVec;

use crate::solvers::SolverError;

/// Dynamic-programming table of best achievable profits.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfitTable {
    rows: usize,
    columns: usize,
    cells: Vec<Decimal>,
}

impl ProfitTable {
    /// Allocate a zeroed table for `items` items and a budget of `budget` minor units.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::TableTooLarge`] if the table would hold more than `cell_limit`
    /// cells.
    pub fn zeroed(items: usize, budget: usize, cell_limit: usize) -> Result<Self, SolverError> {
        let mut table = Self::default();

        table.reset(items, budget, cell_limit)?;

        Ok(table)
    }

    /// Re-dimension and zero the table, reusing its allocation where possible.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::TableTooLarge`] if the table would hold more than `cell_limit`
    /// cells. The table is left empty in that case.
    pub fn reset(
        &mut self,
        items: usize,
        budget: usize,
        cell_limit: usize,
    ) -> Result<(), SolverError> {
        self.rows = 0;
        self.columns = 0;
        self.cells.clear();

        let rows = items.saturating_add(1);
        let columns = budget.saturating_add(1);

        let cells = rows
            .checked_mul(columns)
            .filter(|&cells| cells <= cell_limit)
            .ok_or(SolverError::TableTooLarge {
                rows,
                columns,
                limit: cell_limit,
            })?;

        self.cells.resize(cells, Decimal::ZERO);
        self.rows = rows;
        self.columns = columns;

        Ok(())
    }

    /// Number of rows (items + 1)
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (budget + 1)
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the table has no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Bytes held by the cells
    pub fn footprint_bytes(&self) -> usize {
        self.cells.len().saturating_mul(mem::size_of::<Decimal>())
    }

    /// Value at `(row, column)`
    pub fn get(&self, row: usize, column: usize) -> Option<Decimal> {
        if column >= self.columns {
            return None;
        }

        self.row(row)?.get(column).copied()
    }

    /// Values for one row
    pub fn row(&self, row: usize) -> Option<&[Decimal]> {
        if self.columns == 0 {
            return None;
        }

        self.cells.chunks_exact(self.columns).nth(row)
    }

    /// Best profit for the full item list and full budget
    pub fn max_profit(&self) -> Decimal {
        self.cells.last().copied().unwrap_or(Decimal::ZERO)
    }

    /// Fill `row` (1-based item number) from the row above for an item of the given cost and
    /// profit. Returns the best profit at the full budget for this prefix.
    ///
    /// # Errors
    ///
    /// - [`SolverError::InvariantViolation`]: `row` is 0 or outside the table.
    /// - [`SolverError::ProfitNotRepresentable`]: an accumulated profit overflowed.
    pub fn fill_row(
        &mut self,
        row: usize,
        cost: usize,
        profit: Decimal,
    ) -> Result<Decimal, SolverError> {
        let columns = self.columns;

        let split = row
            .checked_mul(columns)
            .filter(|&split| row > 0 && split < self.cells.len())
            .ok_or(SolverError::InvariantViolation {
                message: "profit table row out of range",
            })?;

        let item = row.saturating_sub(1);
        let (above, below) = self.cells.split_at_mut(split);

        let (Some(previous), Some(current)) = (
            above.rchunks_exact(columns).next(),
            below.chunks_exact_mut(columns).next(),
        ) else {
            return Err(SolverError::InvariantViolation {
                message: "profit table row out of range",
            });
        };

        for (spend, (cell, &excluded)) in current.iter_mut().zip(previous.iter()).enumerate() {
            // The item fits at this spend level only if `cost <= spend`.
            *cell = match spend.checked_sub(cost).and_then(|rest| previous.get(rest)) {
                Some(&remainder) => {
                    let included = remainder
                        .checked_add(profit)
                        .ok_or(SolverError::ProfitNotRepresentable { item })?;

                    excluded.max(included)
                }
                None => excluded,
            };
        }

        Ok(current.last().copied().unwrap_or(Decimal::ZERO))
    }

    /// Walk rows from the bottom up at the full budget and recover which items were taken.
    ///
    /// At row `i`, a change from row `i - 1` means item `i - 1` was selected: it is recorded and
    /// its cost deducted from the remaining budget. Positions are returned highest first.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::InvariantViolation`] if `costs` does not match the table or a
    /// selected cost exceeds the remaining budget.
    pub fn backtrack(&self, costs: &[usize]) -> Result<SmallVec<[usize; 10]>, SolverError> {
        if costs.len().saturating_add(1) != self.rows {
            return Err(SolverError::InvariantViolation {
                message: "item costs do not match profit table rows",
            });
        }

        let invariant = |message| SolverError::InvariantViolation { message };

        let mut remaining = self
            .columns
            .checked_sub(1)
            .ok_or_else(|| invariant("profit table has no columns"))?;

        let mut selected = SmallVec::new();

        for row in (1..self.rows).rev() {
            let item = row - 1;

            let with_item = self
                .get(row, remaining)
                .ok_or_else(|| invariant("backtracking left the profit table"))?;
            let without_item = self
                .get(item, remaining)
                .ok_or_else(|| invariant("backtracking left the profit table"))?;

            if with_item != without_item {
                let cost = costs
                    .get(item)
                    .copied()
                    .ok_or_else(|| invariant("item costs do not match profit table rows"))?;

                remaining = remaining
                    .checked_sub(cost)
                    .ok_or_else(|| invariant("selected item exceeds remaining budget"))?;

                selected.push(item);
            }
        }

        Ok(selected)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn filled(costs: &[usize], profits: &[i64], budget: usize) -> TestResult<ProfitTable> {
        let mut table = ProfitTable::zeroed(costs.len(), budget, usize::MAX)?;

        for (row, (&cost, &profit)) in costs.iter().zip(profits).enumerate() {
            table.fill_row(row + 1, cost, Decimal::from(profit))?;
        }

        Ok(table)
    }

    #[test]
    fn base_row_and_column_are_zero() -> TestResult {
        let table = filled(&[2, 3, 1], &[20, 45, 20], 5)?;

        assert!(
            table
                .row(0)
                .ok_or("missing row 0")?
                .iter()
                .all(|cell| cell.is_zero())
        );

        for row in 0..table.rows() {
            assert_eq!(table.get(row, 0), Some(Decimal::ZERO));
        }

        Ok(())
    }

    #[test]
    fn rows_are_non_decreasing_along_budget() -> TestResult {
        let table = filled(&[4, 3, 1, 2], &[10, 7, 3, 4], 7)?;

        for row in 0..table.rows() {
            let values = table.row(row).ok_or("missing row")?;

            assert!(
                values.windows(2).all(|pair| pair.first() <= pair.last()),
                "row {row} decreases: {values:?}"
            );
        }

        Ok(())
    }

    #[test]
    fn fills_known_table() -> TestResult {
        let table = filled(&[2, 3, 1], &[20, 45, 20], 5)?;

        let expected: [[i64; 6]; 4] = [
            [0, 0, 0, 0, 0, 0],
            [0, 0, 20, 20, 20, 20],
            [0, 0, 20, 45, 45, 65],
            [0, 20, 20, 45, 65, 65],
        ];

        for (row, values) in expected.iter().enumerate() {
            let actual: Vec<Decimal> = table.row(row).ok_or("missing row")?.to_vec();
            let expected: Vec<Decimal> = values.iter().copied().map(Decimal::from).collect();

            assert_eq!(actual, expected, "row {row}");
        }

        assert_eq!(table.max_profit(), Decimal::from(65));

        Ok(())
    }

    #[test]
    fn backtrack_walks_rows_from_the_bottom() -> TestResult {
        let table = filled(&[2, 3, 1], &[20, 45, 20], 5)?;

        // Row 3 equals row 2 at budget 5 (65 == 65), so the last item is skipped.
        assert_eq!(table.backtrack(&[2, 3, 1])?.as_slice(), &[1, 0]);

        Ok(())
    }

    #[test]
    fn item_larger_than_budget_is_never_taken() -> TestResult {
        let table = filled(&[10, 2], &[1_000, 5], 5)?;

        assert_eq!(table.max_profit(), Decimal::from(5));
        assert_eq!(table.backtrack(&[10, 2])?.as_slice(), &[1]);

        Ok(())
    }

    #[test]
    fn zero_budget_table_has_a_single_column() -> TestResult {
        let table = filled(&[1, 2], &[5, 6], 0)?;

        assert_eq!(table.columns(), 1);
        assert_eq!(table.max_profit(), Decimal::ZERO);
        assert!(table.backtrack(&[1, 2])?.is_empty());

        Ok(())
    }

    #[test]
    fn cell_limit_is_enforced() {
        let result = ProfitTable::zeroed(9, 9, 99);

        assert!(matches!(
            result,
            Err(SolverError::TableTooLarge {
                rows: 10,
                columns: 10,
                limit: 99,
            })
        ));
    }

    #[test]
    fn reset_reuses_and_zeroes() -> TestResult {
        let mut table = filled(&[1], &[5], 3)?;

        table.reset(2, 1, usize::MAX)?;

        assert_eq!(table.rows(), 3);
        assert_eq!(table.columns(), 2);
        assert_eq!(table.len(), 6);
        assert_eq!(table.max_profit(), Decimal::ZERO);
        assert_eq!(table.footprint_bytes(), 6 * mem::size_of::<Decimal>());

        Ok(())
    }

    #[test]
    fn filling_row_zero_is_rejected() -> TestResult {
        let mut table = ProfitTable::zeroed(1, 3, usize::MAX)?;

        assert!(matches!(
            table.fill_row(0, 1, Decimal::ONE),
            Err(SolverError::InvariantViolation { .. })
        ));
        assert!(matches!(
            table.fill_row(2, 1, Decimal::ONE),
            Err(SolverError::InvariantViolation { .. })
        ));

        Ok(())
    }

    #[test]
    fn backtrack_rejects_mismatched_costs() -> TestResult {
        let table = filled(&[1, 2], &[5, 6], 3)?;

        assert!(matches!(
            table.backtrack(&[1]),
            Err(SolverError::InvariantViolation { .. })
        ));

        Ok(())
    }
}
