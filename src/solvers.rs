//! Solvers for budget-constrained selection

use good_lp::ResolutionError;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    budget::{Budget, BudgetError},
    items::{Item, total_cost},
};

pub mod brute_force;
pub mod dp;
pub mod ilp;

/// Solver Errors
#[derive(Debug, Error)]
pub enum SolverError {
    /// Budget was negative or could not be represented.
    #[error("invalid budget: {0}")]
    InvalidBudget(#[from] BudgetError),

    /// The profit table would exceed the configured cell limit.
    #[error("profit table of {rows} x {columns} cells exceeds the limit of {limit} cells")]
    TableTooLarge {
        /// Rows requested (items + 1)
        rows: usize,
        /// Columns requested (budget + 1)
        columns: usize,
        /// Configured cell limit
        limit: usize,
    },

    /// Too many items for exhaustive enumeration.
    #[error("{items} items exceed the exhaustive enumeration limit of {limit}")]
    TooManyItems {
        /// Items supplied
        items: usize,
        /// Configured item limit
        limit: usize,
    },

    /// A cost in minor units cannot be used as a table index or solver coefficient.
    #[error("cost cannot be represented by the solver: {minor_units} minor units")]
    CostNotRepresentable {
        /// Cost in minor units
        minor_units: i64,
    },

    /// A profit could not be accumulated or converted.
    #[error("profit of item {item} cannot be represented by the solver")]
    ProfitNotRepresentable {
        /// Item position
        item: usize,
    },

    /// Wrapped ILP resolution error
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// Internal solver invariant was violated (this is a bug).
    #[error("solver invariant violated: {message}")]
    InvariantViolation {
        /// What invariant was violated
        message: &'static str,
    },
}

/// Optimal selection for one solve.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverResult<'a> {
    /// Best achievable total profit, in minor units
    pub max_profit: Decimal,

    /// Catalog positions of the selected items, in selection order
    pub selected_indices: SmallVec<[usize; 10]>,

    /// The selected items, in selection order
    pub selected: Vec<Item<'a>>,
}

impl<'a> SolverResult<'a> {
    /// A zero-profit, empty selection
    pub fn empty() -> Self {
        Self {
            max_profit: Decimal::ZERO,
            selected_indices: SmallVec::new(),
            selected: Vec::new(),
        }
    }

    /// Build a result by resolving positions against the solved item list.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::InvariantViolation`] if a position is out of range.
    pub fn from_indices(
        items: &[Item<'a>],
        selected_indices: SmallVec<[usize; 10]>,
        max_profit: Decimal,
    ) -> Result<Self, SolverError> {
        let selected = selected_indices
            .iter()
            .map(|&idx| items.get(idx).cloned())
            .collect::<Option<Vec<_>>>()
            .ok_or(SolverError::InvariantViolation {
                message: "selected position outside the item list",
            })?;

        Ok(Self {
            max_profit,
            selected_indices,
            selected,
        })
    }

    /// Total cost of the selection in minor units
    pub fn total_cost_minor(&self) -> i64 {
        total_cost(&self.selected)
    }

    /// Total cost of the selection as money
    pub fn total_cost(&self, currency: &'a Currency) -> Money<'a, Currency> {
        Money::from_minor(self.total_cost_minor(), currency)
    }

    /// Number of selected items
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Whether nothing was selected
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

/// Trait for choosing the most profitable subset of items within a budget
pub trait Solver {
    /// Short, stable name used in reports and logs
    fn name(&self) -> &'static str;

    /// Solve for the given items and budget
    ///
    /// # Errors
    ///
    /// Returns a [`SolverError`] if the solver encounters an error.
    fn solve<'a>(
        &self,
        items: &[Item<'a>],
        budget: Budget,
    ) -> Result<SolverResult<'a>, SolverError>;

    /// Solve with a budget given in minor units
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::InvalidBudget`] for a negative budget, before any work is done,
    /// otherwise whatever [`Solver::solve`] returns.
    fn solve_minor<'a>(
        &self,
        items: &[Item<'a>],
        budget_minor: i64,
    ) -> Result<SolverResult<'a>, SolverError> {
        self.solve(items, Budget::from_minor(budget_minor)?)
    }
}
