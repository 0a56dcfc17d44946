//! ILP Solver
//!
//! Formulates the selection as a binary integer program:
//!
//! ```text
//! maximise    sum(profit_i * x_i)
//! subject to  sum(cost_i * x_i) <= budget
//!             x_i in {0, 1}
//! ```
//!
//! Costs and the budget are integers in minor units and must convert to `f64` exactly. The
//! reported profit is recomputed exactly from the chosen items, so it is directly comparable with
//! the other solvers.

use good_lp::{
    Expression, ProblemVariables, Solution, SolverModel, Variable, constraint, variable,
};
use rust_decimal::{Decimal, prelude::ToPrimitive};
use smallvec::SmallVec;
use tracing::debug;

#[cfg(feature = "solver-highs")]
use good_lp::solvers::highs::highs as default_solver;
#[cfg(all(not(feature = "solver-highs"), feature = "solver-microlp"))]
use good_lp::solvers::microlp::microlp as default_solver;

use crate::{
    budget::{Budget, BudgetError},
    items::{Item, total_profit},
    solvers::{Solver, SolverError, SolverResult},
};

/// Binary threshold for determining truthiness
pub const BINARY_THRESHOLD: f64 = 0.5;

/// Solver using Integer Linear Programming (ILP)
#[derive(Debug, Default, Clone, Copy)]
pub struct IlpSolver;

impl IlpSolver {
    /// Create an ILP solver using the configured backend
    pub fn new() -> Self {
        Self
    }
}

impl Solver for IlpSolver {
    fn name(&self) -> &'static str {
        "ilp"
    }

    fn solve<'a>(
        &self,
        items: &[Item<'a>],
        budget: Budget,
    ) -> Result<SolverResult<'a>, SolverError> {
        // Return early if there is nothing to choose from
        if items.is_empty() {
            return Ok(SolverResult::empty());
        }

        let budget_minor = i64::try_from(budget.minor_units())
            .ok()
            .and_then(i64_to_f64_exact)
            .ok_or_else(|| unrepresentable(budget))?;

        let mut pb = ProblemVariables::new();
        let mut objective = Expression::default();
        let mut spend = Expression::default();
        let mut selections: SmallVec<[Variable; 10]> = SmallVec::with_capacity(items.len());

        for (idx, item) in items.iter().enumerate() {
            let minor_units = item.cost_minor();

            let cost = i64_to_f64_exact(minor_units)
                .ok_or(SolverError::CostNotRepresentable { minor_units })?;

            let profit = item
                .profit()
                .to_f64()
                .ok_or(SolverError::ProfitNotRepresentable { item: idx })?;

            let x = pb.add(variable().binary());

            objective += profit * x;
            spend += cost * x;
            selections.push(x);
        }

        debug!(
            items = items.len(),
            budget = budget.minor_units(),
            "solving binary program"
        );

        let solution = pb
            .maximise(objective)
            .using(default_solver)
            .with(constraint::leq(spend, budget_minor))
            .solve()?;

        let selected_indices: SmallVec<[usize; 10]> = selections
            .iter()
            .enumerate()
            .filter(|&(_, &x)| solution.value(x) > BINARY_THRESHOLD)
            .map(|(idx, _)| idx)
            .collect();

        let mut result = SolverResult::from_indices(items, selected_indices, Decimal::ZERO)?;

        result.max_profit = total_profit(&result.selected);

        if !budget.admits(result.total_cost_minor()) {
            return Err(SolverError::InvariantViolation {
                message: "binary program selection exceeds the budget",
            });
        }

        debug!(
            max_profit = %result.max_profit,
            selected = result.len(),
            "binary program solved"
        );

        Ok(result)
    }
}

fn unrepresentable(budget: Budget) -> SolverError {
    BudgetError::NotRepresentable(Decimal::from(budget.minor_units())).into()
}

/// Convert an `i64` to `f64` only if the conversion is exact.
pub fn i64_to_f64_exact(v: i64) -> Option<f64> {
    let f = v.to_f64()?;

    (f.to_i64() == Some(v)).then_some(f)
}
