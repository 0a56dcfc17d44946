//! Satchel prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    budget::{Budget, BudgetError},
    catalog::{Catalog, CatalogError, CatalogRecord},
    combinations::{EnumerationStrategy, Subset, Subsets},
    instrumentation::{
        CompositeObserver, MemoryObserver, ProgressPoint, ProgressSeries, TimingObserver,
        TracingProgress,
    },
    items::{Item, ItemError},
    report::{Report, ReportError, ReportSummary},
    solvers::{
        Solver, SolverError, SolverResult,
        brute_force::BruteForceSolver,
        dp::{DpObserver, DpSolver, NoopObserver, ProfitTable, SolveContext},
        ilp::IlpSolver,
    },
};
