//! Satchel
//!
//! Satchel picks the most profitable set of investment actions that fits a spending budget: the
//! 0/1 knapsack problem. Prices are normalised to minor currency units so the budget can index an
//! exact dynamic-programming table, and brute-force and ILP solvers are kept alongside to
//! cross-check the DP on small catalogs.
//!
//! ```rust
//! use satchel::prelude::*;
//! use rusty_money::iso::EUR;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//!
//! let catalog = Catalog::from_reader(
//!     "name,price,profit\nA,200,10\nB,300,15\nC,100,20\n".as_bytes(),
//!     EUR,
//! )?;
//!
//! let budget = Budget::from_major(500.into())?;
//! let result = DpSolver::new().solve(catalog.items(), budget)?;
//!
//! let names: Vec<&str> = result.selected.iter().map(Item::name).collect();
//! assert_eq!(names, ["B", "A"]);
//! # Ok(())
//! # }
//! ```

pub mod budget;
pub mod catalog;
pub mod combinations;
pub mod config;
pub mod instrumentation;
pub mod items;
pub mod logging;
pub mod prelude;
pub mod report;
pub mod solvers;
