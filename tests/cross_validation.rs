//! Cross-validation of the exact solvers on pseudo-random small catalogs

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::EUR};
use testresult::TestResult;

use satchel::{
    budget::Budget,
    combinations::EnumerationStrategy,
    items::{Item, total_profit},
    solvers::{Solver, SolverResult, brute_force::BruteForceSolver, dp::DpSolver, ilp::IlpSolver},
};

/// Deterministic 64-bit linear congruential generator.
struct Lcg(u64);

impl Lcg {
    fn next_u64(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        self.0 >> 33
    }

    fn between(&mut self, low: i64, high: i64) -> i64 {
        let span = u64::try_from(high - low + 1).unwrap_or(1);
        let offset = i64::try_from(self.next_u64() % span).unwrap_or(0);

        low + offset
    }
}

struct Case<'a> {
    items: Vec<Item<'a>>,
    budget: Budget,
}

fn random_case<'a>(rng: &mut Lcg, max_items: i64) -> TestResult<Case<'a>> {
    let len = rng.between(0, max_items);
    let mut items = Vec::new();

    for idx in 0..len {
        let cost = rng.between(1, 2_000);
        let points = rng.between(0, 30);

        items.push(Item::new(
            format!("Action-{}", idx + 1),
            Money::from_minor(cost, EUR),
            Percentage::from(Decimal::new(points, 2)),
        )?);
    }

    let total: i64 = items.iter().map(Item::cost_minor).sum();
    let budget = Budget::from_minor(rng.between(0, total.max(1)))?;

    Ok(Case { items, budget })
}

fn assert_feasible(result: &SolverResult<'_>, budget: Budget, solver: &str) {
    assert!(
        budget.admits(result.total_cost_minor()),
        "{solver} exceeded the budget"
    );
    assert_eq!(
        total_profit(&result.selected),
        result.max_profit,
        "{solver} reported a profit its selection does not earn"
    );
}

#[test]
fn dp_matches_brute_force_and_ilp() -> TestResult {
    let mut rng = Lcg(0x5eed);

    let dp = DpSolver::new();
    let doubling = BruteForceSolver::new();
    let size_indexed = BruteForceSolver::new().with_strategy(EnumerationStrategy::SizeIndexed);
    let ilp = IlpSolver::new();

    for case_idx in 0..60 {
        let case = random_case(&mut rng, 12)?;

        let expected = dp.solve(&case.items, case.budget)?;
        assert_feasible(&expected, case.budget, "dp");

        let solvers: [&dyn Solver; 3] = [&doubling, &size_indexed, &ilp];

        for solver in solvers {
            let result = solver.solve(&case.items, case.budget)?;

            assert_feasible(&result, case.budget, solver.name());
            assert_eq!(
                result.max_profit,
                expected.max_profit,
                "case {case_idx}: {} disagrees with dp",
                solver.name()
            );
        }
    }

    Ok(())
}

#[test]
fn larger_budget_never_lowers_profit() -> TestResult {
    let mut rng = Lcg(42);
    let dp = DpSolver::new();

    for _ in 0..20 {
        let case = random_case(&mut rng, 12)?;
        let tighter = dp.solve(&case.items, case.budget)?;

        let looser_budget = Budget::from_minor(
            i64::try_from(case.budget.minor_units())? + rng.between(0, 500),
        )?;
        let looser = dp.solve(&case.items, looser_budget)?;

        assert!(looser.max_profit >= tighter.max_profit);
    }

    Ok(())
}

#[test]
fn adding_an_item_never_lowers_profit() -> TestResult {
    let mut rng = Lcg(7);
    let dp = DpSolver::new();

    for _ in 0..20 {
        let mut case = random_case(&mut rng, 11)?;
        let before = dp.solve(&case.items, case.budget)?;

        case.items.push(Item::new(
            "Extra",
            Money::from_minor(rng.between(1, 2_000), EUR),
            Percentage::from(Decimal::new(rng.between(0, 30), 2)),
        )?);

        let after = dp.solve(&case.items, case.budget)?;

        assert!(after.max_profit >= before.max_profit);
    }

    Ok(())
}

#[test]
fn repeated_solves_pick_the_same_subset() -> TestResult {
    let mut rng = Lcg(99);
    let dp = DpSolver::new();

    for _ in 0..10 {
        let case = random_case(&mut rng, 12)?;

        let first = dp.solve(&case.items, case.budget)?;
        let second = dp.solve(&case.items, case.budget)?;

        assert_eq!(first.selected_indices, second.selected_indices);
        assert_eq!(first.max_profit, second.max_profit);
    }

    Ok(())
}

#[test]
fn zero_budget_always_yields_empty_selection() -> TestResult {
    let mut rng = Lcg(1);

    for _ in 0..10 {
        let case = random_case(&mut rng, 12)?;

        let solvers: [&dyn Solver; 3] = [&DpSolver::new(), &BruteForceSolver::new(), &IlpSolver];

        for solver in solvers {
            let result = solver.solve(&case.items, Budget::ZERO)?;

            assert!(
                result.is_empty(),
                "{} selected items for free",
                solver.name()
            );
            assert_eq!(result.max_profit, Decimal::ZERO);
        }
    }

    Ok(())
}
