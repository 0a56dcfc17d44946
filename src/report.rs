//! Report
//!
//! Renders a solve for people (a table followed by a summary) or for machines (YAML). Amounts are
//! converted from minor units back to major units for display only.

use std::{io, time::Duration};

use humanize_duration::{Truncate, prelude::DurationExt};
use rust_decimal::Decimal;
use rusty_money::{Money, MoneyError, iso::Currency};
use serde::Serialize;
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    budget::Budget,
    catalog::Catalog,
    instrumentation::ProgressPoint,
    items::{Item, major_units_from_minor},
    solvers::SolverResult,
};

/// Errors that can occur when writing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// IO error
    #[error(transparent)]
    Io(#[from] io::Error),

    /// YAML serialisation error
    #[error(transparent)]
    Yaml(#[from] serde_norway::Error),

    /// Wrapper for money errors.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// A finished solve, ready for display.
#[derive(Debug, Clone)]
pub struct Report<'a> {
    strategy: &'static str,
    currency: &'a Currency,
    considered: usize,
    dropped: usize,
    budget: Budget,
    result: SolverResult<'a>,
    elapsed: Option<Duration>,
    progress: Vec<ProgressPoint>,
}

impl<'a> Report<'a> {
    /// Create a report for `result`, produced by `strategy` over `catalog`
    pub fn new(
        strategy: &'static str,
        catalog: &Catalog<'a>,
        budget: Budget,
        result: SolverResult<'a>,
    ) -> Self {
        Self {
            strategy,
            currency: catalog.currency(),
            considered: catalog.len(),
            dropped: catalog.dropped().len(),
            budget,
            result,
            elapsed: None,
            progress: Vec::new(),
        }
    }

    /// Attach the wall-clock time of the solve
    #[must_use]
    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = Some(elapsed);
        self
    }

    /// Attach the per-row progress series
    #[must_use]
    pub fn with_progress(mut self, progress: Vec<ProgressPoint>) -> Self {
        self.progress = progress;
        self
    }

    /// The solve being reported
    pub fn result(&self) -> &SolverResult<'a> {
        &self.result
    }

    /// Total cost of the selection
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if an item is priced in another currency.
    pub fn total_cost(&self) -> Result<Money<'a, Currency>, MoneyError> {
        self.result
            .selected
            .iter()
            .try_fold(Money::from_minor(0, self.currency), |total, item| {
                total.add(*item.cost())
            })
    }

    /// Budget left after the selection
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if an item is priced in another currency.
    pub fn remaining(&self) -> Result<Money<'a, Currency>, MoneyError> {
        self.budget.to_money(self.currency).sub(self.total_cost()?)
    }

    /// Maximum profit in major units
    pub fn max_profit(&self) -> Money<'a, Currency> {
        self.money_from_minor(self.result.max_profit)
    }

    fn money_from_minor(&self, minor: Decimal) -> Money<'a, Currency> {
        Money::from_decimal(major_units_from_minor(minor), self.currency)
    }

    /// Machine-readable summary of the report
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Money`] if an item is priced in another currency.
    pub fn summary(&self) -> Result<ReportSummary, ReportError> {
        let selected = self
            .result
            .selected_indices
            .iter()
            .zip(&self.result.selected)
            .map(|(&position, item)| SelectedLine {
                position,
                name: item.name().to_string(),
                cost: amount(Decimal::from(item.cost_minor())),
                profit_rate: rate(item),
                profit: amount(item.profit()),
            })
            .collect();

        let progress = self
            .progress
            .iter()
            .map(|point| ProgressLine {
                row: point.row,
                item: point.item.clone(),
                best: amount(point.best_at_budget),
            })
            .collect();

        Ok(ReportSummary {
            strategy: self.strategy,
            currency: self.currency.iso_alpha_code,
            items_considered: self.considered,
            items_dropped: self.dropped,
            budget: amount(Decimal::from(self.budget.minor_units())),
            total_cost: amount(Decimal::from(self.total_cost()?.to_minor_units())),
            remaining: amount(Decimal::from(self.remaining()?.to_minor_units())),
            max_profit: amount(self.result.max_profit),
            elapsed: self.elapsed.map(|elapsed| elapsed.human(Truncate::Nano).to_string()),
            selected,
            progress,
        })
    }

    /// Write the summary as YAML
    ///
    /// # Errors
    ///
    /// Returns a [`ReportError`] if serialisation or writing fails.
    pub fn write_yaml(&self, mut out: impl io::Write) -> Result<(), ReportError> {
        let yaml = serde_norway::to_string(&self.summary()?)?;

        out.write_all(yaml.as_bytes())?;

        Ok(())
    }

    /// Write the selection as a table followed by a summary
    ///
    /// # Errors
    ///
    /// Returns a [`ReportError`] if writing fails.
    pub fn write_table(&self, mut out: impl io::Write) -> Result<(), ReportError> {
        let mut builder = Builder::default();

        builder.push_record(["#", "Action", "Cost", "Rate", "Profit"]);

        let result = &self.result;

        for (&position, item) in result.selected_indices.iter().zip(&result.selected) {
            builder.push_record([
                format!("#{:<3}", position + 1),
                item.name().to_string(),
                item.cost().to_string(),
                rate(item),
                self.money_from_minor(item.profit()).to_string(),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(2..5), Alignment::right());

        writeln!(out, "\n{table}")?;

        if !self.progress.is_empty() {
            write_progress_table(&mut out, &self.progress, self.currency)?;
        }

        let mut lines = vec![
            ("Strategy:", self.strategy.to_string()),
            (
                "Actions:",
                format!("{} considered, {} dropped", self.considered, self.dropped),
            ),
            ("Budget:", self.budget.to_money(self.currency).to_string()),
            ("Spent:", self.total_cost()?.to_string()),
            ("Remaining:", self.remaining()?.to_string()),
            ("Profit:", self.max_profit().to_string()),
        ];

        if let Some(elapsed) = self.elapsed {
            lines.push(("Elapsed:", elapsed.human(Truncate::Nano).to_string()));
        }

        write_summary(&mut out, &lines)
    }
}

/// Machine-readable report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    /// Strategy that produced the selection
    pub strategy: &'static str,

    /// ISO code of the catalog currency
    pub currency: &'static str,

    /// Items offered to the solver
    pub items_considered: usize,

    /// Records dropped during normalisation
    pub items_dropped: usize,

    /// Budget in major units
    pub budget: String,

    /// Total cost of the selection in major units
    pub total_cost: String,

    /// Budget left in major units
    pub remaining: String,

    /// Maximum profit in major units
    pub max_profit: String,

    /// Human-readable solve time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed: Option<String>,

    /// Selected items, in selection order
    pub selected: Vec<SelectedLine>,

    /// Best profit after each row, when recorded
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub progress: Vec<ProgressLine>,
}

/// One selected item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectedLine {
    /// Catalog position (0-based)
    pub position: usize,

    /// Display name
    pub name: String,

    /// Cost in major units
    pub cost: String,

    /// Profit rate in percent points
    pub profit_rate: String,

    /// Profit in major units
    pub profit: String,
}

/// One point of the progress series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressLine {
    /// Items considered so far
    pub row: usize,

    /// Item added by this row
    pub item: String,

    /// Best profit at the full budget in major units
    pub best: String,
}

/// Minor units as a two-place major-unit amount
fn amount(minor: Decimal) -> String {
    format!("{:.2}", major_units_from_minor(minor))
}

fn rate(item: &Item<'_>) -> String {
    format!("{}%", item.rate_points().normalize())
}

fn write_progress_table(
    out: &mut impl io::Write,
    progress: &[ProgressPoint],
    currency: &Currency,
) -> Result<(), ReportError> {
    let mut builder = Builder::default();

    builder.push_record(["Row", "Action", "Best Profit"]);

    for point in progress {
        builder.push_record([
            point.row.to_string(),
            point.item.clone(),
            Money::from_decimal(point.best_at_budget_major(), currency).to_string(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(2..3), Alignment::right());

    writeln!(out, "{table}")?;

    Ok(())
}

/// Writes summary lines with right-aligned labels.
fn write_summary(out: &mut impl io::Write, lines: &[(&str, String)]) -> Result<(), ReportError> {
    let label_width = lines
        .iter()
        .map(|(label, _)| label.len())
        .max()
        .unwrap_or(0);

    for (label, value) in lines {
        writeln!(out, " {label:>label_width$}  {value}")?;
    }

    writeln!(out)?;

    Ok(())
}
