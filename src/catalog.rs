//! Item Catalog
//!
//! Loads a flat delimited table with header-named columns `name`, `price` and `profit`:
//!
//! ```text
//! name,price,profit
//! Action-1,20,5
//! Action-2,30.50,10%
//! ```
//!
//! `price` is in major currency units, `profit` is a rate in percent points. Rows are normalised
//! into [`Item`]s; rows whose cost rounds to zero or below are dropped rather than rejected.

use std::{fs::File, io, path::Path, str::FromStr};

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rustc_hash::FxHashSet;
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;
use smallvec::SmallVec;
use thiserror::Error;
use tracing::{debug, warn};

use crate::items::{Item, ItemError, minor_units_from_major};

/// Catalog loading errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// IO error reading the catalog file
    #[error("failed to read catalog: {0}")]
    Io(#[from] io::Error),

    /// Structural error in the delimited file (bad quoting, missing column, ...)
    #[error("failed to parse catalog: {0}")]
    Csv(#[from] csv::Error),

    /// A field could not be parsed
    #[error("malformed record on line {line}: invalid {field} {value:?}")]
    MalformedRecord {
        /// Line number in the source file (header is line 1)
        line: u64,
        /// Offending column
        field: &'static str,
        /// Raw field contents
        value: String,
    },

    /// A normalised record could not be turned into an item
    #[error(transparent)]
    Item(#[from] ItemError),
}

/// Row as it appears in the file
#[derive(Debug, Deserialize)]
struct RawRecord {
    name: String,
    price: String,
    profit: String,
}

/// A parsed catalog row.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogRecord {
    /// Display name
    pub name: String,

    /// Price in major units, as written
    pub price: Decimal,

    /// Price in minor units, rounded half away from zero
    pub cost_minor: i64,

    /// Profit rate as a fraction
    pub profit_rate: Percentage,
}

impl CatalogRecord {
    /// Parse a record from its raw field values.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::MalformedRecord`] if the name is empty, the price is not a decimal
    /// amount representable in minor units, or the profit is not a percentage.
    pub fn parse(name: &str, price: &str, profit: &str, line: u64) -> Result<Self, CatalogError> {
        let malformed = |field: &'static str, value: &str| CatalogError::MalformedRecord {
            line,
            field,
            value: value.to_string(),
        };

        let name = name.trim();

        if name.is_empty() {
            return Err(malformed("name", name));
        }

        let amount = Decimal::from_str(price.trim()).map_err(|_err| malformed("price", price))?;
        let cost_minor = minor_units_from_major(amount).ok_or_else(|| malformed("price", price))?;
        let profit_rate = parse_rate(profit).ok_or_else(|| malformed("profit", profit))?;

        Ok(Self {
            name: name.to_string(),
            price: amount,
            cost_minor,
            profit_rate,
        })
    }

    /// Normalise the record into an item, or `None` if it costs nothing.
    ///
    /// # Errors
    ///
    /// Returns an [`ItemError`] if the derived profit cannot be represented.
    pub fn to_item<'a>(&self, currency: &'a Currency) -> Result<Option<Item<'a>>, ItemError> {
        if self.cost_minor <= 0 {
            return Ok(None);
        }

        Item::new(
            self.name.clone(),
            Money::from_minor(self.cost_minor, currency),
            self.profit_rate,
        )
        .map(Some)
    }
}

/// Parse a profit rate in percent points (`"5"`, `"5.0"` or `"5%"`) into a fraction.
pub fn parse_rate(s: &str) -> Option<Percentage> {
    let trimmed = s.trim();
    let points = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();

    let points = Decimal::from_str(points).ok()?;

    points
        .checked_div(Decimal::ONE_HUNDRED)
        .map(Percentage::from)
}

/// Items loaded from a catalog, ready for solving.
#[derive(Debug)]
pub struct Catalog<'a> {
    records: Vec<CatalogRecord>,
    items: Vec<Item<'a>>,
    dropped: SmallVec<[usize; 10]>,
    currency: &'a Currency,
}

impl<'a> Catalog<'a> {
    /// Load a catalog from a file path
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains a malformed record.
    pub fn from_path(path: impl AsRef<Path>, currency: &'a Currency) -> Result<Self, CatalogError> {
        let path = path.as_ref();

        debug!(path = %path.display(), "loading catalog");

        Self::from_reader(File::open(path)?, currency)
    }

    /// Load a catalog from any reader
    ///
    /// # Errors
    ///
    /// Returns an error if the data is not a valid delimited table or contains a malformed record.
    pub fn from_reader(
        reader: impl io::Read,
        currency: &'a Currency,
    ) -> Result<Self, CatalogError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let mut row = csv::StringRecord::new();
        let mut records = Vec::new();

        while reader.read_record(&mut row)? {
            let line = row.position().map_or(0, csv::Position::line);
            let raw: RawRecord = row.deserialize(Some(&headers))?;

            let record = CatalogRecord::parse(&raw.name, &raw.price, &raw.profit, line)?;

            records.push(record);
        }

        Self::from_records(records, currency)
    }

    /// Build a catalog from already parsed records
    ///
    /// # Errors
    ///
    /// Returns an error if a record cannot be normalised into an item.
    pub fn from_records(
        records: Vec<CatalogRecord>,
        currency: &'a Currency,
    ) -> Result<Self, CatalogError> {
        let mut items = Vec::with_capacity(records.len());
        let mut dropped = SmallVec::new();
        let mut seen = FxHashSet::default();

        for (idx, record) in records.iter().enumerate() {
            if !seen.insert(record.name.as_str()) {
                warn!(name = %record.name, "duplicate catalog entry");
            }

            match record.to_item(currency)? {
                Some(item) => items.push(item),
                None => {
                    debug!(
                        name = %record.name,
                        cost_minor = record.cost_minor,
                        "dropping record with non-positive cost"
                    );
                    dropped.push(idx);
                }
            }
        }

        debug!(
            records = records.len(),
            items = items.len(),
            dropped = dropped.len(),
            "catalog normalised"
        );

        Ok(Self {
            records,
            items,
            dropped,
            currency,
        })
    }

    /// Normalised items, in file order, excluding dropped records
    pub fn items(&self) -> &[Item<'a>] {
        &self.items
    }

    /// Every parsed record, in file order
    pub fn records(&self) -> &[CatalogRecord] {
        &self.records
    }

    /// Record indexes dropped during normalisation
    pub fn dropped(&self) -> &[usize] {
        &self.dropped
    }

    /// Currency of every item in the catalog
    pub fn currency(&self) -> &'a Currency {
        self.currency
    }

    /// Number of normalised items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether there are no items to choose from
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::EUR;
    use testresult::TestResult;

    use super::*;

    const SAMPLE: &str = "\
name,price,profit
Action-1,20,5
Action-2, 30.50 ,10%
Action-3,0,12
Action-4,0.004,50
";

    #[test]
    fn parse_rate_accepts_points_and_suffix() {
        let five = Percentage::from(Decimal::new(5, 2));

        assert_eq!(parse_rate("5"), Some(five));
        assert_eq!(parse_rate("5.0"), Some(five));
        assert_eq!(parse_rate(" 5 % "), Some(five));
        assert_eq!(parse_rate("five"), None);
    }

    #[test]
    fn loads_and_normalises_records() -> TestResult {
        let catalog = Catalog::from_reader(SAMPLE.as_bytes(), EUR)?;

        assert_eq!(catalog.records().len(), 4);
        assert_eq!(catalog.len(), 2);

        let names: Vec<&str> = catalog.items().iter().map(Item::name).collect();
        assert_eq!(names, vec!["Action-1", "Action-2"]);

        let costs: Vec<i64> = catalog.items().iter().map(Item::cost_minor).collect();
        assert_eq!(costs, vec![2_000, 3_050]);

        let profits: Vec<Decimal> = catalog.items().iter().map(Item::profit).collect();
        assert_eq!(profits, vec![Decimal::from(100), Decimal::from(305)]);

        Ok(())
    }

    #[test]
    fn zero_cost_records_are_dropped_not_rejected() -> TestResult {
        let catalog = Catalog::from_reader(SAMPLE.as_bytes(), EUR)?;

        assert_eq!(catalog.dropped(), &[2, 3]);
        assert!(
            catalog
                .items()
                .iter()
                .all(|item| item.name() != "Action-3" && item.name() != "Action-4")
        );

        Ok(())
    }

    #[test]
    fn columns_are_matched_by_header_name() -> TestResult {
        let data = "profit,name,price\n20,C,100\n";
        let catalog = Catalog::from_reader(data.as_bytes(), EUR)?;

        let item = catalog.items().first().ok_or("expected one item")?;
        assert_eq!(item.name(), "C");
        assert_eq!(item.cost_minor(), 10_000);
        assert_eq!(item.profit(), Decimal::from(2_000));

        Ok(())
    }

    #[test]
    fn malformed_price_reports_line() {
        let data = "name,price,profit\nA,10,5\nB,ten,5\n";
        let result = Catalog::from_reader(data.as_bytes(), EUR);

        assert!(matches!(
            result,
            Err(CatalogError::MalformedRecord {
                line: 3,
                field: "price",
                ..
            })
        ));
    }

    #[test]
    fn malformed_profit_is_rejected() {
        let data = "name,price,profit\nA,10,lots\n";
        let result = Catalog::from_reader(data.as_bytes(), EUR);

        assert!(matches!(
            result,
            Err(CatalogError::MalformedRecord { field: "profit", .. })
        ));
    }

    #[test]
    fn empty_name_is_rejected() {
        let data = "name,price,profit\n  ,10,5\n";
        let result = Catalog::from_reader(data.as_bytes(), EUR);

        assert!(matches!(
            result,
            Err(CatalogError::MalformedRecord { field: "name", .. })
        ));
    }

    #[test]
    fn missing_column_is_a_csv_error() {
        let data = "name,price\nA,10\n";
        let result = Catalog::from_reader(data.as_bytes(), EUR);

        assert!(matches!(result, Err(CatalogError::Csv(_))));
    }

    #[test]
    fn header_only_catalog_is_empty() -> TestResult {
        let catalog = Catalog::from_reader("name,price,profit\n".as_bytes(), EUR)?;

        assert!(catalog.is_empty());
        assert_eq!(catalog.currency(), EUR);

        Ok(())
    }
}
