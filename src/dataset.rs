//! CSV dataset loading, normalization, and cost write-back.
//!
//! The input table carries one row per line item with `Item Name`, `Link`,
//! `Cost`, `Bill Title`, optional `Description`, `Quantity`, and
//! `Budget Section` columns. Rows are filtered to a single bill, blank
//! section cells are forward-filled from the previous row, and the result is
//! grouped into ordered [`Section`]s.

use crate::error::{Result, SyncError};
use crate::model::{Item, Section};
use crate::price::PriceUpdate;
use indexmap::IndexMap;
use log::debug;
use std::io;
use std::path::Path;

/// Columns every dataset must carry
pub const REQUIRED_COLUMNS: &[&str] = &["Item Name", "Link", "Cost", "Bill Title"];

const SECTION_COLUMN: &str = "Budget Section";

/// An in-memory copy of the tabular source
#[derive(Debug, Clone)]
pub struct Dataset {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Dataset {
    /// Read a dataset from a CSV file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        Self::from_reader(file)
    }

    /// Read a dataset from any CSV source
    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            // Blank-pad short records so every row has a cell per header
            rows.push(
                (0..headers.len())
                    .map(|i| record.get(i).unwrap_or("").to_string())
                    .collect(),
            );
        }

        let dataset = Self { headers, rows };
        dataset.require_columns()?;
        Ok(dataset)
    }

    fn require_columns(&self) -> Result<()> {
        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .filter(|c| self.column(c).is_none())
            .copied()
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(SyncError::MissingColumns(missing.join(", ")))
        }
    }

    fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    fn cell<'a>(&'a self, row: &'a [String], name: &str) -> &'a str {
        self.column(name).map(|i| row[i].as_str()).unwrap_or("")
    }

    /// Rows selected by `bill_title` (case-insensitive, trimmed), grouped
    /// into ordered sections with blank section cells forward-filled.
    ///
    /// Rows before the first named section have no grouping key and are
    /// dropped, as are rows without an item name.
    pub fn sections(&self, bill_title: &str) -> Result<Vec<Section>> {
        let wanted = bill_title.trim().to_lowercase();
        let mut grouped: IndexMap<String, Vec<Item>> = IndexMap::new();
        let mut carried_section = String::new();

        for (index, row) in self.rows.iter().enumerate() {
            if self.cell(row, "Bill Title").trim().to_lowercase() != wanted {
                continue;
            }

            let section_cell = self.cell(row, SECTION_COLUMN).trim();
            if !section_cell.is_empty() {
                carried_section = section_cell.to_string();
            }
            if carried_section.is_empty() {
                debug!("row {index}: no section to forward-fill from, skipping");
                continue;
            }

            let name = self.cell(row, "Item Name").trim();
            if name.is_empty() {
                debug!("row {index}: empty item name, skipping");
                continue;
            }

            let item = Item {
                name: name.to_string(),
                description: self.cell(row, "Description").trim().to_string(),
                quantity: parse_quantity(self.cell(row, "Quantity")),
                unit_cost: parse_cost(self.cell(row, "Cost")),
                link: self.cell(row, "Link").trim().to_string(),
                row: index,
            };

            grouped.entry(carried_section.clone()).or_default().push(item);
        }

        Ok(grouped
            .into_iter()
            .map(|(name, items)| Section { name, items })
            .collect())
    }

    /// Rewrite the `Cost` cell of each updated row as a currency string
    pub fn apply_updates(&mut self, updates: &[PriceUpdate]) {
        let Some(cost_col) = self.column("Cost") else {
            return;
        };
        for update in updates {
            if let Some(row) = self.rows.get_mut(update.row) {
                row[cost_col] = format!("${:.2}", update.cost);
            }
        }
    }

    /// Write the (possibly updated) table to a CSV file
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut writer = csv::Writer::from_path(path.as_ref())?;
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Lenient quantity parse: accepts integer or decimal text, truncating;
/// unparsable input falls back to 1, negatives clamp to 0
fn parse_quantity(raw: &str) -> u32 {
    match raw.trim().parse::<f64>() {
        Ok(value) if value >= 0.0 => value as u32,
        Ok(_) => 0,
        Err(_) => 1,
    }
}

/// Lenient cost parse: strips currency symbols and separators, falls back
/// to 0.0, clamps negatives to 0.0
fn parse_cost(raw: &str) -> f64 {
    let scrubbed: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    scrubbed.parse::<f64>().unwrap_or(0.0).max(0.0)
}
