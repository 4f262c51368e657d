//! Tabular query results.
//!
//! Every Tushare endpoint answers with a flat field list and positional value
//! arrays. [`Table`] keeps the field list as its schema and stores each item as
//! a [`Row`] keyed by field name, in the order the API returned them.

use std::collections::BTreeMap;
use std::io;

use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, TushareError},
    value::Scalar,
};

/// A single record of a [`Table`].
pub type Row = BTreeMap<String, Scalar>;

/// Columns plus ordered rows, as decoded from a Tushare response.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    /// Creates a table from a schema and rows.
    #[must_use]
    pub const fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    /// Zips positional items against the field list.
    ///
    /// Values past the end of `fields` are dropped. An item shorter than
    /// `fields` leaves the trailing keys absent rather than null.
    #[must_use]
    pub fn from_items(fields: Vec<String>, items: Vec<Vec<Scalar>>) -> Self {
        let rows = items
            .into_iter()
            .map(|item| {
                fields
                    .iter()
                    .cloned()
                    .zip(item)
                    .collect::<Row>()
            })
            .collect();

        Self {
            columns: fields,
            rows,
        }
    }

    /// Returns the column names in schema order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns the rows in source order.
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Returns mutable access to the rows.
    pub fn rows_mut(&mut self) -> &mut [Row] {
        &mut self.rows
    }

    /// Consumes the table and returns its schema and rows.
    #[must_use]
    pub fn into_parts(self) -> (Vec<String>, Vec<Row>) {
        (self.columns, self.rows)
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Appends a row.
    pub fn push_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Appends a column name to the schema unless it is already present.
    pub fn add_column(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.columns.contains(&name) {
            self.columns.push(name);
        }
    }

    /// Returns the value of `field` for every row, `None` where the key is absent.
    #[must_use]
    pub fn column(&self, field: &str) -> Vec<Option<&Scalar>> {
        self.rows.iter().map(|row| row.get(field)).collect()
    }

    /// Returns a single cell.
    #[must_use]
    pub fn get(&self, row: usize, field: &str) -> Option<&Scalar> {
        self.rows.get(row).and_then(|r| r.get(field))
    }

    /// Returns an iterator over the rows.
    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    /// Serializes the table as `{"columns": [...], "rows": [...]}`.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serializes the table as indented JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses a table previously written by [`Table::to_json`].
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Writes the table as CSV: a header of the columns, then one record per row.
    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(&self.columns)?;

        for row in &self.rows {
            let record = self.columns.iter().map(|col| {
                row.get(col)
                    .map(ToString::to_string)
                    .unwrap_or_default()
            });
            wtr.write_record(record)?;
        }

        wtr.flush()
            .map_err(|e| TushareError::Serialization(e.to_string()))
    }

    /// Renders the table as a CSV string.
    pub fn to_csv(&self) -> Result<String> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf)?;
        String::from_utf8(buf).map_err(|e| TushareError::Serialization(e.to_string()))
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
