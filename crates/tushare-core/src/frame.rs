//! Conversion of a [`Table`] into a polars [`DataFrame`].
//!
//! Column dtypes are inferred from the non-null cells: all integers become
//! `i64`, any mix of numbers becomes `f64`, all booleans become `bool`, and
//! everything else is rendered as text. Absent keys and nulls become nulls.

use polars::prelude::*;

use crate::{
    error::{Result, TushareError},
    table::Table,
    value::Scalar,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Inferred {
    Int,
    Float,
    Bool,
    Text,
}

fn infer(cells: &[Option<&Scalar>]) -> Inferred {
    let mut inferred: Option<Inferred> = None;

    for cell in cells.iter().flatten() {
        let kind = match cell {
            Scalar::Null => continue,
            Scalar::Int(_) => Inferred::Int,
            Scalar::Float(_) => Inferred::Float,
            Scalar::Bool(_) => Inferred::Bool,
            Scalar::Text(_) => return Inferred::Text,
        };
        inferred = Some(match (inferred, kind) {
            (None, k) => k,
            (Some(a), b) if a == b => a,
            (Some(Inferred::Int | Inferred::Float), Inferred::Int | Inferred::Float) => {
                Inferred::Float
            }
            _ => return Inferred::Text,
        });
    }

    inferred.unwrap_or(Inferred::Text)
}

fn to_column(name: &str, cells: &[Option<&Scalar>]) -> Column {
    let name = PlSmallStr::from(name);

    match infer(cells) {
        Inferred::Int => {
            let values: Vec<Option<i64>> = cells
                .iter()
                .map(|c| match c {
                    Some(Scalar::Int(i)) => Some(*i),
                    _ => None,
                })
                .collect();
            Column::new(name, values)
        }
        Inferred::Float => {
            let values: Vec<Option<f64>> = cells
                .iter()
                .map(|c| c.and_then(Scalar::as_f64))
                .collect();
            Column::new(name, values)
        }
        Inferred::Bool => {
            let values: Vec<Option<bool>> = cells
                .iter()
                .map(|c| match c {
                    Some(Scalar::Bool(b)) => Some(*b),
                    _ => None,
                })
                .collect();
            Column::new(name, values)
        }
        Inferred::Text => {
            let values: Vec<Option<String>> = cells
                .iter()
                .map(|c| c.filter(|s| !s.is_null()).map(ToString::to_string))
                .collect();
            Column::new(name, values)
        }
    }
}

impl Table {
    /// Converts the table into a [`DataFrame`] with one column per schema field.
    pub fn to_polars(&self) -> Result<DataFrame> {
        let columns = self
            .columns()
            .iter()
            .map(|name| to_column(name, &self.column(name)))
            .collect();

        DataFrame::new(columns).map_err(|e| TushareError::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dtype_inference() {
        let table = Table::from_items(
            vec![
                "ts_code".to_string(),
                "vol".to_string(),
                "close".to_string(),
                "flag".to_string(),
            ],
            vec![
                vec![
                    Scalar::from("000001.SZ"),
                    Scalar::Int(100),
                    Scalar::Int(10),
                    Scalar::Bool(true),
                ],
                vec![
                    Scalar::from("000002.SZ"),
                    Scalar::Null,
                    Scalar::Float(10.5),
                ],
            ],
        );

        let df = table.to_polars().unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 4);
        assert_eq!(df.column("ts_code").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("vol").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("close").unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column("flag").unwrap().dtype(), &DataType::Boolean);
        assert_eq!(df.column("vol").unwrap().null_count(), 1);
        assert_eq!(df.column("flag").unwrap().null_count(), 1);
    }

    #[test]
    fn test_empty_table() {
        let table = Table::new(vec!["ts_code".to_string()], Vec::new());
        let df = table.to_polars().unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(df.get_column_names()[0].as_str(), "ts_code");
    }
}
