//! Decoded query results.

use std::collections::HashMap;

use crate::types::ColumnType;
use crate::value::Value;

/// The decoded outcome of one query.
///
/// `column_names`, `column_types` and `column_lengths` are parallel and always
/// have the same length; every row in `data` has exactly that many cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    /// Status code from the body. Zero on success.
    pub code: i32,
    pub desc: String,
    pub column_names: Vec<String>,
    pub column_types: Vec<ColumnType>,
    /// Declared byte length per column. Not enforced against cell contents.
    pub column_lengths: Vec<i64>,
    pub data: Vec<Vec<Value>>,
    /// Row count reported by the server. Informational; not checked against `data`.
    pub rows: i64,
}

impl QueryResult {
    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.column_names.len()
    }

    /// Number of decoded rows.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if no rows were decoded.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get column index by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.column_names.iter().position(|c| c == name)
    }

    /// Cell at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> Option<&Value> {
        self.data.get(row)?.get(col)
    }

    /// Cell at `row` in the column called `name`.
    pub fn get_by_name(&self, row: usize, name: &str) -> Option<&Value> {
        self.get(row, self.column_index(name)?)
    }

    /// Rows as name → value maps.
    pub fn to_maps(&self) -> Vec<HashMap<&str, &Value>> {
        self.data
            .iter()
            .map(|row| {
                self.column_names
                    .iter()
                    .map(String::as_str)
                    .zip(row.iter())
                    .collect()
            })
            .collect()
    }

    /// Affected-row count of a write statement.
    ///
    /// Write responses carry exactly one row with one `Int` cell.
    pub fn affected_rows(&self) -> Option<i32> {
        match self.data.as_slice() {
            [row] => match row.as_slice() {
                [Value::Int(n)] => Some(*n),
                _ => None,
            },
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> QueryResult {
        QueryResult {
            column_names: vec!["ts".into(), "v".into()],
            column_types: vec![ColumnType::Timestamp, ColumnType::Int],
            column_lengths: vec![8, 4],
            data: vec![vec![Value::Null, Value::Int(1)], vec![Value::Null, Value::Null]],
            rows: 2,
            ..Default::default()
        }
    }

    #[test]
    fn test_get_by_name() {
        let result = sample();
        assert_eq!(result.column_index("v"), Some(1));
        assert_eq!(result.get_by_name(0, "v"), Some(&Value::Int(1)));
        assert_eq!(result.get_by_name(0, "missing"), None);
        assert_eq!(result.get(5, 0), None);
    }

    #[test]
    fn test_to_maps() {
        let result = sample();
        let maps = result.to_maps();
        assert_eq!(maps.len(), 2);
        assert_eq!(maps[0]["v"], &Value::Int(1));
        assert!(maps[1]["v"].is_null());
    }

    #[test]
    fn test_affected_rows() {
        let write = QueryResult {
            column_names: vec!["affected_rows".into()],
            column_types: vec![ColumnType::Int],
            column_lengths: vec![4],
            data: vec![vec![Value::Int(3)]],
            rows: 1,
            ..Default::default()
        };
        assert_eq!(write.affected_rows(), Some(3));
        assert_eq!(sample().affected_rows(), None);
    }
}
