//! Row representation returned from a query or stubbed by a dry-run context.

use crate::value::Value;
use std::collections::HashMap;

/// A single row, addressable by column index or name.
///
/// The dry-run context's `query_row` returns a `Row` that yields "no rows"
/// when scanned; this is modeled as a `Row` with zero columns, so
/// `get`/`get_by_name` always return `None`.
#[derive(Debug, Clone, Default)]
pub struct Row {
    values: Vec<Value>,
    columns: HashMap<String, usize>,
}

impl Row {
    #[must_use]
    pub fn new(column_names: Vec<String>, values: Vec<Value>) -> Self {
        let columns = column_names
            .into_iter()
            .enumerate()
            .map(|(i, name)| (name, i))
            .collect();
        Self { values, columns }
    }

    /// A row with no columns — used as the stub for a dry-run `query_row`.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<&Value> {
        self.columns.get(name).and_then(|&i| self.values.get(i))
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        let mut names: Vec<_> = self.columns.iter().collect();
        names.sort_by_key(|(_, i)| *i);
        names.into_iter().map(|(name, _)| name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_row_yields_no_rows() {
        let row = Row::empty();
        assert!(row.is_empty());
        assert_eq!(row.get(0), None);
        assert_eq!(row.get_by_name("id"), None);
    }

    #[test]
    fn test_row_access_by_index_and_name() {
        let row = Row::new(
            vec!["id".to_string(), "name".to_string()],
            vec![Value::BigInt(1), Value::Text("hero".to_string())],
        );
        assert_eq!(row.len(), 2);
        assert_eq!(row.get(0), Some(&Value::BigInt(1)));
        assert_eq!(row.get_by_name("name"), Some(&Value::Text("hero".to_string())));
        assert_eq!(row.get_by_name("missing"), None);
    }

    #[test]
    fn test_column_names_in_order() {
        let row = Row::new(
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
            vec![Value::Null, Value::Null, Value::Null],
        );
        let names: Vec<&str> = row.column_names().collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }
}
