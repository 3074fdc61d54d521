// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub enum DatasetError {
    DuplicateColumn { name: String },
    RaggedColumn { name: String, expected: usize, actual: usize },
}

impl std::fmt::Display for DatasetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetError::DuplicateColumn { name } => {
                write!(f, "Duplicate column name '{}'", name)
            }
            DatasetError::RaggedColumn {
                name,
                expected,
                actual,
            } => write!(
                f,
                "Column '{}' has {} rows, expected {}",
                name, actual, expected
            ),
        }
    }
}

impl std::error::Error for DatasetError {}

/// A fixed table of named, equal-length `f64` observation columns.
///
/// Columns are stored column-major so a score can hand a contiguous slice
/// per variable to its estimator.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    names: Vec<String>,
    name_to_column: HashMap<String, usize>,
    columns: Vec<Vec<f64>>,
    num_rows: usize,
}

impl Dataset {
    pub fn new<I, S>(columns: I) -> Result<Self, DatasetError>
    where
        I: IntoIterator<Item = (S, Vec<f64>)>,
        S: Into<String>,
    {
        let mut names = Vec::new();
        let mut name_to_column = HashMap::new();
        let mut data = Vec::new();
        let mut num_rows = None;

        for (name, values) in columns {
            let name = name.into();
            let expected = *num_rows.get_or_insert(values.len());
            if values.len() != expected {
                return Err(DatasetError::RaggedColumn {
                    name,
                    expected,
                    actual: values.len(),
                });
            }
            if name_to_column
                .insert(name.clone(), names.len())
                .is_some()
            {
                return Err(DatasetError::DuplicateColumn { name });
            }
            names.push(name);
            data.push(values);
        }

        Ok(Self {
            names,
            name_to_column,
            columns: data,
            num_rows: num_rows.unwrap_or(0),
        })
    }

    #[inline]
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    #[inline]
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    #[inline]
    pub fn column(&self, index: usize) -> &[f64] {
        &self.columns[index]
    }

    #[inline]
    pub fn column_name(&self, index: usize) -> &str {
        &self.names[index]
    }

    #[inline]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.name_to_column.get(name).copied()
    }

    #[inline]
    pub fn column_by_name(&self, name: &str) -> Option<&[f64]> {
        self.column_index(name).map(|i| self.column(i))
    }

    #[inline]
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(|n| n.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_dataset() -> Dataset {
        Dataset::new([
            ("a", vec![1.0, 2.0, 3.0]),
            ("b", vec![4.0, 5.0, 6.0]),
        ])
        .unwrap()
    }

    #[test]
    fn test_new_and_lookup() {
        let ds = make_dataset();
        assert_eq!(ds.num_rows(), 3);
        assert_eq!(ds.num_columns(), 2);
        assert_eq!(ds.column_name(1), "b");
        assert_eq!(ds.column_index("a"), Some(0));
        assert_eq!(ds.column_index("missing"), None);
        assert_eq!(ds.column_by_name("b"), Some(&[4.0, 5.0, 6.0][..]));
        assert_eq!(ds.column(0), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_empty_dataset() {
        let ds = Dataset::new(Vec::<(String, Vec<f64>)>::new()).unwrap();
        assert_eq!(ds.num_rows(), 0);
        assert_eq!(ds.num_columns(), 0);
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let err = Dataset::new([("x", vec![1.0]), ("x", vec![2.0])]).unwrap_err();
        assert_eq!(
            err,
            DatasetError::DuplicateColumn {
                name: "x".to_string()
            }
        );
    }

    #[test]
    fn test_ragged_column_rejected() {
        let err = Dataset::new([("x", vec![1.0, 2.0]), ("y", vec![3.0])]).unwrap_err();
        assert_eq!(
            err,
            DatasetError::RaggedColumn {
                name: "y".to_string(),
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn test_column_names_iteration() {
        let ds = make_dataset();
        let names: Vec<_> = ds.column_names().collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
