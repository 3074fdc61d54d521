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

use crate::{common::NodeIndex, err::DuplicateNodeError};
use std::collections::HashMap;

/// Bidirectional name <-> dense-index table shared by every network kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeTable {
    names: Vec<String>,
    indices: HashMap<String, NodeIndex>,
}

impl NodeTable {
    pub fn new<I, S>(names: I) -> Result<Self, DuplicateNodeError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let mut indices = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            if indices.insert(name.clone(), NodeIndex(i)).is_some() {
                return Err(DuplicateNodeError::new(name.clone()));
            }
        }
        Ok(Self { names, indices })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    #[inline]
    pub fn name(&self, node: NodeIndex) -> &str {
        &self.names[node.get()]
    }

    #[inline]
    pub fn index(&self, name: &str) -> Option<NodeIndex> {
        self.indices.get(name).copied()
    }

    #[inline]
    pub fn indices(&self) -> &HashMap<String, NodeIndex> {
        &self.indices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_names_and_indices() {
        let table = NodeTable::new(["a", "b", "c"]).unwrap();
        assert_eq!(table.len(), 3);
        assert!(!table.is_empty());
        assert_eq!(table.name(NodeIndex(1)), "b");
        assert_eq!(table.index("c"), Some(NodeIndex(2)));
        assert_eq!(table.index("missing"), None);
        assert_eq!(table.indices().len(), 3);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let err = NodeTable::new(["a", "b", "a"]).unwrap_err();
        assert_eq!(err.name(), "a");
    }

    #[test]
    fn test_empty_table() {
        let table = NodeTable::new(Vec::<String>::new()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.index("a"), None);
    }
}
