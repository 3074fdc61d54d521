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

use crate::operators::op::Operator;
use std::collections::HashSet;

/// Set of moves forbidden at the current search step.
///
/// Membership follows [`Operator`] identity: kind plus edit fields, never
/// the delta. Cloning a tabu set clones the operator values themselves.
#[derive(Debug, Clone, Default)]
pub struct OperatorTabuSet {
    operators: HashSet<Operator>,
}

impl OperatorTabuSet {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn insert(&mut self, op: Operator) {
        self.operators.insert(op);
    }

    #[inline]
    pub fn contains(&self, op: &Operator) -> bool {
        self.operators.contains(op)
    }

    #[inline]
    pub fn clear(&mut self) {
        self.operators.clear();
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.operators.len()
    }
}
