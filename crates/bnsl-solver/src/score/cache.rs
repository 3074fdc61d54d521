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

use crate::{operators::op::Operator, score::DecomposableScore};
use bnsl_model::prelude::{BayesianNetwork, NodeIndex};
use nalgebra::DVector;

/// Dense per-node local scores of the current model.
///
/// Owned and mutated by the operator pool; operator sets only read it.
/// After a seed or refresh, entry `i` equals
/// `score.local_score(model, i)` for the model's current parent set of `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalScoreCache {
    local_scores: DVector<f64>,
}

impl LocalScoreCache {
    #[inline]
    pub fn new(num_nodes: usize) -> Self {
        Self {
            local_scores: DVector::zeros(num_nodes),
        }
    }

    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.local_scores.len()
    }

    /// Seed every entry from the score function.
    pub fn cache_local_scores<M, S>(&mut self, model: &M, score: &S)
    where
        M: BayesianNetwork,
        S: DecomposableScore<M>,
    {
        for i in 0..model.num_nodes() {
            self.local_scores[i] = score.local_score(model, NodeIndex(i));
        }
    }

    /// Recompute a single entry against the model's current parent set.
    #[inline]
    pub fn update_local_score<M, S>(&mut self, model: &M, score: &S, node: NodeIndex)
    where
        M: BayesianNetwork,
        S: DecomposableScore<M>,
    {
        self.local_scores[node.get()] = score.local_score(model, node);
    }

    /// Recompute exactly the entries a just-applied operator invalidated:
    /// the target of an arc edit, both endpoints of a flip, the node of a
    /// type change.
    pub fn update_after_operator<M, S>(&mut self, model: &M, score: &S, op: &Operator)
    where
        M: BayesianNetwork,
        S: DecomposableScore<M>,
    {
        match *op {
            Operator::AddArc { target, .. } | Operator::RemoveArc { target, .. } => {
                self.update_local_score(model, score, target);
            }
            Operator::FlipArc { source, target, .. } => {
                self.update_local_score(model, score, source);
                self.update_local_score(model, score, target);
            }
            Operator::ChangeNodeType { node, .. } => {
                self.update_local_score(model, score, node);
            }
        }
    }

    #[inline]
    pub fn sum(&self) -> f64 {
        self.local_scores.sum()
    }

    #[inline]
    pub fn local_score(&self, node: NodeIndex) -> f64 {
        self.local_scores[node.get()]
    }
}
