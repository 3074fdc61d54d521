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

use crate::{
    operators::{
        op::Operator,
        tabu::OperatorTabuSet,
        traits::{OperatorSet, OperatorSetKind},
    },
    score::{cache::LocalScoreCache, FactorTypeScore},
};
use bnsl_model::prelude::{NodeIndex, TypedBayesianNetwork, UnknownNodeError};
use nalgebra::DVector;

/// Node-type flips over a factor-typed model.
///
/// `delta[i]` prices re-modeling node `i` with the opposite factor type
/// under its current parent set. Nodes named in the type whitelist keep
/// their type pinned and stay at negative infinity.
#[derive(Debug, Clone)]
pub struct ChangeNodeTypeSet<S> {
    score: S,
    delta: DVector<f64>,
    valid_op: Vec<bool>,
    sorted_idx: Vec<usize>,
}

impl<S> ChangeNodeTypeSet<S> {
    /// Names not present in the model fail construction.
    pub fn new<M, A>(model: &M, score: S, type_whitelist: &[A]) -> Result<Self, UnknownNodeError>
    where
        M: TypedBayesianNetwork,
        A: AsRef<str>,
    {
        let n = model.num_nodes();
        let mut valid_op = vec![true; n];
        let delta = DVector::from_element(n, f64::NEG_INFINITY);

        for name in type_whitelist {
            let node = model
                .index(name.as_ref())
                .ok_or_else(|| UnknownNodeError::new(name.as_ref()))?;
            valid_op[node.get()] = false;
        }

        let sorted_idx = (0..n).filter(|&i| valid_op[i]).collect();

        Ok(Self {
            score,
            delta,
            valid_op,
            sorted_idx,
        })
    }
}

impl<S> ChangeNodeTypeSet<S> {
    fn update_local_delta<M>(&mut self, model: &M, cache: &LocalScoreCache, node: NodeIndex)
    where
        M: TypedBayesianNetwork,
        S: FactorTypeScore<M>,
    {
        let parents = model.parent_indices(node);
        let flipped = model.node_type(node).opposite();
        self.delta[node.get()] = self
            .score
            .local_score_with_type(model, flipped, node, &parents)
            - cache.local_score(node);
    }

    fn candidate<M>(&self, model: &M, node: NodeIndex) -> Operator
    where
        M: TypedBayesianNetwork,
    {
        Operator::ChangeNodeType {
            node,
            new_type: model.node_type(node).opposite(),
            delta: self.delta[node.get()],
        }
    }
}

impl<M, S> OperatorSet<M> for ChangeNodeTypeSet<S>
where
    M: TypedBayesianNetwork,
    S: FactorTypeScore<M>,
{
    #[inline]
    fn kind(&self) -> OperatorSetKind {
        OperatorSetKind::NodeType
    }

    fn cache_scores(&mut self, model: &M, cache: &LocalScoreCache) {
        for i in 0..model.num_nodes() {
            if self.valid_op[i] {
                self.update_local_delta(model, cache, NodeIndex(i));
            }
        }
    }

    fn find_max(&mut self, model: &M) -> Option<Operator> {
        if self.delta.is_empty() {
            return None;
        }
        let (node, best) = self.delta.argmax();
        if !self.valid_op[node] || best == f64::NEG_INFINITY {
            return None;
        }
        Some(self.candidate(model, NodeIndex(node)))
    }

    fn find_max_with_tabu(&mut self, model: &M, tabu: &OperatorTabuSet) -> Option<Operator> {
        let deltas = &self.delta;
        self.sorted_idx
            .sort_by(|&a, &b| deltas[b].total_cmp(&deltas[a]).then_with(|| a.cmp(&b)));

        for &node in &self.sorted_idx {
            // Sorted descending: everything past here is knocked out.
            if self.delta[node] == f64::NEG_INFINITY {
                break;
            }
            let candidate = self.candidate(model, NodeIndex(node));
            if !tabu.contains(&candidate) {
                return Some(candidate);
            }
        }
        None
    }

    fn update_scores(&mut self, model: &M, cache: &LocalScoreCache, op: &Operator) {
        match *op {
            Operator::AddArc { target, .. } | Operator::RemoveArc { target, .. } => {
                if self.valid_op[target.get()] {
                    self.update_local_delta(model, cache, target);
                }
            }
            Operator::FlipArc { source, target, .. } => {
                if self.valid_op[source.get()] {
                    self.update_local_delta(model, cache, source);
                }
                if self.valid_op[target.get()] {
                    self.update_local_delta(model, cache, target);
                }
            }
            Operator::ChangeNodeType { node, delta, .. } => {
                // The candidate from the flipped type is exactly the undo
                // of the applied move.
                if self.valid_op[node.get()] {
                    self.delta[node.get()] = -delta;
                }
            }
        }
    }
}
