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
    operators::{op::Operator, tabu::OperatorTabuSet},
    score::cache::LocalScoreCache,
};
use bnsl_model::prelude::BayesianNetwork;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorSetKind {
    Arcs,
    NodeType,
}

impl std::fmt::Display for OperatorSetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperatorSetKind::Arcs => write!(f, "arcs"),
            OperatorSetKind::NodeType => write!(f, "node_type"),
        }
    }
}

/// A family of candidate moves maintaining its own delta store.
///
/// The pool drives the lifecycle: one `cache_scores` seed, then any number
/// of `find_max` queries interleaved with `update_scores` notifications,
/// each after the chosen operator has been applied to the model. The
/// local-score cache passed in is always current for the model — the pool
/// refreshes it before fanning an update out (the sets only read it).
pub trait OperatorSet<M: BayesianNetwork> {
    fn kind(&self) -> OperatorSetKind;

    /// Price every candidate against the current model.
    fn cache_scores(&mut self, model: &M, cache: &LocalScoreCache);

    /// Best legal candidate, or `None` when no candidate is legal or every
    /// delta is unbounded-below. Sorting scratch is reused in place, hence
    /// `&mut self`.
    fn find_max(&mut self, model: &M) -> Option<Operator>;

    /// Like [`OperatorSet::find_max`], additionally skipping members of
    /// `tabu`.
    fn find_max_with_tabu(&mut self, model: &M, tabu: &OperatorTabuSet) -> Option<Operator>;

    /// Refresh the deltas invalidated by `op`, which has already been
    /// applied to `model` and folded into `cache`.
    fn update_scores(&mut self, model: &M, cache: &LocalScoreCache, op: &Operator);
}
