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

use bnsl_model::prelude::{BayesianNetwork, FactorType, NodeIndex, TypedBayesianNetwork};

pub mod bic;
pub mod cache;
pub mod mle;

/// A decomposable structure score: the total score is the sum of per-node
/// local scores, and a local score depends only on the node and its parent
/// set. The search core requires this property; everything incremental in
/// it falls out of it.
pub trait DecomposableScore<M: BayesianNetwork> {
    /// Local score of `node` with its current parents in `model`.
    fn local_score(&self, model: &M, node: NodeIndex) -> f64 {
        self.local_score_with_parents(model, node, &model.parent_indices(node))
    }

    /// Local score of `node` under an explicit hypothetical parent set,
    /// without mutating the model.
    fn local_score_with_parents(&self, model: &M, node: NodeIndex, parents: &[NodeIndex])
        -> f64;
}

/// Scores that can evaluate a node under an overridden factor type, which
/// is what the node-type operators need to price a type flip.
pub trait FactorTypeScore<M: TypedBayesianNetwork>: DecomposableScore<M> {
    fn local_score_with_type(
        &self,
        model: &M,
        node_type: FactorType,
        node: NodeIndex,
        parents: &[NodeIndex],
    ) -> f64;
}
