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

use crate::score::{mle::fit_linear_gaussian, DecomposableScore};
use bnsl_core::prelude::Dataset;
use bnsl_model::prelude::{BayesianNetwork, NodeIndex};
use smallvec::SmallVec;
use std::f64::consts::PI;
use std::sync::Arc;

/// Bayesian Information Criterion for networks of linear-Gaussian nodes.
///
/// `local_score(v | parents)` is the maximized Gaussian log-likelihood of
/// the column of `v` regressed on its parents' columns, penalized by
/// `ln(n) / 2` per free parameter (`|parents| + 2`: coefficients,
/// intercept, variance). Model nodes are matched to dataset columns by
/// name.
#[derive(Debug, Clone)]
pub struct Bic {
    data: Arc<Dataset>,
}

impl Bic {
    #[inline]
    pub fn new(data: Arc<Dataset>) -> Self {
        Self { data }
    }

    #[inline]
    pub fn from_dataset(data: Dataset) -> Self {
        Self::new(Arc::new(data))
    }

    #[inline]
    pub fn data(&self) -> &Dataset {
        &self.data
    }

    fn column_of<M: BayesianNetwork>(&self, model: &M, node: NodeIndex) -> usize {
        let name = model.name(node);
        match self.data.column_index(name) {
            Some(column) => column,
            None => panic!("Node '{}' has no column in the dataset", name),
        }
    }
}

impl<M: BayesianNetwork> DecomposableScore<M> for Bic {
    fn local_score_with_parents(
        &self,
        model: &M,
        node: NodeIndex,
        parents: &[NodeIndex],
    ) -> f64 {
        let target = self.column_of(model, node);
        let evidence: SmallVec<[usize; 8]> =
            parents.iter().map(|&p| self.column_of(model, p)).collect();

        let fit = fit_linear_gaussian(&self.data, target, &evidence);
        let n = self.data.num_rows() as f64;

        let loglik = (1.0 - n) / 2.0 - (n / 2.0) * (2.0 * PI).ln() - n * fit.variance.sqrt().ln();
        loglik - n.ln() * 0.5 * (parents.len() as f64 + 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bnsl_core::prelude::stats;
    use bnsl_model::prelude::GaussianNetwork;

    fn ni(i: usize) -> NodeIndex {
        NodeIndex(i)
    }

    fn simple_setup() -> (GaussianNetwork, Bic) {
        let x = vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let y: Vec<f64> = x.iter().map(|v| 1.0 + 2.0 * v).collect();
        let data = Dataset::new([("x", x), ("y", y)]).unwrap();
        let model = GaussianNetwork::new(["x", "y"]).unwrap();
        (model, Bic::from_dataset(data))
    }

    #[test]
    fn test_marginal_score_matches_closed_form() {
        let (model, bic) = simple_setup();
        let n = 6.0;
        let variance = stats::variance(bic.data().column(0));
        let expected = (1.0 - n) / 2.0 - (n / 2.0) * (2.0 * PI).ln() - n * variance.sqrt().ln()
            - n.ln() * 0.5 * 2.0;
        let actual = bic.local_score_with_parents(&model, ni(0), &[]);
        assert!((actual - expected).abs() < 1e-12);
    }

    #[test]
    fn test_true_parent_improves_score() {
        // y is a deterministic function of x: conditioning on x must beat
        // the marginal model by far more than the extra-parameter penalty.
        let (model, bic) = simple_setup();
        let with_parent = bic.local_score_with_parents(&model, ni(1), &[ni(0)]);
        let marginal = bic.local_score_with_parents(&model, ni(1), &[]);
        assert!(with_parent > marginal);
    }

    #[test]
    fn test_penalty_caps_spurious_parent_gain() {
        let x = vec![1.0, -2.0, 0.5, 3.0, -1.0, 2.0, -0.5, 1.5];
        let z = vec![0.3, 0.1, -0.2, 0.4, -0.1, 0.0, 0.2, -0.3];
        let y = vec![2.0, -4.1, 1.2, 5.9, -2.1, 4.0, -0.9, 3.1];
        let data = Dataset::new([("x", x), ("z", z), ("y", y)]).unwrap();
        let model = GaussianNetwork::new(["x", "z", "y"]).unwrap();
        let bic = Bic::from_dataset(data);

        let one_parent = bic.local_score_with_parents(&model, ni(2), &[ni(0)]);
        let two_parents = bic.local_score_with_parents(&model, ni(2), &[ni(0), ni(1)]);
        // The extra regressor can only shrink the residual, but the score
        // gain is bounded by the likelihood gain minus one more penalty
        // unit of ln(n)/2.
        let n = 8.0f64;
        assert!(two_parents - one_parent < n.ln() * 0.5);
    }

    #[test]
    fn test_local_score_uses_current_parents() {
        let (mut model, bic) = simple_setup();
        let detached = bic.local_score(&model, ni(1));
        model.add_arc(ni(0), ni(1));
        let attached = bic.local_score(&model, ni(1));
        assert!((detached - bic.local_score_with_parents(&model, ni(1), &[])).abs() < 1e-12);
        assert!(attached > detached);
    }

    #[test]
    #[should_panic(expected = "has no column")]
    fn test_missing_column_panics() {
        let data = Dataset::new([("x", vec![1.0, 2.0])]).unwrap();
        let model = GaussianNetwork::new(["x", "q"]).unwrap();
        let bic = Bic::from_dataset(data);
        let _ = bic.local_score_with_parents(&model, ni(1), &[]);
    }
}
