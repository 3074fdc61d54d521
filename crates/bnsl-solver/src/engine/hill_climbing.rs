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
    operators::{pool::OperatorPool, tabu::OperatorTabuSet},
    score::DecomposableScore,
};
use bnsl_model::prelude::{BayesianNetwork, NodeTypeUnsupportedError};

/// Greedy structure search over an operator pool.
///
/// Repeats find-best / apply / update until no candidate clears `epsilon`.
/// With a positive `patience` the walk may take that many non-improving
/// moves before giving up, keeping each taken move's undo in a tabu set so
/// the walk cannot immediately retrace it; the best model seen is restored
/// at the end.
#[derive(Debug, Clone)]
pub struct GreedyHillClimbing {
    max_iterations: usize,
    epsilon: f64,
    patience: usize,
}

impl Default for GreedyHillClimbing {
    fn default() -> Self {
        Self::new()
    }
}

impl GreedyHillClimbing {
    pub fn new() -> Self {
        Self {
            max_iterations: 0,
            epsilon: 0.0,
            patience: 0,
        }
    }

    /// `0` means unlimited.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Minimum delta a move must clear to count as an improvement.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon.max(0.0);
        self
    }

    /// Number of consecutive non-improving moves tolerated before the
    /// search stops.
    pub fn with_patience(mut self, patience: usize) -> Self {
        self.patience = patience;
        self
    }

    /// Run the search from the current state of `model`, leaving the best
    /// model found in it, and return that model's score.
    ///
    /// The pool is re-seeded against the returned model whenever the tabu
    /// walk ended somewhere else, so pool and model stay consistent.
    #[tracing::instrument(level = "debug", name = "Greedy Hill Climbing", skip(self, model, pool))]
    pub fn estimate<M, S>(
        &self,
        model: &mut M,
        pool: &mut OperatorPool<M, S>,
    ) -> Result<f64, NodeTypeUnsupportedError>
    where
        M: BayesianNetwork + Clone,
        S: DecomposableScore<M>,
    {
        if pool.num_sets() == 0 {
            tracing::warn!("hill climbing: no operator sets configured");
        }

        pool.cache_scores(model);
        let mut best_model = model.clone();
        let mut best_score = pool.score();
        let mut tabu = OperatorTabuSet::new();
        let mut non_improving = 0usize;
        let mut iterations = 0usize;
        // Whether the walker has wandered away from the best snapshot.
        let mut off_best = false;

        loop {
            if self.max_iterations > 0 && iterations >= self.max_iterations {
                break;
            }
            let Some(op) = pool.find_max_with_tabu(model, &tabu) else {
                break;
            };

            if op.delta() > self.epsilon {
                op.apply(model)?;
                pool.update_scores(model, &op);
                iterations += 1;
                let current = pool.score();
                tracing::debug!(
                    delta = op.delta(),
                    score = current,
                    "applied {}",
                    op.describe(model)
                );
                if current > best_score {
                    best_score = current;
                    best_model = model.clone();
                    tabu.clear();
                    non_improving = 0;
                    off_best = false;
                }
            } else if non_improving < self.patience {
                non_improving += 1;
                off_best = true;
                tabu.insert(op.opposite());
                op.apply(model)?;
                pool.update_scores(model, &op);
                iterations += 1;
                tracing::debug!(
                    delta = op.delta(),
                    non_improving,
                    "tabu walk {}",
                    op.describe(model)
                );
            } else {
                break;
            }
        }

        *model = best_model;
        if off_best {
            pool.cache_scores(model);
        }
        tracing::debug!(score = best_score, iterations, "search finished");
        Ok(best_score)
    }
}
