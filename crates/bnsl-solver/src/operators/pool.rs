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
    operators::{op::Operator, tabu::OperatorTabuSet, traits::OperatorSet},
    score::{cache::LocalScoreCache, DecomposableScore},
};
use bnsl_model::prelude::{BayesianNetwork, NodeIndex};

/// Composition of operator sets sharing one local-score cache.
///
/// The pool is the cache's only writer; every set reads it through the
/// references the pool hands out. `update_scores` refreshes the cache
/// before any set sees the update, so set refresh logic may assume the
/// cache already reflects the applied operator.
pub struct OperatorPool<M, S> {
    score: S,
    local_cache: LocalScoreCache,
    op_sets: Vec<Box<dyn OperatorSet<M>>>,
}

impl<M, S> OperatorPool<M, S>
where
    M: BayesianNetwork,
    S: DecomposableScore<M>,
{
    pub fn new(model: &M, score: S, op_sets: Vec<Box<dyn OperatorSet<M>>>) -> Self {
        Self {
            score,
            local_cache: LocalScoreCache::new(model.num_nodes()),
            op_sets,
        }
    }

    #[inline]
    pub fn num_sets(&self) -> usize {
        self.op_sets.len()
    }

    #[inline]
    pub fn local_cache(&self) -> &LocalScoreCache {
        &self.local_cache
    }

    /// Seed the local cache, then every set's delta store.
    pub fn cache_scores(&mut self, model: &M) {
        self.local_cache.cache_local_scores(model, &self.score);
        for op_set in &mut self.op_sets {
            op_set.cache_scores(model, &self.local_cache);
        }
    }

    /// Best legal candidate across all sets; ties keep the earliest set.
    pub fn find_max(&mut self, model: &M) -> Option<Operator> {
        let mut max_delta = f64::NEG_INFINITY;
        let mut max_op = None;

        for op_set in &mut self.op_sets {
            if let Some(op) = op_set.find_max(model) {
                if op.delta() > max_delta {
                    max_delta = op.delta();
                    max_op = Some(op);
                }
            }
        }

        max_op
    }

    /// Tabu-aware variant of [`OperatorPool::find_max`]; an empty tabu set
    /// short-circuits to the plain search.
    pub fn find_max_with_tabu(
        &mut self,
        model: &M,
        tabu: &OperatorTabuSet,
    ) -> Option<Operator> {
        if tabu.is_empty() {
            return self.find_max(model);
        }

        let mut max_delta = f64::NEG_INFINITY;
        let mut max_op = None;

        for op_set in &mut self.op_sets {
            if let Some(op) = op_set.find_max_with_tabu(model, tabu) {
                if op.delta() > max_delta {
                    max_delta = op.delta();
                    max_op = Some(op);
                }
            }
        }

        max_op
    }

    /// Fold an applied operator in: local cache first, then every set.
    pub fn update_scores(&mut self, model: &M, op: &Operator) {
        self.local_cache.update_after_operator(model, &self.score, op);
        for op_set in &mut self.op_sets {
            op_set.update_scores(model, &self.local_cache, op);
        }
    }

    /// Total score as tracked incrementally by the cache.
    #[inline]
    pub fn score(&self) -> f64 {
        self.local_cache.sum()
    }

    /// Total score recomputed from scratch, bypassing the cache. The
    /// independent oracle the consistency tests compare against.
    pub fn score_of(&self, model: &M) -> f64 {
        (0..model.num_nodes())
            .map(|i| self.score.local_score(model, NodeIndex(i)))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        operators::arc_set::ArcOperatorSet,
        score::bic::Bic,
    };
    use bnsl_core::prelude::Dataset;
    use bnsl_model::prelude::GaussianNetwork;

    fn ni(i: usize) -> NodeIndex {
        NodeIndex(i)
    }

    const NO_ARCS: &[(&str, &str)] = &[];

    fn abc_data() -> Dataset {
        let a = vec![
            1.3, -0.2, 0.7, -1.8, 0.4, 2.1, -0.9, 0.0, 1.1, -1.3, 0.8, -0.5,
        ];
        let b: Vec<f64> = a.iter().map(|v| -1.5 * v + 0.2).collect();
        let c = vec![
            0.1, 0.9, -0.4, 0.6, -1.0, 0.3, 0.8, -0.7, 0.2, 1.2, -0.1, 0.5,
        ];
        Dataset::new([("a", a), ("b", b), ("c", c)]).unwrap()
    }

    fn make_pool(
        model: &GaussianNetwork,
        whitelist: &[(&str, &str)],
        blacklist: &[(&str, &str)],
    ) -> OperatorPool<GaussianNetwork, Bic> {
        let bic = Bic::from_dataset(abc_data());
        let arcs =
            ArcOperatorSet::new(model, bic.clone(), whitelist, blacklist, 0).unwrap();
        OperatorPool::new(model, bic, vec![Box::new(arcs)])
    }

    #[test]
    fn test_cache_scores_matches_oracle() {
        let model = GaussianNetwork::new(["a", "b", "c"]).unwrap();
        let mut pool = make_pool(&model, NO_ARCS, NO_ARCS);
        pool.cache_scores(&model);
        assert!((pool.score() - pool.score_of(&model)).abs() < 1e-9);
    }

    #[test]
    fn test_cache_stays_consistent_across_steps() {
        let mut model = GaussianNetwork::new(["a", "b", "c"]).unwrap();
        let mut pool = make_pool(&model, NO_ARCS, NO_ARCS);
        pool.cache_scores(&model);

        for _ in 0..4 {
            let Some(op) = pool.find_max(&model) else {
                break;
            };
            if op.delta() <= 0.0 {
                break;
            }
            op.apply(&mut model).unwrap();
            pool.update_scores(&model, &op);
            assert!((pool.score() - pool.score_of(&model)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_applied_delta_matches_score_change() {
        let mut model = GaussianNetwork::new(["a", "b", "c"]).unwrap();
        let mut pool = make_pool(&model, NO_ARCS, NO_ARCS);
        pool.cache_scores(&model);

        let before = pool.score();
        let op = pool.find_max(&model).unwrap();
        op.apply(&mut model).unwrap();
        pool.update_scores(&model, &op);
        let after = pool.score();

        assert!((after - before - op.delta()).abs() < 1e-9);
    }

    #[test]
    fn test_empty_tabu_delegates_to_plain_search() {
        let model = GaussianNetwork::new(["a", "b", "c"]).unwrap();
        let mut pool = make_pool(&model, NO_ARCS, NO_ARCS);
        pool.cache_scores(&model);

        let plain = pool.find_max(&model);
        let with_empty = pool.find_max_with_tabu(&model, &OperatorTabuSet::new());
        assert_eq!(plain, with_empty);
    }

    #[test]
    fn test_tabu_forces_second_best() {
        let model = GaussianNetwork::new(["a", "b", "c"]).unwrap();
        let mut pool = make_pool(&model, NO_ARCS, NO_ARCS);
        pool.cache_scores(&model);

        let best = pool.find_max(&model).unwrap();
        let mut tabu = OperatorTabuSet::new();
        tabu.insert(best.clone());
        let second = pool.find_max_with_tabu(&model, &tabu).unwrap();
        assert_ne!(second, best);
        assert!(second.delta() <= best.delta());
    }

    #[test]
    fn test_blacklist_respected_through_pool() {
        // Scenario: a -> b present, a -> c blacklisted. AddArc(a, c) must
        // never surface, AddArc(c, a) may.
        let model =
            GaussianNetwork::with_arcs(["a", "b", "c"], &[("a", "b")]).unwrap();
        let mut pool = make_pool(&model, NO_ARCS, &[("a", "c")]);
        pool.cache_scores(&model);

        let mut tabu = OperatorTabuSet::new();
        while let Some(op) = pool.find_max_with_tabu(&model, &tabu) {
            if let Operator::AddArc { source, target, .. } = &op {
                assert!(
                    !(*source == ni(0) && *target == ni(2)),
                    "blacklisted arc proposed: {}",
                    op
                );
            }
            tabu.insert(op);
        }
    }

    #[test]
    fn test_whitelist_pins_arc_through_pool() {
        // Scenario: a -> b and a -> c present, a -> b whitelisted. Neither
        // RemoveArc(a, b) nor FlipArc(a, b) may surface; RemoveArc(a, c)
        // may.
        let model =
            GaussianNetwork::with_arcs(["a", "b", "c"], &[("a", "b"), ("a", "c")])
                .unwrap();
        let mut pool = make_pool(&model, &[("a", "b")], NO_ARCS);
        pool.cache_scores(&model);

        let mut tabu = OperatorTabuSet::new();
        let mut saw_remove_ac = false;
        while let Some(op) = pool.find_max_with_tabu(&model, &tabu) {
            match &op {
                Operator::RemoveArc { source, target, .. }
                | Operator::FlipArc { source, target, .. } => {
                    assert!(
                        !(*source == ni(0) && *target == ni(1)),
                        "whitelisted arc touched: {}",
                        op
                    );
                    if op.kind() == crate::operators::op::OperatorKind::RemoveArc
                        && *source == ni(0)
                        && *target == ni(2)
                    {
                        saw_remove_ac = true;
                    }
                }
                _ => {}
            }
            tabu.insert(op);
        }
        assert!(saw_remove_ac);
    }

    #[test]
    fn test_flip_round_trip_restores_model_and_cache() {
        // Scenario: apply FlipArc(a, b), then FlipArc(b, a); graph and
        // cache return to the pre-flip state.
        let model0 =
            GaussianNetwork::with_arcs(["a", "b", "c"], &[("a", "b")]).unwrap();
        let mut model = model0.clone();
        let mut pool = make_pool(&model, NO_ARCS, NO_ARCS);
        pool.cache_scores(&model);
        let initial_score = pool.score();

        let flip = Operator::FlipArc {
            source: ni(0),
            target: ni(1),
            delta: 0.0,
        };
        flip.apply(&mut model).unwrap();
        pool.update_scores(&model, &flip);

        let back = flip.opposite();
        back.apply(&mut model).unwrap();
        pool.update_scores(&model, &back);

        assert_eq!(model, model0);
        assert!((pool.score() - initial_score).abs() < 1e-9);
        assert!((pool.score() - pool.score_of(&model)).abs() < 1e-9);
    }

    #[test]
    fn test_empty_pool_returns_none() {
        let model = GaussianNetwork::new(["a", "b"]).unwrap();
        let bic = Bic::from_dataset(
            Dataset::new([("a", vec![0.0, 1.0]), ("b", vec![1.0, 0.0])]).unwrap(),
        );
        let mut pool: OperatorPool<GaussianNetwork, Bic> =
            OperatorPool::new(&model, bic, Vec::new());
        pool.cache_scores(&model);
        assert_eq!(pool.num_sets(), 0);
        assert_eq!(pool.find_max(&model), None);
    }
}
