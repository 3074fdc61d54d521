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

use fixedbitset::FixedBitSet;

/// Directed acyclic graph over dense node indices.
///
/// Arcs are mirrored in successor and predecessor bitset rows so that both
/// parent extraction and reachability walk contiguous bits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dag {
    successor_bits: Vec<FixedBitSet>,
    predecessor_bits: Vec<FixedBitSet>,
    num_arcs: usize,
}

impl Dag {
    #[inline]
    pub fn new(num_nodes: usize) -> Self {
        let mut successors = Vec::with_capacity(num_nodes);
        let mut predecessors = Vec::with_capacity(num_nodes);
        for _ in 0..num_nodes {
            successors.push(FixedBitSet::with_capacity(num_nodes));
            predecessors.push(FixedBitSet::with_capacity(num_nodes));
        }
        Self {
            successor_bits: successors,
            predecessor_bits: predecessors,
            num_arcs: 0,
        }
    }

    #[inline]
    pub fn num_nodes(&self) -> usize {
        debug_assert!(self.successor_bits.len() == self.predecessor_bits.len());

        self.successor_bits.len()
    }

    #[inline]
    pub fn num_arcs(&self) -> usize {
        self.num_arcs
    }

    #[inline]
    pub fn has_arc(&self, source: usize, target: usize) -> bool {
        self.successor_bits[source].contains(target)
    }

    #[inline]
    pub fn add_arc(&mut self, source: usize, target: usize) {
        debug_assert!(source != target);
        debug_assert!(!self.has_arc(source, target));

        self.successor_bits[source].insert(target);
        self.predecessor_bits[target].insert(source);
        self.num_arcs += 1;
    }

    #[inline]
    pub fn remove_arc(&mut self, source: usize, target: usize) {
        debug_assert!(self.has_arc(source, target));

        self.successor_bits[source].set(target, false);
        self.predecessor_bits[target].set(source, false);
        self.num_arcs -= 1;
    }

    #[inline]
    pub fn parents(&self, target: usize) -> impl Iterator<Item = usize> + '_ {
        self.predecessor_bits[target].ones()
    }

    #[inline]
    pub fn num_parents(&self, target: usize) -> usize {
        self.predecessor_bits[target].count_ones(..)
    }

    #[inline]
    pub fn children(&self, source: usize) -> impl Iterator<Item = usize> + '_ {
        self.successor_bits[source].ones()
    }

    /// Whether `to` is reachable from `from` along arcs. A node reaches
    /// itself trivially.
    pub fn has_path(&self, from: usize, to: usize) -> bool {
        if from == to {
            return true;
        }

        let mut visited = FixedBitSet::with_capacity(self.num_nodes());
        let mut stack = vec![from];
        visited.insert(from);

        while let Some(node) = stack.pop() {
            for child in self.children(node) {
                if child == to {
                    return true;
                }
                if !visited.contains(child) {
                    visited.insert(child);
                    stack.push(child);
                }
            }
        }

        false
    }

    /// Whether `source -> target` can be added without a self loop, a
    /// duplicate, or a cycle.
    #[inline]
    pub fn can_add_arc(&self, source: usize, target: usize) -> bool {
        source != target && !self.has_arc(source, target) && !self.has_path(target, source)
    }

    /// Whether the existing arc `source -> target` can be reversed. The
    /// reversal is illegal exactly when an alternative path
    /// `source -> ... -> target` survives the removal of the direct arc.
    pub fn can_flip_arc(&self, source: usize, target: usize) -> bool {
        if !self.has_arc(source, target) {
            return false;
        }

        let mut visited = FixedBitSet::with_capacity(self.num_nodes());
        let mut stack = Vec::new();
        visited.insert(source);
        for child in self.children(source) {
            if child != target {
                visited.insert(child);
                stack.push(child);
            }
        }

        while let Some(node) = stack.pop() {
            for child in self.children(node) {
                if child == target {
                    return false;
                }
                if !visited.contains(child) {
                    visited.insert(child);
                    stack.push(child);
                }
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(n: usize) -> Dag {
        let mut dag = Dag::new(n);
        for i in 0..n - 1 {
            dag.add_arc(i, i + 1);
        }
        dag
    }

    #[test]
    fn test_new_is_empty() {
        let dag = Dag::new(4);
        assert_eq!(dag.num_nodes(), 4);
        assert_eq!(dag.num_arcs(), 0);
        assert!(!dag.has_arc(0, 1));
        assert_eq!(dag.num_parents(0), 0);
    }

    #[test]
    fn test_add_and_remove_arc() {
        let mut dag = Dag::new(3);
        dag.add_arc(0, 2);
        assert!(dag.has_arc(0, 2));
        assert!(!dag.has_arc(2, 0));
        assert_eq!(dag.num_arcs(), 1);
        assert_eq!(dag.parents(2).collect::<Vec<_>>(), vec![0]);
        assert_eq!(dag.children(0).collect::<Vec<_>>(), vec![2]);

        dag.remove_arc(0, 2);
        assert!(!dag.has_arc(0, 2));
        assert_eq!(dag.num_arcs(), 0);
        assert_eq!(dag.num_parents(2), 0);
    }

    #[test]
    fn test_parents_are_ordered() {
        let mut dag = Dag::new(4);
        dag.add_arc(3, 1);
        dag.add_arc(0, 1);
        dag.add_arc(2, 1);
        assert_eq!(dag.parents(1).collect::<Vec<_>>(), vec![0, 2, 3]);
        assert_eq!(dag.num_parents(1), 3);
    }

    #[test]
    fn test_has_path_transitive() {
        let dag = chain(4);
        assert!(dag.has_path(0, 3));
        assert!(dag.has_path(1, 2));
        assert!(!dag.has_path(3, 0));
        assert!(dag.has_path(2, 2));
    }

    #[test]
    fn test_can_add_arc_rejects_cycles() {
        let dag = chain(3);
        // 2 -> 0 closes the chain into a cycle.
        assert!(!dag.can_add_arc(2, 0));
        assert!(!dag.can_add_arc(1, 0));
        assert!(dag.can_add_arc(0, 2));
        assert!(!dag.can_add_arc(0, 0));
        assert!(!dag.can_add_arc(0, 1)); // already present
    }

    #[test]
    fn test_can_flip_arc_direct_only() {
        let mut dag = Dag::new(2);
        dag.add_arc(0, 1);
        assert!(dag.can_flip_arc(0, 1));
        assert!(!dag.can_flip_arc(1, 0)); // no such arc
    }

    #[test]
    fn test_can_flip_arc_blocked_by_alternative_path() {
        // 0 -> 1 -> 2 and 0 -> 2: reversing 0 -> 2 would close a cycle.
        let mut dag = Dag::new(3);
        dag.add_arc(0, 1);
        dag.add_arc(1, 2);
        dag.add_arc(0, 2);
        assert!(!dag.can_flip_arc(0, 2));
        // The direct arc is the only 1 ~> 2 path, so that flip stays legal.
        assert!(dag.can_flip_arc(1, 2));
    }
}
