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
    common::{NodeIndex, ParentVec},
    err::{InvalidArcError, NetworkError},
    network::{dag::Dag, nodes::NodeTable, traits::BayesianNetwork},
};
use std::collections::HashMap;

/// Bayesian network whose nodes all carry linear-Gaussian conditional
/// distributions, so the structure is the only thing the search varies.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianNetwork {
    nodes: NodeTable,
    dag: Dag,
}

impl GaussianNetwork {
    pub fn new<I, S>(names: I) -> Result<Self, NetworkError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let nodes = NodeTable::new(names)?;
        let dag = Dag::new(nodes.len());
        Ok(Self { nodes, dag })
    }

    pub fn with_arcs<I, S, A>(names: I, arcs: &[(A, A)]) -> Result<Self, NetworkError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        A: AsRef<str>,
    {
        let mut network = Self::new(names)?;
        for (source, target) in arcs {
            let (s, t) = resolve_arc(&network.nodes, source.as_ref(), target.as_ref())?;
            if !network.dag.can_add_arc(s.get(), t.get()) {
                return Err(InvalidArcError::new(source.as_ref(), target.as_ref()).into());
            }
            network.dag.add_arc(s.get(), t.get());
        }
        Ok(network)
    }

    #[inline]
    pub fn num_arcs(&self) -> usize {
        self.dag.num_arcs()
    }

    #[inline]
    pub fn dag(&self) -> &Dag {
        &self.dag
    }
}

pub(crate) fn resolve_arc(
    nodes: &NodeTable,
    source: &str,
    target: &str,
) -> Result<(NodeIndex, NodeIndex), NetworkError> {
    let s = nodes
        .index(source)
        .ok_or_else(|| crate::err::UnknownNodeError::new(source))?;
    let t = nodes
        .index(target)
        .ok_or_else(|| crate::err::UnknownNodeError::new(target))?;
    Ok((s, t))
}

impl BayesianNetwork for GaussianNetwork {
    #[inline]
    fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    fn node_indices(&self) -> &HashMap<String, NodeIndex> {
        self.nodes.indices()
    }

    #[inline]
    fn index(&self, name: &str) -> Option<NodeIndex> {
        self.nodes.index(name)
    }

    #[inline]
    fn name(&self, node: NodeIndex) -> &str {
        self.nodes.name(node)
    }

    #[inline]
    fn parent_indices(&self, node: NodeIndex) -> ParentVec {
        self.dag.parents(node.get()).map(NodeIndex).collect()
    }

    #[inline]
    fn num_parents(&self, node: NodeIndex) -> usize {
        self.dag.num_parents(node.get())
    }

    #[inline]
    fn has_arc(&self, source: NodeIndex, target: NodeIndex) -> bool {
        self.dag.has_arc(source.get(), target.get())
    }

    #[inline]
    fn can_add_arc(&self, source: NodeIndex, target: NodeIndex) -> bool {
        self.dag.can_add_arc(source.get(), target.get())
    }

    #[inline]
    fn can_flip_arc(&self, source: NodeIndex, target: NodeIndex) -> bool {
        self.dag.can_flip_arc(source.get(), target.get())
    }

    #[inline]
    fn add_arc(&mut self, source: NodeIndex, target: NodeIndex) {
        self.dag.add_arc(source.get(), target.get());
    }

    #[inline]
    fn remove_arc(&mut self, source: NodeIndex, target: NodeIndex) {
        self.dag.remove_arc(source.get(), target.get());
    }
}
