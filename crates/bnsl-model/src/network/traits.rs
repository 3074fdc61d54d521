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
    common::{FactorType, NodeIndex, ParentVec},
    err::NodeTypeUnsupportedError,
};
use std::collections::HashMap;

/// Read/write capability set a structure search needs from a network.
///
/// Mutation is limited to arc insertion/removal and (for networks that
/// support it) node-type assignment; everything else is read-only topology.
pub trait BayesianNetwork {
    fn num_nodes(&self) -> usize;

    fn node_indices(&self) -> &HashMap<String, NodeIndex>;

    fn index(&self, name: &str) -> Option<NodeIndex>;

    fn name(&self, node: NodeIndex) -> &str;

    /// Parent indices of `node` in ascending order. Callers may treat the
    /// returned vector as scratch space.
    fn parent_indices(&self, node: NodeIndex) -> ParentVec;

    fn num_parents(&self, node: NodeIndex) -> usize;

    fn has_arc(&self, source: NodeIndex, target: NodeIndex) -> bool;

    /// Whether `source -> target` can be added without violating
    /// acyclicity.
    fn can_add_arc(&self, source: NodeIndex, target: NodeIndex) -> bool;

    /// Whether the existing arc `source -> target` can be reversed without
    /// violating acyclicity.
    fn can_flip_arc(&self, source: NodeIndex, target: NodeIndex) -> bool;

    fn add_arc(&mut self, source: NodeIndex, target: NodeIndex);

    fn remove_arc(&mut self, source: NodeIndex, target: NodeIndex);

    /// Assign a factor type. Networks without typed nodes keep the default
    /// rejection; a type-change operator reaching such a network is a
    /// wiring error on the caller's side.
    fn set_node_type(
        &mut self,
        node: NodeIndex,
        node_type: FactorType,
    ) -> Result<(), NodeTypeUnsupportedError> {
        let _ = (node, node_type);
        Err(NodeTypeUnsupportedError::new())
    }
}

/// Networks whose nodes carry a factor type.
pub trait TypedBayesianNetwork: BayesianNetwork {
    fn node_type(&self, node: NodeIndex) -> FactorType;
}
