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

use bnsl_model::prelude::{
    BayesianNetwork, FactorType, NodeIndex, NodeTypeUnsupportedError,
};
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OperatorKind {
    AddArc,
    RemoveArc,
    FlipArc,
    ChangeNodeType,
}

impl std::fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperatorKind::AddArc => write!(f, "AddArc"),
            OperatorKind::RemoveArc => write!(f, "RemoveArc"),
            OperatorKind::FlipArc => write!(f, "FlipArc"),
            OperatorKind::ChangeNodeType => write!(f, "ChangeNodeType"),
        }
    }
}

/// A candidate local edit of the network, priced with the score change its
/// application would produce.
///
/// Operators are immutable values. Equality and hashing cover the edit
/// identity only — the delta is deliberately excluded, so a tabu set
/// recognizes a move regardless of the score landscape it was priced in.
#[derive(Debug, Clone)]
pub enum Operator {
    AddArc {
        source: NodeIndex,
        target: NodeIndex,
        delta: f64,
    },
    RemoveArc {
        source: NodeIndex,
        target: NodeIndex,
        delta: f64,
    },
    /// Removes `source -> target` and adds `target -> source`.
    FlipArc {
        source: NodeIndex,
        target: NodeIndex,
        delta: f64,
    },
    ChangeNodeType {
        node: NodeIndex,
        new_type: FactorType,
        delta: f64,
    },
}

impl Operator {
    #[inline]
    pub fn delta(&self) -> f64 {
        match *self {
            Operator::AddArc { delta, .. }
            | Operator::RemoveArc { delta, .. }
            | Operator::FlipArc { delta, .. }
            | Operator::ChangeNodeType { delta, .. } => delta,
        }
    }

    #[inline]
    pub fn kind(&self) -> OperatorKind {
        match self {
            Operator::AddArc { .. } => OperatorKind::AddArc,
            Operator::RemoveArc { .. } => OperatorKind::RemoveArc,
            Operator::FlipArc { .. } => OperatorKind::FlipArc,
            Operator::ChangeNodeType { .. } => OperatorKind::ChangeNodeType,
        }
    }

    /// Performs the edit on the model. Fails only when a node-type change
    /// reaches a network without typed nodes, which no operator set
    /// generates.
    pub fn apply<M: BayesianNetwork>(
        &self,
        model: &mut M,
    ) -> Result<(), NodeTypeUnsupportedError> {
        match *self {
            Operator::AddArc { source, target, .. } => {
                model.add_arc(source, target);
                Ok(())
            }
            Operator::RemoveArc { source, target, .. } => {
                model.remove_arc(source, target);
                Ok(())
            }
            Operator::FlipArc { source, target, .. } => {
                model.remove_arc(source, target);
                model.add_arc(target, source);
                Ok(())
            }
            Operator::ChangeNodeType { node, new_type, .. } => {
                model.set_node_type(node, new_type)
            }
        }
    }

    /// The edit that undoes this one, priced with the negated delta.
    pub fn opposite(&self) -> Operator {
        match *self {
            Operator::AddArc {
                source,
                target,
                delta,
            } => Operator::RemoveArc {
                source,
                target,
                delta: -delta,
            },
            Operator::RemoveArc {
                source,
                target,
                delta,
            } => Operator::AddArc {
                source,
                target,
                delta: -delta,
            },
            Operator::FlipArc {
                source,
                target,
                delta,
            } => Operator::FlipArc {
                source: target,
                target: source,
                delta: -delta,
            },
            Operator::ChangeNodeType {
                node,
                new_type,
                delta,
            } => Operator::ChangeNodeType {
                node,
                new_type: new_type.opposite(),
                delta: -delta,
            },
        }
    }

    /// Human-readable rendering with node names resolved against `model`.
    pub fn describe<M: BayesianNetwork>(&self, model: &M) -> String {
        match *self {
            Operator::AddArc {
                source,
                target,
                delta,
            } => format!(
                "AddArc({} -> {}; {})",
                model.name(source),
                model.name(target),
                delta
            ),
            Operator::RemoveArc {
                source,
                target,
                delta,
            } => format!(
                "RemoveArc({} -> {}; {})",
                model.name(source),
                model.name(target),
                delta
            ),
            Operator::FlipArc {
                source,
                target,
                delta,
            } => format!(
                "FlipArc({} -> {}; {})",
                model.name(source),
                model.name(target),
                delta
            ),
            Operator::ChangeNodeType {
                node,
                new_type,
                delta,
            } => format!(
                "ChangeNodeType({} -> {}; {})",
                model.name(node),
                new_type,
                delta
            ),
        }
    }
}

impl PartialEq for Operator {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Operator::AddArc {
                    source: s1,
                    target: t1,
                    ..
                },
                Operator::AddArc {
                    source: s2,
                    target: t2,
                    ..
                },
            )
            | (
                Operator::RemoveArc {
                    source: s1,
                    target: t1,
                    ..
                },
                Operator::RemoveArc {
                    source: s2,
                    target: t2,
                    ..
                },
            )
            | (
                Operator::FlipArc {
                    source: s1,
                    target: t1,
                    ..
                },
                Operator::FlipArc {
                    source: s2,
                    target: t2,
                    ..
                },
            ) => s1 == s2 && t1 == t2,
            (
                Operator::ChangeNodeType {
                    node: n1,
                    new_type: ty1,
                    ..
                },
                Operator::ChangeNodeType {
                    node: n2,
                    new_type: ty2,
                    ..
                },
            ) => n1 == n2 && ty1 == ty2,
            _ => false,
        }
    }
}

impl Eq for Operator {}

impl Hash for Operator {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind().hash(state);
        match *self {
            Operator::AddArc { source, target, .. }
            | Operator::RemoveArc { source, target, .. }
            | Operator::FlipArc { source, target, .. } => {
                source.hash(state);
                target.hash(state);
            }
            Operator::ChangeNodeType { node, new_type, .. } => {
                node.hash(state);
                new_type.hash(state);
            }
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Operator::AddArc {
                source,
                target,
                delta,
            } => write!(f, "AddArc({} -> {}; {})", source, target, delta),
            Operator::RemoveArc {
                source,
                target,
                delta,
            } => write!(f, "RemoveArc({} -> {}; {})", source, target, delta),
            Operator::FlipArc {
                source,
                target,
                delta,
            } => write!(f, "FlipArc({} -> {}; {})", source, target, delta),
            Operator::ChangeNodeType {
                node,
                new_type,
                delta,
            } => write!(f, "ChangeNodeType({} -> {}; {})", node, new_type, delta),
        }
    }
}
