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

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnknownNodeError {
    name: String,
}

impl UnknownNodeError {
    #[inline]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for UnknownNodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unknown node '{}'", self.name)
    }
}

impl std::error::Error for UnknownNodeError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DuplicateNodeError {
    name: String,
}

impl DuplicateNodeError {
    #[inline]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for DuplicateNodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Duplicate node name '{}'", self.name)
    }
}

impl std::error::Error for DuplicateNodeError {}

/// Raised when an arc named at construction cannot be placed because it
/// would break the DAG invariant (self loop or cycle).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InvalidArcError {
    source: String,
    target: String,
}

impl InvalidArcError {
    #[inline]
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    #[inline]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[inline]
    pub fn target(&self) -> &str {
        &self.target
    }
}

impl std::fmt::Display for InvalidArcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Arc {} -> {} cannot be added without breaking the DAG invariant",
            self.source, self.target
        )
    }
}

impl std::error::Error for InvalidArcError {}

/// Raised when a node-type operation reaches a network whose nodes carry no
/// factor types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NodeTypeUnsupportedError;

impl NodeTypeUnsupportedError {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl std::fmt::Display for NodeTypeUnsupportedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "The network does not carry node factor types")
    }
}

impl std::error::Error for NodeTypeUnsupportedError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NetworkError {
    DuplicateNode(DuplicateNodeError),
    UnknownNode(UnknownNodeError),
    InvalidArc(InvalidArcError),
}

impl std::fmt::Display for NetworkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NetworkError::DuplicateNode(e) => write!(f, "{}", e),
            NetworkError::UnknownNode(e) => write!(f, "{}", e),
            NetworkError::InvalidArc(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for NetworkError {}

impl From<DuplicateNodeError> for NetworkError {
    fn from(err: DuplicateNodeError) -> Self {
        NetworkError::DuplicateNode(err)
    }
}

impl From<UnknownNodeError> for NetworkError {
    fn from(err: UnknownNodeError) -> Self {
        NetworkError::UnknownNode(err)
    }
}

impl From<InvalidArcError> for NetworkError {
    fn from(err: InvalidArcError) -> Self {
        NetworkError::InvalidArc(err)
    }
}
