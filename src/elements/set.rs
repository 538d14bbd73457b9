//! Named node and element sets

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a set collects nodes or elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SetKind {
    Node,
    Element,
}

impl fmt::Display for SetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetKind::Node => f.write_str("node"),
            SetKind::Element => f.write_str("element"),
        }
    }
}

/// A named, ordered collection of node or element ids
///
/// Member order is preserved through assembly and deck writing; boundary
/// conditions and loads reference sets by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FemSet {
    /// Set name, unique per kind within a model
    pub name: String,
    /// Node set or element set
    pub kind: SetKind,
    /// Ordered member ids
    pub members: Vec<u32>,
}

impl FemSet {
    /// Create a new set
    pub fn new(name: impl Into<String>, kind: SetKind, members: Vec<u32>) -> Self {
        FemSet {
            name: name.into(),
            kind,
            members,
        }
    }

    /// Create a node set
    pub fn nodes(name: impl Into<String>, members: Vec<u32>) -> Self {
        FemSet::new(name, SetKind::Node, members)
    }

    /// Create an element set
    pub fn elements(name: impl Into<String>, members: Vec<u32>) -> Self {
        FemSet::new(name, SetKind::Element, members)
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the set has no members
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Whether an id is a member
    pub fn contains(&self, id: u32) -> bool {
        self.members.contains(&id)
    }
}
