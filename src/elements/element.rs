//! Finite element definitions and type tags

use serde::{Deserialize, Serialize};
use std::fmt;

/// Broad element family, used for capability checks and section binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementFamily {
    Line,
    Shell,
    Solid,
}

/// Element type tag
///
/// The tag names follow the common keyword-format spellings (B31, S4, C3D8
/// and so on); each dialect maps them to its own type codes when writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementType {
    /// 2-node linear beam
    B31,
    /// 3-node quadratic beam
    B32,
    /// 3-node triangular shell
    S3,
    /// 4-node quadrilateral shell
    S4,
    /// 6-node quadratic triangular shell
    S6,
    /// 8-node quadratic quadrilateral shell
    S8,
    /// 4-node tetrahedron
    C3D4,
    /// 8-node hexahedron
    C3D8,
    /// 10-node quadratic tetrahedron
    C3D10,
    /// 20-node quadratic hexahedron
    C3D20,
}

impl ElementType {
    /// Number of nodes this element type connects
    pub fn node_count(&self) -> usize {
        match self {
            ElementType::B31 => 2,
            ElementType::B32 => 3,
            ElementType::S3 => 3,
            ElementType::S4 => 4,
            ElementType::S6 => 6,
            ElementType::S8 => 8,
            ElementType::C3D4 => 4,
            ElementType::C3D8 => 8,
            ElementType::C3D10 => 10,
            ElementType::C3D20 => 20,
        }
    }

    /// Family the element type belongs to
    pub fn family(&self) -> ElementFamily {
        match self {
            ElementType::B31 | ElementType::B32 => ElementFamily::Line,
            ElementType::S3 | ElementType::S4 | ElementType::S6 | ElementType::S8 => {
                ElementFamily::Shell
            }
            ElementType::C3D4 | ElementType::C3D8 | ElementType::C3D10 | ElementType::C3D20 => {
                ElementFamily::Solid
            }
        }
    }

    /// Whether the type carries midside nodes
    pub fn is_quadratic(&self) -> bool {
        matches!(
            self,
            ElementType::B32
                | ElementType::S6
                | ElementType::S8
                | ElementType::C3D10
                | ElementType::C3D20
        )
    }

    /// Keyword-format spelling of the type tag
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementType::B31 => "B31",
            ElementType::B32 => "B32",
            ElementType::S3 => "S3",
            ElementType::S4 => "S4",
            ElementType::S6 => "S6",
            ElementType::S8 => "S8",
            ElementType::C3D4 => "C3D4",
            ElementType::C3D8 => "C3D8",
            ElementType::C3D10 => "C3D10",
            ElementType::C3D20 => "C3D20",
        }
    }

    /// Parse a keyword-format type tag, case-insensitively
    pub fn from_keyword(tag: &str) -> Option<ElementType> {
        match tag.trim().to_uppercase().as_str() {
            "B31" => Some(ElementType::B31),
            "B32" => Some(ElementType::B32),
            "S3" => Some(ElementType::S3),
            "S4" => Some(ElementType::S4),
            "S6" => Some(ElementType::S6),
            "S8" => Some(ElementType::S8),
            "C3D4" => Some(ElementType::C3D4),
            "C3D8" => Some(ElementType::C3D8),
            "C3D10" => Some(ElementType::C3D10),
            "C3D20" => Some(ElementType::C3D20),
            _ => None,
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A finite element: an id, a type tag and ordered node connectivity
///
/// Connectivity order is semantic and is preserved exactly through
/// assembly, deck writing and reparse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Element identifier, unique within a model
    pub id: u32,
    /// Element type tag
    pub etype: ElementType,
    /// Ordered node ids, length must match `etype.node_count()`
    pub nodes: Vec<u32>,
}

impl Element {
    /// Create a new element
    pub fn new(id: u32, etype: ElementType, nodes: Vec<u32>) -> Self {
        Element { id, etype, nodes }
    }
}
