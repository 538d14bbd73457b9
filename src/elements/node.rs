//! Node definition for FEM models

use serde::{Deserialize, Serialize};

/// A numbered node in 3D space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Node identifier, unique within a model
    pub id: u32,
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
    /// Z coordinate
    pub z: f64,
}

impl Node {
    /// Create a new node
    pub fn new(id: u32, x: f64, y: f64, z: f64) -> Self {
        Node { id, x, y, z }
    }

    /// Create a node from a coordinate array
    pub fn from_coords(id: u32, coords: [f64; 3]) -> Self {
        Node::new(id, coords[0], coords[1], coords[2])
    }

    /// Coordinates as an array
    pub fn coords(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Euclidean distance to another node
    pub fn distance_to(&self, other: &Node) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z - self.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}
