//! Bridge from mesh generators into the unified model
//!
//! Mesh generation itself is an external concern; this module defines the
//! shape a generator hands over (nodes plus elements with part-local ids)
//! and ships one trivial generator for straight line members, which is
//! enough for demos and tests.

use crate::elements::{Element, ElementType, Node};
use crate::error::{ModelError, ModelResult};
use crate::model::UnifiedFemModel;
use serde::{Deserialize, Serialize};

/// Interpolation order of generated elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeshOrder {
    Linear,
    Quadratic,
}

/// Mesh of a single part, ids numbered from 1 within the part
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartMesh {
    /// Part name
    pub name: String,
    /// Nodes in generation order
    pub nodes: Vec<Node>,
    /// Elements in generation order
    pub elements: Vec<Element>,
}

impl PartMesh {
    /// Convert the mesh into a standalone model
    ///
    /// Part-local ids become the model's ids; combining several parts is
    /// the merge pass's job.
    pub fn into_model(self) -> ModelResult<UnifiedFemModel> {
        let PartMesh {
            name,
            nodes,
            elements,
        } = self;
        let mut model = UnifiedFemModel::new(name);
        model.add_nodes(nodes)?;
        model.add_elements(elements)?;
        Ok(model)
    }
}

/// A geometry source that can be discretized into a part mesh
pub trait MeshSource {
    /// Discretize with a target element characteristic length
    fn discretize(&self, target_size: f64, order: MeshOrder) -> ModelResult<PartMesh>;
}

/// Straight line member between two points
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StraightLine {
    pub name: String,
    pub start: [f64; 3],
    pub end: [f64; 3],
}

impl StraightLine {
    pub fn new(name: impl Into<String>, start: [f64; 3], end: [f64; 3]) -> Self {
        StraightLine {
            name: name.into(),
            start,
            end,
        }
    }

    fn length(&self) -> f64 {
        let dx = self.end[0] - self.start[0];
        let dy = self.end[1] - self.start[1];
        let dz = self.end[2] - self.start[2];
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    fn point_at(&self, t: f64) -> [f64; 3] {
        [
            self.start[0] + t * (self.end[0] - self.start[0]),
            self.start[1] + t * (self.end[1] - self.start[1]),
            self.start[2] + t * (self.end[2] - self.start[2]),
        ]
    }
}

impl MeshSource for StraightLine {
    fn discretize(&self, target_size: f64, order: MeshOrder) -> ModelResult<PartMesh> {
        if target_size <= 0.0 {
            return Err(ModelError::InvalidInput(format!(
                "target element size must be positive, got {}",
                target_size
            )));
        }
        let length = self.length();
        if length <= 0.0 {
            return Err(ModelError::InvalidInput(format!(
                "line '{}' has zero length",
                self.name
            )));
        }
        let segments = (length / target_size).ceil().max(1.0) as u32;

        let mut nodes = Vec::new();
        let mut elements = Vec::new();
        match order {
            MeshOrder::Linear => {
                for i in 0..=segments {
                    let t = f64::from(i) / f64::from(segments);
                    nodes.push(Node::from_coords(i + 1, self.point_at(t)));
                }
                for i in 1..=segments {
                    elements.push(Element::new(i, ElementType::B31, vec![i, i + 1]));
                }
            }
            MeshOrder::Quadratic => {
                // Midside nodes sit halfway along each segment; connectivity
                // runs end, mid, end in axial order.
                let node_count = 2 * segments;
                for i in 0..=node_count {
                    let t = f64::from(i) / f64::from(node_count);
                    nodes.push(Node::from_coords(i + 1, self.point_at(t)));
                }
                for i in 1..=segments {
                    let a = 2 * i - 1;
                    elements.push(Element::new(i, ElementType::B32, vec![a, a + 1, a + 2]));
                }
            }
        }

        Ok(PartMesh {
            name: self.name.clone(),
            nodes,
            elements,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linear_line_mesh() {
        let line = StraightLine::new("beam", [0.0, 0.0, 0.0], [2.0, 0.0, 0.0]);
        let mesh = line.discretize(0.5, MeshOrder::Linear).unwrap();
        assert_eq!(mesh.nodes.len(), 5);
        assert_eq!(mesh.elements.len(), 4);
        assert_eq!(mesh.elements[0].nodes, vec![1, 2]);
        assert_eq!(mesh.elements[3].nodes, vec![4, 5]);
        assert_relative_eq!(mesh.nodes[2].x, 1.0);
    }

    #[test]
    fn test_quadratic_line_mesh() {
        let line = StraightLine::new("beam", [0.0, 0.0, 0.0], [1.0, 0.0, 0.0]);
        let mesh = line.discretize(0.5, MeshOrder::Quadratic).unwrap();
        assert_eq!(mesh.nodes.len(), 5);
        assert_eq!(mesh.elements.len(), 2);
        assert_eq!(mesh.elements[0].nodes, vec![1, 2, 3]);
        assert_eq!(mesh.elements[1].nodes, vec![3, 4, 5]);
    }

    #[test]
    fn test_mesh_into_model() {
        let line = StraightLine::new("beam", [0.0, 0.0, 0.0], [1.0, 0.0, 0.0]);
        let model = line
            .discretize(0.25, MeshOrder::Linear)
            .unwrap()
            .into_model()
            .unwrap();
        assert_eq!(model.nodes().len(), 5);
        assert_eq!(model.max_element_id(), 4);
    }

    #[test]
    fn test_invalid_size_rejected() {
        let line = StraightLine::new("beam", [0.0, 0.0, 0.0], [1.0, 0.0, 0.0]);
        assert!(line.discretize(0.0, MeshOrder::Linear).is_err());
    }
}
