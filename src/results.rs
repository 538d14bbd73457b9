//! Parsed solver results
//!
//! Instances are produced by the dialect result readers and are not
//! modified afterwards; downstream consumers only read them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Displacement of one node: three translations, three rotations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeDisplacement {
    /// Node id as written to the deck (post-merge id)
    pub node_id: u32,
    pub dx: f64,
    pub dy: f64,
    pub dz: f64,
    pub rx: f64,
    pub ry: f64,
    pub rz: f64,
}

impl NodeDisplacement {
    /// Translation-only displacement, rotations zero
    pub fn new(node_id: u32, dx: f64, dy: f64, dz: f64) -> Self {
        NodeDisplacement {
            node_id,
            dx,
            dy,
            dz,
            rx: 0.0,
            ry: 0.0,
            rz: 0.0,
        }
    }

    /// Displacement from a six-component array
    pub fn from_components(node_id: u32, c: [f64; 6]) -> Self {
        NodeDisplacement {
            node_id,
            dx: c[0],
            dy: c[1],
            dz: c[2],
            rx: c[3],
            ry: c[4],
            rz: c[5],
        }
    }

    /// Magnitude of the translation vector
    pub fn translation_magnitude(&self) -> f64 {
        (self.dx * self.dx + self.dy * self.dy + self.dz * self.dz).sqrt()
    }
}

/// One natural vibration mode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EigenMode {
    /// Mode number, 1-based, ascending with frequency
    pub number: usize,
    /// Eigenvalue (rad²/s²)
    pub eigenvalue: f64,
    /// Natural frequency (Hz)
    pub frequency_hz: f64,
    /// Mode shape, empty when the artifact carries no vectors
    pub shape: Vec<NodeDisplacement>,
}

impl EigenMode {
    /// Period in seconds
    pub fn period(&self) -> f64 {
        1.0 / self.frequency_hz
    }
}

/// Eigenmodes of one extraction step, ascending by frequency
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EigenSummary {
    pub modes: Vec<EigenMode>,
}

impl EigenSummary {
    /// Lowest natural frequency (Hz)
    pub fn lowest_frequency(&self) -> Option<f64> {
        self.modes.first().map(|m| m.frequency_hz)
    }

    /// Highest reported natural frequency (Hz)
    pub fn highest_frequency(&self) -> Option<f64> {
        self.modes.last().map(|m| m.frequency_hz)
    }

    /// Number of modes
    pub fn len(&self) -> usize {
        self.modes.len()
    }

    /// Whether no modes were reported
    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }
}

/// Displacement field of one static step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticResult {
    pub step_name: String,
    pub displacements: Vec<NodeDisplacement>,
}

impl StaticResult {
    /// Displacement of a node, by post-merge id
    pub fn displacement(&self, node_id: u32) -> Option<&NodeDisplacement> {
        self.displacements.iter().find(|d| d.node_id == node_id)
    }

    /// Largest translation magnitude in the field
    pub fn max_translation(&self) -> f64 {
        self.displacements
            .iter()
            .map(|d| d.translation_magnitude())
            .fold(0.0, f64::max)
    }
}

/// Degraded-but-usable conditions reported alongside parsed results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ResultWarning {
    /// The solver converged fewer modes than the step requested
    IncompleteModes {
        step: String,
        requested: usize,
        found: usize,
    },
}

impl fmt::Display for ResultWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultWarning::IncompleteModes {
                step,
                requested,
                found,
            } => write!(
                f,
                "step '{}' requested {} modes but the solver reported {}",
                step, requested, found
            ),
        }
    }
}

/// Everything read back from one solver run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultsModel {
    /// Eigenmodes, when the run contained an eigenfrequency step
    pub eigen: Option<EigenSummary>,
    /// Static displacement fields, one per static step, in step order
    pub static_results: Vec<StaticResult>,
    /// Conditions that degraded but did not invalidate the results
    pub warnings: Vec<ResultWarning>,
}

impl ResultsModel {
    /// Whether the run produced everything the model asked for
    pub fn is_complete(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Displacement of a node in a named static step
    pub fn displacement(&self, step_name: &str, node_id: u32) -> Option<&NodeDisplacement> {
        self.static_results
            .iter()
            .find(|r| r.step_name == step_name)
            .and_then(|r| r.displacement(node_id))
    }
}
