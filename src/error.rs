//! Error types for model construction and assembly

use thiserror::Error;

/// Result type for model operations
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors that can occur while building or assembling a model
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Node {0} not found in model")]
    NodeNotFound(u32),

    #[error("Element {0} not found in model")]
    ElementNotFound(u32),

    #[error("Set '{0}' not found in model")]
    SetNotFound(String),

    #[error("Material '{0}' not found in model")]
    MaterialNotFound(String),

    #[error("Section '{0}' not found in model")]
    SectionNotFound(String),

    #[error("Boundary condition '{0}' not found in model")]
    BoundaryConditionNotFound(String),

    #[error("Load '{0}' not found in model")]
    LoadNotFound(String),

    #[error("Node id {0} already exists in model")]
    DuplicateNodeId(u32),

    #[error("Element id {0} already exists in model")]
    DuplicateElementId(u32),

    #[error("Name '{0}' already exists in model")]
    DuplicateName(String),

    #[error("Degree of freedom {0} is outside the valid range 1-6")]
    InvalidDof(u8),

    #[error("Element {element_id} requires {expected} nodes, got {found}")]
    ConnectivityMismatch {
        element_id: u32,
        expected: usize,
        found: usize,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
