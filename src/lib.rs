//! fea-bridge - Structural FEM models translated to external solvers
//!
//! This library carries a solver-agnostic finite element model from
//! construction through analysis:
//! - Unified model of nodes, elements, sets, materials, sections,
//!   boundary conditions, loads and analysis steps
//! - Merging of independently numbered part models into one assembly
//! - Deck writers and result readers for CalculiX and Sesam
//! - Orchestration of the external solver process with timeouts and
//!   failure classification
//!
//! ## Example
//! ```rust
//! use fea_bridge::prelude::*;
//!
//! let mut model = UnifiedFemModel::new("cantilever");
//!
//! // Mesh a straight beam into four line elements
//! let line = StraightLine::new("beam", [0.0, 0.0, 0.0], [2.0, 0.0, 0.0]);
//! let mesh = line.discretize(0.5, MeshOrder::Linear).unwrap();
//! model.add_nodes(mesh.nodes).unwrap();
//! model.add_elements(mesh.elements).unwrap();
//!
//! // Scope restraints and properties through named sets
//! model.add_set(FemSet::nodes("support", vec![1])).unwrap();
//! model.add_set(FemSet::elements("beams", vec![1, 2, 3, 4])).unwrap();
//! model.add_material(Material::steel("S355")).unwrap();
//! model
//!     .add_section(Section::beam(
//!         "beam_section",
//!         "beams",
//!         "S355",
//!         SectionProfile::rectangular(0.1, 0.1),
//!     ))
//!     .unwrap();
//! model
//!     .add_boundary_condition(BoundaryCondition::fixed("clamp", "support"))
//!     .unwrap();
//! model.add_step(Step::eigenfrequency("modes", 3)).unwrap();
//!
//! // Write the solver deck; running it needs the solver installed
//! let deck = Dialect::CalculiX.deck_string(&model).unwrap();
//! assert!(deck.contains("*FREQUENCY"));
//! ```

pub mod elements;
pub mod error;
pub mod exec;
pub mod formats;
pub mod loads;
pub mod merge;
pub mod mesh;
pub mod model;
pub mod results;
pub mod steps;

// Re-export common types
pub mod prelude {
    pub use crate::elements::{
        BoundaryCondition, Element, ElementFamily, ElementType, FemSet, Material, Node, Section,
        SectionKind, SectionProfile, SetKind,
    };
    pub use crate::error::{ModelError, ModelResult};
    pub use crate::exec::{
        ExecutionError, ExecutionOutcome, Executor, RunState, SolverCommand, SolverJob, SolverRun,
        Workspace,
    };
    pub use crate::formats::{Dialect, ParseError, WriteError};
    pub use crate::loads::{Load, LoadKind};
    pub use crate::merge::{merge_models, MergeBuilder, MergeError};
    pub use crate::mesh::{MeshOrder, MeshSource, PartMesh, StraightLine};
    pub use crate::model::UnifiedFemModel;
    pub use crate::results::{
        EigenMode, EigenSummary, NodeDisplacement, ResultWarning, ResultsModel, StaticResult,
    };
    pub use crate::steps::{Step, StepKind, StepType};
}
