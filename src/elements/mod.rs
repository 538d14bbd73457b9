//! Core model entities: nodes, elements, sets, materials, sections, restraints

mod bc;
mod element;
mod material;
mod node;
mod section;
mod set;

pub use bc::BoundaryCondition;
pub use element::{Element, ElementFamily, ElementType};
pub use material::Material;
pub use node::Node;
pub use section::{Section, SectionKind, SectionProfile};
pub use set::{FemSet, SetKind};
