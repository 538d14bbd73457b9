//! Unified FEM model: the aggregate every pipeline stage works against

use crate::elements::{
    BoundaryCondition, Element, FemSet, Material, Node, Section, SetKind,
};
use crate::error::{ModelError, ModelResult};
use crate::loads::Load;
use crate::steps::Step;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Solver-neutral FEM model
///
/// All stores keep insertion order, which is the order every deck writer
/// emits entities in. References are checked when an entity is added, so
/// a model that was built without an error is internally consistent.
/// Only the merge pass renumbers ids.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnifiedFemModel {
    /// Model name, used as the job name when writing decks
    pub name: String,
    nodes: Vec<Node>,
    elements: Vec<Element>,
    sets: Vec<FemSet>,
    materials: Vec<Material>,
    sections: Vec<Section>,
    bcs: Vec<BoundaryCondition>,
    loads: Vec<Load>,
    steps: Vec<Step>,
    #[serde(skip)]
    node_index: HashMap<u32, usize>,
    #[serde(skip)]
    element_index: HashMap<u32, usize>,
    #[serde(skip)]
    set_index: HashMap<(SetKind, String), usize>,
    #[serde(skip)]
    material_index: HashMap<String, usize>,
    #[serde(skip)]
    section_index: HashMap<String, usize>,
    #[serde(skip)]
    bc_index: HashMap<String, usize>,
    #[serde(skip)]
    load_index: HashMap<String, usize>,
    #[serde(skip)]
    step_index: HashMap<String, usize>,
}

impl UnifiedFemModel {
    /// Create an empty model
    pub fn new(name: impl Into<String>) -> Self {
        UnifiedFemModel {
            name: name.into(),
            ..Default::default()
        }
    }

    // ========================
    // Model Building Methods
    // ========================

    /// Add a node
    pub fn add_node(&mut self, node: Node) -> ModelResult<()> {
        if self.node_index.contains_key(&node.id) {
            return Err(ModelError::DuplicateNodeId(node.id));
        }
        self.node_index.insert(node.id, self.nodes.len());
        self.nodes.push(node);
        Ok(())
    }

    /// Add several nodes in order
    pub fn add_nodes(&mut self, nodes: impl IntoIterator<Item = Node>) -> ModelResult<()> {
        for node in nodes {
            self.add_node(node)?;
        }
        Ok(())
    }

    /// Add an element, checking connectivity length and node references
    pub fn add_element(&mut self, element: Element) -> ModelResult<()> {
        if self.element_index.contains_key(&element.id) {
            return Err(ModelError::DuplicateElementId(element.id));
        }
        let expected = element.etype.node_count();
        if element.nodes.len() != expected {
            return Err(ModelError::ConnectivityMismatch {
                element_id: element.id,
                expected,
                found: element.nodes.len(),
            });
        }
        for &nid in &element.nodes {
            if !self.node_index.contains_key(&nid) {
                return Err(ModelError::NodeNotFound(nid));
            }
        }
        self.element_index.insert(element.id, self.elements.len());
        self.elements.push(element);
        Ok(())
    }

    /// Add several elements in order
    pub fn add_elements(&mut self, elements: impl IntoIterator<Item = Element>) -> ModelResult<()> {
        for element in elements {
            self.add_element(element)?;
        }
        Ok(())
    }

    /// Add a named set, checking every member reference
    pub fn add_set(&mut self, set: FemSet) -> ModelResult<()> {
        let key = (set.kind, set.name.clone());
        if self.set_index.contains_key(&key) {
            return Err(ModelError::DuplicateName(set.name));
        }
        for &id in &set.members {
            let known = match set.kind {
                SetKind::Node => self.node_index.contains_key(&id),
                SetKind::Element => self.element_index.contains_key(&id),
            };
            if !known {
                return match set.kind {
                    SetKind::Node => Err(ModelError::NodeNotFound(id)),
                    SetKind::Element => Err(ModelError::ElementNotFound(id)),
                };
            }
        }
        self.set_index.insert(key, self.sets.len());
        self.sets.push(set);
        Ok(())
    }

    /// Add a material
    pub fn add_material(&mut self, material: Material) -> ModelResult<()> {
        if self.material_index.contains_key(&material.name) {
            return Err(ModelError::DuplicateName(material.name));
        }
        self.material_index
            .insert(material.name.clone(), self.materials.len());
        self.materials.push(material);
        Ok(())
    }

    /// Add a section assignment, checking its element set and material
    pub fn add_section(&mut self, section: Section) -> ModelResult<()> {
        if self.section_index.contains_key(&section.name) {
            return Err(ModelError::DuplicateName(section.name));
        }
        let elset = self
            .set(SetKind::Element, &section.elset)
            .ok_or_else(|| ModelError::SetNotFound(section.elset.clone()))?;
        if !self.material_index.contains_key(&section.material) {
            return Err(ModelError::MaterialNotFound(section.material.clone()));
        }
        let expected = section.family();
        for &eid in &elset.members {
            let element = &self.elements[self.element_index[&eid]];
            if element.etype.family() != expected {
                return Err(ModelError::InvalidInput(format!(
                    "section '{}' expects {:?} elements but set '{}' contains element {} of type {}",
                    section.name, expected, section.elset, eid, element.etype
                )));
            }
        }
        self.section_index
            .insert(section.name.clone(), self.sections.len());
        self.sections.push(section);
        Ok(())
    }

    /// Add a boundary condition, checking its node set and dof range
    pub fn add_boundary_condition(&mut self, bc: BoundaryCondition) -> ModelResult<()> {
        if self.bc_index.contains_key(&bc.name) {
            return Err(ModelError::DuplicateName(bc.name));
        }
        if self.set(SetKind::Node, &bc.set).is_none() {
            return Err(ModelError::SetNotFound(bc.set.clone()));
        }
        if bc.dofs.is_empty() {
            return Err(ModelError::InvalidInput(format!(
                "boundary condition '{}' restrains no degrees of freedom",
                bc.name
            )));
        }
        for &dof in &bc.dofs {
            if !(1..=6).contains(&dof) {
                return Err(ModelError::InvalidDof(dof));
            }
        }
        self.bc_index.insert(bc.name.clone(), self.bcs.len());
        self.bcs.push(bc);
        Ok(())
    }

    /// Add a load, checking the set it references
    pub fn add_load(&mut self, load: Load) -> ModelResult<()> {
        if self.load_index.contains_key(&load.name) {
            return Err(ModelError::DuplicateName(load.name));
        }
        if self.set(load.set_kind(), &load.set).is_none() {
            return Err(ModelError::SetNotFound(load.set.clone()));
        }
        self.load_index.insert(load.name.clone(), self.loads.len());
        self.loads.push(load);
        Ok(())
    }

    /// Add an analysis step, checking every attached bc and load name
    pub fn add_step(&mut self, step: Step) -> ModelResult<()> {
        if self.step_index.contains_key(&step.name) {
            return Err(ModelError::DuplicateName(step.name));
        }
        for bc_name in &step.bcs {
            if !self.bc_index.contains_key(bc_name) {
                return Err(ModelError::BoundaryConditionNotFound(bc_name.clone()));
            }
        }
        for load_name in &step.loads {
            if !self.load_index.contains_key(load_name) {
                return Err(ModelError::LoadNotFound(load_name.clone()));
            }
        }
        self.step_index.insert(step.name.clone(), self.steps.len());
        self.steps.push(step);
        Ok(())
    }

    // ========================
    // Lookup Methods
    // ========================

    /// Node by id
    pub fn node(&self, id: u32) -> Option<&Node> {
        self.node_index.get(&id).map(|&i| &self.nodes[i])
    }

    /// Element by id
    pub fn element(&self, id: u32) -> Option<&Element> {
        self.element_index.get(&id).map(|&i| &self.elements[i])
    }

    /// Set by kind and name
    pub fn set(&self, kind: SetKind, name: &str) -> Option<&FemSet> {
        self.set_index
            .get(&(kind, name.to_string()))
            .map(|&i| &self.sets[i])
    }

    /// Node set by name
    pub fn node_set(&self, name: &str) -> Option<&FemSet> {
        self.set(SetKind::Node, name)
    }

    /// Element set by name
    pub fn element_set(&self, name: &str) -> Option<&FemSet> {
        self.set(SetKind::Element, name)
    }

    /// Material by name
    pub fn material(&self, name: &str) -> Option<&Material> {
        self.material_index.get(name).map(|&i| &self.materials[i])
    }

    /// Section by name
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.section_index.get(name).map(|&i| &self.sections[i])
    }

    /// Boundary condition by name
    pub fn boundary_condition(&self, name: &str) -> Option<&BoundaryCondition> {
        self.bc_index.get(name).map(|&i| &self.bcs[i])
    }

    /// Load by name
    pub fn load(&self, name: &str) -> Option<&Load> {
        self.load_index.get(name).map(|&i| &self.loads[i])
    }

    /// Step by name
    pub fn step(&self, name: &str) -> Option<&Step> {
        self.step_index.get(name).map(|&i| &self.steps[i])
    }

    // ========================
    // Iteration (insertion order)
    // ========================

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn sets(&self) -> &[FemSet] {
        &self.sets
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn boundary_conditions(&self) -> &[BoundaryCondition] {
        &self.bcs
    }

    pub fn loads(&self) -> &[Load] {
        &self.loads
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Highest node id in the model, 0 when empty
    pub fn max_node_id(&self) -> u32 {
        self.nodes.iter().map(|n| n.id).max().unwrap_or(0)
    }

    /// Highest element id in the model, 0 when empty
    pub fn max_element_id(&self) -> u32 {
        self.elements.iter().map(|e| e.id).max().unwrap_or(0)
    }

    // ========================
    // Persistence
    // ========================

    /// Serialize the model to pretty JSON
    pub fn to_json(&self) -> ModelResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize a model from JSON
    pub fn from_json(json: &str) -> ModelResult<Self> {
        let mut model: UnifiedFemModel = serde_json::from_str(json)?;
        model.rebuild_indexes();
        Ok(model)
    }

    /// Write the model to a JSON file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> ModelResult<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Read a model from a JSON file
    pub fn load_from_file(path: impl AsRef<Path>) -> ModelResult<Self> {
        let json = std::fs::read_to_string(path)?;
        UnifiedFemModel::from_json(&json)
    }

    /// Rebuild the lookup indexes from the ordered stores
    fn rebuild_indexes(&mut self) {
        self.node_index = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id, i))
            .collect();
        self.element_index = self
            .elements
            .iter()
            .enumerate()
            .map(|(i, e)| (e.id, i))
            .collect();
        self.set_index = self
            .sets
            .iter()
            .enumerate()
            .map(|(i, s)| ((s.kind, s.name.clone()), i))
            .collect();
        self.material_index = self
            .materials
            .iter()
            .enumerate()
            .map(|(i, m)| (m.name.clone(), i))
            .collect();
        self.section_index = self
            .sections
            .iter()
            .enumerate()
            .map(|(i, s)| (s.name.clone(), i))
            .collect();
        self.bc_index = self
            .bcs
            .iter()
            .enumerate()
            .map(|(i, b)| (b.name.clone(), i))
            .collect();
        self.load_index = self
            .loads
            .iter()
            .enumerate()
            .map(|(i, l)| (l.name.clone(), i))
            .collect();
        self.step_index = self
            .steps
            .iter()
            .enumerate()
            .map(|(i, s)| (s.name.clone(), i))
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{ElementType, SectionProfile};

    fn two_node_beam() -> UnifiedFemModel {
        let mut model = UnifiedFemModel::new("beam");
        model.add_node(Node::new(1, 0.0, 0.0, 0.0)).unwrap();
        model.add_node(Node::new(2, 1.0, 0.0, 0.0)).unwrap();
        model
            .add_element(Element::new(1, ElementType::B31, vec![1, 2]))
            .unwrap();
        model
    }

    #[test]
    fn test_build_small_model() {
        let mut model = two_node_beam();
        model.add_set(FemSet::nodes("supports", vec![1])).unwrap();
        model
            .add_set(FemSet::elements("beams", vec![1]))
            .unwrap();
        model.add_material(Material::steel("S355")).unwrap();
        model
            .add_section(Section::beam(
                "beam_section",
                "beams",
                "S355",
                SectionProfile::rectangular(0.1, 0.1),
            ))
            .unwrap();
        model
            .add_boundary_condition(BoundaryCondition::fixed("clamp", "supports"))
            .unwrap();
        model.add_load(Load::gravity("grav", "beams")).unwrap();
        model
            .add_step(Step::static_implicit("case1").with_load("grav"))
            .unwrap();

        assert_eq!(model.nodes().len(), 2);
        assert_eq!(model.node(2).map(|n| n.x), Some(1.0));
        assert!(model.element_set("beams").is_some());
        assert!(model.step("case1").is_some());
        assert_eq!(model.max_node_id(), 2);
        assert_eq!(model.max_element_id(), 1);
    }

    #[test]
    fn test_duplicate_node_id_rejected() {
        let mut model = two_node_beam();
        let err = model.add_node(Node::new(2, 5.0, 0.0, 0.0)).unwrap_err();
        assert!(matches!(err, ModelError::DuplicateNodeId(2)));
    }

    #[test]
    fn test_dangling_element_node_rejected() {
        let mut model = two_node_beam();
        let err = model
            .add_element(Element::new(2, ElementType::B31, vec![2, 99]))
            .unwrap_err();
        assert!(matches!(err, ModelError::NodeNotFound(99)));
    }

    #[test]
    fn test_connectivity_length_rejected() {
        let mut model = two_node_beam();
        let err = model
            .add_element(Element::new(2, ElementType::B32, vec![1, 2]))
            .unwrap_err();
        assert!(matches!(
            err,
            ModelError::ConnectivityMismatch {
                element_id: 2,
                expected: 3,
                found: 2
            }
        ));
    }

    #[test]
    fn test_bc_with_missing_set_rejected() {
        let mut model = two_node_beam();
        let err = model
            .add_boundary_condition(BoundaryCondition::fixed("clamp", "no_such_set"))
            .unwrap_err();
        assert!(matches!(err, ModelError::SetNotFound(name) if name == "no_such_set"));
    }

    #[test]
    fn test_set_with_unknown_member_rejected() {
        let mut model = two_node_beam();
        let err = model.add_set(FemSet::nodes("bad", vec![1, 42])).unwrap_err();
        assert!(matches!(err, ModelError::NodeNotFound(42)));
    }

    #[test]
    fn test_step_with_unknown_load_rejected() {
        let mut model = two_node_beam();
        let err = model
            .add_step(Step::static_implicit("case1").with_load("missing"))
            .unwrap_err();
        assert!(matches!(err, ModelError::LoadNotFound(name) if name == "missing"));
    }

    #[test]
    fn test_invalid_dof_rejected() {
        let mut model = two_node_beam();
        model.add_set(FemSet::nodes("supports", vec![1])).unwrap();
        let err = model
            .add_boundary_condition(BoundaryCondition::new("bad", "supports", vec![0, 7]))
            .unwrap_err();
        assert!(matches!(err, ModelError::InvalidDof(0)));
    }

    #[test]
    fn test_section_family_mismatch_rejected() {
        let mut model = two_node_beam();
        model
            .add_set(FemSet::elements("beams", vec![1]))
            .unwrap();
        model.add_material(Material::steel("S355")).unwrap();
        let err = model
            .add_section(Section::shell("wrong", "beams", "S355", 0.01))
            .unwrap_err();
        assert!(matches!(err, ModelError::InvalidInput(_)));
    }

    #[test]
    fn test_json_round_trip_preserves_order() {
        let mut model = two_node_beam();
        model.add_set(FemSet::nodes("supports", vec![2, 1])).unwrap();
        let json = model.to_json().unwrap();
        let restored = UnifiedFemModel::from_json(&json).unwrap();
        let ids: Vec<u32> = restored.nodes().iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(
            restored.node_set("supports").unwrap().members,
            vec![2, 1]
        );
        assert!(restored.element(1).is_some());
    }
}
