//! Assembly of part models into a single analysis model
//!
//! Parts are merged in caller order. Node and element ids are renumbered
//! only when they collide with an id already present, by counting upwards
//! from the highest id on either side, so ids that are already unique
//! never change. Every set member, connectivity entry and by-name
//! reference is rewritten to follow the renumbering.

use crate::elements::{Node, SetKind};
use crate::error::ModelError;
use crate::model::UnifiedFemModel;
use std::collections::HashMap;

/// Errors raised while assembling parts
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    /// A collision that renumbering or renaming cannot resolve
    #[error("Merge conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Merge parts into one model, in the given order
pub fn merge_models(
    name: impl Into<String>,
    parts: impl IntoIterator<Item = UnifiedFemModel>,
) -> Result<UnifiedFemModel, MergeError> {
    let mut builder = MergeBuilder::new(name);
    for part in parts {
        builder.add_part(part)?;
    }
    Ok(builder.finish())
}

/// Incremental part-by-part assembly
pub struct MergeBuilder {
    merged: UnifiedFemModel,
    part_count: usize,
}

impl MergeBuilder {
    /// Start an empty assembly
    pub fn new(name: impl Into<String>) -> Self {
        MergeBuilder {
            merged: UnifiedFemModel::new(name),
            part_count: 0,
        }
    }

    /// The model assembled so far
    pub fn model(&self) -> &UnifiedFemModel {
        &self.merged
    }

    /// Finish and take the assembled model
    pub fn finish(self) -> UnifiedFemModel {
        self.merged
    }

    /// Merge one part into the assembly
    pub fn add_part(&mut self, part: UnifiedFemModel) -> Result<(), MergeError> {
        self.part_count += 1;
        let part_label = if part.name.is_empty() {
            format!("part{}", self.part_count)
        } else {
            part.name.clone()
        };

        // Remapped ids count upwards from the highest id on either side,
        // so they can collide with nothing that exists or is kept.
        let mut next_node_id = self.merged.max_node_id().max(part.max_node_id());
        let mut next_element_id = self.merged.max_element_id().max(part.max_element_id());

        let mut node_map: HashMap<u32, u32> = HashMap::new();
        for node in part.nodes() {
            let new_id = if self.merged.node(node.id).is_some() {
                next_node_id = next_node_id.checked_add(1).ok_or_else(|| {
                    MergeError::Conflict(format!(
                        "node id space exhausted while merging part '{}'",
                        part_label
                    ))
                })?;
                next_node_id
            } else {
                node.id
            };
            node_map.insert(node.id, new_id);
            self.merged
                .add_node(Node::new(new_id, node.x, node.y, node.z))?;
        }

        let mut element_map: HashMap<u32, u32> = HashMap::new();
        for element in part.elements() {
            let new_id = if self.merged.element(element.id).is_some() {
                next_element_id = next_element_id.checked_add(1).ok_or_else(|| {
                    MergeError::Conflict(format!(
                        "element id space exhausted while merging part '{}'",
                        part_label
                    ))
                })?;
                next_element_id
            } else {
                element.id
            };
            element_map.insert(element.id, new_id);
            let mut remapped = element.clone();
            remapped.id = new_id;
            remapped.nodes = element.nodes.iter().map(|n| node_map[n]).collect();
            self.merged.add_element(remapped)?;
        }

        let remapped_nodes = node_map.iter().filter(|(old, new)| old != new).count();
        let remapped_elements = element_map.iter().filter(|(old, new)| old != new).count();
        tracing::debug!(
            "Merged part '{}': {} nodes ({} renumbered), {} elements ({} renumbered)",
            part_label,
            node_map.len(),
            remapped_nodes,
            element_map.len(),
            remapped_elements
        );

        let mut set_renames: HashMap<(SetKind, String), String> = HashMap::new();
        for set in part.sets() {
            let mut remapped = set.clone();
            remapped.members = match set.kind {
                SetKind::Node => set.members.iter().map(|m| node_map[m]).collect(),
                SetKind::Element => set.members.iter().map(|m| element_map[m]).collect(),
            };
            if self.merged.set(set.kind, &set.name).is_some() {
                let renamed = format!("{}/{}", part_label, set.name);
                if self.merged.set(set.kind, &renamed).is_some() {
                    return Err(MergeError::Conflict(format!(
                        "{} set name '{}' collides even after renaming to '{}'",
                        set.kind, set.name, renamed
                    )));
                }
                set_renames.insert((set.kind, set.name.clone()), renamed.clone());
                remapped.name = renamed;
            }
            self.merged.add_set(remapped)?;
        }

        let mut material_renames: HashMap<String, String> = HashMap::new();
        for material in part.materials() {
            match self.merged.material(&material.name) {
                Some(existing) if existing == material => {}
                Some(_) => {
                    let renamed = format!("{}/{}", part_label, material.name);
                    if self.merged.material(&renamed).is_some() {
                        return Err(MergeError::Conflict(format!(
                            "material name '{}' collides even after renaming to '{}'",
                            material.name, renamed
                        )));
                    }
                    material_renames.insert(material.name.clone(), renamed.clone());
                    let mut remapped = material.clone();
                    remapped.name = renamed;
                    self.merged.add_material(remapped)?;
                }
                None => self.merged.add_material(material.clone())?,
            }
        }

        for section in part.sections() {
            let mut remapped = section.clone();
            if let Some(renamed) = set_renames.get(&(SetKind::Element, remapped.elset.clone())) {
                remapped.elset = renamed.clone();
            }
            if let Some(renamed) = material_renames.get(&remapped.material) {
                remapped.material = renamed.clone();
            }
            match self.merged.section(&remapped.name) {
                Some(existing) if *existing == remapped => {}
                Some(_) => {
                    let renamed = format!("{}/{}", part_label, remapped.name);
                    if self.merged.section(&renamed).is_some() {
                        return Err(MergeError::Conflict(format!(
                            "section name '{}' collides even after renaming to '{}'",
                            remapped.name, renamed
                        )));
                    }
                    remapped.name = renamed;
                    self.merged.add_section(remapped)?;
                }
                None => self.merged.add_section(remapped)?,
            }
        }

        let mut bc_renames: HashMap<String, String> = HashMap::new();
        for bc in part.boundary_conditions() {
            let mut remapped = bc.clone();
            if let Some(renamed) = set_renames.get(&(SetKind::Node, remapped.set.clone())) {
                remapped.set = renamed.clone();
            }
            match self.merged.boundary_condition(&remapped.name) {
                Some(existing) if *existing == remapped => {}
                Some(_) => {
                    let renamed = format!("{}/{}", part_label, remapped.name);
                    if self.merged.boundary_condition(&renamed).is_some() {
                        return Err(MergeError::Conflict(format!(
                            "boundary condition name '{}' collides even after renaming to '{}'",
                            remapped.name, renamed
                        )));
                    }
                    bc_renames.insert(remapped.name.clone(), renamed.clone());
                    remapped.name = renamed;
                    self.merged.add_boundary_condition(remapped)?;
                }
                None => self.merged.add_boundary_condition(remapped)?,
            }
        }

        let mut load_renames: HashMap<String, String> = HashMap::new();
        for load in part.loads() {
            let mut remapped = load.clone();
            let kind = remapped.set_kind();
            if let Some(renamed) = set_renames.get(&(kind, remapped.set.clone())) {
                remapped.set = renamed.clone();
            }
            match self.merged.load(&remapped.name) {
                Some(existing) if *existing == remapped => {}
                Some(_) => {
                    let renamed = format!("{}/{}", part_label, remapped.name);
                    if self.merged.load(&renamed).is_some() {
                        return Err(MergeError::Conflict(format!(
                            "load name '{}' collides even after renaming to '{}'",
                            remapped.name, renamed
                        )));
                    }
                    load_renames.insert(remapped.name.clone(), renamed.clone());
                    remapped.name = renamed;
                    self.merged.add_load(remapped)?;
                }
                None => self.merged.add_load(remapped)?,
            }
        }

        for step in part.steps() {
            let mut remapped = step.clone();
            remapped.bcs = step
                .bcs
                .iter()
                .map(|n| bc_renames.get(n).cloned().unwrap_or_else(|| n.clone()))
                .collect();
            remapped.loads = step
                .loads
                .iter()
                .map(|n| load_renames.get(n).cloned().unwrap_or_else(|| n.clone()))
                .collect();
            match self.merged.step(&remapped.name) {
                Some(existing) if *existing == remapped => {}
                Some(_) => {
                    let renamed = format!("{}/{}", part_label, remapped.name);
                    if self.merged.step(&renamed).is_some() {
                        return Err(MergeError::Conflict(format!(
                            "step name '{}' collides even after renaming to '{}'",
                            remapped.name, renamed
                        )));
                    }
                    remapped.name = renamed;
                    self.merged.add_step(remapped)?;
                }
                None => self.merged.add_step(remapped)?,
            }
        }

        Ok(())
    }
}
