//! CalculiX keyword-format decks and `.dat` result files

use super::{ParseError, WriteError};
use crate::elements::{Element, FemSet, SectionKind, SetKind};
use crate::loads::LoadKind;
use crate::model::UnifiedFemModel;
use crate::results::{EigenMode, EigenSummary, NodeDisplacement, ResultWarning, ResultsModel, StaticResult};
use crate::steps::{Step, StepKind, StepType};
use std::collections::HashSet;

// Keyword lines are limited to 132 characters, so id lists are chunked
// well below that.
const IDS_PER_LINE: usize = 10;

pub(crate) fn deck_string(model: &UnifiedFemModel) -> Result<String, WriteError> {
    if model.nodes().is_empty() {
        return Err(WriteError::Generation(format!(
            "model '{}' has no nodes",
            model.name
        )));
    }

    let mut inp = String::new();

    // 1. Header
    inp.push_str("*HEADING\n");
    inp.push_str(&format!("{}\n", model.name));

    // 2. Nodes
    inp.push_str("*NODE, NSET=NALL\n");
    for node in model.nodes() {
        inp.push_str(&format!(
            "{}, {:.4}, {:.4}, {:.4}\n",
            node.id, node.x, node.y, node.z
        ));
    }

    // 3. Elements, one keyword block per run of equal type so global
    // insertion order is preserved
    let mut current_type = None;
    for element in model.elements() {
        if current_type != Some(element.etype) {
            inp.push_str(&format!(
                "*ELEMENT, TYPE={}, ELSET=EALL\n",
                element.etype
            ));
            current_type = Some(element.etype);
        }
        push_element_row(&mut inp, element);
    }

    // 4. Named sets
    for set in model.sets() {
        match set.kind {
            SetKind::Node => inp.push_str(&format!("*NSET, NSET={}\n", set.name)),
            SetKind::Element => inp.push_str(&format!("*ELSET, ELSET={}\n", set.name)),
        }
        push_id_list(&mut inp, &set.members);
    }

    // 5. Materials
    for material in model.materials() {
        inp.push_str(&format!("*MATERIAL, NAME={}\n", material.name));
        inp.push_str("*ELASTIC\n");
        inp.push_str(&format!("{:.6E}, {:.4}\n", material.e, material.nu));
        inp.push_str("*DENSITY\n");
        inp.push_str(&format!("{:.4}\n", material.rho));
    }

    // 6. Sections
    for section in model.sections() {
        match &section.kind {
            SectionKind::Beam {
                profile,
                orientation,
            } => {
                inp.push_str(&format!(
                    "*BEAM SECTION, ELSET={}, MATERIAL={}, SECTION=GENERAL\n",
                    section.elset, section.material
                ));
                inp.push_str(&format!(
                    "{:.6E}, {:.6E}, 0.0, {:.6E}, {:.6E}\n",
                    profile.area, profile.iy, profile.iz, profile.j
                ));
                inp.push_str(&format!(
                    "{:.1}, {:.1}, {:.1}\n",
                    orientation[0], orientation[1], orientation[2]
                ));
            }
            SectionKind::Shell { thickness } => {
                inp.push_str(&format!(
                    "*SHELL SECTION, ELSET={}, MATERIAL={}\n",
                    section.elset, section.material
                ));
                // 5 integration points through the thickness
                inp.push_str(&format!("{:.4}, 5\n", thickness));
            }
            SectionKind::Solid => {
                inp.push_str(&format!(
                    "*SOLID SECTION, ELSET={}, MATERIAL={}\n",
                    section.elset, section.material
                ));
            }
        }
    }

    // 7. Model-level boundary conditions, active in every step
    if !model.boundary_conditions().is_empty() {
        inp.push_str("*BOUNDARY\n");
        for bc in model.boundary_conditions() {
            for (first, last) in bc.dof_spans() {
                inp.push_str(&format!("{}, {}, {}, 0.0\n", bc.set, first, last));
            }
        }
    }

    // 8. Steps
    for step in model.steps() {
        push_step(&mut inp, model, step);
    }

    Ok(inp)
}

fn push_element_row(inp: &mut String, element: &Element) {
    let mut fields = Vec::with_capacity(element.nodes.len() + 1);
    fields.push(element.id.to_string());
    fields.extend(element.nodes.iter().map(|n| n.to_string()));
    let chunks: Vec<&[String]> = fields.chunks(IDS_PER_LINE).collect();
    for (i, chunk) in chunks.iter().enumerate() {
        inp.push_str(&chunk.join(", "));
        if i + 1 < chunks.len() {
            inp.push(',');
        }
        inp.push('\n');
    }
}

fn push_id_list(inp: &mut String, ids: &[u32]) {
    for chunk in ids.chunks(IDS_PER_LINE) {
        let row: Vec<String> = chunk.iter().map(|id| id.to_string()).collect();
        inp.push_str(&row.join(", "));
        inp.push('\n');
    }
}

fn push_step(inp: &mut String, model: &UnifiedFemModel, step: &Step) {
    match &step.kind {
        StepKind::StaticImplicit {
            total_time,
            total_incr,
            init_incr,
            min_incr,
            max_incr,
            nl_geom,
        } => {
            if *nl_geom {
                inp.push_str(&format!("*STEP, NLGEOM, INC={}\n", total_incr));
            } else {
                inp.push_str(&format!("*STEP, INC={}\n", total_incr));
            }
            inp.push_str("*STATIC\n");
            inp.push_str(&format!(
                "{}, {}, {}, {}\n",
                init_incr, total_time, min_incr, max_incr
            ));
        }
        StepKind::Eigenfrequency { num_modes } => {
            inp.push_str("*STEP\n");
            inp.push_str("*FREQUENCY\n");
            inp.push_str(&format!("{}\n", num_modes));
        }
    }

    // Step-scoped boundary conditions
    if !step.bcs.is_empty() {
        inp.push_str("*BOUNDARY\n");
        for bc_name in &step.bcs {
            if let Some(bc) = model.boundary_condition(bc_name) {
                for (first, last) in bc.dof_spans() {
                    inp.push_str(&format!("{}, {}, {}, 0.0\n", bc.set, first, last));
                }
            }
        }
    }

    // Loads
    for load_name in &step.loads {
        let load = match model.load(load_name) {
            Some(load) => load,
            None => continue,
        };
        match &load.kind {
            LoadKind::Concentrated { .. } => {
                inp.push_str("*CLOAD\n");
                for (dof, value) in load.nonzero_components() {
                    inp.push_str(&format!("{}, {}, {:.4}\n", load.set, dof, value));
                }
            }
            LoadKind::Gravity {
                magnitude,
                direction,
            } => {
                inp.push_str("*DLOAD\n");
                inp.push_str(&format!(
                    "{}, GRAV, {:.6}, {:.6}, {:.6}, {:.6}\n",
                    load.set, magnitude, direction[0], direction[1], direction[2]
                ));
            }
            LoadKind::Pressure { magnitude } => {
                inp.push_str("*DLOAD\n");
                inp.push_str(&format!("{}, P, {:.4}\n", load.set, magnitude));
            }
        }
    }

    // Output requests
    match step.step_type() {
        StepType::Static => {
            inp.push_str("*NODE PRINT, NSET=NALL\n");
            inp.push_str("U, RF\n");
            let mut printed = Vec::new();
            for section in model.sections() {
                if !printed.contains(&section.elset) {
                    inp.push_str(&format!("*EL PRINT, ELSET={}\n", section.elset));
                    inp.push_str("S\n");
                    printed.push(section.elset.clone());
                }
            }
        }
        StepType::Eigenfrequency => {
            inp.push_str("*NODE PRINT, NSET=NALL\n");
            inp.push_str("U\n");
        }
    }

    inp.push_str("*END STEP\n");
}

/// Parse a `.dat` file produced by running a deck of this model
///
/// The file is a sequence of sections; displacement blocks appear in
/// document order (static steps first, then one block per eigenmode after
/// the eigenvalue table).
pub(crate) fn parse_results(
    model: &UnifiedFemModel,
    text: &str,
) -> Result<ResultsModel, ParseError> {
    let mut blocks: Vec<Vec<NodeDisplacement>> = Vec::new();
    let mut eigen_rows: Vec<(usize, f64, f64)> = Vec::new();
    let mut blocks_before_table: Option<usize> = None;
    let mut current_block: Option<Vec<NodeDisplacement>> = None;
    let mut seen_nodes: HashSet<u32> = HashSet::new();
    let mut in_eigen_table = false;

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let lower = line.to_lowercase();
        let squeezed: String = lower.chars().filter(|c| !c.is_whitespace()).collect();

        if squeezed.contains("eigenvalueoutput") {
            if let Some(block) = current_block.take() {
                blocks.push(block);
            }
            blocks_before_table = Some(blocks.len());
            in_eigen_table = true;
            continue;
        }
        if lower.contains("displacements") && lower.contains("vx") {
            if let Some(block) = current_block.take() {
                blocks.push(block);
            }
            current_block = Some(Vec::new());
            seen_nodes.clear();
            in_eigen_table = false;
            continue;
        }
        if lower.contains("forces") || lower.contains("stresses") {
            if let Some(block) = current_block.take() {
                blocks.push(block);
            }
            in_eigen_table = false;
            continue;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let first = trimmed.chars().next().unwrap_or(' ');
        // Participation factor and modal mass tables follow the
        // eigenvalue rows in a frequency `.dat`; any banner line after
        // the first row ends the table so their rows are not read as
        // extra modes.
        if in_eigen_table && !eigen_rows.is_empty() && first.is_ascii_alphabetic() {
            in_eigen_table = false;
            continue;
        }
        if !first.is_ascii_digit() && first != '-' {
            continue;
        }

        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        if in_eigen_table {
            if fields.len() < 4 {
                continue;
            }
            let mode: usize = fields[0].parse().map_err(|_| ParseError::Malformed {
                line_no,
                reason: format!("invalid mode number '{}'", fields[0]),
            })?;
            let eigenvalue: f64 = fields[1].parse().map_err(|_| ParseError::Malformed {
                line_no,
                reason: format!("invalid eigenvalue '{}'", fields[1]),
            })?;
            // Column order: mode, eigenvalue, omega (rad/s), frequency (Hz)
            let frequency_hz: f64 = fields[3].parse().map_err(|_| ParseError::Malformed {
                line_no,
                reason: format!("invalid frequency '{}'", fields[3]),
            })?;
            eigen_rows.push((mode, eigenvalue, frequency_hz));
        } else if let Some(block) = current_block.as_mut() {
            if fields.len() < 4 {
                continue;
            }
            let node_id: u32 = fields[0].parse().map_err(|_| ParseError::Malformed {
                line_no,
                reason: format!("invalid node id '{}'", fields[0]),
            })?;
            if model.node(node_id).is_none() {
                return Err(ParseError::UnknownNode(node_id));
            }
            let mut components = [0.0; 3];
            for (i, value) in components.iter_mut().enumerate() {
                *value = fields[i + 1].parse().map_err(|_| ParseError::Malformed {
                    line_no,
                    reason: format!("invalid displacement '{}'", fields[i + 1]),
                })?;
            }
            if seen_nodes.insert(node_id) {
                block.push(NodeDisplacement::new(
                    node_id,
                    components[0],
                    components[1],
                    components[2],
                ));
            }
        }
    }
    if let Some(block) = current_block.take() {
        blocks.push(block);
    }

    let static_steps: Vec<&Step> = model
        .steps()
        .iter()
        .filter(|s| s.step_type() == StepType::Static)
        .collect();
    let eigen_step = model
        .steps()
        .iter()
        .find(|s| s.step_type() == StepType::Eigenfrequency);

    let split = blocks_before_table.unwrap_or(blocks.len());
    let mut results = ResultsModel::default();

    if !static_steps.is_empty() {
        if split < static_steps.len() {
            return Err(ParseError::MissingSection("displacements".to_string()));
        }
        for (step, block) in static_steps.iter().zip(blocks[..split].iter()) {
            results.static_results.push(StaticResult {
                step_name: step.name.clone(),
                displacements: block.clone(),
            });
        }
    }

    if let Some(step) = eigen_step {
        if blocks_before_table.is_none() && eigen_rows.is_empty() {
            return Err(ParseError::MissingSection(
                "eigenvalue output".to_string(),
            ));
        }
        let requested = step.requested_modes().unwrap_or(0);
        let found = eigen_rows.len();
        let mode_blocks = &blocks[split..];
        let mut modes: Vec<EigenMode> = eigen_rows
            .into_iter()
            .enumerate()
            .map(|(i, (number, eigenvalue, frequency_hz))| EigenMode {
                number,
                eigenvalue,
                frequency_hz,
                shape: mode_blocks.get(i).cloned().unwrap_or_default(),
            })
            .collect();
        modes.sort_by(|a, b| a.frequency_hz.total_cmp(&b.frequency_hz));
        modes.truncate(requested);
        results.eigen = Some(EigenSummary { modes });
        if found < requested {
            results.warnings.push(ResultWarning::IncompleteModes {
                step: step.name.clone(),
                requested,
                found,
            });
        }
    }

    Ok(results)
}

/// Reparse the named `*NSET`/`*ELSET` blocks out of a deck
pub(crate) fn parse_deck_sets(text: &str) -> Result<Vec<FemSet>, ParseError> {
    let mut sets: Vec<FemSet> = Vec::new();
    let mut current: Option<FemSet> = None;

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = line.trim();
        if trimmed.starts_with("**") {
            continue;
        }
        if trimmed.starts_with('*') {
            if let Some(set) = current.take() {
                sets.push(set);
            }
            let upper = trimmed.to_uppercase();
            let kind = if upper.starts_with("*NSET") {
                Some(SetKind::Node)
            } else if upper.starts_with("*ELSET") {
                Some(SetKind::Element)
            } else {
                None
            };
            if let Some(kind) = kind {
                let key = match kind {
                    SetKind::Node => "NSET=",
                    SetKind::Element => "ELSET=",
                };
                let name = trimmed.split(',').skip(1).find_map(|part| {
                    let part = part.trim();
                    if part.to_uppercase().starts_with(key) {
                        Some(part[key.len()..].to_string())
                    } else {
                        None
                    }
                });
                let name = name.ok_or_else(|| ParseError::Malformed {
                    line_no,
                    reason: "set keyword without a name".to_string(),
                })?;
                current = Some(FemSet::new(name, kind, Vec::new()));
            }
            continue;
        }
        if let Some(set) = current.as_mut() {
            for token in trimmed.split(',') {
                let token = token.trim();
                if token.is_empty() {
                    continue;
                }
                let id: u32 = token.parse().map_err(|_| ParseError::Malformed {
                    line_no,
                    reason: format!("invalid set member '{}'", token),
                })?;
                set.members.push(id);
            }
        }
    }
    if let Some(set) = current.take() {
        sets.push(set);
    }
    Ok(sets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{
        BoundaryCondition, Element, ElementType, FemSet, Material, Node, Section, SectionProfile,
    };
    use crate::loads::Load;
    use approx::assert_relative_eq;

    fn cantilever(num_modes: usize) -> UnifiedFemModel {
        let mut model = UnifiedFemModel::new("cantilever");
        for i in 1..=5u32 {
            model
                .add_node(Node::new(i, 0.5 * f64::from(i - 1), 0.0, 0.0))
                .unwrap();
        }
        for i in 1..=4u32 {
            model
                .add_element(Element::new(i, ElementType::B31, vec![i, i + 1]))
                .unwrap();
        }
        model.add_set(FemSet::nodes("support", vec![1])).unwrap();
        model
            .add_set(FemSet::elements("beams", vec![1, 2, 3, 4]))
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
            .add_boundary_condition(BoundaryCondition::fixed("clamp", "support"))
            .unwrap();
        model
            .add_step(crate::steps::Step::eigenfrequency("modes", num_modes))
            .unwrap();
        model
    }

    #[test]
    fn test_deck_sections_present() {
        let model = cantilever(3);
        let deck = crate::formats::Dialect::CalculiX.deck_string(&model).unwrap();
        assert!(deck.starts_with("*HEADING\ncantilever\n"));
        assert!(deck.contains("*NODE, NSET=NALL\n1, 0.0000, 0.0000, 0.0000\n"));
        assert!(deck.contains("*ELEMENT, TYPE=B31, ELSET=EALL\n1, 1, 2\n"));
        assert!(deck.contains("*NSET, NSET=support\n1\n"));
        assert!(deck.contains("*ELSET, ELSET=beams\n1, 2, 3, 4\n"));
        assert!(deck.contains("*MATERIAL, NAME=S355\n*ELASTIC\n"));
        assert!(deck.contains("*BEAM SECTION, ELSET=beams, MATERIAL=S355, SECTION=GENERAL\n"));
        assert!(deck.contains("*BOUNDARY\nsupport, 1, 6, 0.0\n"));
        assert!(deck.contains("*STEP\n*FREQUENCY\n3\n"));
        assert!(deck.ends_with("*END STEP\n"));
    }

    #[test]
    fn test_deck_is_byte_identical() {
        let model = cantilever(3);
        let dialect = crate::formats::Dialect::CalculiX;
        assert_eq!(
            dialect.deck_string(&model).unwrap(),
            dialect.deck_string(&model).unwrap()
        );
    }

    #[test]
    fn test_static_step_grammar() {
        let mut model = cantilever(3);
        model.add_load(Load::gravity("grav", "beams")).unwrap();
        model
            .add_step(crate::steps::Step::static_implicit("case1").with_load("grav"))
            .unwrap();
        let deck = crate::formats::Dialect::CalculiX.deck_string(&model).unwrap();
        assert!(deck.contains("*STEP, INC=1000\n*STATIC\n100, 100, 0.00000001, 100\n"));
        assert!(deck.contains("*DLOAD\nbeams, GRAV, 9.810000, 0.000000, 0.000000, -1.000000\n"));
        assert!(deck.contains("*NODE PRINT, NSET=NALL\nU, RF\n"));
        assert!(deck.contains("*EL PRINT, ELSET=beams\nS\n"));
    }

    #[test]
    fn test_deck_set_round_trip() {
        let model = cantilever(3);
        let dir = tempfile::tempdir().unwrap();
        let deck_path = dir.path().join("cantilever.inp");
        let dialect = crate::formats::Dialect::CalculiX;
        dialect.write_deck(&model, &deck_path).unwrap();

        let sets = dialect.read_deck_sets(&deck_path).unwrap();
        assert_eq!(sets.len(), 2);
        assert_eq!(sets[0].name, "support");
        assert_eq!(sets[0].kind, SetKind::Node);
        assert_eq!(sets[0].members, vec![1]);
        assert_eq!(sets[1].name, "beams");
        assert_eq!(sets[1].members, vec![1, 2, 3, 4]);
    }

    fn eigen_dat(rows: &[(usize, f64, f64, f64)], with_shapes: bool) -> String {
        let mut dat = String::new();
        dat.push_str("\n     E I G E N V A L U E   O U T P U T\n\n");
        dat.push_str(" MODE NO    EIGENVALUE                      FREQUENCY\n");
        dat.push_str("                                REAL PART            IMAGINARY PART\n");
        dat.push_str("                          (RAD/TIME)      (CYCLES/TIME      (RAD/TIME)\n\n");
        for (mode, eigenvalue, omega, hz) in rows {
            dat.push_str(&format!(
                "      {}   {:.7E}   {:.7E}   {:.7E}   0.0000000E+00\n",
                mode, eigenvalue, omega, hz
            ));
        }
        if with_shapes {
            for (mode, _, _, _) in rows {
                dat.push_str(&format!(
                    "\n displacements (vx,vy,vz) for set NALL and mode no. {}\n\n",
                    mode
                ));
                for node in 1..=5u32 {
                    dat.push_str(&format!(
                        " {} {:.6E} {:.6E} {:.6E}\n",
                        node,
                        0.0,
                        0.0,
                        f64::from(node) * 0.1 * (*mode as f64)
                    ));
                }
            }
        }
        dat
    }

    #[test]
    fn test_parse_eigen_results() {
        let model = cantilever(3);
        let dat = eigen_dat(
            &[
                (1, 3.947842e3, 6.283185e1, 1.0e1),
                (2, 1.579137e4, 1.256637e2, 2.0e1),
                (3, 3.553058e4, 1.884956e2, 3.0e1),
            ],
            true,
        );
        let results = parse_results(&model, &dat).unwrap();
        let eigen = results.eigen.as_ref().unwrap();
        assert_eq!(eigen.len(), 3);
        assert_relative_eq!(eigen.modes[0].frequency_hz, 10.0);
        assert_relative_eq!(eigen.modes[2].frequency_hz, 30.0);
        assert!(eigen
            .modes
            .windows(2)
            .all(|w| w[0].frequency_hz <= w[1].frequency_hz));
        // Shapes follow their modes and carry deck node ids.
        assert_eq!(eigen.modes[0].shape.len(), 5);
        assert_eq!(eigen.modes[0].shape[4].node_id, 5);
        assert_relative_eq!(eigen.modes[1].shape[4].dz, 1.0);
        assert!(results.is_complete());
    }

    #[test]
    fn test_parse_eigen_truncates_to_requested() {
        let model = cantilever(2);
        let dat = eigen_dat(
            &[
                (1, 3.9e3, 6.2e1, 10.0),
                (2, 1.5e4, 1.2e2, 20.0),
                (3, 3.5e4, 1.8e2, 30.0),
            ],
            false,
        );
        let results = parse_results(&model, &dat).unwrap();
        let eigen = results.eigen.as_ref().unwrap();
        assert_eq!(eigen.len(), 2);
        assert!(results.is_complete());
    }

    #[test]
    fn test_parse_eigen_incomplete_warns() {
        let model = cantilever(5);
        let dat = eigen_dat(&[(1, 3.9e3, 6.2e1, 10.0), (2, 1.5e4, 1.2e2, 20.0)], false);
        let results = parse_results(&model, &dat).unwrap();
        assert_eq!(results.eigen.as_ref().unwrap().len(), 2);
        assert!(!results.is_complete());
        assert_eq!(
            results.warnings,
            vec![ResultWarning::IncompleteModes {
                step: "modes".to_string(),
                requested: 5,
                found: 2,
            }]
        );
    }

    #[test]
    fn test_participation_tables_not_read_as_modes() {
        let model = cantilever(3);
        let mut dat = eigen_dat(
            &[
                (1, 3.947842e3, 6.283185e1, 1.0e1),
                (2, 1.579137e5, 3.973242e2, 6.32e1),
                (3, 1.236664e6, 1.112054e3, 1.77e2),
            ],
            false,
        );
        // ccx prints these tables after the eigenvalue rows; their
        // column layout matches an eigen row closely enough to be
        // mistaken for one.
        dat.push_str("\n     P A R T I C I P A T I O N   F A C T O R S\n\n");
        dat.push_str(" MODE NO   X-COMPONENT     Y-COMPONENT     Z-COMPONENT\n\n");
        for mode in 1..=3usize {
            dat.push_str(&format!(
                "      {}   0.0000000E+00   1.0000000E+00   0.0000000E+00   {:.7E}\n",
                mode,
                mode as f64 * 0.03
            ));
        }
        dat.push_str("\n     E F F E C T I V E   M O D A L   M A S S\n\n");
        dat.push_str(" MODE NO   X-COMPONENT     Y-COMPONENT     Z-COMPONENT\n\n");
        for mode in 1..=3usize {
            dat.push_str(&format!(
                "      {}   0.0000000E+00   4.1000000E-01   0.0000000E+00   {:.7E}\n",
                mode,
                mode as f64 * 0.06
            ));
        }

        let results = parse_results(&model, &dat).unwrap();
        let eigen = results.eigen.as_ref().unwrap();
        assert_eq!(eigen.len(), 3);
        assert_relative_eq!(eigen.modes[0].frequency_hz, 10.0);
        assert_relative_eq!(eigen.modes[1].frequency_hz, 63.2);
        assert_relative_eq!(eigen.modes[2].frequency_hz, 177.0);
        assert!(results.is_complete());
    }

    #[test]
    fn test_parse_missing_eigen_section() {
        let model = cantilever(3);
        let err = parse_results(&model, "no results here\n").unwrap_err();
        assert!(matches!(err, ParseError::MissingSection(_)));
    }

    #[test]
    fn test_parse_static_results() {
        let mut model = UnifiedFemModel::new("beam");
        for i in 1..=3u32 {
            model
                .add_node(Node::new(i, f64::from(i - 1), 0.0, 0.0))
                .unwrap();
        }
        model
            .add_step(crate::steps::Step::static_implicit("case1"))
            .unwrap();
        let dat = concat!(
            "\n displacements (vx,vy,vz) for set NALL and time  0.1000000E+03\n\n",
            " 1 0.000000E+00 0.000000E+00 0.000000E+00\n",
            " 2 0.000000E+00 0.000000E+00 -0.500000E-03\n",
            " 3 0.000000E+00 0.000000E+00 -0.180000E-02\n",
        );
        let results = parse_results(&model, dat).unwrap();
        assert_eq!(results.static_results.len(), 1);
        let tip = results.displacement("case1", 3).unwrap();
        assert_relative_eq!(tip.dz, -1.8e-3);
    }

    #[test]
    fn test_parse_unknown_node_rejected() {
        let model = cantilever(3);
        let mut dat = eigen_dat(&[(1, 3.9e3, 6.2e1, 10.0)], false);
        dat.push_str("\n displacements (vx,vy,vz) for set NALL and mode no. 1\n\n");
        dat.push_str(" 42 0.0 0.0 0.1\n");
        let err = parse_results(&model, &dat).unwrap_err();
        assert!(matches!(err, ParseError::UnknownNode(42)));
    }
}
