//! Sesam input interface files (`T100.FEM`) and `SESTRA.LIS` result lists
//!
//! Cards carry the card name in the first eight columns and up to four
//! numeric fields per line, sixteen columns each, continuation lines
//! indented eight spaces. Every number is written in scientific notation.

use super::{ParseError, WriteError};
use crate::elements::{ElementType, FemSet, SectionKind, SetKind};
use crate::model::UnifiedFemModel;
use crate::results::{EigenMode, EigenSummary, NodeDisplacement, ResultWarning, ResultsModel};
use crate::steps::StepType;
use regex::Regex;
use std::collections::{HashMap, HashSet};

/// Sesam element type code for a supported element type
///
/// Line and shell families map onto BEAS/BTSS and FTRS/FQUS/SCTS/SCQS;
/// solid families have no mapping and are rejected by the writer.
pub(crate) fn element_code(etype: ElementType) -> Option<u32> {
    match etype {
        ElementType::B31 => Some(15),
        ElementType::B32 => Some(23),
        ElementType::S4 => Some(24),
        ElementType::S3 => Some(25),
        ElementType::S6 => Some(26),
        ElementType::S8 => Some(28),
        _ => None,
    }
}

fn sci(v: f64) -> String {
    let s = format!("{:.8e}", v);
    match s.split_once('e') {
        Some((mantissa, exp)) => {
            let exp: i32 = exp.parse().unwrap_or(0);
            format!("{}e{:+03}", mantissa, exp)
        }
        None => s,
    }
}

fn field(v: f64) -> String {
    if v >= 0.0 {
        format!("  {:<14}", sci(v))
    } else {
        format!(" {:<15}", sci(v))
    }
}

fn card(name: &str, rows: &[Vec<f64>]) -> String {
    let mut out = String::new();
    for (i, row) in rows.iter().enumerate() {
        if i == 0 {
            out.push_str(&format!("{:<8}", name));
        } else {
            out.push_str("        ");
        }
        for v in row {
            out.push_str(&field(*v));
        }
        out.push('\n');
    }
    out
}

fn chunk_rows(lead: Vec<f64>, tail: &[f64]) -> Vec<Vec<f64>> {
    let mut rows = vec![lead];
    for chunk in tail.chunks(4) {
        rows.push(chunk.to_vec());
    }
    rows
}

pub(crate) fn deck_string(model: &UnifiedFemModel) -> Result<String, WriteError> {
    if model.nodes().is_empty() {
        return Err(WriteError::Generation(format!(
            "model '{}' has no nodes",
            model.name
        )));
    }

    let mut fem = String::new();
    fem.push_str(&card("IDENT", &[vec![1.0, 1.0, 3.0, 0.0]]));

    // Nodes: GNODE carries the dof bookkeeping, GCOORD the coordinates
    for node in model.nodes() {
        let id = f64::from(node.id);
        fem.push_str(&card("GNODE", &[vec![id, id, 6.0, 123456.0]]));
        fem.push_str(&card("GCOORD", &[vec![id, node.x, node.y, node.z]]));
    }

    // Element material and geometry references resolve through section
    // assignments; the first covering section wins.
    let material_no: HashMap<&str, usize> = model
        .materials()
        .iter()
        .enumerate()
        .map(|(i, m)| (m.name.as_str(), i + 1))
        .collect();
    let mut element_refs: HashMap<u32, (usize, usize)> = HashMap::new();
    for (sec_idx, section) in model.sections().iter().enumerate() {
        if let Some(elset) = model.element_set(&section.elset) {
            let matno = material_no.get(section.material.as_str()).copied().unwrap_or(0);
            for &eid in &elset.members {
                element_refs.entry(eid).or_insert((matno, sec_idx + 1));
            }
        }
    }

    for element in model.elements() {
        let code = element_code(element.etype).ok_or_else(|| WriteError::Unsupported {
            dialect: "sesam",
            feature: format!("element type {}", element.etype),
        })?;
        let id = f64::from(element.id);
        let connectivity: Vec<f64> = element.nodes.iter().map(|&n| f64::from(n)).collect();
        fem.push_str(&card(
            "GELMNT1",
            &chunk_rows(vec![id, id, f64::from(code), 0.0], &connectivity),
        ));
        let (matno, geono) = element_refs.get(&element.id).copied().unwrap_or((0, 0));
        fem.push_str(&card(
            "GELREF1",
            &[
                vec![id, matno as f64, 0.0, 0.0],
                vec![0.0, 0.0, 0.0, 0.0],
                vec![geono as f64, 0.0, 0.0, 0.0],
            ],
        ));
    }

    // Named sets: TDSETNAM defines the name, GSETMEMB the ordered members
    for (set_idx, set) in model.sets().iter().enumerate() {
        let isref = (set_idx + 1) as f64;
        let mut name_card = card(
            "TDSETNAM",
            &[vec![4.0, isref, 100.0 + set.name.len() as f64, 0.0]],
        );
        name_card.push_str(&format!("        {}\n", set.name));
        fem.push_str(&name_card);

        let istype = match set.kind {
            SetKind::Node => 1.0,
            SetKind::Element => 2.0,
        };
        let members: Vec<f64> = set.members.iter().map(|&m| f64::from(m)).collect();
        fem.push_str(&card(
            "GSETMEMB",
            &chunk_rows(vec![members.len() as f64, isref, istype, 0.0], &members),
        ));
    }

    for (mat_idx, material) in model.materials().iter().enumerate() {
        fem.push_str(&card(
            "MISOSEL",
            &[vec![
                (mat_idx + 1) as f64,
                material.e,
                material.nu,
                material.rho,
            ]],
        ));
    }

    for (sec_idx, section) in model.sections().iter().enumerate() {
        let geono = (sec_idx + 1) as f64;
        match &section.kind {
            SectionKind::Beam { profile, .. } => {
                fem.push_str(&card(
                    "GBEAMG",
                    &[
                        vec![geono, 0.0, profile.area, profile.j],
                        vec![profile.iy, profile.iz, 0.0, 0.0],
                    ],
                ));
            }
            SectionKind::Shell { thickness } => {
                fem.push_str(&card("GELTH", &[vec![geono, *thickness]]));
            }
            // Unreachable behind the capability check; solids have no card
            SectionKind::Solid => {
                return Err(WriteError::Unsupported {
                    dialect: "sesam",
                    feature: format!("solid section '{}'", section.name),
                });
            }
        }
    }

    // Boundary conditions collapse into the single implicit load case,
    // so step scoping does not matter here: every bc is written.
    for bc in model.boundary_conditions() {
        if let Some(nset) = model.node_set(&bc.set) {
            let mut fix = [0.0f64; 6];
            for &dof in &bc.dofs {
                fix[usize::from(dof) - 1] = 1.0;
            }
            for &node_id in &nset.members {
                fem.push_str(&card(
                    "BNBCD",
                    &[
                        vec![f64::from(node_id), 6.0, fix[0], fix[1]],
                        vec![fix[2], fix[3], fix[4], fix[5]],
                    ],
                ));
            }
        }
    }

    fem.push_str(&card("IEND", &[vec![0.0, 0.0, 0.0, 0.0]]));
    Ok(fem)
}

/// Parse a `SESTRA.LIS` listing
///
/// Only eigenvalue output is extracted; the table rows are
/// semicolon-separated `mode; eigenvalue; frequency; period` lines under
/// the `PRINT OF EIGENVALUES` banner, optionally followed by per-mode
/// displacement blocks.
pub(crate) fn parse_results(
    model: &UnifiedFemModel,
    text: &str,
) -> Result<ResultsModel, ParseError> {
    let eigen_step = model
        .steps()
        .iter()
        .find(|s| s.step_type() == StepType::Eigenfrequency);
    let step = match eigen_step {
        Some(step) => step,
        None => return Ok(ResultsModel::default()),
    };

    let row_re = Regex::new(r"^\s*(\d+);\s*(\S+);\s*(\S+);\s*(\S+)").map_err(|e| {
        ParseError::Malformed {
            line_no: 0,
            reason: e.to_string(),
        }
    })?;

    let mut table_seen = false;
    let mut in_table = false;
    let mut rows: Vec<(usize, f64, f64)> = Vec::new();
    let mut shapes: HashMap<usize, Vec<NodeDisplacement>> = HashMap::new();
    let mut current_mode: Option<usize> = None;
    let mut seen_nodes: HashSet<u32> = HashSet::new();

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let squeezed: String = line
            .to_lowercase()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        if squeezed.contains("printofeigenvalues") {
            table_seen = true;
            in_table = true;
            current_mode = None;
            continue;
        }
        let upper = line.to_uppercase();
        if upper.contains("DISPLACEMENTS FOR MODE") {
            in_table = false;
            let mode = line
                .split_whitespace()
                .last()
                .and_then(|t| t.parse::<usize>().ok())
                .ok_or_else(|| ParseError::Malformed {
                    line_no,
                    reason: "displacement block without a mode number".to_string(),
                })?;
            current_mode = Some(mode);
            seen_nodes.clear();
            shapes.entry(mode).or_default();
            continue;
        }

        if in_table {
            if let Some(caps) = row_re.captures(line) {
                let mode: usize = caps[1].parse().map_err(|_| ParseError::Malformed {
                    line_no,
                    reason: format!("invalid mode number '{}'", &caps[1]),
                })?;
                let eigenvalue: f64 = caps[2].parse().map_err(|_| ParseError::Malformed {
                    line_no,
                    reason: format!("invalid eigenvalue '{}'", &caps[2]),
                })?;
                let frequency_hz: f64 = caps[3].parse().map_err(|_| ParseError::Malformed {
                    line_no,
                    reason: format!("invalid frequency '{}'", &caps[3]),
                })?;
                rows.push((mode, eigenvalue, frequency_hz));
            }
            continue;
        }

        if let Some(mode) = current_mode {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let first = trimmed.chars().next().unwrap_or(' ');
            if !first.is_ascii_digit() && first != '-' {
                continue;
            }
            let fields: Vec<&str> = trimmed.split_whitespace().collect();
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
            let mut components = [0.0f64; 6];
            for (i, slot) in components.iter_mut().enumerate() {
                if let Some(token) = fields.get(i + 1) {
                    *slot = token.parse().map_err(|_| ParseError::Malformed {
                        line_no,
                        reason: format!("invalid displacement '{}'", token),
                    })?;
                }
            }
            if seen_nodes.insert(node_id) {
                if let Some(block) = shapes.get_mut(&mode) {
                    block.push(NodeDisplacement::from_components(node_id, components));
                }
            }
        }
    }

    if !table_seen {
        return Err(ParseError::MissingSection("eigenvalue print".to_string()));
    }

    let requested = step.requested_modes().unwrap_or(0);
    let found = rows.len();
    let mut modes: Vec<EigenMode> = rows
        .into_iter()
        .map(|(number, eigenvalue, frequency_hz)| EigenMode {
            number,
            eigenvalue,
            frequency_hz,
            shape: shapes.remove(&number).unwrap_or_default(),
        })
        .collect();
    modes.sort_by(|a, b| a.frequency_hz.total_cmp(&b.frequency_hz));
    modes.truncate(requested);

    let mut results = ResultsModel {
        eigen: Some(EigenSummary { modes }),
        ..Default::default()
    };
    if found < requested {
        results.warnings.push(ResultWarning::IncompleteModes {
            step: step.name.clone(),
            requested,
            found,
        });
    }
    Ok(results)
}

/// Reparse the named sets out of a T-file
pub(crate) fn parse_deck_sets(text: &str) -> Result<Vec<FemSet>, ParseError> {
    let lines: Vec<&str> = text.lines().collect();
    let mut names: HashMap<u32, String> = HashMap::new();
    let mut sets: Vec<FemSet> = Vec::new();

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];
        if line.starts_with("TDSETNAM") {
            let fields = parse_fields(line, i + 1)?;
            let isref = fields.get(1).copied().unwrap_or(0.0) as u32;
            let name = lines
                .get(i + 1)
                .map(|l| l.trim().to_string())
                .filter(|n| !n.is_empty())
                .ok_or_else(|| ParseError::Malformed {
                    line_no: i + 1,
                    reason: "set name card without a name line".to_string(),
                })?;
            names.insert(isref, name);
            i += 2;
            continue;
        }
        if line.starts_with("GSETMEMB") {
            let fields = parse_fields(line, i + 1)?;
            if fields.len() < 3 {
                return Err(ParseError::Malformed {
                    line_no: i + 1,
                    reason: "set member card with too few fields".to_string(),
                });
            }
            let count = fields[0] as usize;
            let isref = fields[1] as u32;
            let kind = match fields[2] as u32 {
                1 => SetKind::Node,
                2 => SetKind::Element,
                other => {
                    return Err(ParseError::Malformed {
                        line_no: i + 1,
                        reason: format!("unknown set member type {}", other),
                    })
                }
            };
            let mut members: Vec<u32> = Vec::with_capacity(count);
            let mut j = i + 1;
            while j < lines.len() && lines[j].starts_with(' ') && members.len() < count {
                for value in parse_fields(lines[j], j + 1)? {
                    members.push(value as u32);
                }
                j += 1;
            }
            if members.len() != count {
                return Err(ParseError::Malformed {
                    line_no: i + 1,
                    reason: format!(
                        "set member card announces {} members but {} follow",
                        count,
                        members.len()
                    ),
                });
            }
            let name = names.get(&isref).cloned().ok_or_else(|| ParseError::Malformed {
                line_no: i + 1,
                reason: format!("set members reference undefined set {}", isref),
            })?;
            sets.push(FemSet::new(name, kind, members));
            i = j;
            continue;
        }
        i += 1;
    }
    Ok(sets)
}

/// Numeric fields of one card line, card name column included or not
fn parse_fields(line: &str, line_no: usize) -> Result<Vec<f64>, ParseError> {
    let data = if line.starts_with(' ') {
        line
    } else {
        line.get(8..).unwrap_or("")
    };
    data.split_whitespace()
        .map(|token| {
            token.parse::<f64>().map_err(|_| ParseError::Malformed {
                line_no,
                reason: format!("invalid card field '{}'", token),
            })
        })
        .collect()
}
