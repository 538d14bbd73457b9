//! Cantilever eigenfrequency demo
//!
//! Builds a beam meshed into four line elements, writes the CalculiX
//! deck into a workspace and, when `ccx` (or `CCX_EXE`) is available,
//! runs the analysis and prints the parsed modes as JSON. Pass
//! `--deck-only` to stop after writing the deck.

use anyhow::Context;
use fea_bridge::prelude::*;
use std::time::Duration;

fn build_model() -> anyhow::Result<UnifiedFemModel> {
    let line = StraightLine::new("beam", [0.0, 0.0, 0.0], [2.0, 0.0, 0.0]);
    let mesh = line.discretize(0.5, MeshOrder::Linear)?;
    let element_ids: Vec<u32> = mesh.elements.iter().map(|e| e.id).collect();
    let mut model = mesh.into_model()?;
    model.name = "cantilever".to_string();

    model.add_set(FemSet::nodes("support", vec![1]))?;
    model.add_set(FemSet::elements("beams", element_ids))?;
    model.add_material(Material::steel("S355"))?;
    model.add_section(Section::beam(
        "beam_section",
        "beams",
        "S355",
        SectionProfile::rectangular(0.1, 0.1),
    ))?;
    model.add_boundary_condition(BoundaryCondition::fixed("clamp", "support"))?;
    model.add_step(Step::eigenfrequency("modes", 3))?;
    Ok(model)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let deck_only = std::env::args().any(|a| a == "--deck-only");
    let model = build_model()?;

    let workspace = Workspace::new()?;
    let dialect = Dialect::CalculiX;
    let deck_path = workspace.path().join(dialect.deck_file_name(&model.name));
    dialect.write_deck(&model, &deck_path)?;

    if deck_only {
        let kept = workspace.keep();
        println!("Deck written to {}", kept.join("cantilever.inp").display());
        return Ok(());
    }

    let job = dialect.solver_job(&deck_path)?;
    let outcome = Executor::with_timeout(Duration::from_secs(300))
        .execute(&job, workspace.path())
        .context("solver run failed; pass --deck-only to skip execution")?;
    let results = dialect.read_results(&model, &outcome.artifact)?;

    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}
