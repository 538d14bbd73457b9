//! Export a solver deck from a JSON model file
//!
//! Usage: `deck_export <model.json> <calculix|sesam> [out_path]`

use anyhow::{bail, Context};
use fea_bridge::prelude::*;
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().collect();
    let (model_path, dialect_name) = match (args.get(1), args.get(2)) {
        (Some(model), Some(dialect)) => (model.clone(), dialect.clone()),
        _ => bail!("usage: deck_export <model.json> <calculix|sesam> [out_path]"),
    };

    let dialect = match dialect_name.as_str() {
        "calculix" => Dialect::CalculiX,
        "sesam" => Dialect::Sesam,
        other => bail!("unknown dialect '{}', expected calculix or sesam", other),
    };

    let model = UnifiedFemModel::load_from_file(&model_path)
        .with_context(|| format!("failed to load model from {}", model_path))?;

    let out_path = args
        .get(3)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(dialect.deck_file_name(&model.name)));
    dialect.write_deck(&model, &out_path)?;

    println!("Wrote {} deck to {}", dialect, out_path.display());
    Ok(())
}
