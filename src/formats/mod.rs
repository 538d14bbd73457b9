//! Solver backend adapters
//!
//! Each supported backend is a [`Dialect`] variant with its own deck
//! grammar, capability table, run convention and result reader. Writers
//! assemble the whole deck in memory and write the file in one step, so a
//! rejected model never leaves a partial deck behind.

mod calculix;
mod sesam;

use crate::elements::{ElementType, FemSet};
use crate::model::UnifiedFemModel;
use crate::results::ResultsModel;
use crate::steps::StepType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::exec::{SolverCommand, SolverJob};

/// Errors raised while writing a solver deck
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    /// The dialect cannot express a step or element the model contains
    #[error("{dialect} cannot express {feature}")]
    Unsupported {
        dialect: &'static str,
        feature: String,
    },

    #[error("Deck generation failed: {0}")]
    Generation(String),

    #[error("Invalid deck path: {0}")]
    InvalidPath(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while reading a result artifact
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Result file is missing the {0} section")]
    MissingSection(String),

    #[error("Malformed result line {line_no}: {reason}")]
    Malformed { line_no: usize, reason: String },

    #[error("Result references node {0} which is not in the model")]
    UnknownNode(u32),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

const CALCULIX_STEPS: &[StepType] = &[StepType::Static, StepType::Eigenfrequency];
const SESAM_STEPS: &[StepType] = &[StepType::Eigenfrequency];

/// A solver backend the pipeline can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dialect {
    /// CalculiX keyword/value decks (`.inp`), static and eigenfrequency
    CalculiX,
    /// Sesam fixed-format input interface files (`T100.FEM`), eigenfrequency
    Sesam,
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Dialect {
    /// Dialect name used in logs and error messages
    pub fn name(&self) -> &'static str {
        match self {
            Dialect::CalculiX => "calculix",
            Dialect::Sesam => "sesam",
        }
    }

    /// Step types the dialect can express
    pub fn supported_step_types(&self) -> &'static [StepType] {
        match self {
            Dialect::CalculiX => CALCULIX_STEPS,
            Dialect::Sesam => SESAM_STEPS,
        }
    }

    /// Whether the dialect can express a step type
    pub fn supports_step(&self, step_type: StepType) -> bool {
        self.supported_step_types().contains(&step_type)
    }

    /// Whether the dialect can express an element type
    pub fn supports_element(&self, etype: ElementType) -> bool {
        match self {
            Dialect::CalculiX => true,
            Dialect::Sesam => sesam::element_code(etype).is_some(),
        }
    }

    /// Deck file name for a job
    pub fn deck_file_name(&self, job: &str) -> String {
        match self {
            Dialect::CalculiX => format!("{}.inp", job),
            Dialect::Sesam => format!("{}T100.FEM", job),
        }
    }

    /// Result artifact file name for a job
    pub fn result_file_name(&self, job: &str) -> String {
        match self {
            Dialect::CalculiX => format!("{}.dat", job),
            Dialect::Sesam => "SESTRA.LIS".to_string(),
        }
    }

    /// Render the model as a deck string
    ///
    /// Output depends only on the model, so writing an unmodified model
    /// twice yields identical bytes.
    pub fn deck_string(&self, model: &UnifiedFemModel) -> Result<String, WriteError> {
        self.check_capabilities(model)?;
        match self {
            Dialect::CalculiX => calculix::deck_string(model),
            Dialect::Sesam => sesam::deck_string(model),
        }
    }

    /// Write the model as a deck file
    ///
    /// The deck is rendered fully before the file is created; on error no
    /// file is written.
    pub fn write_deck(&self, model: &UnifiedFemModel, out_path: &Path) -> Result<(), WriteError> {
        let deck = self.deck_string(model)?;
        std::fs::write(out_path, deck)?;
        tracing::info!(
            "Wrote {} deck for model '{}' to {}",
            self.name(),
            model.name,
            out_path.display()
        );
        Ok(())
    }

    /// Read a result artifact produced by running a deck of this model
    ///
    /// The model supplies the requested mode counts and the valid node id
    /// domain; displacements come back keyed by the ids written to the
    /// deck.
    pub fn read_results(
        &self,
        model: &UnifiedFemModel,
        artifact: &Path,
    ) -> Result<ResultsModel, ParseError> {
        let text = std::fs::read_to_string(artifact)?;
        let results = match self {
            Dialect::CalculiX => calculix::parse_results(model, &text)?,
            Dialect::Sesam => sesam::parse_results(model, &text)?,
        };
        for warning in &results.warnings {
            tracing::warn!("{}: {}", artifact.display(), warning);
        }
        Ok(results)
    }

    /// Reparse the named sets out of a deck written by this dialect
    pub fn read_deck_sets(&self, deck_path: &Path) -> Result<Vec<FemSet>, ParseError> {
        let text = std::fs::read_to_string(deck_path)?;
        match self {
            Dialect::CalculiX => calculix::parse_deck_sets(&text),
            Dialect::Sesam => sesam::parse_deck_sets(&text),
        }
    }

    /// Run convention for a deck: program, arguments and expected artifact
    ///
    /// The executable comes from `CCX_EXE` or `SESTRA_EXE`, falling back
    /// to the plain command name. Callers may override the command on the
    /// returned job.
    pub fn solver_job(&self, deck_path: &Path) -> Result<SolverJob, WriteError> {
        let stem = deck_path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| WriteError::InvalidPath(deck_path.display().to_string()))?;
        match self {
            Dialect::CalculiX => {
                let program =
                    std::env::var("CCX_EXE").unwrap_or_else(|_| "ccx".to_string());
                Ok(SolverJob {
                    command: SolverCommand {
                        program,
                        args: vec![stem.to_string()],
                    },
                    artifact: format!("{}.dat", stem).into(),
                })
            }
            Dialect::Sesam => {
                let program =
                    std::env::var("SESTRA_EXE").unwrap_or_else(|_| "sestra".to_string());
                Ok(SolverJob {
                    command: SolverCommand {
                        program,
                        args: vec!["/dsf".to_string(), stem.to_string()],
                    },
                    artifact: "SESTRA.LIS".into(),
                })
            }
        }
    }

    /// Reject models containing anything this dialect cannot express
    fn check_capabilities(&self, model: &UnifiedFemModel) -> Result<(), WriteError> {
        for step in model.steps() {
            let step_type = step.step_type();
            if !self.supports_step(step_type) {
                return Err(WriteError::Unsupported {
                    dialect: self.name(),
                    feature: format!("step '{}' of type {}", step.name, step_type),
                });
            }
        }
        for element in model.elements() {
            if !self.supports_element(element.etype) {
                return Err(WriteError::Unsupported {
                    dialect: self.name(),
                    feature: format!("element type {}", element.etype),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_tables() {
        assert!(Dialect::CalculiX.supports_step(StepType::Static));
        assert!(Dialect::CalculiX.supports_step(StepType::Eigenfrequency));
        assert!(!Dialect::Sesam.supports_step(StepType::Static));
        assert!(Dialect::Sesam.supports_step(StepType::Eigenfrequency));

        assert!(Dialect::CalculiX.supports_element(ElementType::C3D20));
        assert!(Dialect::Sesam.supports_element(ElementType::B32));
        assert!(!Dialect::Sesam.supports_element(ElementType::C3D4));
    }

    #[test]
    fn test_file_name_conventions() {
        assert_eq!(Dialect::CalculiX.deck_file_name("beam"), "beam.inp");
        assert_eq!(Dialect::CalculiX.result_file_name("beam"), "beam.dat");
        assert_eq!(Dialect::Sesam.deck_file_name("beam"), "beamT100.FEM");
        assert_eq!(Dialect::Sesam.result_file_name("beam"), "SESTRA.LIS");
    }

    #[test]
    fn test_solver_job_conventions() {
        let job = Dialect::CalculiX
            .solver_job(Path::new("/tmp/work/beam.inp"))
            .unwrap();
        assert_eq!(job.command.args, vec!["beam".to_string()]);
        assert_eq!(job.artifact, std::path::PathBuf::from("beam.dat"));

        let job = Dialect::Sesam
            .solver_job(Path::new("/tmp/work/beamT100.FEM"))
            .unwrap();
        assert_eq!(
            job.command.args,
            vec!["/dsf".to_string(), "beamT100".to_string()]
        );
        assert_eq!(job.artifact, std::path::PathBuf::from("SESTRA.LIS"));
    }
}
