//! Analysis step definitions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Step capability tag, used by dialect support tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepType {
    Static,
    Eigenfrequency,
}

impl fmt::Display for StepType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepType::Static => f.write_str("static"),
            StepType::Eigenfrequency => f.write_str("eigenfrequency"),
        }
    }
}

/// Analysis parameters of a step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StepKind {
    /// Implicit static analysis with increment control
    StaticImplicit {
        total_time: f64,
        total_incr: usize,
        init_incr: f64,
        min_incr: f64,
        max_incr: f64,
        nl_geom: bool,
    },
    /// Natural frequency extraction
    Eigenfrequency { num_modes: usize },
}

/// One analysis step
///
/// Steps reference model-owned boundary conditions and loads by name;
/// model-level boundary conditions additionally apply to every step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Step name, unique within a model
    pub name: String,
    /// Analysis parameters
    pub kind: StepKind,
    /// Names of boundary conditions active only in this step
    pub bcs: Vec<String>,
    /// Names of loads active in this step
    pub loads: Vec<String>,
}

impl Step {
    /// Implicit static step with the standard increment defaults
    pub fn static_implicit(name: impl Into<String>) -> Self {
        Step {
            name: name.into(),
            kind: StepKind::StaticImplicit {
                total_time: 100.0,
                total_incr: 1000,
                init_incr: 100.0,
                min_incr: 1e-8,
                max_incr: 100.0,
                nl_geom: false,
            },
            bcs: Vec::new(),
            loads: Vec::new(),
        }
    }

    /// Eigenfrequency step requesting the given number of modes
    pub fn eigenfrequency(name: impl Into<String>, num_modes: usize) -> Self {
        Step {
            name: name.into(),
            kind: StepKind::Eigenfrequency { num_modes },
            bcs: Vec::new(),
            loads: Vec::new(),
        }
    }

    /// Attach a model-owned load to this step
    pub fn with_load(mut self, name: impl Into<String>) -> Self {
        self.loads.push(name.into());
        self
    }

    /// Attach a step-scoped boundary condition
    pub fn with_bc(mut self, name: impl Into<String>) -> Self {
        self.bcs.push(name.into());
        self
    }

    /// Enable or disable geometric nonlinearity on a static step
    pub fn with_nl_geom(mut self, on: bool) -> Self {
        if let StepKind::StaticImplicit {
            ref mut nl_geom, ..
        } = self.kind
        {
            *nl_geom = on;
        }
        self
    }

    /// Capability tag of this step
    pub fn step_type(&self) -> StepType {
        match self.kind {
            StepKind::StaticImplicit { .. } => StepType::Static,
            StepKind::Eigenfrequency { .. } => StepType::Eigenfrequency,
        }
    }

    /// Requested mode count of an eigenfrequency step
    pub fn requested_modes(&self) -> Option<usize> {
        match self.kind {
            StepKind::Eigenfrequency { num_modes } => Some(num_modes),
            _ => None,
        }
    }
}
