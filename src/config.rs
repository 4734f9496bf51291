//! Pipeline configuration.
//!
//! Every section has a `Default` holding the fixed pipeline constants, so
//! an empty or absent config file changes nothing. Config files are JSON;
//! unknown keys are rejected.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::ir::OpKind;

/// Lowering (claims → IR) settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoweringConfig {
    /// Number of claim-resolution workers. `0` or `1` resolves sequentially.
    pub workers: usize,
    /// Maximum queued claims per worker pool.
    pub queue_capacity: usize,
}

impl Default for LoweringConfig {
    fn default() -> Self {
        Self {
            workers: 1,
            queue_capacity: 1024,
        }
    }
}

/// Rate constant per operation kind.
///
/// The parser never reads rates from IR text; it reinstates these.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RateTable {
    pub phosphorylate: f64,
    pub activate: f64,
    pub inhibit: f64,
    /// Complex formation is not modeled kinetically.
    pub bind: f64,
}

impl Default for RateTable {
    fn default() -> Self {
        Self {
            phosphorylate: 0.1,
            activate: 0.1,
            inhibit: 0.05,
            bind: 0.0,
        }
    }
}

impl RateTable {
    /// Returns the rate constant for an operation kind.
    #[must_use]
    pub const fn rate(&self, kind: OpKind) -> f64 {
        match kind {
            OpKind::Phosphorylate => self.phosphorylate,
            OpKind::Activate => self.activate,
            OpKind::Inhibit => self.inhibit,
            OpKind::Bind => self.bind,
        }
    }
}

/// Simulation program settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    pub t_start: f64,
    pub t_end: f64,
    /// Number of time samples over `[t_start, t_end]`.
    pub samples: usize,
    /// Initial value of every species.
    pub initial_concentration: f64,
    pub rates: RateTable,
    /// Plot title in the generated program.
    pub title: String,
    /// Image path the generated program saves its plot to.
    pub output_image: String,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            t_start: 0.0,
            t_end: 100.0,
            samples: 1000,
            initial_concentration: 1.0,
            rates: RateTable::default(),
            title: "Science IR simulation".to_string(),
            output_image: "simulation.png".to_string(),
        }
    }
}

/// Verifier settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VerificationConfig {
    /// Confidence at or below this value is reported as low.
    pub low_confidence_threshold: f64,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            low_confidence_threshold: 0.5,
        }
    }
}

/// Configuration for the whole pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub lowering: LoweringConfig,
    pub simulation: SimulationConfig,
    pub verification: VerificationConfig,
}

/// Upper bound on lowering workers.
pub const MAX_WORKERS: usize = 256;

impl PipelineConfig {
    /// Loads and validates a JSON config file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read, is not valid JSON
    /// for this schema, or fails [`PipelineConfig::validate`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;
        Self::from_json(&text).map_err(|err| match err {
            ConfigError::Parse { message, .. } => ConfigError::Parse {
                path: display,
                message,
            },
            other => other,
        })
    }

    /// Parses and validates a JSON config document.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for invalid JSON and
    /// `ConfigError::InvalidValue` for out-of-range settings.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text).map_err(|e| ConfigError::Parse {
            path: "<inline>".to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lowering.workers > MAX_WORKERS {
            return Err(invalid(
                "lowering.workers",
                format!("must be at most {MAX_WORKERS}"),
            ));
        }
        if self.lowering.queue_capacity == 0 {
            return Err(invalid("lowering.queue_capacity", "must be positive"));
        }

        let sim = &self.simulation;
        if !sim.t_start.is_finite() || !sim.t_end.is_finite() || sim.t_end <= sim.t_start {
            return Err(invalid(
                "simulation.t_end",
                "time interval must be finite with t_end > t_start",
            ));
        }
        if sim.samples < 2 {
            return Err(invalid("simulation.samples", "need at least 2 samples"));
        }
        if !sim.initial_concentration.is_finite() || sim.initial_concentration < 0.0 {
            return Err(invalid(
                "simulation.initial_concentration",
                "must be finite and non-negative",
            ));
        }
        for kind in OpKind::ALL {
            let rate = sim.rates.rate(kind);
            if !rate.is_finite() || rate < 0.0 {
                return Err(invalid(
                    format!("simulation.rates.{}", kind.keyword()),
                    "must be finite and non-negative",
                ));
            }
        }

        let threshold = self.verification.low_confidence_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(invalid(
                "verification.low_confidence_threshold",
                "must be in [0.0, 1.0]",
            ));
        }
        Ok(())
    }
}

fn invalid(field: impl Into<String>, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.into(),
        reason: reason.into(),
    }
}
