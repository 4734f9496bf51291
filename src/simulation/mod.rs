//! IR text to executable ODE simulation.
//!
//! [`ReactionModel::parse`] recovers species and reactions from the text,
//! then [`generate`] emits the program.

mod codegen;
mod model;

pub use codegen::{generate, SimulationProgram, Term};
pub use model::{Reaction, ReactionModel, Species};

use crate::config::SimulationConfig;
use crate::error::ScienceResult;

/// Parses IR text and generates its simulation program in one step.
///
/// Parse diagnostics are returned with the model; they never stop
/// generation on their own.
///
/// # Errors
///
/// Returns `ScienceError::Codegen` if a reaction references an undeclared
/// symbol.
pub fn simulate_text(text: &str, config: &SimulationConfig) -> ScienceResult<(ReactionModel, SimulationProgram)> {
    let model = ReactionModel::parse(text, &config.rates);
    let program = generate(&model, config)?;
    Ok((model, program))
}
