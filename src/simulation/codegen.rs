//! Python ODE program generation.
//!
//! The generated program depends on numpy, scipy and matplotlib. Each
//! reaction contributes one term to `derivatives(state, t)`, in reaction
//! order; complex formation contributes none.

use std::fmt::{self, Write as _};

use serde::Serialize;
use tracing::debug;

use crate::config::SimulationConfig;
use crate::error::CodegenError;
use crate::ir::{OpKind, Symbol};

use super::model::{Reaction, ReactionModel};

/// One line of the derivative function.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    /// `derivative[s] -= k * state[e] * state[s]`
    Phosphorylation { rate: f64, enzyme: usize, substrate: usize },
    /// `derivative[t] += k * state[a]`
    Activation { rate: f64, agent: usize, target: usize },
    /// `derivative[t] -= k * state[i]`
    Inhibition { rate: f64, inhibitor: usize, target: usize },
    /// No kinetic contribution; emitted as a comment.
    Binding { members: Vec<Symbol> },
}

impl Term {
    /// Resolves a reaction's operands to state slots.
    ///
    /// # Errors
    ///
    /// Returns `CodegenError::UnresolvedOperand` if any operand has no
    /// species. There is no fallback slot.
    pub fn from_reaction(index: usize, reaction: &Reaction, model: &ReactionModel) -> Result<Self, CodegenError> {
        let slots = reaction
            .operands
            .iter()
            .map(|symbol| {
                model.slot(symbol).ok_or_else(|| CodegenError::UnresolvedOperand {
                    reaction: index + 1,
                    kind: reaction.kind.keyword().to_string(),
                    symbol: symbol.as_str().to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let rate = reaction.rate;
        Ok(match reaction.kind {
            OpKind::Phosphorylate => Self::Phosphorylation {
                rate,
                enzyme: slots[0],
                substrate: slots[1],
            },
            OpKind::Activate => Self::Activation {
                rate,
                agent: slots[0],
                target: slots[1],
            },
            OpKind::Inhibit => Self::Inhibition {
                rate,
                inhibitor: slots[0],
                target: slots[1],
            },
            OpKind::Bind => Self::Binding {
                members: reaction.operands.clone(),
            },
        })
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Phosphorylation { rate, enzyme, substrate } => write!(
                f,
                "derivative[{substrate}] -= {} * state[{enzyme}] * state[{substrate}]  # phosphorylation",
                py_float(*rate)
            ),
            Self::Activation { rate, agent, target } => write!(
                f,
                "derivative[{target}] += {} * state[{agent}]  # activation",
                py_float(*rate)
            ),
            Self::Inhibition { rate, inhibitor, target } => write!(
                f,
                "derivative[{target}] -= {} * state[{inhibitor}]  # inhibition",
                py_float(*rate)
            ),
            Self::Binding { members } => {
                f.write_str("# binding of ")?;
                for (i, m) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{m}")?;
                }
                f.write_str(": complex formation has no kinetic term")
            }
        }
    }
}

/// Python float literal; always keeps a decimal point or exponent.
fn py_float(value: f64) -> String {
    format!("{value:?}")
}

/// Python string literal.
fn py_str(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

/// A generated program and its shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationProgram {
    pub source: String,
    pub species: usize,
    pub reactions: usize,
}

/// Generates the simulation program for a model.
///
/// # Errors
///
/// Returns `CodegenError::UnresolvedOperand` for the first reaction that
/// references an undeclared symbol.
pub fn generate(model: &ReactionModel, config: &SimulationConfig) -> Result<SimulationProgram, CodegenError> {
    let terms = model
        .reactions()
        .iter()
        .enumerate()
        .map(|(i, r)| Term::from_reaction(i, r, model))
        .collect::<Result<Vec<_>, _>>()?;

    let n = model.species().len();
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = write_program(&mut out, model, &terms, config);

    debug!(species = n, reactions = terms.len(), "generated simulation program");
    Ok(SimulationProgram {
        source: out,
        species: n,
        reactions: terms.len(),
    })
}

fn write_program(out: &mut String, model: &ReactionModel, terms: &[Term], config: &SimulationConfig) -> fmt::Result {
    let n = model.species().len();

    writeln!(out, "\"\"\"Simulation generated from Science IR.\"\"\"")?;
    writeln!(out, "import numpy as np")?;
    writeln!(out, "from scipy.integrate import odeint")?;
    writeln!(out, "import matplotlib.pyplot as plt")?;
    writeln!(out)?;
    writeln!(out, "# Species: {n}")?;
    writeln!(out, "# Reactions: {}", terms.len())?;
    write!(out, "SPECIES = [")?;
    for (i, sp) in model.species().iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&py_str(sp.name()));
    }
    writeln!(out, "]")?;
    writeln!(out)?;
    writeln!(out)?;

    writeln!(out, "def initial_conditions():")?;
    writeln!(out, "    return np.full({n}, {})", py_float(config.initial_concentration))?;
    writeln!(out)?;
    writeln!(out)?;

    writeln!(out, "def derivatives(state, t):")?;
    writeln!(out, "    derivative = np.zeros({n})")?;
    for term in terms {
        writeln!(out, "    {term}")?;
    }
    writeln!(out, "    return derivative")?;
    writeln!(out)?;
    writeln!(out)?;

    writeln!(out, "def run_simulation():")?;
    writeln!(
        out,
        "    t = np.linspace({}, {}, {})",
        py_float(config.t_start),
        py_float(config.t_end),
        config.samples
    )?;
    writeln!(out, "    solution = odeint(derivatives, initial_conditions(), t)")?;
    writeln!(out, "    return t, solution")?;
    writeln!(out)?;
    writeln!(out)?;

    writeln!(out, "def render(t, solution, path={}):", py_str(&config.output_image))?;
    writeln!(out, "    plt.figure(figsize=(10, 6))")?;
    for sp in model.species() {
        writeln!(
            out,
            "    plt.plot(t, solution[:, {}], label={})",
            sp.slot,
            py_str(sp.name())
        )?;
    }
    writeln!(out, "    plt.xlabel(\"Time\")")?;
    writeln!(out, "    plt.ylabel(\"Concentration\")")?;
    writeln!(out, "    plt.title({})", py_str(&config.title))?;
    if n > 0 {
        writeln!(out, "    plt.legend()")?;
    }
    writeln!(out, "    plt.grid(True)")?;
    writeln!(out, "    plt.tight_layout()")?;
    writeln!(out, "    plt.savefig(path, dpi=150)")?;
    writeln!(out, "    print(f\"Saved plot to {{path}}\")")?;
    writeln!(out)?;
    writeln!(out)?;

    writeln!(out, "if __name__ == \"__main__\":")?;
    writeln!(out, "    render(*run_simulation())")
}
