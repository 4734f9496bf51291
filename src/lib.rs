//! # Science IR
//!
//! Lowers mechanistic biology claims ("X phosphorylates Y at S15") into a
//! small textual IR, then derives two consequences from that text: an
//! executable ODE simulation program and a semantic consistency report.
//!
//! ## Pipeline
//!
//! - [`lower`]: claim records → [`ir::IrModule`] → IR text
//! - [`simulation`]: IR text → species/reactions → Python program
//! - [`verify`]: IR text → violations and an exit status
//!
//! The IR text is the only channel between lowering and the two
//! downstream passes; both read it through [`ir::parse_document`].
//!
//! ## Usage
//!
//! ```
//! use science_ir::config::PipelineConfig;
//! use science_ir::{lower, simulation, verify};
//!
//! let claims = r#"[{"type": "Activation",
//!                   "subj": {"name": "MEK1", "db_refs": {"UP": "Q02750"}},
//!                   "obj": {"name": "ERK2", "db_refs": {"UP": "P28482"}}}]"#;
//! let config = PipelineConfig::default();
//!
//! let lowered = lower::lower_document(claims, &config.lowering).unwrap();
//! let text = lowered.text();
//!
//! let (model, program) = simulation::simulate_text(&text, &config.simulation).unwrap();
//! assert_eq!(model.species().len(), 2);
//! assert!(program.source.contains("derivative[1] += 0.1 * state[0]"));
//!
//! let report = verify::verify(&text, &config.verification);
//! assert_eq!(report.exit_code(), 0);
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod claim;
pub mod cli;
pub mod config;
pub mod entity;
pub mod error;
pub mod ir;
pub mod lower;
pub mod simulation;
pub mod verify;

pub use claim::{AgentRecord, ClaimKind, ClaimRecord, EvidenceRecord};
pub use config::PipelineConfig;
pub use entity::{Entity, EntityKey, EntityKind};
pub use error::{ClaimError, CodegenError, ConfigError, ScienceError, ScienceResult};
pub use ir::{IrModule, OpKind, Symbol};
pub use lower::{lower_claims, lower_document, LoweredModule, LoweringReport};
pub use simulation::{generate, ReactionModel, SimulationProgram};
pub use verify::{verify, Severity, VerificationReport, Violation};
