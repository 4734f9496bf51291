//! Semantic consistency checks over IR text.
//!
//! The verifier reads the text through the shared parser and keeps only
//! declaration types; it never sees the reaction model. Rules run in a
//! fixed order and append to one violation list:
//!
//! 1. evidence: missing evidence, or confidence at or below the threshold
//! 2. types: a phosphorylating enzyme must be declared as a protein
//! 3. contradictions: an ordered pair that is both inhibited and activated

mod report;

use std::collections::HashMap;

use tracing::{debug, info};

use crate::config::VerificationConfig;
use crate::ir::{digest, parse_document, IrDocument, IrType, OpKind, Symbol};

pub use report::{Location, Severity, VerificationReport, Violation};

/// Verifies IR text.
#[must_use]
pub fn verify(text: &str, config: &VerificationConfig) -> VerificationReport {
    let doc = parse_document(text);
    let mut violations = Vec::new();

    check_evidence(&doc, config, &mut violations);
    check_types(&doc, &mut violations);
    check_contradictions(&doc, &mut violations);

    let report = VerificationReport {
        operations: doc.operations.len(),
        violations,
        diagnostics: doc.diagnostics,
        digest: digest(text),
    };
    info!(
        operations = report.operations,
        violations = report.violations.len(),
        errors = report.error_count(),
        diagnostics = report.diagnostics.len(),
        "verification complete"
    );
    report
}

fn check_evidence(doc: &IrDocument, config: &VerificationConfig, out: &mut Vec<Violation>) {
    for op in &doc.operations {
        match &op.evidence {
            None => out.push(Violation::warning(Location::Line(op.line), "Missing evidence")),
            Some(ev) if ev.confidence <= config.low_confidence_threshold => out.push(Violation::info(
                Location::Line(op.line),
                format!("Low confidence: {:?}", ev.confidence),
            )),
            Some(_) => {}
        }
    }
}

fn check_types(doc: &IrDocument, out: &mut Vec<Violation>) {
    let mut types: HashMap<&Symbol, &IrType> = HashMap::new();
    for decl in &doc.declarations {
        types.entry(&decl.symbol).or_insert(&decl.ty);
    }

    for op in doc.operations.iter().filter(|op| op.kind == OpKind::Phosphorylate) {
        let Some(enzyme) = op.operands.first() else {
            continue;
        };
        // Undeclared enzymes are left to the parse diagnostics.
        if let Some(ty) = types.get(enzyme) {
            if !ty.is_protein() {
                debug!(line = op.line, enzyme = %enzyme, ty = %ty, "non-protein kinase");
                out.push(Violation::error(Location::Line(op.line), "Kinase must be protein"));
            }
        }
    }
}

fn check_contradictions(doc: &IrDocument, out: &mut Vec<Violation>) {
    #[derive(Default)]
    struct Seen {
        inhibits: bool,
        activates: bool,
    }

    let mut order: Vec<(&Symbol, &Symbol)> = Vec::new();
    let mut seen: HashMap<(&Symbol, &Symbol), Seen> = HashMap::new();
    for op in &doc.operations {
        let [first, second, ..] = op.operands.as_slice() else {
            continue;
        };
        let pair = (first, second);
        let entry = seen.entry(pair).or_insert_with(|| {
            order.push(pair);
            Seen::default()
        });
        match op.kind {
            OpKind::Inhibit => entry.inhibits = true,
            OpKind::Activate => entry.activates = true,
            OpKind::Phosphorylate | OpKind::Bind => {}
        }
    }

    for pair in order {
        if seen.get(&pair).is_some_and(|s| s.inhibits && s.activates) {
            out.push(Violation::warning(
                Location::MultipleOps,
                format!("{} both inhibits AND activates {}", pair.0, pair.1),
            ));
        }
    }
}
