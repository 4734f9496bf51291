//! Reaction model recovered from IR text.

use std::collections::HashMap;

use serde::Serialize;

use crate::config::RateTable;
use crate::ir::{parse_document, DiagnosticKind, IrDocument, IrType, OpKind, ParseDiagnostic, Symbol};

/// A simulated quantity: one per distinct declared symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Species {
    pub symbol: Symbol,
    /// Declared type, kept for display.
    pub ty: IrType,
    /// Position in the state vector.
    pub slot: usize,
}

impl Species {
    /// Plot label: the symbol without its sigil.
    #[must_use]
    pub fn name(&self) -> &str {
        self.symbol.as_str()
    }
}

/// One operation of the IR, with its rate reinstated from the rate table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reaction {
    pub kind: OpKind,
    /// Operands in text order.
    pub operands: Vec<Symbol>,
    pub rate: f64,
    /// Source line.
    pub line: usize,
}

impl Reaction {
    /// Enzyme (phosphorylate), agent (activate) or inhibitor (inhibit).
    #[must_use]
    pub fn source(&self) -> &Symbol {
        &self.operands[0]
    }

    /// Substrate (phosphorylate) or target (activate, inhibit).
    #[must_use]
    pub fn target(&self) -> &Symbol {
        &self.operands[1]
    }
}

/// Species and reactions read from one IR text.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReactionModel {
    species: Vec<Species>,
    reactions: Vec<Reaction>,
    diagnostics: Vec<ParseDiagnostic>,
    #[serde(skip)]
    slots: HashMap<Symbol, usize>,
}

impl ReactionModel {
    /// Parses IR text into a model.
    ///
    /// Never fails: unreadable lines and dangling references are carried as
    /// diagnostics.
    #[must_use]
    pub fn parse(text: &str, rates: &RateTable) -> Self {
        Self::from_document(parse_document(text), rates)
    }

    /// Builds a model from an already parsed document.
    ///
    /// Species follow first declaration order; repeated declarations are
    /// ignored. Every operation with at least two operands becomes a
    /// reaction, in text order.
    #[must_use]
    pub fn from_document(doc: IrDocument, rates: &RateTable) -> Self {
        let mut model = Self {
            diagnostics: doc.diagnostics,
            ..Self::default()
        };

        for decl in doc.declarations {
            if model.slots.contains_key(&decl.symbol) {
                continue;
            }
            let slot = model.species.len();
            model.slots.insert(decl.symbol.clone(), slot);
            model.species.push(Species {
                symbol: decl.symbol,
                ty: decl.ty,
                slot,
            });
        }

        for op in doc.operations {
            if op.operands.len() < 2 {
                model.diagnostics.push(ParseDiagnostic::new(
                    op.line,
                    format!("{} = {}", op.result, op.kind),
                    DiagnosticKind::Malformed {
                        reason: format!("{} needs at least two operands", op.kind),
                    },
                ));
                continue;
            }
            model.reactions.push(Reaction {
                kind: op.kind,
                rate: rates.rate(op.kind),
                operands: op.operands,
                line: op.line,
            });
        }
        model.diagnostics.sort_by_key(|d| d.line);
        model
    }

    #[must_use]
    pub fn species(&self) -> &[Species] {
        &self.species
    }

    #[must_use]
    pub fn reactions(&self) -> &[Reaction] {
        &self.reactions
    }

    #[must_use]
    pub fn diagnostics(&self) -> &[ParseDiagnostic] {
        &self.diagnostics
    }

    /// State-vector slot of a declared symbol.
    #[must_use]
    pub fn slot(&self, symbol: &Symbol) -> Option<usize> {
        self.slots.get(symbol).copied()
    }
}
