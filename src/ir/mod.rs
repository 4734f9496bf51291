//! The Science IR: structured module tree, text form, and the shared
//! reading side (lexer and line parser).
//!
//! The text produced by [`IrModule::render`] is the only channel between
//! lowering and the downstream passes. Readers go through
//! [`parse_document`] and never depend on how the text was produced.

mod attributes;
mod lexer;
mod module;
mod syntax;
mod types;

pub use attributes::{quote, unquote, ContextAttr, EvidenceAttr, UNKNOWN};
pub use lexer::{tokenize, LexError, Token};
pub use module::{Declaration, IrModule, OpKind, Operation, TypeSignature, MODULE_HEADER};
pub use syntax::{
    parse_document, DeclSyntax, DiagnosticKind, IrDocument, OpSyntax, ParseDiagnostic,
};
pub use types::{IrType, Symbol, TypeParam, DIALECT};

/// Returns the blake3 hex digest of IR text.
///
/// Both the lowering and verification tools report this digest so an
/// emitted artifact can be matched to its report.
#[must_use]
pub fn digest(text: &str) -> String {
    blake3::hash(text.as_bytes()).to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_is_hex_and_content_sensitive() {
        let a = digest("module {\n}\n");
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(a, digest("module {\n}\n"));
        assert_ne!(a, digest("module {\n}"));
    }

    #[test]
    fn test_rendered_module_parses_back() {
        let mut module = IrModule::new();
        let a = Symbol::sanitized("P1").unwrap();
        let b = Symbol::sanitized("P2").unwrap();
        for (sym, id) in [(&a, "P1"), (&b, "P2")] {
            module.declare(Declaration {
                symbol: sym.clone(),
                ty: IrType::new("protein", [id]),
            });
        }
        module
            .push_operation(Operation {
                result: Symbol::sanitized("activated_p2_1").unwrap(),
                kind: OpKind::Activate,
                operands: vec![a.clone(), b.clone()],
                site: None,
                context: ContextAttr::new(),
                evidence: EvidenceAttr::unattested(),
                signature: TypeSignature {
                    inputs: vec![IrType::new("protein", ["P1"]), IrType::new("protein", ["P2"])],
                    output: IrType::new("protein", ["P2"]),
                },
            })
            .unwrap();

        let doc = parse_document(&module.render());
        assert!(doc.diagnostics.is_empty(), "{:?}", doc.diagnostics);
        assert_eq!(doc.declarations.len(), 2);
        let op = &doc.operations[0];
        assert_eq!(op.kind, OpKind::Activate);
        assert_eq!(op.operands, vec![a, b]);
        assert_eq!(op.evidence.as_ref().unwrap(), &EvidenceAttr::unattested());
        assert_eq!(op.signature.as_ref(), Some(&module.operations()[0].signature));
    }
}
