//! Line-oriented parser from IR text to a syntax tree.
//!
//! Both readers (the reaction model and the verifier) go through here. The
//! parser knows only the grammar, not the emitter, so hand-written IR reads
//! the same as generated IR. Lines that do not fit the grammar become
//! [`ParseDiagnostic`]s.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::attributes::{ContextAttr, EvidenceAttr};
use super::lexer::{tokenize_prefix, Token};
use super::module::{OpKind, TypeSignature};
use super::types::{IrType, Symbol, DIALECT};

/// A declaration line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclSyntax {
    /// 1-based line number.
    pub line: usize,
    pub symbol: Symbol,
    pub ty: IrType,
}

/// An operation line. Attributes and the signature are optional here so
/// that hand-written text lacking them can still be checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpSyntax {
    /// 1-based line number.
    pub line: usize,
    pub result: Symbol,
    pub kind: OpKind,
    pub operands: Vec<Symbol>,
    pub site: Option<String>,
    pub context: Option<ContextAttr>,
    pub evidence: Option<EvidenceAttr>,
    pub signature: Option<TypeSignature>,
}

/// What went wrong on a line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// The line contains input that matches no token.
    Lex { column: usize },
    /// The line is neither a declaration, an operation, nor module syntax.
    UnrecognizedLine,
    /// `science.<keyword>` with a keyword outside the dialect.
    UnsupportedOperation { keyword: String },
    /// The line starts like a known statement but does not follow the grammar.
    Malformed { reason: String },
    /// An attribute other than context or evidence; the operation is kept.
    UnknownAttribute { name: String },
    /// A symbol declared twice; the first declaration wins.
    DuplicateDeclaration { symbol: String },
    /// An operand with no declaration in the module.
    UnresolvedReference { symbol: String },
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lex { column } => write!(f, "unexpected input at column {column}"),
            Self::UnrecognizedLine => f.write_str("unrecognized line"),
            Self::UnsupportedOperation { keyword } => {
                write!(f, "unsupported operation '{DIALECT}.{keyword}'")
            }
            Self::Malformed { reason } => write!(f, "malformed statement: {reason}"),
            Self::UnknownAttribute { name } => write!(f, "unknown attribute '{name}'"),
            Self::DuplicateDeclaration { symbol } => write!(f, "duplicate declaration of %{symbol}"),
            Self::UnresolvedReference { symbol } => write!(f, "undeclared symbol %{symbol}"),
        }
    }
}

/// A recoverable problem found while reading IR text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseDiagnostic {
    /// 1-based line number.
    pub line: usize,
    /// The offending line, trimmed.
    pub text: String,
    #[serde(flatten)]
    pub kind: DiagnosticKind,
}

impl ParseDiagnostic {
    #[must_use]
    pub fn new(line: usize, text: impl Into<String>, kind: DiagnosticKind) -> Self {
        Self {
            line,
            text: text.into(),
            kind,
        }
    }
}

impl fmt::Display for ParseDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line {}: {} ({})", self.line, self.kind, self.text)
    }
}

/// Everything read from one IR text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IrDocument {
    /// Declarations in text order, duplicates included.
    pub declarations: Vec<DeclSyntax>,
    /// Operations in text order.
    pub operations: Vec<OpSyntax>,
    pub diagnostics: Vec<ParseDiagnostic>,
}

/// Parses IR text. Never fails; problems become diagnostics.
#[must_use]
pub fn parse_document(text: &str) -> IrDocument {
    let mut doc = IrDocument::default();
    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }

        let (tokens, lex_error) = tokenize_prefix(trimmed);
        let tokens = tokens.into_iter().map(|(t, _)| t).collect::<Vec<_>>();
        if let Some(err) = lex_error {
            doc.diagnostics.push(ParseDiagnostic::new(
                line_no,
                trimmed,
                DiagnosticKind::Lex { column: err.column },
            ));
            // An operation whose head and operands lexed is still checked;
            // anything else on the line is lost.
            if let LineShape::Operation(kind) = classify(&tokens) {
                if let Ok((op, _)) = parse_operation(&tokens, kind, line_no) {
                    doc.operations.push(op);
                }
            }
            continue;
        }

        match classify(&tokens) {
            LineShape::Blank | LineShape::ModuleOpen | LineShape::ModuleClose => {}
            LineShape::Declaration => match parse_declaration(&tokens, line_no) {
                Ok(decl) => doc.declarations.push(decl),
                Err(reason) => doc.diagnostics.push(ParseDiagnostic::new(
                    line_no,
                    trimmed,
                    DiagnosticKind::Malformed { reason },
                )),
            },
            LineShape::Operation(kind) => match parse_operation(&tokens, kind, line_no) {
                Ok((op, issues)) => {
                    doc.diagnostics.extend(
                        issues
                            .into_iter()
                            .map(|kind| ParseDiagnostic::new(line_no, trimmed, kind)),
                    );
                    doc.operations.push(op);
                }
                Err(reason) => doc.diagnostics.push(ParseDiagnostic::new(
                    line_no,
                    trimmed,
                    DiagnosticKind::Malformed { reason },
                )),
            },
            LineShape::UnsupportedOperation(keyword) => doc.diagnostics.push(ParseDiagnostic::new(
                line_no,
                trimmed,
                DiagnosticKind::UnsupportedOperation { keyword },
            )),
            LineShape::Unrecognized => doc.diagnostics.push(ParseDiagnostic::new(
                line_no,
                trimmed,
                DiagnosticKind::UnrecognizedLine,
            )),
        }
    }
    check_symbols(&mut doc, text);
    doc
}

/// Reports duplicate declarations and operands with no declaration.
fn check_symbols(doc: &mut IrDocument, text: &str) {
    let lines: Vec<&str> = text.lines().collect();
    let line_text = |line: usize| lines.get(line - 1).map_or("", |l| l.trim());

    let mut found = Vec::new();
    let mut declared = HashSet::new();
    for decl in &doc.declarations {
        if !declared.insert(&decl.symbol) {
            found.push(ParseDiagnostic::new(
                decl.line,
                line_text(decl.line),
                DiagnosticKind::DuplicateDeclaration {
                    symbol: decl.symbol.as_str().to_string(),
                },
            ));
        }
    }
    for op in &doc.operations {
        for operand in op.operands.iter().filter(|s| !declared.contains(s)) {
            found.push(ParseDiagnostic::new(
                op.line,
                line_text(op.line),
                DiagnosticKind::UnresolvedReference {
                    symbol: operand.as_str().to_string(),
                },
            ));
        }
    }

    doc.diagnostics.extend(found);
    doc.diagnostics.sort_by_key(|d| d.line);
}

enum LineShape {
    Blank,
    ModuleOpen,
    ModuleClose,
    Declaration,
    Operation(OpKind),
    UnsupportedOperation(String),
    Unrecognized,
}

fn classify(tokens: &[Token]) -> LineShape {
    match tokens {
        [] => LineShape::Blank,
        [Token::Ident(m), Token::LBrace] if m == "module" => LineShape::ModuleOpen,
        [Token::RBrace] => LineShape::ModuleClose,
        [Token::Symbol(_), Token::Eq, Token::Ident(word), ..] => {
            if word == "constant" {
                return LineShape::Declaration;
            }
            match word
                .strip_prefix(DIALECT)
                .and_then(|rest| rest.strip_prefix('.'))
            {
                Some(keyword) => OpKind::from_keyword(keyword).map_or_else(
                    || LineShape::UnsupportedOperation(keyword.to_string()),
                    LineShape::Operation,
                ),
                None => LineShape::Unrecognized,
            }
        }
        _ => LineShape::Unrecognized,
    }
}

fn parse_declaration(tokens: &[Token], line: usize) -> Result<DeclSyntax, String> {
    match tokens {
        [Token::Symbol(symbol), Token::Eq, Token::Ident(_), Token::Type(ty)] => Ok(DeclSyntax {
            line,
            symbol: symbol.clone(),
            ty: ty.clone(),
        }),
        [_, _, _] => Err("declaration has no type".to_string()),
        [_, _, _, other, ..] if !matches!(other, Token::Type(_)) => {
            Err(format!("expected a type after 'constant', found '{other}'"))
        }
        _ => Err("unexpected tokens after declaration type".to_string()),
    }
}

/// Parses `%res = science.kind` (already classified) followed by the
/// operand list, optional site, attributes and signature.
///
/// Only a missing head or operand list fails the line. Once the operands
/// are read the operation is kept, and problems in the rest of the line
/// are returned alongside it.
fn parse_operation(tokens: &[Token], kind: OpKind, line: usize) -> Result<(OpSyntax, Vec<DiagnosticKind>), String> {
    let Token::Symbol(result) = &tokens[0] else {
        return Err("missing result symbol".to_string());
    };
    let mut cursor = Cursor::new(&tokens[3..]);

    let mut operands = vec![cursor.symbol()?];
    while cursor.eat(&Token::Comma) {
        operands.push(cursor.symbol()?);
    }

    let mut op = OpSyntax {
        line,
        result: result.clone(),
        kind,
        operands,
        site: None,
        context: None,
        evidence: None,
        signature: None,
    };
    let mut issues = Vec::new();
    if let Err(reason) = parse_operation_tail(&mut cursor, &mut op, &mut issues) {
        issues.push(DiagnosticKind::Malformed { reason });
    }
    Ok((op, issues))
}

/// Reads site, attributes and signature into `op`, stopping at the first
/// problem that leaves the rest of the line unreadable.
fn parse_operation_tail(
    cursor: &mut Cursor<'_>,
    op: &mut OpSyntax,
    issues: &mut Vec<DiagnosticKind>,
) -> Result<(), String> {
    if cursor.peek().is_some_and(|t| t.is_ident("at")) {
        cursor.advance();
        match cursor.advance() {
            Some(Token::Str(s)) => op.site = Some(s.clone()),
            other => return Err(format!("expected a site string after 'at', found {}", describe(other))),
        }
    }

    while cursor.eat(&Token::LBrace) {
        let attr_name = match cursor.advance() {
            Some(Token::Ident(name)) => name.clone(),
            other => return Err(format!("expected an attribute name, found {}", describe(other))),
        };
        cursor.expect(&Token::Eq)?;
        let parsed = match cursor.advance() {
            Some(Token::AttrName(value)) if value == &format!("{DIALECT}.context") => {
                parse_context_body(cursor).map(|ctx| op.context = Some(ctx))
            }
            Some(Token::AttrName(value)) if value == &format!("{DIALECT}.evidence") => {
                parse_evidence_body(cursor).map(|ev| op.evidence = Some(ev))
            }
            _ => {
                issues.push(DiagnosticKind::UnknownAttribute { name: attr_name.clone() });
                Ok(())
            }
        };
        if let Err(reason) = parsed {
            issues.push(DiagnosticKind::Malformed {
                reason: format!("attribute '{attr_name}': {reason}"),
            });
        }
        // Resynchronize on the closing brace whatever the attribute held.
        if !cursor.skip_past(&Token::RBrace) {
            return Err(format!("attribute '{attr_name}' is not closed"));
        }
    }

    if cursor.eat(&Token::Colon) {
        op.signature = Some(parse_signature(cursor)?);
    }

    match cursor.peek() {
        Some(extra) => Err(format!("unexpected '{extra}' after operation")),
        None => Ok(()),
    }
}

fn parse_context_body(cursor: &mut Cursor<'_>) -> Result<ContextAttr, String> {
    cursor.expect(&Token::LAngle)?;
    let mut ctx = ContextAttr::new();
    if cursor.eat(&Token::RAngle) {
        return Ok(ctx);
    }
    loop {
        let key = match cursor.advance() {
            Some(Token::Ident(key)) => key.clone(),
            other => return Err(format!("expected a context key, found {}", describe(other))),
        };
        cursor.expect(&Token::Eq)?;
        let value = match cursor.advance() {
            Some(Token::Str(value)) => value.clone(),
            other => return Err(format!("expected a quoted value for '{key}', found {}", describe(other))),
        };
        ctx.push(key, value);
        if cursor.eat(&Token::RAngle) {
            return Ok(ctx);
        }
        cursor.expect(&Token::Comma)?;
    }
}

fn parse_evidence_body(cursor: &mut Cursor<'_>) -> Result<EvidenceAttr, String> {
    cursor.expect(&Token::LAngle)?;
    let source_id = cursor.string("source id")?;
    cursor.expect(&Token::Comma)?;
    let record_id = cursor.string("record id")?;
    cursor.expect(&Token::Comma)?;
    let confidence = match cursor.advance() {
        Some(Token::Number(n)) => *n,
        other => return Err(format!("expected a confidence number, found {}", describe(other))),
    };
    let source_kind = if cursor.eat(&Token::Comma) {
        Some(cursor.string("source kind")?)
    } else {
        None
    };
    cursor.expect(&Token::RAngle)?;
    Ok(EvidenceAttr {
        source_id,
        record_id,
        confidence,
        source_kind,
    })
}

fn parse_signature(cursor: &mut Cursor<'_>) -> Result<TypeSignature, String> {
    cursor.expect(&Token::LParen)?;
    let mut inputs = Vec::new();
    if !cursor.eat(&Token::RParen) {
        loop {
            inputs.push(cursor.ty()?);
            if cursor.eat(&Token::RParen) {
                break;
            }
            cursor.expect(&Token::Comma)?;
        }
    }
    cursor.expect(&Token::Arrow)?;
    let output = cursor.ty()?;
    Ok(TypeSignature { inputs, output })
}

fn describe(token: Option<&Token>) -> String {
    token.map_or_else(|| "end of line".to_string(), |t| format!("'{t}'"))
}

struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Cursor<'a> {
    const fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: &Token) -> Result<(), String> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(format!("expected '{expected}', found {}", describe(self.peek())))
        }
    }

    /// Advances past the next `target`; returns false if there is none.
    fn skip_past(&mut self, target: &Token) -> bool {
        match self.tokens[self.pos..].iter().position(|t| t == target) {
            Some(offset) => {
                self.pos += offset + 1;
                true
            }
            None => false,
        }
    }

    fn symbol(&mut self) -> Result<Symbol, String> {
        match self.advance() {
            Some(Token::Symbol(sym)) => Ok(sym.clone()),
            other => Err(format!("expected an operand symbol, found {}", describe(other))),
        }
    }

    fn string(&mut self, what: &str) -> Result<String, String> {
        match self.advance() {
            Some(Token::Str(s)) => Ok(s.clone()),
            other => Err(format!("expected a quoted {what}, found {}", describe(other))),
        }
    }

    fn ty(&mut self) -> Result<IrType, String> {
        match self.advance() {
            Some(Token::Type(ty)) => Ok(ty.clone()),
            other => Err(format!("expected a type, found {}", describe(other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"// Science IR - generated from claim records
module {

  // Entity declarations
  %q1 = constant !science.protein<Q1>
  %tp53 = constant !science.gene<TP53, 11998>

  // Mechanistic operations
  %phospho_y_1 = science.phosphorylate %q1, %tp53 at "S15" {context = #science.context<cell_type="HeLa">} {evidence = #science.evidence<"123", "unknown", 0.8, "reach">} : (!science.protein<Q1>, !science.gene<TP53, 11998>) -> !science.gene<TP53, 11998>
  %complex_2 = science.bind %q1, %tp53 {context = #science.context<>} {evidence = #science.evidence<"unknown", "unknown", 0.5>} : (!science.protein<Q1>, !science.gene<TP53, 11998>) -> !science.protein<complex>
}
"#;

    #[test]
    fn test_parses_sample() {
        let doc = parse_document(SAMPLE);
        assert!(doc.diagnostics.is_empty(), "{:?}", doc.diagnostics);
        assert_eq!(doc.declarations.len(), 2);
        assert_eq!(doc.declarations[1].symbol.as_str(), "tp53");
        assert_eq!(doc.declarations[1].line, 6);

        assert_eq!(doc.operations.len(), 2);
        let phospho = &doc.operations[0];
        assert_eq!(phospho.kind, OpKind::Phosphorylate);
        assert_eq!(phospho.line, 9);
        assert_eq!(phospho.site.as_deref(), Some("S15"));
        assert_eq!(
            phospho.operands.iter().map(Symbol::as_str).collect::<Vec<_>>(),
            vec!["q1", "tp53"]
        );
        assert_eq!(phospho.context.as_ref().unwrap().get("cell_type"), Some("HeLa"));
        let evidence = phospho.evidence.as_ref().unwrap();
        assert_eq!(evidence.confidence, 0.8);
        assert_eq!(evidence.source_kind.as_deref(), Some("reach"));
        assert_eq!(phospho.signature.as_ref().unwrap().inputs.len(), 2);

        let bind = &doc.operations[1];
        assert_eq!(bind.kind, OpKind::Bind);
        assert!(bind.context.as_ref().unwrap().is_empty());
        assert_eq!(bind.signature.as_ref().unwrap().output, IrType::complex());
    }

    #[test]
    fn test_bare_operation_without_attributes() {
        let doc = parse_document("%x = science.inhibit %a, %b");
        assert!(doc.diagnostics.is_empty());
        let op = &doc.operations[0];
        assert!(op.evidence.is_none());
        assert!(op.context.is_none());
        assert!(op.signature.is_none());
    }

    #[test]
    fn test_attribute_order_is_not_significant_for_readers() {
        let doc = parse_document(
            "%x = science.activate %a, %b {evidence = #science.evidence<\"1\", \"2\", 0.3>} {context = #science.context<organism=\"human\">}",
        );
        assert!(doc.diagnostics.is_empty());
        let op = &doc.operations[0];
        assert_eq!(op.evidence.as_ref().unwrap().confidence, 0.3);
        assert_eq!(op.context.as_ref().unwrap().get("organism"), Some("human"));
    }

    #[test]
    fn test_unrecognized_lines_are_reported() {
        let doc = parse_document("module {\n  this is not ir\n  %a = science.transcribe %b, %c\n}\n");
        assert_eq!(doc.diagnostics.len(), 2);
        assert_eq!(doc.diagnostics[0].line, 2);
        assert_eq!(doc.diagnostics[0].kind, DiagnosticKind::UnrecognizedLine);
        assert_eq!(doc.diagnostics[0].text, "this is not ir");
        assert_eq!(
            doc.diagnostics[1].kind,
            DiagnosticKind::UnsupportedOperation {
                keyword: "transcribe".to_string()
            }
        );
    }

    #[test]
    fn test_lex_error_is_reported() {
        let doc = parse_document("%a = constant !science.protein<P1> $");
        assert!(doc.declarations.is_empty());
        assert!(matches!(doc.diagnostics[0].kind, DiagnosticKind::Lex { .. }));
    }

    #[test]
    fn test_malformed_declaration() {
        let doc = parse_document("%a = constant\n%b = constant %c");
        assert_eq!(doc.diagnostics.len(), 2);
        assert!(doc
            .diagnostics
            .iter()
            .all(|d| matches!(d.kind, DiagnosticKind::Malformed { .. })));
    }

    #[test]
    fn test_malformed_evidence_keeps_operation() {
        let doc = parse_document("%x = science.activate %a, %b {evidence = #science.evidence<\"1\", 0.9>}");
        assert_eq!(doc.operations.len(), 1);
        assert!(doc.operations[0].evidence.is_none());
        assert_eq!(doc.diagnostics.len(), 1);
        assert!(matches!(doc.diagnostics[0].kind, DiagnosticKind::Malformed { .. }));
    }

    #[test]
    fn test_unknown_attribute_keeps_operation() {
        let doc = parse_document("%x = science.activate %a, %b {note = #science.note<\"x\">}");
        assert_eq!(doc.operations.len(), 1);
        assert_eq!(
            doc.diagnostics[0].kind,
            DiagnosticKind::UnknownAttribute {
                name: "note".to_string()
            }
        );
    }

    #[test]
    fn test_missing_operand_is_malformed() {
        let doc = parse_document("%x = science.activate at \"S1\"");
        assert!(doc.operations.is_empty());
        assert!(matches!(doc.diagnostics[0].kind, DiagnosticKind::Malformed { .. }));
    }

    #[test]
    fn test_duplicate_and_unresolved_symbols() {
        let doc = parse_document(
            "%a = constant !science.protein<A>\n\
             %x = science.activate %a, %ghost\n\
             %a = constant !science.gene<A, 1>\n",
        );
        assert_eq!(doc.declarations.len(), 2);
        assert_eq!(doc.operations.len(), 1);
        assert_eq!(doc.diagnostics.len(), 2);
        assert_eq!(doc.diagnostics[0].line, 2);
        assert_eq!(
            doc.diagnostics[0].kind,
            DiagnosticKind::UnresolvedReference {
                symbol: "ghost".to_string()
            }
        );
        assert_eq!(doc.diagnostics[1].line, 3);
        assert!(matches!(doc.diagnostics[1].kind, DiagnosticKind::DuplicateDeclaration { .. }));
    }

    #[test]
    fn test_trailing_garbage_keeps_operation() {
        let doc = parse_document("%x = science.bind %a, %b : (!science.protein<A>) -> !science.protein<complex> extra");
        assert_eq!(doc.operations.len(), 1);
        assert_eq!(doc.operations[0].signature.as_ref().unwrap().output, IrType::complex());
        let malformed: Vec<_> = doc
            .diagnostics
            .iter()
            .filter(|d| matches!(d.kind, DiagnosticKind::Malformed { .. }))
            .collect();
        assert_eq!(malformed.len(), 1);
    }

    #[test]
    fn test_truncated_signature_keeps_attributes() {
        let doc = parse_document(
            "%x = science.phosphorylate %a, %b at \"S1\" {evidence = #science.evidence<\"1\", \"2\", 0.9>} : (!science.gene<A, 1>, !science.protein<B>)",
        );
        assert_eq!(doc.operations.len(), 1);
        let op = &doc.operations[0];
        assert_eq!(op.site.as_deref(), Some("S1"));
        assert_eq!(op.evidence.as_ref().unwrap().confidence, 0.9);
        assert!(op.signature.is_none());
        assert_eq!(
            doc.diagnostics[0].kind,
            DiagnosticKind::Malformed {
                reason: "expected '->', found end of line".to_string()
            }
        );
    }

    #[test]
    fn test_lex_error_after_operands_keeps_operation() {
        let doc = parse_document("%x = science.activate %a, %b {evidence = #science.evidence<\"1\", \"2\", $>}");
        assert_eq!(doc.operations.len(), 1);
        assert_eq!(doc.operations[0].operands.len(), 2);
        assert!(doc.operations[0].evidence.is_none());
        // Only the lex error and the two undeclared operands; nothing for the cut-off tail.
        assert_eq!(doc.diagnostics.len(), 3);
        assert!(matches!(doc.diagnostics[0].kind, DiagnosticKind::Lex { column: 70 }));
    }

    #[test]
    fn test_lex_error_in_operands_drops_operation() {
        let doc = parse_document("%x = science.activate %a, $b");
        assert!(doc.operations.is_empty());
        assert!(matches!(doc.diagnostics[0].kind, DiagnosticKind::Lex { .. }));
    }

    #[test]
    fn test_confidence_without_leading_digit() {
        let doc = parse_document("%x = science.activate %a, %b {evidence = #science.evidence<\"1\", \"2\", .2>}");
        assert!(doc.diagnostics.iter().all(|d| !matches!(d.kind, DiagnosticKind::Lex { .. })));
        assert_eq!(doc.operations[0].evidence.as_ref().unwrap().confidence, 0.2);
    }
}
