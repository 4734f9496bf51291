//! The structured IR module and its text serialization.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ScienceError, ScienceResult};

use super::attributes::{quote, ContextAttr, EvidenceAttr};
use super::types::{IrType, Symbol, DIALECT};

/// The four mechanistic operations of the dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpKind {
    /// Enzyme phosphorylates substrate.
    Phosphorylate,
    /// Agent activates target.
    Activate,
    /// Agent inhibits target.
    Inhibit,
    /// Members form a complex.
    Bind,
}

impl OpKind {
    /// All kinds, in keyword order.
    pub const ALL: [Self; 4] = [Self::Phosphorylate, Self::Activate, Self::Inhibit, Self::Bind];

    /// The keyword following `science.` in operation lines.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Phosphorylate => "phosphorylate",
            Self::Activate => "activate",
            Self::Inhibit => "inhibit",
            Self::Bind => "bind",
        }
    }

    /// Looks up a kind by keyword.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.keyword() == keyword)
    }

    /// Only phosphorylation carries a site literal.
    #[must_use]
    pub const fn takes_site(self) -> bool {
        matches!(self, Self::Phosphorylate)
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// `%sym = constant TYPE`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    pub symbol: Symbol,
    pub ty: IrType,
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = constant {}", self.symbol, self.ty)
    }
}

/// `(T1, T2) -> R`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSignature {
    pub inputs: Vec<IrType>,
    pub output: IrType,
}

impl fmt::Display for TypeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, ty) in self.inputs.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{ty}")?;
        }
        write!(f, ") -> {}", self.output)
    }
}

/// One mechanistic operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub result: Symbol,
    pub kind: OpKind,
    pub operands: Vec<Symbol>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,
    pub context: ContextAttr,
    pub evidence: EvidenceAttr,
    pub signature: TypeSignature,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {DIALECT}.{} ", self.result, self.kind)?;
        for (i, operand) in self.operands.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{operand}")?;
        }
        if let Some(site) = &self.site {
            write!(f, " at {}", quote(site))?;
        }
        write!(
            f,
            " {{context = {}}} {{evidence = {}}} : {}",
            self.context, self.evidence, self.signature
        )
    }
}

/// An IR module: declarations followed by operations.
///
/// Every operand of every operation is declared in the same module;
/// [`IrModule::push_operation`] enforces this.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IrModule {
    declarations: Vec<Declaration>,
    operations: Vec<Operation>,
}

/// First line of every emitted module.
pub const MODULE_HEADER: &str = "// Science IR - generated from claim records";

impl IrModule {
    /// Creates an empty module.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    #[must_use]
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Returns the declaration bound to `symbol`.
    #[must_use]
    pub fn declaration(&self, symbol: &Symbol) -> Option<&Declaration> {
        self.declarations.iter().find(|d| &d.symbol == symbol)
    }

    /// Adds a declaration. Declaring an existing symbol again is a no-op.
    pub fn declare(&mut self, declaration: Declaration) {
        if self.declaration(&declaration.symbol).is_none() {
            self.declarations.push(declaration);
        }
    }

    /// Appends an operation.
    ///
    /// # Errors
    ///
    /// Returns `ScienceError::Internal` if an operand is not declared.
    pub fn push_operation(&mut self, operation: Operation) -> ScienceResult<()> {
        if let Some(missing) = operation
            .operands
            .iter()
            .find(|sym| self.declaration(sym).is_none())
        {
            return Err(ScienceError::internal(format!(
                "operation {} references undeclared operand {missing}",
                operation.result
            )));
        }
        self.operations.push(operation);
        Ok(())
    }

    /// Checks that declarations are unique and every operand is declared.
    ///
    /// Modules built through [`IrModule::declare`] and
    /// [`IrModule::push_operation`] always pass; this guards modules
    /// deserialized from JSON.
    ///
    /// # Errors
    ///
    /// Returns `ScienceError::InvalidInput` describing the first problem.
    pub fn validate(&self) -> ScienceResult<()> {
        let symbols = self
            .declarations
            .iter()
            .map(|d| &d.symbol)
            .chain(self.operations.iter().map(|op| &op.result));
        for symbol in symbols {
            if !symbol.is_well_formed() {
                return Err(ScienceError::invalid_input(format!(
                    "symbol '{}' is not a valid identifier",
                    symbol.as_str()
                )));
            }
        }

        let mut seen = HashSet::new();
        for decl in &self.declarations {
            if !seen.insert(&decl.symbol) {
                return Err(ScienceError::invalid_input(format!(
                    "duplicate declaration of {}",
                    decl.symbol
                )));
            }
        }
        for op in &self.operations {
            if let Some(missing) = op.operands.iter().find(|sym| !seen.contains(sym)) {
                return Err(ScienceError::invalid_input(format!(
                    "operation {} references undeclared operand {missing}",
                    op.result
                )));
            }
        }
        Ok(())
    }

    /// Renders the module as IR text.
    #[must_use]
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Returns the blake3 digest of the rendered text.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        super::digest(&self.render())
    }

    /// Serializes the structured module to pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns `ScienceError::Internal` if serialization fails.
    pub fn to_json_pretty(&self) -> ScienceResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ScienceError::internal(format!("serialize IR module: {e}")))
    }

    /// Deserializes and validates a structured module from JSON.
    ///
    /// # Errors
    ///
    /// Returns `ScienceError::InvalidInput` for malformed JSON or a module
    /// that fails [`IrModule::validate`].
    pub fn from_json(text: &str) -> ScienceResult<Self> {
        let module: Self = serde_json::from_str(text)
            .map_err(|e| ScienceError::invalid_input(format!("deserialize IR module: {e}")))?;
        module.validate()?;
        Ok(module)
    }
}

impl fmt::Display for IrModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{MODULE_HEADER}")?;
        writeln!(f, "module {{")?;
        writeln!(f)?;
        writeln!(f, "  // Entity declarations")?;
        for decl in &self.declarations {
            writeln!(f, "  {decl}")?;
        }
        writeln!(f)?;
        writeln!(f, "  // Mechanistic operations")?;
        for op in &self.operations {
            writeln!(f, "  {op}")?;
        }
        writeln!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(s: &str) -> Symbol {
        Symbol::sanitized(s).unwrap()
    }

    fn phospho() -> Operation {
        Operation {
            result: sym("phospho_y_1"),
            kind: OpKind::Phosphorylate,
            operands: vec![sym("q1"), sym("q2")],
            site: Some("S15".to_string()),
            context: ContextAttr::new(),
            evidence: EvidenceAttr::unattested(),
            signature: TypeSignature {
                inputs: vec![IrType::new("protein", ["Q1"]), IrType::new("protein", ["Q2"])],
                output: IrType::new("protein", ["Q2"]),
            },
        }
    }

    fn module() -> IrModule {
        let mut module = IrModule::new();
        module.declare(Declaration {
            symbol: sym("q1"),
            ty: IrType::new("protein", ["Q1"]),
        });
        module.declare(Declaration {
            symbol: sym("q2"),
            ty: IrType::new("protein", ["Q2"]),
        });
        module.push_operation(phospho()).unwrap();
        module
    }

    #[test]
    fn test_keywords_roundtrip() {
        for kind in OpKind::ALL {
            assert_eq!(OpKind::from_keyword(kind.keyword()), Some(kind));
        }
        assert_eq!(OpKind::from_keyword("transcribe"), None);
        assert!(OpKind::Phosphorylate.takes_site());
        assert!(!OpKind::Bind.takes_site());
    }

    #[test]
    fn test_operation_line() {
        assert_eq!(
            phospho().to_string(),
            "%phospho_y_1 = science.phosphorylate %q1, %q2 at \"S15\" \
             {context = #science.context<>} \
             {evidence = #science.evidence<\"unknown\", \"unknown\", 0.5>} \
             : (!science.protein<Q1>, !science.protein<Q2>) -> !science.protein<Q2>"
        );
    }

    #[test]
    fn test_render_layout() {
        let text = module().render();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], MODULE_HEADER);
        assert_eq!(lines[1], "module {");
        assert_eq!(lines[4], "  %q1 = constant !science.protein<Q1>");
        assert_eq!(lines[5], "  %q2 = constant !science.protein<Q2>");
        assert!(lines[8].starts_with("  %phospho_y_1 = science.phosphorylate"));
        assert_eq!(*lines.last().unwrap(), "}");
    }

    #[test]
    fn test_declare_is_idempotent() {
        let mut module = module();
        module.declare(Declaration {
            symbol: sym("q1"),
            ty: IrType::new("gene", ["X", "1"]),
        });
        assert_eq!(module.declarations().len(), 2);
        assert!(module.declaration(&sym("q1")).unwrap().ty.is_protein());
    }

    #[test]
    fn test_push_operation_requires_declared_operands() {
        let mut module = IrModule::new();
        let err = module.push_operation(phospho()).unwrap_err();
        assert!(format!("{err}").contains("%q1"));
        assert!(module.operations().is_empty());
    }

    #[test]
    fn test_json_roundtrip_and_validation() {
        let module = module();
        let json = module.to_json_pretty().unwrap();
        assert_eq!(IrModule::from_json(&json).unwrap(), module);

        let broken = json.replace("\"symbol\": \"q1\"", "\"symbol\": \"zz\"");
        assert_ne!(broken, json);
        assert!(IrModule::from_json(&broken).is_err());
    }

    #[test]
    fn test_json_rejects_symbols_that_do_not_lex() {
        let json = module().to_json_pretty().unwrap();

        let spaced = json.replace("\"phospho_y_1\"", "\"phospho y 1\"");
        assert_ne!(spaced, json);
        let err = IrModule::from_json(&spaced).unwrap_err();
        assert!(format!("{err}").contains("phospho y 1"));

        // Renaming a declaration and its uses consistently still has to lex.
        let dashed = json.replace("\"q1\"", "\"q-1\"");
        assert_ne!(dashed, json);
        assert!(IrModule::from_json(&dashed).is_err());
    }

    #[test]
    fn test_fingerprint_is_stable() {
        assert_eq!(module().fingerprint(), module().fingerprint());
        assert_eq!(module().fingerprint().len(), 64);
    }
}
