//! Symbols and dialect types.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::attributes::{quote, unquote};

/// Dialect namespace shared by types, operations and attributes.
pub const DIALECT: &str = "science";

fn non_word() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-z0-9_]").expect("symbol sanitizer regex is valid"))
}

fn symbol_body() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("symbol body regex is valid"))
}

/// A symbolic identifier bound within an IR module, stored without its `%`
/// sigil.
///
/// Symbols contain only ASCII letters, digits and `_`, so the text form
/// `%name` is always one lexer token. Generated symbols are lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Builds a symbol from arbitrary text: lower-cased, with every character
    /// outside `[a-z0-9_]` (including `-` and spaces) replaced by `_`.
    ///
    /// Returns `None` if the input is blank.
    ///
    /// # Examples
    ///
    /// ```
    /// use science_ir::ir::Symbol;
    ///
    /// let sym = Symbol::sanitized("CDK-2 alpha").unwrap();
    /// assert_eq!(sym.to_string(), "%cdk_2_alpha");
    /// ```
    #[must_use]
    pub fn sanitized(raw: &str) -> Option<Self> {
        let lowered = raw.trim().to_lowercase();
        if lowered.is_empty() {
            return None;
        }
        Some(Self(non_word().replace_all(&lowered, "_").into_owned()))
    }

    /// Wraps a symbol body taken verbatim from a lexer token.
    #[must_use]
    pub(crate) fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the symbol body without the sigil.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the symbol renders as a single `%name` token.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        symbol_body().is_match(&self.0)
    }

    /// Returns a new symbol with `_<n>` appended.
    #[must_use]
    pub fn with_suffix(&self, n: u64) -> Self {
        Self(format!("{}_{n}", self.0))
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.0)
    }
}

/// One parameter of a dialect type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "form", content = "value", rename_all = "snake_case")]
pub enum TypeParam {
    /// Written as-is, e.g. `P04637`.
    Bare(String),
    /// Written as a string literal, e.g. `"inhibited"`.
    Quoted(String),
}

impl TypeParam {
    /// Returns the parameter text without quoting.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Bare(s) | Self::Quoted(s) => s,
        }
    }
}

impl From<&str> for TypeParam {
    /// Text containing `,` or `"` is quoted so it survives re-parsing.
    /// `<`, `>` and line breaks are replaced by `_`.
    fn from(raw: &str) -> Self {
        let cleaned: String = raw
            .trim()
            .chars()
            .map(|c| match c {
                '<' | '>' | '\n' | '\r' => '_',
                other => other,
            })
            .collect();
        if cleaned.is_empty() || cleaned.contains(',') || cleaned.contains('"') {
            Self::Quoted(cleaned)
        } else {
            Self::Bare(cleaned)
        }
    }
}

impl fmt::Display for TypeParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bare(s) => f.write_str(s),
            Self::Quoted(s) => f.write_str(&quote(s)),
        }
    }
}

/// A dialect type such as `!science.protein<P04637>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IrType {
    pub name: String,
    pub params: Vec<TypeParam>,
}

impl IrType {
    /// Creates a type from its name and parameter texts.
    #[must_use]
    pub fn new<'a, I>(name: impl Into<String>, params: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self {
            name: name.into(),
            params: params.into_iter().map(TypeParam::from).collect(),
        }
    }

    /// `!science.protein<complex>`, the result type of every bind.
    #[must_use]
    pub fn complex() -> Self {
        Self::new("protein", ["complex"])
    }

    /// `!science.cellstate<"inhibited">`, the result type of every inhibit.
    #[must_use]
    pub fn inhibited_state() -> Self {
        Self {
            name: "cellstate".to_string(),
            params: vec![TypeParam::Quoted("inhibited".to_string())],
        }
    }

    /// Returns true for any `protein` type, including complexes.
    #[must_use]
    pub fn is_protein(&self) -> bool {
        self.name == "protein"
    }

    /// Returns the parameter texts.
    pub fn param_strs(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(TypeParam::as_str)
    }

    /// Parses the text of a type token, e.g. `!science.gene<TP53, 11998>`.
    ///
    /// Returns `None` for other namespaces or unbalanced quoting.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let rest = text.strip_prefix('!')?.strip_prefix(DIALECT)?.strip_prefix('.')?;
        let open = rest.find('<')?;
        let name = &rest[..open];
        let body = rest[open + 1..].strip_suffix('>')?;
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            params: split_params(body)?,
        })
    }
}

impl fmt::Display for IrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "!{DIALECT}.{}<", self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{param}")?;
        }
        f.write_str(">")
    }
}

/// Splits a type body on commas outside string literals.
fn split_params(body: &str) -> Option<Vec<TypeParam>> {
    if body.trim().is_empty() {
        return Some(Vec::new());
    }

    let mut pieces = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut escaped = false;
    for (i, c) in body.char_indices() {
        if in_quotes {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_quotes = false;
            }
        } else if c == '"' {
            in_quotes = true;
        } else if c == ',' {
            pieces.push(&body[start..i]);
            start = i + 1;
        }
    }
    if in_quotes {
        return None;
    }
    pieces.push(&body[start..]);

    pieces
        .into_iter()
        .map(|piece| {
            let piece = piece.trim();
            if piece.starts_with('"') {
                unquote(piece).map(TypeParam::Quoted)
            } else {
                Some(TypeParam::Bare(piece.to_string()))
            }
        })
        .collect()
}
