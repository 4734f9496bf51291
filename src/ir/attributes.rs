//! Context and evidence attributes attached to operations.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::types::DIALECT;

/// Placeholder text for unknown evidence fields.
pub const UNKNOWN: &str = "unknown";

/// Renders a string literal with `\`, `"` and line breaks escaped.
#[must_use]
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

/// Inverse of [`quote`]. Returns `None` if `literal` is not a well-formed
/// string literal.
#[must_use]
pub fn unquote(literal: &str) -> Option<String> {
    let body = literal.strip_prefix('"')?.strip_suffix('"')?;
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next()? {
                'n' => out.push('\n'),
                'r' => out.push('\r'),
                't' => out.push('\t'),
                other => out.push(other),
            },
            '"' => return None,
            other => out.push(other),
        }
    }
    Some(out)
}

/// Biological context of an operation: ordered, duplicate-free
/// `key="value"` annotations.
///
/// An empty context is still rendered (`#science.context<>`), never omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContextAttr {
    entries: Vec<(String, String)>,
}

impl ContextAttr {
    /// Well-known key for cell line / cell type annotations.
    pub const CELL_TYPE: &'static str = "cell_type";
    /// Well-known key for species annotations.
    pub const ORGANISM: &'static str = "organism";

    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an annotation unless the exact pair is already present.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let pair = (key.into(), value.into());
        if !self.entries.contains(&pair) {
            self.entries.push(pair);
        }
    }

    /// Returns the first value recorded for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the annotations in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for ContextAttr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{DIALECT}.context<")?;
        for (i, (key, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}={}", quote(value))?;
        }
        f.write_str(">")
    }
}

/// Provenance of an operation.
///
/// Field order in the text form is fixed: source id, record id,
/// confidence, then the optional source kind. Readers locate the
/// confidence by position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceAttr {
    /// Publication identifier (PMID), or `"unknown"`.
    pub source_id: String,
    /// Reader-specific record identifier, or `"unknown"`.
    pub record_id: String,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
    /// Source API / evidence kind, e.g. `"reach"` or `"literature"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_kind: Option<String>,
}

impl EvidenceAttr {
    /// Confidence assigned to operations with no evidence at all.
    pub const UNATTESTED_CONFIDENCE: f64 = 0.5;

    /// The literal low-confidence default for claims without evidence:
    /// `#science.evidence<"unknown", "unknown", 0.5>`.
    #[must_use]
    pub fn unattested() -> Self {
        Self {
            source_id: UNKNOWN.to_string(),
            record_id: UNKNOWN.to_string(),
            confidence: Self::UNATTESTED_CONFIDENCE,
            source_kind: None,
        }
    }
}

impl fmt::Display for EvidenceAttr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{DIALECT}.evidence<{}, {}, {}",
            quote(&self.source_id),
            quote(&self.record_id),
            self.confidence
        )?;
        if let Some(kind) = &self.source_kind {
            write!(f, ", {}", quote(kind))?;
        }
        f.write_str(">")
    }
}
