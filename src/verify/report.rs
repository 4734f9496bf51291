//! Violations and the verification report.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::{ScienceError, ScienceResult};
use crate::ir::ParseDiagnostic;

/// How serious a finding is. Only errors affect the exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }

    const fn marker(self) -> &'static str {
        match self {
            Self::Error => "❌",
            Self::Warning => "⚠️",
            Self::Info => "ℹ️",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a finding applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// 1-based line of the IR text.
    Line(usize),
    /// A finding spanning several operations.
    MultipleOps,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Line(n) => write!(f, "Line {n}"),
            Self::MultipleOps => f.write_str("Multiple ops"),
        }
    }
}

impl Serialize for Location {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One verification finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub severity: Severity,
    pub location: Location,
    pub message: String,
}

impl Violation {
    #[must_use]
    pub fn new(severity: Severity, location: Location, message: impl Into<String>) -> Self {
        Self {
            severity,
            location,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(location: Location, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, location, message)
    }

    #[must_use]
    pub fn warning(location: Location, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, location, message)
    }

    #[must_use]
    pub fn info(location: Location, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, location, message)
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] {}: {}",
            self.severity.marker(),
            self.severity,
            self.location,
            self.message
        )
    }
}

/// Result of verifying one IR text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationReport {
    /// Operations read from the text.
    pub operations: usize,
    /// Findings in rule order.
    pub violations: Vec<Violation>,
    /// Lines the parser could not read. Never affect the exit status.
    pub diagnostics: Vec<ParseDiagnostic>,
    /// blake3 digest of the verified text.
    pub digest: String,
}

const RULE: usize = 80;

impl VerificationReport {
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.violations
            .iter()
            .filter(|v| v.severity == Severity::Error)
            .count()
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// Process exit status: 1 if any error-severity violation exists.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        i32::from(self.has_errors())
    }

    /// Renders the human-readable report.
    #[must_use]
    pub fn render_text(&self) -> String {
        let heavy = "=".repeat(RULE);
        let light = "-".repeat(RULE);
        let mut lines = vec![
            heavy.clone(),
            "SCIENCE IR - VERIFICATION REPORT".to_string(),
            heavy.clone(),
            String::new(),
            format!("Operations Verified: {}", self.operations),
            format!("Violations Found: {}", self.violations.len()),
            format!("Digest: {}", self.digest),
            String::new(),
            "VIOLATIONS:".to_string(),
            light.clone(),
        ];
        if self.violations.is_empty() {
            lines.push("✓ No violations found!".to_string());
        } else {
            lines.extend(self.violations.iter().map(ToString::to_string));
        }

        if !self.diagnostics.is_empty() {
            lines.push(String::new());
            lines.push(format!("PARSE DIAGNOSTICS: {}", self.diagnostics.len()));
            lines.push(light);
            lines.extend(self.diagnostics.iter().map(ToString::to_string));
        }

        lines.push(heavy);
        let mut text = lines.join("\n");
        text.push('\n');
        text
    }

    /// Serializes the report to pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns `ScienceError::Internal` if serialization fails.
    pub fn to_json_pretty(&self) -> ScienceResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ScienceError::internal(format!("serialize verification report: {e}")))
    }
}
