//! Error types for Science IR.
//!
//! Errors are strongly typed using thiserror. Per-record failures
//! ([`ClaimError`]) are caught by the lowering pass and counted, never
//! propagated out of a batch; the remaining kinds surface to callers.

use thiserror::Error;

/// Errors raised while decoding or resolving a single claim record.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClaimError {
    #[error("Claim record is not a JSON object")]
    NotAnObject,

    #[error("Claim record has no 'type' field")]
    MissingType,

    #[error("Unsupported claim type: {kind}")]
    Unsupported {
        kind: String,
    },

    #[error("Malformed {kind} claim: {message}")]
    Malformed {
        kind: String,
        message: String,
    },

    #[error("Confidence value {value} is out of range [0.0, 1.0]")]
    ConfidenceOutOfRange {
        value: f64,
    },

    #[error("Entity '{name}' does not yield a usable symbol")]
    EmptySymbol {
        name: String,
    },
}

impl ClaimError {
    /// Creates a malformed-claim error for the given claim type.
    #[must_use]
    pub fn malformed(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Malformed {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Returns true if the claim was skipped because its type is not lowered.
    #[must_use]
    pub const fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported { .. })
    }
}

/// Errors raised while generating simulation code.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodegenError {
    #[error("Reaction {reaction} ({kind}) references undeclared symbol %{symbol}")]
    UnresolvedOperand {
        reaction: usize,
        kind: String,
        symbol: String,
    },
}

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {message}")]
    Parse {
        path: String,
        message: String,
    },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue {
        field: String,
        reason: String,
    },
}

/// Top-level error type for Science IR.
#[derive(Debug, Error)]
pub enum ScienceError {
    #[error("Claim error: {0}")]
    Claim(#[from] ClaimError),

    #[error("Codegen error: {0}")]
    Codegen(#[from] CodegenError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Input not found: {path}")]
    InputNotFound {
        path: String,
    },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
    },

    #[error("Internal error: {message}")]
    Internal {
        message: String,
    },
}

impl ScienceError {
    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Creates an invalid-input error.
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Wraps an I/O error with the path it occurred on.
    ///
    /// A missing file maps to [`ScienceError::InputNotFound`] so the CLIs can
    /// report it distinctly.
    #[must_use]
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::InputNotFound { path }
        } else {
            Self::Io { path, source }
        }
    }

    /// Returns true if this is a per-claim error.
    #[must_use]
    pub const fn is_claim(&self) -> bool {
        matches!(self, Self::Claim(_))
    }

    /// Returns true if the input file could not be found.
    #[must_use]
    pub const fn is_input_not_found(&self) -> bool {
        matches!(self, Self::InputNotFound { .. })
    }
}

/// Result type alias for Science IR operations.
pub type ScienceResult<T> = Result<T, ScienceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_out_of_range_message() {
        let err = ClaimError::ConfidenceOutOfRange { value: 1.5 };
        let msg = format!("{err}");
        assert!(msg.contains("1.5"));
        assert!(msg.contains("out of range"));
    }

    #[test]
    fn test_unsupported_claim() {
        let err = ClaimError::Unsupported {
            kind: "Acetylation".to_string(),
        };
        assert!(err.is_unsupported());
        assert!(format!("{err}").contains("Acetylation"));
        assert!(!ClaimError::MissingType.is_unsupported());
    }

    #[test]
    fn test_unresolved_operand_message() {
        let err = CodegenError::UnresolvedOperand {
            reaction: 2,
            kind: "inhibit".to_string(),
            symbol: "mdm2".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("%mdm2"));
        assert!(msg.contains("inhibit"));
    }

    #[test]
    fn test_io_not_found_maps_to_input_not_found() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = ScienceError::io("claims.json", source);
        assert!(err.is_input_not_found());
        assert!(format!("{err}").contains("claims.json"));

        let source = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ScienceError::io("claims.json", source);
        assert!(!err.is_input_not_found());
    }

    #[test]
    fn test_science_error_from_claim() {
        let err: ScienceError = ClaimError::MissingType.into();
        assert!(err.is_claim());
        assert!(format!("{err}").starts_with("Claim error"));
    }

    #[test]
    fn test_internal() {
        let err = ScienceError::internal("unexpected state");
        assert!(format!("{err}").contains("unexpected state"));
    }
}
