//! Raw claim records as they arrive from the knowledge assembler.
//!
//! Records are decoded one at a time from JSON values so that a broken
//! record fails alone. Field access is lenient in the same places the
//! upstream format is loose: identifiers may be strings or numbers, and
//! missing optional fields take their documented defaults.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::entity::Entity;
use crate::error::{ClaimError, ScienceError, ScienceResult};
use crate::ir::OpKind;

/// Name given to agents that carry none.
pub const UNNAMED_AGENT: &str = "UNKNOWN";

/// Confidence used when the first evidence entry has no numeric
/// `epistemics.direct`.
pub const DEFAULT_CONFIDENCE: f64 = 0.8;

/// Source kind used when the first evidence entry has no `source_api`.
pub const DEFAULT_SOURCE_KIND: &str = "literature";

fn default_agent_name() -> String {
    UNNAMED_AGENT.to_string()
}

/// Accepts a string or a number; anything else reads as absent.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }))
}

fn lenient_name<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_string(deserializer)?.unwrap_or_else(default_agent_name))
}

/// Keeps string and numeric identifiers, drops the rest.
fn lenient_refs<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let Some(Value::Object(map)) = value else {
        return Ok(BTreeMap::new());
    };
    Ok(map
        .into_iter()
        .filter_map(|(k, v)| match v {
            Value::String(s) => Some((k, s)),
            Value::Number(n) => Some((k, n.to_string())),
            _ => None,
        })
        .collect())
}

/// A participant in a claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRecord {
    #[serde(default = "default_agent_name", deserialize_with = "lenient_name")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_refs")]
    pub db_refs: BTreeMap<String, String>,
}

impl AgentRecord {
    /// Resolves the agent into a classified entity.
    #[must_use]
    pub fn to_entity(&self) -> Entity {
        Entity::new(self.name.clone(), self.db_refs.clone())
    }
}

/// One evidence entry of a claim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvidenceRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub pmid: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub source_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub source_api: Option<String>,
    #[serde(default)]
    pub epistemics: Value,
    #[serde(default)]
    pub annotations: Value,
}

impl EvidenceRecord {
    /// Returns `epistemics.direct` when it is a number, otherwise
    /// [`DEFAULT_CONFIDENCE`].
    ///
    /// # Errors
    ///
    /// Returns `ClaimError::ConfidenceOutOfRange` for numbers outside `[0, 1]`.
    pub fn confidence(&self) -> Result<f64, ClaimError> {
        match self.epistemics.get("direct").and_then(Value::as_f64) {
            Some(value) if (0.0..=1.0).contains(&value) => Ok(value),
            Some(value) => Err(ClaimError::ConfidenceOutOfRange { value }),
            None => Ok(DEFAULT_CONFIDENCE),
        }
    }

    fn annotation_name(&self, key: &str) -> Option<&str> {
        self.annotations
            .get(key)?
            .get("name")?
            .as_str()
            .filter(|s| !s.is_empty())
    }

    /// `annotations.cell_line.name`
    #[must_use]
    pub fn cell_type(&self) -> Option<&str> {
        self.annotation_name("cell_line")
    }

    /// `annotations.species.name`
    #[must_use]
    pub fn organism(&self) -> Option<&str> {
        self.annotation_name("species")
    }
}

/// The claim types that are lowered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClaimKind {
    Phosphorylation,
    Activation,
    Inhibition,
    Complex,
}

impl ClaimKind {
    pub const ALL: [Self; 4] = [
        Self::Phosphorylation,
        Self::Activation,
        Self::Inhibition,
        Self::Complex,
    ];

    /// The `type` value in claim records.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Phosphorylation => "Phosphorylation",
            Self::Activation => "Activation",
            Self::Inhibition => "Inhibition",
            Self::Complex => "Complex",
        }
    }

    #[must_use]
    pub fn from_type(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }

    /// The operation this claim type lowers to.
    #[must_use]
    pub const fn op_kind(self) -> OpKind {
        match self {
            Self::Phosphorylation => OpKind::Phosphorylate,
            Self::Activation => OpKind::Activate,
            Self::Inhibition => OpKind::Inhibit,
            Self::Complex => OpKind::Bind,
        }
    }
}

impl fmt::Display for ClaimKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded claim record.
///
/// Agents are optional here; a claim missing one is incomplete rather
/// than malformed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClaimRecord {
    Phosphorylation {
        #[serde(default)]
        enz: Option<AgentRecord>,
        #[serde(default)]
        sub: Option<AgentRecord>,
        #[serde(default, deserialize_with = "lenient_string")]
        residue: Option<String>,
        #[serde(default, deserialize_with = "lenient_string")]
        position: Option<String>,
        #[serde(default)]
        evidence: Vec<EvidenceRecord>,
    },
    Activation {
        #[serde(default)]
        subj: Option<AgentRecord>,
        #[serde(default)]
        obj: Option<AgentRecord>,
        #[serde(default)]
        evidence: Vec<EvidenceRecord>,
    },
    Inhibition {
        #[serde(default)]
        subj: Option<AgentRecord>,
        #[serde(default)]
        obj: Option<AgentRecord>,
        #[serde(default)]
        evidence: Vec<EvidenceRecord>,
    },
    Complex {
        #[serde(default)]
        members: Vec<Option<AgentRecord>>,
        #[serde(default)]
        evidence: Vec<EvidenceRecord>,
    },
}

impl ClaimRecord {
    /// Decodes one raw record.
    ///
    /// # Errors
    ///
    /// - `ClaimError::NotAnObject` / `ClaimError::MissingType` for records
    ///   without a string `type`.
    /// - `ClaimError::Unsupported` for types that are not lowered.
    /// - `ClaimError::Malformed` when fields have the wrong shape.
    pub fn from_value(value: &Value) -> Result<Self, ClaimError> {
        let object = value.as_object().ok_or(ClaimError::NotAnObject)?;
        let type_name = object
            .get("type")
            .and_then(Value::as_str)
            .ok_or(ClaimError::MissingType)?;
        let kind = ClaimKind::from_type(type_name).ok_or_else(|| ClaimError::Unsupported {
            kind: type_name.to_string(),
        })?;
        Self::deserialize(value).map_err(|e| ClaimError::malformed(kind.as_str(), e.to_string()))
    }

    #[must_use]
    pub const fn kind(&self) -> ClaimKind {
        match self {
            Self::Phosphorylation { .. } => ClaimKind::Phosphorylation,
            Self::Activation { .. } => ClaimKind::Activation,
            Self::Inhibition { .. } => ClaimKind::Inhibition,
            Self::Complex { .. } => ClaimKind::Complex,
        }
    }

    #[must_use]
    pub fn evidence(&self) -> &[EvidenceRecord] {
        match self {
            Self::Phosphorylation { evidence, .. }
            | Self::Activation { evidence, .. }
            | Self::Inhibition { evidence, .. }
            | Self::Complex { evidence, .. } => evidence,
        }
    }
}

/// Splits a claims document into raw records.
///
/// Accepts a JSON array of records, or an object whose `statements` field
/// holds one. An object without `statements` holds no records.
///
/// # Errors
///
/// Returns `ScienceError::InvalidInput` if the text is not JSON or has
/// another shape.
pub fn load_claims(text: &str) -> ScienceResult<Vec<Value>> {
    let document: Value = serde_json::from_str(text)
        .map_err(|e| ScienceError::invalid_input(format!("claims are not valid JSON: {e}")))?;
    match document {
        Value::Array(records) => Ok(records),
        Value::Object(mut object) => match object.remove("statements") {
            Some(Value::Array(records)) => Ok(records),
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(_) => Err(ScienceError::invalid_input("'statements' must be an array")),
        },
        _ => Err(ScienceError::invalid_input(
            "claims must be an array or an object with 'statements'",
        )),
    }
}
