//! Biological entities and their identity.
//!
//! Identity is an explicit content key ([`EntityKey`]): proteins are the
//! same entity when they share a UniProt identifier, everything else is
//! identified by name. Lowering deduplicates declarations on this key.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ClaimError;
use crate::ir::{IrType, Symbol};

/// UniProt accession.
pub const UP: &str = "UP";
/// HGNC gene identifier.
pub const HGNC: &str = "HGNC";
/// Entrez gene identifier.
pub const EGID: &str = "EGID";
/// PubChem compound identifier.
pub const PUBCHEM: &str = "PUBCHEM";
/// ChEBI identifier.
pub const CHEBI: &str = "CHEBI";

/// Placeholder for a missing database identifier in type descriptors.
const MISSING_ID: &str = "UNKNOWN";

/// Classification of entities, derived from their database references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Protein,
    Gene,
    Chemical,
    Unknown,
}

impl EntityKind {
    /// Classifies by fixed priority: `UP` makes a protein, then `HGNC` or
    /// `EGID` a gene, then `PUBCHEM` or `CHEBI` a chemical.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::collections::BTreeMap;
    /// use science_ir::entity::EntityKind;
    ///
    /// let refs = BTreeMap::from([("HGNC".to_string(), "11998".to_string())]);
    /// assert_eq!(EntityKind::classify(&refs), EntityKind::Gene);
    /// ```
    #[must_use]
    pub fn classify(db_refs: &BTreeMap<String, String>) -> Self {
        let has = |key: &str| db_refs.contains_key(key);
        if has(UP) {
            Self::Protein
        } else if has(HGNC) || has(EGID) {
            Self::Gene
        } else if has(PUBCHEM) || has(CHEBI) {
            Self::Chemical
        } else {
            Self::Unknown
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Protein => "protein",
            Self::Gene => "gene",
            Self::Chemical => "chemical",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The identity key of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKey {
    /// A protein, keyed by UniProt accession.
    Uniprot(String),
    /// Anything else, keyed by name.
    Name(String),
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uniprot(id) => write!(f, "UP:{id}"),
            Self::Name(name) => write!(f, "name:{name}"),
        }
    }
}

/// A canonical biological entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    pub kind: EntityKind,
    /// Database name to identifier.
    #[serde(default)]
    pub db_refs: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organism: Option<String>,
}

impl Entity {
    /// Creates an entity, classifying it from `db_refs`.
    #[must_use]
    pub fn new(name: impl Into<String>, db_refs: BTreeMap<String, String>) -> Self {
        Self {
            name: name.into(),
            kind: EntityKind::classify(&db_refs),
            db_refs,
            organism: None,
        }
    }

    #[must_use]
    pub fn with_organism(mut self, organism: impl Into<String>) -> Self {
        self.organism = Some(organism.into());
        self
    }

    /// Returns the UniProt accession, if any.
    #[must_use]
    pub fn uniprot(&self) -> Option<&str> {
        self.db_refs.get(UP).map(String::as_str)
    }

    fn first_ref(&self, keys: &[&str]) -> &str {
        keys.iter()
            .find_map(|k| self.db_refs.get(*k))
            .map_or(MISSING_ID, String::as_str)
    }

    /// Returns the identity key.
    #[must_use]
    pub fn key(&self) -> EntityKey {
        match (self.kind, self.uniprot()) {
            (EntityKind::Protein, Some(up)) => EntityKey::Uniprot(up.to_string()),
            _ => EntityKey::Name(self.name.clone()),
        }
    }

    /// Returns true if both entities have the same identity key.
    #[must_use]
    pub fn same_entity(&self, other: &Self) -> bool {
        self.key() == other.key()
    }

    /// Returns the dialect type for this entity.
    ///
    /// Depends only on kind, database references and name.
    #[must_use]
    pub fn type_descriptor(&self) -> IrType {
        match self.kind {
            EntityKind::Protein => IrType::new("protein", [self.first_ref(&[UP])]),
            EntityKind::Gene => IrType::new("gene", [self.name.as_str(), self.first_ref(&[HGNC, EGID])]),
            EntityKind::Chemical => IrType::new(
                "chemical",
                [self.name.as_str(), self.first_ref(&[PUBCHEM, CHEBI])],
            ),
            EntityKind::Unknown => IrType::new("unknown", [self.name.as_str()]),
        }
    }

    /// Returns the symbol for this entity: the sanitized UniProt accession
    /// for proteins, otherwise the sanitized name.
    ///
    /// # Errors
    ///
    /// Returns `ClaimError::EmptySymbol` if the source text is blank.
    pub fn symbol(&self) -> Result<Symbol, ClaimError> {
        let raw = match self.key() {
            EntityKey::Uniprot(up) => up,
            EntityKey::Name(name) => name,
        };
        Symbol::sanitized(&raw).ok_or_else(|| ClaimError::EmptySymbol {
            name: self.name.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn refs(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_classify_priority() {
        assert_eq!(EntityKind::classify(&refs(&[(UP, "P1"), (HGNC, "1")])), EntityKind::Protein);
        assert_eq!(EntityKind::classify(&refs(&[(EGID, "7157")])), EntityKind::Gene);
        assert_eq!(EntityKind::classify(&refs(&[(CHEBI, "CHEBI:1"), (EGID, "2")])), EntityKind::Gene);
        assert_eq!(EntityKind::classify(&refs(&[(PUBCHEM, "5")])), EntityKind::Chemical);
        assert_eq!(EntityKind::classify(&refs(&[("FPLX", "ERK")])), EntityKind::Unknown);
    }

    #[test]
    fn test_protein_identity_uses_uniprot() {
        let a = Entity::new("TP53", refs(&[(UP, "P04637")]));
        let b = Entity::new("p53", refs(&[(UP, "P04637"), (HGNC, "11998")]));
        assert!(a.same_entity(&b));
        assert_eq!(a.symbol().unwrap(), b.symbol().unwrap());
        assert_eq!(a.symbol().unwrap().as_str(), "p04637");
        assert_eq!(a.key(), EntityKey::Uniprot("P04637".to_string()));
    }

    #[test]
    fn test_non_protein_identity_uses_name() {
        let a = Entity::new("TP53", refs(&[(HGNC, "11998")]));
        let b = Entity::new("TP53", refs(&[(EGID, "7157")]));
        let c = Entity::new("tp53", refs(&[(HGNC, "11998")]));
        assert!(a.same_entity(&b));
        assert!(!a.same_entity(&c));
        // Distinct keys may still collide on the sanitized symbol.
        assert_eq!(a.symbol().unwrap(), c.symbol().unwrap());
    }

    #[test]
    fn test_type_descriptors() {
        assert_eq!(
            Entity::new("TP53", refs(&[(UP, "P04637")])).type_descriptor().to_string(),
            "!science.protein<P04637>"
        );
        assert_eq!(
            Entity::new("TP53", refs(&[(EGID, "7157")])).type_descriptor().to_string(),
            "!science.gene<TP53, 7157>"
        );
        assert_eq!(
            Entity::new("aspirin", refs(&[(CHEBI, "CHEBI:15365")])).type_descriptor().to_string(),
            "!science.chemical<aspirin, CHEBI:15365>"
        );
        assert_eq!(
            Entity::new("ERK", refs(&[("FPLX", "ERK")])).type_descriptor().to_string(),
            "!science.unknown<ERK>"
        );
    }

    #[test]
    fn test_symbol_sanitization() {
        let e = Entity::new("Vitamin D-3", BTreeMap::new());
        assert_eq!(e.symbol().unwrap().as_str(), "vitamin_d_3");
        let blank = Entity::new("  ", BTreeMap::new());
        assert!(matches!(blank.symbol(), Err(ClaimError::EmptySymbol { .. })));
    }
}
