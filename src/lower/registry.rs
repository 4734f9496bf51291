//! Entity registration: identity key to declared symbol.

use std::collections::HashMap;

use tracing::warn;

use crate::entity::{Entity, EntityKey};
use crate::error::ClaimError;
use crate::ir::{Declaration, IrModule, Symbol};

/// Maps identity keys to symbols and declares each entity once.
#[derive(Debug, Default)]
pub struct EntityRegistry {
    by_key: HashMap<EntityKey, Symbol>,
    owners: HashMap<Symbol, EntityKey>,
}

impl EntityRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the symbol for `entity`, declaring it in `module` the first
    /// time its identity key is seen.
    ///
    /// Two distinct keys that sanitize to the same symbol are kept apart:
    /// the later one gets `_2`, `_3`, ... appended.
    ///
    /// # Errors
    ///
    /// Returns `ClaimError::EmptySymbol` if the entity yields no symbol.
    pub fn register(&mut self, entity: &Entity, module: &mut IrModule) -> Result<Symbol, ClaimError> {
        let key = entity.key();
        if let Some(symbol) = self.by_key.get(&key) {
            return Ok(symbol.clone());
        }

        let base = entity.symbol()?;
        let mut symbol = base.clone();
        let mut suffix = 1;
        while self.owners.contains_key(&symbol) {
            suffix += 1;
            symbol = base.with_suffix(suffix);
        }
        if suffix > 1 {
            warn!(
                entity = %key,
                base = %base,
                symbol = %symbol,
                "symbol collision between distinct entities"
            );
        }

        module.declare(Declaration {
            symbol: symbol.clone(),
            ty: entity.type_descriptor(),
        });
        self.owners.insert(symbol.clone(), key.clone());
        self.by_key.insert(key, symbol.clone());
        Ok(symbol)
    }

    /// Number of distinct entities registered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}
