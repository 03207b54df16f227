//! Identity-indexed entity arena.
//!
//! Cross-references between entities are plain identities, so cycles and
//! self-references need no special handling.

use hashbrown::HashMap;

use super::{Entity, EntityId, Header};
use crate::{Error, Result};

/// A loaded model: header plus every entity keyed by identity.
#[derive(Debug, Clone, Default)]
pub struct IfcModel {
    header: Header,
    entities: HashMap<EntityId, Entity>,
}

impl IfcModel {
    pub fn new(header: Header) -> Self {
        Self {
            header,
            entities: HashMap::new(),
        }
    }

    /// Add an entity. Identity 0, identities above [`EntityId::MAX`] and
    /// duplicate identities are rejected.
    pub fn insert(&mut self, entity: Entity) -> Result<()> {
        if entity.id.0 == 0 {
            return Err(Error::InvalidModel(format!(
                "entity of type {} has identity 0",
                entity.type_tag
            )));
        }
        if entity.id > EntityId::MAX {
            return Err(Error::InvalidModel(format!(
                "entity identity {} is out of range",
                entity.id
            )));
        }
        if self.entities.contains_key(&entity.id) {
            return Err(Error::InvalidModel(format!(
                "duplicate entity identity {}",
                entity.id
            )));
        }
        self.entities.insert(entity.id, entity);
        Ok(())
    }

    pub fn with_entity(mut self, entity: Entity) -> Result<Self> {
        self.insert(entity)?;
        Ok(self)
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// All identities, ascending.
    pub fn sorted_ids(&self) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self.entities.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Entities in ascending identity order.
    pub fn iter_sorted(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.sorted_ids()
            .into_iter()
            .filter_map(move |id| self.entities.get(&id))
    }
}
