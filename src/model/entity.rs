//! Entity instances of the source model.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Value;

/// Identity of an entity within one model. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl EntityId {
    /// Largest identity a reference (`#n`, signed) can address.
    pub const MAX: EntityId = EntityId(i64::MAX as u64);
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A typed record with an ordered attribute list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub type_tag: String,
    pub attributes: Vec<(String, Value)>,
}

impl Entity {
    pub fn new(id: u64, type_tag: impl Into<String>) -> Self {
        Self {
            id: EntityId(id),
            type_tag: type_tag.into(),
            attributes: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// First attribute with the given name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes
            .iter()
            .find_map(|(n, v)| (n == name).then_some(v))
    }

    pub fn is_a(&self, type_tag: &str) -> bool {
        self.type_tag.eq_ignore_ascii_case(type_tag)
    }
}
