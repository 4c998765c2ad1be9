use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// One monitored container as reported by the upstream `/api/containers`.
///
/// Extra fields the upstream may send (`image`, `id`, ...) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    pub status: String,
}

impl Entity {
    pub fn new(name: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: status.into(),
        }
    }
}

/// Ordered list of entities from the latest successful retrieval.
///
/// Always replaced as a whole, never merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    entities: Vec<Entity>,
}

impl Snapshot {
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Names occurring more than once, in order of their second occurrence.
    pub fn duplicate_names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut dupes = Vec::new();
        for e in &self.entities {
            if !seen.insert(e.name.as_str()) && !dupes.contains(&e.name.as_str()) {
                dupes.push(e.name.as_str());
            }
        }
        dupes
    }
}

impl From<Vec<Entity>> for Snapshot {
    fn from(entities: Vec<Entity>) -> Self {
        Self { entities }
    }
}
