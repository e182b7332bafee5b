use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use storefront_core::{Entity, Version};

use crate::error::StoreError;

/// An entity together with the sequence number of the last mutation applied to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry<E> {
    pub entity: E,
    pub version: Version,
}

/// Ordered entity list keyed by id. No two entries share an id.
#[derive(Debug, Clone)]
pub struct Collection<E: Entity> {
    entries: Vec<Entry<E>>,
    index: HashMap<E::Id, usize>,
}

impl<E: Entity> Default for Collection<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> PartialEq for Collection<E> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<E: Entity> Collection<E> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Build from backend records, all at `Version::ZERO`. Duplicates are
    /// rejected, not dropped.
    pub fn from_entities(entities: Vec<E>) -> Result<Self, StoreError> {
        Self::from_entries(
            entities
                .into_iter()
                .map(|entity| Entry {
                    entity,
                    version: Version::ZERO,
                })
                .collect(),
        )
    }

    pub fn from_entries(entries: Vec<Entry<E>>) -> Result<Self, StoreError> {
        let mut index = HashMap::with_capacity(entries.len());
        for (pos, entry) in entries.iter().enumerate() {
            if index.insert(entry.entity.id().clone(), pos).is_some() {
                return Err(StoreError::DuplicateId(entry.entity.id().to_string()));
            }
        }
        Ok(Self { entries, index })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.entries.iter().map(|e| &e.entity)
    }

    pub fn entries(&self) -> &[Entry<E>] {
        &self.entries
    }

    pub fn to_vec(&self) -> Vec<E> {
        self.iter().cloned().collect()
    }

    pub fn position(&self, id: &E::Id) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn contains(&self, id: &E::Id) -> bool {
        self.index.contains_key(id)
    }

    pub fn entry(&self, id: &E::Id) -> Option<&Entry<E>> {
        self.position(id).map(|pos| &self.entries[pos])
    }

    pub fn get(&self, id: &E::Id) -> Option<&E> {
        self.entry(id).map(|e| &e.entity)
    }

    pub fn version_of(&self, id: &E::Id) -> Option<Version> {
        self.entry(id).map(|e| e.version)
    }

    /// Highest version stamped on any entry.
    pub fn max_version(&self) -> Version {
        self.entries
            .iter()
            .map(|e| e.version)
            .max()
            .unwrap_or(Version::ZERO)
    }

    /// Append at the end.
    pub fn push(&mut self, entity: E, version: Version) -> Result<(), StoreError> {
        if self.contains(entity.id()) {
            return Err(StoreError::DuplicateId(entity.id().to_string()));
        }
        self.index.insert(entity.id().clone(), self.entries.len());
        self.entries.push(Entry { entity, version });
        Ok(())
    }

    /// Replace the entity in place with `f(current)`. Returns false if absent.
    pub fn update(&mut self, id: &E::Id, version: Version, f: impl FnOnce(&E) -> E) -> bool {
        let Some(pos) = self.position(id) else {
            return false;
        };
        let next = f(&self.entries[pos].entity);
        debug_assert!(next.id() == id, "update must not change the entity id");
        self.entries[pos] = Entry {
            entity: next,
            version,
        };
        true
    }

    /// Replace in place when present, append otherwise.
    pub fn upsert(&mut self, entity: E, version: Version) {
        match self.position(entity.id()) {
            Some(pos) => self.entries[pos] = Entry { entity, version },
            None => {
                self.index.insert(entity.id().clone(), self.entries.len());
                self.entries.push(Entry { entity, version });
            }
        }
    }

    /// Remove by id, keeping the relative order of the rest.
    pub fn remove(&mut self, id: &E::Id) -> Option<(usize, Entry<E>)> {
        let pos = self.index.remove(id)?;
        let removed = self.entries.remove(pos);
        for entry in &self.entries[pos..] {
            if let Some(slot) = self.index.get_mut(entry.entity.id()) {
                *slot -= 1;
            }
        }
        Some((pos, removed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::{ItemId, ListItem};

    fn items(ids: &[&str]) -> Vec<ListItem> {
        ids.iter().map(|id| ListItem::new(*id)).collect()
    }

    fn ids(collection: &Collection<ListItem>) -> Vec<String> {
        collection.iter().map(|i| i.id.to_string()).collect()
    }

    #[test]
    fn from_entities_preserves_order() {
        let c = Collection::from_entities(items(&["c", "a", "b"])).unwrap();
        assert_eq!(ids(&c), ["c", "a", "b"]);
        assert_eq!(c.position(&ItemId::from("b")), Some(2));
        assert_eq!(c.version_of(&ItemId::from("a")), Some(Version::ZERO));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = Collection::from_entities(items(&["a", "b", "a"])).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateId(id) if id == "a"));

        let mut c = Collection::from_entities(items(&["a"])).unwrap();
        assert!(c.push(ListItem::new("a"), Version::new(1)).is_err());
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn remove_reindexes_trailing_entries() {
        let mut c = Collection::from_entities(items(&["a", "b", "c", "d"])).unwrap();
        let (pos, entry) = c.remove(&ItemId::from("b")).unwrap();
        assert_eq!(pos, 1);
        assert_eq!(entry.entity.id, ItemId::from("b"));
        assert_eq!(ids(&c), ["a", "c", "d"]);
        assert_eq!(c.position(&ItemId::from("d")), Some(2));
        assert!(c.remove(&ItemId::from("b")).is_none());
    }

    #[test]
    fn update_keeps_position_and_stamps_version() {
        let mut c = Collection::from_entities(items(&["a", "b"])).unwrap();
        let updated = c.update(&ItemId::from("a"), Version::new(7), |item| {
            item.clone().with_field("sold", true)
        });
        assert!(updated);
        assert_eq!(ids(&c), ["a", "b"]);
        assert_eq!(c.version_of(&ItemId::from("a")), Some(Version::new(7)));
        assert_eq!(c.max_version(), Version::new(7));
        assert!(!c.update(&ItemId::from("zz"), Version::new(8), |i| i.clone()));
    }
}
