use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use storefront_core::Entity;

use crate::collection::{Collection, Entry};
use crate::error::StoreError;

/// Serializable copy of a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot<E> {
    pub entries: Vec<Entry<E>>,
}

impl<E: Serialize> Snapshot<E> {
    pub fn to_msgpack(&self) -> Result<Vec<u8>, StoreError> {
        rmp_serde::to_vec(self).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// BLAKE3 digest of the entities in order. Versions are left out, so a
    /// refetch of unchanged rows digests the same as the cached copy.
    pub fn digest(&self) -> Result<[u8; 32], StoreError> {
        let entities: Vec<&E> = self.entries.iter().map(|e| &e.entity).collect();
        let bytes =
            rmp_serde::to_vec(&entities).map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(*blake3::hash(&bytes).as_bytes())
    }
}

impl<E: DeserializeOwned> Snapshot<E> {
    pub fn from_msgpack(bytes: &[u8]) -> Result<Self, StoreError> {
        rmp_serde::from_slice(bytes).map_err(|e| StoreError::Serialization(e.to_string()))
    }
}

/// Live entity list plus the known-good baseline it can be rolled back to.
///
/// While a baseline is held the live list may contain speculative changes.
/// Without one, live is itself known-good.
#[derive(Debug, Clone)]
pub struct SnapshotStore<E: Entity> {
    live: Collection<E>,
    baseline: Option<Collection<E>>,
}

impl<E: Entity> Default for SnapshotStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> SnapshotStore<E> {
    pub fn new() -> Self {
        Self {
            live: Collection::new(),
            baseline: None,
        }
    }

    pub fn from_entities(entities: Vec<E>) -> Result<Self, StoreError> {
        Ok(Self {
            live: Collection::from_entities(entities)?,
            baseline: None,
        })
    }

    pub fn from_snapshot(snapshot: Snapshot<E>) -> Result<Self, StoreError> {
        Ok(Self {
            live: Collection::from_entries(snapshot.entries)?,
            baseline: None,
        })
    }

    /// Snapshot of the known-good state; speculative changes are excluded.
    pub fn to_snapshot(&self) -> Snapshot<E> {
        Snapshot {
            entries: self.known_good().entries().to_vec(),
        }
    }

    pub fn get_all(&self) -> Vec<E> {
        self.live.to_vec()
    }

    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.live.iter()
    }

    pub fn live(&self) -> &Collection<E> {
        &self.live
    }

    pub fn live_mut(&mut self) -> &mut Collection<E> {
        &mut self.live
    }

    pub fn set_live(&mut self, live: Collection<E>) {
        self.live = live;
    }

    pub fn baseline(&self) -> Option<&Collection<E>> {
        self.baseline.as_ref()
    }

    pub fn baseline_mut(&mut self) -> Option<&mut Collection<E>> {
        self.baseline.as_mut()
    }

    pub fn has_baseline(&self) -> bool {
        self.baseline.is_some()
    }

    /// Baseline if one is held, otherwise live.
    pub fn known_good(&self) -> &Collection<E> {
        self.baseline.as_ref().unwrap_or(&self.live)
    }

    /// Wholesale replace. The new list is known-good, so any held baseline
    /// is dropped. Order is kept and duplicate ids are an error.
    pub fn replace_all(&mut self, entities: Vec<E>) -> Result<(), StoreError> {
        self.live = Collection::from_entities(entities)?;
        self.baseline = None;
        Ok(())
    }

    /// Capture live as the rollback target unless one is already held.
    /// Returns whether a capture happened.
    pub fn snapshot_before_mutation(&mut self) -> bool {
        if self.baseline.is_some() {
            return false;
        }
        self.baseline = Some(self.live.clone());
        true
    }

    /// Accept live as known-good.
    pub fn commit_snapshot(&mut self) -> Option<Collection<E>> {
        self.baseline.take()
    }

    /// Put the baseline back as live. Returns false when nothing was held.
    pub fn restore_snapshot(&mut self) -> bool {
        match self.baseline.take() {
            Some(baseline) => {
                self.live = baseline;
                true
            }
            None => false,
        }
    }
}
