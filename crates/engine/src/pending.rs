use storefront_core::{Entity, MutationId, Version};
use storefront_storage::Collection;

#[derive(Debug, Clone, PartialEq)]
pub enum MutationOp<E: Entity> {
    Add(E),
    Update { id: E::Id, patch: E::Patch },
    /// Whole-record replacement of an existing entity.
    Replace(E),
    Remove { id: E::Id },
}

impl<E: Entity> MutationOp<E> {
    pub fn entity_id(&self) -> &E::Id {
        match self {
            Self::Add(entity) | Self::Replace(entity) => entity.id(),
            Self::Update { id, .. } | Self::Remove { id } => id,
        }
    }

    pub fn op_type_name(&self) -> &'static str {
        match self {
            Self::Add(_) => "add",
            Self::Update { .. } => "update",
            Self::Replace(_) => "replace",
            Self::Remove { .. } => "remove",
        }
    }

    /// Apply to `collection`, stamping `version`. Returns false if the op
    /// does not fit the collection (add of a present id, anything else on
    /// an absent one); the collection is then untouched.
    pub(crate) fn apply_to(&self, collection: &mut Collection<E>, version: Version) -> bool {
        match self {
            Self::Add(entity) => collection.push(entity.clone(), version).is_ok(),
            Self::Update { id, patch } => collection.update(id, version, |e| e.merge(patch)),
            Self::Replace(entity) => collection.update(entity.id(), version, |_| entity.clone()),
            Self::Remove { id } => collection.remove(id).is_some(),
        }
    }
}

/// An optimistic mutation that has not yet been folded into the baseline.
#[derive(Debug, Clone)]
pub struct PendingMutation<E: Entity> {
    pub mutation_id: MutationId,
    /// Sequence number stamped on the entity when the mutation was applied.
    pub seq: Version,
    pub op: MutationOp<E>,
    /// Set once the backend answered, while older mutations are still open.
    pub confirmation: Option<Confirmation<E>>,
}

impl<E: Entity> PendingMutation<E> {
    pub fn is_confirmed(&self) -> bool {
        self.confirmation.is_some()
    }

    /// Apply this mutation to `collection`: the confirmed outcome when the
    /// backend has answered, the optimistic op otherwise. Returns false when
    /// the target does not fit the collection, which is then untouched.
    pub(crate) fn replay_onto(&self, collection: &mut Collection<E>) -> bool {
        match (&self.confirmation, &self.op) {
            (None | Some(Confirmation::Acknowledged), op) => op.apply_to(collection, self.seq),
            (Some(Confirmation::Entity(_)), MutationOp::Remove { id }) => {
                collection.remove(id).is_some()
            }
            (Some(Confirmation::Entity(entity)), MutationOp::Add(_)) => {
                collection.upsert(entity.clone(), self.seq);
                true
            }
            (Some(Confirmation::Entity(entity)), op) => {
                collection.update(op.entity_id(), self.seq, |_| entity.clone())
            }
        }
    }
}

/// How the backend answered a write.
#[derive(Debug, Clone, PartialEq)]
pub enum Confirmation<E> {
    /// Success with no record returned; the optimistic op stands as applied.
    Acknowledged,
    /// The authoritative record after the write.
    Entity(E),
}

/// Where a confirmation landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Folded into the baseline, along with any later confirmations that
    /// were waiting on it.
    Applied,
    /// Older mutations are still open. The confirmed value shows in the live
    /// list and folds once those settle.
    Deferred,
    /// Folded in order, but its entity was no longer in the baseline
    /// (for instance the add it depended on was rolled back).
    Unmatched,
}
