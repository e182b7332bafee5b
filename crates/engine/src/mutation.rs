use storefront_core::{Entity, MutationId, SequenceClock, Version};
use storefront_storage::identity::{self, Resolution};
use storefront_storage::{Snapshot, SnapshotStore};
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::pending::{CommitOutcome, Confirmation, MutationOp, PendingMutation};

/// Optimistic in-memory store for one list of entities.
///
/// Every mutation lands in the live list immediately and is tracked as
/// pending until the caller commits or rolls it back by its `MutationId`.
/// The store holds a baseline exactly while something is pending; the live
/// list is always baseline + pending mutations, in call order.
///
/// Confirmations fold into the baseline strictly in mutation order. One
/// that arrives while an older mutation is still open waits on its pending
/// entry, so a late answer never lands on top of a newer one.
pub struct MutationEngine<E: Entity> {
    config: EngineConfig,
    clock: SequenceClock,
    store: SnapshotStore<E>,
    pending: Vec<PendingMutation<E>>,
}

impl<E: Entity> Default for MutationEngine<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> MutationEngine<E> {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            clock: SequenceClock::new(),
            store: SnapshotStore::new(),
            pending: Vec::new(),
        }
    }

    /// Start from a server-fetched list.
    pub fn from_items(items: Vec<E>) -> Result<Self, EngineError> {
        let mut engine = Self::new();
        engine.store = SnapshotStore::from_entities(items)?;
        Ok(engine)
    }

    /// Warm-start from a cached snapshot. Versions carry over, so the clock
    /// resumes past the highest one.
    pub fn from_snapshot(snapshot: Snapshot<E>, config: EngineConfig) -> Result<Self, EngineError> {
        let store = SnapshotStore::from_snapshot(snapshot)?;
        Ok(Self {
            config,
            clock: SequenceClock::starting_after(store.live().max_version()),
            store,
            pending: Vec::new(),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &SnapshotStore<E> {
        &self.store
    }

    /// Known-good state, without speculative changes.
    pub fn snapshot(&self) -> Snapshot<E> {
        self.store.to_snapshot()
    }

    pub fn get_all(&self) -> Vec<E> {
        self.store.get_all()
    }

    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.store.iter()
    }

    pub fn get(&self, id: &E::Id) -> Option<&E> {
        self.store.live().get(id)
    }

    pub fn version_of(&self, id: &E::Id) -> Option<Version> {
        self.store.live().version_of(id)
    }

    pub fn len(&self) -> usize {
        self.store.live().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.live().is_empty()
    }

    pub fn pending(&self) -> &[PendingMutation<E>] {
        &self.pending
    }

    /// Whether anything has yet to fold into the baseline, including
    /// confirmations waiting on older mutations.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Whether `token` still awaits its confirmation.
    pub fn is_pending(&self, token: MutationId) -> bool {
        self.pending
            .iter()
            .any(|p| p.mutation_id == token && !p.is_confirmed())
    }

    /// Outstanding mutations touching `id`, oldest first.
    pub fn pending_for<'a>(
        &'a self,
        id: &'a E::Id,
    ) -> impl Iterator<Item = &'a PendingMutation<E>> + 'a {
        self.pending.iter().filter(move |p| p.op.entity_id() == id)
    }

    // ========================================================================
    // Optimistic mutations
    // ========================================================================

    /// Append to the end of the list.
    pub fn add_item(&mut self, entity: E) -> Result<MutationId, EngineError> {
        self.apply(MutationOp::Add(entity))
    }

    /// Merge `patch` into the entity, keeping its position. An unknown id is
    /// reported as `EntityNotFound` and changes nothing.
    pub fn update_item(&mut self, id: E::Id, patch: E::Patch) -> Result<MutationId, EngineError> {
        self.apply(MutationOp::Update { id, patch })
    }

    /// Replace the record with the same id, or append it if there is none.
    pub fn upsert_item(&mut self, entity: E) -> Result<MutationId, EngineError> {
        match identity::resolve(&entity, self.store.live()) {
            Resolution::Update(_) => self.apply(MutationOp::Replace(entity)),
            Resolution::Add => self.apply(MutationOp::Add(entity)),
        }
    }

    pub fn remove_item(&mut self, id: E::Id) -> Result<MutationId, EngineError> {
        self.apply(MutationOp::Remove { id })
    }

    pub fn apply(&mut self, op: MutationOp<E>) -> Result<MutationId, EngineError> {
        if self.pending.len() >= self.config.max_pending {
            return Err(EngineError::TooManyPending {
                limit: self.config.max_pending,
            });
        }

        let captured = self.store.snapshot_before_mutation();
        let seq = self.clock.tick();
        if !op.apply_to(self.store.live_mut(), seq) {
            // Live is untouched; release the baseline if this call took it.
            if captured {
                self.store.commit_snapshot();
            }
            let id = op.entity_id().to_string();
            debug!(entity = %id, op = op.op_type_name(), "mutation target rejected");
            return Err(match op {
                MutationOp::Add(_) => EngineError::DuplicateEntity(id),
                _ => EngineError::EntityNotFound(id),
            });
        }

        let mutation_id = MutationId::new();
        debug!(
            %mutation_id,
            entity = %op.entity_id(),
            op = op.op_type_name(),
            seq = seq.get(),
            "optimistic mutation applied"
        );
        self.pending.push(PendingMutation {
            mutation_id,
            seq,
            op,
            confirmation: None,
        });
        Ok(mutation_id)
    }

    // ========================================================================
    // Resolution
    // ========================================================================

    /// Record the backend's answer for `token`. It folds into the baseline
    /// now if every older mutation has settled, otherwise it waits for them
    /// (`CommitOutcome::Deferred`) while the live list already shows it.
    pub fn commit(
        &mut self,
        token: MutationId,
        confirmation: Confirmation<E>,
    ) -> Result<CommitOutcome, EngineError> {
        let pos = self.open_position_of(token)?;
        if let Confirmation::Entity(entity) = &confirmation {
            let expected = self.pending[pos].op.entity_id();
            if entity.id() != expected {
                return Err(EngineError::MismatchedConfirmation {
                    expected: expected.to_string(),
                    actual: entity.id().to_string(),
                });
            }
        }

        self.pending[pos].confirmation = Some(confirmation);
        let outcome = if pos == 0 {
            match self.fold_settled().first() {
                Some(&(_, false)) => CommitOutcome::Unmatched,
                _ => CommitOutcome::Applied,
            }
        } else {
            CommitOutcome::Deferred
        };
        debug!(mutation_id = %token, ?outcome, "mutation committed");
        self.rebase();
        Ok(outcome)
    }

    /// Undo one mutation. Later mutations, including ones on the same
    /// entity, are replayed over the restored state. A mutation whose
    /// confirmation already arrived cannot be rolled back.
    pub fn rollback(&mut self, token: MutationId) -> Result<(), EngineError> {
        let pos = self.open_position_of(token)?;
        let pending = self.pending.remove(pos);
        debug!(
            mutation_id = %token,
            entity = %pending.op.entity_id(),
            op = pending.op.op_type_name(),
            "mutation rolled back"
        );
        self.fold_settled();
        self.rebase();
        Ok(())
    }

    /// Accept every pending mutation as applied. Returns how many there were.
    pub fn commit_all(&mut self) -> usize {
        let count = self.pending.len();
        self.pending.clear();
        self.store.commit_snapshot();
        count
    }

    /// Drop every pending mutation and restore the baseline. Returns how
    /// many were discarded. Confirmations still waiting on older mutations
    /// are dropped with them.
    pub fn revert_update(&mut self) -> usize {
        let discarded = self.pending.len();
        self.pending.clear();
        if self.store.restore_snapshot() {
            warn!(discarded, "optimistic batch reverted");
        }
        discarded
    }

    /// Wholesale replace after an authoritative refetch. Pending tokens are
    /// superseded and become unknown. Returns how many were discarded.
    pub fn set_items(&mut self, items: Vec<E>) -> Result<usize, EngineError> {
        self.store.replace_all(items)?;
        let discarded = self.pending.len();
        self.pending.clear();
        if discarded > 0 {
            warn!(discarded, "pending mutations superseded by refetch");
        }
        Ok(discarded)
    }

    /// Position of a token that has not been confirmed yet.
    fn open_position_of(&self, token: MutationId) -> Result<usize, EngineError> {
        let pos = self
            .pending
            .iter()
            .position(|p| p.mutation_id == token)
            .ok_or_else(|| EngineError::UnknownMutation(token.to_string()))?;
        if self.pending[pos].is_confirmed() {
            return Err(EngineError::AlreadyConfirmed(token.to_string()));
        }
        Ok(pos)
    }

    /// Fold the confirmed run at the head of the queue into the baseline,
    /// oldest first. Returns each folded token and whether its entity was
    /// found.
    fn fold_settled(&mut self) -> Vec<(MutationId, bool)> {
        let mut folded = Vec::new();
        while self.pending.first().is_some_and(PendingMutation::is_confirmed) {
            let head = self.pending.remove(0);
            let matched = match self.store.baseline_mut() {
                Some(baseline) => head.replay_onto(baseline),
                None => false,
            };
            if !matched {
                debug!(
                    mutation_id = %head.mutation_id,
                    entity = %head.op.entity_id(),
                    "confirmation had nothing to fold"
                );
            }
            folded.push((head.mutation_id, matched));
        }
        folded
    }

    /// Recompute live as baseline + pending, or settle on the baseline when
    /// nothing is pending.
    fn rebase(&mut self) {
        if self.pending.is_empty() {
            self.store.restore_snapshot();
            return;
        }
        let Some(baseline) = self.store.baseline() else {
            return;
        };
        let mut live = baseline.clone();
        for p in &self.pending {
            if !p.replay_onto(&mut live) {
                debug!(
                    mutation_id = %p.mutation_id,
                    entity = %p.op.entity_id(),
                    op = p.op.op_type_name(),
                    "pending mutation no longer applies; skipped"
                );
            }
        }
        self.store.set_live(live);
    }
}
