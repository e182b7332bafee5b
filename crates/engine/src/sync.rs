//! Drives one optimistic mutation through the remote write and settles it.

use serde::Serialize;
use storefront_core::{Entity, MutationId};
use tracing::{info, warn};

use crate::config::FailurePolicy;
use crate::error::EngineError;
use crate::mutation::MutationEngine;
use crate::pending::{CommitOutcome, Confirmation, MutationOp};

/// The backend table behind a list.
pub trait DataSource<E: Entity> {
    type Error: std::error::Error;

    /// Every row the list should show.
    fn fetch(&mut self) -> Result<Vec<E>, Self::Error>;

    /// Persist one mutation. May return the authoritative row afterwards.
    fn write(&mut self, op: &MutationOp<E>) -> Result<Option<E>, Self::Error>;
}

#[derive(Debug)]
pub enum SyncOutcome {
    Confirmed {
        mutation_id: MutationId,
        outcome: CommitOutcome,
    },
    Failed {
        mutation_id: MutationId,
        error: String,
        rolled_back: bool,
    },
}

impl SyncOutcome {
    pub fn mutation_id(&self) -> MutationId {
        match self {
            Self::Confirmed { mutation_id, .. } | Self::Failed { mutation_id, .. } => *mutation_id,
        }
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed { .. })
    }
}

/// Apply `op` optimistically, write it, then commit or settle the failure
/// per `EngineConfig::on_failure`. Engine errors (unknown id, limits) are
/// returned before anything is written.
pub fn submit<E, S>(
    engine: &mut MutationEngine<E>,
    source: &mut S,
    op: MutationOp<E>,
) -> Result<SyncOutcome, EngineError>
where
    E: Entity,
    S: DataSource<E>,
{
    let mutation_id = engine.apply(op.clone())?;
    match source.write(&op) {
        Ok(returned) => {
            let confirmation = match returned {
                Some(entity) => Confirmation::Entity(entity),
                None => Confirmation::Acknowledged,
            };
            let outcome = engine.commit(mutation_id, confirmation)?;
            Ok(SyncOutcome::Confirmed {
                mutation_id,
                outcome,
            })
        }
        Err(err) => {
            let error = err.to_string();
            let policy = engine.config().on_failure;
            warn!(
                %mutation_id,
                entity = %op.entity_id(),
                op = op.op_type_name(),
                ?policy,
                %error,
                "remote write failed"
            );
            let rolled_back = match policy {
                FailurePolicy::Rollback => {
                    engine.rollback(mutation_id)?;
                    true
                }
                FailurePolicy::KeepOptimistic => {
                    engine.commit(mutation_id, Confirmation::Acknowledged)?;
                    false
                }
            };
            Ok(SyncOutcome::Failed {
                mutation_id,
                error,
                rolled_back,
            })
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resync {
    pub items: usize,
    pub discarded_pending: usize,
    /// Whether the fetched rows differ from the previous known-good list.
    pub changed: bool,
}

/// Refetch everything and replace the list wholesale.
pub fn resync<E, S>(engine: &mut MutationEngine<E>, source: &mut S) -> Result<Resync, EngineError>
where
    E: Entity + Serialize,
    S: DataSource<E>,
{
    let items = source
        .fetch()
        .map_err(|e| EngineError::Source(e.to_string()))?;
    let before = engine.snapshot().digest()?;
    let discarded_pending = engine.set_items(items)?;
    let changed = engine.snapshot().digest()? != before;

    let resync = Resync {
        items: engine.len(),
        discarded_pending,
        changed,
    };
    info!(
        items = resync.items,
        discarded_pending, changed, "list resynced from source"
    );
    Ok(resync)
}
