use serde::Serialize;
use storefront_core::Entity;
use tracing::debug;

use crate::error::EngineError;
use crate::mutation::MutationEngine;
use crate::sync::{DataSource, Resync, resync};

/// "Something changed" push from the backend. Only routing data is kept;
/// the row payload is never applied directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeNotice {
    pub table: String,
    /// Owner column of the changed row, when the backend sent it.
    pub owner_key: Option<String>,
}

impl ChangeNotice {
    pub fn new(table: impl Into<String>, owner_key: Option<String>) -> Self {
        Self {
            table: table.into(),
            owner_key,
        }
    }
}

/// Which notices a list cares about, e.g. orders for one wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    pub table: String,
    pub owner_key: Option<String>,
}

impl Subscription {
    pub fn table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            owner_key: None,
        }
    }

    pub fn owned_by(mut self, owner_key: impl Into<String>) -> Self {
        self.owner_key = Some(owner_key.into());
        self
    }

    /// A notice without an owner key still matches: it may concern us.
    pub fn matches(&self, notice: &ChangeNotice) -> bool {
        if self.table != notice.table {
            return false;
        }
        match (&self.owner_key, &notice.owner_key) {
            (Some(wanted), Some(owner)) => wanted == owner,
            _ => true,
        }
    }
}

/// Refetch when `notice` concerns `subscription`; `None` when it was ignored.
pub fn handle_notice<E, S>(
    engine: &mut MutationEngine<E>,
    source: &mut S,
    subscription: &Subscription,
    notice: &ChangeNotice,
) -> Result<Option<Resync>, EngineError>
where
    E: Entity + Serialize,
    S: DataSource<E>,
{
    if !subscription.matches(notice) {
        debug!(table = %notice.table, owner = ?notice.owner_key, "change notice ignored");
        return Ok(None);
    }
    resync(engine, source).map(Some)
}
