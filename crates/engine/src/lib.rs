pub mod access;
pub mod config;
pub mod error;
pub mod lease;
pub mod mutation;
pub mod orders;
pub mod pending;
pub mod realtime;
pub mod sync;

pub use access::AccessMutations;
pub use config::{EngineConfig, FailurePolicy};
pub use error::EngineError;
pub use lease::{Lease, LeaseHooks, ScrollLock, SharedService};
pub use mutation::MutationEngine;
pub use orders::OrderMutations;
pub use pending::{CommitOutcome, Confirmation, MutationOp, PendingMutation};
pub use realtime::{ChangeNotice, Subscription};
pub use sync::{DataSource, Resync, SyncOutcome};
