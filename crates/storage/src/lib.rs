pub mod collection;
pub mod error;
pub mod identity;
pub mod persist;
pub mod snapshot;

pub use collection::{Collection, Entry};
pub use error::StoreError;
pub use identity::Resolution;
pub use snapshot::{Snapshot, SnapshotStore};
