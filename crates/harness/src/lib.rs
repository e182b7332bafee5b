pub mod backend;
pub mod error;
pub mod session;

pub use backend::{ORDERS_TABLE, SqliteOrders};
pub use error::{BackendError, HarnessError};
pub use session::OrderSession;

use tracing_subscriber::EnvFilter;

/// Route engine logs to the test writer. `RUST_LOG` overrides the default
/// `warn` level. Safe to call from every test.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
