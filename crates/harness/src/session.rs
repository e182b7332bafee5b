use storefront_core::Order;
use storefront_engine::realtime::handle_notice;
use storefront_engine::sync::{self, resync};
use storefront_engine::{
    EngineConfig, EngineError, MutationEngine, MutationOp, Subscription, SyncOutcome,
};

use crate::backend::{ORDERS_TABLE, SqliteOrders};
use crate::error::HarnessError;

/// One wallet's order list wired to a backend, like the orders hook in a
/// running storefront.
pub struct OrderSession {
    pub engine: MutationEngine<Order>,
    pub backend: SqliteOrders,
    pub subscription: Subscription,
}

impl OrderSession {
    pub fn open(wallet: &str, orders: &[Order]) -> Result<Self, HarnessError> {
        Self::with_config(wallet, orders, EngineConfig::default())
    }

    /// Seed the backend with `orders` (any wallet) and load this wallet's rows.
    pub fn with_config(
        wallet: &str,
        orders: &[Order],
        config: EngineConfig,
    ) -> Result<Self, HarnessError> {
        let mut backend = SqliteOrders::open_in_memory()?.scoped_to(wallet);
        backend.seed(orders)?;
        let mut engine = MutationEngine::with_config(config);
        resync(&mut engine, &mut backend)?;
        Ok(Self {
            engine,
            backend,
            subscription: Subscription::table(ORDERS_TABLE).owned_by(wallet),
        })
    }

    pub fn submit(&mut self, op: MutationOp<Order>) -> Result<SyncOutcome, EngineError> {
        sync::submit(&mut self.engine, &mut self.backend, op)
    }

    /// Deliver queued change notices. Returns how many caused a refetch.
    pub fn pump_notices(&mut self) -> Result<usize, EngineError> {
        let mut refetches = 0;
        for notice in self.backend.take_notices() {
            if handle_notice(&mut self.engine, &mut self.backend, &self.subscription, &notice)?
                .is_some()
            {
                refetches += 1;
            }
        }
        Ok(refetches)
    }
}
