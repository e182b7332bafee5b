use rusqlite::{Connection, OptionalExtension};
use storefront_core::{
    Entity, Order, OrderChange, OrderId, OrderStatus, PaymentStatus, ShippingStatus,
};
use storefront_engine::{ChangeNotice, DataSource, MutationOp};

use crate::error::BackendError;

pub const ORDERS_TABLE: &str = "orders";

const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS orders (
    id TEXT PRIMARY KEY,
    wallet TEXT NOT NULL,
    merchant_id TEXT NOT NULL,
    total_cents INTEGER NOT NULL,
    status TEXT NOT NULL,
    payment_status TEXT NOT NULL,
    shipping_status TEXT NOT NULL,
    tracking_number TEXT,
    notes TEXT
);
CREATE INDEX IF NOT EXISTS idx_orders_wallet ON orders (wallet);
";

const SELECT_COLUMNS: &str = "id, wallet, merchant_id, total_cents, status, payment_status, shipping_status, tracking_number, notes";

struct OrderRow {
    id: String,
    wallet: String,
    merchant_id: String,
    total_cents: i64,
    status: String,
    payment_status: String,
    shipping_status: String,
    tracking_number: Option<String>,
    notes: Option<String>,
}

impl OrderRow {
    fn read(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            wallet: row.get(1)?,
            merchant_id: row.get(2)?,
            total_cents: row.get(3)?,
            status: row.get(4)?,
            payment_status: row.get(5)?,
            shipping_status: row.get(6)?,
            tracking_number: row.get(7)?,
            notes: row.get(8)?,
        })
    }

    fn into_order(self) -> Result<Order, BackendError> {
        Ok(Order {
            id: OrderId::new(self.id),
            wallet: self.wallet,
            merchant_id: self.merchant_id,
            total_cents: self.total_cents,
            status: OrderStatus::parse(&self.status)?,
            payment_status: PaymentStatus::parse(&self.payment_status)?,
            shipping_status: ShippingStatus::parse(&self.shipping_status)?,
            tracking_number: self.tracking_number,
            notes: self.notes,
        })
    }
}

/// Orders table in an in-memory SQLite database, standing in for the
/// hosted Postgres. Every write queues a change notice the way the
/// realtime channel would.
pub struct SqliteOrders {
    conn: Connection,
    wallet: Option<String>,
    fail_next: Option<String>,
    notices: Vec<ChangeNotice>,
}

impl SqliteOrders {
    pub fn open_in_memory() -> Result<Self, BackendError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self {
            conn,
            wallet: None,
            fail_next: None,
            notices: Vec::new(),
        })
    }

    /// Restrict `fetch` to one wallet's orders.
    pub fn scoped_to(mut self, wallet: impl Into<String>) -> Self {
        self.wallet = Some(wallet.into());
        self
    }

    /// Insert rows without raising notices.
    pub fn seed(&mut self, orders: &[Order]) -> Result<(), BackendError> {
        for order in orders {
            self.save(order)?;
        }
        Ok(())
    }

    /// Make the next `write` fail with `reason`.
    pub fn fail_next_write(&mut self, reason: impl Into<String>) {
        self.fail_next = Some(reason.into());
    }

    /// A change made by someone else, e.g. the merchant's dashboard.
    pub fn external_update(&mut self, id: &OrderId, change: OrderChange) -> Result<Order, BackendError> {
        let order = self.update(id, &change)?;
        self.notify(&order.wallet);
        Ok(order)
    }

    pub fn take_notices(&mut self) -> Vec<ChangeNotice> {
        std::mem::take(&mut self.notices)
    }

    pub fn get(&self, id: &OrderId) -> Result<Option<Order>, BackendError> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {SELECT_COLUMNS} FROM orders WHERE id = ?1"),
                rusqlite::params![id.as_str()],
                OrderRow::read,
            )
            .optional()?;
        row.map(OrderRow::into_order).transpose()
    }

    fn save(&self, order: &Order) -> Result<(), BackendError> {
        self.conn.execute(
            "INSERT INTO orders (id, wallet, merchant_id, total_cents, status, payment_status, shipping_status, tracking_number, notes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             ON CONFLICT(id) DO UPDATE SET
                wallet = excluded.wallet,
                merchant_id = excluded.merchant_id,
                total_cents = excluded.total_cents,
                status = excluded.status,
                payment_status = excluded.payment_status,
                shipping_status = excluded.shipping_status,
                tracking_number = excluded.tracking_number,
                notes = excluded.notes",
            rusqlite::params![
                order.id.as_str(),
                order.wallet,
                order.merchant_id,
                order.total_cents,
                order.status.as_str(),
                order.payment_status.as_str(),
                order.shipping_status.as_str(),
                order.tracking_number,
                order.notes,
            ],
        )?;
        Ok(())
    }

    /// Merge `change` into the stored row. Setting a tracking number on an
    /// order that has not shipped also marks it shipped, like the
    /// production trigger does.
    fn update(&self, id: &OrderId, change: &OrderChange) -> Result<Order, BackendError> {
        let current = self
            .get(id)?
            .ok_or_else(|| BackendError::NotFound(id.to_string()))?;
        let mut next = current.merge(change);
        if let OrderChange::TrackingNumber(Some(_)) = change {
            if matches!(
                next.shipping_status,
                ShippingStatus::Pending | ShippingStatus::Processing
            ) {
                next.shipping_status = ShippingStatus::Shipped;
            }
        }
        self.save(&next)?;
        Ok(next)
    }

    fn notify(&mut self, wallet: &str) {
        self.notices
            .push(ChangeNotice::new(ORDERS_TABLE, Some(wallet.to_string())));
    }
}

impl DataSource<Order> for SqliteOrders {
    type Error = BackendError;

    fn fetch(&mut self) -> Result<Vec<Order>, BackendError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM orders WHERE (?1 IS NULL OR wallet = ?1) ORDER BY rowid"
        ))?;
        let rows = stmt
            .query_map(rusqlite::params![self.wallet], OrderRow::read)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(OrderRow::into_order).collect()
    }

    fn write(&mut self, op: &MutationOp<Order>) -> Result<Option<Order>, BackendError> {
        if let Some(reason) = self.fail_next.take() {
            return Err(BackendError::Rejected(reason));
        }
        match op {
            MutationOp::Add(order) => {
                if self.get(&order.id)?.is_some() {
                    return Err(BackendError::Rejected(format!("order {} exists", order.id)));
                }
                self.save(order)?;
                self.notify(&order.wallet);
                Ok(Some(order.clone()))
            }
            MutationOp::Update { id, patch } => {
                let order = self.update(id, patch)?;
                self.notify(&order.wallet);
                Ok(Some(order))
            }
            MutationOp::Replace(order) => {
                if self.get(&order.id)?.is_none() {
                    return Err(BackendError::NotFound(order.id.to_string()));
                }
                self.save(order)?;
                self.notify(&order.wallet);
                Ok(Some(order.clone()))
            }
            MutationOp::Remove { id } => {
                let order = self
                    .get(id)?
                    .ok_or_else(|| BackendError::NotFound(id.to_string()))?;
                self.conn
                    .execute("DELETE FROM orders WHERE id = ?1", rusqlite::params![id.as_str()])?;
                self.notify(&order.wallet);
                Ok(None)
            }
        }
    }
}
