use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::error::CoreError;
use crate::ids::OrderId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Processing,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "processing" => Ok(Self::Processing),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(CoreError::InvalidData(format!("unknown order status: {s}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "failed" => Ok(Self::Failed),
            "refunded" => Ok(Self::Refunded),
            _ => Err(CoreError::InvalidData(format!("unknown payment status: {s}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShippingStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Returned,
}

impl ShippingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Returned => "returned",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "returned" => Ok(Self::Returned),
            _ => Err(CoreError::InvalidData(format!("unknown shipping status: {s}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    /// Buyer wallet; realtime subscriptions filter on it.
    pub wallet: String,
    pub merchant_id: String,
    pub total_cents: i64,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub shipping_status: ShippingStatus,
    pub tracking_number: Option<String>,
    pub notes: Option<String>,
}

impl Order {
    /// A freshly placed order: everything pending, no tracking or notes.
    pub fn placed(
        id: impl Into<OrderId>,
        wallet: impl Into<String>,
        merchant_id: impl Into<String>,
        total_cents: i64,
    ) -> Self {
        Self {
            id: id.into(),
            wallet: wallet.into(),
            merchant_id: merchant_id.into(),
            total_cents,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            shipping_status: ShippingStatus::Pending,
            tracking_number: None,
            notes: None,
        }
    }

    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = status;
        self
    }
}

/// One field-level change to an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderChange {
    Status(OrderStatus),
    PaymentStatus(PaymentStatus),
    ShippingStatus(ShippingStatus),
    TrackingNumber(Option<String>),
    Notes(Option<String>),
}

impl OrderChange {
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::Status(_) => "status",
            Self::PaymentStatus(_) => "payment_status",
            Self::ShippingStatus(_) => "shipping_status",
            Self::TrackingNumber(_) => "tracking_number",
            Self::Notes(_) => "notes",
        }
    }
}

impl Entity for Order {
    type Id = OrderId;
    type Patch = OrderChange;

    fn id(&self) -> &OrderId {
        &self.id
    }

    fn merge(&self, patch: &OrderChange) -> Self {
        let mut next = self.clone();
        match patch {
            OrderChange::Status(s) => next.status = *s,
            OrderChange::PaymentStatus(s) => next.payment_status = *s,
            OrderChange::ShippingStatus(s) => next.shipping_status = *s,
            OrderChange::TrackingNumber(t) => next.tracking_number = t.clone(),
            OrderChange::Notes(n) => next.notes = n.clone(),
        }
        next
    }
}
