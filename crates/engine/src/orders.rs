//! Named order operations over the generic engine. Each one is a single
//! field change; whether a transition is legal is for the backend to decide.

use storefront_core::{
    MutationId, Order, OrderChange, OrderId, OrderStatus, PaymentStatus, ShippingStatus,
};

use crate::error::EngineError;
use crate::mutation::MutationEngine;
use crate::pending::MutationOp;

pub fn status_op(id: &OrderId, status: OrderStatus) -> MutationOp<Order> {
    change_op(id, OrderChange::Status(status))
}

pub fn payment_status_op(id: &OrderId, status: PaymentStatus) -> MutationOp<Order> {
    change_op(id, OrderChange::PaymentStatus(status))
}

pub fn shipping_status_op(id: &OrderId, status: ShippingStatus) -> MutationOp<Order> {
    change_op(id, OrderChange::ShippingStatus(status))
}

pub fn tracking_number_op(id: &OrderId, value: Option<String>) -> MutationOp<Order> {
    change_op(id, OrderChange::TrackingNumber(value))
}

pub fn notes_op(id: &OrderId, value: Option<String>) -> MutationOp<Order> {
    change_op(id, OrderChange::Notes(value))
}

fn change_op(id: &OrderId, patch: OrderChange) -> MutationOp<Order> {
    MutationOp::Update {
        id: id.clone(),
        patch,
    }
}

pub trait OrderMutations {
    fn update_status(&mut self, id: &OrderId, status: OrderStatus)
    -> Result<MutationId, EngineError>;

    fn update_payment_status(
        &mut self,
        id: &OrderId,
        status: PaymentStatus,
    ) -> Result<MutationId, EngineError>;

    fn update_shipping_status(
        &mut self,
        id: &OrderId,
        status: ShippingStatus,
    ) -> Result<MutationId, EngineError>;

    fn update_tracking_number(
        &mut self,
        id: &OrderId,
        value: Option<String>,
    ) -> Result<MutationId, EngineError>;

    fn update_notes(&mut self, id: &OrderId, value: Option<String>)
    -> Result<MutationId, EngineError>;
}

impl OrderMutations for MutationEngine<Order> {
    fn update_status(
        &mut self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<MutationId, EngineError> {
        self.apply(status_op(id, status))
    }

    fn update_payment_status(
        &mut self,
        id: &OrderId,
        status: PaymentStatus,
    ) -> Result<MutationId, EngineError> {
        self.apply(payment_status_op(id, status))
    }

    fn update_shipping_status(
        &mut self,
        id: &OrderId,
        status: ShippingStatus,
    ) -> Result<MutationId, EngineError> {
        self.apply(shipping_status_op(id, status))
    }

    fn update_tracking_number(
        &mut self,
        id: &OrderId,
        value: Option<String>,
    ) -> Result<MutationId, EngineError> {
        self.apply(tracking_number_op(id, value))
    }

    fn update_notes(
        &mut self,
        id: &OrderId,
        value: Option<String>,
    ) -> Result<MutationId, EngineError> {
        self.apply(notes_op(id, value))
    }
}
