pub mod access;
pub mod entity;
pub mod error;
pub mod field_value;
pub mod ids;
pub mod item;
pub mod order;
pub mod version;

pub use access::{AccessChange, AccessGrant, AccessRole};
pub use entity::Entity;
pub use error::CoreError;
pub use field_value::FieldValue;
pub use ids::*;
pub use item::{FieldPatch, ListItem};
pub use order::{Order, OrderChange, OrderStatus, PaymentStatus, ShippingStatus};
pub use version::{SequenceClock, Version};
