use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::field_value::FieldValue;
use crate::ids::ItemId;

/// Untyped dashboard row (listings, feedback, saved products).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    pub id: ItemId,
    pub fields: BTreeMap<String, FieldValue>,
}

impl ListItem {
    pub fn new(id: impl Into<ItemId>) -> Self {
        Self {
            id: id.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, key: &str, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }
}

/// Fields to overwrite; keys not named keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldPatch(pub BTreeMap<String, FieldValue>);

impl FieldPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: &str, value: impl Into<FieldValue>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }
}

impl Entity for ListItem {
    type Id = ItemId;
    type Patch = FieldPatch;

    fn id(&self) -> &ItemId {
        &self.id
    }

    fn merge(&self, patch: &FieldPatch) -> Self {
        let mut next = self.clone();
        for (key, value) in &patch.0 {
            next.fields.insert(key.clone(), value.clone());
        }
        next
    }
}
