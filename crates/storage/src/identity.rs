//! Matching records to collection entries. Ids are the only key: no
//! secondary keys, no fuzzy matching.

use storefront_core::Entity;

use crate::collection::Collection;

/// What a full record means for a collection that may already hold it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Same id already present at this position.
    Update(usize),
    /// No match; the record is new to the collection.
    Add,
}

pub fn same_entity<E: Entity>(a: &E, b: &E) -> bool {
    a.id() == b.id()
}

/// Linear scan for lists that carry no index, such as a freshly fetched page.
pub fn locate<E: Entity>(id: &E::Id, entities: &[E]) -> Option<usize> {
    entities.iter().position(|e| e.id() == id)
}

pub fn resolve<E: Entity>(entity: &E, collection: &Collection<E>) -> Resolution {
    match collection.position(entity.id()) {
        Some(pos) => Resolution::Update(pos),
        None => Resolution::Add,
    }
}
