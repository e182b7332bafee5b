use std::fmt::{Debug, Display};
use std::hash::Hash;

/// A uniquely identified record that can be mutated optimistically.
///
/// Records are values: `merge` returns the updated record and leaves
/// `self` untouched.
pub trait Entity: Clone + PartialEq + Debug {
    type Id: Clone + Eq + Hash + Ord + Debug + Display;

    /// Tagged update variants for this kind of record.
    type Patch: Clone + PartialEq + Debug;

    fn id(&self) -> &Self::Id;

    fn merge(&self, patch: &Self::Patch) -> Self;
}
